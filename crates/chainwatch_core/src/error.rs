use thiserror::Error;

use crate::health::HealthCondition;
use crate::mode::Mode;

/// Ways a fetch-and-await can end without a batch.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JobError {
    #[error("Please select an option first")]
    MissingSelection,
    #[error("Failed to start processing job: {0}")]
    SubmissionFailed(String),
    #[error("Processing failed: {message}{}", details_suffix(.details))]
    JobExecutionFailed {
        message: String,
        details: Option<String>,
    },
    #[error("Processing timed out. Please try again.")]
    JobTimedOut,
}

impl JobError {
    pub fn execution(message: impl Into<String>) -> Self {
        JobError::JobExecutionFailed {
            message: message.into(),
            details: None,
        }
    }
}

/// The single dismissible condition shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Advisory {
    #[error(transparent)]
    Job(#[from] JobError),
    #[error("No options available for {mode} mode")]
    OptionsUnavailable { mode: Mode },
    #[error("Failed to load options for {mode} mode: {message}")]
    OptionsLoadFailed { mode: Mode, message: String },
    #[error("Backend not responding. Make sure the server is running.")]
    BackendUnreachable,
    #[error("Analysis model not loaded yet. It may still be loading.")]
    ModelNotReady,
    #[error("Failed to update model state: {0}")]
    ToggleFailed(String),
    #[error("Failed to load transaction details")]
    DetailUnavailable,
}

impl Advisory {
    pub fn is_health(&self) -> bool {
        matches!(self, Advisory::BackendUnreachable | Advisory::ModelNotReady)
    }
}

impl From<HealthCondition> for Advisory {
    fn from(condition: HealthCondition) -> Self {
        match condition {
            HealthCondition::BackendUnreachable => Advisory::BackendUnreachable,
            HealthCondition::ModelNotReady => Advisory::ModelNotReady,
        }
    }
}

fn details_suffix(details: &Option<String>) -> String {
    match details.as_deref() {
        Some(details) if !details.is_empty() => format!(" - {details}"),
        _ => String::new(),
    }
}

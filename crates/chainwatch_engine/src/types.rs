use std::fmt;

use chainwatch_core::{
    Batch, HealthStatus, JobError, JobRequest, Mode, ProcessingOption, Record,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct BackendError {
    pub kind: FailureKind,
    pub message: String,
}

impl BackendError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    Network,
    Decode,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::Network => write!(f, "network error"),
            FailureKind::Decode => write!(f, "unexpected response"),
        }
    }
}

/// `GET /api/health`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HealthResponse {
    #[serde(default)]
    pub w3_connected: bool,
    #[serde(default)]
    pub ai_loaded: bool,
    #[serde(default)]
    pub model_enabled: bool,
}

impl HealthResponse {
    pub fn status(&self) -> HealthStatus {
        HealthStatus {
            backend_reachable: self.w3_connected,
            model_enabled: self.model_enabled,
            model_loaded: self.ai_loaded,
        }
    }
}

/// `GET /api/options`
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct OptionsResponse {
    #[serde(default)]
    pub options: Option<Vec<ProcessingOption>>,
}

/// Body of `POST /api/transactions/async`.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct SubmitBody {
    pub mode: Mode,
    pub option: Option<String>,
    pub block_count: u32,
}

impl From<&JobRequest> for SubmitBody {
    fn from(request: &JobRequest) -> Self {
        Self {
            mode: request.mode,
            option: request.option.map(|id| id.to_string()),
            block_count: request.block_count,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SubmitResponse {
    #[serde(default)]
    pub job_id: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatusKind {
    Pending,
    Complete,
    Error,
    /// Any other in-progress label the backend may use.
    #[serde(other)]
    Unknown,
}

/// `GET /api/transactions/job/:job_id`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct JobStatusResponse {
    pub status: JobStatusKind,
    #[serde(default)]
    pub result: Option<JobResultBody>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub details: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct JobResultBody {
    #[serde(default)]
    pub transactions: Vec<Record>,
    #[serde(default)]
    pub stats: Option<Value>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub details: Option<String>,
}

impl JobResultBody {
    /// A result can report a business failure even though the job completed.
    pub fn into_batch(self) -> Result<Batch, JobError> {
        if let Some(message) = self.error {
            return Err(JobError::JobExecutionFailed {
                message,
                details: self.details,
            });
        }
        Ok(Batch {
            records: self.transactions,
            stats: self.stats,
        })
    }
}

/// Body of an error response, when the backend sends one.
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub details: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineCommand {
    CheckHealth,
    LoadStats,
    LoadOptions { mode: Mode },
    SubmitJob { epoch: u64, request: JobRequest },
    ToggleModel { enabled: bool },
    LoadDetail { hash: String },
}

#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    HealthChecked(HealthStatus),
    StatsLoaded(Result<Value, BackendError>),
    OptionsLoaded {
        mode: Mode,
        result: Result<Vec<ProcessingOption>, BackendError>,
    },
    JobFinished {
        epoch: u64,
        result: Result<Batch, JobError>,
    },
    ModelToggled {
        enabled: bool,
        result: Result<(), BackendError>,
    },
    DetailLoaded {
        hash: String,
        result: Result<Value, BackendError>,
    },
}

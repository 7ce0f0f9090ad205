use std::fmt;

/// Readiness snapshot of the backend and its analysis model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HealthStatus {
    pub backend_reachable: bool,
    pub model_enabled: bool,
    pub model_loaded: bool,
}

impl HealthStatus {
    /// What a failed health request is reported as.
    pub fn unreachable() -> Self {
        Self {
            backend_reachable: false,
            model_enabled: false,
            model_loaded: false,
        }
    }

    /// A model switched off on purpose is not a condition.
    pub fn condition(&self) -> Option<HealthCondition> {
        if !self.backend_reachable {
            return Some(HealthCondition::BackendUnreachable);
        }
        if self.model_enabled && !self.model_loaded {
            return Some(HealthCondition::ModelNotReady);
        }
        None
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthCondition {
    BackendUnreachable,
    ModelNotReady,
}

impl fmt::Display for HealthCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HealthCondition::BackendUnreachable => write!(f, "backend unreachable"),
            HealthCondition::ModelNotReady => write!(f, "model not ready"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status(backend_reachable: bool, model_enabled: bool, model_loaded: bool) -> HealthStatus {
        HealthStatus {
            backend_reachable,
            model_enabled,
            model_loaded,
        }
    }

    #[test]
    fn unreachable_wins_over_model_flags() {
        assert_eq!(
            status(false, true, true).condition(),
            Some(HealthCondition::BackendUnreachable)
        );
        assert_eq!(
            HealthStatus::unreachable().condition(),
            Some(HealthCondition::BackendUnreachable)
        );
    }

    #[test]
    fn enabled_but_unloaded_model_is_not_ready() {
        assert_eq!(
            status(true, true, false).condition(),
            Some(HealthCondition::ModelNotReady)
        );
    }

    #[test]
    fn disabled_model_and_healthy_backend_have_no_condition() {
        assert_eq!(status(true, false, false).condition(), None);
        assert_eq!(status(true, true, true).condition(), None);
    }
}

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    /// The repository failed or returned nothing, so no snapshot can be built.
    #[error("Match data unavailable: {0}")]
    DataUnavailable(String),

    #[error("Team not found: {name}{}", suggestion_hint(.suggestion))]
    TeamNotFound {
        name: String,
        suggestion: Option<String>,
    },

    /// A league average is zero or not finite, so strength ratios are undefined.
    #[error("Metric undefined: {0}")]
    MetricUndefined(String),

    #[error("Invalid match record at row {row}: {reason}")]
    InvalidRecord { row: usize, reason: String },

    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl EngineError {
    /// True when the caller should fix the request rather than retry later.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            EngineError::TeamNotFound { .. } | EngineError::InvalidRequest(_)
        )
    }
}

fn suggestion_hint(suggestion: &Option<String>) -> String {
    match suggestion {
        Some(name) => format!(" (did you mean '{}'?)", name),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn team_not_found_is_a_client_error() {
        let err = EngineError::TeamNotFound {
            name: "Arsenl".to_string(),
            suggestion: Some("Arsenal".to_string()),
        };
        assert!(err.is_client_error());
        assert_eq!(
            err.to_string(),
            "Team not found: Arsenl (did you mean 'Arsenal'?)"
        );
    }

    #[test]
    fn data_errors_are_retryable() {
        assert!(!EngineError::DataUnavailable("empty".into()).is_client_error());
        assert!(!EngineError::MetricUndefined("avg".into()).is_client_error());
    }
}

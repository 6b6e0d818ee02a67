use thiserror::Error;

/// Unified error type for the Algorithm API.
#[derive(Error, Debug)]
pub enum AlgoError {
    /// Client-input defect detected before any algorithm runs.
    #[error("{0}")]
    Validation(String),

    /// Elements that cannot be ordered against each other.
    #[error("Incomparable values: {0}")]
    Incomparable(String),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

impl AlgoError {
    /// Map to HTTP status code.
    pub fn status_code(&self) -> u16 {
        match self {
            AlgoError::Validation(_) => 400,
            _ => 500,
        }
    }

    /// Validation errors are the only kind the caller can fix.
    pub fn is_validation(&self) -> bool {
        matches!(self, AlgoError::Validation(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_maps_to_400() {
        let err = AlgoError::Validation("Missing required field: array".into());
        assert_eq!(err.status_code(), 400);
        assert!(err.is_validation());
        assert_eq!(err.to_string(), "Missing required field: array");
    }

    #[test]
    fn incomparable_maps_to_500() {
        let err = AlgoError::Incomparable("number vs string".into());
        assert_eq!(err.status_code(), 500);
        assert!(!err.is_validation());
    }

    #[test]
    fn serialization_failure_converts_and_maps_to_500() {
        fn encode() -> Result<serde_json::Value, AlgoError> {
            Ok(serde_json::from_str("{")?)
        }
        let err = encode().unwrap_err();
        assert!(matches!(err, AlgoError::Serde(_)));
        assert_eq!(err.status_code(), 500);
        assert!(err.to_string().starts_with("Serialization error:"));
    }
}

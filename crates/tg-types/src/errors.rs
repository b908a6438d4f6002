use thiserror::Error;

/// Main error type for the TuneGrid system.
///
/// The taxonomy is deliberately small: the dispatcher signals exhaustion with
/// `None`, and a failed training session is ordinary data (a non-zero
/// `exit_status`), not an error.
#[derive(Error, Debug)]
pub enum TuneError {
    #[error("Invalid comparison expression {expr:?}: {reason}")]
    Comparison { expr: String, reason: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias for TuneGrid operations
pub type TuneResult<T> = Result<T, TuneError>;

/// Macro for creating configuration errors
#[macro_export]
macro_rules! config_error {
    ($($arg:tt)*) => {
        $crate::TuneError::Config(format!($($arg)*))
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn comparison_error_display() {
        let error = TuneError::Comparison {
            expr: ">> 40".to_string(),
            reason: "unknown operator".to_string(),
        };
        assert!(error.to_string().contains(">> 40"));
        assert!(error.to_string().contains("unknown operator"));
    }

    #[test]
    fn config_error_macro() {
        let err = config_error!("axis {} is empty", "beta");
        assert!(err.to_string().contains("axis beta is empty"));
    }
}

use crate::api::ApiError;
use crate::config::ConfigError;
use thiserror::Error;

/// Top-level error type. Only `Validation` and `Api` ever reach the user
/// during a session; the rest abort startup.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Search query is empty")]
    Validation,

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Failed to initialize logging: {0}")]
    Logging(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl AppError {
    /// Text shown in the UI for this error.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Validation => "Please enter a dish name".to_string(),
            AppError::Api(_) => "Failed to load recipes. Please try again later.".to_string(),
            AppError::Config(e) => format!("Configuration error: {e}"),
            AppError::Logging(msg) => format!("Logging unavailable: {msg}"),
            AppError::Io(e) => format!("File system error: {e}"),
        }
    }
}

/// Trim `input` and reject it when nothing is left.
pub fn validate_query(input: &str) -> Result<&str, AppError> {
    let query = input.trim();
    if query.is_empty() {
        Err(AppError::Validation)
    } else {
        Ok(query)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_query() {
        assert_eq!(validate_query("  chicken ").unwrap(), "chicken");
        assert!(matches!(validate_query(""), Err(AppError::Validation)));
        assert!(matches!(validate_query(" \t "), Err(AppError::Validation)));
    }

    #[test]
    fn test_api_error_message_is_generic() {
        let err = AppError::from(ApiError::Status {
            status: 502,
            endpoint: "/search.php".to_string(),
        });
        let msg = err.user_message();
        assert!(msg.contains("Failed to load recipes"));
        assert!(!msg.contains("502"));
    }

    #[test]
    fn test_config_error_message() {
        let err = AppError::from(ConfigError::NoHomeDirectory);
        assert!(err.user_message().starts_with("Configuration error"));
    }
}

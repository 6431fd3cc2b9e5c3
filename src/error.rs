use thiserror::Error;

/// Unified error type for publish-planner operations
#[derive(Error, Debug)]
pub enum PublishError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid release branch pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("VCS query failed: {0}")]
    Vcs(String),

    #[error("Git repository error: {0}")]
    Git(#[from] git2::Error),

    #[error("Failed to parse configuration: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid property override: {0}")]
    Property(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for Results in publish-planner
pub type Result<T> = std::result::Result<T, PublishError>;

impl PublishError {
    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        PublishError::Config(msg.into())
    }

    /// Create a VCS error with context
    pub fn vcs(msg: impl Into<String>) -> Self {
        PublishError::Vcs(msg.into())
    }

    /// Create a property override error with context
    pub fn property(msg: impl Into<String>) -> Self {
        PublishError::Property(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = PublishError::config("missing custom_command for target 'nexus'");
        assert_eq!(
            err.to_string(),
            "Configuration error: missing custom_command for target 'nexus'"
        );
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: PublishError = io_err.into();
        assert!(err.to_string().contains("I/O error"));
    }

    #[test]
    fn test_error_from_regex() {
        let regex_err = regex::Regex::new("release/(").unwrap_err();
        let err: PublishError = regex_err.into();
        assert!(err.to_string().starts_with("Invalid release branch pattern"));
    }

    #[test]
    fn test_error_from_toml() {
        let toml_err = toml::from_str::<toml::Value>("git_folder = ").unwrap_err();
        let err: PublishError = toml_err.into();
        assert!(err.to_string().starts_with("Failed to parse configuration"));
    }

    #[test]
    fn test_error_messages_are_descriptive() {
        let error_pairs = vec![
            (PublishError::config("x"), "Configuration error"),
            (PublishError::vcs("x"), "VCS query failed"),
            (PublishError::property("x"), "Invalid property override"),
        ];

        for (err, expected_prefix) in error_pairs {
            let msg = err.to_string();
            assert!(
                msg.starts_with(expected_prefix),
                "Error message should start with '{}', but got '{}'",
                expected_prefix,
                msg
            );
        }
    }

    #[test]
    fn test_error_empty_messages() {
        let errors = vec![
            PublishError::config(""),
            PublishError::vcs(""),
            PublishError::property(""),
        ];

        for err in errors {
            // Even with empty message, the error type prefix should be present
            assert!(!err.to_string().is_empty());
        }
    }
}

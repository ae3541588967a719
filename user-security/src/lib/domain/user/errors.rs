use thiserror::Error;

/// Error for configuration loading and validation failures
#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error("manager must be set in security configuration")]
    MissingManager,

    #[error("Configuration value cannot be empty: {0}")]
    EmptyValue(&'static str),

    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),
}

/// Top-level error for user lookup and role operations
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SecurityError {
    // Caller errors
    #[error("Invalid user role: {0}")]
    InvalidRole(String),

    // Lookup errors, surfaced to the authentication pipeline
    #[error("Could not find user: {0}")]
    UserNotFound(String),

    #[error("Unsupported user class: {0}")]
    UnsupportedUserType(String),

    // Infrastructure errors
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl From<anyhow::Error> for SecurityError {
    fn from(err: anyhow::Error) -> Self {
        SecurityError::Unknown(err.to_string())
    }
}

use thiserror::Error;

/// Top-level error type for the Frontdesk system.
///
/// Variants map one-to-one onto the failure classes the API surface has to
/// distinguish: caller faults (`Validation`), absent entities (`NotFound`),
/// store faults (`Persistence`), and external-capability faults
/// (`Completion`, `Notification`). Subsystem crates use this type directly
/// so that the `?` operator works across crate boundaries.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum FrontdeskError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Persistence error: {0}")]
    Persistence(String),

    #[error("Completion capability error: {0}")]
    Completion(String),

    #[error("Notification error: {0}")]
    Notification(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<toml::de::Error> for FrontdeskError {
    fn from(err: toml::de::Error) -> Self {
        FrontdeskError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for FrontdeskError {
    fn from(err: toml::ser::Error) -> Self {
        FrontdeskError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for FrontdeskError {
    fn from(err: serde_json::Error) -> Self {
        FrontdeskError::Serialization(err.to_string())
    }
}

/// A specialized `Result` type for Frontdesk operations.
pub type Result<T> = std::result::Result<T, FrontdeskError>;

use thiserror::Error;

use super::version::Version;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UpgradeError {
    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Cannot downgrade schema from {installed} to {target}")]
    Downgrade { installed: Version, target: Version },

    #[error("Invalid catalog: {0}")]
    InvalidCatalog(String),

    #[error("Upgrade step '{step}' failed at version {reached}: {reason}")]
    StepFailed {
        step: String,
        reached: Version,
        reason: String,
    },

    #[error("I/O error: {0}")]
    IoError(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

pub type Result<T> = std::result::Result<T, UpgradeError>;

impl From<std::io::Error> for UpgradeError {
    fn from(err: std::io::Error) -> Self {
        Self::IoError(err.to_string())
    }
}

impl From<serde_json::Error> for UpgradeError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

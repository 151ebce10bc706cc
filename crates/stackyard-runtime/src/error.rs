//! Deployment runtime error types

use stackyard_core::TopologyError;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DeployError {
    #[error("Unsupported template: {0}")]
    UnsupportedTemplate(String),

    #[error(
        "Invalid service id '{0}': expected lowercase letters, digits, '-' or '_' (max 63 chars, starting with a letter or digit)"
    )]
    InvalidServiceId(String),

    #[error("Invalid service request: {0}")]
    InvalidRequest(#[source] TopologyError),

    #[error("Manifest serialization failed: {0}")]
    Serialization(#[source] TopologyError),

    #[error("Failed to write {path}: {source}")]
    Storage {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Command failed: {command}\n{stderr}")]
    Execution { command: String, stderr: String },

    #[error("Failed to resolve mapped port of '{service}': {reason}")]
    PortResolution { service: String, reason: String },

    #[error("Command timed out after {timeout:?}: {command}")]
    Timeout { command: String, timeout: Duration },

    #[error("Command cancelled: {command}")]
    Cancelled { command: String },

    #[error("Failed to start command {command}: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },
}

impl DeployError {
    /// Whether the orchestrator may have been left with partially applied state
    pub fn touched_orchestrator(&self) -> bool {
        matches!(
            self,
            Self::Execution { .. }
                | Self::PortResolution { .. }
                | Self::Timeout { .. }
                | Self::Cancelled { .. }
        )
    }
}

impl From<TopologyError> for DeployError {
    fn from(err: TopologyError) -> Self {
        match err {
            TopologyError::Serialization(_) => Self::Serialization(err),
            _ => Self::InvalidRequest(err),
        }
    }
}

pub type Result<T> = std::result::Result<T, DeployError>;

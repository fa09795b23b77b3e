//! Error types for telematics client operations

use telematics_core::DecodeError;
use thiserror::Error;

use crate::transport::TransportError;

/// Result type alias for telematics client operations
pub type Result<T> = std::result::Result<T, TelematicsError>;

/// Errors that can occur during telematics client operations
#[derive(Error, Debug)]
pub enum TelematicsError {
    /// Missing or invalid client configuration, raised before any network activity
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A local precondition failed, no request was sent
    #[error("Validation error: {0}")]
    Validation(String),

    /// The service payload could not be decoded
    #[error("Invalid payload: {0}")]
    InvalidPayload(#[from] DecodeError),

    /// The service answered with a result code other than success
    #[error("Remote command {command} failed with result code {}", .result_code.as_deref().unwrap_or("<missing>"))]
    CommandFailed {
        command: &'static str,
        result_code: Option<String>,
    },

    /// Network, credential or session failure from the transport
    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// Coarse failure classes callers can branch on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Configuration,
    Validation,
    RemoteCommand,
    Transport,
}

impl TelematicsError {
    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Failure class of this error. Undecodable payloads count as validation failures.
    pub fn kind(&self) -> ErrorKind {
        match self {
            TelematicsError::Configuration(_) => ErrorKind::Configuration,
            TelematicsError::Validation(_) => ErrorKind::Validation,
            TelematicsError::InvalidPayload(_) => ErrorKind::Validation,
            TelematicsError::CommandFailed { .. } => ErrorKind::RemoteCommand,
            TelematicsError::Transport(_) => ErrorKind::Transport,
        }
    }

    /// Name of the failed remote command, if this is a command failure
    pub fn command(&self) -> Option<&'static str> {
        match self {
            TelematicsError::CommandFailed { command, .. } => Some(*command),
            _ => None,
        }
    }
}

//! Error types for infrastructure operations

use thiserror::Error;

/// Errors that can occur in infrastructure operations
#[derive(Debug, Error)]
pub enum InfrastructureError {
    /// NATS connection error
    #[error("NATS connection error: {0}")]
    NatsConnection(String),

    /// NATS publish error
    #[error("NATS publish error: {0}")]
    NatsPublish(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Invalid lifecycle transition
    #[error("Lifecycle error: {0}")]
    Lifecycle(#[from] crate::state_machine::TransitionError),
}

/// Result type for infrastructure operations
pub type InfrastructureResult<T> = Result<T, InfrastructureError>;

impl From<async_nats::ConnectError> for InfrastructureError {
    fn from(err: async_nats::ConnectError) -> Self {
        InfrastructureError::NatsConnection(err.to_string())
    }
}

impl From<async_nats::PublishError> for InfrastructureError {
    fn from(err: async_nats::PublishError) -> Self {
        InfrastructureError::NatsPublish(err.to_string())
    }
}

impl From<serde_json::Error> for InfrastructureError {
    fn from(err: serde_json::Error) -> Self {
        InfrastructureError::Serialization(err.to_string())
    }
}

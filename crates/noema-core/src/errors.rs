//! Error types for noema-core.
//!
//! Every fallible core helper returns `NoemaResult`. Higher layers (API, CLI)
//! map the error kind onto their own surface, e.g. an HTTP status.

use thiserror::Error;

pub type NoemaResult<T> = Result<T, NoemaError>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NoemaError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("unauthorized: {0}")]
    Unauthorized(String),

    #[error("token expired")]
    Expired,

    #[error("not configured: {0}")]
    NotConfigured(String),
}

impl NoemaError {
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    pub fn serialization(msg: impl Into<String>) -> Self {
        Self::Serialization(msg.into())
    }

    pub fn unauthorized(msg: impl Into<String>) -> Self {
        Self::Unauthorized(msg.into())
    }

    pub fn not_configured(what: impl Into<String>) -> Self {
        Self::NotConfigured(what.into())
    }

    /// Message without the kind prefix, suitable for `{"error": ...}` bodies.
    pub fn message(&self) -> String {
        match self {
            Self::InvalidArgument(m)
            | Self::Serialization(m)
            | Self::Unauthorized(m) => m.clone(),
            Self::Expired => "jwt expired".to_string(),
            Self::NotConfigured(what) => format!("{what} not configured"),
        }
    }
}

impl From<serde_json::Error> for NoemaError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serialization(e.to_string())
    }
}

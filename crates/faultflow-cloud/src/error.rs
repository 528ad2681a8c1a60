//! Error types for provider calls and fault actions

use crate::response::ResultCode;
use thiserror::Error;

/// A call against a cloud provider failed
#[derive(Error, Debug)]
pub enum CloudError {
    #[error("API error [{code}]: {message}")]
    Api { code: String, message: String },

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("Timeout: {0}")]
    Timeout(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CloudError>;

/// Why a fault action invocation failed
///
/// Every variant maps onto one coarse [`ResultCode`]. Provider messages are
/// embedded verbatim through the `source` fields.
#[derive(Error, Debug)]
pub enum ActionError {
    #[error("channel is nil")]
    ChannelNil,

    #[error("less parameter: `{0}`")]
    MissingParameter(String),

    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("{context}: {source}")]
    RequestFailed {
        context: String,
        #[source]
        source: CloudError,
    },

    #[error("create {provider} client failed: {source}")]
    ClientUnavailable {
        provider: String,
        #[source]
        source: CloudError,
    },

    #[error("{action} failed: {source}")]
    MutationFailed {
        action: String,
        #[source]
        source: CloudError,
    },
}

impl ActionError {
    pub fn missing(field: impl Into<String>) -> Self {
        ActionError::MissingParameter(field.into())
    }

    pub fn invalid(detail: impl Into<String>) -> Self {
        ActionError::InvalidParameter(detail.into())
    }

    /// Numeric classification reported to the caller
    pub fn code(&self) -> ResultCode {
        match self {
            ActionError::ChannelNil => ResultCode::ChannelNil,
            ActionError::MissingParameter(_) => ResultCode::MissingParameter,
            ActionError::InvalidParameter(_) => ResultCode::InvalidParameter,
            ActionError::RequestFailed { .. } => ResultCode::RequestFailed,
            ActionError::ClientUnavailable { .. } => ResultCode::ClientUnavailable,
            ActionError::MutationFailed { .. } => ResultCode::MutationFailed,
        }
    }
}

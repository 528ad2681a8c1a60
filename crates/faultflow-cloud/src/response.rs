//! Uniform result envelope returned by every fault action

use crate::error::ActionError;
use serde::{Deserialize, Serialize};

/// Coarse classification of an invocation result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultCode {
    Ok,
    /// A required field was blank after environment fallback
    MissingParameter,
    /// The operation type (or a flag combination) is not supported
    InvalidParameter,
    /// The read-only status probe could not complete
    RequestFailed,
    /// The executor was invoked before a channel was set
    ChannelNil,
    /// The provider client could not be constructed
    ClientUnavailable,
    /// The mutating call was rejected by the provider
    MutationFailed,
}

impl ResultCode {
    pub fn as_u32(self) -> u32 {
        match self {
            ResultCode::Ok => 200,
            ResultCode::MissingParameter => 45000,
            ResultCode::InvalidParameter => 47000,
            ResultCode::RequestFailed => 48000,
            ResultCode::ChannelNil => 50000,
            ResultCode::ClientUnavailable => 56001,
            ResultCode::MutationFailed => 56002,
        }
    }
}

impl std::fmt::Display for ResultCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResultCode::Ok => write!(f, "ok"),
            ResultCode::MissingParameter => write!(f, "missing parameter"),
            ResultCode::InvalidParameter => write!(f, "invalid parameter"),
            ResultCode::RequestFailed => write!(f, "request failed"),
            ResultCode::ChannelNil => write!(f, "channel nil"),
            ResultCode::ClientUnavailable => write!(f, "client unavailable"),
            ResultCode::MutationFailed => write!(f, "mutation failed"),
        }
    }
}

/// Response printed by the CLI
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    /// Numeric code (200 on success)
    pub code: u32,

    /// Whether the invocation succeeded
    pub success: bool,

    /// Error message if failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub err: Option<String>,

    /// Result payload; fault actions never carry one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<serde_json::Value>,
}

impl Response {
    pub fn success() -> Self {
        Self {
            code: ResultCode::Ok.as_u32(),
            success: true,
            err: None,
            result: None,
        }
    }

    pub fn failure(code: ResultCode, err: impl Into<String>) -> Self {
        Self {
            code: code.as_u32(),
            success: false,
            err: Some(err.into()),
            result: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.success
    }
}

impl From<ActionError> for Response {
    fn from(err: ActionError) -> Self {
        Response::failure(err.code(), err.to_string())
    }
}

impl<T> From<std::result::Result<T, ActionError>> for Response {
    fn from(result: std::result::Result<T, ActionError>) -> Self {
        match result {
            Ok(_) => Response::success(),
            Err(e) => e.into(),
        }
    }
}

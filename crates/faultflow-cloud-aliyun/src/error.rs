//! Aliyun provider error types

use faultflow_cloud::CloudError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AliyunError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error [{code}]: {message} (RequestId: {request_id})")]
    Api {
        code: String,
        message: String,
        request_id: String,
    },

    #[error("Signature error: {0}")]
    Signature(String),

    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(String),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, AliyunError>;

impl From<AliyunError> for CloudError {
    fn from(err: AliyunError) -> Self {
        match err {
            AliyunError::Http(e) if e.is_timeout() => CloudError::Timeout(e.to_string()),
            AliyunError::Http(e) => CloudError::Http(e.to_string()),
            AliyunError::Api {
                code,
                message,
                request_id,
            } => CloudError::Api {
                code,
                message: format!("{} (RequestId: {})", message, request_id),
            },
            AliyunError::Signature(msg) => CloudError::InvalidConfig(msg),
            AliyunError::InvalidEndpoint(msg) => CloudError::InvalidConfig(msg),
            AliyunError::Json(e) => CloudError::InvalidResponse(e.to_string()),
        }
    }
}

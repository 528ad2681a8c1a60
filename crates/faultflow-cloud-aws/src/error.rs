//! Mapping of SDK failures onto provider errors

use aws_sdk_ec2::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use faultflow_cloud::CloudError;

/// Service errors keep their code; everything else is transport
pub fn sdk_error<E, R>(err: SdkError<E, R>) -> CloudError
where
    E: ProvideErrorMetadata + std::error::Error + 'static,
    R: std::fmt::Debug,
{
    if let Some(code) = err.code() {
        return CloudError::Api {
            code: code.to_string(),
            message: err.message().unwrap_or_default().to_string(),
        };
    }
    let detail = DisplayErrorContext(&err).to_string();
    match err {
        SdkError::TimeoutError(_) => CloudError::Timeout(detail),
        _ => CloudError::Http(detail),
    }
}

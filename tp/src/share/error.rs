//! Share codec errors

use thiserror::Error;

use crate::domain::StructureError;

/// Why a shared plan could not be read or written
#[derive(Debug, Error)]
pub enum ShareError {
    #[error("shared plan is empty")]
    Empty,

    #[error("invalid base64: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("invalid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("shared plan has no version tag")]
    MissingVersion,

    #[error("unsupported plan version: {0}")]
    UnknownVersion(String),

    #[error("invalid plan structure: {0}")]
    Structure(#[from] StructureError),

    #[error("invalid share URL: {0}")]
    Url(#[from] url::ParseError),
}

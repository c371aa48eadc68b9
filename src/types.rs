//! Shared error type for keyshare

use hyper::StatusCode;
use thiserror::Error;

/// Errors raised while serving key shares
#[derive(Debug, Error)]
pub enum KeyShareError {
    /// Read request without a `name` query parameter
    #[error("missing required parameter: {0}")]
    MissingParameter(&'static str),

    /// No share stored under the requested name
    #[error("no key share named {0:?}")]
    NotFound(String),

    /// Write request with a content type other than form-urlencoded
    #[error("unsupported content type: {0}")]
    UnsupportedContentType(String),

    /// Invalid base64, unknown format tag, missing field or unparseable form
    #[error("malformed field {field}: {reason}")]
    MalformedField { field: &'static str, reason: String },

    #[error("method {0} not allowed")]
    MethodNotAllowed(String),

    #[error("request body exceeds {0} bytes")]
    BodyTooLarge(usize),

    #[error("failed to read request body: {0}")]
    BodyRead(String),

    #[error("failed to encode key share: {0}")]
    Encode(#[from] prost::EncodeError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl KeyShareError {
    pub fn malformed(field: &'static str, reason: impl Into<String>) -> Self {
        Self::MalformedField {
            field,
            reason: reason.into(),
        }
    }

    /// HTTP status this error is surfaced as
    pub fn status(&self) -> StatusCode {
        match self {
            Self::MissingParameter(_)
            | Self::UnsupportedContentType(_)
            | Self::MalformedField { .. }
            | Self::BodyRead(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
            Self::BodyTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            Self::Encode(_) | Self::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

pub type Result<T> = std::result::Result<T, KeyShareError>;

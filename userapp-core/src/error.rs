use std::fmt;
use thiserror::Error;

/// Error codes reported by the remote service in the `error_code` field.
///
/// Only the codes the client treats specially get their own variant; every
/// other code is carried verbatim in [`ErrorCode::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// The requested service or API version does not exist.
    InvalidService,
    /// The requested method does not exist on the service.
    InvalidMethod,
    /// Any business-level failure reported by the service.
    Other(String),
}

impl ErrorCode {
    pub fn parse(code: &str) -> Self {
        match code {
            "INVALID_SERVICE" => ErrorCode::InvalidService,
            "INVALID_METHOD" => ErrorCode::InvalidMethod,
            other => ErrorCode::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            ErrorCode::InvalidService => "INVALID_SERVICE",
            ErrorCode::InvalidMethod => "INVALID_METHOD",
            ErrorCode::Other(code) => code,
        }
    }

    /// Client misuse codes are raised even when service errors are suppressed.
    pub fn is_client_misuse(&self) -> bool {
        matches!(self, ErrorCode::InvalidService | ErrorCode::InvalidMethod)
    }
}

impl From<&str> for ErrorCode {
    fn from(code: &str) -> Self {
        ErrorCode::parse(code)
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failure to render a parameter tree as JSON.
#[derive(Debug, Error)]
pub enum ParamError {
    #[error("unsupported value kind {kind} at '{path}'")]
    UnsupportedValueKind { kind: &'static str, path: String },
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A terminal accessor was applied to a value of an incompatible kind.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot read {found} at '{path}' as {expected}")]
pub struct CoercionError {
    pub path: String,
    pub expected: &'static str,
    pub found: &'static str,
}

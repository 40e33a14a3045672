use thiserror::Error;
use userapp_core::{CoercionError, ErrorCode, ParamError};
use userapp_transport::TransportError;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Everything a method call can fail with.
///
/// Match the specific kinds (`InvalidMethod`, `InvalidService`, `Service`)
/// before the generic `Transport` and `Client` ones.
#[derive(Debug, Error)]
pub enum UserAppError {
    /// The request never produced a response body.
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// The parameters could not be serialized.
    #[error("Invalid parameters: {0}")]
    Parameter(#[from] ParamError),

    /// Unknown service or API version. Always raised.
    #[error("Invalid service: {0}")]
    InvalidService(String),

    /// Unknown method. Always raised.
    #[error("Invalid method: {0}")]
    InvalidMethod(String),

    /// Business-level failure reported by the service.
    #[error("Service error {code}: {message}")]
    Service { code: String, message: String },

    /// The response could not be decoded or classified.
    #[error("{message}: {source}")]
    Client {
        message: String,
        #[source]
        source: BoxError,
    },
}

impl UserAppError {
    pub fn client(message: impl Into<String>, source: impl Into<BoxError>) -> Self {
        UserAppError::Client {
            message: message.into(),
            source: source.into(),
        }
    }

    /// The service error code behind this error, if the service reported one.
    pub fn error_code(&self) -> Option<ErrorCode> {
        match self {
            UserAppError::InvalidService(_) => Some(ErrorCode::InvalidService),
            UserAppError::InvalidMethod(_) => Some(ErrorCode::InvalidMethod),
            UserAppError::Service { code, .. } => Some(ErrorCode::parse(code)),
            _ => None,
        }
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, UserAppError::Transport(_))
    }
}

impl From<CoercionError> for UserAppError {
    fn from(err: CoercionError) -> Self {
        UserAppError::client("Unexpected response shape", err)
    }
}

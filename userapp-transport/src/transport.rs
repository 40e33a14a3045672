use async_trait::async_trait;
use std::fmt;
use thiserror::Error;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("Failed to build HTTP client: {0}")]
    Build(#[source] BoxError),
    #[error("Connection failed: {0}")]
    Connect(#[source] BoxError),
    #[error("Request timed out: {0}")]
    Timeout(#[source] BoxError),
    #[error("Request failed: {0}")]
    Request(#[source] BoxError),
    #[error("Failed to read response body: {0}")]
    Body(#[source] BoxError),
}

/// Basic authentication credentials.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    /// App id as the user name, session token (or nothing) as the password.
    pub fn basic(app_id: impl Into<String>, token: Option<&str>) -> Self {
        Self {
            username: app_id.into(),
            password: token.unwrap_or_default().to_string(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &if self.password.is_empty() { "" } else { "<redacted>" })
            .finish()
    }
}

/// Raw HTTP response. The status is informational only; the service reports
/// failures in the body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

/// The HTTP collaborator the call orchestrator submits requests through.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// POST `body` as `application/json` to `url` with basic authentication.
    async fn post(
        &self,
        url: &str,
        body: String,
        credentials: &Credentials,
    ) -> Result<HttpResponse, TransportError>;
}

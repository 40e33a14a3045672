// UserApp API client
// Builds one method call at a time, posts it as JSON with basic
// authentication and hands the decoded response back as a ResultNavigator.
// Login and logout calls maintain the session token used for later calls.

use crate::error::UserAppError;
use crate::options::ClientOptions;
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info};
use userapp_core::{ErrorCode, ParamStruct, ParamValue, Parameter, ResultNavigator};
use userapp_transport::{HttpConfig, HttpTransport, ReqwestTransport};

/// Method whose result carries a fresh session token.
pub const LOGIN_METHOD: &str = "user.login";
/// Method that ends the session.
pub const LOGOUT_METHOD: &str = "user.logout";

/// Client for the UserApp API.
///
/// The client can be shared between tasks: each call builds its parameters in
/// its own [`MethodCall`], and the session token is only updated under a write
/// lock.
pub struct Client {
    options: RwLock<ClientOptions>,
    transport: Arc<dyn HttpTransport>,
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("options", &self.options)
            .field("transport", &"Arc<dyn HttpTransport>")
            .finish()
    }
}

impl Client {
    /// Create a client that talks HTTP through `reqwest`
    pub fn new(options: ClientOptions) -> Result<Self, UserAppError> {
        let transport = ReqwestTransport::new(HttpConfig {
            timeout_ms: options.timeout_ms,
            ..Default::default()
        })?;
        Ok(Self::with_transport(options, Arc::new(transport)))
    }

    /// Create a client with default options for `app_id`
    pub fn with_app_id(app_id: impl Into<String>) -> Result<Self, UserAppError> {
        Self::new(ClientOptions::new(app_id))
    }

    pub fn with_transport(options: ClientOptions, transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            options: RwLock::new(options),
            transport,
        }
    }

    /// Snapshot of the current options, including the live session token
    pub async fn options(&self) -> ClientOptions {
        self.options.read().await.clone()
    }

    pub async fn set_options(&self, options: ClientOptions) {
        *self.options.write().await = options;
    }

    pub async fn session_token(&self) -> Option<String> {
        self.options.read().await.token.clone()
    }

    /// Start building a call to `name`
    pub fn method(&self, name: impl Into<String>) -> MethodCall<'_> {
        MethodCall {
            client: self,
            method: name.into(),
            params: ParamStruct::new(),
        }
    }

    /// Perform a single method call
    pub async fn call(
        &self,
        method: &str,
        params: &ParamStruct,
    ) -> Result<ResultNavigator, UserAppError> {
        let (endpoint, credentials, verbose, throw_errors) = {
            let options = self.options.read().await;
            (
                options.endpoint(method),
                options.credentials(),
                options.debug,
                options.throw_errors,
            )
        };

        let body = params.to_json()?;
        if verbose {
            info!("Calling URL '{}' with parameters '{}'", endpoint, body);
        } else {
            debug!(method, "Calling {}", endpoint);
        }

        let response = self.transport.post(&endpoint, body, &credentials).await?;
        if verbose {
            info!("Received response '{}'", response.body);
        }

        let payload: Value = serde_json::from_str(&response.body)
            .map_err(|e| UserAppError::client("Failed to parse response body", e))?;
        let result = ResultNavigator::from_response(payload);

        self.update_session(method, &result).await?;
        classify(result, throw_errors)
    }

    /// Store the token issued by a login, drop it on logout.
    async fn update_session(
        &self,
        method: &str,
        result: &ResultNavigator,
    ) -> Result<(), UserAppError> {
        match method {
            LOGIN_METHOD => {
                let token = result.get("token");
                if !token.exists() {
                    return Ok(());
                }
                let token = token.as_string()?;

                let mut options = self.options.write().await;
                if options.token.is_none() && !token.is_empty() {
                    debug!("Session token acquired");
                    options.token = Some(token);
                }
            }
            LOGOUT_METHOD => {
                debug!("Session token cleared");
                self.options.write().await.token = None;
            }
            _ => {}
        }
        Ok(())
    }
}

/// Turn an `error_code` in the payload into the matching error.
fn classify(result: ResultNavigator, throw_errors: bool) -> Result<ResultNavigator, UserAppError> {
    let error_code = result.get("error_code");
    if !error_code.exists() || error_code.is_null() {
        return Ok(result);
    }

    let code = ErrorCode::parse(&error_code.as_string()?);
    debug!(%code, "Service reported an error");
    if !code.is_client_misuse() && !throw_errors {
        return Ok(result);
    }

    // Structured messages are kept as their JSON text
    let message = result.get("message");
    let message = message.as_string().unwrap_or_else(|_| message.to_string());

    match code {
        ErrorCode::InvalidService => Err(UserAppError::InvalidService(message)),
        ErrorCode::InvalidMethod => Err(UserAppError::InvalidMethod(message)),
        ErrorCode::Other(code) => Err(UserAppError::Service { code, message }),
    }
}

/// A method call under construction.
///
/// Parameters accumulate in insertion order; selecting another method with
/// [`method`](MethodCall::method) discards them.
#[derive(Debug)]
pub struct MethodCall<'a> {
    client: &'a Client,
    method: String,
    params: ParamStruct,
}

impl MethodCall<'_> {
    /// Re-select the method, dropping any parameters attached so far
    pub fn method(mut self, name: impl Into<String>) -> Self {
        self.method = name.into();
        self.params.clear();
        self
    }

    /// Attach a parameter
    pub fn parameter(mut self, name: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.params.push(Parameter::new(name, value));
        self
    }

    pub fn name(&self) -> &str {
        &self.method
    }

    pub fn params(&self) -> &ParamStruct {
        &self.params
    }

    pub async fn call(self) -> Result<ResultNavigator, UserAppError> {
        self.client.call(&self.method, &self.params).await
    }
}

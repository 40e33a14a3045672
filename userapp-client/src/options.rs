use std::env;
use std::fmt;
use thiserror::Error;
use userapp_transport::Credentials;

/// Production API host.
pub const DEFAULT_BASE_ADDRESS: &str = "api.userapp.io";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing required environment variable {0}")]
    MissingVar(&'static str),
    #[error("Invalid boolean '{value}' in {var}")]
    InvalidBool { var: &'static str, value: String },
    #[error("Invalid number '{value}' in {var}")]
    InvalidNumber { var: &'static str, value: String },
}

/// Connection configuration for a [`Client`](crate::Client).
#[derive(Clone, PartialEq, Eq)]
pub struct ClientOptions {
    /// Application id, sent as the basic-auth user name
    pub app_id: String,
    /// Session token, sent as the basic-auth password
    pub token: Option<String>,
    /// API version in the request path
    pub version: u32,
    /// Log requests and responses and ask the service for debug output
    pub debug: bool,
    /// Use https
    pub secure: bool,
    /// Service host, optionally with a port
    pub base_address: String,
    /// Raise service-reported errors instead of returning them as results
    pub throw_errors: bool,
    /// Request timeout in milliseconds
    pub timeout_ms: u64,
}

impl ClientOptions {
    pub fn new(app_id: impl Into<String>) -> Self {
        Self {
            app_id: app_id.into(),
            token: None,
            version: 1,
            debug: false,
            secure: true,
            base_address: DEFAULT_BASE_ADDRESS.to_string(),
            throw_errors: true,
            timeout_ms: 30000,
        }
    }

    pub fn with_token(app_id: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
            ..Self::new(app_id)
        }
    }

    /// Read options from `USERAPP_*` environment variables.
    ///
    /// `USERAPP_APP_ID` is required; `USERAPP_TOKEN`, `USERAPP_BASE_ADDRESS`,
    /// `USERAPP_VERSION`, `USERAPP_DEBUG` and `USERAPP_SECURE` are optional.
    pub fn from_env() -> Result<Self, ConfigError> {
        let app_id = env::var("USERAPP_APP_ID").map_err(|_| ConfigError::MissingVar("USERAPP_APP_ID"))?;
        let mut options = Self::new(app_id);

        if let Ok(token) = env::var("USERAPP_TOKEN") {
            options.token = Some(token);
        }
        if let Ok(address) = env::var("USERAPP_BASE_ADDRESS") {
            options.base_address = address;
        }
        if let Ok(version) = env::var("USERAPP_VERSION") {
            options.version = version.parse().map_err(|_| ConfigError::InvalidNumber {
                var: "USERAPP_VERSION",
                value: version.clone(),
            })?;
        }
        if let Some(debug) = bool_var("USERAPP_DEBUG")? {
            options.debug = debug;
        }
        if let Some(secure) = bool_var("USERAPP_SECURE")? {
            options.secure = secure;
        }

        Ok(options)
    }

    pub fn version(mut self, version: u32) -> Self {
        self.version = version;
        self
    }

    pub fn debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn secure(mut self, secure: bool) -> Self {
        self.secure = secure;
        self
    }

    pub fn base_address(mut self, address: impl Into<String>) -> Self {
        self.base_address = address.into();
        self
    }

    pub fn throw_errors(mut self, throw_errors: bool) -> Self {
        self.throw_errors = throw_errors;
        self
    }

    pub fn timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// `<scheme>://<host>/v<version>/`
    pub fn service_url(&self) -> String {
        format!(
            "{}://{}/v{}/",
            if self.secure { "https" } else { "http" },
            self.base_address,
            self.version
        )
    }

    /// Full request target for `method`, with the debug marker when enabled.
    pub fn endpoint(&self, method: &str) -> String {
        let mut endpoint = self.service_url();
        endpoint.push_str(method);
        if self.debug {
            endpoint.push_str("?$debug");
        }
        endpoint
    }

    pub fn credentials(&self) -> Credentials {
        Credentials::basic(&self.app_id, self.token.as_deref())
    }
}

impl fmt::Debug for ClientOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientOptions")
            .field("app_id", &self.app_id)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("version", &self.version)
            .field("debug", &self.debug)
            .field("secure", &self.secure)
            .field("base_address", &self.base_address)
            .field("throw_errors", &self.throw_errors)
            .field("timeout_ms", &self.timeout_ms)
            .finish()
    }
}

fn bool_var(var: &'static str) -> Result<Option<bool>, ConfigError> {
    match env::var(var) {
        Err(_) => Ok(None),
        Ok(value) => match value.to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(Some(true)),
            "0" | "false" | "no" | "off" => Ok(Some(false)),
            _ => Err(ConfigError::InvalidBool { var, value }),
        },
    }
}

//! Client for the UserApp API.
//!
//! ```no_run
//! use userapp_client::{Client, UserAppError};
//!
//! # async fn run() -> Result<(), UserAppError> {
//! let client = Client::with_app_id("YOUR-USERAPP-APP-ID")?;
//!
//! let login = client
//!     .method("user.login")
//!     .parameter("login", "johndoe81")
//!     .parameter("password", "iwasfirst!111")
//!     .call()
//!     .await?;
//! println!("Session token: {}", login.get("token").as_string()?);
//!
//! let user = client.method("user.get").parameter("user_id", "self").call().await?;
//! println!("Welcome, {}!", user.get(0).get("first_name").as_string()?);
//!
//! client.method("user.logout").call().await?;
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod error;
pub mod logging;
pub mod options;

pub use client::{Client, MethodCall, LOGIN_METHOD, LOGOUT_METHOD};
pub use error::UserAppError;
pub use options::{ClientOptions, ConfigError};

pub use userapp_core::{
    param_array, param_struct, ErrorCode, ParamArray, ParamStruct, ParamValue, ResultNavigator,
};
pub use userapp_transport::{Credentials, HttpResponse, HttpTransport, TransportError};

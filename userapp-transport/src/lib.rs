pub mod http;
pub mod transport;

pub use http::{HttpConfig, ReqwestTransport};
pub use transport::{Credentials, HttpResponse, HttpTransport, TransportError};

//! Transport layer for the resource server.
//!
//! The server speaks JSON over HTTP/1.1:
//! - `config.rs` - bind address and request limits
//! - `http.rs` - router assembly and the listener
//! - `middleware.rs` - body parsing, request logging, fallbacks
//! - `error.rs` - listener errors and the request error taxonomy

mod config;
mod error;
pub mod http;
pub mod middleware;

pub use config::HttpConfig;
pub use error::{ApiError, TransportError, TransportResult, error_body};
pub use http::{HttpTransport, build_app};

//! Server façade and the bridge between the engine and the neutral model.
//!
//! # Data Flow
//! ```text
//! HttpServer::start
//!     → HttpEngine (embedded by default)
//!     → adapter.rs (HandlerAdapter: single-handling guard)
//!     → request.rs (NativeRequestView) + response.rs (BufferedResponse)
//!     → HttpHandler
//!     → BufferedResponse::commit → NativeResponse
//! ```
//!
//! # Design Decisions
//! - Engines are injected through `HttpServer::with_engine`
//! - The response is buffered in full and copied to the engine once
//! - Construction validates host and port up front (address.rs)

pub mod adapter;
pub mod address;
pub mod error;
pub mod request;
pub mod response;
#[allow(clippy::module_inception)]
pub mod server;

pub use adapter::HandlerAdapter;
pub use address::{HostAddress, IpPort};
pub use error::{CommitError, ServerError};
pub use request::NativeRequestView;
pub use response::BufferedResponse;
pub use server::HttpServer;

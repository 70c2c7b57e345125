//! Embeddable HTTP server façade over a servlet-style engine.
//!
//! Applications implement one [`HttpHandler`] against a neutral request view
//! and a buffered response sink; the [`HttpServer`] owns the engine and its
//! lifecycle.
//!
//! ```no_run
//! use http_bridge::{DumpHandler, HostAddress, HttpServer, IpPort};
//!
//! let host = HostAddress::with("127.0.0.1")?;
//! let mut server = HttpServer::with(host, IpPort::from(8080), DumpHandler)?;
//! server.start()?;
//!
//! // Any thread may end serving; `join` then returns.
//! if let Some(handle) = server.stop_handle() {
//!     std::thread::spawn(move || {
//!         std::thread::sleep(std::time::Duration::from_secs(60));
//!         handle.trigger();
//!     });
//! }
//! server.join()?;
//! server.stop()?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

// Neutral model and application surface
pub mod dump;
pub mod http;
pub mod server;

// Engine
pub mod engine;

// Cross-cutting concerns
pub mod config;
pub mod lifecycle;
pub mod observability;

/// Error type returned by handlers and native stages.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

pub use config::ServerConfig;
pub use dump::DumpHandler;
pub use engine::{EmbeddedEngine, HttpEngine};
pub use http::{handler_fn, HttpHandler, HttpRequest, HttpResponse};
pub use lifecycle::Shutdown;
pub use server::{HostAddress, HttpServer, IpPort, ServerError};

//! Engine boundary: the container the server façade drives.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → embedded.rs (axum router, body collection, worker dispatch)
//!     → native.rs (NativeRequest / NativeResponse)
//!     → NativeHandler (installed stage, or chain.rs for several)
//!     → native.rs (NativeResponse → HTTP response)
//! ```
//!
//! # Design Decisions
//! - The façade only sees `HttpEngine`; engines are injected, not subclassed
//! - Handlers are synchronous and run on engine worker threads
//! - Lifecycle is blocking: start, stop and join must not be called from
//!   inside an async runtime

pub mod chain;
pub mod embedded;
pub mod native;

use std::fmt;
use std::net::SocketAddr;
use std::sync::Arc;

use crate::lifecycle::Shutdown;
use crate::BoxError;

pub use chain::HandlerChain;
pub use embedded::{EmbeddedEngine, EngineSettings};
pub use native::{NativeRequest, NativeResponse, ResponseOutput};

/// Error type for engine operations.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("Engine already started")]
    AlreadyStarted,

    #[error("Engine not running")]
    NotRunning,

    #[error("No handler installed")]
    NoHandler,

    #[error("Invalid engine settings: {0}")]
    InvalidSettings(String),

    #[error("Failed to build runtime: {0}")]
    Runtime(#[source] std::io::Error),

    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("Server task failed: {0}")]
    Task(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Invalid status code {0}")]
    InvalidStatus(u16),

    #[error("Invalid header {name}: {reason}")]
    InvalidHeader { name: String, reason: String },

    #[error("Response output already closed")]
    OutputClosed,
}

/// A stage the engine invokes for every request.
///
/// `target` is the request path. A stage that takes responsibility for the
/// request marks it handled; later stages see the flag.
pub trait NativeHandler: fmt::Display + Send + Sync {
    fn handle(
        &self,
        target: &str,
        request: &mut NativeRequest,
        response: &mut NativeResponse,
    ) -> Result<(), BoxError>;
}

impl<H: NativeHandler + ?Sized> NativeHandler for Arc<H> {
    fn handle(
        &self,
        target: &str,
        request: &mut NativeRequest,
        response: &mut NativeResponse,
    ) -> Result<(), BoxError> {
        (**self).handle(target, request, response)
    }
}

/// An HTTP engine: bound to an address, one installed handler.
pub trait HttpEngine: fmt::Display + Send {
    fn set_handler(&mut self, handler: Arc<dyn NativeHandler>);

    fn start(&mut self) -> Result<(), EngineError>;

    fn stop(&mut self) -> Result<(), EngineError>;

    /// Block until the engine stops serving.
    fn join(&self) -> Result<(), EngineError>;

    /// Address actually bound, once started.
    fn local_addr(&self) -> Option<SocketAddr>;

    /// Handle that ends serving from any thread, releasing `join`.
    /// `None` unless started.
    fn stop_handle(&self) -> Option<Shutdown>;
}

//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Start (engine):
//!     Build runtime → Bind listener → Subscribe to shutdown → Serve
//!
//! Stop (engine):
//!     trigger() → Stop accepting → Drain in-flight requests → Drop runtime
//!
//! Signals (binary only):
//!     SIGINT (Ctrl+C) → same path as trigger()
//! ```
//!
//! # Design Decisions
//! - Draining is bounded by `timeouts.shutdown_secs`
//! - Signal handling is opt-in so embedding applications keep control

pub mod shutdown;

pub use shutdown::Shutdown;

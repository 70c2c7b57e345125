//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! engine dispatch
//!     → logging.rs (structured log events, tower_http trace spans)
//!     → metrics.rs (counters, histograms)
//! ```
//!
//! # Design Decisions
//! - Structured logging for machine parsing
//! - Every dispatch logs its request ID
//! - Metrics are cheap (atomic increments)

pub mod logging;
pub mod metrics;

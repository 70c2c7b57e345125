//! Error kinds of the server façade and the commit step.

use crate::engine::EngineError;
use crate::http::response::ResponseError;

/// Error type for server construction and lifecycle.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// A required construction argument was missing or malformed.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The engine failed to start; the engine error is the source.
    #[error("Server start failed: {0}")]
    StartFailed(#[source] EngineError),

    /// The engine failed to stop; the engine error is the source.
    #[error("Server stop failed: {0}")]
    StopFailed(#[source] EngineError),

    /// Waiting for the engine failed, e.g. it was never started.
    #[error("Server join failed: {0}")]
    JoinFailed(#[source] EngineError),
}

/// Error type for committing a buffered response.
#[derive(Debug, thiserror::Error)]
pub enum CommitError {
    /// No status was ever set: the handler did not handle the request.
    #[error("Request not handled")]
    NotHandled,

    /// The status and entity together are not a valid response.
    #[error("Invalid response: {0}")]
    Response(#[from] ResponseError),

    /// The native response rejected the status or a header.
    #[error("Native response rejected commit: {0}")]
    Engine(#[from] EngineError),

    #[error("Writing response body failed: {0}")]
    Io(#[from] std::io::Error),
}

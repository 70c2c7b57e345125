//! Neutral HTTP entity model.
//!
//! # Data Flow
//! ```text
//! engine native request
//!     → request.rs (HttpRequest view: url, headers, parameters)
//!     → handler.rs (application HttpHandler)
//!     → response.rs (HttpResponse sink, guarded by guards.rs)
//!     → entity.rs (immutable headers + body)
//! ```
//!
//! # Design Decisions
//! - Nothing in this module knows about the engine
//! - Header names own the textual form of their values (header.rs)

pub mod entity;
pub mod guards;
pub mod handler;
pub mod header;
pub mod request;
pub mod response;
pub mod status;

pub use entity::{HttpEntity, HttpHeaders};
pub use guards::{check_required_headers, HeaderScopeResponse, RequiredHeadersResponse};
pub use handler::{handler_fn, HandlerFn, HttpHandler};
pub use header::{CharsetName, HeaderError, HeaderKind, HeaderScope, HeaderValue, HttpHeaderName, MediaType};
pub use request::{HttpRequest, RequestParameters};
pub use response::{HttpResponse, ResponseError};
pub use status::{HttpMethod, HttpProtocolVersion, HttpStatus, HttpStatusCode, StatusError};

//! Neutral response contract.
//!
//! A response is populated by a handler through setters and published later by
//! whoever owns the concrete sink. The entity is replaced wholesale; there is no
//! incremental header mutation through this interface.

use crate::http::entity::HttpEntity;
use crate::http::header::HttpHeaderName;
use crate::http::status::{HttpProtocolVersion, HttpStatus, HttpStatusCode};

/// Error raised when a response rejects a value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResponseError {
    #[error("Header {0} is not a response header")]
    NotResponseHeader(HttpHeaderName),

    #[error("Status {status} requires header {header}")]
    MissingRequiredHeader {
        status: HttpStatusCode,
        header: HttpHeaderName,
    },
}

/// Write side of one exchange.
pub trait HttpResponse {
    fn set_version(&mut self, version: HttpProtocolVersion) -> Result<(), ResponseError>;

    fn version(&self) -> Option<HttpProtocolVersion>;

    fn set_status(&mut self, status: HttpStatus) -> Result<(), ResponseError>;

    /// `None` until a handler sets a status.
    fn status(&self) -> Option<&HttpStatus>;

    fn set_entity(&mut self, entity: HttpEntity) -> Result<(), ResponseError>;

    fn entity(&self) -> &HttpEntity;
}

impl<R: HttpResponse + ?Sized> HttpResponse for &mut R {
    fn set_version(&mut self, version: HttpProtocolVersion) -> Result<(), ResponseError> {
        (**self).set_version(version)
    }

    fn version(&self) -> Option<HttpProtocolVersion> {
        (**self).version()
    }

    fn set_status(&mut self, status: HttpStatus) -> Result<(), ResponseError> {
        (**self).set_status(status)
    }

    fn status(&self) -> Option<&HttpStatus> {
        (**self).status()
    }

    fn set_entity(&mut self, entity: HttpEntity) -> Result<(), ResponseError> {
        (**self).set_entity(entity)
    }

    fn entity(&self) -> &HttpEntity {
        (**self).entity()
    }
}

//! Response decorators that validate entities as handlers set them.
//!
//! # Design Decisions
//! - Scope checks run in `set_entity`; every other call passes straight through
//! - Required headers are checked whichever of status and entity comes second;
//!   a status set over an empty entity is only checked at commit, since the
//!   entity may still follow

use crate::http::entity::HttpEntity;
use crate::http::response::{HttpResponse, ResponseError};
use crate::http::status::{HttpProtocolVersion, HttpStatus, HttpStatusCode};

/// Fail when `entity` lacks a header that `code` requires.
pub fn check_required_headers(code: HttpStatusCode, entity: &HttpEntity) -> Result<(), ResponseError> {
    match code
        .required_headers()
        .iter()
        .find(|header| !entity.headers().contains_key(*header))
    {
        Some(missing) => Err(ResponseError::MissingRequiredHeader {
            status: code,
            header: missing.clone(),
        }),
        None => Ok(()),
    }
}

/// Rejects entities carrying request-only headers.
#[derive(Debug)]
pub struct HeaderScopeResponse<R> {
    inner: R,
}

impl<R: HttpResponse> HeaderScopeResponse<R> {
    pub fn new(inner: R) -> Self {
        Self { inner }
    }

    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: HttpResponse> HttpResponse for HeaderScopeResponse<R> {
    fn set_version(&mut self, version: HttpProtocolVersion) -> Result<(), ResponseError> {
        self.inner.set_version(version)
    }

    fn version(&self) -> Option<HttpProtocolVersion> {
        self.inner.version()
    }

    fn set_status(&mut self, status: HttpStatus) -> Result<(), ResponseError> {
        self.inner.set_status(status)
    }

    fn status(&self) -> Option<&HttpStatus> {
        self.inner.status()
    }

    fn set_entity(&mut self, entity: HttpEntity) -> Result<(), ResponseError> {
        if let Some(name) = entity.headers().keys().find(|name| !name.scope().is_response()) {
            return Err(ResponseError::NotResponseHeader(name.clone()));
        }
        self.inner.set_entity(entity)
    }

    fn entity(&self) -> &HttpEntity {
        self.inner.entity()
    }
}

/// Rejects entities missing a header the current status requires,
/// e.g. `Location` for redirects.
#[derive(Debug)]
pub struct RequiredHeadersResponse<R> {
    inner: R,
}

impl<R: HttpResponse> RequiredHeadersResponse<R> {
    pub fn new(inner: R) -> Self {
        Self { inner }
    }

    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: HttpResponse> HttpResponse for RequiredHeadersResponse<R> {
    fn set_version(&mut self, version: HttpProtocolVersion) -> Result<(), ResponseError> {
        self.inner.set_version(version)
    }

    fn version(&self) -> Option<HttpProtocolVersion> {
        self.inner.version()
    }

    fn set_status(&mut self, status: HttpStatus) -> Result<(), ResponseError> {
        let entity = self.inner.entity();
        if !entity.is_empty() {
            check_required_headers(status.value(), entity)?;
        }
        self.inner.set_status(status)
    }

    fn status(&self) -> Option<&HttpStatus> {
        self.inner.status()
    }

    fn set_entity(&mut self, entity: HttpEntity) -> Result<(), ResponseError> {
        if let Some(status) = self.inner.status() {
            check_required_headers(status.value(), &entity)?;
        }
        self.inner.set_entity(entity)
    }

    fn entity(&self) -> &HttpEntity {
        self.inner.entity()
    }
}

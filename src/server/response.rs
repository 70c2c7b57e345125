//! Buffered response sink and its commit protocol.
//!
//! # States
//! ```text
//! Created ──set_status/set_entity/set_version──▶ Populated ──commit──▶ Committed
//! ```
//! The states are not tracked at runtime: `commit` takes the sink by value, so
//! a committed sink can neither be mutated nor committed again.
//!
//! # Commit
//! 1. No status → `CommitError::NotHandled`
//! 2. Headers the status requires missing → `CommitError::Response`
//! 3. Status line copied to the native response
//! 4. One native header line per header value, in entity order
//! 5. Body written through the scoped output stream, then flushed
//!
//! The protocol version is kept for the handler's benefit only; the engine
//! negotiates the version it writes.

use std::io::Write;

use crate::engine::NativeResponse;
use crate::http::entity::HttpEntity;
use crate::http::guards::check_required_headers;
use crate::http::response::{HttpResponse, ResponseError};
use crate::http::status::{HttpProtocolVersion, HttpStatus};
use crate::server::error::CommitError;

/// Request-scoped, in-memory `HttpResponse`.
#[derive(Debug, Default)]
pub struct BufferedResponse {
    version: Option<HttpProtocolVersion>,
    status: Option<HttpStatus>,
    entity: HttpEntity,
}

impl BufferedResponse {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy status, headers and body to `response` and flush.
    pub fn commit(self, response: &mut NativeResponse) -> Result<(), CommitError> {
        let status = self.status.ok_or(CommitError::NotHandled)?;
        check_required_headers(status.value(), &self.entity)?;
        response.set_status(status.value().code(), status.message())?;

        let entity = self.entity;
        copy_headers(&entity, response)?;

        let mut output = response.output_stream()?;
        output.write_all(entity.body())?;
        output.flush()?;

        Ok(())
    }
}

fn copy_headers(entity: &HttpEntity, response: &mut NativeResponse) -> Result<(), CommitError> {
    for (name, values) in entity.headers() {
        for value in values {
            response.add_header(name.value(), &name.header_text(value))?;
        }
    }
    Ok(())
}

impl HttpResponse for BufferedResponse {
    fn set_version(&mut self, version: HttpProtocolVersion) -> Result<(), ResponseError> {
        self.version = Some(version);
        Ok(())
    }

    fn version(&self) -> Option<HttpProtocolVersion> {
        self.version
    }

    fn set_status(&mut self, status: HttpStatus) -> Result<(), ResponseError> {
        self.status = Some(status);
        Ok(())
    }

    fn status(&self) -> Option<&HttpStatus> {
        self.status.as_ref()
    }

    fn set_entity(&mut self, entity: HttpEntity) -> Result<(), ResponseError> {
        self.entity = entity;
        Ok(())
    }

    fn entity(&self) -> &HttpEntity {
        &self.entity
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::header::{CharsetName, HttpHeaderName, MediaType};
    use crate::http::status::HttpStatusCode;

    #[test]
    fn commit_without_status_fails() {
        let mut response = BufferedResponse::new();
        response
            .set_entity(HttpEntity::empty().set_body("ignored"))
            .unwrap();

        let mut native = NativeResponse::new();
        let result = response.commit(&mut native);

        assert!(matches!(result, Err(CommitError::NotHandled)));
        assert!(native.headers().is_empty());
        assert!(native.body().is_empty());
        assert!(!native.is_committed());
    }

    #[test]
    fn redirect_without_location_fails_commit() {
        let mut response = BufferedResponse::new();
        response.set_status(HttpStatusCode::FOUND.status()).unwrap();

        let mut native = NativeResponse::new();
        let result = response.commit(&mut native);

        assert!(matches!(
            result,
            Err(CommitError::Response(ResponseError::MissingRequiredHeader { .. }))
        ));
        assert!(native.reason().is_none());
        assert!(!native.is_committed());
    }

    #[test]
    fn commit_writes_status_line() {
        let mut response = BufferedResponse::new();
        response.set_status(HttpStatusCode::OK.status()).unwrap();

        let mut native = NativeResponse::new();
        response.commit(&mut native).unwrap();

        assert_eq!(native.status().as_u16(), 200);
        assert_eq!(native.reason(), Some("OK"));
        assert!(native.is_flushed());
        assert!(native.is_committed());
    }

    #[test]
    fn multi_value_headers_become_separate_lines() {
        let entity = HttpEntity::empty()
            .add_header(HttpHeaderName::SET_COOKIE, "v1")
            .unwrap()
            .add_header(HttpHeaderName::SET_COOKIE, "v2")
            .unwrap();
        let mut response = BufferedResponse::new();
        response.set_status(HttpStatusCode::OK.status()).unwrap();
        response.set_entity(entity).unwrap();

        let mut native = NativeResponse::new();
        response.commit(&mut native).unwrap();

        let values: Vec<_> = native.headers().get_all("set-cookie").iter().collect();
        assert_eq!(values, vec!["v1", "v2"]);
        assert_eq!(native.headers().len(), 2);
    }

    #[test]
    fn typed_values_use_header_text() {
        let entity = HttpEntity::empty()
            .add_header(
                HttpHeaderName::CONTENT_TYPE,
                MediaType::TEXT_PLAIN.set_charset(CharsetName::UTF_8),
            )
            .unwrap()
            .set_body("four")
            .set_content_length();
        let mut response = BufferedResponse::new();
        response.set_status(HttpStatusCode::OK.status()).unwrap();
        response.set_entity(entity).unwrap();

        let mut native = NativeResponse::new();
        response.commit(&mut native).unwrap();

        assert_eq!(native.headers()["content-type"], "text/plain; charset=UTF-8");
        assert_eq!(native.headers()["content-length"], "4");
    }

    #[test]
    fn body_bytes_copied_verbatim() {
        let body: Vec<u8> = (0..=255u8).chain([0xff, 0xfe, 0x00]).collect();
        let mut response = BufferedResponse::new();
        response
            .set_status(HttpStatusCode::OK.set_message("Fine"))
            .unwrap();
        response
            .set_entity(HttpEntity::empty().set_body(body.clone()))
            .unwrap();

        let mut native = NativeResponse::new();
        response.commit(&mut native).unwrap();

        assert_eq!(native.body(), body.as_slice());
        assert_eq!(native.reason(), Some("Fine"));
    }

    #[test]
    fn version_is_recorded() {
        let mut response = BufferedResponse::new();
        assert_eq!(response.version(), None);
        response.set_version(HttpProtocolVersion::Http10).unwrap();
        assert_eq!(response.version(), Some(HttpProtocolVersion::Http10));
    }
}

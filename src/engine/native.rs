//! The engine's own per-request types.
//!
//! # Responsibilities
//! - `NativeRequest`: parsed request plus the mutable "handled" flag
//! - `NativeResponse`: status line, header lines and an output byte stream
//! - `ResponseOutput`: scoped output stream, closed when dropped
//!
//! # Design Decisions
//! - Header lines are appended, never merged, so repeated names stay separate
//! - Parameters are query parameters followed by form body parameters

use std::io::{self, Write};
use std::net::SocketAddr;

use axum::body::Body;
use axum::http::header::{CONTENT_TYPE, HOST};
use axum::http::request::Parts;
use axum::http::{HeaderMap, HeaderName, HeaderValue, Method, StatusCode, Version};
use axum::response::Response;
use bytes::Bytes;
use hyper::ext::ReasonPhrase;
use url::Url;

use crate::engine::EngineError;
use crate::http::header::MediaType;
use crate::http::request::RequestParameters;

/// A request as the engine parsed it.
#[derive(Debug)]
pub struct NativeRequest {
    method: Method,
    url: Url,
    version: Version,
    headers: HeaderMap,
    parameters: RequestParameters,
    body: Bytes,
    remote_addr: Option<SocketAddr>,
    handled: bool,
}

impl NativeRequest {
    /// Build from request parts and the collected body.
    ///
    /// The URL authority comes from the request target, then the `Host`
    /// header, then `fallback_authority`.
    pub fn from_parts(
        parts: Parts,
        body: Bytes,
        fallback_authority: &str,
    ) -> Result<Self, EngineError> {
        let url = request_url(&parts, fallback_authority)?;
        let parameters = parse_parameters(&url, &parts.headers, &body);

        Ok(Self {
            method: parts.method,
            url,
            version: parts.version,
            headers: parts.headers,
            parameters,
            body,
            remote_addr: None,
            handled: false,
        })
    }

    pub fn with_remote_addr(self, remote_addr: SocketAddr) -> Self {
        Self {
            remote_addr: Some(remote_addr),
            ..self
        }
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn version(&self) -> Version {
        self.version
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn parameters(&self) -> &RequestParameters {
        &self.parameters
    }

    pub fn body(&self) -> &Bytes {
        &self.body
    }

    pub fn remote_addr(&self) -> Option<SocketAddr> {
        self.remote_addr
    }

    /// True once some stage has taken responsibility for this request.
    pub fn is_handled(&self) -> bool {
        self.handled
    }

    pub fn set_handled(&mut self, handled: bool) {
        self.handled = handled;
    }
}

fn request_url(parts: &Parts, fallback_authority: &str) -> Result<Url, EngineError> {
    let authority = parts
        .uri
        .authority()
        .map(|a| a.as_str().to_string())
        .or_else(|| {
            parts
                .headers
                .get(HOST)
                .and_then(|h| h.to_str().ok())
                .map(str::to_string)
        })
        .unwrap_or_else(|| fallback_authority.to_string());

    let scheme = parts.uri.scheme_str().unwrap_or("http");
    let path_and_query = parts
        .uri
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or("/");

    let text = format!("{}://{}{}", scheme, authority, path_and_query);
    Url::parse(&text).map_err(|e| EngineError::BadRequest(format!("{}: {}", text, e)))
}

fn parse_parameters(url: &Url, headers: &HeaderMap, body: &Bytes) -> RequestParameters {
    let mut parameters = RequestParameters::new();

    for (key, value) in url.query_pairs() {
        parameters
            .entry(key.into_owned())
            .or_default()
            .push(value.into_owned());
    }

    let is_form = headers
        .get(CONTENT_TYPE)
        .and_then(|h| h.to_str().ok())
        .and_then(|text| MediaType::parse(text).ok())
        .map(|media_type| media_type.same_essence(&MediaType::APPLICATION_FORM_URLENCODED))
        .unwrap_or(false);

    if is_form {
        for (key, value) in url::form_urlencoded::parse(body) {
            parameters
                .entry(key.into_owned())
                .or_default()
                .push(value.into_owned());
        }
    }

    parameters
}

/// A response as the engine will write it.
///
/// Starts as `200 OK` with no headers and an empty body.
#[derive(Debug)]
pub struct NativeResponse {
    status: StatusCode,
    reason: Option<String>,
    headers: HeaderMap,
    body: Vec<u8>,
    flushed: bool,
    closed: bool,
}

impl Default for NativeResponse {
    fn default() -> Self {
        Self::new()
    }
}

impl NativeResponse {
    pub fn new() -> Self {
        Self {
            status: StatusCode::OK,
            reason: None,
            headers: HeaderMap::new(),
            body: Vec::new(),
            flushed: false,
            closed: false,
        }
    }

    /// Set the status line.
    pub fn set_status(&mut self, code: u16, reason: &str) -> Result<(), EngineError> {
        self.status = StatusCode::from_u16(code).map_err(|_| EngineError::InvalidStatus(code))?;
        self.reason = Some(reason.to_string());
        Ok(())
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn reason(&self) -> Option<&str> {
        self.reason.as_deref()
    }

    /// Append one header line. Existing lines with the same name are kept.
    pub fn add_header(&mut self, name: &str, value: &str) -> Result<(), EngineError> {
        let invalid = |reason: String| EngineError::InvalidHeader {
            name: name.to_string(),
            reason,
        };
        let header_name = HeaderName::from_bytes(name.as_bytes()).map_err(|e| invalid(e.to_string()))?;
        let header_value =
            HeaderValue::from_bytes(value.as_bytes()).map_err(|e| invalid(e.to_string()))?;

        self.headers.append(header_name, header_value);
        Ok(())
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Acquire the output stream. It can be acquired again until closed.
    pub fn output_stream(&mut self) -> Result<ResponseOutput<'_>, EngineError> {
        if self.closed {
            return Err(EngineError::OutputClosed);
        }
        Ok(ResponseOutput { response: self })
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// True once the output stream was flushed.
    pub fn is_flushed(&self) -> bool {
        self.flushed
    }

    /// True once the output stream was closed.
    pub fn is_committed(&self) -> bool {
        self.closed
    }

    /// Convert into the HTTP response handed to the transport.
    pub fn into_response(self) -> Response {
        let mut response = Response::new(Body::from(self.body));
        *response.status_mut() = self.status;
        *response.headers_mut() = self.headers;

        if let Some(reason) = self.reason {
            match ReasonPhrase::try_from(reason) {
                Ok(phrase) => {
                    response.extensions_mut().insert(phrase);
                }
                Err(_) => {
                    tracing::debug!(status = %self.status, "Reason phrase not representable, using default");
                }
            }
        }

        response
    }
}

/// Output stream of a `NativeResponse`, closed when dropped.
#[derive(Debug)]
pub struct ResponseOutput<'a> {
    response: &'a mut NativeResponse,
}

impl ResponseOutput<'_> {
    /// Flush and close.
    pub fn close(mut self) -> io::Result<()> {
        self.flush()
    }
}

impl Write for ResponseOutput<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.response.body.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.response.flushed = true;
        Ok(())
    }
}

impl Drop for ResponseOutput<'_> {
    fn drop(&mut self) {
        self.response.closed = true;
    }
}

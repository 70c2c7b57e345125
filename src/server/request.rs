//! Neutral request view over the engine's native request.

use std::borrow::Cow;

use axum::http::Version;
use url::Url;

use crate::engine::NativeRequest;
use crate::http::entity::HttpHeaders;
use crate::http::header::{HeaderValue, HttpHeaderName};
use crate::http::request::{HttpRequest, RequestParameters};
use crate::http::status::{HttpMethod, HttpProtocolVersion};

/// Read-only `HttpRequest` over a `NativeRequest`.
///
/// Headers are converted once, at construction: each native header line becomes
/// one typed value under its neutral name, in arrival order. Values that are not
/// UTF-8 are read as ISO-8859-1. Lines whose text does not parse as the
/// header's kind are skipped.
#[derive(Debug)]
pub struct NativeRequestView<'a> {
    request: &'a NativeRequest,
    method: HttpMethod,
    headers: HttpHeaders,
}

impl<'a> NativeRequestView<'a> {
    pub fn new(request: &'a NativeRequest) -> Self {
        Self {
            request,
            method: HttpMethod::with(request.method().as_str()),
            headers: convert_headers(request),
        }
    }
}

fn convert_headers(request: &NativeRequest) -> HttpHeaders {
    let mut headers = HttpHeaders::new();

    for (name, value) in request.headers() {
        let converted = HttpHeaderName::with(name.as_str()).ok().and_then(|header_name| {
            let text = decode_value(value.as_bytes());
            let parsed: Option<HeaderValue> = header_name.parse_value(&text).ok();
            parsed.map(|parsed| (header_name, parsed))
        });

        match converted {
            Some((header_name, parsed)) => headers.entry(header_name).or_default().push(parsed),
            None => tracing::debug!(header = %name, "Skipping unreadable request header"),
        }
    }

    headers
}

/// UTF-8 when the bytes are valid UTF-8, otherwise ISO-8859-1.
fn decode_value(bytes: &[u8]) -> Cow<'_, str> {
    match std::str::from_utf8(bytes) {
        Ok(text) => Cow::Borrowed(text),
        Err(_) => Cow::Owned(bytes.iter().map(|&b| char::from(b)).collect()),
    }
}

impl HttpRequest for NativeRequestView<'_> {
    fn method(&self) -> &HttpMethod {
        &self.method
    }

    fn url(&self) -> &Url {
        self.request.url()
    }

    fn protocol_version(&self) -> HttpProtocolVersion {
        match self.request.version() {
            Version::HTTP_10 | Version::HTTP_09 => HttpProtocolVersion::Http10,
            Version::HTTP_2 | Version::HTTP_3 => HttpProtocolVersion::Http2,
            _ => HttpProtocolVersion::Http11,
        }
    }

    fn headers(&self) -> &HttpHeaders {
        &self.headers
    }

    fn parameters(&self) -> &RequestParameters {
        self.request.parameters()
    }

    fn body(&self) -> &[u8] {
        self.request.body()
    }
}

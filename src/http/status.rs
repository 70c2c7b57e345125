//! Status codes, status lines, protocol versions and methods.

use std::borrow::Cow;
use std::fmt;

use crate::http::header::HttpHeaderName;

/// Error raised for a status code outside `100..=999`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid status code {0}")]
pub struct StatusError(pub u16);

const NO_HEADERS: &[HttpHeaderName] = &[];
const REDIRECT_HEADERS: &[HttpHeaderName] = &[HttpHeaderName::LOCATION];
const UNAUTHORIZED_HEADERS: &[HttpHeaderName] = &[HttpHeaderName::WWW_AUTHENTICATE];
const METHOD_NOT_ALLOWED_HEADERS: &[HttpHeaderName] = &[HttpHeaderName::ALLOW];

/// A numeric HTTP status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HttpStatusCode(u16);

impl HttpStatusCode {
    pub const OK: HttpStatusCode = HttpStatusCode(200);
    pub const CREATED: HttpStatusCode = HttpStatusCode(201);
    pub const NO_CONTENT: HttpStatusCode = HttpStatusCode(204);
    pub const MOVED_PERMANENTLY: HttpStatusCode = HttpStatusCode(301);
    pub const FOUND: HttpStatusCode = HttpStatusCode(302);
    pub const SEE_OTHER: HttpStatusCode = HttpStatusCode(303);
    pub const NOT_MODIFIED: HttpStatusCode = HttpStatusCode(304);
    pub const TEMPORARY_REDIRECT: HttpStatusCode = HttpStatusCode(307);
    pub const PERMANENT_REDIRECT: HttpStatusCode = HttpStatusCode(308);
    pub const BAD_REQUEST: HttpStatusCode = HttpStatusCode(400);
    pub const UNAUTHORIZED: HttpStatusCode = HttpStatusCode(401);
    pub const FORBIDDEN: HttpStatusCode = HttpStatusCode(403);
    pub const NOT_FOUND: HttpStatusCode = HttpStatusCode(404);
    pub const METHOD_NOT_ALLOWED: HttpStatusCode = HttpStatusCode(405);
    pub const PAYLOAD_TOO_LARGE: HttpStatusCode = HttpStatusCode(413);
    pub const INTERNAL_SERVER_ERROR: HttpStatusCode = HttpStatusCode(500);
    pub const SERVICE_UNAVAILABLE: HttpStatusCode = HttpStatusCode(503);

    pub fn with(code: u16) -> Result<Self, StatusError> {
        if (100..=999).contains(&code) {
            Ok(Self(code))
        } else {
            Err(StatusError(code))
        }
    }

    pub fn code(&self) -> u16 {
        self.0
    }

    /// Default reason phrase, empty for unregistered codes.
    pub fn message(&self) -> &'static str {
        match self.0 {
            200 => "OK",
            201 => "Created",
            204 => "No Content",
            301 => "Moved Permanently",
            302 => "Found",
            303 => "See Other",
            304 => "Not Modified",
            307 => "Temporary Redirect",
            308 => "Permanent Redirect",
            400 => "Bad Request",
            401 => "Unauthorized",
            403 => "Forbidden",
            404 => "Not Found",
            405 => "Method Not Allowed",
            413 => "Payload Too Large",
            500 => "Internal Server Error",
            503 => "Service Unavailable",
            _ => "",
        }
    }

    /// Status with the default reason phrase.
    pub fn status(&self) -> HttpStatus {
        HttpStatus {
            code: *self,
            message: Cow::Borrowed(self.message()),
        }
    }

    pub fn set_message(&self, message: impl Into<String>) -> HttpStatus {
        HttpStatus {
            code: *self,
            message: Cow::Owned(message.into()),
        }
    }

    /// Headers a response with this status must carry.
    pub fn required_headers(&self) -> &'static [HttpHeaderName] {
        match self.0 {
            301 | 302 | 303 | 307 | 308 => REDIRECT_HEADERS,
            401 => UNAUTHORIZED_HEADERS,
            405 => METHOD_NOT_ALLOWED_HEADERS,
            _ => NO_HEADERS,
        }
    }
}

impl fmt::Display for HttpStatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A status line: code plus reason message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpStatus {
    code: HttpStatusCode,
    message: Cow<'static, str>,
}

impl HttpStatus {
    pub fn value(&self) -> HttpStatusCode {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn set_message(self, message: impl Into<String>) -> Self {
        Self {
            message: Cow::Owned(message.into()),
            ..self
        }
    }
}

impl fmt::Display for HttpStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.code, self.message)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpProtocolVersion {
    Http10,
    Http11,
    Http2,
}

impl fmt::Display for HttpProtocolVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            HttpProtocolVersion::Http10 => "HTTP/1.0",
            HttpProtocolVersion::Http11 => "HTTP/1.1",
            HttpProtocolVersion::Http2 => "HTTP/2",
        })
    }
}

/// Request method, always upper case.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HttpMethod(Cow<'static, str>);

impl HttpMethod {
    pub const GET: HttpMethod = HttpMethod(Cow::Borrowed("GET"));
    pub const HEAD: HttpMethod = HttpMethod(Cow::Borrowed("HEAD"));
    pub const POST: HttpMethod = HttpMethod(Cow::Borrowed("POST"));
    pub const PUT: HttpMethod = HttpMethod(Cow::Borrowed("PUT"));
    pub const DELETE: HttpMethod = HttpMethod(Cow::Borrowed("DELETE"));
    pub const PATCH: HttpMethod = HttpMethod(Cow::Borrowed("PATCH"));
    pub const OPTIONS: HttpMethod = HttpMethod(Cow::Borrowed("OPTIONS"));

    pub fn with(method: &str) -> Self {
        HttpMethod(Cow::Owned(method.to_ascii_uppercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

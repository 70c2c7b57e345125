//! Immutable HTTP entity: ordered multi-valued headers plus body bytes.

use bytes::Bytes;
use indexmap::IndexMap;

use crate::http::header::{HeaderError, HeaderValue, HttpHeaderName};

/// Headers in insertion order, each name holding its values in order.
pub type HttpHeaders = IndexMap<HttpHeaderName, Vec<HeaderValue>>;

/// Headers and body of a request or response.
///
/// Every "setter" consumes the entity and returns a new value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HttpEntity {
    headers: HttpHeaders,
    body: Bytes,
}

impl HttpEntity {
    /// An entity without headers or body.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build an entity, checking every header value against its name.
    pub fn with(headers: HttpHeaders, body: impl Into<Bytes>) -> Result<Self, HeaderError> {
        for (name, values) in &headers {
            for value in values {
                name.check_value(value)?;
            }
        }

        let headers = headers
            .into_iter()
            .filter(|(_, values)| !values.is_empty())
            .collect();

        Ok(Self {
            headers,
            body: body.into(),
        })
    }

    pub fn headers(&self) -> &HttpHeaders {
        &self.headers
    }

    /// Values of a header, empty when absent.
    pub fn header_values(&self, name: &HttpHeaderName) -> &[HeaderValue] {
        self.headers.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn body(&self) -> &Bytes {
        &self.body
    }

    pub fn is_empty(&self) -> bool {
        self.headers.is_empty() && self.body.is_empty()
    }

    /// Append a value after any existing values of `name`.
    pub fn add_header(
        mut self,
        name: HttpHeaderName,
        value: impl Into<HeaderValue>,
    ) -> Result<Self, HeaderError> {
        let value = value.into();
        name.check_value(&value)?;
        self.headers.entry(name).or_default().push(value);
        Ok(self)
    }

    /// Replace all values of `name`. An empty list removes the header.
    pub fn set_header(
        self,
        name: HttpHeaderName,
        values: Vec<HeaderValue>,
    ) -> Result<Self, HeaderError> {
        if values.is_empty() {
            return Ok(self.remove_header(&name));
        }
        for value in &values {
            name.check_value(value)?;
        }

        let mut entity = self;
        entity.headers.insert(name, values);
        Ok(entity)
    }

    pub fn remove_header(mut self, name: &HttpHeaderName) -> Self {
        self.headers.shift_remove(name);
        self
    }

    pub fn set_body(self, body: impl Into<Bytes>) -> Self {
        Self {
            body: body.into(),
            ..self
        }
    }

    /// Set `Content-Length` to the current body length.
    pub fn set_content_length(mut self) -> Self {
        let length = HeaderValue::Number(self.body.len() as u64);
        self.headers.insert(HttpHeaderName::CONTENT_LENGTH, vec![length]);
        self
    }
}

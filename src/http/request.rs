//! Neutral request contract.
//!
//! # Responsibilities
//! - Expose method, URL, protocol version and body
//! - Expose headers as an ordered multi-valued mapping of typed values
//! - Expose parameters (query then form body) as given by the engine

use indexmap::IndexMap;
use url::Url;

use crate::http::entity::HttpHeaders;
use crate::http::status::{HttpMethod, HttpProtocolVersion};

/// Parameter name to values, in arrival order.
pub type RequestParameters = IndexMap<String, Vec<String>>;

/// Read-only view of one inbound request.
pub trait HttpRequest {
    fn method(&self) -> &HttpMethod;

    fn url(&self) -> &Url;

    fn protocol_version(&self) -> HttpProtocolVersion;

    fn headers(&self) -> &HttpHeaders;

    fn parameters(&self) -> &RequestParameters;

    fn body(&self) -> &[u8];

    /// Values of one parameter, empty when absent.
    fn parameter_values(&self, name: &str) -> &[String] {
        self.parameters()
            .get(name)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

//! Diagnostic handler echoing request headers and parameters as plain text.
//!
//! `GET /dump.txt` answers `200 OK` with a body like:
//! ```text
//! headers
//!   Host: 127.0.0.1:8080
//!   X-Test: a
//! parameters
//!   q=1, 2
//! ```
//! Every other path answers `404 Not Found` without an entity.

use std::fmt::Write as _;

use crate::http::entity::HttpEntity;
use crate::http::handler::HttpHandler;
use crate::http::header::{CharsetName, HttpHeaderName, MediaType};
use crate::http::request::HttpRequest;
use crate::http::response::HttpResponse;
use crate::http::status::HttpStatusCode;
use crate::BoxError;

/// Path served by [`DumpHandler`].
pub const DUMP_PATH: &str = "/dump.txt";

/// Value of the `Server` header on dump responses.
pub const SERVER_NAME: &str = "http-bridge";

#[derive(Debug, Clone, Copy, Default)]
pub struct DumpHandler;

impl DumpHandler {
    /// Render headers then parameters, one line per header value.
    pub fn render(request: &dyn HttpRequest) -> String {
        let mut text = String::from("headers\n");
        for (name, values) in request.headers() {
            for value in values {
                let _ = writeln!(text, "  {}: {}", name, name.header_text(value));
            }
        }

        text.push_str("parameters\n");
        for (key, values) in request.parameters() {
            let _ = writeln!(text, "  {}={}", key, values.join(", "));
        }
        text
    }
}

impl HttpHandler for DumpHandler {
    fn handle(
        &self,
        request: &dyn HttpRequest,
        response: &mut dyn HttpResponse,
    ) -> Result<(), BoxError> {
        if request.url().path() != DUMP_PATH {
            response.set_status(HttpStatusCode::NOT_FOUND.status())?;
            return Ok(());
        }

        response.set_status(HttpStatusCode::OK.status())?;
        let body = Self::render(request).into_bytes();
        let entity = HttpEntity::empty()
            .add_header(HttpHeaderName::SERVER, SERVER_NAME)?
            .add_header(
                HttpHeaderName::CONTENT_TYPE,
                MediaType::TEXT_PLAIN.set_charset(CharsetName::UTF_8),
            )?
            .set_body(body)
            .set_content_length();
        response.set_entity(entity)?;
        Ok(())
    }

    fn name(&self) -> String {
        "DumpHandler".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::entity::HttpHeaders;
    use crate::http::header::HeaderValue;
    use crate::http::request::RequestParameters;
    use crate::http::status::{HttpMethod, HttpProtocolVersion};
    use crate::server::BufferedResponse;
    use url::Url;

    struct FakeRequest {
        method: HttpMethod,
        url: Url,
        headers: HttpHeaders,
        parameters: RequestParameters,
    }

    impl FakeRequest {
        fn new(url: &str) -> Self {
            let url = Url::parse(url).unwrap();
            let mut parameters = RequestParameters::new();
            for (key, value) in url.query_pairs() {
                parameters
                    .entry(key.into_owned())
                    .or_default()
                    .push(value.into_owned());
            }
            let mut headers = HttpHeaders::new();
            headers.insert(
                HttpHeaderName::with("x-test").unwrap(),
                vec![HeaderValue::from("a")],
            );
            Self {
                method: HttpMethod::GET,
                url,
                headers,
                parameters,
            }
        }
    }

    impl HttpRequest for FakeRequest {
        fn method(&self) -> &HttpMethod {
            &self.method
        }

        fn url(&self) -> &Url {
            &self.url
        }

        fn protocol_version(&self) -> HttpProtocolVersion {
            HttpProtocolVersion::Http11
        }

        fn headers(&self) -> &HttpHeaders {
            &self.headers
        }

        fn parameters(&self) -> &RequestParameters {
            &self.parameters
        }

        fn body(&self) -> &[u8] {
            &[]
        }
    }

    #[test]
    fn dump_lists_headers_and_parameters() {
        let request = FakeRequest::new("http://localhost/dump.txt?q=1&q=2");
        let mut response = BufferedResponse::new();
        DumpHandler.handle(&request, &mut response).unwrap();

        assert_eq!(response.status(), Some(&HttpStatusCode::OK.status()));
        let body = std::str::from_utf8(response.entity().body()).unwrap();
        assert_eq!(body, "headers\n  X-Test: a\nparameters\n  q=1, 2\n");

        let entity = response.entity();
        assert_eq!(
            entity.header_values(&HttpHeaderName::CONTENT_TYPE),
            &[HeaderValue::MediaType(
                MediaType::TEXT_PLAIN.set_charset(CharsetName::UTF_8)
            )]
        );
        assert_eq!(
            entity.header_values(&HttpHeaderName::CONTENT_LENGTH),
            &[HeaderValue::Number(body.len() as u64)]
        );
        assert_eq!(
            entity.header_values(&HttpHeaderName::SERVER),
            &[HeaderValue::from(SERVER_NAME)]
        );
    }

    #[test]
    fn other_paths_are_not_found() {
        let request = FakeRequest::new("http://localhost/index.html?q=1");
        let mut response = BufferedResponse::new();
        DumpHandler.handle(&request, &mut response).unwrap();

        assert_eq!(response.status(), Some(&HttpStatusCode::NOT_FOUND.status()));
        assert!(response.entity().is_empty());
    }

    #[test]
    fn non_ascii_text_is_utf8() {
        let request = FakeRequest::new("http://localhost/dump.txt?name=%C3%A9t%C3%A9");
        let text = DumpHandler::render(&request);
        assert!(text.contains("  name=été\n"));
    }
}

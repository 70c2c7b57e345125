//! Bridge from the engine's native handler contract to an `HttpHandler`.
//!
//! # Responsibilities
//! - Claim each native request exactly once (the "handled" flag)
//! - Present the request through `NativeRequestView`
//! - Give the handler a guarded `BufferedResponse` and commit it afterwards
//!
//! # Design Decisions
//! - The request is marked handled before the handler runs, so a failing
//!   handler still claims the request and later stages skip it
//! - Handler errors are returned unchanged; nothing is committed in that case

use std::fmt;

use crate::engine::{NativeHandler, NativeRequest, NativeResponse};
use crate::http::guards::{HeaderScopeResponse, RequiredHeadersResponse};
use crate::http::handler::HttpHandler;
use crate::server::request::NativeRequestView;
use crate::server::response::BufferedResponse;
use crate::BoxError;

/// Native handler stage wrapping one application handler.
pub struct HandlerAdapter<H> {
    handler: H,
}

impl<H: HttpHandler> HandlerAdapter<H> {
    pub fn new(handler: H) -> Self {
        Self { handler }
    }

    pub fn handler(&self) -> &H {
        &self.handler
    }
}

impl<H: HttpHandler> NativeHandler for HandlerAdapter<H> {
    fn handle(
        &self,
        target: &str,
        request: &mut NativeRequest,
        response: &mut NativeResponse,
    ) -> Result<(), BoxError> {
        if request.is_handled() {
            tracing::trace!(path = %target, handler = %self, "Request already handled");
            return Ok(());
        }
        request.set_handled(true);

        let mut sink = BufferedResponse::new();
        {
            let view = NativeRequestView::new(request);
            let mut guarded = HeaderScopeResponse::new(RequiredHeadersResponse::new(&mut sink));
            self.handler.handle(&view, &mut guarded)?;
        }

        sink.commit(response).map_err(|e| {
            tracing::debug!(path = %target, handler = %self, error = %e, "Commit failed");
            BoxError::from(e)
        })
    }
}

impl<H: HttpHandler> fmt::Display for HandlerAdapter<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.handler.name())
    }
}

impl<H: HttpHandler> fmt::Debug for HandlerAdapter<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerAdapter")
            .field("handler", &self.handler.name())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use axum::http::Request;
    use bytes::Bytes;

    use crate::engine::HandlerChain;
    use crate::http::entity::HttpEntity;
    use crate::http::handler::handler_fn;
    use crate::http::header::HttpHeaderName;
    use crate::http::request::HttpRequest;
    use crate::http::response::{HttpResponse, ResponseError};
    use crate::http::status::HttpStatusCode;
    use crate::server::error::CommitError;

    fn native_request(uri: &str) -> NativeRequest {
        let (parts, ()) = Request::builder()
            .uri(uri)
            .header("x-test", "a")
            .body(())
            .unwrap()
            .into_parts();
        NativeRequest::from_parts(parts, Bytes::new(), "localhost").unwrap()
    }

    #[derive(Debug, thiserror::Error)]
    #[error("handler exploded")]
    struct Exploded;

    #[test]
    fn handler_runs_once_per_request() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let adapter = HandlerAdapter::new(handler_fn("counting", move |_, response| {
            counter.fetch_add(1, Ordering::SeqCst);
            response.set_status(HttpStatusCode::OK.status())?;
            Ok(())
        }));

        let mut request = native_request("/");
        let mut response = NativeResponse::new();
        adapter.handle("/", &mut request, &mut response).unwrap();
        adapter.handle("/", &mut request, &mut response).unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(request.is_handled());
        assert!(response.is_committed());
    }

    #[test]
    fn handler_error_passes_through_unchanged() {
        let adapter = HandlerAdapter::new(handler_fn("failing", |_, _| Err(Exploded.into())));

        let mut request = native_request("/");
        let mut response = NativeResponse::new();
        let error = adapter.handle("/", &mut request, &mut response).unwrap_err();

        assert!(error.downcast_ref::<Exploded>().is_some());
        assert!(request.is_handled());
        assert!(!response.is_committed());
        assert!(response.headers().is_empty());
    }

    #[test]
    fn missing_status_is_not_handled() {
        let adapter = HandlerAdapter::new(handler_fn("silent", |_, _| Ok(())));

        let mut request = native_request("/");
        let mut response = NativeResponse::new();
        let error = adapter.handle("/", &mut request, &mut response).unwrap_err();

        assert!(matches!(
            error.downcast_ref::<CommitError>(),
            Some(CommitError::NotHandled)
        ));
        assert_eq!(error.to_string(), "Request not handled");
    }

    #[test]
    fn handler_sees_request_and_writes_response() {
        let adapter = HandlerAdapter::new(handler_fn("echo", |request: &dyn HttpRequest, response| {
            let name = HttpHeaderName::with("X-Test")?;
            let seen = request
                .headers()
                .get(&name)
                .map(|values| values.len())
                .unwrap_or(0);
            let entity = HttpEntity::empty()
                .add_header(HttpHeaderName::SERVER, "test")?
                .set_body(format!("{} {}", request.url().path(), seen));
            response.set_status(HttpStatusCode::CREATED.status())?;
            response.set_entity(entity)?;
            Ok(())
        }));

        let mut request = native_request("/path");
        let mut response = NativeResponse::new();
        adapter.handle("/path", &mut request, &mut response).unwrap();

        assert_eq!(response.status().as_u16(), 201);
        assert_eq!(response.headers()["server"], "test");
        assert_eq!(response.body(), b"/path 1");
    }

    #[test]
    fn guards_reject_request_headers() {
        let adapter = HandlerAdapter::new(handler_fn("bad", |_, response| {
            response.set_status(HttpStatusCode::OK.status())?;
            response.set_entity(HttpEntity::empty().add_header(HttpHeaderName::ACCEPT, "*/*")?)?;
            Ok(())
        }));

        let mut request = native_request("/");
        let mut response = NativeResponse::new();
        let error = adapter.handle("/", &mut request, &mut response).unwrap_err();

        assert!(matches!(
            error.downcast_ref::<ResponseError>(),
            Some(ResponseError::NotResponseHeader(_))
        ));
    }

    #[test]
    fn second_adapter_in_chain_is_skipped() {
        let first = Arc::new(AtomicUsize::new(0));
        let second = Arc::new(AtomicUsize::new(0));
        let (a, b) = (first.clone(), second.clone());

        let chain = HandlerChain::new()
            .with_stage(Arc::new(HandlerAdapter::new(handler_fn("first", move |_, response| {
                a.fetch_add(1, Ordering::SeqCst);
                response.set_status(HttpStatusCode::OK.status())?;
                Ok(())
            }))))
            .with_stage(Arc::new(HandlerAdapter::new(handler_fn("second", move |_, response| {
                b.fetch_add(1, Ordering::SeqCst);
                response.set_status(HttpStatusCode::OK.status())?;
                Ok(())
            }))));

        let mut request = native_request("/");
        let mut response = NativeResponse::new();
        chain.handle("/", &mut request, &mut response).unwrap();

        assert_eq!(first.load(Ordering::SeqCst), 1);
        assert_eq!(second.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn display_names_the_handler() {
        let adapter = HandlerAdapter::new(handler_fn("named", |_, _| Ok(())));
        assert_eq!(adapter.to_string(), "named");
    }
}

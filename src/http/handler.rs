//! The single application extension point.

use std::fmt;
use std::sync::Arc;

use crate::http::request::HttpRequest;
use crate::http::response::HttpResponse;
use crate::BoxError;

/// Application callback, invoked once per request.
///
/// A handler must set a status before returning, otherwise committing the
/// response fails. Errors are passed back to the engine unchanged.
pub trait HttpHandler: Send + Sync {
    fn handle(
        &self,
        request: &dyn HttpRequest,
        response: &mut dyn HttpResponse,
    ) -> Result<(), BoxError>;

    /// Descriptive name used in diagnostics.
    fn name(&self) -> String {
        std::any::type_name::<Self>().to_string()
    }
}

impl<H: HttpHandler + ?Sized> HttpHandler for Arc<H> {
    fn handle(
        &self,
        request: &dyn HttpRequest,
        response: &mut dyn HttpResponse,
    ) -> Result<(), BoxError> {
        (**self).handle(request, response)
    }

    fn name(&self) -> String {
        (**self).name()
    }
}

impl<H: HttpHandler + ?Sized> HttpHandler for Box<H> {
    fn handle(
        &self,
        request: &dyn HttpRequest,
        response: &mut dyn HttpResponse,
    ) -> Result<(), BoxError> {
        (**self).handle(request, response)
    }

    fn name(&self) -> String {
        (**self).name()
    }
}

/// A named closure handler, see [`handler_fn`].
pub struct HandlerFn<F> {
    name: String,
    f: F,
}

/// Wrap a closure as a handler.
pub fn handler_fn<F>(name: impl Into<String>, f: F) -> HandlerFn<F>
where
    F: Fn(&dyn HttpRequest, &mut dyn HttpResponse) -> Result<(), BoxError> + Send + Sync,
{
    HandlerFn {
        name: name.into(),
        f,
    }
}

impl<F> HttpHandler for HandlerFn<F>
where
    F: Fn(&dyn HttpRequest, &mut dyn HttpResponse) -> Result<(), BoxError> + Send + Sync,
{
    fn handle(
        &self,
        request: &dyn HttpRequest,
        response: &mut dyn HttpResponse,
    ) -> Result<(), BoxError> {
        (self.f)(request, response)
    }

    fn name(&self) -> String {
        self.name.clone()
    }
}

impl<F> fmt::Debug for HandlerFn<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerFn").field("name", &self.name).finish()
    }
}

//! Server façade: one engine, one handler, start and stop.

use std::fmt;
use std::net::SocketAddr;
use std::sync::Arc;

use crate::config::ServerConfig;
use crate::engine::{EmbeddedEngine, EngineSettings, HttpEngine};
use crate::http::handler::HttpHandler;
use crate::lifecycle::Shutdown;
use crate::server::adapter::HandlerAdapter;
use crate::server::address::{resolve, HostAddress, IpPort};
use crate::server::error::ServerError;

/// An HTTP server driving an engine with a single application handler.
///
/// Lifecycle calls block and must not be made from inside an async runtime.
pub struct HttpServer<E: HttpEngine = EmbeddedEngine> {
    engine: E,
}

impl HttpServer<EmbeddedEngine> {
    /// Server on the embedded engine with default settings.
    pub fn with<H>(host: HostAddress, port: IpPort, handler: H) -> Result<Self, ServerError>
    where
        H: HttpHandler + 'static,
    {
        Self::with_config(host, port, handler, &ServerConfig::default())
    }

    /// Server on the embedded engine, tuned by `config`.
    pub fn with_config<H>(
        host: HostAddress,
        port: IpPort,
        handler: H,
        config: &ServerConfig,
    ) -> Result<Self, ServerError>
    where
        H: HttpHandler + 'static,
    {
        let addr = resolve(&host, port)?;
        let engine = EmbeddedEngine::new(addr, EngineSettings::from(config));
        Ok(Self::with_engine(engine, handler))
    }
}

impl<E: HttpEngine> HttpServer<E> {
    /// Server on an already constructed engine.
    pub fn with_engine<H>(mut engine: E, handler: H) -> Self
    where
        H: HttpHandler + 'static,
    {
        tracing::debug!(engine = %engine, handler = %handler.name(), "Installing handler");
        engine.set_handler(Arc::new(HandlerAdapter::new(handler)));
        Self { engine }
    }

    pub fn start(&mut self) -> Result<(), ServerError> {
        self.engine.start().map_err(ServerError::StartFailed)?;
        tracing::info!(server = %self, "Server started");
        Ok(())
    }

    pub fn stop(&mut self) -> Result<(), ServerError> {
        self.engine.stop().map_err(ServerError::StopFailed)?;
        tracing::info!(server = %self, "Server stopped");
        Ok(())
    }

    /// Block until the engine stops serving.
    ///
    /// Returns once a [`stop_handle`](Self::stop_handle) is triggered from
    /// another thread, or on Ctrl+C when the engine listens for it. `stop`
    /// must still be called afterwards.
    pub fn join(&self) -> Result<(), ServerError> {
        self.engine.join().map_err(ServerError::JoinFailed)
    }

    /// Cloneable handle ending the serve loop; `None` until started.
    pub fn stop_handle(&self) -> Option<Shutdown> {
        self.engine.stop_handle()
    }

    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.engine.local_addr()
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }
}

impl<E: HttpEngine> fmt::Display for HttpServer<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.engine, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    use crate::engine::{EngineError, NativeHandler};
    use crate::http::handler::handler_fn;

    /// Engine whose lifecycle always fails.
    #[derive(Default)]
    struct BrokenEngine {
        handler: Option<Arc<dyn NativeHandler>>,
    }

    impl HttpEngine for BrokenEngine {
        fn set_handler(&mut self, handler: Arc<dyn NativeHandler>) {
            self.handler = Some(handler);
        }

        fn start(&mut self) -> Result<(), EngineError> {
            Err(EngineError::Task("port exploded".to_string()))
        }

        fn stop(&mut self) -> Result<(), EngineError> {
            Err(EngineError::NotRunning)
        }

        fn join(&self) -> Result<(), EngineError> {
            Err(EngineError::NotRunning)
        }

        fn local_addr(&self) -> Option<SocketAddr> {
            None
        }

        fn stop_handle(&self) -> Option<Shutdown> {
            None
        }
    }

    impl fmt::Display for BrokenEngine {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("BrokenEngine")
        }
    }

    fn noop() -> impl HttpHandler {
        handler_fn("noop", |_, _| Ok(()))
    }

    #[test]
    fn handler_installed_as_adapter() {
        let server = HttpServer::with_engine(BrokenEngine::default(), noop());
        let installed = server.engine().handler.as_ref().unwrap();
        assert_eq!(installed.to_string(), "noop");
    }

    #[test]
    fn start_failure_wraps_engine_error() {
        let mut server = HttpServer::with_engine(BrokenEngine::default(), noop());
        let error = server.start().unwrap_err();

        assert!(matches!(error, ServerError::StartFailed(EngineError::Task(_))));
        assert!(error.to_string().starts_with("Server start failed: "));
        assert!(error.to_string().contains("port exploded"));
        let source = error.source().unwrap();
        assert!(source.downcast_ref::<EngineError>().is_some());
    }

    #[test]
    fn stop_failure_wraps_engine_error() {
        let mut server = HttpServer::with_engine(BrokenEngine::default(), noop());
        let error = server.stop().unwrap_err();

        assert!(matches!(error, ServerError::StopFailed(EngineError::NotRunning)));
        assert!(error.to_string().starts_with("Server stop failed: "));
    }

    #[test]
    fn join_failure_is_not_a_stop_failure() {
        let server = HttpServer::with_engine(BrokenEngine::default(), noop());
        let error = server.join().unwrap_err();

        assert!(matches!(error, ServerError::JoinFailed(EngineError::NotRunning)));
        assert_eq!(error.to_string(), "Server join failed: Engine not running");
        assert!(server.stop_handle().is_none());
    }

    #[test]
    fn display_delegates_to_engine() {
        let server = HttpServer::with_engine(BrokenEngine::default(), noop());
        assert_eq!(server.to_string(), "BrokenEngine");
    }

    #[test]
    fn unresolvable_host_is_invalid_argument() {
        let host = HostAddress::with("no-such-host.invalid").unwrap();
        let result = HttpServer::with(host, IpPort::from(8080), noop());
        assert!(matches!(result, Err(ServerError::InvalidArgument(_))));
    }

    #[test]
    fn embedded_server_reports_state() {
        let host = HostAddress::with("127.0.0.1").unwrap();
        let mut server = HttpServer::with(host, IpPort::from(0), noop()).unwrap();
        assert!(server.to_string().contains("STOPPED"));
        assert!(server.local_addr().is_none());

        server.start().unwrap();
        assert!(server.local_addr().is_some());
        assert!(server.to_string().contains("STARTED"));

        server.stop().unwrap();
        assert!(matches!(server.stop(), Err(ServerError::StopFailed(_))));
    }
}

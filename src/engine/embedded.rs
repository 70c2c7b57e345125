//! Embedded engine built on tokio and axum.
//!
//! # Responsibilities
//! - Own a multi-thread runtime and the bound TCP listener
//! - Route every request to the installed `NativeHandler`
//! - Collect request bodies and enforce limits before dispatch
//! - Run handlers on blocking worker threads
//! - Drain in-flight requests on stop
//!
//! # Design Decisions
//! - The runtime is created on `start` and dropped on `stop`
//! - A request no stage handled gets 404; a failing or panicking handler gets
//!   500 and nothing the handler wrote is sent
//! - Concurrency is bounded by a semaphore; waiting requests apply backpressure

use std::fmt;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::{Request, StatusCode},
    response::{IntoResponse, Response},
    Router,
};
use tokio::net::TcpListener;
use tokio::runtime::Runtime;
use tokio::sync::{watch, Semaphore};
use tokio::task::JoinHandle;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};
use uuid::Uuid;

use crate::config::ServerConfig;
use crate::engine::{EngineError, HttpEngine, NativeHandler, NativeRequest, NativeResponse};
use crate::lifecycle::Shutdown;
use crate::observability::metrics;

/// Tunables for the embedded engine.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineSettings {
    /// Maximum requests dispatched concurrently.
    pub max_connections: usize,
    /// Total time allowed per request.
    pub request_timeout: Duration,
    /// Time allowed for draining on stop.
    pub shutdown_timeout: Duration,
    /// Largest request body collected.
    pub max_body_bytes: usize,
    /// Stop serving on Ctrl+C.
    pub stop_on_signal: bool,
    /// Runtime worker threads; 0 uses the runtime default.
    pub worker_threads: usize,
}

impl From<&ServerConfig> for EngineSettings {
    fn from(config: &ServerConfig) -> Self {
        Self {
            max_connections: config.listener.max_connections,
            request_timeout: Duration::from_secs(config.timeouts.request_secs),
            shutdown_timeout: Duration::from_secs(config.timeouts.shutdown_secs),
            max_body_bytes: config.limits.max_body_bytes,
            stop_on_signal: config.lifecycle.stop_on_signal,
            worker_threads: config.lifecycle.worker_threads,
        }
    }
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self::from(&ServerConfig::default())
    }
}

/// State shared by every dispatch.
#[derive(Clone)]
struct DispatchState {
    handler: Arc<dyn NativeHandler>,
    permits: Arc<Semaphore>,
    /// Bound address, used when a request carries no authority.
    authority: String,
    max_body_bytes: usize,
}

/// Everything that exists only while the engine is started.
struct Running {
    runtime: Runtime,
    shutdown: Shutdown,
    task: JoinHandle<std::io::Result<()>>,
    stopped: watch::Receiver<bool>,
    local_addr: SocketAddr,
}

/// HTTP engine serving one installed handler.
pub struct EmbeddedEngine {
    addr: SocketAddr,
    settings: EngineSettings,
    handler: Option<Arc<dyn NativeHandler>>,
    running: Option<Running>,
}

impl EmbeddedEngine {
    /// Create an engine that will bind `addr` when started.
    pub fn new(addr: SocketAddr, settings: EngineSettings) -> Self {
        Self {
            addr,
            settings,
            handler: None,
            running: None,
        }
    }

    /// Configured bind address.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    pub fn is_running(&self) -> bool {
        self.running.is_some()
    }

    fn build_runtime(&self) -> std::io::Result<Runtime> {
        let mut builder = tokio::runtime::Builder::new_multi_thread();
        builder.enable_all().thread_name("http-bridge-worker");
        if self.settings.worker_threads > 0 {
            builder.worker_threads(self.settings.worker_threads);
        }
        builder.build()
    }

    /// Build the router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(settings: &EngineSettings, state: DispatchState) -> Router {
        Router::new()
            .fallback(dispatch)
            .with_state(state)
            .layer(TimeoutLayer::new(settings.request_timeout))
            .layer(TraceLayer::new_for_http())
    }
}

impl HttpEngine for EmbeddedEngine {
    fn set_handler(&mut self, handler: Arc<dyn NativeHandler>) {
        self.handler = Some(handler);
    }

    fn start(&mut self) -> Result<(), EngineError> {
        if self.running.is_some() {
            return Err(EngineError::AlreadyStarted);
        }
        let handler = self.handler.clone().ok_or(EngineError::NoHandler)?;
        let max_connections = self.settings.max_connections;
        if !(1..=Semaphore::MAX_PERMITS).contains(&max_connections) {
            return Err(EngineError::InvalidSettings(format!(
                "max_connections must be between 1 and {}, got {}",
                Semaphore::MAX_PERMITS,
                max_connections
            )));
        }

        let runtime = self.build_runtime().map_err(EngineError::Runtime)?;
        let addr = self.addr;
        let listener = runtime
            .block_on(TcpListener::bind(addr))
            .map_err(|source| EngineError::Bind { addr, source })?;
        let local_addr = listener
            .local_addr()
            .map_err(|source| EngineError::Bind { addr, source })?;

        let state = DispatchState {
            handler: handler.clone(),
            permits: Arc::new(Semaphore::new(max_connections)),
            authority: local_addr.to_string(),
            max_body_bytes: self.settings.max_body_bytes,
        };
        let app = Self::build_router(&self.settings, state)
            .into_make_service_with_connect_info::<SocketAddr>();

        let shutdown = Shutdown::new();
        let signal = shutdown.signal(self.settings.stop_on_signal);
        let (stopped_tx, stopped) = watch::channel(false);

        let task = runtime.spawn(async move {
            let result = axum::serve(listener, app)
                .with_graceful_shutdown(signal)
                .await;
            let _ = stopped_tx.send(true);
            tracing::info!(address = %local_addr, "Engine stopped serving");
            result
        });

        tracing::info!(
            address = %local_addr,
            handler = %handler,
            max_connections = self.settings.max_connections,
            "Engine started"
        );

        self.running = Some(Running {
            runtime,
            shutdown,
            task,
            stopped,
            local_addr,
        });
        Ok(())
    }

    fn stop(&mut self) -> Result<(), EngineError> {
        let Running {
            runtime,
            shutdown,
            task,
            local_addr,
            ..
        } = self.running.take().ok_or(EngineError::NotRunning)?;

        shutdown.trigger();
        let grace = self.settings.shutdown_timeout;
        let outcome = runtime.block_on(async move { tokio::time::timeout(grace, task).await });

        let result = match outcome {
            Ok(Ok(Ok(()))) => Ok(()),
            Ok(Ok(Err(e))) => Err(EngineError::Task(e.to_string())),
            Ok(Err(e)) => Err(EngineError::Task(e.to_string())),
            Err(_) => {
                tracing::warn!(
                    address = %local_addr,
                    grace_secs = grace.as_secs(),
                    "Graceful shutdown timed out, dropping remaining connections"
                );
                Ok(())
            }
        };

        runtime.shutdown_timeout(grace);
        tracing::info!(address = %local_addr, "Engine stopped");
        result
    }

    fn join(&self) -> Result<(), EngineError> {
        let running = self.running.as_ref().ok_or(EngineError::NotRunning)?;
        let mut stopped = running.stopped.clone();
        running.runtime.block_on(async move {
            let _ = stopped.wait_for(|stopped| *stopped).await;
        });
        Ok(())
    }

    fn local_addr(&self) -> Option<SocketAddr> {
        self.running.as_ref().map(|running| running.local_addr)
    }

    fn stop_handle(&self) -> Option<Shutdown> {
        self.running.as_ref().map(|running| running.shutdown.clone())
    }
}

impl Drop for EmbeddedEngine {
    fn drop(&mut self) {
        if let Some(running) = self.running.take() {
            running.shutdown.trigger();
            running.runtime.shutdown_background();
        }
    }
}

impl fmt::Display for EmbeddedEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.running {
            Some(running) => write!(f, "EmbeddedEngine({}, STARTED)", running.local_addr),
            None => write!(f, "EmbeddedEngine({}, STOPPED)", self.addr),
        }
    }
}

/// Route one request through the installed handler.
async fn dispatch(State(state): State<DispatchState>, request: Request<Body>) -> Response {
    let started = Instant::now();
    let request_id = Uuid::new_v4();
    let method = request.method().clone();
    let target = request.uri().path().to_string();

    let _permit = match state.permits.clone().acquire_owned().await {
        Ok(permit) => permit,
        Err(_) => return finish(&method, StatusCode::SERVICE_UNAVAILABLE.into_response(), started),
    };

    let (parts, body) = request.into_parts();
    let remote_addr = parts
        .extensions
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| *addr);

    let body = match axum::body::to_bytes(body, state.max_body_bytes).await {
        Ok(body) => body,
        Err(e) => {
            tracing::warn!(request_id = %request_id, error = %e, "Request body rejected");
            return finish(&method, StatusCode::PAYLOAD_TOO_LARGE.into_response(), started);
        }
    };

    let mut native_request = match NativeRequest::from_parts(parts, body, &state.authority) {
        Ok(native_request) => native_request,
        Err(e) => {
            tracing::warn!(request_id = %request_id, error = %e, "Malformed request");
            return finish(&method, StatusCode::BAD_REQUEST.into_response(), started);
        }
    };
    if let Some(addr) = remote_addr {
        native_request = native_request.with_remote_addr(addr);
    }

    tracing::debug!(
        request_id = %request_id,
        method = %method,
        path = %target,
        remote_addr = ?remote_addr,
        "Dispatching request"
    );

    let handler = state.handler.clone();
    let stage_target = target.clone();
    let outcome = tokio::task::spawn_blocking(move || {
        let mut native_response = NativeResponse::new();
        handler
            .handle(&stage_target, &mut native_request, &mut native_response)
            .map(|()| (native_request.is_handled(), native_response))
    })
    .await;

    let response = match outcome {
        Ok(Ok((true, native_response))) => native_response.into_response(),
        Ok(Ok((false, _))) => {
            tracing::debug!(request_id = %request_id, path = %target, "Request not handled");
            StatusCode::NOT_FOUND.into_response()
        }
        Ok(Err(e)) => {
            tracing::error!(request_id = %request_id, path = %target, error = %e, "Handler failed");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
        Err(e) => {
            tracing::error!(request_id = %request_id, path = %target, error = %e, "Handler panicked");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    };

    finish(&method, response, started)
}

fn finish(method: &axum::http::Method, response: Response, started: Instant) -> Response {
    metrics::record_request(method.as_str(), response.status().as_u16(), started);
    response
}

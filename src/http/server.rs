//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum Router funnelling every request into the dispatcher
//! - Wire up middleware (tracing, request ID)
//! - Enforce the request timeout and body size limit
//! - Record request metrics
//! - Serve until the shutdown signal fires

use axum::{
    body::Body,
    extract::State,
    http::Request,
    response::{IntoResponse, Response},
    Router,
};
use http_body_util::LengthLimitError;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::trace::TraceLayer;

use crate::config::CafeConfig;
use crate::handlers::Handlers;
use crate::http::request::{propagate_request_id_layer, set_request_id_layer, RequestIdExt};
use crate::http::response::ApiError;
use crate::observability::metrics;
use crate::routing::{Dispatcher, Operation, RouteTable};
use crate::store::CafeStore;

/// Application state injected into the dispatch handler.
#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Dispatcher,
    pub max_body_size: usize,
    pub request_timeout: Duration,
}

/// HTTP server for the café service.
pub struct HttpServer {
    router: Router,
    config: CafeConfig,
}

impl HttpServer {
    /// Create a new HTTP server backed by `store`.
    pub fn new<S>(config: CafeConfig, store: Arc<S>) -> Self
    where
        S: CafeStore + 'static,
    {
        let table = Arc::new(RouteTable::new());
        let handlers = Handlers::new(store, config.reports.popular_items_limit);

        let state = AppState {
            dispatcher: Dispatcher::new(table, handlers),
            max_body_size: config.security.max_body_size,
            request_timeout: Duration::from_secs(config.timeouts.request_secs),
        };

        let router = Self::build_router(state);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(state: AppState) -> Router {
        // Every path goes through the dispatcher; it owns the 400 for misses.
        Router::new()
            .fallback(dispatch_handler)
            .with_state(state)
            .layer(propagate_request_id_layer())
            .layer(
                TraceLayer::new_for_http().make_span_with(|req: &Request<Body>| {
                    tracing::info_span!(
                        "request",
                        method = %req.method(),
                        path = %req.uri().path(),
                        request_id = %req.request_id(),
                    )
                }),
            )
            .layer(set_request_id_layer())
    }

    /// The fully layered router, for in-process use.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            request_timeout_secs = self.config.timeouts.request_secs,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Read the body and hand the request to the dispatcher.
async fn dispatch_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start_time = Instant::now();
    let method = request.method().clone();
    let path = decode_path(request.uri().path());

    let handle = async {
        match axum::body::to_bytes(request.into_body(), state.max_body_size).await {
            Ok(body) => state.dispatcher.dispatch(&method, &path, body).await,
            Err(e) if exceeds_limit(&e) => {
                tracing::warn!(limit = state.max_body_size, "Rejected oversized request body");
                ApiError::PayloadTooLarge(state.max_body_size).into_response()
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read request body");
                ApiError::InvalidInput(format!("failed to read request body: {}", e))
                    .into_response()
            }
        }
    };

    let response = match tokio::time::timeout(state.request_timeout, handle).await {
        Ok(response) => response,
        Err(_) => {
            tracing::warn!(
                timeout_secs = state.request_timeout.as_secs(),
                "Request timed out"
            );
            ApiError::Timeout(state.request_timeout.as_secs()).into_response()
        }
    };

    let operation = response
        .extensions()
        .get::<Operation>()
        .map(|op| op.name())
        .unwrap_or("none");
    metrics::record_request(method.as_str(), response.status().as_u16(), operation, start_time);

    response
}

/// Percent-decode the path; undecodable input is classified as-is and misses.
fn decode_path(raw: &str) -> String {
    match urlencoding::decode(raw) {
        Ok(path) => path.into_owned(),
        Err(_) => raw.to_string(),
    }
}

fn exceeds_limit(err: &axum::Error) -> bool {
    let mut source: Option<&(dyn std::error::Error + 'static)> = Some(err);
    while let Some(e) = source {
        if e.is::<LengthLimitError>() {
            return true;
        }
        source = e.source();
    }
    false
}

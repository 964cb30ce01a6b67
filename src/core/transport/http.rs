//! HTTP transport implementation.
//!
//! JSON over HTTP/1.1. Every collection in the registry is mounted under
//! `/api/<collection>`; `/` and `/info` are served directly.

use axum::extract::State;
use axum::middleware::{from_fn, from_fn_with_state};
use axum::response::Html;
use axum::routing::get;
use axum::Router;
use tower::ServiceBuilder;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use super::middleware::{
    BodyLimit, log_request, panic_response, parse_json_body, unknown_endpoint,
};
use super::{ApiError, HttpConfig, TransportError, TransportResult};
use crate::core::ResourceServer;
use crate::domains::resources::Collections;

/// HTTP transport handler.
pub struct HttpTransport {
    config: HttpConfig,
}

impl HttpTransport {
    /// Create a new HTTP transport with the given config.
    pub fn new(config: HttpConfig) -> Self {
        Self { config }
    }

    /// Get the bind address.
    pub fn address(&self) -> String {
        self.config.address()
    }

    /// Run the HTTP transport until the process receives Ctrl-C.
    pub async fn run(self, server: ResourceServer) -> TransportResult<()> {
        let addr = self.address();
        let app = build_app(&server, &self.config);

        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .map_err(|e| TransportError::bind(&addr, e))?;

        let cors_status = if self.config.enable_cors {
            "enabled"
        } else {
            "disabled"
        };
        info!(
            "Ready - listening on {} (backend {}, CORS {})",
            addr,
            server.backend(),
            cors_status
        );
        for path in Collections::base_paths() {
            info!("  → Collection: {}[/{{id}}]", path);
        }
        info!("  → Info:       GET /info");

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| TransportError::http(e.to_string()))?;

        Ok(())
    }
}

/// Assemble the full application: routes, fallback, and the middleware
/// pipeline.
pub fn build_app(server: &ResourceServer, config: &HttpConfig) -> Router {
    let pages = Router::new()
        .route("/", get(root_handler).fallback(unknown_endpoint))
        .route("/info", get(info_handler).fallback(unknown_endpoint))
        .with_state(server.clone());

    let pipeline = ServiceBuilder::new()
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(from_fn_with_state(
            BodyLimit(config.max_body_bytes),
            parse_json_body,
        ))
        .layer(from_fn(log_request));

    let mut app = pages
        .merge(server.collections().routes())
        .fallback(unknown_endpoint)
        .layer(pipeline);

    if config.enable_cors {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
        app = app.layer(cors);
    }

    app
}

/// Root handler - a landing page.
async fn root_handler(State(server): State<ResourceServer>) -> Html<String> {
    let links: String = Collections::base_paths()
        .iter()
        .map(|p| format!("<li><a href=\"{p}\">{p}</a></li>"))
        .collect();
    Html(format!(
        "<h1>{}</h1><ul>{links}<li><a href=\"/info\">/info</a></li></ul>",
        server.name()
    ))
}

/// Info page - collection sizes and the current server time.
async fn info_handler(State(server): State<ResourceServer>) -> Result<String, ApiError> {
    let mut lines = server.collections().summaries().await?;
    lines.push(chrono::Local::now().to_rfc2822());
    Ok(lines.join("\n"))
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Received Ctrl-C, shutting down");
    }
}

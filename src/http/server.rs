//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router exposing the helpers
//! - Wire up middleware (tracing, timeout, body limit, forwarding policy)
//! - Bind server to listener with peer addresses attached
//! - Graceful shutdown on Ctrl+C

use axum::{
    extract::{DefaultBodyLimit, Path, Request, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Extension, Router,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::UtilConfig;
use crate::http::body::BodyParser;
use crate::http::remote::ClientAddr;
use crate::http::response::Jsonify;
use crate::text::is_alphanumeric;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub body_parser: BodyParser,
}

/// HTTP server exposing the helper endpoints.
pub struct HttpServer {
    router: Router,
    config: UtilConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: UtilConfig) -> Self {
        let state = AppState {
            body_parser: BodyParser::new(config.body.content_type_match),
        };

        let router = Self::build_router(&config, state);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &UtilConfig, state: AppState) -> Router {
        Router::new()
            .route("/whoami", get(whoami))
            .route("/echo", post(echo))
            .route("/check/{value}", get(check))
            .with_state(state)
            .layer(DefaultBodyLimit::max(config.body.max_bytes))
            .layer(Extension(config.forwarded.policy()))
            .layer(TimeoutLayer::with_status_code(
                StatusCode::REQUEST_TIMEOUT,
                Duration::from_secs(config.server.request_timeout_secs),
            ))
            .layer(TraceLayer::new_for_http())
    }

    /// The fully layered router, e.g. for driving it without a socket.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(self, listener: TcpListener) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            "HTTP server starting"
        );

        let app = self.router.into_make_service_with_connect_info::<SocketAddr>();

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &UtilConfig {
        &self.config
    }
}

#[derive(Serialize)]
struct WhoAmI {
    remote_addr: String,
}

#[derive(Deserialize)]
struct Greeting {
    name: String,
}

#[derive(Serialize)]
struct CheckReply {
    value: String,
    alphanumeric: bool,
}

async fn whoami(ClientAddr(remote_addr): ClientAddr) -> Jsonify<WhoAmI> {
    Jsonify(WhoAmI { remote_addr })
}

/// Decode a greeting in either supported body format and echo it back.
async fn echo(State(state): State<AppState>, request: Request) -> Response {
    match state.body_parser.parse::<Greeting>(request).await {
        Ok(greeting) => Jsonify(CheckReply {
            alphanumeric: is_alphanumeric(&greeting.name),
            value: greeting.name,
        })
        .into_response(),
        Err(e) => {
            tracing::debug!(error = %e, "Rejected echo body");
            e.into_response()
        }
    }
}

async fn check(Path(value): Path<String>) -> Jsonify<CheckReply> {
    Jsonify(CheckReply {
        alphanumeric: is_alphanumeric(&value),
        value,
    })
}

/// Wait for shutdown signal (Ctrl+C).
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to install Ctrl+C handler");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

//! Shared utilities for integration tests.

use std::net::SocketAddr;

use axum::body::Body;
use axum::extract::ConnectInfo;
use axum::http::Request;
use axum::response::Response;
use axum::Router;
use tower::ServiceExt;

use web_util::config::UtilConfig;
use web_util::http::HttpServer;

/// Build the demo router for `config` without binding a socket.
pub fn router(config: UtilConfig) -> Router {
    HttpServer::new(config).router()
}

/// Attach a transport peer address the way `into_make_service_with_connect_info` does.
pub fn with_peer(mut req: Request<Body>, peer: &str) -> Request<Body> {
    let addr: SocketAddr = peer.parse().unwrap();
    req.extensions_mut().insert(ConnectInfo(addr));
    req
}

/// Send one request through the router.
pub async fn send(router: Router, req: Request<Body>) -> Response {
    router.oneshot(req).await.unwrap()
}

/// Collect a response body as JSON.
pub async fn json_body(res: Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

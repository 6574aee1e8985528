mod base;
mod gossip;
mod scores;

use std::borrow::Cow;
use std::future::Future;

use axum::{
    error_handling::HandleErrorLayer, extract::DefaultBodyLimit, http::StatusCode,
    response::IntoResponse, routing, Router,
};
use tokio::time::Duration;
use tower::{BoxError, ServiceBuilder};
use tower_http::trace::TraceLayer;
use tracing::info;

pub mod paths;

pub use base::AboutResponse;
pub use gossip::decode_payload;

use crate::error::Result;
use crate::node::Node;
use crate::transport_error;

/// Build the HTTP API around a node
pub fn api(node: Node) -> Router {
    Router::new()
        .route(paths::base::ROOT, routing::get(base::root))
        .route(paths::base::HEALTH, routing::get(base::health))
        .route(paths::base::ABOUT, routing::get(base::about))
        // Peer to peer
        // Full-state payloads grow with the store, so no body cap here
        .route(
            paths::gossip::RECEIVE,
            routing::post(gossip::receive).layer(DefaultBodyLimit::disable()),
        )
        .route(paths::gossip::STATS, routing::get(gossip::stats))
        // Scores
        .route(
            paths::scores::UPDATE,
            routing::post(scores::update).get(scores::update),
        )
        .route(paths::scores::STATE, routing::get(scores::state))
        .layer(
            ServiceBuilder::new()
                // Handle errors from middleware
                .layer(HandleErrorLayer::new(handle_error))
                .load_shed()
                .timeout(Duration::from_secs(10)),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(node)
}

/// Serve the API on an already bound listener until `shutdown` resolves
pub async fn serve<F>(listener: std::net::TcpListener, node: Node, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr = listener.local_addr()?;
    let name = node.name().to_string();
    info!("[{}] HTTP server listening on {}", name, addr);
    axum::Server::from_tcp(listener)
        .map_err(|e| transport_error!("failed to listen on {}: {}", addr, e))?
        .serve(api(node).into_make_service())
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| transport_error!("server error: {}", e))?;
    info!("[{}] HTTP server stopped", name);
    Ok(())
}

async fn handle_error(error: BoxError) -> impl IntoResponse {
    if error.is::<tower::timeout::error::Elapsed>() {
        return (StatusCode::REQUEST_TIMEOUT, Cow::from("request timed out"));
    }

    if error.is::<tower::load_shed::error::Overloaded>() {
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            Cow::from("service is overloaded, try again later"),
        );
    }

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Cow::from(format!("Unhandled internal error: {}", error)),
    )
}

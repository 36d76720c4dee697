use crate::core::ServerState;
use axum::{Router, middleware};
use shared::models::{ExpenseOrderStatus, OrderStatus, QuoteStatus};
use std::net::SocketAddr;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;

/// HTTP access log middleware
async fn log_request(
    request: http::Request<axum::body::Body>,
    next: middleware::Next,
) -> http::Response<axum::body::Body> {
    let method = request.method().clone();
    let uri = request.uri().clone();

    let response = next.run(request).await;

    let status = response.status();

    tracing::info!(target: "http_access", "{} {} {}", method, uri, status);

    response
}

/// Build the Axum router (without state)
pub fn build_app() -> Router<ServerState> {
    Router::<ServerState>::new()
        .merge(crate::api::health::router())
        // Aggregates
        .merge(crate::api::aggregates::router::<OrderStatus>())
        .merge(crate::api::aggregates::router::<ExpenseOrderStatus>())
        .merge(crate::api::aggregates::router::<QuoteStatus>())
        // Approvals
        .merge(crate::api::approvals::router())
        .merge(crate::api::policies::router())
        // Supporting
        .merge(crate::api::sequences::router())
        .merge(crate::api::audit_log::router())
}

/// Bind state and the tower middleware stack
pub fn build_router(state: ServerState) -> Router {
    build_app()
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(CompressionLayer::new())
        .layer(middleware::from_fn(log_request))
}

/// Serve `router` on `addr` until `shutdown_signal` resolves
pub async fn start_server<F>(
    router: Router,
    addr: SocketAddr,
    shutdown_signal: F,
) -> crate::core::Result<()>
where
    F: std::future::Future<Output = ()> + Send + 'static,
{
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|source| crate::core::ServerError::Bind { addr, source })?;
    tracing::info!("HTTP server listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal)
        .await
        .map_err(crate::core::ServerError::Serve)
}

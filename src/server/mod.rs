pub mod handlers;

use crate::{Result, config::Config, handler::Handler};
use axum::{Router, routing::post};
use handlers::AppState;
use std::{net::SocketAddr, sync::Arc};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing::info;

pub fn router(handler: Arc<Handler>) -> Router {
    Router::new()
        .route("/invoke", post(handlers::invoke))
        .route("/chat", post(handlers::chat).options(handlers::preflight))
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
        .with_state(AppState { handler })
}

pub async fn run(config: Config) -> Result<()> {
    // Resolved once; every request shares the same backend and client cache
    let handler = Handler::from_config(&config.backend);
    info!(
        backend = %handler.backend_kind(),
        endpoint = handler.endpoint(),
        model_id = %config.backend.model_id,
        "Request handler initialized"
    );

    let app = router(Arc::new(handler));

    let addr = SocketAddr::new(config.server.host.parse()?, config.server.port);

    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

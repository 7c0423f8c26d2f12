// HTTP routes: the host-facing surface of the datasource

mod http;

use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use crate::cancel::Cancellation;
use crate::datasource::DatasourceHandler;

pub use http::{QueryBatch, QueryRequestBody};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) datasource: Arc<dyn DatasourceHandler>,
    pub(crate) cancel: Cancellation,
}

pub fn app(datasource: Arc<dyn DatasourceHandler>, cancel: Cancellation) -> Router {
    let state = AppState { datasource, cancel };
    Router::new()
        .route("/", get(|| async { "Astarte datasource backend" })) // GET /
        .route("/version", get(http::version_handler)) // GET /version
        .route("/api/query", post(http::query_handler)) // POST /api/query
        .route("/api/health", get(http::health_handler)) // GET /api/health
        .route("/api/resources", get(http::resource_handler)) // GET /api/resources?...
        .route("/api/resources/{*path}", get(http::resource_handler)) // GET /api/resources/*?...
        .layer(CorsLayer::new().allow_origin(Any))
        .with_state(state)
}

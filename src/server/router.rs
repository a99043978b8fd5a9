use axum::http::Method;
use axum::routing::get;
use axum::Router;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use crate::server::handlers::{arrondissements, comparaison, geojson, prix, root, timeline};
use crate::server::state::AppContext;

pub fn app_router(context: Arc<AppContext>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET])
        .allow_headers(Any);

    Router::new()
        .route("/", get(root))
        .route("/api/geojson", get(geojson))
        .route("/api/arrondissements", get(arrondissements))
        .route("/api/prix", get(prix))
        .route("/api/timeline", get(timeline))
        .route("/api/comparaison", get(comparaison))
        .layer(cors)
        .with_state(context)
}

//! HTTP routes. `build_router` assembles the whole application.

mod common;
mod endereco;
mod usuario;

pub use common::common_routes;
pub use endereco::endereco_routes;
pub use usuario::usuario_routes;

use crate::state::AppState;
use axum::{extract::DefaultBodyLimit, Router};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub const BASE_PATH: &str = "/v1/itermob";

/// Operational routes at the root, entity routes under `BASE_PATH`; CORS open on all of them.
pub fn build_router(state: AppState, body_limit: usize) -> Router {
    let api = Router::new()
        .merge(usuario_routes(state.clone()))
        .merge(endereco_routes(state.clone()));

    Router::new()
        .merge(common_routes(state))
        .nest(BASE_PATH, api)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive())
                .layer(DefaultBodyLimit::max(body_limit)),
        )
}

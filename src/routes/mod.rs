//! Router assembly.

mod car;
mod common;

pub use car::car_routes;
pub use common::common_routes;

use crate::config::Settings;
use crate::openapi::openapi_routes;
use crate::state::AppState;
use axum::Router;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

/// Full application: common routes, `/api/cars`, the OpenAPI document, body limit and request tracing.
pub fn app(state: AppState, settings: &Settings) -> Router {
    Router::new()
        .merge(common_routes(state.clone()))
        .merge(openapi_routes())
        .nest("/api", car_routes(state))
        .layer(RequestBodyLimitLayer::new(settings.body_limit))
        .layer(TraceLayer::new_for_http())
}

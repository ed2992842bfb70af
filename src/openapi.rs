//! OpenAPI document for the car API, served as JSON.

use crate::domain::{CarDto, CarPatch};
use crate::handlers::car;
use axum::{routing::get, Json, Router};
use utoipa::OpenApi;

pub const OPENAPI_PATH: &str = "/api-docs/openapi.json";

#[derive(OpenApi)]
#[openapi(
    paths(
        car::create_car,
        car::update_car,
        car::partial_update_car,
        car::list_cars,
        car::count_cars,
        car::get_car,
        car::delete_car,
    ),
    components(schemas(CarDto, CarPatch)),
    tags((name = "cars", description = "Car resource"))
)]
pub struct ApiDoc;

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

pub fn openapi_routes() -> Router {
    Router::new().route(OPENAPI_PATH, get(openapi_json))
}

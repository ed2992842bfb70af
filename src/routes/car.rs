//! Car resource routes. PUT/PATCH/DELETE on the collection root answer 405.

use crate::handlers::car::{
    count_cars, create_car, delete_car, get_car, list_cars, partial_update_car, update_car,
};
use crate::state::AppState;
use axum::{routing::get, Router};

pub fn car_routes(state: AppState) -> Router {
    Router::new()
        .route("/cars", get(list_cars).post(create_car))
        .route("/cars/count", get(count_cars))
        .route(
            "/cars/:id",
            get(get_car)
                .put(update_car)
                .patch(partial_update_car)
                .delete(delete_car),
        )
        .with_state(state)
}

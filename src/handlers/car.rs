//! Car REST handlers: create, update, merge-patch, list, count, read, delete.

use crate::domain::{CarDto, CarPatch};
use crate::error::AppError;
use crate::extractors::CarQuery;
use crate::response;
use crate::state::AppState;
use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    response::Response,
    Json,
};

/// Body id must be set and equal to the path id.
fn check_body_id(path_id: i64, body_id: Option<i64>) -> Result<(), AppError> {
    match body_id {
        None => Err(AppError::id_null()),
        Some(id) if id != path_id => Err(AppError::id_invalid()),
        Some(_) => Ok(()),
    }
}

async fn ensure_exists(state: &AppState, id: i64) -> Result<(), AppError> {
    if state.cars.exists(id).await? {
        Ok(())
    } else {
        Err(AppError::id_not_found())
    }
}

/// POST /api/cars
#[utoipa::path(
    post,
    path = "/api/cars",
    request_body = CarDto,
    responses(
        (status = 201, description = "Car created", body = CarDto),
        (status = 400, description = "Body carries an id"),
    ),
    tag = "cars"
)]
pub async fn create_car(
    State(state): State<AppState>,
    body: Result<Json<CarDto>, JsonRejection>,
) -> Result<Response, AppError> {
    let Json(dto) = body?;
    tracing::debug!(car = ?dto, "REST request to save Car");
    if dto.id.is_some() {
        return Err(AppError::id_exists());
    }
    let created = state.cars.save(dto).await?;
    Ok(response::created(&state.app_name, created))
}

/// PUT /api/cars/:id
#[utoipa::path(
    put,
    path = "/api/cars/{id}",
    params(("id" = i64, Path, description = "Car id")),
    request_body = CarDto,
    responses(
        (status = 200, description = "Car replaced", body = CarDto),
        (status = 400, description = "Missing, mismatched or unknown id"),
    ),
    tag = "cars"
)]
pub async fn update_car(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
    body: Result<Json<CarDto>, JsonRejection>,
) -> Result<Response, AppError> {
    let Path(id) = path?;
    let Json(dto) = body?;
    tracing::debug!(id, car = ?dto, "REST request to update Car");
    check_body_id(id, dto.id)?;
    let updated = state
        .cars
        .update(dto)
        .await?
        .ok_or_else(AppError::id_not_found)?;
    Ok(response::updated(&state.app_name, updated))
}

/// PATCH /api/cars/:id with `application/merge-patch+json`. Only non-null fields in the body change.
#[utoipa::path(
    patch,
    path = "/api/cars/{id}",
    params(("id" = i64, Path, description = "Car id")),
    request_body(content = CarPatch, content_type = "application/merge-patch+json"),
    responses(
        (status = 200, description = "Car merged", body = CarDto),
        (status = 400, description = "Missing, mismatched or unknown id"),
        (status = 404, description = "Car removed before the merge"),
    ),
    tag = "cars"
)]
pub async fn partial_update_car(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
    body: Result<Json<CarPatch>, JsonRejection>,
) -> Result<Response, AppError> {
    let Path(id) = path?;
    let Json(patch) = body?;
    tracing::debug!(id, car = ?patch, "REST request to partial update Car");
    check_body_id(id, patch.id)?;
    ensure_exists(&state, id).await?;
    let updated = state
        .cars
        .partial_update(patch)
        .await?
        .ok_or_else(|| AppError::NotFound(id.to_string()))?;
    Ok(response::updated(&state.app_name, updated))
}

/// GET /api/cars
#[utoipa::path(
    get,
    path = "/api/cars",
    params(
        ("sort" = Option<String>, Query, description = "field[,asc|desc]; repeatable"),
    ),
    responses(
        (status = 200, description = "Cars matching every filter", body = Vec<CarDto>),
        (status = 400, description = "Malformed filter"),
    ),
    tag = "cars"
)]
pub async fn list_cars(
    State(state): State<AppState>,
    query: CarQuery,
) -> Result<Json<Vec<CarDto>>, AppError> {
    tracing::debug!(criteria = ?query.criteria, "REST request to get Cars by criteria");
    let cars = state.queries.find_by_criteria(&query.criteria, &query.sort).await?;
    Ok(Json(cars))
}

/// GET /api/cars/count
#[utoipa::path(
    get,
    path = "/api/cars/count",
    responses(
        (status = 200, description = "Number of cars matching every filter", body = u64),
        (status = 400, description = "Malformed filter"),
    ),
    tag = "cars"
)]
pub async fn count_cars(
    State(state): State<AppState>,
    query: CarQuery,
) -> Result<Json<u64>, AppError> {
    tracing::debug!(criteria = ?query.criteria, "REST request to count Cars by criteria");
    let count = state.queries.count_by_criteria(&query.criteria).await?;
    Ok(Json(count))
}

/// GET /api/cars/:id
#[utoipa::path(
    get,
    path = "/api/cars/{id}",
    params(("id" = i64, Path, description = "Car id")),
    responses(
        (status = 200, description = "The car", body = CarDto),
        (status = 404, description = "No car with this id"),
    ),
    tag = "cars"
)]
pub async fn get_car(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<CarDto>, AppError> {
    let Path(id) = path?;
    tracing::debug!(id, "REST request to get Car");
    let car = state
        .cars
        .find_one(id)
        .await?
        .ok_or_else(|| AppError::NotFound(id.to_string()))?;
    Ok(Json(car))
}

/// DELETE /api/cars/:id
#[utoipa::path(
    delete,
    path = "/api/cars/{id}",
    params(("id" = i64, Path, description = "Car id")),
    responses((status = 204, description = "Car deleted or already absent")),
    tag = "cars"
)]
pub async fn delete_car(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Response, AppError> {
    let Path(id) = path?;
    tracing::debug!(id, "REST request to delete Car");
    state.cars.delete(id).await?;
    Ok(response::deleted(&state.app_name, id))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn body_id_checks() {
        assert_eq!(check_body_id(1, None).unwrap_err().code(), "idnull");
        assert_eq!(check_body_id(1, Some(2)).unwrap_err().code(), "idinvalid");
        assert!(check_body_id(1, Some(1)).is_ok());
    }
}

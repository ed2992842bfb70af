//! Response helpers: `Location` on create and the alert headers on every mutation.

use crate::domain::CarDto;
use crate::error::ENTITY_NAME;
use axum::{
    http::{header, HeaderMap, HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};

/// Base path of the car resource.
pub const CARS_PATH: &str = "/api/cars";

/// `X-<app>-alert: <app>.car.<action>` and `X-<app>-params: <param>`.
/// An app name that is not a valid header token yields no headers.
pub fn alert_headers(app_name: &str, action: &str, param: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    let alert = format!("{}.{}.{}", app_name, ENTITY_NAME, action);
    let pairs = [
        (format!("X-{}-alert", app_name), alert),
        (format!("X-{}-params", app_name), param.to_string()),
    ];
    for (name, value) in pairs {
        match (HeaderName::try_from(name.as_str()), HeaderValue::try_from(value.as_str())) {
            (Ok(name), Ok(value)) => {
                headers.insert(name, value);
            }
            _ => tracing::warn!(header = %name, "skipping invalid alert header"),
        }
    }
    headers
}

fn id_param(dto: &CarDto) -> String {
    dto.id.map(|id| id.to_string()).unwrap_or_default()
}

/// 201 with `Location: /api/cars/{id}`.
pub fn created(app_name: &str, dto: CarDto) -> Response {
    let id = id_param(&dto);
    let mut headers = alert_headers(app_name, "created", &id);
    if let Ok(location) = HeaderValue::try_from(format!("{}/{}", CARS_PATH, id)) {
        headers.insert(header::LOCATION, location);
    }
    (StatusCode::CREATED, headers, Json(dto)).into_response()
}

pub fn updated(app_name: &str, dto: CarDto) -> Response {
    let headers = alert_headers(app_name, "updated", &id_param(&dto));
    (StatusCode::OK, headers, Json(dto)).into_response()
}

pub fn deleted(app_name: &str, id: i64) -> Response {
    let headers = alert_headers(app_name, "deleted", &id.to_string());
    (StatusCode::NO_CONTENT, headers).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alert_headers_use_app_prefix() {
        let headers = alert_headers("carApp", "created", "5");
        assert_eq!(headers.get("x-carapp-alert").unwrap(), "carApp.car.created");
        assert_eq!(headers.get("x-carapp-params").unwrap(), "5");
    }

    #[test]
    fn invalid_app_name_yields_no_headers() {
        assert!(alert_headers("bad app", "created", "5").is_empty());
    }

    #[test]
    fn created_sets_location() {
        let dto = CarDto { id: Some(12), ..Default::default() };
        let res = created("carApp", dto);
        assert_eq!(res.status(), StatusCode::CREATED);
        assert_eq!(res.headers().get(header::LOCATION).unwrap(), "/api/cars/12");
    }
}

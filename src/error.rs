//! Typed errors and HTTP mapping.

use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Entity name reported in error details and alert headers.
pub const ENTITY_NAME: &str = "car";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid value for {var}: {message}")]
    Invalid { var: &'static str, message: String },
    #[error("database url: {0}")]
    DatabaseUrl(String),
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("{message}")]
    BadRequest { key: &'static str, message: String },
    #[error("not found: {0}")]
    NotFound(String),
    /// Body or path the extractors could not decode.
    #[error("{message}")]
    Rejected { status: StatusCode, message: String },
    #[error("database: {0}")]
    Db(#[from] sqlx::Error),
}

impl AppError {
    pub fn bad_request(key: &'static str, message: impl Into<String>) -> Self {
        AppError::BadRequest {
            key,
            message: message.into(),
        }
    }

    pub fn id_exists() -> Self {
        Self::bad_request("idexists", "A new car cannot already have an ID")
    }

    pub fn id_null() -> Self {
        Self::bad_request("idnull", "Invalid id")
    }

    pub fn id_invalid() -> Self {
        Self::bad_request("idinvalid", "Invalid ID")
    }

    pub fn id_not_found() -> Self {
        Self::bad_request("idnotfound", "Entity not found")
    }

    /// Malformed filter or sort parameter.
    pub fn filter(message: impl Into<String>) -> Self {
        Self::bad_request("badrequest", message)
    }

    /// Machine-readable key carried in the error body.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Config(_) => "config_error",
            AppError::BadRequest { key, .. } => key,
            AppError::NotFound(_) => "notfound",
            AppError::Rejected { .. } => "badrequest",
            AppError::Db(sqlx::Error::RowNotFound) => "notfound",
            AppError::Db(_) => "database_error",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Rejected { status, .. } => *status,
            AppError::Db(sqlx::Error::RowNotFound) => StatusCode::NOT_FOUND,
            AppError::Db(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Unreadable JSON is a 400 like any other bad request; content-type and size rejections keep their status.
impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        let status = match rejection.status() {
            s if s == StatusCode::UNPROCESSABLE_ENTITY => StatusCode::BAD_REQUEST,
            other => other,
        };
        AppError::Rejected {
            status,
            message: rejection.body_text(),
        }
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        let status = match rejection.status() {
            s if s.is_client_error() => StatusCode::BAD_REQUEST,
            other => other,
        };
        AppError::Rejected {
            status,
            message: rejection.body_text(),
        }
    }
}

#[derive(Serialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        let details = match &self {
            AppError::BadRequest { .. } | AppError::NotFound(_) | AppError::Rejected { .. } => {
                Some(serde_json::json!({ "entityName": ENTITY_NAME }))
            }
            _ => None,
        };
        let body = ErrorBody {
            error: ErrorDetail {
                code: self.code().to_string(),
                message: self.to_string(),
                details,
            },
        };
        (status, Json(body)).into_response()
    }
}

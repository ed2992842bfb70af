//! Extract filter criteria and sort keys from the request query string.

use crate::criteria::{CarCriteria, Sort};
use crate::error::AppError;
use async_trait::async_trait;
use axum::{
    extract::{FromRequestParts, Query},
    http::request::Parts,
};

/// Parsed `?sort=..&<field>.<operator>=..` parameters. Repeated keys are kept in order.
#[derive(Clone, Debug, Default)]
pub struct CarQuery {
    pub criteria: CarCriteria,
    pub sort: Vec<Sort>,
}

impl CarQuery {
    pub fn from_params(params: &[(String, String)]) -> Result<Self, AppError> {
        Ok(CarQuery {
            criteria: CarCriteria::from_params(params)?,
            sort: Sort::from_params(params)?,
        })
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for CarQuery
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let Query(params) = Query::<Vec<(String, String)>>::try_from_uri(&parts.uri)
            .map_err(|e| AppError::filter(e.body_text()))?;
        CarQuery::from_params(&params)
    }
}

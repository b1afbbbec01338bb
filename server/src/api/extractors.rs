//! Query extractors for API routes

use std::ops::Deref;

use axum::Json;
use axum::extract::rejection::QueryRejection;
use axum::extract::{FromRef, FromRequestParts, Query};
use axum::http::StatusCode;
use axum::http::request::Parts;
use axum::response::{IntoResponse, Response};
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::api::types::ApiError;
use crate::data::filters::{FilterLimits, FilterRequest, parse_filters, parse_query_filters};

/// Query parameter carrying JSON-encoded filters
pub const FILTERS_JSON_PARAM: &str = "filters";

/// Validation rejection with structured error response
pub enum ValidationRejection {
    /// Failed to parse query string
    Query(QueryRejection),
    /// Validation constraints not satisfied
    Validation(validator::ValidationErrors),
}

impl IntoResponse for ValidationRejection {
    fn into_response(self) -> Response {
        let (code, message) = match self {
            Self::Query(rejection) => ("QUERY_PARSE_ERROR", rejection.body_text()),
            Self::Validation(errors) => ("VALIDATION_ERROR", format_validation_errors(&errors)),
        };
        (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({
                "error": "bad_request",
                "code": code,
                "message": message
            })),
        )
            .into_response()
    }
}

fn format_validation_errors(errors: &validator::ValidationErrors) -> String {
    errors
        .field_errors()
        .iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| {
                e.message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("{}: validation failed", field))
            })
        })
        .collect::<Vec<_>>()
        .join("; ")
}

/// Query extractor with automatic validation.
///
/// Unknown parameters (such as `filter[...]`) are ignored by the target type.
#[derive(Debug)]
pub struct ValidatedQuery<T>(pub T);

impl<T> Deref for ValidatedQuery<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<S, T> FromRequestParts<S> for ValidatedQuery<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
{
    type Rejection = ValidationRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(ValidationRejection::Query)?;
        value.validate().map_err(ValidationRejection::Validation)?;
        Ok(Self(value))
    }
}

/// Filter requests from the query string, in source order.
///
/// Bracket parameters come first, followed by the entries of the JSON
/// `filters` parameter. Keys are not checked here; that happens when the
/// endpoint's registry resolves them.
#[derive(Debug, Default)]
pub struct FilterQuery(pub Vec<FilterRequest>);

impl<S> FromRequestParts<S> for FilterQuery
where
    S: Send + Sync,
    FilterLimits: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let limits = FilterLimits::from_ref(state);
        let Query(pairs) = Query::<Vec<(String, String)>>::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError::bad_request("QUERY_PARSE_ERROR", e.body_text()))?;

        let mut requests = parse_query_filters(&pairs, &limits)?;
        for (_, json) in pairs.iter().filter(|(name, _)| name == FILTERS_JSON_PARAM) {
            requests.extend(parse_filters(json, &limits)?);
        }

        if requests.len() > limits.max_filters {
            return Err(ApiError::bad_request(
                "TOO_MANY_FILTERS",
                format!("Maximum {} filters allowed", limits.max_filters),
            ));
        }
        Ok(Self(requests))
    }
}

//! Request extractors that validate input before it reaches a handler.

use axum::{
    extract::{FromRequest, FromRequestParts, Path, Query, Request},
    http::request::Parts,
    Json,
};
use garde::Validate;
use serde::de::DeserializeOwned;
use serde_json::json;

use crate::error::AppError;

/// JSON body extractor that runs `garde` validation after decoding.
///
/// Malformed bodies are rejected as `bad_request`; constraint violations are
/// rejected as `validation_error` with one `{field, error}` detail each. The
/// handler is never invoked for an invalid body.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate + Send,
    T::Context: Default,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| AppError::bad_request(rejection.body_text()))?;

        value
            .validate()
            .map_err(|report| AppError::validation(violations(&report), "request validation failed"))?;

        Ok(Self(value))
    }
}

/// Path parameters whose rejection, e.g. a non-numeric id, is reported as a
/// `bad_request` envelope.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApiPath<T>(pub T);

impl<T, S> FromRequestParts<S> for ApiPath<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(value) = Path::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| AppError::bad_request(rejection.body_text()))?;
        Ok(Self(value))
    }
}

/// Query string extractor reporting decode failures as `bad_request`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApiQuery<T>(pub T);

impl<T, S> FromRequestParts<S> for ApiQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| AppError::bad_request(rejection.body_text()))?;
        Ok(Self(value))
    }
}

/// Flatten a `garde` report into `{field, error}` detail objects.
pub fn violations(report: &garde::Report) -> Vec<serde_json::Value> {
    report
        .iter()
        .map(|(path, error)| {
            json!({
                "field": path.to_string(),
                "error": error.message(),
            })
        })
        .collect()
}

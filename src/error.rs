//! Domain errors raised by the catalog services.

use bookstore_http::AppError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CatalogError {
    /// A referenced entity does not exist in the store.
    #[error("{entity} not found with id: {id}")]
    NotFound { entity: &'static str, id: i64 },

    /// Input that passed field validation but is still unusable, such as a
    /// book reference without an id.
    #[error("{0}")]
    InvalidArgument(String),

    #[error("store failure: {0}")]
    Store(#[from] sqlx::Error),
}

impl CatalogError {
    pub fn not_found(entity: &'static str, id: i64) -> Self {
        Self::NotFound { entity, id }
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    /// Classify a failed overwrite of `entity` `id`. A row deleted since it
    /// was loaded surfaces as `RowNotFound` and becomes `NotFound`.
    pub fn from_update(entity: &'static str, id: i64, err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => Self::not_found(entity, id),
            other => Self::Store(other),
        }
    }
}

pub type CatalogResult<T> = Result<T, CatalogError>;

impl From<CatalogError> for AppError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::NotFound { .. } => AppError::not_found(err.to_string()),
            CatalogError::InvalidArgument(message) => AppError::bad_request(message),
            CatalogError::Store(source) => AppError::Internal(anyhow::Error::new(source)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{http::StatusCode, response::IntoResponse};

    #[test]
    fn not_found_names_entity_and_id() {
        let err = CatalogError::not_found("Author", 999);
        assert_eq!(err.to_string(), "Author not found with id: 999");
    }

    #[test]
    fn vanished_row_on_update_is_not_found() {
        let err = CatalogError::from_update("Genre", 5, sqlx::Error::RowNotFound);
        assert_eq!(err.to_string(), "Genre not found with id: 5");

        let err = CatalogError::from_update("Genre", 5, sqlx::Error::PoolClosed);
        assert!(matches!(err, CatalogError::Store(sqlx::Error::PoolClosed)));
    }

    #[test]
    fn errors_map_to_http_status() {
        let not_found: AppError = CatalogError::not_found("Book", 2).into();
        assert_eq!(not_found.into_response().status(), StatusCode::NOT_FOUND);

        let invalid: AppError =
            CatalogError::invalid_argument("Book must have a valid author ID").into();
        assert_eq!(invalid.into_response().status(), StatusCode::BAD_REQUEST);

        let store: AppError = CatalogError::Store(sqlx::Error::PoolClosed).into();
        assert_eq!(
            store.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}

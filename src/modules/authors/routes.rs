use axum::{
    extract::State,
    http::StatusCode,
    routing::get,
    Json, Router,
};
use bookstore_http::{ApiPath, AppError, ValidatedJson};

use super::{
    models::{Author, AuthorDraft},
    service::AuthorService,
};

pub fn router(service: AuthorService) -> Router {
    Router::new()
        .route("/", get(list_authors).post(create_author))
        .route("/health", get(health_check))
        .route(
            "/{id}",
            get(get_author).put(update_author).delete(delete_author),
        )
        .with_state(service)
}

async fn health_check() -> &'static str {
    "authors module is healthy"
}

async fn create_author(
    State(service): State<AuthorService>,
    ValidatedJson(draft): ValidatedJson<AuthorDraft>,
) -> Result<(StatusCode, Json<Author>), AppError> {
    let author = service.create(draft).await?;
    Ok((StatusCode::CREATED, Json(author)))
}

async fn get_author(
    State(service): State<AuthorService>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<Author>, AppError> {
    Ok(Json(service.get_by_id(id).await?))
}

async fn list_authors(State(service): State<AuthorService>) -> Result<Json<Vec<Author>>, AppError> {
    Ok(Json(service.get_all().await?))
}

async fn update_author(
    State(service): State<AuthorService>,
    ApiPath(id): ApiPath<i64>,
    ValidatedJson(draft): ValidatedJson<AuthorDraft>,
) -> Result<Json<Author>, AppError> {
    Ok(Json(service.update(id, draft).await?))
}

async fn delete_author(
    State(service): State<AuthorService>,
    ApiPath(id): ApiPath<i64>,
) -> Result<StatusCode, AppError> {
    service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

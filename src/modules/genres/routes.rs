use axum::{
    extract::State,
    http::StatusCode,
    routing::get,
    Json, Router,
};
use bookstore_http::{ApiPath, AppError, ValidatedJson};

use super::{
    models::{Genre, GenreDraft},
    service::GenreService,
};

pub fn router(service: GenreService) -> Router {
    Router::new()
        .route("/", get(list_genres).post(create_genre))
        .route("/health", get(health_check))
        .route(
            "/{id}",
            get(get_genre).put(update_genre).delete(delete_genre),
        )
        .with_state(service)
}

async fn health_check() -> &'static str {
    "genres module is healthy"
}

async fn create_genre(
    State(service): State<GenreService>,
    ValidatedJson(draft): ValidatedJson<GenreDraft>,
) -> Result<(StatusCode, Json<Genre>), AppError> {
    let genre = service.create(draft).await?;
    Ok((StatusCode::CREATED, Json(genre)))
}

async fn get_genre(
    State(service): State<GenreService>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<Genre>, AppError> {
    Ok(Json(service.get_by_id(id).await?))
}

async fn list_genres(State(service): State<GenreService>) -> Result<Json<Vec<Genre>>, AppError> {
    Ok(Json(service.get_all().await?))
}

async fn update_genre(
    State(service): State<GenreService>,
    ApiPath(id): ApiPath<i64>,
    ValidatedJson(draft): ValidatedJson<GenreDraft>,
) -> Result<Json<Genre>, AppError> {
    Ok(Json(service.update(id, draft).await?))
}

async fn delete_genre(
    State(service): State<GenreService>,
    ApiPath(id): ApiPath<i64>,
) -> Result<StatusCode, AppError> {
    service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

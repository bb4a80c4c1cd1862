use axum::{
    extract::State,
    http::StatusCode,
    routing::get,
    Json, Router,
};
use bookstore_http::{ApiPath, ApiQuery, AppError, ValidatedJson};

use super::{
    models::{Book, BookDraft},
    search::SearchCriteria,
    service::BookService,
};

pub fn router(service: BookService) -> Router {
    Router::new()
        .route("/", get(list_books).post(create_book))
        .route("/health", get(health_check))
        .route("/search", get(search_books))
        .route("/{id}", get(get_book).put(update_book).delete(delete_book))
        .with_state(service)
}

async fn health_check() -> &'static str {
    "books module is healthy"
}

async fn create_book(
    State(service): State<BookService>,
    ValidatedJson(draft): ValidatedJson<BookDraft>,
) -> Result<(StatusCode, Json<Book>), AppError> {
    let book = service.create(draft).await?;
    Ok((StatusCode::CREATED, Json(book)))
}

async fn get_book(
    State(service): State<BookService>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<Book>, AppError> {
    Ok(Json(service.get_by_id(id).await?))
}

async fn list_books(State(service): State<BookService>) -> Result<Json<Vec<Book>>, AppError> {
    Ok(Json(service.get_all().await?))
}

async fn update_book(
    State(service): State<BookService>,
    ApiPath(id): ApiPath<i64>,
    ValidatedJson(draft): ValidatedJson<BookDraft>,
) -> Result<Json<Book>, AppError> {
    Ok(Json(service.update(id, draft).await?))
}

async fn delete_book(
    State(service): State<BookService>,
    ApiPath(id): ApiPath<i64>,
) -> Result<StatusCode, AppError> {
    service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Search by any combination of `title`, `author`, and `genre`
async fn search_books(
    State(service): State<BookService>,
    ApiQuery(criteria): ApiQuery<SearchCriteria>,
) -> Result<Json<Vec<Book>>, AppError> {
    Ok(Json(service.search(criteria).await?))
}

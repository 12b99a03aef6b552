use std::sync::Arc;

use axum::{
    extract::{Path, State},
    routing::get,
    Router,
};

use bookshelf_http::{AppError, ValidJson, WebResponse};

use super::models::{BookRequest, BookResponse};
use super::service::BookService;

type ApiResult<T> = Result<WebResponse<T>, AppError>;

pub fn router(service: Arc<BookService>) -> Router {
    Router::new()
        .route("/", get(list_books).post(create_book))
        .route("/{id}", get(get_book).put(update_book).delete(delete_book))
        .route("/health", get(health_check))
        .with_state(service)
}

async fn health_check() -> &'static str {
    "books module is healthy"
}

async fn create_book(
    State(service): State<Arc<BookService>>,
    ValidJson(request): ValidJson<BookRequest>,
) -> ApiResult<BookResponse> {
    Ok(WebResponse::success(service.create(request).await?))
}

async fn get_book(
    State(service): State<Arc<BookService>>,
    Path(id): Path<String>,
) -> ApiResult<BookResponse> {
    Ok(WebResponse::success(service.find_by_id(&id).await?))
}

async fn update_book(
    State(service): State<Arc<BookService>>,
    Path(id): Path<String>,
    ValidJson(request): ValidJson<BookRequest>,
) -> ApiResult<BookResponse> {
    Ok(WebResponse::success(service.update(&id, request).await?))
}

async fn list_books(State(service): State<Arc<BookService>>) -> ApiResult<Vec<BookResponse>> {
    Ok(WebResponse::success(service.find_all().await?))
}

async fn delete_book(
    State(service): State<Arc<BookService>>,
    Path(id): Path<String>,
) -> ApiResult<BookResponse> {
    Ok(WebResponse::success(service.delete(&id).await?))
}

//! Book endpoints

use axum::extract::State;

use crate::{
    error::AppResult,
    models::book::{BookCreated, BookDetail, BookFilter, BookList, BookPayload, BookQuery},
    services::books::messages,
};

use super::{
    response::{ApiResponse, NoData},
    ApiJson, ApiPath, ApiQuery,
};

/// Add a book
#[utoipa::path(
    post,
    path = "/books",
    tag = "books",
    request_body = BookPayload,
    responses(
        (status = 201, description = "Book added", body = BookCreatedEnvelope),
        (status = 400, description = "Missing name, readPage greater than pageCount, or malformed body", body = MessageEnvelope),
        (status = 500, description = "Book could not be stored", body = MessageEnvelope)
    )
)]
pub async fn create_book(
    State(state): State<crate::AppState>,
    ApiJson(payload): ApiJson<BookPayload>,
) -> AppResult<ApiResponse<BookCreated>> {
    let created = state.services.books.create(payload)?;
    Ok(ApiResponse::created(messages::CREATED, created))
}

/// List books, optionally filtered
#[utoipa::path(
    get,
    path = "/books",
    tag = "books",
    params(BookQuery),
    responses(
        (status = 200, description = "Matching books", body = BookListEnvelope)
    )
)]
pub async fn list_books(
    State(state): State<crate::AppState>,
    ApiQuery(pairs): ApiQuery<Vec<(String, String)>>,
) -> AppResult<ApiResponse<BookList>> {
    let query = BookQuery::from_pairs(pairs);
    let list = state.services.books.list(&BookFilter::from(query))?;
    Ok(ApiResponse::ok(list))
}

/// Get book details by ID
#[utoipa::path(
    get,
    path = "/books/{id}",
    tag = "books",
    params(("id" = String, Path, description = "Book ID")),
    responses(
        (status = 200, description = "Book details", body = BookDetailEnvelope),
        (status = 404, description = "Book not found", body = MessageEnvelope)
    )
)]
pub async fn get_book(
    State(state): State<crate::AppState>,
    ApiPath(id): ApiPath<String>,
) -> AppResult<ApiResponse<BookDetail>> {
    let book = state.services.books.get(&id)?;
    Ok(ApiResponse::ok(BookDetail { book }))
}

/// Replace a book's fields
#[utoipa::path(
    put,
    path = "/books/{id}",
    tag = "books",
    params(("id" = String, Path, description = "Book ID")),
    request_body = BookPayload,
    responses(
        (status = 200, description = "Book updated", body = MessageEnvelope),
        (status = 400, description = "Missing name, readPage greater than pageCount, or malformed body", body = MessageEnvelope),
        (status = 404, description = "Book not found", body = MessageEnvelope)
    )
)]
pub async fn update_book(
    State(state): State<crate::AppState>,
    ApiPath(id): ApiPath<String>,
    ApiJson(payload): ApiJson<BookPayload>,
) -> AppResult<ApiResponse<NoData>> {
    state.services.books.update(&id, payload)?;
    Ok(ApiResponse::message(messages::UPDATED))
}

/// Delete a book
#[utoipa::path(
    delete,
    path = "/books/{id}",
    tag = "books",
    params(("id" = String, Path, description = "Book ID")),
    responses(
        (status = 200, description = "Book deleted", body = MessageEnvelope),
        (status = 404, description = "Book not found", body = MessageEnvelope)
    )
)]
pub async fn delete_book(
    State(state): State<crate::AppState>,
    ApiPath(id): ApiPath<String>,
) -> AppResult<ApiResponse<NoData>> {
    state.services.books.delete(&id)?;
    Ok(ApiResponse::message(messages::DELETED))
}

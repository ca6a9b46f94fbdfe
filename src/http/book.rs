use crate::http::AppState;
use crate::http::author::AuthorHttpResponse;
use crate::http::handler::{ApiError, ApiSuccess, PageHttpResponse};
use crate::models::book::{
    Book, BookFilter, BookTitle, BookTitleEmptyError, CreateBookError, CreateBookRequest,
    DeleteBookError, DeleteBookRequest, FindBookError, FindBookRequest, Isbn, IsbnError,
    ListBooksError, UpdateBookError, UpdateBookRequest,
};
use crate::models::query::PageRequest;
use crate::repositories::{AuthorRepository, BookRepository};
use axum::extract::{Json, Path, Query, State};
use axum::http::StatusCode;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum ParseBookHttpRequestError {
    #[error(transparent)]
    Title(#[from] BookTitleEmptyError),
    #[error(transparent)]
    Isbn(#[from] IsbnError),
}

impl From<ParseBookHttpRequestError> for ApiError {
    fn from(err: ParseBookHttpRequestError) -> Self {
        Self::UnprocessableEntity(err.to_string())
    }
}

impl From<CreateBookError> for ApiError {
    fn from(err: CreateBookError) -> Self {
        match err {
            CreateBookError::AuthorNotFound { .. } => Self::NotFound(err.to_string()),
            CreateBookError::DuplicateIsbn { .. } => Self::Conflict(err.to_string()),
            CreateBookError::Other(cause) => Self::internal(&cause),
        }
    }
}

impl From<FindBookError> for ApiError {
    fn from(err: FindBookError) -> Self {
        Self::internal(&err.0)
    }
}

impl From<ListBooksError> for ApiError {
    fn from(err: ListBooksError) -> Self {
        Self::internal(&err.0)
    }
}

impl From<UpdateBookError> for ApiError {
    fn from(err: UpdateBookError) -> Self {
        match err {
            UpdateBookError::NotFound { .. } | UpdateBookError::AuthorNotFound { .. } => {
                Self::NotFound(err.to_string())
            }
            UpdateBookError::DuplicateIsbn { .. } => Self::Conflict(err.to_string()),
            UpdateBookError::Other(cause) => Self::internal(&cause),
        }
    }
}

impl From<DeleteBookError> for ApiError {
    fn from(err: DeleteBookError) -> Self {
        match err {
            DeleteBookError::NotFound { .. } => Self::NotFound(err.to_string()),
            DeleteBookError::Other(cause) => Self::internal(&cause),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookHttpRequest {
    title: String,
    isbn: String,
    published_date: Option<NaiveDate>,
    genre: Option<String>,
    author_id: Uuid,
}

impl TryFrom<CreateBookHttpRequest> for CreateBookRequest {
    type Error = ParseBookHttpRequestError;

    fn try_from(value: CreateBookHttpRequest) -> Result<Self, Self::Error> {
        let mut req = Self::new(
            BookTitle::new(&value.title)?,
            Isbn::new(&value.isbn)?,
            value.author_id,
        );
        if let Some(published_date) = value.published_date {
            req.set_published_date(published_date);
        }
        if let Some(genre) = value.genre {
            req.set_genre(genre);
        }
        Ok(req)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBookHttpRequest {
    title: Option<String>,
    isbn: Option<String>,
    published_date: Option<NaiveDate>,
    genre: Option<String>,
    author_id: Option<Uuid>,
}

impl TryFrom<(Uuid, UpdateBookHttpRequest)> for UpdateBookRequest {
    type Error = ParseBookHttpRequestError;

    fn try_from((id, value): (Uuid, UpdateBookHttpRequest)) -> Result<Self, Self::Error> {
        let mut req = Self::new(id);
        if let Some(title) = value.title {
            req.set_title(BookTitle::new(&title)?);
        }
        if let Some(isbn) = value.isbn {
            req.set_isbn(Isbn::new(&isbn)?);
        }
        if let Some(published_date) = value.published_date {
            req.set_published_date(published_date);
        }
        if let Some(genre) = value.genre {
            req.set_genre(genre);
        }
        if let Some(author_id) = value.author_id {
            req.set_author_id(author_id);
        }
        Ok(req)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListBooksHttpQuery {
    page: Option<u32>,
    limit: Option<u32>,
    title: Option<String>,
    isbn: Option<String>,
    author_id: Option<Uuid>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookHttpResponse {
    id: Uuid,
    title: String,
    isbn: String,
    published_date: Option<NaiveDate>,
    genre: Option<String>,
    author_id: Uuid,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    author: Option<AuthorHttpResponse>,
}

impl From<Book> for BookHttpResponse {
    fn from(value: Book) -> Self {
        Self {
            id: value.id(),
            title: value.title().to_string(),
            isbn: value.isbn().to_string(),
            published_date: value.published_date(),
            genre: value.genre().map(str::to_string),
            author_id: value.author_id(),
            created_at: value.created_at(),
            updated_at: value.updated_at(),
            author: value.author().cloned().map(AuthorHttpResponse::from),
        }
    }
}

pub async fn create_book<AR: AuthorRepository, BR: BookRepository>(
    State(state): State<AppState<AR, BR>>,
    Json(body): Json<CreateBookHttpRequest>,
) -> Result<ApiSuccess<BookHttpResponse>, ApiError> {
    let req = body.try_into()?;
    state
        .book_service()
        .create_book(&req)
        .await
        .map_err(ApiError::from)
        .map(|book| ApiSuccess::new(StatusCode::CREATED, book.into()))
}

pub async fn list_books<AR: AuthorRepository, BR: BookRepository>(
    State(state): State<AppState<AR, BR>>,
    Query(query): Query<ListBooksHttpQuery>,
) -> Result<ApiSuccess<PageHttpResponse<BookHttpResponse>>, ApiError> {
    let page = PageRequest::new(query.page, query.limit);
    let mut filter = BookFilter::new();
    if let Some(title) = query.title {
        filter.set_title(title);
    }
    if let Some(isbn) = query.isbn {
        filter.set_isbn(isbn);
    }
    if let Some(author_id) = query.author_id {
        filter.set_author_id(author_id);
    }

    state
        .book_service()
        .list_books(&filter, &page)
        .await
        .map_err(ApiError::from)
        .map(|page| ApiSuccess::new(StatusCode::OK, page.map(BookHttpResponse::from).into()))
}

pub async fn get_book<AR: AuthorRepository, BR: BookRepository>(
    State(state): State<AppState<AR, BR>>,
    Path(id): Path<Uuid>,
) -> Result<ApiSuccess<BookHttpResponse>, ApiError> {
    state
        .book_service()
        .find_book(&FindBookRequest::new(id))
        .await
        .map_err(ApiError::from)?
        .map_or_else(
            || Err(ApiError::NotFound("Book not found".to_string())),
            |book| Ok(ApiSuccess::new(StatusCode::OK, book.into())),
        )
}

pub async fn update_book<AR: AuthorRepository, BR: BookRepository>(
    State(state): State<AppState<AR, BR>>,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateBookHttpRequest>,
) -> Result<ApiSuccess<BookHttpResponse>, ApiError> {
    let req = (id, body).try_into()?;
    state
        .book_service()
        .update_book(&req)
        .await
        .map_err(ApiError::from)
        .map(|book| ApiSuccess::new(StatusCode::OK, book.into()))
}

pub async fn delete_book<AR: AuthorRepository, BR: BookRepository>(
    State(state): State<AppState<AR, BR>>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state
        .book_service()
        .delete_book(&DeleteBookRequest::new(id))
        .await
        .map_err(ApiError::from)
        .map(|()| StatusCode::NO_CONTENT)
}

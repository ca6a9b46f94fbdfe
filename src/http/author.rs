use crate::http::AppState;
use crate::http::book::BookHttpResponse;
use crate::http::handler::{ApiError, ApiSuccess, PageHttpResponse};
use crate::models::author::{
    Author, AuthorFilter, AuthorName, AuthorNameEmptyError, CreateAuthorError, CreateAuthorRequest,
    DeleteAuthorError, DeleteAuthorRequest, FindAuthorError, FindAuthorRequest, ListAuthorsError,
    UpdateAuthorError, UpdateAuthorRequest,
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
pub enum ParseAuthorHttpRequestError {
    #[error(transparent)]
    Name(#[from] AuthorNameEmptyError),
}

impl From<ParseAuthorHttpRequestError> for ApiError {
    fn from(err: ParseAuthorHttpRequestError) -> Self {
        Self::UnprocessableEntity(err.to_string())
    }
}

impl From<CreateAuthorError> for ApiError {
    fn from(err: CreateAuthorError) -> Self {
        Self::internal(&err.0)
    }
}

impl From<FindAuthorError> for ApiError {
    fn from(err: FindAuthorError) -> Self {
        match err {
            FindAuthorError::NotFound { .. } => Self::NotFound(err.to_string()),
            FindAuthorError::Other(cause) => Self::internal(&cause),
        }
    }
}

impl From<ListAuthorsError> for ApiError {
    fn from(err: ListAuthorsError) -> Self {
        Self::internal(&err.0)
    }
}

impl From<UpdateAuthorError> for ApiError {
    fn from(err: UpdateAuthorError) -> Self {
        match err {
            UpdateAuthorError::NotFound { .. } => Self::NotFound(err.to_string()),
            UpdateAuthorError::Other(cause) => Self::internal(&cause),
        }
    }
}

impl From<DeleteAuthorError> for ApiError {
    fn from(err: DeleteAuthorError) -> Self {
        match err {
            DeleteAuthorError::NotFound { .. } => Self::NotFound(err.to_string()),
            DeleteAuthorError::HasBooks { .. } => Self::Conflict(err.to_string()),
            DeleteAuthorError::Other(cause) => Self::internal(&cause),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAuthorHttpRequest {
    first_name: String,
    last_name: String,
    bio: Option<String>,
    birth_date: Option<NaiveDate>,
}

impl TryFrom<CreateAuthorHttpRequest> for CreateAuthorRequest {
    type Error = ParseAuthorHttpRequestError;

    fn try_from(value: CreateAuthorHttpRequest) -> Result<Self, Self::Error> {
        let mut req = Self::new(
            AuthorName::new(&value.first_name)?,
            AuthorName::new(&value.last_name)?,
        );
        if let Some(bio) = value.bio {
            req.set_bio(bio);
        }
        if let Some(birth_date) = value.birth_date {
            req.set_birth_date(birth_date);
        }
        Ok(req)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAuthorHttpRequest {
    first_name: Option<String>,
    last_name: Option<String>,
    bio: Option<String>,
    birth_date: Option<NaiveDate>,
}

impl TryFrom<(Uuid, UpdateAuthorHttpRequest)> for UpdateAuthorRequest {
    type Error = ParseAuthorHttpRequestError;

    fn try_from((id, value): (Uuid, UpdateAuthorHttpRequest)) -> Result<Self, Self::Error> {
        let mut req = Self::new(id);
        if let Some(first_name) = value.first_name {
            req.set_first_name(AuthorName::new(&first_name)?);
        }
        if let Some(last_name) = value.last_name {
            req.set_last_name(AuthorName::new(&last_name)?);
        }
        if let Some(bio) = value.bio {
            req.set_bio(bio);
        }
        if let Some(birth_date) = value.birth_date {
            req.set_birth_date(birth_date);
        }
        Ok(req)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListAuthorsHttpQuery {
    page: Option<u32>,
    limit: Option<u32>,
    first_name: Option<String>,
    last_name: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorHttpResponse {
    id: Uuid,
    first_name: String,
    last_name: String,
    bio: Option<String>,
    birth_date: Option<NaiveDate>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    books: Option<Vec<BookHttpResponse>>,
}

impl From<Author> for AuthorHttpResponse {
    fn from(value: Author) -> Self {
        Self {
            id: value.id(),
            first_name: value.first_name().to_string(),
            last_name: value.last_name().to_string(),
            bio: value.bio().map(str::to_string),
            birth_date: value.birth_date(),
            created_at: value.created_at(),
            updated_at: value.updated_at(),
            books: value
                .books()
                .map(|books| books.iter().cloned().map(BookHttpResponse::from).collect()),
        }
    }
}

pub async fn create_author<AR: AuthorRepository, BR: BookRepository>(
    State(state): State<AppState<AR, BR>>,
    Json(body): Json<CreateAuthorHttpRequest>,
) -> Result<ApiSuccess<AuthorHttpResponse>, ApiError> {
    let req = body.try_into()?;
    state
        .author_service()
        .create_author(&req)
        .await
        .map_err(ApiError::from)
        .map(|author| ApiSuccess::new(StatusCode::CREATED, author.into()))
}

pub async fn list_authors<AR: AuthorRepository, BR: BookRepository>(
    State(state): State<AppState<AR, BR>>,
    Query(query): Query<ListAuthorsHttpQuery>,
) -> Result<ApiSuccess<PageHttpResponse<AuthorHttpResponse>>, ApiError> {
    let page = PageRequest::new(query.page, query.limit);
    let mut filter = AuthorFilter::new();
    if let Some(first_name) = query.first_name {
        filter.set_first_name(first_name);
    }
    if let Some(last_name) = query.last_name {
        filter.set_last_name(last_name);
    }

    state
        .author_service()
        .list_authors(&filter, &page)
        .await
        .map_err(ApiError::from)
        .map(|page| ApiSuccess::new(StatusCode::OK, page.map(AuthorHttpResponse::from).into()))
}

pub async fn get_author<AR: AuthorRepository, BR: BookRepository>(
    State(state): State<AppState<AR, BR>>,
    Path(id): Path<Uuid>,
) -> Result<ApiSuccess<AuthorHttpResponse>, ApiError> {
    state
        .author_service()
        .find_author(&FindAuthorRequest::new(id).with_books())
        .await
        .map_err(ApiError::from)
        .map(|author| ApiSuccess::new(StatusCode::OK, author.into()))
}

pub async fn update_author<AR: AuthorRepository, BR: BookRepository>(
    State(state): State<AppState<AR, BR>>,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateAuthorHttpRequest>,
) -> Result<ApiSuccess<AuthorHttpResponse>, ApiError> {
    let req = (id, body).try_into()?;
    state
        .author_service()
        .update_author(&req)
        .await
        .map_err(ApiError::from)
        .map(|author| ApiSuccess::new(StatusCode::OK, author.into()))
}

pub async fn delete_author<AR: AuthorRepository, BR: BookRepository>(
    State(state): State<AppState<AR, BR>>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state
        .author_service()
        .delete_author(&DeleteAuthorRequest::new(id))
        .await
        .map_err(ApiError::from)
        .map(|()| StatusCode::NO_CONTENT)
}

use crate::models::query::Page;
use axum::Json;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::Serialize;

#[derive(Debug)]
pub struct ApiSuccess<T: Serialize>(StatusCode, Json<ApiResponse<T>>);

impl<T: Serialize> ApiSuccess<T> {
    pub const fn new(status: StatusCode, data: T) -> Self {
        Self(status, Json(ApiResponse::new(status, data)))
    }
}

impl<T: Serialize> IntoResponse for ApiSuccess<T> {
    fn into_response(self) -> axum::response::Response {
        (self.0, self.1).into_response()
    }
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    status_code: u16,
    data: T,
}

impl<T: Serialize> ApiResponse<T> {
    const fn new(status: StatusCode, data: T) -> Self {
        Self {
            status_code: status.as_u16(),
            data,
        }
    }
}

#[derive(Debug)]
pub enum ApiError {
    InternalServerError(String),
    NotFound(String),
    Conflict(String),
    UnprocessableEntity(String),
}

impl ApiError {
    /// Hides the cause from the caller but keeps it in the logs.
    pub(crate) fn internal(cause: &anyhow::Error) -> Self {
        tracing::error!("{cause:#}");
        Self::InternalServerError("Internal server error".to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        match self {
            Self::InternalServerError(msg) => {
                let status = StatusCode::INTERNAL_SERVER_ERROR;
                (status, Json(ApiResponse::new(status, msg))).into_response()
            }
            Self::NotFound(msg) => {
                let status = StatusCode::NOT_FOUND;
                (status, Json(ApiResponse::new(status, msg))).into_response()
            }
            Self::Conflict(msg) => {
                let status = StatusCode::CONFLICT;
                (status, Json(ApiResponse::new(status, msg))).into_response()
            }
            Self::UnprocessableEntity(msg) => {
                let status = StatusCode::UNPROCESSABLE_ENTITY;
                (status, Json(ApiResponse::new(status, msg))).into_response()
            }
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageHttpResponse<T: Serialize> {
    data: Vec<T>,
    total: u64,
    page: u32,
    limit: u32,
    page_count: u32,
}

impl<T: Serialize> From<Page<T>> for PageHttpResponse<T> {
    fn from(value: Page<T>) -> Self {
        Self {
            total: value.total(),
            page: value.page(),
            limit: value.limit(),
            page_count: value.page_count(),
            data: value.into_data(),
        }
    }
}

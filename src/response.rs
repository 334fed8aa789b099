//! The JSON envelope every endpoint answers with.
//!
//! Handlers and `AppError` both produce an `ApiResponse`, so clients always see
//! `{ "success": bool, "message": string, "data"?: ..., "count"?: n }` regardless
//! of whether the request succeeded.

use actix_web::{http::StatusCode, HttpResponse, HttpResponseBuilder};
use serde::{Deserialize, Serialize};

/// Outcome classification handed to the HTTP layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Ok,
    Created,
    BadRequest,
    Unauthorized,
    Forbidden,
    NotFound,
    ServerError,
}

impl StatusKind {
    pub fn status_code(self) -> StatusCode {
        match self {
            StatusKind::Ok => StatusCode::OK,
            StatusKind::Created => StatusCode::CREATED,
            StatusKind::BadRequest => StatusCode::BAD_REQUEST,
            StatusKind::Unauthorized => StatusCode::UNAUTHORIZED,
            StatusKind::Forbidden => StatusCode::FORBIDDEN,
            StatusKind::NotFound => StatusCode::NOT_FOUND,
            StatusKind::ServerError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            count: None,
            data: Some(data),
        }
    }

    pub fn with_count(mut self, count: usize) -> Self {
        self.count = Some(count);
        self
    }

    /// Serializes the envelope with the status code `kind` maps to.
    pub fn respond(&self, kind: StatusKind) -> HttpResponse {
        HttpResponseBuilder::new(kind.status_code()).json(self)
    }
}

impl ApiResponse<()> {
    /// A successful response that carries no payload.
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            count: None,
            data: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            count: None,
            data: None,
        }
    }
}

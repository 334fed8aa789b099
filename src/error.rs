//!
//! # Custom Error Handling
//!
//! This module defines the custom error type `AppError` used throughout the application.
//! Every failure the auth core can produce maps onto one variant, and every variant maps
//! onto one `StatusKind` of the response envelope.
//!
//! `AppError` implements `actix_web::error::ResponseError`, so handlers can return
//! `Result<_, AppError>` and let `?` do the rest. Server-side failures are logged here
//! and reported to the client with a generic message only.

use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use std::fmt;
use validator::ValidationErrors;

use crate::response::{ApiResponse, StatusKind};

const GENERIC_SERVER_ERROR: &str = "Internal server error";

/// Represents all possible errors that can occur within the application.
#[derive(Debug)]
pub enum AppError {
    /// Missing, malformed, invalid or expired token (HTTP 401).
    Unauthorized(String),
    /// Valid identity without the required role (HTTP 403).
    Forbidden(String),
    /// Request could not be understood, e.g. malformed JSON (HTTP 400).
    BadRequest(String),
    /// Request body failed field validation (HTTP 400).
    ValidationError(String),
    /// Registration with an email that already belongs to an identity (HTTP 400).
    EmailTaken,
    /// Unknown email or wrong password; the two are never distinguished (HTTP 401).
    InvalidCredentials,
    /// Missing resource, or one the caller may not see (HTTP 404).
    NotFound(String),
    /// Unexpected server-side failure (HTTP 500).
    InternalServerError(String),
    /// Storage failure (HTTP 500).
    DatabaseError(String),
}

impl AppError {
    pub fn kind(&self) -> StatusKind {
        match self {
            AppError::Unauthorized(_) | AppError::InvalidCredentials => StatusKind::Unauthorized,
            AppError::Forbidden(_) => StatusKind::Forbidden,
            AppError::BadRequest(_) | AppError::ValidationError(_) | AppError::EmailTaken => {
                StatusKind::BadRequest
            }
            AppError::NotFound(_) => StatusKind::NotFound,
            AppError::InternalServerError(_) | AppError::DatabaseError(_) => {
                StatusKind::ServerError
            }
        }
    }

    /// The message that is safe to show to the caller.
    pub fn client_message(&self) -> String {
        match self {
            AppError::Unauthorized(msg)
            | AppError::Forbidden(msg)
            | AppError::BadRequest(msg)
            | AppError::ValidationError(msg)
            | AppError::NotFound(msg) => msg.clone(),
            AppError::EmailTaken => "Email already registered".into(),
            AppError::InvalidCredentials => "Invalid credentials".into(),
            AppError::InternalServerError(_) | AppError::DatabaseError(_) => {
                GENERIC_SERVER_ERROR.into()
            }
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AppError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            AppError::Forbidden(msg) => write!(f, "Forbidden: {}", msg),
            AppError::BadRequest(msg) => write!(f, "Bad Request: {}", msg),
            AppError::ValidationError(msg) => write!(f, "Validation Error: {}", msg),
            AppError::EmailTaken => write!(f, "Email already registered"),
            AppError::InvalidCredentials => write!(f, "Invalid credentials"),
            AppError::NotFound(msg) => write!(f, "Not Found: {}", msg),
            AppError::InternalServerError(msg) => write!(f, "Internal Server Error: {}", msg),
            AppError::DatabaseError(msg) => write!(f, "Database Error: {}", msg),
        }
    }
}

/// Converts `AppError` variants into enveloped `HttpResponse` objects.
impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        self.kind().status_code()
    }

    fn error_response(&self) -> HttpResponse {
        if self.kind() == StatusKind::ServerError {
            log::error!("{}", self);
        }
        ApiResponse::failure(self.client_message()).respond(self.kind())
    }
}

/// `RowNotFound` becomes `NotFound`; everything else is a storage failure.
impl From<sqlx::Error> for AppError {
    fn from(error: sqlx::Error) -> AppError {
        match error {
            sqlx::Error::RowNotFound => AppError::NotFound("Record not found".into()),
            _ => AppError::DatabaseError(error.to_string()),
        }
    }
}

/// One `field: reason` entry per invalid field. Submitted values are never echoed.
impl From<ValidationErrors> for AppError {
    fn from(error: ValidationErrors) -> AppError {
        let mut fields: Vec<_> = error.field_errors().into_iter().collect();
        fields.sort_by_key(|(field, _)| *field);

        let message = fields
            .iter()
            .map(|(field, errors)| {
                let reasons: Vec<String> = errors
                    .iter()
                    .map(|e| match &e.message {
                        Some(message) => message.to_string(),
                        None => format!("invalid {}", e.code),
                    })
                    .collect();
                format!("{}: {}", field, reasons.join(", "))
            })
            .collect::<Vec<_>>()
            .join("; ");

        if message.is_empty() {
            AppError::ValidationError("Validation failed".into())
        } else {
            AppError::ValidationError(message)
        }
    }
}

/// Token failures never expose which check failed.
impl From<jsonwebtoken::errors::Error> for AppError {
    fn from(error: jsonwebtoken::errors::Error) -> AppError {
        log::debug!("token rejected: {}", error);
        AppError::Unauthorized("Invalid or expired token".into())
    }
}

impl From<bcrypt::BcryptError> for AppError {
    fn from(error: bcrypt::BcryptError) -> AppError {
        AppError::InternalServerError(format!("password hashing failed: {}", error))
    }
}

impl From<actix_web::error::BlockingError> for AppError {
    fn from(error: actix_web::error::BlockingError) -> AppError {
        AppError::InternalServerError(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_responses() {
        let error = AppError::Unauthorized("Invalid token".into());
        assert_eq!(error.error_response().status(), 401);

        let error = AppError::Forbidden("Admins only".into());
        assert_eq!(error.error_response().status(), 403);

        let error = AppError::BadRequest("Invalid input".into());
        assert_eq!(error.error_response().status(), 400);

        assert_eq!(AppError::EmailTaken.error_response().status(), 400);
        assert_eq!(AppError::InvalidCredentials.error_response().status(), 401);

        let error = AppError::NotFound("Task not found".into());
        assert_eq!(error.error_response().status(), 404);

        let error = AppError::InternalServerError("Server error".into());
        assert_eq!(error.error_response().status(), 500);
    }

    #[test]
    fn test_server_errors_hide_detail() {
        let error = AppError::DatabaseError("relation \"tasks\" does not exist".into());
        assert_eq!(error.client_message(), GENERIC_SERVER_ERROR);
        assert!(error.to_string().contains("relation"));
    }

    #[test]
    fn test_validation_message_omits_submitted_values() {
        let mut errors = ValidationErrors::new();
        let mut too_short = validator::ValidationError::new("length");
        too_short.add_param("value".into(), &"hunter2-secret");
        too_short.add_param("min".into(), &6);
        errors.add("password", too_short);

        let mut bad_email = validator::ValidationError::new("email");
        bad_email.message = Some("Invalid email address".into());
        errors.add("email", bad_email);

        let error: AppError = errors.into();
        let message = error.client_message();
        assert_eq!(message, "email: Invalid email address; password: invalid length");
        assert!(!message.contains("hunter2-secret"));
        assert_eq!(error.kind(), StatusKind::BadRequest);
    }

    #[test]
    fn test_row_not_found_maps_to_not_found() {
        let error: AppError = sqlx::Error::RowNotFound.into();
        assert_eq!(error.kind(), StatusKind::NotFound);
    }
}

pub mod auth;
pub mod health;
pub mod tasks;
pub mod users;

use actix_web::{web, HttpResponse};

use crate::error::AppError;
use crate::response::{ApiResponse, StatusKind};

/// Mounts everything that lives under `/api/v1`.
///
/// Malformed JSON bodies and unparsable path ids are answered with the same
/// envelope as every other error. A bad path id can never name a visible record,
/// so it is reported as not found.
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default()
            .error_handler(|err, _req| AppError::BadRequest(err.to_string()).into()),
    )
    .app_data(
        web::PathConfig::default()
            .error_handler(|_err, _req| AppError::NotFound("Resource not found".into()).into()),
    )
    .service(
        web::scope("/auth")
            .service(auth::login)
            .service(auth::register)
            .service(auth::me),
    )
    .service(
        web::scope("/tasks")
            .service(tasks::get_tasks)
            .service(tasks::create_task)
            .service(tasks::get_task)
            .service(tasks::update_task)
            .service(tasks::delete_task),
    )
    .service(
        web::scope("/users")
            .service(users::list_users)
            .service(users::delete_user),
    );
}

/// Fallback for unknown routes.
pub async fn not_found() -> HttpResponse {
    ApiResponse::failure("Route not found").respond(StatusKind::NotFound)
}

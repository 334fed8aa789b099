use actix_web::{get, Responder};
use chrono::Utc;
use serde_json::json;

use crate::response::{ApiResponse, StatusKind};

/// Health check endpoint
///
/// Returns the current status of the API and timestamp.
#[get("/health")]
pub async fn health() -> impl Responder {
    ApiResponse::success(
        "Server is running",
        json!({
            "status": "ok",
            "timestamp": Utc::now()
        }),
    )
    .respond(StatusKind::Ok)
}

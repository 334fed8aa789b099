#![allow(dead_code)]

use actix_web::body::MessageBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::{header, StatusCode};
use actix_web::middleware::Logger;
use actix_web::{test, web, App};
use chrono::Duration;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use std::sync::Arc;

use taskguard::auth::{AuthMiddleware, AuthResponse, CredentialStore, TokenService};
use taskguard::response::ApiResponse;
use taskguard::routes::{self, health};
use taskguard::store::MemoryStore;
use taskguard::AppState;

pub const TEST_SECRET: &[u8] = b"integration-test-secret";

pub fn test_state() -> AppState {
    AppState::new(
        Arc::new(MemoryStore::new()),
        TokenService::new(TEST_SECRET, Duration::hours(1)),
        // Lowest cost bcrypt accepts; keeps the suite fast.
        CredentialStore::new(4).expect("bcrypt cost 4 is valid"),
    )
}

/// The same app `main` builds, over an in-memory store.
pub async fn init_app(
    state: AppState,
) -> impl Service<
    actix_http::Request,
    Response = ServiceResponse<impl MessageBody>,
    Error = actix_web::Error,
> {
    test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .wrap(Logger::default())
            .service(health::health)
            .service(
                web::scope("/api/v1")
                    .wrap(AuthMiddleware)
                    .configure(routes::config),
            )
            .default_service(web::to(routes::not_found)),
    )
    .await
}

pub fn bearer(token: &str) -> (header::HeaderName, String) {
    (header::AUTHORIZATION, format!("Bearer {}", token))
}

/// Sends a request and returns the status with the parsed JSON body.
pub async fn send(
    app: &impl Service<
        actix_http::Request,
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
    >,
    req: test::TestRequest,
) -> (StatusCode, Value) {
    let resp = test::call_service(app, req.to_request()).await;
    let status = resp.status();
    let body = test::read_body(resp).await;
    let json = serde_json::from_slice(&body).unwrap_or_else(|e| {
        panic!(
            "response was not JSON ({}): {:?}",
            e,
            String::from_utf8_lossy(&body)
        )
    });
    (status, json)
}

/// Pulls `data` out of a successful envelope.
pub fn data<T: DeserializeOwned>(body: Value) -> T {
    let envelope: ApiResponse<T> =
        serde_json::from_value(body).expect("body is not an ApiResponse envelope");
    assert!(envelope.success, "envelope reports failure: {}", envelope.message);
    envelope.data.expect("envelope has no data")
}

pub async fn register(
    app: &impl Service<
        actix_http::Request,
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
    >,
    name: &str,
    email: &str,
    role: Option<&str>,
) -> AuthResponse {
    let mut payload = json!({
        "name": name,
        "email": email,
        "password": "Password123!"
    });
    if let Some(role) = role {
        payload["role"] = json!(role);
    }

    let (status, body) = send(
        app,
        test::TestRequest::post()
            .uri("/api/v1/auth/register")
            .set_json(&payload),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "registration failed: {}", body);
    data(body)
}

pub async fn login(
    app: &impl Service<
        actix_http::Request,
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
    >,
    email: &str,
) -> AuthResponse {
    let (status, body) = send(
        app,
        test::TestRequest::post()
            .uri("/api/v1/auth/login")
            .set_json(&json!({ "email": email, "password": "Password123!" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "login failed: {}", body);
    data(body)
}

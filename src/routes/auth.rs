use crate::{
    auth::{service, AuthenticatedUser, LoginRequest, RegisterRequest},
    error::AppError,
    response::{ApiResponse, StatusKind},
    state::AppState,
};
use actix_web::{get, post, web, Responder};
use validator::Validate;

/// Register a new user
///
/// Creates a new identity and returns it together with an authentication token.
///
/// ## Responses:
/// - `201 Created`: `{ user, token }`.
/// - `400 Bad Request`: invalid payload, or the email is already registered.
#[post("/register")]
pub async fn register(
    state: web::Data<AppState>,
    register_data: web::Json<RegisterRequest>,
) -> Result<impl Responder, AppError> {
    register_data.validate()?;

    let response = service::register(&state, register_data.into_inner()).await?;

    Ok(ApiResponse::success("User registered successfully", response).respond(StatusKind::Created))
}

/// Login user
///
/// ## Responses:
/// - `200 OK`: `{ user, token }`.
/// - `400 Bad Request`: invalid payload.
/// - `401 Unauthorized`: unknown email or wrong password, indistinguishably.
#[post("/login")]
pub async fn login(
    state: web::Data<AppState>,
    login_data: web::Json<LoginRequest>,
) -> Result<impl Responder, AppError> {
    login_data.validate()?;

    let response = service::login(&state, login_data.into_inner()).await?;

    Ok(ApiResponse::success("Login successful", response).respond(StatusKind::Ok))
}

/// Profile of the identity the token belongs to.
#[get("/me")]
pub async fn me(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    let identity = user.0;
    let profile = state
        .users
        .find_by_id(identity.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".into()))?;

    Ok(ApiResponse::success("Profile retrieved successfully", profile).respond(StatusKind::Ok))
}

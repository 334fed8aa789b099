//! Registration and login: the only places credentials and tokens are minted.

use actix_web::web;

use crate::auth::{AuthResponse, LoginRequest, RegisterRequest};
use crate::error::AppError;
use crate::models::{normalize_email, NewUser, Role};
use crate::state::AppState;

/// Creates an identity and returns it with a freshly issued token.
///
/// Any registrant may request `role: admin`; the request is honoured and logged.
pub async fn register(state: &AppState, request: RegisterRequest) -> Result<AuthResponse, AppError> {
    let email = normalize_email(&request.email);
    let role = request.role.unwrap_or_default();

    let credentials = state.credentials.clone();
    let password = request.password;
    // Keep bcrypt off the async workers.
    let password_hash = web::block(move || credentials.hash(&password)).await??;

    let user = state
        .users
        .insert(NewUser {
            name: request.name.trim().to_string(),
            email,
            password_hash,
            role,
        })
        .await?;

    if role == Role::Admin {
        log::warn!("user {} self-registered with the admin role", user.id);
    } else {
        log::info!("user {} registered", user.id);
    }

    let token = state.tokens.issue(user.id, user.role)?;
    Ok(AuthResponse { user, token })
}

/// Exchanges credentials for a token.
///
/// Unknown email and wrong password fail identically with
/// `AppError::InvalidCredentials`, and both pay for one bcrypt verification.
pub async fn login(state: &AppState, request: LoginRequest) -> Result<AuthResponse, AppError> {
    let email = normalize_email(&request.email);
    let record = state.users.find_by_email(&email).await?;

    let credentials = state.credentials.clone();
    let password = request.password;
    let stored_hash = record.as_ref().map(|r| r.password_hash.clone());
    let matches = web::block(move || match stored_hash {
        Some(hash) => credentials.verify(&password, &hash),
        None => credentials.verify_absent(&password),
    })
    .await?;

    match record {
        Some(record) if matches => {
            let token = state.tokens.issue(record.user.id, record.user.role)?;
            log::info!("user {} logged in", record.user.id);
            Ok(AuthResponse {
                user: record.user,
                token,
            })
        }
        _ => {
            log::warn!("failed login attempt");
            Err(AppError::InvalidCredentials)
        }
    }
}

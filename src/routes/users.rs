use crate::{
    auth::{require_role, AuthenticatedUser},
    error::AppError,
    models::Role,
    response::{ApiResponse, StatusKind},
    state::AppState,
};
use actix_web::{delete, get, web, Responder};

/// Lists every identity. Admin only.
#[get("")]
pub async fn list_users(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    require_role(&user.0, &[Role::Admin])?;

    let users = state.users.list().await?;
    let count = users.len();

    Ok(ApiResponse::success("Users retrieved successfully", users)
        .with_count(count)
        .respond(StatusKind::Ok))
}

/// Deletes an identity and, with it, every task it owns. Admin only.
///
/// Tokens already issued to the deleted identity stay valid until they expire,
/// but no longer resolve to any data.
#[delete("/{id}")]
pub async fn delete_user(
    state: web::Data<AppState>,
    user_id: web::Path<i32>,
    user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    require_role(&user.0, &[Role::Admin])?;

    let user_id = user_id.into_inner();
    if !state.users.delete(user_id).await? {
        return Err(AppError::NotFound("User not found".into()));
    }
    log::info!("admin {} deleted user {}", user.0.user_id, user_id);

    Ok(ApiResponse::message("User deleted successfully").respond(StatusKind::Ok))
}

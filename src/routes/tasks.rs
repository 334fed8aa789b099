use crate::{
    auth::AuthenticatedUser,
    error::AppError,
    models::{TaskChanges, TaskInput},
    policy::TaskScope,
    response::{ApiResponse, StatusKind},
    state::AppState,
};
use actix_web::{delete, get, post, route, web, Responder};
use uuid::Uuid;
use validator::Validate;

fn task_not_found() -> AppError {
    AppError::NotFound("Task not found".into())
}

/// Lists the tasks visible to the caller.
///
/// Users see their own tasks; admins see every task, annotated with `owner_name`.
/// Tasks are ordered by creation date in descending order.
///
/// ## Responses:
/// - `200 OK`: envelope with `count` and an array of tasks.
/// - `401 Unauthorized`: missing or invalid token.
#[get("")]
pub async fn get_tasks(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    let scope = TaskScope::for_identity(&user.0);
    let tasks = state.tasks.list_visible(scope).await?;
    let count = tasks.len();

    Ok(ApiResponse::success("Tasks retrieved successfully", tasks)
        .with_count(count)
        .respond(StatusKind::Ok))
}

/// Creates a new task owned by the caller.
///
/// ## Request Body:
/// - `title`: required, 1 to 200 characters.
/// - `description` (optional): up to 1000 characters.
/// - `status` (optional): `pending`, `in-progress` or `completed`. Defaults to `pending`.
///
/// ## Responses:
/// - `201 Created`: the new task.
/// - `400 Bad Request`: invalid payload.
/// - `401 Unauthorized`: missing or invalid token.
#[post("")]
pub async fn create_task(
    state: web::Data<AppState>,
    task_data: web::Json<TaskInput>,
    user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    task_data.validate()?;

    let task = state
        .tasks
        .create(task_data.into_inner(), user.0.user_id)
        .await?;
    log::debug!("user {} created task {}", user.0.user_id, task.id);

    Ok(ApiResponse::success("Task created successfully", task).respond(StatusKind::Created))
}

/// Retrieves a specific task by its ID.
///
/// ## Responses:
/// - `200 OK`: the task.
/// - `404 Not Found`: the task does not exist or is not visible to the caller.
#[get("/{id}")]
pub async fn get_task(
    state: web::Data<AppState>,
    task_id: web::Path<Uuid>,
    user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    let scope = TaskScope::for_identity(&user.0);
    let task = state
        .tasks
        .get_visible(task_id.into_inner(), scope)
        .await?
        .ok_or_else(task_not_found)?;

    Ok(ApiResponse::success("Task retrieved successfully", task).respond(StatusKind::Ok))
}

/// Updates an existing task. Omitted fields keep their current value.
///
/// The ownership scope is part of the update statement itself: a task the caller
/// may not modify is never matched, and the caller sees `404`.
///
/// ## Responses:
/// - `200 OK`: the updated task.
/// - `400 Bad Request`: invalid payload or no fields supplied.
/// - `404 Not Found`: the task does not exist or is not visible to the caller.
#[route("/{id}", method = "PUT", method = "PATCH")]
pub async fn update_task(
    state: web::Data<AppState>,
    task_id: web::Path<Uuid>,
    task_data: web::Json<TaskChanges>,
    user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    task_data.validate()?;
    if task_data.is_empty() {
        return Err(AppError::ValidationError(
            "At least one of title, description or status is required".into(),
        ));
    }

    let scope = TaskScope::for_identity(&user.0);
    let task = state
        .tasks
        .update_visible(task_id.into_inner(), &task_data, scope)
        .await?
        .ok_or_else(task_not_found)?;

    Ok(ApiResponse::success("Task updated successfully", task).respond(StatusKind::Ok))
}

/// Deletes a task by its ID.
///
/// ## Responses:
/// - `200 OK`: the task was deleted.
/// - `404 Not Found`: the task does not exist or is not visible to the caller.
#[delete("/{id}")]
pub async fn delete_task(
    state: web::Data<AppState>,
    task_id: web::Path<Uuid>,
    user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    let scope = TaskScope::for_identity(&user.0);
    if !state
        .tasks
        .delete_visible(task_id.into_inner(), scope)
        .await?
    {
        return Err(task_not_found());
    }

    Ok(ApiResponse::message("Task deleted successfully").respond(StatusKind::Ok))
}

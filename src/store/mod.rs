//! Storage collaborators for identities and tasks.
//!
//! Both repositories are object-safe traits so the HTTP layer can hold them as
//! `Arc<dyn ...>` and tests can swap Postgres for the in-process store.
//! Every task operation except `create` takes a `TaskScope` and must apply it
//! in the same step that reads or mutates the row.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::{NewUser, Task, TaskChanges, TaskInput, TaskView, User, UserRecord};
use crate::policy::TaskScope;

pub use memory::MemoryStore;
pub use postgres::PgStore;

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Fails with `AppError::EmailTaken` when the email is already in use.
    async fn insert(&self, user: NewUser) -> Result<User, AppError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, AppError>;

    async fn find_by_id(&self, id: i32) -> Result<Option<User>, AppError>;

    /// Newest first.
    async fn list(&self) -> Result<Vec<User>, AppError>;

    /// Removes the identity and every task it owns. `false` if no such identity.
    async fn delete(&self, id: i32) -> Result<bool, AppError>;
}

#[async_trait]
pub trait TaskRepository: Send + Sync {
    async fn create(&self, input: TaskInput, owner_id: i32) -> Result<Task, AppError>;

    /// Most recently created first.
    async fn list_visible(&self, scope: TaskScope) -> Result<Vec<TaskView>, AppError>;

    /// `None` both when the task does not exist and when `scope` excludes it.
    async fn get_visible(&self, id: Uuid, scope: TaskScope)
        -> Result<Option<TaskView>, AppError>;

    async fn update_visible(
        &self,
        id: Uuid,
        changes: &TaskChanges,
        scope: TaskScope,
    ) -> Result<Option<Task>, AppError>;

    async fn delete_visible(&self, id: Uuid, scope: TaskScope) -> Result<bool, AppError>;
}

/// The owner vanished between token issuance and this request.
pub(crate) fn missing_owner() -> AppError {
    AppError::Unauthorized("Account no longer exists".into())
}

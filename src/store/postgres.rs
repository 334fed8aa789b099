use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgPoolOptions};
use uuid::Uuid;

use crate::error::AppError;
use crate::models::{NewUser, Task, TaskChanges, TaskInput, TaskView, User, UserRecord};
use crate::policy::TaskScope;
use crate::store::{missing_owner, TaskRepository, UserRepository};

const UNIQUE_VIOLATION: &str = "23505";
const FOREIGN_KEY_VIOLATION: &str = "23503";

const TASK_COLUMNS: &str = "id, title, description, status, user_id, created_at, updated_at";

// Owner name is only selected for unrestricted scopes; `$1` is the owner filter.
const VISIBLE_TASKS: &str = "SELECT t.id, t.title, t.description, t.status, t.user_id, t.created_at, t.updated_at, \
            CASE WHEN $1::int IS NULL THEN u.name END AS owner_name \
     FROM tasks t JOIN users u ON u.id = t.user_id \
     WHERE ($1::int IS NULL OR t.user_id = $1)";

fn db_error_code(error: &sqlx::Error) -> Option<String> {
    match error {
        sqlx::Error::Database(db) => db.code().map(|code| code.into_owned()),
        _ => None,
    }
}

/// Postgres-backed storage. Ownership scopes become part of each statement's
/// `WHERE` clause, so scoped updates and deletes are single atomic statements.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, AppError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;
        Ok(Self::new(pool))
    }

    /// Applies the embedded migrations under `migrations/`.
    pub async fn migrate(&self) -> Result<(), AppError> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(format!("migration failed: {}", e)))
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl UserRepository for PgStore {
    async fn insert(&self, user: NewUser) -> Result<User, AppError> {
        let result = sqlx::query_as::<_, User>(
            "INSERT INTO users (name, email, password_hash, role) VALUES ($1, $2, $3, $4) \
             RETURNING id, name, email, role, created_at",
        )
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.role)
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(user) => Ok(user),
            Err(e) if db_error_code(&e).as_deref() == Some(UNIQUE_VIOLATION) => {
                Err(AppError::EmailTaken)
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, AppError> {
        let record = sqlx::query_as::<_, UserRecord>(
            "SELECT id, name, email, role, created_at, password_hash FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(record)
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, name, email, role, created_at FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn list(&self) -> Result<Vec<User>, AppError> {
        let users = sqlx::query_as::<_, User>(
            "SELECT id, name, email, role, created_at FROM users ORDER BY created_at DESC, id DESC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(users)
    }

    async fn delete(&self, id: i32) -> Result<bool, AppError> {
        // tasks.user_id is ON DELETE CASCADE
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl TaskRepository for PgStore {
    async fn create(&self, input: TaskInput, owner_id: i32) -> Result<Task, AppError> {
        let task = Task::new(input, owner_id);

        let result = sqlx::query_as::<_, Task>(&format!(
            "INSERT INTO tasks (id, title, description, status, user_id) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {}",
            TASK_COLUMNS
        ))
        .bind(task.id)
        .bind(&task.title)
        .bind(&task.description)
        .bind(task.status)
        .bind(task.user_id)
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(task) => Ok(task),
            Err(e) if db_error_code(&e).as_deref() == Some(FOREIGN_KEY_VIOLATION) => {
                Err(missing_owner())
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn list_visible(&self, scope: TaskScope) -> Result<Vec<TaskView>, AppError> {
        let tasks = sqlx::query_as::<_, TaskView>(&format!(
            "{} ORDER BY t.created_at DESC",
            VISIBLE_TASKS
        ))
        .bind(scope.owner_filter())
        .fetch_all(&self.pool)
        .await?;
        Ok(tasks)
    }

    async fn get_visible(
        &self,
        id: Uuid,
        scope: TaskScope,
    ) -> Result<Option<TaskView>, AppError> {
        let task = sqlx::query_as::<_, TaskView>(&format!("{} AND t.id = $2", VISIBLE_TASKS))
            .bind(scope.owner_filter())
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(task)
    }

    async fn update_visible(
        &self,
        id: Uuid,
        changes: &TaskChanges,
        scope: TaskScope,
    ) -> Result<Option<Task>, AppError> {
        let task = sqlx::query_as::<_, Task>(&format!(
            "UPDATE tasks SET \
                title = COALESCE($1, title), \
                description = COALESCE($2, description), \
                status = COALESCE($3, status), \
                updated_at = GREATEST(NOW(), updated_at + INTERVAL '1 microsecond') \
             WHERE id = $4 AND ($5::int IS NULL OR user_id = $5) \
             RETURNING {}",
            TASK_COLUMNS
        ))
        .bind(changes.title.as_deref().map(str::trim))
        .bind(changes.description.as_deref().map(str::trim))
        .bind(changes.status)
        .bind(id)
        .bind(scope.owner_filter())
        .fetch_optional(&self.pool)
        .await?;
        Ok(task)
    }

    async fn delete_visible(&self, id: Uuid, scope: TaskScope) -> Result<bool, AppError> {
        let result =
            sqlx::query("DELETE FROM tasks WHERE id = $1 AND ($2::int IS NULL OR user_id = $2)")
                .bind(id)
                .bind(scope.owner_filter())
                .execute(&self.pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }
}

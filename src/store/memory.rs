use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::{NewUser, Task, TaskChanges, TaskInput, TaskView, User, UserRecord};
use crate::policy::TaskScope;
use crate::store::{missing_owner, TaskRepository, UserRepository};

#[derive(Default)]
struct Tables {
    users: Vec<UserRecord>,
    // Insertion order; newest last.
    tasks: Vec<Task>,
    last_user_id: i32,
}

impl Tables {
    fn owner_names(&self) -> HashMap<i32, String> {
        self.users
            .iter()
            .map(|record| (record.user.id, record.user.name.clone()))
            .collect()
    }

    fn view(&self, task: &Task, scope: TaskScope, names: &HashMap<i32, String>) -> TaskView {
        TaskView {
            task: task.clone(),
            owner_name: scope
                .annotates_owner()
                .then(|| names.get(&task.user_id).cloned())
                .flatten(),
        }
    }
}

/// In-process storage with the same contract as `PgStore`.
///
/// One lock covers both tables. Scoped mutations match and modify under a single
/// write guard, which gives the same atomicity as a filtered `UPDATE`/`DELETE`.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn insert(&self, user: NewUser) -> Result<User, AppError> {
        let mut tables = self.tables.write().await;
        if tables.users.iter().any(|r| r.user.email == user.email) {
            return Err(AppError::EmailTaken);
        }

        tables.last_user_id += 1;
        let created = User {
            id: tables.last_user_id,
            name: user.name,
            email: user.email,
            role: user.role,
            created_at: Utc::now(),
        };
        tables.users.push(UserRecord {
            user: created.clone(),
            password_hash: user.password_hash,
        });
        Ok(created)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .iter()
            .find(|r| r.user.email == email)
            .cloned())
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<User>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .iter()
            .find(|r| r.user.id == id)
            .map(|r| r.user.clone()))
    }

    async fn list(&self) -> Result<Vec<User>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables.users.iter().rev().map(|r| r.user.clone()).collect())
    }

    async fn delete(&self, id: i32) -> Result<bool, AppError> {
        let mut tables = self.tables.write().await;
        let before = tables.users.len();
        tables.users.retain(|r| r.user.id != id);
        if tables.users.len() == before {
            return Ok(false);
        }
        tables.tasks.retain(|task| task.user_id != id);
        Ok(true)
    }
}

#[async_trait]
impl TaskRepository for MemoryStore {
    async fn create(&self, input: TaskInput, owner_id: i32) -> Result<Task, AppError> {
        let mut tables = self.tables.write().await;
        if !tables.users.iter().any(|r| r.user.id == owner_id) {
            return Err(missing_owner());
        }
        let task = Task::new(input, owner_id);
        tables.tasks.push(task.clone());
        Ok(task)
    }

    async fn list_visible(&self, scope: TaskScope) -> Result<Vec<TaskView>, AppError> {
        let tables = self.tables.read().await;
        let names = tables.owner_names();
        let mut visible: Vec<TaskView> = tables
            .tasks
            .iter()
            .rev()
            .filter(|task| scope.admits(task))
            .map(|task| tables.view(task, scope, &names))
            .collect();
        // Stable, so equal timestamps keep newest-inserted first.
        visible.sort_by(|a, b| b.task.created_at.cmp(&a.task.created_at));
        Ok(visible)
    }

    async fn get_visible(
        &self,
        id: Uuid,
        scope: TaskScope,
    ) -> Result<Option<TaskView>, AppError> {
        let tables = self.tables.read().await;
        let names = tables.owner_names();
        Ok(tables
            .tasks
            .iter()
            .find(|task| task.id == id && scope.admits(task))
            .map(|task| tables.view(task, scope, &names)))
    }

    async fn update_visible(
        &self,
        id: Uuid,
        changes: &TaskChanges,
        scope: TaskScope,
    ) -> Result<Option<Task>, AppError> {
        let mut tables = self.tables.write().await;
        let Some(task) = tables
            .tasks
            .iter_mut()
            .find(|task| task.id == id && scope.admits(task))
        else {
            return Ok(None);
        };
        changes.apply_to(task, Utc::now());
        Ok(Some(task.clone()))
    }

    async fn delete_visible(&self, id: Uuid, scope: TaskScope) -> Result<bool, AppError> {
        let mut tables = self.tables.write().await;
        let before = tables.tasks.len();
        tables
            .tasks
            .retain(|task| !(task.id == id && scope.admits(task)));
        Ok(tables.tasks.len() < before)
    }
}

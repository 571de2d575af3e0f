//! In-memory stores for exercising the router without PostgreSQL.

use async_trait::async_trait;
use time::OffsetDateTime;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::auth::repo::UserStore;
use crate::auth::repo_types::{PublicUser, User};
use crate::error::{AppError, AppResult};
use crate::tasks::repo::TaskStore;
use crate::tasks::repo_types::{Task, TaskPatch};

#[derive(Default)]
pub struct MemoryUserStore {
    users: RwLock<Vec<User>>,
}

impl MemoryUserStore {
    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }

    pub async fn remove(&self, id: Uuid) {
        self.users.write().await.retain(|u| u.id != id);
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.email == email).cloned())
    }

    async fn find_profile(&self, id: Uuid) -> AppResult<Option<PublicUser>> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.id == id).cloned().map(Into::into))
    }

    async fn create(&self, name: &str, email: &str, password_hash: &str) -> AppResult<User> {
        let mut users = self.users.write().await;
        if users.iter().any(|u| u.email == email) {
            return Err(AppError::DuplicateEmail);
        }
        let now = OffsetDateTime::now_utc();
        let user = User {
            id: Uuid::new_v4(),
            name: name.into(),
            email: email.into(),
            password_hash: password_hash.into(),
            created_at: now,
            updated_at: now,
        };
        users.push(user.clone());
        Ok(user)
    }
}

#[derive(Default)]
pub struct MemoryTaskStore {
    tasks: RwLock<Vec<Task>>,
}

impl MemoryTaskStore {
    pub async fn len(&self) -> usize {
        self.tasks.read().await.len()
    }

    pub async fn get(&self, id: Uuid) -> Option<Task> {
        self.tasks.read().await.iter().find(|t| t.id == id).cloned()
    }
}

fn owned_by(task: Option<&Task>, caller: Uuid) -> AppResult<()> {
    match task {
        None => Err(AppError::TaskNotFound),
        Some(t) if t.user_id != caller => Err(AppError::Forbidden),
        Some(_) => Ok(()),
    }
}

#[async_trait]
impl TaskStore for MemoryTaskStore {
    async fn list(&self, owner: Uuid) -> AppResult<Vec<Task>> {
        let tasks = self.tasks.read().await;
        Ok(tasks.iter().filter(|t| t.user_id == owner).cloned().collect())
    }

    async fn create(&self, owner: Uuid, title: &str) -> AppResult<Task> {
        let now = OffsetDateTime::now_utc();
        let task = Task {
            id: Uuid::new_v4(),
            title: title.into(),
            completed: false,
            user_id: owner,
            created_at: now,
            updated_at: now,
        };
        self.tasks.write().await.push(task.clone());
        Ok(task)
    }

    async fn update(&self, id: Uuid, caller: Uuid, patch: &TaskPatch) -> AppResult<Task> {
        let mut tasks = self.tasks.write().await;
        let slot = tasks.iter_mut().find(|t| t.id == id);
        owned_by(slot.as_deref(), caller)?;
        let task = slot.ok_or(AppError::TaskNotFound)?;
        patch.apply(task);
        task.updated_at = OffsetDateTime::now_utc();
        Ok(task.clone())
    }

    async fn delete(&self, id: Uuid, caller: Uuid) -> AppResult<()> {
        let mut tasks = self.tasks.write().await;
        owned_by(tasks.iter().find(|t| t.id == id), caller)?;
        tasks.retain(|t| t.id != id);
        Ok(())
    }
}

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::tasks::repo_types::{Task, TaskPatch};

/// Persistence for tasks, scoped by owner.
///
/// `update` and `delete` take the caller's id and fail with
/// [`AppError::TaskNotFound`] for unknown ids and [`AppError::Forbidden`]
/// for tasks owned by someone else.
#[async_trait]
pub trait TaskStore: Send + Sync {
    async fn list(&self, owner: Uuid) -> AppResult<Vec<Task>>;
    async fn create(&self, owner: Uuid, title: &str) -> AppResult<Task>;
    async fn update(&self, id: Uuid, caller: Uuid, patch: &TaskPatch) -> AppResult<Task>;
    async fn delete(&self, id: Uuid, caller: Uuid) -> AppResult<()>;
}

#[derive(Clone)]
pub struct PgTaskStore {
    db: PgPool,
}

impl PgTaskStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Explains why a `WHERE id = $1 AND user_id = $2` statement matched nothing.
    async fn ownership_miss(&self, id: Uuid) -> AppError {
        let owner = sqlx::query_scalar::<_, Uuid>(r#"SELECT user_id FROM tasks WHERE id = $1"#)
            .bind(id)
            .fetch_optional(&self.db)
            .await;
        match owner {
            Ok(Some(_)) => AppError::Forbidden,
            Ok(None) => AppError::TaskNotFound,
            Err(e) => e.into(),
        }
    }
}

#[async_trait]
impl TaskStore for PgTaskStore {
    async fn list(&self, owner: Uuid) -> AppResult<Vec<Task>> {
        let rows = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, title, completed, user_id, created_at, updated_at
            FROM tasks
            WHERE user_id = $1
            ORDER BY created_at ASC
            "#,
        )
        .bind(owner)
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }

    async fn create(&self, owner: Uuid, title: &str) -> AppResult<Task> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            INSERT INTO tasks (title, user_id)
            VALUES ($1, $2)
            RETURNING id, title, completed, user_id, created_at, updated_at
            "#,
        )
        .bind(title)
        .bind(owner)
        .fetch_one(&self.db)
        .await?;
        Ok(task)
    }

    async fn update(&self, id: Uuid, caller: Uuid, patch: &TaskPatch) -> AppResult<Task> {
        let updated = sqlx::query_as::<_, Task>(
            r#"
            UPDATE tasks
               SET title = COALESCE($3, title),
                   completed = COALESCE($4, completed),
                   updated_at = now()
             WHERE id = $1 AND user_id = $2
            RETURNING id, title, completed, user_id, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(caller)
        .bind(patch.title.as_deref())
        .bind(patch.completed)
        .fetch_optional(&self.db)
        .await?;

        match updated {
            Some(task) => Ok(task),
            None => Err(self.ownership_miss(id).await),
        }
    }

    async fn delete(&self, id: Uuid, caller: Uuid) -> AppResult<()> {
        let res = sqlx::query(r#"DELETE FROM tasks WHERE id = $1 AND user_id = $2"#)
            .bind(id)
            .bind(caller)
            .execute(&self.db)
            .await?;

        if res.rows_affected() == 0 {
            return Err(self.ownership_miss(id).await);
        }
        Ok(())
    }
}

use std::sync::Arc;

use sqlx::PgPool;

use crate::auth::repo::{PgUserStore, UserStore};
use crate::config::AppConfig;
use crate::tasks::repo::{PgTaskStore, TaskStore};

/// Shared handles passed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub users: Arc<dyn UserStore>,
    pub tasks: Arc<dyn TaskStore>,
}

impl AppState {
    /// Wire the PostgreSQL-backed stores onto `db`.
    pub fn postgres(db: PgPool, config: Arc<AppConfig>) -> Self {
        Self::from_parts(
            config,
            Arc::new(PgUserStore::new(db.clone())),
            Arc::new(PgTaskStore::new(db)),
        )
    }

    pub fn from_parts(
        config: Arc<AppConfig>,
        users: Arc<dyn UserStore>,
        tasks: Arc<dyn TaskStore>,
    ) -> Self {
        Self {
            config,
            users,
            tasks,
        }
    }
}

#[cfg(test)]
impl AppState {
    /// State backed by in-memory stores; the stores are returned for inspection.
    pub fn fake() -> (
        Self,
        Arc<crate::memory::MemoryUserStore>,
        Arc<crate::memory::MemoryTaskStore>,
    ) {
        let users = Arc::new(crate::memory::MemoryUserStore::default());
        let tasks = Arc::new(crate::memory::MemoryTaskStore::default());
        let state = Self::from_parts(
            Arc::new(AppConfig::for_tests()),
            users.clone(),
            tasks.clone(),
        );
        (state, users, tasks)
    }
}

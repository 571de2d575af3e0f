use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::repo_types::{PublicUser, User};
use crate::error::{AppError, AppResult};

/// Persistence for user credentials.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Find a user by email; `None` on miss.
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    /// Load a user by id without the password hash.
    async fn find_profile(&self, id: Uuid) -> AppResult<Option<PublicUser>>;

    /// Create a user. Fails with [`AppError::DuplicateEmail`] if the email is taken.
    async fn create(&self, name: &str, email: &str, password_hash: &str) -> AppResult<User>;
}

#[derive(Clone)]
pub struct PgUserStore {
    db: PgPool,
}

impl PgUserStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, password_hash, created_at, updated_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.db)
        .await?;
        Ok(user)
    }

    async fn find_profile(&self, id: Uuid) -> AppResult<Option<PublicUser>> {
        let user = sqlx::query_as::<_, PublicUser>(
            r#"
            SELECT id, name, email, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?;
        Ok(user)
    }

    async fn create(&self, name: &str, email: &str, password_hash: &str) -> AppResult<User> {
        let res = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (name, email, password_hash)
            VALUES ($1, $2, $3)
            RETURNING id, name, email, password_hash, created_at, updated_at
            "#,
        )
        .bind(name)
        .bind(email)
        .bind(password_hash)
        .fetch_one(&self.db)
        .await;

        match res {
            Ok(user) => Ok(user),
            // users_email_key lost a race with a concurrent registration
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                Err(AppError::DuplicateEmail)
            }
            Err(e) => Err(e.into()),
        }
    }
}

// Run with `DATABASE_URL=postgres://... cargo test -- --ignored`; sqlx::test
// gives each test a scratch database with the migrations applied.
#[cfg(test)]
mod pg_tests {
    use super::*;

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "needs DATABASE_URL pointing at PostgreSQL"]
    async fn second_registration_of_an_email_is_a_duplicate(db: PgPool) {
        let store = PgUserStore::new(db.clone());
        store.create("Ann", "a@x.com", "$argon2id$hash").await.unwrap();

        // bypasses the handler's pre-check; only the unique constraint stops it
        let err = store.create("Ann again", "a@x.com", "$argon2id$other").await.unwrap_err();
        assert!(matches!(err, AppError::DuplicateEmail), "{err:?}");

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&db)
            .await
            .unwrap();
        assert_eq!(count, 1);
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "needs DATABASE_URL pointing at PostgreSQL"]
    async fn profile_lookup_matches_the_stored_user(db: PgPool) {
        let store = PgUserStore::new(db);
        let user = store.create("Ann", "a@x.com", "$argon2id$hash").await.unwrap();

        let by_email = store.find_by_email("a@x.com").await.unwrap().unwrap();
        assert_eq!(by_email.id, user.id);
        assert_eq!(by_email.password_hash, "$argon2id$hash");

        let profile = store.find_profile(user.id).await.unwrap().unwrap();
        assert_eq!(profile, PublicUser::from(user));

        assert!(store.find_by_email("b@x.com").await.unwrap().is_none());
        assert!(store.find_profile(Uuid::new_v4()).await.unwrap().is_none());
    }
}

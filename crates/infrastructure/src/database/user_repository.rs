use async_trait::async_trait;
use domain::{DomainError, User, UserRepository};
use sqlx::{PgPool, Row};

/// PostgreSQL SQLSTATE for a unique-constraint violation.
const UNIQUE_VIOLATION: &str = "23505";

#[derive(Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn create(&self, user: &User) -> Result<(), DomainError> {
        let result = sqlx::query(
            r#"
            INSERT INTO users (user_id, email, username, password_hash, enabled)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(&user.user_id)
        .bind(&user.email)
        .bind(&user.username)
        .bind(&user.password_hash)
        .bind(user.enabled)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(sqlx::Error::Database(db_err))
                if db_err.code().as_deref() == Some(UNIQUE_VIOLATION) =>
            {
                Err(DomainError::DuplicateUser(user.email.clone()))
            }
            Err(e) => Err(DomainError::Store(format!("Database error: {}", e))),
        }
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        let row = sqlx::query(
            "SELECT user_id, email, username, password_hash, enabled FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::Store(format!("Database error: {}", e)))?;

        Ok(row.map(|r| User {
            user_id: r.get("user_id"),
            email: r.get("email"),
            username: r.get("username"),
            password_hash: r.get("password_hash"),
            enabled: r.get("enabled"),
        }))
    }
}

use chrono::Utc;
use domain::{DomainError, User, UserRepository};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

/// Validity window for issued session tokens.
const TOKEN_TTL_SECS: i64 = 3600;

/// bcrypt work factor for stored password hashes.
const HASH_COST: u32 = 10;

/// Claims embedded in a session token.
#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    iat: i64,
    exp: i64,
}

/// Outcome of a successful login.
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub token: String,
    pub username: String,
}

/// Registers operator accounts, authenticates logins and issues the signed
/// session tokens the ticket routes require.
pub struct AuthService {
    users: Arc<dyn UserRepository>,
    jwt_secret: String,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserRepository>, jwt_secret: impl Into<String>) -> Self {
        Self {
            users,
            jwt_secret: jwt_secret.into(),
        }
    }

    /// Create a new, disabled account. An administrator enables it out of
    /// band before the first login succeeds.
    pub async fn register(
        &self,
        email: &str,
        username: &str,
        password: &str,
    ) -> Result<(), DomainError> {
        if email.trim().is_empty() || username.trim().is_empty() || password.is_empty() {
            return Err(DomainError::Validation(
                "email, username and password are required".to_string(),
            ));
        }

        let password = password.to_string();
        let password_hash = tokio::task::spawn_blocking(move || bcrypt::hash(password, HASH_COST))
            .await
            .map_err(|e| DomainError::Store(format!("hashing task failed: {e}")))?
            .map_err(|e| DomainError::Store(format!("password hashing failed: {e}")))?;

        let user = User {
            user_id: Uuid::new_v4().to_string(),
            email: email.to_string(),
            username: username.to_string(),
            password_hash,
            enabled: false,
        };

        debug!(email = %user.email, "registering user");
        self.users.create(&user).await
    }

    /// Authenticate by email and password, issuing a 1-hour session token.
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginOutcome, DomainError> {
        let user = match self.users.find_by_email(email).await? {
            Some(user) => user,
            None => return Err(DomainError::InvalidCredentials),
        };

        let password = password.to_string();
        let hash = user.password_hash.clone();
        let verified = tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
            .await
            .map_err(|e| DomainError::Store(format!("hashing task failed: {e}")))?
            .unwrap_or(false);

        if !verified {
            return Err(DomainError::InvalidCredentials);
        }
        if !user.enabled {
            return Err(DomainError::AccountDisabled);
        }

        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: user.user_id,
            iat: now,
            exp: now + TOKEN_TTL_SECS,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_bytes()),
        )
        .map_err(|e| DomainError::Store(format!("token signing failed: {e}")))?;

        Ok(LoginOutcome {
            token,
            username: user.username,
        })
    }

    /// Verify a bearer token, returning the user id it was issued for.
    pub fn verify_token(&self, token: &str) -> Result<String, DomainError> {
        let data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_bytes()),
            &Validation::default(),
        )
        .map_err(|e| DomainError::Unauthenticated(e.to_string()))?;

        Ok(data.claims.sub)
    }
}

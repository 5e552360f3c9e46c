use crate::{DomainError, user::User};
use async_trait::async_trait;

/// Repository interface for user credential records.
///
/// Implementations are provided by the infrastructure layer.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Persist a new user. Fails with [`DomainError::DuplicateUser`] when the
    /// store rejects the email under its uniqueness constraint.
    async fn create(&self, user: &User) -> Result<(), DomainError>;

    /// Look up a user by login email.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError>;
}

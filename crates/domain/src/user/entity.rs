/// A registered operator account.
///
/// Accounts are created disabled; an administrator activates them directly in
/// the store before the first login is accepted. The record is never mutated
/// through the API after that.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub user_id: String,
    pub email: String,
    pub username: String,
    pub password_hash: String,
    pub enabled: bool,
}

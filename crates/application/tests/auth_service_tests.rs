use application::AuthService;
use domain::{DomainError, User, UserRepository};
use infrastructure::MemoryUserRepository;
use std::sync::Arc;

const SECRET: &str = "test-secret";

fn service_with_repo() -> (AuthService, Arc<MemoryUserRepository>) {
    let repo = Arc::new(MemoryUserRepository::new());
    let service = AuthService::new(repo.clone(), SECRET);
    (service, repo)
}

async fn seed_enabled_user(repo: &MemoryUserRepository, email: &str, password: &str) {
    // Low cost keeps the test fast; the service itself hashes at cost 10.
    let user = User {
        user_id: format!("user-{email}"),
        email: email.to_string(),
        username: "operador1".to_string(),
        password_hash: bcrypt::hash(password, 4).unwrap(),
        enabled: true,
    };
    repo.create(&user).await.unwrap();
}

#[tokio::test]
async fn register_stores_disabled_account_with_verifiable_hash() {
    let (service, repo) = service_with_repo();

    service
        .register("ana@example.com", "ana", "s3gredo")
        .await
        .unwrap();

    let user = repo
        .find_by_email("ana@example.com")
        .await
        .unwrap()
        .expect("user should be stored");

    assert!(!user.enabled, "accounts start disabled");
    assert_eq!(user.username, "ana");
    assert_ne!(user.password_hash, "s3gredo", "password must not be stored in the clear");
    assert!(bcrypt::verify("s3gredo", &user.password_hash).unwrap());
}

#[tokio::test]
async fn register_rejects_duplicate_email() {
    let (service, _repo) = service_with_repo();

    service
        .register("ana@example.com", "ana", "s3gredo")
        .await
        .unwrap();

    let err = service
        .register("ana@example.com", "outra", "senha")
        .await
        .unwrap_err();
    assert_eq!(err, DomainError::DuplicateUser("ana@example.com".to_string()));
}

#[tokio::test]
async fn register_requires_all_fields() {
    let (service, _repo) = service_with_repo();

    let err = service.register("", "ana", "senha").await.unwrap_err();
    assert!(matches!(err, DomainError::Validation(_)));

    let err = service
        .register("ana@example.com", "ana", "")
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Validation(_)));
}

#[tokio::test]
async fn login_with_unknown_email_or_wrong_password_is_rejected() {
    let (service, repo) = service_with_repo();
    seed_enabled_user(&repo, "ana@example.com", "s3gredo").await;

    let err = service.login("ninguem@example.com", "s3gredo").await.unwrap_err();
    assert_eq!(err, DomainError::InvalidCredentials);

    let err = service.login("ana@example.com", "errada").await.unwrap_err();
    assert_eq!(err, DomainError::InvalidCredentials);
}

#[tokio::test]
async fn login_with_correct_password_but_disabled_account_is_forbidden() {
    // GIVEN a freshly registered (therefore disabled) account
    let (service, _repo) = service_with_repo();
    service
        .register("ana@example.com", "ana", "s3gredo")
        .await
        .unwrap();

    // WHEN the correct password is presented
    let err = service.login("ana@example.com", "s3gredo").await.unwrap_err();

    // THEN no token is issued
    assert_eq!(err, DomainError::AccountDisabled);
}

#[tokio::test]
async fn login_issues_token_bound_to_the_user() {
    let (service, repo) = service_with_repo();
    seed_enabled_user(&repo, "ana@example.com", "s3gredo").await;

    let outcome = service.login("ana@example.com", "s3gredo").await.unwrap();
    assert_eq!(outcome.username, "operador1");

    let user_id = service.verify_token(&outcome.token).unwrap();
    assert_eq!(user_id, "user-ana@example.com");
}

#[tokio::test]
async fn verify_token_rejects_tampering_and_foreign_signatures() {
    let (service, repo) = service_with_repo();
    seed_enabled_user(&repo, "ana@example.com", "s3gredo").await;
    let outcome = service.login("ana@example.com", "s3gredo").await.unwrap();

    let mut tampered = outcome.token.clone();
    tampered.pop();
    assert!(matches!(
        service.verify_token(&tampered),
        Err(DomainError::Unauthenticated(_))
    ));

    let other = AuthService::new(Arc::new(MemoryUserRepository::new()), "other-secret");
    assert!(matches!(
        other.verify_token(&outcome.token),
        Err(DomainError::Unauthenticated(_))
    ));
}

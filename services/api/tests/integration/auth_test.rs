use std::time::Duration;

use uuid::Uuid;

use crm_api::error::ApiError;
use crm_api::usecase::auth::AuthenticateUseCase;
use crm_auth_types::token::{TokenValidator, issue_access_token};
use crm_domain::id::UserId;
use crm_domain::user::UserRole;
use crm_testing::auth::TEST_JWT_SECRET;

use crate::helpers::{MockUserRepo, test_user};

fn token_for(user_id: Uuid, secret: &str) -> String {
    issue_access_token(UserId(user_id), Duration::from_secs(3600), secret).unwrap()
}

fn usecase(users: MockUserRepo) -> AuthenticateUseCase<MockUserRepo> {
    AuthenticateUseCase {
        users,
        tokens: TokenValidator::hs256(TEST_JWT_SECRET),
    }
}

#[tokio::test]
async fn should_build_identity_for_active_user() {
    let user = test_user("manager", "active");
    let token = token_for(user.id, TEST_JWT_SECRET);

    let identity = usecase(MockUserRepo::new(vec![user.clone()]))
        .execute(&token)
        .await
        .unwrap();

    assert_eq!(identity.id.0, user.id);
    assert_eq!(identity.role, UserRole::Manager);
    assert_eq!(identity.company_id.map(|c| c.0), user.company_id);
    assert_eq!(identity.email, "rep@example.com");
}

#[tokio::test]
async fn should_reject_inactive_user() {
    let user = test_user("admin", "inactive");
    let token = token_for(user.id, TEST_JWT_SECRET);

    let result = usecase(MockUserRepo::new(vec![user])).execute(&token).await;
    assert!(
        matches!(result, Err(ApiError::Unauthorized)),
        "expected Unauthorized, got {result:?}"
    );
}

#[tokio::test]
async fn should_reject_unknown_subject() {
    let token = token_for(Uuid::new_v4(), TEST_JWT_SECRET);
    let result = usecase(MockUserRepo::new(vec![])).execute(&token).await;
    assert!(matches!(result, Err(ApiError::Unauthorized)));
}

#[tokio::test]
async fn should_reject_token_signed_with_wrong_secret() {
    let user = test_user("user", "active");
    let token = token_for(user.id, "wrong-secret");
    let result = usecase(MockUserRepo::new(vec![user])).execute(&token).await;
    assert!(matches!(result, Err(ApiError::Unauthorized)));
}

#[tokio::test]
async fn should_reject_malformed_token() {
    let result = usecase(MockUserRepo::new(vec![]))
        .execute("not-a-jwt")
        .await;
    assert!(matches!(result, Err(ApiError::Unauthorized)));
}

#[tokio::test]
async fn should_reject_unrecognised_role() {
    let user = test_user("owner", "active");
    let token = token_for(user.id, TEST_JWT_SECRET);
    let result = usecase(MockUserRepo::new(vec![user])).execute(&token).await;
    assert!(matches!(result, Err(ApiError::Unauthorized)));
}

#[tokio::test]
async fn should_surface_store_failure_as_internal() {
    let token = token_for(Uuid::new_v4(), TEST_JWT_SECRET);
    let result = usecase(MockUserRepo::failing()).execute(&token).await;
    assert!(
        matches!(result, Err(ApiError::Internal(_))),
        "expected Internal, got {result:?}"
    );
}

use chrono::Duration;
use tubely_api::auth::issue_access_token;
use uuid::Uuid;

/// Shared secret for test tokens (must match the test config).
pub const TEST_JWT_SECRET: &str = "test-jwt-secret-at-least-32-characters-long";

/// A user id and a valid bearer token for it.
pub struct TestUser {
    pub user_id: Uuid,
    pub token: String,
}

impl TestUser {
    pub fn new() -> Self {
        let user_id = Uuid::new_v4();
        let token = issue_access_token(user_id, TEST_JWT_SECRET, Duration::hours(1))
            .expect("Failed to issue test token");
        Self { user_id, token }
    }

    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.token)
    }
}

pub fn expired_token(user_id: Uuid) -> String {
    issue_access_token(user_id, TEST_JWT_SECRET, Duration::minutes(-10))
        .expect("Failed to issue expired token")
}

pub fn token_with_secret(user_id: Uuid, secret: &str) -> String {
    issue_access_token(user_id, secret, Duration::hours(1)).expect("Failed to issue token")
}

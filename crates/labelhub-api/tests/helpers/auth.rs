use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use labelhub_api::auth::JwtClaims;
use uuid::Uuid;

/// Secret shared by the test router and the tokens below
pub const TEST_JWT_SECRET: &str = "test-jwt-secret-at-least-32-characters-long";

pub fn token_for(user_id: Uuid, roles: &[&str]) -> String {
    let now = chrono::Utc::now().timestamp();
    let claims = JwtClaims {
        sub: user_id,
        roles: roles.iter().map(|r| r.to_string()).collect(),
        exp: now + 3600,
        iat: Some(now),
    };
    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(TEST_JWT_SECRET.as_bytes()),
    )
    .expect("Failed to sign test token")
}

pub fn bearer(user_id: Uuid, roles: &[&str]) -> String {
    format!("Bearer {}", token_for(user_id, roles))
}

use std::sync::Arc;

use crate::domain::auth::services::{AuthService, AuthServiceConfig};
use crate::infrastructure::config::JwtSettings;
use crate::infrastructure::persistence::memory::{
  InMemoryRefreshTokenRepository, InMemoryUserRepository,
};
use crate::infrastructure::security::{JwtTokenGenerator, Pbkdf2PasswordHasher};

pub const PASSWORD: &str = "Abcdef1!";

/// Auth service over fresh in-memory stores with cheap hashing
pub fn auth_service() -> Arc<AuthService> {
  let settings = JwtSettings {
    secret: "an-unguessable-secret-of-at-least-32-bytes".to_string(),
    issuer: "homestorage".to_string(),
    audience: "homestorage-clients".to_string(),
    access_token_minutes: 15,
    refresh_token_days: 7,
  };

  Arc::new(AuthService::new(
    Arc::new(InMemoryUserRepository::new()),
    Arc::new(InMemoryRefreshTokenRepository::new()),
    Arc::new(Pbkdf2PasswordHasher::with_iterations(1_000)),
    Arc::new(JwtTokenGenerator::new(&settings).unwrap()),
    AuthServiceConfig::try_from(&settings).unwrap(),
  ))
}

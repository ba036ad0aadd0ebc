//! Walks one account through register, login and logout
//!
//! Run with: cargo run --example identity_flow
//!
//! Uses the in-memory stores, so nothing is persisted. Token settings come
//! from config/default.toml and may be overridden the usual way:
//! ```bash
//! HOMESTORAGE_JWT__ACCESS_TOKEN_MINUTES=5 RUST_LOG=debug \
//! cargo run --example identity_flow
//! ```

use std::sync::Arc;

use homestorage_identity::application::auth::{
  GetCurrentUserUseCase, LoginUserCommand, LoginUserUseCase, LogoutUserCommand,
  LogoutUserUseCase, RegisterUserCommand, RegisterUserUseCase,
};
use homestorage_identity::domain::auth::{AuthError, AuthService, AuthServiceConfig};
use homestorage_identity::infrastructure::config::{Config, JwtSettings};
use homestorage_identity::infrastructure::logging::init_tracing;
use homestorage_identity::infrastructure::persistence::memory::{
  InMemoryRefreshTokenRepository, InMemoryUserRepository,
};
use homestorage_identity::infrastructure::security::{JwtTokenGenerator, Pbkdf2PasswordHasher};
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() -> Result<(), AuthError> {
  init_tracing();

  let jwt = match Config::load() {
    Ok(config) => config.jwt,
    Err(e) => {
      tracing::warn!("Configuration not loaded ({}), using demo settings", e);
      JwtSettings {
        secret: "demo-secret-not-for-production-use-0123".to_string(),
        issuer: "homestorage".to_string(),
        audience: "homestorage-clients".to_string(),
        access_token_minutes: 15,
        refresh_token_days: 7,
      }
    }
  };

  let generator = Arc::new(JwtTokenGenerator::new(&jwt)?);
  let service = Arc::new(AuthService::new(
    Arc::new(InMemoryUserRepository::new()),
    Arc::new(InMemoryRefreshTokenRepository::new()),
    Arc::new(Pbkdf2PasswordHasher::new()),
    generator.clone(),
    AuthServiceConfig::try_from(&jwt)?,
  ));
  let cancel = CancellationToken::new();

  let registered = RegisterUserUseCase::new(service.clone())
    .execute(
      RegisterUserCommand {
        email: "Demo.User@Example.com".to_string(),
        password: "Sup3r-secret".to_string(),
      },
      &cancel,
    )
    .await?;
  println!("Registered {} ({})", registered.email, registered.user_id);

  let logged_in = LoginUserUseCase::new(service.clone())
    .execute(
      LoginUserCommand {
        email: "demo.user@example.com".to_string(),
        password: "Sup3r-secret".to_string(),
      },
      &cancel,
    )
    .await?;
  let claims = generator.decode_access_token(&logged_in.access_token)?;
  println!(
    "Logged in, access token for {} valid until {}",
    claims.email, logged_in.access_token_expires_at
  );

  let stale = LogoutUserUseCase::new(service.clone())
    .execute(
      LogoutUserCommand {
        user_id: registered.user_id,
        refresh_token: registered.refresh_token,
      },
      &cancel,
    )
    .await;
  println!("Logout with pre-login token: {:?}", stale.map_err(|e| e.to_string()));

  let user_id = claims.user_id()?;
  let logged_out = LogoutUserUseCase::new(service.clone())
    .execute(
      LogoutUserCommand {
        user_id,
        refresh_token: logged_in.refresh_token,
      },
      &cancel,
    )
    .await?;
  println!("Logout with current token succeeded: {}", logged_out.success);

  let current = GetCurrentUserUseCase::new(service).execute(user_id).await?;
  println!(
    "{} has {} active session(s), last login {:?}",
    current.email, current.active_sessions, current.last_login_at
  );

  Ok(())
}

use chrono::{Duration, Utc};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use super::entities::{RefreshToken, User};
use super::errors::{AuthError, RepositoryError};
use super::ports::{PasswordHasher, RefreshTokenRepository, TokenGenerator, UserRepository};
use super::value_objects::{AccessToken, Email, Password, PasswordHash};

const DEFAULT_REFRESH_TOKEN_DAYS: i64 = 7;

/// Tunables for the authentication service
#[derive(Debug, Clone)]
pub struct AuthServiceConfig {
  /// Lifetime of issued refresh tokens
  pub refresh_token_ttl: Duration,
}

impl Default for AuthServiceConfig {
  fn default() -> Self {
    Self {
      refresh_token_ttl: Duration::days(DEFAULT_REFRESH_TOKEN_DAYS),
    }
  }
}

/// Credentials handed out by a successful register or login
#[derive(Debug, Clone)]
pub struct IssuedSession {
  pub user: User,
  pub access_token: AccessToken,
  pub refresh_token: RefreshToken,
}

/// Authentication service implementing core business logic
///
/// Every flow runs its repository calls sequentially. The cancellation token
/// is checked before each durable write; writes that already happened are
/// kept.
pub struct AuthService {
  user_repo: Arc<dyn UserRepository>,
  refresh_token_repo: Arc<dyn RefreshTokenRepository>,
  password_hasher: Arc<dyn PasswordHasher>,
  token_generator: Arc<dyn TokenGenerator>,
  config: AuthServiceConfig,
}

impl AuthService {
  /// Creates a new instance of AuthService
  pub fn new(
    user_repo: Arc<dyn UserRepository>,
    refresh_token_repo: Arc<dyn RefreshTokenRepository>,
    password_hasher: Arc<dyn PasswordHasher>,
    token_generator: Arc<dyn TokenGenerator>,
    config: AuthServiceConfig,
  ) -> Self {
    Self {
      user_repo,
      refresh_token_repo,
      password_hasher,
      token_generator,
      config,
    }
  }

  /// Registers a new user and opens their first session
  ///
  /// The user row and the refresh token row are written one after the
  /// other with no shared transaction. If the second write fails the
  /// account exists without a session; a retry is rejected by the email
  /// check and the caller should log in instead.
  ///
  /// # Errors
  /// Returns `AuthError::UserAlreadyExists` if the email is already registered
  pub async fn register(
    &self,
    email: Email,
    password: Password,
    cancel: &CancellationToken,
  ) -> Result<IssuedSession, AuthError> {
    if self.user_repo.email_exists(email.as_str()).await? {
      tracing::warn!("Registration rejected, email already registered");
      return Err(AuthError::UserAlreadyExists {
        email: email.into_inner(),
      });
    }

    let password_hash = self.password_hasher.hash(&password).await?;
    let user = User::new(email.into_inner(), password_hash.into_inner());

    let access_token = self
      .token_generator
      .generate_access_token(user.id, &user.email)?;
    let refresh_token = self.new_refresh_token(user.id)?;

    ensure_not_cancelled(cancel)?;
    let email = user.email.clone();
    let user = match self.user_repo.create(user).await {
      Ok(user) => user,
      // Lost a race against a concurrent registration of the same email
      Err(AuthError::Repository(RepositoryError::DuplicateKey(_))) => {
        return Err(AuthError::UserAlreadyExists { email });
      }
      Err(e) => return Err(e),
    };

    ensure_not_cancelled(cancel)?;
    let refresh_token = self.refresh_token_repo.create(refresh_token).await?;

    tracing::info!(user_id = %user.id, "User registered");

    Ok(IssuedSession {
      user,
      access_token,
      refresh_token,
    })
  }

  /// Authenticates a user and replaces all their sessions with a new one
  ///
  /// Unknown email and wrong password fail identically. A deactivated
  /// account is reported as such, but only after the password matched.
  ///
  /// Revoking the old tokens and storing the new one are separate writes,
  /// so two concurrent logins for the same user can both end up holding a
  /// valid refresh token.
  ///
  /// # Errors
  /// * `AuthError::InvalidCredentials` - unknown email or wrong password
  /// * `AuthError::UserNotActive` - the account has been deactivated
  pub async fn login(
    &self,
    email: &str,
    password: &str,
    cancel: &CancellationToken,
  ) -> Result<IssuedSession, AuthError> {
    let normalized = Email::normalize(email);

    let Some(mut user) = self.user_repo.find_by_email(&normalized).await? else {
      tracing::warn!("Login rejected, invalid credentials");
      return Err(AuthError::InvalidCredentials);
    };

    let stored_hash = PasswordHash::from_encoded(user.password_hash.clone());
    if !self.password_hasher.verify(password, &stored_hash).await {
      tracing::warn!(user_id = %user.id, "Login rejected, invalid credentials");
      return Err(AuthError::InvalidCredentials);
    }

    if !user.is_active {
      tracing::warn!(user_id = %user.id, "Login rejected, account is not active");
      return Err(AuthError::UserNotActive);
    }

    user.record_login();

    ensure_not_cancelled(cancel)?;
    let revoked = self.refresh_token_repo.revoke_all_for_user(user.id).await?;

    let access_token = self
      .token_generator
      .generate_access_token(user.id, &user.email)?;
    let refresh_token = self.new_refresh_token(user.id)?;

    ensure_not_cancelled(cancel)?;
    let user = self.user_repo.update(user).await?;

    ensure_not_cancelled(cancel)?;
    let refresh_token = self.refresh_token_repo.create(refresh_token).await?;

    tracing::info!(user_id = %user.id, revoked_sessions = revoked, "User logged in");

    Ok(IssuedSession {
      user,
      access_token,
      refresh_token,
    })
  }

  /// Revokes one refresh token owned by the caller
  ///
  /// `user_id` must come from a verified access token. Missing, foreign,
  /// revoked and expired tokens all fail with the same error.
  ///
  /// # Errors
  /// Returns `AuthError::InvalidToken` if the token cannot be revoked
  pub async fn logout(
    &self,
    user_id: Uuid,
    token: &str,
    cancel: &CancellationToken,
  ) -> Result<(), AuthError> {
    let mut refresh_token = self
      .refresh_token_repo
      .find_by_token(token)
      .await?
      .ok_or(AuthError::InvalidToken)?;

    if refresh_token.user_id != user_id {
      tracing::warn!(user_id = %user_id, "Logout rejected, token owned by another user");
      return Err(AuthError::InvalidToken);
    }

    if refresh_token.is_revoked {
      return Err(AuthError::InvalidToken);
    }

    if refresh_token.is_expired() {
      return Err(AuthError::InvalidToken);
    }

    refresh_token.revoke();

    ensure_not_cancelled(cancel)?;
    match self.refresh_token_repo.update(refresh_token).await {
      Ok(_) => {}
      // Revoked by a concurrent logout or login in the meantime
      Err(AuthError::Repository(RepositoryError::NotFound)) => {
        tracing::warn!(user_id = %user_id, "Logout rejected, token revoked concurrently");
        return Err(AuthError::InvalidToken);
      }
      Err(e) => return Err(e),
    }

    tracing::info!(user_id = %user_id, "User logged out");

    Ok(())
  }

  /// Revokes every outstanding refresh token of a user
  ///
  /// # Returns
  /// The number of tokens that were revoked
  pub async fn logout_all(
    &self,
    user_id: Uuid,
    cancel: &CancellationToken,
  ) -> Result<u64, AuthError> {
    ensure_not_cancelled(cancel)?;
    let revoked = self.refresh_token_repo.revoke_all_for_user(user_id).await?;

    tracing::info!(user_id = %user_id, revoked_sessions = revoked, "User logged out everywhere");

    Ok(revoked)
  }

  /// Looks up the caller together with their currently valid sessions
  ///
  /// # Errors
  /// Returns `AuthError::InvalidToken` if the user no longer exists
  pub async fn current_user(&self, user_id: Uuid) -> Result<(User, Vec<RefreshToken>), AuthError> {
    let user = self
      .user_repo
      .find_by_id(user_id)
      .await?
      .ok_or(AuthError::InvalidToken)?;

    let sessions = self.refresh_token_repo.find_active_by_user(user.id).await?;

    Ok((user, sessions))
  }

  fn new_refresh_token(&self, user_id: Uuid) -> Result<RefreshToken, AuthError> {
    let expires_at = Utc::now()
      .checked_add_signed(self.config.refresh_token_ttl)
      .ok_or_else(|| AuthError::Configuration("refresh token expiry out of range".to_string()))?;

    Ok(RefreshToken::new(
      user_id,
      self.token_generator.generate_refresh_token(),
      expires_at,
    ))
  }
}

fn ensure_not_cancelled(cancel: &CancellationToken) -> Result<(), AuthError> {
  if cancel.is_cancelled() {
    return Err(AuthError::Cancelled);
  }
  Ok(())
}

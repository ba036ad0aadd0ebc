use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// User entity representing an account in the system
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
  /// Unique identifier for the user
  pub id: Uuid,
  /// User's email address (lowercased, unique)
  pub email: String,
  /// Encoded PBKDF2 password hash
  pub password_hash: String,
  /// Timestamp when the user was created
  pub created_at: DateTime<Utc>,
  /// Timestamp of the most recent successful login
  pub last_login_at: Option<DateTime<Utc>>,
  /// Whether the account may log in
  pub is_active: bool,
}

impl User {
  /// Creates a new active user with the given details
  pub fn new(email: String, password_hash: String) -> Self {
    Self {
      id: Uuid::new_v4(),
      email,
      password_hash,
      created_at: Utc::now(),
      last_login_at: None,
      is_active: true,
    }
  }

  /// Creates a user from database fields (for reconstruction)
  pub fn from_db(
    id: Uuid,
    email: String,
    password_hash: String,
    created_at: DateTime<Utc>,
    last_login_at: Option<DateTime<Utc>>,
    is_active: bool,
  ) -> Self {
    Self {
      id,
      email,
      password_hash,
      created_at,
      last_login_at,
      is_active,
    }
  }

  /// Stamps a successful login
  pub fn record_login(&mut self) {
    self.last_login_at = Some(Utc::now());
  }

  pub fn deactivate(&mut self) {
    self.is_active = false;
  }

  pub fn activate(&mut self) {
    self.is_active = true;
  }
}

/// Refresh token entity representing one issued session credential
///
/// Holds only the owning user's id. Once revoked it stays revoked.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshToken {
  /// Unique identifier for the token record
  pub id: Uuid,
  /// Owner of the token
  pub user_id: Uuid,
  /// Opaque random token string, the lookup key
  pub token: String,
  /// Timestamp when the token expires
  pub expires_at: DateTime<Utc>,
  /// Timestamp when the token was issued
  pub created_at: DateTime<Utc>,
  /// Whether the token has been revoked
  pub is_revoked: bool,
  /// Timestamp of revocation
  pub revoked_at: Option<DateTime<Utc>>,
}

impl RefreshToken {
  /// Creates a new, unrevoked refresh token for a user
  pub fn new(user_id: Uuid, token: String, expires_at: DateTime<Utc>) -> Self {
    Self {
      id: Uuid::new_v4(),
      user_id,
      token,
      expires_at,
      created_at: Utc::now(),
      is_revoked: false,
      revoked_at: None,
    }
  }

  /// Creates a refresh token from database fields (for reconstruction)
  pub fn from_db(
    id: Uuid,
    user_id: Uuid,
    token: String,
    expires_at: DateTime<Utc>,
    created_at: DateTime<Utc>,
    is_revoked: bool,
    revoked_at: Option<DateTime<Utc>>,
  ) -> Self {
    Self {
      id,
      user_id,
      token,
      expires_at,
      created_at,
      is_revoked,
      revoked_at,
    }
  }

  /// Marks the token as revoked
  ///
  /// Revoking twice keeps the first revocation timestamp.
  pub fn revoke(&mut self) {
    if self.is_revoked {
      return;
    }
    self.is_revoked = true;
    self.revoked_at = Some(Utc::now());
  }

  /// Checks if the token has expired
  pub fn is_expired(&self) -> bool {
    self.is_expired_at(Utc::now())
  }

  pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
    self.expires_at <= now
  }

  /// Checks if the token is usable: not revoked and not expired
  pub fn is_valid(&self) -> bool {
    self.is_valid_at(Utc::now())
  }

  pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
    !self.is_revoked && !self.is_expired_at(now)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use chrono::Duration;

  #[test]
  fn test_user_creation() {
    let user = User::new("test@example.com".to_string(), "hashed_password".to_string());

    assert_eq!(user.email, "test@example.com");
    assert!(user.is_active);
    assert!(user.last_login_at.is_none());
  }

  #[test]
  fn test_user_record_login() {
    let mut user = User::new("test@example.com".to_string(), "hashed_password".to_string());

    user.record_login();
    let first = user.last_login_at.unwrap();
    assert!(first >= user.created_at);

    user.record_login();
    assert!(user.last_login_at.unwrap() >= first);
  }

  #[test]
  fn test_user_deactivation() {
    let mut user = User::new("test@example.com".to_string(), "hashed_password".to_string());

    user.deactivate();
    assert!(!user.is_active);

    user.activate();
    assert!(user.is_active);
  }

  #[test]
  fn test_refresh_token_creation() {
    let user_id = Uuid::new_v4();
    let token = RefreshToken::new(
      user_id,
      "opaque".to_string(),
      Utc::now() + Duration::days(7),
    );

    assert_eq!(token.user_id, user_id);
    assert!(!token.is_revoked);
    assert!(token.revoked_at.is_none());
    assert!(!token.is_expired());
    assert!(token.is_valid());
  }

  #[test]
  fn test_refresh_token_expiration() {
    let token = RefreshToken::new(
      Uuid::new_v4(),
      "opaque".to_string(),
      Utc::now() - Duration::seconds(10),
    );

    assert!(token.is_expired());
    assert!(!token.is_valid());
  }

  #[test]
  fn test_refresh_token_expiry_boundary_is_exclusive() {
    let expires_at = Utc::now() + Duration::hours(1);
    let token = RefreshToken::new(Uuid::new_v4(), "opaque".to_string(), expires_at);

    assert!(token.is_valid_at(expires_at - Duration::seconds(1)));
    assert!(!token.is_valid_at(expires_at));
  }

  #[test]
  fn test_refresh_token_revocation_is_one_way() {
    let mut token = RefreshToken::new(
      Uuid::new_v4(),
      "opaque".to_string(),
      Utc::now() + Duration::days(7),
    );

    token.revoke();
    assert!(token.is_revoked);
    assert!(!token.is_valid());
    let revoked_at = token.revoked_at.unwrap();

    token.revoke();
    assert!(token.is_revoked);
    assert_eq!(token.revoked_at, Some(revoked_at));
  }
}

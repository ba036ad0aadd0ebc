use async_trait::async_trait;
use uuid::Uuid;

use super::entities::{RefreshToken, User};
use super::errors::AuthError;
use super::value_objects::{AccessToken, Password, PasswordHash};

/// Repository trait for user persistence operations
///
/// Email arguments are expected to be normalized (lowercase) already.
#[async_trait]
pub trait UserRepository: Send + Sync {
  /// Creates a new user in the repository
  async fn create(&self, user: User) -> Result<User, AuthError>;

  /// Finds a user by their unique identifier
  async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AuthError>;

  /// Finds a user by their normalized email address
  async fn find_by_email(&self, email: &str) -> Result<Option<User>, AuthError>;

  /// Checks whether a normalized email address is already registered
  async fn email_exists(&self, email: &str) -> Result<bool, AuthError>;

  /// Updates an existing user
  async fn update(&self, user: User) -> Result<User, AuthError>;
}

/// Repository trait for refresh token persistence operations
///
/// Tokens are never deleted; revocation is recorded on the row.
#[async_trait]
pub trait RefreshTokenRepository: Send + Sync {
  /// Stores a newly issued refresh token
  async fn create(&self, token: RefreshToken) -> Result<RefreshToken, AuthError>;

  /// Finds a refresh token by its opaque string value
  async fn find_by_token(&self, token: &str) -> Result<Option<RefreshToken>, AuthError>;

  /// Lists the user's tokens that are neither revoked nor expired
  async fn find_active_by_user(&self, user_id: Uuid) -> Result<Vec<RefreshToken>, AuthError>;

  /// Revokes every non-revoked token of the user, returning how many changed
  async fn revoke_all_for_user(&self, user_id: Uuid) -> Result<u64, AuthError>;

  /// Persists changes to a token that is not yet revoked
  ///
  /// A revoked row is final: writing to it, or to a missing row, fails with
  /// `RepositoryError::NotFound`, so of two concurrent revocations only one
  /// succeeds.
  async fn update(&self, token: RefreshToken) -> Result<RefreshToken, AuthError>;
}

/// Service trait for password hashing operations
#[async_trait]
pub trait PasswordHasher: Send + Sync {
  /// Hashes a plain text password
  async fn hash(&self, password: &Password) -> Result<PasswordHash, AuthError>;

  /// Verifies a plain text password against a stored hash
  ///
  /// Malformed hashes verify as `false`.
  async fn verify(&self, password: &str, hashed_password: &PasswordHash) -> bool;
}

/// Service trait for access and refresh token issuance
pub trait TokenGenerator: Send + Sync {
  /// Issues a signed, short-lived access token for the user
  fn generate_access_token(&self, user_id: Uuid, email: &str) -> Result<AccessToken, AuthError>;

  /// Generates an opaque, cryptographically random refresh token
  fn generate_refresh_token(&self) -> String;
}

use async_trait::async_trait;
use base64::{Engine as _, engine::general_purpose};
use rand::RngCore;
use sha2::Sha256;
use subtle::ConstantTimeEq;
use zeroize::Zeroizing;

use crate::domain::auth::errors::{AuthError, HashError};
use crate::domain::auth::ports::PasswordHasher;
use crate::domain::auth::value_objects::{Password, PasswordHash};

/// PBKDF2-HMAC-SHA256 password hasher
///
/// Hashes are encoded as `{iterations}.{base64(salt)}.{base64(key)}` with a
/// 32-byte random salt and a 32-byte derived key. Verification reads the
/// iteration count from the stored hash, so hashes produced with an older
/// work factor keep verifying after the default is raised.
pub struct Pbkdf2PasswordHasher {
  iterations: u32,
}

impl Pbkdf2PasswordHasher {
  pub const DEFAULT_ITERATIONS: u32 = 100_000;
  const SALT_SIZE: usize = 32;
  const KEY_SIZE: usize = 32;

  /// Creates a hasher with the default work factor
  pub fn new() -> Self {
    Self::with_iterations(Self::DEFAULT_ITERATIONS)
  }

  /// Creates a hasher with a custom work factor
  pub fn with_iterations(iterations: u32) -> Self {
    Self {
      iterations: iterations.max(1),
    }
  }

  fn derive_key(password: &[u8], salt: &[u8], iterations: u32, len: usize) -> Vec<u8> {
    let mut key = vec![0u8; len];
    pbkdf2::pbkdf2_hmac::<Sha256>(password, salt, iterations, &mut key);
    key
  }

  fn hash_blocking(password: &str, iterations: u32) -> String {
    let mut salt = [0u8; Self::SALT_SIZE];
    rand::rngs::OsRng.fill_bytes(&mut salt);

    let key = Self::derive_key(password.as_bytes(), &salt, iterations, Self::KEY_SIZE);

    format!(
      "{}.{}.{}",
      iterations,
      general_purpose::STANDARD.encode(salt),
      general_purpose::STANDARD.encode(key)
    )
  }

  /// Splits an encoded hash into (iterations, salt, key)
  fn decode(encoded: &str) -> Option<(u32, Vec<u8>, Vec<u8>)> {
    let parts: Vec<&str> = encoded.split('.').collect();
    let [iterations, salt, key] = parts.as_slice() else {
      return None;
    };

    let iterations = iterations.parse::<u32>().ok().filter(|n| *n > 0)?;
    let salt = general_purpose::STANDARD.decode(salt).ok()?;
    let key = general_purpose::STANDARD.decode(key).ok()?;

    // An empty key would compare equal to any derivation
    if key.is_empty() {
      return None;
    }

    Some((iterations, salt, key))
  }

  fn verify_blocking(password: &str, encoded: &str) -> bool {
    let Some((iterations, salt, expected)) = Self::decode(encoded) else {
      return false;
    };

    let actual = Self::derive_key(password.as_bytes(), &salt, iterations, expected.len());

    actual.as_slice().ct_eq(expected.as_slice()).into()
  }
}

impl Default for Pbkdf2PasswordHasher {
  fn default() -> Self {
    Self::new()
  }
}

#[async_trait]
impl PasswordHasher for Pbkdf2PasswordHasher {
  /// Hashes a plain text password on the blocking thread pool
  async fn hash(&self, password: &Password) -> Result<PasswordHash, AuthError> {
    let plaintext = Zeroizing::new(password.as_str().to_owned());
    let iterations = self.iterations;

    let encoded = tokio::task::spawn_blocking(move || Self::hash_blocking(&plaintext, iterations))
      .await
      .map_err(|e| AuthError::Hash(HashError::HashingFailed(e.to_string())))?;

    Ok(PasswordHash::from_encoded(encoded))
  }

  /// Verifies a plain text password against a stored hash
  ///
  /// Uses a constant-time comparison of the derived keys. Malformed hashes
  /// and a failed worker both count as a mismatch.
  async fn verify(&self, password: &str, hashed_password: &PasswordHash) -> bool {
    let plaintext = Zeroizing::new(password.to_owned());
    let encoded = hashed_password.as_str().to_owned();

    match tokio::task::spawn_blocking(move || Self::verify_blocking(&plaintext, &encoded)).await {
      Ok(matches) => matches,
      Err(e) => {
        tracing::error!("Password verification task failed: {}", e);
        false
      }
    }
  }
}

use chrono::{DateTime, Utc};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

use super::errors::ValidationError;

lazy_static! {
  static ref EMAIL_SHAPE: Regex =
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email pattern is valid");
}

// ============================================================================
// Email Value Object
// ============================================================================

/// Validated, lowercased email address
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Email(String);

impl Email {
  /// Creates a new Email after validation
  ///
  /// Accepts any `local@domain.tld` shape where no segment is empty or
  /// contains whitespace or `@`. The stored value is lowercased.
  pub fn new(email: impl Into<String>) -> Result<Self, ValidationError> {
    let email = email.into();

    if email.trim().is_empty() {
      return Err(ValidationError::EmptyEmail);
    }

    if !EMAIL_SHAPE.is_match(&email) {
      return Err(ValidationError::InvalidEmail);
    }

    Ok(Self(email.to_lowercase()))
  }

  /// Lowercases a raw address for lookups without enforcing the shape
  pub fn normalize(raw: &str) -> String {
    raw.to_lowercase()
  }

  /// Returns the email as a string slice
  pub fn as_str(&self) -> &str {
    &self.0
  }

  /// Consumes self and returns the inner String
  pub fn into_inner(self) -> String {
    self.0
  }
}

impl fmt::Display for Email {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}

impl AsRef<str> for Email {
  fn as_ref(&self) -> &str {
    &self.0
  }
}

// ============================================================================
// Password Value Object (Plain Password - Never Stored)
// ============================================================================

#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct Password(String);

impl Password {
  pub const MIN_LENGTH: usize = 8;

  /// Creates a new Password after checking it against the password policy
  ///
  /// Rules are checked in order and the first failure is reported:
  /// not blank, minimum length, an uppercase letter, a lowercase letter,
  /// a digit, and a character that is neither letter nor digit.
  pub fn new(password: impl Into<String>) -> Result<Self, ValidationError> {
    let password = Self(password.into());
    let value = password.0.as_str();

    if value.trim().is_empty() {
      return Err(ValidationError::EmptyPassword);
    }

    if value.chars().count() < Self::MIN_LENGTH {
      return Err(ValidationError::PasswordTooShort {
        min: Self::MIN_LENGTH,
      });
    }

    if !value.chars().any(char::is_uppercase) {
      return Err(ValidationError::PasswordMissingUppercase);
    }

    if !value.chars().any(char::is_lowercase) {
      return Err(ValidationError::PasswordMissingLowercase);
    }

    if !value.chars().any(|c| c.is_ascii_digit()) {
      return Err(ValidationError::PasswordMissingDigit);
    }

    if !value
      .chars()
      .any(|c| !c.is_alphabetic() && !c.is_ascii_digit())
    {
      return Err(ValidationError::PasswordMissingSpecial);
    }

    Ok(password)
  }

  /// Returns the password as a string slice (use with caution)
  pub fn as_str(&self) -> &str {
    &self.0
  }
}

// Implement Debug without exposing the password
impl fmt::Debug for Password {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str("Password(***)")
  }
}

// Implement Display without exposing the password
impl fmt::Display for Password {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str("***")
  }
}

// ============================================================================
// PasswordHash Value Object (encoded "iterations.salt.key")
// ============================================================================

/// Encoded password hash as stored on the user record
///
/// The content is opaque to the domain; only the configured
/// [`PasswordHasher`](super::ports::PasswordHasher) interprets it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PasswordHash(String);

impl PasswordHash {
  /// Wraps an encoded hash without interpreting it
  pub fn from_encoded(encoded: impl Into<String>) -> Self {
    Self(encoded.into())
  }

  /// Returns the hash as a string slice
  pub fn as_str(&self) -> &str {
    &self.0
  }

  /// Consumes self and returns the inner String
  pub fn into_inner(self) -> String {
    self.0
  }
}

impl fmt::Display for PasswordHash {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}

// ============================================================================
// AccessToken Value Object (signed, short-lived)
// ============================================================================

#[derive(Clone)]
pub struct AccessToken {
  token: String,
  expires_at: DateTime<Utc>,
}

impl AccessToken {
  pub fn new(token: String, expires_at: DateTime<Utc>) -> Self {
    Self { token, expires_at }
  }

  /// Returns the encoded token (use with caution)
  pub fn as_str(&self) -> &str {
    &self.token
  }

  pub fn expires_at(&self) -> DateTime<Utc> {
    self.expires_at
  }

  /// Consumes self and returns the encoded token
  pub fn into_inner(self) -> String {
    self.token
  }
}

// Implement Debug without exposing the token
impl fmt::Debug for AccessToken {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("AccessToken")
      .field("token", &"***")
      .field("expires_at", &self.expires_at)
      .finish()
  }
}

use base64::{Engine as _, engine::general_purpose};
use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::auth::errors::AuthError;
use crate::domain::auth::ports::TokenGenerator;
use crate::domain::auth::value_objects::AccessToken;
use crate::infrastructure::config::{JwtSettings, positive_lifetime};

/// Claims carried by an access token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessTokenClaims {
  /// Subject: the user id
  pub sub: String,
  pub email: String,
  /// Unique token id
  pub jti: String,
  pub iss: String,
  pub aud: String,
  pub iat: i64,
  pub nbf: i64,
  pub exp: i64,
}

impl AccessTokenClaims {
  /// Parses the subject back into a user id
  pub fn user_id(&self) -> Result<Uuid, AuthError> {
    Uuid::parse_str(&self.sub).map_err(|_| AuthError::InvalidToken)
  }
}

/// HS256 JWT access tokens plus opaque random refresh tokens
pub struct JwtTokenGenerator {
  encoding_key: EncodingKey,
  decoding_key: DecodingKey,
  issuer: String,
  audience: String,
  access_token_ttl: Duration,
}

impl JwtTokenGenerator {
  /// Minimum signing secret length in bytes (256 bits)
  pub const MIN_SECRET_BYTES: usize = 32;
  const REFRESH_TOKEN_BYTES: usize = 64;

  /// Creates a generator from JWT settings
  ///
  /// # Errors
  /// Returns `AuthError::Configuration` if the secret is shorter than 256 bits
  /// or the access token lifetime is not positive
  pub fn new(settings: &JwtSettings) -> Result<Self, AuthError> {
    if settings.secret.len() < Self::MIN_SECRET_BYTES {
      return Err(AuthError::Configuration(format!(
        "JWT secret must be at least {} bytes",
        Self::MIN_SECRET_BYTES
      )));
    }

    let access_token_ttl = positive_lifetime(
      Duration::try_minutes(settings.access_token_minutes),
      settings.access_token_minutes,
      "Access token lifetime",
    )?;

    let secret = settings.secret.as_bytes();
    Ok(Self {
      encoding_key: EncodingKey::from_secret(secret),
      decoding_key: DecodingKey::from_secret(secret),
      issuer: settings.issuer.clone(),
      audience: settings.audience.clone(),
      access_token_ttl,
    })
  }

  /// Verifies an access token and returns its claims
  ///
  /// Checks signature, issuer, audience and expiry.
  ///
  /// # Errors
  /// Returns `AuthError::InvalidToken` for any token that fails validation
  pub fn decode_access_token(&self, token: &str) -> Result<AccessTokenClaims, AuthError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[&self.issuer]);
    validation.set_audience(&[&self.audience]);
    validation.set_required_spec_claims(&["exp", "iss", "aud", "sub"]);

    decode::<AccessTokenClaims>(token, &self.decoding_key, &validation)
      .map(|data| data.claims)
      .map_err(|e| {
        tracing::debug!("Access token rejected: {}", e);
        AuthError::InvalidToken
      })
  }
}

impl TokenGenerator for JwtTokenGenerator {
  fn generate_access_token(&self, user_id: Uuid, email: &str) -> Result<AccessToken, AuthError> {
    let now = Utc::now();
    let expires_at = now
      .checked_add_signed(self.access_token_ttl)
      .ok_or_else(|| AuthError::Token("access token expiry out of range".to_string()))?;

    let claims = AccessTokenClaims {
      sub: user_id.to_string(),
      email: email.to_string(),
      jti: Uuid::new_v4().to_string(),
      iss: self.issuer.clone(),
      aud: self.audience.clone(),
      iat: now.timestamp(),
      nbf: now.timestamp(),
      exp: expires_at.timestamp(),
    };

    let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
      .map_err(|e| AuthError::Token(e.to_string()))?;

    Ok(AccessToken::new(token, expires_at))
  }

  /// 64 bytes from the OS random source, standard base64
  fn generate_refresh_token(&self) -> String {
    let mut bytes = [0u8; Self::REFRESH_TOKEN_BYTES];
    rand::rngs::OsRng.fill_bytes(&mut bytes);
    general_purpose::STANDARD.encode(bytes)
  }
}

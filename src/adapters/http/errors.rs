use actix_web::{
  HttpResponse,
  error::ResponseError,
  http::{StatusCode, header::ContentType},
};
use serde::Serialize;
use std::fmt;

use crate::domain::auth::errors::{AuthError, ErrorKind};

use super::dtos::ErrorResponse;

/// API error type that maps domain errors to HTTP responses
#[derive(Debug, Serialize)]
#[serde(tag = "type", content = "details")]
pub enum ApiError {
  /// Validation error (400 Bad Request)
  Validation(String),

  /// Authentication error (401, 403 or 409)
  Auth(AuthErrorKind),

  /// Request abandoned before completion (503 Service Unavailable)
  Cancelled,

  /// Internal server error (500 Internal Server Error)
  Internal(String),
}

/// Authentication error kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AuthErrorKind {
  /// Unknown email or wrong password (401)
  InvalidCredentials,

  /// Refresh token missing, foreign, revoked or expired (401)
  InvalidToken,

  /// Email already registered (409)
  UserAlreadyExists,

  /// Account deactivated (403)
  UserNotActive,
}

impl fmt::Display for ApiError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ApiError::Validation(msg) => write!(f, "Validation error: {}", msg),
      ApiError::Auth(kind) => write!(f, "Authentication error: {:?}", kind),
      ApiError::Cancelled => write!(f, "Request cancelled"),
      ApiError::Internal(msg) => write!(f, "Internal error: {}", msg),
    }
  }
}

impl ResponseError for ApiError {
  fn status_code(&self) -> StatusCode {
    match self {
      ApiError::Validation(_) => StatusCode::BAD_REQUEST,
      ApiError::Auth(kind) => match kind {
        AuthErrorKind::InvalidCredentials => StatusCode::UNAUTHORIZED,
        AuthErrorKind::InvalidToken => StatusCode::UNAUTHORIZED,
        AuthErrorKind::UserAlreadyExists => StatusCode::CONFLICT,
        AuthErrorKind::UserNotActive => StatusCode::FORBIDDEN,
      },
      ApiError::Cancelled => StatusCode::SERVICE_UNAVAILABLE,
      ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }

  fn error_response(&self) -> HttpResponse {
    let status = self.status_code();
    let (error_type, message) = match self {
      ApiError::Validation(msg) => ("validation_error", msg.clone()),
      ApiError::Auth(kind) => match kind {
        AuthErrorKind::InvalidCredentials => (
          "invalid_credentials",
          "Invalid email or password".to_string(),
        ),
        AuthErrorKind::InvalidToken => ("invalid_token", "Token is invalid or expired".to_string()),
        AuthErrorKind::UserAlreadyExists => (
          "user_already_exists",
          "An account with this email already exists".to_string(),
        ),
        AuthErrorKind::UserNotActive => (
          "user_not_active",
          "This account is not active".to_string(),
        ),
      },
      ApiError::Cancelled => ("cancelled", "The request was cancelled".to_string()),
      ApiError::Internal(msg) => {
        // Don't expose internal error details
        tracing::error!("Internal error: {}", msg);
        (
          "internal_error",
          "An internal server error occurred".to_string(),
        )
      }
    };

    let error_response = ErrorResponse {
      error: error_type.to_string(),
      message,
      details: None,
    };

    HttpResponse::build(status)
      .content_type(ContentType::json())
      .json(error_response)
  }
}

/// Convert AuthError to ApiError
impl From<AuthError> for ApiError {
  fn from(error: AuthError) -> Self {
    match error {
      AuthError::InvalidCredentials => ApiError::Auth(AuthErrorKind::InvalidCredentials),
      AuthError::InvalidToken => ApiError::Auth(AuthErrorKind::InvalidToken),
      AuthError::UserAlreadyExists { .. } => ApiError::Auth(AuthErrorKind::UserAlreadyExists),
      AuthError::UserNotActive => ApiError::Auth(AuthErrorKind::UserNotActive),
      other => match other.kind() {
        ErrorKind::Validation => ApiError::Validation(other.to_string()),
        ErrorKind::Cancelled => ApiError::Cancelled,
        _ => ApiError::Internal(other.to_string()),
      },
    }
  }
}

/// Convert validation errors from validator crate
impl From<validator::ValidationErrors> for ApiError {
  fn from(errors: validator::ValidationErrors) -> Self {
    let mut messages: Vec<String> = errors
      .field_errors()
      .iter()
      .flat_map(|(field, errors)| {
        errors
          .iter()
          .map(|error| {
            error
              .message
              .as_ref()
              .map(|m| m.to_string())
              .unwrap_or_else(|| format!("Invalid field: {}", field))
          })
          .collect::<Vec<_>>()
      })
      .collect();
    messages.sort();

    ApiError::Validation(messages.join(", "))
  }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::application::auth::{
  AuthResult, GetCurrentUserResponse, LoginUserCommand, LogoutAllDevicesResponse,
  LogoutUserCommand, RegisterUserCommand,
};

/// Request for user registration
///
/// Only presence and the confirmation match are checked here; the email
/// shape and password strength rules belong to the domain.
#[derive(Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
  /// User's email address
  #[validate(length(min = 1, max = 256, message = "Email is required"))]
  pub email: String,

  /// User's password
  #[validate(length(min = 1, message = "Password is required"))]
  pub password: String,

  /// Must repeat `password`
  #[validate(must_match(other = "password", message = "Passwords do not match"))]
  pub confirm_password: String,
}

impl RegisterRequest {
  pub fn into_command(self) -> RegisterUserCommand {
    RegisterUserCommand {
      email: self.email,
      password: self.password,
    }
  }
}

/// Request for user login
#[derive(Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
  /// User's email address
  #[validate(length(min = 1, message = "Email is required"))]
  pub email: String,

  /// User's password
  #[validate(length(min = 1, message = "Password is required"))]
  pub password: String,
}

impl LoginRequest {
  pub fn into_command(self) -> LoginUserCommand {
    LoginUserCommand {
      email: self.email,
      password: self.password,
    }
  }
}

/// Request for revoking one refresh token
#[derive(Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LogoutRequest {
  #[validate(length(min = 1, message = "Refresh token is required"))]
  pub refresh_token: String,
}

impl LogoutRequest {
  /// Pairs the token with the caller taken from the access token
  pub fn into_command(self, user_id: Uuid) -> LogoutUserCommand {
    LogoutUserCommand {
      user_id,
      refresh_token: self.refresh_token,
    }
  }
}

// Request bodies carry secrets
macro_rules! redacted_debug {
  ($ty:ident { $($field:ident),* }) => {
    impl std::fmt::Debug for $ty {
      fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct(stringify!($ty))
          $(.field(stringify!($field), &self.$field))*
          .finish_non_exhaustive()
      }
    }
  };
}

redacted_debug!(RegisterRequest { email });
redacted_debug!(LoginRequest { email });
redacted_debug!(LogoutRequest {});

/// Response after successful registration or login
#[derive(Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
  pub user_id: Uuid,
  pub email: String,
  pub access_token: String,
  pub refresh_token: String,
  pub access_token_expires_at: DateTime<Utc>,
  pub refresh_token_expires_at: DateTime<Utc>,
}

impl From<AuthResult> for AuthResponse {
  fn from(result: AuthResult) -> Self {
    Self {
      user_id: result.user_id,
      email: result.email,
      access_token: result.access_token,
      refresh_token: result.refresh_token,
      access_token_expires_at: result.access_token_expires_at,
      refresh_token_expires_at: result.refresh_token_expires_at,
    }
  }
}

redacted_debug!(AuthResponse {
  user_id,
  email,
  access_token_expires_at,
  refresh_token_expires_at
});

/// Response after a logout
#[derive(Debug, Clone, Serialize)]
pub struct LogoutResponse {
  pub success: bool,

  /// Success message
  pub message: String,
}

impl LogoutResponse {
  pub fn logged_out() -> Self {
    Self {
      success: true,
      message: "Logged out successfully".to_string(),
    }
  }
}

/// Response after successful logout from all devices
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogoutAllResponse {
  /// Number of refresh tokens that were revoked
  pub sessions_terminated: u64,

  /// Success message
  pub message: String,
}

impl From<LogoutAllDevicesResponse> for LogoutAllResponse {
  fn from(response: LogoutAllDevicesResponse) -> Self {
    Self {
      sessions_terminated: response.sessions_terminated,
      message: format!(
        "Logged out from {} session(s)",
        response.sessions_terminated
      ),
    }
  }
}

/// Response containing current user information
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentUserResponse {
  /// Unique identifier of the user
  pub user_id: Uuid,

  /// User's email address
  pub email: String,

  /// Timestamp when the user account was created
  pub created_at: DateTime<Utc>,

  /// Timestamp of user's last login
  #[serde(skip_serializing_if = "Option::is_none")]
  pub last_login_at: Option<DateTime<Utc>>,

  pub is_active: bool,

  pub active_sessions: usize,
}

impl From<GetCurrentUserResponse> for CurrentUserResponse {
  fn from(response: GetCurrentUserResponse) -> Self {
    Self {
      user_id: response.user_id,
      email: response.email,
      created_at: response.created_at,
      last_login_at: response.last_login_at,
      is_active: response.is_active,
      active_sessions: response.active_sessions,
    }
  }
}

/// Standard error response
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
  /// Error type/code
  pub error: String,

  /// Human-readable error message
  pub message: String,

  /// Optional detailed error information
  #[serde(skip_serializing_if = "Option::is_none")]
  pub details: Option<serde_json::Value>,
}

#[cfg(test)]
mod tests {
  use super::*;
  use validator::Validate;

  fn register_request(password: &str, confirm_password: &str) -> RegisterRequest {
    RegisterRequest {
      email: "test@example.com".to_string(),
      password: password.to_string(),
      confirm_password: confirm_password.to_string(),
    }
  }

  #[test]
  fn test_register_request_validation_valid() {
    assert!(register_request("SecureP@ss123", "SecureP@ss123").validate().is_ok());
  }

  #[test]
  fn test_register_request_password_mismatch() {
    let errors = register_request("SecureP@ss123", "SecureP@ss124")
      .validate()
      .unwrap_err();

    assert!(errors.field_errors().contains_key("confirm_password"));
  }

  #[test]
  fn test_register_request_missing_email() {
    let request = RegisterRequest {
      email: String::new(),
      ..register_request("SecureP@ss123", "SecureP@ss123")
    };

    assert!(request.validate().is_err());
  }

  #[test]
  fn test_register_request_deserializes_camel_case() {
    let json = r#"{"email": "a@b.com", "password": "Abcdef1!", "confirmPassword": "Abcdef1!"}"#;
    let request: RegisterRequest = serde_json::from_str(json).unwrap();

    assert!(request.validate().is_ok());
    let command = request.into_command();
    assert_eq!(command.email, "a@b.com");
    assert_eq!(command.password, "Abcdef1!");
  }

  #[test]
  fn test_login_request_requires_password() {
    let request = LoginRequest {
      email: "test@example.com".to_string(),
      password: String::new(),
    };

    assert!(request.validate().is_err());
  }

  #[test]
  fn test_login_request_into_command() {
    let json = r#"{"email": "A@B.com", "password": "Abcdef1!"}"#;
    let request: LoginRequest = serde_json::from_str(json).unwrap();

    assert!(request.validate().is_ok());
    let command = request.into_command();
    assert_eq!(command.email, "A@B.com");
    assert_eq!(command.password, "Abcdef1!");
  }

  #[test]
  fn test_logout_request_into_command() {
    let json = r#"{"refreshToken": "abc"}"#;
    let request: LogoutRequest = serde_json::from_str(json).unwrap();
    let user_id = Uuid::new_v4();

    let command = request.into_command(user_id);

    assert_eq!(command.user_id, user_id);
    assert_eq!(command.refresh_token, "abc");
  }

  #[test]
  fn test_request_debug_hides_secrets() {
    let debug = format!("{:?}", register_request("SecureP@ss123", "SecureP@ss123"));

    assert!(debug.contains("test@example.com"));
    assert!(!debug.contains("SecureP@ss123"));
  }

  #[test]
  fn test_auth_response_serializes_camel_case() {
    let now = Utc::now();
    let response = AuthResponse {
      user_id: Uuid::new_v4(),
      email: "a@b.com".to_string(),
      access_token: "jwt".to_string(),
      refresh_token: "opaque".to_string(),
      access_token_expires_at: now,
      refresh_token_expires_at: now,
    };

    let json = serde_json::to_value(&response).unwrap();

    assert_eq!(json["accessToken"], "jwt");
    assert_eq!(json["refreshToken"], "opaque");
    assert!(json.get("refreshTokenExpiresAt").is_some());
  }
}

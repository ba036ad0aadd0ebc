//! HTTP boundary contract
//!
//! Request/response bodies for the identity endpoints and the mapping from
//! domain errors to status codes. Routing lives in the hosting service.

pub mod dtos;
pub mod errors;

// Re-export commonly used types
pub use dtos::{
  AuthResponse, CurrentUserResponse, ErrorResponse, LoginRequest, LogoutAllResponse,
  LogoutRequest, LogoutResponse, RegisterRequest,
};
pub use errors::{ApiError, AuthErrorKind};

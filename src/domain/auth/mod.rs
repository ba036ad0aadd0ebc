pub mod entities;
pub mod errors;
pub mod ports;
pub mod services;
pub mod value_objects;

// Re-export commonly used types
pub use entities::{RefreshToken, User};
pub use errors::{AuthError, ErrorKind, HashError, RepositoryError, ValidationError};
pub use ports::{PasswordHasher, RefreshTokenRepository, TokenGenerator, UserRepository};
pub use services::{AuthService, AuthServiceConfig, IssuedSession};
pub use value_objects::{AccessToken, Email, Password, PasswordHash};

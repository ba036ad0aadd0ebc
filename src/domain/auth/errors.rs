use thiserror::Error;

/// Main authentication error type
#[derive(Debug, Error)]
pub enum AuthError {
  #[error("{0}")]
  Validation(#[from] ValidationError),

  #[error("User with email '{email}' already exists")]
  UserAlreadyExists { email: String },

  #[error("Invalid email or password")]
  InvalidCredentials,

  #[error("Token is invalid or expired")]
  InvalidToken,

  #[error("User account is not active")]
  UserNotActive,

  #[error("Operation was cancelled")]
  Cancelled,

  #[error("Repository error: {0}")]
  Repository(#[from] RepositoryError),

  #[error("Hash error: {0}")]
  Hash(#[from] HashError),

  #[error("Token generation failed: {0}")]
  Token(String),

  #[error("Invalid configuration: {0}")]
  Configuration(String),
}

/// Category of an [`AuthError`] as seen by the boundary layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
  /// Caller-correctable input problem
  Validation,
  /// Email already registered
  Conflict,
  /// Bad credentials or an unusable refresh token
  Unauthorized,
  /// Account deactivated
  Forbidden,
  /// Work was abandoned on request
  Cancelled,
  /// Anything the caller cannot fix
  Internal,
}

impl AuthError {
  /// Classifies the error for the boundary layer
  pub fn kind(&self) -> ErrorKind {
    match self {
      AuthError::Validation(_) => ErrorKind::Validation,
      AuthError::UserAlreadyExists { .. } => ErrorKind::Conflict,
      AuthError::InvalidCredentials | AuthError::InvalidToken => ErrorKind::Unauthorized,
      AuthError::UserNotActive => ErrorKind::Forbidden,
      AuthError::Cancelled => ErrorKind::Cancelled,
      AuthError::Repository(_)
      | AuthError::Hash(_)
      | AuthError::Token(_)
      | AuthError::Configuration(_) => ErrorKind::Internal,
    }
  }
}

/// Repository-related errors
#[derive(Debug, Error)]
pub enum RepositoryError {
  #[error("Database connection failed: {0}")]
  ConnectionFailed(String),

  #[error("Query execution failed: {0}")]
  QueryFailed(String),

  #[error("Record not found")]
  NotFound,

  #[error("Duplicate key violation: {0}")]
  DuplicateKey(String),

  #[error("Database error: {0}")]
  DatabaseError(String),

  #[error("Migration failed: {0}")]
  MigrationFailed(String),
}

/// Password hashing errors
#[derive(Debug, Error)]
pub enum HashError {
  #[error("Failed to hash password: {0}")]
  HashingFailed(String),
}

/// Input validation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
  #[error("Email cannot be empty")]
  EmptyEmail,

  #[error("Invalid email format")]
  InvalidEmail,

  #[error("Password cannot be empty")]
  EmptyPassword,

  #[error("Password too short, minimum {min} characters required")]
  PasswordTooShort { min: usize },

  #[error("Password must contain at least one uppercase letter")]
  PasswordMissingUppercase,

  #[error("Password must contain at least one lowercase letter")]
  PasswordMissingLowercase,

  #[error("Password must contain at least one digit")]
  PasswordMissingDigit,

  #[error("Password must contain at least one special character")]
  PasswordMissingSpecial,
}

impl From<sqlx::Error> for RepositoryError {
  fn from(error: sqlx::Error) -> Self {
    match error {
      sqlx::Error::RowNotFound => RepositoryError::NotFound,
      sqlx::Error::Database(db_err) => {
        if db_err.is_unique_violation() {
          RepositoryError::DuplicateKey(db_err.message().to_string())
        } else {
          RepositoryError::DatabaseError(db_err.message().to_string())
        }
      }
      sqlx::Error::PoolTimedOut => RepositoryError::ConnectionFailed("Pool timed out".to_string()),
      sqlx::Error::PoolClosed => RepositoryError::ConnectionFailed("Pool closed".to_string()),
      _ => RepositoryError::QueryFailed(error.to_string()),
    }
  }
}

impl From<sqlx::Error> for AuthError {
  fn from(error: sqlx::Error) -> Self {
    AuthError::Repository(RepositoryError::from(error))
  }
}

impl From<sqlx::migrate::MigrateError> for RepositoryError {
  fn from(error: sqlx::migrate::MigrateError) -> Self {
    RepositoryError::MigrationFailed(error.to_string())
  }
}

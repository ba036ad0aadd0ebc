//! In-memory stores
//!
//! Enforce the same uniqueness rules as the database schema. Used by the
//! test suites and the demo; state lives only as long as the value.

mod refresh_token_repository;
mod user_repository;

pub use refresh_token_repository::InMemoryRefreshTokenRepository;
pub use user_repository::InMemoryUserRepository;

mod jwt_token_generator;
mod pbkdf2_hasher;

pub use jwt_token_generator::{AccessTokenClaims, JwtTokenGenerator};
pub use pbkdf2_hasher::Pbkdf2PasswordHasher;

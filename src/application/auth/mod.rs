//! Authentication use cases
//!
//! Each use case wraps one `AuthService` flow. Register validates input into
//! value objects first; login and logout pass raw values straight through.

mod auth_result;
mod get_current_user;
mod login_user;
mod logout_all_devices;
mod logout_user;
mod register_user;

#[cfg(test)]
mod test_support;

pub use auth_result::AuthResult;
pub use get_current_user::{GetCurrentUserResponse, GetCurrentUserUseCase};
pub use login_user::{LoginUserCommand, LoginUserUseCase};
pub use logout_all_devices::{LogoutAllDevicesResponse, LogoutAllDevicesUseCase};
pub use logout_user::{LogoutResult, LogoutUserCommand, LogoutUserUseCase};
pub use register_user::{RegisterUserCommand, RegisterUserUseCase};

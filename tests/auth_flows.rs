//! End-to-end identity flows over the in-memory stores

use std::sync::Arc;

use homestorage_identity::application::auth::{
  GetCurrentUserUseCase, LoginUserCommand, LoginUserUseCase, LogoutAllDevicesUseCase,
  LogoutUserCommand, LogoutUserUseCase, RegisterUserCommand, RegisterUserUseCase,
};
use async_trait::async_trait;
use homestorage_identity::domain::auth::{
  AuthError, AuthService, AuthServiceConfig, Email, ErrorKind, Password, PasswordHash,
  PasswordHasher, RefreshToken, RefreshTokenRepository, TokenGenerator, UserRepository,
  ValidationError,
};
use homestorage_identity::infrastructure::config::JwtSettings;
use homestorage_identity::infrastructure::persistence::memory::{
  InMemoryRefreshTokenRepository, InMemoryUserRepository,
};
use homestorage_identity::infrastructure::security::{JwtTokenGenerator, Pbkdf2PasswordHasher};
use tokio::sync::Barrier;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

const EMAIL: &str = "a@b.com";
const PASSWORD: &str = "Abcdef1!";

struct TestApp {
  users: Arc<InMemoryUserRepository>,
  tokens: Arc<InMemoryRefreshTokenRepository>,
  generator: Arc<JwtTokenGenerator>,
  register: RegisterUserUseCase,
  login: LoginUserUseCase,
  logout: LogoutUserUseCase,
  logout_all: LogoutAllDevicesUseCase,
  current_user: GetCurrentUserUseCase,
}

fn jwt_settings() -> JwtSettings {
  JwtSettings {
    secret: "integration-secret-that-is-long-enough!!".to_string(),
    issuer: "homestorage".to_string(),
    audience: "homestorage-clients".to_string(),
    access_token_minutes: 15,
    refresh_token_days: 7,
  }
}

fn spawn_app() -> TestApp {
  let settings = jwt_settings();
  let users = Arc::new(InMemoryUserRepository::new());
  let tokens = Arc::new(InMemoryRefreshTokenRepository::new());
  let generator = Arc::new(JwtTokenGenerator::new(&settings).unwrap());
  let service = Arc::new(AuthService::new(
    users.clone(),
    tokens.clone(),
    Arc::new(Pbkdf2PasswordHasher::with_iterations(1_000)),
    generator.clone(),
    AuthServiceConfig::try_from(&settings).unwrap(),
  ));

  TestApp {
    users,
    tokens,
    generator,
    register: RegisterUserUseCase::new(service.clone()),
    login: LoginUserUseCase::new(service.clone()),
    logout: LogoutUserUseCase::new(service.clone()),
    logout_all: LogoutAllDevicesUseCase::new(service.clone()),
    current_user: GetCurrentUserUseCase::new(service),
  }
}

fn register_command(email: &str) -> RegisterUserCommand {
  RegisterUserCommand {
    email: email.to_string(),
    password: PASSWORD.to_string(),
  }
}

fn login_command(email: &str, password: &str) -> LoginUserCommand {
  LoginUserCommand {
    email: email.to_string(),
    password: password.to_string(),
  }
}

#[tokio::test]
async fn register_then_register_again_conflicts() {
  let app = spawn_app();
  let cancel = CancellationToken::new();

  let first = app.register.execute(register_command(EMAIL), &cancel).await;
  assert!(first.is_ok());

  let second = app
    .register
    .execute(register_command(EMAIL), &cancel)
    .await
    .unwrap_err();
  assert_eq!(second.kind(), ErrorKind::Conflict);
}

#[tokio::test]
async fn login_rotates_refresh_token() {
  let app = spawn_app();
  let cancel = CancellationToken::new();
  let registered = app
    .register
    .execute(register_command(EMAIL), &cancel)
    .await
    .unwrap();

  let logged_in = app
    .login
    .execute(login_command(EMAIL, PASSWORD), &cancel)
    .await
    .unwrap();
  assert_ne!(logged_in.refresh_token, registered.refresh_token);

  let old_token_logout = app
    .logout
    .execute(
      LogoutUserCommand {
        user_id: registered.user_id,
        refresh_token: registered.refresh_token,
      },
      &cancel,
    )
    .await
    .unwrap_err();
  assert_eq!(old_token_logout.kind(), ErrorKind::Unauthorized);

  let new_token_logout = app
    .logout
    .execute(
      LogoutUserCommand {
        user_id: logged_in.user_id,
        refresh_token: logged_in.refresh_token,
      },
      &cancel,
    )
    .await
    .unwrap();
  assert!(new_token_logout.success);
}

#[tokio::test]
async fn wrong_password_and_unknown_email_fail_identically() {
  let app = spawn_app();
  let cancel = CancellationToken::new();
  app
    .register
    .execute(register_command(EMAIL), &cancel)
    .await
    .unwrap();

  let wrong_password = app
    .login
    .execute(login_command(EMAIL, "Abcdef1?"), &cancel)
    .await
    .unwrap_err();
  let unknown_email = app
    .login
    .execute(login_command("nobody@b.com", PASSWORD), &cancel)
    .await
    .unwrap_err();

  assert!(matches!(wrong_password, AuthError::InvalidCredentials));
  assert!(matches!(unknown_email, AuthError::InvalidCredentials));
  assert_eq!(wrong_password.to_string(), unknown_email.to_string());
}

#[tokio::test]
async fn inactive_account_is_forbidden_only_with_correct_password() {
  let app = spawn_app();
  let cancel = CancellationToken::new();
  app
    .register
    .execute(register_command(EMAIL), &cancel)
    .await
    .unwrap();

  let mut user = app.users.find_by_email(EMAIL).await.unwrap().unwrap();
  user.deactivate();
  app.users.update(user).await.unwrap();

  let correct = app
    .login
    .execute(login_command(EMAIL, PASSWORD), &cancel)
    .await
    .unwrap_err();
  assert_eq!(correct.kind(), ErrorKind::Forbidden);

  let wrong = app
    .login
    .execute(login_command(EMAIL, "Abcdef1?"), &cancel)
    .await
    .unwrap_err();
  assert_eq!(wrong.kind(), ErrorKind::Unauthorized);
}

#[tokio::test]
async fn logout_rejects_foreign_owner_and_second_attempt() {
  let app = spawn_app();
  let cancel = CancellationToken::new();
  let alice = app
    .register
    .execute(register_command("alice@b.com"), &cancel)
    .await
    .unwrap();
  let bob = app
    .register
    .execute(register_command("bob@b.com"), &cancel)
    .await
    .unwrap();

  let foreign = app
    .logout
    .execute(
      LogoutUserCommand {
        user_id: bob.user_id,
        refresh_token: alice.refresh_token.clone(),
      },
      &cancel,
    )
    .await
    .unwrap_err();
  assert!(matches!(foreign, AuthError::InvalidToken));

  let command = LogoutUserCommand {
    user_id: alice.user_id,
    refresh_token: alice.refresh_token,
  };
  assert!(app.logout.execute(command.clone(), &cancel).await.is_ok());
  assert!(matches!(
    app.logout.execute(command, &cancel).await,
    Err(AuthError::InvalidToken)
  ));
}

#[tokio::test]
async fn access_token_identifies_the_user() {
  let app = spawn_app();
  let result = app
    .register
    .execute(register_command("Mixed.Case@B.com"), &CancellationToken::new())
    .await
    .unwrap();

  let claims = app
    .generator
    .decode_access_token(&result.access_token)
    .unwrap();

  assert_eq!(claims.user_id().unwrap(), result.user_id);
  assert_eq!(claims.email, "mixed.case@b.com");
}

#[tokio::test]
async fn cancelled_register_writes_nothing() {
  let app = spawn_app();
  let cancel = CancellationToken::new();
  cancel.cancel();

  let result = app.register.execute(register_command(EMAIL), &cancel).await;

  assert!(matches!(result, Err(AuthError::Cancelled)));
  assert!(app.users.find_by_email(EMAIL).await.unwrap().is_none());
}

#[tokio::test]
async fn logout_all_revokes_every_session() {
  let app = spawn_app();
  let cancel = CancellationToken::new();
  let registered = app
    .register
    .execute(register_command(EMAIL), &cancel)
    .await
    .unwrap();

  let response = app
    .logout_all
    .execute(registered.user_id, &cancel)
    .await
    .unwrap();
  assert_eq!(response.sessions_terminated, 1);

  let current = app.current_user.execute(registered.user_id).await.unwrap();
  assert_eq!(current.active_sessions, 0);
  assert!(
    app
      .tokens
      .find_by_token(&registered.refresh_token)
      .await
      .unwrap()
      .unwrap()
      .is_revoked
  );
}

#[tokio::test]
async fn password_policy_reports_first_failing_rule() {
  let app = spawn_app();
  let cancel = CancellationToken::new();
  let cases = [
    ("", ValidationError::EmptyPassword),
    ("Ab1!", ValidationError::PasswordTooShort { min: 8 }),
    ("abcdefg1!", ValidationError::PasswordMissingUppercase),
    ("ABCDEFG1!", ValidationError::PasswordMissingLowercase),
    ("Abcdefgh!", ValidationError::PasswordMissingDigit),
    ("Abcdefg12", ValidationError::PasswordMissingSpecial),
  ];

  for (password, expected) in cases {
    let result = app
      .register
      .execute(
        RegisterUserCommand {
          email: EMAIL.to_string(),
          password: password.to_string(),
        },
        &cancel,
      )
      .await;

    match result {
      Err(AuthError::Validation(actual)) => assert_eq!(actual, expected, "password {password:?}"),
      other => panic!("expected validation error for {password:?}, got {other:?}"),
    }
  }
}

#[tokio::test]
async fn email_shape_and_normalization() {
  assert_eq!(Email::new("A@B.COM").unwrap().as_str(), "a@b.com");
  assert_eq!(Email::new("   ").unwrap_err(), ValidationError::EmptyEmail);
  for invalid in ["ab.com", "a@b", "a b@c.com", "a@@b.com", " a@b.com"] {
    assert_eq!(
      Email::new(invalid).unwrap_err(),
      ValidationError::InvalidEmail,
      "{invalid}"
    );
  }
}

#[tokio::test]
async fn hasher_round_trip_and_malformed_hashes() {
  let hasher = Pbkdf2PasswordHasher::with_iterations(1_000);
  let password = Password::new(PASSWORD).unwrap();

  let hash = hasher.hash(&password).await.unwrap();

  assert!(hasher.verify(PASSWORD, &hash).await);
  assert!(!hasher.verify("Abcdef1?", &hash).await);
  for malformed in ["", "abc", "1.2", "x.AAAA.AAAA", "0.AAAA.AAAA", "1.!!!.AAAA"] {
    let stored = PasswordHash::from_encoded(malformed);
    assert!(!hasher.verify(PASSWORD, &stored).await, "{malformed}");
  }
}

#[test]
fn refresh_tokens_are_distinct() {
  let generator = JwtTokenGenerator::new(&jwt_settings()).unwrap();
  let tokens: std::collections::HashSet<String> =
    (0..100).map(|_| generator.generate_refresh_token()).collect();
  assert_eq!(tokens.len(), 100);
}

/// Holds every login between revoking old tokens and storing the new one
/// until all of them have revoked
struct RevokeBarrier {
  inner: Arc<InMemoryRefreshTokenRepository>,
  barrier: Barrier,
}

#[async_trait]
impl RefreshTokenRepository for RevokeBarrier {
  async fn create(&self, token: RefreshToken) -> Result<RefreshToken, AuthError> {
    self.inner.create(token).await
  }

  async fn find_by_token(&self, token: &str) -> Result<Option<RefreshToken>, AuthError> {
    self.inner.find_by_token(token).await
  }

  async fn find_active_by_user(&self, user_id: Uuid) -> Result<Vec<RefreshToken>, AuthError> {
    self.inner.find_active_by_user(user_id).await
  }

  async fn revoke_all_for_user(&self, user_id: Uuid) -> Result<u64, AuthError> {
    let revoked = self.inner.revoke_all_for_user(user_id).await?;
    self.barrier.wait().await;
    Ok(revoked)
  }

  async fn update(&self, token: RefreshToken) -> Result<RefreshToken, AuthError> {
    self.inner.update(token).await
  }
}

#[tokio::test]
async fn concurrent_logins_can_both_keep_a_valid_token() {
  let settings = jwt_settings();
  let tokens = Arc::new(InMemoryRefreshTokenRepository::new());
  let service = Arc::new(AuthService::new(
    Arc::new(InMemoryUserRepository::new()),
    Arc::new(RevokeBarrier {
      inner: tokens.clone(),
      barrier: Barrier::new(2),
    }),
    Arc::new(Pbkdf2PasswordHasher::with_iterations(1_000)),
    Arc::new(JwtTokenGenerator::new(&settings).unwrap()),
    AuthServiceConfig::try_from(&settings).unwrap(),
  ));
  let cancel = CancellationToken::new();
  let registered = RegisterUserUseCase::new(service.clone())
    .execute(register_command(EMAIL), &cancel)
    .await
    .unwrap();
  let login = LoginUserUseCase::new(service);

  let (first, second) = tokio::join!(
    login.execute(login_command(EMAIL, PASSWORD), &cancel),
    login.execute(login_command(EMAIL, PASSWORD), &cancel),
  );
  let first = first.unwrap();
  let second = second.unwrap();

  assert_ne!(first.refresh_token, second.refresh_token);
  let active = tokens.find_active_by_user(registered.user_id).await.unwrap();
  assert_eq!(active.len(), 2);
  assert!(
    active
      .iter()
      .all(|token| token.token != registered.refresh_token)
  );
}

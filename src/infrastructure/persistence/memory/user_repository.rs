use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::auth::{
  entities::User,
  errors::{AuthError, RepositoryError},
  ports::UserRepository,
};

/// UserRepository backed by a map keyed on user id
#[derive(Default)]
pub struct InMemoryUserRepository {
  users: RwLock<HashMap<Uuid, User>>,
}

impl InMemoryUserRepository {
  pub fn new() -> Self {
    Self::default()
  }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
  async fn create(&self, user: User) -> Result<User, AuthError> {
    let mut users = self.users.write().await;

    if users.values().any(|existing| existing.email == user.email) {
      return Err(AuthError::Repository(RepositoryError::DuplicateKey(
        "users_email_key".to_string(),
      )));
    }
    if users.contains_key(&user.id) {
      return Err(AuthError::Repository(RepositoryError::DuplicateKey(
        "users_pkey".to_string(),
      )));
    }

    users.insert(user.id, user.clone());
    Ok(user)
  }

  async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AuthError> {
    Ok(self.users.read().await.get(&id).cloned())
  }

  async fn find_by_email(&self, email: &str) -> Result<Option<User>, AuthError> {
    let users = self.users.read().await;
    Ok(users.values().find(|user| user.email == email).cloned())
  }

  async fn email_exists(&self, email: &str) -> Result<bool, AuthError> {
    let users = self.users.read().await;
    Ok(users.values().any(|user| user.email == email))
  }

  async fn update(&self, user: User) -> Result<User, AuthError> {
    let mut users = self.users.write().await;

    match users.get_mut(&user.id) {
      Some(existing) => {
        *existing = user.clone();
        Ok(user)
      }
      None => Err(AuthError::Repository(RepositoryError::NotFound)),
    }
  }
}

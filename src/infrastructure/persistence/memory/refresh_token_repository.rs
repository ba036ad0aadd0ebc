use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::auth::{
  entities::RefreshToken,
  errors::{AuthError, RepositoryError},
  ports::RefreshTokenRepository,
};

/// RefreshTokenRepository backed by a map keyed on the token string
#[derive(Default)]
pub struct InMemoryRefreshTokenRepository {
  tokens: RwLock<HashMap<String, RefreshToken>>,
}

impl InMemoryRefreshTokenRepository {
  pub fn new() -> Self {
    Self::default()
  }
}

#[async_trait]
impl RefreshTokenRepository for InMemoryRefreshTokenRepository {
  async fn create(&self, token: RefreshToken) -> Result<RefreshToken, AuthError> {
    let mut tokens = self.tokens.write().await;

    if tokens.contains_key(&token.token) {
      return Err(AuthError::Repository(RepositoryError::DuplicateKey(
        "refresh_tokens_token_key".to_string(),
      )));
    }

    tokens.insert(token.token.clone(), token.clone());
    Ok(token)
  }

  async fn find_by_token(&self, token: &str) -> Result<Option<RefreshToken>, AuthError> {
    Ok(self.tokens.read().await.get(token).cloned())
  }

  async fn find_active_by_user(&self, user_id: Uuid) -> Result<Vec<RefreshToken>, AuthError> {
    let now = Utc::now();
    let tokens = self.tokens.read().await;

    let mut active: Vec<RefreshToken> = tokens
      .values()
      .filter(|token| token.user_id == user_id && token.is_valid_at(now))
      .cloned()
      .collect();
    active.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    Ok(active)
  }

  async fn revoke_all_for_user(&self, user_id: Uuid) -> Result<u64, AuthError> {
    let mut tokens = self.tokens.write().await;
    let mut revoked = 0;

    for token in tokens
      .values_mut()
      .filter(|token| token.user_id == user_id && !token.is_revoked)
    {
      token.revoke();
      revoked += 1;
    }

    Ok(revoked)
  }

  async fn update(&self, token: RefreshToken) -> Result<RefreshToken, AuthError> {
    let mut tokens = self.tokens.write().await;

    match tokens.get_mut(&token.token) {
      Some(existing) if existing.id == token.id && !existing.is_revoked => {
        *existing = token.clone();
        Ok(token)
      }
      _ => Err(AuthError::Repository(RepositoryError::NotFound)),
    }
  }
}

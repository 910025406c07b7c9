//! Login, logout and token refresh against the `auth/` endpoints.

use color_eyre::{eyre::eyre, Result};
use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{info, warn};

use crate::api::{ApiClient, RequestBody};

use super::Session;

/// Error keys checked for login failures, in order.
const LOGIN_ERROR_KEYS: &[&str] = &["detail", "non_field_errors", "username"];

#[derive(Debug, Deserialize)]
struct TokenPair {
  access: String,
  refresh: Option<String>,
}

/// `auth/users/me/` response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentUser {
  pub id: u64,
  pub username: String,
  #[serde(default)]
  pub email: Option<String>,
}

/// Authentication against the API root (the base URL minus `/api`).
#[derive(Clone)]
pub struct AuthClient {
  api: ApiClient,
}

impl AuthClient {
  pub fn new(api: ApiClient) -> Self {
    Self { api }
  }

  pub fn session(&self) -> &Session {
    self.api.session()
  }

  /// Validate a saved token at startup; an invalid one is dropped.
  pub async fn init(&self) -> Result<()> {
    if !self.session().is_authenticated() {
      return Ok(());
    }
    if let Err(e) = self.fetch_user().await {
      warn!("Saved token invalid, logging out: {}", e);
      self.logout()?;
    }
    Ok(())
  }

  /// Exchange credentials for a token pair.
  pub async fn login(&self, username: &str, password: &str) -> Result<()> {
    let url = self.api.root_endpoint("auth/jwt/create")?;
    let body = RequestBody::Json(json!({ "username": username, "password": password }));

    let response = self
      .api
      .send_with(Method::POST, url, body, LOGIN_ERROR_KEYS)
      .await?;
    let tokens: TokenPair =
      serde_json::from_value(response).map_err(|e| eyre!("Malformed login response: {}", e))?;

    let session = self.session();
    session.set_tokens(tokens.access, tokens.refresh)?;
    session.set_user(Some(username.to_string()), None)?;
    info!(username, "Logged in");
    Ok(())
  }

  /// Adopt an externally issued access token, checking it against the API.
  pub async fn login_with_token(&self, access_token: &str) -> Result<CurrentUser> {
    self.session().set_tokens(access_token.to_string(), None)?;

    match self.fetch_current().await {
      Ok(user) => {
        self
          .session()
          .set_user(Some(user.username.clone()), Some(user.id))?;
        Ok(user)
      }
      Err(e) => {
        warn!("Token login failed: {}", e);
        self.logout()?;
        Err(eyre!("Invalid token"))
      }
    }
  }

  /// Refresh the signed-in user's details. `None` when not signed in.
  pub async fn fetch_user(&self) -> Result<Option<CurrentUser>> {
    if !self.session().is_authenticated() {
      return Ok(None);
    }
    let user = self.fetch_current().await?;
    self
      .session()
      .set_user(Some(user.username.clone()), Some(user.id))?;
    Ok(Some(user))
  }

  async fn fetch_current(&self) -> Result<CurrentUser> {
    let url = self.api.root_endpoint("auth/users/me")?;
    let body = self.api.get(url, &[]).await?;
    serde_json::from_value(body).map_err(|e| eyre!("Malformed user response: {}", e))
  }

  /// Trade the refresh token for a new access token. No-op without one.
  pub async fn refresh_token(&self) -> Result<()> {
    let Some(refresh) = self.session().refresh_token() else {
      return Ok(());
    };

    let url = self.api.root_endpoint("auth/jwt/refresh")?;
    let body = RequestBody::Json(json!({ "refresh": refresh }));
    let response = self.api.send(Method::POST, url, body).await?;
    let tokens: TokenPair =
      serde_json::from_value(response).map_err(|e| eyre!("Malformed refresh response: {}", e))?;

    self.session().set_tokens(tokens.access, tokens.refresh)
  }

  pub fn logout(&self) -> Result<()> {
    self.session().clear()
  }
}

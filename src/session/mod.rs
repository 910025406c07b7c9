//! Explicit session context shared by every API client.
//!
//! Holds the bearer token, the refresh token and the signed-in user. The
//! state is persisted through a [`SessionStore`] so a login survives a
//! restart.

mod auth;
mod store;

pub use auth::{AuthClient, CurrentUser};
pub use store::{NoopStore, SessionStore, SqliteStore};

use color_eyre::Result;
use std::sync::{Arc, PoisonError, RwLock};

/// Plain session data.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
  pub access_token: Option<String>,
  pub refresh_token: Option<String>,
  pub username: Option<String>,
  pub user_id: Option<u64>,
}

/// Shared, persisted session handle. Clones share state.
#[derive(Clone)]
pub struct Session {
  state: Arc<RwLock<SessionState>>,
  store: Arc<dyn SessionStore>,
}

impl std::fmt::Debug for Session {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    let state = self.snapshot();
    f.debug_struct("Session")
      .field("signed_in", &state.access_token.is_some())
      .field("username", &state.username)
      .field("user_id", &state.user_id)
      .finish_non_exhaustive()
  }
}

impl Session {
  /// Session that is not persisted.
  pub fn in_memory() -> Self {
    Self {
      state: Arc::new(RwLock::new(SessionState::default())),
      store: Arc::new(NoopStore),
    }
  }

  /// Session backed by `store`, starting from whatever it holds.
  pub fn with_store(store: impl SessionStore + 'static) -> Result<Self> {
    let state = store.load()?.unwrap_or_default();
    Ok(Self {
      state: Arc::new(RwLock::new(state)),
      store: Arc::new(store),
    })
  }

  /// Bearer token for the next request, if signed in.
  pub fn token(&self) -> Option<String> {
    self.read().access_token.clone()
  }

  pub fn refresh_token(&self) -> Option<String> {
    self.read().refresh_token.clone()
  }

  pub fn username(&self) -> Option<String> {
    self.read().username.clone()
  }

  pub fn user_id(&self) -> Option<u64> {
    self.read().user_id
  }

  pub fn is_authenticated(&self) -> bool {
    self.read().access_token.is_some()
  }

  pub fn snapshot(&self) -> SessionState {
    self.read().clone()
  }

  /// Store a new access token, and the refresh token when one is given.
  pub fn set_tokens(&self, access: String, refresh: Option<String>) -> Result<()> {
    self.update(|state| {
      state.access_token = Some(access);
      if refresh.is_some() {
        state.refresh_token = refresh;
      }
    })
  }

  pub fn set_user(&self, username: Option<String>, user_id: Option<u64>) -> Result<()> {
    self.update(|state| {
      state.username = username;
      if user_id.is_some() {
        state.user_id = user_id;
      }
    })
  }

  /// Forget user and tokens.
  pub fn clear(&self) -> Result<()> {
    self.update(|state| *state = SessionState::default())
  }

  fn read(&self) -> std::sync::RwLockReadGuard<'_, SessionState> {
    self.state.read().unwrap_or_else(PoisonError::into_inner)
  }

  fn update(&self, f: impl FnOnce(&mut SessionState)) -> Result<()> {
    let snapshot = {
      let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
      f(&mut state);
      state.clone()
    };
    self.store.save(&snapshot)
  }
}

//! Partner data repositories hosting the audio.

use color_eyre::Result;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, PoisonError};
use url::Url;

use crate::api::ApiClient;
use crate::cache::{require_text, Entity, Resource, ResourceStore};

/// Repository preselected after loading when nothing is selected yet.
const DEFAULT_REPOSITORY_ID: u64 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Repository {
  pub id: u64,
  pub name: String,
  #[serde(default)]
  pub description: Option<String>,
  /// Logo path as served by the API, usually relative
  #[serde(default)]
  pub logo: Option<String>,
  /// Absolute logo URL, filled in after every read
  #[serde(default)]
  pub logo_url: Option<String>,
  #[serde(default)]
  pub area: Option<String>,
  #[serde(default)]
  pub url: Option<String>,
  #[serde(default)]
  pub url_api: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RepositoryPayload {
  pub name: String,
  pub description: Option<String>,
  pub area: Option<String>,
  pub url: Option<String>,
  pub url_api: Option<String>,
}

impl Entity for Repository {
  fn id(&self) -> u64 {
    self.id
  }
}

impl Resource for Repository {
  type Payload = RepositoryPayload;
  const PATH: &'static str = "repository";

  fn normalize(mut self, root: &Url) -> Self {
    self.logo_url = self
      .logo
      .as_deref()
      .filter(|logo| !logo.is_empty())
      .and_then(|logo| root.join(logo.trim_start_matches('/')).ok())
      .map(String::from);
    self
  }

  fn validate(payload: &RepositoryPayload) -> Result<()> {
    require_text("name", &payload.name)
  }
}

/// Repository store that also tracks the repository being browsed.
#[derive(Clone)]
pub struct RepositoryStore {
  store: ResourceStore<Repository>,
  selected: Arc<Mutex<Option<Repository>>>,
}

impl RepositoryStore {
  pub fn new(api: ApiClient) -> Self {
    Self {
      store: ResourceStore::new(api),
      selected: Arc::new(Mutex::new(None)),
    }
  }

  pub fn store(&self) -> &ResourceStore<Repository> {
    &self.store
  }

  /// Load every repository and preselect the default one if none is
  /// selected.
  pub async fn fetch(&self) -> Vec<Repository> {
    let all = self.store.fetch_all().await;

    let mut selected = self.selected.lock().unwrap_or_else(PoisonError::into_inner);
    if selected.is_none() {
      *selected = all
        .iter()
        .find(|r| r.id == DEFAULT_REPOSITORY_ID)
        .or_else(|| all.first())
        .cloned();
    }

    all
  }

  pub fn select(&self, repository: Repository) {
    *self.selected.lock().unwrap_or_else(PoisonError::into_inner) = Some(repository);
  }

  pub fn selected(&self) -> Option<Repository> {
    self
      .selected
      .lock()
      .unwrap_or_else(PoisonError::into_inner)
      .clone()
  }
}

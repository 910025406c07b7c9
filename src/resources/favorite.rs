//! Per-user bookmarks on catalog entries.

use chrono::{DateTime, Utc};
use color_eyre::{eyre::eyre, Result};
use serde::{Deserialize, Serialize};

use crate::api::ApiClient;
use crate::cache::{Entity, Resource, ResourceStore};

/// Kinds of records that can be bookmarked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
  Protocol,
  Software,
  Hardware,
  #[serde(rename = "animalprofile")]
  AnimalProfile,
  Strain,
  Species,
  Reference,
  Contact,
  /// A kind this client does not know; read-only
  #[serde(other)]
  Unknown,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Favorite {
  pub id: u64,
  pub content_type: ContentType,
  pub object_id: u64,
  #[serde(default)]
  pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FavoritePayload {
  pub content_type_name: ContentType,
  pub object_id: u64,
}

impl Entity for Favorite {
  fn id(&self) -> u64 {
    self.id
  }
}

impl Resource for Favorite {
  type Payload = FavoritePayload;
  const PATH: &'static str = "favorite";

  fn validate(payload: &FavoritePayload) -> Result<()> {
    if payload.content_type_name == ContentType::Unknown {
      return Err(eyre!("content_type_name is not a known kind"));
    }
    if payload.object_id == 0 {
      return Err(eyre!("object_id is required"));
    }
    Ok(())
  }
}

/// Favorites store with lookups by bookmarked record.
#[derive(Clone)]
pub struct FavoriteStore {
  store: ResourceStore<Favorite>,
}

impl FavoriteStore {
  pub fn new(api: ApiClient) -> Self {
    Self {
      store: ResourceStore::new(api),
    }
  }

  pub fn store(&self) -> &ResourceStore<Favorite> {
    &self.store
  }

  pub async fn fetch_all(&self) -> Vec<Favorite> {
    self.store.fetch_all().await
  }

  /// Id of the favorite pointing at `(content_type, object_id)`.
  pub fn favorite_id(&self, content_type: ContentType, object_id: u64) -> Option<u64> {
    if content_type == ContentType::Unknown {
      return None;
    }
    self
      .store
      .items()
      .into_iter()
      .find(|f| f.content_type == content_type && f.object_id == object_id)
      .map(|f| f.id)
  }

  pub fn is_favorite(&self, content_type: ContentType, object_id: u64) -> bool {
    self.favorite_id(content_type, object_id).is_some()
  }

  pub fn is_empty(&self) -> bool {
    self.store.is_empty()
  }

  /// Bookmark a record. `None` when it already is one.
  pub async fn add(&self, content_type: ContentType, object_id: u64) -> Result<Option<Favorite>> {
    if self.is_favorite(content_type, object_id) {
      return Ok(None);
    }
    let payload = FavoritePayload {
      content_type_name: content_type,
      object_id,
    };
    self.store.create(&payload).await.map(Some)
  }

  pub async fn remove(&self, favorite_id: u64) -> Result<()> {
    self.store.delete(favorite_id).await
  }

  /// Flip the bookmark. Returns whether the record is now a favorite.
  pub async fn toggle(&self, content_type: ContentType, object_id: u64) -> Result<bool> {
    match self.favorite_id(content_type, object_id) {
      Some(id) => {
        self.remove(id).await?;
        Ok(false)
      }
      None => {
        self.add(content_type, object_id).await?;
        Ok(true)
      }
    }
  }
}

//! Core traits describing how a REST resource plugs into the cache.

use color_eyre::{eyre::eyre, Result};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use url::Url;

use crate::api::RequestBody;

/// A record addressable by a unique integer id.
pub trait Entity: Clone + Send + Sync + Serialize + DeserializeOwned + 'static {
  /// Server-assigned identifier
  fn id(&self) -> u64;
}

/// HTTP verb used for updates. Some endpoints only accept partial updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateMethod {
  Put,
  Patch,
}

/// A REST resource served at `{base}/{PATH}/` and `{base}/{PATH}/{id}/`.
///
/// The defaults describe a resource whose wire format is identical to its
/// client format. Resources that are flat on the wire but nested on the
/// client override [`Resource::unflatten`] and [`Resource::flatten`] as an
/// inverse pair.
pub trait Resource: Entity {
  /// Typed body accepted by create and update.
  type Payload: Serialize + Send + Sync;

  /// Endpoint path segment (e.g. "contact", "recording-session")
  const PATH: &'static str;

  /// Verb used by `update`
  const UPDATE_METHOD: UpdateMethod = UpdateMethod::Put;

  /// Nested relation fields kept from the local copy when an update
  /// response leaves them out.
  const RELATIONS: &'static [&'static str] = &[];

  /// Wire record -> client entity. Applied after every read.
  fn unflatten(wire: Value) -> Result<Self> {
    serde_json::from_value(wire)
      .map_err(|e| eyre!("Failed to parse {} response: {}", Self::PATH, e))
  }

  /// Client payload -> wire record. Applied before every write.
  fn flatten(payload: &Self::Payload) -> Result<Value> {
    serde_json::to_value(payload)
      .map_err(|e| eyre!("Failed to serialize {} payload: {}", Self::PATH, e))
  }

  /// Per-entity fix-ups run after `unflatten`. `root` is the API origin.
  fn normalize(self, _root: &Url) -> Self {
    self
  }

  /// Reject payloads the server would refuse before anything is sent.
  fn validate(_payload: &Self::Payload) -> Result<()> {
    Ok(())
  }

  /// Encode a payload for the wire. JSON unless overridden.
  fn body(payload: &Self::Payload) -> Result<RequestBody> {
    Ok(RequestBody::Json(Self::flatten(payload)?))
  }
}

/// Loading/error flags for a store.
///
/// `loading` is per store, not per request: with overlapping calls it
/// reflects whichever call settled last.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchState {
  pub loading: bool,
  pub error: Option<String>,
}

/// Fail with a precondition error when a required text field is blank.
pub fn require_text(field: &str, value: &str) -> Result<()> {
  if value.trim().is_empty() {
    return Err(eyre!("{} must not be empty", field));
  }
  Ok(())
}

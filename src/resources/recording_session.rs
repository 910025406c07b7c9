use chrono::{DateTime, Utc};
use color_eyre::{eyre::eyre, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::cache::{require_text, Entity, Resource, UpdateMethod};

use super::{Laboratory, Protocol};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordingSession {
  pub id: u64,
  pub name: String,
  #[serde(default)]
  pub description: Option<String>,
  #[serde(default)]
  pub date: Option<DateTime<Utc>>,
  /// Seconds
  #[serde(default)]
  pub duration: Option<u64>,
  #[serde(default)]
  pub protocol: Option<Protocol>,
  #[serde(default)]
  pub laboratory: Option<Laboratory>,
  #[serde(default)]
  pub studies: Vec<u64>,
  #[serde(default)]
  pub equipment_acquisition_software: Vec<u64>,
  #[serde(default)]
  pub equipment_acquisition_hardware: Vec<u64>,
  #[serde(default)]
  pub created_at: Option<DateTime<Utc>>,
  #[serde(default)]
  pub modified_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RecordingSessionPayload {
  pub name: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub description: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub date: Option<DateTime<Utc>>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub duration: Option<u64>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub protocol_id: Option<u64>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub laboratory_id: Option<u64>,
  #[serde(skip_serializing_if = "Vec::is_empty")]
  pub studies: Vec<u64>,
}

impl Entity for RecordingSession {
  fn id(&self) -> u64 {
    self.id
  }
}

impl Resource for RecordingSession {
  type Payload = RecordingSessionPayload;
  const PATH: &'static str = "recording-session";
  const UPDATE_METHOD: UpdateMethod = UpdateMethod::Patch;
  const RELATIONS: &'static [&'static str] = &["protocol", "laboratory"];

  /// The embedded protocol arrives in its flat wire form.
  fn unflatten(mut wire: Value) -> Result<Self> {
    if let Some(protocol) = wire.get_mut("protocol").filter(|p| p.is_object()) {
      let nested = <Protocol as Resource>::unflatten(protocol.take())?;
      *protocol = serde_json::to_value(nested)
        .map_err(|e| eyre!("Failed to serialize protocol: {}", e))?;
    }
    serde_json::from_value(wire).map_err(|e| eyre!("Failed to parse recording-session: {}", e))
  }

  fn validate(payload: &RecordingSessionPayload) -> Result<()> {
    require_text("name", &payload.name)
  }
}

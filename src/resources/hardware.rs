use chrono::{DateTime, Utc};
use color_eyre::Result;
use serde::{Deserialize, Serialize};

use crate::cache::{require_text, Entity, Resource};

/// Recording hardware (microphones, sound cards, amplifiers).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hardware {
  pub id: u64,
  pub name: String,
  #[serde(default, rename = "type")]
  pub hardware_type: Option<String>,
  #[serde(default)]
  pub made_by: Option<String>,
  #[serde(default)]
  pub description: Option<String>,
  #[serde(default)]
  pub references: Vec<u64>,
  #[serde(default)]
  pub created_at: Option<DateTime<Utc>>,
  #[serde(default)]
  pub modified_at: Option<DateTime<Utc>>,
  #[serde(default)]
  pub created_by: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct HardwarePayload {
  pub name: String,
  #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
  pub hardware_type: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub made_by: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub description: Option<String>,
  pub references: Vec<u64>,
}

impl Entity for Hardware {
  fn id(&self) -> u64 {
    self.id
  }
}

impl Resource for Hardware {
  type Payload = HardwarePayload;
  const PATH: &'static str = "hardware";

  fn validate(payload: &HardwarePayload) -> Result<()> {
    require_text("name", &payload.name)
  }
}

use chrono::{DateTime, Utc};
use color_eyre::Result;
use serde::{Deserialize, Serialize};

use crate::cache::{require_text, Entity, Resource, UpdateMethod};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Laboratory {
  pub id: u64,
  pub name: String,
  #[serde(default)]
  pub institution: Option<String>,
  #[serde(default)]
  pub unit: Option<String>,
  #[serde(default)]
  pub address: Option<String>,
  #[serde(default)]
  pub country: Option<String>,
  #[serde(default)]
  pub contact: Option<String>,
  #[serde(default)]
  pub created_at: Option<DateTime<Utc>>,
  #[serde(default)]
  pub modified_at: Option<DateTime<Utc>>,
  #[serde(default)]
  pub created_by: Option<u64>,
}

/// `country` is always sent, as null when unknown; the API rejects a
/// laboratory without the key.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LaboratoryPayload {
  pub name: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub institution: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub unit: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub address: Option<String>,
  pub country: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub contact: Option<String>,
}

impl Entity for Laboratory {
  fn id(&self) -> u64 {
    self.id
  }
}

impl Resource for Laboratory {
  type Payload = LaboratoryPayload;
  const PATH: &'static str = "laboratory";
  const UPDATE_METHOD: UpdateMethod = UpdateMethod::Patch;

  fn validate(payload: &LaboratoryPayload) -> Result<()> {
    require_text("name", &payload.name)
  }
}

use chrono::{DateTime, Utc};
use color_eyre::Result;
use serde::{Deserialize, Serialize};

use crate::cache::{require_text, Entity, Resource};

use super::ValidationStatus;

/// Bibliographic reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reference {
  pub id: u64,
  pub name: String,
  #[serde(default)]
  pub description: Option<String>,
  #[serde(default)]
  pub url: Option<String>,
  #[serde(default)]
  pub doi: Option<String>,
  #[serde(default)]
  pub status: Option<ValidationStatus>,
  #[serde(default)]
  pub created_by: Option<u64>,
  #[serde(default)]
  pub created_at: Option<DateTime<Utc>>,
  #[serde(default)]
  pub modified_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ReferencePayload {
  pub name: String,
  pub description: Option<String>,
  pub url: Option<String>,
  pub doi: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub status: Option<ValidationStatus>,
}

impl Entity for Reference {
  fn id(&self) -> u64 {
    self.id
  }
}

impl Resource for Reference {
  type Payload = ReferencePayload;
  const PATH: &'static str = "reference";

  fn validate(payload: &ReferencePayload) -> Result<()> {
    require_text("name", &payload.name)
  }
}

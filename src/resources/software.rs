use chrono::{DateTime, Utc};
use color_eyre::Result;
use serde::{Deserialize, Serialize};

use crate::cache::{require_text, Entity, Resource};

/// Acquisition or analysis software.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Software {
  pub id: u64,
  pub name: String,
  #[serde(default, rename = "type")]
  pub software_type: Option<String>,
  #[serde(default)]
  pub made_by: Option<String>,
  #[serde(default)]
  pub description: Option<String>,
  #[serde(default)]
  pub technical_requirements: Option<String>,
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
pub struct SoftwarePayload {
  pub name: String,
  #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
  pub software_type: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub made_by: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub description: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub technical_requirements: Option<String>,
  pub references: Vec<u64>,
}

impl Entity for Software {
  fn id(&self) -> u64 {
    self.id
  }
}

impl Resource for Software {
  type Payload = SoftwarePayload;
  const PATH: &'static str = "software";

  fn validate(payload: &SoftwarePayload) -> Result<()> {
    require_text("name", &payload.name)
  }
}

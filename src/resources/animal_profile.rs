use chrono::{DateTime, Utc};
use color_eyre::Result;
use serde::{Deserialize, Serialize};

use crate::cache::{require_text, Entity, Resource};

use super::Strain;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimalProfile {
  pub id: u64,
  pub name: String,
  #[serde(default)]
  pub strain: Option<Strain>,
  #[serde(default)]
  pub description: Option<String>,
  #[serde(default)]
  pub sex: Option<String>,
  #[serde(default)]
  pub genotype: Option<String>,
  #[serde(default)]
  pub treatment: Option<String>,
  #[serde(default)]
  pub created_at: Option<DateTime<Utc>>,
  #[serde(default)]
  pub modified_at: Option<DateTime<Utc>>,
  #[serde(default)]
  pub created_by: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AnimalProfilePayload {
  pub name: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub strain_id: Option<u64>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub description: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub sex: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub genotype: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub treatment: Option<String>,
}

impl Entity for AnimalProfile {
  fn id(&self) -> u64 {
    self.id
  }
}

impl Resource for AnimalProfile {
  type Payload = AnimalProfilePayload;
  const PATH: &'static str = "animalprofile";
  const RELATIONS: &'static [&'static str] = &["strain"];

  fn validate(payload: &AnimalProfilePayload) -> Result<()> {
    require_text("name", &payload.name)
  }
}

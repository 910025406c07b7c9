use chrono::{DateTime, Utc};
use color_eyre::Result;
use serde::{Deserialize, Serialize};

use crate::cache::{require_text, Entity, Resource};

use super::Species;

/// Animal strain. `species` is nested on reads, referenced by id on writes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Strain {
  pub id: u64,
  pub name: String,
  #[serde(default)]
  pub species: Option<Species>,
  #[serde(default)]
  pub background: Option<String>,
  #[serde(default)]
  pub bibliography: Option<String>,
  #[serde(default)]
  pub created_at: Option<DateTime<Utc>>,
  #[serde(default)]
  pub modified_at: Option<DateTime<Utc>>,
  #[serde(default)]
  pub created_by: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StrainPayload {
  pub name: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub species_id: Option<u64>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub background: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub bibliography: Option<String>,
}

impl Entity for Strain {
  fn id(&self) -> u64 {
    self.id
  }
}

impl Resource for Strain {
  type Payload = StrainPayload;
  const PATH: &'static str = "strain";
  const RELATIONS: &'static [&'static str] = &["species"];

  fn validate(payload: &StrainPayload) -> Result<()> {
    require_text("name", &payload.name)
  }
}

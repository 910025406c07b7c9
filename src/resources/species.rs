use chrono::{DateTime, Utc};
use color_eyre::Result;
use serde::{Deserialize, Serialize};

use crate::cache::{require_text, Entity, Resource};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Species {
  pub id: u64,
  pub name: String,
  #[serde(default)]
  pub created_at: Option<DateTime<Utc>>,
  #[serde(default)]
  pub modified_at: Option<DateTime<Utc>>,
  #[serde(default)]
  pub created_by: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SpeciesPayload {
  pub name: String,
}

impl Entity for Species {
  fn id(&self) -> u64 {
    self.id
  }
}

impl Resource for Species {
  type Payload = SpeciesPayload;
  const PATH: &'static str = "species";

  fn validate(payload: &SpeciesPayload) -> Result<()> {
    require_text("name", &payload.name)
  }
}

use chrono::{DateTime, Utc};
use color_eyre::Result;
use serde::{Deserialize, Serialize};

use crate::cache::{require_text, Entity, Resource};

use super::AnimalProfile;

/// Owner of a subject as embedded by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubjectUser {
  pub id: u64,
  #[serde(default)]
  pub name_user: Option<String>,
  #[serde(default)]
  pub first_name_user: Option<String>,
  #[serde(default)]
  pub email_user: Option<String>,
  #[serde(default)]
  pub unit_user: Option<String>,
  #[serde(default)]
  pub institution_user: Option<String>,
  #[serde(default)]
  pub address_user: Option<String>,
  #[serde(default)]
  pub country_user: Option<String>,
}

/// Individual animal recorded in a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subject {
  pub id: u64,
  pub name: String,
  #[serde(default)]
  pub user: Option<SubjectUser>,
  #[serde(default)]
  pub animal_profile: Option<AnimalProfile>,
  #[serde(default)]
  pub identifier: Option<String>,
  #[serde(default)]
  pub cohort: Option<String>,
  #[serde(default)]
  pub origin: Option<String>,
  #[serde(default)]
  pub created_at: Option<DateTime<Utc>>,
  #[serde(default)]
  pub modified_at: Option<DateTime<Utc>>,
  #[serde(default)]
  pub created_by: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SubjectPayload {
  pub name: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub animal_profile_id: Option<u64>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub identifier: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub cohort: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub origin: Option<String>,
}

impl Entity for Subject {
  fn id(&self) -> u64 {
    self.id
  }
}

impl Resource for Subject {
  type Payload = SubjectPayload;
  const PATH: &'static str = "subject";
  const RELATIONS: &'static [&'static str] = &["user", "animal_profile"];

  fn validate(payload: &SubjectPayload) -> Result<()> {
    require_text("name", &payload.name)
  }
}

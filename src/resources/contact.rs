use chrono::{DateTime, Utc};
use color_eyre::{eyre::eyre, Result};
use serde::{Deserialize, Serialize};

use crate::cache::{require_text, Entity, Resource, UpdateMethod};

use super::ValidationStatus;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contact {
  pub id: u64,
  pub first_name: String,
  pub last_name: String,
  #[serde(default)]
  pub email: Option<String>,
  #[serde(default)]
  pub phone: Option<String>,
  #[serde(default)]
  pub institution: Option<String>,
  #[serde(default)]
  pub position: Option<String>,
  #[serde(default)]
  pub unit: Option<String>,
  #[serde(default)]
  pub address: Option<String>,
  #[serde(default)]
  pub country: Option<String>,
  #[serde(default)]
  pub status: Option<ValidationStatus>,
  #[serde(default)]
  pub created_at: Option<DateTime<Utc>>,
  #[serde(default)]
  pub modified_at: Option<DateTime<Utc>>,
  #[serde(default)]
  pub created_by: Option<u64>,
}

/// Fields accepted on create and (partial) update. Unset fields are not
/// sent.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ContactPayload {
  pub first_name: String,
  pub last_name: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub email: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub phone: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub institution: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub position: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub unit: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub address: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub country: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub status: Option<ValidationStatus>,
}

impl Entity for Contact {
  fn id(&self) -> u64 {
    self.id
  }
}

impl Resource for Contact {
  type Payload = ContactPayload;
  const PATH: &'static str = "contact";
  const UPDATE_METHOD: UpdateMethod = UpdateMethod::Patch;

  fn validate(payload: &ContactPayload) -> Result<()> {
    require_text("first_name", &payload.first_name)?;
    require_text("last_name", &payload.last_name)?;
    if let Some(email) = payload.email.as_deref() {
      if !email.contains('@') {
        return Err(eyre!("email is not a valid address: {}", email));
      }
    }
    Ok(())
  }
}

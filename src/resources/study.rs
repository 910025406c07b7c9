use chrono::{DateTime, NaiveDate, Utc};
use color_eyre::{eyre::eyre, Result};
use serde::{Deserialize, Serialize};

use crate::cache::{require_text, Entity, Resource};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Study {
  pub id: u64,
  pub name: String,
  #[serde(default)]
  pub description: Option<String>,
  #[serde(default)]
  pub start_date: Option<NaiveDate>,
  #[serde(default)]
  pub end_date: Option<NaiveDate>,
  #[serde(default)]
  pub created_at: Option<DateTime<Utc>>,
  #[serde(default)]
  pub modified_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StudyPayload {
  pub name: String,
  pub description: Option<String>,
  pub start_date: Option<NaiveDate>,
  pub end_date: Option<NaiveDate>,
}

impl Entity for Study {
  fn id(&self) -> u64 {
    self.id
  }
}

impl Resource for Study {
  type Payload = StudyPayload;
  const PATH: &'static str = "study";

  fn validate(payload: &StudyPayload) -> Result<()> {
    require_text("name", &payload.name)?;
    if let (Some(start), Some(end)) = (payload.start_date, payload.end_date) {
      if end < start {
        return Err(eyre!("end_date {} is before start_date {}", end, start));
      }
    }
    Ok(())
  }
}

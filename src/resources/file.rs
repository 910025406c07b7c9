use chrono::{DateTime, Utc};
use color_eyre::{eyre::eyre, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::api::{Attachment, MultipartBody, RequestBody};
use crate::cache::{Entity, Resource};

use super::{RecordingSession, Subject};

/// Audio file of a recording.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct File {
  pub id: u64,
  #[serde(default)]
  pub name: Option<String>,
  /// Download URL of the uploaded audio, if hosted by the platform
  #[serde(default)]
  pub file: Option<String>,
  /// External location when the audio is hosted elsewhere
  #[serde(default)]
  pub link: Option<String>,
  #[serde(default)]
  pub doi: Option<String>,
  #[serde(default)]
  pub format: Option<String>,
  #[serde(default)]
  pub sampling_rate: Option<u32>,
  #[serde(default)]
  pub bit_depth: Option<u16>,
  /// Seconds
  #[serde(default)]
  pub duration: Option<f64>,
  #[serde(default)]
  pub is_valid_link: Option<bool>,
  #[serde(default)]
  pub recording_session: Option<RecordingSession>,
  #[serde(default)]
  pub subject: Option<Subject>,
  #[serde(default)]
  pub created_at: Option<DateTime<Utc>>,
  #[serde(default)]
  pub modified_at: Option<DateTime<Utc>>,
}

/// File metadata plus the audio itself. With an attachment the body goes
/// out as multipart, otherwise as JSON.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FilePayload {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub name: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub link: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub doi: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub format: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub sampling_rate: Option<u32>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub bit_depth: Option<u16>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub duration: Option<f64>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub recording_session_id: Option<u64>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub subject_id: Option<u64>,
  #[serde(skip)]
  pub attachment: Option<Attachment>,
}

impl Entity for File {
  fn id(&self) -> u64 {
    self.id
  }
}

impl Resource for File {
  type Payload = FilePayload;
  const PATH: &'static str = "file";
  const RELATIONS: &'static [&'static str] = &["recording_session", "subject"];

  fn unflatten(mut wire: Value) -> Result<Self> {
    if let Some(session) = wire.get_mut("recording_session").filter(|s| s.is_object()) {
      let nested = <RecordingSession as Resource>::unflatten(session.take())?;
      *session = serde_json::to_value(nested)
        .map_err(|e| eyre!("Failed to serialize recording session: {}", e))?;
    }
    serde_json::from_value(wire).map_err(|e| eyre!("Failed to parse file: {}", e))
  }

  fn validate(payload: &FilePayload) -> Result<()> {
    if let Some(rate) = payload.sampling_rate {
      if rate == 0 {
        return Err(eyre!("sampling_rate must be positive"));
      }
    }
    if let Some(duration) = payload.duration {
      if !duration.is_finite() || duration < 0.0 {
        return Err(eyre!("duration must be a non-negative number"));
      }
    }
    Ok(())
  }

  fn body(payload: &FilePayload) -> Result<RequestBody> {
    let fields = Self::flatten(payload)?;
    Ok(match &payload.attachment {
      Some(attachment) => {
        RequestBody::Multipart(MultipartBody::from_json(&fields).attach(attachment.clone()))
      }
      None => RequestBody::Json(fields),
    })
  }
}

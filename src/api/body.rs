//! Request bodies: JSON, or multipart when a file is attached.

use color_eyre::{eyre::eyre, Result};
use reqwest::multipart::{Form, Part};
use serde_json::Value;

/// A file sent as one part of a multipart body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
  /// Form field name (e.g. "file")
  pub field: String,
  pub file_name: String,
  pub mime: Option<String>,
  pub bytes: Vec<u8>,
}

impl Attachment {
  /// Read a file from disk, naming the part after the file.
  pub fn from_path(field: &str, path: &std::path::Path) -> Result<Self> {
    let bytes = std::fs::read(path)
      .map_err(|e| eyre!("Failed to read attachment {}: {}", path.display(), e))?;
    let file_name = path
      .file_name()
      .map(|n| n.to_string_lossy().into_owned())
      .ok_or_else(|| eyre!("Attachment path has no file name: {}", path.display()))?;

    Ok(Self {
      field: field.to_string(),
      file_name,
      mime: None,
      bytes,
    })
  }
}

/// Multipart form built from a flat JSON object plus an optional file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MultipartBody {
  pub fields: Vec<(String, String)>,
  pub attachment: Option<Attachment>,
}

impl MultipartBody {
  /// Text parts from the top-level fields of `value`. Nulls are skipped,
  /// nested values are sent as JSON text.
  pub fn from_json(value: &Value) -> Self {
    let fields = match value {
      Value::Object(map) => map
        .iter()
        .filter_map(|(k, v)| {
          let text = match v {
            Value::Null => return None,
            Value::String(s) => s.clone(),
            _ => v.to_string(),
          };
          Some((k.clone(), text))
        })
        .collect(),
      _ => Vec::new(),
    };

    Self {
      fields,
      attachment: None,
    }
  }

  pub fn attach(mut self, attachment: Attachment) -> Self {
    self.attachment = Some(attachment);
    self
  }

  pub(crate) fn into_form(self) -> Result<Form> {
    let mut form = Form::new();
    for (name, value) in self.fields {
      form = form.text(name, value);
    }

    if let Some(file) = self.attachment {
      let mut part = Part::bytes(file.bytes).file_name(file.file_name);
      if let Some(mime) = file.mime.as_deref() {
        part = part
          .mime_str(mime)
          .map_err(|e| eyre!("Invalid attachment type {}: {}", mime, e))?;
      }
      form = form.part(file.field, part);
    }

    Ok(form)
  }
}

/// Body of a write request.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
  Json(Value),
  Multipart(MultipartBody),
}

//! Experimental protocol.
//!
//! The API stores a protocol as one flat record (`animals_sex`,
//! `context_temperature_value`, ...). Clients work with the grouped form
//! (`animals.sex`, `context.temperature.value`). [`flatten`] and
//! [`unflatten`] convert between the two and are exact inverses.

use chrono::{DateTime, Utc};
use color_eyre::{eyre::eyre, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::cache::{require_text, Entity, Resource};

use super::ValidationStatus;

// ============================================================================
// Client (nested) form
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnimalConditions {
  pub sex: Option<String>,
  pub age: Option<String>,
  pub housing: Option<String>,
  pub species: Option<String>,
}

/// A value with its unit, e.g. 22.5 °C.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
  pub value: Option<f64>,
  pub unit: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContextConditions {
  pub duration: Option<String>,
  pub cage: Option<String>,
  pub bedding: Option<String>,
  pub light_cycle: Option<String>,
  #[serde(default)]
  pub temperature: Measurement,
  #[serde(default)]
  pub brightness: Measurement,
}

/// Everything about a protocol except server-managed fields. Also the
/// create/update payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProtocolFields {
  pub name: String,
  pub description: Option<String>,
  #[serde(default)]
  pub animals: AnimalConditions,
  #[serde(default)]
  pub context: ContextConditions,
  pub method: Option<String>,
  pub status: Option<ValidationStatus>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Protocol {
  pub id: u64,
  #[serde(flatten)]
  pub fields: ProtocolFields,
  #[serde(default)]
  pub created_at: Option<DateTime<Utc>>,
  #[serde(default)]
  pub modified_at: Option<DateTime<Utc>>,
  #[serde(default)]
  pub created_by: Option<u64>,
}

// ============================================================================
// Wire (flat) form
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FlatProtocolFields {
  pub name: String,
  #[serde(default)]
  pub description: Option<String>,
  #[serde(default)]
  pub animals_sex: Option<String>,
  #[serde(default)]
  pub animals_age: Option<String>,
  #[serde(default)]
  pub animals_housing: Option<String>,
  #[serde(default)]
  pub animals_species: Option<String>,
  #[serde(default)]
  pub context_duration: Option<String>,
  #[serde(default)]
  pub context_cage: Option<String>,
  #[serde(default)]
  pub context_bedding: Option<String>,
  #[serde(default)]
  pub context_light_cycle: Option<String>,
  #[serde(default)]
  pub context_temperature_value: Option<f64>,
  #[serde(default)]
  pub context_temperature_unit: Option<String>,
  #[serde(default)]
  pub context_brightness_value: Option<f64>,
  #[serde(default)]
  pub context_brightness_unit: Option<String>,
  #[serde(default)]
  pub method: Option<String>,
  #[serde(default)]
  pub status: Option<ValidationStatus>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlatProtocol {
  pub id: u64,
  #[serde(flatten)]
  pub fields: FlatProtocolFields,
  #[serde(default)]
  pub created_at: Option<DateTime<Utc>>,
  #[serde(default)]
  pub modified_at: Option<DateTime<Utc>>,
  #[serde(default)]
  pub created_by: Option<u64>,
}

impl From<&ProtocolFields> for FlatProtocolFields {
  fn from(p: &ProtocolFields) -> Self {
    let ProtocolFields {
      name,
      description,
      animals,
      context,
      method,
      status,
    } = p.clone();

    Self {
      name,
      description,
      animals_sex: animals.sex,
      animals_age: animals.age,
      animals_housing: animals.housing,
      animals_species: animals.species,
      context_duration: context.duration,
      context_cage: context.cage,
      context_bedding: context.bedding,
      context_light_cycle: context.light_cycle,
      context_temperature_value: context.temperature.value,
      context_temperature_unit: context.temperature.unit,
      context_brightness_value: context.brightness.value,
      context_brightness_unit: context.brightness.unit,
      method,
      status,
    }
  }
}

impl From<FlatProtocolFields> for ProtocolFields {
  fn from(f: FlatProtocolFields) -> Self {
    Self {
      name: f.name,
      description: f.description,
      animals: AnimalConditions {
        sex: f.animals_sex,
        age: f.animals_age,
        housing: f.animals_housing,
        species: f.animals_species,
      },
      context: ContextConditions {
        duration: f.context_duration,
        cage: f.context_cage,
        bedding: f.context_bedding,
        light_cycle: f.context_light_cycle,
        temperature: Measurement {
          value: f.context_temperature_value,
          unit: f.context_temperature_unit,
        },
        brightness: Measurement {
          value: f.context_brightness_value,
          unit: f.context_brightness_unit,
        },
      },
      method: f.method,
      status: f.status,
    }
  }
}

/// Nested protocol -> wire record.
pub fn flatten(protocol: &Protocol) -> FlatProtocol {
  FlatProtocol {
    id: protocol.id,
    fields: FlatProtocolFields::from(&protocol.fields),
    created_at: protocol.created_at,
    modified_at: protocol.modified_at,
    created_by: protocol.created_by,
  }
}

/// Wire record -> nested protocol.
pub fn unflatten(flat: FlatProtocol) -> Protocol {
  Protocol {
    id: flat.id,
    fields: ProtocolFields::from(flat.fields),
    created_at: flat.created_at,
    modified_at: flat.modified_at,
    created_by: flat.created_by,
  }
}

impl Entity for Protocol {
  fn id(&self) -> u64 {
    self.id
  }
}

impl Resource for Protocol {
  type Payload = ProtocolFields;
  const PATH: &'static str = "protocol";

  fn unflatten(wire: Value) -> Result<Self> {
    let flat: FlatProtocol =
      serde_json::from_value(wire).map_err(|e| eyre!("Failed to parse protocol: {}", e))?;
    Ok(unflatten(flat))
  }

  fn flatten(payload: &ProtocolFields) -> Result<Value> {
    serde_json::to_value(FlatProtocolFields::from(payload))
      .map_err(|e| eyre!("Failed to serialize protocol: {}", e))
  }

  fn validate(payload: &ProtocolFields) -> Result<()> {
    require_text("name", &payload.name)
  }
}

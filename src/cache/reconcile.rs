//! Merging write responses into locally held entities.

use color_eyre::{eyre::eyre, Result};
use serde_json::Value;

use super::traits::Entity;

/// Fill relation fields the server left out of `updated` from `previous`.
///
/// A relation counts as left out when its key is missing or null in the
/// response. Everything else comes from the response unchanged.
pub fn preserve_relations<T: Entity>(
  updated: T,
  previous: Option<&T>,
  relations: &[&str],
) -> Result<T> {
  let previous = match previous {
    Some(p) if !relations.is_empty() => p,
    _ => return Ok(updated),
  };

  let mut merged =
    serde_json::to_value(&updated).map_err(|e| eyre!("Failed to serialize entity: {}", e))?;
  let previous =
    serde_json::to_value(previous).map_err(|e| eyre!("Failed to serialize entity: {}", e))?;

  let (Value::Object(fields), Value::Object(old)) = (&mut merged, &previous) else {
    return Ok(updated);
  };

  let mut changed = false;
  for relation in relations {
    let missing = fields.get(*relation).map_or(true, Value::is_null);
    if !missing {
      continue;
    }
    if let Some(kept) = old.get(*relation).filter(|v| !v.is_null()) {
      fields.insert((*relation).to_string(), kept.clone());
      changed = true;
    }
  }

  if !changed {
    return Ok(updated);
  }

  serde_json::from_value(merged).map_err(|e| eyre!("Failed to merge entity: {}", e))
}

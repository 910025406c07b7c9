//! Ordered in-memory collection of entities of one type.

use std::collections::HashSet;

use super::traits::Entity;

/// Entities in fetch/insertion order.
///
/// `upsert` and `replace_or_push` never introduce a duplicate id. Bulk
/// loads through `replace` keep whatever the server returned, duplicates
/// included, until `dedupe` is called.
#[derive(Debug, Clone)]
pub struct Collection<T> {
  items: Vec<T>,
}

impl<T> Default for Collection<T> {
  fn default() -> Self {
    Self { items: Vec::new() }
  }
}

impl<T: Entity> Collection<T> {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn len(&self) -> usize {
    self.items.len()
  }

  pub fn is_empty(&self) -> bool {
    self.items.is_empty()
  }

  pub fn iter(&self) -> std::slice::Iter<'_, T> {
    self.items.iter()
  }

  pub fn as_slice(&self) -> &[T] {
    &self.items
  }

  pub fn ids(&self) -> Vec<u64> {
    self.items.iter().map(Entity::id).collect()
  }

  /// Linear scan by id.
  pub fn get(&self, id: u64) -> Option<&T> {
    self.items.iter().find(|item| item.id() == id)
  }

  pub fn position(&self, id: u64) -> Option<usize> {
    self.items.iter().position(|item| item.id() == id)
  }

  pub fn contains(&self, id: u64) -> bool {
    self.position(id).is_some()
  }

  /// Drop everything and take `items` as the new content.
  pub fn replace(&mut self, items: Vec<T>) {
    self.items = items;
  }

  pub fn clear(&mut self) {
    self.items.clear();
  }

  /// Replace the entity with the same id in place, or append it.
  /// Returns `true` when an existing entry was replaced.
  pub fn upsert(&mut self, entity: T) -> bool {
    let id = entity.id();
    self.replace_or_push(id, entity)
  }

  /// Replace the entry stored under `id`, or append `entity` if none.
  pub fn replace_or_push(&mut self, id: u64, entity: T) -> bool {
    match self.position(id) {
      Some(index) => {
        self.items[index] = entity;
        true
      }
      None => {
        self.items.push(entity);
        false
      }
    }
  }

  pub fn remove(&mut self, id: u64) -> Option<T> {
    let index = self.position(id)?;
    Some(self.items.remove(index))
  }

  /// Remove later occurrences of an id, keeping the first one seen.
  /// Returns how many entries were dropped.
  pub fn dedupe(&mut self) -> usize {
    let before = self.items.len();
    let mut seen = HashSet::new();
    self.items.retain(|item| seen.insert(item.id()));
    before - self.items.len()
  }

  pub fn to_vec(&self) -> Vec<T> {
    self.items.clone()
  }
}

impl<T> IntoIterator for Collection<T> {
  type Item = T;
  type IntoIter = std::vec::IntoIter<T>;

  fn into_iter(self) -> Self::IntoIter {
    self.items.into_iter()
  }
}

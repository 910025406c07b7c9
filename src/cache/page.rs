//! List query parameters and the page envelope returned by list endpoints.

use color_eyre::{eyre::eyre, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

// ============================================================================
// Query parameters
// ============================================================================

/// Scalar value of an equality filter.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
  Null,
  Bool(bool),
  Int(i64),
  Float(f64),
  Text(String),
}

impl Scalar {
  /// Query-string form, or `None` when the filter should be left out.
  pub fn to_param(&self) -> Option<String> {
    match self {
      Scalar::Null => None,
      Scalar::Text(s) if s.is_empty() => None,
      Scalar::Text(s) => Some(s.clone()),
      Scalar::Bool(b) => Some(b.to_string()),
      Scalar::Int(i) => Some(i.to_string()),
      Scalar::Float(f) => Some(f.to_string()),
    }
  }
}

impl From<&str> for Scalar {
  fn from(value: &str) -> Self {
    Scalar::Text(value.to_string())
  }
}

impl From<String> for Scalar {
  fn from(value: String) -> Self {
    Scalar::Text(value)
  }
}

impl From<i64> for Scalar {
  fn from(value: i64) -> Self {
    Scalar::Int(value)
  }
}

impl From<u64> for Scalar {
  fn from(value: u64) -> Self {
    i64::try_from(value)
      .map(Scalar::Int)
      .unwrap_or_else(|_| Scalar::Text(value.to_string()))
  }
}

impl From<bool> for Scalar {
  fn from(value: bool) -> Self {
    Scalar::Bool(value)
  }
}

impl From<f64> for Scalar {
  fn from(value: f64) -> Self {
    Scalar::Float(value)
  }
}

impl<T: Into<Scalar>> From<Option<T>> for Scalar {
  fn from(value: Option<T>) -> Self {
    value.map(Into::into).unwrap_or(Scalar::Null)
  }
}

/// Parameters for a single-page list request.
#[derive(Debug, Clone, PartialEq)]
pub struct ListQuery {
  /// 1-based page number
  pub page: u32,
  pub filters: BTreeMap<String, Scalar>,
  pub search: Option<String>,
  /// Server field name, `-` prefix for descending
  pub ordering: Option<String>,
}

impl Default for ListQuery {
  fn default() -> Self {
    Self::page(1)
  }
}

impl ListQuery {
  pub fn page(page: u32) -> Self {
    Self {
      page: page.max(1),
      filters: BTreeMap::new(),
      search: None,
      ordering: None,
    }
  }

  pub fn filter(mut self, field: impl Into<String>, value: impl Into<Scalar>) -> Self {
    self.filters.insert(field.into(), value.into());
    self
  }

  pub fn search(mut self, term: impl Into<String>) -> Self {
    self.search = Some(term.into());
    self
  }

  pub fn ordering(mut self, ordering: impl Into<String>) -> Self {
    self.ordering = Some(ordering.into());
    self
  }

  /// Query-string pairs. Blank search/ordering and null or empty filters
  /// are omitted.
  pub fn to_params(&self) -> Vec<(String, String)> {
    let mut params = vec![("page".to_string(), self.page.max(1).to_string())];

    if let Some(search) = self.search.as_deref().map(str::trim) {
      if !search.is_empty() {
        params.push(("search".to_string(), search.to_string()));
      }
    }

    if let Some(ordering) = self.ordering.as_deref().map(str::trim) {
      if !ordering.is_empty() {
        params.push(("ordering".to_string(), ordering.to_string()));
      }
    }

    for (field, value) in &self.filters {
      if let Some(v) = value.to_param() {
        params.push((field.clone(), v));
      }
    }

    params
  }
}

// ============================================================================
// Responses
// ============================================================================

/// `{count, next, previous, results}` envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
  #[serde(default)]
  pub count: u64,
  pub next: Option<String>,
  pub previous: Option<String>,
  pub results: Vec<T>,
}

/// A list endpoint answers with either a page envelope or a bare array.
#[derive(Debug, Clone)]
pub enum ListResponse {
  Paged(Page<Value>),
  Bare(Vec<Value>),
}

impl ListResponse {
  pub fn from_value(value: Value) -> Result<Self> {
    let is_page = value.get("results").is_some_and(Value::is_array);
    match value {
      Value::Array(items) => Ok(ListResponse::Bare(items)),
      value if is_page => {
        let page: Page<Value> =
          serde_json::from_value(value).map_err(|e| eyre!("Malformed page envelope: {}", e))?;
        Ok(ListResponse::Paged(page))
      }
      other => Err(eyre!(
        "Unexpected list response: expected a page or an array, got {}",
        kind_of(&other)
      )),
    }
  }
}

fn kind_of(value: &Value) -> &'static str {
  match value {
    Value::Null => "null",
    Value::Bool(_) => "a boolean",
    Value::Number(_) => "a number",
    Value::String(_) => "a string",
    Value::Array(_) => "an array",
    Value::Object(_) => "an object",
  }
}

/// Outcome of `fetch_page`.
#[derive(Debug, Clone)]
pub struct PageResult<T> {
  pub items: Vec<T>,
  pub count: u64,
  pub page: u32,
  pub total_pages: u32,
  pub next: Option<String>,
  pub previous: Option<String>,
}

impl<T> PageResult<T> {
  pub fn empty(page: u32) -> Self {
    Self {
      items: Vec::new(),
      count: 0,
      page,
      total_pages: 1,
      next: None,
      previous: None,
    }
  }
}

/// `ceil(count / page_size)`, never below 1.
pub fn total_pages(count: u64, page_size: u32) -> u32 {
  let size = u64::from(page_size.max(1));
  let pages = count.div_ceil(size).max(1);
  u32::try_from(pages).unwrap_or(u32::MAX)
}

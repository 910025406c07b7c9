//! Generic per-resource store: fetch, page, resolve and reconcile writes.

use color_eyre::{eyre::eyre, Result};
use futures::{Stream, TryStreamExt};
use reqwest::Method;
use serde_json::Value;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, error, warn};
use url::Url;

use crate::api::ApiClient;

use super::collection::Collection;
use super::page::{total_pages, ListQuery, ListResponse, PageResult};
use super::reconcile::preserve_relations;
use super::traits::{FetchState, Resource, UpdateMethod};

/// Default page size used for `total_pages` when none is configured.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

struct StoreState<R> {
  items: Collection<R>,
  fetch: FetchState,
  count: u64,
  current_page: u32,
  total_pages: u32,
}

impl<R: Resource> StoreState<R> {
  fn new() -> Self {
    Self {
      items: Collection::new(),
      fetch: FetchState::default(),
      count: 0,
      current_page: 1,
      total_pages: 1,
    }
  }
}

/// Client-side cache of one REST resource.
///
/// State only changes from server responses. Reads never fail outward:
/// a failed read empties the collection (or yields `None`) and records the
/// message in [`ResourceStore::error`]. Writes record the message and also
/// return the error.
///
/// Clones share the same state.
pub struct ResourceStore<R: Resource> {
  api: ApiClient,
  page_size: u32,
  state: Arc<Mutex<StoreState<R>>>,
}

impl<R: Resource> Clone for ResourceStore<R> {
  fn clone(&self) -> Self {
    Self {
      api: self.api.clone(),
      page_size: self.page_size,
      state: Arc::clone(&self.state),
    }
  }
}

impl<R: Resource> ResourceStore<R> {
  pub fn new(api: ApiClient) -> Self {
    Self {
      api,
      page_size: DEFAULT_PAGE_SIZE,
      state: Arc::new(Mutex::new(StoreState::new())),
    }
  }

  /// Page size used to derive `total_pages`.
  pub fn with_page_size(mut self, page_size: u32) -> Self {
    self.page_size = page_size.max(1);
    self
  }

  pub fn api(&self) -> &ApiClient {
    &self.api
  }

  fn lock(&self) -> MutexGuard<'_, StoreState<R>> {
    // State is plain data; a panic elsewhere cannot leave it half-written.
    self.state.lock().unwrap_or_else(PoisonError::into_inner)
  }

  // ==========================================================================
  // Getters
  // ==========================================================================

  /// Snapshot of the collection in order.
  pub fn items(&self) -> Vec<R> {
    self.lock().items.to_vec()
  }

  pub fn len(&self) -> usize {
    self.lock().items.len()
  }

  pub fn is_empty(&self) -> bool {
    self.lock().items.is_empty()
  }

  pub fn loading(&self) -> bool {
    self.lock().fetch.loading
  }

  pub fn error(&self) -> Option<String> {
    self.lock().fetch.error.clone()
  }

  pub fn fetch_state(&self) -> FetchState {
    self.lock().fetch.clone()
  }

  pub fn count(&self) -> u64 {
    self.lock().count
  }

  pub fn current_page(&self) -> u32 {
    self.lock().current_page
  }

  pub fn total_pages(&self) -> u32 {
    self.lock().total_pages
  }

  pub fn page_size(&self) -> u32 {
    self.page_size
  }

  /// Local lookup only, no network.
  pub fn get_by_id(&self, id: u64) -> Option<R> {
    self.lock().items.get(id).cloned()
  }

  /// Insert or replace an entity received from elsewhere.
  pub fn upsert(&self, entity: R) {
    let mut state = self.lock();
    if !state.items.upsert(entity) {
      state.count += 1;
    }
  }

  /// Drop duplicate ids left by overlapping pages. Returns how many went.
  pub fn dedupe(&self) -> usize {
    let mut state = self.lock();
    let dropped = state.items.dedupe();
    state.count = state.count.saturating_sub(dropped as u64);
    dropped
  }

  // ==========================================================================
  // Reads
  // ==========================================================================

  fn begin(&self) {
    let mut state = self.lock();
    state.fetch.loading = true;
    state.fetch.error = None;
  }

  fn fail_read(&self, err: &color_eyre::Report) {
    let mut state = self.lock();
    state.items.clear();
    state.count = 0;
    state.fetch.loading = false;
    state.fetch.error = Some(err.to_string());
  }

  fn decode(&self, value: Value) -> Result<R> {
    Ok(R::unflatten(value)?.normalize(self.api.root()))
  }

  fn decode_all(&self, values: Vec<Value>) -> Result<Vec<R>> {
    values.into_iter().map(|v| self.decode(v)).collect()
  }

  /// Fetch one page. The collection afterwards holds exactly that page.
  pub async fn fetch_page(&self, query: &ListQuery) -> PageResult<R> {
    self.begin();

    match self.request_page(query).await {
      Ok(page) => {
        let mut state = self.lock();
        state.items.replace(page.items.clone());
        state.count = page.count;
        state.current_page = page.page;
        state.total_pages = page.total_pages;
        state.fetch.loading = false;
        page
      }
      Err(err) => {
        warn!(resource = R::PATH, page = query.page, "Failed to fetch page: {}", err);
        self.fail_read(&err);
        PageResult::empty(query.page)
      }
    }
  }

  async fn request_page(&self, query: &ListQuery) -> Result<PageResult<R>> {
    let url = self.api.endpoint(R::PATH)?;
    let body = self.api.get(url, &query.to_params()).await?;

    let (values, count, next, previous) = match ListResponse::from_value(body)? {
      ListResponse::Paged(page) => (page.results, page.count, page.next, page.previous),
      ListResponse::Bare(items) => {
        let count = items.len() as u64;
        (items, count, None, None)
      }
    };

    Ok(PageResult {
      items: self.decode_all(values)?,
      count,
      page: query.page.max(1),
      total_pages: total_pages(count, self.page_size),
      next,
      previous,
    })
  }

  /// Pages of the resource in order, following `next` links until null.
  /// A bare-array response is the only page.
  pub fn pages(&self, start: Url) -> impl Stream<Item = Result<Vec<R>>> + '_ {
    futures::stream::try_unfold(Some(start), move |cursor| async move {
      let Some(url) = cursor else {
        return Ok::<_, color_eyre::Report>(None);
      };
      debug!(resource = R::PATH, %url, "Fetching page");

      let (values, next) = match ListResponse::from_value(self.api.get(url, &[]).await?)? {
        ListResponse::Paged(page) => (page.results, page.next),
        ListResponse::Bare(items) => (items, None),
      };

      let next = match next.as_deref() {
        Some(link) => Some(self.api.resolve(link)?),
        None => None,
      };

      Ok(Some((self.decode_all(values)?, next)))
    })
  }

  /// Fetch every page sequentially into a cleared collection. The
  /// collection stays empty while pages load and holds their concatenation
  /// afterwards. Duplicates across pages are kept.
  pub async fn fetch_all(&self) -> Vec<R> {
    self.begin();
    {
      let mut state = self.lock();
      state.items.clear();
      state.count = 0;
    }

    let result = async {
      let start = self.api.endpoint(R::PATH)?;
      self.pages(start).try_concat().await
    }
    .await;

    match result {
      Ok(all) => {
        let mut state = self.lock();
        state.items.replace(all.clone());
        state.count = all.len() as u64;
        state.current_page = 1;
        state.total_pages = 1;
        state.fetch.loading = false;
        all
      }
      Err(err) => {
        warn!(resource = R::PATH, "Failed to fetch all: {}", err);
        self.fail_read(&err);
        Vec::new()
      }
    }
  }

  /// Local lookup first, then `GET {endpoint}/{id}/`. A fetched entity is
  /// added to the collection. Any failure yields `None`.
  pub async fn resolve_by_id(&self, id: u64) -> Option<R> {
    self.clear_error();
    if let Some(found) = self.get_by_id(id) {
      return Some(found);
    }

    let result = async {
      if id == 0 {
        return Err(eyre!("Cannot resolve {} without an id", R::PATH));
      }
      let url = self.api.item_endpoint(R::PATH, id)?;
      let body = self.api.get(url, &[]).await?;
      self.decode(body)
    }
    .await;

    match result {
      Ok(entity) => {
        self.lock().items.upsert(entity.clone());
        Some(entity)
      }
      Err(err) => {
        warn!(resource = R::PATH, id, "Lookup failed: {}", err);
        self.lock().fetch.error = Some(err.to_string());
        None
      }
    }
  }

  // ==========================================================================
  // Writes
  // ==========================================================================

  fn clear_error(&self) {
    self.lock().fetch.error = None;
  }

  fn fail_write(&self, action: &str, err: color_eyre::Report) -> color_eyre::Report {
    error!(resource = R::PATH, action, "Write failed: {}", err);
    self.lock().fetch.error = Some(err.to_string());
    err
  }

  /// POST a new entity. The created entity is appended on success.
  pub async fn create(&self, payload: &R::Payload) -> Result<R> {
    self.clear_error();

    let result = async {
      R::validate(payload)?;
      let url = self.api.endpoint(R::PATH)?;
      let body = self.api.send(Method::POST, url, R::body(payload)?).await?;
      self.decode(body)
    }
    .await;

    match result {
      Ok(created) => {
        self.upsert(created.clone());
        Ok(created)
      }
      Err(err) => Err(self.fail_write("create", err)),
    }
  }

  /// PUT or PATCH `{endpoint}/{id}/`, then replace the local entity with
  /// the response. Relations the response leaves out keep their local
  /// value.
  pub async fn update(&self, id: u64, payload: &R::Payload) -> Result<R> {
    self.clear_error();

    let method = match R::UPDATE_METHOD {
      UpdateMethod::Put => Method::PUT,
      UpdateMethod::Patch => Method::PATCH,
    };

    let result = async {
      R::validate(payload)?;
      let url = self.api.item_endpoint(R::PATH, id)?;
      let body = self.api.send(method, url, R::body(payload)?).await?;
      let updated = self.decode(body)?;
      let previous = self.get_by_id(id);
      preserve_relations(updated, previous.as_ref(), R::RELATIONS)
    }
    .await;

    match result {
      Ok(merged) => {
        let mut state = self.lock();
        if !state.items.replace_or_push(id, merged.clone()) {
          state.count += 1;
        }
        Ok(merged)
      }
      Err(err) => Err(self.fail_write("update", err)),
    }
  }

  /// DELETE `{endpoint}/{id}/`. The collection is untouched on failure.
  pub async fn delete(&self, id: u64) -> Result<()> {
    self.clear_error();

    let result = async {
      let url = self.api.item_endpoint(R::PATH, id)?;
      self.api.delete(url).await
    }
    .await;

    match result {
      Ok(()) => {
        let mut state = self.lock();
        state.items.remove(id);
        state.count = state.count.saturating_sub(1);
        Ok(())
      }
      Err(err) => Err(self.fail_write("delete", err)),
    }
  }
}

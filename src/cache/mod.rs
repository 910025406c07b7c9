//! Generic client-side cache for paginated REST resources.
//!
//! Each resource gets a [`ResourceStore`] that:
//! - Fetches single pages or every page (following `next` links)
//! - Keeps an ordered in-memory collection of the latest results
//! - Resolves entities by id, local first with network fallback
//! - Reconciles create/update/delete responses without duplicating ids

mod collection;
mod page;
mod reconcile;
mod store;
mod traits;

pub use collection::Collection;
pub use page::{total_pages, ListQuery, ListResponse, Page, PageResult, Scalar};
pub use reconcile::preserve_relations;
pub use store::{ResourceStore, DEFAULT_PAGE_SIZE};
pub use traits::{require_text, Entity, FetchState, Resource, UpdateMethod};

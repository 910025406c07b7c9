//! Client library for the mouseTube laboratory data platform.
//!
//! [`cache::ResourceStore`] keeps an in-memory, paginated view of one REST
//! resource and reconciles writes into it. [`resources`] instantiates it for
//! every mouseTube record type; [`session`] carries the bearer token shared by
//! all stores.

pub mod api;
pub mod cache;
pub mod config;
pub mod logging;
pub mod resources;
pub mod session;

pub use api::ApiClient;
pub use cache::{ListQuery, ResourceStore};
pub use config::Config;
pub use session::{AuthClient, Session};

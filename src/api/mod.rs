//! HTTP transport for the mouseTube REST API.

mod body;
mod client;
mod error;

pub use body::{Attachment, MultipartBody, RequestBody};
pub use client::ApiClient;
pub use error::{describe_error, DEFAULT_ERROR_KEYS};

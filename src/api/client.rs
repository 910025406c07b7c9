use color_eyre::{eyre::eyre, Result};
use reqwest::{Method, RequestBuilder, Response};
use serde_json::Value;
use std::time::Duration;
use tracing::debug;
use url::Url;

use crate::config::ApiConfig;
use crate::session::Session;

use super::body::RequestBody;
use super::error::{describe_error, DEFAULT_ERROR_KEYS};

/// mouseTube REST API client.
///
/// Resolves resource URLs against the configured base and attaches the
/// session's bearer token to every request when one is present.
#[derive(Clone)]
pub struct ApiClient {
  http: reqwest::Client,
  base: Url,
  root: Url,
  session: Session,
}

impl ApiClient {
  pub fn new(config: &ApiConfig, session: Session) -> Result<Self> {
    let mut builder = reqwest::Client::builder();
    if let Some(secs) = config.timeout_secs {
      builder = builder.timeout(Duration::from_secs(secs));
    }
    let http = builder
      .build()
      .map_err(|e| eyre!("Failed to create HTTP client: {}", e))?;

    Self::with_http(http, &config.base_url, session)
  }

  /// Build around an existing reqwest client.
  pub fn with_http(http: reqwest::Client, base_url: &str, session: Session) -> Result<Self> {
    let base = parse_base(base_url)?;
    let root = api_root(&base);
    Ok(Self {
      http,
      base,
      root,
      session,
    })
  }

  /// Base URL, always ending in `/` (e.g. `http://host/api/`)
  pub fn base(&self) -> &Url {
    &self.base
  }

  /// Base URL with a trailing `api` segment removed. Auth endpoints and
  /// media paths hang off this.
  pub fn root(&self) -> &Url {
    &self.root
  }

  pub fn session(&self) -> &Session {
    &self.session
  }

  /// `{base}/{path}/`
  pub fn endpoint(&self, path: &str) -> Result<Url> {
    self
      .base
      .join(&format!("{}/", path.trim_matches('/')))
      .map_err(|e| eyre!("Invalid endpoint {}: {}", path, e))
  }

  /// `{base}/{path}/{id}/`
  pub fn item_endpoint(&self, path: &str, id: u64) -> Result<Url> {
    self
      .base
      .join(&format!("{}/{}/", path.trim_matches('/'), id))
      .map_err(|e| eyre!("Invalid endpoint {}/{}: {}", path, id, e))
  }

  /// `{root}/{path}/`, used for `auth/...` endpoints.
  pub fn root_endpoint(&self, path: &str) -> Result<Url> {
    self
      .root
      .join(&format!("{}/", path.trim_matches('/')))
      .map_err(|e| eyre!("Invalid endpoint {}: {}", path, e))
  }

  /// Resolve a `next`/`previous` link, absolute or relative to the base.
  ///
  /// A link naming another origin keeps its path and query but is sent to
  /// the base origin, so the bearer token never leaves the configured host.
  pub fn resolve(&self, link: &str) -> Result<Url> {
    let url = self
      .base
      .join(link)
      .map_err(|e| eyre!("Invalid link {}: {}", link, e))?;
    if url.origin() == self.base.origin() {
      return Ok(url);
    }

    debug!(%url, base = %self.base, "Rebasing link onto API origin");
    let mut rebased = self.base.clone();
    rebased.set_path(url.path());
    rebased.set_query(url.query());
    Ok(rebased)
  }

  /// GET and parse the JSON body.
  pub async fn get(&self, url: Url, params: &[(String, String)]) -> Result<Value> {
    let mut builder = self.http.get(url);
    if !params.is_empty() {
      builder = builder.query(params);
    }
    let response = self.execute(builder, DEFAULT_ERROR_KEYS).await?;
    read_json(response).await
  }

  /// Send a write request and parse the JSON body (null when empty).
  pub async fn send(&self, method: Method, url: Url, body: RequestBody) -> Result<Value> {
    self.send_with(method, url, body, DEFAULT_ERROR_KEYS).await
  }

  /// Like [`ApiClient::send`], reading error messages from `error_keys`
  /// first.
  pub async fn send_with(
    &self,
    method: Method,
    url: Url,
    body: RequestBody,
    error_keys: &[&str],
  ) -> Result<Value> {
    let builder = match body {
      RequestBody::Json(value) => self.http.request(method, url).json(&value),
      RequestBody::Multipart(multipart) => self
        .http
        .request(method, url)
        .multipart(multipart.into_form()?),
    };
    let response = self.execute(builder, error_keys).await?;
    read_json(response).await
  }

  pub async fn delete(&self, url: Url) -> Result<()> {
    let builder = self.http.delete(url);
    self.execute(builder, DEFAULT_ERROR_KEYS).await?;
    Ok(())
  }

  async fn execute(&self, builder: RequestBuilder, error_keys: &[&str]) -> Result<Response> {
    let builder = match self.session.token() {
      Some(token) => builder.bearer_auth(token),
      None => builder,
    };

    let request = builder
      .build()
      .map_err(|e| eyre!("Failed to build request: {}", e))?;
    let method = request.method().clone();
    let url = request.url().clone();
    debug!(%method, %url, "Sending request");

    let response = self
      .http
      .execute(request)
      .await
      .map_err(|e| eyre!("{} {} failed: {}", method, url, e))?;

    let status = response.status();
    if status.is_success() {
      return Ok(response);
    }

    let text = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<Value>(&text)
      .ok()
      .and_then(|body| describe_error(&body, error_keys));

    debug!(%method, %url, %status, "Request rejected");
    Err(match message {
      Some(msg) => eyre!("{}", msg),
      None => eyre!("Request failed with status {}", status),
    })
  }
}

async fn read_json(response: Response) -> Result<Value> {
  let bytes = response
    .bytes()
    .await
    .map_err(|e| eyre!("Failed to read response: {}", e))?;

  if bytes.iter().all(u8::is_ascii_whitespace) {
    return Ok(Value::Null);
  }

  serde_json::from_slice(&bytes).map_err(|e| eyre!("Failed to parse response: {}", e))
}

fn parse_base(base_url: &str) -> Result<Url> {
  let trimmed = base_url.trim();
  let with_slash = if trimmed.ends_with('/') {
    trimmed.to_string()
  } else {
    format!("{}/", trimmed)
  };

  let url =
    Url::parse(&with_slash).map_err(|e| eyre!("Invalid API base URL {}: {}", base_url, e))?;
  if url.cannot_be_a_base() {
    return Err(eyre!("API base URL cannot be a base: {}", base_url));
  }
  Ok(url)
}

fn api_root(base: &Url) -> Url {
  let mut root = base.clone();
  let path = base.path().trim_end_matches('/');
  let trimmed = path.strip_suffix("/api").unwrap_or(path);
  root.set_path(&format!("{}/", trimmed));
  root
}

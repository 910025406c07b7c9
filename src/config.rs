use color_eyre::{eyre::eyre, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::cache::DEFAULT_PAGE_SIZE;

/// API base used when neither the config file nor the environment sets one.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000/api";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
  #[serde(default)]
  pub api: ApiConfig,
  #[serde(default)]
  pub log: LogConfig,
  #[serde(default)]
  pub session: SessionConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
  /// REST API base, e.g. "https://mousetube.example.org/api"
  #[serde(default = "default_base_url")]
  pub base_url: String,
  /// Page size the server uses, for page counts
  #[serde(default = "default_page_size")]
  pub page_size: u32,
  /// Request timeout; transport default when unset
  pub timeout_secs: Option<u64>,
}

impl Default for ApiConfig {
  fn default() -> Self {
    Self {
      base_url: default_base_url(),
      page_size: default_page_size(),
      timeout_secs: None,
    }
  }
}

fn default_base_url() -> String {
  DEFAULT_BASE_URL.to_string()
}

fn default_page_size() -> u32 {
  DEFAULT_PAGE_SIZE
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
  /// Filter used when RUST_LOG is unset
  #[serde(default = "default_log_level")]
  pub level: String,
  /// Also write daily log files here
  pub directory: Option<PathBuf>,
}

impl Default for LogConfig {
  fn default() -> Self {
    Self {
      level: default_log_level(),
      directory: None,
    }
  }
}

fn default_log_level() -> String {
  "warn".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
  /// Keep tokens between runs
  #[serde(default = "default_true")]
  pub persist: bool,
  /// Session database location (default: $XDG_DATA_HOME/mousetube/session.db)
  pub path: Option<PathBuf>,
}

impl Default for SessionConfig {
  fn default() -> Self {
    Self {
      persist: true,
      path: None,
    }
  }
}

fn default_true() -> bool {
  true
}

impl Config {
  /// Load configuration from file, then apply environment overrides.
  ///
  /// Search order:
  /// 1. Explicit path if provided
  /// 2. ./mousetube.yaml (current directory)
  /// 3. $XDG_CONFIG_HOME/mousetube/config.yaml
  ///
  /// Defaults apply when no file is found.
  pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
    let path = if let Some(p) = explicit_path {
      if p.exists() {
        Some(p.to_path_buf())
      } else {
        return Err(eyre!("Config file not found: {}", p.display()));
      }
    } else {
      Self::find_config_file()
    };

    let config = match path {
      Some(p) => Self::load_from_path(&p)?,
      None => Config::default(),
    };

    Ok(config.with_env_overrides())
  }

  fn find_config_file() -> Option<PathBuf> {
    // Check current directory
    let local = PathBuf::from("mousetube.yaml");
    if local.exists() {
      return Some(local);
    }

    // Check XDG config directory
    if let Some(config_dir) = dirs::config_dir() {
      let xdg_path = config_dir.join("mousetube").join("config.yaml");
      if xdg_path.exists() {
        return Some(xdg_path);
      }
    }

    None
  }

  fn load_from_path(path: &Path) -> Result<Self> {
    let contents = std::fs::read_to_string(path)
      .map_err(|e| eyre!("Failed to read config file {}: {}", path.display(), e))?;

    Self::from_yaml(&contents)
      .map_err(|e| eyre!("Failed to parse config file {}: {}", path.display(), e))
  }

  pub fn from_yaml(contents: &str) -> Result<Self> {
    // An empty file is valid and means "all defaults".
    if contents.trim().is_empty() {
      return Ok(Config::default());
    }
    serde_yaml::from_str(contents).map_err(|e| eyre!("{}", e))
  }

  fn with_env_overrides(mut self) -> Self {
    if let Ok(url) = std::env::var("MOUSETUBE_API_BASE_URL") {
      if !url.trim().is_empty() {
        self.api.base_url = url;
      }
    }
    self
  }

  /// Username and password from MOUSETUBE_USERNAME / MOUSETUBE_PASSWORD.
  pub fn get_credentials() -> Result<(String, String)> {
    let username = std::env::var("MOUSETUBE_USERNAME")
      .map_err(|_| eyre!("Username not found. Set MOUSETUBE_USERNAME environment variable."))?;
    let password = std::env::var("MOUSETUBE_PASSWORD")
      .map_err(|_| eyre!("Password not found. Set MOUSETUBE_PASSWORD environment variable."))?;
    Ok((username, password))
  }

  /// Pre-issued access token from MOUSETUBE_TOKEN, if set.
  pub fn get_token() -> Option<String> {
    std::env::var("MOUSETUBE_TOKEN")
      .ok()
      .filter(|t| !t.trim().is_empty())
  }
}

//! Session persistence trait and SQLite implementation.

use color_eyre::{eyre::eyre, Result};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use super::SessionState;

/// Trait for session persistence backends.
pub trait SessionStore: Send + Sync {
  /// Load the saved session, if any.
  fn load(&self) -> Result<Option<SessionState>>;

  /// Persist the session, replacing what was saved before.
  fn save(&self, state: &SessionState) -> Result<()>;
}

/// Store that keeps nothing between runs.
pub struct NoopStore;

impl SessionStore for NoopStore {
  fn load(&self) -> Result<Option<SessionState>> {
    Ok(None) // Always empty
  }

  fn save(&self, _state: &SessionState) -> Result<()> {
    Ok(()) // Discard
  }
}

/// SQLite-backed key/value session storage.
pub struct SqliteStore {
  conn: Mutex<Connection>,
}

const KEY_ACCESS: &str = "auth_token";
const KEY_REFRESH: &str = "refresh_token";
const KEY_USERNAME: &str = "username";
const KEY_USER_ID: &str = "user_id";

/// Schema for session tables.
const SESSION_SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS session (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL,
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
);
"#;

impl SqliteStore {
  /// Open the store at the default location.
  pub fn open() -> Result<Self> {
    Self::open_at(&Self::default_path()?)
  }

  /// Open or create the store at `path`.
  pub fn open_at(path: &Path) -> Result<Self> {
    // Ensure parent directory exists
    if let Some(parent) = path.parent() {
      std::fs::create_dir_all(parent)
        .map_err(|e| eyre!("Failed to create session directory: {}", e))?;
    }

    let conn = Connection::open(path)
      .map_err(|e| eyre!("Failed to open session database at {}: {}", path.display(), e))?;

    Self::with_connection(conn)
  }

  /// Store that lives only as long as the process.
  pub fn in_memory() -> Result<Self> {
    let conn = Connection::open_in_memory()
      .map_err(|e| eyre!("Failed to open in-memory session database: {}", e))?;
    Self::with_connection(conn)
  }

  fn with_connection(conn: Connection) -> Result<Self> {
    let store = Self {
      conn: Mutex::new(conn),
    };
    store.run_migrations()?;
    Ok(store)
  }

  /// Get the default database path.
  pub fn default_path() -> Result<PathBuf> {
    let data_dir = dirs::data_dir()
      .or_else(|| dirs::home_dir().map(|p| p.join(".local/share")))
      .ok_or_else(|| eyre!("Could not determine data directory"))?;

    Ok(data_dir.join("mousetube").join("session.db"))
  }

  fn run_migrations(&self) -> Result<()> {
    let conn = self
      .conn
      .lock()
      .map_err(|e| eyre!("Lock poisoned: {}", e))?;

    conn
      .execute_batch(SESSION_SCHEMA)
      .map_err(|e| eyre!("Failed to run session migrations: {}", e))?;

    Ok(())
  }
}

fn read_key(conn: &Connection, key: &str) -> Result<Option<String>> {
  conn
    .query_row(
      "SELECT value FROM session WHERE key = ?",
      params![key],
      |row| row.get(0),
    )
    .optional()
    .map_err(|e| eyre!("Failed to read session key {}: {}", key, e))
}

fn write_key(conn: &Connection, key: &str, value: Option<&str>) -> Result<()> {
  match value {
    Some(v) => conn.execute(
      "INSERT OR REPLACE INTO session (key, value, updated_at) VALUES (?, ?, datetime('now'))",
      params![key, v],
    ),
    None => conn.execute("DELETE FROM session WHERE key = ?", params![key]),
  }
  .map_err(|e| eyre!("Failed to write session key {}: {}", key, e))?;
  Ok(())
}

impl SessionStore for SqliteStore {
  fn load(&self) -> Result<Option<SessionState>> {
    let conn = self
      .conn
      .lock()
      .map_err(|e| eyre!("Lock poisoned: {}", e))?;

    let state = SessionState {
      access_token: read_key(&conn, KEY_ACCESS)?,
      refresh_token: read_key(&conn, KEY_REFRESH)?,
      username: read_key(&conn, KEY_USERNAME)?,
      user_id: read_key(&conn, KEY_USER_ID)?.and_then(|v| v.parse().ok()),
    };

    if state == SessionState::default() {
      return Ok(None);
    }
    Ok(Some(state))
  }

  fn save(&self, state: &SessionState) -> Result<()> {
    let mut conn = self
      .conn
      .lock()
      .map_err(|e| eyre!("Lock poisoned: {}", e))?;

    let tx = conn
      .transaction()
      .map_err(|e| eyre!("Failed to begin transaction: {}", e))?;

    let user_id = state.user_id.map(|id| id.to_string());
    write_key(&tx, KEY_ACCESS, state.access_token.as_deref())?;
    write_key(&tx, KEY_REFRESH, state.refresh_token.as_deref())?;
    write_key(&tx, KEY_USERNAME, state.username.as_deref())?;
    write_key(&tx, KEY_USER_ID, user_id.as_deref())?;

    tx.commit()
      .map_err(|e| eyre!("Failed to commit transaction: {}", e))?;

    Ok(())
  }
}

use clap::{Parser, Subcommand, ValueEnum};
use color_eyre::{eyre::eyre, Result};
use serde::Serialize;
use serde_json::Value;
use std::path::PathBuf;

use mousetube::cache::{ListQuery, Resource, ResourceStore};
use mousetube::config::Config;
use mousetube::resources::{
  AnimalProfile, Contact, Favorite, File, Hardware, Laboratory, Protocol, RecordingSession,
  Reference, Repository, Software, Species, Strain, Study, Subject,
};
use mousetube::session::{AuthClient, Session, SqliteStore};
use mousetube::{logging, ApiClient};

#[derive(Parser, Debug)]
#[command(name = "mousetube")]
#[command(about = "Command-line client for the mouseTube data platform")]
#[command(version)]
struct Args {
  /// Path to config file (default: $XDG_CONFIG_HOME/mousetube/config.yaml)
  #[arg(short, long)]
  config: Option<PathBuf>,

  /// API base URL, overriding the config file
  #[arg(long)]
  base_url: Option<String>,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// Log in with MOUSETUBE_USERNAME / MOUSETUBE_PASSWORD, or MOUSETUBE_TOKEN
  Login,
  /// Forget the saved session
  Logout,
  /// Show the signed-in user
  Whoami,
  /// Fetch one page of a resource
  List {
    resource: ResourceKind,
    #[arg(long, default_value_t = 1)]
    page: u32,
    #[arg(long)]
    search: Option<String>,
    /// Field to sort on, `-` prefix for descending
    #[arg(long)]
    ordering: Option<String>,
    /// Equality filter as field=value (repeatable)
    #[arg(long = "filter", value_parser = parse_filter)]
    filters: Vec<(String, String)>,
  },
  /// Fetch every page of a resource
  All { resource: ResourceKind },
  /// Fetch one record by id
  Get { resource: ResourceKind, id: u64 },
  /// Delete one record by id
  Delete { resource: ResourceKind, id: u64 },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ResourceKind {
  Contact,
  Laboratory,
  Study,
  Reference,
  Species,
  Strain,
  AnimalProfile,
  Subject,
  Protocol,
  Hardware,
  Software,
  File,
  RecordingSession,
  Favorite,
  Repository,
}

/// What to do with a resource store.
#[derive(Debug)]
enum Action {
  List(ListQuery),
  All,
  Get(u64),
  Delete(u64),
}

fn parse_filter(s: &str) -> Result<(String, String), String> {
  let (field, value) = s
    .split_once('=')
    .ok_or_else(|| format!("expected field=value, got '{}'", s))?;
  if field.trim().is_empty() {
    return Err(format!("missing field name in '{}'", s));
  }
  Ok((field.trim().to_string(), value.to_string()))
}

#[tokio::main]
async fn main() -> Result<()> {
  color_eyre::install()?;

  let args = Args::parse();

  // Load configuration
  let mut config = Config::load(args.config.as_deref())?;
  if let Some(base_url) = args.base_url {
    config.api.base_url = base_url;
  }

  let _guard = logging::init(&config.log)?;

  let session = if config.session.persist {
    let store = match &config.session.path {
      Some(path) => SqliteStore::open_at(path)?,
      None => SqliteStore::open()?,
    };
    Session::with_store(store)?
  } else {
    Session::in_memory()
  };

  let api = ApiClient::new(&config.api, session)?;
  let auth = AuthClient::new(api.clone());

  let output = match args.command {
    Command::Login => login(&auth).await?,
    Command::Logout => {
      auth.logout()?;
      serde_json::json!({ "logged_out": true })
    }
    Command::Whoami => {
      auth.init().await?;
      to_json(&auth.fetch_user().await?)?
    }
    Command::List {
      resource,
      page,
      search,
      ordering,
      filters,
    } => {
      let mut query = ListQuery::page(page);
      query.search = search;
      query.ordering = ordering;
      for (field, value) in filters {
        query = query.filter(field, value);
      }
      run(resource, &api, config.api.page_size, Action::List(query)).await?
    }
    Command::All { resource } => run(resource, &api, config.api.page_size, Action::All).await?,
    Command::Get { resource, id } => {
      run(resource, &api, config.api.page_size, Action::Get(id)).await?
    }
    Command::Delete { resource, id } => {
      run(resource, &api, config.api.page_size, Action::Delete(id)).await?
    }
  };

  let text =
    serde_json::to_string_pretty(&output).map_err(|e| eyre!("Failed to render output: {}", e))?;
  println!("{}", text);

  Ok(())
}

async fn login(auth: &AuthClient) -> Result<Value> {
  if let Some(token) = Config::get_token() {
    let user = auth.login_with_token(&token).await?;
    return to_json(&user);
  }

  let (username, password) = Config::get_credentials()?;
  auth.login(&username, &password).await?;
  Ok(serde_json::json!({ "username": username }))
}

async fn run(kind: ResourceKind, api: &ApiClient, page_size: u32, action: Action) -> Result<Value> {
  match kind {
    ResourceKind::Contact => run_with::<Contact>(api, page_size, action).await,
    ResourceKind::Laboratory => run_with::<Laboratory>(api, page_size, action).await,
    ResourceKind::Study => run_with::<Study>(api, page_size, action).await,
    ResourceKind::Reference => run_with::<Reference>(api, page_size, action).await,
    ResourceKind::Species => run_with::<Species>(api, page_size, action).await,
    ResourceKind::Strain => run_with::<Strain>(api, page_size, action).await,
    ResourceKind::AnimalProfile => run_with::<AnimalProfile>(api, page_size, action).await,
    ResourceKind::Subject => run_with::<Subject>(api, page_size, action).await,
    ResourceKind::Protocol => run_with::<Protocol>(api, page_size, action).await,
    ResourceKind::Hardware => run_with::<Hardware>(api, page_size, action).await,
    ResourceKind::Software => run_with::<Software>(api, page_size, action).await,
    ResourceKind::File => run_with::<File>(api, page_size, action).await,
    ResourceKind::RecordingSession => run_with::<RecordingSession>(api, page_size, action).await,
    ResourceKind::Favorite => run_with::<Favorite>(api, page_size, action).await,
    ResourceKind::Repository => run_with::<Repository>(api, page_size, action).await,
  }
}

async fn run_with<R: Resource>(api: &ApiClient, page_size: u32, action: Action) -> Result<Value> {
  let store = ResourceStore::<R>::new(api.clone()).with_page_size(page_size);

  match action {
    Action::List(query) => {
      let page = store.fetch_page(&query).await;
      if let Some(err) = store.error() {
        return Err(eyre!("Failed to list {}: {}", R::PATH, err));
      }
      Ok(serde_json::json!({
        "count": page.count,
        "page": page.page,
        "total_pages": page.total_pages,
        "results": to_json(&page.items)?,
      }))
    }
    Action::All => {
      let all = store.fetch_all().await;
      if let Some(err) = store.error() {
        return Err(eyre!("Failed to fetch {}: {}", R::PATH, err));
      }
      to_json(&all)
    }
    Action::Get(id) => match store.resolve_by_id(id).await {
      Some(entity) => to_json(&entity),
      None => Err(eyre!(
        "{} {} not found: {}",
        R::PATH,
        id,
        store.error().unwrap_or_default()
      )),
    },
    Action::Delete(id) => {
      store.delete(id).await?;
      Ok(serde_json::json!({ "deleted": id }))
    }
  }
}

fn to_json<T: Serialize>(value: &T) -> Result<Value> {
  serde_json::to_value(value).map_err(|e| eyre!("Failed to render output: {}", e))
}

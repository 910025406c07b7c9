use mousetube::session::{SessionStore, SqliteStore};
use mousetube::{AuthClient, Session};

use crate::support::{MockApi, MockState, PASSWORD};

async fn auth() -> (MockApi, AuthClient) {
  let mock = MockApi::start(MockState::new()).await;
  let client = AuthClient::new(mock.client());
  (mock, client)
}

#[tokio::test]
async fn test_login_stores_tokens() {
  let (mock, auth) = auth().await;

  auth.login("alice", PASSWORD).await.unwrap();

  let session = auth.session();
  assert_eq!(session.token().as_deref(), Some("token-alice"));
  assert_eq!(session.refresh_token().as_deref(), Some("refresh-alice"));
  assert_eq!(session.username().as_deref(), Some("alice"));

  let request = &mock.requests()[0];
  assert_eq!(request.path, "/auth/jwt/create/");
  assert!(request.authorization.is_none());
}

#[tokio::test]
async fn test_login_rejected() {
  let (_mock, auth) = auth().await;

  let err = auth.login("alice", "wrong").await.unwrap_err();

  assert_eq!(
    err.to_string(),
    "No active account found with the given credentials"
  );
  assert!(!auth.session().is_authenticated());
}

#[tokio::test]
async fn test_login_blank_username_reports_field() {
  let (_mock, auth) = auth().await;

  let err = auth.login("", "").await.unwrap_err();

  assert_eq!(err.to_string(), "This field may not be blank.");
}

#[tokio::test]
async fn test_fetch_user_after_login() {
  let (mock, auth) = auth().await;
  auth.login("alice", PASSWORD).await.unwrap();

  let user = auth.fetch_user().await.unwrap().unwrap();

  assert_eq!(user.id, 7);
  assert_eq!(user.username, "alice");
  assert_eq!(auth.session().user_id(), Some(7));
  let me = mock.requests().pop().unwrap();
  assert_eq!(me.authorization.as_deref(), Some("Bearer token-alice"));
}

#[tokio::test]
async fn test_fetch_user_signed_out_sends_nothing() {
  let (mock, auth) = auth().await;

  assert_eq!(auth.fetch_user().await.unwrap(), None);
  assert!(mock.requests().is_empty());
}

#[tokio::test]
async fn test_login_with_token() {
  let (_mock, auth) = auth().await;

  let user = auth.login_with_token("token-bob").await.unwrap();

  assert_eq!(user.username, "bob");
  assert_eq!(auth.session().user_id(), Some(7));
  assert_eq!(auth.session().token().as_deref(), Some("token-bob"));
}

#[tokio::test]
async fn test_login_with_bad_token_signs_out() {
  let (_mock, auth) = auth().await;

  let err = auth.login_with_token("garbage").await.unwrap_err();

  assert_eq!(err.to_string(), "Invalid token");
  assert!(!auth.session().is_authenticated());
  assert_eq!(auth.session().username(), None);
}

#[tokio::test]
async fn test_refresh_token() {
  let (_mock, auth) = auth().await;
  auth.login("carol", PASSWORD).await.unwrap();

  auth.refresh_token().await.unwrap();

  assert_eq!(auth.session().token().as_deref(), Some("token2-carol"));
  assert_eq!(auth.session().refresh_token().as_deref(), Some("refresh-carol"));
}

#[tokio::test]
async fn test_refresh_without_token_is_noop() {
  let (mock, auth) = auth().await;

  auth.refresh_token().await.unwrap();

  assert!(mock.requests().is_empty());
}

#[tokio::test]
async fn test_init_drops_invalid_saved_token() {
  let mock = MockApi::start(MockState::new()).await;
  let session = Session::in_memory();
  session.set_tokens("stale".to_string(), None).unwrap();
  session.set_user(Some("dave".to_string()), None).unwrap();
  let auth = AuthClient::new(mock.client_with(session.clone()));

  auth.init().await.unwrap();

  assert!(!session.is_authenticated());
  assert_eq!(session.username(), None);
}

#[tokio::test]
async fn test_init_keeps_valid_saved_token() {
  let mock = MockApi::start(MockState::new()).await;
  let session = Session::in_memory();
  session.set_tokens("token-erin".to_string(), None).unwrap();
  let auth = AuthClient::new(mock.client_with(session.clone()));

  auth.init().await.unwrap();

  assert!(session.is_authenticated());
  assert_eq!(session.username().as_deref(), Some("erin"));
}

#[tokio::test]
async fn test_login_survives_restart() {
  let path = std::env::temp_dir().join(format!("mousetube-auth-{}.db", std::process::id()));
  let _ = std::fs::remove_file(&path);
  let mock = MockApi::start(MockState::new()).await;

  {
    let session = Session::with_store(SqliteStore::open_at(&path).unwrap()).unwrap();
    let auth = AuthClient::new(mock.client_with(session));
    auth.login("frank", PASSWORD).await.unwrap();
  }

  let saved = SqliteStore::open_at(&path).unwrap().load().unwrap().unwrap();
  assert_eq!(saved.access_token.as_deref(), Some("token-frank"));
  assert_eq!(saved.username.as_deref(), Some("frank"));

  let restored = Session::with_store(SqliteStore::open_at(&path).unwrap()).unwrap();
  let auth = AuthClient::new(mock.client_with(restored));
  auth.logout().unwrap();
  assert!(SqliteStore::open_at(&path)
    .unwrap()
    .load()
    .unwrap()
    .map_or(true, |s| s.access_token.is_none()));

  let _ = std::fs::remove_file(&path);
}

use serde_json::json;

use mousetube::cache::ResourceStore;
use mousetube::resources::{
  AnimalConditions, ContentType, ContextConditions, FavoriteStore, Laboratory, LaboratoryPayload,
  Measurement, Protocol, ProtocolFields, RecordingSession, RecordingSessionPayload,
  RepositoryStore,
};

use crate::support::{MockApi, MockState};

#[tokio::test]
async fn test_protocol_travels_flat_and_reads_nested() {
  let mock = MockApi::start(MockState::new()).await;
  let store: ResourceStore<Protocol> = ResourceStore::new(mock.client());

  let fields = ProtocolFields {
    name: "Pup isolation".to_string(),
    animals: AnimalConditions {
      sex: Some("female".to_string()),
      age: Some("P8".to_string()),
      ..Default::default()
    },
    context: ContextConditions {
      temperature: Measurement {
        value: Some(22.5),
        unit: Some("°C".to_string()),
      },
      ..Default::default()
    },
    ..Default::default()
  };
  let created = store.create(&fields).await.unwrap();

  let sent = mock.requests()[0].body.clone().unwrap();
  assert_eq!(sent["animals_sex"], "female");
  assert_eq!(sent["context_temperature_value"], 22.5);
  assert!(sent.get("animals").is_none());

  assert_eq!(created.fields, fields);

  let listed = store.fetch_all().await;
  assert_eq!(listed, vec![created]);
}

#[tokio::test]
async fn test_recording_session_keeps_relations_on_patch() {
  let sessions = vec![json!({
    "id": 3,
    "name": "Session A",
    "protocol": {"id": 2, "name": "Pup isolation", "animals_age": "P8"},
    "laboratory": {"id": 4, "name": "ICS", "country": "France"},
  })];
  let mock = MockApi::start(
    MockState::new()
      .with("recording-session", sessions)
      .omit_on_update("protocol")
      .omit_on_update("laboratory"),
  )
  .await;
  let store: ResourceStore<RecordingSession> = ResourceStore::new(mock.client());
  store.fetch_all().await;

  let payload = RecordingSessionPayload {
    name: "Session B".to_string(),
    ..Default::default()
  };
  let updated = store.update(3, &payload).await.unwrap();

  assert_eq!(updated.name, "Session B");
  assert_eq!(
    updated.protocol.unwrap().fields.animals.age.as_deref(),
    Some("P8")
  );
  assert_eq!(updated.laboratory.unwrap().country.as_deref(), Some("France"));
  assert_eq!(mock.request_count("PATCH"), 1);
}

#[tokio::test]
async fn test_laboratory_create_sends_country() {
  let mock = MockApi::start(MockState::new()).await;
  let store: ResourceStore<Laboratory> = ResourceStore::new(mock.client());

  let payload = LaboratoryPayload {
    name: "ICS".to_string(),
    ..Default::default()
  };
  let created = store.create(&payload).await.unwrap();

  assert_eq!(created.country, None);
  let sent = mock.requests()[0].body.clone().unwrap();
  assert_eq!(sent, json!({"name": "ICS", "country": null}));
}

#[tokio::test]
async fn test_repository_fetch_selects_default() {
  let repositories = vec![
    json!({"id": 2, "name": "Zenodo", "logo": "/media/logos/zenodo.png"}),
    json!({"id": 1, "name": "Dataverse", "logo": "media/logos/dataverse.png"}),
    json!({"id": 3, "name": "Plain"}),
  ];
  let mock = MockApi::start(MockState::new().with("repository", repositories)).await;
  let repos = RepositoryStore::new(mock.client());

  let all = repos.fetch().await;

  assert_eq!(all.len(), 3);
  assert_eq!(
    all[0].logo_url.as_deref(),
    Some(format!("{}/media/logos/zenodo.png", mock.origin).as_str())
  );
  assert_eq!(
    all[1].logo_url.as_deref(),
    Some(format!("{}/media/logos/dataverse.png", mock.origin).as_str())
  );
  assert_eq!(all[2].logo_url, None);
  assert_eq!(repos.selected().map(|r| r.id), Some(1));

  // an explicit choice survives a reload
  repos.select(all[2].clone());
  repos.fetch().await;
  assert_eq!(repos.selected().map(|r| r.id), Some(3));
}

#[tokio::test]
async fn test_favorite_toggle() {
  let favorites = vec![json!({"id": 1, "content_type": "software", "object_id": 9})];
  let mock = MockApi::start(MockState::new().with("favorite", favorites)).await;
  let store = FavoriteStore::new(mock.client());
  store.fetch_all().await;

  assert!(store.is_favorite(ContentType::Software, 9));
  assert!(!store.is_favorite(ContentType::Protocol, 5));

  assert!(store.toggle(ContentType::Protocol, 5).await.unwrap());
  assert!(store.is_favorite(ContentType::Protocol, 5));
  let sent = mock.requests().pop().unwrap().body.unwrap();
  assert_eq!(sent, json!({"content_type_name": "protocol", "object_id": 5}));

  // already bookmarked: nothing is sent
  let posts = mock.request_count("POST");
  assert_eq!(store.add(ContentType::Protocol, 5).await.unwrap(), None);
  assert_eq!(mock.request_count("POST"), posts);

  assert!(!store.toggle(ContentType::Protocol, 5).await.unwrap());
  assert!(!store.is_favorite(ContentType::Protocol, 5));
  assert_eq!(mock.request_count("DELETE"), 1);
}

#[tokio::test]
async fn test_favorites_with_unknown_kind() {
  let favorites = vec![
    json!({"id": 1, "content_type": "software", "object_id": 9}),
    json!({"id": 2, "content_type": "study", "object_id": 4}),
  ];
  let mock = MockApi::start(MockState::new().with("favorite", favorites)).await;
  let store = FavoriteStore::new(mock.client());

  let all = store.fetch_all().await;

  assert_eq!(all.len(), 2);
  assert_eq!(store.store().error(), None);
  assert_eq!(all[1].content_type, ContentType::Unknown);
  assert!(store.is_favorite(ContentType::Software, 9));
  assert!(!store.is_favorite(ContentType::Unknown, 4));

  assert!(store.toggle(ContentType::Unknown, 4).await.is_err());
  assert!(store.add(ContentType::Unknown, 7).await.is_err());
  assert_eq!(mock.request_count("POST"), 0);

  // unknown entries can still be removed by id
  store.remove(2).await.unwrap();
  assert_eq!(store.store().len(), 1);
}

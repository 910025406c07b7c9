use serde_json::json;

use mousetube::cache::ResourceStore;
use mousetube::resources::{Contact, ContactPayload, Species, Strain, StrainPayload};
use mousetube::{ListQuery, Session};

use crate::support::{contacts, MockApi, MockState};

fn ids<T: mousetube::cache::Entity>(items: &[T]) -> Vec<u64> {
  items.iter().map(|e| e.id()).collect()
}

async fn contact_store(state: MockState, page_size: u32) -> (MockApi, ResourceStore<Contact>) {
  let mock = MockApi::start(state.page_size(page_size as usize)).await;
  let store = ResourceStore::new(mock.client()).with_page_size(page_size);
  (mock, store)
}

fn payload(first: &str, last: &str) -> ContactPayload {
  ContactPayload {
    first_name: first.to_string(),
    last_name: last.to_string(),
    ..Default::default()
  }
}

// ============================================================================
// Reads
// ============================================================================

#[tokio::test]
async fn test_fetch_page_replaces_collection() {
  let (_mock, store) = contact_store(MockState::new().with("contact", contacts(25)), 10).await;

  let first = store.fetch_page(&ListQuery::page(1)).await;
  assert_eq!(ids(&first.items), (1..=10).collect::<Vec<_>>());
  assert_eq!(first.count, 25);
  assert_eq!(first.total_pages, 3);
  assert!(first.next.is_some());
  assert!(first.previous.is_none());

  let last = store.fetch_page(&ListQuery::page(3)).await;
  assert_eq!(ids(&last.items), vec![21, 22, 23, 24, 25]);
  assert!(last.next.is_none());
  assert_eq!(ids(&store.items()), vec![21, 22, 23, 24, 25]);
  assert_eq!(store.count(), 25);
  assert_eq!(store.current_page(), 3);
  assert_eq!(store.total_pages(), 3);
  assert!(!store.loading());
  assert_eq!(store.error(), None);
}

#[tokio::test]
async fn test_fetch_page_sends_query_parameters() {
  let (mock, store) = contact_store(MockState::new().with("contact", contacts(6)), 10).await;

  let query = ListQuery::page(1)
    .filter("status", "validated")
    .filter("country", "")
    .search("   ")
    .ordering("-last_name");
  let page = store.fetch_page(&query).await;

  assert_eq!(ids(&page.items), vec![2, 4, 6]);
  assert_eq!(page.count, 3);

  let request = mock.requests().pop().unwrap();
  let keys: Vec<&str> = request.query.iter().map(|(k, _)| k.as_str()).collect();
  assert!(keys.contains(&"page"));
  assert!(keys.contains(&"status"));
  assert!(keys.contains(&"ordering"));
  assert!(!keys.contains(&"country"));
  assert!(!keys.contains(&"search"));
}

#[tokio::test]
async fn test_fetch_page_failure_empties_collection() {
  let (mock, store) = contact_store(MockState::new().with("contact", contacts(15)), 10).await;

  store.fetch_page(&ListQuery::page(1)).await;
  assert_eq!(store.len(), 10);

  mock.fail_list("contact", Some(2));
  let page = store.fetch_page(&ListQuery::page(2)).await;

  assert!(page.items.is_empty());
  assert!(store.is_empty());
  assert!(!store.loading());
  assert!(store.error().unwrap().contains("500"));

  // the next successful read clears the error
  store.fetch_page(&ListQuery::page(1)).await;
  assert_eq!(store.error(), None);
}

#[tokio::test]
async fn test_fetch_all_follows_next_links() {
  for page_size in [1, 4, 10, 23, 50] {
    let (mock, store) = contact_store(MockState::new().with("contact", contacts(23)), page_size).await;

    let all = store.fetch_all().await;

    assert_eq!(ids(&all), (1..=23).collect::<Vec<_>>(), "page size {page_size}");
    assert_eq!(store.len(), 23);
    assert_eq!(store.count(), 23);
    let expected_requests = 23usize.div_ceil(page_size as usize);
    assert_eq!(mock.request_count("GET"), expected_requests);
  }
}

#[tokio::test]
async fn test_fetch_all_bare_array_is_one_request() {
  let species = vec![
    json!({"id": 1, "name": "Mus musculus"}),
    json!({"id": 2, "name": "Rattus norvegicus"}),
    json!({"id": 3, "name": "Peromyscus"}),
  ];
  let mock = MockApi::start(MockState::new().with("species", species).bare("species")).await;
  let store: ResourceStore<Species> = ResourceStore::new(mock.client());

  let all = store.fetch_all().await;

  assert_eq!(ids(&all), vec![1, 2, 3]);
  assert_eq!(mock.request_count("GET"), 1);
}

#[tokio::test]
async fn test_fetch_all_failure_midway() {
  let (mock, store) = contact_store(MockState::new().with("contact", contacts(30)), 10).await;
  mock.fail_list("contact", Some(3));

  let all = store.fetch_all().await;

  assert!(all.is_empty());
  assert!(store.is_empty());
  assert!(store.error().is_some());
  assert!(!store.loading());
}

#[tokio::test]
async fn test_fetch_all_keeps_duplicates_until_dedupe() {
  let mut records = contacts(4);
  records.push(records[1].clone());
  let (_mock, store) = contact_store(MockState::new().with("contact", records), 2).await;

  let all = store.fetch_all().await;
  assert_eq!(ids(&all), vec![1, 2, 3, 4, 2]);

  assert_eq!(store.dedupe(), 1);
  assert_eq!(ids(&store.items()), vec![1, 2, 3, 4]);
}

#[tokio::test]
async fn test_resolve_by_id_fills_cache() {
  let (mock, store) = contact_store(MockState::new().with("contact", contacts(30)), 10).await;
  store.fetch_page(&ListQuery::page(1)).await;
  mock.clear_requests();

  assert_eq!(store.get_by_id(25), None);
  assert_eq!(mock.request_count("GET"), 0);

  let found = store.resolve_by_id(25).await.unwrap();
  assert_eq!(found.first_name, "First25");
  assert_eq!(mock.request_count("GET"), 1);
  assert_eq!(store.get_by_id(25), Some(found));

  // cached now
  store.resolve_by_id(25).await.unwrap();
  store.resolve_by_id(3).await.unwrap();
  assert_eq!(mock.request_count("GET"), 1);
}

#[tokio::test]
async fn test_resolve_by_id_missing() {
  let (mock, store) = contact_store(MockState::new().with("contact", contacts(3)), 10).await;

  assert_eq!(store.resolve_by_id(99).await, None);
  assert_eq!(store.error().as_deref(), Some("Not found."));
  assert!(store.is_empty());

  mock.clear_requests();
  assert_eq!(store.resolve_by_id(0).await, None);
  assert_eq!(mock.request_count("GET"), 0);
}

#[tokio::test]
async fn test_successful_resolve_clears_previous_error() {
  let (_mock, store) = contact_store(MockState::new().with("contact", contacts(3)), 10).await;

  assert_eq!(store.resolve_by_id(99).await, None);
  assert_eq!(store.error().as_deref(), Some("Not found."));

  assert!(store.resolve_by_id(2).await.is_some());
  assert_eq!(store.error(), None);

  // a local hit is a new attempt too
  store.resolve_by_id(0).await;
  assert!(store.error().is_some());
  assert!(store.resolve_by_id(2).await.is_some());
  assert_eq!(store.error(), None);
}

#[tokio::test]
async fn test_fetch_all_clears_before_loading() {
  let (mock, store) = contact_store(MockState::new().with("contact", contacts(12)), 10).await;
  store.fetch_page(&ListQuery::page(1)).await;
  assert_eq!(store.len(), 10);

  mock.delay_lists(150);
  let loader = store.clone();
  let handle = tokio::spawn(async move { loader.fetch_all().await.len() });

  tokio::time::sleep(std::time::Duration::from_millis(50)).await;
  assert!(store.loading());
  assert!(store.is_empty());
  assert_eq!(store.count(), 0);

  assert_eq!(handle.await.unwrap(), 12);
  assert_eq!(store.len(), 12);
  assert!(!store.loading());
}

#[tokio::test]
async fn test_fetch_all_keeps_foreign_next_links_on_base_origin() {
  let state = MockState::new()
    .with("contact", contacts(23))
    .link_origin("http://internal.invalid:9");
  let (mock, store) = contact_store(state, 10).await;
  store.api().session().set_tokens("abc".to_string(), None).unwrap();

  let all = store.fetch_all().await;

  assert_eq!(store.error(), None);
  assert_eq!(ids(&all), (1..=23).collect::<Vec<_>>());
  let requests = mock.requests();
  assert_eq!(requests.len(), 3);
  assert!(requests
    .iter()
    .all(|r| r.authorization.as_deref() == Some("Bearer abc")));
}

// ============================================================================
// Writes
// ============================================================================

#[tokio::test]
async fn test_create_appends_server_entity() {
  let (mock, store) = contact_store(MockState::new(), 10).await;
  assert!(store.is_empty());

  let created = store.create(&payload("Ada", "Lovelace")).await.unwrap();

  assert_eq!(created.id, 100);
  assert_eq!(store.len(), 1);
  assert_eq!(store.get_by_id(100).unwrap().last_name, "Lovelace");
  assert_eq!(store.count(), 1);
  assert_eq!(mock.stored("contact").len(), 1);
}

#[tokio::test]
async fn test_create_rejects_invalid_payload_locally() {
  let (mock, store) = contact_store(MockState::new(), 10).await;

  let err = store.create(&payload("", "Lovelace")).await.unwrap_err();

  assert!(err.to_string().contains("first_name"));
  assert!(store.error().is_some());
  assert_eq!(mock.request_count("POST"), 0);
  assert!(store.is_empty());
}

#[tokio::test]
async fn test_update_replaces_in_place() {
  let (mock, store) = contact_store(MockState::new().with("contact", contacts(3)), 10).await;
  store.fetch_page(&ListQuery::page(1)).await;

  let updated = store.update(2, &payload("Grace", "Hopper")).await.unwrap();

  assert_eq!(updated.first_name, "Grace");
  assert_eq!(ids(&store.items()), vec![1, 2, 3]);
  assert_eq!(store.get_by_id(2).unwrap().last_name, "Hopper");
  assert_eq!(mock.request_count("PATCH"), 1);
  assert_eq!(mock.request_count("PUT"), 0);
}

#[tokio::test]
async fn test_update_unknown_locally_appends() {
  let (_mock, store) = contact_store(MockState::new().with("contact", contacts(3)), 10).await;

  store.update(3, &payload("Grace", "Hopper")).await.unwrap();

  assert_eq!(ids(&store.items()), vec![3]);
}

#[tokio::test]
async fn test_update_preserves_omitted_relations() {
  let strains = vec![json!({
    "id": 5,
    "name": "C57BL/6J",
    "species": {"id": 1, "name": "Mus musculus"},
  })];
  let mock = MockApi::start(
    MockState::new()
      .with("strain", strains)
      .omit_on_update("species"),
  )
  .await;
  let store: ResourceStore<Strain> = ResourceStore::new(mock.client());
  store.fetch_all().await;
  let species = store.get_by_id(5).unwrap().species;
  assert!(species.is_some());

  let payload = StrainPayload {
    name: "C57BL/6N".to_string(),
    ..Default::default()
  };
  let updated = store.update(5, &payload).await.unwrap();

  assert_eq!(updated.name, "C57BL/6N");
  assert_eq!(updated.species, species);
  assert_eq!(store.get_by_id(5).unwrap().species, species);
  assert_eq!(mock.request_count("PUT"), 1);
}

#[tokio::test]
async fn test_update_failure_leaves_collection() {
  let (_mock, store) = contact_store(MockState::new().with("contact", contacts(2)), 10).await;
  store.fetch_page(&ListQuery::page(1)).await;
  let before = store.items();

  let err = store.update(77, &payload("No", "One")).await.unwrap_err();

  assert_eq!(err.to_string(), "Not found.");
  assert_eq!(store.error().as_deref(), Some("Not found."));
  assert_eq!(store.items(), before);
}

#[tokio::test]
async fn test_delete_then_delete_again() {
  let records = vec![
    json!({"id": 1, "first_name": "A", "last_name": "One"}),
    json!({"id": 42, "first_name": "B", "last_name": "Two"}),
    json!({"id": 7, "first_name": "C", "last_name": "Three"}),
  ];
  let (mock, store) = contact_store(MockState::new().with("contact", records), 10).await;
  store.fetch_page(&ListQuery::page(1)).await;
  assert_eq!(store.count(), 3);

  store.delete(42).await.unwrap();
  assert_eq!(ids(&store.items()), vec![1, 7]);
  assert_eq!(store.count(), 2);

  // the server is still asked; its 404 is the failure
  assert_eq!(store.delete(42).await.unwrap_err().to_string(), "Not found.");
  assert_eq!(mock.request_count("DELETE"), 2);
  assert_eq!(ids(&store.items()), vec![1, 7]);
  assert_eq!(store.count(), 2);
  assert!(store.error().is_some());
}

#[tokio::test]
async fn test_concurrent_updates_leave_one_entity() {
  let (mock, store) = contact_store(MockState::new().with("contact", contacts(1)), 10).await;
  store.fetch_page(&ListQuery::page(1)).await;
  mock.delay_updates(&[80, 0]);

  let a = payload("Alpha", "A");
  let b = payload("Beta", "B");
  let (ra, rb) = tokio::join!(store.update(1, &a), store.update(1, &b));
  ra.unwrap();
  rb.unwrap();

  let items = store.items();
  assert_eq!(items.len(), 1);
  let name = items[0].first_name.as_str();
  assert!(name == "Alpha" || name == "Beta", "unexpected {name}");
}

// ============================================================================
// Session
// ============================================================================

#[tokio::test]
async fn test_bearer_header_follows_session() {
  let mock = MockApi::start(MockState::new().with("contact", contacts(3))).await;
  let session = Session::in_memory();
  let store: ResourceStore<Contact> = ResourceStore::new(mock.client_with(session.clone()));

  store.fetch_page(&ListQuery::page(1)).await;
  store.resolve_by_id(3).await;
  assert!(mock.requests().iter().all(|r| r.authorization.is_none()));

  session.set_tokens("abc".to_string(), None).unwrap();
  mock.clear_requests();
  store.fetch_all().await;
  store.delete(3).await.unwrap();

  let requests = mock.requests();
  assert_eq!(requests.len(), 2);
  assert!(requests
    .iter()
    .all(|r| r.authorization.as_deref() == Some("Bearer abc")));

  session.clear().unwrap();
  mock.clear_requests();
  store.fetch_page(&ListQuery::page(1)).await;
  assert!(mock.requests()[0].authorization.is_none());
}

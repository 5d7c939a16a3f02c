//! Integration tests for the todo store over the HTTP backend.
//!
//! These tests run the store against a mock collection resource and check
//! both the requests it sends and how the local list reacts to the answers.

use std::sync::Arc;

use serde_json::json;
use taskboard_client::backend::HttpBackend;
use taskboard_client::error::{Operation, StoreError};
use taskboard_client::store::TodoStore;
use taskboard_client::types::TodoPatch;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// =============================================================================
// Test Helpers
// =============================================================================

fn store_for(server: &MockServer) -> TodoStore {
    let backend = HttpBackend::new(&format!("{}/todos", server.uri()), None)
        .expect("client should build");
    TodoStore::new(Arc::new(backend))
}

async fn mount_list(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/todos"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": "1", "text": "Buy milk", "completed": false, "author": "Alice"},
            {"id": "2", "text": "Walk dog", "completed": true, "author": "Bob"}
        ])))
        .mount(server)
        .await;
}

/// Returns a store whose local list holds the two seeded items.
async fn loaded_store(server: &MockServer) -> TodoStore {
    mount_list(server).await;
    let mut store = store_for(server);
    store.list_all().await.expect("list should load");
    store
}

// =============================================================================
// Success paths
// =============================================================================

#[tokio::test]
async fn test_list_all_replaces_local_list_in_server_order() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/todos"))
        .and(header("cache-control", "no-store"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 7, "text": "Second", "completed": false, "author": "Bob"},
            {"id": "3", "text": "First", "completed": true, "author": "Alice", "createdAt": "x"}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let mut store = store_for(&server);
    let items = store.list_all().await.expect("list should load");

    assert_eq!(items.len(), 2);
    assert_eq!(items[0].id, "7");
    assert_eq!(items[0].text, "Second");
    assert_eq!(items[1].id, "3");
    assert!(items[1].completed);
}

#[tokio::test]
async fn test_create_posts_draft_and_appends_server_item() {
    let server = MockServer::start().await;
    let mut store = loaded_store(&server).await;

    Mock::given(method("POST"))
        .and(path("/todos"))
        .and(body_json(json!({"text": "Read book", "completed": false, "author": "Carol"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!(
            {"id": "3", "text": "Read book", "completed": false, "author": "Carol"}
        )))
        .expect(1)
        .mount(&server)
        .await;

    let created = store.create("Read book", "Carol").await.expect("create should succeed");

    assert_eq!(created.id, "3");
    assert_eq!(created.author, "Carol");
    assert!(!created.completed);
    assert_eq!(store.len(), 3);
    assert_eq!(store.items().last(), Some(&created));
}

#[tokio::test]
async fn test_update_sends_only_present_fields() {
    let server = MockServer::start().await;
    let mut store = loaded_store(&server).await;

    Mock::given(method("PUT"))
        .and(path("/todos/1"))
        .and(body_json(json!({"completed": true})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(
            {"id": "1", "text": "Buy milk", "completed": true, "author": "Alice"}
        )))
        .expect(1)
        .mount(&server)
        .await;

    let updated = store
        .update("1", &TodoPatch::completed(true))
        .await
        .expect("update should succeed");

    assert!(updated.completed);
    assert_eq!(store.get("1"), Some(&updated));
    assert_eq!(store.len(), 2);
}

#[tokio::test]
async fn test_local_item_takes_server_representation() {
    let server = MockServer::start().await;
    let mut store = loaded_store(&server).await;

    // The server normalizes the text; the local copy must match it.
    Mock::given(method("PUT"))
        .and(path("/todos/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(
            {"id": "1", "text": "BUY MILK", "completed": false, "author": "Alice"}
        )))
        .mount(&server)
        .await;

    store
        .update("1", &TodoPatch::text("buy milk"))
        .await
        .expect("update should succeed");

    assert_eq!(store.get("1").map(|t| t.text.as_str()), Some("BUY MILK"));
}

#[tokio::test]
async fn test_toggle_flips_current_state() {
    let server = MockServer::start().await;
    let mut store = loaded_store(&server).await;

    Mock::given(method("PUT"))
        .and(path("/todos/2"))
        .and(body_json(json!({"completed": false})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(
            {"id": "2", "text": "Walk dog", "completed": false, "author": "Bob"}
        )))
        .expect(1)
        .mount(&server)
        .await;

    let toggled = store.toggle("2").await.expect("toggle should succeed");
    assert!(!toggled.completed);
}

#[tokio::test]
async fn test_delete_removes_item() {
    let server = MockServer::start().await;
    let mut store = loaded_store(&server).await;

    Mock::given(method("DELETE"))
        .and(path("/todos/2"))
        .respond_with(ResponseTemplate::new(200).set_body_string("whatever"))
        .expect(1)
        .mount(&server)
        .await;

    store.delete("2").await.expect("delete should succeed");

    assert_eq!(store.len(), 1);
    assert!(store.get("2").is_none());
}

#[tokio::test]
async fn test_trailing_slash_in_base_url() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/todos/9"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let backend = HttpBackend::new(&format!("{}/todos/", server.uri()), None).unwrap();
    let mut store = TodoStore::new(Arc::new(backend));

    store.delete("9").await.expect("delete should succeed");
}

#[tokio::test]
async fn test_reserved_characters_in_id_stay_in_one_path_segment() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/todos"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": "a#b", "text": "Odd id", "completed": false, "author": "Alice"},
            {"id": "a", "text": "Plain id", "completed": false, "author": "Alice"}
        ])))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/todos/a%23b"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/todos/x%3Fy=1"))
        .and(body_json(json!({"completed": true})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(
            {"id": "x?y=1", "text": "Query id", "completed": true, "author": "Alice"}
        )))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/todos/a%2Fb"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;
    // Nothing may be routed to the item whose id is a prefix of another.
    Mock::given(path("/todos/a"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let mut store = store_for(&server);
    store.list_all().await.expect("list should load");

    store.delete("a#b").await.expect("delete should succeed");
    assert!(store.get("a#b").is_none());
    assert!(store.get("a").is_some(), "other item must be kept");

    let updated = store
        .update("x?y=1", &TodoPatch::completed(true))
        .await
        .expect("update should succeed");
    assert_eq!(updated.id, "x?y=1");

    let err = store.delete("a/b").await.unwrap_err();
    assert!(matches!(err, StoreError::Delete { status: 404, .. }));

    let received = server.received_requests().await.expect("recording is on");
    let paths: Vec<&str> = received.iter().map(|r| r.url.path()).collect();
    assert_eq!(
        paths,
        vec!["/todos", "/todos/a%23b", "/todos/x%3Fy=1", "/todos/a%2Fb"]
    );
    assert!(received.iter().all(|r| r.url.query().is_none()));
}

// =============================================================================
// Failure paths
// =============================================================================

#[tokio::test]
async fn test_fetch_failure_keeps_previous_list() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/todos"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": "1", "text": "Buy milk", "completed": false, "author": "Alice"}
        ])))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/todos"))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .mount(&server)
        .await;

    let mut store = store_for(&server);
    store.list_all().await.expect("first list should load");
    let before = store.items().to_vec();

    let err = store.list_all().await.unwrap_err();

    assert!(matches!(
        err,
        StoreError::Fetch { status: 503, ref body } if body == "maintenance"
    ));
    assert_eq!(store.items(), before.as_slice());
}

#[tokio::test]
async fn test_create_failure_carries_status_and_body() {
    let server = MockServer::start().await;
    let mut store = loaded_store(&server).await;
    let before = store.items().to_vec();

    Mock::given(method("POST"))
        .and(path("/todos"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let err = store.create("Read book", "Carol").await.unwrap_err();

    assert!(matches!(err, StoreError::Create { status: 500, ref body } if body == "boom"));
    assert_eq!(err.http_status(), Some(500));
    assert_eq!(store.items(), before.as_slice());
}

#[tokio::test]
async fn test_update_of_unknown_id_is_reported() {
    let server = MockServer::start().await;
    let mut store = loaded_store(&server).await;
    let before = store.items().to_vec();

    Mock::given(method("PUT"))
        .and(path("/todos/404"))
        .respond_with(ResponseTemplate::new(404).set_body_string("\"Not found\""))
        .mount(&server)
        .await;

    let err = store
        .update("404", &TodoPatch::text("x"))
        .await
        .unwrap_err();

    assert!(matches!(err, StoreError::Update { status: 404, .. }));
    assert_eq!(store.items(), before.as_slice());
}

#[tokio::test]
async fn test_delete_failure_keeps_item() {
    let server = MockServer::start().await;
    let mut store = loaded_store(&server).await;

    Mock::given(method("DELETE"))
        .and(path("/todos/1"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let err = store.delete("1").await.unwrap_err();

    assert!(matches!(err, StoreError::Delete { status: 403, ref body } if body.is_empty()));
    assert!(store.get("1").is_some());
    assert_eq!(store.len(), 2);
}

#[tokio::test]
async fn test_unreadable_success_body_is_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/todos"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let mut store = store_for(&server);
    let err = store.list_all().await.unwrap_err();

    assert!(matches!(
        err,
        StoreError::Decode {
            operation: Operation::Fetch,
            ..
        }
    ));
    assert!(store.is_empty());
}

#[tokio::test]
async fn test_blank_text_sends_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;

    let mut store = store_for(&server);
    let err = store.create("   ", "Alice").await.unwrap_err();

    assert!(matches!(err, StoreError::EmptyText));
}

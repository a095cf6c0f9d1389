use std::sync::Arc;

use reqwest::StatusCode;
use serde_json::json;

use hotcoffee_api::app::{build_app, services::AppServices};
use hotcoffee_infra::InMemoryInventoryStore;

struct TestServer {
    base_url: String,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn() -> Self {
        // Same router as prod, backed by the in-memory store, on an ephemeral port.
        let services = Arc::new(AppServices::new(Arc::new(InMemoryInventoryStore::new())));
        let app = build_app(services);
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { base_url, handle }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn milk(quantity: f64) -> serde_json::Value {
    json!({ "ingredient_id": "milk-1", "name": "Milk", "quantity": quantity, "unit": "L" })
}

async fn list_ids(client: &reqwest::Client, srv: &TestServer) -> Vec<String> {
    let res = client.get(srv.url("/inventory")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    body.as_array()
        .unwrap()
        .iter()
        .map(|i| i["ingredient_id"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn health_is_ok() {
    let srv = TestServer::spawn().await;
    let res = reqwest::get(srv.url("/health")).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn inventory_lifecycle_create_update_delete() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    // Create
    let res = client.post(srv.url("/inventory")).json(&milk(10.0)).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let created: serde_json::Value = res.json().await.unwrap();
    assert_eq!(created[0]["ingredient_id"], "milk-1");

    // Read back
    let res = client.get(srv.url("/inventory/milk-1")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let item: serde_json::Value = res.json().await.unwrap();
    assert_eq!(item, milk(10.0));

    // Update quantity only
    let res = client
        .put(srv.url("/inventory/milk-1"))
        .json(&json!({ "name": "Oat Milk", "quantity": 4 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let item: serde_json::Value = res.json().await.unwrap();
    assert_eq!(item, milk(4.0));

    // Delete
    let res = client.delete(srv.url("/inventory/milk-1")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let res = client.get(srv.url("/inventory/milk-1")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn duplicate_create_is_conflict_and_keeps_original() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client.post(srv.url("/inventory")).json(&milk(10.0)).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);

    let res = client.post(srv.url("/inventory")).json(&milk(5.0)).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::CONFLICT);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "conflict");
    assert_eq!(body["message"], "item already exists");

    let item: serde_json::Value = client
        .get(srv.url("/inventory/milk-1"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(item["quantity"], 10.0);
}

#[tokio::test]
async fn invalid_item_is_bad_request() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client.post(srv.url("/inventory")).json(&milk(-1.0)).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "validation_error");

    let res = client.post(srv.url("/inventory")).json(&json!([])).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    assert!(list_ids(&client, &srv).await.is_empty());
}

#[tokio::test]
async fn array_body_is_added_in_order_until_first_failure() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .post(srv.url("/inventory"))
        .json(&json!([
            { "ingredient_id": "beans", "name": "Beans", "quantity": 2, "unit": "kg" },
            { "ingredient_id": "beans", "name": "Beans", "quantity": 3, "unit": "kg" },
            { "ingredient_id": "sugar", "name": "Sugar", "quantity": 1, "unit": "kg" },
        ]))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CONFLICT);
    assert_eq!(list_ids(&client, &srv).await, vec!["beans".to_string()]);
}

#[tokio::test]
async fn atomic_batch_rolls_back_entirely() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .post(srv.url("/inventory?atomic=true"))
        .json(&json!([
            { "ingredient_id": "beans", "name": "Beans", "quantity": 2, "unit": "kg" },
            { "ingredient_id": "beans", "name": "Beans", "quantity": 3, "unit": "kg" },
        ]))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CONFLICT);
    assert!(list_ids(&client, &srv).await.is_empty());

    let res = client
        .post(srv.url("/inventory?atomic=true"))
        .json(&json!([
            { "ingredient_id": "beans", "name": "Beans", "quantity": 2, "unit": "kg" },
            { "ingredient_id": "sugar", "name": "Sugar", "quantity": 1, "unit": "kg" },
        ]))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    assert_eq!(list_ids(&client, &srv).await, vec!["beans".to_string(), "sugar".to_string()]);
}

#[tokio::test]
async fn unknown_identifier_is_not_found_for_update_and_delete() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .put(srv.url("/inventory/ghost"))
        .json(&json!({ "quantity": 1 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "not_found");

    let res = client.delete(srv.url("/inventory/ghost")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_leaves_other_items_untouched() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .post(srv.url("/inventory"))
        .json(&json!([
            { "ingredient_id": "beans", "name": "Beans", "quantity": 2, "unit": "kg" },
            { "ingredient_id": "milk-1", "name": "Milk", "quantity": 10, "unit": "L" },
            { "ingredient_id": "sugar", "name": "Sugar", "quantity": 1, "unit": "kg" },
        ]))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);

    let res = client.delete(srv.url("/inventory/milk-1")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    assert_eq!(list_ids(&client, &srv).await, vec!["beans".to_string(), "sugar".to_string()]);
    let beans: serde_json::Value = client
        .get(srv.url("/inventory/beans"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(beans["quantity"], 2.0);
}

#[tokio::test]
async fn undecodable_bodies_are_validation_errors() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .post(srv.url("/inventory"))
        .json(&json!({ "ingredient_id": "milk-1", "name": "Milk", "unit": "L" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "validation_error");
    assert!(body["message"].as_str().unwrap().contains("quantity"));

    let res = client
        .post(srv.url("/inventory?atomic=maybe"))
        .json(&milk(1.0))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "validation_error");
    assert!(list_ids(&client, &srv).await.is_empty());

    let res = client.post(srv.url("/inventory")).json(&milk(10.0)).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);

    let res = client
        .put(srv.url("/inventory/milk-1"))
        .json(&json!({ "quantity": "ten" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "validation_error");

    let item: serde_json::Value = client
        .get(srv.url("/inventory/milk-1"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(item, milk(10.0));
}

#[tokio::test]
async fn padded_identifier_is_rejected_everywhere() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .post(srv.url("/inventory"))
        .json(&json!({ "ingredient_id": " beans ", "name": "Beans", "quantity": 2, "unit": "kg" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "validation_error");
    assert!(list_ids(&client, &srv).await.is_empty());

    let res = client.get(srv.url("/inventory/%20beans%20")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = client
        .post(srv.url("/inventory"))
        .json(&json!({ "ingredient_id": "beans", "name": "Beans", "quantity": 2, "unit": "kg" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let res = client.delete(srv.url("/inventory/beans")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::NO_CONTENT);
}

use axum::body::Body;
use boat_registry::{BoatStore, MemoryStore};
use reqwest::{header, redirect, Client, Response, StatusCode};
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::ServiceExt;

const BASE_URL: &str = "http://boats.test";

// Test client wrapper for making API calls against an in-process server
struct TestClient {
    client: Client,
    addr: String,
    store: Arc<MemoryStore>,
}

impl TestClient {
    async fn start() -> Self {
        let store = Arc::new(MemoryStore::new());
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = format!("http://{}", listener.local_addr().unwrap());

        let app = boat_registry::app(store.clone(), BASE_URL);
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        // 303 must be observed, not followed
        let client = Client::builder()
            .redirect(redirect::Policy::none())
            .build()
            .unwrap();

        Self { client, addr, store }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.addr, path)
    }

    async fn post(&self, path: &str, json: Value) -> Response {
        self.client.post(self.url(path)).json(&json).send().await.unwrap()
    }

    async fn put(&self, path: &str, json: Value) -> Response {
        self.client.put(self.url(path)).json(&json).send().await.unwrap()
    }

    async fn patch(&self, path: &str, json: Value) -> Response {
        self.client.patch(self.url(path)).json(&json).send().await.unwrap()
    }

    async fn get(&self, path: &str) -> Response {
        self.client.get(self.url(path)).send().await.unwrap()
    }

    async fn get_accepting(&self, path: &str, accept: &str) -> Response {
        self.client
            .get(self.url(path))
            .header(header::ACCEPT, accept)
            .send()
            .await
            .unwrap()
    }

    async fn delete(&self, path: &str) -> Response {
        self.client.delete(self.url(path)).send().await.unwrap()
    }

    async fn boat_count(&self) -> usize {
        self.store.list_boats().await.unwrap().len()
    }
}

fn titanic() -> Value {
    json!({"name": "Titanic", "type": "Cruise", "length": 269})
}

async fn error_message(response: Response) -> String {
    let body: Value = response.json().await.unwrap();
    let object = body.as_object().unwrap();
    assert_eq!(object.len(), 1, "error envelope has extra fields: {}", body);
    object["Error"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_create_on_empty_store() {
    let client = TestClient::start().await;

    let response = client.post("/boats", titanic()).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let body: Value = response.json().await.unwrap();
    assert_eq!(
        body,
        json!({
            "id": "1",
            "name": "Titanic",
            "type": "Cruise",
            "length": 269,
            "self": "http://boats.test/boats/1"
        })
    );
}

#[tokio::test]
async fn test_duplicate_name_is_forbidden() {
    let client = TestClient::start().await;
    client.post("/boats", titanic()).await;

    let response = client
        .post("/boats", json!({"name": "Titanic", "type": "Ferry", "length": 50}))
        .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert!(!error_message(response).await.is_empty());
    assert_eq!(client.boat_count().await, 1);
}

#[tokio::test]
async fn test_wrong_attribute_count_is_rejected_without_mutation() {
    let client = TestClient::start().await;
    client.post("/boats", titanic()).await;

    for body in [
        json!({"name": "Nautilus", "type": "Submarine"}),
        json!({"name": "Nautilus", "type": "Submarine", "length": 70, "crew": 12}),
        json!({}),
    ] {
        let response = client.post("/boats", body.clone()).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "create {}", body);

        let response = client.put("/boats/1", body.clone()).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "replace {}", body);
    }

    assert_eq!(client.boat_count().await, 1);
    let body: Value = client.get("/boats/1").await.json().await.unwrap();
    assert_eq!(body["type"], "Cruise");
}

#[tokio::test]
async fn test_create_requires_json_content_type() {
    let client = TestClient::start().await;

    let response = client
        .client
        .post(client.url("/boats"))
        .header(header::CONTENT_TYPE, "text/plain")
        .body(titanic().to_string())
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
    assert_eq!(client.boat_count().await, 0);
}

#[tokio::test]
async fn test_create_requires_json_acceptance() {
    let client = TestClient::start().await;

    let response = client
        .client
        .post(client.url("/boats"))
        .header(header::ACCEPT, "text/html")
        .json(&titanic())
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_ACCEPTABLE);
    assert_eq!(client.boat_count().await, 0);
}

#[tokio::test]
async fn test_patch_with_id_is_rejected() {
    let client = TestClient::start().await;
    client.post("/boats", titanic()).await;

    for body in [
        json!({"id": "1"}),
        json!({"id": null, "type": "Ferry"}),
        json!({"id": 2, "name": "Other", "type": "Ferry"}),
    ] {
        let response = client.patch("/boats/1", body).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    let body: Value = client.get("/boats/1").await.json().await.unwrap();
    assert_eq!(body["type"], "Cruise");
    assert_eq!(body["name"], "Titanic");
}

#[tokio::test]
async fn test_patch_overwrites_only_supplied_fields() {
    let client = TestClient::start().await;
    client.post("/boats", titanic()).await;

    let response = client.patch("/boats/1", json!({"type": "Ferry"})).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["name"], "Titanic");
    assert_eq!(body["length"], 269);
    assert_eq!(body["type"], "Ferry");
    assert_eq!(body["self"], "http://boats.test/boats/1");
}

#[tokio::test]
async fn test_patch_applies_falsy_values() {
    let client = TestClient::start().await;
    client.post("/boats", titanic()).await;

    let response = client.patch("/boats/1", json!({"length": 0, "name": ""})).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["length"], 0);
    assert_eq!(body["name"], "");
    assert_eq!(body["type"], "Cruise");
}

#[tokio::test]
async fn test_patch_rename_collision() {
    let client = TestClient::start().await;
    client.post("/boats", titanic()).await;
    client
        .post("/boats", json!({"name": "Nautilus", "type": "Submarine", "length": 70}))
        .await;

    let response = client.patch("/boats/2", json!({"name": "Titanic"})).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // Re-sending a boat's own name is not a collision.
    let response = client.patch("/boats/1", json!({"name": "Titanic"})).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_put_redirects_to_self() {
    let client = TestClient::start().await;
    client.post("/boats", titanic()).await;

    let response = client
        .put("/boats/1", json!({"name": "Queen Mary", "type": "Liner", "length": 310}))
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let location = response.headers()[header::LOCATION].to_str().unwrap().to_string();
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["self"], location);
    assert_eq!(location, "http://boats.test/boats/1");
    assert_eq!(body["name"], "Queen Mary");
    assert_eq!(body["id"], "1");
}

#[tokio::test]
async fn test_put_rejects_id_in_payload() {
    let client = TestClient::start().await;
    client.post("/boats", titanic()).await;

    let response = client
        .put("/boats/1", json!({"id": "1", "name": "Titanic", "type": "Cruise"}))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_updates_of_missing_boat_are_not_found() {
    let client = TestClient::start().await;

    let response = client.patch("/boats/7", json!({"type": "Ferry"})).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = client.put("/boats/7", titanic()).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(client.boat_count().await, 0);
}

#[tokio::test]
async fn test_get_missing_boat() {
    let client = TestClient::start().await;

    for path in ["/boats/42", "/boats/not-a-number"] {
        let response = client.get(path).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(error_message(response).await, "No boat with this boat_id exists");
    }
}

#[tokio::test]
async fn test_get_negotiates_representation() {
    let client = TestClient::start().await;
    client.post("/boats", titanic()).await;

    let response = client.get_accepting("/boats/1", "text/html").await;
    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response.headers()[header::CONTENT_TYPE].to_str().unwrap().to_string();
    assert!(content_type.starts_with("text/html"));
    let page = response.text().await.unwrap();
    assert!(page.contains("Titanic"));
    assert!(page.contains("http://boats.test/boats/1"));

    let response = client.get_accepting("/boats/1", "application/json").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["id"], "1");

    let response = client.get_accepting("/boats/1", "image/png").await;
    assert_eq!(response.status(), StatusCode::NOT_ACCEPTABLE);
}

#[tokio::test]
async fn test_delete_then_get() {
    let client = TestClient::start().await;
    client.post("/boats", titanic()).await;

    let response = client.delete("/boats/1").await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert!(response.bytes().await.unwrap().is_empty());

    let response = client.get("/boats/1").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = client.delete("/boats/1").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_collection_root_put_and_delete_not_allowed() {
    let client = TestClient::start().await;

    let responses = vec![
        client.put("/boats", titanic()).await,
        client.delete("/boats").await,
        client
            .client
            .put(client.url("/boats/"))
            .header(header::CONTENT_TYPE, "text/plain")
            .body("anything")
            .send()
            .await
            .unwrap(),
    ];

    for response in responses {
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(response.headers()[header::ALLOW], "POST");
        assert_eq!(response.headers()[header::ACCEPT], "POST");
        assert!(error_message(response).await.contains("not allowed for root boat url"));
    }
    assert_eq!(client.boat_count().await, 0);
}

#[tokio::test]
async fn test_malformed_json_is_bad_request() {
    let client = TestClient::start().await;

    let response = client
        .client
        .post(client.url("/boats"))
        .header(header::CONTENT_TYPE, "application/json")
        .body("{\"name\": ")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_health_and_root() {
    let client = TestClient::start().await;

    let response = client.get("/").await;
    assert_eq!(response.text().await.unwrap(), "hello world");

    let body: Value = client.get("/health").await.json().await.unwrap();
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_unsupported_methods_keep_error_envelope() {
    let client = TestClient::start().await;

    let response = client.get("/boats").await;
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(response.headers()[header::ALLOW], "POST");
    assert_eq!(
        error_message(response).await,
        "GET method is not allowed for root boat url"
    );

    let response = client.patch("/boats", titanic()).await;
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(response.headers()[header::ALLOW], "POST");
    assert!(error_message(response).await.contains("PATCH"));

    let response = client.post("/boats/1", titanic()).await;
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(response.headers()[header::ALLOW], "GET, PATCH, PUT, DELETE");
    assert!(!error_message(response).await.is_empty());

    let response = client.delete("/health").await;
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(response.headers()[header::ALLOW], "GET");
    assert!(!error_message(response).await.is_empty());

    assert_eq!(client.boat_count().await, 0);
}

#[tokio::test]
async fn test_unknown_path_keeps_error_envelope() {
    let client = TestClient::start().await;

    let response = client.get("/nope").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(!error_message(response).await.is_empty());

    let response = client.get("/boats/1/crew").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(!error_message(response).await.is_empty());
}

#[tokio::test]
async fn test_oversized_body_keeps_error_envelope() {
    let store = Arc::new(MemoryStore::new());
    let app = boat_registry::app(store.clone(), BASE_URL);

    let name = "x".repeat(3 * 1024 * 1024);
    let payload = json!({"name": name, "type": "Cruise", "length": 269});
    let request = axum::http::Request::builder()
        .method("POST")
        .uri("/boats")
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(&payload).unwrap()))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status().as_u16(), 413);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    let object = body.as_object().unwrap();
    assert_eq!(object.len(), 1);
    assert!(object["Error"].is_string());
    assert!(store.list_boats().await.unwrap().is_empty());
}

//! API integration tests

use axum::{
    body::{to_bytes, Body},
    http::{header::CONTENT_TYPE, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use bookshelf_server::{
    api,
    models::book::BookPayload,
    repository::{BookStore, Repository},
    services::books::create_book,
    AppConfig, AppState,
};

fn app() -> Router {
    api::create_router(AppState::new(AppConfig::default()))
}

/// Send a request and return the status with the parsed JSON body
async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string())),
        None => builder.body(Body::empty()),
    }
    .expect("Failed to build request");

    let response = app.clone().oneshot(request).await.expect("Failed to send request");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body");
    let body = serde_json::from_slice(&bytes).expect("Failed to parse response");
    (status, body)
}

async fn create(app: &Router, book: Value) -> String {
    let (status, body) = send(app, Method::POST, "/books", Some(book)).await;
    assert_eq!(status, StatusCode::CREATED);
    body["data"]["bookId"].as_str().expect("No book ID").to_string()
}

async fn list_ids(app: &Router, uri: &str) -> Vec<String> {
    let (status, body) = send(app, Method::GET, uri, None).await;
    assert_eq!(status, StatusCode::OK);
    body["data"]["books"]
        .as_array()
        .expect("No books array")
        .iter()
        .map(|book| book["id"].as_str().expect("No id").to_string())
        .collect()
}

fn dune() -> Value {
    json!({
        "name": "Dune",
        "year": 1965,
        "author": "Frank Herbert",
        "summary": "Desert planet",
        "publisher": "Chilton",
        "pageCount": 412,
        "readPage": 100,
        "reading": true
    })
}

#[tokio::test]
async fn test_health_check() {
    let app = app();

    let (status, body) = send(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");

    let (status, body) = send(&app, Method::GET, "/ready", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ready");
}

#[tokio::test]
async fn test_create_book() {
    let app = app();

    let (status, body) = send(&app, Method::POST, "/books", Some(dune())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["status"], "success");
    assert_eq!(body["message"], "Book added successfully");
    assert_eq!(body["data"]["bookId"].as_str().map(str::len), Some(16));
}

#[tokio::test]
async fn test_create_finished_round_trip() {
    let app = app();
    let id = create(&app, json!({ "name": "A", "pageCount": 10, "readPage": 10 })).await;

    let (status, body) = send(&app, Method::GET, &format!("/books/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");
    assert!(body.get("message").is_none());

    let book = &body["data"]["book"];
    assert_eq!(book["id"], id.as_str());
    assert_eq!(book["name"], "A");
    assert_eq!(book["year"], 0);
    assert_eq!(book["author"], "");
    assert_eq!(book["finished"], true);
    assert_eq!(book["reading"], false);
    assert_eq!(book["insertedAt"], book["updatedAt"]);
    assert!(book["insertedAt"].as_str().expect("No insertedAt").ends_with('Z'));
}

#[tokio::test]
async fn test_create_without_name() {
    let app = app();

    let (status, body) = send(&app, Method::POST, "/books", Some(json!({ "pageCount": 10 }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body,
        json!({
            "status": "fail",
            "message": "Failed to add book. Please provide the book name"
        })
    );
    assert!(list_ids(&app, "/books").await.is_empty());
}

#[tokio::test]
async fn test_create_read_page_exceeds_page_count() {
    let app = app();

    let (status, body) = send(
        &app,
        Method::POST,
        "/books",
        Some(json!({ "name": "A", "pageCount": 10, "readPage": 11 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], "fail");
    assert_eq!(
        body["message"],
        "Failed to add book. readPage must not be greater than pageCount"
    );
    assert!(body.get("data").is_none());
    assert!(list_ids(&app, "/books").await.is_empty());
}

#[tokio::test]
async fn test_create_malformed_body() {
    let app = app();

    let (status, body) = send(
        &app,
        Method::POST,
        "/books",
        Some(json!({ "name": "A", "pageCount": -3 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], "fail");
    assert!(body["message"].is_string());

    let request = Request::builder()
        .method(Method::POST)
        .uri("/books")
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .expect("Failed to build request");
    let response = app.clone().oneshot(request).await.expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_list_books() {
    let app = app();
    let first = create(&app, dune()).await;
    let second = create(&app, json!({ "name": "Hyperion", "publisher": "Doubleday" })).await;

    let (status, body) = send(&app, Method::GET, "/books", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.get("message").is_none());
    assert_eq!(
        body["data"]["books"],
        json!([
            { "id": first, "name": "Dune", "publisher": "Chilton" },
            { "id": second, "name": "Hyperion", "publisher": "Doubleday" }
        ])
    );
}

#[tokio::test]
async fn test_list_empty() {
    let app = app();

    let (status, body) = send(&app, Method::GET, "/books", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "success", "data": { "books": [] } }));
}

#[tokio::test]
async fn test_list_filters() {
    let app = app();
    let reading = create(&app, dune()).await;
    let finished = create(
        &app,
        json!({ "name": "Children of Dune", "pageCount": 10, "readPage": 10 }),
    )
    .await;
    let idle = create(&app, json!({ "name": "Hyperion", "pageCount": 10, "readPage": 1 })).await;

    assert_eq!(list_ids(&app, "/books?reading=1").await, [reading.clone()]);
    assert_eq!(list_ids(&app, "/books?reading=0").await, [finished.clone(), idle.clone()]);
    assert_eq!(list_ids(&app, "/books?finished=1").await, [finished.clone()]);
    assert_eq!(list_ids(&app, "/books?finished=0").await, [reading.clone(), idle.clone()]);
    assert_eq!(list_ids(&app, "/books?name=DUNE").await, [reading.clone(), finished.clone()]);
    assert_eq!(list_ids(&app, "/books?name=dune&finished=0").await, [reading]);
    assert_eq!(list_ids(&app, "/books?reading=maybe").await.len(), 3);
    assert!(list_ids(&app, "/books?name=nothing").await.is_empty());
}

#[tokio::test]
async fn test_get_unknown_book() {
    let app = app();

    let (status, body) = send(&app, Method::GET, "/books/unknown", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "status": "fail", "message": "Book not found" }));
}

#[tokio::test]
async fn test_update_book() {
    let app = app();
    let id = create(&app, dune()).await;
    let uri = format!("/books/{}", id);

    let (_, before) = send(&app, Method::GET, &uri, None).await;

    let (status, body) = send(
        &app,
        Method::PUT,
        &uri,
        Some(json!({ "name": "Dune Messiah", "pageCount": 256, "readPage": 256 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "success", "message": "Book updated successfully" }));

    let (_, after) = send(&app, Method::GET, &uri, None).await;
    let (before, after) = (&before["data"]["book"], &after["data"]["book"]);
    assert_eq!(after["id"], before["id"]);
    assert_eq!(after["insertedAt"], before["insertedAt"]);
    assert_eq!(after["name"], "Dune Messiah");
    assert_eq!(after["publisher"], "");
    assert_eq!(after["reading"], false);
    assert_eq!(after["finished"], true);
}

#[tokio::test]
async fn test_update_invalid_payload() {
    let app = app();
    let id = create(&app, dune()).await;
    let uri = format!("/books/{}", id);

    let (status, body) = send(&app, Method::PUT, &uri, Some(json!({ "name": "" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Failed to update book. Please provide the book name");

    let (status, body) = send(
        &app,
        Method::PUT,
        &uri,
        Some(json!({ "name": "X", "pageCount": 1, "readPage": 2 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["message"],
        "Failed to update book. readPage must not be greater than pageCount"
    );

    let (_, body) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(body["data"]["book"]["name"], "Dune");
}

#[tokio::test]
async fn test_update_unknown_book() {
    let app = app();

    let (status, body) = send(&app, Method::PUT, "/books/unknown", Some(dune())).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(
        body,
        json!({ "status": "fail", "message": "Failed to update book. Id not found" })
    );
}

#[tokio::test]
async fn test_delete_book() {
    let app = app();
    let keep = create(&app, dune()).await;
    let id = create(&app, json!({ "name": "Hyperion" })).await;
    let uri = format!("/books/{}", id);

    let (status, body) = send(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "success", "message": "Book deleted successfully" }));

    assert_eq!(list_ids(&app, "/books").await, [keep]);

    let (status, body) = send(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(
        body,
        json!({ "status": "fail", "message": "Failed to delete book. Id not found" })
    );
}

#[tokio::test]
async fn test_list_repeated_query_keys() {
    let app = app();
    let reading = create(&app, dune()).await;
    create(&app, json!({ "name": "Hyperion" })).await;

    let (status, body) = send(&app, Method::GET, "/books?reading=1&reading=0", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");
    assert_eq!(body["data"]["books"].as_array().map(Vec::len), Some(1));
    assert_eq!(body["data"]["books"][0]["id"], reading.as_str());

    assert_eq!(list_ids(&app, "/books?page=2&name=%FF").await.len(), 0);
}

#[tokio::test]
async fn test_invalid_path_id() {
    let app = app();

    for method in [Method::GET, Method::DELETE] {
        let (status, body) = send(&app, method, "/books/%FF", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["status"], "fail");
        assert!(body["message"].is_string());
        assert!(body.get("data").is_none());
    }

    let (status, body) = send(&app, Method::PUT, "/books/%FF", Some(dune())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], "fail");
}

#[tokio::test]
async fn test_preseeded_store() {
    let mut store = BookStore::new();
    let payload = BookPayload {
        name: Some("Seeded".to_string()),
        page_count: 5,
        read_page: 5,
        ..Default::default()
    };
    let id = create_book(&mut store, payload).expect("Failed to seed book").book_id;

    let state = AppState::with_repository(AppConfig::default(), Repository::with_store(store));
    let app = api::create_router(state);

    let (status, body) = send(&app, Method::GET, &format!("/books/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["book"]["name"], "Seeded");
    assert_eq!(body["data"]["book"]["finished"], true);
    assert_eq!(list_ids(&app, "/books?finished=1").await, [id]);
}

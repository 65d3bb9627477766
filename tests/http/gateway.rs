use std::time::Duration;

use axum::routing::get;
use axum::Router;
use book_catalog::{
    Book, CatalogGateway, FailureReason, GatewayConfig, GatewayOperation, HttpGateway,
    InMemoryGateway,
};
use serde_json::json;

use crate::support::{dune, emma, http_gateway, start_garbage_server, start_router, start_server};

#[tokio::test]
async fn list_returns_server_books() {
    let base = start_server(InMemoryGateway::with_books(vec![dune(), emma()])).await;
    let books = http_gateway(&base).list().await.unwrap();
    assert_eq!(books, vec![dune(), emma()]);
}

#[tokio::test]
async fn create_returns_assigned_id() {
    let backend = InMemoryGateway::with_books(vec![dune()]);
    let base = start_server(backend.clone()).await;

    let created = http_gateway(&base)
        .create(&Book::new("Emma", "Austen", 1815))
        .await
        .unwrap();

    assert_eq!(created, emma());
    assert_eq!(backend.snapshot(), vec![dune(), emma()]);
}

#[tokio::test]
async fn update_and_delete_by_id() {
    let backend = InMemoryGateway::with_books(vec![dune(), emma()]);
    let base = start_server(backend.clone()).await;
    let gateway = http_gateway(&base);

    let revised = Book::new("Emma", "Jane Austen", 1815).with_id(2);
    assert_eq!(gateway.update(2, &revised).await.unwrap(), revised);

    gateway.delete(1).await.unwrap();
    assert_eq!(backend.snapshot(), vec![revised]);
}

#[tokio::test]
async fn unknown_id_is_a_404_failure() {
    let base = start_server(InMemoryGateway::new()).await;
    let gateway = http_gateway(&base);

    let err = gateway.delete(42).await.unwrap_err();
    assert_eq!(err.operation, GatewayOperation::Delete);
    assert!(err.is_not_found());

    let err = gateway.update(42, &dune()).await.unwrap_err();
    assert_eq!(err.operation, GatewayOperation::Update);
    assert!(err.is_not_found());
}

#[tokio::test]
async fn backend_failure_surfaces_as_502() {
    let backend = InMemoryGateway::new();
    backend.fail_next(GatewayOperation::List);
    let base = start_server(backend).await;

    let err = http_gateway(&base).list().await.unwrap_err();
    assert_eq!(err.status_code(), Some(502));
}

#[tokio::test]
async fn non_json_body_is_a_decode_failure() {
    let base = start_garbage_server().await;
    let err = http_gateway(&base).list().await.unwrap_err();
    assert!(matches!(err.reason, FailureReason::Decode(_)));
}

#[tokio::test]
async fn slow_service_trips_configured_timeout() {
    let app = Router::new().route(
        "/books",
        get(|| async {
            tokio::time::sleep(Duration::from_millis(500)).await;
            "[]"
        }),
    );
    let base = start_router(app).await;
    let gateway = HttpGateway::new(&GatewayConfig {
        base_url: base,
        timeout_ms: Some(50),
    })
    .unwrap();

    let err = gateway.list().await.unwrap_err();
    assert!(matches!(err.reason, FailureReason::Transport(_)));
}

#[tokio::test]
async fn wire_format_matches_rest_contract() {
    let base = start_server(InMemoryGateway::new()).await;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("{base}/books"))
        .json(&json!({ "title": "Dune", "author": "Herbert", "year": 1965 }))
        .send()
        .await
        .unwrap();
    assert!(resp.status().is_success());
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(
        body,
        json!({ "id": 1, "title": "Dune", "author": "Herbert", "year": 1965 })
    );

    let resp = client
        .put(format!("{base}/books/1"))
        .json(&json!({ "id": 1, "title": "Dune", "author": "Frank Herbert", "year": 1965 }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let resp = client.get(format!("{base}/books")).send().await.unwrap();
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(
        body,
        json!([{ "id": 1, "title": "Dune", "author": "Frank Herbert", "year": 1965 }])
    );

    let resp = client.delete(format!("{base}/books/1")).send().await.unwrap();
    assert!(resp.status().is_success());

    let resp = client.delete(format!("{base}/books/1")).send().await.unwrap();
    assert_eq!(resp.status(), 404);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().contains("404"));
}

#[tokio::test]
async fn health_reports_book_count() {
    let base = start_server(InMemoryGateway::with_books(vec![dune(), emma()])).await;
    let resp = reqwest::get(format!("{base}/health")).await.unwrap();
    assert_eq!(resp.status(), 200);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body, json!({ "ok": true, "books": 2 }));
}

//! Login rate limiting across the three account kinds.

mod common;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
};
use common::{TestApp, TestResponse};
use foodhub_testing::create_test_vendor;
use serde_json::{json, Value};
use std::time::Duration;

fn login(path: &str, client: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(path)
        .header(header::CONTENT_TYPE, "application/json")
        .header("x-forwarded-for", client)
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn bad_login(app: &TestApp, path: &str, client: &str) -> TestResponse {
    app.send(login(
        path,
        client,
        json!({ "email": "nobody@example.com", "password": "wrong" }),
    ))
    .await
}

const CLIENT: &str = "198.51.100.20";

#[tokio::test(start_paused = true)]
async fn test_sixth_failed_login_is_rejected() {
    let app = TestApp::new();
    let vendor = create_test_vendor();
    app.stores.vendors.seed(vendor.clone());

    for _ in 0..5 {
        let resp = bad_login(&app, "/vendor/login", CLIENT).await;
        assert_eq!(resp.status, StatusCode::UNAUTHORIZED);
    }

    let resp = app
        .send(login(
            "/vendor/login",
            CLIENT,
            json!({ "email": vendor.email, "password": "password123" }),
        ))
        .await;
    assert_eq!(resp.status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(resp.body["ok"], false);
    assert_eq!(resp.body["kind"], "RATE_LIMIT_EXCEEDED");
    assert_eq!(resp.headers[header::RETRY_AFTER], "120");
    assert_eq!(resp.headers["ratelimit-remaining"], "0");
}

#[tokio::test(start_paused = true)]
async fn test_successful_logins_are_not_counted() {
    let app = TestApp::new();
    let vendor = create_test_vendor();
    app.stores.vendors.seed(vendor.clone());
    let good = json!({ "email": vendor.email, "password": "password123" });

    for _ in 0..10 {
        let resp = app.send(login("/vendor/login", CLIENT, good.clone())).await;
        assert_eq!(resp.status, StatusCode::OK);
        assert_eq!(resp.headers["ratelimit-remaining"], "5");
    }

    let resp = bad_login(&app, "/vendor/login", CLIENT).await;
    assert_eq!(resp.headers["ratelimit-remaining"], "4");
}

#[tokio::test(start_paused = true)]
async fn test_window_resets() {
    let app = TestApp::new();
    for _ in 0..5 {
        bad_login(&app, "/customer/login", CLIENT).await;
    }
    assert_eq!(
        bad_login(&app, "/customer/login", CLIENT).await.status,
        StatusCode::TOO_MANY_REQUESTS
    );

    tokio::time::advance(Duration::from_secs(60)).await;
    let resp = bad_login(&app, "/customer/login", CLIENT).await;
    assert_eq!(resp.status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(resp.headers[header::RETRY_AFTER], "60");

    tokio::time::advance(Duration::from_secs(61)).await;
    assert_eq!(
        bad_login(&app, "/customer/login", CLIENT).await.status,
        StatusCode::UNAUTHORIZED
    );
}

#[tokio::test(start_paused = true)]
async fn test_limit_is_shared_across_login_routes() {
    let app = TestApp::new();
    for path in ["/vendor/login", "/customer/login", "/delivery/login"] {
        bad_login(&app, path, CLIENT).await;
    }
    bad_login(&app, "/vendor/login", CLIENT).await;
    bad_login(&app, "/customer/login", CLIENT).await;

    let resp = bad_login(&app, "/delivery/login", CLIENT).await;
    assert_eq!(resp.status, StatusCode::TOO_MANY_REQUESTS);
}

#[tokio::test(start_paused = true)]
async fn test_clients_are_limited_independently() {
    let app = TestApp::new();
    for _ in 0..6 {
        bad_login(&app, "/vendor/login", CLIENT).await;
    }

    let resp = bad_login(&app, "/vendor/login", "198.51.100.21").await;
    assert_eq!(resp.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test(start_paused = true)]
async fn test_other_routes_are_not_limited() {
    let app = TestApp::new();
    for _ in 0..6 {
        bad_login(&app, "/vendor/login", CLIENT).await;
    }

    let resp = app
        .send(
            Request::builder()
                .uri("/health")
                .header("x-forwarded-for", CLIENT)
                .body(Body::empty())
                .unwrap(),
        )
        .await;
    assert_eq!(resp.status, StatusCode::OK);
    assert!(!resp.headers.contains_key("ratelimit-limit"));
}

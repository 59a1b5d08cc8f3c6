//! Shared harness: the full router over in-memory stores.

#![allow(dead_code)]

use axum::{
    body::{to_bytes, Body},
    http::{header, HeaderMap, Method, Request, StatusCode},
    Router,
};
use foodhub_api_rest::{create_app, AppState, Backends};
use foodhub_common::{AppConfig, Identity, TokenService};
use foodhub_domain::Role;
use foodhub_testing::{MockHealthProbe, MockImageStore, MockStores, PlainPasswordHasher};
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

pub const ADMIN_KEY: &str = "development-admin-key";

/// Router plus handles to everything behind it
pub struct TestApp {
    pub app: Router,
    pub stores: MockStores,
    pub covers: MockImageStore,
    pub uploads: MockImageStore,
    pub health: MockHealthProbe,
    pub tokens: TokenService,
}

/// Status, headers and parsed JSON body of a response
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_config(AppConfig::development())
    }

    pub fn with_config(config: AppConfig) -> Self {
        let stores = MockStores::new();
        let covers = MockImageStore::new();
        let uploads = MockImageStore::new();
        let health = MockHealthProbe::default();
        let tokens = TokenService::new(&config.auth.jwt_secret, config.token_expiry());

        let backends = Backends {
            repositories: stores.repositories(),
            cover_images: Arc::new(covers.clone()),
            uploads: Arc::new(uploads.clone()),
            hasher: Arc::new(PlainPasswordHasher),
            health: Arc::new(health.clone()),
        };

        Self {
            app: create_app(AppState::new(config, backends)),
            stores,
            covers,
            uploads,
            health,
            tokens,
        }
    }

    /// Bearer token for `id` in `role`
    pub fn token(&self, id: impl ToString, role: Role) -> String {
        self.tokens
            .issue(&Identity {
                id: id.to_string(),
                email: "caller@example.com".to_string(),
                name: "caller".to_string(),
                role,
            })
            .unwrap()
    }

    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        TestResponse {
            status,
            headers,
            body,
        }
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> TestResponse {
        self.send(request(Method::GET, uri, token, None)).await
    }

    pub async fn json(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Value,
    ) -> TestResponse {
        self.send(request(method, uri, token, Some(body))).await
    }
}

pub fn request(method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

const BOUNDARY: &str = "foodhub-test-boundary";

/// Multipart request carrying `files` under `field`
pub fn multipart(
    method: Method,
    uri: &str,
    token: Option<&str>,
    field: &str,
    files: &[(&str, &[u8])],
) -> Request<Body> {
    let mut body = Vec::new();
    for (name, bytes) in files {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"{name}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        );
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::from(body)).unwrap()
}

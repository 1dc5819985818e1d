#![allow(dead_code)]

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use serde_json::Value;
use shared::config::{AppConfig, Config, DatabaseConfig, WebhookConfig};
use sms_inbox_ws::{create_app_router, state::AppState, webhook::sign};
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;

pub const SECRET: &str = "testsecret";

pub struct TestApp {
    pub router: Router,
    pub state: Arc<AppState>,
    _dir: TempDir,
}

pub async fn spawn_app(secret: Option<&str>) -> TestApp {
    let dir = TempDir::new().expect("tempdir");
    let config = Config {
        database: DatabaseConfig {
            url: format!("sqlite://{}", dir.path().join("data").join("app.db").display()),
            ..DatabaseConfig::default()
        },
        webhook: WebhookConfig {
            secret: secret.map(str::to_string),
        },
        app: AppConfig::default(),
    };

    let state = Arc::new(AppState::new(config).await.expect("app state"));
    TestApp {
        router: create_app_router(state.clone()),
        state,
        _dir: dir,
    }
}

impl TestApp {
    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let (status, _, body) = self.send_raw(request).await;
        let json = serde_json::from_slice(&body).unwrap_or(Value::Null);
        (status, json)
    }

    pub async fn send_raw(
        &self,
        request: Request<Body>,
    ) -> (StatusCode, axum::http::HeaderMap, Vec<u8>) {
        let response = self.router.clone().oneshot(request).await.expect("response");
        let status = response.status();
        let headers = response.headers().clone();
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body")
            .to_vec();
        (status, headers, body)
    }

    /// Signs `body` with the test secret and posts it.
    pub async fn post_signed(&self, body: &str) -> (StatusCode, Value) {
        let signature = sign(SECRET.as_bytes(), body.as_bytes()).unwrap();
        self.send(webhook_request(body, Some(&signature))).await
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Request::get(uri).body(Body::empty()).unwrap()).await
    }
}

pub fn webhook_request(body: &str, signature: Option<&str>) -> Request<Body> {
    let mut builder = Request::post("/webhook").header("content-type", "application/json");
    if let Some(signature) = signature {
        builder = builder.header("X-Signature", signature);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

pub fn message_json(id: &str, from: &str, ts: &str, text: Option<&str>) -> String {
    let mut payload = serde_json::json!({
        "message_id": id,
        "from": from,
        "to": "+14155550100",
        "ts": ts,
    });
    if let Some(text) = text {
        payload["text"] = Value::String(text.to_string());
    }
    payload.to_string()
}

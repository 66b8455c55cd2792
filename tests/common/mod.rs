#![allow(dead_code)]

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use jsonwebtoken::{EncodingKey, Header, encode};
use reqwest::Client;
use serde_json::json;
use tempfile::TempDir;
use vetta_api::AppState;
use vetta_api::config::{CreatorSearchMode, Settings};

pub const TEST_SECRET: &str = "test-secret";
pub const TEST_ISSUER: &str = "vetta_auth";

/// A server bound to an ephemeral port, backed by a throwaway SQLite file.
pub struct TestApp {
    pub base: String,
    pub state: Arc<AppState>,
    _dir: TempDir,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base)
    }

    pub fn ws_url(&self, path: &str) -> String {
        self.url(path).replace("http://", "ws://")
    }
}

pub fn test_settings(dir: &TempDir) -> Settings {
    Settings {
        database_path: dir.path().join("vetta.db").to_string_lossy().into_owned(),
        migrations_dir: concat!(env!("CARGO_MANIFEST_DIR"), "/migrations/sqlite").into(),
        jwt_secret_key: TEST_SECRET.into(),
        jwt_issuer: TEST_ISSUER.into(),
        creator_search_mode: CreatorSearchMode::Mock,
        mock_latency_ms: 0,
        search_debounce_ms: 300,
        log_format: "text".into(),
        ..Settings::default()
    }
}

pub async fn spawn_app() -> TestApp {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let state = vetta_api::build_state(test_settings(&dir))
        .await
        .expect("Failed to build app state");
    let app = vetta_api::build_router(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    TestApp {
        base: format!("http://{addr}"),
        state,
        _dir: dir,
    }
}

/// Build a reusable HTTP client.
pub fn http_client() -> Client {
    Client::builder()
        .timeout(std::time::Duration::from_secs(30))
        .build()
        .expect("Failed to build HTTP client")
}

fn now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs()
}

pub fn encode_jwt(payload: &serde_json::Value, secret: &str) -> String {
    encode(
        &Header::default(),
        payload,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .unwrap()
}

/// Generate a test JWT token for the given user_id.
pub fn generate_test_token(user_id: &str) -> String {
    let now = now();
    encode_jwt(
        &json!({"sub": user_id, "iss": TEST_ISSUER, "iat": now, "exp": now + 3600}),
        TEST_SECRET,
    )
}

/// Generate an expired JWT token.
pub fn generate_expired_token(user_id: &str) -> String {
    let now = now();
    encode_jwt(
        &json!({
            "sub": user_id,
            "iss": TEST_ISSUER,
            "iat": now.saturating_sub(7200),
            "exp": now.saturating_sub(3600),
        }),
        TEST_SECRET,
    )
}

/// Return `Authorization: Bearer <token>` header value.
pub fn auth_header(user_id: &str) -> String {
    format!("Bearer {}", generate_test_token(user_id))
}

/// Add an influencer through the API and return the created row.
pub async fn create_influencer(
    client: &Client,
    app: &TestApp,
    body: serde_json::Value,
) -> serde_json::Value {
    let resp = client
        .post(app.url("/api/v1/influencers"))
        .header("Authorization", auth_header("test_user"))
        .json(&body)
        .send()
        .await
        .expect("Failed to create influencer");
    assert_eq!(resp.status(), 201);
    resp.json().await.unwrap()
}

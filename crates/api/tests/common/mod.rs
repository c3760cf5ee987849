#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::body::Body;
use axum::http::{header, Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use kittie_api::app::build_app;
use kittie_api::auth::jwt::issue_token;
use kittie_api::config::{ServerConfig, SupabaseConfig};
use kittie_api::state::AppState;
use kittie_api::storage::{ObjectStorage, StorageError};
use kittie_core::plan::PlanTier;
use kittie_db::repositories::ProfileRepo;
use sqlx::PgPool;
use tower::ServiceExt;
use uuid::Uuid;

pub const JWT_SECRET: &str = "test-secret-that-is-long-enough-for-hmac";
pub const WEBHOOK_SECRET: &str = "whsec_test";
pub const BASE_URL: &str = "https://kits.example.com";

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        public_base_url: BASE_URL.to_string(),
        max_upload_bytes: 8 * 1024 * 1024,
        billing_webhook_secret: WEBHOOK_SECRET.to_string(),
        supabase: SupabaseConfig {
            url: "https://test.supabase.co".to_string(),
            anon_key: "anon".to_string(),
            service_role_key: "service".to_string(),
            jwt_secret: JWT_SECRET.to_string(),
            storage_bucket: "kit-assets".to_string(),
        },
    }
}

/// In-memory object storage double.
#[derive(Default)]
pub struct MemoryStorage {
    objects: Mutex<HashMap<String, (Vec<u8>, String)>>,
}

impl MemoryStorage {
    pub fn contains(&self, path: &str) -> bool {
        self.objects.lock().unwrap().contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.objects.lock().unwrap().len()
    }

    pub fn content_type(&self, path: &str) -> Option<String> {
        self.objects
            .lock()
            .unwrap()
            .get(path)
            .map(|(_, ct)| ct.clone())
    }
}

#[async_trait::async_trait]
impl ObjectStorage for MemoryStorage {
    async fn put(
        &self,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<(), StorageError> {
        self.objects
            .lock()
            .unwrap()
            .insert(path.to_string(), (bytes, content_type.to_string()));
        Ok(())
    }

    async fn delete(&self, paths: &[String]) -> Result<(), StorageError> {
        let mut objects = self.objects.lock().unwrap();
        for path in paths {
            objects.remove(path);
        }
        Ok(())
    }

    fn public_url(&self, path: &str) -> String {
        format!("https://cdn.test/{path}")
    }
}

/// Build the full application router, exactly as production assembles it,
/// over the given pool and storage double.
pub fn build_test_app_with_storage(pool: PgPool, storage: Arc<MemoryStorage>) -> Router {
    let state = AppState {
        pool,
        config: Arc::new(test_config()),
        storage,
    };
    build_app(state)
}

pub fn build_test_app(pool: PgPool) -> Router {
    build_test_app_with_storage(pool, Arc::new(MemoryStorage::default()))
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

/// A signed-in user: id plus a valid bearer token.
pub struct TestUser {
    pub id: Uuid,
    pub token: String,
}

pub fn new_user() -> TestUser {
    let id = Uuid::new_v4();
    let token = issue_token(id, Some("owner@example.com"), JWT_SECRET, 3600).unwrap();
    TestUser { id, token }
}

/// Create the user's profile on the given plan.
pub async fn user_on_plan(pool: &PgPool, plan: PlanTier) -> TestUser {
    let user = new_user();
    ProfileRepo::ensure(pool, user.id, None).await.unwrap();
    ProfileRepo::set_plan(pool, user.id, plan).await.unwrap();
    user
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

pub async fn send(
    app: Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(&json).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::GET, uri, Some(token), None).await
}

pub async fn get_public(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None, None).await
}

pub async fn post_json(
    app: Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response<Body> {
    send(app, Method::POST, uri, Some(token), Some(body)).await
}

pub async fn patch_json(
    app: Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response<Body> {
    send(app, Method::PATCH, uri, Some(token), Some(body)).await
}

pub async fn put_json(
    app: Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response<Body> {
    send(app, Method::PUT, uri, Some(token), Some(body)).await
}

pub async fn delete(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::DELETE, uri, Some(token), None).await
}

/// POST a multipart form with one `file` part and optional text fields.
pub async fn post_file(
    app: Router,
    uri: &str,
    token: &str,
    filename: &str,
    content_type: &str,
    bytes: &[u8],
    fields: &[(&str, &str)],
) -> Response<Body> {
    let boundary = "kittie-test-boundary";
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{boundary}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    body.extend_from_slice(
        format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\n\
             Content-Type: {content_type}\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={boundary}"),
        )
        .body(Body::from(body))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

pub async fn body_text(response: Response<Body>) -> String {
    String::from_utf8(body_bytes(response).await).unwrap()
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// Create a kit through the API and return its JSON.
pub async fn create_kit(pool: &PgPool, user: &TestUser, name: &str) -> serde_json::Value {
    let app = build_test_app(pool.clone());
    let response = post_json(
        app,
        "/api/v1/kits",
        &user.token,
        serde_json::json!({ "name": name }),
    )
    .await;
    assert_eq!(response.status(), axum::http::StatusCode::CREATED);
    body_json(response).await
}

/// Id of the kit's first section of `kind`, read from the editor tree.
pub async fn section_id(pool: &PgPool, user: &TestUser, kit_id: i64, kind: &str) -> i64 {
    let app = build_test_app(pool.clone());
    let tree = body_json(get(app, &format!("/api/v1/kits/{kit_id}/editor"), &user.token).await).await;
    tree["sections"]
        .as_array()
        .unwrap()
        .iter()
        .find(|s| s["kind"] == kind)
        .unwrap()["id"]
        .as_i64()
        .unwrap()
}

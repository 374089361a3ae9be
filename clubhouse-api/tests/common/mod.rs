/// Shared helpers for API tests
///
/// Every test gets a fresh in-memory store, so nothing here needs a database.

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use chrono::Duration;
use clubhouse_api::{
    app::{build_router, AppState},
    config::{ApiConfig, Config, DatabaseConfig, FeedConfig, JwtConfig},
};
use clubhouse_shared::{
    auth::jwt::{create_token, Claims},
    models::NewUser,
    repository::{MemoryStore, UserRepository},
    services::Services,
};
use serde_json::Value;
use tower::ServiceExt;

pub const JWT_SECRET: &str = "test-secret-key-at-least-32-bytes-long";

pub struct TestApp {
    pub app: Router,
    pub store: Arc<MemoryStore>,
}

impl TestApp {
    pub fn new() -> Self {
        let store = Arc::new(MemoryStore::new());
        let services = Services::new(store.clone());
        let app = build_router(AppState::new(services, test_config()));
        Self { app, store }
    }

    /// Inserts a user directly and returns its id and a bearer token
    pub async fn user(&self, name: &str) -> (i64, String) {
        let user = self
            .store
            .insert_user(NewUser {
                password_hash: "not-a-real-hash".to_string(),
                social_id: format!("social-{}", name),
                email: format!("{}@example.com", name),
                name: name.to_string(),
                sex: false,
                phone: "010-0000-0000".to_string(),
            })
            .await
            .expect("Failed to insert user");

        (user.id(), token_for(user.id()))
    }

    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }

        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("Failed to build request");

        self.send(request).await
    }

    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self
            .app
            .clone()
            .oneshot(request)
            .await
            .expect("Router failed");

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Failed to read body");
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

        (status, json)
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.request(Method::GET, uri, token, None).await
    }

    pub async fn post(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.request(Method::POST, uri, token, Some(body)).await
    }

    pub async fn put(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.request(Method::PUT, uri, token, Some(body)).await
    }

    pub async fn delete(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.request(Method::DELETE, uri, token, None).await
    }

    /// Creates a club owned by the token's user and returns its id
    pub async fn club(&self, token: &str, name: &str) -> i64 {
        let (status, body) = self.post("/clubs", Some(token), club_body(name)).await;
        assert_eq!(status, StatusCode::CREATED, "club creation failed: {}", body);
        body["data"]["id"].as_i64().expect("club id")
    }

    pub async fn feed(&self, token: &str, club_id: i64, title: &str, is_private: bool) -> i64 {
        let (status, body) = self
            .post(
                &format!("/clubs/{}/feeds", club_id),
                Some(token),
                serde_json::json!({
                    "title": title,
                    "content": format!("{} body", title),
                    "is_private": is_private,
                }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "feed creation failed: {}", body);
        body["data"]["id"].as_i64().expect("feed id")
    }
}

pub fn test_config() -> Config {
    Config {
        api: ApiConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            cors_origins: vec!["*".to_string()],
        },
        database: DatabaseConfig {
            url: "postgresql://unused".to_string(),
            max_connections: 1,
        },
        jwt: JwtConfig {
            secret: JWT_SECRET.to_string(),
        },
        feeds: FeedConfig { page_limit: 20 },
    }
}

pub fn token_for(user_id: i64) -> String {
    create_token(&Claims::new(user_id), JWT_SECRET).expect("Failed to create token")
}

pub fn expired_token_for(user_id: i64) -> String {
    create_token(
        &Claims::with_expiration(user_id, Duration::seconds(-3600)),
        JWT_SECRET,
    )
    .expect("Failed to create token")
}

pub fn club_body(name: &str) -> Value {
    serde_json::json!({
        "name": name,
        "description": "weekend trips",
        "capacity": 20,
        "sex": true,
        "minimum_age": 20,
        "maximum_age": 40,
    })
}

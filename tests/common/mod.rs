#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::{Router, body::Body, http::Request, response::Response};
use http_body_util::BodyExt;
use jsonwebtoken::Algorithm;
use serde_json::Value;
use tower::ServiceExt;

use content_api_service::domain::repositories::{PostRepository, UserRepository};
use content_api_service::infrastructure::http::create_app_with_limiter;
use content_api_service::infrastructure::persistence::{
    InMemoryPostRepository, InMemoryUserRepository,
};
use content_api_service::presentation::handlers::AppState;
use content_api_service::presentation::middleware::{RateLimitConfig, RateLimiter, TokenCodec};

pub const TEST_SECRET: &str = "integration-test-secret";

pub struct TestApp {
    pub app: Router,
    pub users: Arc<InMemoryUserRepository>,
    pub posts: Arc<InMemoryPostRepository>,
    pub codec: TokenCodec,
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}

impl TestApp {
    /// Full application with an ample rate budget
    pub fn new() -> Self {
        Self::with_rate_limit(10_000)
    }

    pub fn with_rate_limit(max_requests: u32) -> Self {
        let users = Arc::new(InMemoryUserRepository::new());
        let posts = Arc::new(InMemoryPostRepository::new());
        let codec = TokenCodec::new(TEST_SECRET, Algorithm::HS256);

        let state = AppState::new(
            Arc::clone(&users) as Arc<dyn UserRepository>,
            Arc::clone(&posts) as Arc<dyn PostRepository>,
            codec.clone(),
            chrono::Duration::minutes(15),
        );
        let limiter = RateLimiter::new(RateLimitConfig {
            max_requests,
            window_duration: Duration::from_secs(60),
            ..RateLimitConfig::default()
        });

        Self { app: create_app_with_limiter(state, limiter), users, posts, codec }
    }

    pub async fn request(&self, request: Request<Body>) -> Response {
        self.app.clone().oneshot(request).await.unwrap()
    }

    pub async fn get(&self, uri: &str) -> Response {
        self.request(Request::builder().uri(uri).body(Body::empty()).unwrap()).await
    }

    pub async fn post_json(&self, uri: &str, body: &Value) -> Response {
        self.request(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
    }

    pub async fn put_json(&self, uri: &str, body: &Value) -> Response {
        self.request(
            Request::builder()
                .method("PUT")
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
    }

    pub async fn delete(&self, uri: &str) -> Response {
        self.request(Request::builder().method("DELETE").uri(uri).body(Body::empty()).unwrap())
            .await
    }

    pub async fn post_form(&self, uri: &str, body: &str) -> Response {
        self.request(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("content-type", "application/x-www-form-urlencoded")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
    }

    pub async fn post_authed(&self, uri: &str, token: &str) -> Response {
        self.request(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("authorization", format!("Bearer {token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
    }

    pub async fn get_authed(&self, uri: &str, token: &str) -> Response {
        self.request(
            Request::builder()
                .uri(uri)
                .header("authorization", format!("Bearer {token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
    }

    /// Register an account through the API and return its id
    pub async fn register_user(&self, username: &str, password: &str) -> String {
        let response = self
            .post_json(
                "/user",
                &serde_json::json!({
                    "username": username,
                    "password": password,
                    "email": format!("{username}@example.com"),
                    "name": format!("{username} name"),
                }),
            )
            .await;
        assert_eq!(response.status(), axum::http::StatusCode::CREATED);
        json_body(response).await["id"].as_str().unwrap().to_string()
    }

    /// Look up a stored account directly in the repository
    pub async fn find_user(&self, login: &str) -> content_api_service::domain::entities::User {
        self.users.find_by_login(login).await.unwrap().unwrap()
    }

    /// Register and log in, returning a live access token
    pub async fn login(&self, username: &str, password: &str) -> String {
        let response = self
            .post_form("/auth/login", &format!("username={username}&password={password}"))
            .await;
        assert_eq!(response.status(), axum::http::StatusCode::OK);
        json_body(response).await["access_token"].as_str().unwrap().to_string()
    }
}

pub async fn json_body(response: Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

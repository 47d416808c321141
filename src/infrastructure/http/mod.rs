use axum::{
    Json, Router,
    http::{Method, StatusCode, header},
    middleware::{from_fn, from_fn_with_state},
};
use serde_json::{Value, json};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer,
    request_id::{MakeRequestUuid, SetRequestIdLayer},
    trace::TraceLayer,
};
use tracing::{info, warn};

use crate::domain::repositories::{PostRepository, UserRepository};
use crate::infrastructure::config::AppConfig;
use crate::infrastructure::persistence::{
    Database, InMemoryPostRepository, InMemoryUserRepository, PostgresPostRepository,
    PostgresUserRepository,
};
use crate::presentation::handlers::AppState;
use crate::presentation::middleware::{
    RateLimitConfig, RateLimiter, TokenCodec, process_time_middleware, rate_limit_middleware,
};
use crate::presentation::routes;

/// Create the main application router
pub fn create_app(config: &AppConfig, state: AppState) -> Router {
    let limiter = RateLimiter::new(RateLimitConfig {
        max_requests: config.rate_limit.max_requests,
        window_duration: config.rate_limit.window_duration(),
        trust_forwarded_headers: config.rate_limit.trust_forwarded_headers,
        ..RateLimitConfig::default()
    });

    create_app_with_limiter(state, limiter)
}

/// Assemble the middleware pipeline around the routes
///
/// Stage order is deliberate: the rate-limit gate sits outermost so abusive
/// traffic is rejected before any timing or authentication work is spent;
/// the timer wraps everything that remains; the session gate is applied per
/// route inside the router itself.
pub fn create_app_with_limiter(state: AppState, limiter: RateLimiter) -> Router {
    let middleware_stack = ServiceBuilder::new()
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(TraceLayer::new_for_http())
        .layer(create_cors_layer())
        .layer(from_fn_with_state(limiter, rate_limit_middleware))
        .layer(from_fn(process_time_middleware));

    // The fallback is registered before the stack so unmatched paths still
    // pass the gate and the timer
    Router::new()
        .merge(routes::create_routes(state))
        .fallback(not_found_handler)
        .layer(middleware_stack)
}

/// Health check endpoint for liveness probes
pub async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "service": "content-api-service"
    }))
}

/// Handler for 404 not found
async fn not_found_handler() -> (StatusCode, Json<Value>) {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "status": 404,
            "message": "The requested resource was not found"
        })),
    )
}

/// Create CORS layer with appropriate settings
fn create_cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
        .max_age(Duration::from_secs(3600))
}

/// Start the HTTP server
///
/// # Errors
/// Returns an error if the server fails to start
pub async fn start_server(config: AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let codec = TokenCodec::new(&config.auth.secret_key, config.auth.signing_algorithm()?);

    // Degraded start: fall back to in-memory repositories when the database
    // is unreachable
    let (users, posts): (Arc<dyn UserRepository>, Arc<dyn PostRepository>) =
        match Database::new(&config.database).await {
            Ok(db) => (
                Arc::new(PostgresUserRepository::new(db.pool().clone())),
                Arc::new(PostgresPostRepository::new(db.pool().clone())),
            ),
            Err(e) => {
                warn!("Failed to connect to database: {}", e);
                info!("Starting server with in-memory repositories");
                (Arc::new(InMemoryUserRepository::new()), Arc::new(InMemoryPostRepository::new()))
            }
        };

    let state = AppState::new(users, posts, codec, config.auth.token_ttl());
    let app = create_app(&config, state);
    let addr = config.server.socket_addr();

    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>()).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::Request};
    use jsonwebtoken::Algorithm;
    use tower::ServiceExt;

    fn test_state() -> AppState {
        AppState::new(
            Arc::new(InMemoryUserRepository::new()),
            Arc::new(InMemoryPostRepository::new()),
            TokenCodec::new("test-secret-key", Algorithm::HS256),
            chrono::Duration::minutes(15),
        )
    }

    fn test_app(max_requests: u32) -> Router {
        let limiter = RateLimiter::new(RateLimitConfig {
            max_requests,
            window_duration: Duration::from_secs(60),
            ..RateLimitConfig::default()
        });
        create_app_with_limiter(test_state(), limiter)
    }

    #[tokio::test]
    async fn test_health_check_endpoint() {
        let response = health_check().await;
        let json_value = response.0;

        assert_eq!(json_value["status"], "healthy");
        assert_eq!(json_value["service"], "content-api-service");
        assert!(json_value.get("timestamp").is_some());
    }

    #[tokio::test]
    async fn test_admitted_responses_carry_pipeline_headers() {
        let app = test_app(60);
        let request = Request::builder().uri("/health").body(Body::empty()).unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let headers = response.headers();
        assert_eq!(headers.get("x-rate-limit-limit").unwrap(), "60");
        assert_eq!(headers.get("x-rate-limit-remaining").unwrap(), "59");
        assert!(headers.get("x-process-time").is_some());
        assert!(headers.get("x-request-id").is_some());
    }

    #[tokio::test]
    async fn test_denied_request_skips_timer() {
        let app = test_app(1);

        let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        // The gate sits outside the timer, so a denied request is rejected
        // before any timing work happens
        let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert!(response.headers().get("x-process-time").is_none());
        assert!(response.headers().get("x-rate-limit-remaining").is_none());
    }

    #[tokio::test]
    async fn test_not_found_fallback() {
        let app = test_app(60);
        let request =
            Request::builder().uri("/non-existent-route").body(Body::empty()).unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        // Error responses that pass the gate are still timed
        assert!(response.headers().get("x-process-time").is_some());
    }
}

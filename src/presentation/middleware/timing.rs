use axum::{extract::Request, http::HeaderValue, middleware::Next, response::Response};
use std::time::Instant;
use tracing::debug;

/// Response header carrying elapsed wall-clock seconds
pub const PROCESS_TIME_HEADER: &str = "x-process-time";

/// Wraps the remainder of the chain and records elapsed wall-clock time
///
/// The measurement is inclusive of everything downstream, including the
/// final handler, and is attached whether the delegate succeeded or
/// surfaced a structured failure.
pub async fn process_time_middleware(request: Request, next: Next) -> Response {
    let start = Instant::now();

    let mut response = next.run(request).await;

    let elapsed = start.elapsed().as_secs_f64();
    if let Ok(value) = HeaderValue::from_str(&elapsed.to_string()) {
        response.headers_mut().insert(PROCESS_TIME_HEADER, value);
    }
    debug!(elapsed_seconds = elapsed, "Request timed");

    response
}

//! Request-processing middleware pipeline
//!
//! Every inbound request passes the rate-limit gate first, then the request
//! timer; session authentication is applied per route as the innermost gate.

pub mod auth;
pub mod error;
pub mod rate_limit;
pub mod timing;

pub use auth::{IssuedToken, SessionClaims, TokenCodec, require_session};
pub use error::AppError;
pub use rate_limit::{RateLimitConfig, RateLimitDecision, RateLimiter, rate_limit_middleware};
pub use timing::{PROCESS_TIME_HEADER, process_time_middleware};

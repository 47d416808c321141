use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{debug, error, warn};

use super::error::AppError;

/// Default access-token lifetime when the caller does not specify one
const DEFAULT_TTL_MINUTES: i64 = 15;

/// Timestamp format used for the human-readable expiry in token payloads
const EXPIRES_ON_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Decoded payload of a session token
///
/// `subject` carries the user-safe profile data embedded at issuance; `exp`
/// is the unix-seconds expiry claim. Ephemeral: lives only for the duration
/// of request handling.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    pub exp: i64,
    #[serde(flatten)]
    pub subject: Map<String, Value>,
}

impl SessionClaims {
    /// Check if the expiry claim is in the past
    pub fn is_expired(&self) -> bool {
        self.exp < Utc::now().timestamp()
    }
}

/// Signed token handed to the client at login or refresh
///
/// The server keeps no record of issued tokens; sessions are stateless and
/// cannot be revoked before expiry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IssuedToken {
    pub access_token: String,
    pub token_type: String,
    pub expires_on: String,
}

/// Token processing errors; never leak past the codec boundary as raw
/// parse failures
#[derive(Error, Debug)]
pub enum TokenError {
    #[error("Token encoding error: {0}")]
    Encoding(String),

    #[error("Invalid token")]
    Invalid,
}

/// Encodes and decodes signed session tokens
///
/// Pure function of secret, algorithm, and input. `decode` verifies the
/// signature and claim structure but deliberately does not enforce expiry;
/// only `verify` does.
#[derive(Clone)]
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
    validation: Validation,
}

impl TokenCodec {
    pub fn new(secret: &str, algorithm: Algorithm) -> Self {
        let mut validation = Validation::new(algorithm);
        // Expiry is checked by verify(), not during decode
        validation.validate_exp = false;
        validation.set_required_spec_claims(&["exp"]);

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_ref()),
            decoding_key: DecodingKey::from_secret(secret.as_ref()),
            algorithm,
            validation,
        }
    }

    /// Sign the given subject fields with an expiry of `now + ttl`
    /// (15 minutes when unspecified)
    pub fn issue(
        &self,
        mut subject: Map<String, Value>,
        ttl: Option<Duration>,
    ) -> Result<IssuedToken, TokenError> {
        let ttl = ttl.unwrap_or_else(|| Duration::minutes(DEFAULT_TTL_MINUTES));
        let expires_at = Utc::now() + ttl;

        // The expiry claim is owned by the codec, not the caller
        subject.remove("exp");
        let claims = SessionClaims { exp: expires_at.timestamp(), subject };

        let access_token =
            encode(&Header::new(self.algorithm), &claims, &self.encoding_key).map_err(|e| {
                error!("Failed to encode session token: {}", e);
                TokenError::Encoding(e.to_string())
            })?;

        Ok(IssuedToken {
            access_token,
            token_type: "bearer".to_string(),
            expires_on: expires_at.format(EXPIRES_ON_FORMAT).to_string(),
        })
    }

    /// Decode a token, verifying the signature and required claims
    ///
    /// An expired but otherwise well-formed token still decodes; callers
    /// must treat failure as "unauthenticated", not as a fatal error.
    pub fn decode(&self, token: &str) -> Result<SessionClaims, TokenError> {
        decode::<SessionClaims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                debug!("Failed to decode session token: {}", e);
                TokenError::Invalid
            })
    }

    /// Decode and additionally check that the expiry is still in the future
    ///
    /// Returns false on any failure; never panics or propagates an error.
    pub fn verify(&self, token: &str) -> bool {
        self.decode(token).is_ok_and(|claims| !claims.is_expired())
    }
}

/// Session-authentication gate for protected routes
///
/// On success the decoded claims are attached to the request extensions for
/// downstream handlers (session data, refresh).
pub async fn require_session(
    State(codec): State<TokenCodec>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| AppError::Authentication {
            message: "Missing authorization credentials".to_string(),
        })?;

    // Scheme is checked before any token decoding is attempted
    let token = match header.split_once(' ') {
        Some(("Bearer", token)) => token.trim(),
        _ => {
            return Err(AppError::Authorization {
                message: "Invalid authentication scheme.".to_string(),
            });
        }
    };

    if !codec.verify(token) {
        warn!("Rejected session token");
        return Err(AppError::Authorization {
            message: "Invalid token or expired token.".to_string(),
        });
    }

    let claims = codec.decode(token).map_err(|_| AppError::Authorization {
        message: "Invalid token or expired token.".to_string(),
    })?;
    request.extensions_mut().insert(claims);

    Ok(next.run(request).await)
}

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::domain::value_objects::RecordStatus;

/// Mutable profile fields of an account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserMeta {
    pub name: String,
    #[serde(default)]
    pub image: Option<String>,
}

/// Registration payload for a new account
#[derive(Debug, Clone, Deserialize)]
pub struct NewUser {
    pub username: String,
    pub password: String,
    pub email: String,
    pub name: String,
    #[serde(default)]
    pub image: Option<String>,
}

/// Stored account record
///
/// `password` holds the hex digest of the raw password, never the raw
/// password itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub username: String,
    pub email: String,
    pub name: String,
    pub image: Option<String>,
    pub password: String,
    pub status: RecordStatus,
    pub created_at: i64,
    pub updated_at: Option<i64>,
}

impl User {
    #[must_use]
    pub fn register(new: NewUser) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            username: new.username,
            email: new.email,
            name: new.name,
            image: new.image,
            password: Self::hash_password(&new.password),
            status: RecordStatus::Active,
            created_at: now_millis(),
            updated_at: None,
        }
    }

    /// Hash a raw password into the stored digest form
    #[must_use]
    pub fn hash_password(raw: &str) -> String {
        hex::encode(Sha256::digest(raw.as_bytes()))
    }

    /// Compare a login attempt against the stored digest
    #[must_use]
    pub fn verify_password(&self, candidate: &str) -> bool {
        self.password == Self::hash_password(candidate)
    }

    /// Apply a profile update and bump `updated_at`
    pub fn apply(&mut self, meta: UserMeta) {
        self.name = meta.name;
        self.image = meta.image;
        self.updated_at = Some(now_millis());
    }

    /// User-safe projection embedded into session tokens and returned by
    /// read endpoints. Must never contain the password digest.
    #[must_use]
    pub fn safe_claims(&self) -> Map<String, Value> {
        let mut claims = Map::new();
        claims.insert("id".to_string(), json!(self.id));
        claims.insert("username".to_string(), json!(self.username));
        claims.insert("email".to_string(), json!(self.email));
        claims.insert("name".to_string(), json!(self.name));
        if let Some(image) = &self.image {
            claims.insert("image".to_string(), json!(image));
        }
        claims
    }
}

/// Current time as epoch milliseconds
#[must_use]
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user() -> User {
        User::register(NewUser {
            username: "jdoe".to_string(),
            password: "hunter2".to_string(),
            email: "jdoe@example.com".to_string(),
            name: "J. Doe".to_string(),
            image: None,
        })
    }

    #[test]
    fn test_register_hashes_password() {
        let user = sample_user();

        assert_ne!(user.password, "hunter2");
        assert_eq!(user.password.len(), 64); // sha256 hex digest
        assert!(user.verify_password("hunter2"));
        assert!(!user.verify_password("hunter3"));
    }

    #[test]
    fn test_register_assigns_identity_and_status() {
        let user = sample_user();

        assert!(uuid::Uuid::parse_str(&user.id).is_ok());
        assert_eq!(user.status, RecordStatus::Active);
        assert!(user.created_at > 0);
        assert!(user.updated_at.is_none());
    }

    #[test]
    fn test_safe_claims_excludes_password() {
        let user = sample_user();
        let claims = user.safe_claims();

        assert_eq!(claims["id"], json!(user.id));
        assert_eq!(claims["username"], json!("jdoe"));
        assert_eq!(claims["email"], json!("jdoe@example.com"));
        assert!(!claims.contains_key("password"));
        assert!(!claims.contains_key("image")); // omitted when unset
    }

    #[test]
    fn test_apply_updates_profile() {
        let mut user = sample_user();
        user.apply(UserMeta {
            name: "Jane Doe".to_string(),
            image: Some("https://example.com/avatar.png".to_string()),
        });

        assert_eq!(user.name, "Jane Doe");
        assert!(user.image.is_some());
        assert!(user.updated_at.is_some());
    }
}

use serde::{Deserialize, Serialize};

use crate::domain::entities::User;
use crate::domain::value_objects::RecordStatus;

/// Login form payload (username field accepts email or username)
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Pattern-match query against a single field
#[derive(Debug, Clone, Deserialize)]
pub struct SearchRequest {
    pub field: String,
    pub value: String,
}

/// Account projection safe to return to clients (no password digest)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserDto {
    pub id: String,
    pub username: String,
    pub email: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub status: RecordStatus,
}

impl From<&User> for UserDto {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            username: user.username.clone(),
            email: user.email.clone(),
            name: user.name.clone(),
            image: user.image.clone(),
            status: user.status,
        }
    }
}

impl From<User> for UserDto {
    fn from(user: User) -> Self {
        Self::from(&user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::NewUser;

    #[test]
    fn test_user_dto_drops_password() {
        let user = User::register(NewUser {
            username: "jdoe".to_string(),
            password: "secret".to_string(),
            email: "jdoe@example.com".to_string(),
            name: "J. Doe".to_string(),
            image: None,
        });

        let dto = UserDto::from(&user);
        let json = serde_json::to_value(&dto).unwrap();

        assert_eq!(json["username"], "jdoe");
        assert_eq!(json["status"], "active");
        assert!(json.get("password").is_none());
        assert!(json.get("image").is_none());
    }
}

mod repository;

pub use repository::*;

use serde::{Deserialize, Serialize};

/// User as saved on database.
///
/// `email` and `password` belong to the out-of-scope credential service and
/// are never serialized.
#[derive(
    Clone, Debug, Default, PartialEq, Serialize, Deserialize, sqlx::FromRow,
)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub username: String,
    #[serde(skip)]
    pub email: String,
    #[serde(skip)]
    pub password: String,
    pub full_name: Option<String>,
    pub bio: Option<String>,
    pub link: Option<String>,
    pub avatar: Option<String>,
    pub cover: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// Minimal public face of a [`User`], joined into posts, comments and
/// notifications.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicProfile {
    pub id: String,
    pub username: String,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub avatar: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_never_serializes_credentials() {
        let user = User {
            id: "admin".into(),
            username: "admin".into(),
            email: "admin@flock.test".into(),
            password: "$argon2id$stub".into(),
            ..Default::default()
        };

        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("argon2id"));
        assert!(!json.contains("flock.test"));
        assert!(!json.contains("password"));
        assert!(!json.contains("email"));
    }
}

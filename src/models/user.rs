use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A registered account, as stored and as returned by the API.
///
/// The bcrypt password hash lives only in the `users` table; it is never
/// selected into this struct, so no serialized form can include it.
#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i32,
    pub name: String,
    pub email: String,
    /// Updated on every successful login.
    pub last_login: DateTime<Utc>,
    /// Email-verification status. No current flow flips it.
    pub is_verified: bool,
    pub created_at: DateTime<Utc>,
}

/// Column list matching [`User`]; keeps the hash out of every SELECT.
pub const USER_COLUMNS: &str = "id, name, email, last_login, is_verified, created_at";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialized_user_has_no_password_fields() {
        let user = User {
            id: 1,
            name: "Test User".to_string(),
            email: "test@example.com".to_string(),
            last_login: Utc::now(),
            is_verified: false,
            created_at: Utc::now(),
        };

        let value = serde_json::to_value(&user).unwrap();
        let obj = value.as_object().unwrap();
        assert!(obj.get("password").is_none());
        assert!(obj.get("password_hash").is_none());
        assert_eq!(obj.get("email").and_then(|v| v.as_str()), Some("test@example.com"));
    }

    #[test]
    fn test_user_columns_matches_model() {
        // Every serialized field must appear in the SELECT list.
        for field in ["id", "name", "email", "last_login", "is_verified", "created_at"] {
            assert!(USER_COLUMNS.contains(field), "missing column {}", field);
        }
        assert!(!USER_COLUMNS.contains("password"));
    }
}

pub mod extractors;
pub mod middleware;
pub mod password;
pub mod token;

use crate::models::User;
use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use validator::Validate;

// Re-export necessary items
pub use extractors::AuthenticatedUserId;
pub use middleware::AuthMiddleware;
pub use password::{hash_password, verify_password};
pub use token::{generate_token, verify_token, Claims, SESSION_COOKIE};

lazy_static! {
    // Display names: anything printable, no control characters
    static ref NAME_REGEX: regex::Regex = regex::Regex::new(r"^[^\x00-\x1F\x7F]+$").unwrap();
}

/// Represents the payload for a user login request.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    /// User's email address.
    /// Must be a valid email format.
    #[validate(email)]
    pub email: String,
    /// User's password.
    /// Must be at least 6 characters long.
    #[validate(length(min = 6))]
    pub password: String,
}

/// Represents the payload for a new account signup request.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct SignupRequest {
    /// Display name for the new account.
    /// Must be between 1 and 80 printable characters.
    #[validate(
        length(min = 1, max = 80),
        regex(path = "NAME_REGEX", message = "Name must not contain control characters")
    )]
    pub name: String,
    /// Email address for the new account.
    /// Must be a valid email format.
    #[validate(email)]
    pub email: String,
    /// Password for the new account.
    /// Must be at least 6 characters long.
    #[validate(length(min = 6))]
    pub password: String,
}

/// Response body for a successful signup. The user's serialized form never
/// carries the password hash.
#[derive(Debug, Serialize, Deserialize)]
pub struct SignupResponse {
    pub user: User,
}

/// Response body for a successful login: the session token (also delivered
/// as an HTTP-only cookie) and the authenticated user.
#[derive(Debug, Serialize, Deserialize)]
pub struct AuthResponse {
    /// The JWT for session authentication.
    pub token: String,
    /// The authenticated user.
    pub user: User,
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[test]
    fn test_login_request_validation() {
        let valid_login = LoginRequest {
            email: "test@example.com".to_string(),
            password: "password123".to_string(),
        };
        assert!(valid_login.validate().is_ok());

        let invalid_email_login = LoginRequest {
            email: "testexample.com".to_string(),
            password: "password123".to_string(),
        };
        assert!(invalid_email_login.validate().is_err());

        let short_password_login = LoginRequest {
            email: "test@example.com".to_string(),
            password: "123".to_string(),
        };
        assert!(short_password_login.validate().is_err());
    }

    #[test]
    fn test_signup_request_validation() {
        let valid_signup = SignupRequest {
            name: "Ada Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            password: "password123".to_string(),
        };
        assert!(valid_signup.validate().is_ok());

        let empty_name = SignupRequest {
            name: "".to_string(),
            email: "ada@example.com".to_string(),
            password: "password123".to_string(),
        };
        assert!(empty_name.validate().is_err());

        let control_char_name = SignupRequest {
            name: "Ada\nLovelace".to_string(),
            email: "ada@example.com".to_string(),
            password: "password123".to_string(),
        };
        assert!(control_char_name.validate().is_err());

        let invalid_email = SignupRequest {
            name: "Ada Lovelace".to_string(),
            email: "not-an-email".to_string(),
            password: "password123".to_string(),
        };
        assert!(invalid_email.validate().is_err());

        let short_password = SignupRequest {
            name: "Ada Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            password: "short".to_string(),
        };
        assert!(short_password.validate().is_err());
    }
}

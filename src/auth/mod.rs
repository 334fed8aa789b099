pub mod extractors;
pub mod gate;
pub mod middleware;
pub mod password;
pub mod service;
pub mod token;

use lazy_static::lazy_static;
use serde::{Deserialize, Deserializer, Serialize};
use validator::{Validate, ValidationError};

use crate::models::{normalize_email, Role, User};

// Re-export necessary items
pub use extractors::AuthenticatedUser;
pub use gate::{authenticate, current_identity, require_role};
pub use middleware::AuthMiddleware;
pub use password::CredentialStore;
pub use token::{Claims, TokenService};

lazy_static! {
    // Display names: any printable text, no control characters
    static ref NAME_REGEX: regex::Regex = regex::Regex::new(r"^[^\p{Cc}]+$").unwrap();
}

fn validate_display_name(value: &str) -> Result<(), ValidationError> {
    if value.trim().chars().count() < 2 {
        let mut error = ValidationError::new("too_short");
        error.message = Some("Name must be at least 2 characters".into());
        return Err(error);
    }
    Ok(())
}

/// Emails are trimmed and lowercased before any validation sees them.
fn normalized_email<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    String::deserialize(deserializer).map(|email| normalize_email(&email))
}

/// The authenticated subject of a request, reconstructed from a verified token.
/// Read-only for the lifetime of the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Identity {
    pub user_id: i32,
    pub role: Role,
}

impl Identity {
    pub fn is_admin(&self) -> bool {
        matches!(self.role, Role::Admin)
    }
}

/// Represents the payload for a user login request.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[serde(deserialize_with = "normalized_email")]
    #[validate(email(message = "Invalid email address"), length(max = 255))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Represents the payload for a new user registration request.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Display name, at least 2 visible characters.
    #[validate(
        length(max = 100),
        custom = "validate_display_name",
        regex(path = "NAME_REGEX", message = "Name must not contain control characters")
    )]
    pub name: String,
    /// Stored as `VARCHAR(255)`.
    #[serde(deserialize_with = "normalized_email")]
    #[validate(email(message = "Invalid email address"), length(max = 255))]
    pub email: String,
    /// Must be at least 6 characters long.
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
    /// Requested role. Defaults to `user`; any registrant may ask for `admin`.
    pub role: Option<Role>,
}

/// Response structure after successful authentication (login or registration).
#[derive(Debug, Serialize, Deserialize)]
pub struct AuthResponse {
    pub user: User,
    /// The JWT for authenticating subsequent requests.
    pub token: String,
}

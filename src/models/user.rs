// src/models/user.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::models::blog::BlogSummary;

/// Represents the 'users' table in the database.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: String,

    /// Unique username.
    pub username: String,

    /// Optional display name.
    pub name: Option<String>,

    /// Argon2 password hash. Never leaves the database layer.
    pub password_hash: String,

    /// JSON-encoded ordered list of owned blog ids.
    /// Written only together with the matching blog row, in one transaction.
    pub blog_ids: String,
}

impl User {
    /// Decodes the stored owned-blog id list.
    pub fn decode_blog_ids(&self) -> Result<Vec<String>, serde_json::Error> {
        serde_json::from_str(&self.blog_ids)
    }

    /// Encodes an owned-blog id list for storage.
    pub fn encode_blog_ids(ids: &[String]) -> Result<String, serde_json::Error> {
        serde_json::to_string(ids)
    }
}

/// External representation of a user. The password hash is never part of it.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: String,
    pub username: String,
    pub name: Option<String>,
    /// Owned blogs, resolved through `blog_ids` at read time.
    pub blogs: Vec<BlogSummary>,
}

/// DTO for creating a new user (Registration).
///
/// The password is checked by hand in the handler so that absence and
/// short length report their own messages.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[serde(default)]
    #[validate(length(min = 3, message = "Username must be at least 3 characters long"))]
    pub username: String,

    pub name: Option<String>,

    pub password: Option<String>,
}

/// DTO for user login. Unknown fields fall through to a credential
/// mismatch rather than a shape error.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Represents the 'blogs' table in the database.
#[derive(Debug, Clone, FromRow)]
pub struct Blog {
    pub id: String,
    pub title: String,
    pub author: Option<String>,
    pub url: String,
    pub likes: i64,

    /// The creating user. Set once at creation, never reassigned.
    pub owner_id: String,
}

/// A blog row joined with its owner, as read back for responses.
#[derive(Debug, FromRow)]
pub struct BlogWithOwner {
    pub id: String,
    pub title: String,
    pub author: Option<String>,
    pub url: String,
    pub likes: i64,
    pub owner_id: String,
    pub owner_username: String,
    pub owner_name: Option<String>,
}

impl BlogWithOwner {
    pub fn into_response(self) -> BlogResponse {
        BlogResponse {
            id: self.id,
            title: self.title,
            author: self.author,
            url: self.url,
            likes: self.likes,
            user: BlogOwner {
                id: self.owner_id,
                username: self.owner_username,
                name: self.owner_name,
            },
        }
    }
}

/// Owner info attached to a blog for display (a read-time join).
#[derive(Debug, Serialize)]
pub struct BlogOwner {
    pub id: String,
    pub username: String,
    pub name: Option<String>,
}

/// External representation of a blog.
#[derive(Debug, Serialize)]
pub struct BlogResponse {
    pub id: String,
    pub title: String,
    pub author: Option<String>,
    pub url: String,
    pub likes: i64,
    pub user: BlogOwner,
}

/// Blog fields embedded in a user listing.
#[derive(Debug, Serialize)]
pub struct BlogSummary {
    pub id: String,
    pub title: String,
    pub author: Option<String>,
    pub url: String,
    pub likes: i64,
}

impl From<&Blog> for BlogSummary {
    fn from(blog: &Blog) -> Self {
        BlogSummary {
            id: blog.id.clone(),
            title: blog.title.clone(),
            author: blog.author.clone(),
            url: blog.url.clone(),
            likes: blog.likes,
        }
    }
}

/// DTO for creating a new blog. Title and url are required; their
/// absence is reported by the handler, not silently defaulted.
#[derive(Debug, Deserialize)]
pub struct CreateBlogRequest {
    pub title: Option<String>,
    pub author: Option<String>,
    pub url: Option<String>,
    pub likes: Option<i64>,
}

/// DTO for updating a blog. All fields optional; a payload with none of
/// them set is rejected.
#[derive(Debug, Deserialize)]
pub struct UpdateBlogRequest {
    pub title: Option<String>,
    pub author: Option<String>,
    pub url: Option<String>,
    pub likes: Option<i64>,
}

impl UpdateBlogRequest {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.author.is_none() && self.url.is_none() && self.likes.is_none()
    }
}

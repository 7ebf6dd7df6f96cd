// src/handlers/blogs.rs

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::{
    error::AppError,
    models::{
        blog::{Blog, BlogOwner, BlogResponse, BlogWithOwner, CreateBlogRequest, UpdateBlogRequest},
        user::User,
    },
    utils::jwt::Claims,
};

const SELECT_BLOG_WITH_OWNER: &str = r#"
    SELECT b.id, b.title, b.author, b.url, b.likes, b.owner_id,
           u.username AS owner_username, u.name AS owner_name
    FROM blogs b
    JOIN users u ON b.owner_id = u.id
"#;

/// Resolves the authenticated caller's claims to a user row.
///
/// A verified token whose subject no longer exists is reported the same
/// way as a bad token.
async fn current_user(pool: &SqlitePool, claims: &Claims) -> Result<User, AppError> {
    sqlx::query_as::<_, User>(
        "SELECT id, username, name, password_hash, blog_ids FROM users WHERE id = ?",
    )
    .bind(&claims.sub)
    .fetch_optional(pool)
    .await?
    .ok_or(AppError::AuthError("token invalid".to_string()))
}

/// A path parameter that is not a well-formed id is a 400, distinct
/// from a well-formed id with no matching blog (404).
fn check_blog_id(id: &str) -> Result<(), AppError> {
    Uuid::parse_str(id).map_err(|_| AppError::BadRequest("malformatted id".to_string()))?;
    Ok(())
}

fn decode_blog_ids(user: &User) -> Result<Vec<String>, AppError> {
    user.decode_blog_ids().map_err(|e| {
        AppError::InternalServerError(format!("corrupt blog list for user {}: {}", user.id, e))
    })
}

fn encode_blog_ids(ids: &[String]) -> Result<String, AppError> {
    User::encode_blog_ids(ids).map_err(|e| AppError::InternalServerError(e.to_string()))
}

/// List all blogs, each annotated with its owner's username and name.
pub async fn list_blogs(State(pool): State<SqlitePool>) -> Result<impl IntoResponse, AppError> {
    let blogs = sqlx::query_as::<_, BlogWithOwner>(SELECT_BLOG_WITH_OWNER)
        .fetch_all(&pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list blogs: {:?}", e);
            AppError::InternalServerError(e.to_string())
        })?;

    let responses: Vec<BlogResponse> = blogs.into_iter().map(BlogWithOwner::into_response).collect();

    Ok(Json(responses))
}

/// Get a single blog by ID.
pub async fn get_blog(
    State(pool): State<SqlitePool>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    check_blog_id(&id)?;

    let blog = fetch_blog_with_owner(&pool, &id)
        .await?
        .ok_or(AppError::NotFound("Blog not found.".to_string()))?;

    Ok(Json(blog.into_response()))
}

/// Create a new blog owned by the authenticated caller.
///
/// The blog row and the owner's `blog_ids` entry are written in one
/// transaction: a created blog whose owner does not list it can never
/// be observed.
pub async fn create_blog(
    State(pool): State<SqlitePool>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<CreateBlogRequest>,
) -> Result<impl IntoResponse, AppError> {
    let user = current_user(&pool, &claims).await?;

    let title = payload.title.filter(|t| !t.trim().is_empty());
    let url = payload.url.filter(|u| !u.trim().is_empty());
    let (title, url) = match (title, url) {
        (Some(title), Some(url)) => (title, url),
        (title, url) => {
            let mut missing = Vec::new();
            if title.is_none() {
                missing.push("Title is required");
            }
            if url.is_none() {
                missing.push("Url is required");
            }
            return Err(AppError::BadRequest(missing.join(", ")));
        }
    };

    let blog_id = Uuid::new_v4().to_string();
    let likes = payload.likes.unwrap_or(0);

    let mut blog_ids = decode_blog_ids(&user)?;
    blog_ids.push(blog_id.clone());
    let encoded = encode_blog_ids(&blog_ids)?;

    let mut tx = pool.begin().await?;

    sqlx::query(
        r#"
        INSERT INTO blogs (id, title, author, url, likes, owner_id)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&blog_id)
    .bind(&title)
    .bind(&payload.author)
    .bind(&url)
    .bind(likes)
    .bind(&user.id)
    .execute(&mut *tx)
    .await
    .map_err(|e| {
        tracing::error!("Failed to create blog: {:?}", e);
        AppError::InternalServerError(e.to_string())
    })?;

    sqlx::query("UPDATE users SET blog_ids = ? WHERE id = ?")
        .bind(&encoded)
        .bind(&user.id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    Ok((
        StatusCode::CREATED,
        Json(BlogResponse {
            id: blog_id,
            title,
            author: payload.author,
            url,
            likes,
            user: BlogOwner {
                id: user.id,
                username: user.username,
                name: user.name,
            },
        }),
    ))
}

/// Update a blog's fields by ID.
///
/// Not ownership-gated: any caller may update any blog. The owner
/// reference is not among the updatable fields.
pub async fn update_blog(
    State(pool): State<SqlitePool>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateBlogRequest>,
) -> Result<impl IntoResponse, AppError> {
    check_blog_id(&id)?;

    if payload.is_empty() {
        return Err(AppError::BadRequest("Blog data is required".to_string()));
    }

    let blog = sqlx::query_as::<_, Blog>(
        "SELECT id, title, author, url, likes, owner_id FROM blogs WHERE id = ?",
    )
    .bind(&id)
    .fetch_optional(&pool)
    .await?
    .ok_or(AppError::NotFound("Blog not found.".to_string()))?;

    let title = payload.title.unwrap_or(blog.title);
    let author = payload.author.or(blog.author);
    let url = payload.url.unwrap_or(blog.url);
    let likes = payload.likes.unwrap_or(blog.likes);

    sqlx::query("UPDATE blogs SET title = ?, author = ?, url = ?, likes = ? WHERE id = ?")
        .bind(&title)
        .bind(&author)
        .bind(&url)
        .bind(likes)
        .bind(&id)
        .execute(&pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to update blog: {:?}", e);
            AppError::InternalServerError(e.to_string())
        })?;

    let updated = fetch_blog_with_owner(&pool, &id)
        .await?
        .ok_or(AppError::NotFound("Blog not found.".to_string()))?;

    Ok(Json(updated.into_response()))
}

/// Delete a blog.
/// Requires: Login + ownership. There is no admin override.
///
/// The blog row and the owner's `blog_ids` entry are removed in one
/// transaction, mirroring creation.
pub async fn delete_blog(
    State(pool): State<SqlitePool>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let user = current_user(&pool, &claims).await?;
    check_blog_id(&id)?;

    let blog = sqlx::query_as::<_, Blog>(
        "SELECT id, title, author, url, likes, owner_id FROM blogs WHERE id = ?",
    )
    .bind(&id)
    .fetch_optional(&pool)
    .await?
    .ok_or(AppError::NotFound("Blog does not exist".to_string()))?;

    if blog.owner_id != user.id {
        return Err(AppError::Forbidden(
            "You are not authorized to delete this blog".to_string(),
        ));
    }

    let mut blog_ids = decode_blog_ids(&user)?;
    blog_ids.retain(|b| b != &id);
    let encoded = encode_blog_ids(&blog_ids)?;

    let mut tx = pool.begin().await?;

    sqlx::query("DELETE FROM blogs WHERE id = ?")
        .bind(&id)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            tracing::error!("Failed to delete blog: {:?}", e);
            AppError::InternalServerError(e.to_string())
        })?;

    sqlx::query("UPDATE users SET blog_ids = ? WHERE id = ?")
        .bind(&encoded)
        .bind(&user.id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    Ok(StatusCode::NO_CONTENT)
}

async fn fetch_blog_with_owner(
    pool: &SqlitePool,
    id: &str,
) -> Result<Option<BlogWithOwner>, AppError> {
    let query = format!("{SELECT_BLOG_WITH_OWNER} WHERE b.id = ?");
    let blog = sqlx::query_as::<_, BlogWithOwner>(&query)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(blog)
}

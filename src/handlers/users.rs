// src/handlers/users.rs

use std::collections::HashMap;

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use sqlx::SqlitePool;
use uuid::Uuid;
use validator::Validate;

use crate::{
    error::AppError,
    models::{
        blog::{Blog, BlogSummary},
        user::{CreateUserRequest, User, UserResponse},
    },
    utils::hash::hash_password,
};

/// Registers a new user.
///
/// The password is checked here rather than in the DTO: it is hashed
/// immediately and only the digest is stored, so absence and short
/// length get their own messages before anything touches the database.
/// Returns 201 Created and the user object (excluding the digest).
pub async fn register(
    State(pool): State<SqlitePool>,
    Json(payload): Json<CreateUserRequest>,
) -> Result<impl IntoResponse, AppError> {
    let password = match payload.password.as_deref() {
        None | Some("") => {
            return Err(AppError::BadRequest("Password is required".to_string()));
        }
        Some(p) if p.chars().count() < 3 => {
            return Err(AppError::BadRequest(
                "Password must be at least 3 characters long".to_string(),
            ));
        }
        Some(p) => p,
    };

    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    let password_hash = hash_password(password)?;
    let id = Uuid::new_v4().to_string();

    sqlx::query(
        r#"
        INSERT INTO users (id, username, name, password_hash, blog_ids)
        VALUES (?, ?, ?, ?, '[]')
        "#,
    )
    .bind(&id)
    .bind(&payload.username)
    .bind(&payload.name)
    .bind(&password_hash)
    .execute(&pool)
    .await
    .map_err(|e| match &e {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            AppError::Conflict("expected `username` to be unique".to_string())
        }
        _ => {
            tracing::error!("Failed to register user: {:?}", e);
            AppError::from(e)
        }
    })?;

    Ok((
        StatusCode::CREATED,
        Json(UserResponse {
            id,
            username: payload.username,
            name: payload.name,
            blogs: Vec::new(),
        }),
    ))
}

/// List all users, each with summaries of the blogs it owns.
///
/// The owned set is resolved through the stored `blog_ids` list, not by
/// scanning blog ownership, so a broken symmetry would show up here.
pub async fn list_users(State(pool): State<SqlitePool>) -> Result<impl IntoResponse, AppError> {
    let users = sqlx::query_as::<_, User>(
        "SELECT id, username, name, password_hash, blog_ids FROM users",
    )
    .fetch_all(&pool)
    .await?;

    let blogs = sqlx::query_as::<_, Blog>(
        "SELECT id, title, author, url, likes, owner_id FROM blogs",
    )
    .fetch_all(&pool)
    .await?;

    let by_id: HashMap<&str, &Blog> = blogs.iter().map(|b| (b.id.as_str(), b)).collect();

    let mut responses = Vec::with_capacity(users.len());
    for user in &users {
        let owned_ids = user.decode_blog_ids().map_err(|e| {
            AppError::InternalServerError(format!("corrupt blog list for user {}: {}", user.id, e))
        })?;

        let owned = owned_ids
            .iter()
            .filter_map(|id| by_id.get(id.as_str()))
            .map(|blog| BlogSummary::from(*blog))
            .collect();

        responses.push(UserResponse {
            id: user.id.clone(),
            username: user.username.clone(),
            name: user.name.clone(),
            blogs: owned,
        });
    }

    Ok(Json(responses))
}

// src/routes.rs

use axum::{
    Json, Router,
    http::{Method, StatusCode},
    middleware,
    response::IntoResponse,
    routing::{delete, get, post},
};
use serde_json::json;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    handlers::{auth, blogs, users},
    state::AppState,
    utils::jwt::auth_middleware,
};

/// Assembles the main application router.
///
/// * Splits blog routes into a public part and a token-gated part
///   (create and delete carry the ownership rules).
/// * Applies global middleware (Trace, CORS).
/// * Injects global state (Database Pool + Config).
pub fn create_router(state: AppState) -> Router {
    let origins = [
        "http://localhost:5173".parse().unwrap(),
        "http://127.0.0.1:5173".parse().unwrap(),
    ];

    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([
            axum::http::header::AUTHORIZATION,
            axum::http::header::CONTENT_TYPE,
        ]);

    let blog_routes = Router::new()
        .route("/", get(blogs::list_blogs))
        .route("/{id}", get(blogs::get_blog).put(blogs::update_blog))
        // Token-gated blog routes
        .merge(
            Router::new()
                .route("/", post(blogs::create_blog))
                .route("/{id}", delete(blogs::delete_blog))
                .layer(middleware::from_fn_with_state(
                    state.clone(),
                    auth_middleware,
                )),
        );

    let user_routes = Router::new().route("/", get(users::list_users).post(users::register));

    let login_routes = Router::new().route("/", post(auth::login));

    Router::new()
        .nest("/api/blogs", blog_routes)
        .nest("/api/users", user_routes)
        .nest("/api/login", login_routes)
        .fallback(unknown_endpoint)
        // Global Middleware (applied from outside in)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

async fn unknown_endpoint() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "error": "unknown endpoint" })),
    )
}

// tests/user_api_tests.rs

use bloglist_backend::{config::Config, routes, state::AppState};
use sqlx::sqlite::SqlitePoolOptions;

async fn spawn_app() -> String {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to open in-memory SQLite for testing");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to migrate database");

    let config = Config {
        database_url: "sqlite::memory:".to_string(),
        jwt_secret: "user_test_secret".to_string(),
        jwt_expiration: 600,
        rust_log: "error".to_string(),
    };

    let state = AppState { pool, config };
    let app = routes::create_router(state);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    address
}

async fn list_users(client: &reqwest::Client, address: &str) -> Vec<serde_json::Value> {
    client
        .get(&format!("{}/api/users", address))
        .send()
        .await
        .expect("List users failed")
        .json()
        .await
        .expect("Failed to parse user list")
}

#[tokio::test]
async fn register_works_and_never_exposes_the_digest() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    let response = client
        .post(&format!("{}/api/users", address))
        .json(&serde_json::json!({
            "username": "tauheedbutt",
            "name": "Tauheed Butt",
            "password": "Test@1234"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 201);

    let body: serde_json::Value = response.json().await.unwrap();
    assert!(body["id"].is_string());
    assert_eq!(body["username"], "tauheedbutt");
    assert_eq!(body["name"], "Tauheed Butt");
    assert!(body.get("password").is_none());
    assert!(body.get("password_hash").is_none());
    assert!(body.get("passwordHash").is_none());
    assert!(body.get("_id").is_none());

    let users = list_users(&client, &address).await;
    assert_eq!(users.len(), 1);
    assert!(users[0].get("password_hash").is_none());
}

#[tokio::test]
async fn duplicate_username_is_rejected() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    for expected_status in [201, 400] {
        let response = client
            .post(&format!("{}/api/users", address))
            .json(&serde_json::json!({
                "username": "root",
                "password": "Test@1234"
            }))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status().as_u16(), expected_status);
    }

    let users = list_users(&client, &address).await;
    assert_eq!(users.len(), 1);
}

#[tokio::test]
async fn short_username_is_rejected() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    let response = client
        .post(&format!("{}/api/users", address))
        .json(&serde_json::json!({
            "username": "yo",
            "password": "Test@1234"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 400);

    assert_eq!(list_users(&client, &address).await.len(), 0);
}

#[tokio::test]
async fn short_password_is_rejected_with_min_length_message() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    let response = client
        .post(&format!("{}/api/users", address))
        .json(&serde_json::json!({
            "username": "root",
            "password": "ab"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 400);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Password must be at least 3 characters long");

    // No user was created
    assert_eq!(list_users(&client, &address).await.len(), 0);
}

#[tokio::test]
async fn missing_password_is_rejected() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    let response = client
        .post(&format!("{}/api/users", address))
        .json(&serde_json::json!({ "username": "root" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 400);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Password is required");
}

#[tokio::test]
async fn login_returns_token_and_rejects_bad_credentials() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    client
        .post(&format!("{}/api/users", address))
        .json(&serde_json::json!({
            "username": "root",
            "name": "Root User",
            "password": "Test@1234"
        }))
        .send()
        .await
        .unwrap();

    let ok = client
        .post(&format!("{}/api/login", address))
        .json(&serde_json::json!({
            "username": "root",
            "password": "Test@1234"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(ok.status().as_u16(), 200);
    let body: serde_json::Value = ok.json().await.unwrap();
    assert!(body["token"].is_string());
    assert_eq!(body["username"], "root");
    assert_eq!(body["name"], "Root User");

    for bad in [
        serde_json::json!({"username": "root", "password": "wrong"}),
        serde_json::json!({"username": "nobody", "password": "Test@1234"}),
    ] {
        let response = client
            .post(&format!("{}/api/login", address))
            .json(&bad)
            .send()
            .await
            .unwrap();
        assert_eq!(response.status().as_u16(), 401);
        let body: serde_json::Value = response.json().await.unwrap();
        assert_eq!(body["error"], "invalid username or password");
    }
}

#[tokio::test]
async fn users_list_shows_owned_blog_summaries() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    client
        .post(&format!("{}/api/users", address))
        .json(&serde_json::json!({
            "username": "root",
            "password": "Test@1234"
        }))
        .send()
        .await
        .unwrap();

    let login: serde_json::Value = client
        .post(&format!("{}/api/login", address))
        .json(&serde_json::json!({
            "username": "root",
            "password": "Test@1234"
        }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let token = login["token"].as_str().unwrap();

    let created: serde_json::Value = client
        .post(&format!("{}/api/blogs", address))
        .header("Authorization", format!("Bearer {}", token))
        .json(&serde_json::json!({
            "title": "Owned",
            "author": "A",
            "url": "http://x",
            "likes": 3
        }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    let users = list_users(&client, &address).await;
    let root = users.iter().find(|u| u["username"] == "root").unwrap();
    let owned = root["blogs"].as_array().unwrap();
    assert_eq!(owned.len(), 1);
    assert_eq!(owned[0]["id"], created["id"]);
    assert_eq!(owned[0]["title"], "Owned");
    assert_eq!(owned[0]["likes"], 3);
    assert!(owned[0].get("password_hash").is_none());
}

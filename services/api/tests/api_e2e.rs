//! End-to-end tests against a running API instance
//!
//! These tests exercise the full stack (HTTP, auth, Postgres, Redis) and
//! expect the service to be reachable at `API_BASE_URL` (default
//! http://localhost:3000) with its backing stores available.

use reqwest::{Client, StatusCode};
use serde_json::{Value, json};
use serial_test::serial;
use uuid::Uuid;

fn base_url() -> String {
    std::env::var("API_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string())
}

/// Register a fresh user and return (token, api_key)
async fn register_user(client: &Client) -> (String, String) {
    let email = format!("e2e-{}@example.com", Uuid::new_v4());
    let res = client
        .post(format!("{}/auth/register", base_url()))
        .json(&json!({"email": email, "password": "password123", "name": "E2E User"}))
        .send()
        .await
        .expect("register request failed");
    assert_eq!(res.status(), StatusCode::CREATED);

    let body: Value = res.json().await.expect("register body");
    let token = body["token"].as_str().expect("token").to_string();
    let api_key = body["user"]["apiKey"].as_str().expect("apiKey").to_string();
    (token, api_key)
}

async fn create_video(client: &Client, token: &str, title: &str, genre: &str) -> String {
    let res = client
        .post(format!("{}/videos", base_url()))
        .bearer_auth(token)
        .json(&json!({
            "title": title,
            "duration": 120.0,
            "genre": genre,
            "tags": ["e2e"],
        }))
        .send()
        .await
        .expect("create request failed");
    assert_eq!(res.status(), StatusCode::CREATED);

    let body: Value = res.json().await.expect("create body");
    body["video"]["id"].as_str().expect("video id").to_string()
}

#[tokio::test]
#[serial]
#[ignore = "requires a running API instance with Postgres and Redis"]
async fn test_register_create_and_filtered_listing() {
    let client = Client::new();
    let (token, api_key) = register_user(&client).await;

    for i in 0..3 {
        create_video(&client, &token, &format!("Tutorial {}", i), "Tutorial").await;
    }
    for i in 0..2 {
        create_video(&client, &token, &format!("Music {}", i), "Music").await;
    }

    // Listing right after the writes must see all of them (cache invalidated)
    let res = client
        .get(format!("{}/videos", base_url()))
        .query(&[("genre", "Tutorial"), ("page", "1"), ("limit", "10")])
        .bearer_auth(&token)
        .send()
        .await
        .expect("list request failed");
    assert_eq!(res.status(), StatusCode::OK);

    let body: Value = res.json().await.expect("list body");
    assert_eq!(body["data"].as_array().expect("data").len(), 3);
    assert_eq!(body["pagination"]["total"], 3);
    assert_eq!(body["pagination"]["totalPages"], 1);

    // The API key header authenticates the same listing
    let res = client
        .get(format!("{}/videos", base_url()))
        .query(&[("genre", "Tutorial")])
        .header("x-api-key", &api_key)
        .send()
        .await
        .expect("api-key list request failed");
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
#[serial]
#[ignore = "requires a running API instance with Postgres and Redis"]
async fn test_duplicate_registration_conflicts() {
    let client = Client::new();
    let email = format!("e2e-dup-{}@example.com", Uuid::new_v4());

    let res = client
        .post(format!("{}/auth/register", base_url()))
        .json(&json!({"email": email, "password": "password123", "name": "First"}))
        .send()
        .await
        .expect("register request failed");
    assert_eq!(res.status(), StatusCode::CREATED);

    // Same email again: rejected without touching the existing record
    let res = client
        .post(format!("{}/auth/register", base_url()))
        .json(&json!({"email": email, "password": "otherpass123", "name": "Second"}))
        .send()
        .await
        .expect("duplicate register request failed");
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let body: Value = res.json().await.expect("duplicate register body");
    assert_eq!(body["error"], "User already exists");

    // The first registration still logs in with its original credentials
    let res = client
        .post(format!("{}/auth/login", base_url()))
        .json(&json!({"email": email, "password": "password123"}))
        .send()
        .await
        .expect("login request failed");
    assert_eq!(res.status(), StatusCode::OK);

    let body: Value = res.json().await.expect("login body");
    assert_eq!(body["user"]["name"], "First");

    // The rejected registration's password never took effect
    let res = client
        .post(format!("{}/auth/login", base_url()))
        .json(&json!({"email": email, "password": "otherpass123"}))
        .send()
        .await
        .expect("stale login request failed");
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[serial]
#[ignore = "requires a running API instance with Postgres and Redis"]
async fn test_ownership_collapses_to_not_found() {
    let client = Client::new();
    let (token_a, _) = register_user(&client).await;
    let (token_b, _) = register_user(&client).await;

    let video_id = create_video(&client, &token_a, "Owned by A", "Tutorial").await;

    // Another owner's video is indistinguishable from a missing one
    let res = client
        .get(format!("{}/videos/{}", base_url(), video_id))
        .bearer_auth(&token_b)
        .send()
        .await
        .expect("get request failed");
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = client
        .put(format!("{}/videos/{}", base_url(), video_id))
        .bearer_auth(&token_b)
        .json(&json!({"title": "Hijacked"}))
        .send()
        .await
        .expect("put request failed");
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = client
        .delete(format!("{}/videos/{}", base_url(), video_id))
        .bearer_auth(&token_b)
        .send()
        .await
        .expect("delete request failed");
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    // The record is untouched for its owner
    let res = client
        .get(format!("{}/videos/{}", base_url(), video_id))
        .bearer_auth(&token_a)
        .send()
        .await
        .expect("owner get request failed");
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.expect("owner get body");
    assert_eq!(body["video"]["title"], "Owned by A");
}

#[tokio::test]
#[serial]
#[ignore = "requires a running API instance with Postgres and Redis"]
async fn test_pagination_windows() {
    let client = Client::new();
    let (token, _) = register_user(&client).await;

    for i in 0..25 {
        create_video(&client, &token, &format!("Video {}", i), "Gaming").await;
    }

    let page = |n: u32| {
        let client = client.clone();
        let token = token.clone();
        async move {
            let res = client
                .get(format!("{}/videos", base_url()))
                .query(&[
                    ("genre", "Gaming".to_string()),
                    ("page", n.to_string()),
                    ("limit", "10".to_string()),
                ])
                .bearer_auth(&token)
                .send()
                .await
                .expect("list request failed");
            assert_eq!(res.status(), StatusCode::OK);
            res.json::<Value>().await.expect("list body")
        }
    };

    let first = page(1).await;
    assert_eq!(first["data"].as_array().unwrap().len(), 10);
    assert_eq!(first["pagination"]["total"], 25);
    assert_eq!(first["pagination"]["totalPages"], 3);

    let third = page(3).await;
    assert_eq!(third["data"].as_array().unwrap().len(), 5);

    // Past the last page: empty data, unchanged total
    let fourth = page(4).await;
    assert_eq!(fourth["data"].as_array().unwrap().len(), 0);
    assert_eq!(fourth["pagination"]["total"], 25);
}

#[tokio::test]
#[serial]
#[ignore = "requires a running API instance with Postgres and Redis"]
async fn test_unauthenticated_and_invalid_requests() {
    let client = Client::new();

    let res = client
        .get(format!("{}/videos", base_url()))
        .send()
        .await
        .expect("list request failed");
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let (token, _) = register_user(&client).await;
    let res = client
        .post(format!("{}/videos", base_url()))
        .bearer_auth(&token)
        .json(&json!({"title": "", "duration": -1, "genre": "", "tags": []}))
        .send()
        .await
        .expect("create request failed");
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let body: Value = res.json().await.expect("error body");
    assert_eq!(body["error"], "Validation failed");
    assert!(body["details"].as_str().unwrap().contains("title"));
}

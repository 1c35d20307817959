//! Router-level tests over an in-memory archive.
use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::Value;
use tower::ServiceExt;

use chatdb::DB;
use gramboard::{routes, AppState};

async fn test_db() -> DB {
    // One connection only, every :memory: connection is its own database
    DB::new(":memory:", 1).await
}

fn app(db: DB) -> Router {
    routes::router(AppState::new(db))
}

// The pool is cheap to clone, the state wants an owned DB
fn clone_db(db: &DB) -> DB {
    DB { pool: db.pool.clone() }
}

async fn seed_user(db: &DB, id: &str, username: &str, display_name: Option<&str>) {
    sqlx::query("INSERT INTO user_mappings (author_id,username,display_name) VALUES (?,?,?)")
        .bind(id)
        .bind(username)
        .bind(display_name)
        .execute(&db.pool)
        .await
        .unwrap();
}

async fn seed_message(db: &DB, id: &str, author: &str, content: &str, replied_to: Option<&str>) {
    sqlx::query("INSERT INTO discord_messages (id,author_id,content,replied_to) VALUES (?,?,?,?)")
        .bind(id)
        .bind(author)
        .bind(content)
        .bind(replied_to)
        .execute(&db.pool)
        .await
        .unwrap();
}

async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
    let response =
        app.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap()).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = serde_json::from_slice(&bytes).unwrap();
    (status, json)
}

#[tokio::test]
async fn stats_of_unknown_user_is_404() {
    let db = test_db().await;
    let (status, body) = get(app(db), "/users/404/stats").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "User not found");
    // No partial data alongside the error
    assert!(body.get("wordFrequency").is_none());
}

#[tokio::test]
async fn stats_shape() {
    let db = test_db().await;
    seed_user(&db, "1", "alice", Some("Alice")).await;
    seed_message(&db, "m1", "1", "gg <:gramen:111> https://x.com gg gg 😀🇨🇦", None).await;
    seed_message(&db, "m2", "1", "gg", None).await;

    let (status, body) = get(app(db), "/users/1/stats").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["totalMessages"], 2);
    assert_eq!(body["totalMessagesInDB"], 2);
    assert_eq!(body["wordFrequency"]["gg"], 4);
    assert_eq!(body["emojiFrequency"]["custom"]["<:gramen:111>"], 1);
    assert_eq!(body["emojiFrequency"]["unicode"]["😀"], 1);
    assert_eq!(body["emojiFrequency"]["unicode"]["🇨🇦"], 1);
    assert_eq!(body["userData"]["author_id"], "1");
    assert_eq!(body["userData"]["display_name"], "Alice");
}

#[tokio::test]
async fn stats_upstream_failure_is_500_without_partial_data() {
    let db = test_db().await;
    seed_user(&db, "1", "alice", None).await;
    seed_message(&db, "m1", "1", "words to accumulate", None).await;

    // Break the archive under the handler: the profile lookup still succeeds,
    // the message scan fails
    sqlx::query("DROP TABLE discord_messages").execute(&db.pool).await.unwrap();

    let (status, body) = get(app(db), "/users/1/stats").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Internal server error");
    assert!(body["details"].as_str().is_some());
    // Accumulation from before the failure must not leak out
    assert!(body.get("wordFrequency").is_none());
    assert!(body.get("totalMessages").is_none());
}

#[tokio::test]
async fn search_requires_a_query() {
    let db = test_db().await;
    let (status, body) = get(app(db), "/users/search").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Search query is required");
}

#[tokio::test]
async fn search_by_id_and_by_name() {
    let db = test_db().await;
    seed_user(&db, "123", "bob", None).await;
    seed_user(&db, "456", "bobby", None).await;
    seed_message(&db, "m1", "123", "hello", None).await;

    let (status, body) = get(app(clone_db(&db)), "/users/search?query=123").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["author_id"], "123");
    assert_eq!(body[0]["hasMessages"], true);
    assert_eq!(body[0]["messageCount"], 1);

    let (status, body) = get(app(db), "/users/search?query=bob").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn search_with_no_hits_is_an_empty_list() {
    let db = test_db().await;
    let (status, body) = get(app(db), "/users/search?query=nobody").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, Value::Array(Vec::new()));
}

#[tokio::test]
async fn leaderboards_resolve_names() {
    let db = test_db().await;
    seed_user(&db, "1", "alice", Some("Alice")).await;
    // User 2 has messages but no profile row
    seed_message(&db, "m1", "1", "hi <:gramen:1>", None).await;
    seed_message(&db, "m2", "1", "again", None).await;
    seed_message(&db, "m3", "2", "mystery", None).await;
    seed_message(&db, "m4", "2", "reply", Some("m1")).await;

    let (status, body) = get(app(db), "/leaderboards").await;
    assert_eq!(status, StatusCode::OK);

    let top = body["topMessages"].as_array().unwrap();
    assert_eq!(top.len(), 2);
    assert_eq!(top[0]["value"], 2);
    let names: Vec<&str> = top.iter().map(|e| e["name"].as_str().unwrap()).collect();
    assert!(names.contains(&"Alice"));
    assert!(names.contains(&"Unknown User"));

    assert_eq!(body["topGramen"].as_array().unwrap().len(), 1);
    assert_eq!(body["topReplies"][0]["id"], "2");
}

#[tokio::test]
async fn network_of_empty_archive() {
    let db = test_db().await;
    let (status, body) = get(app(db), "/network").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["nodes"], Value::Array(Vec::new()));
    assert_eq!(body["links"], Value::Array(Vec::new()));
}

#[tokio::test]
async fn network_links_stay_within_nodes() {
    let db = test_db().await;
    seed_user(&db, "1", "alice", None).await;
    seed_user(&db, "2", "bob", None).await;
    seed_message(&db, "m1", "1", "hi", None).await;
    seed_message(&db, "m2", "2", "hi back", Some("m1")).await;

    let (status, body) = get(app(db), "/network").await;
    assert_eq!(status, StatusCode::OK);

    let nodes = body["nodes"].as_array().unwrap();
    assert_eq!(nodes.len(), 2);
    assert!(nodes.iter().all(|n| n["messageCount"].as_i64().unwrap() > 0));

    let links = body["links"].as_array().unwrap();
    assert_eq!(links.len(), 1);
    assert_eq!(links[0]["source"], "2");
    assert_eq!(links[0]["target"], "1");
    assert_eq!(links[0]["value"], 1);

    let ids: Vec<&str> = nodes.iter().map(|n| n["id"].as_str().unwrap()).collect();
    for link in links {
        assert!(ids.contains(&link["source"].as_str().unwrap()));
        assert!(ids.contains(&link["target"].as_str().unwrap()));
    }
}

//! Integration tests for the playlist service API
//!
//! Peer services (identity, song catalogue, activity ledger) are stood
//! in for by stub axum servers on ephemeral ports; the ledger stub
//! records every notification it receives so the best-effort
//! choreography can be asserted on.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use axum::body::Body;
use axum::extract::{Path as AxumPath, Query};
use axum::http::{Request, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use mixtape_common::clients::{ActivityLogClient, SongCatalogClient, UserDirectoryClient};
use mixtape_playlists::{build_router, AppState};
use serde::Deserialize;
use serde_json::{json, Value};
use tower::util::ServiceExt; // for `oneshot`

#[derive(Deserialize)]
struct ExistsParams {
    username: Option<String>,
}

#[derive(Deserialize)]
struct SongParams {
    title: String,
    artist: String,
}

type Recorded = Arc<Mutex<Vec<(String, Value)>>>;

async fn spawn_stub(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

async fn spawn_user_stub(known: &[&str]) -> String {
    let known: Arc<HashSet<String>> = Arc::new(known.iter().map(|s| s.to_string()).collect());
    let app = Router::new().route(
        "/users/exists",
        get(move |Query(params): Query<ExistsParams>| {
            let known = known.clone();
            async move {
                let exists = params.username.map(|u| known.contains(&u)).unwrap_or(false);
                Json(json!({"exists": exists}))
            }
        }),
    );
    spawn_stub(app).await
}

async fn spawn_song_stub(known: &[(&str, &str)]) -> String {
    let known: Arc<HashSet<(String, String)>> = Arc::new(
        known
            .iter()
            .map(|(t, a)| (t.to_string(), a.to_string()))
            .collect(),
    );
    let app = Router::new().route(
        "/songs/exist",
        get(move |Query(params): Query<SongParams>| {
            let known = known.clone();
            async move { Json(known.contains(&(params.title, params.artist))) }
        }),
    );
    spawn_stub(app).await
}

async fn spawn_activity_stub(recorded: Recorded) -> String {
    let app = Router::new().route(
        "/activities/*kind",
        post(
            move |AxumPath(kind): AxumPath<String>, Json(body): Json<Value>| {
                let recorded = recorded.clone();
                async move {
                    recorded.lock().unwrap().push((kind, body));
                    StatusCode::CREATED
                }
            },
        ),
    );
    spawn_stub(app).await
}

struct TestApp {
    app: Router,
    recorded: Recorded,
    _dir: tempfile::TempDir,
}

async fn setup(known_users: &[&str], known_songs: &[(&str, &str)]) -> TestApp {
    let dir = tempfile::tempdir().expect("tempdir");
    let pool = mixtape_common::db::open_database(&dir.path().join("playlists.db"))
        .await
        .expect("open database");
    mixtape_playlists::db::init_schema(&pool).await.expect("schema");

    let recorded: Recorded = Arc::new(Mutex::new(Vec::new()));
    let users = UserDirectoryClient::new(spawn_user_stub(known_users).await).unwrap();
    let catalog = SongCatalogClient::new(spawn_song_stub(known_songs).await).unwrap();
    let activities = ActivityLogClient::new(spawn_activity_stub(recorded.clone()).await).unwrap();

    TestApp {
        app: build_router(AppState::new(pool, users, catalog, activities)),
        recorded,
        _dir: dir,
    }
}

fn get_req(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    serde_json::from_slice(&bytes).expect("parse JSON")
}

async fn create_playlist(t: &TestApp, name: &str, owner: &str) -> (StatusCode, Value) {
    let response = t
        .app
        .clone()
        .oneshot(post_json(
            "/playlists",
            json!({"name": name, "owner": owner}),
        ))
        .await
        .unwrap();
    let status = response.status();
    (status, body_json(response).await)
}

#[tokio::test]
async fn test_create_playlist_returns_id_and_notifies_ledger() {
    let t = setup(&["alice"], &[]).await;

    let (status, body) = create_playlist(&t, "roadtrip", "alice").await;
    assert_eq!(status, StatusCode::CREATED);
    let id = body["id"].as_i64().unwrap();
    assert!(id > 0);

    let recorded = t.recorded.lock().unwrap();
    assert_eq!(recorded.len(), 1);
    let (kind, payload) = &recorded[0];
    assert_eq!(kind, "create-playlist");
    assert_eq!(payload["username"], "alice");
    assert_eq!(payload["playlist_id"], id);
}

#[tokio::test]
async fn test_create_playlist_unknown_owner_leaves_no_row() {
    let t = setup(&["alice"], &[]).await;

    let (status, _) = create_playlist(&t, "phantom", "ghost").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let response = t
        .app
        .clone()
        .oneshot(get_req("/playlists?username=ghost"))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["playlists"], json!([]));

    // No activity either
    assert!(t.recorded.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_duplicate_name_rejected_per_owner_only() {
    let t = setup(&["alice", "bob"], &[]).await;

    let (status, _) = create_playlist(&t, "mix", "alice").await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = create_playlist(&t, "mix", "alice").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["message"],
        "Playlist name already exists for the specified owner"
    );

    // Same name, different owner is fine
    let (status, _) = create_playlist(&t, "mix", "bob").await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn test_created_at_uses_wire_timestamp_format() {
    let t = setup(&["alice"], &[]).await;
    create_playlist(&t, "mix", "alice").await;

    let response = t
        .app
        .clone()
        .oneshot(get_req("/playlists?username=alice"))
        .await
        .unwrap();
    let body = body_json(response).await;
    let created_at = body["playlists"][0]["created_at"].as_str().unwrap();
    // "YYYY-MM-DD HH:MM:SS"
    assert_eq!(created_at.len(), 19);
    assert_eq!(&created_at[4..5], "-");
    assert_eq!(&created_at[10..11], " ");
}

#[tokio::test]
async fn test_add_song_and_duplicates_allowed() {
    let t = setup(&["alice"], &[("Hey", "Pixies")]).await;
    let (_, body) = create_playlist(&t, "mix", "alice").await;
    let id = body["id"].as_i64().unwrap();

    let song = json!({"song_title": "Hey", "song_artist": "Pixies", "added_by": "alice"});
    for _ in 0..2 {
        let response = t
            .app
            .clone()
            .oneshot(post_json(&format!("/playlists/{}", id), song.clone()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    let response = t
        .app
        .clone()
        .oneshot(get_req(&format!("/playlists/{}", id)))
        .await
        .unwrap();
    let body = body_json(response).await;
    let songs = body["songs"].as_array().unwrap();
    assert_eq!(songs.len(), 2, "duplicate entries are allowed");

    // create_playlist + two add_song notifications
    let recorded = t.recorded.lock().unwrap();
    assert_eq!(recorded.len(), 3);
    assert_eq!(recorded[1].0, "add-song");
    assert_eq!(recorded[1].1["song_title"], "Hey");
}

#[tokio::test]
async fn test_add_song_unknown_playlist_or_song_is_not_found() {
    let t = setup(&["alice"], &[("Hey", "Pixies")]).await;
    let (_, body) = create_playlist(&t, "mix", "alice").await;
    let id = body["id"].as_i64().unwrap();

    let response = t
        .app
        .clone()
        .oneshot(post_json(
            "/playlists/9999",
            json!({"song_title": "Hey", "song_artist": "Pixies", "added_by": "alice"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = t
        .app
        .clone()
        .oneshot(post_json(
            &format!("/playlists/{}", id),
            json!({"song_title": "Nope", "song_artist": "Nobody", "added_by": "alice"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["message"], "Song not found");
}

#[tokio::test]
async fn test_songs_of_unknown_playlist_is_not_found() {
    let t = setup(&[], &[]).await;
    let response = t.app.clone().oneshot(get_req("/playlists/42")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_share_flow_and_share_listing() {
    let t = setup(&["alice", "bob"], &[]).await;
    let (_, body) = create_playlist(&t, "mix", "alice").await;
    let id = body["id"].as_i64().unwrap();

    let response = t
        .app
        .clone()
        .oneshot(post_json(
            &format!("/playlists/{}/shares", id),
            json!({"recipient": "bob"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = t
        .app
        .clone()
        .oneshot(get_req("/playlists/shared?username=bob"))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["playlists"][0]["id"], id);
    assert_eq!(body["playlists"][0]["owner"], "alice");

    // The share notification carries owner and recipient
    let recorded = t.recorded.lock().unwrap();
    let (kind, payload) = recorded.last().unwrap();
    assert_eq!(kind, "share-playlist");
    assert_eq!(payload["username"], "alice");
    assert_eq!(payload["username_friend"], "bob");
    assert_eq!(payload["playlist_id"], id);
}

#[tokio::test]
async fn test_share_with_owner_is_rejected() {
    let t = setup(&["alice"], &[]).await;
    let (_, body) = create_playlist(&t, "mix", "alice").await;
    let id = body["id"].as_i64().unwrap();

    let response = t
        .app
        .clone()
        .oneshot(post_json(
            &format!("/playlists/{}/shares", id),
            json!({"recipient": "alice"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await["message"],
        "You cannot share the playlist with yourself"
    );
}

#[tokio::test]
async fn test_duplicate_share_conflicts() {
    let t = setup(&["alice", "bob"], &[]).await;
    let (_, body) = create_playlist(&t, "mix", "alice").await;
    let id = body["id"].as_i64().unwrap();

    let share = post_json(&format!("/playlists/{}/shares", id), json!({"recipient": "bob"}));
    let response = t.app.clone().oneshot(share).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let share = post_json(&format!("/playlists/{}/shares", id), json!({"recipient": "bob"}));
    let response = t.app.clone().oneshot(share).await.unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_racing_shares_yield_one_success_one_conflict() {
    let t = setup(&["alice", "bob"], &[]).await;
    let (_, body) = create_playlist(&t, "mix", "alice").await;
    let id = body["id"].as_i64().unwrap();
    let uri = format!("/playlists/{}/shares", id);

    let (left, right) = tokio::join!(
        t.app.clone().oneshot(post_json(&uri, json!({"recipient": "bob"}))),
        t.app.clone().oneshot(post_json(&uri, json!({"recipient": "bob"}))),
    );
    let statuses = [left.unwrap().status(), right.unwrap().status()];

    let ok = statuses.iter().filter(|s| **s == StatusCode::OK).count();
    let conflict = statuses
        .iter()
        .filter(|s| **s == StatusCode::CONFLICT)
        .count();
    assert_eq!((ok, conflict), (1, 1), "got {:?}", statuses);
}

#[tokio::test]
async fn test_share_unknown_recipient_or_playlist() {
    let t = setup(&["alice"], &[]).await;
    let (_, body) = create_playlist(&t, "mix", "alice").await;
    let id = body["id"].as_i64().unwrap();

    let response = t
        .app
        .clone()
        .oneshot(post_json(
            &format!("/playlists/{}/shares", id),
            json!({"recipient": "nobody"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = t
        .app
        .clone()
        .oneshot(post_json("/playlists/777/shares", json!({"recipient": "alice"})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_unreachable_ledger_does_not_fail_the_write() {
    let dir = tempfile::tempdir().unwrap();
    let pool = mixtape_common::db::open_database(&dir.path().join("playlists.db"))
        .await
        .unwrap();
    mixtape_playlists::db::init_schema(&pool).await.unwrap();

    let users = UserDirectoryClient::new(spawn_user_stub(&["alice"]).await).unwrap();
    let catalog = SongCatalogClient::new(spawn_song_stub(&[]).await).unwrap();
    // Nothing listens here; the post-commit notification must be swallowed
    let activities = ActivityLogClient::new("http://127.0.0.1:9").unwrap();
    let app = build_router(AppState::new(pool, users, catalog, activities));

    let response = app
        .clone()
        .oneshot(post_json(
            "/playlists",
            json!({"name": "mix", "owner": "alice"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    // The playlist is really there
    let response = app
        .clone()
        .oneshot(get_req("/playlists?username=alice"))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["playlists"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_unreachable_identity_service_blocks_the_write() {
    let dir = tempfile::tempdir().unwrap();
    let pool = mixtape_common::db::open_database(&dir.path().join("playlists.db"))
        .await
        .unwrap();
    mixtape_playlists::db::init_schema(&pool).await.unwrap();

    let users = UserDirectoryClient::new("http://127.0.0.1:9").unwrap();
    let catalog = SongCatalogClient::new(spawn_song_stub(&[]).await).unwrap();
    let activities = ActivityLogClient::new("http://127.0.0.1:9").unwrap();
    let app = build_router(AppState::new(pool, users, catalog, activities));

    // The existence check gates the mutation: no confirmed precondition,
    // no write
    let response = app
        .clone()
        .oneshot(post_json(
            "/playlists",
            json!({"name": "mix", "owner": "alice"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

    let response = app.clone().oneshot(get_req("/playlists")).await.unwrap();
    let body = body_json(response).await;
    assert_eq!(body["playlists"], json!([]));
}

//! HTTP tests for the radio endpoints: polling, play/pause/veto against the
//! current track, login gating and playlist maintenance.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use chrono::{Duration, Utc};
use http_body_util::BodyExt;
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::Value;
use sqlx::SqlitePool;
use std::sync::Arc;
use tower::util::ServiceExt; // for `oneshot`
use uuid::Uuid;
use veto_radio::{
    build_router,
    config::Config,
    db,
    models::{
        CreateTrackRequest, PlayerAction, PlayerStatus, RadioAction, UpdateSections, UserRole,
    },
    services::{auth::Claims, playlist::Playlist, vetoes},
    AppState,
};

const JWT_SECRET: &str = "test-secret-test-secret-test-secret!";
const LOGIN_REQUIRED: &str = "You need to log in first!";

struct Fixture {
    db: SqlitePool,
    state: Arc<AppState>,
    app: Router,
    radio: i64,
    user: Uuid,
    token: String,
    current_track: i64,
    next_track: i64,
}

fn test_config() -> Config {
    Config {
        database_url: "sqlite::memory:".to_string(),
        jwt_secret: JWT_SECRET.to_string(),
        server_host: "127.0.0.1".to_string(),
        server_port: 0,
        cors_origins: vec!["*".to_string()],
        radio_name: "radio".to_string(),
        dj_min_tracks: 10,
        dj_target_tracks: 25,
        update_interval_secs: 5,
    }
}

fn token_for(user_id: Uuid, role: UserRole) -> String {
    let claims = Claims {
        sub: user_id,
        role,
        exp: (Utc::now() + Duration::hours(1)).timestamp(),
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(JWT_SECRET.as_bytes()),
    )
    .unwrap()
}

async fn insert_user(db: &SqlitePool, username: &str, role: UserRole) -> Uuid {
    let id = Uuid::new_v4();
    sqlx::query(
        "INSERT INTO users (id, username, email, password_hash, role, created_at)
         VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(id)
    .bind(username)
    .bind(format!("{}@example.com", username))
    .bind("not-a-real-hash")
    .bind(role)
    .bind(Utc::now())
    .execute(db)
    .await
    .unwrap();
    id
}

/// Library of 40 tracks, 24 of them queued, and a listener who has already
/// vetoed 3 tracks that are not queued.
async fn setup() -> Fixture {
    let db = db::connect_in_memory().await.unwrap();
    db::migrate(&db).await.unwrap();

    let config = test_config();
    let state = Arc::new(AppState::new(db.clone(), &config));
    state.radio_manager.load_radios(&config.radio_name).await.unwrap();
    let radio = state.radio_manager.default_radio_id().await.unwrap();

    let mut track_ids = Vec::new();
    for n in 1..=40 {
        let track = state
            .library
            .add_track(CreateTrackRequest {
                title: format!("Track {:04}", n),
                artist: format!("Artist {}", n % 7),
                album: format!("Album {}", n % 5),
                duration: 240,
                path: format!("/music/{:04}.mp3", n),
            })
            .await
            .unwrap();
        track_ids.push(track.id);
    }

    let user = insert_user(&db, "josh", UserRole::Listener).await;
    {
        let mut conn = db.acquire().await.unwrap();
        let playlist = Playlist::new(radio);
        for id in &track_ids[..24] {
            playlist.append(&mut conn, *id).await.unwrap();
        }
        for id in &track_ids[30..33] {
            vetoes::create(&mut conn, user, *id, radio).await.unwrap();
        }
    }

    let app = build_router(state.clone(), &config);

    Fixture {
        db,
        state,
        app,
        radio,
        user,
        token: token_for(user, UserRole::Listener),
        current_track: track_ids[0],
        next_track: track_ids[1],
    }
}

struct TestResponse {
    status: StatusCode,
    content_type: String,
    body: String,
}

impl TestResponse {
    fn json(&self) -> Value {
        serde_json::from_str(&self.body).expect("Should parse JSON")
    }
}

async fn get(app: &Router, uri: &str, token: Option<&str>) -> TestResponse {
    let mut request = Request::builder().method("GET").uri(uri);
    if let Some(token) = token {
        request = request.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    send(app, request.body(Body::empty()).unwrap()).await
}

async fn post_json(app: &Router, uri: &str, token: Option<&str>, body: Value) -> TestResponse {
    let mut request = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        request = request.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    send(app, request.body(Body::from(body.to_string())).unwrap()).await
}

async fn send(app: &Router, request: Request<Body>) -> TestResponse {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();

    TestResponse {
        status,
        content_type,
        body: String::from_utf8(bytes.to_vec()).unwrap(),
    }
}

impl Fixture {
    async fn expected(&self, sections: UpdateSections) -> Value {
        let data = self
            .state
            .radio_manager
            .snapshot(self.radio, sections)
            .await
            .unwrap();
        serde_json::to_value(data).unwrap()
    }

    async fn playlist_ids(&self) -> Vec<i64> {
        let mut conn = self.db.acquire().await.unwrap();
        Playlist::new(self.radio)
            .tracks(&mut conn)
            .await
            .unwrap()
            .into_iter()
            .map(|t| t.id)
            .collect()
    }

    async fn count(&self, sql: &str) -> i64 {
        sqlx::query_scalar(sql).fetch_one(&self.db).await.unwrap()
    }

    async fn user_vetoes(&self) -> i64 {
        let mut conn = self.db.acquire().await.unwrap();
        vetoes::count_for_user(&mut conn, self.user).await.unwrap()
    }

    async fn track_vetoes(&self, track_id: i64) -> i64 {
        let mut conn = self.db.acquire().await.unwrap();
        vetoes::count_for_track(&mut conn, track_id).await.unwrap()
    }

    async fn last_action(&self) -> Option<PlayerAction> {
        self.state
            .radio_manager
            .last_player_action(self.radio)
            .await
            .unwrap()
    }

    async fn player_status(&self) -> PlayerStatus {
        let data = self
            .state
            .radio_manager
            .snapshot(self.radio, UpdateSections::PLAYER)
            .await
            .unwrap();
        data.player.unwrap().status
    }

    fn action_uri(&self, action: &str, track: i64) -> String {
        format!("/api/v1/radios/{}/{}?track={}", self.radio, action, track)
    }

    /// Leave only the current track queued
    async fn trim_playlist_to_current(&self) {
        let mut conn = self.db.acquire().await.unwrap();
        let playlist = Playlist::new(self.radio);
        for track in playlist.tracks(&mut conn).await.unwrap() {
            if track.id != self.current_track {
                playlist.remove(&mut conn, track.id).await.unwrap();
            }
        }
    }
}

fn assert_login_required(response: &TestResponse) {
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert!(response.content_type.starts_with("text/html"));
    assert_eq!(response.body, LOGIN_REQUIRED);
}

// =============================================================================
// index
// =============================================================================

#[tokio::test]
async fn test_index_loads_page_without_login() {
    let fx = setup().await;

    let response = get(&fx.app, "/", None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.content_type.starts_with("text/html"));
    assert!(response.body.contains("Veto Radio"));
}

#[tokio::test]
async fn test_radios_are_listed_publicly() {
    let fx = setup().await;

    let response = get(&fx.app, "/api/v1/radios", None).await;

    assert_eq!(response.status, StatusCode::OK);
    let body = response.json();
    assert_eq!(body[0]["id"], fx.radio);
    assert_eq!(body[0]["name"], "radio");
}

// =============================================================================
// update
// =============================================================================

#[tokio::test]
async fn test_update_requires_login() {
    let fx = setup().await;

    let uri = format!("/api/v1/radios/{}/update?request=all", fx.radio);
    let response = get(&fx.app, &uri, None).await;

    assert_login_required(&response);
}

#[tokio::test]
async fn test_update_rejects_bad_token() {
    let fx = setup().await;

    let uri = format!("/api/v1/radios/{}/update?request=all", fx.radio);
    let response = get(&fx.app, &uri, Some("garbage")).await;

    assert_login_required(&response);
}

#[tokio::test]
async fn test_update_renders_all_data() {
    let fx = setup().await;

    let uri = format!("/api/v1/radios/{}/update?request=all", fx.radio);
    let response = get(&fx.app, &uri, Some(&fx.token)).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.content_type, "application/json");

    let mut expected = fx.expected(UpdateSections::PLAYLIST_AND_PLAYER).await;
    expected["next_update_time"] = 5.into();
    assert_eq!(response.json(), expected);

    let body = response.json();
    assert_eq!(body["playlist"].as_array().unwrap().len(), 24);
    assert_eq!(body["player"]["current_track"], fx.current_track);
    assert_eq!(body["player"]["status"], "paused");
}

#[tokio::test]
async fn test_update_renders_specific_data() {
    let fx = setup().await;

    let uri = format!("/api/v1/radios/{}/update?request=player", fx.radio);
    let response = get(&fx.app, &uri, Some(&fx.token)).await;

    assert_eq!(response.status, StatusCode::OK);
    let body = response.json();
    let keys: Vec<&String> = body.as_object().unwrap().keys().collect();
    assert_eq!(keys.len(), 2);
    assert!(body.get("playlist").is_none());
    assert_eq!(body["next_update_time"], 5);
    assert_eq!(body["player"], fx.expected(UpdateSections::PLAYER).await["player"]);
}

#[tokio::test]
async fn test_update_rejects_unknown_section() {
    let fx = setup().await;

    let uri = format!("/api/v1/radios/{}/update?request=lyrics", fx.radio);
    let response = get(&fx.app, &uri, Some(&fx.token)).await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_update_unknown_radio() {
    let fx = setup().await;

    let response = get(&fx.app, "/api/v1/radios/999/update", Some(&fx.token)).await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

// =============================================================================
// play / pause / veto
// =============================================================================

#[tokio::test]
async fn test_actions_require_login() {
    let fx = setup().await;

    for action in ["play", "pause", "veto"] {
        let response = get(&fx.app, &fx.action_uri(action, fx.current_track), None).await;
        assert_login_required(&response);
    }

    assert_eq!(fx.playlist_ids().await.len(), 24);
    assert_eq!(fx.last_action().await, None);
}

#[tokio::test]
async fn test_actions_on_non_current_track_change_nothing() {
    let fx = setup().await;

    for action in ["play", "pause", "veto"] {
        let before = fx.playlist_ids().await;
        let vetoes_before = fx.count("SELECT COUNT(*) FROM vetoes").await;

        let response = get(&fx.app, &fx.action_uri(action, fx.next_track), Some(&fx.token)).await;

        assert_eq!(response.status, StatusCode::NOT_ACCEPTABLE, "action {}", action);
        assert_eq!(response.content_type, "application/json");
        assert_eq!(response.json(), fx.expected(UpdateSections::PLAYLIST_AND_PLAYER).await);

        assert_eq!(fx.playlist_ids().await, before);
        assert_eq!(fx.count("SELECT COUNT(*) FROM vetoes").await, vetoes_before);
        assert_eq!(fx.player_status().await, PlayerStatus::Paused);
        assert_eq!(fx.last_action().await, None);
    }
}

#[tokio::test]
async fn test_action_on_unknown_track() {
    let fx = setup().await;

    let response = get(&fx.app, &fx.action_uri("play", 9999), Some(&fx.token)).await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(fx.last_action().await, None);
}

#[tokio::test]
async fn test_play_returns_playlist_and_player() {
    let fx = setup().await;
    assert_eq!(fx.last_action().await, None);

    let response = get(&fx.app, &fx.action_uri("play", fx.current_track), Some(&fx.token)).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.content_type, "application/json");
    assert_eq!(fx.last_action().await, Some(PlayerAction::Play));
    assert_eq!(fx.player_status().await, PlayerStatus::Playing);
    assert_eq!(response.json(), fx.expected(UpdateSections::PLAYLIST_AND_PLAYER).await);
    assert_eq!(response.json()["player"]["status"], "playing");
}

#[tokio::test]
async fn test_play_accepts_post() {
    let fx = setup().await;

    let response = post_json(
        &fx.app,
        &fx.action_uri("play", fx.current_track),
        Some(&fx.token),
        Value::Null,
    )
    .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(fx.last_action().await, Some(PlayerAction::Play));
}

#[tokio::test]
async fn test_pause_returns_player_only() {
    let fx = setup().await;
    get(&fx.app, &fx.action_uri("play", fx.current_track), Some(&fx.token)).await;

    let response = get(&fx.app, &fx.action_uri("pause", fx.current_track), Some(&fx.token)).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.content_type, "application/json");
    assert_eq!(fx.last_action().await, Some(PlayerAction::Pause));
    assert_eq!(fx.player_status().await, PlayerStatus::Paused);

    let body = response.json();
    assert!(body.get("playlist").is_none());
    assert_eq!(body, fx.expected(UpdateSections::PLAYER).await);
}

#[tokio::test]
async fn test_veto_removes_current_track() {
    let fx = setup().await;

    assert_eq!(fx.user_vetoes().await, 3);
    assert_eq!(fx.track_vetoes(fx.current_track).await, 0);
    let queued = fx.playlist_ids().await;
    assert!(queued.contains(&fx.current_track));
    assert_eq!(queued.len(), 24);

    let playlist_rows = fx.count("SELECT COUNT(*) FROM playlist_tracks").await;
    let veto_rows = fx.count("SELECT COUNT(*) FROM vetoes").await;

    let response = get(&fx.app, &fx.action_uri("veto", fx.current_track), Some(&fx.token)).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.content_type, "application/json");

    assert_eq!(fx.count("SELECT COUNT(*) FROM playlist_tracks").await, playlist_rows - 1);
    assert_eq!(fx.count("SELECT COUNT(*) FROM vetoes").await, veto_rows + 1);
    assert_eq!(fx.last_action().await, Some(PlayerAction::Play));

    assert_eq!(fx.user_vetoes().await, 4);
    assert_eq!(fx.track_vetoes(fx.current_track).await, 1);

    let queued = fx.playlist_ids().await;
    assert!(!queued.contains(&fx.current_track));
    assert_eq!(queued.len(), 23);
    assert_eq!(queued[0], fx.next_track);

    assert_eq!(response.json(), fx.expected(UpdateSections::PLAYLIST_AND_PLAYER).await);
    assert_eq!(response.json()["player"]["current_track"], fx.next_track);
    assert_eq!(
        fx.count("SELECT COUNT(*) FROM playlist_history WHERE skipped = 1").await,
        1
    );
}

#[tokio::test]
async fn test_vetoes_are_listed_for_user() {
    let fx = setup().await;
    get(&fx.app, &fx.action_uri("veto", fx.current_track), Some(&fx.token)).await;

    let response = get(&fx.app, "/api/v1/users/me/vetoes", Some(&fx.token)).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json().as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn test_repeat_veto_removes_track_without_recounting() {
    let fx = setup().await;
    get(&fx.app, &fx.action_uri("veto", fx.current_track), Some(&fx.token)).await;
    assert_eq!(fx.user_vetoes().await, 4);

    // Queue the vetoed track again, ahead of everything else
    {
        let mut conn = fx.db.acquire().await.unwrap();
        let playlist = Playlist::new(fx.radio);
        let queued = playlist.tracks(&mut conn).await.unwrap();
        for track in &queued {
            playlist.remove(&mut conn, track.id).await.unwrap();
        }
        playlist.append(&mut conn, fx.current_track).await.unwrap();
        for track in &queued {
            playlist.append(&mut conn, track.id).await.unwrap();
        }
    }
    assert_eq!(fx.playlist_ids().await.len(), 24);

    let response = get(&fx.app, &fx.action_uri("veto", fx.current_track), Some(&fx.token)).await;

    assert_eq!(response.status, StatusCode::OK);
    let queued = fx.playlist_ids().await;
    assert!(!queued.contains(&fx.current_track));
    assert_eq!(queued.len(), 23);
    assert_eq!(queued[0], fx.next_track);
    assert_eq!(fx.user_vetoes().await, 4);
    assert_eq!(fx.track_vetoes(fx.current_track).await, 1);
    assert_eq!(
        fx.count("SELECT COUNT(*) FROM playlist_history WHERE skipped = 1").await,
        2
    );
}

#[tokio::test]
async fn test_actions_on_empty_playlist_are_not_acceptable() {
    let fx = setup().await;
    {
        let mut conn = fx.db.acquire().await.unwrap();
        let playlist = Playlist::new(fx.radio);
        for track in playlist.tracks(&mut conn).await.unwrap() {
            playlist.remove(&mut conn, track.id).await.unwrap();
        }
    }

    for action in ["play", "pause", "veto"] {
        let response = get(&fx.app, &fx.action_uri(action, fx.current_track), Some(&fx.token)).await;

        assert_eq!(response.status, StatusCode::NOT_ACCEPTABLE, "action {}", action);
        let body = response.json();
        assert!(body["playlist"].as_array().unwrap().is_empty());
        assert!(body["player"]["current_track"].is_null());
    }

    assert_eq!(fx.user_vetoes().await, 3);
    assert_eq!(fx.last_action().await, None);
}

#[tokio::test]
async fn test_failed_action_leaves_player_untouched() {
    let fx = setup().await;
    fx.trim_playlist_to_current().await;

    // The refill reads play history, so this request fails after the player moved
    sqlx::query("DROP TABLE playlist_history")
        .execute(&fx.db)
        .await
        .unwrap();

    let response = get(&fx.app, &fx.action_uri("play", fx.current_track), Some(&fx.token)).await;
    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);

    let result = fx
        .state
        .radio_manager
        .perform(fx.radio, fx.user, RadioAction::Play, fx.current_track)
        .await;
    assert!(result.is_err());

    assert_eq!(fx.last_action().await, None);
    assert_eq!(fx.player_status().await, PlayerStatus::Paused);
    assert_eq!(fx.playlist_ids().await, vec![fx.current_track]);
}

#[tokio::test]
async fn test_token_for_deleted_user_requires_login() {
    let fx = setup().await;
    let ghost = insert_user(&fx.db, "ghost", UserRole::Listener).await;
    let token = token_for(ghost, UserRole::Listener);
    sqlx::query("DELETE FROM users WHERE id = ?")
        .bind(ghost)
        .execute(&fx.db)
        .await
        .unwrap();

    let response = get(&fx.app, &fx.action_uri("veto", fx.current_track), Some(&token)).await;

    assert_login_required(&response);
    assert_eq!(fx.playlist_ids().await.len(), 24);
    assert_eq!(fx.track_vetoes(fx.current_track).await, 0);
}

// =============================================================================
// playlist maintenance
// =============================================================================

#[tokio::test]
async fn test_maintain_playlist_for_every_action() {
    for action in ["index", "update", "play", "pause", "veto"] {
        let fx = setup().await;
        fx.trim_playlist_to_current().await;

        assert_eq!(fx.playlist_ids().await.len(), 1);
        assert!(fx.state.radio_manager.need_to_run(fx.radio).await.unwrap());

        let response = match action {
            "index" => get(&fx.app, "/", None).await,
            "update" => {
                let uri = format!("/api/v1/radios/{}/update?request=all", fx.radio);
                get(&fx.app, &uri, Some(&fx.token)).await
            }
            _ => get(&fx.app, &fx.action_uri(action, fx.current_track), Some(&fx.token)).await,
        };

        assert_eq!(response.status, StatusCode::OK, "action {}", action);

        let queued = fx.playlist_ids().await;
        assert!(queued.len() > 1, "action {} left {} tracks", action, queued.len());
        assert_eq!(queued.len(), 25, "action {}", action);
        assert!(!fx.state.radio_manager.need_to_run(fx.radio).await.unwrap());
    }
}

#[tokio::test]
async fn test_finished_track_advances() {
    let fx = setup().await;
    let short = fx
        .state
        .library
        .add_track(CreateTrackRequest {
            title: "Jingle".to_string(),
            artist: "Station".to_string(),
            album: String::new(),
            duration: 1,
            path: "/music/jingle.mp3".to_string(),
        })
        .await
        .unwrap();

    {
        let mut conn = fx.db.acquire().await.unwrap();
        let playlist = Playlist::new(fx.radio);
        for track in playlist.tracks(&mut conn).await.unwrap() {
            playlist.remove(&mut conn, track.id).await.unwrap();
        }
        playlist.append(&mut conn, short.id).await.unwrap();
        playlist.append(&mut conn, fx.current_track).await.unwrap();
    }

    let response = get(&fx.app, &fx.action_uri("play", short.id), Some(&fx.token)).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json()["player"]["current_track"], short.id);

    tokio::time::sleep(std::time::Duration::from_millis(1200)).await;

    let uri = format!("/api/v1/radios/{}/update?request=player", fx.radio);
    let response = get(&fx.app, &uri, Some(&fx.token)).await;

    assert_eq!(response.json()["player"]["current_track"], fx.current_track);
    assert_eq!(response.json()["player"]["status"], "playing");
    assert_eq!(
        fx.count("SELECT COUNT(*) FROM playlist_history WHERE skipped = 0").await,
        1
    );
}

// =============================================================================
// auth and library
// =============================================================================

#[tokio::test]
async fn test_register_login_and_library_admin() {
    let fx = setup().await;

    // Fixture users were inserted directly, so the first registration is not admin
    let response = post_json(
        &fx.app,
        "/api/v1/auth/register",
        None,
        serde_json::json!({
            "username": "dj_anna",
            "email": "anna@example.com",
            "password": "correct horse battery",
        }),
    )
    .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json()["user"]["role"], "listener");

    let response = post_json(
        &fx.app,
        "/api/v1/auth/login",
        None,
        serde_json::json!({ "username": "dj_anna", "password": "correct horse battery" }),
    )
    .await;
    assert_eq!(response.status, StatusCode::OK);
    let token = response.json()["token"].as_str().unwrap().to_string();

    let response = post_json(
        &fx.app,
        "/api/v1/auth/login",
        None,
        serde_json::json!({ "username": "dj_anna", "password": "wrong password" }),
    )
    .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);

    let track = serde_json::json!({
        "title": "New Song",
        "artist": "Someone",
        "album": "Somewhere",
        "duration": 180,
        "path": "/music/new.mp3",
    });
    let response = post_json(&fx.app, "/api/v1/tracks", Some(&token), track.clone()).await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);

    let admin = insert_user(&fx.db, "admin", UserRole::Admin).await;
    let admin_token = token_for(admin, UserRole::Admin);
    let response = post_json(&fx.app, "/api/v1/tracks", Some(&admin_token), track).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json()["title"], "New Song");

    let response = get(&fx.app, "/api/v1/tracks?limit=5", Some(&token)).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json()["total"], 41);
    assert_eq!(response.json()["tracks"].as_array().unwrap().len(), 5);
}

#[tokio::test]
async fn test_users_listed_by_name() {
    let fx = setup().await;
    insert_user(&fx.db, "alice", UserRole::Listener).await;
    insert_user(&fx.db, "zed", UserRole::Listener).await;

    let response = get(&fx.app, "/api/v1/users", Some(&fx.token)).await;

    assert_eq!(response.status, StatusCode::OK);
    let names: Vec<String> = response
        .json()
        .as_array()
        .unwrap()
        .iter()
        .map(|u| u["username"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(names, vec!["alice", "josh", "zed"]);
}

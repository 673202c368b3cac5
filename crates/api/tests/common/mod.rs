//! Shared fixtures for API integration tests.
//!
//! Each test builds a throwaway environment: a temp projects directory of
//! JSON manifests and a temp database directory of SQLite files, wired into
//! the same router + middleware stack production uses.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::sqlite::SqliteConnectOptions;
use sqlx::{Connection, SqliteConnection};
use tempfile::TempDir;
use tower::ServiceExt;

use framescope_api::config::ServerConfig;
use framescope_api::router::build_app_router;
use framescope_api::state::AppState;

/// Build a test `ServerConfig` pointing at the given fixture directories.
pub fn test_config(env: &TestEnv) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        projects_dir: env.projects_dir.path().to_path_buf(),
        db_dir: env.db_dir.path().to_path_buf(),
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
    }
}

/// Throwaway manifest + database directories for one test.
pub struct TestEnv {
    pub projects_dir: TempDir,
    pub db_dir: TempDir,
}

impl TestEnv {
    pub fn new() -> Self {
        Self {
            projects_dir: tempfile::tempdir().unwrap(),
            db_dir: tempfile::tempdir().unwrap(),
        }
    }

    /// Build the full application router against this environment,
    /// mirroring the construction in `main.rs` so tests exercise the same
    /// middleware stack.
    pub fn app(&self) -> Router {
        let config = test_config(self);
        let state = AppState {
            config: Arc::new(config.clone()),
        };
        build_app_router(state, &config)
    }

    /// Write `<id>.json` into the projects directory.
    pub fn write_manifest(&self, id: &str, manifest: &serde_json::Value) {
        std::fs::write(
            self.projects_dir.path().join(format!("{id}.json")),
            serde_json::to_vec_pretty(manifest).unwrap(),
        )
        .unwrap();
    }

    /// Create a SQLite database file and apply the given statements.
    pub async fn create_database(&self, name: &str, statements: &[&str]) {
        let options = SqliteConnectOptions::new()
            .filename(self.db_dir.path().join(name))
            .create_if_missing(true);
        let mut conn = SqliteConnection::connect_with(&options).await.unwrap();
        for statement in statements {
            sqlx::query(statement).execute(&mut conn).await.unwrap();
        }
        conn.close().await.unwrap();
    }

    /// The standard fixture from the browse contract: project `proj1` with
    /// an `events` table of two rows.
    pub async fn seed_proj1(&self) {
        self.write_manifest(
            "proj1",
            &serde_json::json!({
                "status": "completed",
                "paths": { "vid_path": "proj1.mp4", "db_path": "proj1.db" },
                "total_frames": 100,
                "processed_frames": 100,
                "progress": 100.0
            }),
        );
        self.create_database(
            "proj1.db",
            &[
                "CREATE TABLE events (id INTEGER PRIMARY KEY, label TEXT)",
                "INSERT INTO events (id, label) VALUES (1, 'a')",
                "INSERT INTO events (id, label) VALUES (2, 'b')",
            ],
        )
        .await;
    }
}

/// Send a GET request to the app.
pub async fn get(app: Router, uri: &str) -> Response<Body> {
    app.oneshot(
        Request::builder()
            .method("GET")
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    )
    .await
    .unwrap()
}

/// Send a POST request with a JSON body to the app.
pub async fn post(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    app.oneshot(
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&body).unwrap()))
            .unwrap(),
    )
    .await
    .unwrap()
}

/// Collect a response body into parsed JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

//! Shared integration-test server bootstrap helpers.

use axum_test::{TestRequest, TestServer};
use serde_json::{json, Value};
use sharuco_server::{create_app, AppState, Config, Database};
use std::path::Path;
use tempfile::TempDir;

pub(crate) const USER_HEADER: &str = "x-sharuco-user";

pub(crate) fn test_config_for_db_path(db_path: &Path) -> Config {
    Config {
        port: 0,
        db_path: db_path.to_str().expect("db path").to_string(),
        max_snippet_size: 64 * 1024,
        allow_public_access: false,
    }
}

pub(crate) fn setup_test_server() -> (TestServer, TempDir) {
    let (server, _state, temp_dir) = setup_test_server_with_state();
    (server, temp_dir)
}

/// Like [`setup_test_server`], also returning the state the router shares.
pub(crate) fn setup_test_server_with_state() -> (TestServer, AppState, TempDir) {
    let temp_dir = TempDir::new().expect("temp dir");
    let config = test_config_for_db_path(&temp_dir.path().join("db"));
    let db = Database::new(config.db_path.as_str()).expect("open db");
    let state = AppState::new(config, db);
    let server = TestServer::new(create_app(state.clone())).expect("server");
    (server, state, temp_dir)
}

pub(crate) fn as_user(request: TestRequest, handle: &'static str) -> TestRequest {
    request.add_header(USER_HEADER, handle)
}

pub(crate) fn snippet_form(code: &str, description: &str, is_private: bool) -> Value {
    json!({
        "code": code,
        "description": description,
        "language": "rust",
        "tags": "demo",
        "isPrivate": is_private
    })
}

/// Submit a snippet and return the stored document.
pub(crate) async fn submit(server: &TestServer, handle: &'static str, form: &Value) -> Value {
    let response = as_user(server.post("/api/snippets"), handle).json(form).await;
    assert_eq!(response.status_code(), axum::http::StatusCode::CREATED);
    response.json()
}

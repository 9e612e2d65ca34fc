//! Integration tests for podcast-server HTTP endpoints
//!
//! Tests cover:
//! - Episode listing (GET /)
//! - Combined administration endpoint (GET/POST /private)
//! - Split endpoints (POST /login, POST /episodes)
//! - Disk and inline media storage
//! - Server failures while storing media or inserting rows
//! - Not-found handling for unknown paths and methods

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use podcast_common::config::DatabaseConfig;
use podcast_common::db::{connect, detect_variant, ensure_schema, init_database};
use podcast_common::{EpisodeMedia, EpisodeRepository, StorageVariant};
use podcast_server::ingest::{DiskStore, InlineStore, MediaStore};
use podcast_server::{build_router, AppState, StaticCredentials};
use serde_json::{json, Value};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;
use tower::util::ServiceExt; // for `oneshot` method

const ADMIN_USER: &str = "admin";
const ADMIN_PASS: &str = "s3cret";
const BOUNDARY: &str = "----podcast-test-boundary";

/// Running app plus handles for inspecting what it stored
struct TestApp {
    app: Router,
    repo: EpisodeRepository,
    upload_dir: PathBuf,
    staging_dir: PathBuf,
    _dir: TempDir,
}

fn media_store(dir: &TempDir, variant: StorageVariant) -> MediaStore {
    match variant {
        StorageVariant::Disk => MediaStore::Disk(DiskStore::new(dir.path().join("public/uploads"))),
        StorageVariant::Inline => MediaStore::Inline(InlineStore::new(dir.path().join("staging"))),
    }
}

fn build_state(dir: &TempDir, repo: EpisodeRepository, variant: StorageVariant) -> AppState {
    let verifier = Arc::new(StaticCredentials::new(
        Some(ADMIN_USER.to_string()),
        Some(ADMIN_PASS.to_string()),
    ));
    AppState::new(repo, media_store(dir, variant), verifier).with_public_dir(dir.path().join("public"))
}

fn temp_db(dir: &TempDir) -> DatabaseConfig {
    DatabaseConfig {
        database: dir.path().join("podcast.db").display().to_string(),
        ..DatabaseConfig::default()
    }
}

fn file_count(dir: &Path) -> usize {
    std::fs::read_dir(dir).map(|entries| entries.count()).unwrap_or(0)
}

/// Test helper: app backed by a fresh database with the schema in place
async fn setup_app(variant: StorageVariant) -> TestApp {
    setup_app_with_limit(variant, None).await
}

async fn setup_app_with_limit(variant: StorageVariant, limit: Option<usize>) -> TestApp {
    let dir = TempDir::new().unwrap();
    let pool = init_database(&temp_db(&dir), variant).await;
    let repo = EpisodeRepository::new(pool, variant);

    let mut state = build_state(&dir, repo.clone(), variant);
    if let Some(limit) = limit {
        state = state.with_max_upload_bytes(limit);
    }

    TestApp {
        app: build_router(state),
        repo,
        upload_dir: dir.path().join("public/uploads"),
        staging_dir: dir.path().join("staging"),
        _dir: dir,
    }
}

/// Test helper: Create request without a body
fn test_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

fn urlencode(value: &str) -> String {
    value
        .bytes()
        .map(|b| match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                (b as char).to_string()
            }
            _ => format!("%{:02X}", b),
        })
        .collect()
}

/// Test helper: urlencoded POST
fn form_request(uri: &str, pairs: &[(&str, &str)]) -> Request<Body> {
    let body = pairs
        .iter()
        .map(|(k, v)| format!("{}={}", urlencode(k), urlencode(v)))
        .collect::<Vec<_>>()
        .join("&");

    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body))
        .unwrap()
}

/// Test helper: JSON POST
fn json_request(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

enum Part<'a> {
    Text(&'a str, &'a str),
    File(&'a str, &'a str, &'a [u8]),
}

/// Test helper: multipart/form-data POST
fn multipart_request(uri: &str, parts: &[Part]) -> Request<Body> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        match part {
            Part::Text(name, value) => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", name).as_bytes(),
                );
                body.extend_from_slice(value.as_bytes());
            }
            Part::File(name, file_name, bytes) => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n\
                         Content-Type: application/octet-stream\r\n\r\n",
                        name, file_name
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(bytes);
            }
        }
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());

    Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(body))
        .unwrap()
}

fn disk_episode_parts<'a>(name: &'a str) -> Vec<Part<'a>> {
    vec![
        Part::Text("Nombre", name),
        Part::Text("Tema", "Rust"),
        Part::Text("Descripcion", "Ownership explained"),
        Part::File("pdf", "notes.pdf", b"%PDF-1.4 notes"),
        Part::File("imagen", "cover.png", b"\x89PNG cover"),
        Part::File("audio", "episode.mp3", b"ID3 audio"),
    ]
}

async fn body_bytes(body: Body) -> Vec<u8> {
    axum::body::to_bytes(body, usize::MAX)
        .await
        .expect("Should read body")
        .to_vec()
}

async fn body_text(body: Body) -> String {
    String::from_utf8(body_bytes(body).await).expect("Body should be UTF-8")
}

// =============================================================================
// Listing
// =============================================================================

#[tokio::test]
async fn test_listing_empty() {
    let t = setup_app(StorageVariant::Disk).await;

    let response = t.app.clone().oneshot(test_request("GET", "/")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response.headers().get(header::CONTENT_TYPE).unwrap();
    assert!(content_type.to_str().unwrap().contains("text/html"));
    assert!(body_text(response.into_body()).await.contains("No episodes yet"));
}

#[tokio::test]
async fn test_listing_store_error_returns_json_500() {
    let dir = TempDir::new().unwrap();
    // Connected, but the table was never created
    let pool = connect(&temp_db(&dir)).await.unwrap();
    let repo = EpisodeRepository::new(pool, StorageVariant::Disk);
    let app = build_router(build_state(&dir, repo, StorageVariant::Disk));

    let response = app.oneshot(test_request("GET", "/")).await.unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = serde_json::from_slice(&body_bytes(response.into_body()).await).unwrap();
    assert_eq!(body["error"], "Failed to load episodes");
}

// =============================================================================
// Administration: login
// =============================================================================

#[tokio::test]
async fn test_private_form_renders() {
    let t = setup_app(StorageVariant::Disk).await;

    let response = t.app.clone().oneshot(test_request("GET", "/private")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response.into_body()).await.contains("name=\"Persona\""));
}

#[tokio::test]
async fn test_private_login_success_renders_special_page() {
    let t = setup_app(StorageVariant::Disk).await;

    let request = form_request("/private", &[("Persona", ADMIN_USER), ("Contraseña", ADMIN_PASS)]);
    let response = t.app.clone().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response.into_body()).await;
    assert!(html.contains("New episode"));
    assert!(html.contains("name=\"imagen\""));
}

#[tokio::test]
async fn test_private_login_wrong_password_is_401() {
    let t = setup_app(StorageVariant::Disk).await;

    let request = form_request("/private", &[("Persona", ADMIN_USER), ("Contraseña", "S3CRET")]);
    let response = t.app.clone().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_text(response.into_body()).await, "Incorrect password");
}

#[tokio::test]
async fn test_credentials_take_precedence_over_episode_fields() {
    let t = setup_app(StorageVariant::Disk).await;

    let mut parts = disk_episode_parts("Ignored");
    parts.push(Part::Text("Persona", "intruder"));
    parts.push(Part::Text("Contrasena", "unused"));
    // Only one credential field present: falls through to the episode intent
    let response = t
        .app
        .clone()
        .oneshot(multipart_request("/private", &parts))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FOUND);

    let request = form_request(
        "/private",
        &[
            ("Persona", "intruder"),
            ("Contraseña", "guess"),
            ("Nombre", "Sneaky"),
            ("Tema", "Rust"),
            ("Descripcion", "No files"),
        ],
    );
    let response = t.app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    assert_eq!(t.repo.list_all().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_login_endpoint() {
    let t = setup_app(StorageVariant::Inline).await;

    let ok = t
        .app
        .clone()
        .oneshot(form_request("/login", &[("Persona", ADMIN_USER), ("Contraseña", ADMIN_PASS)]))
        .await
        .unwrap();
    assert_eq!(ok.status(), StatusCode::OK);
    assert!(body_text(ok.into_body()).await.contains("name=\"Documento\""));

    let denied = t
        .app
        .clone()
        .oneshot(form_request("/login", &[("Persona", "someone"), ("Contraseña", ADMIN_PASS)]))
        .await
        .unwrap();
    assert_eq!(denied.status(), StatusCode::UNAUTHORIZED);

    let incomplete = t
        .app
        .clone()
        .oneshot(form_request("/login", &[("Persona", ADMIN_USER)]))
        .await
        .unwrap();
    assert_eq!(incomplete.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_json_login() {
    let t = setup_app(StorageVariant::Disk).await;

    let ok = t
        .app
        .clone()
        .oneshot(json_request(
            "/private",
            json!({ "Persona": ADMIN_USER, "Contraseña": ADMIN_PASS }),
        ))
        .await
        .unwrap();
    assert_eq!(ok.status(), StatusCode::OK);
    assert!(body_text(ok.into_body()).await.contains("New episode"));

    let denied = t
        .app
        .clone()
        .oneshot(json_request(
            "/private",
            json!({ "Persona": ADMIN_USER, "Contraseña": "wrong" }),
        ))
        .await
        .unwrap();
    assert_eq!(denied.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_text(denied.into_body()).await, "Incorrect password");

    let incomplete = t
        .app
        .clone()
        .oneshot(json_request("/private", json!({ "Persona": ADMIN_USER })))
        .await
        .unwrap();
    assert_eq!(incomplete.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_text(incomplete.into_body()).await, "Insufficient data");

    let on_login_route = t
        .app
        .clone()
        .oneshot(json_request(
            "/login",
            json!({ "Persona": ADMIN_USER, "Contraseña": ADMIN_PASS }),
        ))
        .await
        .unwrap();
    assert_eq!(on_login_route.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_malformed_json_is_rejected() {
    let t = setup_app(StorageVariant::Disk).await;

    let request = Request::builder()
        .method("POST")
        .uri("/private")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"Persona\": "))
        .unwrap();
    let response = t.app.clone().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// =============================================================================
// Administration: episode submission (disk storage)
// =============================================================================

#[tokio::test]
async fn test_insufficient_data_is_400() {
    let t = setup_app(StorageVariant::Disk).await;

    let response = t
        .app
        .clone()
        .oneshot(test_request("POST", "/private"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_text(response.into_body()).await, "Insufficient data");
}

#[tokio::test]
async fn test_disk_episode_submission() {
    let t = setup_app(StorageVariant::Disk).await;

    let response = t
        .app
        .clone()
        .oneshot(multipart_request("/private", &disk_episode_parts("Episode One")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(response.headers().get(header::LOCATION).unwrap(), "/");

    let episodes = t.repo.list_all().await.unwrap();
    assert_eq!(episodes.len(), 1, "Exactly one row should be inserted");
    let episode = &episodes[0];
    assert_eq!(episode.name, "Episode One");
    assert_eq!(episode.topic, "Rust");

    let EpisodeMedia::Files(paths) = &episode.media else {
        panic!("Disk storage should record file paths");
    };
    let audio_path = paths.audio.clone().unwrap();
    assert!(audio_path.starts_with("/uploads/"));
    assert!(audio_path.ends_with("-episode.mp3"));
    assert!(paths.pdf.as_deref().unwrap().ends_with("-notes.pdf"));
    assert!(paths.image.as_deref().unwrap().ends_with("-cover.png"));

    assert_eq!(file_count(&t.upload_dir), 3, "Only the three stored files remain");

    let stored = t.upload_dir.join(audio_path.trim_start_matches("/uploads/"));
    assert_eq!(std::fs::read(stored).unwrap(), b"ID3 audio");

    // Uploaded file is served back
    let response = t.app.clone().oneshot(test_request("GET", &audio_path)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_bytes(response.into_body()).await, b"ID3 audio");

    // Listing shows the new episode
    let response = t.app.clone().oneshot(test_request("GET", "/")).await.unwrap();
    let html = body_text(response.into_body()).await;
    assert!(html.contains("Episode One"));
    assert!(html.contains(&audio_path));
}

#[tokio::test]
async fn test_missing_file_part_is_400() {
    let t = setup_app(StorageVariant::Disk).await;

    let parts = vec![
        Part::Text("Nombre", "Incomplete"),
        Part::Text("Tema", "Rust"),
        Part::Text("Descripcion", "No audio"),
        Part::File("pdf", "notes.pdf", b"pdf"),
        Part::File("imagen", "cover.png", b"png"),
    ];
    let response = t
        .app
        .clone()
        .oneshot(multipart_request("/private", &parts))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(t.repo.list_all().await.unwrap().is_empty());
    assert_eq!(file_count(&t.upload_dir), 0, "Spooled parts should be discarded");
}

#[tokio::test]
async fn test_missing_text_field_is_400() {
    let t = setup_app(StorageVariant::Disk).await;

    let parts: Vec<Part> = disk_episode_parts("Unused")
        .into_iter()
        .filter(|p| !matches!(p, Part::Text("Tema", _)))
        .collect();
    let response = t
        .app
        .clone()
        .oneshot(multipart_request("/episodes", &parts))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(t.repo.list_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_listing_after_many_submissions() {
    let t = setup_app(StorageVariant::Disk).await;
    let names = ["First", "Second", "Third"];

    for name in names {
        let response = t
            .app
            .clone()
            .oneshot(multipart_request("/episodes", &disk_episode_parts(name)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FOUND);
    }

    let episodes = t.repo.list_all().await.unwrap();
    assert!(episodes.len() >= names.len());

    let response = t.app.clone().oneshot(test_request("GET", "/")).await.unwrap();
    let html = body_text(response.into_body()).await;
    for name in names {
        assert!(html.contains(name), "Listing should contain {}", name);
    }
}

#[tokio::test]
async fn test_episodes_endpoint_ignores_credentials() {
    let t = setup_app(StorageVariant::Disk).await;

    let response = t
        .app
        .clone()
        .oneshot(form_request("/episodes", &[("Persona", ADMIN_USER), ("Contraseña", ADMIN_PASS)]))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_oversized_body_rejected() {
    let t = setup_app_with_limit(StorageVariant::Disk, Some(1024)).await;
    let big = vec![b'x'; 8 * 1024];

    let parts = vec![
        Part::Text("Nombre", "Huge"),
        Part::Text("Tema", "Rust"),
        Part::Text("Descripcion", "Too large"),
        Part::File("pdf", "notes.pdf", b"pdf"),
        Part::File("imagen", "cover.png", b"png"),
        Part::File("audio", "episode.mp3", &big),
    ];
    let response = t
        .app
        .clone()
        .oneshot(multipart_request("/private", &parts))
        .await
        .unwrap();

    assert!(
        response.status().is_client_error(),
        "Expected 4xx for oversized body, got {}",
        response.status()
    );
    assert!(t.repo.list_all().await.unwrap().is_empty());
    assert_eq!(file_count(&t.upload_dir), 0);
}

// =============================================================================
// Episode submission (inline storage)
// =============================================================================

#[tokio::test]
async fn test_inline_episode_round_trip() {
    let t = setup_app(StorageVariant::Inline).await;
    let payload: Vec<u8> = (0..=255u8).rev().cycle().take(2048).collect();

    let parts = vec![
        Part::Text("Nombre", "Inline"),
        Part::Text("Tema", "Storage"),
        Part::Text("Descripcion", "Document in the row"),
        Part::File("Documento", "doc.pdf", &payload),
    ];
    let response = t
        .app
        .clone()
        .oneshot(multipart_request("/private", &parts))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(response.headers().get(header::LOCATION).unwrap(), "/");

    let episodes = t.repo.list_all().await.unwrap();
    assert_eq!(episodes.len(), 1);
    assert_eq!(episodes[0].media, EpisodeMedia::Document(payload.clone()));

    // Staging file removed after the insert
    let leftovers = std::fs::read_dir(&t.staging_dir).unwrap().count();
    assert_eq!(leftovers, 0, "Staging directory should be empty");

    let uri = format!("/episodes/{}/document", episodes[0].id);
    let response = t.app.clone().oneshot(test_request("GET", &uri)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).unwrap(),
        "application/pdf"
    );
    assert_eq!(body_bytes(response.into_body()).await, payload);
}

#[tokio::test]
async fn test_inline_requires_document() {
    let t = setup_app(StorageVariant::Inline).await;

    // Disk-style parts do not satisfy inline storage
    let response = t
        .app
        .clone()
        .oneshot(multipart_request("/private", &disk_episode_parts("Wrong shape")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(t.repo.list_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_document_route_unknown_id_is_404() {
    let t = setup_app(StorageVariant::Inline).await;

    for uri in ["/episodes/99/document", "/episodes/abc/document"] {
        let response = t.app.clone().oneshot(test_request("GET", uri)).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "{}", uri);
    }
}

// =============================================================================
// Server failures
// =============================================================================

#[tokio::test]
async fn test_insert_failure_returns_json_500() {
    let dir = TempDir::new().unwrap();
    let pool = connect(&temp_db(&dir)).await.unwrap();
    // Table laid out for inline storage: a disk row cannot be inserted
    ensure_schema(&pool, StorageVariant::Inline).await.unwrap();
    let repo = EpisodeRepository::new(pool.clone(), StorageVariant::Disk);
    let app = build_router(build_state(&dir, repo, StorageVariant::Disk));

    let response = app
        .oneshot(multipart_request("/episodes", &disk_episode_parts("Lost")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = serde_json::from_slice(&body_bytes(response.into_body()).await).unwrap();
    assert_eq!(body["error"], "Failed to insert new episode");

    let rows = EpisodeRepository::new(pool, StorageVariant::Inline)
        .list_all()
        .await
        .unwrap();
    assert!(rows.is_empty(), "No row should be inserted");

    // Files written before the insert are not rolled back
    assert_eq!(file_count(&dir.path().join("public/uploads")), 3);
}

#[tokio::test]
async fn test_media_write_failure_returns_json_500() {
    let dir = TempDir::new().unwrap();
    let pool = init_database(&temp_db(&dir), StorageVariant::Disk).await;
    let repo = EpisodeRepository::new(pool, StorageVariant::Disk);

    // Upload directory path is taken by a regular file
    let blocker = dir.path().join("uploads");
    std::fs::write(&blocker, b"not a directory").unwrap();
    let verifier = Arc::new(StaticCredentials::new(
        Some(ADMIN_USER.to_string()),
        Some(ADMIN_PASS.to_string()),
    ));
    let state = AppState::new(repo.clone(), MediaStore::Disk(DiskStore::new(&blocker)), verifier)
        .with_public_dir(dir.path().join("public"));
    let app = build_router(state);

    let response = app
        .oneshot(multipart_request("/private", &disk_episode_parts("Unwritable")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = serde_json::from_slice(&body_bytes(response.into_body()).await).unwrap();
    assert_eq!(body["error"], "Failed to store uploaded media");
    assert!(repo.list_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_inline_insert_failure_keeps_staging_file() {
    let dir = TempDir::new().unwrap();
    // Connected, but the table was never created
    let pool = connect(&temp_db(&dir)).await.unwrap();
    let repo = EpisodeRepository::new(pool.clone(), StorageVariant::Inline);
    let app = build_router(build_state(&dir, repo, StorageVariant::Inline));

    let parts = vec![
        Part::Text("Nombre", "Inline"),
        Part::Text("Tema", "Storage"),
        Part::Text("Descripcion", "Insert fails"),
        Part::File("Documento", "doc.pdf", b"%PDF-1.4 document"),
    ];
    let response = app
        .oneshot(multipart_request("/episodes", &parts))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = serde_json::from_slice(&body_bytes(response.into_body()).await).unwrap();
    assert_eq!(body["error"], "Failed to insert new episode");

    let staging_dir = dir.path().join("staging");
    let staged: Vec<PathBuf> = std::fs::read_dir(&staging_dir)
        .unwrap()
        .map(|entry| entry.unwrap().path())
        .collect();
    assert_eq!(staged.len(), 1, "Staging file should be left in place");
    assert_eq!(std::fs::read(&staged[0]).unwrap(), b"%PDF-1.4 document");

    assert_eq!(detect_variant(&pool).await.unwrap(), None, "No table, so no row");
}

// =============================================================================
// Routing misses and health
// =============================================================================

#[tokio::test]
async fn test_unknown_path_is_404() {
    let t = setup_app(StorageVariant::Disk).await;

    let response = t
        .app
        .clone()
        .oneshot(test_request("GET", "/does-not-exist"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(body_text(response.into_body()).await.contains("Page 404"));
}

#[tokio::test]
async fn test_unknown_method_is_404() {
    let t = setup_app(StorageVariant::Disk).await;

    for (method, uri) in [
        ("DELETE", "/"),
        ("PUT", "/private"),
        ("GET", "/login"),
        ("POST", "/does-not-exist"),
        ("GET", "/uploads/missing.mp3"),
    ] {
        let response = t.app.clone().oneshot(test_request(method, uri)).await.unwrap();
        assert_eq!(
            response.status(),
            StatusCode::NOT_FOUND,
            "{} {} should be 404",
            method,
            uri
        );
    }
}

#[tokio::test]
async fn test_health_endpoint() {
    let t = setup_app(StorageVariant::Disk).await;

    let response = t.app.clone().oneshot(test_request("GET", "/health")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = serde_json::from_slice(&body_bytes(response.into_body()).await).unwrap();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["module"], "podcast-server");
    assert!(body["build"].is_string());
}

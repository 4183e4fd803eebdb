//! Upload API integration tests.
//!
//! Run with: `cargo test -p filedrop-api --test upload_test`

mod helpers;

use std::sync::Arc;

use axum_test::multipart::MultipartForm;
use filedrop_api::setup::routes;
use filedrop_api::AppState;
use helpers::{create_minimal_png, file_part, setup_test_app, setup_test_app_with, TestApp};
use serde_json::{json, Value};

#[tokio::test]
async fn test_upload_stores_file_and_returns_location() {
    let app = setup_test_app();
    let png = create_minimal_png();

    let form = MultipartForm::new().add_part("f", file_part(png.clone(), "photo.png", "image/png"));
    let response = app.client().post("/upload").multipart(form).await;

    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    assert_eq!(
        body,
        json!({
            "success": true,
            "fileLocation": "http://localhost:4000/files/photo.png"
        })
    );
    assert_eq!(std::fs::read(app.uploads().join("photo.png")).unwrap(), png);
    assert!(TestApp::list(&app.staging()).is_empty());
}

#[tokio::test]
async fn test_upload_applies_prefix_and_sanitizes_name() {
    let app = setup_test_app_with(|config| config.destination_prefix = "user42_".to_string());

    let form = MultipartForm::new().add_part(
        "f",
        file_part(create_minimal_png(), "../../my vacation!!.png", "image/png"),
    );
    let response = app.client().post("/upload").multipart(form).await;

    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    assert_eq!(
        body["fileLocation"],
        "http://localhost:4000/files/user42_my_vacation_.png"
    );
    assert_eq!(TestApp::list(app.uploads()), vec!["user42_my_vacation_.png"]);
}

#[tokio::test]
async fn test_numeric_prefix_names_file_by_id() {
    let app =
        setup_test_app_with(|config| config.destination_prefix = "20240101120000".to_string());

    let part = file_part(vec![1, 2, 3], "holiday.jpg", "image/jpeg");
    let form = MultipartForm::new().add_part("f", part);
    let response = app.client().post("/upload").multipart(form).await;

    assert_eq!(response.status_code(), 200);
    assert_eq!(TestApp::list(app.uploads()), vec!["20240101120000.jpg"]);
}

#[tokio::test]
async fn test_skips_unrelated_fields() {
    let app = setup_test_app();

    let form = MultipartForm::new()
        .add_text("comment", "hello")
        .add_part("f", file_part(vec![7; 10], "a.gif", "image/gif"));
    let response = app.client().post("/upload").multipart(form).await;

    assert_eq!(response.status_code(), 200);
    assert_eq!(TestApp::list(app.uploads()), vec!["a.gif"]);
}

#[tokio::test]
async fn test_empty_file_is_rejected() {
    let app = setup_test_app();

    let form = MultipartForm::new().add_part("f", file_part(Vec::new(), "empty.png", "image/png"));
    let response = app.client().post("/upload").multipart(form).await;

    assert_eq!(response.status_code(), 400);
    let body: Value = response.json();
    assert_eq!(body, json!({ "success": false, "error": "File is empty!" }));
    assert!(TestApp::list(app.uploads()).is_empty());
    assert!(TestApp::list(&app.staging()).is_empty());
}

#[tokio::test]
async fn test_disallowed_extension_is_rejected_and_cleaned_up() {
    let app = setup_test_app();

    let form = MultipartForm::new().add_part(
        "f",
        file_part(b"MZ".to_vec(), "setup.exe", "application/octet-stream"),
    );
    let response = app.client().post("/upload").multipart(form).await;

    assert_eq!(response.status_code(), 415);
    let body: Value = response.json();
    assert_eq!(body["error"], "File format not allowed.");
    assert!(TestApp::list(app.uploads()).is_empty());
    assert!(TestApp::list(&app.staging()).is_empty());
}

#[tokio::test]
async fn test_extensionless_file_is_accepted() {
    let app = setup_test_app();

    let part = file_part(b"notes".to_vec(), "README", "text/plain");
    let form = MultipartForm::new().add_part("f", part);
    let response = app.client().post("/upload").multipart(form).await;

    assert_eq!(response.status_code(), 200);
    assert_eq!(TestApp::list(app.uploads()), vec!["README"]);
}

#[tokio::test]
async fn test_case_insensitive_extension_match() {
    let app = setup_test_app_with(|config| {
        config.extension_match = filedrop_core::ExtensionMatch::CaseInsensitive
    });

    let form = MultipartForm::new().add_part("f", file_part(vec![1], "SHOT.PNG", "image/png"));
    let response = app.client().post("/upload").multipart(form).await;

    assert_eq!(response.status_code(), 200);
    assert_eq!(TestApp::list(app.uploads()), vec!["SHOT.PNG"]);
}

#[tokio::test]
async fn test_existing_name_conflicts() {
    let app = setup_test_app();
    std::fs::write(app.uploads().join("photo.png"), b"original").unwrap();

    let form = MultipartForm::new().add_part("f", file_part(vec![9; 4], "photo.png", "image/png"));
    let response = app.client().post("/upload").multipart(form).await;

    assert_eq!(response.status_code(), 409);
    let body: Value = response.json();
    assert_eq!(
        body["error"],
        format!(
            "File already exists in: {}",
            app.uploads().join("photo.png").display()
        )
    );
    assert_eq!(
        std::fs::read(app.uploads().join("photo.png")).unwrap(),
        b"original"
    );
    assert!(TestApp::list(&app.staging()).is_empty());
}

#[tokio::test]
async fn test_overwrite_replaces_bytes_under_same_name() {
    let app = setup_test_app_with(|config| config.allow_overwrite = true);

    for content in [b"first".to_vec(), b"second".to_vec()] {
        let form = MultipartForm::new().add_part("f", file_part(content, "photo.png", "image/png"));
        let response = app.client().post("/upload").multipart(form).await;
        assert_eq!(response.status_code(), 200);
        let body: Value = response.json();
        assert_eq!(body["fileLocation"], "http://localhost:4000/files/photo.png");
    }

    assert_eq!(TestApp::list(app.uploads()), vec!["photo.png"]);
    assert_eq!(
        std::fs::read(app.uploads().join("photo.png")).unwrap(),
        b"second"
    );
}

#[tokio::test]
async fn test_file_over_limit_is_too_big() {
    let app = setup_test_app_with(|config| config.max_file_size_bytes = 16);

    let form = MultipartForm::new().add_part("f", file_part(vec![0; 64], "big.png", "image/png"));
    let response = app.client().post("/upload").multipart(form).await;

    assert_eq!(response.status_code(), 413);
    let body: Value = response.json();
    assert_eq!(body["error"], "File too big!");
    assert!(TestApp::list(app.uploads()).is_empty());
    assert!(TestApp::list(&app.staging()).is_empty());
}

#[tokio::test]
async fn test_empty_file_input_reports_no_file() {
    let app = setup_test_app();

    let part = file_part(Vec::new(), "", "application/octet-stream");
    let form = MultipartForm::new().add_part("f", part);
    let response = app.client().post("/upload").multipart(form).await;

    assert_eq!(response.status_code(), 400);
    let body: Value = response.json();
    assert_eq!(body["error"], "No file! Give a file in the upload field...");
}

#[tokio::test]
async fn test_text_field_with_upload_name_is_missing_field() {
    let app = setup_test_app();

    let form = MultipartForm::new().add_text("f", "photo.png");
    let response = app.client().post("/upload").multipart(form).await;

    assert_eq!(response.status_code(), 400);
    let body: Value = response.json();
    assert_eq!(body, json!({ "success": false, "error": "Field not found" }));
}

#[tokio::test]
async fn test_file_after_text_field_of_same_name_is_stored() {
    let app = setup_test_app();

    let form = MultipartForm::new()
        .add_text("f", "ignored")
        .add_part("f", file_part(vec![5; 8], "late.png", "image/png"));
    let response = app.client().post("/upload").multipart(form).await;

    assert_eq!(response.status_code(), 200);
    assert_eq!(TestApp::list(app.uploads()), vec!["late.png"]);
}

#[cfg(unix)]
#[tokio::test]
async fn test_stored_file_is_readable_by_other_users() {
    use std::os::unix::fs::PermissionsExt;

    let app = setup_test_app();

    let form = MultipartForm::new().add_part("f", file_part(vec![1, 2], "a.png", "image/png"));
    let response = app.client().post("/upload").multipart(form).await;

    assert_eq!(response.status_code(), 200);
    let mode = std::fs::metadata(app.uploads().join("a.png"))
        .unwrap()
        .permissions()
        .mode();
    assert_eq!(mode & 0o777, 0o644);
}

#[test]
fn test_oversized_limit_is_rejected_at_startup() {
    let root = tempfile::tempdir().unwrap();
    let mut config = helpers::test_config(root.path());
    config.max_file_size_bytes = usize::MAX;

    let state = Arc::new(AppState::new(config.clone()));

    assert!(routes::setup_routes(&config, state).is_err());
}

#[tokio::test]
async fn test_missing_field_is_reported() {
    let app = setup_test_app();

    let form =
        MultipartForm::new().add_part("file", file_part(vec![1], "photo.png", "image/png"));
    let response = app.client().post("/upload").multipart(form).await;

    assert_eq!(response.status_code(), 400);
    let body: Value = response.json();
    assert_eq!(body, json!({ "success": false, "error": "Field not found" }));
}

#[tokio::test]
async fn test_custom_field_name() {
    let app = setup_test_app_with(|config| config.field_name = "upload".to_string());

    let form = MultipartForm::new().add_part("upload", file_part(vec![1], "a.png", "image/png"));
    let response = app.client().post("/upload").multipart(form).await;

    assert_eq!(response.status_code(), 200);
}

#[tokio::test]
async fn test_non_multipart_post_is_missing_field() {
    let app = setup_test_app();

    let response = app
        .client()
        .post("/upload")
        .json(&json!({ "f": "photo.png" }))
        .await;

    assert_eq!(response.status_code(), 400);
    let body: Value = response.json();
    assert_eq!(body["error"], "Field not found");
}

#[tokio::test]
async fn test_get_upload_is_method_not_allowed() {
    let app = setup_test_app();

    let response = app.client().get("/upload").await;

    assert_eq!(response.status_code(), 405);
    let body: Value = response.json();
    assert_eq!(
        body,
        json!({ "success": false, "error": "Request must be done via POST" })
    );
}

#[tokio::test]
async fn test_debug_trace_only_when_enabled() {
    let quiet = setup_test_app();
    let form = MultipartForm::new().add_part("f", file_part(vec![1], "a.png", "image/png"));
    let body: Value = quiet.client().post("/upload").multipart(form).await.json();
    assert!(body.get("debug").is_none());

    let verbose = setup_test_app_with(|config| config.debug_trace = true);
    let form = MultipartForm::new().add_part("f", file_part(Vec::new(), "a.png", "image/png"));
    let body: Value = verbose.client().post("/upload").multipart(form).await.json();
    let debug = body["debug"].as_array().expect("debug trace present");
    assert!(debug.iter().any(|line| line == "Real size: 0 bytes"));

    let production = setup_test_app_with(|config| {
        config.debug_trace = true;
        config.environment = "production".to_string();
    });
    let form = MultipartForm::new().add_part("f", file_part(vec![1], "a.png", "image/png"));
    let body: Value = production.client().post("/upload").multipart(form).await.json();
    assert!(body.get("debug").is_none());
}

#[tokio::test]
async fn test_stored_file_is_served_with_nosniff() {
    let app = setup_test_app();
    let png = create_minimal_png();

    let form = MultipartForm::new().add_part("f", file_part(png.clone(), "pic.png", "image/png"));
    app.client().post("/upload").multipart(form).await;

    let response = app.client().get("/files/pic.png").await;

    assert_eq!(response.status_code(), 200);
    assert_eq!(response.as_bytes().to_vec(), png);
    assert_eq!(response.header("x-content-type-options"), "nosniff");
}

#[tokio::test]
async fn test_files_route_disabled() {
    let app = setup_test_app_with(|config| config.serve_files = false);
    std::fs::write(app.uploads().join("pic.png"), b"x").unwrap();

    let response = app.client().get("/files/pic.png").await;

    assert_eq!(response.status_code(), 404);
}

#[tokio::test]
async fn test_health_endpoints() {
    let app = setup_test_app();

    let live = app.client().get("/health").await;
    assert_eq!(live.status_code(), 200);
    assert_eq!(live.json::<Value>(), json!({ "status": "alive" }));

    let ready = app.client().get("/health/ready").await;
    assert_eq!(ready.status_code(), 200);
    assert_eq!(ready.json::<Value>()["status"], "ready");
}

#[tokio::test]
async fn test_readiness_fails_without_destination() {
    let app = setup_test_app();
    std::fs::remove_dir(app.uploads()).unwrap();

    let ready = app.client().get("/health/ready").await;

    assert_eq!(ready.status_code(), 503);
    assert_eq!(ready.json::<Value>()["status"], "not_ready");
}

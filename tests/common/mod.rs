#![allow(dead_code)]
use actix_web::body::MessageBody;
use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{web, App};
use std::sync::Arc;
use tempfile::TempDir;

use employee_directory::config::UploadConfig;
use employee_directory::db::{MemoryStore, RecordStore};
use employee_directory::handlers;

pub const BOUNDARY: &str = "----directory-test-boundary";

/// In-memory store plus a throwaway upload directory, removed on drop.
pub struct TestContext {
    pub store: Arc<MemoryStore>,
    pub upload: UploadConfig,
    _dir: TempDir,
}

impl TestContext {
    pub fn new() -> Self {
        Self::with_max_bytes(1024 * 1024)
    }

    pub fn with_max_bytes(max_bytes: usize) -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        let upload = UploadConfig {
            dir: dir.path().join("uploads"),
            max_bytes,
        };
        // The file mount resolves its directory when the app is built.
        std::fs::create_dir_all(&upload.dir).expect("create upload dir");
        Self {
            store: Arc::new(MemoryStore::new()),
            upload,
            _dir: dir,
        }
    }
}

pub fn build_app(
    ctx: &TestContext,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let store: Arc<dyn RecordStore> = ctx.store.clone();
    let upload = ctx.upload.clone();

    App::new()
        .app_data(web::Data::from(store))
        .app_data(web::Data::new(upload.clone()))
        .configure(|cfg| handlers::configure(cfg, &upload))
}

pub fn employee_json(id: &str, name: &str, email: &str) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "name": name,
        "email": email,
        "gender": "female",
        "designation": "Engineer",
    })
}

/// Builds a multipart body holding one file field.
pub fn multipart_body(field: &str, filename: Option<&str>, content: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
    match filename {
        Some(name) => body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
                field, name
            )
            .as_bytes(),
        ),
        None => body.extend_from_slice(
            format!("Content-Disposition: form-data; name=\"{}\"\r\n", field).as_bytes(),
        ),
    }
    body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
    body.extend_from_slice(content);
    body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());
    body
}

pub fn multipart_content_type() -> String {
    format!("multipart/form-data; boundary={}", BOUNDARY)
}

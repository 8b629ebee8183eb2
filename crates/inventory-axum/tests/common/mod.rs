//! Shared helpers for inventory-axum integration tests.

#![allow(dead_code)]

use std::path::{Path, PathBuf};

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, Response, header};
use http_body_util::BodyExt;
use inventory_axum::bootstrap::{CorsConfig, ServerConfig, bootstrap};
use inventory_axum::routes::create_router;
use tempfile::TempDir;
use tower::ServiceExt;

pub const BOUNDARY: &str = "inventory-test-boundary";

/// A router over a fresh cache directory.
pub struct TestApp {
    pub cache: TempDir,
    pub router: Router,
}

impl TestApp {
    pub async fn new() -> Self {
        let cache = tempfile::tempdir().unwrap();
        let router = router_for(cache.path()).await;
        Self { cache, router }
    }

    /// A router whose request bodies are capped at `limit` bytes.
    pub async fn with_upload_limit(limit: usize) -> Self {
        let cache = tempfile::tempdir().unwrap();
        let config = ServerConfig::new("127.0.0.1", 0, cache.path()).with_max_upload_bytes(limit);
        let ctx = bootstrap(&config).await.unwrap();
        let router = create_router(ctx, &CorsConfig::AllowAll);
        Self { cache, router }
    }

    pub fn photos_dir(&self) -> PathBuf {
        self.cache.path().join("photos")
    }

    /// Names of the files currently in the photo directory.
    pub fn photo_files(&self) -> Vec<String> {
        let mut names: Vec<_> = std::fs::read_dir(self.photos_dir())
            .unwrap()
            .map(|e| e.unwrap().file_name().into_string().unwrap())
            .collect();
        names.sort();
        names
    }

    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.router.clone().oneshot(request).await.unwrap()
    }

    pub async fn get(&self, uri: &str) -> Response<Body> {
        self.send(request(Method::GET, uri, Body::empty())).await
    }

    /// `POST /register` with the given parts.
    pub async fn register(&self, parts: &[Part<'_>]) -> Response<Body> {
        self.send(multipart_request(Method::POST, "/register", parts))
            .await
    }

    /// Register an item and return its JSON.
    pub async fn register_ok(&self, parts: &[Part<'_>]) -> serde_json::Value {
        let response = self.register(parts).await;
        assert_eq!(response.status(), 201);
        body_json(response).await
    }
}

pub async fn router_for(cache: &Path) -> Router {
    let config = ServerConfig::new("127.0.0.1", 0, cache);
    let ctx = bootstrap(&config).await.unwrap();
    create_router(ctx, &CorsConfig::AllowAll)
}

pub fn request(method: Method, uri: &str, body: Body) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(body)
        .unwrap()
}

/// One part of a multipart form.
pub enum Part<'a> {
    Text(&'a str, &'a str),
    File(&'a str, &'a str, &'a [u8]),
}

pub fn multipart_body(parts: &[Part<'_>]) -> Vec<u8> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        match part {
            Part::Text(name, value) => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
                );
                body.extend_from_slice(value.as_bytes());
            }
            Part::File(name, filename, bytes) => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"\r\n\
                         Content-Type: image/jpeg\r\n\r\n"
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(bytes);
            }
        }
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

pub fn multipart_request(method: Method, uri: &str, parts: &[Part<'_>]) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(multipart_body(parts)))
        .unwrap()
}

pub fn json_request(method: Method, uri: &str, json: &serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(json.to_string()))
        .unwrap()
}

pub fn form_request(uri: &str, form: &str) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(form.to_string()))
        .unwrap()
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

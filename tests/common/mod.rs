#![allow(dead_code)]

use std::path::Path;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, Response, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use video_metadata_api::config::Config;
use sqlx::PgPool;
use video_metadata_api::db::{MemoryVideoStore, PgVideoStore};
use video_metadata_api::models::AppState;
use video_metadata_api::routes;

pub const BOUNDARY: &str = "X-VIDEO-API-BOUNDARY";

/// Build a test `Config` pointing uploads at `upload_dir`.
pub fn test_config(upload_dir: &Path) -> Config {
    let upload_dir = upload_dir.to_string_lossy().into_owned();
    Config::from_lookup(|name| match name {
        "PGDB" => Some("videos_test".to_string()),
        "PGUSER" => Some("test".to_string()),
        "PGPASSWORD" => Some("test".to_string()),
        "PGHOST" => Some("localhost".to_string()),
        "QUEUE_TOPIC" => Some("transcode".to_string()),
        "UPLOAD_FOLDER_PATH" => Some(upload_dir.clone()),
        _ => None,
    })
    .expect("test config is complete")
}

/// Build the full application router over an in-memory store.
pub fn build_test_app(upload_dir: &Path) -> Router {
    let state = AppState {
        store: Arc::new(MemoryVideoStore::new()),
        config: test_config(upload_dir),
    };
    routes::app(Arc::new(state))
}

/// Same router, backed by Postgres through the given pool.
pub fn build_pg_test_app(pool: PgPool, upload_dir: &Path) -> Router {
    let state = AppState {
        store: Arc::new(PgVideoStore::new(pool)),
        config: test_config(upload_dir),
    };
    routes::app(Arc::new(state))
}

pub async fn send(app: &Router, request: Request<Body>) -> Response<Body> {
    app.clone().oneshot(request).await.unwrap()
}

pub async fn get(app: &Router, uri: &str) -> Response<Body> {
    send(app, Request::get(uri).body(Body::empty()).unwrap()).await
}

pub async fn post_json(app: &Router, uri: &str, body: &str) -> Response<Body> {
    let request = Request::post(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

pub async fn post_urlencoded(app: &Router, uri: &str, body: &str) -> Response<Body> {
    let request = Request::post(uri)
        .header("content-type", "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

pub enum Part<'a> {
    Text(&'a str, &'a str),
    File {
        name: &'a str,
        filename: &'a str,
        bytes: &'a [u8],
    },
}

/// Encode `parts` as a `multipart/form-data` body using [`BOUNDARY`].
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
            Part::File {
                name,
                filename,
                bytes,
            } => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"\r\n\
                         Content-Type: video/mp4\r\n\r\n"
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

pub async fn post_multipart(app: &Router, uri: &str, parts: &[Part<'_>]) -> Response<Body> {
    let request = Request::post(uri)
        .header(
            "content-type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(multipart_body(parts)))
        .unwrap();
    send(app, request).await
}

/// Split a response into its status and JSON body.
pub async fn json(response: Response<Body>) -> (StatusCode, Value) {
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

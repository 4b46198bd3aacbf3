//! In-process frame for exercising the real client adapters. Serves one
//! gallery and either accepts or rejects every upload and delete.

use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use bloomin8_client::{DeviceSession, StatusPolicy};
use serde_json::json;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

pub struct Frame {
    pub gallery: String,
    pub images: Vec<String>,
    /// Answer uploads and deletes with 200 instead of 500
    pub accept: bool,
    pub calls: Mutex<Vec<String>>,
}

impl Frame {
    pub fn new(gallery: &str, images: &[&str], accept: bool) -> Arc<Self> {
        Arc::new(Self {
            gallery: gallery.to_string(),
            images: images.iter().map(|name| name.to_string()).collect(),
            accept,
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn log(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }

    fn verdict(&self) -> StatusCode {
        if self.accept {
            StatusCode::OK
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

type Shared = Arc<Frame>;

async fn state(State(frame): State<Shared>) -> impl IntoResponse {
    frame.log("GET /state".to_string());
    Json(json!({ "status": 0 }))
}

async fn gallery_list(State(frame): State<Shared>) -> impl IntoResponse {
    Json(json!([{ "name": frame.gallery }]))
}

async fn gallery_get(State(frame): State<Shared>, Path(name): Path<String>) -> impl IntoResponse {
    if name != frame.gallery {
        return StatusCode::NOT_FOUND.into_response();
    }
    let data: Vec<_> = frame
        .images
        .iter()
        .map(|image| json!({ "name": image, "size": 4, "time": 0 }))
        .collect();
    Json(json!({ "data": data, "total": frame.images.len(), "offset": 0, "limit": 100 })).into_response()
}

async fn upload(
    State(frame): State<Shared>,
    Query(query): Query<HashMap<String, String>>,
    _body: Bytes,
) -> impl IntoResponse {
    frame.log(format!("upload {}", query.get("filename").cloned().unwrap_or_default()));
    frame.verdict()
}

async fn image_delete(State(frame): State<Shared>, Query(query): Query<HashMap<String, String>>) -> impl IntoResponse {
    frame.log(format!("delete {}", query.get("image").cloned().unwrap_or_default()));
    frame.verdict()
}

async fn sleep(State(frame): State<Shared>) -> impl IntoResponse {
    frame.log("sleep".to_string());
    StatusCode::OK
}

pub async fn spawn(frame: Shared) -> SocketAddr {
    let app = Router::new()
        .route("/state", get(state))
        .route("/gallery/list", get(gallery_list))
        .route("/gallery/{name}", get(gallery_get))
        .route("/upload", post(upload))
        .route("/image/delete", post(image_delete))
        .route("/sleep", post(sleep))
        .with_state(frame);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    addr
}

/// Session that would swallow non-200 replies if nothing overrode it.
pub fn lenient_session(addr: SocketAddr) -> DeviceSession {
    DeviceSession::new(addr.ip().to_string())
        .with_port(addr.port())
        .with_status_policy(StatusPolicy::Absent)
}

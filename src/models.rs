use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::Arc;

use crate::config::Config;
use crate::db::VideoStore;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn VideoStore>,
    pub config: Config,
}

/// A video metadata record. Fields beyond `id` and `title` are kept as
/// opaque metadata and round-trip through JSON untouched.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Video {
    pub id: i64,
    pub title: String,
    #[serde(flatten)]
    pub metadata: Map<String, Value>,
}

/// Body of `POST /videos`. Any client-supplied `id` is dropped; the store
/// assigns one.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct NewVideo {
    pub title: String,
    #[serde(flatten)]
    pub metadata: Map<String, Value>,
}

impl NewVideo {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            metadata: Map::new(),
        }
    }

    /// Attach the store-assigned id.
    pub fn into_video(mut self, id: i64) -> Video {
        self.metadata.remove("id");
        Video {
            id,
            title: self.title,
            metadata: self.metadata,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct VideoListResponse {
    pub count: i64,
    pub results: Vec<Video>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct VideoDetailResponse {
    pub data: Video,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateVideoResponse {
    pub title: String,
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UploadResponse {
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

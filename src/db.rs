//! Video metadata persistence.
//!
//! Handlers talk to a [`VideoStore`]; production wires in [`PgVideoStore`]
//! backed by a shared connection pool, tests use [`MemoryVideoStore`].

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde_json::{Map, Value};
use sqlx::migrate::Migrator;
use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions};
use sqlx::types::Json;
use sqlx::FromRow;
use tokio::sync::RwLock;
use tracing::info;

use crate::config::DatabaseConfig;
use crate::models::{NewVideo, Video};

pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("video {0} not found")]
    NotFound(i64),
    #[error(transparent)]
    Database(#[from] sqlx::Error),
    #[error(transparent)]
    Migrate(#[from] sqlx::migrate::MigrateError),
}

#[async_trait]
pub trait VideoStore: Send + Sync {
    /// All records ordered by id, with their total count.
    async fn list_videos(&self) -> Result<(i64, Vec<Video>), StoreError>;

    async fn get_video(&self, id: i64) -> Result<Video, StoreError>;

    /// Persist a new record and return it with its assigned id.
    async fn create_video(&self, video: NewVideo) -> Result<Video, StoreError>;
}

/// Open the shared pool and bring the schema up to date.
pub async fn connect(config: &DatabaseConfig) -> Result<PgPool, StoreError> {
    let options = PgConnectOptions::new()
        .host(&config.host)
        .port(config.port)
        .username(&config.user)
        .password(&config.password)
        .database(&config.name);

    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(config.acquire_timeout)
        .connect_with(options)
        .await?;

    info!(
        "[db] connected to {}:{}/{} (max {} connections)",
        config.host, config.port, config.name, config.max_connections
    );

    MIGRATOR.run(&pool).await?;
    info!("[db] schema up to date");

    Ok(pool)
}

const VIDEO_COLUMNS: &str = "id, title, metadata";

#[derive(FromRow)]
struct VideoRow {
    id: i64,
    title: String,
    metadata: Json<Map<String, Value>>,
}

impl From<VideoRow> for Video {
    fn from(row: VideoRow) -> Self {
        Video {
            id: row.id,
            title: row.title,
            metadata: row.metadata.0,
        }
    }
}

#[derive(Clone)]
pub struct PgVideoStore {
    pool: PgPool,
}

impl PgVideoStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl VideoStore for PgVideoStore {
    async fn list_videos(&self) -> Result<(i64, Vec<Video>), StoreError> {
        let query = format!("SELECT {VIDEO_COLUMNS} FROM videos ORDER BY id");
        let rows = sqlx::query_as::<_, VideoRow>(&query)
            .fetch_all(&self.pool)
            .await?;

        let videos: Vec<Video> = rows.into_iter().map(Video::from).collect();
        Ok((videos.len() as i64, videos))
    }

    async fn get_video(&self, id: i64) -> Result<Video, StoreError> {
        let query = format!("SELECT {VIDEO_COLUMNS} FROM videos WHERE id = $1");
        sqlx::query_as::<_, VideoRow>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(Video::from)
            .ok_or(StoreError::NotFound(id))
    }

    async fn create_video(&self, video: NewVideo) -> Result<Video, StoreError> {
        let draft = video.into_video(0);
        let query = format!(
            "INSERT INTO videos (title, metadata) VALUES ($1, $2) RETURNING {VIDEO_COLUMNS}"
        );
        let row = sqlx::query_as::<_, VideoRow>(&query)
            .bind(&draft.title)
            .bind(Json(&draft.metadata))
            .fetch_one(&self.pool)
            .await?;

        Ok(row.into())
    }
}

#[derive(Default)]
struct Registry {
    last_id: i64,
    videos: BTreeMap<i64, Video>,
}

/// Process-local store. Ids start at 1 and are never reused.
#[derive(Default)]
pub struct MemoryVideoStore {
    inner: RwLock<Registry>,
}

impl MemoryVideoStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl VideoStore for MemoryVideoStore {
    async fn list_videos(&self) -> Result<(i64, Vec<Video>), StoreError> {
        let registry = self.inner.read().await;
        let videos: Vec<Video> = registry.videos.values().cloned().collect();
        Ok((videos.len() as i64, videos))
    }

    async fn get_video(&self, id: i64) -> Result<Video, StoreError> {
        self.inner
            .read()
            .await
            .videos
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound(id))
    }

    async fn create_video(&self, video: NewVideo) -> Result<Video, StoreError> {
        let mut registry = self.inner.write().await;
        registry.last_id += 1;
        let video = video.into_video(registry.last_id);
        registry.videos.insert(video.id, video.clone());
        Ok(video)
    }
}

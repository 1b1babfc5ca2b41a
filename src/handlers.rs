use crate::{
    error::{AppError, AppResult},
    models::{
        AppState, CreateVideoResponse, NewVideo, UploadResponse, VideoDetailResponse,
        VideoListResponse,
    },
    storage,
};
use axum::{
    body::Body,
    extract::{rejection::JsonRejection, FromRequest, Path, Query, Request, State},
    http::header::CONTENT_TYPE,
    response::Json,
    Form,
};
use bytes::Bytes;
use multer::Multipart;
use std::{collections::HashMap, sync::Arc, time::Instant};
use tracing::{error, info, warn};

pub const CREATED_MESSAGE: &str = "Object created. Please upload the file for this Video.";

/// List every video record
pub async fn list_videos(State(state): State<Arc<AppState>>) -> AppResult<Json<VideoListResponse>> {
    let (count, results) = state.store.list_videos().await.map_err(|e| {
        error!("[GET /videos] ❌ {}", e);
        AppError::from(e)
    })?;

    info!("[GET /videos] 📊 {} videos", count);
    Ok(Json(VideoListResponse { count, results }))
}

/// Fetch a single video record
pub async fn get_video(
    State(state): State<Arc<AppState>>,
    Path(raw_id): Path<String>,
) -> AppResult<Json<VideoDetailResponse>> {
    let id: i64 = raw_id.trim().parse().map_err(|e| {
        warn!("[GET /videos/:id] Rejected id {:?}: {}", raw_id, e);
        AppError::BadRequest(format!("invalid video id {:?}: {}", raw_id, e))
    })?;

    let data = state.store.get_video(id).await.map_err(|e| {
        warn!("[GET /videos/{}] ❌ {}", id, e);
        AppError::from(e)
    })?;

    Ok(Json(VideoDetailResponse { data }))
}

/// Create a video metadata record; the file follows via `/video-upload`
pub async fn create_video(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<NewVideo>, JsonRejection>,
) -> AppResult<Json<CreateVideoResponse>> {
    let Json(new_video) = payload.map_err(|rejection| {
        warn!("[POST /videos] Undecodable body: {}", rejection.body_text());
        AppError::BadRequest(rejection.body_text())
    })?;

    let video = state.store.create_video(new_video).await.map_err(|e| {
        error!("[POST /videos] ❌ {}", e);
        AppError::from(e)
    })?;

    info!("[POST /videos] ✅ Created video {} ({:?})", video.id, video.title);

    Ok(Json(CreateVideoResponse {
        title: video.title,
        message: CREATED_MESSAGE.to_string(),
    }))
}

/// Accept the file for a video record
///
/// `video_id` is taken from the form body first and the query string second.
pub async fn upload_video_file(
    State(state): State<Arc<AppState>>,
    query: Option<Query<HashMap<String, String>>>,
    request: Request<Body>,
) -> AppResult<Json<UploadResponse>> {
    let start_time = Instant::now();

    let query_video_id = query
        .and_then(|Query(mut params)| params.remove("video_id"))
        .filter(|v| !v.is_empty());

    let content_type = request
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();

    let boundary = match multer::parse_boundary(&content_type) {
        Ok(boundary) => boundary,
        Err(e) => {
            warn!("[POST /video-upload] Not a multipart request: {}", e);
            let form_video_id = if content_type.starts_with("application/x-www-form-urlencoded") {
                Form::<HashMap<String, String>>::from_request(request, &())
                    .await
                    .ok()
                    .and_then(|Form(mut fields)| fields.remove("video_id"))
            } else {
                None
            };
            form_video_id
                .filter(|v| !v.is_empty())
                .or(query_video_id)
                .ok_or(AppError::MissingVideoId)?;
            return Err(AppError::MissingUpload(
                "request Content-Type isn't multipart/form-data".to_string(),
            ));
        }
    };

    let mut multipart = Multipart::with_constraints(
        request.into_body().into_data_stream(),
        boundary,
        multer::Constraints::new().size_limit(
            multer::SizeLimit::new()
                .whole_stream(state.config.max_upload_size)
                .per_field(state.config.max_upload_size),
        ),
    );

    let form = read_form(&mut multipart).await;

    let video_id = form
        .video_id
        .filter(|v| !v.is_empty())
        .or(query_video_id)
        .ok_or(AppError::MissingVideoId)?;

    let (raw_name, file_bytes) = match (form.upload, form.parse_error) {
        (Some(upload), _) => upload,
        (None, Some(e)) => return Err(AppError::MissingUpload(e)),
        (None, None) => {
            return Err(AppError::MissingUpload(
                "no file in form field 'upload'".to_string(),
            ))
        }
    };

    let filename = storage::sanitize_filename(&raw_name).ok_or_else(|| {
        AppError::MissingUpload(format!("unusable upload filename {:?}", raw_name))
    })?;
    if filename != raw_name {
        warn!(
            "[POST /video-upload] Client filename {:?} stored as {:?}",
            raw_name, filename
        );
    }

    let file_path = storage::save_upload(&state.config.upload_dir, &filename, &file_bytes)
        .await
        .map_err(|e| {
            error!("[POST /video-upload] ❌ Failed to write {:?}: {}", filename, e);
            AppError::Storage(e)
        })?;

    info!("[POST /video-upload] 📹 Video ID: {}", video_id);
    info!(
        "[POST /video-upload] 📁 File: {:?} ({} bytes)",
        file_path,
        file_bytes.len()
    );
    info!(
        "[POST /video-upload] ✅ Stored in {:.2}s",
        start_time.elapsed().as_secs_f64()
    );

    Ok(Json(UploadResponse {
        message: format!("Video file uploaded. Transcoding now: {}", video_id),
    }))
}

#[derive(Default)]
struct UploadForm {
    video_id: Option<String>,
    upload: Option<(String, Bytes)>,
    parse_error: Option<String>,
}

/// Drain the whole form before judging it, so field order never changes
/// which error the client sees.
async fn read_form(multipart: &mut Multipart<'_>) -> UploadForm {
    let mut form = UploadForm::default();

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => {
                error!("[POST /video-upload] Multipart parsing error: {}", e);
                form.parse_error = Some(e.to_string());
                break;
            }
        };

        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("video_id") if form.video_id.is_none() => match field.text().await {
                Ok(text) => form.video_id = Some(text),
                Err(e) => {
                    form.parse_error = Some(e.to_string());
                    break;
                }
            },
            Some("upload") if form.upload.is_none() => {
                let Some(file_name) = field.file_name().map(str::to_string) else {
                    // A plain text value under `upload` is not a file.
                    form.parse_error = Some("form field 'upload' is not a file".to_string());
                    continue;
                };
                match field.bytes().await {
                    Ok(bytes) => form.upload = Some((file_name, bytes)),
                    Err(e) => {
                        error!("[POST /video-upload] Failed to read file: {}", e);
                        form.parse_error = Some(e.to_string());
                        break;
                    }
                }
            }
            _ => {
                // Unknown or repeated fields are skipped.
                if let Err(e) = field.bytes().await {
                    form.parse_error = Some(e.to_string());
                    break;
                }
            }
        }
    }

    form
}

//! Multipart image uploads for the gallery and the profile avatar.

use axum::extract::multipart::{Multipart, MultipartError};
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::json;
use tracing::debug;

use super::AppState;
use crate::ingest::DroppedFile;
use crate::pages::{AvatarUpdate, GalleryPage, GalleryView, HomePage, IngestReport, Notice};

/// Collect the file parts of a multipart body. Parts without a filename are skipped.
async fn dropped_files(mut multipart: Multipart) -> Result<Vec<DroppedFile>, MultipartError> {
    let mut files = Vec::new();

    while let Some(field) = multipart.next_field().await? {
        let Some(name) = field.file_name().map(String::from) else {
            debug!(field = ?field.name(), "Skipping non-file part");
            continue;
        };
        let mime = field.content_type().map(String::from);
        let bytes = field.bytes().await?;
        files.push(DroppedFile::from_bytes(&name, mime.as_deref(), bytes.to_vec()));
    }

    Ok(files)
}

#[derive(Debug, Serialize)]
struct GalleryUploadResponse {
    report: IngestReport,
    gallery: GalleryView,
}

pub(crate) async fn upload_gallery(State(state): State<AppState>, multipart: Multipart) -> Response {
    let files = match dropped_files(multipart).await {
        Ok(files) => files,
        Err(e) => return e.into_response(),
    };

    let mut page = GalleryPage::new();
    page.load(&state.store).await;
    let pending = page.begin_ingest(&state.store, files);
    debug!(in_flight = pending.in_flight(), uploading = page.is_uploading(), "Gallery upload started");
    let report = page.finish_ingest(&state.store, pending).await;

    let status = if report.nothing_accepted() {
        StatusCode::BAD_REQUEST
    } else if report.inserted.is_empty() {
        StatusCode::BAD_GATEWAY
    } else {
        StatusCode::OK
    };

    let body = GalleryUploadResponse {
        report,
        gallery: page.view(),
    };
    (status, Json(body)).into_response()
}

pub(crate) async fn upload_avatar(State(state): State<AppState>, multipart: Multipart) -> Response {
    let files = match dropped_files(multipart).await {
        Ok(files) => files,
        Err(e) => return e.into_response(),
    };

    let mut page = HomePage::new(state.site.as_ref().clone());
    page.load(&state.store).await;

    match page.upload_avatar(&state.store, files).await {
        Ok(AvatarUpdate::Updated) => (
            StatusCode::OK,
            Json(json!({ "notice": Notice::AVATAR_UPDATED, "avatar": page.view().avatar })),
        )
            .into_response(),
        Ok(AvatarUpdate::NoProfile) => {
            (StatusCode::CONFLICT, Json(json!({ "error": "No profile to update" }))).into_response()
        }
        Ok(AvatarUpdate::Rejected(rejected)) => {
            let rejected: Vec<_> = rejected
                .iter()
                .map(|r| json!({ "file": r.name(), "reason": r.reason() }))
                .collect();
            let error = if rejected.is_empty() {
                "No file uploaded"
            } else {
                "Upload exactly one PNG, JPEG or GIF image"
            };
            (StatusCode::BAD_REQUEST, Json(json!({ "error": error, "rejected": rejected }))).into_response()
        }
        Err(_) => (StatusCode::BAD_GATEWAY, Json(json!({ "notice": Notice::AVATAR_FAILED }))).into_response(),
    }
}

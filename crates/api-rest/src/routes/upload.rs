//! Generic image upload.

use crate::{
    error::{ApiError, ApiResult},
    extractors::collect_images,
    responses::{ApiResponse, UploadView},
    state::AppState,
};
use axum::{
    extract::{DefaultBodyLimit, Multipart, State},
    routing::post,
    Router,
};

/// Upload routes
pub fn routes(max_upload_bytes: usize) -> Router<AppState> {
    Router::new().route(
        "/upload",
        post(upload).layer(DefaultBodyLimit::max(max_upload_bytes)),
    )
}

/// Store one file sent under the multipart field `image`
#[utoipa::path(
    post,
    path = "/upload",
    tag = "upload",
    responses(
        (status = 200, description = "Where the file can be fetched", body = UploadView),
        (status = 400, description = "No file or unsupported format"),
        (status = 413, description = "File too large"),
        (status = 503, description = "Storage unavailable"),
    )
)]
pub async fn upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> ApiResult<ApiResponse<UploadView>> {
    let mut images = collect_images(&mut multipart, "image").await?;
    if images.len() > 1 {
        return Err(ApiError::BadRequest(
            "Only one image can be uploaded".to_string(),
        ));
    }
    let image = images
        .pop()
        .ok_or_else(|| ApiError::BadRequest("No image file uploaded".to_string()))?;

    let stored = state.uploads.upload(&image).await?;
    Ok(ApiResponse::success(UploadView {
        image_url: stored.reference,
    }))
}

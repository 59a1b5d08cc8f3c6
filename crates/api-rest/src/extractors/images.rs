//! Multipart image collection.

use crate::error::ApiError;
use axum::extract::multipart::{Multipart, MultipartError};
use axum::http::StatusCode;
use foodhub_application::services::MAX_FILES_PER_REQUEST;
use foodhub_application::ImageUpload;

fn multipart_error(e: MultipartError) -> ApiError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::PayloadTooLarge("Upload exceeds the allowed size".to_string())
    } else {
        ApiError::BadRequest(format!("Invalid multipart body: {}", e.body_text()))
    }
}

/// Buffer every file sent under `field`. Other fields are skipped.
pub async fn collect_images(
    multipart: &mut Multipart,
    field: &str,
) -> Result<Vec<ImageUpload>, ApiError> {
    let mut images = Vec::new();
    while let Some(part) = multipart.next_field().await.map_err(multipart_error)? {
        if part.name() != Some(field) {
            continue;
        }
        if images.len() == MAX_FILES_PER_REQUEST {
            return Err(ApiError::BadRequest(format!(
                "At most {} images can be uploaded at once",
                MAX_FILES_PER_REQUEST
            )));
        }
        let file_name = part.file_name().unwrap_or_default().to_string();
        let content_type = part.content_type().map(str::to_string);
        let bytes = part.bytes().await.map_err(multipart_error)?;
        images.push(ImageUpload::new(file_name, content_type, bytes));
    }
    Ok(images)
}

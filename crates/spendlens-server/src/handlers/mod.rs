//! HTTP request handlers organized by domain
//!
//! Each submodule contains handlers for a specific API area.

pub mod analyze;
pub mod index;
pub mod insights;

// Re-export all handlers for use in router
pub use analyze::*;
pub use index::*;
pub use insights::*;

use axum::extract::{multipart::MultipartRejection, Multipart};

use crate::{AppError, MAX_UPLOAD_SIZE};

/// Detail returned when an uploaded CSV cannot be loaded or aggregated
pub const PROCESSING_ERROR: &str = "Error processing file";

/// Read the `file` field of a multipart upload
///
/// Other fields are ignored. A missing `file` field, a form that cannot be
/// read, or a file over `MAX_UPLOAD_SIZE` is a bad request.
pub(crate) async fn read_csv_upload(
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Vec<u8>, AppError> {
    let mut multipart =
        multipart.map_err(|rejection| AppError::bad_request(&rejection.body_text()))?;

    let mut file_data: Option<Vec<u8>> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::bad_request(&format!("Failed to read form field: {}", e)))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let bytes = field
            .bytes()
            .await
            .map_err(|_| AppError::bad_request("Failed to read file data"))?;

        if bytes.len() > MAX_UPLOAD_SIZE {
            return Err(AppError::bad_request(&format!(
                "File too large. Maximum size is {} MB",
                MAX_UPLOAD_SIZE / 1024 / 1024
            )));
        }

        file_data = Some(bytes.to_vec());
    }

    file_data.ok_or_else(|| AppError::bad_request("Missing file field"))
}

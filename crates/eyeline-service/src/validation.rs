//! Checks applied to an upload batch before it is submitted.

use std::io::Cursor;

use eyeline_core::config::StorageConfig;
use eyeline_core::error::{AppError, JobError};
use eyeline_core::result::AppResult;
use eyeline_storage::naming::base_name;

use crate::coordinator::UploadedImage;

/// Validate every image of a batch.
///
/// An empty batch is rejected as [`JobError::EmptyBatch`]. Each file must
/// carry an allowed extension and bytes that start with a readable image
/// header.
pub fn validate_batch(config: &StorageConfig, images: &[UploadedImage]) -> AppResult<()> {
    if images.is_empty() {
        return Err(JobError::EmptyBatch.into());
    }

    for image in images {
        if !has_allowed_extension(&image.filename, &config.allowed_extensions) {
            return Err(AppError::validation(format!(
                "Invalid file type: {}",
                image.filename
            )));
        }

        image_dimensions(&image.data).map_err(|reason| {
            AppError::validation(format!("Invalid image file: {} ({reason})", image.filename))
        })?;
    }

    Ok(())
}

/// Whether the client's file name ends in one of `allowed`, ignoring case.
///
/// Only the last path component is considered; a bare extension such as
/// `.png` has no stem and is rejected.
pub fn has_allowed_extension(filename: &str, allowed: &[String]) -> bool {
    match base_name(filename).rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => {
            allowed.iter().any(|a| a.eq_ignore_ascii_case(ext))
        }
        _ => false,
    }
}

/// Read width and height from the image header, guessing the format from
/// the content.
pub fn image_dimensions(data: &[u8]) -> Result<(u32, u32), String> {
    let reader = image::ImageReader::new(Cursor::new(data))
        .with_guessed_format()
        .map_err(|e| e.to_string())?;

    if reader.format().is_none() {
        return Err("unrecognised format".to_string());
    }

    reader.into_dimensions().map_err(|e| e.to_string())
}

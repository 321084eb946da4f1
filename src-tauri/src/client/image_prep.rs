//! Upload preparation: optional decode and re-encode to JPEG.
//!
//! The backend measures colors, so images are never downscaled unless they
//! exceed `MAX_IMAGE_DIMENSION` on the longest edge.

use std::io::Cursor;

use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageFormat};
use tracing::info;

use crate::config::UploadEncoding;
use crate::error::AnalyzerError;

/// Longest edge allowed after re-encoding.
pub const MAX_IMAGE_DIMENSION: u32 = 4096;

/// High quality keeps compression artifacts out of well color readings.
pub const JPEG_QUALITY: u8 = 95;

/// File name sent in the multipart `file` field.
pub const UPLOAD_FILE_NAME: &str = "image.jpg";

/// Content type sent in the multipart `file` field.
pub const UPLOAD_MIME_TYPE: &str = "image/jpeg";

/// Prepare picked image bytes for upload according to `encoding`.
///
/// # Errors
/// - Input is empty
/// - Image cannot be decoded when re-encoding is required
pub fn prepare_upload(image_bytes: &[u8], encoding: UploadEncoding) -> Result<Vec<u8>, AnalyzerError> {
    if image_bytes.is_empty() {
        return Err(AnalyzerError::Image("Picked image is empty".to_string()));
    }

    let reencode = match encoding {
        UploadEncoding::Original => false,
        UploadEncoding::Jpeg => true,
        UploadEncoding::Auto => !is_jpeg(image_bytes),
    };

    if !reencode {
        info!("Uploading original bytes: {} bytes", image_bytes.len());
        return Ok(image_bytes.to_vec());
    }

    let img = image::load_from_memory(image_bytes).map_err(|e| {
        AnalyzerError::Image(format!(
            "Failed to load image: {}. Ensure it's a valid JPEG/PNG/WebP.",
            e
        ))
    })?;
    info!("Loaded image: {}x{}", img.width(), img.height());

    let resized = resize_if_needed(img, MAX_IMAGE_DIMENSION);
    let jpeg_bytes = encode_to_jpeg(&resized)?;
    info!(
        "Re-encoded to JPEG: {}x{}, {} bytes",
        resized.width(),
        resized.height(),
        jpeg_bytes.len()
    );

    Ok(jpeg_bytes)
}

/// True when the bytes are recognized as JPEG.
pub fn is_jpeg(bytes: &[u8]) -> bool {
    matches!(image::guess_format(bytes), Ok(ImageFormat::Jpeg))
}

/// Resize image if either dimension exceeds max, maintaining aspect ratio.
fn resize_if_needed(img: DynamicImage, max_dimension: u32) -> DynamicImage {
    let (width, height) = (img.width(), img.height());

    if width <= max_dimension && height <= max_dimension {
        return img;
    }

    let scale = max_dimension as f32 / width.max(height) as f32;
    let new_width = (width as f32 * scale) as u32;
    let new_height = (height as f32 * scale) as u32;

    img.resize(new_width, new_height, image::imageops::FilterType::Lanczos3)
}

/// Encode to JPEG bytes. Alpha is dropped since JPEG cannot carry it.
fn encode_to_jpeg(img: &DynamicImage) -> Result<Vec<u8>, AnalyzerError> {
    let rgb = img.to_rgb8();
    let mut buffer = Cursor::new(Vec::new());
    let encoder = JpegEncoder::new_with_quality(&mut buffer, JPEG_QUALITY);
    rgb.write_with_encoder(encoder)
        .map_err(|e| AnalyzerError::Image(format!("Failed to encode image to JPEG: {}", e)))?;
    Ok(buffer.into_inner())
}

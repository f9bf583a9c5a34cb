//! Output encoding: the persisted edit and the inline preview.
//!
//! Both artifacts are produced from the same in-memory image. The persisted
//! bytes follow the destination extension (JPEG at fixed quality 95,
//! everything else at the encoder's lossless defaults); the preview is an
//! independent PNG encode wrapped as a base64 data URI, so it stays lossless
//! even when the saved file is not.

use crate::error::TransformError;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use image::codecs::jpeg::JpegEncoder;
use image::{ExtendedColorType, ImageEncoder, ImageFormat, RgbImage};
use std::io::Cursor;

/// JPEG quality for persisted edits.
const JPEG_QUALITY: u8 = 95;

/// Synthesize the output name for an edited image.
///
/// Timestamp-second prefixing is the accepted coarse uniqueness scheme;
/// two same-named edits within one second may collide.
pub fn edited_filename(original: &str, timestamp: u64) -> String {
    let basename = original
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(original);
    format!("edited_{}_{}", timestamp, basename)
}

/// Encode the image in the format implied by `name`'s extension.
///
/// Unknown or missing extensions fall back to PNG.
pub fn encode_for_name(image: &RgbImage, name: &str) -> Result<Vec<u8>, TransformError> {
    let ext = name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();

    let mut buffer = Cursor::new(Vec::new());
    match ext.as_str() {
        "jpg" | "jpeg" => {
            let encoder = JpegEncoder::new_with_quality(&mut buffer, JPEG_QUALITY);
            encoder.write_image(
                image.as_raw(),
                image.width(),
                image.height(),
                ExtendedColorType::Rgb8,
            )?;
        }
        other => {
            let format = ImageFormat::from_extension(other).unwrap_or(ImageFormat::Png);
            image.write_to(&mut buffer, format)?;
        }
    }
    Ok(buffer.into_inner())
}

/// Encode a lossless PNG preview and wrap it as a data URI.
pub fn png_preview_data_uri(image: &RgbImage) -> Result<String, TransformError> {
    let mut buffer = Cursor::new(Vec::new());
    image.write_to(&mut buffer, ImageFormat::Png)?;
    Ok(format!(
        "data:image/png;base64,{}",
        STANDARD.encode(buffer.into_inner())
    ))
}

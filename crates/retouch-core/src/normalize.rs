//! Color-mode normalization.
//!
//! Every image entering the dispatcher is first flattened to 3-channel RGB.
//! Sources with an alpha channel (RGBA, LumaA, and palette images, which the
//! decoder expands to RGBA) are composited onto an opaque white background
//! using the alpha channel as the blend mask. Anything else is a direct
//! channel remap with no blending.

use image::{DynamicImage, RgbImage};

/// Flatten a decoded image to guaranteed RGB.
///
/// Pure function of its input; runs unconditionally before any operation.
pub fn flatten_to_rgb(image: DynamicImage) -> RgbImage {
    match image {
        DynamicImage::ImageRgb8(rgb) => rgb,
        DynamicImage::ImageRgba8(rgba) => composite_on_white(&rgba),
        DynamicImage::ImageLumaA8(_)
        | DynamicImage::ImageRgba16(_)
        | DynamicImage::ImageLumaA16(_)
        | DynamicImage::ImageRgba32F(_) => composite_on_white(&image.to_rgba8()),
        // No alpha channel: lossless / best-effort remap.
        other => other.to_rgb8(),
    }
}

/// Composite an RGBA image onto an opaque white background.
///
/// Standard source-over with a fully opaque destination:
/// `out = white + alpha * (src - white)`, per channel.
fn composite_on_white(rgba: &image::RgbaImage) -> RgbImage {
    let (width, height) = rgba.dimensions();
    let mut out = Vec::with_capacity(width as usize * height as usize * 3);

    for px in rgba.pixels() {
        let [r, g, b, a] = px.0;
        let alpha = a as f32 / 255.0;
        out.push(blend_channel(r, alpha));
        out.push(blend_channel(g, alpha));
        out.push(blend_channel(b, alpha));
    }

    RgbImage::from_raw(width, height, out).expect("buffer sized from dimensions")
}

#[inline]
fn blend_channel(src: u8, alpha: f32) -> u8 {
    (255.0 + alpha * (src as f32 - 255.0)).round().clamp(0.0, 255.0) as u8
}

//! Enhancement multipliers: brightness, contrast, saturation, sharpness.
//!
//! Each enhancement interpolates every pixel between a "degenerate" image and
//! the original by the caller's factor: factor 1.0 is the identity, 0.0 is the
//! fully degenerate image, and values above 1.0 push past the original.
//!
//! Degenerate images per enhancement:
//! - brightness: solid black
//! - contrast: solid gray at the image's mean luminance
//! - saturation: the per-pixel luminance (grayscale)
//! - sharpness: the SMOOTH-filtered image

use super::convolve::{convolve, SMOOTH};
use image::RgbImage;

/// ITU-R 601 luma coefficients, matching 8-bit grayscale conversion.
#[inline]
pub(crate) fn luminance(r: f32, g: f32, b: f32) -> f32 {
    0.299 * r + 0.587 * g + 0.114 * b
}

#[inline]
fn clamp_u8(v: f32) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}

/// Scale luminance by `factor`. Factor 0.0 yields a black image.
pub fn brightness(image: &RgbImage, factor: f32) -> RgbImage {
    let mut out = image.clone();
    for v in out.iter_mut() {
        *v = clamp_u8(*v as f32 * factor);
    }
    out
}

/// Scale contrast by `factor`, pivoting around the image's mean luminance.
pub fn contrast(image: &RgbImage, factor: f32) -> RgbImage {
    let pixels = image.as_raw();
    let pixel_count = (image.width() as u64 * image.height() as u64).max(1);

    let mut total = 0.0f64;
    for chunk in pixels.chunks_exact(3) {
        total += luminance(chunk[0] as f32, chunk[1] as f32, chunk[2] as f32) as f64;
    }
    let mean = (total / pixel_count as f64).round() as f32;

    let mut out = image.clone();
    for v in out.iter_mut() {
        *v = clamp_u8(mean + (*v as f32 - mean) * factor);
    }
    out
}

/// Scale color saturation by `factor`. Factor 0.0 yields grayscale.
pub fn saturation(image: &RgbImage, factor: f32) -> RgbImage {
    let (width, height) = image.dimensions();
    let mut out = Vec::with_capacity(image.as_raw().len());

    for chunk in image.as_raw().chunks_exact(3) {
        let (r, g, b) = (chunk[0] as f32, chunk[1] as f32, chunk[2] as f32);
        let gray = luminance(r, g, b);
        out.push(clamp_u8(gray + (r - gray) * factor));
        out.push(clamp_u8(gray + (g - gray) * factor));
        out.push(clamp_u8(gray + (b - gray) * factor));
    }

    RgbImage::from_raw(width, height, out).expect("buffer sized from dimensions")
}

/// Scale sharpness by `factor`, interpolating between a smoothed copy and the
/// original. Factors above 1.0 sharpen, below 1.0 soften.
pub fn sharpness(image: &RgbImage, factor: f32) -> RgbImage {
    let smoothed = convolve(image, &SMOOTH);
    let mut out = image.clone();

    for (v, s) in out.iter_mut().zip(smoothed.as_raw().iter()) {
        let soft = *s as f32;
        *v = clamp_u8(soft + (*v as f32 - soft) * factor);
    }
    out
}

//! Geometric operations: rotation, resize, mirroring.
//!
//! Rotation uses inverse mapping: for each pixel in the output canvas we
//! compute which source location lands there and sample it bilinearly.
//! The canvas always expands to fit the rotated bounds; uncovered corners
//! fill with black. Exact right-angle rotations take a lossless fast path.

use image::imageops;
use image::RgbImage;

/// Compute the bounding box of an image rotated by `angle_degrees`.
///
/// For a rectangle rotated by θ the bounds are
/// `new_w = |w·cosθ| + |h·sinθ|`, `new_h = |w·sinθ| + |h·cosθ|`.
pub fn rotated_bounds(width: u32, height: u32, angle_degrees: f64) -> (u32, u32) {
    let angle_rad = angle_degrees.to_radians();
    let cos = angle_rad.cos().abs();
    let sin = angle_rad.sin().abs();

    let w = width as f64;
    let h = height as f64;

    let new_w = (w * cos + h * sin).round() as u32;
    let new_h = (w * sin + h * cos).round() as u32;

    (new_w.max(1), new_h.max(1))
}

/// Rotate counter-clockwise by whole degrees, expanding the canvas to fit.
pub fn rotate(image: &RgbImage, degrees: i64) -> RgbImage {
    // Lossless fast paths for right angles. Counter-clockwise 90 is the
    // same raster as clockwise 270.
    match degrees.rem_euclid(360) {
        0 => return image.clone(),
        90 => return imageops::rotate270(image),
        180 => return imageops::rotate180(image),
        270 => return imageops::rotate90(image),
        _ => {}
    }

    let angle_degrees = degrees as f64;
    let (src_w, src_h) = (image.width() as f64, image.height() as f64);
    let (dst_w, dst_h) = rotated_bounds(image.width(), image.height(), angle_degrees);

    // Negate for correct visual direction: positive input rotates the
    // content counter-clockwise.
    let angle_rad = -angle_degrees.to_radians();
    let cos = angle_rad.cos();
    let sin = angle_rad.sin();

    let src_cx = src_w / 2.0;
    let src_cy = src_h / 2.0;
    let dst_cx = dst_w as f64 / 2.0;
    let dst_cy = dst_h as f64 / 2.0;

    let mut out = vec![0u8; dst_w as usize * dst_h as usize * 3];

    for dst_y in 0..dst_h {
        for dst_x in 0..dst_w {
            let dx = dst_x as f64 - dst_cx;
            let dy = dst_y as f64 - dst_cy;

            // Inverse rotation maps the destination pixel back to source space.
            let src_x = dx * cos - dy * sin + src_cx;
            let src_y = dx * sin + dy * cos + src_cy;

            let pixel = sample_bilinear(image, src_x, src_y);
            let idx = (dst_y as usize * dst_w as usize + dst_x as usize) * 3;
            out[idx] = pixel[0];
            out[idx + 1] = pixel[1];
            out[idx + 2] = pixel[2];
        }
    }

    RgbImage::from_raw(dst_w, dst_h, out).expect("buffer sized from dimensions")
}

#[inline]
fn get_pixel_f64(image: &RgbImage, px: usize, py: usize) -> [f64; 3] {
    let idx = (py * image.width() as usize + px) * 3;
    let raw = image.as_raw();
    [raw[idx] as f64, raw[idx + 1] as f64, raw[idx + 2] as f64]
}

/// Sample a source location with bilinear interpolation; out-of-bounds
/// samples return black fill.
fn sample_bilinear(image: &RgbImage, x: f64, y: f64) -> [u8; 3] {
    let (w, h) = (image.width() as i64, image.height() as i64);

    if x < 0.0 || x >= (w - 1) as f64 || y < 0.0 || y >= (h - 1) as f64 {
        // Nearest-pixel fallback right on the outer edge, black beyond it.
        if x >= -0.5 && x < w as f64 - 0.5 && y >= -0.5 && y < h as f64 - 0.5 {
            let px = x.round().clamp(0.0, (w - 1) as f64) as usize;
            let py = y.round().clamp(0.0, (h - 1) as f64) as usize;
            let p = get_pixel_f64(image, px, py);
            return [p[0] as u8, p[1] as u8, p[2] as u8];
        }
        return [0, 0, 0];
    }

    let x0 = x.floor() as usize;
    let y0 = y.floor() as usize;
    let fx = x - x0 as f64;
    let fy = y - y0 as f64;

    let p00 = get_pixel_f64(image, x0, y0);
    let p10 = get_pixel_f64(image, x0 + 1, y0);
    let p01 = get_pixel_f64(image, x0, y0 + 1);
    let p11 = get_pixel_f64(image, x0 + 1, y0 + 1);

    let mut result = [0u8; 3];
    for c in 0..3 {
        let v = p00[c] * (1.0 - fx) * (1.0 - fy)
            + p10[c] * fx * (1.0 - fy)
            + p01[c] * (1.0 - fx) * fy
            + p11[c] * fx * fy;
        result[c] = v.clamp(0.0, 255.0).round() as u8;
    }
    result
}

/// Resize to exact dimensions with Lanczos3 resampling.
pub fn resize(image: &RgbImage, width: u32, height: u32) -> RgbImage {
    imageops::resize(image, width, height, imageops::FilterType::Lanczos3)
}

/// Mirror left-right.
pub fn flip_horizontal(image: &RgbImage) -> RgbImage {
    imageops::flip_horizontal(image)
}

/// Mirror top-bottom.
pub fn flip_vertical(image: &RgbImage) -> RgbImage {
    imageops::flip_vertical(image)
}

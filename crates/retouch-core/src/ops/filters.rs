//! Per-pixel color filters.
//!
//! Sepia and vintage are computed with explicit color-matrix math rather than
//! delegated to library filters; the rest are simple channel maps. Every
//! filter is a single pass over the pixel buffer producing a new image, with
//! no inter-pixel dependency.

use super::adjust::{luminance, saturation};
use image::RgbImage;

/// Sepia tone via the classic warm color matrix.
///
/// For each pixel:
/// ```text
/// r' = min(255, round(0.393r + 0.769g + 0.189b))
/// g' = min(255, round(0.349r + 0.686g + 0.168b))
/// b' = min(255, round(0.272r + 0.534g + 0.131b))
/// ```
/// Inputs are non-negative, so only the upper bound needs clamping.
pub fn sepia(image: &RgbImage) -> RgbImage {
    let (width, height) = image.dimensions();
    let mut out = Vec::with_capacity(image.as_raw().len());

    for chunk in image.as_raw().chunks_exact(3) {
        let (r, g, b) = (chunk[0] as f32, chunk[1] as f32, chunk[2] as f32);
        out.push(sepia_channel(0.393 * r + 0.769 * g + 0.189 * b));
        out.push(sepia_channel(0.349 * r + 0.686 * g + 0.168 * b));
        out.push(sepia_channel(0.272 * r + 0.534 * g + 0.131 * b));
    }

    RgbImage::from_raw(width, height, out).expect("buffer sized from dimensions")
}

#[inline]
fn sepia_channel(v: f32) -> u8 {
    v.round().min(255.0) as u8
}

/// Vintage effect: sepia tone with saturation pulled back to 80%.
pub fn vintage(image: &RgbImage) -> RgbImage {
    saturation(&sepia(image), 0.8)
}

/// Collapse to single-channel luminance, then back to three channels.
pub fn grayscale(image: &RgbImage) -> RgbImage {
    let (width, height) = image.dimensions();
    let mut out = Vec::with_capacity(image.as_raw().len());

    for chunk in image.as_raw().chunks_exact(3) {
        let l = luminance(chunk[0] as f32, chunk[1] as f32, chunk[2] as f32)
            .round()
            .min(255.0) as u8;
        out.extend_from_slice(&[l, l, l]);
    }

    RgbImage::from_raw(width, height, out).expect("buffer sized from dimensions")
}

/// Channel-wise negative.
pub fn invert(image: &RgbImage) -> RgbImage {
    let mut out = image.clone();
    for v in out.iter_mut() {
        *v = 255 - *v;
    }
    out
}

/// Reduce each channel to `bits` significant bits. Callers clamp to [2,8].
pub fn posterize(image: &RgbImage, bits: u8) -> RgbImage {
    let mask = 0xffu8 << (8 - bits.clamp(1, 8));
    let mut out = image.clone();
    for v in out.iter_mut() {
        *v &= mask;
    }
    out
}

/// Invert all channel values strictly above `threshold`.
pub fn solarize(image: &RgbImage, threshold: u8) -> RgbImage {
    let mut out = image.clone();
    for v in out.iter_mut() {
        if *v > threshold {
            *v = 255 - *v;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    fn solid(r: u8, g: u8, b: u8) -> RgbImage {
        RgbImage::from_pixel(3, 3, Rgb([r, g, b]))
    }

    #[test]
    fn test_sepia_known_pixel() {
        // (100, 100, 100): channels share the same input sum weights.
        let out = sepia(&solid(100, 100, 100));
        // r' = round(135.1), g' = round(120.3), b' = round(93.7)
        assert_eq!(out.get_pixel(0, 0), &Rgb([135, 120, 94]));
    }

    #[test]
    fn test_sepia_warms_gray_toward_red() {
        for v in [1u8, 64, 128, 200, 255] {
            let out = sepia(&solid(v, v, v));
            let Rgb([r, g, b]) = *out.get_pixel(1, 1);
            assert!(g <= r, "g {} > r {} for input {}", g, r, v);
            assert!(b <= g, "b {} > g {} for input {}", b, g, v);
        }
    }

    #[test]
    fn test_sepia_clamps_bright_input() {
        let out = sepia(&solid(255, 255, 255));
        // r and g sums exceed 255 and clamp; b stays below.
        assert_eq!(out.get_pixel(0, 0), &Rgb([255, 255, 239]));
    }

    #[test]
    fn test_sepia_black_stays_black() {
        let out = sepia(&solid(0, 0, 0));
        assert_eq!(out.get_pixel(0, 0), &Rgb([0, 0, 0]));
    }

    #[test]
    fn test_sepia_twice_is_deterministic() {
        // Not a fixed point, but repeatable: same input, same output.
        let img = solid(90, 140, 60);
        let once = sepia(&img);
        let twice_a = sepia(&once);
        let twice_b = sepia(&sepia(&img));
        assert_eq!(twice_a, twice_b);
        assert_ne!(once, twice_a);
    }

    #[test]
    fn test_vintage_is_desaturated_sepia() {
        let img = solid(200, 80, 40);
        let sep = sepia(&img);
        let vin = vintage(&img);
        let Rgb([sr, _, sb]) = *sep.get_pixel(0, 0);
        let Rgb([vr, _, vb]) = *vin.get_pixel(0, 0);
        // Channel spread narrows when saturation drops to 80%.
        assert!(
            (vr as i32 - vb as i32).abs() < (sr as i32 - sb as i32).abs(),
            "vintage should be less saturated than sepia"
        );
    }

    #[test]
    fn test_grayscale_equalizes_channels() {
        let out = grayscale(&solid(200, 100, 50));
        let Rgb([r, g, b]) = *out.get_pixel(0, 0);
        assert_eq!(r, g);
        assert_eq!(g, b);
        // ITU-R 601: 0.299*200 + 0.587*100 + 0.114*50 = 124.2
        assert_eq!(r, 124);
    }

    #[test]
    fn test_invert_is_involution() {
        let img = solid(10, 128, 250);
        assert_eq!(invert(&invert(&img)), img);
        assert_eq!(invert(&img).get_pixel(0, 0), &Rgb([245, 127, 5]));
    }

    #[test]
    fn test_grayscale_invert_order_matters() {
        // Documented as expected: chained requests are order-sensitive.
        let img = solid(200, 100, 50);
        let a = invert(&grayscale(&img));
        let b = grayscale(&invert(&img));
        assert_ne!(a, b);
    }

    #[test]
    fn test_posterize_two_bits() {
        let out = posterize(&solid(200, 100, 50), 2);
        // Top two bits only: 200 -> 192, 100 -> 64, 50 -> 0.
        assert_eq!(out.get_pixel(0, 0), &Rgb([192, 64, 0]));
    }

    #[test]
    fn test_posterize_eight_bits_is_identity() {
        let img = solid(201, 99, 57);
        assert_eq!(posterize(&img, 8), img);
    }

    #[test]
    fn test_solarize_inverts_above_threshold() {
        let out = solarize(&solid(200, 100, 50), 128);
        assert_eq!(out.get_pixel(0, 0), &Rgb([55, 100, 50]));
    }

    #[test]
    fn test_solarize_threshold_boundary() {
        // Exactly at threshold is not inverted; one above is.
        let out = solarize(&solid(128, 129, 0), 128);
        assert_eq!(out.get_pixel(0, 0), &Rgb([128, 126, 0]));
    }

    #[test]
    fn test_solarize_zero_threshold_inverts_everything_nonzero() {
        let out = solarize(&solid(1, 0, 255), 0);
        assert_eq!(out.get_pixel(0, 0), &Rgb([254, 0, 0]));
    }
}

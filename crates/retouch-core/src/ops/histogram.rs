//! Histogram-driven auto enhancements.
//!
//! Both operations work per channel through a 256-entry lookup table:
//! auto-contrast stretches the occupied value range linearly to [0,255],
//! equalize redistributes values so the cumulative histogram is as flat as
//! integer math allows.

use image::RgbImage;

/// Per-channel histograms of an RGB image.
fn channel_histograms(image: &RgbImage) -> [[u32; 256]; 3] {
    let mut hist = [[0u32; 256]; 3];
    for chunk in image.as_raw().chunks_exact(3) {
        hist[0][chunk[0] as usize] += 1;
        hist[1][chunk[1] as usize] += 1;
        hist[2][chunk[2] as usize] += 1;
    }
    hist
}

/// Apply one lookup table per channel in a single pass.
fn apply_luts(image: &RgbImage, luts: &[[u8; 256]; 3]) -> RgbImage {
    let (width, height) = image.dimensions();
    let mut out = Vec::with_capacity(image.as_raw().len());
    for chunk in image.as_raw().chunks_exact(3) {
        out.push(luts[0][chunk[0] as usize]);
        out.push(luts[1][chunk[1] as usize]);
        out.push(luts[2][chunk[2] as usize]);
    }
    RgbImage::from_raw(width, height, out).expect("buffer sized from dimensions")
}

const IDENTITY_LUT: [u8; 256] = {
    let mut lut = [0u8; 256];
    let mut i = 0;
    while i < 256 {
        lut[i] = i as u8;
        i += 1;
    }
    lut
};

/// Stretch each channel's occupied range to the full [0,255] interval.
///
/// Channels that occupy a single value (or are empty) pass through unchanged.
pub fn auto_contrast(image: &RgbImage) -> RgbImage {
    let hist = channel_histograms(image);
    let mut luts = [IDENTITY_LUT; 3];

    for (c, channel_hist) in hist.iter().enumerate() {
        let lo = channel_hist.iter().position(|&n| n > 0);
        let hi = channel_hist.iter().rposition(|&n| n > 0);
        let (Some(lo), Some(hi)) = (lo, hi) else {
            continue;
        };
        if hi <= lo {
            continue;
        }

        let scale = 255.0 / (hi - lo) as f64;
        for (i, entry) in luts[c].iter_mut().enumerate() {
            let v = (i as f64 - lo as f64) * scale;
            *entry = v.round().clamp(0.0, 255.0) as u8;
        }
    }

    apply_luts(image, &luts)
}

/// Histogram equalization per channel.
///
/// The lookup table is built from the running cumulative histogram with a
/// half-step bias, so a channel whose pixel count does not divide evenly
/// still spreads across the full range.
pub fn equalize(image: &RgbImage) -> RgbImage {
    let hist = channel_histograms(image);
    let mut luts = [IDENTITY_LUT; 3];

    for (c, channel_hist) in hist.iter().enumerate() {
        let occupied: Vec<u64> = channel_hist
            .iter()
            .filter(|&&n| n > 0)
            .map(|&n| n as u64)
            .collect();
        if occupied.len() <= 1 {
            continue;
        }

        let step = (occupied.iter().sum::<u64>() - occupied.last().copied().unwrap_or(0)) / 255;
        if step == 0 {
            continue;
        }

        let mut n = step / 2;
        for (i, entry) in luts[c].iter_mut().enumerate() {
            *entry = (n / step).min(255) as u8;
            n += channel_hist[i] as u64;
        }
    }

    apply_luts(image, &luts)
}

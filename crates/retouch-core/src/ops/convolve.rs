//! Fixed convolution-kernel filters.
//!
//! Each filter is a square kernel with an integer divisor and offset:
//! `out = sum(coeff * src) / divisor + offset`, clamped to [0,255] per
//! channel. Border pixels (where the kernel would fall off the image) are
//! copied from the source unfiltered, so output dimensions always match the
//! input.

use image::RgbImage;

/// A fixed square convolution kernel.
#[derive(Debug, Clone, Copy)]
pub struct Kernel {
    /// Side length, 3 or 5.
    pub size: usize,
    /// Row-major coefficients, `size * size` entries.
    pub coeffs: &'static [i32],
    pub divisor: i32,
    pub offset: i32,
}

pub const EMBOSS: Kernel = Kernel {
    size: 3,
    coeffs: &[-1, 0, 0, 0, 1, 0, 0, 0, 0],
    divisor: 1,
    offset: 128,
};

pub const EDGE_ENHANCE: Kernel = Kernel {
    size: 3,
    coeffs: &[-1, -1, -1, -1, 10, -1, -1, -1, -1],
    divisor: 2,
    offset: 0,
};

pub const EDGE_ENHANCE_MORE: Kernel = Kernel {
    size: 3,
    coeffs: &[-1, -1, -1, -1, 9, -1, -1, -1, -1],
    divisor: 1,
    offset: 0,
};

pub const FIND_EDGES: Kernel = Kernel {
    size: 3,
    coeffs: &[-1, -1, -1, -1, 8, -1, -1, -1, -1],
    divisor: 1,
    offset: 0,
};

/// Same kernel as FIND_EDGES but biased to white, tracing dark outlines.
pub const CONTOUR: Kernel = Kernel {
    size: 3,
    coeffs: &[-1, -1, -1, -1, 8, -1, -1, -1, -1],
    divisor: 1,
    offset: 255,
};

pub const DETAIL: Kernel = Kernel {
    size: 3,
    coeffs: &[0, -1, 0, -1, 10, -1, 0, -1, 0],
    divisor: 6,
    offset: 0,
};

pub const SHARPEN: Kernel = Kernel {
    size: 3,
    coeffs: &[-2, -2, -2, -2, 32, -2, -2, -2, -2],
    divisor: 16,
    offset: 0,
};

pub const SMOOTH: Kernel = Kernel {
    size: 3,
    coeffs: &[1, 1, 1, 1, 5, 1, 1, 1, 1],
    divisor: 13,
    offset: 0,
};

#[rustfmt::skip]
pub const SMOOTH_MORE: Kernel = Kernel {
    size: 5,
    coeffs: &[
        1, 1,  1, 1, 1,
        1, 5,  5, 5, 1,
        1, 5, 44, 5, 1,
        1, 5,  5, 5, 1,
        1, 1,  1, 1, 1,
    ],
    divisor: 100,
    offset: 0,
};

/// Convolve an RGB image with a fixed kernel, producing a new image.
pub fn convolve(image: &RgbImage, kernel: &Kernel) -> RgbImage {
    debug_assert_eq!(kernel.coeffs.len(), kernel.size * kernel.size);

    let (width, height) = image.dimensions();
    let radius = kernel.size / 2;
    let src = image.as_raw();

    // Border pixels keep their source values.
    let mut out = src.clone();

    if (width as usize) >= kernel.size && (height as usize) >= kernel.size {
        let row_stride = width as usize * 3;
        for y in radius..(height as usize - radius) {
            for x in radius..(width as usize - radius) {
                let mut acc = [0i32; 3];
                for ky in 0..kernel.size {
                    for kx in 0..kernel.size {
                        let coeff = kernel.coeffs[ky * kernel.size + kx];
                        let idx = (y + ky - radius) * row_stride + (x + kx - radius) * 3;
                        acc[0] += coeff * src[idx] as i32;
                        acc[1] += coeff * src[idx + 1] as i32;
                        acc[2] += coeff * src[idx + 2] as i32;
                    }
                }
                let dst = y * row_stride + x * 3;
                for c in 0..3 {
                    out[dst + c] = (acc[c] / kernel.divisor + kernel.offset).clamp(0, 255) as u8;
                }
            }
        }
    }

    RgbImage::from_raw(width, height, out).expect("buffer sized from dimensions")
}

/// Unsharp mask with the engine's fixed parameters: Gaussian radius 2,
/// amount 150%, threshold 3.
///
/// Channels that differ from their blurred counterpart by more than the
/// threshold are pushed away from it by the amount; others pass through,
/// which keeps smooth regions free of halo noise.
pub fn unsharp_mask(image: &RgbImage) -> RgbImage {
    const RADIUS: f32 = 2.0;
    const AMOUNT: f32 = 1.5;
    const THRESHOLD: i32 = 3;

    let blurred = image::imageops::blur(image, RADIUS);
    let mut out = image.clone();

    for (v, b) in out.iter_mut().zip(blurred.as_raw().iter()) {
        let diff = *v as i32 - *b as i32;
        if diff.abs() > THRESHOLD {
            let sharpened = *v as f32 + AMOUNT * diff as f32;
            *v = sharpened.round().clamp(0.0, 255.0) as u8;
        }
    }

    out
}

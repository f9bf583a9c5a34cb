//! The fixed operation set and its dispatcher.
//!
//! Dispatch is a pure lookup: an operation name resolves to one [`Operation`]
//! variant, each variant validates its own parameter, and applying it maps
//! one RGB image to a new RGB image. Operations are not composable within a
//! single request; callers chain edits by issuing sequential requests.

mod adjust;
mod convolve;
mod filters;
mod geometry;
mod histogram;

pub use adjust::{brightness, contrast, saturation, sharpness};
pub use convolve::{
    convolve, unsharp_mask, Kernel, CONTOUR, DETAIL, EDGE_ENHANCE, EDGE_ENHANCE_MORE, EMBOSS,
    FIND_EDGES, SHARPEN, SMOOTH, SMOOTH_MORE,
};
pub use filters::{grayscale, invert, posterize, sepia, solarize, vintage};
pub use geometry::{flip_horizontal, flip_vertical, resize, rotate};
pub use histogram::{auto_contrast, equalize};

use crate::error::TransformError;
use image::RgbImage;
use serde::{Deserialize, Serialize};

/// The loosely-typed `value` field of a transform request.
///
/// JSON numbers deserialize as `Int` when integral, `Float` otherwise;
/// strings as `Text`; `null` or a missing field as `Absent`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OpValue {
    Int(i64),
    Float(f64),
    Text(String),
    #[default]
    Absent,
}

impl OpValue {
    /// Coerce to a float multiplier/radius.
    ///
    /// An absent value falls back to 0.0, matching the request contract's
    /// default parameter.
    fn to_f32(&self, op: &Operation) -> Result<f32, TransformError> {
        match self {
            OpValue::Int(i) => Ok(*i as f32),
            OpValue::Float(f) => Ok(*f as f32),
            OpValue::Text(s) => s.trim().parse::<f32>().map_err(|_| {
                TransformError::InvalidParameter(format!(
                    "{} expects a numeric value, got {:?}",
                    op.name(),
                    s
                ))
            }),
            OpValue::Absent => Ok(0.0),
        }
    }

    /// Coerce to an integer, truncating fractional values.
    fn to_i64(&self, op: &Operation) -> Result<i64, TransformError> {
        match self {
            OpValue::Int(i) => Ok(*i),
            OpValue::Float(f) => Ok(f.trunc() as i64),
            OpValue::Text(s) => s.trim().parse::<i64>().map_err(|_| {
                TransformError::InvalidParameter(format!(
                    "{} expects an integer value, got {:?}",
                    op.name(),
                    s
                ))
            }),
            OpValue::Absent => Ok(0),
        }
    }

    /// Parse a `"WIDTHxHEIGHT"` resize spec into positive dimensions.
    fn to_dimensions(&self) -> Result<(u32, u32), TransformError> {
        let malformed = || {
            TransformError::InvalidParameter(
                "Invalid resize format. Use WIDTHxHEIGHT".to_string(),
            )
        };

        let OpValue::Text(spec) = self else {
            return Err(malformed());
        };
        let (w, h) = spec.split_once('x').ok_or_else(malformed)?;
        let width: u32 = w.trim().parse().map_err(|_| malformed())?;
        let height: u32 = h.trim().parse().map_err(|_| malformed())?;
        if width == 0 || height == 0 {
            return Err(malformed());
        }
        Ok((width, height))
    }
}

/// The fixed set of transform operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Rotate,
    Brightness,
    Contrast,
    Saturation,
    Sharpness,
    Blur,
    Resize,
    Grayscale,
    Sepia,
    Vintage,
    Invert,
    Posterize,
    Solarize,
    Emboss,
    EdgeEnhance,
    EdgeEnhanceMore,
    FindEdges,
    Contour,
    Detail,
    Sharpen,
    Smooth,
    SmoothMore,
    UnsharpMask,
    FlipHorizontal,
    FlipVertical,
    AutoContrast,
    Equalize,
}

impl Operation {
    /// Resolve a request's operation name. Unrecognized names are rejected
    /// here, before any pixel work happens.
    pub fn from_name(name: &str) -> Option<Operation> {
        let op = match name {
            "rotate" => Operation::Rotate,
            "brightness" => Operation::Brightness,
            "contrast" => Operation::Contrast,
            "saturation" => Operation::Saturation,
            "sharpness" => Operation::Sharpness,
            "blur" => Operation::Blur,
            "resize" => Operation::Resize,
            "grayscale" => Operation::Grayscale,
            "sepia" => Operation::Sepia,
            "vintage" => Operation::Vintage,
            "invert" => Operation::Invert,
            "posterize" => Operation::Posterize,
            "solarize" => Operation::Solarize,
            "emboss" => Operation::Emboss,
            "edge_enhance" => Operation::EdgeEnhance,
            "edge_enhance_more" => Operation::EdgeEnhanceMore,
            "find_edges" => Operation::FindEdges,
            "contour" => Operation::Contour,
            "detail" => Operation::Detail,
            "sharpen" => Operation::Sharpen,
            "smooth" => Operation::Smooth,
            "smooth_more" => Operation::SmoothMore,
            "unsharp_mask" => Operation::UnsharpMask,
            "flip_horizontal" => Operation::FlipHorizontal,
            "flip_vertical" => Operation::FlipVertical,
            "auto_contrast" => Operation::AutoContrast,
            "equalize" => Operation::Equalize,
            _ => return None,
        };
        Some(op)
    }

    /// The wire name of this operation.
    pub fn name(&self) -> &'static str {
        match self {
            Operation::Rotate => "rotate",
            Operation::Brightness => "brightness",
            Operation::Contrast => "contrast",
            Operation::Saturation => "saturation",
            Operation::Sharpness => "sharpness",
            Operation::Blur => "blur",
            Operation::Resize => "resize",
            Operation::Grayscale => "grayscale",
            Operation::Sepia => "sepia",
            Operation::Vintage => "vintage",
            Operation::Invert => "invert",
            Operation::Posterize => "posterize",
            Operation::Solarize => "solarize",
            Operation::Emboss => "emboss",
            Operation::EdgeEnhance => "edge_enhance",
            Operation::EdgeEnhanceMore => "edge_enhance_more",
            Operation::FindEdges => "find_edges",
            Operation::Contour => "contour",
            Operation::Detail => "detail",
            Operation::Sharpen => "sharpen",
            Operation::Smooth => "smooth",
            Operation::SmoothMore => "smooth_more",
            Operation::UnsharpMask => "unsharp_mask",
            Operation::FlipHorizontal => "flip_horizontal",
            Operation::FlipVertical => "flip_vertical",
            Operation::AutoContrast => "auto_contrast",
            Operation::Equalize => "equalize",
        }
    }

    /// Apply this operation to a normalized RGB image.
    ///
    /// Each arm validates the parameter for its entry, then produces a new
    /// image; the input is never partially mutated.
    pub fn apply(&self, image: &RgbImage, value: &OpValue) -> Result<RgbImage, TransformError> {
        let out = match self {
            Operation::Rotate => rotate(image, value.to_i64(self)?),
            Operation::Brightness => brightness(image, value.to_f32(self)?),
            Operation::Contrast => contrast(image, value.to_f32(self)?),
            Operation::Saturation => saturation(image, value.to_f32(self)?),
            Operation::Sharpness => sharpness(image, value.to_f32(self)?),
            Operation::Blur => {
                let radius = value.to_f32(self)?;
                if radius > 0.0 {
                    image::imageops::blur(image, radius)
                } else {
                    image.clone()
                }
            }
            Operation::Resize => {
                let (width, height) = value.to_dimensions()?;
                resize(image, width, height)
            }
            Operation::Grayscale => grayscale(image),
            Operation::Sepia => sepia(image),
            Operation::Vintage => vintage(image),
            Operation::Invert => invert(image),
            Operation::Posterize => {
                // Out-of-range bit counts are silently clamped, not rejected.
                let bits = value.to_i64(self)?.clamp(2, 8) as u8;
                posterize(image, bits)
            }
            Operation::Solarize => {
                let threshold = value.to_i64(self)?.clamp(0, 255) as u8;
                solarize(image, threshold)
            }
            Operation::Emboss => convolve(image, &EMBOSS),
            Operation::EdgeEnhance => convolve(image, &EDGE_ENHANCE),
            Operation::EdgeEnhanceMore => convolve(image, &EDGE_ENHANCE_MORE),
            Operation::FindEdges => convolve(image, &FIND_EDGES),
            Operation::Contour => convolve(image, &CONTOUR),
            Operation::Detail => convolve(image, &DETAIL),
            Operation::Sharpen => convolve(image, &SHARPEN),
            Operation::Smooth => convolve(image, &SMOOTH),
            Operation::SmoothMore => convolve(image, &SMOOTH_MORE),
            Operation::UnsharpMask => unsharp_mask(image),
            Operation::FlipHorizontal => flip_horizontal(image),
            Operation::FlipVertical => flip_vertical(image),
            Operation::AutoContrast => auto_contrast(image),
            Operation::Equalize => equalize(image),
        };
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    fn gradient(width: u32, height: u32) -> RgbImage {
        RgbImage::from_fn(width, height, |x, y| {
            Rgb([(x * 7 % 256) as u8, (y * 11 % 256) as u8, ((x + y) % 256) as u8])
        })
    }

    #[test]
    fn test_all_names_round_trip() {
        let names = [
            "rotate",
            "brightness",
            "contrast",
            "saturation",
            "sharpness",
            "blur",
            "resize",
            "grayscale",
            "sepia",
            "vintage",
            "invert",
            "posterize",
            "solarize",
            "emboss",
            "edge_enhance",
            "edge_enhance_more",
            "find_edges",
            "contour",
            "detail",
            "sharpen",
            "smooth",
            "smooth_more",
            "unsharp_mask",
            "flip_horizontal",
            "flip_vertical",
            "auto_contrast",
            "equalize",
        ];
        for name in names {
            let op = Operation::from_name(name).unwrap_or_else(|| panic!("missing {}", name));
            assert_eq!(op.name(), name);
        }
    }

    #[test]
    fn test_unknown_name_rejected() {
        assert!(Operation::from_name("melt").is_none());
        assert!(Operation::from_name("").is_none());
        assert!(Operation::from_name("Sepia").is_none());
    }

    #[test]
    fn test_resize_applies_exact_dimensions() {
        let img = gradient(40, 30);
        let value = OpValue::Text("100x50".to_string());
        let out = Operation::Resize.apply(&img, &value).unwrap();
        assert_eq!(out.dimensions(), (100, 50));
    }

    #[test]
    fn test_resize_rejects_malformed_value() {
        let img = gradient(10, 10);
        for bad in ["abc", "100", "100x", "x50", "0x50", "100x0", "3.5x2"] {
            let result = Operation::Resize.apply(&img, &OpValue::Text(bad.to_string()));
            assert!(
                matches!(result, Err(TransformError::InvalidParameter(_))),
                "{:?} should be rejected",
                bad
            );
        }
    }

    #[test]
    fn test_resize_rejects_numeric_value() {
        let img = gradient(10, 10);
        let result = Operation::Resize.apply(&img, &OpValue::Int(100));
        assert!(matches!(result, Err(TransformError::InvalidParameter(_))));
    }

    #[test]
    fn test_posterize_clamps_out_of_range_bits() {
        let img = gradient(8, 8);
        // 20 clamps to 8 bits: identity.
        let unchanged = Operation::Posterize.apply(&img, &OpValue::Int(20)).unwrap();
        assert_eq!(unchanged, img);
        // 0 clamps to 2 bits: same as asking for 2 directly.
        let clamped = Operation::Posterize.apply(&img, &OpValue::Int(0)).unwrap();
        let two_bits = Operation::Posterize.apply(&img, &OpValue::Int(2)).unwrap();
        assert_eq!(clamped, two_bits);
    }

    #[test]
    fn test_solarize_clamps_threshold() {
        let img = gradient(8, 8);
        let high = Operation::Solarize.apply(&img, &OpValue::Int(999)).unwrap();
        let max = Operation::Solarize.apply(&img, &OpValue::Int(255)).unwrap();
        assert_eq!(high, max);
    }

    #[test]
    fn test_rotate_truncates_float_degrees() {
        let img = gradient(10, 10);
        let a = Operation::Rotate.apply(&img, &OpValue::Float(90.7)).unwrap();
        let b = Operation::Rotate.apply(&img, &OpValue::Int(90)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_numeric_text_accepted_for_floats() {
        let img = gradient(10, 10);
        let a = Operation::Brightness
            .apply(&img, &OpValue::Text("1.5".to_string()))
            .unwrap();
        let b = Operation::Brightness.apply(&img, &OpValue::Float(1.5)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_non_numeric_text_rejected_for_floats() {
        let img = gradient(10, 10);
        let result = Operation::Brightness.apply(&img, &OpValue::Text("bright".to_string()));
        assert!(matches!(result, Err(TransformError::InvalidParameter(_))));
    }

    #[test]
    fn test_blur_zero_radius_is_identity() {
        let img = gradient(10, 10);
        let out = Operation::Blur.apply(&img, &OpValue::Absent).unwrap();
        assert_eq!(out, img);
    }

    #[test]
    fn test_parameterless_ops_ignore_value() {
        let img = gradient(10, 10);
        let a = Operation::Sepia.apply(&img, &OpValue::Absent).unwrap();
        let b = Operation::Sepia.apply(&img, &OpValue::Int(42)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_every_operation_produces_valid_image() {
        let img = gradient(16, 12);
        let cases: Vec<(Operation, OpValue)> = vec![
            (Operation::Rotate, OpValue::Int(45)),
            (Operation::Brightness, OpValue::Float(1.2)),
            (Operation::Contrast, OpValue::Float(0.8)),
            (Operation::Saturation, OpValue::Float(1.5)),
            (Operation::Sharpness, OpValue::Float(2.0)),
            (Operation::Blur, OpValue::Float(1.5)),
            (Operation::Resize, OpValue::Text("8x6".to_string())),
            (Operation::Grayscale, OpValue::Absent),
            (Operation::Sepia, OpValue::Absent),
            (Operation::Vintage, OpValue::Absent),
            (Operation::Invert, OpValue::Absent),
            (Operation::Posterize, OpValue::Int(4)),
            (Operation::Solarize, OpValue::Int(128)),
            (Operation::Emboss, OpValue::Absent),
            (Operation::EdgeEnhance, OpValue::Absent),
            (Operation::EdgeEnhanceMore, OpValue::Absent),
            (Operation::FindEdges, OpValue::Absent),
            (Operation::Contour, OpValue::Absent),
            (Operation::Detail, OpValue::Absent),
            (Operation::Sharpen, OpValue::Absent),
            (Operation::Smooth, OpValue::Absent),
            (Operation::SmoothMore, OpValue::Absent),
            (Operation::UnsharpMask, OpValue::Absent),
            (Operation::FlipHorizontal, OpValue::Absent),
            (Operation::FlipVertical, OpValue::Absent),
            (Operation::AutoContrast, OpValue::Absent),
            (Operation::Equalize, OpValue::Absent),
        ];
        for (op, value) in cases {
            let out = op
                .apply(&img, &value)
                .unwrap_or_else(|e| panic!("{} failed: {}", op.name(), e));
            assert!(out.width() > 0 && out.height() > 0, "{} emptied", op.name());
        }
    }

    #[test]
    fn test_op_value_deserializes_untagged() {
        assert_eq!(serde_json::from_str::<OpValue>("3").unwrap(), OpValue::Int(3));
        assert_eq!(
            serde_json::from_str::<OpValue>("1.5").unwrap(),
            OpValue::Float(1.5)
        );
        assert_eq!(
            serde_json::from_str::<OpValue>("\"100x50\"").unwrap(),
            OpValue::Text("100x50".to_string())
        );
        assert_eq!(serde_json::from_str::<OpValue>("null").unwrap(), OpValue::Absent);
    }
}

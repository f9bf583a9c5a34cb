//! Error taxonomy for the transform engine.

use thiserror::Error;

/// Errors produced while handling a single transform request.
///
/// Every variant is recoverable at the request boundary; a failed transform
/// never touches the source file.
#[derive(Debug, Error)]
pub enum TransformError {
    /// The request did not name a source image.
    #[error("No filename provided")]
    NoFilename,

    /// The named source image does not exist in the store.
    #[error("File not found: {0}")]
    FileNotFound(String),

    /// The operation name is not in the fixed operation set.
    #[error("Unknown operation: {0}")]
    UnknownOperation(String),

    /// The operation was recognized but its parameter was malformed.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Decode, transform, or encode failed for any other reason.
    #[error("Edit operation failed: {0}")]
    Processing(String),
}

impl TransformError {
    /// Stable machine-readable kind for the structured failure response.
    pub fn kind(&self) -> &'static str {
        match self {
            TransformError::NoFilename => "no_filename",
            TransformError::FileNotFound(_) => "file_not_found",
            TransformError::UnknownOperation(_) => "unknown_operation",
            TransformError::InvalidParameter(_) => "invalid_parameter",
            TransformError::Processing(_) => "processing_error",
        }
    }
}

impl From<image::ImageError> for TransformError {
    fn from(err: image::ImageError) -> Self {
        TransformError::Processing(err.to_string())
    }
}

impl From<std::io::Error> for TransformError {
    fn from(err: std::io::Error) -> Self {
        TransformError::Processing(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = TransformError::UnknownOperation("melt".to_string());
        assert_eq!(err.to_string(), "Unknown operation: melt");

        let err = TransformError::FileNotFound("photo.jpg".to_string());
        assert_eq!(err.to_string(), "File not found: photo.jpg");
    }

    #[test]
    fn test_error_kinds_are_stable() {
        assert_eq!(TransformError::NoFilename.kind(), "no_filename");
        assert_eq!(
            TransformError::InvalidParameter("x".into()).kind(),
            "invalid_parameter"
        );
        assert_eq!(
            TransformError::Processing("boom".into()).kind(),
            "processing_error"
        );
    }
}

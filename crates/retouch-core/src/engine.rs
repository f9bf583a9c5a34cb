//! The transform engine: one request in, one edited image out.
//!
//! Each request is independent and stateless; the only shared state is the
//! storage gate. A request reads one named blob, transforms it fully in
//! memory, and writes one new blob; the source is never modified, and a
//! failed request writes nothing.

use crate::encode::{edited_filename, encode_for_name, png_preview_data_uri};
use crate::error::TransformError;
use crate::normalize::flatten_to_rgb;
use crate::ops::{OpValue, Operation};
use crate::storage::{ImageStore, StoreError};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

/// A single transform request.
#[derive(Debug, Clone, Deserialize)]
pub struct EditRequest {
    /// Name of a previously stored source image.
    pub filename: Option<String>,
    /// Operation name; must be in the fixed set.
    pub operation: String,
    /// Operation parameter; type depends on the operation.
    #[serde(default)]
    pub value: OpValue,
}

/// The successful result of a transform request.
#[derive(Debug, Clone, Serialize)]
pub struct EditOutcome {
    /// Name the edited image was stored under.
    pub edited_filename: String,
    /// Lossless PNG preview as a `data:image/png;base64,` URI.
    pub preview: String,
    /// Echo of the operation that ran.
    pub operation_applied: String,
}

/// Transform engine over a storage gate.
#[derive(Debug)]
pub struct TransformEngine<S> {
    store: S,
}

impl<S: ImageStore> TransformEngine<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Run one transform request end to end.
    ///
    /// The operation name is resolved before any bytes are read or decoded,
    /// so unrecognized operations never touch pixel data.
    pub fn edit(&self, request: &EditRequest) -> Result<EditOutcome, TransformError> {
        let filename = request
            .filename
            .as_deref()
            .filter(|name| !name.is_empty())
            .ok_or(TransformError::NoFilename)?;

        let operation = Operation::from_name(&request.operation)
            .ok_or_else(|| TransformError::UnknownOperation(request.operation.clone()))?;

        let source_bytes = self.store.read(filename).map_err(read_error)?;
        let decoded = image::load_from_memory(&source_bytes)?;
        let normalized = flatten_to_rgb(decoded);

        let transformed = operation.apply(&normalized, &request.value)?;

        // Both artifacts are encoded before the write, so any encoding
        // failure leaves the store untouched. The preview comes from the
        // same in-memory image, never from a re-read of the persisted file.
        let edited_name = edited_filename(filename, unix_timestamp());
        let encoded = encode_for_name(&transformed, &edited_name)?;
        let preview = png_preview_data_uri(&transformed)?;

        self.store
            .write(&edited_name, &encoded)
            .map_err(|err| TransformError::Processing(err.to_string()))?;

        Ok(EditOutcome {
            edited_filename: edited_name,
            preview,
            operation_applied: operation.name().to_string(),
        })
    }
}

fn read_error(err: StoreError) -> TransformError {
    match err {
        StoreError::NotFound(name) | StoreError::InvalidName(name) => {
            TransformError::FileNotFound(name)
        }
        StoreError::Io(io) => TransformError::Processing(io.to_string()),
    }
}

fn unix_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

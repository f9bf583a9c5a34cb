//! Retouch Core - Image transform engine
//!
//! This crate implements the transform pipeline behind Retouch's image
//! editor: color-mode normalization, the fixed operation set with per-entry
//! parameter validation, the custom sepia/vintage pixel filters, and the
//! output encoding that produces both a persisted file and a lossless
//! inline preview.
//!
//! A request flows Color Normalizer → Operation Dispatcher → Output
//! Encoder; the storage gate abstracts the filesystem so the pipeline can
//! run against an in-memory fake in tests.

pub mod encode;
pub mod engine;
pub mod error;
pub mod normalize;
pub mod ops;
pub mod storage;

pub use engine::{EditOutcome, EditRequest, TransformEngine};
pub use error::TransformError;
pub use normalize::flatten_to_rgb;
pub use ops::{OpValue, Operation};
pub use storage::{FsStore, ImageStore, MemStore, StoreError};

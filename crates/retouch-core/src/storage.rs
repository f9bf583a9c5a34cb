//! Storage gate for image bytes.
//!
//! The engine never touches filesystem paths directly; it reads and writes
//! named blobs through [`ImageStore`]. The production implementation is a
//! rooted directory with atomic writes; tests use the in-memory fake.

use std::collections::HashMap;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Mutex;
use thiserror::Error;

/// Errors from the storage gate.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No blob stored under this name.
    #[error("not found: {0}")]
    NotFound(String),

    /// The name is empty or tries to escape the store.
    #[error("invalid name: {0}")]
    InvalidName(String),

    /// Underlying I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Named blob storage for source and edited images.
pub trait ImageStore: Send + Sync {
    /// Fetch the bytes stored under `name`.
    fn read(&self, name: &str) -> Result<Vec<u8>, StoreError>;

    /// Store `bytes` under `name`, replacing any previous blob. The new
    /// blob must become visible atomically: a failed write never leaves a
    /// partial file readable.
    fn write(&self, name: &str, bytes: &[u8]) -> Result<(), StoreError>;
}

/// Filesystem store rooted at a single directory.
#[derive(Debug)]
pub struct FsStore {
    root: PathBuf,
}

impl FsStore {
    /// Open a store rooted at `root`, creating the directory if needed.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let root = root.into();
        std::fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    /// The directory backing this store.
    pub fn root(&self) -> &std::path::Path {
        &self.root
    }

    fn resolve(&self, name: &str) -> Result<PathBuf, StoreError> {
        // Names are flat: no separators, no traversal.
        if name.is_empty() || name.contains(['/', '\\']) || name.contains("..") {
            return Err(StoreError::InvalidName(name.to_string()));
        }
        Ok(self.root.join(name))
    }
}

impl ImageStore for FsStore {
    fn read(&self, name: &str) -> Result<Vec<u8>, StoreError> {
        let path = self.resolve(name)?;
        std::fs::read(&path).map_err(|err| {
            if err.kind() == std::io::ErrorKind::NotFound {
                StoreError::NotFound(name.to_string())
            } else {
                StoreError::Io(err)
            }
        })
    }

    fn write(&self, name: &str, bytes: &[u8]) -> Result<(), StoreError> {
        let path = self.resolve(name)?;
        // Write to a temporary file in the same directory, then rename into
        // place so readers only ever see complete blobs.
        let mut tmp = tempfile::NamedTempFile::new_in(&self.root)?;
        tmp.write_all(bytes)?;
        tmp.persist(&path).map_err(|err| StoreError::Io(err.error))?;
        Ok(())
    }
}

/// In-memory store used as a test double.
#[derive(Debug, Default)]
pub struct MemStore {
    blobs: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Names currently stored, sorted for stable assertions.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.blobs.lock().unwrap().keys().cloned().collect();
        names.sort();
        names
    }
}

impl ImageStore for MemStore {
    fn read(&self, name: &str) -> Result<Vec<u8>, StoreError> {
        self.blobs
            .lock()
            .unwrap()
            .get(name)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(name.to_string()))
    }

    fn write(&self, name: &str, bytes: &[u8]) -> Result<(), StoreError> {
        self.blobs
            .lock()
            .unwrap()
            .insert(name.to_string(), bytes.to_vec());
        Ok(())
    }
}

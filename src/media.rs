//! Collaborator seam for product image storage.
//!
//! Upload handling and static file serving live outside this core; the
//! service only needs `store(bytes, filename) -> url` to attach an image
//! URL to a new product.

use dashmap::DashMap;
use std::sync::Arc;
use uuid::Uuid;

use crate::error::Result;

/// Trait for image storage implementations.
#[allow(async_fn_in_trait)]
pub trait ImageStore: Send + Sync {
    /// Persist image bytes and return the public URL to serve them from.
    ///
    /// # Errors
    /// Returns `Err` if the store is unreachable or rejects the write
    async fn store(&self, bytes: &[u8], filename: &str) -> Result<String>;
}

/// In-memory image store for tests and examples.
///
/// Keys uploads by a fresh uuid plus the original filename, the same
/// shape a disk- or bucket-backed implementation would use.
#[derive(Clone, Default)]
pub struct InMemoryImageStore {
    files: Arc<DashMap<String, Vec<u8>>>,
}

impl InMemoryImageStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored images.
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Check if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl ImageStore for InMemoryImageStore {
    async fn store(&self, bytes: &[u8], filename: &str) -> Result<String> {
        let key = format!("{}_{}", Uuid::now_v7(), filename);
        self.files.insert(key.clone(), bytes.to_vec());
        debug!("✓ Image stored: {} ({} bytes)", key, bytes.len());
        Ok(format!("/uploads/{}", key))
    }
}

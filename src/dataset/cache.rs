use sha2::{Digest, Sha256};
use std::fmt;
use std::sync::Arc;
use tracing::debug;

use super::types::Dataset;

/// Identity of an uploaded file: SHA-256 of its bytes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContentKey(String);

impl ContentKey {
    pub fn of(bytes: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(bytes);
        Self(format!("{:x}", hasher.finalize()))
    }

    pub fn short(&self) -> &str {
        &self.0[..12]
    }
}

impl fmt::Display for ContentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Single-slot cache for the parse step. Owned by the session that uses it;
/// a different upload replaces the slot. Hashing and parsing happen outside,
/// so callers only hold the cache for the lookup and the swap.
#[derive(Debug, Default)]
pub struct DatasetCache {
    slot: Option<(ContentKey, Arc<Dataset>)>,
    hits: u64,
    misses: u64,
}

impl DatasetCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lookup(&mut self, key: &ContentKey) -> Option<Arc<Dataset>> {
        match &self.slot {
            Some((cached_key, dataset)) if cached_key == key => {
                self.hits += 1;
                debug!("Dataset cache hit - key={}, hits={}", key.short(), self.hits);
                Some(dataset.clone())
            }
            _ => {
                self.misses += 1;
                debug!("Dataset cache miss - key={}, misses={}", key.short(), self.misses);
                None
            }
        }
    }

    pub fn store(&mut self, key: ContentKey, dataset: Arc<Dataset>) {
        self.slot = Some((key, dataset));
    }

    pub fn invalidate(&mut self) {
        if let Some((key, _)) = self.slot.take() {
            debug!("Dataset cache invalidated - key={}", key.short());
        }
    }

    pub fn stats(&self) -> (u64, u64) {
        (self.hits, self.misses)
    }
}

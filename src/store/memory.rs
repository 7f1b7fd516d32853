//! In-memory backend with a capacity cap.

use parking_lot::RwLock;
use std::collections::{HashMap, VecDeque};

use crate::error::Result;

use super::{generate_id, not_found, ArtifactStore};

#[derive(Default)]
struct Inner {
    artifacts: HashMap<String, Vec<u8>>,
    /// Insertion order, oldest first.
    order: VecDeque<String>,
}

/// Bounded in-memory store.
///
/// Once `capacity` artifacts are held, each `put` evicts the oldest one.
/// A capacity of zero is treated as one.
pub struct MemoryStore {
    prefix: String,
    capacity: usize,
    inner: RwLock<Inner>,
}

impl MemoryStore {
    #[must_use]
    pub fn new(prefix: &str, capacity: usize) -> Self {
        Self {
            prefix: prefix.to_string(),
            capacity: capacity.max(1),
            inner: RwLock::new(Inner::default()),
        }
    }
}

impl std::fmt::Debug for MemoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryStore")
            .field("prefix", &self.prefix)
            .field("capacity", &self.capacity)
            .field("len", &self.len())
            .finish()
    }
}

impl ArtifactStore for MemoryStore {
    fn put(&self, bytes: Vec<u8>) -> Result<String> {
        let id = generate_id(&self.prefix);
        let mut inner = self.inner.write();
        while inner.order.len() >= self.capacity {
            let Some(oldest) = inner.order.pop_front() else {
                break;
            };
            inner.artifacts.remove(&oldest);
            log::debug!("evicted artifact {oldest}");
        }
        inner.order.push_back(id.clone());
        inner.artifacts.insert(id.clone(), bytes);
        Ok(id)
    }

    fn get(&self, id: &str) -> Result<Vec<u8>> {
        self.inner
            .read()
            .artifacts
            .get(id)
            .cloned()
            .ok_or_else(|| not_found(id))
    }

    fn remove(&self, id: &str) -> Result<()> {
        let mut inner = self.inner.write();
        if inner.artifacts.remove(id).is_none() {
            return Err(not_found(id));
        }
        inner.order.retain(|existing| existing != id);
        Ok(())
    }

    fn len(&self) -> usize {
        self.inner.read().artifacts.len()
    }
}

//! Copy-on-write ring for concurrent use.
//!
//! Readers either take a snapshot (an `Arc` of a complete ring state) or
//! resolve a key under a short read lock. Writers mutate under the write
//! lock through `Arc::make_mut`, which clones the ring only while some reader
//! still holds a snapshot. A reader never observes a server with only part of
//! its virtual nodes placed.

use crate::node::ServerId;
use crate::partitioner::{Partitioner, Xxh3Partitioner};
use crate::ring::HashRing;
use parking_lot::RwLock;
use std::sync::Arc;

/// Thread-safe handle around a [`HashRing`].
#[derive(Debug)]
pub struct SharedRing<P: Partitioner = Xxh3Partitioner> {
    inner: RwLock<Arc<HashRing<P>>>,
}

impl<P: Partitioner> From<HashRing<P>> for SharedRing<P> {
    fn from(ring: HashRing<P>) -> Self {
        Self::new(ring)
    }
}

impl<P: Partitioner> SharedRing<P> {
    pub fn new(ring: HashRing<P>) -> Self {
        Self {
            inner: RwLock::new(Arc::new(ring)),
        }
    }

    /// Current ring state. Later writes do not affect the returned snapshot.
    pub fn snapshot(&self) -> Arc<HashRing<P>> {
        Arc::clone(&self.inner.read())
    }

    /// Resolve `key` against the current ring state.
    pub fn get_server(&self, key: impl AsRef<[u8]>) -> Option<ServerId> {
        self.inner.read().get_server(key).cloned()
    }

    pub fn add_server(&self, server: impl Into<ServerId>) {
        self.update(|ring| ring.add_server(server));
    }

    pub fn remove_server(&self, server: impl AsRef<str>) {
        self.update(|ring| ring.remove_server(server));
    }

    /// Apply several mutations as one step; readers see all of them or none.
    pub fn update<R>(&self, f: impl FnOnce(&mut HashRing<P>) -> R) -> R {
        let mut guard = self.inner.write();
        f(Arc::make_mut(&mut guard))
    }
}

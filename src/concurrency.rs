//! Mutation serialization
//!
//! Every mutation is a read-modify-write of the root pointer, so two of them
//! must never interleave. Readers never touch this lock: they snapshot the
//! root pointer and walk immutable blocks.

use tokio::sync::{Mutex, MutexGuard};

/// Single-writer lock around root pointer updates
///
/// An async mutex because the critical section awaits block store writes.
#[derive(Default)]
pub struct MutationLock {
    inner: Mutex<()>,
}

/// Held for the duration of one mutation
pub struct MutationGuard<'a> {
    _guard: MutexGuard<'a, ()>,
}

impl MutationLock {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn acquire(&self) -> MutationGuard<'_> {
        MutationGuard {
            _guard: self.inner.lock().await,
        }
    }
}

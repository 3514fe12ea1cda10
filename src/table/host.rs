//! # Host Object Protocol
//!
//! A table may mirror an object owned by an external host runtime. The
//! protocol has two directions:
//!
//! - **Lazy unboxing**: a column is pulled out of the host object into the
//!   table's storage the first time it is read, so construction never copies
//!   columns eagerly ([`HostObject::fetch_column`]).
//! - **Reflection**: column writes are pushed back into the host object so
//!   external aliases observe the update ([`HostObject::store_column`]).
//!
//! ## The Host Lock
//!
//! The host runtime's own bookkeeping (including its reference counting) is
//! not safe to touch concurrently with host-side execution, so every
//! callback into the host — fetch, store, retain, release — runs inside
//! [`HostSync::with_lock`]. The lock is scoped: acquisition and release are
//! structural (RAII guard), so the release happens on every path through the
//! callback, including unwinding.
//!
//! The lock is reentrant: a host callback that re-enters the adapter (e.g. a
//! fetch that triggers a nested store) must not self-deadlock.

use std::sync::Arc;

use eyre::Result;
use parking_lot::ReentrantMutex;

use crate::index::RowIndex;
use crate::types::Array;

static HOST_LOCK: ReentrantMutex<()> = ReentrantMutex::new(());

/// Scoped-lock adapter for host-runtime callbacks.
///
/// All host interaction goes through `with_lock`; nothing else in the crate
/// touches the host lock, so the acquisition-with-guaranteed-release
/// contract has a single enforcement point.
pub struct HostSync;

impl HostSync {
    pub fn with_lock<R>(f: impl FnOnce() -> R) -> R {
        let _guard = HOST_LOCK.lock();
        f()
    }
}

/// The external host-owned object a table mirrors.
///
/// Every method is invoked inside [`HostSync::with_lock`] by this crate;
/// implementations must not acquire the host lock themselves through
/// blocking means (reentrant acquisition is fine).
pub trait HostObject: Send + Sync + std::fmt::Debug {
    /// Pulls one column's data out of the host object. `Ok(None)` means the
    /// host holds no data for this column; the slot becomes terminal.
    fn fetch_column(&self, i: usize) -> Result<Option<Array>>;

    /// Pushes a mutated column back into the host object under its label.
    fn store_column(&self, name: &str, array: &Array) -> Result<()>;

    /// Pushes a replaced row index back into the host object.
    fn store_index(&self, index: &RowIndex) -> Result<()>;

    /// Host-side ownership increment. Paired with [`HostObject::release`].
    fn retain(&self);

    /// Host-side ownership decrement.
    fn release(&self);
}

/// Owning reference to a host object.
///
/// Cloning retains and dropping releases, both under the host lock, so the
/// host's own reference count mirrors the number of payloads (and handles)
/// that can reach the object.
#[derive(Debug)]
pub struct HostRef {
    object: Arc<dyn HostObject>,
}

impl HostRef {
    pub fn new(object: Arc<dyn HostObject>) -> Self {
        HostSync::with_lock(|| object.retain());
        Self { object }
    }

    pub fn object(&self) -> &dyn HostObject {
        self.object.as_ref()
    }
}

impl Clone for HostRef {
    fn clone(&self) -> Self {
        HostSync::with_lock(|| self.object.retain());
        Self {
            object: self.object.clone(),
        }
    }
}

impl Drop for HostRef {
    fn drop(&mut self) {
        HostSync::with_lock(|| self.object.release());
    }
}

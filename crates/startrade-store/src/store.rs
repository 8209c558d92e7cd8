//! The shared store handle and its closure-shaped transactions.

use std::sync::Mutex;

use startrade_types::Result;

use crate::StoreState;

/// Shared handle to the single store.
///
/// One [`Store::read`] or [`Store::write`] call is one logical
/// transaction. The lock serializes transactions outright, which is
/// stronger isolation than the settlement engine strictly needs — its
/// commit phase still re-resolves every line, because validate and commit
/// run as *separate* transactions with a real interleaving window between
/// them.
///
/// Write closures observe the all-or-nothing discipline: every fallible
/// check comes before the first mutation, so an `Err` return means the
/// state was not touched.
#[derive(Debug, Default)]
pub struct Store {
    inner: Mutex<StoreState>,
}

impl Store {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Run a read-only transaction.
    pub fn read<T>(&self, f: impl FnOnce(&StoreState) -> T) -> T {
        let state = self.inner.lock().expect("store lock poisoned");
        f(&state)
    }

    /// Run a mutating transaction.
    pub fn write<T>(&self, f: impl FnOnce(&mut StoreState) -> Result<T>) -> Result<T> {
        let mut state = self.inner.lock().expect("store lock poisoned");
        f(&mut state)
    }
}

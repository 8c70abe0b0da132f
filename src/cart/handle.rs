//! Shared cart handle.

use std::sync::{Arc, Mutex};

use crate::cart::{errors::CartError, store::CartStore};

/// Cloneable handle to the session's cart.
///
/// The storefront surface is the only writer; checkout reads through the handle and
/// clears the cart once an order has been placed. Locks are never held across an await.
#[derive(Debug, Clone)]
pub struct CartHandle {
    inner: Arc<Mutex<CartStore>>,
}

impl CartHandle {
    /// Share a cart.
    pub fn new(store: CartStore) -> Self {
        Self {
            inner: Arc::new(Mutex::new(store)),
        }
    }

    /// Run a read-only closure against the cart.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::Poisoned`] if a previous writer panicked.
    pub fn read<T>(&self, f: impl FnOnce(&CartStore) -> T) -> Result<T, CartError> {
        let store = self.inner.lock().map_err(|_err| CartError::Poisoned)?;

        Ok(f(&store))
    }

    /// Run a mutating closure against the cart.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::Poisoned`] if a previous writer panicked, or the closure's error.
    pub fn write<T>(
        &self,
        f: impl FnOnce(&mut CartStore) -> Result<T, CartError>,
    ) -> Result<T, CartError> {
        let mut store = self.inner.lock().map_err(|_err| CartError::Poisoned)?;

        f(&mut store)
    }
}

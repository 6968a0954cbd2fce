//! # Catalog State
//!
//! Products loaded from the store API, plus a view epoch used to drop
//! responses that arrive after the view that asked for them went away.
//!
//! ## Stale Response Handling
//! ```text
//! load_catalog ──► begin_load() = 7 ──► GET products ...
//!                                            │
//! user leaves the screen ──► invalidate() = 8│
//!                                            ▼
//!                         finish_load(7, products) ──► ignored (7 ≠ 8)
//! ```

use std::sync::{Mutex, PoisonError};

use medwear_core::Product;

#[derive(Debug, Default)]
struct Catalog {
    products: Vec<Product>,
    epoch: u64,
    loaded: bool,
}

/// Shared catalog state.
#[derive(Debug, Default)]
pub struct CatalogState {
    inner: Mutex<Catalog>,
}

impl CatalogState {
    pub fn new() -> Self {
        CatalogState::default()
    }

    /// Starts a load and returns the epoch its result must match.
    pub fn begin_load(&self) -> u64 {
        let mut catalog = self.lock();
        catalog.epoch += 1;
        catalog.epoch
    }

    /// The view that started pending loads is gone; their results are dropped.
    pub fn invalidate(&self) {
        self.lock().epoch += 1;
    }

    /// Installs `products` if no newer load or invalidation happened since
    /// `epoch` was issued. Returns whether they were installed.
    pub fn finish_load(&self, epoch: u64, products: Vec<Product>) -> bool {
        let mut catalog = self.lock();
        if catalog.epoch != epoch {
            return false;
        }
        catalog.products = products;
        catalog.loaded = true;
        true
    }

    pub fn is_loaded(&self) -> bool {
        self.lock().loaded
    }

    /// Runs `f` over the current product list.
    pub fn with_products<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&[Product]) -> R,
    {
        f(&self.lock().products)
    }

    pub fn products(&self) -> Vec<Product> {
        self.with_products(<[Product]>::to_vec)
    }

    pub fn find(&self, id: &str) -> Option<Product> {
        self.with_products(|products| products.iter().find(|p| p.id == id).cloned())
    }

    /// Replaces the product with the same id, or appends it.
    pub fn upsert(&self, product: Product) {
        let mut catalog = self.lock();
        match catalog.products.iter_mut().find(|p| p.id == product.id) {
            Some(existing) => *existing = product,
            None => catalog.products.push(product),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Catalog> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

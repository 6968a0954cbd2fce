//! # Cart State
//!
//! Holds the one cart of this session (POS counter or storefront shopper).
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart State Operations                                │
//! │                                                                         │
//! │  UI Action                Command                 Cart Change           │
//! │  ─────────                ───────                 ───────────           │
//! │                                                                         │
//! │  Click Product ──────────► add_to_cart() ───────► Cart::add_item       │
//! │                                                                         │
//! │  Change Quantity ────────► update_cart_item() ──► Cart::update_quantity│
//! │                                                                         │
//! │  Click Remove ───────────► remove_from_cart() ──► Cart::remove_item    │
//! │                                                                         │
//! │  Click Clear ────────────► clear_cart() ────────► Cart::clear          │
//! │                                                                         │
//! │  Sale/order succeeded ───► complete_sale() ─────► Cart::clear          │
//! │                                                                         │
//! │  NOTE: Every mutation goes through a `Cart` method, so the stock       │
//! │        ceiling is enforced in one place.                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::{Arc, Mutex, PoisonError};

use medwear_core::Cart;

/// Shared cart state.
///
/// ## Thread Safety
/// `Arc<Mutex<Cart>>`: commands may run concurrently, only one may touch
/// the cart at a time. Cart operations are short and mostly writes, so a
/// plain mutex is enough.
#[derive(Debug, Clone, Default)]
pub struct CartState {
    cart: Arc<Mutex<Cart>>,
}

impl CartState {
    /// Creates a new empty cart state.
    pub fn new() -> Self {
        CartState::default()
    }

    /// Executes a function with read access to the cart.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// let subtotal = cart_state.with_cart(|cart| cart.subtotal());
    /// ```
    pub fn with_cart<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&Cart) -> R,
    {
        let cart = self.cart.lock().unwrap_or_else(PoisonError::into_inner);
        f(&cart)
    }

    /// Executes a function with write access to the cart.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// cart_state.with_cart_mut(|cart| cart.add_item(&product, request))?;
    /// ```
    pub fn with_cart_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut Cart) -> R,
    {
        let mut cart = self.cart.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut cart)
    }

    /// A copy of the cart as it is right now.
    pub fn snapshot(&self) -> Cart {
        self.with_cart(Cart::clone)
    }
}

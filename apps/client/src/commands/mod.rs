//! # Commands Module
//!
//! Everything the POS screen, storefront and admin console can invoke.
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs       ◄─── You are here (exports)
//! ├── product.rs   ◄─── Catalog load, search, scanner Enter, product refresh
//! ├── cart.rs      ◄─── Cart manipulation
//! ├── sale.rs      ◄─── POS totals preview and sale submission
//! ├── checkout.rs  ◄─── Storefront totals preview and order submission
//! ├── inventory.rs ◄─── Admin variant-stock editor
//! └── deal.rs      ◄─── Admin deal builder
//! ```
//!
//! ## How Commands Work
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Command Flow                                         │
//! │                                                                         │
//! │  UI event (click, Enter, form submit)                                   │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  command(&state.., request)  ◄── states injected by the caller         │
//! │         │                                                               │
//! │         ├── local rules (medwear-core) ── fail ──► ApiError, no change  │
//! │         │                                                               │
//! │         ├── store API (medwear-http), only for loads and submissions    │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  Ok(response DTO, camelCase JSON)                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## State Injection (Option B)
//! Each command declares only the state it needs:
//! ```rust,ignore
//! // Only needs the cart
//! get_cart(&cart)
//!
//! // Cart + catalog + API
//! add_to_cart(&remote, &catalog, &cart, &config, request).await
//!
//! // Submission also takes the button's guard
//! complete_sale(&remote, &cart, &config, &sale_guard, request).await
//! ```
//!
//! No lock is held across an `.await`.

pub mod cart;
pub mod checkout;
pub mod deal;
pub mod inventory;
pub mod product;
pub mod sale;

//! # Repository Module
//!
//! Store API repositories for Medwear.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern                                   │
//! │                                                                         │
//! │  Application command                                                   │
//! │       │                                                                 │
//! │       │  client.products().find_by_barcode("MW-0042")                   │
//! │       ▼                                                                 │
//! │  ProductRepository                                                     │
//! │  ├── list(&self)                                                       │
//! │  ├── get_by_id(&self, id)                                              │
//! │  ├── find_by_barcode(&self, code)                                      │
//! │  └── update(&self, product)                                            │
//! │       │                                                                 │
//! │       │  JSON over HTTP (wire.rs does the shape conversion)            │
//! │       ▼                                                                 │
//! │  Store API                                                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`ProductRepository`] - Catalog reads and product saves
//! - [`SaleRepository`] - POS sale submission
//! - [`OrderRepository`] - Storefront order submission
//! - [`DealRepository`] - Bundle creation

pub mod deal;
pub mod order;
pub mod product;
pub mod sale;

pub use deal::DealRepository;
pub use order::OrderRepository;
pub use product::ProductRepository;
pub use sale::SaleRepository;

//! # medwear-http: Store API Adapter for Medwear
//!
//! This crate is the only place Medwear talks to the network. It speaks the
//! store API's JSON and hands structured `medwear-core` types back.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Medwear Data Flow                                │
//! │                                                                         │
//! │  Command (complete_sale)                                               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                   medwear-http (THIS CRATE)                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   ApiClient   │    │  Repositories │    │     wire     │  │   │
//! │  │   │  (client.rs)  │    │ (product.rs)  │    │  JSON-string │  │   │
//! │  │   │               │◄───│ SaleRepo      │───►│  fields,     │  │   │
//! │  │   │ reqwest pool  │    │ OrderRepo     │    │  money text  │  │   │
//! │  │   │ X-Request-Id  │    │ DealRepo      │    │              │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Store API (external): products, pos/sales, orders, deals              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`config`] - Base URL, timeouts, user agent
//! - [`client`] - Shared request plumbing
//! - [`error`] - HTTP error types
//! - [`repository`] - Product, sale, order and deal repositories
//! - [`wire`] - JSON shape conversion
//!
//! ## Usage
//!
//! ```rust,ignore
//! use medwear_http::{ApiClient, HttpConfig};
//!
//! let client = ApiClient::new(&HttpConfig::load()?)?;
//! let catalog = client.products().list().await?;
//! let scanned = client.products().find_by_barcode("MW-0042").await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod client;
pub mod config;
pub mod error;
pub mod repository;
pub mod wire;

// =============================================================================
// Re-exports
// =============================================================================

pub use client::ApiClient;
pub use config::{ConfigError, HttpConfig};
pub use error::{HttpError, HttpResult};

// Repository re-exports for convenience
pub use repository::deal::DealRepository;
pub use repository::order::OrderRepository;
pub use repository::product::ProductRepository;
pub use repository::sale::SaleRepository;

//! # Medwear Client Library
//!
//! Application layer shared by the POS screen, the storefront checkout and
//! the admin console. The UI calls the command functions; each command takes
//! only the state objects it needs.
//!
//! ## Module Organization
//! ```text
//! medwear_client/
//! ├── lib.rs          ◄─── You are here (tracing setup, exports)
//! ├── state/
//! │   ├── mod.rs      ◄─── State type exports
//! │   ├── remote.rs   ◄─── Store API client wrapper
//! │   ├── cart.rs     ◄─── Cart store
//! │   ├── catalog.rs  ◄─── Loaded products + view epoch
//! │   ├── config.rs   ◄─── Store configuration
//! │   ├── editor.rs   ◄─── Product being edited in the admin console
//! │   ├── deal.rs     ◄─── Deal being composed
//! │   └── submit.rs   ◄─── In-flight submission guard
//! ├── commands/
//! │   ├── mod.rs      ◄─── Command exports
//! │   ├── product.rs  ◄─── Catalog load, search, scanner Enter
//! │   ├── cart.rs     ◄─── Cart manipulation
//! │   ├── sale.rs     ◄─── POS totals and sale submission
//! │   ├── checkout.rs ◄─── Storefront totals and order submission
//! │   ├── inventory.rs◄─── Variant stock editor
//! │   └── deal.rs     ◄─── Deal builder
//! └── error.rs        ◄─── {code, message} error returned by commands
//! ```
//!
//! ## State Management (Option B: Multiple State Types)
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  ┌──────────────┐ ┌──────────────┐ ┌──────────────┐ ┌──────────────┐   │
//! │  │ RemoteState  │ │  CartState   │ │ CatalogState │ │ ConfigState  │   │
//! │  │ • ApiClient  │ │ • Cart       │ │ • Products   │ │ • Shipping   │   │
//! │  │              │ │ • Mutex      │ │ • Epoch      │ │ • Currency   │   │
//! │  └──────────────┘ └──────────────┘ └──────────────┘ └──────────────┘   │
//! │  ┌──────────────┐ ┌──────────────┐ ┌──────────────┐                    │
//! │  │ EditorState  │ │DealBuilder   │ │ SubmitGuard  │                    │
//! │  │ • Product    │ │ • DealDraft  │ │ • one per    │                    │
//! │  │   draft      │ │              │ │   button     │                    │
//! │  └──────────────┘ └──────────────┘ └──────────────┘                    │
//! │                                                                         │
//! │  Each command only receives the state it needs.                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod commands;
pub mod error;
pub mod state;

use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

pub use error::{ApiError, ErrorCode};
pub use state::{
    CartState, CatalogState, ConfigState, DealBuilderState, EditorState, RemoteState, SubmitGuard,
};

/// Default filter when `RUST_LOG` is unset.
const DEFAULT_LOG_FILTER: &str = "info,medwear=debug";

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=medwear_http=trace` - Trace the store API adapter only
/// - Default: `info`, `debug` for medwear crates
///
/// Calling it twice is harmless: a second call leaves the installed
/// subscriber in place and returns `false`.
pub fn init_tracing() -> bool {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    match tracing_subscriber::fmt().with_env_filter(filter).try_init() {
        Ok(()) => {
            info!("Tracing initialized");
            true
        }
        Err(err) => {
            debug!(error = %err, "Tracing subscriber already installed");
            false
        }
    }
}

//! # State Module
//!
//! Application state objects injected into commands.
//!
//! ## Why Multiple State Types? (Option B)
//! Instead of a single `AppState` struct containing everything, each concern
//! gets its own state type:
//!
//! 1. **Clearer Command Signatures**: Commands declare exactly what state they need
//! 2. **Easier Testing**: A test builds only the states a command touches
//! 3. **Reduced Contention**: The cart lock is never held while the catalog loads
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  ┌──────────────┐  ┌──────────────┐  ┌──────────────────┐              │
//! │  │ RemoteState  │  │  CartState   │  │   CatalogState   │              │
//! │  │              │  │              │  │                  │              │
//! │  │  ApiClient   │  │  Arc<Mutex<  │  │  products        │              │
//! │  │  (pooled,    │  │    Cart      │  │  view epoch      │              │
//! │  │   Clone)     │  │  >>          │  │                  │              │
//! │  └──────────────┘  └──────────────┘  └──────────────────┘              │
//! │                                                                         │
//! │  ┌──────────────┐  ┌──────────────┐  ┌──────────────┐  ┌────────────┐  │
//! │  │ ConfigState  │  │ EditorState  │  │ DealBuilder  │  │SubmitGuard │  │
//! │  │ read-only    │  │ Option<      │  │ DealDraft    │  │ AtomicBool │  │
//! │  │              │  │   Product>   │  │              │  │            │  │
//! │  └──────────────┘  └──────────────┘  └──────────────┘  └────────────┘  │
//! │                                                                         │
//! │  LOCKING:                                                              │
//! │  • No lock is held across an `.await`                                  │
//! │  • Poisoned locks are recovered; the data inside is still consistent   │
//! │    because every mutation validates before it writes                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod cart;
mod catalog;
mod config;
mod deal;
mod editor;
mod remote;
mod submit;

pub use cart::CartState;
pub use catalog::CatalogState;
pub use config::ConfigState;
pub use deal::DealBuilderState;
pub use editor::EditorState;
pub(crate) use editor::no_product_open;
pub use remote::RemoteState;
pub use submit::{SubmitGuard, SubmitToken};

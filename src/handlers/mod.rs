//! Resource and report handlers.
//!
//! # Data Flow
//! ```text
//! Dispatcher (operation, id, body)
//!     → orders.rs / menu.rs / inventory.rs / reports.rs
//!     → decode payload, check identifier presence
//!     → store trait call
//!     → JSON response, or ApiError via the error responder
//! ```
//!
//! # Design Decisions
//! - Handlers hold trait objects so the backing store can be swapped
//! - Payload semantics (existence, ranges, state) are the store's business
//! - Each handler only needs the slice of the store it touches

pub mod inventory;
pub mod menu;
pub mod orders;
pub mod reports;

use serde::de::DeserializeOwned;
use std::sync::Arc;

use crate::http::response::ApiError;
use crate::store::CafeStore;

pub use inventory::InventoryHandler;
pub use menu::MenuHandler;
pub use orders::OrderHandler;
pub use reports::ReportHandler;

/// The full set of handlers the dispatcher routes to.
#[derive(Clone)]
pub struct Handlers {
    pub orders: OrderHandler,
    pub menu: MenuHandler,
    pub inventory: InventoryHandler,
    pub reports: ReportHandler,
}

impl Handlers {
    /// Wire every handler to one store.
    pub fn new<S>(store: Arc<S>, popular_items_limit: usize) -> Self
    where
        S: CafeStore + 'static,
    {
        Self {
            orders: OrderHandler::new(store.clone()),
            menu: MenuHandler::new(store.clone()),
            inventory: InventoryHandler::new(store.clone()),
            reports: ReportHandler::new(store, popular_items_limit),
        }
    }
}

/// Item routes always carry an identifier; refuse to call the store without one.
pub(crate) fn require_id(id: Option<&str>) -> Result<&str, ApiError> {
    match id {
        Some(id) if !id.is_empty() => Ok(id),
        _ => Err(ApiError::InvalidInput("missing resource identifier".into())),
    }
}

/// Decode a JSON request body.
pub(crate) fn decode<T: DeserializeOwned>(body: &[u8]) -> Result<T, ApiError> {
    if body.is_empty() {
        return Err(ApiError::InvalidInput("request body is required".into()));
    }
    serde_json::from_slice(body)
        .map_err(|e| ApiError::InvalidInput(format!("malformed JSON payload: {}", e)))
}

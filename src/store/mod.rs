//! Data-store collaborator.
//!
//! # Data Flow
//! ```text
//! Resource / report handler
//!     → CafeStore trait object (OrderStore + MenuStore + InventoryStore + ReportStore)
//!     → Ok(entity | aggregate) or Err(StoreError)
//! ```
//!
//! # Design Decisions
//! - The router never touches storage; handlers go through these traits only
//! - Every call is async so a real backend can suspend on I/O
//! - Business rules (existence, closed orders, price lookup) live behind the trait
//! - `MemoryStore` is the bundled implementation and the test double

pub mod error;
pub mod memory;
pub mod types;

use async_trait::async_trait;

pub use error::{StoreError, StoreResult};
pub use memory::MemoryStore;
pub use types::*;

#[async_trait]
pub trait OrderStore: Send + Sync {
    async fn create_order(&self, order: NewOrder) -> StoreResult<Order>;
    async fn list_orders(&self) -> StoreResult<Vec<Order>>;
    async fn get_order(&self, id: &str) -> StoreResult<Order>;
    async fn update_order(&self, id: &str, update: OrderUpdate) -> StoreResult<Order>;
    async fn delete_order(&self, id: &str) -> StoreResult<()>;
    async fn close_order(&self, id: &str) -> StoreResult<Order>;
}

#[async_trait]
pub trait MenuStore: Send + Sync {
    async fn create_menu_item(&self, item: NewMenuItem) -> StoreResult<MenuItem>;
    async fn list_menu_items(&self) -> StoreResult<Vec<MenuItem>>;
    async fn get_menu_item(&self, id: &str) -> StoreResult<MenuItem>;
    async fn update_menu_item(&self, id: &str, update: MenuItemUpdate) -> StoreResult<MenuItem>;
    async fn delete_menu_item(&self, id: &str) -> StoreResult<()>;
}

#[async_trait]
pub trait InventoryStore: Send + Sync {
    async fn create_inventory_item(&self, item: NewInventoryItem) -> StoreResult<InventoryItem>;
    async fn list_inventory_items(&self) -> StoreResult<Vec<InventoryItem>>;
    async fn get_inventory_item(&self, id: &str) -> StoreResult<InventoryItem>;
    async fn update_inventory_item(
        &self,
        id: &str,
        update: InventoryUpdate,
    ) -> StoreResult<InventoryItem>;
    async fn delete_inventory_item(&self, id: &str) -> StoreResult<()>;
}

/// Read-only aggregate queries.
#[async_trait]
pub trait ReportStore: Send + Sync {
    /// Sum of all closed orders.
    async fn total_sales(&self) -> StoreResult<TotalSales>;

    /// Menu items ranked by ordered quantity, at most `limit` entries.
    async fn popular_items(&self, limit: usize) -> StoreResult<Vec<PopularItem>>;
}

/// Everything the handlers need from a backend.
pub trait CafeStore: OrderStore + MenuStore + InventoryStore + ReportStore {}

impl<T> CafeStore for T where T: OrderStore + MenuStore + InventoryStore + ReportStore {}

//! In-memory store backed by concurrent maps, with optional JSON snapshots.

use async_trait::async_trait;
use chrono::Utc;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;
use std::sync::Arc;
use uuid::Uuid;

use crate::routing::matcher::is_identifier;
use crate::store::error::{StoreError, StoreResult};
use crate::store::types::*;
use crate::store::{InventoryStore, MenuStore, OrderStore, ReportStore};

/// On-disk representation of the whole store.
#[derive(Debug, Default, Serialize, Deserialize)]
struct Snapshot {
    #[serde(default)]
    orders: Vec<Order>,
    #[serde(default)]
    menu: Vec<MenuItem>,
    #[serde(default)]
    inventory: Vec<InventoryItem>,
}

/// A thread-safe in-memory implementation of every store trait.
///
/// Clones share the same maps.
#[derive(Clone, Default)]
pub struct MemoryStore {
    orders: Arc<DashMap<String, Order>>,
    menu: Arc<DashMap<String, MenuItem>>,
    inventory: Arc<DashMap<String, InventoryItem>>,
}

impl MemoryStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load from a snapshot file if it exists, otherwise start empty.
    pub fn load_from_file(path: &Path) -> std::io::Result<Self> {
        let store = Self::new();
        if path.exists() {
            let reader = BufReader::new(File::open(path)?);
            let snapshot: Snapshot = serde_json::from_reader(reader)?;

            for order in snapshot.orders {
                store.orders.insert(order.id.clone(), order);
            }
            for item in snapshot.menu {
                store.menu.insert(item.id.clone(), item);
            }
            for item in snapshot.inventory {
                store.inventory.insert(item.id.clone(), item);
            }
            tracing::info!(
                orders = store.orders.len(),
                menu_items = store.menu.len(),
                inventory_items = store.inventory.len(),
                "Loaded store snapshot"
            );
        }
        Ok(store)
    }

    /// Write every entity to a snapshot file.
    pub fn save_to_file(&self, path: &Path) -> std::io::Result<()> {
        let snapshot = Snapshot {
            orders: self.orders.iter().map(|r| r.value().clone()).collect(),
            menu: self.menu.iter().map(|r| r.value().clone()).collect(),
            inventory: self.inventory.iter().map(|r| r.value().clone()).collect(),
        };
        let mut writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer(&mut writer, &snapshot)?;
        writer.flush()?;
        tracing::info!(path = %path.display(), "Saved store snapshot");
        Ok(())
    }

    /// Resolve requested lines against the menu, capturing current prices.
    fn price_lines(&self, lines: Vec<OrderLine>) -> StoreResult<Vec<OrderItem>> {
        if lines.is_empty() {
            return Err(StoreError::InvalidInput("order must contain at least one item".into()));
        }

        let items = lines
            .into_iter()
            .map(|line| {
                if line.quantity == 0 {
                    return Err(StoreError::InvalidInput(format!(
                        "quantity for '{}' must be greater than zero",
                        line.menu_item_id
                    )));
                }
                let menu_item = self.menu.get(&line.menu_item_id).ok_or_else(|| {
                    StoreError::InvalidInput(format!("unknown menu item '{}'", line.menu_item_id))
                })?;
                if !menu_item.available {
                    return Err(StoreError::Conflict(format!(
                        "menu item '{}' is not available",
                        line.menu_item_id
                    )));
                }
                let item = OrderItem {
                    menu_item_id: line.menu_item_id,
                    quantity: line.quantity,
                    unit_price_cents: menu_item.price_cents,
                };
                if item.line_total_cents().is_none() {
                    return Err(StoreError::InvalidInput(format!(
                        "total for '{}' is too large",
                        item.menu_item_id
                    )));
                }
                Ok(item)
            })
            .collect::<StoreResult<Vec<_>>>()?;

        let total: Option<u64> = items
            .iter()
            .try_fold(0u64, |acc, item| acc.checked_add(item.line_total_cents()?));
        if total.is_none() {
            return Err(StoreError::InvalidInput("order total is too large".into()));
        }
        Ok(items)
    }
}

fn new_id() -> String {
    Uuid::new_v4().simple().to_string()
}

fn require_name(field: &str, value: &str) -> StoreResult<()> {
    if value.trim().is_empty() {
        return Err(StoreError::InvalidInput(format!("{} must not be empty", field)));
    }
    Ok(())
}

fn require_quantity(quantity: f64) -> StoreResult<()> {
    if !quantity.is_finite() || quantity < 0.0 {
        return Err(StoreError::InvalidInput(format!(
            "quantity must be a non-negative number, got {}",
            quantity
        )));
    }
    Ok(())
}

/// Pick the caller's id (validated) or generate one.
fn choose_id(requested: Option<String>) -> StoreResult<String> {
    match requested {
        Some(id) if is_identifier(&id) => Ok(id),
        Some(id) => Err(StoreError::InvalidInput(format!(
            "identifier '{}' may only contain letters, digits and underscores",
            id
        ))),
        None => Ok(new_id()),
    }
}

/// Insert under a fresh key, reporting a conflict when the key is taken.
fn insert_new<V>(map: &DashMap<String, V>, kind: &str, id: String, value: V) -> StoreResult<()> {
    match map.entry(id) {
        Entry::Occupied(e) => Err(StoreError::Conflict(format!(
            "{} '{}' already exists",
            kind,
            e.key()
        ))),
        Entry::Vacant(e) => {
            e.insert(value);
            Ok(())
        }
    }
}

#[async_trait]
impl OrderStore for MemoryStore {
    async fn create_order(&self, order: NewOrder) -> StoreResult<Order> {
        require_name("customer_name", &order.customer_name)?;
        let items = self.price_lines(order.items)?;
        let now = Utc::now();
        let order = Order {
            id: new_id(),
            customer_name: order.customer_name,
            items,
            status: OrderStatus::Open,
            created_at: now,
            updated_at: now,
            closed_at: None,
        };
        insert_new(&self.orders, "order", order.id.clone(), order.clone())?;
        Ok(order)
    }

    async fn list_orders(&self) -> StoreResult<Vec<Order>> {
        let mut orders: Vec<Order> = self.orders.iter().map(|r| r.value().clone()).collect();
        orders.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(orders)
    }

    async fn get_order(&self, id: &str) -> StoreResult<Order> {
        self.orders
            .get(id)
            .map(|r| r.value().clone())
            .ok_or_else(|| StoreError::not_found("order", id))
    }

    async fn update_order(&self, id: &str, update: OrderUpdate) -> StoreResult<Order> {
        if let Some(name) = &update.customer_name {
            require_name("customer_name", name)?;
        }
        // Price before locking the order entry.
        let items = update.items.map(|lines| self.price_lines(lines)).transpose()?;

        let mut order = self
            .orders
            .get_mut(id)
            .ok_or_else(|| StoreError::not_found("order", id))?;
        if order.status == OrderStatus::Closed {
            return Err(StoreError::Conflict(format!("order '{}' is closed", id)));
        }
        if let Some(name) = update.customer_name {
            order.customer_name = name;
        }
        if let Some(items) = items {
            order.items = items;
        }
        order.updated_at = Utc::now();
        Ok(order.clone())
    }

    async fn delete_order(&self, id: &str) -> StoreResult<()> {
        self.orders
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| StoreError::not_found("order", id))
    }

    async fn close_order(&self, id: &str) -> StoreResult<Order> {
        let mut order = self
            .orders
            .get_mut(id)
            .ok_or_else(|| StoreError::not_found("order", id))?;
        if order.status == OrderStatus::Closed {
            return Err(StoreError::Conflict(format!("order '{}' is already closed", id)));
        }
        let now = Utc::now();
        order.status = OrderStatus::Closed;
        order.closed_at = Some(now);
        order.updated_at = now;
        Ok(order.clone())
    }
}

#[async_trait]
impl MenuStore for MemoryStore {
    async fn create_menu_item(&self, item: NewMenuItem) -> StoreResult<MenuItem> {
        require_name("name", &item.name)?;
        let now = Utc::now();
        let item = MenuItem {
            id: choose_id(item.id)?,
            name: item.name,
            description: item.description,
            price_cents: item.price_cents,
            available: item.available,
            created_at: now,
            updated_at: now,
        };
        insert_new(&self.menu, "menu item", item.id.clone(), item.clone())?;
        Ok(item)
    }

    async fn list_menu_items(&self) -> StoreResult<Vec<MenuItem>> {
        let mut items: Vec<MenuItem> = self.menu.iter().map(|r| r.value().clone()).collect();
        items.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(items)
    }

    async fn get_menu_item(&self, id: &str) -> StoreResult<MenuItem> {
        self.menu
            .get(id)
            .map(|r| r.value().clone())
            .ok_or_else(|| StoreError::not_found("menu item", id))
    }

    async fn update_menu_item(&self, id: &str, update: MenuItemUpdate) -> StoreResult<MenuItem> {
        if let Some(name) = &update.name {
            require_name("name", name)?;
        }
        let mut item = self
            .menu
            .get_mut(id)
            .ok_or_else(|| StoreError::not_found("menu item", id))?;
        if let Some(name) = update.name {
            item.name = name;
        }
        if let Some(description) = update.description {
            item.description = description;
        }
        if let Some(price) = update.price_cents {
            item.price_cents = price;
        }
        if let Some(available) = update.available {
            item.available = available;
        }
        item.updated_at = Utc::now();
        Ok(item.clone())
    }

    async fn delete_menu_item(&self, id: &str) -> StoreResult<()> {
        self.menu
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| StoreError::not_found("menu item", id))
    }
}

#[async_trait]
impl InventoryStore for MemoryStore {
    async fn create_inventory_item(&self, item: NewInventoryItem) -> StoreResult<InventoryItem> {
        require_name("name", &item.name)?;
        require_name("unit", &item.unit)?;
        require_quantity(item.quantity)?;
        let item = InventoryItem {
            id: choose_id(item.id)?,
            name: item.name,
            quantity: item.quantity,
            unit: item.unit,
            updated_at: Utc::now(),
        };
        insert_new(&self.inventory, "inventory item", item.id.clone(), item.clone())?;
        Ok(item)
    }

    async fn list_inventory_items(&self) -> StoreResult<Vec<InventoryItem>> {
        let mut items: Vec<InventoryItem> =
            self.inventory.iter().map(|r| r.value().clone()).collect();
        items.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(items)
    }

    async fn get_inventory_item(&self, id: &str) -> StoreResult<InventoryItem> {
        self.inventory
            .get(id)
            .map(|r| r.value().clone())
            .ok_or_else(|| StoreError::not_found("inventory item", id))
    }

    async fn update_inventory_item(
        &self,
        id: &str,
        update: InventoryUpdate,
    ) -> StoreResult<InventoryItem> {
        if let Some(name) = &update.name {
            require_name("name", name)?;
        }
        if let Some(unit) = &update.unit {
            require_name("unit", unit)?;
        }
        if let Some(quantity) = update.quantity {
            require_quantity(quantity)?;
        }
        let mut item = self
            .inventory
            .get_mut(id)
            .ok_or_else(|| StoreError::not_found("inventory item", id))?;
        if let Some(name) = update.name {
            item.name = name;
        }
        if let Some(quantity) = update.quantity {
            item.quantity = quantity;
        }
        if let Some(unit) = update.unit {
            item.unit = unit;
        }
        item.updated_at = Utc::now();
        Ok(item.clone())
    }

    async fn delete_inventory_item(&self, id: &str) -> StoreResult<()> {
        self.inventory
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| StoreError::not_found("inventory item", id))
    }
}

#[async_trait]
impl ReportStore for MemoryStore {
    async fn total_sales(&self) -> StoreResult<TotalSales> {
        let mut total = TotalSales {
            total_sales_cents: 0,
            closed_orders: 0,
        };
        for order in self.orders.iter() {
            if order.status == OrderStatus::Closed {
                total.total_sales_cents = order
                    .total_cents()
                    .and_then(|cents| total.total_sales_cents.checked_add(cents))
                    .ok_or_else(|| StoreError::Internal("total sales overflow".into()))?;
                total.closed_orders += 1;
            }
        }
        Ok(total)
    }

    async fn popular_items(&self, limit: usize) -> StoreResult<Vec<PopularItem>> {
        let mut counts: HashMap<String, u64> = HashMap::new();
        for order in self.orders.iter() {
            for item in &order.items {
                let count = counts.entry(item.menu_item_id.clone()).or_default();
                *count = count.saturating_add(u64::from(item.quantity));
            }
        }

        let mut ranked: Vec<PopularItem> = counts
            .into_iter()
            .map(|(menu_item_id, quantity_ordered)| {
                // Deleted menu items are still reported under their id.
                let name = self
                    .menu
                    .get(&menu_item_id)
                    .map(|r| r.name.clone())
                    .unwrap_or_else(|| menu_item_id.clone());
                PopularItem {
                    menu_item_id,
                    name,
                    quantity_ordered,
                }
            })
            .collect();
        ranked.sort_by(|a, b| {
            b.quantity_ordered
                .cmp(&a.quantity_ordered)
                .then_with(|| a.menu_item_id.cmp(&b.menu_item_id))
        });
        ranked.truncate(limit);
        Ok(ranked)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn seeded() -> MemoryStore {
        let store = MemoryStore::new();
        for (id, price) in [("espresso", 250), ("latte", 450), ("scone", 300)] {
            store
                .create_menu_item(NewMenuItem {
                    id: Some(id.into()),
                    name: id.to_uppercase(),
                    description: String::new(),
                    price_cents: price,
                    available: true,
                })
                .await
                .unwrap();
        }
        store
    }

    fn line(id: &str, quantity: u32) -> OrderLine {
        OrderLine {
            menu_item_id: id.into(),
            quantity,
        }
    }

    fn new_order(lines: Vec<OrderLine>) -> NewOrder {
        NewOrder {
            customer_name: "Ada".into(),
            items: lines,
        }
    }

    #[tokio::test]
    async fn test_order_lifecycle() {
        let store = seeded().await;
        let order = store
            .create_order(new_order(vec![line("latte", 2)]))
            .await
            .unwrap();
        assert_eq!(order.status, OrderStatus::Open);
        assert_eq!(order.items[0].unit_price_cents, 450);
        assert!(is_identifier(&order.id));

        let updated = store
            .update_order(
                &order.id,
                OrderUpdate {
                    customer_name: Some("Grace".into()),
                    items: None,
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.customer_name, "Grace");
        assert_eq!(updated.items.len(), 1);

        let closed = store.close_order(&order.id).await.unwrap();
        assert_eq!(closed.status, OrderStatus::Closed);
        assert!(closed.closed_at.is_some());

        // Closed orders are frozen
        let err = store.close_order(&order.id).await.unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));
        let err = store
            .update_order(&order.id, OrderUpdate::default())
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));

        store.delete_order(&order.id).await.unwrap();
        let err = store.get_order(&order.id).await.unwrap_err();
        assert_eq!(err, StoreError::not_found("order", order.id.clone()));
    }

    #[tokio::test]
    async fn test_order_validation() {
        let store = seeded().await;

        let err = store.create_order(new_order(vec![])).await.unwrap_err();
        assert!(matches!(err, StoreError::InvalidInput(_)));

        let err = store
            .create_order(new_order(vec![line("latte", 0)]))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::InvalidInput(_)));

        let err = store
            .create_order(new_order(vec![line("mocha", 1)]))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("unknown menu item 'mocha'"));

        store
            .update_menu_item(
                "scone",
                MenuItemUpdate {
                    available: Some(false),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        let err = store
            .create_order(new_order(vec![line("scone", 1)]))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_price_snapshot_survives_menu_change() {
        let store = seeded().await;
        let order = store
            .create_order(new_order(vec![line("espresso", 1)]))
            .await
            .unwrap();
        store
            .update_menu_item(
                "espresso",
                MenuItemUpdate {
                    price_cents: Some(999),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let fetched = store.get_order(&order.id).await.unwrap();
        assert_eq!(fetched.items[0].unit_price_cents, 250);
    }

    #[tokio::test]
    async fn test_menu_ids() {
        let store = seeded().await;

        let err = store
            .create_menu_item(NewMenuItem {
                id: Some("espresso".into()),
                name: "Again".into(),
                description: String::new(),
                price_cents: 1,
                available: true,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));

        let err = store
            .create_menu_item(NewMenuItem {
                id: Some("flat white".into()),
                name: "Flat White".into(),
                description: String::new(),
                price_cents: 400,
                available: true,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::InvalidInput(_)));

        let ids: Vec<String> = store
            .list_menu_items()
            .await
            .unwrap()
            .into_iter()
            .map(|m| m.id)
            .collect();
        assert_eq!(ids, vec!["espresso", "latte", "scone"]);

        store.delete_menu_item("espresso").await.unwrap();
        let err = store.delete_menu_item("espresso").await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_inventory_crud() {
        let store = MemoryStore::new();
        let beans = store
            .create_inventory_item(NewInventoryItem {
                id: Some("beans".into()),
                name: "Arabica beans".into(),
                quantity: 5000.0,
                unit: "g".into(),
            })
            .await
            .unwrap();
        assert_eq!(beans.id, "beans");

        let err = store
            .create_inventory_item(NewInventoryItem {
                id: None,
                name: "Milk".into(),
                quantity: -1.0,
                unit: "ml".into(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::InvalidInput(_)));

        let updated = store
            .update_inventory_item(
                "beans",
                InventoryUpdate {
                    quantity: Some(4200.5),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.quantity, 4200.5);
        assert_eq!(updated.unit, "g");

        assert_eq!(store.list_inventory_items().await.unwrap().len(), 1);
        store.delete_inventory_item("beans").await.unwrap();
        assert!(store.get_inventory_item("beans").await.is_err());
    }

    #[tokio::test]
    async fn test_reports() {
        let store = seeded().await;
        let a = store
            .create_order(new_order(vec![line("latte", 2), line("scone", 1)]))
            .await
            .unwrap();
        let _b = store
            .create_order(new_order(vec![line("espresso", 3)]))
            .await
            .unwrap();
        store.close_order(&a.id).await.unwrap();

        // Only closed orders count towards sales
        let sales = store.total_sales().await.unwrap();
        assert_eq!(sales.total_sales_cents, 2 * 450 + 300);
        assert_eq!(sales.closed_orders, 1);

        let popular = store.popular_items(10).await.unwrap();
        let ranked: Vec<(&str, u64)> = popular
            .iter()
            .map(|p| (p.menu_item_id.as_str(), p.quantity_ordered))
            .collect();
        assert_eq!(ranked, vec![("espresso", 3), ("latte", 2), ("scone", 1)]);
        assert_eq!(popular[0].name, "ESPRESSO");

        assert_eq!(store.popular_items(1).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_oversized_totals() {
        let store = seeded().await;
        store
            .create_menu_item(NewMenuItem {
                id: Some("gold_latte".into()),
                name: "Gold Latte".into(),
                description: String::new(),
                price_cents: u64::MAX / 2 + 1,
                available: true,
            })
            .await
            .unwrap();

        let err = store
            .create_order(new_order(vec![line("gold_latte", 2)]))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::InvalidInput(_)));

        let err = store
            .create_order(new_order(vec![line("gold_latte", 1), line("gold_latte", 1)]))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::InvalidInput(_)));

        // Each order fits; their sum does not.
        for _ in 0..2 {
            let order = store
                .create_order(new_order(vec![line("gold_latte", 1)]))
                .await
                .unwrap();
            store.close_order(&order.id).await.unwrap();
        }
        let err = store.total_sales().await.unwrap_err();
        assert!(matches!(err, StoreError::Internal(_)));
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_snapshot_write_failure_is_reported() {
        let store = MemoryStore::new();
        assert!(store.save_to_file(Path::new("/dev/full")).is_err());
    }

    #[tokio::test]
    async fn test_snapshot_round_trip() {
        let path = std::env::temp_dir().join(format!("cafe-snapshot-{}.json", std::process::id()));
        let store = seeded().await;
        store
            .create_order(new_order(vec![line("latte", 1)]))
            .await
            .unwrap();
        store.save_to_file(&path).unwrap();

        let loaded = MemoryStore::load_from_file(&path).unwrap();
        assert_eq!(loaded.list_menu_items().await.unwrap().len(), 3);
        assert_eq!(loaded.list_orders().await.unwrap().len(), 1);

        std::fs::remove_file(path).unwrap_or_default();
    }
}

//! Route table and dispatch.
//!
//! # Responsibilities
//! - Hold the fixed (route kind, method) → operation table
//! - Classify requests against it
//! - Invoke the handler for the resolved operation
//!
//! # Design Decisions
//! - Immutable after construction (shared via Arc, no locks)
//! - O(1) lookup via HashMap keyed on route kind and method
//! - Explicit NoMatch rather than silent default
//! - The dispatcher performs no storage I/O of its own

use axum::body::Bytes;
use axum::http::Method;
use axum::response::{IntoResponse, Response};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::handlers::Handlers;
use crate::http::response::ApiError;
use crate::routing::matcher::{classify_path, Classification, RouteKind};

/// A single operation the service can perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    CreateOrder,
    ListOrders,
    GetOrder,
    UpdateOrder,
    DeleteOrder,
    CloseOrder,
    CreateMenuItem,
    ListMenuItems,
    GetMenuItem,
    UpdateMenuItem,
    DeleteMenuItem,
    CreateInventoryItem,
    ListInventoryItems,
    GetInventoryItem,
    UpdateInventoryItem,
    DeleteInventoryItem,
    TotalSales,
    PopularItems,
}

impl Operation {
    /// Stable name used in logs and metric labels.
    pub fn name(self) -> &'static str {
        match self {
            Operation::CreateOrder => "create_order",
            Operation::ListOrders => "list_orders",
            Operation::GetOrder => "get_order",
            Operation::UpdateOrder => "update_order",
            Operation::DeleteOrder => "delete_order",
            Operation::CloseOrder => "close_order",
            Operation::CreateMenuItem => "create_menu_item",
            Operation::ListMenuItems => "list_menu_items",
            Operation::GetMenuItem => "get_menu_item",
            Operation::UpdateMenuItem => "update_menu_item",
            Operation::DeleteMenuItem => "delete_menu_item",
            Operation::CreateInventoryItem => "create_inventory_item",
            Operation::ListInventoryItems => "list_inventory_items",
            Operation::GetInventoryItem => "get_inventory_item",
            Operation::UpdateInventoryItem => "update_inventory_item",
            Operation::DeleteInventoryItem => "delete_inventory_item",
            Operation::TotalSales => "total_sales",
            Operation::PopularItems => "popular_items",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A request resolved to an operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRoute {
    pub kind: RouteKind,
    pub operation: Operation,
    pub id: Option<String>,
}

/// The service's fixed route table.
#[derive(Debug)]
pub struct RouteTable {
    routes: HashMap<(RouteKind, Method), Operation>,
}

impl RouteTable {
    /// Build the table. Called once at startup.
    pub fn new() -> Self {
        use Operation::*;
        use RouteKind::*;

        let entries = [
            (OrdersCollection, Method::POST, CreateOrder),
            (OrdersCollection, Method::GET, ListOrders),
            (OrdersItem, Method::GET, GetOrder),
            (OrdersItem, Method::PUT, UpdateOrder),
            (OrdersItem, Method::DELETE, DeleteOrder),
            (OrdersItemClose, Method::POST, CloseOrder),
            (MenuCollection, Method::POST, CreateMenuItem),
            (MenuCollection, Method::GET, ListMenuItems),
            (MenuItem, Method::GET, GetMenuItem),
            (MenuItem, Method::PUT, UpdateMenuItem),
            (MenuItem, Method::DELETE, DeleteMenuItem),
            (InventoryCollection, Method::POST, CreateInventoryItem),
            (InventoryCollection, Method::GET, ListInventoryItems),
            (InventoryItem, Method::GET, GetInventoryItem),
            (InventoryItem, Method::PUT, UpdateInventoryItem),
            (InventoryItem, Method::DELETE, DeleteInventoryItem),
            (ReportTotalSales, Method::GET, TotalSales),
            (ReportPopularItems, Method::GET, PopularItems),
        ];

        Self {
            routes: entries
                .into_iter()
                .map(|(kind, method, op)| ((kind, method), op))
                .collect(),
        }
    }

    /// Look up the operation registered for a route kind and method.
    pub fn operation(&self, kind: RouteKind, method: &Method) -> Option<Operation> {
        self.routes.get(&(kind, method.clone())).copied()
    }

    /// Classify a request. A known path shape with an unregistered method is NoMatch.
    pub fn classify(&self, method: &Method, path: &str) -> Classification {
        let classification = classify_path(path);
        if self.operation(classification.kind, method).is_some() {
            classification
        } else {
            Classification::no_match()
        }
    }

    /// Classify and resolve to an operation in one step.
    pub fn resolve(&self, method: &Method, path: &str) -> Option<ResolvedRoute> {
        let Classification { kind, id } = classify_path(path);
        let operation = self.operation(kind, method)?;
        Some(ResolvedRoute { kind, operation, id })
    }

    /// Number of registered (route kind, method) pairs.
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

impl Default for RouteTable {
    fn default() -> Self {
        Self::new()
    }
}

/// Single entry point for every inbound request.
#[derive(Clone)]
pub struct Dispatcher {
    table: Arc<RouteTable>,
    handlers: Handlers,
}

impl Dispatcher {
    pub fn new(table: Arc<RouteTable>, handlers: Handlers) -> Self {
        Self { table, handlers }
    }

    /// Route a request and produce its response.
    ///
    /// Successful responses carry the resolved [`Operation`] as an extension.
    pub async fn dispatch(&self, method: &Method, path: &str, body: Bytes) -> Response {
        let Some(route) = self.table.resolve(method, path) else {
            tracing::warn!(method = %method, path = %path, "No route matched");
            return ApiError::RouteNotFound.into_response();
        };

        tracing::debug!(
            route = %route.kind,
            operation = %route.operation,
            id = route.id.as_deref().unwrap_or(""),
            "Dispatching request"
        );

        let operation = route.operation;
        let mut response = match self.invoke(route, &body).await {
            Ok(response) => response,
            Err(err) => err.into_response(),
        };
        response.extensions_mut().insert(operation);
        response
    }

    async fn invoke(&self, route: ResolvedRoute, body: &[u8]) -> Result<Response, ApiError> {
        let id = route.id.as_deref();
        let h = &self.handlers;
        match route.operation {
            Operation::CreateOrder => h.orders.create(body).await,
            Operation::ListOrders => h.orders.list().await,
            Operation::GetOrder => h.orders.get(id).await,
            Operation::UpdateOrder => h.orders.update(id, body).await,
            Operation::DeleteOrder => h.orders.delete(id).await,
            Operation::CloseOrder => h.orders.close(id).await,
            Operation::CreateMenuItem => h.menu.create(body).await,
            Operation::ListMenuItems => h.menu.list().await,
            Operation::GetMenuItem => h.menu.get(id).await,
            Operation::UpdateMenuItem => h.menu.update(id, body).await,
            Operation::DeleteMenuItem => h.menu.delete(id).await,
            Operation::CreateInventoryItem => h.inventory.create(body).await,
            Operation::ListInventoryItems => h.inventory.list().await,
            Operation::GetInventoryItem => h.inventory.get(id).await,
            Operation::UpdateInventoryItem => h.inventory.update(id, body).await,
            Operation::DeleteInventoryItem => h.inventory.delete(id).await,
            Operation::TotalSales => h.reports.total_sales().await,
            Operation::PopularItems => h.reports.popular_items().await,
        }
    }
}

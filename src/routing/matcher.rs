//! Path classification.
//!
//! # Responsibilities
//! - Split the request path into segments
//! - Decide the route shape from segment count and literal segments
//! - Extract the identifier segment for item routes
//!
//! # Design Decisions
//! - One trailing slash is optional and insignificant
//! - Identifiers are word tokens: ASCII letters, digits, underscore
//! - No regex and no ordered predicate chain: each path has exactly one shape
//! - Method filtering is the route table's job, not the matcher's

use std::fmt;

/// Every route the service knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RouteKind {
    OrdersCollection,
    OrdersItem,
    OrdersItemClose,
    MenuCollection,
    MenuItem,
    InventoryCollection,
    InventoryItem,
    ReportTotalSales,
    ReportPopularItems,
    NoMatch,
}

impl fmt::Display for RouteKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RouteKind::OrdersCollection => "orders_collection",
            RouteKind::OrdersItem => "orders_item",
            RouteKind::OrdersItemClose => "orders_item_close",
            RouteKind::MenuCollection => "menu_collection",
            RouteKind::MenuItem => "menu_item",
            RouteKind::InventoryCollection => "inventory_collection",
            RouteKind::InventoryItem => "inventory_item",
            RouteKind::ReportTotalSales => "report_total_sales",
            RouteKind::ReportPopularItems => "report_popular_items",
            RouteKind::NoMatch => "no_match",
        };
        f.write_str(name)
    }
}

/// Result of classifying a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub kind: RouteKind,
    /// Identifier segment, present only for item routes.
    pub id: Option<String>,
}

impl Classification {
    pub fn no_match() -> Self {
        Self {
            kind: RouteKind::NoMatch,
            id: None,
        }
    }

    fn collection(kind: RouteKind) -> Self {
        Self { kind, id: None }
    }

    fn item(kind: RouteKind, id: &str) -> Self {
        Self {
            kind,
            id: Some(id.to_string()),
        }
    }
}

/// Returns true if `s` is a non-empty run of `[A-Za-z0-9_]`.
pub fn is_identifier(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_')
}

/// Classify a path by its shape, ignoring the method.
pub fn classify_path(path: &str) -> Classification {
    let Some(rest) = path.strip_prefix('/') else {
        return Classification::no_match();
    };
    let rest = rest.strip_suffix('/').unwrap_or(rest);
    if rest.is_empty() {
        return Classification::no_match();
    }

    let segments: Vec<&str> = rest.split('/').collect();
    match segments.as_slice() {
        ["orders"] => Classification::collection(RouteKind::OrdersCollection),
        ["orders", id] if is_identifier(id) => Classification::item(RouteKind::OrdersItem, id),
        ["orders", id, "close"] if is_identifier(id) => {
            Classification::item(RouteKind::OrdersItemClose, id)
        }
        ["menu"] => Classification::collection(RouteKind::MenuCollection),
        ["menu", id] if is_identifier(id) => Classification::item(RouteKind::MenuItem, id),
        ["inventory"] => Classification::collection(RouteKind::InventoryCollection),
        ["inventory", id] if is_identifier(id) => {
            Classification::item(RouteKind::InventoryItem, id)
        }
        ["reports", "total-sales"] => Classification::collection(RouteKind::ReportTotalSales),
        ["reports", "popular-items"] => Classification::collection(RouteKind::ReportPopularItems),
        _ => Classification::no_match(),
    }
}

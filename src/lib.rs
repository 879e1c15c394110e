//! Frappuccino: café order, menu and inventory service.

pub mod config;
pub mod handlers;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routing;
pub mod store;

pub use config::schema::CafeConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use store::{CafeStore, MemoryStore};

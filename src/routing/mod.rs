//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming Request (method, path, body)
//!     → matcher.rs (path shape + identifier)
//!     → router.rs (route table: kind + method → operation)
//!     → router.rs (dispatcher invokes the resource/report handler)
//!     → Response, or 400 "Invalid Request." on NoMatch
//!
//! Route table (at startup):
//!     fixed (kind, method, operation) entries
//!     → Freeze as immutable RouteTable
//!     → Shared with the Dispatcher via Arc
//! ```
//!
//! # Design Decisions
//! - Routes built at startup, immutable at runtime
//! - No regex in hot path (segment matching only)
//! - Deterministic: same input always matches same route
//! - Shape decided by segment count and literals, never by evaluation order

pub mod matcher;
pub mod router;

pub use matcher::{classify_path, is_identifier, Classification, RouteKind};
pub use router::{Dispatcher, Operation, ResolvedRoute, RouteTable};

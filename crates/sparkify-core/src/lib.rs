//! Core types and pipeline logic for the Sparkify star-schema loader.
//!
//! This crate is deliberately free of database dependencies. Persistence goes
//! through the [`StoreGateway`](store::StoreGateway) trait, implemented by
//! backends such as `sparkify-store-sqlite`.

pub mod error;
pub mod extract;
pub mod record;
pub mod row;
pub mod store;
pub mod transform;
pub mod walk;

pub use error::{Error, Result};
pub use store::{StatementName, StatementTable, StoreGateway};
pub use walk::{ErrorPolicy, WalkReport};

//! SQLite backend for the Sparkify star schema.
//!
//! [`SqliteStore`] implements [`StoreGateway`](sparkify_core::StoreGateway)
//! over a single synchronous [`rusqlite`] connection, resolving statement
//! names through the [`StatementTable`](sparkify_core::StatementTable) it was
//! opened with.

mod encode;
mod schema;
mod statements;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use statements::default_statements;
pub use store::SqliteStore;

#[cfg(test)]
mod tests;

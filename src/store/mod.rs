// ============================================================================
// Store - SQLite-Backed Persistence
// ============================================================================
//
// - Pool construction (file-backed for the till, in-memory for tests)
// - Schema creation and demo catalog seeding
// - OrderStore (order numbering, atomic commit, lookups)
// - Catalog (read-only category/product source)
//
// ============================================================================

pub mod catalog;
pub mod order_store;
pub mod schema;

pub use catalog::{CatalogSource, Category, Product, SqliteCatalog};
pub use order_store::OrderStore;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;

/// Open (or create) the till database at `path`.
///
/// A single connection is enough: the till is a single logical writer and
/// SQLite serializes writers anyway.
pub async fn connect(path: &str) -> sqlx::Result<SqlitePool> {
    let options = SqliteConnectOptions::new()
        .filename(path)
        .create_if_missing(true)
        .foreign_keys(true);

    SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await
}

/// In-memory database for tests and demos. The pool is pinned to one
/// never-reaped connection, since each SQLite connection would otherwise
/// get its own private memory database.
pub async fn connect_in_memory() -> sqlx::Result<SqlitePool> {
    let options = SqliteConnectOptions::new().in_memory(true).foreign_keys(true);

    SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await
}

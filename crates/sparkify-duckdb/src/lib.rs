pub mod loader;
pub mod schema;
pub mod warehouse;

pub use loader::{load_dataset, LoadSummary};
pub use warehouse::{DuckDbWarehouse, FileTransaction, TableCount};

/// Re-export the `duckdb` crate so consumers (especially tests) can use
/// `sparkify_duckdb::duckdb::params!` without an extra dependency.
pub use duckdb;

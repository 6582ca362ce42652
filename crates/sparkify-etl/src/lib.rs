pub mod config;
pub mod logging;

use anyhow::Result;
use tracing::info;

use sparkify_core::transform::Dataset;
use sparkify_duckdb::{load_dataset, DuckDbWarehouse, LoadSummary, TableCount};

use crate::config::Config;

/// What one pipeline run loaded.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub songs: LoadSummary,
    pub logs: LoadSummary,
    /// Row counts after both passes, fact table first.
    pub table_counts: Vec<TableCount>,
}

/// Run the whole pipeline against the warehouse named in `cfg`.
///
/// The song pass runs to completion (every file committed) before the log
/// pass starts, because songplay lookups read the songs and artists it loaded.
/// Any error ends the run; the warehouse is closed on every path.
pub fn run(cfg: &Config) -> Result<RunReport> {
    let mut warehouse = DuckDbWarehouse::open(&cfg.database_path, &cfg.duckdb_memory_limit)?;

    let report = load_all(&mut warehouse, cfg)?;
    warehouse.close()?;
    Ok(report)
}

/// Both load passes plus the final row counts, against an already open warehouse.
pub fn load_all(warehouse: &mut DuckDbWarehouse, cfg: &Config) -> Result<RunReport> {
    let songs = load_dataset(
        warehouse,
        cfg.data_dir(Dataset::Songs),
        &cfg.file_extension,
        Dataset::Songs,
    )?;
    let logs = load_dataset(
        warehouse,
        cfg.data_dir(Dataset::Logs),
        &cfg.file_extension,
        Dataset::Logs,
    )?;

    let table_counts = warehouse.table_counts()?;
    for count in &table_counts {
        info!(table = count.table, rows = count.rows, "table loaded");
    }

    Ok(RunReport {
        songs,
        logs,
        table_counts,
    })
}

/// Drop and recreate every star-schema table in the warehouse named in `cfg`.
pub fn create_tables(cfg: &Config) -> Result<()> {
    let warehouse = DuckDbWarehouse::open(&cfg.database_path, &cfg.duckdb_memory_limit)?;
    warehouse.reset_schema()?;
    warehouse.close()
}

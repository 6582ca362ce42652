use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::info;

use sparkify_core::discovery::find_files;
use sparkify_core::transform::{Dataset, FileStats};

use crate::DuckDbWarehouse;

/// Outcome of one load pass over a data directory.
#[derive(Debug, Clone)]
pub struct LoadSummary {
    pub dataset: Dataset,
    pub root: PathBuf,
    /// Matching files discovered under `root`.
    pub found: usize,
    /// Files whose rows were committed.
    pub processed: usize,
    /// Row writes summed over every committed file.
    pub rows: FileStats,
}

impl fmt::Display for LoadSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{} files processed", self.processed, self.found)
    }
}

/// Load every `*.{extension}` file under `root` with the dataset's transform.
///
/// Files are processed in discovery order, each inside its own transaction
/// that commits before the next file starts. The first failing file aborts
/// the pass: its transaction rolls back, earlier files stay committed, and the
/// error comes back with the file path attached. Nothing is retried.
pub fn load_dataset(
    warehouse: &mut DuckDbWarehouse,
    root: &Path,
    extension: &str,
    dataset: Dataset,
) -> Result<LoadSummary> {
    let files = find_files(root, extension);
    let found = files.len();
    info!(dataset = %dataset, "{} files found in {}", found, root.display());

    let mut summary = LoadSummary {
        dataset,
        root: root.to_path_buf(),
        found,
        processed: 0,
        rows: FileStats::default(),
    };

    for (i, path) in files.iter().enumerate() {
        let mut tx = warehouse.begin_file()?;
        let stats = dataset
            .process_file(&mut tx, path)
            .with_context(|| format!("failed to load {} file {}", dataset, path.display()))?;
        tx.commit()
            .with_context(|| format!("failed to commit {}", path.display()))?;

        summary.processed += 1;
        summary.rows += stats;
        info!(dataset = %dataset, "{}/{} files processed.", i + 1, found);
    }

    info!(
        dataset = %dataset,
        songs = summary.rows.songs,
        artists = summary.rows.artists,
        songplays = summary.rows.songplays,
        matched_songplays = summary.rows.matched_songplays,
        skipped_events = summary.rows.skipped_events,
        "{}",
        summary
    );
    Ok(summary)
}

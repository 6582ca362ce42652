pub mod log;
pub mod song;

use std::fmt;
use std::ops::AddAssign;
use std::path::Path;

use crate::sink::StarSchemaSink;

pub use log::{parse_log_file, process_log_file};
pub use song::{parse_song_file, process_song_file};

/// The two input datasets. Each one has its own file transform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dataset {
    /// One song-metadata JSON object per file.
    Songs,
    /// Newline-delimited session events.
    Logs,
}

impl Dataset {
    pub fn as_str(&self) -> &'static str {
        match self {
            Dataset::Songs => "song_data",
            Dataset::Logs => "log_data",
        }
    }

    /// Run this dataset's transform over one file, writing through `sink`.
    pub fn process_file(
        &self,
        sink: &mut dyn StarSchemaSink,
        path: &Path,
    ) -> anyhow::Result<FileStats> {
        match self {
            Dataset::Songs => process_song_file(sink, path),
            Dataset::Logs => process_log_file(sink, path),
        }
    }
}

impl fmt::Display for Dataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Row writes attempted for a file (or summed over a pass).
///
/// Counts are statements issued, not rows persisted: an ignored duplicate
/// or an upsert that only touched `level` still counts once.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FileStats {
    pub songs: usize,
    pub artists: usize,
    pub time_rows: usize,
    pub users: usize,
    pub songplays: usize,
    /// Songplays whose song/artist lookup found a match.
    pub matched_songplays: usize,
    /// Log lines dropped because they were not song plays.
    pub skipped_events: usize,
}

impl AddAssign for FileStats {
    fn add_assign(&mut self, other: Self) {
        self.songs += other.songs;
        self.artists += other.artists;
        self.time_rows += other.time_rows;
        self.users += other.users;
        self.songplays += other.songplays;
        self.matched_songplays += other.matched_songplays;
        self.skipped_events += other.skipped_events;
    }
}

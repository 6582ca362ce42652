use std::path::Path;

use crate::error::TransformError;
use crate::model::{ArtistRow, SongRecord, SongRow};
use crate::sink::StarSchemaSink;
use crate::transform::FileStats;

/// Parse a song-metadata file into its song and artist rows.
///
/// The file is expected to hold exactly one JSON object. When more than one
/// value is present only the first is used.
pub fn parse_song_file(path: &Path, contents: &str) -> Result<(SongRow, ArtistRow), TransformError> {
    let mut records = serde_json::Deserializer::from_str(contents).into_iter::<SongRecord>();
    match records.next() {
        Some(Ok(record)) => Ok((record.song_row(), record.artist_row())),
        Some(Err(source)) => Err(TransformError::Parse {
            path: path.to_path_buf(),
            line: source.line(),
            source,
        }),
        None => Err(TransformError::EmptyFile {
            path: path.to_path_buf(),
        }),
    }
}

/// Load one song file: one song row, then one artist row.
pub fn process_song_file(sink: &mut dyn StarSchemaSink, path: &Path) -> anyhow::Result<FileStats> {
    let contents = std::fs::read_to_string(path).map_err(|source| TransformError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let (song, artist) = parse_song_file(path, &contents)?;

    sink.insert_song(&song)?;
    sink.insert_artist(&artist)?;

    tracing::debug!(path = %path.display(), song_id = %song.song_id, "song file loaded");
    Ok(FileStats {
        songs: 1,
        artists: 1,
        ..FileStats::default()
    })
}

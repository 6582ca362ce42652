use crate::model::{ArtistRow, SongArtistMatch, SongRow, SongplayRow, TimeRow, UserRow};

/// Write side of the star schema, as seen by the file transforms.
///
/// The DuckDB implementation binds one sink to one per-file transaction, so
/// everything a transform writes for a file commits or rolls back together.
/// Conflict handling lives behind the trait:
/// - songs, artists, time: insert-or-ignore on the key
/// - users: upsert, only `level` is overwritten
/// - songplays: always a new row
pub trait StarSchemaSink {
    fn insert_song(&mut self, row: &SongRow) -> anyhow::Result<()>;
    fn insert_artist(&mut self, row: &ArtistRow) -> anyhow::Result<()>;
    fn insert_time(&mut self, row: &TimeRow) -> anyhow::Result<()>;
    fn upsert_user(&mut self, row: &UserRow) -> anyhow::Result<()>;
    fn insert_songplay(&mut self, row: &SongplayRow) -> anyhow::Result<()>;

    /// Resolve a played track against previously loaded songs and artists.
    ///
    /// Exact match on title, artist name and duration. Returns:
    /// - `Ok(None)` when nothing matches (not an error).
    /// - `Ok(Some(_))` with the lowest `(song_id, artist_id)` when one or more rows match.
    fn find_song_artist(
        &mut self,
        title: &str,
        artist_name: &str,
        duration: f64,
    ) -> anyhow::Result<Option<SongArtistMatch>>;
}

use std::path::Path;

use anyhow::{Context, Result};
use duckdb::{Connection, Transaction};
use tracing::info;

use sparkify_core::model::{ArtistRow, SongArtistMatch, SongRow, SongplayRow, TimeRow, UserRow};
use sparkify_core::sink::StarSchemaSink;

use crate::schema::{
    session_settings_sql, ARTIST_TABLE_INSERT, CREATE_TABLE_QUERIES, DROP_TABLE_QUERIES,
    SONGPLAY_TABLE_INSERT, SONG_SELECT, SONG_TABLE_INSERT, TABLE_COUNT_QUERIES,
    TIME_TABLE_INSERT, USER_TABLE_INSERT,
};

/// Timestamp layout bound into `TIMESTAMP` columns. DuckDB casts it on insert.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

/// Row count of one star-schema table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableCount {
    pub table: &'static str,
    pub rows: i64,
}

/// The Sparkify warehouse: one DuckDB connection, owned for the whole run.
///
/// There is no shared or global handle. The bootstrap opens the warehouse,
/// passes it `&mut` to each load pass, and closes it at the end; if a pass
/// fails, dropping the value closes the connection instead.
///
/// Writes go through a [`FileTransaction`], one per data file.
pub struct DuckDbWarehouse {
    conn: Connection,
}

impl DuckDbWarehouse {
    /// Open (or create) the DuckDB database file at `path`.
    ///
    /// Applies the session settings then the idempotent creation statements,
    /// so the star schema exists on return.
    pub fn open(path: &Path, memory_limit: &str) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("failed to open DuckDB database at {}", path.display()))?;
        let warehouse = Self::init(conn, memory_limit)?;
        info!(
            "DuckDB opened at {} with memory_limit={}, threads=2",
            path.display(),
            memory_limit
        );
        Ok(warehouse)
    }

    /// Open an **in-memory** warehouse. Intended for tests: data is discarded on drop.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::init(conn, "1GB")
    }

    fn init(conn: Connection, memory_limit: &str) -> Result<Self> {
        conn.execute_batch(&session_settings_sql(memory_limit))?;
        let warehouse = Self { conn };
        warehouse.create_schema()?;
        Ok(warehouse)
    }

    /// Run every `CREATE ... IF NOT EXISTS` statement. Safe to repeat.
    pub fn create_schema(&self) -> Result<()> {
        for sql in CREATE_TABLE_QUERIES {
            self.conn.execute_batch(sql)?;
        }
        Ok(())
    }

    /// Run every `DROP ... IF EXISTS` statement. Safe to repeat.
    pub fn drop_schema(&self) -> Result<()> {
        for sql in DROP_TABLE_QUERIES {
            self.conn.execute_batch(sql)?;
        }
        Ok(())
    }

    /// Drop and recreate the star schema, discarding all loaded rows.
    pub fn reset_schema(&self) -> Result<()> {
        self.drop_schema()?;
        self.create_schema()?;
        info!("Star schema reset");
        Ok(())
    }

    /// Start the transaction one data file is loaded in.
    ///
    /// Dropping the returned value without [`FileTransaction::commit`] rolls
    /// the file's rows back.
    pub fn begin_file(&mut self) -> Result<FileTransaction<'_>> {
        Ok(FileTransaction {
            tx: self.conn.transaction()?,
        })
    }

    /// Resolve a played track against committed songs and artists.
    pub fn find_song_artist(
        &self,
        title: &str,
        artist_name: &str,
        duration: f64,
    ) -> Result<Option<SongArtistMatch>> {
        find_song_artist(&self.conn, title, artist_name, duration)
    }

    /// Row counts for all five tables, fact table first.
    pub fn table_counts(&self) -> Result<Vec<TableCount>> {
        let mut counts = Vec::with_capacity(TABLE_COUNT_QUERIES.len());
        for (table, sql) in TABLE_COUNT_QUERIES {
            let mut stmt = self.conn.prepare(sql)?;
            let rows: i64 = stmt.query_row([], |row| row.get(0))?;
            counts.push(TableCount { table, rows });
        }
        Ok(counts)
    }

    /// Borrow the DuckDB connection for direct queries.
    ///
    /// Intended for integration tests that need to verify stored data.
    /// Production code should use the typed methods above.
    pub fn conn_for_test(&self) -> &Connection {
        &self.conn
    }

    /// Close the connection, surfacing any error DuckDB reports while doing so.
    pub fn close(self) -> Result<()> {
        self.conn
            .close()
            .map_err(|(_conn, e)| anyhow::Error::new(e).context("failed to close DuckDB"))?;
        info!("DuckDB connection closed");
        Ok(())
    }
}

/// A [`StarSchemaSink`] bound to one open DuckDB transaction.
pub struct FileTransaction<'conn> {
    tx: Transaction<'conn>,
}

impl FileTransaction<'_> {
    pub fn commit(self) -> Result<()> {
        self.tx.commit()?;
        Ok(())
    }
}

impl StarSchemaSink for FileTransaction<'_> {
    fn insert_song(&mut self, row: &SongRow) -> Result<()> {
        self.tx.execute(
            SONG_TABLE_INSERT,
            duckdb::params![row.song_id, row.title, row.artist_id, row.year, row.duration],
        )?;
        Ok(())
    }

    fn insert_artist(&mut self, row: &ArtistRow) -> Result<()> {
        self.tx.execute(
            ARTIST_TABLE_INSERT,
            duckdb::params![
                row.artist_id,
                row.name,
                row.location,
                row.latitude,
                row.longitude
            ],
        )?;
        Ok(())
    }

    fn insert_time(&mut self, row: &TimeRow) -> Result<()> {
        let start_time = row.start_time.format(TIMESTAMP_FORMAT).to_string();
        self.tx.execute(
            TIME_TABLE_INSERT,
            duckdb::params![
                start_time,
                row.hour,
                row.day,
                row.week,
                row.month,
                row.year,
                row.weekday
            ],
        )?;
        Ok(())
    }

    fn upsert_user(&mut self, row: &UserRow) -> Result<()> {
        self.tx.execute(
            USER_TABLE_INSERT,
            duckdb::params![
                row.user_id,
                row.first_name,
                row.last_name,
                row.gender,
                row.level
            ],
        )?;
        Ok(())
    }

    fn insert_songplay(&mut self, row: &SongplayRow) -> Result<()> {
        let start_time = row.start_time.format(TIMESTAMP_FORMAT).to_string();
        self.tx.execute(
            SONGPLAY_TABLE_INSERT,
            duckdb::params![
                start_time,
                row.user_id,
                row.level,
                row.song_id,
                row.artist_id,
                row.session_id,
                row.location,
                row.user_agent
            ],
        )?;
        Ok(())
    }

    fn find_song_artist(
        &mut self,
        title: &str,
        artist_name: &str,
        duration: f64,
    ) -> Result<Option<SongArtistMatch>> {
        find_song_artist(&self.tx, title, artist_name, duration)
    }
}

fn find_song_artist(
    conn: &Connection,
    title: &str,
    artist_name: &str,
    duration: f64,
) -> Result<Option<SongArtistMatch>> {
    let mut stmt = conn.prepare_cached(SONG_SELECT)?;
    let found = stmt.query_row(duckdb::params![title, artist_name, duration], |row| {
        Ok(SongArtistMatch {
            song_id: row.get(0)?,
            artist_id: row.get(1)?,
        })
    });
    match found {
        Ok(m) => Ok(Some(m)),
        Err(duckdb::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

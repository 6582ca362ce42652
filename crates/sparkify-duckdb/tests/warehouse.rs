use sparkify_core::model::{
    timestamp_from_millis, ArtistRow, SongArtistMatch, SongRow, SongplayRow, TimeRow, UserRow,
};
use sparkify_core::sink::StarSchemaSink;
use sparkify_duckdb::{DuckDbWarehouse, TableCount};

fn song(song_id: &str, title: &str, artist_id: &str, duration: f64) -> SongRow {
    SongRow {
        song_id: song_id.to_string(),
        title: title.to_string(),
        artist_id: artist_id.to_string(),
        year: 2000,
        duration,
    }
}

fn artist(artist_id: &str, name: &str) -> ArtistRow {
    ArtistRow {
        artist_id: artist_id.to_string(),
        name: name.to_string(),
        location: Some("L".to_string()),
        latitude: Some(1.0),
        longitude: Some(2.0),
    }
}

fn user(user_id: i32, first_name: &str, level: &str) -> UserRow {
    UserRow {
        user_id,
        first_name: first_name.to_string(),
        last_name: "Summers".to_string(),
        gender: "F".to_string(),
        level: level.to_string(),
    }
}

fn songplay(ts: i64, song_id: Option<&str>) -> SongplayRow {
    SongplayRow {
        start_time: timestamp_from_millis(ts).expect("ts"),
        user_id: 8,
        level: "free".to_string(),
        song_id: song_id.map(str::to_string),
        artist_id: song_id.map(|_| "A1".to_string()),
        session_id: 139,
        location: Some("Phoenix-Mesa-Scottsdale, AZ".to_string()),
        user_agent: None,
    }
}

fn count(db: &DuckDbWarehouse, sql: &str) -> i64 {
    let conn = db.conn_for_test();
    let mut stmt = conn.prepare(sql).expect("prepare");
    stmt.query_row([], |row| row.get(0)).expect("count")
}

fn load_catalog(db: &mut DuckDbWarehouse, songs: &[SongRow], artists: &[ArtistRow]) {
    let mut tx = db.begin_file().expect("begin");
    for s in songs {
        tx.insert_song(s).expect("song");
    }
    for a in artists {
        tx.insert_artist(a).expect("artist");
    }
    tx.commit().expect("commit");
}

#[test]
fn test_schema_creation_is_idempotent() {
    let db = DuckDbWarehouse::open_in_memory().expect("db");
    db.create_schema().expect("second create");
    db.create_schema().expect("third create");

    let counts = db.table_counts().expect("counts");
    let tables: Vec<&str> = counts.iter().map(|c| c.table).collect();
    assert_eq!(tables, ["songplays", "users", "songs", "artists", "time"]);
    assert!(counts.iter().all(|c| c.rows == 0));
}

#[test]
fn test_reset_schema_discards_rows_and_restarts_keys() {
    let mut db = DuckDbWarehouse::open_in_memory().expect("db");
    load_catalog(&mut db, &[song("S1", "T", "A1", 180.5)], &[artist("A1", "N")]);
    let mut tx = db.begin_file().expect("begin");
    tx.insert_songplay(&songplay(1541106106796, None)).expect("songplay");
    tx.commit().expect("commit");

    db.reset_schema().expect("reset");
    db.drop_schema().expect("drop again");
    db.create_schema().expect("create");

    assert!(db.table_counts().expect("counts").iter().all(|c| c.rows == 0));

    let mut tx = db.begin_file().expect("begin");
    tx.insert_songplay(&songplay(1541106106796, None)).expect("songplay");
    tx.commit().expect("commit");
    assert_eq!(count(&db, "SELECT MIN(songplay_id) FROM songplays"), 1);
}

#[test]
fn test_song_and_artist_insert_or_ignore() {
    let mut db = DuckDbWarehouse::open_in_memory().expect("db");
    load_catalog(&mut db, &[song("S1", "T", "A1", 180.5)], &[artist("A1", "N")]);
    // Same keys again with different attributes: the first row stays.
    load_catalog(&mut db, &[song("S1", "Other", "A1", 1.0)], &[artist("A1", "Other")]);

    assert_eq!(count(&db, "SELECT COUNT(*) FROM songs"), 1);
    assert_eq!(count(&db, "SELECT COUNT(*) FROM artists"), 1);

    let conn = db.conn_for_test();
    let mut stmt = conn
        .prepare("SELECT song_id, title, artist_id, year, duration FROM songs")
        .expect("prepare");
    let row: (String, String, String, i32, f64) = stmt
        .query_row([], |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?, r.get(3)?, r.get(4)?)))
        .expect("row");
    assert_eq!(row, ("S1".into(), "T".into(), "A1".into(), 2000, 180.5));

    let mut stmt = conn
        .prepare("SELECT name, location, latitude, longitude FROM artists WHERE artist_id = 'A1'")
        .expect("prepare");
    let row: (String, Option<String>, Option<f64>, Option<f64>) = stmt
        .query_row([], |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?, r.get(3)?)))
        .expect("row");
    assert_eq!(row, ("N".into(), Some("L".into()), Some(1.0), Some(2.0)));
}

#[test]
fn test_artist_nullable_columns_store_null() {
    let mut db = DuckDbWarehouse::open_in_memory().expect("db");
    let mut a = artist("A2", "Casual");
    a.location = None;
    a.latitude = None;
    a.longitude = None;
    load_catalog(&mut db, &[], &[a]);

    assert_eq!(
        count(
            &db,
            "SELECT COUNT(*) FROM artists WHERE location IS NULL AND latitude IS NULL AND longitude IS NULL"
        ),
        1
    );
}

#[test]
fn test_user_upsert_overwrites_level_only() {
    let mut db = DuckDbWarehouse::open_in_memory().expect("db");
    let mut tx = db.begin_file().expect("begin");
    tx.upsert_user(&user(8, "Kaylee", "free")).expect("first");
    tx.upsert_user(&user(8, "Renamed", "paid")).expect("second");
    tx.commit().expect("commit");

    let conn = db.conn_for_test();
    let mut stmt = conn
        .prepare("SELECT first_name, level FROM users WHERE user_id = 8")
        .expect("prepare");
    let (first_name, level): (String, String) = stmt
        .query_row([], |r| Ok((r.get(0)?, r.get(1)?)))
        .expect("row");
    assert_eq!(first_name, "Kaylee");
    assert_eq!(level, "paid");
    assert_eq!(count(&db, "SELECT COUNT(*) FROM users"), 1);
}

#[test]
fn test_time_rows_dedup_on_start_time() {
    let mut db = DuckDbWarehouse::open_in_memory().expect("db");
    let row = TimeRow::from_timestamp(timestamp_from_millis(1_542_241_826_796).expect("ts"));
    let mut tx = db.begin_file().expect("begin");
    tx.insert_time(&row).expect("first");
    tx.insert_time(&row).expect("duplicate ignored");
    tx.commit().expect("commit");

    assert_eq!(count(&db, r#"SELECT COUNT(*) FROM "time""#), 1);

    let conn = db.conn_for_test();
    let mut stmt = conn
        .prepare(r#"SELECT epoch_ms(start_time), hour, day, week, month, year, weekday FROM "time""#)
        .expect("prepare");
    let stored: (i64, i32, i32, i32, i32, i32, i32) = stmt
        .query_row([], |r| {
            Ok((
                r.get(0)?,
                r.get(1)?,
                r.get(2)?,
                r.get(3)?,
                r.get(4)?,
                r.get(5)?,
                r.get(6)?,
            ))
        })
        .expect("row");
    assert_eq!(
        stored,
        (1_542_241_826_796, 0, 15, 46, 11, 2018, 3)
    );
}

#[test]
fn test_songplays_are_never_deduplicated() {
    let mut db = DuckDbWarehouse::open_in_memory().expect("db");
    let mut tx = db.begin_file().expect("begin");
    tx.insert_songplay(&songplay(1541106106796, Some("S1"))).expect("first");
    tx.insert_songplay(&songplay(1541106106796, Some("S1"))).expect("identical");
    tx.insert_songplay(&songplay(1541106352796, None)).expect("unmatched");
    tx.commit().expect("commit");

    assert_eq!(count(&db, "SELECT COUNT(*) FROM songplays"), 3);
    assert_eq!(count(&db, "SELECT COUNT(DISTINCT songplay_id) FROM songplays"), 3);
    assert_eq!(
        count(
            &db,
            "SELECT COUNT(*) FROM songplays WHERE song_id IS NULL AND artist_id IS NULL"
        ),
        1
    );
}

#[test]
fn test_lookup_exact_match_and_miss() {
    let mut db = DuckDbWarehouse::open_in_memory().expect("db");
    load_catalog(
        &mut db,
        &[song("S1", "You Gotta Be", "A1", 246.30812)],
        &[artist("A1", "Des'ree")],
    );

    let hit = db
        .find_song_artist("You Gotta Be", "Des'ree", 246.30812)
        .expect("lookup");
    assert_eq!(
        hit,
        Some(SongArtistMatch {
            song_id: "S1".into(),
            artist_id: "A1".into(),
        })
    );

    // Every field has to match exactly.
    assert_eq!(db.find_song_artist("You Gotta Be", "Des'ree", 246.3).expect("lookup"), None);
    assert_eq!(db.find_song_artist("you gotta be", "Des'ree", 246.30812).expect("lookup"), None);
    assert_eq!(db.find_song_artist("You Gotta Be", "Desree", 246.30812).expect("lookup"), None);
}

#[test]
fn test_lookup_tie_break_picks_lowest_song_id() {
    let mut db = DuckDbWarehouse::open_in_memory().expect("db");
    load_catalog(
        &mut db,
        &[song("S9", "Dup", "A1", 100.0), song("S2", "Dup", "A1", 100.0)],
        &[artist("A1", "N")],
    );
    let hit = db.find_song_artist("Dup", "N", 100.0).expect("lookup").expect("match");
    assert_eq!(hit.song_id, "S2");
}

#[test]
fn test_repeated_lookups_in_one_file_transaction_see_its_rows() {
    let mut db = DuckDbWarehouse::open_in_memory().expect("db");
    load_catalog(&mut db, &[song("S1", "Yellow", "A1", 266.86975)], &[artist("A1", "Coldplay")]);

    let mut tx = db.begin_file().expect("begin");
    for _ in 0..3 {
        let hit = tx.find_song_artist("Yellow", "Coldplay", 266.86975).expect("lookup");
        assert_eq!(hit.map(|m| m.song_id).as_deref(), Some("S1"));
        assert_eq!(tx.find_song_artist("Clocks", "Coldplay", 307.51302).expect("lookup"), None);
    }
    // A song added inside the same transaction is visible to the next lookup.
    tx.insert_song(&song("S2", "Clocks", "A1", 307.51302)).expect("song");
    let hit = tx.find_song_artist("Clocks", "Coldplay", 307.51302).expect("lookup");
    assert_eq!(hit.map(|m| m.song_id).as_deref(), Some("S2"));
    tx.commit().expect("commit");
}

#[test]
fn test_dropped_transaction_rolls_back() {
    let mut db = DuckDbWarehouse::open_in_memory().expect("db");
    {
        let mut tx = db.begin_file().expect("begin");
        tx.insert_song(&song("S1", "T", "A1", 1.0)).expect("song");
    }
    assert_eq!(
        db.table_counts().expect("counts")[2],
        TableCount {
            table: "songs",
            rows: 0
        }
    );
}

#[test]
fn test_open_file_database_persists_across_reopen() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("sparkifydb.duckdb");

    let mut db = DuckDbWarehouse::open(&path, "512MB").expect("open");
    load_catalog(&mut db, &[song("S1", "T", "A1", 1.0)], &[artist("A1", "N")]);
    db.close().expect("close");

    let db = DuckDbWarehouse::open(&path, "512MB").expect("reopen");
    assert_eq!(count(&db, "SELECT COUNT(*) FROM songs"), 1);
    db.close().expect("close");
}

#[test]
fn test_open_in_missing_directory_fails() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("no-such-dir").join("db.duckdb");
    let err = DuckDbWarehouse::open(&path, "1GB")
        .err()
        .expect("open should fail");
    assert!(err.to_string().contains("failed to open DuckDB database"));
}

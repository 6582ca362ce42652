/// Per-connection DuckDB settings, applied once at open time.
///
/// `memory_limit` comes from `Config.duckdb_memory_limit` (default `"1GB"`).
/// Always set explicitly: the DuckDB default is 80% of system RAM.
pub fn session_settings_sql(memory_limit: &str) -> String {
    format!(
        r#"SET memory_limit = '{memory_limit}';
SET threads = 2;
"#
    )
}

// ===========================================
// CREATE
// ===========================================
// `time` is quoted everywhere: it doubles as a type name.

/// Backs `songplays.songplay_id`. DuckDB has no SERIAL type.
pub const SONGPLAY_SEQUENCE_CREATE: &str =
    "CREATE SEQUENCE IF NOT EXISTS songplay_id_seq START 1;";

/// Fact table. No FOREIGN KEY declarations: `song_id`/`artist_id` are NULL
/// whenever the song/artist lookup misses.
pub const SONGPLAY_TABLE_CREATE: &str = r#"
CREATE TABLE IF NOT EXISTS songplays (
    songplay_id     BIGINT PRIMARY KEY DEFAULT nextval('songplay_id_seq'),
    start_time      TIMESTAMP NOT NULL,
    user_id         INTEGER NOT NULL,
    level           VARCHAR,                       -- tier at time of play
    song_id         VARCHAR,
    artist_id       VARCHAR,
    session_id      INTEGER,
    location        VARCHAR,
    user_agent      VARCHAR
);
"#;

pub const USER_TABLE_CREATE: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    user_id         INTEGER PRIMARY KEY,
    first_name      VARCHAR,
    last_name       VARCHAR,
    gender          VARCHAR,
    level           VARCHAR                        -- 'free' | 'paid', last seen wins
);
"#;

pub const SONG_TABLE_CREATE: &str = r#"
CREATE TABLE IF NOT EXISTS songs (
    song_id         VARCHAR PRIMARY KEY,
    title           VARCHAR,
    artist_id       VARCHAR,
    year            INTEGER,                       -- 0 = unknown
    duration        DOUBLE                         -- seconds
);
"#;

pub const ARTIST_TABLE_CREATE: &str = r#"
CREATE TABLE IF NOT EXISTS artists (
    artist_id       VARCHAR PRIMARY KEY,
    name            VARCHAR,
    location        VARCHAR,
    latitude        DOUBLE,
    longitude       DOUBLE
);
"#;

pub const TIME_TABLE_CREATE: &str = r#"
CREATE TABLE IF NOT EXISTS "time" (
    start_time      TIMESTAMP PRIMARY KEY,
    hour            INTEGER,
    day             INTEGER,
    week            INTEGER,                       -- ISO week of year
    month           INTEGER,
    year            INTEGER,
    weekday         INTEGER                        -- Monday = 0
);
"#;

// ===========================================
// DROP
// ===========================================

pub const SONGPLAY_TABLE_DROP: &str = "DROP TABLE IF EXISTS songplays;";
pub const USER_TABLE_DROP: &str = "DROP TABLE IF EXISTS users;";
pub const SONG_TABLE_DROP: &str = "DROP TABLE IF EXISTS songs;";
pub const ARTIST_TABLE_DROP: &str = "DROP TABLE IF EXISTS artists;";
pub const TIME_TABLE_DROP: &str = r#"DROP TABLE IF EXISTS "time";"#;
/// Must run after `songplays` is dropped: the column default depends on it.
pub const SONGPLAY_SEQUENCE_DROP: &str = "DROP SEQUENCE IF EXISTS songplay_id_seq;";

// ===========================================
// INSERT
// ===========================================
// Positional parameters only, never format!() into SQL.

pub const SONGPLAY_TABLE_INSERT: &str = r#"
INSERT INTO songplays (
    start_time, user_id, level, song_id, artist_id, session_id, location, user_agent
) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
"#;

/// Upsert: only `level` moves on conflict.
pub const USER_TABLE_INSERT: &str = r#"
INSERT INTO users (user_id, first_name, last_name, gender, level)
VALUES (?1, ?2, ?3, ?4, ?5)
ON CONFLICT (user_id) DO UPDATE SET level = EXCLUDED.level
"#;

pub const SONG_TABLE_INSERT: &str = r#"
INSERT INTO songs (song_id, title, artist_id, year, duration)
VALUES (?1, ?2, ?3, ?4, ?5)
ON CONFLICT DO NOTHING
"#;

pub const ARTIST_TABLE_INSERT: &str = r#"
INSERT INTO artists (artist_id, name, location, latitude, longitude)
VALUES (?1, ?2, ?3, ?4, ?5)
ON CONFLICT DO NOTHING
"#;

pub const TIME_TABLE_INSERT: &str = r#"
INSERT INTO "time" (start_time, hour, day, week, month, year, weekday)
VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
ON CONFLICT DO NOTHING
"#;

// ===========================================
// FIND SONGS
// ===========================================

/// `(title, artist name, duration)` -> `(song_id, artist_id)`, exact match.
/// Duplicate matches resolve to the lowest key pair.
pub const SONG_SELECT: &str = r#"
SELECT s.song_id, a.artist_id
FROM songs s
JOIN artists a ON s.artist_id = a.artist_id
WHERE s.title = ?1 AND a.name = ?2 AND s.duration = ?3
ORDER BY s.song_id, a.artist_id
LIMIT 1
"#;

// ===========================================
// QUERY LISTS
// ===========================================

/// Creation order: the sequence must exist before `songplays`.
pub const CREATE_TABLE_QUERIES: [&str; 6] = [
    SONGPLAY_SEQUENCE_CREATE,
    SONGPLAY_TABLE_CREATE,
    USER_TABLE_CREATE,
    SONG_TABLE_CREATE,
    ARTIST_TABLE_CREATE,
    TIME_TABLE_CREATE,
];

pub const DROP_TABLE_QUERIES: [&str; 6] = [
    SONGPLAY_TABLE_DROP,
    USER_TABLE_DROP,
    SONG_TABLE_DROP,
    ARTIST_TABLE_DROP,
    TIME_TABLE_DROP,
    SONGPLAY_SEQUENCE_DROP,
];

/// Star-schema tables with a row-count query each, fact table first.
pub const TABLE_COUNT_QUERIES: [(&str, &str); 5] = [
    ("songplays", "SELECT COUNT(*) FROM songplays"),
    ("users", "SELECT COUNT(*) FROM users"),
    ("songs", "SELECT COUNT(*) FROM songs"),
    ("artists", "SELECT COUNT(*) FROM artists"),
    ("time", r#"SELECT COUNT(*) FROM "time""#),
];

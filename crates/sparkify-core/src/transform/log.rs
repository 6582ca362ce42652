use std::path::Path;

use serde_json::Value;

use crate::error::TransformError;
use crate::model::{timestamp_from_millis, LogEvent, RawUserId, SongPlayEvent, NEXT_SONG_PAGE};
use crate::sink::StarSchemaSink;
use crate::transform::FileStats;

/// Events kept from a log file, plus how many lines were dropped.
#[derive(Debug, Clone, Default)]
pub struct ParsedLog {
    pub plays: Vec<SongPlayEvent>,
    pub skipped: usize,
}

/// Parse a newline-delimited event log and keep only the `NextSong` events.
///
/// Every non-blank line must be valid JSON. Events on other pages (login,
/// logout, navigation) are dropped without looking at their fields; a kept
/// event must carry every field the users/time/songplays rows need.
pub fn parse_log_file(path: &Path, contents: &str) -> Result<ParsedLog, TransformError> {
    let mut parsed = ParsedLog::default();

    for (idx, line) in contents.lines().enumerate() {
        let line_no = idx + 1;
        if line.trim().is_empty() {
            continue;
        }
        let parse_error = |source| TransformError::Parse {
            path: path.to_path_buf(),
            line: line_no,
            source,
        };
        // Only the page is read before filtering; other pages may carry any field types.
        let value: Value = serde_json::from_str(line).map_err(parse_error)?;
        if value.get("page").and_then(Value::as_str) != Some(NEXT_SONG_PAGE) {
            parsed.skipped += 1;
            continue;
        }
        let event: LogEvent = serde_json::from_value(value).map_err(parse_error)?;
        parsed.plays.push(validate_song_play(path, line_no, event)?);
    }

    Ok(parsed)
}

fn validate_song_play(
    path: &Path,
    line: usize,
    event: LogEvent,
) -> Result<SongPlayEvent, TransformError> {
    let missing = |field: &'static str| TransformError::MissingField {
        path: path.to_path_buf(),
        line,
        field,
    };

    let ts = event.ts.ok_or_else(|| missing("ts"))?;
    let start_time = timestamp_from_millis(ts).ok_or_else(|| TransformError::InvalidTimestamp {
        path: path.to_path_buf(),
        line,
        ts,
    })?;

    let user_id = match event.user_id {
        None => return Err(missing("userId")),
        Some(RawUserId::Text(ref s)) if s.trim().is_empty() => return Err(missing("userId")),
        Some(raw) => parse_user_id(&raw).ok_or_else(|| TransformError::InvalidField {
            path: path.to_path_buf(),
            line,
            field: "userId",
            value: match raw {
                RawUserId::Number(n) => n.to_string(),
                RawUserId::Text(s) => s,
            },
        })?,
    };

    Ok(SongPlayEvent {
        start_time,
        user_id,
        first_name: event.first_name.ok_or_else(|| missing("firstName"))?,
        last_name: event.last_name.ok_or_else(|| missing("lastName"))?,
        gender: event.gender.ok_or_else(|| missing("gender"))?,
        level: event.level.ok_or_else(|| missing("level"))?,
        session_id: event.session_id.ok_or_else(|| missing("sessionId"))?,
        song: event.song,
        artist: event.artist,
        length: event.length,
        location: event.location,
        user_agent: event.user_agent,
    })
}

fn parse_user_id(raw: &RawUserId) -> Option<i32> {
    match raw {
        RawUserId::Number(n) => i32::try_from(*n).ok(),
        RawUserId::Text(s) => s.trim().parse().ok(),
    }
}

/// Load one event-log file.
///
/// Writes happen in three passes over the kept events, in file order:
/// 1. one time row per event
/// 2. one user upsert per event (the last line wins for `level`)
/// 3. one songplay per event, with song/artist keys when the lookup matches
///
/// Time and user rows therefore exist before any songplay that points at them.
pub fn process_log_file(sink: &mut dyn StarSchemaSink, path: &Path) -> anyhow::Result<FileStats> {
    let contents = std::fs::read_to_string(path).map_err(|source| TransformError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let ParsedLog { plays, skipped } = parse_log_file(path, &contents)?;

    let mut stats = FileStats {
        skipped_events: skipped,
        ..FileStats::default()
    };

    for play in &plays {
        sink.insert_time(&play.time_row())?;
        stats.time_rows += 1;
    }

    for play in &plays {
        sink.upsert_user(&play.user_row())?;
        stats.users += 1;
    }

    for play in &plays {
        let matched = match (&play.song, &play.artist, play.length) {
            (Some(song), Some(artist), Some(length)) => {
                sink.find_song_artist(song, artist, length)?
            }
            _ => None,
        };
        if matched.is_some() {
            stats.matched_songplays += 1;
        }
        sink.insert_songplay(&play.songplay_row(matched))?;
        stats.songplays += 1;
    }

    tracing::debug!(
        path = %path.display(),
        songplays = stats.songplays,
        matched = stats.matched_songplays,
        skipped = stats.skipped_events,
        "log file loaded"
    );
    Ok(stats)
}

use chrono::{DateTime, Datelike, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

/// One song-metadata document, exactly as it appears on disk.
///
/// Song files hold a single JSON object with both the song and the
/// artist attributes flattened into it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SongRecord {
    pub song_id: String,
    pub title: String,
    pub artist_id: String,
    /// `0` when the release year is unknown.
    pub year: i32,
    /// Track length in seconds.
    pub duration: f64,
    pub artist_name: String,
    pub artist_location: Option<String>,
    pub artist_latitude: Option<f64>,
    pub artist_longitude: Option<f64>,
}

impl SongRecord {
    pub fn song_row(&self) -> SongRow {
        SongRow {
            song_id: self.song_id.clone(),
            title: self.title.clone(),
            artist_id: self.artist_id.clone(),
            year: self.year,
            duration: self.duration,
        }
    }

    pub fn artist_row(&self) -> ArtistRow {
        ArtistRow {
            artist_id: self.artist_id.clone(),
            name: self.artist_name.clone(),
            location: self.artist_location.clone(),
            latitude: self.artist_latitude,
            longitude: self.artist_longitude,
        }
    }
}

/// `userId` is written as a string in the event log ("39"), but a numeric
/// form is accepted too. Logged-out events carry an empty string.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum RawUserId {
    Number(i64),
    Text(String),
}

/// A `NextSong` line of a session event log. Every field is optional at this
/// layer; required ones are checked when the event is validated.
/// Wire names are camelCase.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEvent {
    pub page: Option<String>,
    /// Epoch milliseconds.
    pub ts: Option<i64>,
    pub song: Option<String>,
    pub artist: Option<String>,
    pub length: Option<f64>,
    pub user_id: Option<RawUserId>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub gender: Option<String>,
    pub level: Option<String>,
    pub session_id: Option<i32>,
    pub location: Option<String>,
    pub user_agent: Option<String>,
}

/// Page value that marks an actual song play.
pub const NEXT_SONG_PAGE: &str = "NextSong";

/// A validated `NextSong` event with every required field present.
#[derive(Debug, Clone, PartialEq)]
pub struct SongPlayEvent {
    pub start_time: NaiveDateTime,
    pub user_id: i32,
    pub first_name: String,
    pub last_name: String,
    pub gender: String,
    pub level: String,
    pub session_id: i32,
    pub song: Option<String>,
    pub artist: Option<String>,
    pub length: Option<f64>,
    pub location: Option<String>,
    pub user_agent: Option<String>,
}

impl SongPlayEvent {
    pub fn time_row(&self) -> TimeRow {
        TimeRow::from_timestamp(self.start_time)
    }

    pub fn user_row(&self) -> UserRow {
        UserRow {
            user_id: self.user_id,
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            gender: self.gender.clone(),
            level: self.level.clone(),
        }
    }

    /// Build the fact row, carrying whatever the song/artist lookup resolved.
    pub fn songplay_row(&self, matched: Option<SongArtistMatch>) -> SongplayRow {
        let (song_id, artist_id) = match matched {
            Some(m) => (Some(m.song_id), Some(m.artist_id)),
            None => (None, None),
        };
        SongplayRow {
            start_time: self.start_time,
            user_id: self.user_id,
            level: self.level.clone(),
            song_id,
            artist_id,
            session_id: self.session_id,
            location: self.location.clone(),
            user_agent: self.user_agent.clone(),
        }
    }
}

/// Mirrors the `songs` table columns.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SongRow {
    pub song_id: String,
    pub title: String,
    pub artist_id: String,
    pub year: i32,
    pub duration: f64,
}

/// Mirrors the `artists` table columns.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArtistRow {
    pub artist_id: String,
    pub name: String,
    pub location: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// Mirrors the `users` table columns. Only `level` changes after the first insert.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserRow {
    pub user_id: i32,
    pub first_name: String,
    pub last_name: String,
    pub gender: String,
    pub level: String,
}

/// Mirrors the `time` table columns: one row per distinct event timestamp.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeRow {
    pub start_time: NaiveDateTime,
    pub hour: i32,
    pub day: i32,
    /// ISO-8601 week of the year.
    pub week: i32,
    pub month: i32,
    pub year: i32,
    /// Monday = 0 through Sunday = 6.
    pub weekday: i32,
}

impl TimeRow {
    /// Gregorian decomposition of a UTC timestamp.
    pub fn from_timestamp(start_time: NaiveDateTime) -> Self {
        Self {
            start_time,
            hour: start_time.hour() as i32,
            day: start_time.day() as i32,
            week: start_time.iso_week().week() as i32,
            month: start_time.month() as i32,
            year: start_time.year(),
            weekday: start_time.weekday().num_days_from_monday() as i32,
        }
    }
}

/// Convert epoch milliseconds to a UTC timestamp. `None` when out of range.
pub fn timestamp_from_millis(ts: i64) -> Option<NaiveDateTime> {
    DateTime::from_timestamp_millis(ts).map(|dt| dt.naive_utc())
}

/// Mirrors the `songplays` table columns minus the generated surrogate key.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SongplayRow {
    pub start_time: NaiveDateTime,
    pub user_id: i32,
    pub level: String,
    pub song_id: Option<String>,
    pub artist_id: Option<String>,
    pub session_id: i32,
    pub location: Option<String>,
    pub user_agent: Option<String>,
}

/// Keys resolved by the song/artist lookup for a played track.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SongArtistMatch {
    pub song_id: String,
    pub artist_id: String,
}

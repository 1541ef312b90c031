use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

/// A track in the station library
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct Track {
    pub id: i64,
    pub title: String,
    pub artist: String,
    pub album: String,
    /// Length in seconds
    pub duration: i32,
    pub path: String,
    pub created_at: DateTime<Utc>,
}

/// A queued track as served to polling clients
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct PlaylistEntry {
    pub id: i64,
    pub title: String,
    pub artist: String,
    pub album: String,
    pub duration: i32,
    pub vetoes: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Veto {
    pub id: i64,
    pub user_id: Uuid,
    pub track_id: i64,
    pub radio_id: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateTrackRequest {
    #[validate(length(min = 1, max = 255))]
    pub title: String,
    #[validate(length(min = 1, max = 255))]
    pub artist: String,
    #[validate(length(max = 255))]
    pub album: String,
    #[validate(range(min = 1, max = 86400))]
    pub duration: i32,
    #[validate(length(min = 1))]
    pub path: String,
}

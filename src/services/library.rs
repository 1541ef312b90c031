use crate::error::{AppError, Result};
use crate::models::{CreateTrackRequest, Track};
use chrono::Utc;
use sqlx::SqlitePool;

/// The pool of tracks the DJ draws from
pub struct Library {
    db: SqlitePool,
}

impl Library {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    pub async fn add_track(&self, req: CreateTrackRequest) -> Result<Track> {
        let track = sqlx::query_as::<_, Track>(
            r#"
            INSERT INTO tracks (title, artist, album, duration, path, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(&req.title)
        .bind(&req.artist)
        .bind(&req.album)
        .bind(req.duration)
        .bind(&req.path)
        .bind(Utc::now())
        .fetch_one(&self.db)
        .await?;

        tracing::debug!("Added '{}' by {} to the library", track.title, track.artist);
        Ok(track)
    }

    pub async fn get_track(&self, track_id: i64) -> Result<Track> {
        sqlx::query_as::<_, Track>("SELECT * FROM tracks WHERE id = ?")
            .bind(track_id)
            .fetch_optional(&self.db)
            .await?
            .ok_or_else(|| AppError::NotFound("Track not found".to_string()))
    }

    pub async fn list_tracks(&self, limit: i64, offset: i64) -> Result<(Vec<Track>, i64)> {
        let tracks = sqlx::query_as::<_, Track>(
            "SELECT * FROM tracks ORDER BY artist, album, title LIMIT ? OFFSET ?",
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.db)
        .await?;

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM tracks")
            .fetch_one(&self.db)
            .await?;

        Ok((tracks, total))
    }
}

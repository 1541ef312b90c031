use crate::error::Result;
use crate::models::{PlaylistEntry, Track};
use chrono::{DateTime, Utc};
use sqlx::SqliteConnection;

/// Ordered queue of tracks for one radio. Position order is play order and
/// the head of the queue is the current track.
#[derive(Debug, Clone, Copy)]
pub struct Playlist {
    radio_id: i64,
}

impl Playlist {
    pub fn new(radio_id: i64) -> Self {
        Self { radio_id }
    }

    pub fn radio_id(&self) -> i64 {
        self.radio_id
    }

    pub async fn tracks(&self, conn: &mut SqliteConnection) -> Result<Vec<Track>> {
        let tracks = sqlx::query_as::<_, Track>(
            r#"
            SELECT t.*
            FROM playlist_tracks pt
            JOIN tracks t ON t.id = pt.track_id
            WHERE pt.radio_id = ?
            ORDER BY pt.position
            "#,
        )
        .bind(self.radio_id)
        .fetch_all(&mut *conn)
        .await?;

        Ok(tracks)
    }

    pub async fn len(&self, conn: &mut SqliteConnection) -> Result<usize> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM playlist_tracks WHERE radio_id = ?")
            .bind(self.radio_id)
            .fetch_one(&mut *conn)
            .await?;

        Ok(count as usize)
    }

    pub async fn current_track(&self, conn: &mut SqliteConnection) -> Result<Option<Track>> {
        let track = sqlx::query_as::<_, Track>(
            r#"
            SELECT t.*
            FROM playlist_tracks pt
            JOIN tracks t ON t.id = pt.track_id
            WHERE pt.radio_id = ?
            ORDER BY pt.position
            LIMIT 1
            "#,
        )
        .bind(self.radio_id)
        .fetch_optional(&mut *conn)
        .await?;

        Ok(track)
    }

    /// Queue contents in the shape polling clients render
    pub async fn serialize_for_client(
        &self,
        conn: &mut SqliteConnection,
    ) -> Result<Vec<PlaylistEntry>> {
        let entries = sqlx::query_as::<_, PlaylistEntry>(
            r#"
            SELECT t.id, t.title, t.artist, t.album, t.duration,
                   (SELECT COUNT(*) FROM vetoes v WHERE v.track_id = t.id) AS vetoes
            FROM playlist_tracks pt
            JOIN tracks t ON t.id = pt.track_id
            WHERE pt.radio_id = ?
            ORDER BY pt.position
            "#,
        )
        .bind(self.radio_id)
        .fetch_all(&mut *conn)
        .await?;

        Ok(entries)
    }

    pub async fn append(&self, conn: &mut SqliteConnection, track_id: i64) -> Result<()> {
        let last: i64 = sqlx::query_scalar(
            "SELECT COALESCE(MAX(position), 0) FROM playlist_tracks WHERE radio_id = ?",
        )
        .bind(self.radio_id)
        .fetch_one(&mut *conn)
        .await?;

        sqlx::query("INSERT INTO playlist_tracks (radio_id, track_id, position) VALUES (?, ?, ?)")
            .bind(self.radio_id)
            .bind(track_id)
            .bind(last + 1)
            .execute(&mut *conn)
            .await?;

        Ok(())
    }

    /// Dequeue a track. Returns false when it was not queued.
    pub async fn remove(&self, conn: &mut SqliteConnection, track_id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM playlist_tracks WHERE radio_id = ? AND track_id = ?")
            .bind(self.radio_id)
            .bind(track_id)
            .execute(&mut *conn)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Record a track that left the head of the queue
    pub async fn record_history(
        &self,
        conn: &mut SqliteConnection,
        track_id: i64,
        finished_at: DateTime<Utc>,
        skipped: bool,
    ) -> Result<()> {
        sqlx::query(
            "INSERT INTO playlist_history (radio_id, track_id, finished_at, skipped)
             VALUES (?, ?, ?, ?)",
        )
        .bind(self.radio_id)
        .bind(track_id)
        .bind(finished_at)
        .bind(skipped)
        .execute(&mut *conn)
        .await?;

        Ok(())
    }

    pub async fn recent_track_ids(&self, conn: &mut SqliteConnection, limit: i64) -> Result<Vec<i64>> {
        let ids = sqlx::query_scalar::<_, i64>(
            "SELECT track_id FROM playlist_history
             WHERE radio_id = ?
             ORDER BY id DESC
             LIMIT ?",
        )
        .bind(self.radio_id)
        .bind(limit)
        .fetch_all(&mut *conn)
        .await?;

        Ok(ids)
    }
}

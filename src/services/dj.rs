use crate::config::Config;
use crate::error::Result;
use crate::services::playlist::Playlist;
use rand::{seq::SliceRandom, Rng};
use sqlx::SqliteConnection;
use std::collections::HashSet;

/// How many finished tracks count as "recently played" when refilling
const RECENT_HISTORY_LIMIT: i64 = 20;

/// A library track the DJ may queue
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct Candidate {
    pub id: i64,
    pub vetoes: i64,
}

/// Keeps a radio's playlist topped up
#[derive(Debug, Clone)]
pub struct Dj {
    min_tracks: usize,
    target_tracks: usize,
}

impl Dj {
    pub fn new(min_tracks: usize, target_tracks: usize) -> Self {
        Self {
            min_tracks: min_tracks.max(1),
            target_tracks: target_tracks.max(min_tracks).max(1),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.dj_min_tracks, config.dj_target_tracks)
    }

    pub fn need_to_run(&self, queued: usize) -> bool {
        queued < self.min_tracks
    }

    /// Refill the playlist up to the target size. Returns how many tracks were queued.
    pub async fn run(&self, conn: &mut SqliteConnection, playlist: &Playlist) -> Result<usize> {
        let queued = playlist.len(conn).await?;
        let wanted = self.target_tracks.saturating_sub(queued);
        if wanted == 0 {
            return Ok(0);
        }

        let candidates = sqlx::query_as::<_, Candidate>(
            r#"
            SELECT t.id,
                   (SELECT COUNT(*) FROM vetoes v WHERE v.track_id = t.id) AS vetoes
            FROM tracks t
            WHERE t.id NOT IN (SELECT track_id FROM playlist_tracks WHERE radio_id = ?)
            "#,
        )
        .bind(playlist.radio_id())
        .fetch_all(&mut *conn)
        .await?;

        let recent: HashSet<i64> = playlist
            .recent_track_ids(conn, RECENT_HISTORY_LIMIT)
            .await?
            .into_iter()
            .collect();

        let picks = choose_tracks(candidates, &recent, wanted, &mut rand::thread_rng());

        for track_id in &picks {
            playlist.append(conn, *track_id).await?;
        }

        if picks.len() < wanted {
            tracing::warn!(
                "Library exhausted for radio {}: wanted {} tracks, queued {}",
                playlist.radio_id(),
                wanted,
                picks.len()
            );
        }

        tracing::info!(
            "DJ queued {} tracks on radio {} ({} -> {})",
            picks.len(),
            playlist.radio_id(),
            queued,
            queued + picks.len()
        );

        Ok(picks.len())
    }
}

/// Pick up to `count` track ids. Order is random, except that tracks not
/// played recently come first and fewer vetoes beat more.
pub fn choose_tracks<R: Rng + ?Sized>(
    mut candidates: Vec<Candidate>,
    recent: &HashSet<i64>,
    count: usize,
    rng: &mut R,
) -> Vec<i64> {
    candidates.shuffle(rng);
    // Stable sort keeps the shuffle as tie-breaker
    candidates.sort_by_key(|c| (recent.contains(&c.id), c.vetoes));

    candidates.into_iter().take(count).map(|c| c.id).collect()
}

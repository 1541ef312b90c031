use crate::models::PlayerStatus;
use chrono::{DateTime, Duration, Utc};

/// Play/pause state machine with a playback clock for the current track.
///
/// Elapsed time accumulates only while playing. The clock belongs to one track
/// at a time: `load` with a different track resets it.
#[derive(Debug, Clone)]
pub struct Player {
    status: PlayerStatus,
    track_id: Option<i64>,
    played: Duration,
    resumed_at: Option<DateTime<Utc>>,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            status: PlayerStatus::Paused,
            track_id: None,
            played: Duration::zero(),
            resumed_at: None,
        }
    }
}

impl Player {
    pub fn status(&self) -> PlayerStatus {
        self.status
    }

    pub fn play(&mut self, now: DateTime<Utc>) {
        if self.status == PlayerStatus::Paused {
            self.status = PlayerStatus::Playing;
            self.resumed_at = Some(now);
        }
    }

    pub fn pause(&mut self, now: DateTime<Utc>) {
        if self.status == PlayerStatus::Playing {
            self.played = self.elapsed(now);
            self.resumed_at = None;
            self.status = PlayerStatus::Paused;
        }
    }

    pub fn elapsed(&self, now: DateTime<Utc>) -> Duration {
        match self.resumed_at {
            Some(resumed_at) if now > resumed_at => self.played + (now - resumed_at),
            _ => self.played,
        }
    }

    /// Point the clock at `track_id`. A different track starts from zero.
    pub fn load(&mut self, track_id: Option<i64>, now: DateTime<Utc>) {
        if self.track_id != track_id {
            self.start_track(track_id, Duration::zero(), now);
        }
    }

    /// Move on to `next` after the current track ran to its end, carrying
    /// `overflow` of already-played time into it.
    pub fn finish_track(&mut self, next: Option<i64>, overflow: Duration, now: DateTime<Utc>) {
        self.start_track(next, overflow, now);
    }

    fn start_track(&mut self, track_id: Option<i64>, offset: Duration, now: DateTime<Utc>) {
        self.track_id = track_id;
        self.played = offset;
        self.resumed_at = match self.status {
            PlayerStatus::Playing => Some(now),
            PlayerStatus::Paused => None,
        };
    }
}

use crate::error::{AppError, Result};
use crate::models::{
    ActionOutcome, ActionStatus, PlayerAction, PlayerSnapshot, Radio, RadioAction, Track,
    UpdateData, UpdateSections,
};
use crate::services::{dj::Dj, player::Player, playlist::Playlist, vetoes};
use chrono::{DateTime, Duration, Utc};
use sqlx::{SqliteConnection, SqlitePool};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

/// In-memory half of a radio: the player and the last action applied to it.
/// The playlist and veto tally live in the database.
#[derive(Debug, Clone, Default)]
pub struct RadioState {
    pub player: Player,
    pub last_action: Option<PlayerAction>,
}

/// Owns every radio aggregate. Requests against one radio are serialized
/// through that radio's mutex and commit their database changes in one
/// transaction. A request works on a copy of the `RadioState` that replaces
/// the guarded one only once the transaction has committed.
#[derive(Clone)]
pub struct RadioManager {
    db: SqlitePool,
    dj: Dj,
    update_interval_secs: u64,
    radios: Arc<RwLock<HashMap<i64, Arc<Mutex<RadioState>>>>>,
    default_radio: Arc<RwLock<Option<i64>>>,
}

impl RadioManager {
    pub fn new(db: SqlitePool, dj: Dj, update_interval_secs: u64) -> Self {
        Self {
            db,
            dj,
            update_interval_secs,
            radios: Arc::new(RwLock::new(HashMap::new())),
            default_radio: Arc::new(RwLock::new(None)),
        }
    }

    /// Load all radios, creating `default_name` if it does not exist yet
    pub async fn load_radios(&self, default_name: &str) -> Result<()> {
        sqlx::query("INSERT INTO radios (name, created_at) VALUES (?, ?) ON CONFLICT (name) DO NOTHING")
            .bind(default_name)
            .bind(Utc::now())
            .execute(&self.db)
            .await?;

        let radios = self.list_radios().await?;
        tracing::info!("Loading {} radios", radios.len());

        let mut states = self.radios.write().await;
        for radio in &radios {
            states.entry(radio.id).or_default();
            if radio.name == default_name {
                *self.default_radio.write().await = Some(radio.id);
            }
        }

        Ok(())
    }

    pub async fn list_radios(&self) -> Result<Vec<Radio>> {
        let radios = sqlx::query_as::<_, Radio>("SELECT * FROM radios ORDER BY id")
            .fetch_all(&self.db)
            .await?;

        Ok(radios)
    }

    pub async fn create_radio(&self, name: &str) -> Result<Radio> {
        let radio = sqlx::query_as::<_, Radio>(
            "INSERT INTO radios (name, created_at) VALUES (?, ?) RETURNING *",
        )
        .bind(name)
        .bind(Utc::now())
        .fetch_one(&self.db)
        .await
        .map_err(|e| {
            let unique = e
                .as_database_error()
                .map(|db| db.is_unique_violation())
                .unwrap_or(false);
            if unique {
                AppError::Validation("Radio name already exists".to_string())
            } else {
                AppError::Database(e)
            }
        })?;

        self.radios.write().await.entry(radio.id).or_default();
        tracing::info!("Created radio '{}' ({})", radio.name, radio.id);

        Ok(radio)
    }

    pub async fn default_radio_id(&self) -> Result<i64> {
        self.default_radio
            .read()
            .await
            .ok_or_else(|| AppError::NotFound("No default radio".to_string()))
    }

    pub async fn need_to_run(&self, radio_id: i64) -> Result<bool> {
        let mut conn = self.db.acquire().await?;
        let queued = Playlist::new(radio_id).len(&mut conn).await?;
        Ok(self.dj.need_to_run(queued))
    }

    pub async fn last_player_action(&self, radio_id: i64) -> Result<Option<PlayerAction>> {
        let state = self.state(radio_id).await?;
        let state = state.lock().await;
        Ok(state.last_action)
    }

    /// Polling snapshot: finished tracks are retired and the playlist refilled first
    pub async fn update(&self, radio_id: i64, sections: UpdateSections) -> Result<UpdateData> {
        let guarded = self.state(radio_id).await?;
        let mut guard = guarded.lock().await;
        let mut state = guard.clone();
        let playlist = Playlist::new(radio_id);
        let now = Utc::now();

        let mut tx = self.db.begin().await?;
        self.advance_finished(&mut tx, &playlist, &mut state, now).await?;
        self.maintain_locked(&mut tx, &playlist, &mut state, now).await?;
        let mut data = snapshot(&mut tx, &playlist, &state, sections).await?;
        tx.commit().await?;
        *guard = state;

        data.next_update_time = Some(self.update_interval_secs);
        Ok(data)
    }

    /// Run playlist maintenance without producing a snapshot
    pub async fn maintain(&self, radio_id: i64) -> Result<()> {
        let guarded = self.state(radio_id).await?;
        let mut guard = guarded.lock().await;
        let mut state = guard.clone();
        let playlist = Playlist::new(radio_id);
        let now = Utc::now();

        let mut tx = self.db.begin().await?;
        self.advance_finished(&mut tx, &playlist, &mut state, now).await?;
        self.maintain_locked(&mut tx, &playlist, &mut state, now).await?;
        tx.commit().await?;
        *guard = state;

        Ok(())
    }

    /// Read-only snapshot, no maintenance
    pub async fn snapshot(&self, radio_id: i64, sections: UpdateSections) -> Result<UpdateData> {
        let state = self.state(radio_id).await?;
        let state = state.lock().await;
        let mut conn = self.db.acquire().await?;

        snapshot(&mut conn, &Playlist::new(radio_id), &state, sections).await
    }

    /// Apply a listener action to the track they believe is playing.
    ///
    /// When `track_id` is not the current track nothing changes and the outcome
    /// is `Stale`, carrying a fresh snapshot for the client to resync from.
    pub async fn perform(
        &self,
        radio_id: i64,
        user_id: Uuid,
        action: RadioAction,
        track_id: i64,
    ) -> Result<ActionOutcome> {
        let guarded = self.state(radio_id).await?;
        let mut guard = guarded.lock().await;
        let mut state = guard.clone();
        let playlist = Playlist::new(radio_id);
        let now = Utc::now();

        let mut tx = self.db.begin().await?;
        self.advance_finished(&mut tx, &playlist, &mut state, now).await?;

        let track = sqlx::query_as::<_, Track>("SELECT * FROM tracks WHERE id = ?")
            .bind(track_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| AppError::NotFound("Track not found".to_string()))?;

        let current = playlist.current_track(&mut tx).await?;
        if current.as_ref().map(|t| t.id) != Some(track.id) {
            tracing::debug!(
                "Ignoring {:?} on radio {}: track {} is not current ({:?})",
                action,
                radio_id,
                track.id,
                current.as_ref().map(|t| t.id)
            );
            let data =
                snapshot(&mut tx, &playlist, &state, UpdateSections::PLAYLIST_AND_PLAYER).await?;
            tx.commit().await?;
            *guard = state;

            return Ok(ActionOutcome {
                status: ActionStatus::Stale,
                track: Some(track),
                data,
            });
        }

        let resolved = match action {
            RadioAction::Play => {
                state.player.play(now);
                record_action(&mut state, radio_id, PlayerAction::Play);
                Some(track)
            }
            RadioAction::Pause => {
                state.player.pause(now);
                record_action(&mut state, radio_id, PlayerAction::Pause);
                Some(track)
            }
            RadioAction::Veto => {
                let created = vetoes::create(&mut tx, user_id, track.id, radio_id).await?;
                if !created {
                    tracing::debug!("User {} already vetoed track {}", user_id, track.id);
                }
                playlist.remove(&mut tx, track.id).await?;
                playlist.record_history(&mut tx, track.id, now, true).await?;
                tracing::info!("User {} vetoed '{}' on radio {}", user_id, track.title, radio_id);

                // Vetoing moves straight on to the next track
                state.player.play(now);
                record_action(&mut state, radio_id, PlayerAction::Play);
                playlist.current_track(&mut tx).await?
            }
        };

        self.maintain_locked(&mut tx, &playlist, &mut state, now).await?;

        // A veto that emptied the playlist resolves to whatever the DJ queued
        let resolved = match (action, resolved) {
            (RadioAction::Veto, None) => playlist.current_track(&mut tx).await?,
            (_, resolved) => resolved,
        };

        let data = snapshot(&mut tx, &playlist, &state, action.response_sections()).await?;
        tx.commit().await?;
        *guard = state;

        Ok(ActionOutcome {
            status: ActionStatus::Applied,
            track: resolved,
            data,
        })
    }

    async fn state(&self, radio_id: i64) -> Result<Arc<Mutex<RadioState>>> {
        self.radios
            .read()
            .await
            .get(&radio_id)
            .cloned()
            .ok_or_else(|| AppError::NotFound("Radio not found".to_string()))
    }

    /// Retire every head track whose playing time has run out
    async fn advance_finished(
        &self,
        conn: &mut SqliteConnection,
        playlist: &Playlist,
        state: &mut RadioState,
        now: DateTime<Utc>,
    ) -> Result<()> {
        loop {
            let Some(current) = playlist.current_track(conn).await? else {
                state.player.load(None, now);
                return Ok(());
            };
            state.player.load(Some(current.id), now);

            let length = Duration::seconds(i64::from(current.duration.max(1)));
            let elapsed = state.player.elapsed(now);
            if elapsed < length {
                return Ok(());
            }

            let overflow = elapsed - length;
            playlist.remove(conn, current.id).await?;
            playlist.record_history(conn, current.id, now - overflow, false).await?;
            tracing::info!("Finished '{}' on radio {}", current.title, playlist.radio_id());

            let next = playlist.current_track(conn).await?.map(|t| t.id);
            state.player.finish_track(next, overflow, now);
        }
    }

    async fn maintain_locked(
        &self,
        conn: &mut SqliteConnection,
        playlist: &Playlist,
        state: &mut RadioState,
        now: DateTime<Utc>,
    ) -> Result<()> {
        let queued = playlist.len(conn).await?;
        if self.dj.need_to_run(queued) {
            tracing::debug!("Radio {} has {} queued tracks, running DJ", playlist.radio_id(), queued);
            self.dj.run(conn, playlist).await?;
        }

        let current = playlist.current_track(conn).await?.map(|t| t.id);
        state.player.load(current, now);
        Ok(())
    }
}

fn record_action(state: &mut RadioState, radio_id: i64, action: PlayerAction) {
    state.last_action = Some(action);
    tracing::info!(radio_id, player_action = ?action, "Player action applied");
}

async fn snapshot(
    conn: &mut SqliteConnection,
    playlist: &Playlist,
    state: &RadioState,
    sections: UpdateSections,
) -> Result<UpdateData> {
    let mut data = UpdateData::default();

    if sections.playlist {
        data.playlist = Some(playlist.serialize_for_client(conn).await?);
    }
    if sections.player {
        let current_track = playlist.current_track(conn).await?.map(|t| t.id);
        data.player = Some(PlayerSnapshot {
            status: state.player.status(),
            current_track,
        });
    }

    Ok(data)
}

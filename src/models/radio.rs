use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use super::PlaylistEntry;
use crate::error::AppError;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Radio {
    pub id: i64,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateRadioRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum PlayerStatus {
    Playing,
    #[default]
    Paused,
}

/// Listener request against the current track
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RadioAction {
    Play,
    Pause,
    Veto,
}

impl RadioAction {
    /// Sections returned once the action has been applied
    pub fn response_sections(self) -> UpdateSections {
        match self {
            RadioAction::Play | RadioAction::Veto => UpdateSections::PLAYLIST_AND_PLAYER,
            RadioAction::Pause => UpdateSections::PLAYER,
        }
    }
}

/// Last play/pause request applied to a radio's player
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PlayerAction {
    Play,
    Pause,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlayerSnapshot {
    pub status: PlayerStatus,
    pub current_track: Option<i64>,
}

/// Polling payload; absent sections are left out of the JSON
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct UpdateData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub playlist: Option<Vec<PlaylistEntry>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub player: Option<PlayerSnapshot>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_update_time: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpdateSections {
    pub playlist: bool,
    pub player: bool,
}

impl UpdateSections {
    pub const PLAYER: Self = Self { playlist: false, player: true };
    pub const PLAYLIST_AND_PLAYER: Self = Self { playlist: true, player: true };

    /// Parse the `request` query value: `all` or a comma-separated list of
    /// `playlist` and `player`.
    pub fn parse(request: &str) -> Result<Self, AppError> {
        let request = request.trim();
        if request.is_empty() || request == "all" {
            return Ok(Self::PLAYLIST_AND_PLAYER);
        }

        let mut sections = Self { playlist: false, player: false };
        for part in request.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            match part {
                "all" => return Ok(Self::PLAYLIST_AND_PLAYER),
                "playlist" => sections.playlist = true,
                "player" => sections.player = true,
                other => {
                    return Err(AppError::Validation(format!(
                        "Unknown update section '{}'",
                        other
                    )))
                }
            }
        }
        Ok(sections)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionStatus {
    Applied,
    /// The request targeted a track that is no longer current
    Stale,
}

#[derive(Debug, Clone)]
pub struct ActionOutcome {
    pub status: ActionStatus,
    /// Track the request resolved to; after a veto this is the new current track
    pub track: Option<super::Track>,
    pub data: UpdateData,
}

//! Event-bus protocol shared by all runtime components.
//!
//! This module defines the commands the console sends to the queue manager and
//! the notifications the queue manager publishes back.

use std::path::PathBuf;
use std::time::Duration;

use crate::config::Config;
use crate::queue::{EntryId, QueueEntry};
use crate::track::Track;

/// Repeat behavior applied when navigating beyond the current track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RepeatMode {
    #[default]
    Off, // Stop after reaching the end of the queue
    All, // Loop the whole queue
    One, // Loop the current track
}

impl RepeatMode {
    /// Next mode in the Off -> All -> One -> Off button cycle.
    pub fn cycled(self) -> RepeatMode {
        match self {
            RepeatMode::Off => RepeatMode::All,
            RepeatMode::All => RepeatMode::One,
            RepeatMode::One => RepeatMode::Off,
        }
    }
}

/// Top-level envelope for all bus traffic.
#[derive(Debug, Clone)]
pub enum Message {
    Queue(QueueMessage),
    Config(ConfigMessage),
}

/// Addresses a queue position either by entry id or by track identity.
#[derive(Debug, Clone, PartialEq)]
pub enum TrackRef {
    Entry(EntryId),
    Path(PathBuf),
}

/// Full ordered view of the queue, published after every mutation.
#[derive(Debug, Clone, PartialEq)]
pub struct QueueSnapshot {
    /// History followed by lookahead, in play order.
    pub entries: Vec<QueueEntry<Track>>,
    /// Position of the playing entry inside `entries`.
    pub playing_position: Option<usize>,
    /// Number of leading entries that belong to the play history.
    pub history_len: usize,
    /// Entries inserted through "play next" / "play last" and not yet played.
    pub user_queued: Vec<EntryId>,
    pub total_length: Duration,
    pub remaining_length: Duration,
    pub queue_ended: bool,
}

/// Queue-domain commands and notifications.
#[derive(Debug, Clone)]
pub enum QueueMessage {
    SetQueue(Vec<Track>),
    EnqueueNext(Vec<Track>),
    EnqueueLast(Vec<Track>),
    ChangeOrder,
    SetRepeatMode(RepeatMode),
    CycleRepeatMode,
    Advance,
    Rewind,
    JumpTo(TrackRef),
    UpdateTrackRating {
        path: PathBuf,
        rating: u8,
    },
    RequestSnapshot,
    Shutdown,
    QueueChanged(QueueSnapshot),
    PlayingTrackChanged(Option<QueueEntry<Track>>),
    PlaybackModesChanged {
        shuffled: bool,
        repeat_mode: RepeatMode,
    },
    QueueEnded,
    TrackNotInQueue(TrackRef),
}

/// Configuration lifecycle notifications.
#[derive(Debug, Clone)]
pub enum ConfigMessage {
    ConfigLoaded(Config),
}

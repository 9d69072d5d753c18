//! Persistent application configuration model and defaults.

use std::collections::BTreeSet;

use crate::protocol::RepeatMode;

/// Root configuration persisted to `config.toml`.
#[derive(Debug, Clone, Default, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct Config {
    #[serde(default)]
    /// Shuffle and repeat preferences restored at startup.
    pub playback: PlaybackConfig,
    #[serde(default)]
    /// Library folders scanned for tracks.
    pub library: LibraryConfig,
}

/// Playback-mode preferences persisted between sessions.
#[derive(Debug, Clone, Default, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct PlaybackConfig {
    #[serde(default)]
    pub shuffle: bool,
    #[serde(default)]
    pub repeat_mode: RepeatMode,
}

/// Library indexing preferences persisted between sessions.
#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct LibraryConfig {
    #[serde(default)]
    pub folders: Vec<String>,
    /// Load the scanned library into the queue on startup.
    #[serde(default = "default_true")]
    pub queue_on_startup: bool,
}

impl Default for LibraryConfig {
    fn default() -> Self {
        Self {
            folders: Vec::new(),
            queue_on_startup: true,
        }
    }
}

fn default_true() -> bool {
    true
}

/// Trims folder entries, drops blanks and duplicates while keeping their order.
pub fn sanitize_config(config: Config) -> Config {
    let mut seen = BTreeSet::new();
    let folders = config
        .library
        .folders
        .iter()
        .map(|folder| folder.trim().to_string())
        .filter(|folder| !folder.is_empty())
        .filter(|folder| seen.insert(folder.clone()))
        .collect();

    Config {
        playback: config.playback,
        library: LibraryConfig {
            folders,
            queue_on_startup: config.library.queue_on_startup,
        },
    }
}

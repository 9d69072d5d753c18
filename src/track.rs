use std::path::{Path, PathBuf};
use std::time::Duration;

/// Highest star rating a track can carry.
pub const MAX_RATING: u8 = 5;

/// Anything the queue can hold: cloneable, identified by a stable key.
pub trait Playable: Clone {
    type Key: PartialEq + std::fmt::Debug;

    fn key(&self) -> &Self::Key;
    fn length(&self) -> Duration;
    fn set_rating(&mut self, rating: u8);
}

/// Catalog track, identified by its file path.
#[derive(Debug, Clone, PartialEq)]
pub struct Track {
    pub path: PathBuf,
    pub title: String,
    pub rating: u8,
    /// Zero when unknown.
    pub length: Duration,
}

impl Track {
    pub fn from_path(path: impl Into<PathBuf>) -> Track {
        let path = path.into();
        let title = title_from_path(&path);
        Track {
            path,
            title,
            rating: 0,
            length: Duration::ZERO,
        }
    }
}

fn title_from_path(path: &Path) -> String {
    path.file_stem()
        .or_else(|| path.file_name())
        .map(|stem| stem.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

impl Playable for Track {
    type Key = PathBuf;

    fn key(&self) -> &PathBuf {
        &self.path
    }

    fn length(&self) -> Duration {
        self.length
    }

    fn set_rating(&mut self, rating: u8) {
        self.rating = rating.min(MAX_RATING);
    }
}

/// Formats a duration as `m:ss`, or `h:mm:ss` past one hour.
pub fn format_length(length: Duration) -> String {
    let total_secs = length.as_secs();
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;
    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, seconds)
    } else {
        format!("{}:{:02}", minutes, seconds)
    }
}

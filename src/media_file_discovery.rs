//! Track catalog built from audio files found on disk.

use std::{
    collections::HashSet,
    fs,
    path::{Path, PathBuf},
};

use log::{debug, info, warn};

use crate::track::Track;

const AUDIO_EXTENSIONS: [&str; 7] = ["mp3", "wav", "ogg", "flac", "aac", "m4a", "mp4"];

pub fn is_audio_path(path: &Path) -> bool {
    let Some(extension) = path.extension().and_then(|ext| ext.to_str()) else {
        return false;
    };
    AUDIO_EXTENSIONS
        .iter()
        .any(|known| extension.eq_ignore_ascii_case(known))
}

/// Accumulates catalog tracks, each path at most once.
#[derive(Default)]
struct CatalogBuilder {
    seen: HashSet<PathBuf>,
    tracks: Vec<Track>,
}

impl CatalogBuilder {
    fn add_path(&mut self, path: &Path) {
        if path.is_dir() {
            self.add_folder(path);
        } else if path.is_file() {
            self.add_file(path.to_path_buf());
        } else {
            debug!("Ignoring missing path {}", path.display());
        }
    }

    fn add_file(&mut self, path: PathBuf) {
        if is_audio_path(&path) && self.seen.insert(path.clone()) {
            self.tracks.push(Track::from_path(path));
        }
    }

    fn add_folder(&mut self, root: &Path) {
        let mut folders = vec![root.to_path_buf()];
        while let Some(folder) = folders.pop() {
            let listing = match fs::read_dir(&folder) {
                Ok(listing) => listing,
                Err(err) => {
                    warn!("Skipping unreadable folder {}: {}", folder.display(), err);
                    continue;
                }
            };
            for child in listing {
                let child = match child {
                    Ok(child) => child,
                    Err(err) => {
                        warn!("Skipping unreadable entry in {}: {}", folder.display(), err);
                        continue;
                    }
                };
                match child.file_type() {
                    Ok(kind) if kind.is_dir() => folders.push(child.path()),
                    Ok(kind) if kind.is_file() => self.add_file(child.path()),
                    Ok(_) => {}
                    Err(err) => debug!("Failed to inspect {}: {}", child.path().display(), err),
                }
            }
        }
    }

    /// Catalog order is path order.
    fn finish(mut self) -> Vec<Track> {
        self.tracks.sort_by(|a, b| a.path.cmp(&b.path));
        self.tracks
    }
}

/// Builds tracks from a mix of audio files and folders.
pub fn tracks_from_paths(paths: &[PathBuf]) -> Vec<Track> {
    let mut catalog = CatalogBuilder::default();
    for path in paths {
        catalog.add_path(path);
    }
    catalog.finish()
}

/// Scans the configured library folders.
pub fn scan_library_folders(folders: &[String]) -> Vec<Track> {
    let mut catalog = CatalogBuilder::default();
    for folder in folders {
        catalog.add_path(Path::new(folder));
    }
    let tracks = catalog.finish();
    info!(
        "Library scan found {} track(s) in {} folder(s)",
        tracks.len(),
        folders.len()
    );
    tracks
}

//! Playback queue engine.
//!
//! The queue keeps an ordered history of played entries followed by the
//! lookahead of entries still to play. The playing entry always lives in the
//! history, so `entries()` is the complete play order. Tracks inserted through
//! "play next" / "play last" are tracked separately: queued-next entries form a
//! prefix of the lookahead, queued-last entries a suffix, and the natural
//! sequence sits between them.

use std::time::Duration;

use log::{debug, warn};
use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::protocol::RepeatMode;
use crate::track::Playable;

/// First id handed out after `set_queue`.
const FIRST_ENTRY_ID: u64 = 1;

/// Synthetic id telling apart repeated occurrences of the same track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntryId(pub u64);

impl std::fmt::Display for EntryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One position in the queue.
#[derive(Debug, Clone, PartialEq)]
pub struct QueueEntry<T> {
    pub id: EntryId,
    pub track: T,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QueueError {
    #[error("track is not in the queue")]
    TrackNotInQueue,
}

pub struct PlaybackQueue<T: Playable> {
    played: Vec<QueueEntry<T>>,
    pending: Vec<QueueEntry<T>>,
    // Index into `played`.
    playing_index: Option<usize>,
    queued_next: Vec<EntryId>,
    queued_last: Vec<EntryId>,
    shuffled: bool,
    repeat_mode: RepeatMode,
    queue_ended: bool,
    next_entry_id: u64,
    rng: StdRng,
}

impl<T: Playable> Default for PlaybackQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Playable> PlaybackQueue<T> {
    /// Creates an empty queue whose shuffle picks are seeded from the OS.
    pub fn new() -> Self {
        let mut seed = [0u8; 32];
        let rng = match getrandom::fill(&mut seed) {
            Ok(()) => StdRng::from_seed(seed),
            Err(err) => {
                warn!("Failed to generate random seed ({}). Using clock seed", err);
                let nanos = std::time::SystemTime::now()
                    .duration_since(std::time::UNIX_EPOCH)
                    .map(|elapsed| elapsed.as_nanos() as u64)
                    .unwrap_or_default();
                StdRng::seed_from_u64(nanos)
            }
        };
        Self::with_rng(rng)
    }

    /// Creates an empty queue with reproducible shuffle picks.
    #[cfg(test)]
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        Self {
            played: Vec::new(),
            pending: Vec::new(),
            playing_index: None,
            queued_next: Vec::new(),
            queued_last: Vec::new(),
            shuffled: false,
            repeat_mode: RepeatMode::Off,
            queue_ended: false,
            next_entry_id: FIRST_ENTRY_ID,
            rng,
        }
    }

    fn new_entry(&mut self, track: T) -> QueueEntry<T> {
        let id = EntryId(self.next_entry_id);
        self.next_entry_id += 1;
        QueueEntry { id, track }
    }

    fn new_entries(&mut self, tracks: Vec<T>) -> Vec<QueueEntry<T>> {
        tracks
            .into_iter()
            .map(|track| self.new_entry(track))
            .collect()
    }

    /// Replaces the whole queue. Nothing is playing afterwards.
    pub fn set_queue(&mut self, tracks: Vec<T>) {
        self.played.clear();
        self.playing_index = None;
        self.queued_next.clear();
        self.queued_last.clear();
        self.queue_ended = false;
        self.next_entry_id = FIRST_ENTRY_ID;
        self.pending = self.new_entries(tracks);
    }

    /// Inserts tracks right after the playing entry, behind earlier "play next" requests.
    pub fn enqueue_next(&mut self, tracks: Vec<T>) {
        let entries = self.new_entries(tracks);
        let insert_at = self.queued_next.len().min(self.pending.len());
        self.queued_next.extend(entries.iter().map(|entry| entry.id));
        self.pending.splice(insert_at..insert_at, entries);
        self.queue_ended = false;
    }

    /// Appends tracks behind everything else in the queue.
    pub fn enqueue_last(&mut self, tracks: Vec<T>) {
        let entries = self.new_entries(tracks);
        self.queued_last.extend(entries.iter().map(|entry| entry.id));
        self.pending.extend(entries);
        self.queue_ended = false;
    }

    /// Toggles shuffle. History restarts at the playing entry.
    pub fn change_order(&mut self) {
        self.shuffled = !self.shuffled;
        let playing = self
            .playing_index
            .and_then(|index| self.played.get(index).cloned());
        self.played.clear();
        self.playing_index = None;
        if let Some(entry) = playing {
            self.played.push(entry);
            self.playing_index = Some(0);
        }
        self.queue_ended = false;
    }

    pub fn set_repeat_mode(&mut self, mode: RepeatMode) {
        self.repeat_mode = mode;
    }

    pub fn cycle_repeat_mode(&mut self) -> RepeatMode {
        self.repeat_mode = self.repeat_mode.cycled();
        self.repeat_mode
    }

    /// Moves to the next entry according to user-queued entries, shuffle and repeat mode.
    pub fn advance(&mut self) {
        if self.repeat_mode == RepeatMode::One && self.playing_index.is_some() {
            self.queue_ended = false;
            return;
        }

        // An exhausted lookahead wins over rewound history.
        if self.pending.is_empty() {
            if self.repeat_mode == RepeatMode::All && !self.played.is_empty() {
                self.refill_from_history();
                self.take_pending(0);
            } else {
                self.queue_ended = true;
            }
            return;
        }

        if !self.queued_next.is_empty() {
            self.take_pending(0);
            return;
        }

        if let Some(index) = self.playing_index {
            if index + 1 < self.played.len() {
                self.playing_index = Some(index + 1);
                self.queue_ended = false;
                return;
            }
        }

        let natural_start = self.queued_next.len();
        let natural_end = self.pending.len().saturating_sub(self.queued_last.len());
        if natural_start >= natural_end {
            self.take_pending(0);
        } else if self.shuffled {
            let index = self.rng.random_range(natural_start..natural_end);
            self.take_pending(index);
        } else {
            self.take_pending(natural_start);
        }
    }

    /// Moves to the previous history entry. Under shuffle the current slot is replayed.
    pub fn rewind(&mut self) {
        match self.playing_index {
            Some(index) if index > 0 => {
                if !self.shuffled {
                    self.playing_index = Some(index - 1);
                }
                self.queue_ended = false;
            }
            _ => self.queue_ended = true,
        }
    }

    /// Plays the entry with `id`, wherever it sits in the queue.
    pub fn jump_to(&mut self, id: EntryId) -> Result<(), QueueError> {
        if let Some(index) = self.played.iter().position(|entry| entry.id == id) {
            self.playing_index = Some(index);
            self.queue_ended = false;
            return Ok(());
        }

        let index = self
            .pending
            .iter()
            .position(|entry| entry.id == id)
            .ok_or(QueueError::TrackNotInQueue)?;

        if self.shuffled {
            self.take_pending(index);
        } else {
            let skipped: Vec<QueueEntry<T>> = self.pending.drain(..index).collect();
            for entry in &skipped {
                self.forget_user_queued(entry.id);
            }
            self.played.extend(skipped);
            self.take_pending(0);
        }
        Ok(())
    }

    /// Plays the first occurrence of the track identified by `key`.
    pub fn jump_to_track(&mut self, key: &T::Key) -> Result<(), QueueError> {
        let id = self
            .iter()
            .find(|entry| entry.track.key() == key)
            .map(|entry| entry.id)
            .ok_or(QueueError::TrackNotInQueue)?;
        self.jump_to(id)
    }

    /// Applies `rating` to every occurrence of the track. Returns how many entries changed.
    pub fn update_track_rating(&mut self, key: &T::Key, rating: u8) -> usize {
        let mut updated = 0;
        for entry in self.played.iter_mut().chain(self.pending.iter_mut()) {
            if entry.track.key() == key {
                entry.track.set_rating(rating);
                updated += 1;
            }
        }
        updated
    }

    fn take_pending(&mut self, index: usize) {
        let entry = self.pending.remove(index);
        self.forget_user_queued(entry.id);
        self.played.push(entry);
        self.playing_index = Some(self.played.len() - 1);
        self.queue_ended = false;
    }

    fn forget_user_queued(&mut self, id: EntryId) {
        self.queued_next.retain(|queued| *queued != id);
        self.queued_last.retain(|queued| *queued != id);
    }

    fn refill_from_history(&mut self) {
        let history = std::mem::take(&mut self.played);
        debug!("Refilling queue with {} played entries", history.len());
        self.playing_index = None;
        self.queued_next.clear();
        self.queued_last.clear();
        self.pending = history
            .into_iter()
            .map(|entry| self.new_entry(entry.track))
            .collect();
    }

    /// History followed by lookahead.
    pub fn iter(&self) -> impl Iterator<Item = &QueueEntry<T>> {
        self.played.iter().chain(self.pending.iter())
    }

    pub fn entries(&self) -> Vec<QueueEntry<T>> {
        self.iter().cloned().collect()
    }

    pub fn playing(&self) -> Option<&QueueEntry<T>> {
        self.playing_index.and_then(|index| self.played.get(index))
    }

    /// Position of the playing entry inside `entries()`.
    pub fn playing_position(&self) -> Option<usize> {
        self.playing_index
    }

    pub fn played(&self) -> &[QueueEntry<T>] {
        &self.played
    }

    pub fn pending(&self) -> &[QueueEntry<T>] {
        &self.pending
    }

    pub fn is_user_queued(&self, id: EntryId) -> bool {
        self.queued_next.contains(&id) || self.queued_last.contains(&id)
    }

    pub fn is_shuffled(&self) -> bool {
        self.shuffled
    }

    pub fn repeat_mode(&self) -> RepeatMode {
        self.repeat_mode
    }

    pub fn is_queue_ended(&self) -> bool {
        self.queue_ended
    }

    pub fn len(&self) -> usize {
        self.played.len() + self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn total_length(&self) -> Duration {
        self.iter().map(|entry| entry.track.length()).sum()
    }

    /// Length of everything after the playing entry.
    pub fn remaining_length(&self) -> Duration {
        let upcoming_history = match self.playing_index {
            Some(index) => &self.played[index + 1..],
            None => &self.played[..],
        };
        upcoming_history
            .iter()
            .chain(self.pending.iter())
            .map(|entry| entry.track.length())
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::track::Track;
    use std::collections::HashSet;
    use std::path::PathBuf;

    fn track(name: &str) -> Track {
        Track::from_path(format!("/music/{}.mp3", name))
    }

    fn track_with_length(name: &str, secs: u64) -> Track {
        Track {
            length: Duration::from_secs(secs),
            ..track(name)
        }
    }

    fn tracks(names: &[&str]) -> Vec<Track> {
        names.iter().map(|name| track(name)).collect()
    }

    fn queue_of(names: &[&str]) -> PlaybackQueue<Track> {
        let mut queue = PlaybackQueue::with_seed(7);
        queue.set_queue(tracks(names));
        queue
    }

    fn playing_title(queue: &PlaybackQueue<Track>) -> Option<String> {
        queue.playing().map(|entry| entry.track.title.clone())
    }

    fn titles(queue: &PlaybackQueue<Track>) -> Vec<String> {
        queue.iter().map(|entry| entry.track.title.clone()).collect()
    }

    #[test]
    fn test_example_scenario_with_play_next_insert() {
        let mut queue = queue_of(&["A", "B", "C", "D"]);
        assert_eq!(playing_title(&queue), None);

        queue.advance();
        assert_eq!(playing_title(&queue).as_deref(), Some("A"));
        queue.advance();
        assert_eq!(playing_title(&queue).as_deref(), Some("B"));

        queue.enqueue_next(tracks(&["X"]));
        queue.advance();
        assert_eq!(playing_title(&queue).as_deref(), Some("X"));
        queue.advance();
        assert_eq!(playing_title(&queue).as_deref(), Some("C"));
        queue.advance();
        assert_eq!(playing_title(&queue).as_deref(), Some("D"));
        assert!(!queue.is_queue_ended());

        queue.advance();
        assert!(queue.is_queue_ended());
        assert_eq!(playing_title(&queue).as_deref(), Some("D"));
        assert_eq!(titles(&queue), vec!["A", "B", "X", "C", "D"]);
    }

    #[test]
    fn test_advance_and_rewind_are_symmetric_without_repeat() {
        let names = ["A", "B", "C", "D", "E"];
        let mut queue = queue_of(&names);
        queue.advance();

        for expected in &names[1..] {
            queue.advance();
            assert_eq!(playing_title(&queue).as_deref(), Some(*expected));
            assert!(!queue.is_queue_ended());
        }
        queue.advance();
        assert!(queue.is_queue_ended());
        assert_eq!(playing_title(&queue).as_deref(), Some("E"));

        for expected in names[..4].iter().rev() {
            queue.rewind();
            assert_eq!(playing_title(&queue).as_deref(), Some(*expected));
            assert!(!queue.is_queue_ended());
        }
        queue.rewind();
        assert!(queue.is_queue_ended());
        assert_eq!(playing_title(&queue).as_deref(), Some("A"));
    }

    #[test]
    fn test_advance_after_rewind_walks_history_forward() {
        let mut queue = queue_of(&["A", "B", "C", "D"]);
        for _ in 0..3 {
            queue.advance();
        }
        queue.rewind();
        queue.rewind();
        assert_eq!(playing_title(&queue).as_deref(), Some("A"));

        queue.advance();
        assert_eq!(playing_title(&queue).as_deref(), Some("B"));
        queue.advance();
        assert_eq!(playing_title(&queue).as_deref(), Some("C"));
        queue.advance();
        assert_eq!(playing_title(&queue).as_deref(), Some("D"));
        queue.advance();
        assert!(queue.is_queue_ended());
        assert_eq!(queue.len(), 4);
    }

    #[test]
    fn test_advance_after_rewind_at_queue_end_stays_ended() {
        let mut queue = queue_of(&["A", "B", "C"]);
        for _ in 0..3 {
            queue.advance();
        }
        queue.rewind();
        assert_eq!(playing_title(&queue).as_deref(), Some("B"));

        queue.advance();
        assert!(queue.is_queue_ended());
        assert_eq!(playing_title(&queue).as_deref(), Some("B"));
        assert_eq!(titles(&queue), vec!["A", "B", "C"]);
    }

    #[test]
    fn test_repeat_all_after_rewind_at_queue_end_refills() {
        let mut queue = queue_of(&["A", "B", "C"]);
        queue.set_repeat_mode(RepeatMode::All);
        for _ in 0..3 {
            queue.advance();
        }
        queue.rewind();
        assert_eq!(playing_title(&queue).as_deref(), Some("B"));

        queue.advance();
        assert_eq!(playing_title(&queue).as_deref(), Some("A"));
        assert_eq!(queue.playing_position(), Some(0));
        assert!(!queue.is_queue_ended());
        assert_eq!(titles(&queue), vec!["A", "B", "C"]);
    }

    #[test]
    fn test_repeat_all_wraps_to_refilled_first_entry() {
        let mut queue = queue_of(&["A", "B", "C"]);
        queue.set_repeat_mode(RepeatMode::All);
        for _ in 0..3 {
            queue.advance();
        }
        let last_id = queue.playing().map(|entry| entry.id);

        queue.advance();
        assert_eq!(playing_title(&queue).as_deref(), Some("A"));
        assert!(!queue.is_queue_ended());
        assert_eq!(titles(&queue), vec!["A", "B", "C"]);
        assert_eq!(queue.playing_position(), Some(0));

        let ids: Vec<EntryId> = queue.iter().map(|entry| entry.id).collect();
        assert!(ids.iter().all(|id| Some(*id) > last_id));

        queue.advance();
        assert_eq!(playing_title(&queue).as_deref(), Some("B"));
    }

    #[test]
    fn test_repeat_one_keeps_playing_track() {
        let mut queue = queue_of(&["A", "B"]);
        queue.advance();
        queue.set_repeat_mode(RepeatMode::One);
        for _ in 0..10 {
            queue.advance();
            assert_eq!(playing_title(&queue).as_deref(), Some("A"));
            assert!(!queue.is_queue_ended());
        }
        assert_eq!(queue.pending().len(), 1);
    }

    #[test]
    fn test_repeat_one_with_nothing_playing_starts_first_track() {
        let mut queue = queue_of(&["A", "B"]);
        queue.set_repeat_mode(RepeatMode::One);
        queue.advance();
        assert_eq!(playing_title(&queue).as_deref(), Some("A"));
    }

    #[test]
    fn test_enqueue_next_takes_precedence_once() {
        let mut queue = queue_of(&["A", "B", "C", "D"]);
        for _ in 0..3 {
            queue.advance();
        }
        assert_eq!(playing_title(&queue).as_deref(), Some("C"));

        queue.enqueue_next(tracks(&["B"]));
        queue.advance();
        assert_eq!(playing_title(&queue).as_deref(), Some("B"));
        let queued_id = queue.playing().map(|entry| entry.id);
        assert!(queued_id.is_some_and(|id| !queue.is_user_queued(id)));

        queue.advance();
        assert_eq!(playing_title(&queue).as_deref(), Some("D"));
    }

    #[test]
    fn test_enqueue_next_keeps_request_order() {
        let mut queue = queue_of(&["A", "B"]);
        queue.advance();
        queue.enqueue_next(tracks(&["X"]));
        queue.enqueue_next(tracks(&["Y", "Z"]));
        assert_eq!(titles(&queue), vec!["A", "X", "Y", "Z", "B"]);

        let mut order = Vec::new();
        for _ in 0..4 {
            queue.advance();
            order.extend(playing_title(&queue));
        }
        assert_eq!(order, vec!["X", "Y", "Z", "B"]);
    }

    #[test]
    fn test_enqueue_next_beats_rewound_history() {
        let mut queue = queue_of(&["A", "B", "C"]);
        queue.advance();
        queue.advance();
        queue.rewind();
        assert_eq!(playing_title(&queue).as_deref(), Some("A"));

        queue.enqueue_next(tracks(&["X"]));
        queue.advance();
        assert_eq!(playing_title(&queue).as_deref(), Some("X"));
        assert_eq!(titles(&queue), vec!["A", "B", "X", "C"]);
    }

    #[test]
    fn test_enqueue_last_plays_after_natural_tracks() {
        let mut queue = queue_of(&["A", "B", "C"]);
        queue.advance();
        queue.enqueue_last(tracks(&["Y"]));
        queue.enqueue_last(tracks(&["Z"]));
        queue.enqueue_next(tracks(&["X"]));

        let mut order = Vec::new();
        for _ in 0..5 {
            queue.advance();
            order.extend(playing_title(&queue));
        }
        assert_eq!(order, vec!["X", "B", "C", "Y", "Z"]);

        queue.advance();
        assert!(queue.is_queue_ended());
    }

    #[test]
    fn test_enqueue_clears_queue_ended() {
        let mut queue = queue_of(&["A"]);
        queue.advance();
        queue.advance();
        assert!(queue.is_queue_ended());

        queue.enqueue_last(tracks(&["B"]));
        assert!(!queue.is_queue_ended());
        queue.advance();
        assert_eq!(playing_title(&queue).as_deref(), Some("B"));
    }

    #[test]
    fn test_enqueue_next_clears_queue_ended() {
        let mut queue = queue_of(&["A"]);
        queue.advance();
        queue.advance();
        assert!(queue.is_queue_ended());

        queue.enqueue_next(tracks(&["X"]));
        assert!(!queue.is_queue_ended());
        queue.advance();
        assert_eq!(playing_title(&queue).as_deref(), Some("X"));
    }

    #[test]
    fn test_change_order_clears_queue_ended() {
        let mut queue = queue_of(&["A", "B"]);
        queue.advance();
        queue.advance();
        queue.advance();
        assert!(queue.is_queue_ended());

        queue.change_order();
        assert!(!queue.is_queue_ended());
        assert_eq!(playing_title(&queue).as_deref(), Some("B"));
    }

    #[test]
    fn test_shuffle_picks_only_natural_range() {
        let names = ["A", "B", "C", "D", "E", "F"];
        let mut queue = queue_of(&names);
        queue.change_order();
        assert!(queue.is_shuffled());
        queue.enqueue_last(tracks(&["Z"]));
        queue.enqueue_next(tracks(&["X"]));

        queue.advance();
        assert_eq!(playing_title(&queue).as_deref(), Some("X"));

        let mut seen = HashSet::new();
        for _ in 0..names.len() {
            queue.advance();
            let title = playing_title(&queue).unwrap_or_default();
            assert_ne!(title, "Z");
            assert!(seen.insert(title));
        }
        let expected: HashSet<String> = names.iter().map(|name| name.to_string()).collect();
        assert_eq!(seen, expected);

        queue.advance();
        assert_eq!(playing_title(&queue).as_deref(), Some("Z"));
        queue.advance();
        assert!(queue.is_queue_ended());
    }

    #[test]
    fn test_change_order_restarts_history_at_playing_entry() {
        let mut queue = queue_of(&["A", "B", "C", "D"]);
        queue.advance();
        queue.advance();

        queue.change_order();
        assert!(queue.is_shuffled());
        assert_eq!(titles(&queue), vec!["B", "C", "D"]);
        assert_eq!(queue.playing_position(), Some(0));
        assert_eq!(playing_title(&queue).as_deref(), Some("B"));

        queue.change_order();
        assert!(!queue.is_shuffled());
        assert_eq!(titles(&queue), vec!["B", "C", "D"]);
    }

    #[test]
    fn test_shuffled_rewind_replays_same_slot() {
        let mut queue = queue_of(&["A", "B", "C", "D"]);
        queue.change_order();
        queue.advance();
        queue.rewind();
        assert!(queue.is_queue_ended());

        queue.advance();
        queue.advance();
        let before = queue.playing().cloned();
        queue.rewind();
        assert!(!queue.is_queue_ended());
        assert_eq!(queue.playing().cloned(), before);
    }

    #[test]
    fn test_rewind_with_nothing_playing_ends_queue() {
        let mut queue = queue_of(&["A"]);
        queue.rewind();
        assert!(queue.is_queue_ended());
        assert_eq!(queue.playing(), None);
    }

    #[test]
    fn test_advance_on_empty_queue_ends_queue() {
        let mut queue: PlaybackQueue<Track> = PlaybackQueue::with_seed(1);
        queue.set_repeat_mode(RepeatMode::All);
        queue.advance();
        assert!(queue.is_queue_ended());
        assert!(queue.is_empty());
    }

    #[test]
    fn test_set_queue_resets_state_and_ids() {
        let mut queue = queue_of(&["A", "B"]);
        queue.advance();
        queue.enqueue_next(tracks(&["X"]));
        queue.advance();
        queue.advance();
        queue.advance();
        assert!(queue.is_queue_ended());

        queue.set_queue(tracks(&["C", "D"]));
        assert_eq!(queue.playing(), None);
        assert!(!queue.is_queue_ended());
        assert!(queue.played().is_empty());
        let ids: Vec<u64> = queue.iter().map(|entry| entry.id.0).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn test_jump_to_pending_migrates_skipped_entries_to_history() {
        let mut queue = queue_of(&["A", "B", "C", "D", "E"]);
        queue.advance();
        let before = queue.entries();
        let target = before[3].id;

        queue.jump_to(target).expect("entry should be in queue");
        assert_eq!(queue.playing().map(|entry| entry.id), Some(target));
        assert_eq!(queue.entries(), before);
        assert_eq!(queue.playing_position(), Some(3));

        queue.advance();
        assert_eq!(playing_title(&queue).as_deref(), Some("E"));
    }

    #[test]
    fn test_jump_to_under_shuffle_keeps_skipped_entries_pending() {
        let mut queue = queue_of(&["A", "B", "C", "D"]);
        queue.change_order();
        let before = queue.entries();
        let target = before[2].id;

        queue.jump_to(target).expect("entry should be in queue");
        assert_eq!(queue.playing().map(|entry| entry.id), Some(target));
        assert_eq!(queue.len(), before.len());
        assert_eq!(titles(&queue), vec!["C", "A", "B", "D"]);
        assert_eq!(queue.pending().len(), 3);
    }

    #[test]
    fn test_jump_to_history_entry() {
        let mut queue = queue_of(&["A", "B", "C"]);
        for _ in 0..3 {
            queue.advance();
        }
        let first = queue.entries()[0].id;
        queue.jump_to(first).expect("entry should be in queue");
        assert_eq!(playing_title(&queue).as_deref(), Some("A"));
        queue.advance();
        assert_eq!(playing_title(&queue).as_deref(), Some("B"));
    }

    #[test]
    fn test_jump_to_user_queued_entry_clears_its_precedence() {
        let mut queue = queue_of(&["A", "B", "C"]);
        queue.advance();
        queue.enqueue_next(tracks(&["X", "Y"]));
        let target = queue.pending()[1].id;

        queue.jump_to(target).expect("entry should be in queue");
        assert_eq!(playing_title(&queue).as_deref(), Some("Y"));
        assert!(!queue.is_user_queued(queue.played()[1].id));
        queue.advance();
        assert_eq!(playing_title(&queue).as_deref(), Some("B"));
    }

    #[test]
    fn test_jump_to_missing_entry_fails_without_changes() {
        let mut queue = queue_of(&["A", "B"]);
        queue.advance();
        let before = queue.entries();

        assert_eq!(
            queue.jump_to(EntryId(999)),
            Err(QueueError::TrackNotInQueue)
        );
        assert_eq!(
            queue.jump_to_track(&PathBuf::from("/music/missing.mp3")),
            Err(QueueError::TrackNotInQueue)
        );
        assert_eq!(queue.entries(), before);
        assert_eq!(playing_title(&queue).as_deref(), Some("A"));
    }

    #[test]
    fn test_jump_to_track_uses_first_occurrence() {
        let mut queue = queue_of(&["A", "B", "C"]);
        queue.enqueue_last(tracks(&["B"]));
        queue
            .jump_to_track(&PathBuf::from("/music/B.mp3"))
            .expect("track should be in queue");
        assert_eq!(queue.playing_position(), Some(1));
        assert_eq!(queue.len(), 4);
    }

    #[test]
    fn test_update_track_rating_touches_every_occurrence() {
        let mut queue = queue_of(&["A", "B"]);
        queue.enqueue_last(tracks(&["A"]));
        queue.advance();

        let key = PathBuf::from("/music/A.mp3");
        assert_eq!(queue.update_track_rating(&key, 4), 2);

        for entry in queue.iter() {
            let expected = if entry.track.path == key { 4 } else { 0 };
            assert_eq!(entry.track.rating, expected);
        }
        assert_eq!(queue.playing().map(|entry| entry.track.rating), Some(4));
    }

    #[test]
    fn test_total_and_remaining_length() {
        let mut queue: PlaybackQueue<Track> = PlaybackQueue::with_seed(3);
        queue.set_queue(vec![
            track_with_length("A", 60),
            track_with_length("B", 90),
            track_with_length("C", 30),
        ]);
        assert_eq!(queue.total_length(), Duration::from_secs(180));
        assert_eq!(queue.remaining_length(), Duration::from_secs(180));

        queue.advance();
        queue.advance();
        queue.rewind();
        assert_eq!(queue.remaining_length(), Duration::from_secs(120));
    }

    #[test]
    fn test_cycle_repeat_mode() {
        let mut queue = queue_of(&["A"]);
        assert_eq!(queue.cycle_repeat_mode(), RepeatMode::All);
        assert_eq!(queue.cycle_repeat_mode(), RepeatMode::One);
        assert_eq!(queue.cycle_repeat_mode(), RepeatMode::Off);
        assert_eq!(queue.repeat_mode(), RepeatMode::Off);
    }
}

//! Queue-domain orchestrator.
//!
//! This component owns the playback queue engine, applies queue commands
//! received from the event bus and publishes queue and playing-track
//! notifications after every mutation.

use log::{debug, error, info, trace, warn};
use tokio::sync::broadcast::{Receiver, Sender};

use crate::{
    config::Config,
    protocol::{self, QueueMessage, TrackRef},
    queue::{PlaybackQueue, QueueEntry},
    track::Track,
};

/// Applies bus commands to the queue and broadcasts the resulting state.
pub struct QueueManager {
    queue: PlaybackQueue<Track>,
    bus_consumer: Receiver<protocol::Message>,
    bus_producer: Sender<protocol::Message>,
    playback_preferences_restored_from_config: bool,
}

impl QueueManager {
    /// Creates a queue manager bound to bus channels.
    pub fn new(
        queue: PlaybackQueue<Track>,
        bus_consumer: Receiver<protocol::Message>,
        bus_producer: Sender<protocol::Message>,
    ) -> Self {
        Self {
            queue,
            bus_consumer,
            bus_producer,
            playback_preferences_restored_from_config: false,
        }
    }

    fn restore_playback_preferences_from_config(&mut self, config: &Config) -> bool {
        let changed = self.queue.is_shuffled() != config.playback.shuffle
            || self.queue.repeat_mode() != config.playback.repeat_mode;
        if self.queue.is_shuffled() != config.playback.shuffle {
            self.queue.change_order();
        }
        self.queue.set_repeat_mode(config.playback.repeat_mode);
        changed
    }

    pub fn run(&mut self) {
        loop {
            match self.bus_consumer.blocking_recv() {
                Ok(protocol::Message::Queue(QueueMessage::Shutdown)) => {
                    info!("QueueManager: shutting down");
                    break;
                }
                Ok(protocol::Message::Queue(message)) => self.handle_queue_message(message),
                Ok(protocol::Message::Config(protocol::ConfigMessage::ConfigLoaded(config))) => {
                    if self.playback_preferences_restored_from_config {
                        trace!("QueueManager: playback preferences already restored");
                        continue;
                    }
                    self.playback_preferences_restored_from_config = true;
                    if self.restore_playback_preferences_from_config(&config) {
                        debug!(
                            "QueueManager: restored shuffle={} repeat={:?}",
                            self.queue.is_shuffled(),
                            self.queue.repeat_mode()
                        );
                        self.broadcast_modes_changed();
                        self.broadcast_queue_changed();
                    }
                }
                Err(tokio::sync::broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(
                        "QueueManager lagged on control bus, skipped {} message(s)",
                        skipped
                    );
                }
                Err(tokio::sync::broadcast::error::RecvError::Closed) => {
                    error!("QueueManager: bus closed");
                    break;
                }
            }
        }
    }

    fn handle_queue_message(&mut self, message: QueueMessage) {
        match message {
            QueueMessage::SetQueue(tracks) => {
                debug!("QueueManager: setting queue with {} track(s)", tracks.len());
                self.queue.set_queue(tracks);
                self.broadcast_queue_and_playing();
            }
            QueueMessage::EnqueueNext(tracks) => {
                debug!("QueueManager: queueing {} track(s) next", tracks.len());
                self.queue.enqueue_next(tracks);
                self.broadcast_queue_and_playing();
            }
            QueueMessage::EnqueueLast(tracks) => {
                debug!("QueueManager: queueing {} track(s) last", tracks.len());
                self.queue.enqueue_last(tracks);
                self.broadcast_queue_and_playing();
            }
            QueueMessage::ChangeOrder => {
                self.queue.change_order();
                debug!("QueueManager: shuffle is now {}", self.queue.is_shuffled());
                self.broadcast_modes_changed();
                self.broadcast_queue_and_playing();
            }
            QueueMessage::SetRepeatMode(mode) => {
                self.queue.set_repeat_mode(mode);
                debug!("QueueManager: repeat mode set to {:?}", mode);
                self.broadcast_modes_changed();
                self.broadcast_queue_changed();
            }
            QueueMessage::CycleRepeatMode => {
                let mode = self.queue.cycle_repeat_mode();
                debug!("QueueManager: cycled repeat mode to {:?}", mode);
                self.broadcast_modes_changed();
                self.broadcast_queue_changed();
            }
            QueueMessage::Advance => {
                debug!("QueueManager: Received advance command");
                if self.queue.is_empty() {
                    debug!("QueueManager: advance requested on an empty queue");
                }
                self.queue.advance();
                self.broadcast_movement();
            }
            QueueMessage::Rewind => {
                debug!("QueueManager: Received rewind command");
                self.queue.rewind();
                self.broadcast_movement();
            }
            QueueMessage::JumpTo(target) => {
                debug!("QueueManager: Received jump command: {:?}", target);
                let result = match &target {
                    TrackRef::Entry(id) => self.queue.jump_to(*id),
                    TrackRef::Path(path) => self.queue.jump_to_track(path),
                };
                match result {
                    Ok(()) => self.broadcast_queue_and_playing(),
                    Err(err) => {
                        warn!("QueueManager: cannot jump to {:?}: {}", target, err);
                        let _ = self.bus_producer.send(protocol::Message::Queue(
                            QueueMessage::TrackNotInQueue(target),
                        ));
                    }
                }
            }
            QueueMessage::UpdateTrackRating { path, rating } => {
                let updated = self.queue.update_track_rating(&path, rating);
                debug!(
                    "QueueManager: rating {} applied to {} entr(ies) of {}",
                    rating,
                    updated,
                    path.display()
                );
                if updated > 0 {
                    self.broadcast_queue_and_playing();
                }
            }
            QueueMessage::RequestSnapshot => {
                self.broadcast_queue_and_playing();
            }
            QueueMessage::Shutdown
            | QueueMessage::QueueChanged(_)
            | QueueMessage::PlayingTrackChanged(_)
            | QueueMessage::PlaybackModesChanged { .. }
            | QueueMessage::QueueEnded
            | QueueMessage::TrackNotInQueue(_) => {
                trace!("QueueManager: ignoring notification message")
            }
        }
    }

    fn snapshot(&self) -> protocol::QueueSnapshot {
        protocol::QueueSnapshot {
            entries: self.queue.entries(),
            playing_position: self.queue.playing_position(),
            history_len: self.queue.played().len(),
            user_queued: self
                .queue
                .pending()
                .iter()
                .map(|entry| entry.id)
                .filter(|id| self.queue.is_user_queued(*id))
                .collect(),
            total_length: self.queue.total_length(),
            remaining_length: self.queue.remaining_length(),
            queue_ended: self.queue.is_queue_ended(),
        }
    }

    fn playing_entry(&self) -> Option<QueueEntry<Track>> {
        self.queue.playing().cloned()
    }

    fn broadcast_movement(&self) {
        if self.queue.is_queue_ended() {
            let _ = self
                .bus_producer
                .send(protocol::Message::Queue(QueueMessage::QueueEnded));
        }
        self.broadcast_queue_and_playing();
    }

    fn broadcast_queue_and_playing(&self) {
        self.broadcast_queue_changed();
        let _ = self.bus_producer.send(protocol::Message::Queue(
            QueueMessage::PlayingTrackChanged(self.playing_entry()),
        ));
    }

    fn broadcast_queue_changed(&self) {
        let _ = self.bus_producer.send(protocol::Message::Queue(
            QueueMessage::QueueChanged(self.snapshot()),
        ));
    }

    fn broadcast_modes_changed(&self) {
        let _ = self.bus_producer.send(protocol::Message::Queue(
            QueueMessage::PlaybackModesChanged {
                shuffled: self.queue.is_shuffled(),
                repeat_mode: self.queue.repeat_mode(),
            },
        ));
    }
}

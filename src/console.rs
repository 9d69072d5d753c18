//! Line-oriented console front end: parses typed commands into bus messages
//! and renders queue notifications as text.

use std::path::PathBuf;

use crate::{
    media_file_discovery,
    protocol::{self, QueueMessage, RepeatMode, TrackRef},
    queue::{EntryId, QueueEntry},
    track::{format_length, Track, MAX_RATING},
};

pub const HELP_TEXT: &str = "\
commands:
  next | n                 play the next track
  prev | p                 play the previous track
  shuffle | s              toggle shuffle
  repeat [off|all|one]     cycle or set the repeat mode
  jump <id|path>           play a queue entry by id or path
  load <folder|file>...    replace the queue with the given tracks
  add-next <folder|file>...  play tracks after the current one
  add-last <folder|file>...  play tracks after everything else
  rate <path> <0-5>        rate every queued copy of a track
  queue | ls               show the queue
  help | ?                 show this help
  quit | q                 exit";

#[derive(Debug)]
pub enum ConsoleCommand {
    Send(protocol::Message),
    Help,
    Quit,
    Empty,
}

fn queue_command(message: QueueMessage) -> ConsoleCommand {
    ConsoleCommand::Send(protocol::Message::Queue(message))
}

fn parse_repeat_mode(text: &str) -> Result<RepeatMode, String> {
    match text.to_ascii_lowercase().as_str() {
        "off" => Ok(RepeatMode::Off),
        "all" => Ok(RepeatMode::All),
        "one" => Ok(RepeatMode::One),
        other => Err(format!("unknown repeat mode '{}' (off, all, one)", other)),
    }
}

fn tracks_from_arguments(arguments: &str) -> Result<Vec<Track>, String> {
    let paths: Vec<PathBuf> = arguments.split_whitespace().map(PathBuf::from).collect();
    if paths.is_empty() {
        return Err("expected at least one file or folder".to_string());
    }
    let tracks = media_file_discovery::tracks_from_paths(&paths);
    if tracks.is_empty() {
        return Err(format!("no audio files found in {}", arguments.trim()));
    }
    Ok(tracks)
}

pub fn parse_command(line: &str) -> Result<ConsoleCommand, String> {
    let line = line.trim();
    let (command, arguments) = match line.split_once(char::is_whitespace) {
        Some((command, arguments)) => (command, arguments.trim()),
        None => (line, ""),
    };

    match command.to_ascii_lowercase().as_str() {
        "" => Ok(ConsoleCommand::Empty),
        "next" | "n" => Ok(queue_command(QueueMessage::Advance)),
        "prev" | "p" => Ok(queue_command(QueueMessage::Rewind)),
        "shuffle" | "s" => Ok(queue_command(QueueMessage::ChangeOrder)),
        "repeat" if arguments.is_empty() => Ok(queue_command(QueueMessage::CycleRepeatMode)),
        "repeat" => Ok(queue_command(QueueMessage::SetRepeatMode(
            parse_repeat_mode(arguments)?,
        ))),
        "jump" if arguments.is_empty() => Err("usage: jump <id|path>".to_string()),
        "jump" => {
            let target = match arguments.parse::<u64>() {
                Ok(id) => TrackRef::Entry(EntryId(id)),
                Err(_) => TrackRef::Path(PathBuf::from(arguments)),
            };
            Ok(queue_command(QueueMessage::JumpTo(target)))
        }
        "load" => Ok(queue_command(QueueMessage::SetQueue(tracks_from_arguments(
            arguments,
        )?))),
        "add-next" => Ok(queue_command(QueueMessage::EnqueueNext(
            tracks_from_arguments(arguments)?,
        ))),
        "add-last" => Ok(queue_command(QueueMessage::EnqueueLast(
            tracks_from_arguments(arguments)?,
        ))),
        "rate" => {
            let Some((path, rating)) = arguments.rsplit_once(char::is_whitespace) else {
                return Err("usage: rate <path> <0-5>".to_string());
            };
            let rating = rating
                .parse::<u8>()
                .ok()
                .filter(|rating| *rating <= MAX_RATING)
                .ok_or_else(|| format!("rating must be between 0 and {}", MAX_RATING))?;
            Ok(queue_command(QueueMessage::UpdateTrackRating {
                path: PathBuf::from(path.trim()),
                rating,
            }))
        }
        "queue" | "ls" => Ok(queue_command(QueueMessage::RequestSnapshot)),
        "help" | "?" => Ok(ConsoleCommand::Help),
        "quit" | "q" | "exit" => Ok(ConsoleCommand::Quit),
        other => Err(format!("unknown command '{}'. Type 'help'.", other)),
    }
}

fn format_rating(rating: u8) -> String {
    let filled = rating.min(MAX_RATING) as usize;
    let mut stars = "*".repeat(filled);
    stars.push_str(&".".repeat(MAX_RATING as usize - filled));
    stars
}

pub fn format_snapshot(snapshot: &protocol::QueueSnapshot) -> String {
    let mut lines = Vec::with_capacity(snapshot.entries.len() + 1);
    for (position, entry) in snapshot.entries.iter().enumerate() {
        if position == snapshot.history_len && position > 0 {
            lines.push("  -- up next --".to_string());
        }
        let marker = if snapshot.playing_position == Some(position) {
            '>'
        } else if snapshot.user_queued.contains(&entry.id) {
            '+'
        } else {
            ' '
        };
        lines.push(format!(
            "{} {:>4}  {}  {}  {}",
            marker,
            entry.id.0,
            format_rating(entry.track.rating),
            format_length(entry.track.length),
            entry.track.title
        ));
    }
    let mut summary = format!(
        "{} track(s), total {}, remaining {}",
        snapshot.entries.len(),
        format_length(snapshot.total_length),
        format_length(snapshot.remaining_length)
    );
    if snapshot.queue_ended {
        summary.push_str(", end of queue");
    }
    lines.push(summary);
    lines.join("\n")
}

pub fn format_playing(entry: Option<&QueueEntry<Track>>) -> String {
    match entry {
        Some(entry) => format!(
            "Now playing: {} [{}] ({})",
            entry.track.title,
            entry.id,
            entry.track.path.display()
        ),
        None => "Nothing playing".to_string(),
    }
}

pub fn format_modes(shuffled: bool, repeat_mode: RepeatMode) -> String {
    let repeat = match repeat_mode {
        RepeatMode::Off => "off",
        RepeatMode::All => "all",
        RepeatMode::One => "one",
    };
    format!(
        "Shuffle {}, repeat {}",
        if shuffled { "on" } else { "off" },
        repeat
    )
}

mod config;
mod config_persistence;
mod console;
mod media_file_discovery;
mod protocol;
mod queue;
mod queue_manager;
mod track;

use std::{
    io::BufRead,
    path::{Path, PathBuf},
    thread,
};

use config::Config;
use console::ConsoleCommand;
use log::{debug, error, info, warn};
use protocol::{ConfigMessage, Message, QueueMessage};
use queue::PlaybackQueue;
use queue_manager::QueueManager;
use tokio::sync::broadcast::{self, Receiver};

fn config_file_path() -> Result<PathBuf, Box<dyn std::error::Error>> {
    let config_dir = dirs::config_dir().ok_or("could not determine the user config directory")?;
    Ok(config_dir.join("playqueue").join("config.toml"))
}

fn remember_playback_modes(
    config: &mut Config,
    config_file: &Path,
    shuffled: bool,
    repeat_mode: protocol::RepeatMode,
) {
    if config.playback.shuffle == shuffled && config.playback.repeat_mode == repeat_mode {
        return;
    }
    config.playback.shuffle = shuffled;
    config.playback.repeat_mode = repeat_mode;
    config_persistence::persist_config_file(config, config_file);
}

/// Prints queue notifications and keeps persisted playback modes in sync.
fn run_display(
    mut bus_consumer: Receiver<Message>,
    mut config: Config,
    config_file: PathBuf,
) {
    loop {
        match bus_consumer.blocking_recv() {
            Ok(Message::Queue(QueueMessage::QueueChanged(snapshot))) => {
                println!("{}", console::format_snapshot(&snapshot));
            }
            Ok(Message::Queue(QueueMessage::PlayingTrackChanged(entry))) => {
                println!("{}", console::format_playing(entry.as_ref()));
            }
            Ok(Message::Queue(QueueMessage::PlaybackModesChanged {
                shuffled,
                repeat_mode,
            })) => {
                println!("{}", console::format_modes(shuffled, repeat_mode));
                remember_playback_modes(&mut config, &config_file, shuffled, repeat_mode);
            }
            Ok(Message::Queue(QueueMessage::QueueEnded)) => {
                println!("End of queue");
            }
            Ok(Message::Queue(QueueMessage::TrackNotInQueue(target))) => {
                println!("Track not found in queue: {:?}", target);
            }
            Ok(Message::Queue(QueueMessage::Shutdown)) => break,
            Ok(_) => {}
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                warn!("Display lagged on bus, skipped {} message(s)", skipped);
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut clog = colog::default_builder();
    clog.filter(None, log::LevelFilter::Info);
    clog.init();

    std::panic::set_hook(Box::new(|panic_info| {
        let current_thread = std::thread::current();
        let thread_name = current_thread.name().unwrap_or("unnamed");
        log::error!("panic in thread '{}': {}", thread_name, panic_info);
    }));

    let config_file = config_file_path()?;
    if let Err(err) = config_persistence::ensure_config_file(&config_file) {
        warn!("{}", err);
    }
    let config = config_persistence::load_config_file(&config_file);
    debug!("Loaded config: {:?}", config);

    // Bus for communication between components
    let (bus_sender, _) = broadcast::channel(1024);

    let manager_receiver = bus_sender.subscribe();
    let manager_sender = bus_sender.clone();
    let manager_thread = thread::Builder::new()
        .name("queue-manager".to_string())
        .spawn(move || {
            let mut manager =
                QueueManager::new(PlaybackQueue::new(), manager_receiver, manager_sender);
            manager.run();
        })?;

    let display_receiver = bus_sender.subscribe();
    let display_config = config.clone();
    let display_thread = thread::Builder::new()
        .name("display".to_string())
        .spawn(move || run_display(display_receiver, display_config, config_file))?;

    let _ = bus_sender.send(Message::Config(ConfigMessage::ConfigLoaded(config.clone())));

    let command_line_sources: Vec<PathBuf> = std::env::args_os().skip(1).map(PathBuf::from).collect();
    let startup_tracks = if !command_line_sources.is_empty() {
        media_file_discovery::tracks_from_paths(&command_line_sources)
    } else if config.library.queue_on_startup {
        media_file_discovery::scan_library_folders(&config.library.folders)
    } else {
        Vec::new()
    };
    if !startup_tracks.is_empty() {
        info!("Queueing {} track(s) from library", startup_tracks.len());
        let _ = bus_sender.send(Message::Queue(QueueMessage::SetQueue(startup_tracks)));
    }

    println!("{}", console::HELP_TEXT);
    let stdin = std::io::stdin();
    for line in stdin.lock().lines() {
        let line = match line {
            Ok(line) => line,
            Err(err) => {
                error!("Failed to read from stdin: {}", err);
                break;
            }
        };
        match console::parse_command(&line) {
            Ok(ConsoleCommand::Send(message)) => {
                if bus_sender.send(message).is_err() {
                    error!("Bus has no listeners; stopping");
                    break;
                }
            }
            Ok(ConsoleCommand::Help) => println!("{}", console::HELP_TEXT),
            Ok(ConsoleCommand::Quit) => break,
            Ok(ConsoleCommand::Empty) => {}
            Err(err) => println!("{}", err),
        }
    }

    let _ = bus_sender.send(Message::Queue(QueueMessage::Shutdown));
    if manager_thread.join().is_err() {
        error!("Queue manager thread panicked");
    }
    if display_thread.join().is_err() {
        error!("Display thread panicked");
    }
    info!("Bye");
    Ok(())
}

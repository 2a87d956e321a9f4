//! smplayer - Simple Music Player
//!
//! Builds the main window view-model, initializes the engine, and feeds
//! key presses read from standard input through the key dispatcher until
//! `q` is entered.

use std::sync::Arc;

use {
    anyhow::Result,
    tokio::io::{AsyncBufReadExt, BufReader, stdin},
    tracing::info,
    tracing_subscriber::EnvFilter,
};

use smplayer::{
    Key, MainWindowViewModel, PlayerEngine, SettingsStore, dispatch_channel,
    error::{ErrorReporter, ResultExt},
};

/// Maps one input line to a key press.
fn parse_key(line: &str) -> Option<Key> {
    match line.trim() {
        "" | "space" => Some(Key::Space),
        "left" => Some(Key::Left),
        "right" => Some(Key::Right),
        "up" => Some(Key::Up),
        "down" => Some(Key::Down),
        "enter" => Some(Key::Enter),
        "esc" => Some(Key::Escape),
        other => {
            let mut chars = other.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Some(Key::Char(c)),
                _ => None,
            }
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let (dispatcher, queue) = dispatch_channel();
    let engine = Arc::new(PlayerEngine::new());
    let store = SettingsStore::new();
    let mut main_window = MainWindowViewModel::new(dispatcher, Arc::clone(&engine), store)
        .add_context("Failed to build main window")?;
    engine
        .initialize()
        .add_context("Failed to initialize playback engine")?;

    let mut lines = BufReader::new(stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim() == "q" {
            break;
        }
        match parse_key(&line) {
            Some(key) => {
                let handled = main_window.handle_key_down(key);
                info!("{:?} handled: {}", key, handled);
            }
            None => info!("Unknown key {:?}", line.trim()),
        }
        queue.run_pending();

        if let Some(main) = main_window.main_view_model()
            && main.play_info.apply_pending_events() > 0
        {
            info!("{}", main.play_info.status_line());
        }
    }

    // The equalizer panel has to close before the engine releases the equalizer
    if let Err(e) = main_window
        .shutdown()
        .add_context("Failed to save settings")
    {
        ErrorReporter::error(&e, "shutdown");
    }
    engine.shutdown();
    Ok(())
}

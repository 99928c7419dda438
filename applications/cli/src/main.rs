/// Deck - shuffled playlist player for the terminal
mod commands;
mod config;

use anyhow::Context;
use clap::{Parser, Subcommand};
use commands::{Command, HELP};
use config::DeckConfig;
use deck_catalog::VideoCatalog;
use deck_core::{CatalogProvider, Track, TrackId};
use deck_queue::{EngineEvent, QueueEngine, QueueError, ShuffleMode, Transition};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast::error::RecvError;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "deck")]
#[command(about = "Play a shuffled video playlist from the terminal", long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "deck.toml")]
    config: PathBuf,

    /// Playlist to play
    #[arg(short, long, env = "DECK_PLAYLIST_ID")]
    playlist: Option<String>,

    /// Catalog API key
    #[arg(long, env = "DECK_CATALOG_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Keep catalog order instead of shuffling
    #[arg(long)]
    no_shuffle: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start an interactive session (default)
    Play,
    /// Print the playlist's video ids
    List,
    /// Look up a single video
    Inspect {
        /// Video id
        id: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "deck_cli=info,deck_queue=info,deck_catalog=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = load_config(&cli)?;

    let catalog = VideoCatalog::new(config.catalog.clone()).context("Creating catalog client")?;
    let provider: Arc<dyn CatalogProvider> = Arc::new(catalog);

    match cli.command.unwrap_or(Commands::Play) {
        Commands::Play => play(provider, config).await?,
        Commands::List => {
            let ids = provider.fetch_playlist_items(&config.playlist_id).await?;
            for id in &ids {
                println!("{id}");
            }
            tracing::info!(count = ids.len(), "Listed playlist");
        }
        Commands::Inspect { id } => {
            let details = provider.fetch_track_details(&TrackId::new(id)).await?;
            println!("{}", serde_json::to_string_pretty(&details)?);
        }
    }

    Ok(())
}

fn load_config(cli: &Cli) -> anyhow::Result<DeckConfig> {
    let mut config = DeckConfig::load(&cli.config)
        .with_context(|| format!("Loading {}", cli.config.display()))?;

    if let Some(playlist) = &cli.playlist {
        config.playlist_id = playlist.clone();
    }
    if let Some(api_key) = &cli.api_key {
        config.catalog.api_key = api_key.clone();
    }
    if cli.no_shuffle {
        config.engine.shuffle = ShuffleMode::Off;
    }

    config.validate()?;
    Ok(config)
}

async fn play(provider: Arc<dyn CatalogProvider>, config: DeckConfig) -> anyhow::Result<()> {
    tracing::info!(playlist_id = %config.playlist_id, "Starting session");
    let engine = QueueEngine::initialize(provider, &config.playlist_id, config.engine)
        .await
        .context("Starting session")?;

    let printer = tokio::spawn(print_events(engine.subscribe()));

    show(&engine).await;
    println!("{HELP}");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        let command = match line.parse::<Command>() {
            Ok(command) => command,
            Err(e) => {
                eprintln!("{e} (type 'help')");
                continue;
            }
        };

        if command == Command::Quit {
            break;
        }
        if let Err(e) = run(&engine, command).await {
            tracing::debug!(error = %e, "Command failed");
        }
    }

    printer.abort();
    tracing::info!("Session ended");
    Ok(())
}

async fn run(engine: &QueueEngine, command: Command) -> Result<(), QueueError> {
    let outcome = match command {
        Command::Next => Some(engine.advance().await?),
        Command::Previous => Some(engine.go_to_previous().await?),
        Command::Select(id) => Some(engine.select_track(id).await?),
        Command::Ended => Some(engine.notify_playback_ended().await?),
        Command::PlaybackError(id) => {
            let id = match id {
                Some(id) => id,
                None => match engine.snapshot().await.current_track {
                    Some(track) => track.id,
                    None => return Err(QueueError::QueueEmpty),
                },
            };
            engine.notify_playback_error(&id).await?
        }
        Command::Refresh => {
            engine.refresh_upcoming().await;
            None
        }
        Command::Show => {
            show(engine).await;
            None
        }
        Command::Playlist => {
            let current = engine.current_index().await;
            for (index, id) in engine.playlist().await.iter().enumerate() {
                let marker = if index == current { '>' } else { ' ' };
                println!("{marker} {index:>4}  {id}");
            }
            None
        }
        Command::ClearError => {
            engine.clear_error().await;
            None
        }
        Command::Help => {
            println!("{HELP}");
            None
        }
        Command::Quit => None,
    };

    if let Some(Transition::Dropped) = outcome {
        println!("(busy, try again)");
    }
    Ok(())
}

async fn show(engine: &QueueEngine) {
    let snapshot = engine.snapshot().await;

    match &snapshot.current_track {
        Some(track) => println!("now:  {}", describe(track)),
        None => println!("now:  -"),
    }
    for (i, track) in snapshot.upcoming_tracks.iter().enumerate() {
        println!("  {}.  {}", i + 1, describe(track));
    }
    if snapshot.is_loading_next {
        println!("(loading)");
    }
    if let Some(error) = &snapshot.error {
        println!("! {error}");
    }
}

fn describe(track: &Track) -> String {
    format!("{} - {} [{}]", track.artist, track.localized_title, track.id)
}

async fn print_events(mut events: tokio::sync::broadcast::Receiver<EngineEvent>) {
    loop {
        match events.recv().await {
            Ok(EngineEvent::TrackChanged {
                track,
                auto_advance,
                ..
            }) => {
                let how = if auto_advance { "auto" } else { "play" };
                println!("[{how}] {}", describe(&track));
                println!("       cover: {}", track.cover_image_url);
            }
            Ok(EngineEvent::UpcomingChanged { tracks }) => {
                let next: Vec<String> = tracks.iter().map(describe).collect();
                println!("[next] {}", next.join(" | "));
            }
            Ok(EngineEvent::TrackPurged { track_id }) => {
                println!("[drop] {track_id} removed from this session");
            }
            Ok(EngineEvent::Error { message }) => eprintln!("[error] {message}"),
            Ok(EngineEvent::LoadingChanged { .. }) => {}
            Err(RecvError::Lagged(missed)) => {
                tracing::warn!(missed, "Event display fell behind");
            }
            Err(RecvError::Closed) => break,
        }
    }
}

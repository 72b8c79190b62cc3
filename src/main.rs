//! Gym Pulse Timer CLI - an interval workout timer
//!
//! Runs sessions of work and rest phases in the terminal:
//! - an optional get-ready countdown
//! - work and rest phases repeated for every round of every set
//! - beep and spoken cues at phase starts and in the last seconds

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{CommandFactory, Parser};

use gympulse::cli::{
    run_session, spawn_stdin_reader, Cli, Commands, CueCommands, Display, PresetCommands,
    PreviewArgs, RunArgs, SaveArgs, SessionRunner,
};
use gympulse::config::{AppConfig, ConfigError};
use gympulse::cues::{CuePlayer, TerminalCuePlayer};
use gympulse::presets::{default_presets_path, Preset, PresetError, PresetStore};
use gympulse::types::TimerConfiguration;

/// Main entry point
#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Parse command line arguments
    let cli = Cli::parse();

    // Initialize logging
    init_tracing(cli.verbose);

    // Execute command
    if let Err(e) = execute(cli).await {
        Display::show_error(&format!("{:#}", e));
        if let Some(hint) = suggestion_for(&e) {
            eprintln!("hint: {}", hint);
        }
        std::process::exit(1);
    }
}

/// Initializes the tracing subscriber for logging.
fn init_tracing(verbose: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();
}

/// Executes the CLI command.
async fn execute(cli: Cli) -> Result<()> {
    if cli.verbose {
        tracing::info!("Verbose mode enabled");
    }

    let config = load_config(cli.config.clone())?;
    let presets_path = resolve_presets_path(cli.presets_file.clone(), &config)?;

    match cli.command {
        Some(Commands::Run(args)) => {
            run(args, &config, PresetStore::open(presets_path)).await?;
        }
        Some(Commands::Presets { command }) => {
            manage_presets(command, &config, PresetStore::open(presets_path))?;
        }
        Some(Commands::Cues {
            command: CueCommands::Preview(args),
        }) => {
            preview_cues(&args, &config)?;
        }
        Some(Commands::Completions { shell }) => {
            generate_completions(shell);
        }
        None => {
            // No command provided, show help
            Cli::command().print_help()?;
        }
    }

    Ok(())
}

/// Loads the config from `--config`, or the default location.
fn load_config(path: Option<PathBuf>) -> Result<AppConfig, ConfigError> {
    match path {
        Some(path) => AppConfig::load(&path),
        None => AppConfig::load_default(),
    }
}

/// The presets file: flag (or env), then config, then `~/.gympulse`.
fn resolve_presets_path(flag: Option<PathBuf>, config: &AppConfig) -> Result<PathBuf> {
    if let Some(path) = flag.or_else(|| config.presets_path.clone()) {
        return Ok(path);
    }
    Ok(default_presets_path()?)
}

/// Runs a session in the foreground.
async fn run(args: RunArgs, config: &AppConfig, store: PresetStore) -> Result<()> {
    let (base, audio) = match args.preset.as_deref() {
        Some(key) => {
            let preset = store.resolve(key)?;
            tracing::debug!(preset = %preset.name, "Using preset");
            (preset.timer_configuration(), preset.audio_preferences())
        }
        None => (TimerConfiguration::default(), config.audio_preferences()),
    };

    let configuration = args.intervals.apply(base);
    let audio = args.audio.apply(audio);
    tracing::debug!(?configuration, ?audio, "Session configuration");

    let runner = SessionRunner::new(
        configuration,
        TerminalCuePlayer::stdout(audio),
        config.countdown_seconds,
    );
    let commands = spawn_stdin_reader().context("Failed to read commands from stdin")?;
    let outcome = run_session(
        runner,
        Duration::from_millis(config.tick_interval_ms),
        commands,
    )
    .await;
    tracing::debug!(?outcome, "Session finished");

    Ok(())
}

/// Executes a presets subcommand.
fn manage_presets(command: PresetCommands, config: &AppConfig, mut store: PresetStore) -> Result<()> {
    match command {
        PresetCommands::List => {
            Display::show_presets(store.presets());
        }
        PresetCommands::Show { preset } => {
            Display::show_preset(store.resolve(&preset)?);
        }
        PresetCommands::Save(args) => {
            let saved = save_preset(&mut store, args, config)?;
            Display::show_preset_saved(&saved);
        }
        PresetCommands::Rename { preset, new_name } => {
            let existing = store.resolve(&preset)?.clone();
            let renamed = store
                .rename(existing.id, &new_name, Utc::now())
                .with_context(|| format!("Failed to rename preset '{}'", existing.name))?;
            Display::show_preset_renamed(&existing.name, &renamed);
        }
        PresetCommands::Delete { preset } => {
            let id = store.resolve(&preset)?.id;
            let deleted = store
                .delete(id)
                .with_context(|| format!("Failed to delete preset '{}'", preset))?;
            Display::show_preset_deleted(&deleted);
        }
    }
    Ok(())
}

/// Saves a preset. An existing preset with the same name is updated in
/// place, with unset flags keeping its values.
fn save_preset(store: &mut PresetStore, args: SaveArgs, config: &AppConfig) -> Result<Preset> {
    let name = Preset::normalized_name(&args.name);
    let now = Utc::now();

    let preset = match store.find_by_name(&name) {
        Some(existing) => {
            let configuration = args.intervals.apply(existing.timer_configuration());
            let audio = args.audio.apply(existing.audio_preferences());
            let mut updated =
                Preset::from_configuration(&existing.name, &configuration, audio, now);
            updated.id = existing.id;
            updated
        }
        None => {
            let configuration = args.intervals.apply(TimerConfiguration::default());
            let audio = args.audio.apply(config.audio_preferences());
            Preset::from_configuration(&name, &configuration, audio, now)
        }
    };

    store
        .upsert(preset, now)
        .with_context(|| format!("Failed to save preset '{}'", name))
}

/// Plays a sample on each requested cue channel.
fn preview_cues(args: &PreviewArgs, config: &AppConfig) -> Result<()> {
    let player = TerminalCuePlayer::stdout(config.audio_preferences());
    for channel in args.channels() {
        Display::show_cue_preview(channel);
        player
            .preview(channel)
            .with_context(|| format!("Failed to preview {:?} cue", channel))?;
    }
    Ok(())
}

/// Generates shell completion scripts.
fn generate_completions(shell: clap_complete::Shell) {
    use clap_complete::generate;
    use std::io;

    let mut cmd = Cli::command();
    let bin_name = cmd.get_name().to_string();
    generate(shell, &mut cmd, bin_name, &mut io::stdout());
}

/// Finds a user-facing hint in the error chain.
fn suggestion_for(error: &anyhow::Error) -> Option<&'static str> {
    error.chain().find_map(|cause| {
        if let Some(e) = cause.downcast_ref::<PresetError>() {
            Some(e.suggestion())
        } else {
            cause.downcast_ref::<ConfigError>().map(ConfigError::suggestion)
        }
    })
}

// ============================================================================
// Tests
// ============================================================================

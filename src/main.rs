// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Result, anyhow, Context};
use log::{info, warn, LevelFilter, Log, Metadata, Record, Level, SetLoggerError};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use clap::{Parser, ValueEnum, CommandFactory, Subcommand};
use clap_complete::{generate, Shell};
use tokio_util::sync::CancellationToken;

use srtcue::app_config::{self, Config};
use srtcue::subtitle_keys::{full_key, parse_line_key};
use srtcue::subtitle_processor::{parse_srt_file, to_srt_string};
use srtcue::{Clock, DisplaySink, EmitError, MonotonicClock, SubtitleCatalog, SubtitleScheduler};

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Parse one SRT file and print its cues
    Parse {
        /// SRT file to parse
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// List the subtitle sets found under a directory
    Keys {
        /// Subtitle directory (defaults to the configured one)
        #[arg(short, long)]
        dir: Option<PathBuf>,
    },

    /// Play a subtitle set in real time, printing each line
    Play {
        /// Base key (file stem) of the set to play
        #[arg(value_name = "KEY")]
        key: String,

        /// Subtitle directory (defaults to the configured one)
        #[arg(short, long)]
        dir: Option<PathBuf>,
    },

    /// Generate shell completions for srtcue
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// srtcue - SRT subtitles played against a clock
#[derive(Parser, Debug)]
#[command(name = "srtcue")]
#[command(version)]
#[command(about = "Parse SRT subtitle sets and play them line by line")]
#[command(long_about = "srtcue loads SRT subtitle files from a directory, indexes them by file stem and plays them line by line against a clock.

EXAMPLES:
    srtcue parse logs/intro.srt            # Print the cues of one file
    srtcue keys --dir logs/                # List subtitle sets and their keys
    srtcue play intro --dir logs/          # Play a set in real time (Ctrl-C stops)
    srtcue completions bash > srtcue.bash  # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. If the config file doesn't
    exist, a default one will be created automatically.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json", global = true)]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum, global = true)]
    log_level: Option<CliLogLevel>,
}

// @struct: Custom logger implementation
// Filtering follows log::max_level(), which is raised or lowered after the
// config and command line are read.
struct CustomLogger;

impl CustomLogger {
    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        log::set_boxed_logger(Box::new(CustomLogger))?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI color and tag for log level
    fn style_for_level(level: Level) -> (&'static str, &'static str) {
        match level {
            Level::Error => ("1;31", "ERROR"),
            Level::Warn => ("1;33", "WARN "),
            Level::Info => ("1;32", "INFO "),
            Level::Debug => ("1;36", "DEBUG"),
            Level::Trace => ("1;35", "TRACE"),
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let (color, tag) = Self::style_for_level(record.level());

            let mut stderr = std::io::stderr();
            let _ = writeln!(stderr, "\x1B[{}m{} {} {}\x1B[0m", color, now, tag, record.args());
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

/// Prints each displayed line with its offset
struct StdoutSink {
    catalog: Arc<SubtitleCatalog>,
    clock: MonotonicClock,
}

impl DisplaySink for StdoutSink {
    fn emit(&self, display_key: &str) -> Result<(), EmitError> {
        let (base_key, index) = parse_line_key(display_key)
            .ok_or_else(|| EmitError::new(display_key, "not a line key"))?;
        let text = self.catalog
            .line_text(base_key, index)
            .ok_or_else(|| EmitError::new(display_key, "no such line"))?;

        let mut stdout = std::io::stdout().lock();
        writeln!(stdout, "[{}] {}", srtcue::SubtitleEntry::format_timestamp(self.clock.now()), text)
            .map_err(|e| EmitError::new(display_key, e.to_string()))
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize the logger once with info level by default
    // We'll update the level after loading the config if needed
    CustomLogger::init(LevelFilter::Info)?;

    let cli = CommandLineOptions::parse();

    if let Some(level) = &cli.log_level {
        let level: app_config::LogLevel = level.clone().into();
        log::set_max_level(level.to_level_filter());
    }

    match cli.command {
        Commands::Completions { shell } => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "srtcue", &mut std::io::stdout());
            Ok(())
        }
        Commands::Parse { file } => run_parse(file),
        Commands::Keys { dir } => {
            let config = load_config(&cli.config_path, cli.log_level.is_none())?;
            run_keys(dir.unwrap_or(config.subtitles_dir))
        }
        Commands::Play { key, dir } => {
            let mut config = load_config(&cli.config_path, cli.log_level.is_none())?;
            if let Some(dir) = dir {
                config.subtitles_dir = dir;
            }
            run_play(&config, &key).await
        }
    }
}

fn load_config(config_path: &str, apply_log_level: bool) -> Result<Config> {
    let config = Config::load_or_create(config_path)?;
    config.validate().context("Configuration validation failed")?;

    // If log level was not set via command line, update it from config now
    if apply_log_level {
        log::set_max_level(config.log_level.to_level_filter());
    }

    Ok(config)
}

fn run_parse(file: PathBuf) -> Result<()> {
    let entries = parse_srt_file(&file)?;
    info!("Parsed {} cue(s) from {:?}", entries.len(), file);
    print!("{}", to_srt_string(&entries));
    Ok(())
}

fn run_keys(dir: PathBuf) -> Result<()> {
    let catalog = SubtitleCatalog::load(&dir)?;
    if catalog.is_empty() {
        warn!("No subtitle sets found under {:?}", dir);
        return Ok(());
    }

    for key in catalog.keys() {
        println!("{}\t{} line(s)\t{}", key, catalog.entries_for(key).len(), full_key(key));
    }
    Ok(())
}

async fn run_play(config: &Config, key: &str) -> Result<()> {
    let catalog = Arc::new(SubtitleCatalog::load(&config.subtitles_dir)?);
    if !catalog.contains(key) {
        return Err(anyhow!("No subtitles loaded for key: {}", key));
    }

    let clock = MonotonicClock::new();
    let sink = StdoutSink {
        catalog: Arc::clone(&catalog),
        clock,
    };
    let scheduler = SubtitleScheduler::new().with_poll_interval(config.poll_interval());

    let cancel = CancellationToken::new();
    let ctrl_c_token = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            ctrl_c_token.cancel();
        }
    });

    let outcome = scheduler
        .play(key, catalog.entries_for(key), &clock, &sink, &cancel)
        .await;

    if outcome.is_cancelled() {
        warn!("Playback interrupted after {} line(s)", outcome.emitted());
    } else {
        info!("Played {} line(s)", outcome.emitted());
    }
    Ok(())
}

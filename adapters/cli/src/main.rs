#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs a headless Long Snake session.

mod driver;
mod script;
mod settings;
mod text;

use std::{io, path::PathBuf, time::Duration};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use log::debug;
use long_snake_core::{Config, SpeedScaling, WELCOME_BANNER};
use long_snake_system_best_score::{BestScoreStore, FileStore, MemoryStore};
use simplelog::{ColorChoice, LevelFilter, TermLogger, TerminalMode};

use crate::{
    driver::{DriverOptions, RenderMode},
    script::TurnScript,
    settings::SettingsFile,
    text::TextBackend,
};

/// Command-line arguments accepted by the Long Snake binary.
#[derive(Debug, Parser)]
#[command(name = "long-snake", about = "Runs a deterministic Long Snake session")]
struct CliArgs {
    /// TOML file overriding the classic configuration.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Number of frames to simulate.
    #[arg(long, default_value_t = 600)]
    frames: u32,
    /// Simulated length of one frame in milliseconds.
    #[arg(long, value_name = "MILLIS", default_value_t = 50)]
    frame_ms: u64,
    /// Seed for food placement, overriding the configuration.
    #[arg(long)]
    seed: Option<u64>,
    /// Speed-scaling rule, overriding the configuration.
    #[arg(long, value_enum)]
    speed_scaling: Option<ScalingArg>,
    /// Scripted turns as FRAME:DIRECTION pairs, e.g. `12:L,40:U`.
    #[arg(long, value_name = "SCRIPT")]
    turns: Option<TurnScript>,
    /// Steer toward the food automatically.
    #[arg(long)]
    autopilot: bool,
    /// Which frames to draw on stdout.
    #[arg(long, value_enum, default_value_t = RenderMode::Final)]
    render: RenderMode,
    /// File holding the best score across runs. Kept in memory when absent.
    #[arg(long, value_name = "PATH")]
    best_score_file: Option<PathBuf>,
    /// Verbosity of diagnostics written to stderr.
    #[arg(long, value_enum, default_value_t = LogLevel::Warn)]
    log_level: LogLevel,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum ScalingArg {
    Literal,
    Continuous,
}

impl From<ScalingArg> for SpeedScaling {
    fn from(value: ScalingArg) -> Self {
        match value {
            ScalingArg::Literal => SpeedScaling::Literal,
            ScalingArg::Continuous => SpeedScaling::Continuous,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(value: LogLevel) -> Self {
        match value {
            LogLevel::Off => LevelFilter::Off,
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

impl CliArgs {
    fn config(&self) -> Result<Config> {
        let settings = match &self.config {
            Some(path) => SettingsFile::load(path)?,
            None => SettingsFile::default(),
        };
        let mut config = settings.apply(Config::classic());
        if let Some(seed) = self.seed {
            config = config.with_rng_seed(seed);
        }
        if let Some(scaling) = self.speed_scaling {
            config = config.with_speed_scaling(scaling.into());
        }
        config.validate().context("invalid configuration")?;
        Ok(config)
    }

    fn driver_options(&self) -> DriverOptions {
        DriverOptions {
            frames: self.frames,
            frame_length: Duration::from_millis(self.frame_ms),
            turns: self.turns.clone().unwrap_or_default(),
            autopilot: self.autopilot,
            render: self.render,
        }
    }

    fn store(&self) -> Box<dyn BestScoreStore> {
        match &self.best_score_file {
            Some(path) => Box::new(FileStore::new(path)),
            None => Box::new(MemoryStore::default()),
        }
    }
}

/// Entry point for the Long Snake command-line interface.
fn main() -> Result<()> {
    let args = CliArgs::parse();
    TermLogger::init(
        args.log_level.into(),
        simplelog::Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )
    .context("failed to install logger")?;

    let config = args.config()?;
    let options = args.driver_options();
    let mut store = args.store();

    println!("{WELCOME_BANNER}");
    let stdout = io::stdout();
    let mut backend = TextBackend::new(stdout.lock());
    let summary = driver::run(config, store.as_mut(), &options, &mut backend)?;
    debug!("presented {} frames", backend.frames_presented());

    println!("{summary}");
    Ok(())
}

// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Glide CLI entrypoint.
//!
//! Developer-facing commands for the inertial viewport controller:
//!
//! ```text
//! glide replay <script.json> [--fps N] [--settle-frames N] [--format table|json]
//! glide config show|init|validate
//! ```
//!
//! Every command accepts `--config FILE` to use a specific prefs file instead
//! of `viewer.json` in the platform config directory. Logs go to stderr;
//! `RUST_LOG` overrides the level chosen by `-v`.

// The CLI is expected to print to stdout/stderr.
#![allow(clippy::print_stdout, clippy::print_stderr)]

mod render;
mod script;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use glide_app_core::config::ConfigService;
use glide_app_core::prefs::{ViewerPrefs, PREFS_KEY};
use glide_config_fs::FsConfigStore;
use glide_core::ViewFrame;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::render::Format;
use crate::script::{ReplayOptions, Script};

#[derive(Parser, Debug)]
#[command(author, version, about = "Glide viewport controller tools")]
struct Args {
    /// Prefs file to use instead of the platform default
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,
    /// Raise log verbosity (repeatable)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Replay a gesture script and print the camera pose per frame
    Replay {
        /// Script file (JSON)
        script: PathBuf,
        /// Frame rate of the replay clock
        #[arg(long, default_value_t = 60.0)]
        fps: f64,
        /// Frames to keep ticking after the last event while inertia runs
        #[arg(long, default_value_t = 600)]
        settle_frames: u64,
        /// Output format
        #[arg(long, value_enum, default_value_t = Format::Table)]
        format: Format,
    },
    /// Inspect or initialise viewer prefs
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigAction {
    /// Print the effective prefs as JSON
    Show,
    /// Write default prefs
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Check that the prefs file exists and holds valid values
    Validate,
}

/// Where prefs live: a store directory plus the key inside it.
struct PrefsLocation {
    service: ConfigService<FsConfigStore>,
    key: String,
}

impl PrefsLocation {
    fn resolve(config: Option<&Path>) -> Result<Self> {
        let (store, key) = match config {
            Some(path) => {
                let key = path
                    .file_stem()
                    .and_then(|s| s.to_str())
                    .with_context(|| format!("config path has no usable name: {}", path.display()))?
                    .to_owned();
                let dir = match path.parent() {
                    Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
                    _ => PathBuf::from("."),
                };
                let store = FsConfigStore::at(&dir)
                    .with_context(|| format!("open config dir {}", dir.display()))?;
                (store, key)
            }
            None => (
                FsConfigStore::new().context("open platform config dir")?,
                PREFS_KEY.to_owned(),
            ),
        };
        Ok(Self {
            service: ConfigService::new(store),
            key,
        })
    }

    fn path(&self) -> PathBuf {
        self.service.store().path_for(&self.key)
    }

    fn load(&self) -> Result<ViewerPrefs> {
        ViewerPrefs::load_from(&self.service, &self.key)
            .with_context(|| format!("load prefs from {}", self.path().display()))
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    match args.cmd {
        Command::Replay {
            script,
            fps,
            settle_frames,
            format,
        } => replay(args.config.as_deref(), &script, fps, settle_frames, format),
        Command::Config { action } => config(args.config.as_deref(), action),
    }
}

fn replay(
    config: Option<&Path>,
    script_path: &Path,
    fps: f64,
    settle_frames: u64,
    format: Format,
) -> Result<()> {
    let text = fs::read_to_string(script_path)
        .with_context(|| format!("read script {}", script_path.display()))?;
    let script: Script = serde_json::from_str(&text)
        .with_context(|| format!("parse script {}", script_path.display()))?;

    let prefs = PrefsLocation::resolve(config)?.load()?;
    let mut controller = prefs.controller()?;
    if let Some([w, h]) = script.view_size {
        if !(w.is_finite() && h.is_finite() && w > 0.0 && h > 0.0) {
            bail!("script view_size must be positive, got [{w}, {h}]");
        }
        *controller.host_space_mut() = ViewFrame::centered(w, h);
    }

    info!(events = script.events.len(), fps, "replaying script");
    let records = script::replay(
        &mut controller,
        &script,
        ReplayOptions { fps, settle_frames },
    )?;
    print!("{}", render::render(&records, format)?);
    if format == Format::Table {
        println!();
    }
    Ok(())
}

fn config(config: Option<&Path>, action: ConfigAction) -> Result<()> {
    let location = PrefsLocation::resolve(config)?;
    match action {
        ConfigAction::Show => {
            let prefs = location.load()?;
            println!("{}", serde_json::to_string_pretty(&prefs)?);
        }
        ConfigAction::Init { force } => {
            let path = location.path();
            if path.exists() && !force {
                bail!(
                    "{} already exists; pass --force to overwrite",
                    path.display()
                );
            }
            ViewerPrefs::default()
                .save_to(&location.service, &location.key)
                .with_context(|| format!("write {}", path.display()))?;
            println!("wrote {}", path.display());
        }
        ConfigAction::Validate => {
            let path = location.path();
            let stored: Option<ViewerPrefs> = location
                .service
                .load(&location.key)
                .with_context(|| format!("parse {}", path.display()))?;
            let Some(prefs) = stored else {
                bail!("no prefs at {}", path.display());
            };
            prefs
                .viewport
                .validate()
                .with_context(|| format!("invalid prefs in {}", path.display()))?;
            println!("ok: {}", path.display());
        }
    }
    Ok(())
}

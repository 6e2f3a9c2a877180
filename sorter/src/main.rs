use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use engine::app::{AppConfig, run_game};
use engine::surface::SurfaceSize;
use sorter::app::{SorterApp, open_cue_player};
use sorter::recording::Recording;
use sorter::settings::{SettingsStore, SorterSettings};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "sorter")]
#[command(about = "Drag each shape onto the hole of the same color and kind")]
struct Cli {
    /// Seed for shape placement; random when omitted.
    #[arg(long)]
    seed: Option<u64>,
    /// Base shape size in pixels.
    #[arg(long)]
    size: Option<f32>,
    #[arg(long)]
    width: Option<u32>,
    #[arg(long)]
    height: Option<u32>,
    #[arg(long, default_value_t = false)]
    mute: bool,
    /// Save every input to PATH on exit.
    #[arg(long, value_name = "PATH", conflicts_with = "replay")]
    record: Option<PathBuf>,
    /// Re-run a saved session headlessly and print the outcome.
    #[arg(long, value_name = "PATH")]
    replay: Option<PathBuf>,
    /// Write the effective settings back to the settings file.
    #[arg(long, default_value_t = false)]
    write_settings: bool,
}

impl Cli {
    fn apply(&self, settings: &mut SorterSettings) {
        if let Some(size) = self.size {
            settings.play.shape_size = size;
        }
        if let Some(width) = self.width {
            settings.video.width = width;
        }
        if let Some(height) = self.height {
            settings.video.height = height;
        }
        if self.mute {
            settings.audio.mute_all = true;
        }
    }
}

fn replay(path: &Path) -> Result<()> {
    let recording = Recording::load(path)
        .with_context(|| format!("Failed to load recording {}", path.display()))?;
    let summary = recording.replay();
    tracing::info!(
        seed = recording.seed,
        frames = summary.frames,
        presses = summary.presses,
        pairs = summary.pairs,
        matched = summary.matched,
        "replay finished"
    );
    println!(
        "frames {} presses {} pairs {} matched {}",
        summary.frames, summary.presses, summary.pairs, summary.matched
    );
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    if let Some(path) = cli.replay.as_ref() {
        return replay(path);
    }

    let store = SettingsStore::from_env();
    let mut settings = store.load();
    cli.apply(&mut settings);
    let settings = settings.sanitized();
    if cli.write_settings {
        store
            .save(&settings)
            .with_context(|| format!("Failed to write {}", store.path().display()))?;
        tracing::info!(path = %store.path().display(), "settings written");
    }

    let seed = cli.seed.unwrap_or_else(rand::random);
    tracing::info!(
        seed,
        shape_size = settings.play.shape_size,
        pairs_per_spawn = ?settings.play.pairs_per_spawn,
        replenish = ?settings.play.replenish,
        hit_radius = ?settings.play.hit_radius,
        "starting"
    );

    let config = AppConfig {
        title: "Shape Sorter".to_string(),
        desired_size: SurfaceSize::new(settings.video.width, settings.video.height),
        clamp_to_monitor: true,
        vsync: Some(settings.video.vsync),
    };
    let player = open_cue_player(&settings);
    let mut app = SorterApp::new(seed, settings, player);
    if let Some(path) = cli.record {
        app = app.with_recording(path);
    }

    run_game(config, app).context("Failed to open the game window")?;
    Ok(())
}

//! Command-line parsing for the carbon clock.
//!
//! The goal of this module is to keep **argument parsing** and **command
//! dispatch** separate from the warp engine.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

use crate::domain::{Granularity, ModelChoice, Preset, RunConfig, WarpConfig};
use crate::warp::DEFAULT_WINDOW;

pub mod picker;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(
    name = "cclock",
    version,
    about = "Carbon clock: warps the date by the global temperature anomaly"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Warp a single date and print the summary report.
    Warp(WarpArgs),
    /// Print the rolling warp-rate series, with an optional ASCII chart.
    Series(SeriesArgs),
    /// Plot a previously saved warp-series JSON.
    Plot(PlotArgs),
    /// Launch the interactive clock TUI.
    ///
    /// Uses the same underlying pipeline as `cclock warp`, but renders the
    /// clock and the warp-rate chart in a terminal UI using Ratatui.
    Tui(WarpArgs),
}

/// Common options for warping and the TUI.
#[derive(Debug, Parser, Clone)]
pub struct WarpArgs {
    /// Date to warp (YYYY-MM-DD). `warp` prompts when omitted.
    #[arg(short = 'd', long)]
    pub date: Option<NaiveDate>,

    /// Warp model.
    #[arg(short = 'm', long, value_enum, default_value_t = ModelChoice::LocalLinear)]
    pub model: ModelChoice,

    /// Warp-target preset (baseline year / target year / target anomaly).
    #[arg(short = 'p', long, value_enum, default_value_t = Preset::Midcentury)]
    pub preset: Preset,

    /// Override the preset's baseline year.
    #[arg(long)]
    pub baseline_year: Option<i32>,

    /// Override the preset's target year.
    #[arg(long)]
    pub target_year: Option<i32>,

    /// Override the preset's target anomaly (°C).
    #[arg(long)]
    pub target_anomaly: Option<f64>,

    /// Which anomaly feeds the warp.
    #[arg(short = 'g', long, value_enum, default_value_t = Granularity::Annual)]
    pub granularity: Granularity,

    /// Trailing window (years) for the rolling warp-rate series.
    #[arg(short = 'w', long, default_value_t = DEFAULT_WINDOW)]
    pub window: usize,

    /// Use the deterministic synthetic series instead of fetching.
    #[arg(long)]
    pub offline: bool,

    /// Seed for the synthetic series.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,
}

impl WarpArgs {
    /// Resolve preset plus overrides into the pipeline configuration.
    pub fn to_run_config(&self) -> RunConfig {
        let preset = self.preset.config();
        let warp = WarpConfig {
            baseline_year: self.baseline_year.unwrap_or(preset.baseline_year),
            target_year: self.target_year.unwrap_or(preset.target_year),
            target_anomaly: self.target_anomaly.unwrap_or(preset.target_anomaly),
        };
        RunConfig {
            model: self.model,
            granularity: self.granularity,
            warp,
            window: self.window,
            offline: self.offline,
            sample_seed: self.seed,
        }
    }
}

/// Options for the rolling series command.
#[derive(Debug, Parser)]
pub struct SeriesArgs {
    #[command(flatten)]
    pub warp: WarpArgs,

    /// Render an ASCII chart under the table.
    #[arg(long)]
    pub plot: bool,

    /// Plot width (columns).
    #[arg(long, default_value_t = 80)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 20)]
    pub height: usize,

    /// Export the series to CSV.
    #[arg(long)]
    pub export: Option<PathBuf>,

    /// Save the series snapshot to JSON (re-plottable with `cclock plot`).
    #[arg(long)]
    pub save: Option<PathBuf>,
}

/// Options for plotting a saved series.
#[derive(Debug, Parser)]
pub struct PlotArgs {
    /// Series JSON file produced by `cclock series --save`.
    #[arg(long, value_name = "JSON")]
    pub series: PathBuf,

    /// Plot width (columns).
    #[arg(long, default_value_t = 80)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 20)]
    pub height: usize,
}

//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - acquires the anomaly series (remote table or synthetic sample)
//! - runs the warp engine
//! - prints reports/plots
//! - writes optional exports

use chrono::Local;
use clap::Parser;

use crate::cli::{Command, PlotArgs, SeriesArgs, WarpArgs};
use crate::error::AppError;

pub mod pipeline;

/// Entry point for the `cclock` binary.
pub fn run() -> Result<(), AppError> {
    // We want `cclock` and `cclock -p paris` to behave like `cclock tui ...`.
    //
    // Clap requires a subcommand name, so we do a small, explicit rewrite of the
    // argv list before parsing. This preserves a clean clap structure while
    // retaining the requested UX.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Warp(args) => handle_warp(args),
        Command::Series(args) => handle_series(args),
        Command::Plot(args) => handle_plot(args),
        Command::Tui(args) => crate::tui::run(args),
    }
}

fn handle_warp(args: WarpArgs) -> Result<(), AppError> {
    let input_date = match args.date {
        Some(date) => date,
        None => crate::cli::picker::prompt_for_date()?,
    };
    let config = args.to_run_config();

    let source = pipeline::fetch_series(&config, Local::now().date_naive())?;
    let result = pipeline::run_warp(&config, &source, input_date)?;

    println!(
        "{}",
        crate::report::format_warp_summary(
            &source.label,
            &source.series.stats(),
            &config,
            input_date,
            &result,
        )
    );

    Ok(())
}

fn handle_series(args: SeriesArgs) -> Result<(), AppError> {
    let config = args.warp.to_run_config();
    let asof_date = args.warp.date.unwrap_or_else(|| Local::now().date_naive());

    let source = pipeline::fetch_series(&config, asof_date)?;
    let points = match pipeline::run_series(&config, &source, asof_date) {
        Ok(points) => points,
        // An all-missing window is recoverable at this layer: print the
        // placeholder and exit clean.
        Err(AppError::InsufficientData { window }) => {
            println!("{}", crate::report::format_series_placeholder(window));
            return Ok(());
        }
        Err(err) => return Err(err),
    };

    println!(
        "{}",
        crate::report::format_series_table(&points, config.window)
    );

    if args.plot {
        let plot = crate::plot::render_ascii_series(&points, args.width, args.height);
        println!("{plot}");
    }

    // Optional exports.
    if let Some(path) = &args.export {
        crate::io::write_series_csv(path, &points)?;
    }
    if let Some(path) = &args.save {
        crate::io::write_series_json(path, asof_date, &config.warp, config.window, &points)?;
    }

    Ok(())
}

fn handle_plot(args: PlotArgs) -> Result<(), AppError> {
    let series = crate::io::read_series_json(&args.series)?;

    println!(
        "Saved series: as of {}, window {}, target {}",
        series.asof_date,
        series.window,
        crate::report::describe_target(&series.config)
    );
    let plot = crate::plot::render_ascii_series_from_file(&series, args.width, args.height);
    println!("{plot}");

    Ok(())
}

/// Rewrite argv so `cclock` defaults to `cclock tui`.
///
/// Rules:
/// - `cclock`                      -> `cclock tui`
/// - `cclock -p paris ...`         -> `cclock tui -p paris ...`
/// - `cclock --help/--version/-h`  -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("tui".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "warp" | "series" | "plot" | "tui");
    if is_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "tui flags".
    if arg1.starts_with('-') {
        argv.insert(1, "tui".to_string());
        return argv;
    }

    // Otherwise, leave as-is.
    argv
}

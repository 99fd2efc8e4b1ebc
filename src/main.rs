//! bga-fanout: automatic dogbone fanout for BGA footprints
//!
//! Reads a JSON board document, adds a track and via to every connected pad
//! of the selected BGA footprints, and writes the modified board.

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use indexmap::IndexMap;
use tracing::{error, info, Level};
use tracing_subscriber::EnvFilter;

use bga_fanout::board::Board;
use bga_fanout::config::{self, ConfigError};
use bga_fanout::fanout::{FanoutEngine, FanoutError, FanoutResult};

/// Automatic dogbone fanout for BGA footprints.
///
/// Infers the ball pitch from the pad positions and escapes every connected
/// pad with a short track and a via.
#[derive(Parser, Debug)]
#[command(name = "bga-fanout")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Board document (JSON)
    #[arg(value_name = "BOARD")]
    board: PathBuf,

    /// Footprint reference to fan out (repeatable; default: selected footprints)
    #[arg(short, long = "reference", value_name = "REF")]
    references: Vec<String>,

    /// Outer pad rings left without dogbones
    #[arg(long, value_name = "N")]
    skip_outer: Option<u32>,

    /// Pad rings escaped with the axis-aligned edge pattern
    #[arg(long, value_name = "N")]
    edge_layers: Option<u32>,

    /// Write the modified board here instead of stdout
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Path to configuration file
    #[arg(short, long, value_name = "CONFIG_FILE")]
    config: Option<PathBuf>,

    /// Print the computed dogbones instead of the modified board
    #[arg(long)]
    dry_run: bool,

    /// Increase logging verbosity (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Decrease logging verbosity (only show errors)
    #[arg(short, long)]
    quiet: bool,
}

/// Determines the log level from CLI arguments.
#[allow(clippy::match_same_arms)]
fn get_log_level(verbose: u8, quiet: bool, config_level: &str) -> Level {
    if quiet {
        return Level::ERROR;
    }

    match verbose {
        0 => match config_level.to_lowercase().as_str() {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "info" => Level::INFO,
            "warn" => Level::WARN,
            "error" => Level::ERROR,
            _ => Level::WARN, // Default to warn for unknown levels
        },
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

/// Initialises the tracing subscriber for logging.
fn init_tracing(level: Level) {
    let filter = EnvFilter::from_default_env().add_directive(level.into());

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Writes `text` to `path`, or to stdout when no path is given.
fn emit(path: Option<&PathBuf>, text: &str) -> std::io::Result<()> {
    match path {
        Some(path) => std::fs::write(path, text),
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(text.as_bytes())?;
            stdout.write_all(b"\n")
        }
    }
}

/// Entry point for the bga-fanout tool.
fn main() -> ExitCode {
    let args = Args::parse();

    // Load configuration
    let cfg = match config::load_config_or_default(args.config.as_deref()) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {e}");
            return ExitCode::FAILURE;
        }
    };

    // Initialise logging
    let log_level = get_log_level(args.verbose, args.quiet, &cfg.logging.level);
    init_tracing(log_level);

    let rings = ConfigError::check_ring_count(
        "skip_outer_rings",
        args.skip_outer.unwrap_or(cfg.fanout.skip_outer_rings),
    )
    .and_then(|skip| {
        ConfigError::check_ring_count(
            "edge_layer_rings",
            args.edge_layers.unwrap_or(cfg.fanout.edge_layer_rings),
        )
        .map(|edge| (skip, edge))
    });
    let engine = match rings {
        Ok((skip, edge)) => FanoutEngine::new(skip, edge),
        Err(e) => {
            error!(error = %e, "Invalid ring count");
            return ExitCode::FAILURE;
        }
    };

    let mut board = match Board::read(&args.board) {
        Ok(board) => board,
        Err(e) => {
            error!(error = %e, "Failed to load board");
            return ExitCode::FAILURE;
        }
    };

    let references = if args.references.is_empty() {
        board.selected_references()
    } else {
        args.references
    };
    if references.is_empty() {
        error!(error = %FanoutError::EmptySelection, "Nothing to fan out");
        return ExitCode::FAILURE;
    }

    info!(
        board = %args.board.display(),
        footprints = ?references,
        skip_outer_rings = engine.skip_outer_rings,
        edge_layer_rings = engine.edge_layer_rings,
        "Starting fanout"
    );

    let outcomes = board.fanout_batch(&references, &engine, args.dry_run);
    let failures = outcomes.iter().filter(|o| o.result.is_err()).count();

    let rendered = if args.dry_run {
        let planned: IndexMap<&str, &FanoutResult> = outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().ok().map(|r| (o.reference.as_str(), r)))
            .collect();
        serde_json::to_string_pretty(&planned).map_err(|e| e.to_string())
    } else {
        board.to_json().map_err(|e| e.to_string())
    };

    let written = rendered.and_then(|text| {
        emit(args.output.as_ref(), &text).map_err(|e| e.to_string())
    });
    if let Err(e) = written {
        error!(error = %e, "Failed to write output");
        return ExitCode::FAILURE;
    }

    if failures > 0 {
        error!(failures, total = outcomes.len(), "Some footprints could not be fanned out");
        return ExitCode::FAILURE;
    }

    info!(
        tracks = board.tracks.len(),
        vias = board.vias.len(),
        "Fanout complete"
    );
    ExitCode::SUCCESS
}

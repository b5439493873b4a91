//! linemerge: merge connected GeoJSON linework from the command line.
//!
//! Reads a GeoJSON file, joins every line that meets exactly one other
//! line end to end, and writes the merged lines back out as a GeoJSON
//! feature collection. Optionally renders the result as SVG and prints
//! merge statistics.
//!
//! # Usage
//!
//! ```text
//! cargo run --release --bin linemerge -- [OPTIONS] <INPUT>
//! ```
//!
//! Set `RUST_LOG=debug` to trace the merge phases.

#![allow(clippy::print_stdout, clippy::print_stderr)]

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use linemerge::{LineMerger, MergeConfig};
use linemerge_export::SvgMetadata;

/// Merge connected linework into maximal lines.
///
/// Lines are joined through every point where exactly two of them meet,
/// and split at endpoints and branch points.
#[derive(Parser)]
#[command(name = "linemerge", version)]
struct Cli {
    /// Path to the input GeoJSON (geometry, feature, or feature collection).
    input: PathBuf,

    /// Write the merged GeoJSON here instead of stdout.
    #[arg(long, short)]
    output: Option<PathBuf>,

    /// Write an SVG rendering of the merged lines to file.
    #[arg(long)]
    svg: Option<PathBuf>,

    /// Only join lines whose directions agree, never reversing input.
    #[arg(long, default_value_t = MergeConfig::DEFAULT_DIRECTED)]
    directed: bool,

    /// Full merge config as a JSON string.
    ///
    /// When provided, `--directed` is ignored. The JSON must be a valid
    /// `MergeConfig` serialization.
    #[arg(long)]
    config_json: Option<String>,

    /// Print a human-readable merge report to stderr.
    #[arg(long)]
    stats: bool,

    /// Print merge statistics as JSON to stderr.
    #[arg(long, conflicts_with = "stats")]
    json_stats: bool,
}

/// Build a [`MergeConfig`] from CLI arguments.
///
/// `--config-json` wins over the individual flags.
fn config_from_cli(cli: &Cli) -> Result<MergeConfig, String> {
    if let Some(ref json) = cli.config_json {
        return serde_json::from_str(json).map_err(|e| format!("Error parsing --config-json: {e}"));
    }
    Ok(MergeConfig {
        directed: cli.directed,
    })
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(msg) => {
            eprintln!("{msg}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), String> {
    let config = config_from_cli(cli)?;
    log::info!("merging {} with {config:?}", cli.input.display());

    let text = std::fs::read_to_string(&cli.input)
        .map_err(|e| format!("Error reading {}: {e}", cli.input.display()))?;
    let geometries = linemerge_export::parse_geometries(&text)
        .map_err(|e| format!("Error parsing {}: {e}", cli.input.display()))?;

    let mut merger = LineMerger::with_config(config);
    merger
        .add_all(&geometries)
        .map_err(|e| format!("Error adding input: {e}"))?;
    let lines = merger
        .merged_lines()
        .map_err(|e| format!("Merge error: {e}"))?
        .to_vec();

    let json = linemerge_export::to_feature_collection(&lines);
    match cli.output {
        Some(ref path) => {
            std::fs::write(path, &json)
                .map_err(|e| format!("Error writing {}: {e}", path.display()))?;
            log::info!("wrote {} lines to {}", lines.len(), path.display());
        }
        None => println!("{json}"),
    }

    if let Some(ref svg_path) = cli.svg {
        let title = cli
            .input
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("linemerge");
        let config_json = serde_json::to_string(&config)
            .map_err(|e| format!("Error serializing config: {e}"))?;
        let metadata = SvgMetadata {
            title: Some(title),
            description: Some("Merged by linemerge"),
            config_json: Some(&config_json),
        };
        let svg = linemerge_export::to_svg(&lines, &metadata);
        std::fs::write(svg_path, &svg)
            .map_err(|e| format!("Error writing SVG to {}: {e}", svg_path.display()))?;
        eprintln!(
            "SVG written to {} ({} bytes)",
            svg_path.display(),
            svg.len(),
        );
    }

    let stats = merger.stats();
    if cli.json_stats {
        let json = serde_json::to_string_pretty(&stats)
            .map_err(|e| format!("Error serializing statistics: {e}"))?;
        eprintln!("{json}");
    } else if cli.stats {
        eprintln!("{}", stats.report());
    }

    Ok(())
}

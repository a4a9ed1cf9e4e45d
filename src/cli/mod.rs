//! Command-line interface for aerial log clustering.

use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use log::{error, info, warn};
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::config::OutputFormat;
use crate::PipelineConfig;

#[derive(Parser)]
#[command(name = "aerial-clustering")]
#[command(about = "Radius clustering for aerial log heatmaps", version)]
pub struct Cli {
    /// Path to YAML config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Increase verbosity
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Cluster the heatmap of an aerial log JSON document
    Cluster {
        /// Aerial log JSON file (defaults to input.path from config)
        input: Option<PathBuf>,
        /// Output file; summaries are printed to stdout as JSON when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Cluster radius in meters (0 disables clustering)
        #[arg(short, long)]
        max_distance: Option<f64>,
        /// Output file format
        #[arg(long, value_enum)]
        format: Option<OutputFormat>,
        /// Write compact single-line JSON
        #[arg(long)]
        compact: bool,
    },

    /// Print the haversine distance in meters between two points
    Distance {
        #[arg(allow_negative_numbers = true)]
        lat1: f64,
        #[arg(allow_negative_numbers = true)]
        lon1: f64,
        #[arg(allow_negative_numbers = true)]
        lat2: f64,
        #[arg(allow_negative_numbers = true)]
        lon2: f64,
    },

    /// Write a default YAML config file
    InitConfig {
        /// Destination path
        path: PathBuf,
    },
}

/// Create a spinner for indeterminate operations
fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap(),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

/// Print a summary box
fn print_summary(title: &str, items: &[(&str, String)]) {
    println!();
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║ {:<62} ║", title);
    println!("╠══════════════════════════════════════════════════════════════╣");
    for (key, value) in items {
        let display_value = if value.chars().count() > 39 {
            format!("{}...", value.chars().take(36).collect::<String>())
        } else {
            value.clone()
        };
        println!("║ {:<20}: {:<39} ║", key, display_value);
    }
    println!("╚══════════════════════════════════════════════════════════════╝");
    println!();
}

pub fn run() {
    let cli = Cli::parse();

    // Initialize logging based on verbosity (must come first)
    env_logger::Builder::new()
        .filter_level(match cli.verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            _ => log::LevelFilter::Debug,
        })
        .format_timestamp_secs()
        .init();

    // Load config
    let config = match &cli.config {
        Some(path) => match PipelineConfig::from_yaml(path) {
            Ok(cfg) => {
                info!("Loaded config from: {}", path.display());
                cfg
            }
            Err(e) => {
                warn!("Failed to load config from {}: {}, using defaults", path.display(), e);
                PipelineConfig::default()
            }
        },
        None => PipelineConfig::default(),
    };

    // Dispatch to subcommands
    match cli.command {
        Commands::Cluster { input, output, max_distance, format, compact } => {
            cmd_cluster(input, output, max_distance, format, compact, &config);
        }
        Commands::Distance { lat1, lon1, lat2, lon2 } => {
            cmd_distance([lat1, lon1], [lat2, lon2]);
        }
        Commands::InitConfig { path } => {
            cmd_init_config(&path, &config);
        }
    }
}

fn cmd_cluster(
    input: Option<PathBuf>,
    output: Option<PathBuf>,
    max_distance: Option<f64>,
    format: Option<OutputFormat>,
    compact: bool,
    config: &PipelineConfig,
) {
    use crate::core::writers;
    use crate::processors::clustering;

    let start = Instant::now();

    // Build effective config with overrides
    let mut effective = config.clone();
    if let Some(distance) = max_distance {
        effective.clustering.max_distance = distance;
    }
    if let Some(format) = format {
        effective.output.format = format;
    }
    if compact {
        effective.output.pretty = false;
    }
    let input_path = input.unwrap_or_else(|| effective.input.path.clone());

    let Some(output_path) = output else {
        // Stdout carries only the JSON result
        if effective.output.format == OutputFormat::Csv {
            warn!("CSV output needs --output; printing JSON");
        }
        let result = clustering::process_file_clustering(&input_path, None, &effective)
            .and_then(|summaries| Ok(writers::summaries_to_json(&summaries, effective.output.pretty)?));
        match result {
            Ok(json) => println!("{}", json),
            Err(e) => {
                error!("Clustering failed: {:#}", e);
                std::process::exit(1);
            }
        }
        return;
    };

    println!("Running radius clustering...");
    println!("Input: {}", input_path.display());
    println!("Output: {}", output_path.display());
    println!("  max_distance: {} m", effective.clustering.max_distance);
    println!("  format: {:?}", effective.output.format);

    let spinner = create_spinner("Clustering aerial log...");

    match clustering::process_file_clustering(&input_path, Some(&output_path), &effective) {
        Ok(summaries) => {
            spinner.finish_and_clear();

            let points: usize = summaries.iter().map(|s| s.point_count).sum();
            let largest = summaries.iter().map(|s| s.point_count).max().unwrap_or(0);

            print_summary(
                "Clustering Complete",
                &[
                    ("Input file", input_path.display().to_string()),
                    ("Output file", output_path.display().to_string()),
                    ("Points processed", points.to_string()),
                    ("Clusters found", summaries.len().to_string()),
                    ("Largest cluster", largest.to_string()),
                    ("max_distance", effective.clustering.max_distance.to_string()),
                    ("Duration", format!("{:.2?}", start.elapsed())),
                ],
            );
        }
        Err(e) => {
            spinner.finish_and_clear();
            error!("Clustering failed: {:#}", e);
            std::process::exit(1);
        }
    }
}

fn cmd_distance(a: [f64; 2], b: [f64; 2]) {
    use crate::processors::clustering::ClusterEngine;

    match ClusterEngine::default().distance(a, b) {
        Ok(meters) => println!("{:.3}", meters),
        Err(e) => {
            error!("Distance failed: {}", e);
            std::process::exit(1);
        }
    }
}

fn cmd_init_config(path: &Path, config: &PipelineConfig) {
    match config.to_yaml(path) {
        Ok(()) => println!("Wrote config to {}", path.display()),
        Err(e) => {
            error!("Failed to write config to {}: {}", path.display(), e);
            std::process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_cluster_overrides() {
        let cli = Cli::try_parse_from([
            "aerial-clustering",
            "-vv",
            "cluster",
            "log.json",
            "-m",
            "0",
            "--format",
            "csv",
            "-o",
            "out.csv",
        ])
        .unwrap();

        assert_eq!(cli.verbose, 2);
        match cli.command {
            Commands::Cluster { input, output, max_distance, format, compact } => {
                assert_eq!(input, Some(PathBuf::from("log.json")));
                assert_eq!(output, Some(PathBuf::from("out.csv")));
                assert_eq!(max_distance, Some(0.0));
                assert_eq!(format, Some(OutputFormat::Csv));
                assert!(!compact);
            }
            _ => panic!("Expected cluster command"),
        }
    }

    #[test]
    fn test_parse_negative_coordinates() {
        let cli = Cli::try_parse_from([
            "aerial-clustering",
            "distance",
            "-2.968123",
            "104.800199",
            "-2.96525",
            "104.79828",
        ])
        .unwrap();

        match cli.command {
            Commands::Distance { lat1, lon2, .. } => {
                assert_eq!(lat1, -2.968123);
                assert_eq!(lon2, 104.79828);
            }
            _ => panic!("Expected distance command"),
        }
    }
}

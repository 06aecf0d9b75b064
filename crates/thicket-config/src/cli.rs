//! Command-line argument parsing for the terrain tools.

use std::path::PathBuf;

use clap::Parser;

use crate::{Config, WorldType};

/// Thicket command-line arguments.
///
/// CLI values override settings loaded from `config.ron`.
#[derive(Parser, Debug, Default)]
#[command(name = "thicket", about = "Thicket terrain generator")]
pub struct CliArgs {
    /// World seed.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Terrain preset (default, amplified).
    #[arg(long)]
    pub world_type: Option<WorldType>,

    /// Place a bedrock floor.
    #[arg(long)]
    pub bedrock: Option<bool>,

    /// Compress terrain into the lower half of the column.
    #[arg(long)]
    pub squish: Option<bool>,

    /// Radius in chunks of the generated preview region.
    #[arg(long)]
    pub radius: Option<i32>,

    /// Background worker threads (0 = auto).
    #[arg(long)]
    pub threads: Option<usize>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(seed) = args.seed {
            self.world.seed = seed;
        }
        if let Some(world_type) = args.world_type {
            self.world.world_type = world_type;
        }
        if let Some(bedrock) = args.bedrock {
            self.world.generate_bedrock = bedrock;
        }
        if let Some(squish) = args.squish {
            self.world.squish = squish;
        }
        if let Some(radius) = args.radius {
            self.generation.region_radius = radius;
        }
        if let Some(threads) = args.threads {
            self.generation.worker_threads = threads;
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
    }
}

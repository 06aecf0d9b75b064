//! Command-line generator: builds a square region of chunks around the origin
//! and reports what came out.
//!
//! Configuration is loaded from `config.ron` and can be overridden via CLI flags.
//! Run with `cargo run -p thicket-gen -- --seed 42 --radius 4`.

use std::process::ExitCode;
use std::sync::Arc;
use std::time::{Duration, Instant};

use clap::Parser;
use hashbrown::HashMap;
use thicket_config::{CliArgs, Config};
use thicket_math::{ChunkPos, IVec3};
use thicket_terrain::{
    ChunkWorkerPool, CreatureCategory, FeatureIndex, FeatureMap, GeneratedChunk, GenerationTask,
    TerrainGenerator,
};
use thicket_voxel::BlockId;
use tracing::{info, warn};

/// Aggregate numbers for one generation run.
#[derive(Default)]
struct RegionStats {
    chunks: usize,
    total_time_us: u64,
    slowest_us: u64,
    blocks: HashMap<BlockId, usize>,
    highest_ground: usize,
}

impl RegionStats {
    fn record(&mut self, chunk: &GeneratedChunk) {
        self.chunks += 1;
        self.total_time_us += chunk.generation_time_us;
        self.slowest_us = self.slowest_us.max(chunk.generation_time_us);
        for &block in chunk.column.palette() {
            *self.blocks.entry(block).or_default() += chunk.column.count(block);
        }
        for x in 0..16 {
            for z in 0..16 {
                if let Some(y) = chunk.column.top_matching(x, z, |id| !id.is_air()) {
                    self.highest_ground = self.highest_ground.max(y);
                }
            }
        }
    }

    fn average_us(&self) -> u64 {
        self.total_time_us / self.chunks.max(1) as u64
    }
}

fn generate_region(pool: &ChunkWorkerPool, center: ChunkPos, radius: i32) -> RegionStats {
    let mut pending: Vec<GenerationTask> = center
        .square_around(radius)
        .map(|pos| {
            let d = pos.chebyshev_distance(center) as u64;
            GenerationTask {
                pos,
                priority: d * d,
            }
        })
        .collect();
    let expected = pending.len();
    let mut stats = RegionStats::default();

    while stats.chunks < expected {
        if !pending.is_empty() {
            pending = pool.submit_all(pending);
        }
        match pool.recv_timeout(Duration::from_millis(100)) {
            Some(chunk) => stats.record(&chunk),
            None if pool.in_flight_count() == 0 && pending.is_empty() => {
                warn!(received = stats.chunks, expected, "Workers went idle early");
                break;
            }
            None => {}
        }
        for chunk in pool.drain_results() {
            stats.record(&chunk);
        }
    }
    stats
}

fn main() -> ExitCode {
    let args = CliArgs::parse();

    let Some(config_dir) = args.config.clone().or_else(thicket_config::default_config_dir) else {
        eprintln!("Failed to resolve config directory; pass --config");
        return ExitCode::FAILURE;
    };

    let mut config = Config::load_or_create(&config_dir).unwrap_or_else(|e| {
        eprintln!("Failed to load config: {e}, using defaults");
        Config::default()
    });
    config.apply_cli_overrides(&args);

    let log_dir = config_dir.join("logs");
    thicket_log::init_logging(Some(&log_dir), cfg!(debug_assertions), Some(&config));

    let radius = config.generation.region_radius;
    let features = Arc::new(FeatureMap::scatter(
        config.world.seed,
        config.world.sea_level,
        radius / 16 + 1,
    ));
    for feature in features.iter().filter(|f| !f.is_nothing()) {
        info!(
            kind = %feature.kind,
            x = feature.center.x,
            z = feature.center.z,
            size = feature.size,
            "Placed feature"
        );
    }

    let generator = match TerrainGenerator::standard(config.world.clone(), features.clone()) {
        Ok(generator) => Arc::new(generator),
        Err(e) => {
            tracing::error!("Failed to build terrain generator: {e}");
            return ExitCode::FAILURE;
        }
    };
    let pool = match ChunkWorkerPool::from_config(Arc::clone(&generator), &config.generation) {
        Ok(pool) => pool,
        Err(e) => {
            tracing::error!("Failed to start worker pool: {e}");
            return ExitCode::FAILURE;
        }
    };

    let start = Instant::now();
    let stats = generate_region(&pool, ChunkPos::new(0, 0), radius);
    let elapsed = start.elapsed();

    info!(
        chunks = stats.chunks,
        wall_ms = elapsed.as_millis() as u64,
        avg_us = stats.average_us(),
        slowest_us = stats.slowest_us,
        highest_ground = stats.highest_ground,
        "Region generated"
    );

    let mut counts: Vec<_> = stats.blocks.iter().collect();
    counts.sort_by(|a, b| b.1.cmp(a.1));
    for (&block, &count) in counts {
        let name = generator
            .block_registry()
            .get(block)
            .map_or("unknown", |def| def.name.as_str());
        info!(block = name, count, "Block total");
    }

    let origin = IVec3::new(8, config.world.sea_level - 8, 8);
    let nearby = features.feature_at(origin.x, origin.z);
    info!(
        feature = %nearby.kind,
        monsters = generator
            .possible_creatures(CreatureCategory::Monster, origin)
            .len(),
        creatures = generator
            .possible_creatures(CreatureCategory::Creature, origin)
            .len(),
        "Spawn lists at origin"
    );

    ExitCode::SUCCESS
}

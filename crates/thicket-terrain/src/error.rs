//! Terrain generator error types.

use thicket_config::ConfigError;
use thicket_voxel::RegistryError;

use crate::biome::BiomeRegistryError;

/// Errors raised while building a generator or its worker pool.
///
/// Chunk generation itself is total and never fails once a generator exists.
#[derive(Debug, thiserror::Error)]
pub enum TerrainError {
    /// A block the pipeline places is missing from the block registry.
    #[error("block registry is missing a terrain block: {0}")]
    MissingBlock(#[from] RegistryError),

    /// The built-in biome table could not be registered.
    #[error("failed to build biome table: {0}")]
    Biome(#[from] BiomeRegistryError),

    /// World settings were rejected.
    #[error("invalid world settings: {0}")]
    Settings(#[from] ConfigError),

    /// The generator needs at least one biome to fall back on.
    #[error("biome registry is empty")]
    EmptyBiomeRegistry,

    /// A worker thread could not be started.
    #[error("failed to spawn generation worker: {0}")]
    Spawn(#[source] std::io::Error),
}

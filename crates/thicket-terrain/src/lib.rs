//! Forest terrain generation: octave noise, biome-blended density, feature
//! carving, surface rules, and a worker pool to run it all in the background.

mod async_generation;
mod error;
mod generator;
mod height_field;
mod noise_field;
mod rasterizer;
mod seed;
mod spawn;
mod surface;

pub mod biome;
pub mod feature;

pub use async_generation::{ChunkWorkerPool, GeneratedChunk, GenerationTask};
pub use biome::{
    BiomeDef, BiomeId, BiomeRegistry, BiomeRegistryError, BiomeSource, FixedBiomeSource,
    WhittakerBiomeSource, WhittakerDiagram, WhittakerRegion, default_biomes, default_diagram,
};
pub use error::TerrainError;
pub use feature::{Feature, FeatureIndex, FeatureKind, FeatureMap};
pub use generator::TerrainGenerator;
pub use height_field::{
    BIOME_GRID, BiomeHeight, BiomeHeightGrid, BiomeWeightKernel, DensityField,
    HeightMapInterpolator,
};
pub use noise_field::{CoarseLattice, NoiseFieldGenerator};
pub use rasterizer::{VoxelField, rasterize};
pub use seed::{chunk_rng, chunk_seed, hash_column};
pub use spawn::{CreatureCategory, SpawnEntry, SpawnTable};
pub use surface::{
    ClassicSurface, ColumnMaterializer, SurfaceContext, TerrainBlocks, materialize,
    replace_biome_blocks,
};

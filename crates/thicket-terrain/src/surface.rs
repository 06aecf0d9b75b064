//! Turning the solid/air field into blocks, and the per-biome surface pass.

use rand::Rng;
use rand_chacha::ChaCha8Rng;
use thicket_voxel::{BlockId, BlockRegistry, ChunkColumn, RegistryError};

use crate::biome::BiomeDef;
use crate::rasterizer::VoxelField;

/// Temperature below which exposed water freezes.
const FREEZE_TEMPERATURE: f32 = 0.15;

/// Block ids the generator places itself, resolved once by name.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TerrainBlocks {
    pub stone: BlockId,
    pub water: BlockId,
    pub bedrock: BlockId,
    pub sand: BlockId,
    pub sandstone: BlockId,
    pub gravel: BlockId,
    pub ice: BlockId,
    pub packed_ice: BlockId,
    pub wispy_cloud: BlockId,
    pub fluffy_cloud: BlockId,
}

impl TerrainBlocks {
    /// # Errors
    ///
    /// Returns [`RegistryError::UnknownName`] for the first missing block.
    pub fn resolve(registry: &BlockRegistry) -> Result<Self, RegistryError> {
        Ok(Self {
            stone: registry.require("stone")?,
            water: registry.require("water")?,
            bedrock: registry.require("bedrock")?,
            sand: registry.require("sand")?,
            sandstone: registry.require("sandstone")?,
            gravel: registry.require("gravel")?,
            ice: registry.require("ice")?,
            packed_ice: registry.require("packed_ice")?,
            wispy_cloud: registry.require("wispy_cloud")?,
            fluffy_cloud: registry.require("fluffy_cloud")?,
        })
    }
}

/// Solid becomes stone, air below sea level becomes water, the rest stays air.
pub fn materialize(
    field: &VoxelField,
    column: &mut ChunkColumn,
    blocks: &TerrainBlocks,
    sea_level: i32,
) {
    let height = field.height().min(column.height());
    for x in 0..16 {
        for z in 0..16 {
            for y in 0..height {
                if field.is_solid(x, y, z) {
                    column.set(x, y, z, blocks.stone);
                } else if (y as i32) < sea_level {
                    column.set(x, y, z, blocks.water);
                }
            }
        }
    }
}

/// World settings the surface pass needs.
#[derive(Clone, Copy, Debug)]
pub struct SurfaceContext {
    pub blocks: TerrainBlocks,
    pub sea_level: i32,
    pub generate_bedrock: bool,
}

/// Per-column surface rules for a biome.
pub trait ColumnMaterializer: Send + Sync {
    /// Rewrite one column. `noise` is the surface-noise sample at the column.
    #[allow(clippy::too_many_arguments)]
    fn replace_column(
        &self,
        column: &mut ChunkColumn,
        x: usize,
        z: usize,
        biome: &BiomeDef,
        rng: &mut ChaCha8Rng,
        noise: f64,
        ctx: &SurfaceContext,
    );
}

/// Top/filler walk from the top of the column down.
///
/// The first stone under air becomes the top block (or ice/water below sea
/// level), the next `depth` blocks become filler, and deep exposed stone gets
/// a gravel cap. Sand filler is continued by sandstone.
#[derive(Clone, Copy, Debug, Default)]
pub struct ClassicSurface;

impl ColumnMaterializer for ClassicSurface {
    fn replace_column(
        &self,
        column: &mut ChunkColumn,
        x: usize,
        z: usize,
        biome: &BiomeDef,
        rng: &mut ChaCha8Rng,
        noise: f64,
        ctx: &SurfaceContext,
    ) {
        let blocks = &ctx.blocks;
        let sea = ctx.sea_level;
        let depth = (noise / 3.0 + 3.0 + rng.random::<f64>() * 0.25) as i32;

        let mut top = biome.top_block;
        let mut filler = biome.filler_block;
        let mut remaining = -1i32;

        for y in (0..column.height()).rev() {
            let yi = y as i32;
            if ctx.generate_bedrock && yi <= 4 && yi <= rng.random_range(0..5) {
                column.set(x, y, z, blocks.bedrock);
                continue;
            }

            let current = column.get(x, y, z);
            if current.is_air() {
                remaining = -1;
            } else if current == blocks.stone {
                if remaining == -1 {
                    if depth <= 0 {
                        top = BlockId::AIR;
                        filler = blocks.stone;
                    } else if yi >= sea - 4 && yi <= sea + 1 {
                        top = biome.top_block;
                        filler = biome.filler_block;
                    }

                    if yi < sea && top.is_air() {
                        top = if biome.temperature_at(yi) < FREEZE_TEMPERATURE {
                            blocks.ice
                        } else {
                            blocks.water
                        };
                    }

                    remaining = depth;
                    if yi >= sea - 1 {
                        column.set(x, y, z, top);
                    } else if yi < sea - 7 - depth {
                        top = BlockId::AIR;
                        filler = blocks.stone;
                        column.set(x, y, z, blocks.gravel);
                    } else {
                        column.set(x, y, z, filler);
                    }
                } else if remaining > 0 {
                    remaining -= 1;
                    column.set(x, y, z, filler);

                    if remaining == 0 && filler == blocks.sand && depth > 1 {
                        remaining = rng.random_range(0..4) + (yi - sea).max(0);
                        filler = blocks.sandstone;
                    }
                }
            }
        }
    }
}

/// Run `materializer` over every column. `surface_noise` is laid out
/// `x * 16 + z`; `biome_at` resolves the biome of a local column.
pub fn replace_biome_blocks<'a>(
    column: &mut ChunkColumn,
    surface_noise: &[f64],
    biome_at: impl Fn(usize, usize) -> &'a BiomeDef,
    materializer: &dyn ColumnMaterializer,
    rng: &mut ChaCha8Rng,
    ctx: &SurfaceContext,
) {
    for x in 0..16 {
        for z in 0..16 {
            let biome = biome_at(x, z);
            materializer.replace_column(column, x, z, biome, rng, surface_noise[x * 16 + z], ctx);
        }
    }
}

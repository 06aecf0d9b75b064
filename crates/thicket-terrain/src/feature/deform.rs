//! Reshaping materialized terrain around the nearest feature.
//!
//! All carving works on the block column after stone/water/air have been
//! placed and before the biome surface pass, so every rule only has to tell
//! stone, water and air apart.

use std::f64::consts::PI;

use rand_chacha::ChaCha8Rng;
use thicket_voxel::{BlockId, ChunkColumn};

use super::cloud::cloud_layer;
use super::{Feature, FeatureKind};
use crate::seed::{det_cos, det_sqrt};
use crate::surface::TerrainBlocks;

/// Highest y the flatten and lair passes look at.
const SCAN_TOP: i32 = 127;

/// Which carving rule a feature kind uses.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeformShape {
    /// Raised, hollowed hill. `lair` cuts the hydra's opening.
    Hill { lair: bool },
    /// Level arena at sea level + 1.
    Flatten,
    /// Square cave under a raised plateau.
    SquareLair,
    /// Cloud layer high above the cave.
    CaveCloud,
}

impl DeformShape {
    pub fn for_kind(kind: FeatureKind) -> Option<DeformShape> {
        match kind {
            FeatureKind::SmallHill | FeatureKind::MediumHill | FeatureKind::LargeHill => {
                Some(DeformShape::Hill { lair: false })
            }
            FeatureKind::HydraLair => Some(DeformShape::Hill { lair: true }),
            FeatureKind::HedgeMaze | FeatureKind::NagaCourtyard | FeatureKind::QuestGrove => {
                Some(DeformShape::Flatten)
            }
            FeatureKind::YetiCave => Some(DeformShape::SquareLair),
            FeatureKind::TrollCave => Some(DeformShape::CaveCloud),
            _ => None,
        }
    }
}

/// Blocks and sea level a deformer needs.
#[derive(Clone, Copy, Debug)]
pub struct DeformContext<'a> {
    pub blocks: &'a TerrainBlocks,
    pub sea_level: i32,
}

impl DeformContext<'_> {
    fn is_stone(&self, id: BlockId) -> bool {
        id == self.blocks.stone
    }

    fn is_air_or_water(&self, id: BlockId) -> bool {
        id.is_air() || id == self.blocks.water
    }
}

/// Apply the deformation for `feature` to the whole column.
///
/// Nothing happens for [`FeatureKind::Nothing`], features that do not alter
/// terrain, or features whose footprint does not cover the column's chunk.
/// `rng` is the per-chunk generator; only the cloud pass draws from it.
pub fn deform_for_feature(
    column: &mut ChunkColumn,
    feature: &Feature,
    rng: &mut ChaCha8Rng,
    ctx: &DeformContext<'_>,
) {
    if !feature.terrain_altered || !feature.covers_chunk(column.pos()) {
        return;
    }

    let Some(shape) = DeformShape::for_kind(feature.kind) else {
        tracing::warn!(
            feature = %feature.kind,
            "Terrain-altering feature has no deformation rule, leaving terrain as is"
        );
        return;
    };

    let (hx, hz) = feature.local_center(column.pos());

    if shape == DeformShape::CaveCloud {
        cloud_layer(column, hx, hz, rng, ctx.blocks);
        return;
    }

    for x in 0..16 {
        for z in 0..16 {
            let dx = x as i32 - hx;
            let dz = z as i32 - hz;
            match shape {
                DeformShape::Hill { lair } => {
                    let profile = HillProfile::new(feature.size, lair, dx, dz, ctx.sea_level);
                    raise_hill(column, x, z, &profile, ctx);
                }
                DeformShape::Flatten => {
                    flatten_column(column, x, z, dx, dz, feature.size, ctx);
                }
                DeformShape::SquareLair => {
                    square_lair_column(column, x, z, dx, dz, feature.size, ctx);
                }
                DeformShape::CaveCloud => {}
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Hills
// ---------------------------------------------------------------------------

/// Vertical layout of a hill at one column.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HillProfile {
    /// Blocks added on top of the existing ground. Negative outside the hill.
    pub hill_height: i32,
    /// Height of the hollow, never negative.
    pub hollow: i32,
    /// The hollow starts one block above this.
    pub floor: i32,
}

impl HillProfile {
    pub fn new(size: i32, lair: bool, dx: i32, dz: i32, sea_level: i32) -> Self {
        let diameter = (size * 2 + 1) * 16;
        let dist = det_sqrt(f64::from(dx * dx + dz * dz)) as i32;
        let hill_height = (det_cos(f64::from(dist as f32 / diameter as f32) * PI)
            * f64::from(diameter as f32 / 3.0)) as i32;

        let mut hollow = hill_height - 4 - size;
        if lair {
            // The lair's mouth is a second, offset hill carved out of the first.
            let mx = dx + 16;
            let mz = dz + 16;
            let mdist = det_sqrt(f64::from(mx * mx + mz * mz)) as i32;
            let reach = f64::from(diameter) / 1.5;
            let mouth = (det_cos(f64::from(mdist) / reach * PI) * reach) as i32;
            hollow = hollow.max(mouth - 4);
        }
        let hollow = hollow.max(0);

        let floor = if lair {
            sea_level
        } else {
            sea_level - 3 - hollow / 8
        };

        Self {
            hill_height,
            hollow,
            floor,
        }
    }
}

fn raise_hill(
    column: &mut ChunkColumn,
    x: usize,
    z: usize,
    profile: &HillProfile,
    ctx: &DeformContext<'_>,
) {
    let height = column.height() as i32;
    let stone = ctx.blocks.stone;

    let mut new_ground = None;
    for y in ctx.sea_level.max(0)..height {
        if new_ground.is_none() && !ctx.is_stone(column.get(x, y as usize, z)) {
            new_ground = Some(y + profile.hill_height);
        }
        if new_ground.is_some_and(|top| y <= top) {
            column.set(x, y as usize, z, stone);
        }
    }

    if profile.hill_height > 0 {
        // Solid base under hills that cross water.
        for y in 0..ctx.sea_level.clamp(0, height) {
            if !ctx.is_stone(column.get(x, y as usize, z)) {
                column.set(x, y as usize, z, stone);
            }
        }
    }

    for y in profile.floor + 1..profile.floor + profile.hollow {
        column.try_set(x as i32, y, z as i32, BlockId::AIR);
    }
}

// ---------------------------------------------------------------------------
// Arenas and lairs
// ---------------------------------------------------------------------------

/// How far past the feature boundary a column sits, in units of 8 blocks.
///
/// X overshoot is assigned, Z overshoot only raises it.
fn squish_factor(dx: i32, dz: i32, boundary: i32) -> f32 {
    let mut factor = 0.0f32;
    if dx <= -boundary {
        factor = (-dx - boundary) as f32 / 8.0;
    }
    if dx >= boundary {
        factor = (dx - boundary) as f32 / 8.0;
    }
    if dz <= -boundary {
        factor = factor.max((-dz - boundary) as f32 / 8.0);
    }
    if dz >= boundary {
        factor = factor.max((dz - boundary) as f32 / 8.0);
    }
    factor
}

fn scan_top(column: &ChunkColumn) -> i32 {
    SCAN_TOP.min(column.height() as i32 - 1)
}

/// Lowest non-stone y in `0..=top`.
fn first_open_y(
    column: &ChunkColumn,
    x: usize,
    z: usize,
    top: i32,
    ctx: &DeformContext<'_>,
) -> Option<i32> {
    (0..=top).find(|&y| !ctx.is_stone(column.get(x, y as usize, z)))
}

/// `value` moved toward `target` by `factor`, truncated like an integer
/// compound assignment.
fn blend_toward(value: i32, target: i32, factor: f32) -> i32 {
    (value as f32 + (target - value) as f32 * factor) as i32
}

/// Ground level for a flattened column: `sea + 1` inside the boundary,
/// blending back to the natural ground outside it.
pub fn flatten_height(
    column: &ChunkColumn,
    x: usize,
    z: usize,
    dx: i32,
    dz: i32,
    size: i32,
    ctx: &DeformContext<'_>,
) -> i32 {
    let base = ctx.sea_level + 1;
    let boundary = (size * 2 + 1) * 8 - 8;
    let factor = squish_factor(dx, dz, boundary);
    if factor > 0.0 {
        if let Some(ground) = first_open_y(column, x, z, scan_top(column), ctx) {
            return blend_toward(base, ground, factor);
        }
    }
    base
}

fn flatten_column(
    column: &mut ChunkColumn,
    x: usize,
    z: usize,
    dx: i32,
    dz: i32,
    size: i32,
    ctx: &DeformContext<'_>,
) {
    let ground = flatten_height(column, x, z, dx, dz, size, ctx);
    let top = scan_top(column);
    for y in 0..=top {
        let yu = y as usize;
        let block = column.get(x, yu, z);
        if y < ground && ctx.is_air_or_water(block) {
            column.set(x, yu, z, ctx.blocks.stone);
        }
        // Water above the arena floor is left in place.
        if y >= ground && block != ctx.blocks.water {
            column.set(x, yu, z, BlockId::AIR);
        }
    }
}

/// Vertical layout of the square lair at one column.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LairProfile {
    /// Stone is filled up to (excluding) this height.
    pub top: i32,
    pub floor: i32,
    /// Air between `floor` and `ceiling`, exclusive.
    pub ceiling: i32,
}

pub fn lair_profile(
    column: &ChunkColumn,
    x: usize,
    z: usize,
    dx: i32,
    dz: i32,
    size: i32,
    ctx: &DeformContext<'_>,
) -> LairProfile {
    let sea = ctx.sea_level;
    let outer = (size * 2 + 1) * 8 - 8;
    let cave = size * 2 * 8 - 8;
    let factor = squish_factor(dx, dz, outer);

    let offset = dx.abs().min(dz.abs());
    let mut ceiling = sea + 40 - offset * 4;
    if (-cave..=cave).contains(&dx) && (-cave..=cave).contains(&dz) {
        ceiling = sea + 16;
    }
    ceiling -= offset / 6;
    ceiling = ceiling.min(sea + 16);

    let mut top = sea + 24;
    let mut floor = sea - 1 + offset / 6;
    if factor > 0.0 {
        if let Some(ground) = first_open_y(column, x, z, scan_top(column), ctx) {
            top = blend_toward(top, ground, factor);
            floor = blend_toward(floor, ground, factor);
        }
    }

    LairProfile { top, floor, ceiling }
}

fn square_lair_column(
    column: &mut ChunkColumn,
    x: usize,
    z: usize,
    dx: i32,
    dz: i32,
    size: i32,
    ctx: &DeformContext<'_>,
) {
    let profile = lair_profile(column, x, z, dx, dz, size, ctx);
    for y in 0..=scan_top(column) {
        let yu = y as usize;
        let block = column.get(x, yu, z);
        if y < profile.top && ctx.is_air_or_water(block) {
            column.set(x, yu, z, ctx.blocks.stone);
        }
        if y > profile.floor && y < profile.ceiling {
            column.set(x, yu, z, BlockId::AIR);
        }
        if y == profile.floor && y < profile.ceiling && y < ctx.sea_level + 3 {
            column.set(x, yu, z, ctx.blocks.packed_ice);
        }
    }
}

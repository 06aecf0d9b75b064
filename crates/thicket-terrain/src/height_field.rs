//! Biome-weighted height blending and the coarse density field.
//!
//! Each of the 5×5 coarse columns of a chunk blends the base height and height
//! variation of the surrounding 5×5 coarse biomes, mixes in the depth noise,
//! and turns the result into 33 density samples along Y.

use thicket_config::WorldType;

use crate::noise_field::{COARSE_LEN, COARSE_XZ, COARSE_Y, CoarseLattice};

/// Side of the coarse biome grid a chunk needs (5 columns plus a 2-wide margin).
pub const BIOME_GRID: usize = 10;

/// Vertical samples above this index are blended toward [`CEILING_DENSITY`].
const TAPER_START: usize = 29;
const CEILING_DENSITY: f64 = -10.0;

/// Fixed 5×5 blend weights `10 / sqrt(dx² + dz² + 0.2)`.
#[derive(Clone, Debug, PartialEq)]
pub struct BiomeWeightKernel {
    weights: [f32; 25],
}

impl BiomeWeightKernel {
    pub fn new() -> Self {
        let mut weights = [0.0f32; 25];
        for dx in -2i32..=2 {
            for dz in -2i32..=2 {
                let f = 10.0 / ((dx * dx + dz * dz) as f32 + 0.2).sqrt();
                weights[(dx + 2) as usize + (dz + 2) as usize * 5] = f;
            }
        }
        Self { weights }
    }

    /// Weight for an offset in `-2..=2` on both axes.
    #[inline]
    pub fn weight(&self, dx: i32, dz: i32) -> f32 {
        self.weights[(dx + 2) as usize + (dz + 2) as usize * 5]
    }
}

impl Default for BiomeWeightKernel {
    fn default() -> Self {
        Self::new()
    }
}

/// Height parameters of one coarse biome sample.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BiomeHeight {
    pub base_height: f32,
    pub height_variation: f32,
}

/// 10×10 coarse biome heights starting at coarse `(chunk * 4 - 2)`,
/// indexed `x + z * 10`.
pub type BiomeHeightGrid = [BiomeHeight; BIOME_GRID * BIOME_GRID];

/// Normalized blend result for one coarse column.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BlendedHeight {
    /// `(4 * weighted_height - 1) / 8`.
    pub height: f32,
    /// `0.9 * weighted_variation + 0.1`.
    pub variation: f32,
    /// Sum of all neighbour weights. Strictly positive.
    pub total_factor: f32,
}

/// One coarse column: its blend and 33 density samples.
#[derive(Clone, Debug, PartialEq)]
pub struct HeightColumn {
    pub total_height: f32,
    pub total_variation: f32,
    pub total_factor: f32,
    pub density: [f64; COARSE_Y],
}

/// 5×33×5 coarse densities for one chunk.
#[derive(Clone, Debug, PartialEq)]
pub struct DensityField {
    /// Indexed `x * 5 + z`.
    columns: Vec<HeightColumn>,
}

impl DensityField {
    #[inline]
    pub fn get(&self, x: usize, y: usize, z: usize) -> f64 {
        self.columns[x * COARSE_XZ + z].density[y]
    }

    pub fn column(&self, x: usize, z: usize) -> &HeightColumn {
        &self.columns[x * COARSE_XZ + z]
    }

    /// All densities in `(x * 5 + z) * 33 + y` order.
    pub fn to_flat(&self) -> Vec<f64> {
        let mut flat = Vec::with_capacity(COARSE_LEN);
        for column in &self.columns {
            flat.extend_from_slice(&column.density);
        }
        flat
    }
}

/// `lower` below 0, `upper` above 1, linear in between.
#[inline]
pub fn clamped_lerp(lower: f64, upper: f64, slide: f64) -> f64 {
    if slide < 0.0 {
        lower
    } else if slide > 1.0 {
        upper
    } else {
        lower + (upper - lower) * slide
    }
}

/// Fold a raw depth-noise sample into the small height offset it contributes.
///
/// The result lies in `[-1/2.8, 1/8]`.
pub fn depth_offset(depth_noise: f64) -> f64 {
    let mut v = depth_noise / 8000.0;
    if v < 0.0 {
        v = -v * 0.3;
    }
    v = v * 3.0 - 2.0;

    if v < 0.0 {
        v /= 2.0;
        if v < -1.0 {
            v = -1.0;
        }
        v /= 1.4;
        v /= 2.0;
    } else {
        if v > 1.0 {
            v = 1.0;
        }
        v /= 8.0;
    }
    v
}

/// Turns lattices plus biome heights into a [`DensityField`].
#[derive(Clone, Debug)]
pub struct HeightMapInterpolator {
    kernel: BiomeWeightKernel,
    amplified: bool,
}

impl HeightMapInterpolator {
    pub fn new(world_type: WorldType) -> Self {
        Self {
            kernel: BiomeWeightKernel::new(),
            amplified: world_type == WorldType::Amplified,
        }
    }

    pub fn kernel(&self) -> &BiomeWeightKernel {
        &self.kernel
    }

    /// Blend the 5×5 neighbourhood around coarse column `(ax, az)`.
    ///
    /// A neighbour whose raw base height is above the center's counts half,
    /// which favours lower terrain at biome borders.
    pub fn blend(&self, grid: &BiomeHeightGrid, ax: usize, az: usize) -> BlendedHeight {
        let center = grid[ax + 2 + (az + 2) * BIOME_GRID];

        let mut total_variation = 0.0f32;
        let mut total_height = 0.0f32;
        let mut total_factor = 0.0f32;

        for ox in -2i32..=2 {
            for oz in -2i32..=2 {
                let idx = (ax as i32 + ox + 2) as usize
                    + (az as i32 + oz + 2) as usize * BIOME_GRID;
                let neighbour = grid[idx];
                let mut root_height = neighbour.base_height;
                let mut variation = neighbour.height_variation;

                if self.amplified && root_height > 0.0 {
                    root_height = 1.0 + root_height * 2.0;
                    variation = 1.0 + variation * 4.0;
                }

                let mut factor = self.kernel.weight(ox, oz) / (root_height + 2.0);
                if neighbour.base_height > center.base_height {
                    factor /= 2.0;
                }

                total_variation += variation * factor;
                total_height += root_height * factor;
                total_factor += factor;
            }
        }

        total_variation /= total_factor;
        total_height /= total_factor;

        BlendedHeight {
            height: (total_height * 4.0 - 1.0) / 8.0,
            variation: total_variation * 0.9 + 0.1,
            total_factor,
        }
    }

    /// Density samples for one coarse column.
    ///
    /// `lattice_base` is the column's offset into the 825-entry lattices.
    pub fn column_density(
        &self,
        blend: BlendedHeight,
        depth_noise: f64,
        lattice: &CoarseLattice,
        lattice_base: usize,
    ) -> HeightColumn {
        let variation = f64::from(blend.variation);
        let mut height = f64::from(blend.height);
        height += depth_offset(depth_noise) * 0.2;
        height = height * 8.5 / 8.0;
        let surface_level = 8.5 + height * 4.0;

        let mut density = [0.0f64; COARSE_Y];
        for (ay, slot) in density.iter_mut().enumerate() {
            let mut falloff = (ay as f64 - surface_level) * 12.0 * 128.0 / 256.0 / variation;
            if falloff < 0.0 {
                falloff *= 4.0;
            }

            let i = lattice_base + ay;
            let lower = lattice.min_limit[i] / 512.0;
            let upper = lattice.max_limit[i] / 512.0;
            let slide = (lattice.main[i] / 10.0 + 1.0) / 2.0;
            let mut value = clamped_lerp(lower, upper, slide) - falloff;

            if ay > TAPER_START {
                let t = f64::from((ay - TAPER_START) as f32 / 3.0);
                value = value * (1.0 - t) + CEILING_DENSITY * t;
            }
            *slot = value;
        }

        HeightColumn {
            total_height: blend.height,
            total_variation: blend.variation,
            total_factor: blend.total_factor,
            density,
        }
    }

    /// Full 5×33×5 density field for a chunk.
    pub fn interpolate(&self, lattice: &CoarseLattice, grid: &BiomeHeightGrid) -> DensityField {
        let mut columns = Vec::with_capacity(COARSE_XZ * COARSE_XZ);
        for ax in 0..COARSE_XZ {
            for az in 0..COARSE_XZ {
                let column_index = ax * COARSE_XZ + az;
                let blend = self.blend(grid, ax, az);
                columns.push(self.column_density(
                    blend,
                    lattice.depth[column_index],
                    lattice,
                    column_index * COARSE_Y,
                ));
            }
        }
        DensityField { columns }
    }
}

//! Upsampling the coarse density field to a per-block solid/air field.

use crate::height_field::DensityField;
use crate::noise_field::{COARSE_XZ, COARSE_Y};

/// Blocks spanned by one coarse cell horizontally.
const CELL_XZ: usize = 4;
/// Blocks spanned by one coarse cell vertically.
const CELL_Y: usize = 8;

/// Dense solid/air bitfield for one chunk, layout `(x * 16 + z) * height + y`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VoxelField {
    height: usize,
    bits: Vec<u64>,
}

impl VoxelField {
    /// All-air field.
    pub fn new(height: usize) -> Self {
        let len = 16 * 16 * height;
        Self {
            height,
            bits: vec![0; len.div_ceil(64)],
        }
    }

    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    fn index(&self, x: usize, y: usize, z: usize) -> usize {
        debug_assert!(x < 16 && z < 16 && y < self.height);
        (x * 16 + z) * self.height + y
    }

    #[inline]
    pub fn is_solid(&self, x: usize, y: usize, z: usize) -> bool {
        let i = self.index(x, y, z);
        self.bits[i / 64] & (1 << (i % 64)) != 0
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, z: usize, solid: bool) {
        let i = self.index(x, y, z);
        if solid {
            self.bits[i / 64] |= 1 << (i % 64);
        } else {
            self.bits[i / 64] &= !(1 << (i % 64));
        }
    }

    pub fn solid_count(&self) -> usize {
        self.bits.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// Highest solid `y` in a column.
    pub fn top_solid(&self, x: usize, z: usize) -> Option<usize> {
        (0..self.height).rev().find(|&y| self.is_solid(x, y, z))
    }

    /// Compress terrain to the lower half: `y < height / 2` takes the value at
    /// `2y + 1`, everything above is cleared.
    ///
    /// Not idempotent. Running it twice squashes the terrain again.
    pub fn squish(&mut self) {
        let half = self.height / 2;
        for x in 0..16 {
            for z in 0..16 {
                for y in 0..half {
                    let solid = self.is_solid(x, y * 2 + 1, z);
                    self.set(x, y, z, solid);
                }
                for y in half..self.height {
                    self.set(x, y, z, false);
                }
            }
        }
    }
}

/// Trilinearly interpolate `field` at every block and hand each value to `visit`.
///
/// Interpolation runs Y first (8 steps per cell), then X (4 steps), then Z
/// (4 steps). Each step starts from the running value before adding the
/// increment, so blocks sitting on a lattice point receive the coarse value
/// exactly and adjacent chunks agree along their shared edge.
pub fn rasterize_with(field: &DensityField, mut visit: impl FnMut(usize, usize, usize, f64)) {
    const STEP_Y: f64 = 1.0 / CELL_Y as f64;
    const STEP_XZ: f64 = 1.0 / CELL_XZ as f64;

    for cx in 0..COARSE_XZ - 1 {
        for cz in 0..COARSE_XZ - 1 {
            for cy in 0..COARSE_Y - 1 {
                let mut d00 = field.get(cx, cy, cz);
                let mut d01 = field.get(cx, cy, cz + 1);
                let mut d10 = field.get(cx + 1, cy, cz);
                let mut d11 = field.get(cx + 1, cy, cz + 1);
                let dy00 = (field.get(cx, cy + 1, cz) - d00) * STEP_Y;
                let dy01 = (field.get(cx, cy + 1, cz + 1) - d01) * STEP_Y;
                let dy10 = (field.get(cx + 1, cy + 1, cz) - d10) * STEP_Y;
                let dy11 = (field.get(cx + 1, cy + 1, cz + 1) - d11) * STEP_Y;

                for sy in 0..CELL_Y {
                    let mut near = d00;
                    let mut far = d01;
                    let dx_near = (d10 - d00) * STEP_XZ;
                    let dx_far = (d11 - d01) * STEP_XZ;

                    for sx in 0..CELL_XZ {
                        let dz = (far - near) * STEP_XZ;
                        let mut value = near;
                        for sz in 0..CELL_XZ {
                            visit(cx * CELL_XZ + sx, cy * CELL_Y + sy, cz * CELL_XZ + sz, value);
                            value += dz;
                        }
                        near += dx_near;
                        far += dx_far;
                    }

                    d00 += dy00;
                    d01 += dy01;
                    d10 += dy10;
                    d11 += dy11;
                }
            }
        }
    }
}

/// Solid wherever the interpolated density is positive.
pub fn rasterize(field: &DensityField, height: usize) -> VoxelField {
    let mut voxels = VoxelField::new(height);
    rasterize_with(field, |x, y, z, density| {
        if density > 0.0 && y < height {
            voxels.set(x, y, z, true);
        }
    });
    voxels
}

//! The five noise lattices behind every chunk.
//!
//! `minLimit`, `maxLimit` and `main` are 3D octave Perlin fields sampled on the
//! 5×33×5 coarse grid, `depth` is a 2D octave field on the 5×5 grid, and
//! `surface` is a 4-level simplex field at block resolution. All five are
//! seeded from one `ChaCha8Rng` in a fixed order, so building a
//! [`NoiseFieldGenerator`] is the only step that consumes shared random state.

use glam::{DVec2, DVec3, IVec3, UVec3};
use noise::{NoiseFn, Perlin, Simplex};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use thicket_math::ChunkPos;

/// Horizontal coarse samples per chunk (one per 4 blocks, plus the far edge).
pub const COARSE_XZ: usize = 5;
/// Vertical coarse samples per column (one per 8 blocks, plus the top).
pub const COARSE_Y: usize = 33;
/// Values in one 3D coarse lattice.
pub const COARSE_LEN: usize = COARSE_XZ * COARSE_Y * COARSE_XZ;
/// Values in the 2D depth lattice.
pub const DEPTH_LEN: usize = COARSE_XZ * COARSE_XZ;
/// Values in the block-resolution surface lattice.
pub const SURFACE_LEN: usize = 16 * 16;

const LIMIT_SCALE: DVec3 = DVec3::splat(684.412);
const MAIN_SCALE: DVec3 = DVec3::new(684.412 / 80.0, 684.412 / 160.0, 684.412 / 80.0);
const DEPTH_SCALE: f64 = 200.0;
const SURFACE_SCALE: f64 = 0.0625;

/// Horizontal lattice coordinates wrap at this period to keep precision.
const WRAP_PERIOD: i64 = 16_777_216;

#[inline]
fn wrap(v: f64) -> f64 {
    let whole = v.floor();
    (whole as i64 % WRAP_PERIOD) as f64 + (v - whole)
}

// ---------------------------------------------------------------------------
// Octave fields
// ---------------------------------------------------------------------------

struct Octave {
    noise: Perlin,
    offset: DVec3,
}

/// Sum of Perlin octaves; octave `i` runs at `scale / 2^i` with weight `2^i`.
pub struct OctaveNoise {
    octaves: Vec<Octave>,
}

impl OctaveNoise {
    /// Draws one permutation seed and three offsets per octave from `rng`.
    pub fn new(rng: &mut impl Rng, count: usize) -> Self {
        let octaves = (0..count)
            .map(|_| {
                let seed: u32 = rng.random();
                let offset = DVec3::new(
                    rng.random::<f64>() * 256.0,
                    rng.random::<f64>() * 256.0,
                    rng.random::<f64>() * 256.0,
                );
                Octave {
                    noise: Perlin::new(seed),
                    offset,
                }
            })
            .collect();
        Self { octaves }
    }

    pub fn octave_count(&self) -> usize {
        self.octaves.len()
    }

    /// Fill `out` with a `size` region starting at lattice point `origin`.
    ///
    /// Layout is `(x * size.z + z) * size.y + y`. Each sample's coordinate is
    /// derived from its absolute lattice position, so overlapping regions
    /// requested by neighbouring chunks agree exactly.
    pub fn fill_region(&self, out: &mut [f64], origin: IVec3, size: UVec3, scale: DVec3) {
        let (sx, sy, sz) = (size.x as usize, size.y as usize, size.z as usize);
        debug_assert_eq!(out.len(), sx * sy * sz);
        out.fill(0.0);

        let mut frequency = 1.0;
        for octave in &self.octaves {
            let step = scale * frequency;
            let amplitude = 1.0 / frequency;
            for x in 0..sx {
                let px = wrap(f64::from(origin.x + x as i32) * step.x) + octave.offset.x;
                for z in 0..sz {
                    let pz = wrap(f64::from(origin.z + z as i32) * step.z) + octave.offset.z;
                    let base = (x * sz + z) * sy;
                    for y in 0..sy {
                        let py = f64::from(origin.y + y as i32) * step.y + octave.offset.y;
                        out[base + y] += octave.noise.get([px, py, pz]) * amplitude;
                    }
                }
            }
            frequency /= 2.0;
        }
    }

    /// 2D region sampled on the plane `y = 10` with unit vertical scale.
    pub fn fill_region_2d(
        &self,
        out: &mut [f64],
        origin_x: i32,
        origin_z: i32,
        size: u32,
        scale: f64,
    ) {
        self.fill_region(
            out,
            IVec3::new(origin_x, 10, origin_z),
            UVec3::new(size, 1, size),
            DVec3::new(scale, 1.0, scale),
        );
    }
}

struct SurfaceLevel {
    noise: Simplex,
    offset: DVec2,
}

/// Layered 2D simplex field used to vary surface depth.
///
/// Level `j` runs at `scale * 0.5^j` with amplitude `0.55 / 0.5^j`.
pub struct SurfaceNoise {
    levels: Vec<SurfaceLevel>,
}

impl SurfaceNoise {
    pub fn new(rng: &mut impl Rng, count: usize) -> Self {
        let levels = (0..count)
            .map(|_| {
                let seed: u32 = rng.random();
                let offset = DVec2::new(rng.random::<f64>() * 256.0, rng.random::<f64>() * 256.0);
                SurfaceLevel {
                    noise: Simplex::new(seed),
                    offset,
                }
            })
            .collect();
        Self { levels }
    }

    /// Fill a `size`×`size` block region, layout `x * size + z`.
    pub fn fill_region(
        &self,
        out: &mut [f64],
        origin_x: i32,
        origin_z: i32,
        size: usize,
        scale: f64,
    ) {
        debug_assert_eq!(out.len(), size * size);
        out.fill(0.0);

        let mut frequency = 1.0;
        for level in &self.levels {
            let amplitude = 0.55 / frequency;
            let step = scale * frequency;
            for x in 0..size {
                let px = f64::from(origin_x + x as i32) * step + level.offset.x;
                for z in 0..size {
                    let pz = f64::from(origin_z + z as i32) * step + level.offset.y;
                    out[x * size + z] += level.noise.get([px, pz]) * amplitude;
                }
            }
            frequency *= 0.5;
        }
    }
}

// ---------------------------------------------------------------------------
// Per-chunk lattice
// ---------------------------------------------------------------------------

/// The five lattices sampled for one chunk. Rebuilt for every chunk.
#[derive(Clone, Debug, PartialEq)]
pub struct CoarseLattice {
    /// 5×33×5, layout `(x * 5 + z) * 33 + y`.
    pub min_limit: Vec<f64>,
    pub max_limit: Vec<f64>,
    pub main: Vec<f64>,
    /// 5×5, layout `x * 5 + z`.
    pub depth: Vec<f64>,
    /// 16×16 at block resolution, layout `x * 16 + z`.
    pub surface: Vec<f64>,
}

/// Owner of the five seeded noise fields.
///
/// Construction consumes a single `ChaCha8Rng` stream in the order
/// minLimit, maxLimit, main, surface, depth. Build it once, before any
/// parallel generation starts; afterwards it is read-only and `Sync`.
pub struct NoiseFieldGenerator {
    min_limit: OctaveNoise,
    max_limit: OctaveNoise,
    main: OctaveNoise,
    surface: SurfaceNoise,
    depth: OctaveNoise,
}

impl NoiseFieldGenerator {
    pub fn new(world_seed: u64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(world_seed);
        let min_limit = OctaveNoise::new(&mut rng, 16);
        let max_limit = OctaveNoise::new(&mut rng, 16);
        let main = OctaveNoise::new(&mut rng, 8);
        let surface = SurfaceNoise::new(&mut rng, 4);
        let depth = OctaveNoise::new(&mut rng, 16);
        Self {
            min_limit,
            max_limit,
            main,
            surface,
            depth,
        }
    }

    /// Sample every lattice for a chunk.
    pub fn sample(&self, pos: ChunkPos) -> CoarseLattice {
        let origin = IVec3::new(pos.x * 4, 0, pos.z * 4);
        let size = UVec3::new(COARSE_XZ as u32, COARSE_Y as u32, COARSE_XZ as u32);

        let mut lattice = CoarseLattice {
            min_limit: vec![0.0; COARSE_LEN],
            max_limit: vec![0.0; COARSE_LEN],
            main: vec![0.0; COARSE_LEN],
            depth: vec![0.0; DEPTH_LEN],
            surface: vec![0.0; SURFACE_LEN],
        };

        self.depth
            .fill_region_2d(&mut lattice.depth, origin.x, origin.z, COARSE_XZ as u32, DEPTH_SCALE);
        self.main.fill_region(&mut lattice.main, origin, size, MAIN_SCALE);
        self.min_limit
            .fill_region(&mut lattice.min_limit, origin, size, LIMIT_SCALE);
        self.max_limit
            .fill_region(&mut lattice.max_limit, origin, size, LIMIT_SCALE);
        self.surface.fill_region(
            &mut lattice.surface,
            pos.min_block_x(),
            pos.min_block_z(),
            16,
            SURFACE_SCALE,
        );

        lattice
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_keeps_fraction() {
        assert_eq!(wrap(16_777_216.5), 0.5);
        assert_eq!(wrap(3.25), 3.25);
        // Truncating remainder keeps the sign of negative coordinates.
        assert_eq!(wrap(-16_777_217.0), -1.0);
    }

    #[test]
    fn test_same_seed_same_lattice() {
        let a = NoiseFieldGenerator::new(7).sample(ChunkPos::new(3, -2));
        let b = NoiseFieldGenerator::new(7).sample(ChunkPos::new(3, -2));
        assert_eq!(a, b, "lattices must be a pure function of seed and chunk");
    }

    #[test]
    fn test_different_seeds_differ() {
        let a = NoiseFieldGenerator::new(1).sample(ChunkPos::new(0, 0));
        let b = NoiseFieldGenerator::new(2).sample(ChunkPos::new(0, 0));
        assert_ne!(a.main, b.main);
    }

    #[test]
    fn test_lattice_sizes() {
        let lattice = NoiseFieldGenerator::new(0).sample(ChunkPos::new(0, 0));
        assert_eq!(lattice.min_limit.len(), 825);
        assert_eq!(lattice.main.len(), 825);
        assert_eq!(lattice.depth.len(), 25);
        assert_eq!(lattice.surface.len(), 256);
        assert!(lattice.max_limit.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn test_neighbouring_chunks_share_edge_samples() {
        let generator = NoiseFieldGenerator::new(99);
        let west = generator.sample(ChunkPos::new(0, 5));
        let east = generator.sample(ChunkPos::new(1, 5));
        for z in 0..COARSE_XZ {
            // x = 4 in the west chunk is x = 0 in the east chunk.
            assert_eq!(west.depth[4 * COARSE_XZ + z], east.depth[z]);
            for y in 0..COARSE_Y {
                let w = (4 * COARSE_XZ + z) * COARSE_Y + y;
                let e = z * COARSE_Y + y;
                assert_eq!(west.min_limit[w], east.min_limit[e]);
                assert_eq!(west.main[w], east.main[e]);
            }
        }
    }

    #[test]
    fn test_octave_weights_grow() {
        // Sixteen octaves with weights up to 2^15 give values far outside [-1, 1].
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let noise = OctaveNoise::new(&mut rng, 16);
        let mut out = vec![0.0; 64];
        noise.fill_region(&mut out, IVec3::ZERO, UVec3::new(4, 4, 4), DVec3::splat(684.412));
        assert!(out.iter().any(|v| v.abs() > 1.0));
        assert_eq!(noise.octave_count(), 16);
    }
}

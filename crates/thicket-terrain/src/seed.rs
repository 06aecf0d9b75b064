//! Deterministic seeding utilities.
//!
//! Every random draw made while generating a chunk comes from a `ChaCha8Rng`
//! derived here from the world seed and the chunk coordinate, so a chunk is
//! bit-identical no matter which thread builds it or in which order.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use thicket_math::ChunkPos;
use thicket_voxel::ChunkColumn;

// ---------------------------------------------------------------------------
// Seed derivation
// ---------------------------------------------------------------------------

/// Per-chunk scramble `x * 0x4f9939f508 + z * 0x1ef1565bd5` (wrapping).
pub fn chunk_seed(pos: ChunkPos) -> i64 {
    i64::from(pos.x)
        .wrapping_mul(0x4f_9939_f508)
        .wrapping_add(i64::from(pos.z).wrapping_mul(0x1e_f156_5bd5))
}

/// Deterministic RNG for one chunk of one world.
pub fn chunk_rng(world_seed: u64, pos: ChunkPos) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(world_seed ^ chunk_seed(pos) as u64)
}

/// Seed of the 16×16-chunk region a cloud layer belongs to.
///
/// Regions are centered on multiples of 16 chunks, so the region of chunk
/// `c` is `(c + 8) >> 4`.
pub fn cloud_region_seed(pos: ChunkPos) -> i64 {
    let region_x = (pos.x + 8) >> 4;
    let region_z = (pos.z + 8) >> 4;

    let seed = i64::from(region_x.wrapping_mul(3_129_871))
        ^ i64::from(region_z).wrapping_mul(116_129_781);
    seed.wrapping_mul(seed)
        .wrapping_mul(42_317_861)
        .wrapping_add(seed.wrapping_mul(7))
}

/// Eight 2-bit jitter fields pulled from a region seed.
pub fn cloud_jitter(region_seed: i64) -> [i32; 8] {
    const SHIFTS: [u32; 8] = [12, 15, 18, 21, 9, 6, 3, 0];
    SHIFTS.map(|shift| ((region_seed >> shift) & 3) as i32)
}

// ---------------------------------------------------------------------------
// Deterministic math (libm)
// ---------------------------------------------------------------------------

/// Platform-independent cosine.
#[inline]
pub fn det_cos(x: f64) -> f64 {
    libm::cos(x)
}

/// Platform-independent square root.
#[inline]
pub fn det_sqrt(x: f64) -> f64 {
    libm::sqrt(x)
}

// ---------------------------------------------------------------------------
// Verification
// ---------------------------------------------------------------------------

/// Content hash of a column (blocks and biomes) for determinism checks.
pub fn hash_column(column: &ChunkColumn) -> u64 {
    let mut hasher = DefaultHasher::new();
    column.pos().hash(&mut hasher);
    for x in 0..16 {
        for z in 0..16 {
            for y in 0..column.height() {
                column.get(x, y, z).hash(&mut hasher);
            }
        }
    }
    column.biomes().hash(&mut hasher);
    hasher.finish()
}

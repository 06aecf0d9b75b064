//! Cloud layer above troll caves.
//!
//! The chunk is split into 4×4-block cells. Each cell measures its distance to
//! three jittered centers (the feature center plus two offsets derived from
//! the 16×16-chunk region seed) and, depending on how close it is, gets a
//! capped cloud slab or just the fluffy core.

use rand::Rng;
use rand_chacha::ChaCha8Rng;
use thicket_voxel::ChunkColumn;

use crate::seed::{cloud_jitter, cloud_region_seed, det_sqrt};
use crate::surface::TerrainBlocks;

/// Height of the upper cloud cap.
pub const CLOUD_TOP: i32 = 166;
const CLOUD_DEPTH: i32 = 4;

/// Stamp the cloud layer for the chunk held by `column`.
///
/// `(hx, hz)` is the feature center relative to the chunk's minimum corner.
/// Writes that fall outside the column are skipped.
pub fn cloud_layer(
    column: &mut ChunkColumn,
    hx: i32,
    hz: i32,
    rng: &mut ChaCha8Rng,
    blocks: &TerrainBlocks,
) {
    let jitter = cloud_jitter(cloud_region_seed(column.pos()));

    for bx in 0..4 {
        for bz in 0..4 {
            let dx = bx * 4 - hx - 2;
            let dz = bz * 4 - hz - 2;

            let dx2 = dx + jitter[0] * 5 - jitter[1] * 4;
            let dz2 = dz + jitter[2] * 4 - jitter[3] * 5;
            let dx3 = dx + jitter[4] * 5 - jitter[5] * 4;
            let dz3 = dz + jitter[6] * 4 - jitter[7] * 5;

            let dist0 = det_sqrt(f64::from(dx * dx + dz * dz)) / 4.0;
            let dist2 = det_sqrt(f64::from(dx2 * dx2 + dz2 * dz2)) / 3.5;
            let dist3 = det_sqrt(f64::from(dx3 * dx3 + dz3 * dz3)) / 4.5;
            let dist = dist0.min(dist2.min(dist3));

            let pr: f32 = rng.random();
            let cv = (dist - 7.0) - f64::from(pr * 3.0);

            let mut y = CLOUD_TOP;
            let mut depth = CLOUD_DEPTH;
            if pr < 0.1 {
                y += 1;
            }
            if pr > 0.6 {
                depth += 1;
            }
            if pr > 0.9 {
                depth += 1;
            }

            let capped = dist < 7.0 || cv < f64::from(0.05f32);
            let core_only = !capped && (dist < 8.0 || cv < 1.0);
            if !capped && !core_only {
                continue;
            }

            for sx in 0..4 {
                for sz in 0..4 {
                    let lx = bx * 4 + sx;
                    let lz = bz * 4 + sz;
                    if capped {
                        column.try_set(lx, y, lz, blocks.wispy_cloud);
                    }
                    for d in 1..depth {
                        column.try_set(lx, y - d, lz, blocks.fluffy_cloud);
                    }
                    if capped {
                        column.try_set(lx, y - depth, lz, blocks.wispy_cloud);
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use thicket_math::ChunkPos;
    use thicket_voxel::{BlockRegistry, COLUMN_HEIGHT};

    fn blocks() -> TerrainBlocks {
        TerrainBlocks::resolve(&BlockRegistry::with_terrain_blocks()).unwrap()
    }

    #[test]
    fn test_center_chunk_gets_capped_cloud() {
        let b = blocks();
        let mut column = ChunkColumn::new(ChunkPos::new(0, 0), COLUMN_HEIGHT);
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        cloud_layer(&mut column, 8, 8, &mut rng, &b);

        // Every cell is well within 7 scaled blocks of the center.
        for x in 0..16 {
            for z in 0..16 {
                let top = column.top_matching(x, z, |id| id == b.wispy_cloud);
                assert!(matches!(top, Some(166) | Some(167)), "({x}, {z}) top {top:?}");
                assert_eq!(column.get(x, 164, z), b.fluffy_cloud);
            }
        }
        assert_eq!(column.get(0, 150, 0), thicket_voxel::BlockId::AIR);
    }

    #[test]
    fn test_far_chunk_is_untouched() {
        let b = blocks();
        let mut column = ChunkColumn::new(ChunkPos::new(0, 0), COLUMN_HEIGHT);
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        cloud_layer(&mut column, 400, 400, &mut rng, &b);
        assert_eq!(column.count(b.wispy_cloud), 0);
        assert_eq!(column.count(b.fluffy_cloud), 0);
    }

    #[test]
    fn test_short_column_skips_writes() {
        let b = blocks();
        let mut column = ChunkColumn::new(ChunkPos::new(0, 0), 128);
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        cloud_layer(&mut column, 8, 8, &mut rng, &b);
        assert_eq!(column.count(b.wispy_cloud), 0);
    }

    #[test]
    fn test_deterministic_for_same_rng() {
        let b = blocks();
        let run = |seed| {
            let mut column = ChunkColumn::new(ChunkPos::new(3, -2), COLUMN_HEIGHT);
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            cloud_layer(&mut column, 20, -6, &mut rng, &b);
            column
        };
        assert_eq!(run(9), run(9));
    }
}

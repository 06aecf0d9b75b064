use glam::IVec3;
use serde::{Deserialize, Serialize};

/// Horizontal size of a chunk column in blocks.
pub const CHUNK_SIZE: i32 = 16;

/// Chunk column coordinate.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ChunkPos {
    pub x: i32,
    pub z: i32,
}

impl ChunkPos {
    pub const fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    /// Chunk containing the given block column (floors for negative coordinates).
    pub fn from_block(x: i32, z: i32) -> Self {
        Self::new(x >> 4, z >> 4)
    }

    /// World X of the chunk's first block column.
    pub fn min_block_x(self) -> i32 {
        self.x * CHUNK_SIZE
    }

    /// World Z of the chunk's first block column.
    pub fn min_block_z(self) -> i32 {
        self.z * CHUNK_SIZE
    }

    /// World position of a local column at height `y`.
    pub fn block_at(self, local_x: i32, y: i32, local_z: i32) -> IVec3 {
        IVec3::new(self.min_block_x() + local_x, y, self.min_block_z() + local_z)
    }

    /// Chebyshev distance in chunks.
    pub fn chebyshev_distance(self, other: ChunkPos) -> i32 {
        (self.x - other.x).abs().max((self.z - other.z).abs())
    }

    /// All chunks within `radius` of `self`, row by row.
    pub fn square_around(self, radius: i32) -> impl Iterator<Item = ChunkPos> {
        let radius = radius.max(0);
        (-radius..=radius).flat_map(move |dz| {
            (-radius..=radius).map(move |dx| ChunkPos::new(self.x + dx, self.z + dz))
        })
    }
}

//! Palette-compressed 16×H×16 block column with its per-column biome array.
//!
//! Blocks are addressed by local `(x, y, z)` with `x, z` in `0..16` and `y` in
//! `0..height`. The linear layout is `(x * 16 + z) * height + y`, so each
//! vertical run is contiguous.

use serde::{Deserialize, Serialize};
use thicket_math::ChunkPos;

use crate::bit_packed::BitPackedArray;
use crate::registry::BlockId;

/// Default column height in blocks.
pub const COLUMN_HEIGHT: usize = 256;

/// Number of biome entries in a column (one per horizontal position).
pub const BIOME_AREA: usize = 16 * 16;

/// Finished or in-progress block column for one chunk coordinate.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkColumn {
    pos: ChunkPos,
    height: usize,
    palette: Vec<BlockId>,
    storage: BitPackedArray,
    /// Biome id per column, indexed `z * 16 + x`.
    biomes: Vec<u8>,
}

impl ChunkColumn {
    /// Column of the given height filled with air.
    pub fn new(pos: ChunkPos, height: usize) -> Self {
        Self {
            pos,
            height,
            palette: vec![BlockId::AIR],
            storage: BitPackedArray::new(0, 16 * 16 * height),
            biomes: vec![0; BIOME_AREA],
        }
    }

    pub fn pos(&self) -> ChunkPos {
        self.pos
    }

    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    fn index(&self, x: usize, y: usize, z: usize) -> usize {
        (x * 16 + z) * self.height + y
    }

    /// `true` if the local coordinate lies inside the column.
    #[inline]
    pub fn in_bounds(&self, x: i32, y: i32, z: i32) -> bool {
        (0..16).contains(&x) && (0..16).contains(&z) && y >= 0 && (y as usize) < self.height
    }

    /// Block at a local position. Out-of-range reads return air.
    #[inline]
    pub fn get(&self, x: usize, y: usize, z: usize) -> BlockId {
        if x >= 16 || z >= 16 || y >= self.height {
            return BlockId::AIR;
        }
        self.palette[self.storage.get(self.index(x, y, z)) as usize]
    }

    /// Writes a block. Out-of-range writes are dropped with a warning.
    pub fn set(&mut self, x: usize, y: usize, z: usize, block: BlockId) {
        if x >= 16 || z >= 16 || y >= self.height {
            tracing::warn!("ChunkColumn::set out of bounds: ({}, {}, {})", x, y, z);
            return;
        }
        self.set_unchecked_bounds(x, y, z, block);
    }

    /// Writes a block if the signed coordinate is inside the column.
    /// Returns whether the write happened.
    pub fn try_set(&mut self, x: i32, y: i32, z: i32, block: BlockId) -> bool {
        if !self.in_bounds(x, y, z) {
            return false;
        }
        self.set_unchecked_bounds(x as usize, y as usize, z as usize, block);
        true
    }

    fn set_unchecked_bounds(&mut self, x: usize, y: usize, z: usize, block: BlockId) {
        let slot = self.palette_slot(block);
        let index = self.index(x, y, z);
        self.storage.set(index, slot);
    }

    fn palette_slot(&mut self, block: BlockId) -> u16 {
        if let Some(slot) = self.palette.iter().position(|&b| b == block) {
            return slot as u16;
        }
        let bits = BitPackedArray::bits_for(self.palette.len() + 1);
        if bits != self.storage.bits() {
            self.storage = self.storage.repacked(bits);
        }
        self.palette.push(block);
        (self.palette.len() - 1) as u16
    }

    /// Highest `y` whose block satisfies `pred`, scanning down from the top.
    pub fn top_matching(
        &self,
        x: usize,
        z: usize,
        mut pred: impl FnMut(BlockId) -> bool,
    ) -> Option<usize> {
        (0..self.height).rev().find(|&y| pred(self.get(x, y, z)))
    }

    /// Number of blocks of the given type in the whole column.
    pub fn count(&self, block: BlockId) -> usize {
        match self.palette.iter().position(|&b| b == block) {
            Some(slot) => self.storage.iter().filter(|&s| s as usize == slot).count(),
            None => 0,
        }
    }

    /// Distinct block types currently referenced by the palette.
    pub fn palette(&self) -> &[BlockId] {
        &self.palette
    }

    /// Bytes used by block index storage.
    pub fn storage_bytes(&self) -> usize {
        self.storage.storage_bytes()
    }

    pub fn biome(&self, x: usize, z: usize) -> u8 {
        self.biomes[z * 16 + x]
    }

    pub fn set_biome(&mut self, x: usize, z: usize, biome: u8) {
        self.biomes[z * 16 + x] = biome;
    }

    /// Biome ids, indexed `z * 16 + x`.
    pub fn biomes(&self) -> &[u8] {
        &self.biomes
    }
}

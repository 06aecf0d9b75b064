//! Integer block-space geometry shared by the Thicket crates.

mod block_box;
mod chunk_pos;

pub use block_box::BlockBox;
pub use chunk_pos::{CHUNK_SIZE, ChunkPos};
pub use glam::IVec3;

//! Block storage for generated chunk columns: the block registry, bit-packed
//! palette storage, the column container handed out by the generator, and
//! pillar adjacency helpers.

pub mod bit_packed;
pub mod column;
pub mod pillar;
pub mod registry;

pub use column::{BIOME_AREA, COLUMN_HEIGHT, ChunkColumn};
pub use pillar::{Axis, Facing, PillarLink, PillarState, link_facing, resolve_link_facing};
pub use registry::{BlockDef, BlockId, BlockKind, BlockRegistry, RegistryError};

//! Block registry: maps compact [`BlockId`] values to [`BlockDef`] metadata.
//!
//! Built once before generation starts and shared read-only afterwards. Air is
//! always ID 0 so that a freshly allocated column is empty space.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Compact identifier stored for every block in a column (2 bytes).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BlockId(pub u16);

impl BlockId {
    pub const AIR: BlockId = BlockId(0);

    pub fn is_air(self) -> bool {
        self == Self::AIR
    }
}

/// Physical category of a block, as far as terrain shaping cares.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlockKind {
    Air,
    Solid,
    Liquid,
    /// Walkable but non-terrain blocks placed above the surface.
    Cloud,
}

/// Descriptor for a block type.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockDef {
    /// Unique name, e.g. "stone" or "packed_ice".
    pub name: String,
    pub kind: BlockKind,
}

impl BlockDef {
    pub fn new(name: impl Into<String>, kind: BlockKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}

/// Errors that can occur during block registration or lookup.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    /// A block with the same name has already been registered.
    #[error("duplicate block name: {0}")]
    DuplicateName(String),
    /// All 65 536 slots have been consumed.
    #[error("block registry is full (max 65536 types)")]
    RegistryFull,
    /// A block the caller depends on was never registered.
    #[error("unknown block name: {0}")]
    UnknownName(String),
}

/// Names registered by [`BlockRegistry::with_terrain_blocks`], in ID order after air.
pub const TERRAIN_BLOCKS: &[(&str, BlockKind)] = &[
    ("stone", BlockKind::Solid),
    ("water", BlockKind::Liquid),
    ("bedrock", BlockKind::Solid),
    ("grass", BlockKind::Solid),
    ("dirt", BlockKind::Solid),
    ("sand", BlockKind::Solid),
    ("sandstone", BlockKind::Solid),
    ("gravel", BlockKind::Solid),
    ("ice", BlockKind::Solid),
    ("packed_ice", BlockKind::Solid),
    ("podzol", BlockKind::Solid),
    ("snow", BlockKind::Solid),
    ("wispy_cloud", BlockKind::Cloud),
    ("fluffy_cloud", BlockKind::Cloud),
];

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

/// Dense `BlockId -> BlockDef` table with reverse lookup by name.
#[derive(Clone, Debug)]
pub struct BlockRegistry {
    /// `index == BlockId.0`.
    blocks: Vec<BlockDef>,
    name_to_id: FxHashMap<String, BlockId>,
}

impl BlockRegistry {
    /// Creates a registry with only air registered.
    pub fn new() -> Self {
        let mut name_to_id = FxHashMap::default();
        name_to_id.insert("air".to_string(), BlockId::AIR);
        Self {
            blocks: vec![BlockDef::new("air", BlockKind::Air)],
            name_to_id,
        }
    }

    /// Registry pre-populated with every block the terrain pipeline places.
    pub fn with_terrain_blocks() -> Self {
        let mut registry = Self::new();
        for (name, kind) in TERRAIN_BLOCKS {
            // Names in the table are unique and well under the capacity.
            if let Err(err) = registry.register(BlockDef::new(*name, *kind)) {
                tracing::error!("failed to register built-in block {name}: {err}");
            }
        }
        registry
    }

    /// Registers a block and returns its sequential ID.
    ///
    /// # Errors
    ///
    /// [`RegistryError::DuplicateName`] when the name is taken,
    /// [`RegistryError::RegistryFull`] when all IDs are used.
    pub fn register(&mut self, def: BlockDef) -> Result<BlockId, RegistryError> {
        if self.name_to_id.contains_key(&def.name) {
            return Err(RegistryError::DuplicateName(def.name));
        }
        if self.blocks.len() > u16::MAX as usize {
            return Err(RegistryError::RegistryFull);
        }

        let id = BlockId(self.blocks.len() as u16);
        self.name_to_id.insert(def.name.clone(), id);
        self.blocks.push(def);
        Ok(id)
    }

    pub fn get(&self, id: BlockId) -> Option<&BlockDef> {
        self.blocks.get(id.0 as usize)
    }

    pub fn lookup_by_name(&self, name: &str) -> Option<BlockId> {
        self.name_to_id.get(name).copied()
    }

    /// Like [`lookup_by_name`](Self::lookup_by_name) but reports a missing block as an error.
    pub fn require(&self, name: &str) -> Result<BlockId, RegistryError> {
        self.lookup_by_name(name)
            .ok_or_else(|| RegistryError::UnknownName(name.to_string()))
    }

    /// Block kind, treating unknown IDs as air.
    pub fn kind(&self, id: BlockId) -> BlockKind {
        self.get(id).map_or(BlockKind::Air, |def| def.kind)
    }

    /// Number of registered blocks, air included.
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// `true` if only air is registered.
    pub fn is_empty(&self) -> bool {
        self.blocks.len() <= 1
    }
}

impl Default for BlockRegistry {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

//! Biome definition: terrain shape and surface materials of one biome type.

use thicket_voxel::BlockId;

use crate::spawn::{CreatureCategory, SpawnEntry, SpawnTable};

/// Temperature drops by this much per block above [`BiomeDef::CHILL_START`].
const LAPSE_RATE: f32 = 0.05 / 30.0;

/// Full descriptor for a biome type.
#[derive(Clone, Debug)]
pub struct BiomeDef {
    /// Unique name (e.g., "dense_forest").
    pub name: String,
    /// Coarse ground level contribution. Negative values sink below sea level.
    pub base_height: f32,
    /// Amplitude of vertical variation.
    pub height_variation: f32,
    /// Base temperature; below 0.15 exposed water freezes.
    pub temperature: f32,
    /// Block placed on the surface (e.g., grass, sand, snow).
    pub top_block: BlockId,
    /// Block for the layers directly under the surface.
    pub filler_block: BlockId,
    /// Thick tree canopy; surface lakes are suppressed under it.
    pub has_canopy: bool,
    pub spawns: SpawnTable,
    /// Monster list used below sea level, if the biome has a separate one.
    pub underground_monsters: Option<Vec<SpawnEntry>>,
}

impl BiomeDef {
    /// Height above which temperature starts to fall.
    pub const CHILL_START: i32 = 64;

    pub fn new(
        name: impl Into<String>,
        base_height: f32,
        height_variation: f32,
        top_block: BlockId,
        filler_block: BlockId,
    ) -> Self {
        Self {
            name: name.into(),
            base_height,
            height_variation,
            temperature: 0.7,
            top_block,
            filler_block,
            has_canopy: false,
            spawns: SpawnTable::new(),
            underground_monsters: None,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_canopy(mut self) -> Self {
        self.has_canopy = true;
        self
    }

    pub fn with_spawns(mut self, category: CreatureCategory, entries: Vec<SpawnEntry>) -> Self {
        self.spawns.set(category, entries);
        self
    }

    pub fn with_underground_monsters(mut self, entries: Vec<SpawnEntry>) -> Self {
        self.underground_monsters = Some(entries);
        self
    }

    /// Temperature at a given height.
    pub fn temperature_at(&self, y: i32) -> f32 {
        if y > Self::CHILL_START {
            self.temperature - (y - Self::CHILL_START) as f32 * LAPSE_RATE
        } else {
            self.temperature
        }
    }

    /// Spawn list for a category, ignoring height.
    pub fn spawn_list(&self, category: CreatureCategory) -> &[SpawnEntry] {
        self.spawns.get(category)
    }

    /// Surface lakes may be placed unless a canopy covers the biome.
    pub fn allows_surface_lakes(&self) -> bool {
        !self.has_canopy
    }
}

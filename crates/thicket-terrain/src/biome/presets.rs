//! Built-in biome table and the diagram that places it.

use thicket_voxel::BlockRegistry;

use super::{BiomeDef, BiomeId, BiomeRegistry, WhittakerDiagram, WhittakerRegion};
use crate::error::TerrainError;
use crate::spawn::{CreatureCategory, SpawnEntry};

fn forest_creatures() -> Vec<SpawnEntry> {
    vec![
        SpawnEntry::new("bighorn_sheep", 12, 4, 4),
        SpawnEntry::new("wild_boar", 10, 4, 4),
        SpawnEntry::new("chicken", 10, 4, 4),
        SpawnEntry::new("deer", 15, 4, 5),
        SpawnEntry::new("wolf", 5, 4, 4),
    ]
}

fn forest_ambient() -> Vec<SpawnEntry> {
    vec![
        SpawnEntry::new("bat", 10, 8, 8),
        SpawnEntry::new("raven", 10, 1, 2),
        SpawnEntry::new("squirrel", 10, 2, 4),
        SpawnEntry::new("bunny", 10, 4, 5),
    ]
}

fn surface_monsters() -> Vec<SpawnEntry> {
    vec![
        SpawnEntry::new("spider", 10, 4, 4),
        SpawnEntry::new("zombie", 10, 4, 4),
        SpawnEntry::new("skeleton", 10, 4, 4),
    ]
}

fn cave_monsters() -> Vec<SpawnEntry> {
    vec![
        SpawnEntry::new("creeper", 10, 4, 4),
        SpawnEntry::new("skeleton", 10, 4, 4),
        SpawnEntry::new("zombie", 10, 4, 4),
        SpawnEntry::new("swarm_spider", 10, 4, 4),
        SpawnEntry::new("kobold", 10, 4, 8),
    ]
}

fn forest_biome(
    name: &str,
    base_height: f32,
    height_variation: f32,
    blocks: &BlockRegistry,
) -> Result<BiomeDef, TerrainError> {
    Ok(BiomeDef::new(
        name,
        base_height,
        height_variation,
        blocks.require("grass")?,
        blocks.require("dirt")?,
    )
    .with_spawns(CreatureCategory::Creature, forest_creatures())
    .with_spawns(CreatureCategory::Ambient, forest_ambient())
    .with_spawns(CreatureCategory::Monster, surface_monsters())
    .with_underground_monsters(cave_monsters()))
}

/// The default biome table. "forest" is always id 0.
///
/// # Errors
///
/// Fails if a surface block is missing from `blocks`.
pub fn default_biomes(blocks: &BlockRegistry) -> Result<BiomeRegistry, TerrainError> {
    let mut registry = BiomeRegistry::new();

    registry.register(forest_biome("forest", 0.1, 0.2, blocks)?)?;
    registry.register(forest_biome("dense_forest", 0.2, 0.2, blocks)?.with_canopy())?;
    registry.register(forest_biome("clearing", 0.125, 0.05, blocks)?)?;
    registry.register(
        BiomeDef::new(
            "highlands",
            3.5,
            0.05,
            blocks.require("podzol")?,
            blocks.require("dirt")?,
        )
        .with_temperature(0.4)
        .with_spawns(CreatureCategory::Monster, surface_monsters())
        .with_underground_monsters(cave_monsters()),
    )?;
    registry.register(
        forest_biome("snowy_forest", 0.2, 0.2, blocks)?
            .with_temperature(0.09)
            .with_canopy(),
    )?;
    registry.register(
        BiomeDef::new(
            "snowy_tundra",
            0.125,
            0.1,
            blocks.require("snow")?,
            blocks.require("dirt")?,
        )
        .with_temperature(0.05)
        .with_spawns(CreatureCategory::Monster, surface_monsters()),
    )?;
    registry.register(forest_biome("swamp", -0.25, 0.0, blocks)?.with_temperature(0.8))?;
    registry.register(
        BiomeDef::new(
            "stream",
            -0.8,
            0.0,
            blocks.require("sand")?,
            blocks.require("sand")?,
        )
        .with_spawns(CreatureCategory::WaterCreature, vec![SpawnEntry::new("squid", 10, 4, 4)]),
    )?;
    registry.register(
        BiomeDef::new(
            "lake",
            -1.8,
            0.1,
            blocks.require("sand")?,
            blocks.require("sand")?,
        )
        .with_temperature(0.66)
        .with_spawns(CreatureCategory::WaterCreature, vec![SpawnEntry::new("squid", 10, 4, 4)]),
    )?;

    Ok(registry)
}

/// Places the default biomes by temperature and moisture.
///
/// Names missing from `registry` resolve to id 0.
pub fn default_diagram(registry: &BiomeRegistry) -> WhittakerDiagram {
    let id = |name: &str| registry.lookup_by_name(name).unwrap_or(BiomeId(0));
    let region = |temp: (f64, f64), moisture: (f64, f64), name: &str| WhittakerRegion {
        temp_min: temp.0,
        temp_max: temp.1,
        moisture_min: moisture.0,
        moisture_max: moisture.1,
        biome_id: id(name),
    };

    WhittakerDiagram {
        regions: vec![
            region((0.0, 0.25), (0.0, 0.5), "snowy_tundra"),
            region((0.0, 0.25), (0.5, 1.01), "snowy_forest"),
            region((0.25, 0.4), (0.0, 0.3), "highlands"),
            region((0.25, 0.75), (0.85, 1.01), "lake"),
            region((0.4, 0.75), (0.75, 0.85), "stream"),
            region((0.75, 1.01), (0.7, 1.01), "swamp"),
            region((0.45, 0.55), (0.0, 0.35), "clearing"),
            region((0.25, 1.01), (0.45, 0.75), "dense_forest"),
        ],
        fallback: id("forest"),
    }
}

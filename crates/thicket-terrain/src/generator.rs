//! The chunk generator: ties noise, height blending, rasterization, feature
//! carving and surface rules into one pass per chunk.
//!
//! A [`TerrainGenerator`] is built once per world and is read-only afterwards,
//! so it can be shared between worker threads behind an `Arc`.

use std::sync::Arc;

use thicket_config::{WorldConfig, WorldType};
use thicket_math::{BlockBox, ChunkPos, IVec3};
use thicket_voxel::{BlockRegistry, COLUMN_HEIGHT, ChunkColumn};

use crate::biome::{
    BiomeDef, BiomeId, BiomeSource, WhittakerBiomeSource, default_biomes, default_diagram,
};
use crate::error::TerrainError;
use crate::feature::{DeformContext, Feature, FeatureIndex, FeatureKind, deform_for_feature};
use crate::height_field::{
    BIOME_GRID, BiomeHeight, BiomeHeightGrid, DensityField, HeightMapInterpolator,
};
use crate::noise_field::NoiseFieldGenerator;
use crate::rasterizer::{VoxelField, rasterize};
use crate::seed::chunk_rng;
use crate::spawn::{CreatureCategory, SpawnEntry};
use crate::surface::{
    ClassicSurface, ColumnMaterializer, SurfaceContext, TerrainBlocks, materialize,
    replace_biome_blocks,
};

/// Generates [`ChunkColumn`]s for one world.
pub struct TerrainGenerator {
    settings: WorldConfig,
    noise: NoiseFieldGenerator,
    interpolator: HeightMapInterpolator,
    block_registry: Arc<BlockRegistry>,
    blocks: TerrainBlocks,
    biomes: Arc<dyn BiomeSource>,
    features: Arc<dyn FeatureIndex>,
    surface: Box<dyn ColumnMaterializer>,
}

impl TerrainGenerator {
    /// Build a generator. This is the only step that consumes the world's
    /// seeded random stream.
    ///
    /// # Errors
    ///
    /// Fails if the settings are invalid, the biome source has no biomes, or
    /// a terrain block is missing from `block_registry`.
    pub fn new(
        settings: WorldConfig,
        block_registry: Arc<BlockRegistry>,
        biomes: Arc<dyn BiomeSource>,
        features: Arc<dyn FeatureIndex>,
    ) -> Result<Self, TerrainError> {
        settings.validate()?;
        if biomes.registry().is_empty() {
            return Err(TerrainError::EmptyBiomeRegistry);
        }
        let blocks = TerrainBlocks::resolve(&block_registry)?;

        tracing::info!(
            seed = settings.seed,
            world_type = ?settings.world_type,
            sea_level = settings.sea_level,
            squish = settings.squish,
            bedrock = settings.generate_bedrock,
            biomes = biomes.registry().len(),
            "Terrain generator ready"
        );

        Ok(Self {
            noise: NoiseFieldGenerator::new(settings.seed),
            interpolator: HeightMapInterpolator::new(settings.world_type),
            settings,
            block_registry,
            blocks,
            biomes,
            features,
            surface: Box::new(ClassicSurface),
        })
    }

    /// Generator with the built-in blocks, biome table and Whittaker placement.
    pub fn standard(
        settings: WorldConfig,
        features: Arc<dyn FeatureIndex>,
    ) -> Result<Self, TerrainError> {
        let block_registry = Arc::new(BlockRegistry::with_terrain_blocks());
        let biome_registry = Arc::new(default_biomes(&block_registry)?);
        let diagram = default_diagram(&biome_registry);
        let biomes = Arc::new(WhittakerBiomeSource::new(settings.seed, biome_registry, diagram));
        Self::new(settings, block_registry, biomes, features)
    }

    /// Replace the per-column surface rules.
    pub fn with_surface(mut self, surface: Box<dyn ColumnMaterializer>) -> Self {
        self.surface = surface;
        self
    }

    pub fn settings(&self) -> &WorldConfig {
        &self.settings
    }

    pub fn block_registry(&self) -> &BlockRegistry {
        &self.block_registry
    }

    pub fn blocks(&self) -> &TerrainBlocks {
        &self.blocks
    }

    pub fn biome_source(&self) -> &dyn BiomeSource {
        self.biomes.as_ref()
    }

    pub fn features(&self) -> &dyn FeatureIndex {
        self.features.as_ref()
    }

    pub fn world_type(&self) -> WorldType {
        self.settings.world_type
    }

    // -----------------------------------------------------------------------
    // Generation
    // -----------------------------------------------------------------------

    /// Biome heights on the 10×10 coarse grid around `pos`.
    fn coarse_heights(&self, pos: ChunkPos) -> BiomeHeightGrid {
        let origin_x = pos.x * 4 - 2;
        let origin_z = pos.z * 4 - 2;
        let mut grid = [BiomeHeight {
            base_height: 0.0,
            height_variation: 0.0,
        }; BIOME_GRID * BIOME_GRID];

        for (i, slot) in grid.iter_mut().enumerate() {
            let (gx, gz) = ((i % BIOME_GRID) as i32, (i / BIOME_GRID) as i32);
            let def = self
                .biomes
                .def(self.biomes.coarse_biome_at(origin_x + gx, origin_z + gz));
            *slot = BiomeHeight {
                base_height: def.base_height,
                height_variation: def.height_variation,
            };
        }
        grid
    }

    /// Coarse 5×33×5 densities for a chunk.
    pub fn density_field(&self, pos: ChunkPos) -> DensityField {
        let lattice = self.noise.sample(pos);
        self.interpolator.interpolate(&lattice, &self.coarse_heights(pos))
    }

    /// Solid/air field for a chunk, squished if the world is configured to.
    pub fn voxel_field(&self, pos: ChunkPos) -> VoxelField {
        let mut voxels = rasterize(&self.density_field(pos), COLUMN_HEIGHT);
        if self.settings.squish {
            voxels.squish();
        }
        voxels
    }

    /// Generate one chunk. Pure: the same settings and position always give
    /// the same column, on any thread.
    pub fn generate_chunk(&self, pos: ChunkPos) -> ChunkColumn {
        let mut rng = chunk_rng(self.settings.seed, pos);
        let sea_level = self.settings.sea_level;

        let lattice = self.noise.sample(pos);
        let density = self.interpolator.interpolate(&lattice, &self.coarse_heights(pos));
        let mut voxels = rasterize(&density, COLUMN_HEIGHT);
        if self.settings.squish {
            voxels.squish();
        }

        let mut column = ChunkColumn::new(pos, COLUMN_HEIGHT);
        materialize(&voxels, &mut column, &self.blocks, sea_level);

        let feature = self.features.nearest_feature(pos);
        let deform = DeformContext {
            blocks: &self.blocks,
            sea_level,
        };
        deform_for_feature(&mut column, &feature, &mut rng, &deform);

        let mut biome_ids = [BiomeId(0); 256];
        for (i, id) in biome_ids.iter_mut().enumerate() {
            let (x, z) = ((i % 16) as i32, (i / 16) as i32);
            *id = self
                .biomes
                .biome_at(pos.min_block_x() + x, pos.min_block_z() + z);
        }

        let surface = SurfaceContext {
            blocks: self.blocks,
            sea_level,
            generate_bedrock: self.settings.generate_bedrock,
        };
        replace_biome_blocks(
            &mut column,
            &lattice.surface,
            |x, z| self.biomes.def(biome_ids[z * 16 + x]),
            self.surface.as_ref(),
            &mut rng,
            &surface,
        );

        self.features.generate(pos, Some(&mut column));

        for (i, id) in biome_ids.iter().enumerate() {
            column.set_biome(i % 16, i / 16, id.0);
        }

        tracing::trace!(
            chunk_x = pos.x,
            chunk_z = pos.z,
            feature = %feature.kind,
            "Generated chunk"
        );
        column
    }

    /// Run the structure hook for a chunk that was not generated here.
    pub fn recreate_structures(&self, pos: ChunkPos) {
        self.features.generate(pos, None);
    }

    // -----------------------------------------------------------------------
    // World queries
    // -----------------------------------------------------------------------

    /// Creatures that may spawn at `pos`.
    ///
    /// Inside a conquered feature nothing spawns. Inside a feature structure
    /// with its own spawn list, that list applies. Otherwise the biome decides,
    /// using its underground monster list below sea level.
    pub fn possible_creatures(&self, category: CreatureCategory, pos: IVec3) -> Vec<SpawnEntry> {
        let feature = self.features.feature_at(pos.x, pos.z);
        if !feature.is_nothing() {
            if self.features.is_structure_conquered(pos) {
                return Vec::new();
            }
            if let Some(index) = self.features.spawn_list_index_at(pos) {
                return self.features.spawn_list(feature.kind, category, index);
            }
        }

        let biome = self.biome_def_at(pos.x, pos.z);
        if pos.y < self.settings.sea_level && category == CreatureCategory::Monster {
            if let Some(underground) = &biome.underground_monsters {
                return underground.clone();
            }
        }
        biome.spawn_list(category).to_vec()
    }

    pub fn biome_def_at(&self, x: i32, z: i32) -> &BiomeDef {
        self.biomes.def(self.biomes.biome_at(x, z))
    }

    pub fn allow_surface_lakes(&self, biome: BiomeId) -> bool {
        self.biomes.def(biome).allows_surface_lakes()
    }

    pub fn should_generate_bedrock(&self) -> bool {
        self.settings.generate_bedrock
    }

    pub fn feature_at(&self, x: i32, z: i32) -> Feature {
        self.features.feature_at(x, z)
    }

    pub fn set_structure_conquered(&self, pos: IVec3, conquered: bool) {
        self.features.set_structure_conquered(pos, conquered);
    }

    pub fn is_structure_conquered(&self, pos: IVec3) -> bool {
        self.features.is_structure_conquered(pos)
    }

    pub fn is_structure_locked(&self, pos: IVec3, lock_index: u32) -> bool {
        self.features.is_structure_locked(pos, lock_index)
    }

    pub fn is_block_in_structure_bb(&self, pos: IVec3) -> bool {
        self.features.is_inside_structure(pos)
    }

    pub fn structure_box_at(&self, pos: IVec3) -> Option<BlockBox> {
        self.features.structure_box_at(pos)
    }

    pub fn is_block_protected(&self, pos: IVec3) -> bool {
        self.features.is_block_protected(pos)
    }

    pub fn is_block_in_full_structure(&self, x: i32, z: i32) -> bool {
        self.features.is_block_in_full_structure(x, z)
    }

    pub fn is_block_near_full_structure(&self, x: i32, z: i32, range: i32) -> bool {
        self.features.is_block_near_full_structure(x, z, range)
    }

    pub fn full_box_near(&self, x: i32, z: i32, range: i32) -> Option<BlockBox> {
        self.features.full_box_near(x, z, range)
    }

    /// Whether `pos` is inside the structure of the feature named `name`.
    pub fn is_inside_structure(&self, name: &str, pos: IVec3) -> bool {
        let kind = FeatureKind::from_name(name);
        kind != FeatureKind::Nothing
            && self.features.feature_at(pos.x, pos.z).kind == kind
            && self.features.is_inside_structure(pos)
    }

    /// Center of the closest feature named `name`.
    pub fn nearest_structure_pos(&self, name: &str, pos: IVec3) -> Option<IVec3> {
        match FeatureKind::from_name(name) {
            FeatureKind::Nothing => None,
            kind => self.features.nearest_structure_pos(kind, pos),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::biome::FixedBiomeSource;
    use crate::feature::FeatureMap;
    use crate::seed::hash_column;

    fn settings(seed: u64) -> WorldConfig {
        WorldConfig {
            seed,
            ..WorldConfig::default()
        }
    }

    fn fixed_forest(settings: WorldConfig, features: Arc<dyn FeatureIndex>) -> TerrainGenerator {
        let block_registry = Arc::new(BlockRegistry::with_terrain_blocks());
        let registry = Arc::new(default_biomes(&block_registry).unwrap());
        let forest = registry.lookup_by_name("forest").unwrap();
        let biomes = Arc::new(FixedBiomeSource::new(registry, forest));
        TerrainGenerator::new(settings, block_registry, biomes, features).unwrap()
    }

    fn region_center(rx: i32, rz: i32) -> IVec3 {
        IVec3::new(rx * 256 + 8, 31, rz * 256 + 8)
    }

    #[test]
    fn test_generation_is_deterministic() {
        let a = TerrainGenerator::standard(settings(0), Arc::new(FeatureMap::new())).unwrap();
        let b = TerrainGenerator::standard(settings(0), Arc::new(FeatureMap::new())).unwrap();
        for pos in [ChunkPos::new(0, 0), ChunkPos::new(-3, 7)] {
            assert_eq!(hash_column(&a.generate_chunk(pos)), hash_column(&b.generate_chunk(pos)));
        }
        let origin = ChunkPos::new(0, 0);
        assert_eq!(
            a.voxel_field(origin).is_solid(0, 63, 0),
            b.voxel_field(origin).is_solid(0, 63, 0)
        );
    }

    #[test]
    fn test_parallel_generation_matches_serial() {
        let generator = Arc::new(fixed_forest(settings(5), Arc::new(FeatureMap::new())));
        let pos = ChunkPos::new(2, -1);
        let serial = hash_column(&generator.generate_chunk(pos));
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let generator = Arc::clone(&generator);
                std::thread::spawn(move || hash_column(&generator.generate_chunk(pos)))
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), serial);
        }
    }

    #[test]
    fn test_neighbouring_chunks_share_boundary_densities() {
        let generator =
            TerrainGenerator::standard(settings(11), Arc::new(FeatureMap::new())).unwrap();
        let west = generator.density_field(ChunkPos::new(4, 4));
        let east = generator.density_field(ChunkPos::new(5, 4));
        for z in 0..5 {
            for y in 0..33 {
                assert_eq!(west.get(4, y, z), east.get(0, y, z));
            }
        }
    }

    #[test]
    fn test_squish_clears_upper_half() {
        let generator = fixed_forest(settings(1), Arc::new(FeatureMap::new()));
        let column = generator.generate_chunk(ChunkPos::new(0, 0));
        let stone = generator.blocks().stone;
        for x in 0..16 {
            for z in 0..16 {
                for y in 128..COLUMN_HEIGHT {
                    assert_ne!(column.get(x, y, z), stone);
                }
            }
        }
        assert!(column.count(stone) > 0);
    }

    #[test]
    fn test_bedrock_floor() {
        let generator = fixed_forest(settings(2), Arc::new(FeatureMap::new()));
        let column = generator.generate_chunk(ChunkPos::new(1, 1));
        let bedrock = generator.blocks().bedrock;
        assert!((0..16).all(|x| (0..16).all(|z| column.get(x, 0, z) == bedrock)));

        let no_bedrock = WorldConfig {
            generate_bedrock: false,
            ..settings(2)
        };
        let generator = fixed_forest(no_bedrock, Arc::new(FeatureMap::new()));
        assert!(!generator.should_generate_bedrock());
        assert_eq!(generator.generate_chunk(ChunkPos::new(1, 1)).count(bedrock), 0);
    }

    #[test]
    fn test_biome_array_filled() {
        let generator = fixed_forest(settings(3), Arc::new(FeatureMap::new()));
        let column = generator.generate_chunk(ChunkPos::new(0, 0));
        assert!(column.biomes().iter().all(|&id| id == 0));
        assert!(generator.allow_surface_lakes(BiomeId(0)));
        assert!(!generator.allow_surface_lakes(BiomeId(1)));
    }

    #[test]
    fn test_hill_raises_terrain() {
        let mut map = FeatureMap::new();
        map.insert(Feature::new(FeatureKind::LargeHill, region_center(0, 0)));
        let with_hill = fixed_forest(settings(4), Arc::new(map));
        let plain = fixed_forest(settings(4), Arc::new(FeatureMap::new()));

        let pos = ChunkPos::new(0, 0);
        let raised = with_hill.generate_chunk(pos);
        let flat = plain.generate_chunk(pos);
        let top = |column: &ChunkColumn| column.top_matching(8, 8, |id| !id.is_air());
        assert!(top(&raised) > top(&flat));
    }

    #[test]
    fn test_features_stay_inside_their_footprint() {
        let plain = fixed_forest(settings(4), Arc::new(FeatureMap::new()));
        for kind in [FeatureKind::SmallHill, FeatureKind::HedgeMaze] {
            let mut map = FeatureMap::new();
            map.insert(Feature::new(kind, region_center(0, 0)));
            let shaped = fixed_forest(settings(4), Arc::new(map));

            let far = ChunkPos::new(6, 0);
            assert_eq!(shaped.generate_chunk(far), plain.generate_chunk(far), "{kind}");
            assert!(shaped.feature_at(6 * 16 + 8, 8).is_nothing());

            let center = ChunkPos::new(0, 0);
            assert_ne!(shaped.generate_chunk(center), plain.generate_chunk(center), "{kind}");
        }
    }

    #[test]
    fn test_structure_hook_runs() {
        let mut map = FeatureMap::new();
        map.insert(Feature::new(FeatureKind::SmallHill, region_center(0, 0)));
        let map = Arc::new(map);
        let generator = fixed_forest(settings(6), map.clone());
        let pos = ChunkPos::new(1, 1);
        generator.generate_chunk(pos);
        assert!(map.is_prepared(pos));
        generator.recreate_structures(ChunkPos::new(-1, 0));
        assert!(map.is_prepared(ChunkPos::new(-1, 0)));

        // Featureless chunks leave no trace.
        generator.generate_chunk(ChunkPos::new(9, 9));
        assert!(!map.is_prepared(ChunkPos::new(9, 9)));
    }

    #[test]
    fn test_possible_creatures() {
        let mut map = FeatureMap::new();
        let labyrinth = Feature::new(FeatureKind::Labyrinth, region_center(1, 0));
        map.insert(labyrinth);
        let generator = fixed_forest(settings(7), Arc::new(map));

        // Surface of a plain region: the biome list.
        let surface = generator.possible_creatures(CreatureCategory::Monster, IVec3::new(0, 60, 0));
        assert!(surface.iter().any(|e| e.creature == "spider"));
        assert!(!surface.iter().any(|e| e.creature == "kobold"));

        // Below sea level: the underground list.
        let caves = generator.possible_creatures(CreatureCategory::Monster, IVec3::new(0, 10, 0));
        assert!(caves.iter().any(|e| e.creature == "kobold"));

        // Non-monster categories ignore depth.
        let animals =
            generator.possible_creatures(CreatureCategory::Creature, IVec3::new(0, 10, 0));
        assert!(animals.iter().any(|e| e.creature == "deer"));

        // Inside the labyrinth: its own lists.
        let inside = generator.possible_creatures(CreatureCategory::Monster, labyrinth.center);
        assert!(inside.iter().any(|e| e.creature == "minotaur"));

        generator.set_structure_conquered(labyrinth.center, true);
        assert!(generator.is_structure_conquered(labyrinth.center));
        assert!(
            generator
                .possible_creatures(CreatureCategory::Monster, labyrinth.center)
                .is_empty()
        );
    }

    #[test]
    fn test_structure_queries_by_name() {
        let mut map = FeatureMap::new();
        let maze = Feature::new(FeatureKind::HedgeMaze, region_center(0, 1));
        map.insert(maze);
        let generator = fixed_forest(settings(8), Arc::new(map));

        assert!(generator.is_inside_structure("hedge_maze", maze.center));
        assert!(!generator.is_inside_structure("lich_tower", maze.center));
        assert!(!generator.is_inside_structure("hollow_tree", maze.center));
        assert!(generator.is_block_in_structure_bb(maze.center));
        assert!(generator.is_block_protected(maze.center));
        assert_eq!(generator.nearest_structure_pos("hedge_maze", IVec3::ZERO), Some(maze.center));
        assert_eq!(generator.nearest_structure_pos("no_such_thing", IVec3::ZERO), None);
        assert_eq!(generator.feature_at(maze.center.x, maze.center.z), maze);
        assert!(generator.is_block_in_full_structure(maze.center.x, maze.center.z));
        assert!(generator.full_box_near(maze.center.x, maze.center.z, 0).is_some());
        assert!(!generator.is_structure_locked(maze.center, 0));
        assert!(generator.structure_box_at(maze.center).is_some());
        assert!(generator.is_block_near_full_structure(maze.center.x + 50, maze.center.z, 16));
    }

    #[test]
    fn test_invalid_settings_rejected() {
        let bad = WorldConfig {
            sea_level: 0,
            ..WorldConfig::default()
        };
        assert!(matches!(
            TerrainGenerator::standard(bad, Arc::new(FeatureMap::new())),
            Err(TerrainError::Settings(_))
        ));
    }

    #[test]
    fn test_missing_blocks_rejected() {
        let block_registry = Arc::new(BlockRegistry::with_terrain_blocks());
        let registry = Arc::new(default_biomes(&block_registry).unwrap());
        let biomes = Arc::new(FixedBiomeSource::new(registry, BiomeId(0)));
        let result = TerrainGenerator::new(
            WorldConfig::default(),
            Arc::new(BlockRegistry::new()),
            biomes,
            Arc::new(FeatureMap::new()),
        );
        assert!(matches!(result, Err(TerrainError::MissingBlock(_))));
    }

    #[test]
    fn test_empty_biome_registry_rejected() {
        let biomes = Arc::new(FixedBiomeSource::new(
            Arc::new(crate::biome::BiomeRegistry::new()),
            BiomeId(0),
        ));
        let result = TerrainGenerator::new(
            WorldConfig::default(),
            Arc::new(BlockRegistry::with_terrain_blocks()),
            biomes,
            Arc::new(FeatureMap::new()),
        );
        assert!(matches!(result, Err(TerrainError::EmptyBiomeRegistry)));
    }
}

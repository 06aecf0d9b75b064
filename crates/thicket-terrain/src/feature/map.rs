//! In-memory [`FeatureIndex`]: one feature per 16×16-chunk region.
//!
//! Region `r` is centered on chunk `r * 16`, so chunk `c` belongs to region
//! `(c + 8) >> 4` and a feature's center block is `r * 256 + 8`. Placement is
//! fixed at construction; conquered and lock flags change at runtime and are
//! kept in `DashMap`s so generation threads can read them concurrently.

use dashmap::{DashMap, DashSet};
use hashbrown::HashMap;
use rand::Rng;
use thicket_math::{BlockBox, ChunkPos, IVec3};
use thicket_voxel::ChunkColumn;

use super::{Feature, FeatureIndex, FeatureKind};
use crate::seed::chunk_rng;
use crate::spawn::{CreatureCategory, SpawnEntry, SpawnTable};

type RegionKey = (i32, i32);

/// Relative odds of each kind when scattering features.
const SCATTER_WEIGHTS: &[(FeatureKind, u32)] = &[
    (FeatureKind::Nothing, 6),
    (FeatureKind::SmallHill, 4),
    (FeatureKind::MediumHill, 3),
    (FeatureKind::LargeHill, 2),
    (FeatureKind::HedgeMaze, 2),
    (FeatureKind::NagaCourtyard, 1),
    (FeatureKind::LichTower, 1),
    (FeatureKind::IceTower, 1),
    (FeatureKind::QuestIsland, 1),
    (FeatureKind::QuestGrove, 1),
    (FeatureKind::DruidGrove, 1),
    (FeatureKind::Floaters, 1),
    (FeatureKind::WorldTree, 1),
    (FeatureKind::MushroomCave, 1),
    (FeatureKind::HydraLair, 1),
    (FeatureKind::Labyrinth, 1),
    (FeatureKind::DarkTower, 1),
    (FeatureKind::KnightStronghold, 1),
    (FeatureKind::YetiCave, 1),
    (FeatureKind::TrollCave, 1),
    (FeatureKind::FinalCastle, 1),
];

fn region_of_chunk(chunk: ChunkPos) -> RegionKey {
    ((chunk.x + 8) >> 4, (chunk.z + 8) >> 4)
}

fn region_of_block(x: i32, z: i32) -> RegionKey {
    region_of_chunk(ChunkPos::from_block(x, z))
}

fn region_center(region: RegionKey, y: i32) -> IVec3 {
    IVec3::new(region.0 * 256 + 8, y, region.1 * 256 + 8)
}

fn monsters(entries: &[(&str, u32, u32, u32)]) -> SpawnTable {
    SpawnTable::new().with(
        CreatureCategory::Monster,
        entries
            .iter()
            .map(|&(name, weight, min, max)| SpawnEntry::new(name, weight, min, max))
            .collect(),
    )
}

/// Spawn tables per kind; the vector index is the spawn-list index.
fn default_feature_spawns() -> HashMap<FeatureKind, Vec<SpawnTable>> {
    let mut spawns = HashMap::new();
    spawns.insert(
        FeatureKind::HedgeMaze,
        vec![monsters(&[
            ("spider", 10, 1, 2),
            ("swarm_spider", 10, 1, 2),
            ("hostile_wolf", 10, 1, 2),
        ])],
    );
    spawns.insert(
        FeatureKind::LichTower,
        vec![
            monsters(&[("zombie", 10, 1, 2), ("skeleton", 10, 1, 2), ("creeper", 1, 1, 2)]),
            monsters(&[("death_tome", 10, 1, 1)]),
        ],
    );
    spawns.insert(
        FeatureKind::HydraLair,
        vec![monsters(&[("mosquito_swarm", 10, 1, 1)])],
    );
    spawns.insert(
        FeatureKind::Labyrinth,
        vec![
            monsters(&[("minotaur", 20, 2, 3), ("cave_spider", 10, 2, 4), ("slime", 10, 4, 4)]),
            monsters(&[
                ("minotaur", 10, 1, 2),
                ("maze_slime", 10, 4, 4),
                ("fire_beetle", 10, 2, 4),
            ]),
        ],
    );
    spawns.insert(
        FeatureKind::DarkTower,
        vec![monsters(&[("carminite_golem", 10, 1, 4), ("carminite_ghastling", 10, 1, 2)])],
    );
    spawns.insert(
        FeatureKind::KnightStronghold,
        vec![monsters(&[("blockchain_goblin", 10, 4, 4), ("goblin_knight_lower", 5, 1, 2)])],
    );
    spawns.insert(
        FeatureKind::YetiCave,
        vec![monsters(&[("yeti", 10, 1, 4)])],
    );
    spawns.insert(
        FeatureKind::IceTower,
        vec![monsters(&[("snow_guardian", 10, 1, 2), ("stable_ice_core", 10, 1, 2)])],
    );
    spawns.insert(
        FeatureKind::TrollCave,
        vec![
            monsters(&[("troll", 10, 1, 2)]),
            monsters(&[("troll", 10, 1, 2), ("ice_crystal", 5, 1, 2)]),
        ],
    );
    spawns
}

/// Feature placement held in memory.
pub struct FeatureMap {
    features: HashMap<RegionKey, Feature>,
    conquered: DashMap<RegionKey, bool>,
    locks: DashMap<(RegionKey, u32), bool>,
    /// Feature chunks the structure hook has run for. Bounded by the
    /// footprints of the placed features.
    prepared: DashSet<ChunkPos>,
    spawns: HashMap<FeatureKind, Vec<SpawnTable>>,
}

impl FeatureMap {
    /// Empty map: every query answers "nothing here".
    pub fn new() -> Self {
        Self {
            features: HashMap::new(),
            conquered: DashMap::new(),
            locks: DashMap::new(),
            prepared: DashSet::new(),
            spawns: default_feature_spawns(),
        }
    }

    /// Deterministically pick one feature per region within `radius` regions
    /// of the origin. Centers sit at height `sea_level`.
    pub fn scatter(world_seed: u64, sea_level: i32, radius: i32) -> Self {
        let total: u32 = SCATTER_WEIGHTS.iter().map(|&(_, w)| w).sum();
        let mut map = Self::new();

        for region in ChunkPos::new(0, 0).square_around(radius) {
            let key = (region.x, region.z);
            let mut rng = chunk_rng(world_seed, ChunkPos::new(region.x * 16, region.z * 16));
            let mut roll = rng.random_range(0..total);
            let kind = SCATTER_WEIGHTS
                .iter()
                .find(|&&(_, weight)| {
                    if roll < weight {
                        true
                    } else {
                        roll -= weight;
                        false
                    }
                })
                .map_or(FeatureKind::Nothing, |&(kind, _)| kind);

            if kind != FeatureKind::Nothing {
                map.insert(Feature::new(kind, region_center(key, sea_level)));
            }
        }

        tracing::debug!(regions = map.features.len(), radius, "Scattered features");
        map
    }

    /// Place `feature` in the region that contains its center.
    pub fn insert(&mut self, feature: Feature) {
        let key = region_of_block(feature.center.x, feature.center.z);
        self.features.insert(key, feature);
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Feature> {
        self.features.values()
    }

    pub fn set_structure_locked(&self, pos: IVec3, lock_index: u32, locked: bool) {
        self.locks.insert((region_of_block(pos.x, pos.z), lock_index), locked);
    }

    /// Whether [`FeatureIndex::generate`] has run for `chunk`.
    pub fn is_prepared(&self, chunk: ChunkPos) -> bool {
        self.prepared.contains(&chunk)
    }

    fn feature_in_region(&self, key: RegionKey) -> Option<&Feature> {
        self.features.get(&key)
    }
}

impl Default for FeatureMap {
    fn default() -> Self {
        Self::new()
    }
}

impl FeatureIndex for FeatureMap {
    fn nearest_feature(&self, chunk: ChunkPos) -> Feature {
        self.feature_in_region(region_of_chunk(chunk))
            .filter(|feature| feature.covers_chunk(chunk))
            .copied()
            .unwrap_or_else(Feature::nothing)
    }

    fn generate(&self, chunk: ChunkPos, column: Option<&mut ChunkColumn>) {
        let feature = self.nearest_feature(chunk);
        if feature.is_nothing() {
            return;
        }
        tracing::trace!(
            chunk_x = chunk.x,
            chunk_z = chunk.z,
            feature = %feature.kind,
            fresh = column.is_some(),
            "Prepared structure chunk"
        );
        self.prepared.insert(chunk);
    }

    fn structure_box_at(&self, pos: IVec3) -> Option<BlockBox> {
        self.feature_in_region(region_of_block(pos.x, pos.z))?
            .structure_box()
            .filter(|bb| bb.contains(pos))
    }

    fn full_box_near(&self, x: i32, z: i32, range: i32) -> Option<BlockBox> {
        let (rx, rz) = region_of_block(x, z);
        (-1..=1)
            .flat_map(|ox| (-1..=1).map(move |oz| (rx + ox, rz + oz)))
            .filter_map(|key| self.feature_in_region(key))
            .map(|feature| feature.bounding_box)
            .find(|bb| bb.expand_xz(range).contains_xz(x, z))
    }

    fn is_structure_conquered(&self, pos: IVec3) -> bool {
        self.conquered
            .get(&region_of_block(pos.x, pos.z))
            .is_some_and(|flag| *flag)
    }

    fn set_structure_conquered(&self, pos: IVec3, conquered: bool) {
        let key = region_of_block(pos.x, pos.z);
        if self.feature_in_region(key).is_none() {
            tracing::debug!(x = pos.x, z = pos.z, "No feature to mark conquered");
            return;
        }
        self.conquered.insert(key, conquered);
    }

    fn is_structure_locked(&self, pos: IVec3, lock_index: u32) -> bool {
        self.locks
            .get(&(region_of_block(pos.x, pos.z), lock_index))
            .is_some_and(|flag| *flag)
    }

    fn spawn_list_index_at(&self, pos: IVec3) -> Option<usize> {
        let feature = self.feature_in_region(region_of_block(pos.x, pos.z))?;
        let lists = self.spawns.get(&feature.kind)?;
        feature.structure_box()?.contains(pos).then_some(())?;
        let index = usize::from(pos.y < feature.center.y);
        Some(index.min(lists.len() - 1))
    }

    fn spawn_list(
        &self,
        kind: FeatureKind,
        category: CreatureCategory,
        index: usize,
    ) -> Vec<SpawnEntry> {
        self.spawns
            .get(&kind)
            .and_then(|lists| lists.get(index))
            .map(|table| table.get(category).to_vec())
            .unwrap_or_default()
    }

    fn nearest_structure_pos(&self, kind: FeatureKind, pos: IVec3) -> Option<IVec3> {
        self.features
            .values()
            .filter(|feature| feature.kind == kind)
            .map(|feature| feature.center)
            .min_by_key(|center| {
                let d = *center - pos;
                i64::from(d.x) * i64::from(d.x) + i64::from(d.z) * i64::from(d.z)
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map_with(kind: FeatureKind) -> (FeatureMap, Feature) {
        let mut map = FeatureMap::new();
        let feature = Feature::new(kind, region_center((1, -1), 31));
        map.insert(feature);
        (map, feature)
    }

    #[test]
    fn test_region_mapping() {
        assert_eq!(region_of_chunk(ChunkPos::new(-8, 7)), (0, 0));
        assert_eq!(region_of_chunk(ChunkPos::new(8, -9)), (1, -1));
        assert_eq!(region_center((1, -1), 31), IVec3::new(264, 31, -248));
    }

    #[test]
    fn test_nearest_feature_covers_footprint_only() {
        let (map, feature) = map_with(FeatureKind::SmallHill);
        assert_eq!(map.nearest_feature(ChunkPos::new(16, -16)), feature);
        assert_eq!(map.nearest_feature(ChunkPos::new(17, -17)), feature);
        assert_eq!(map.nearest_feature(ChunkPos::new(15, -15)), feature);
        // Same region, outside the size-1 footprint.
        assert!(map.nearest_feature(ChunkPos::new(18, -16)).is_nothing());
        assert!(map.nearest_feature(ChunkPos::new(23, -24)).is_nothing());
        assert!(map.nearest_feature(ChunkPos::new(0, 0)).is_nothing());
        assert_eq!(map.feature_at(264, -248), feature);
        assert!(map.feature_at(264 + 40, -248).is_nothing());
    }

    #[test]
    fn test_footprint_grows_with_size() {
        let (map, _) = map_with(FeatureKind::Labyrinth);
        assert!(!map.nearest_feature(ChunkPos::new(19, -13)).is_nothing());
        assert!(map.nearest_feature(ChunkPos::new(20, -16)).is_nothing());
    }

    #[test]
    fn test_scatter_is_deterministic() {
        let a = FeatureMap::scatter(12345, 31, 3);
        let b = FeatureMap::scatter(12345, 31, 3);
        for region in ChunkPos::new(0, 0).square_around(3) {
            let chunk = ChunkPos::new(region.x * 16, region.z * 16);
            assert_eq!(a.nearest_feature(chunk), b.nearest_feature(chunk));
        }
        assert!(!a.is_empty());
    }

    #[test]
    fn test_conquered_flag() {
        let (map, feature) = map_with(FeatureKind::HedgeMaze);
        let inside = feature.center;
        assert!(!map.is_structure_conquered(inside));
        assert!(map.is_block_protected(inside));
        map.set_structure_conquered(inside, true);
        assert!(map.is_structure_conquered(inside));
        assert!(!map.is_block_protected(inside));
        // Regions without a feature stay unconquered.
        map.set_structure_conquered(IVec3::ZERO, true);
        assert!(!map.is_structure_conquered(IVec3::ZERO));
    }

    #[test]
    fn test_structure_boxes() {
        let (map, feature) = map_with(FeatureKind::HedgeMaze);
        assert!(map.is_inside_structure(feature.center));
        let edge = feature.bounding_box.max;
        assert!(!map.is_inside_structure(edge));
        assert!(map.is_block_in_full_structure(edge.x, edge.z));
        assert!(!map.is_block_in_full_structure(edge.x + 1, edge.z));
        assert!(map.is_block_near_full_structure(edge.x + 4, edge.z, 4));
        assert_eq!(map.full_box_near(edge.x, edge.z, 0), Some(feature.bounding_box));
    }

    #[test]
    fn test_hills_have_no_structure_box() {
        let (map, feature) = map_with(FeatureKind::LargeHill);
        assert!(map.structure_box_at(feature.center).is_none());
        assert!(map.is_block_in_full_structure(feature.center.x, feature.center.z));
    }

    #[test]
    fn test_locks() {
        let (map, feature) = map_with(FeatureKind::DarkTower);
        assert!(!map.is_structure_locked(feature.center, 0));
        map.set_structure_locked(feature.center, 0, true);
        assert!(map.is_structure_locked(feature.center, 0));
        assert!(!map.is_structure_locked(feature.center, 1));
    }

    #[test]
    fn test_spawn_list_index_by_depth() {
        let (map, feature) = map_with(FeatureKind::Labyrinth);
        assert_eq!(map.spawn_list_index_at(feature.center), Some(0));
        assert_eq!(map.spawn_list_index_at(feature.center - IVec3::Y * 10), Some(1));
        assert_eq!(map.spawn_list_index_at(IVec3::ZERO), None);

        let (map, feature) = map_with(FeatureKind::YetiCave);
        assert_eq!(map.spawn_list_index_at(feature.center - IVec3::Y), Some(0));
    }

    #[test]
    fn test_spawn_lists() {
        let map = FeatureMap::new();
        let yeti = map.spawn_list(FeatureKind::YetiCave, CreatureCategory::Monster, 0);
        assert_eq!(yeti[0].creature, "yeti");
        assert!(map.spawn_list(FeatureKind::YetiCave, CreatureCategory::Creature, 0).is_empty());
        assert!(map.spawn_list(FeatureKind::YetiCave, CreatureCategory::Monster, 7).is_empty());
    }

    #[test]
    fn test_nearest_structure_pos() {
        let mut map = FeatureMap::new();
        let near = Feature::new(FeatureKind::LichTower, region_center((1, 0), 31));
        let far = Feature::new(FeatureKind::LichTower, region_center((-3, 0), 31));
        map.insert(near);
        map.insert(far);
        assert_eq!(
            map.nearest_structure_pos(FeatureKind::LichTower, IVec3::ZERO),
            Some(near.center)
        );
        assert_eq!(map.nearest_structure_pos(FeatureKind::TrollCave, IVec3::ZERO), None);
    }

    #[test]
    fn test_generate_marks_prepared() {
        let (map, _) = map_with(FeatureKind::SmallHill);
        let chunk = ChunkPos::new(16, -16);
        assert!(!map.is_prepared(chunk));
        map.generate(chunk, None);
        assert!(map.is_prepared(chunk));

        // Chunks away from every feature are not tracked.
        let empty = ChunkPos::new(0, 0);
        map.generate(empty, None);
        map.generate(ChunkPos::new(20, -16), None);
        assert!(!map.is_prepared(empty));
        assert!(!map.is_prepared(ChunkPos::new(20, -16)));
    }
}

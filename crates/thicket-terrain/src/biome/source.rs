//! Biome sources: where biomes sit on the world plane.

use std::sync::Arc;

use noise::{NoiseFn, Simplex};

use super::{BiomeDef, BiomeId, BiomeRegistry, WhittakerDiagram};

/// Read-only biome placement consumed by the generator.
///
/// Implementations must be pure functions of their construction inputs so
/// that chunks stay deterministic when generated on any thread.
pub trait BiomeSource: Send + Sync {
    /// Biome at a world block column.
    fn biome_at(&self, x: i32, z: i32) -> BiomeId;

    /// Biome at a coarse (4-block) lattice column.
    fn coarse_biome_at(&self, x: i32, z: i32) -> BiomeId {
        self.biome_at(x * 4, z * 4)
    }

    fn registry(&self) -> &BiomeRegistry;

    /// Definition for `id`; unknown ids resolve to the first biome.
    fn def(&self, id: BiomeId) -> &BiomeDef {
        self.registry().get_or_default(id)
    }
}

/// Temperature and moisture simplex fields fed into a [`WhittakerDiagram`].
pub struct WhittakerBiomeSource {
    registry: Arc<BiomeRegistry>,
    diagram: WhittakerDiagram,
    temp_noise: Simplex,
    moisture_noise: Simplex,
    /// Frequency for temperature noise. Lower values produce broader zones.
    pub temp_frequency: f64,
    /// Frequency for moisture noise.
    pub moisture_frequency: f64,
}

impl WhittakerBiomeSource {
    /// Temperature and moisture use different seeds derived from `seed` so
    /// they are decorrelated.
    pub fn new(seed: u64, registry: Arc<BiomeRegistry>, diagram: WhittakerDiagram) -> Self {
        Self {
            registry,
            diagram,
            temp_noise: Simplex::new(seed as u32),
            moisture_noise: Simplex::new(seed.wrapping_add(0xDEAD_BEEF) as u32),
            temp_frequency: 0.0021,
            moisture_frequency: 0.0017,
        }
    }

    /// Normalized `(temperature, moisture)` at a block column, both in `[0, 1]`.
    pub fn climate_at(&self, x: i32, z: i32) -> (f64, f64) {
        let (x, z) = (f64::from(x), f64::from(z));
        let temp_raw = self
            .temp_noise
            .get([x * self.temp_frequency, z * self.temp_frequency]);
        let moisture_raw = self
            .moisture_noise
            .get([x * self.moisture_frequency, z * self.moisture_frequency]);
        (
            ((temp_raw + 1.0) * 0.5).clamp(0.0, 1.0),
            ((moisture_raw + 1.0) * 0.5).clamp(0.0, 1.0),
        )
    }
}

impl BiomeSource for WhittakerBiomeSource {
    fn biome_at(&self, x: i32, z: i32) -> BiomeId {
        let (temperature, moisture) = self.climate_at(x, z);
        self.diagram.lookup(temperature, moisture)
    }

    fn registry(&self) -> &BiomeRegistry {
        &self.registry
    }
}

/// Same biome everywhere.
pub struct FixedBiomeSource {
    registry: Arc<BiomeRegistry>,
    biome: BiomeId,
}

impl FixedBiomeSource {
    pub fn new(registry: Arc<BiomeRegistry>, biome: BiomeId) -> Self {
        Self { registry, biome }
    }
}

impl BiomeSource for FixedBiomeSource {
    fn biome_at(&self, _x: i32, _z: i32) -> BiomeId {
        self.biome
    }

    fn registry(&self) -> &BiomeRegistry {
        &self.registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::biome::{default_biomes, default_diagram};
    use thicket_voxel::BlockRegistry;

    fn source(seed: u64) -> WhittakerBiomeSource {
        let blocks = BlockRegistry::with_terrain_blocks();
        let registry = Arc::new(default_biomes(&blocks).unwrap());
        let diagram = default_diagram(&registry);
        WhittakerBiomeSource::new(seed, registry, diagram)
    }

    #[test]
    fn test_deterministic() {
        let a = source(42);
        let b = source(42);
        for i in -50..50 {
            assert_eq!(a.biome_at(i * 37, i * -53), b.biome_at(i * 37, i * -53));
        }
    }

    #[test]
    fn test_coarse_matches_block_lookup() {
        let s = source(7);
        assert_eq!(s.coarse_biome_at(3, -5), s.biome_at(12, -20));
    }

    #[test]
    fn test_climate_in_unit_range() {
        let s = source(1);
        for i in 0..200 {
            let (t, m) = s.climate_at(i * 101, i * 59);
            assert!((0.0..=1.0).contains(&t));
            assert!((0.0..=1.0).contains(&m));
        }
    }

    #[test]
    fn test_varied_biomes_over_large_area() {
        let s = source(3);
        let mut seen = hashbrown::HashSet::new();
        for x in 0..40 {
            for z in 0..40 {
                seen.insert(s.biome_at(x * 64, z * 64));
            }
        }
        assert!(seen.len() > 1, "expected more than one biome, got {seen:?}");
    }

    #[test]
    fn test_fixed_source() {
        let blocks = BlockRegistry::with_terrain_blocks();
        let registry = Arc::new(default_biomes(&blocks).unwrap());
        let lake = registry.lookup_by_name("lake").unwrap();
        let s = FixedBiomeSource::new(registry, lake);
        assert_eq!(s.biome_at(-1000, 99), lake);
        assert_eq!(s.def(lake).name, "lake");
    }
}

//! Whittaker diagram: maps (temperature, moisture) pairs to biome IDs.

use super::BiomeId;

/// A rectangular region in temperature–moisture space mapped to a biome.
#[derive(Clone, Debug)]
pub struct WhittakerRegion {
    /// Minimum temperature (inclusive), in `[0.0, 1.0]`.
    pub temp_min: f64,
    /// Maximum temperature (exclusive), in `[0.0, 1.0]`.
    pub temp_max: f64,
    /// Minimum moisture (inclusive), in `[0.0, 1.0]`.
    pub moisture_min: f64,
    /// Maximum moisture (exclusive), in `[0.0, 1.0]`.
    pub moisture_max: f64,
    /// Biome assigned to points within this region.
    pub biome_id: BiomeId,
}

impl WhittakerRegion {
    fn contains(&self, temperature: f64, moisture: f64) -> bool {
        temperature >= self.temp_min
            && temperature < self.temp_max
            && moisture >= self.moisture_min
            && moisture < self.moisture_max
    }
}

/// Ordered list of regions; first match wins, `fallback` otherwise.
#[derive(Clone, Debug)]
pub struct WhittakerDiagram {
    pub regions: Vec<WhittakerRegion>,
    pub fallback: BiomeId,
}

impl WhittakerDiagram {
    /// Looks up the biome for a given temperature and moisture, both in `[0.0, 1.0]`.
    pub fn lookup(&self, temperature: f64, moisture: f64) -> BiomeId {
        self.regions
            .iter()
            .find(|region| region.contains(temperature, moisture))
            .map_or(self.fallback, |region| region.biome_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn diagram() -> WhittakerDiagram {
        WhittakerDiagram {
            regions: vec![
                WhittakerRegion {
                    temp_min: 0.0,
                    temp_max: 0.3,
                    moisture_min: 0.0,
                    moisture_max: 1.0,
                    biome_id: BiomeId(1),
                },
                WhittakerRegion {
                    temp_min: 0.3,
                    temp_max: 1.0,
                    moisture_min: 0.7,
                    moisture_max: 1.0,
                    biome_id: BiomeId(2),
                },
            ],
            fallback: BiomeId(0),
        }
    }

    #[test]
    fn test_first_match_wins() {
        let d = diagram();
        assert_eq!(d.lookup(0.1, 0.9), BiomeId(1));
        assert_eq!(d.lookup(0.5, 0.9), BiomeId(2));
    }

    #[test]
    fn test_fallback_outside_regions() {
        let d = diagram();
        assert_eq!(d.lookup(0.5, 0.2), BiomeId(0));
        // Upper bounds are exclusive.
        assert_eq!(d.lookup(1.0, 1.0), BiomeId(0));
    }
}

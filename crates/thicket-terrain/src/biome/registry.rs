//! Biome registry: maps [`BiomeId`] to [`BiomeDef`] with name-based lookup.

use hashbrown::HashMap;

use super::BiomeDef;

/// Unique identifier for a biome. Stored directly in the chunk biome array.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BiomeId(pub u8);

/// Errors that can occur when registering biomes.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum BiomeRegistryError {
    /// A biome with this name is already registered.
    #[error("duplicate biome name: {0}")]
    DuplicateName(String),
    /// Biome ids are one byte wide.
    #[error("biome registry is full (max 256 biomes)")]
    RegistryFull,
}

/// Stores all registered biome definitions with O(1) lookup by ID.
pub struct BiomeRegistry {
    biomes: Vec<BiomeDef>,
    name_to_id: HashMap<String, BiomeId>,
}

impl BiomeRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            biomes: Vec::new(),
            name_to_id: HashMap::new(),
        }
    }

    /// Registers a new biome definition, returning its assigned [`BiomeId`].
    ///
    /// # Errors
    ///
    /// Returns [`BiomeRegistryError::DuplicateName`] if a biome with the same
    /// name exists, or [`BiomeRegistryError::RegistryFull`] past 256 entries.
    pub fn register(&mut self, def: BiomeDef) -> Result<BiomeId, BiomeRegistryError> {
        if self.name_to_id.contains_key(&def.name) {
            return Err(BiomeRegistryError::DuplicateName(def.name.clone()));
        }
        let id = u8::try_from(self.biomes.len()).map_err(|_| BiomeRegistryError::RegistryFull)?;
        let id = BiomeId(id);
        self.name_to_id.insert(def.name.clone(), id);
        self.biomes.push(def);
        Ok(id)
    }

    pub fn get(&self, id: BiomeId) -> Option<&BiomeDef> {
        self.biomes.get(id.0 as usize)
    }

    /// Definition for `id`, or the first registered biome when `id` is unknown.
    ///
    /// # Panics
    ///
    /// Panics if the registry is empty. The generator refuses to build with an
    /// empty registry.
    pub fn get_or_default(&self, id: BiomeId) -> &BiomeDef {
        self.biomes.get(id.0 as usize).unwrap_or_else(|| &self.biomes[0])
    }

    /// Looks up a biome ID by name.
    pub fn lookup_by_name(&self, name: &str) -> Option<BiomeId> {
        self.name_to_id.get(name).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (BiomeId, &BiomeDef)> {
        self.biomes
            .iter()
            .enumerate()
            .map(|(i, def)| (BiomeId(i as u8), def))
    }

    /// Returns the number of registered biomes.
    pub fn len(&self) -> usize {
        self.biomes.len()
    }

    /// Returns `true` if no biomes are registered.
    pub fn is_empty(&self) -> bool {
        self.biomes.is_empty()
    }
}

impl Default for BiomeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use thicket_voxel::BlockId;

    fn def(name: &str) -> BiomeDef {
        BiomeDef::new(name, 0.1, 0.2, BlockId(1), BlockId(2))
    }

    #[test]
    fn test_register_and_lookup() {
        let mut reg = BiomeRegistry::new();
        let forest = reg.register(def("forest")).unwrap();
        let lake = reg.register(def("lake")).unwrap();
        assert_eq!(reg.lookup_by_name("lake"), Some(lake));
        assert_eq!(reg.get(forest).unwrap().name, "forest");
        assert_eq!(reg.len(), 2);
    }

    #[test]
    fn test_duplicate_rejected() {
        let mut reg = BiomeRegistry::new();
        reg.register(def("forest")).unwrap();
        assert_eq!(
            reg.register(def("forest")),
            Err(BiomeRegistryError::DuplicateName("forest".into()))
        );
    }

    #[test]
    fn test_registry_full() {
        let mut reg = BiomeRegistry::new();
        for i in 0..256 {
            reg.register(def(&format!("b{i}"))).unwrap();
        }
        assert_eq!(reg.register(def("overflow")), Err(BiomeRegistryError::RegistryFull));
    }

    #[test]
    fn test_unknown_id_falls_back_to_first() {
        let mut reg = BiomeRegistry::new();
        reg.register(def("forest")).unwrap();
        assert_eq!(reg.get_or_default(BiomeId(200)).name, "forest");
        assert!(reg.get(BiomeId(200)).is_none());
    }
}

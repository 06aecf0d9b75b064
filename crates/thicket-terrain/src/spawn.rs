//! Creature spawn lists attached to biomes and features.

use hashbrown::HashMap;

/// Broad spawn category a list is queried for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CreatureCategory {
    Monster,
    Creature,
    Ambient,
    WaterCreature,
}

impl CreatureCategory {
    pub const ALL: [CreatureCategory; 4] = [
        CreatureCategory::Monster,
        CreatureCategory::Creature,
        CreatureCategory::Ambient,
        CreatureCategory::WaterCreature,
    ];
}

/// One weighted spawn option.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SpawnEntry {
    /// Creature identifier, e.g. "skeleton".
    pub creature: String,
    pub weight: u32,
    pub min_group: u32,
    pub max_group: u32,
}

impl SpawnEntry {
    pub fn new(creature: impl Into<String>, weight: u32, min_group: u32, max_group: u32) -> Self {
        Self {
            creature: creature.into(),
            weight,
            min_group,
            max_group,
        }
    }
}

/// Spawn lists keyed by category. Missing categories are empty.
#[derive(Clone, Debug, Default)]
pub struct SpawnTable {
    lists: HashMap<CreatureCategory, Vec<SpawnEntry>>,
}

impl SpawnTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, category: CreatureCategory, entries: Vec<SpawnEntry>) -> Self {
        self.lists.insert(category, entries);
        self
    }

    pub fn set(&mut self, category: CreatureCategory, entries: Vec<SpawnEntry>) {
        self.lists.insert(category, entries);
    }

    pub fn get(&self, category: CreatureCategory) -> &[SpawnEntry] {
        self.lists.get(&category).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn total_weight(&self, category: CreatureCategory) -> u32 {
        self.get(category).iter().map(|e| e.weight).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_category_is_empty() {
        let table = SpawnTable::new().with(
            CreatureCategory::Creature,
            vec![SpawnEntry::new("deer", 15, 4, 5)],
        );
        assert!(table.get(CreatureCategory::Monster).is_empty());
        assert_eq!(table.get(CreatureCategory::Creature)[0].creature, "deer");
    }

    #[test]
    fn test_total_weight() {
        let mut table = SpawnTable::new();
        table.set(
            CreatureCategory::Monster,
            vec![SpawnEntry::new("spider", 10, 1, 4), SpawnEntry::new("zombie", 5, 1, 2)],
        );
        assert_eq!(table.total_weight(CreatureCategory::Monster), 15);
        assert_eq!(table.total_weight(CreatureCategory::Ambient), 0);
    }
}

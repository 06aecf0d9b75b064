//! The closed set of feature kinds and their static properties.

use std::fmt;
use std::str::FromStr;

/// Every kind of large feature a region can hold.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FeatureKind {
    /// No feature in this region.
    Nothing,
    SmallHill,
    MediumHill,
    LargeHill,
    HedgeMaze,
    NagaCourtyard,
    LichTower,
    IceTower,
    QuestIsland,
    QuestGrove,
    DruidGrove,
    Floaters,
    WorldTree,
    MushroomCave,
    HydraLair,
    Labyrinth,
    DarkTower,
    KnightStronghold,
    YetiCave,
    TrollCave,
    FinalCastle,
}

impl FeatureKind {
    pub const ALL: [FeatureKind; 21] = [
        FeatureKind::Nothing,
        FeatureKind::SmallHill,
        FeatureKind::MediumHill,
        FeatureKind::LargeHill,
        FeatureKind::HedgeMaze,
        FeatureKind::NagaCourtyard,
        FeatureKind::LichTower,
        FeatureKind::IceTower,
        FeatureKind::QuestIsland,
        FeatureKind::QuestGrove,
        FeatureKind::DruidGrove,
        FeatureKind::Floaters,
        FeatureKind::WorldTree,
        FeatureKind::MushroomCave,
        FeatureKind::HydraLair,
        FeatureKind::Labyrinth,
        FeatureKind::DarkTower,
        FeatureKind::KnightStronghold,
        FeatureKind::YetiCave,
        FeatureKind::TrollCave,
        FeatureKind::FinalCastle,
    ];

    /// Size in chunk-radius units; drives every deformer's extents.
    pub fn default_size(self) -> i32 {
        match self {
            FeatureKind::Nothing | FeatureKind::Floaters => 0,
            FeatureKind::SmallHill
            | FeatureKind::LichTower
            | FeatureKind::QuestIsland
            | FeatureKind::QuestGrove
            | FeatureKind::DruidGrove
            | FeatureKind::DarkTower => 1,
            FeatureKind::MediumHill
            | FeatureKind::HedgeMaze
            | FeatureKind::IceTower
            | FeatureKind::MushroomCave
            | FeatureKind::HydraLair
            | FeatureKind::YetiCave => 2,
            FeatureKind::LargeHill
            | FeatureKind::NagaCourtyard
            | FeatureKind::WorldTree
            | FeatureKind::Labyrinth
            | FeatureKind::KnightStronghold
            | FeatureKind::FinalCastle => 3,
            FeatureKind::TrollCave => 4,
        }
    }

    /// Kinds whose surroundings are reshaped during chunk generation.
    pub fn is_terrain_altered(self) -> bool {
        matches!(
            self,
            FeatureKind::SmallHill
                | FeatureKind::MediumHill
                | FeatureKind::LargeHill
                | FeatureKind::HedgeMaze
                | FeatureKind::NagaCourtyard
                | FeatureKind::QuestGrove
                | FeatureKind::HydraLair
                | FeatureKind::YetiCave
                | FeatureKind::TrollCave
        )
    }

    /// Kinds that place a structure with its own bounding box.
    pub fn has_structure(self) -> bool {
        !matches!(
            self,
            FeatureKind::Nothing
                | FeatureKind::SmallHill
                | FeatureKind::MediumHill
                | FeatureKind::LargeHill
                | FeatureKind::QuestIsland
                | FeatureKind::DruidGrove
                | FeatureKind::Floaters
                | FeatureKind::WorldTree
                | FeatureKind::MushroomCave
        )
    }

    pub fn name(self) -> &'static str {
        match self {
            FeatureKind::Nothing => "nothing",
            FeatureKind::SmallHill => "small_hollow_hill",
            FeatureKind::MediumHill => "medium_hollow_hill",
            FeatureKind::LargeHill => "large_hollow_hill",
            FeatureKind::HedgeMaze => "hedge_maze",
            FeatureKind::NagaCourtyard => "naga_courtyard",
            FeatureKind::LichTower => "lich_tower",
            FeatureKind::IceTower => "ice_tower",
            FeatureKind::QuestIsland => "quest_island",
            FeatureKind::QuestGrove => "quest_grove",
            FeatureKind::DruidGrove => "druid_grove",
            FeatureKind::Floaters => "floaters",
            FeatureKind::WorldTree => "world_tree",
            FeatureKind::MushroomCave => "mushroom_cave",
            FeatureKind::HydraLair => "hydra_lair",
            FeatureKind::Labyrinth => "labyrinth",
            FeatureKind::DarkTower => "dark_tower",
            FeatureKind::KnightStronghold => "knight_stronghold",
            FeatureKind::YetiCave => "yeti_lairs",
            FeatureKind::TrollCave => "troll_lairs",
            FeatureKind::FinalCastle => "final_castle",
        }
    }

    /// Case-insensitive name lookup. Unknown names map to [`FeatureKind::Nothing`].
    pub fn from_name(name: &str) -> FeatureKind {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(name))
            .unwrap_or(FeatureKind::Nothing)
    }
}

impl fmt::Display for FeatureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FeatureKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match Self::from_name(s) {
            FeatureKind::Nothing if !s.eq_ignore_ascii_case("nothing") => Err(s.to_string()),
            kind => Ok(kind),
        }
    }
}

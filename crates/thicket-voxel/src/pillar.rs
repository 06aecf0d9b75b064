//! Adjacency for merged pillar blocks.
//!
//! A pillar has an axis and two logical ends, `Up` and `Down`. Each end faces a
//! real direction depending on the axis, and the end is "merged" when the
//! neighbour in that direction is the same pillar block on the same axis.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thicket_math::IVec3;

use crate::registry::BlockId;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    X,
    Y,
    Z,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Facing {
    Down,
    Up,
    North,
    South,
    West,
    East,
}

/// Logical end of a pillar.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PillarLink {
    Up,
    Down,
}

impl Facing {
    /// Unit step toward the neighbour on this side (north is -Z).
    pub fn offset(self) -> IVec3 {
        match self {
            Facing::Down => IVec3::NEG_Y,
            Facing::Up => IVec3::Y,
            Facing::North => IVec3::NEG_Z,
            Facing::South => IVec3::Z,
            Facing::West => IVec3::NEG_X,
            Facing::East => IVec3::X,
        }
    }
}

impl FromStr for Axis {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "x" | "X" => Ok(Axis::X),
            "y" | "Y" => Ok(Axis::Y),
            "z" | "Z" => Ok(Axis::Z),
            other => Err(other.to_string()),
        }
    }
}

impl FromStr for PillarLink {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "up" => Ok(PillarLink::Up),
            "down" => Ok(PillarLink::Down),
            other => Err(other.to_string()),
        }
    }
}

/// Direction an end of a pillar faces for the given axis.
pub fn link_facing(link: PillarLink, axis: Axis) -> Facing {
    match (axis, link) {
        (Axis::X, PillarLink::Down) => Facing::West,
        (Axis::X, PillarLink::Up) => Facing::East,
        (Axis::Y, PillarLink::Down) => Facing::Down,
        (Axis::Y, PillarLink::Up) => Facing::Up,
        (Axis::Z, PillarLink::Down) => Facing::South,
        (Axis::Z, PillarLink::Up) => Facing::North,
    }
}

/// Resolves property names as stored in block-state strings.
///
/// An unrecognized combination is logged and falls back to the vertical
/// mapping, so generation never stops on bad state data.
pub fn resolve_link_facing(link: &str, axis: &str) -> Facing {
    match (link.parse::<PillarLink>(), axis.parse::<Axis>()) {
        (Ok(link), Ok(axis)) => link_facing(link, axis),
        (parsed_link, _) => {
            tracing::warn!(link, axis, "pillar facing helper had a problem, falling back to vertical");
            match parsed_link {
                Ok(PillarLink::Down) => Facing::Down,
                _ => Facing::Up,
            }
        }
    }
}

/// A placed pillar block.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PillarState {
    pub block: BlockId,
    pub axis: Axis,
}

impl PillarState {
    pub fn new(block: BlockId, axis: Axis) -> Self {
        Self { block, axis }
    }

    /// Same block on the same axis.
    pub fn can_connect(&self, other: &PillarState) -> bool {
        self.block == other.block && self.axis == other.axis
    }

    /// Whether the `Up` and `Down` ends merge with their neighbours.
    ///
    /// `neighbour` is queried with the world-space offset of each end and
    /// returns `None` where there is no pillar.
    pub fn merged_ends(&self, mut neighbour: impl FnMut(IVec3) -> Option<PillarState>) -> (bool, bool) {
        let mut merged = |link| {
            let offset = link_facing(link, self.axis).offset();
            neighbour(offset).is_some_and(|other| self.can_connect(&other))
        };
        (merged(PillarLink::Up), merged(PillarLink::Down))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_link_facing_table() {
        assert_eq!(link_facing(PillarLink::Down, Axis::X), Facing::West);
        assert_eq!(link_facing(PillarLink::Up, Axis::X), Facing::East);
        assert_eq!(link_facing(PillarLink::Down, Axis::Y), Facing::Down);
        assert_eq!(link_facing(PillarLink::Up, Axis::Y), Facing::Up);
        assert_eq!(link_facing(PillarLink::Down, Axis::Z), Facing::South);
        assert_eq!(link_facing(PillarLink::Up, Axis::Z), Facing::North);
    }

    #[test]
    fn test_resolve_from_names() {
        assert_eq!(resolve_link_facing("up", "z"), Facing::North);
        assert_eq!(resolve_link_facing("down", "x"), Facing::West);
    }

    #[test]
    fn test_resolve_unknown_falls_back() {
        assert_eq!(resolve_link_facing("down", "w"), Facing::Down);
        assert_eq!(resolve_link_facing("sideways", "y"), Facing::Up);
    }

    #[test]
    fn test_merged_ends_along_axis() {
        let pillar = PillarState::new(BlockId(5), Axis::X);
        let other_axis = PillarState::new(BlockId(5), Axis::Y);
        let (up, down) = pillar.merged_ends(|offset| match offset {
            o if o == IVec3::X => Some(pillar),
            o if o == IVec3::NEG_X => Some(other_axis),
            _ => None,
        });
        assert!(up);
        assert!(!down);
    }
}

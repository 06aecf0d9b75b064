//! Feature descriptors and the lookup interface the generator consumes.

use thicket_math::{BlockBox, ChunkPos, IVec3};
use thicket_voxel::{COLUMN_HEIGHT, ChunkColumn};

use super::FeatureKind;
use crate::spawn::{CreatureCategory, SpawnEntry};

/// One placed feature. Immutable once created; conquered and lock state live
/// in the [`FeatureIndex`] that owns it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Feature {
    pub kind: FeatureKind,
    pub size: i32,
    /// World-space center block.
    pub center: IVec3,
    /// Full horizontal extent, whole column height.
    pub bounding_box: BlockBox,
    pub terrain_altered: bool,
}

impl Feature {
    /// A feature of `kind` at its default size.
    pub fn new(kind: FeatureKind, center: IVec3) -> Self {
        Self::with_size(kind, kind.default_size(), center)
    }

    pub fn with_size(kind: FeatureKind, size: i32, center: IVec3) -> Self {
        let reach = (size * 2 + 1) * 8;
        Self {
            kind,
            size,
            center,
            bounding_box: BlockBox::column(
                center.x - reach,
                center.z - reach,
                center.x + reach,
                center.z + reach,
                COLUMN_HEIGHT as i32,
            ),
            terrain_altered: kind.is_terrain_altered(),
        }
    }

    /// The empty sentinel.
    pub fn nothing() -> Self {
        Self {
            kind: FeatureKind::Nothing,
            size: 0,
            center: IVec3::ZERO,
            bounding_box: BlockBox::new(IVec3::ZERO, IVec3::ZERO),
            terrain_altered: false,
        }
    }

    pub fn is_nothing(&self) -> bool {
        self.kind == FeatureKind::Nothing
    }

    /// Box of the placed structure, eight blocks inside the full extent.
    pub fn structure_box(&self) -> Option<BlockBox> {
        self.kind
            .has_structure()
            .then(|| self.bounding_box.expand_xz(-8))
    }

    /// Whether `chunk` lies within `size` chunks of the feature's center chunk.
    /// Only those chunks are shaped by the feature.
    pub fn covers_chunk(&self, chunk: ChunkPos) -> bool {
        !self.is_nothing()
            && ChunkPos::from_block(self.center.x, self.center.z).chebyshev_distance(chunk)
                <= self.size
    }

    /// Center relative to the minimum corner of `chunk`.
    pub fn local_center(&self, chunk: ChunkPos) -> (i32, i32) {
        (
            self.center.x - chunk.min_block_x(),
            self.center.z - chunk.min_block_z(),
        )
    }
}

/// World feature lookup, shared by every generation thread.
///
/// Structure state (conquered, locked) is only ever read and written through
/// this interface.
pub trait FeatureIndex: Send + Sync {
    /// Feature whose region contains `chunk`. [`Feature::nothing`] if none.
    fn nearest_feature(&self, chunk: ChunkPos) -> Feature;

    /// Feature whose region contains the block column `(x, z)`.
    fn feature_at(&self, x: i32, z: i32) -> Feature {
        self.nearest_feature(ChunkPos::from_block(x, z))
    }

    /// Structure hook run for every generated chunk. `column` is `None` when
    /// structures are being recreated for a chunk loaded from elsewhere.
    fn generate(&self, chunk: ChunkPos, column: Option<&mut ChunkColumn>);

    /// Structure box containing `pos`, if any.
    fn structure_box_at(&self, pos: IVec3) -> Option<BlockBox>;

    fn is_inside_structure(&self, pos: IVec3) -> bool {
        self.structure_box_at(pos).is_some()
    }

    /// Whether the block column lies in a feature's full extent.
    fn is_block_in_full_structure(&self, x: i32, z: i32) -> bool {
        self.full_box_near(x, z, 0).is_some()
    }

    fn is_block_near_full_structure(&self, x: i32, z: i32, range: i32) -> bool {
        self.full_box_near(x, z, range).is_some()
    }

    /// Full extent of a feature within `range` blocks of `(x, z)`.
    fn full_box_near(&self, x: i32, z: i32, range: i32) -> Option<BlockBox>;

    fn is_structure_conquered(&self, pos: IVec3) -> bool;

    fn set_structure_conquered(&self, pos: IVec3, conquered: bool);

    fn is_structure_locked(&self, pos: IVec3, lock_index: u32) -> bool;

    /// Blocks inside an unconquered structure are protected from players.
    fn is_block_protected(&self, pos: IVec3) -> bool {
        self.is_inside_structure(pos) && !self.is_structure_conquered(pos)
    }

    /// Index of the structure spawn list that applies at `pos`.
    fn spawn_list_index_at(&self, pos: IVec3) -> Option<usize>;

    fn spawn_list(
        &self,
        kind: FeatureKind,
        category: CreatureCategory,
        index: usize,
    ) -> Vec<SpawnEntry>;

    /// Center of the closest feature of `kind`.
    fn nearest_structure_pos(&self, kind: FeatureKind, pos: IVec3) -> Option<IVec3>;
}

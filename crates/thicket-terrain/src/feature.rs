//! Large features: their kinds, the lookup index, and the terrain carving
//! applied around them.

mod cloud;
mod deform;
mod index;
mod kind;
mod map;

pub use cloud::{CLOUD_TOP, cloud_layer};
pub use deform::{
    DeformContext, DeformShape, HillProfile, LairProfile, deform_for_feature, flatten_height,
    lair_profile,
};
pub use index::{Feature, FeatureIndex};
pub use kind::FeatureKind;
pub use map::FeatureMap;

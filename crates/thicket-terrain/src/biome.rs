//! Biome system: definitions, the registry, and the sources that place
//! biomes on the world plane.
//!
//! The generator only consumes biomes through [`BiomeSource`]; the Whittaker
//! source and preset table here are the defaults used by the CLI and tests.

mod def;
mod diagram;
mod presets;
mod registry;
mod source;

pub use def::BiomeDef;
pub use diagram::{WhittakerDiagram, WhittakerRegion};
pub use presets::{default_biomes, default_diagram};
pub use registry::{BiomeId, BiomeRegistry, BiomeRegistryError};
pub use source::{BiomeSource, FixedBiomeSource, WhittakerBiomeSource};

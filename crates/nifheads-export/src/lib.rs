//! nifheads export pipeline
//!
//! Turns decoded scene graphs into a portable JSON mesh document:
//! - root filtering and shape gathering ([`SceneCollector`])
//! - shape flattening ([`ShapeExporter`])
//! - case-insensitive texture lookup with DDS preference ([`TextureIndex`])
//! - PNG texture conversion ([`TextureConverter`])
//! - JSON document output ([`JsonExporter`])
//!
//! [`Pipeline`] runs all of them over a scene directory and a texture
//! directory.

pub mod collect;
pub mod json;
pub mod pipeline;
pub mod shape;
pub mod textures;

pub use collect::{CollectOutcome, RootDecision, RootFilter, SceneCollector, ShapeCollection};
pub use json::{JsonExportOptions, JsonExporter};
pub use pipeline::{Pipeline, PipelineOptions, PipelineReport, RootCallback, UnresolvedAsset};
pub use shape::{Shape, ShapeExporter, ShapeId, Texture, TextureAssignments};
pub use textures::{
    png_file_name, ConvertedTexture, Resolution, ResolutionKind, ResolutionStats,
    TextureConverter, TextureIndex,
};

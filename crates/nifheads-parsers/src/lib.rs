//! nifheads-parsers
//!
//! Typed scene-graph model for legacy NIF files, plus the decoders that
//! produce it.
//!
//! # Supported Inputs
//!
//! | Format     | Extension        | Description |
//! |------------|------------------|-------------|
//! | Scene dump | `.yaml` / `.yml` | YAML dump of a NIF block tree |
//! | Scene dump | `.json`          | JSON dump of a NIF block tree |
//!
//! Further formats plug in by implementing [`SceneDecoder`] and registering
//! the decoder with a [`DecoderRegistry`].
//!
//! # Example
//!
//! ```rust,ignore
//! use nifheads_parsers::{DecoderRegistry, SceneObject};
//!
//! let registry = DecoderRegistry::with_builtin();
//! let decoder = registry.get_for_path(path)?;
//! let scene = decoder.decode_file(path)?;
//!
//! for root in &scene.roots {
//!     println!("{}", root.name());
//! }
//! ```

pub mod dump;
pub mod logging;
pub mod registry;
pub mod scene;
pub mod traits;

// Re-export main types
pub use traits::{ParseError, ParseResult, SceneDecoder, SharedDecoder};

pub use registry::{
    DecoderInfo, DecoderRegistration, DecoderRegistrationBuilder, DecoderRegistry, RegistryError,
};

pub use dump::{DumpSyntax, SceneDumpDecoder};
pub use scene::{
    ClampMode, NiNode, NiSourceTexture, NiTexturingProperty, NiTriShape, NiTriShapeData,
    Property, SceneFile, SceneNode, SceneObject, TexDesc,
};

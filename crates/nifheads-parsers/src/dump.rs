// nifheads-parsers/src/dump.rs
//! Scene-dump decoder
//!
//! Reads the textual scene dumps written by external NIF inspection tools.
//! A dump mirrors the block tree of the original file:
//!
//! ```yaml
//! roots:
//!   - type: NiNode
//!     name: Head_Female
//!     children:
//!       - type: NiTriShape
//!         name: Face
//!         translation: [0.0, 0.0, 1.5]
//!         rotation: [[1, 0, 0], [0, 1, 0], [0, 0, 1]]
//!         data:
//!           vertices: [[0, 0, 0], [1, 0, 0], [0, 1, 0]]
//!           normals: [[0, 0, 1], [0, 0, 1], [0, 0, 1]]
//!           uv_sets: [[[0, 0], [1, 0], [0, 1]]]
//!           triangles: [[0, 1, 2]]
//!         properties:
//!           - type: NiMaterialProperty
//!           - type: NiTexturingProperty
//!             base_texture:
//!               clamp_mode: 3
//!               uv_set: 0
//!               source: { file_name: Face.tga }
//! ```
//!
//! JSON dumps use the same structure. Block types other than `NiNode`,
//! `NiTriShape` and `NiTexturingProperty` decode as ignored placeholders.

use std::io::Read;

use tracing::debug;

use crate::scene::SceneFile;
use crate::traits::{ParseError, ParseResult, SceneDecoder};

/// Syntax of a scene dump
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DumpSyntax {
    Yaml,
    Json,
}

impl DumpSyntax {
    /// Pick the syntax from a file extension; YAML is the fallback since it
    /// also accepts most JSON.
    pub fn from_extension(ext: Option<&str>) -> Self {
        match ext.map(str::to_lowercase).as_deref() {
            Some("json") => DumpSyntax::Json,
            _ => DumpSyntax::Yaml,
        }
    }

    fn label(self) -> &'static str {
        match self {
            DumpSyntax::Yaml => "YAML",
            DumpSyntax::Json => "JSON",
        }
    }
}

/// Decoder for YAML/JSON scene dumps
#[derive(Debug, Default)]
pub struct SceneDumpDecoder;

impl SceneDumpDecoder {
    /// Create a new dump decoder
    pub fn new() -> Self {
        Self
    }

    /// Decode a dump held in memory
    pub fn decode_str(&self, text: &str, syntax: DumpSyntax) -> ParseResult<SceneFile> {
        let scene: SceneFile = match syntax {
            DumpSyntax::Yaml => serde_yaml::from_str(text).map_err(|e| ParseError::Syntax {
                format: syntax.label(),
                message: e.to_string(),
            })?,
            DumpSyntax::Json => serde_json::from_str(text).map_err(|e| ParseError::Syntax {
                format: syntax.label(),
                message: e.to_string(),
            })?,
        };

        scene.validate().map_err(ParseError::InvalidStructure)?;

        debug!(
            roots = scene.roots.len(),
            shapes = scene.shape_count(),
            "Decoded scene dump"
        );

        Ok(scene)
    }
}

impl SceneDecoder for SceneDumpDecoder {
    fn name(&self) -> &str {
        "Scene Dump Decoder"
    }

    fn extensions(&self) -> &[&str] {
        &["yaml", "yml", "json"]
    }

    fn decode(&self, reader: &mut dyn Read, hint: Option<&str>) -> ParseResult<SceneFile> {
        let mut text = String::new();
        reader.read_to_string(&mut text)?;
        self.decode_str(&text, DumpSyntax::from_extension(hint))
    }
}

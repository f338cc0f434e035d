//! Shape records
//!
//! Flattens a decoded triangle-shape leaf into a self-contained geometry and
//! material record. Records are immutable once built; converted texture
//! paths are kept apart in [`TextureAssignments`] and merged when the
//! document is written.

use std::collections::HashMap;

use nifheads_core::{Mat3, Vec2, Vec3};
use nifheads_parsers::{NiTriShape, TexDesc};

/// Texture binding of an exported shape
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Texture {
    /// Referenced image, as named by the scene file
    pub file: String,
    /// Repeat along U
    pub wrap_s: bool,
    /// Repeat along V
    pub wrap_t: bool,
    /// UV channel to sample
    pub uv_set: u32,
}

impl Texture {
    /// Build from a texture slot descriptor
    pub fn from_desc(desc: &TexDesc) -> Self {
        Self {
            file: desc.source.file_name.clone(),
            wrap_s: desc.clamp_mode.wraps_s(),
            wrap_t: desc.clamp_mode.wraps_t(),
            uv_set: desc.uv_set,
        }
    }
}

/// Exported geometry and material record
#[derive(Debug, Clone, PartialEq)]
pub struct Shape {
    pub name: String,
    pub vertices: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub faces: Vec<[u32; 3]>,
    pub uv_sets: Vec<Vec<Vec2>>,
    /// Translation relative to the immediate parent
    pub translation: Vec3,
    /// Rotation relative to the immediate parent
    pub rotation: Mat3,
    /// `None` iff the source shape had no texturing property
    pub texture: Option<Texture>,
}

impl Shape {
    /// Largest face index, if there are faces
    pub fn max_face_index(&self) -> Option<u32> {
        self.faces.iter().flatten().copied().max()
    }
}

/// Converts triangle-shape leaves into [`Shape`] records
#[derive(Debug, Default, Clone, Copy)]
pub struct ShapeExporter;

impl ShapeExporter {
    /// Create a new shape exporter
    pub fn new() -> Self {
        Self
    }

    /// Export one shape leaf.
    ///
    /// The first texturing property in attachment order wins; later ones
    /// are ignored.
    pub fn export(&self, shape: &NiTriShape) -> Shape {
        let data = &shape.data;

        Shape {
            name: shape.name.clone(),
            vertices: data.vertices.clone(),
            normals: data.normals.clone(),
            faces: data.triangles.clone(),
            uv_sets: data.uv_sets.clone(),
            translation: shape.translation,
            rotation: shape.rotation,
            texture: shape
                .texturing_properties()
                .next()
                .map(|texturing| Texture::from_desc(&texturing.base_texture)),
        }
    }
}

/// Position of a shape inside the exported collection list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ShapeId {
    /// Index of the collection
    pub collection: usize,
    /// Index of the shape inside its collection
    pub shape: usize,
}

impl ShapeId {
    pub fn new(collection: usize, shape: usize) -> Self {
        Self { collection, shape }
    }
}

impl std::fmt::Display for ShapeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.collection, self.shape)
    }
}

/// Converted texture file per shape, applied at serialization time
#[derive(Debug, Clone, Default)]
pub struct TextureAssignments {
    files: HashMap<ShapeId, String>,
}

impl TextureAssignments {
    pub fn new() -> Self {
        Self::default()
    }

    /// Point a shape's texture at a converted file
    pub fn assign(&mut self, id: ShapeId, file: impl Into<String>) {
        self.files.insert(id, file.into());
    }

    /// Converted file for a shape, if any
    pub fn get(&self, id: ShapeId) -> Option<&str> {
        self.files.get(&id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

// nifheads-parsers/src/scene/shape.rs
//! Triangle-shape leaves and their geometry

use nifheads_core::{Mat3, Vec2, Vec3};
use serde::{Deserialize, Serialize};

use super::texturing::{NiTexturingProperty, Property};

/// Renderable triangle-shape leaf
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NiTriShape {
    /// Shape name
    #[serde(default)]
    pub name: String,
    /// Translation relative to the parent node
    #[serde(default)]
    pub translation: Vec3,
    /// Rotation relative to the parent node
    #[serde(default)]
    pub rotation: Mat3,
    /// Geometry, already expanded to triangles
    pub data: NiTriShapeData,
    /// Attached properties in block order
    #[serde(default)]
    pub properties: Vec<Property>,
}

impl NiTriShape {
    /// Create a shape with identity transform and no properties
    pub fn new(name: impl Into<String>, data: NiTriShapeData) -> Self {
        Self {
            name: name.into(),
            data,
            ..Default::default()
        }
    }

    /// Attach a property
    pub fn with_property(mut self, property: impl Into<Property>) -> Self {
        self.properties.push(property.into());
        self
    }

    /// Texturing properties in attachment order
    pub fn texturing_properties(&self) -> impl Iterator<Item = &NiTexturingProperty> {
        self.properties.iter().filter_map(Property::as_texturing)
    }
}

/// Triangle geometry
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NiTriShapeData {
    /// Vertex positions
    #[serde(default)]
    pub vertices: Vec<Vec3>,
    /// Per-vertex normals (empty or one per vertex)
    #[serde(default)]
    pub normals: Vec<Vec3>,
    /// UV channels, each with one coordinate per vertex
    #[serde(default)]
    pub uv_sets: Vec<Vec<Vec2>>,
    /// Triangle index triples into `vertices`
    #[serde(default)]
    pub triangles: Vec<[u32; 3]>,
}

impl NiTriShapeData {
    /// Get vertex count
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Get triangle count
    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// Get UV channel count
    pub fn uv_channel_count(&self) -> usize {
        self.uv_sets.len()
    }

    /// Largest index referenced by any triangle
    pub fn max_index(&self) -> Option<u32> {
        self.triangles.iter().flatten().copied().max()
    }

    /// Check index bounds and per-vertex buffer lengths
    pub fn validate(&self) -> Result<(), String> {
        let count = self.vertices.len();

        if let Some(max) = self.max_index() {
            if max as usize >= count {
                return Err(format!(
                    "triangle index {max} out of range for {count} vertices"
                ));
            }
        }

        if !self.normals.is_empty() && self.normals.len() != count {
            return Err(format!(
                "{} normals for {count} vertices",
                self.normals.len()
            ));
        }

        for (channel, uvs) in self.uv_sets.iter().enumerate() {
            if uvs.len() != count {
                return Err(format!(
                    "uv set {channel} has {} coordinates for {count} vertices",
                    uvs.len()
                ));
            }
        }

        Ok(())
    }
}

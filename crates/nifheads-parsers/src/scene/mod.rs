// nifheads-parsers/src/scene/mod.rs
//! Decoded NIF scene graph
//!
//! A NIF file decodes into a list of root objects. The export pipeline only
//! consumes a small part of the block zoo, so the graph is a closed set of
//! node kinds:
//!
//! ```text
//! SceneFile
//! └── roots: [SceneNode]
//!     ├── Group(NiNode)        children: [SceneNode]
//!     ├── TriShape(NiTriShape) data + properties: [Property]
//!     │                        ├── Texturing(NiTexturingProperty)
//!     │                        └── Other
//!     └── Other                ignored
//! ```

mod shape;
mod texturing;

pub use shape::{NiTriShape, NiTriShapeData};
pub use texturing::{ClampMode, NiSourceTexture, NiTexturingProperty, Property, TexDesc};

use nifheads_core::{Mat3, Vec3};
use serde::{Deserialize, Serialize};

/// One decoded scene file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SceneFile {
    /// Top-level objects, in file order
    #[serde(default)]
    pub roots: Vec<SceneNode>,
}

impl SceneFile {
    /// Create a scene file from its roots
    pub fn new(roots: Vec<SceneNode>) -> Self {
        Self { roots }
    }

    /// Total number of triangle shapes anywhere in the graph
    pub fn shape_count(&self) -> usize {
        fn count(node: &SceneNode) -> usize {
            let own = usize::from(node.as_shape().is_some());
            own + node.children().iter().map(count).sum::<usize>()
        }
        self.roots.iter().map(count).sum()
    }

    /// Check the geometry guarantees every decoder must uphold.
    ///
    /// Returns a description of the first offending shape.
    pub fn validate(&self) -> Result<(), String> {
        fn visit(node: &SceneNode) -> Result<(), String> {
            if let Some(shape) = node.as_shape() {
                shape
                    .data
                    .validate()
                    .map_err(|e| format!("shape '{}': {}", shape.name, e))?;
            }
            node.children().iter().try_for_each(visit)
        }
        self.roots.iter().try_for_each(visit)
    }
}

/// Capabilities the exporter needs from any scene-graph object
pub trait SceneObject {
    /// Decoded object name (empty for unnamed or unsupported objects)
    fn name(&self) -> &str;

    /// Child objects in native order (empty for leaves)
    fn children(&self) -> &[SceneNode];

    /// Geometry leaf view, if this object carries triangles
    fn as_shape(&self) -> Option<&NiTriShape>;

    /// Whether this object aggregates children
    fn is_group(&self) -> bool;
}

/// A node in the decoded scene graph
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SceneNode {
    /// Grouping node without geometry of its own, including the
    /// `NiNode` subclasses that only add behavior
    #[serde(
        rename = "NiNode",
        alias = "NiBSAnimationNode",
        alias = "NiBSParticleNode",
        alias = "NiBillboardNode",
        alias = "NiSwitchNode",
        alias = "NiLODNode",
        alias = "AvoidNode",
        alias = "RootCollisionNode"
    )]
    Group(NiNode),
    /// Triangle-shape leaf
    #[serde(rename = "NiTriShape")]
    TriShape(NiTriShape),
    /// Any block kind the exporter does not consume
    #[serde(other)]
    Other,
}

impl SceneObject for SceneNode {
    fn name(&self) -> &str {
        match self {
            SceneNode::Group(node) => &node.name,
            SceneNode::TriShape(shape) => &shape.name,
            SceneNode::Other => "",
        }
    }

    fn children(&self) -> &[SceneNode] {
        match self {
            SceneNode::Group(node) => &node.children,
            _ => &[],
        }
    }

    fn as_shape(&self) -> Option<&NiTriShape> {
        match self {
            SceneNode::TriShape(shape) => Some(shape),
            _ => None,
        }
    }

    fn is_group(&self) -> bool {
        matches!(self, SceneNode::Group(_))
    }
}

impl From<NiNode> for SceneNode {
    fn from(node: NiNode) -> Self {
        SceneNode::Group(node)
    }
}

impl From<NiTriShape> for SceneNode {
    fn from(shape: NiTriShape) -> Self {
        SceneNode::TriShape(shape)
    }
}

/// Grouping node
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NiNode {
    /// Node name
    #[serde(default)]
    pub name: String,
    /// Translation relative to the parent
    #[serde(default)]
    pub translation: Vec3,
    /// Rotation relative to the parent
    #[serde(default)]
    pub rotation: Mat3,
    /// Child objects
    #[serde(default)]
    pub children: Vec<SceneNode>,
}

impl NiNode {
    /// Create an empty group node
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Append a child object
    pub fn with_child(mut self, child: impl Into<SceneNode>) -> Self {
        self.children.push(child.into());
        self
    }
}

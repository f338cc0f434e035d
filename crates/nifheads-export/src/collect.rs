//! Scene root filtering and shape gathering
//!
//! Only roots whose name mentions one of the filter keywords are exported.
//! An accepted group root becomes one collection holding every triangle
//! shape below it, in depth-first pre-order. An accepted shape root becomes
//! a single-shape collection.

use std::fmt;

use nifheads_parsers::{SceneFile, SceneNode, SceneObject};
use serde::Serialize;
use tracing::debug;

use crate::shape::{Shape, ShapeExporter};

/// Keywords accepted by default
pub const DEFAULT_ROOT_KEYWORDS: &[&str] = &["hair", "head"];

/// Shapes gathered under one accepted scene root
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeCollection {
    pub name: String,
    pub shapes: Vec<Shape>,
}

impl ShapeCollection {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            shapes: Vec::new(),
        }
    }
}

/// Case-insensitive substring filter on root names
#[derive(Debug, Clone)]
pub struct RootFilter {
    keywords: Vec<String>,
}

impl RootFilter {
    /// Create a filter from keywords (matched case-insensitively)
    pub fn new<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            keywords: keywords
                .into_iter()
                .map(|k| k.as_ref().to_lowercase())
                .collect(),
        }
    }

    /// Check a root name against the keywords
    pub fn accepts(&self, name: &str) -> bool {
        let name = name.to_lowercase();
        self.keywords.iter().any(|k| name.contains(k.as_str()))
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }
}

impl Default for RootFilter {
    fn default() -> Self {
        Self::new(DEFAULT_ROOT_KEYWORDS)
    }
}

/// Filter verdict for one scene root
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RootDecision {
    pub name: String,
    pub accepted: bool,
}

/// Progress line form: `> name` when accepted, `  name` otherwise, lower-cased
impl fmt::Display for RootDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let marker = if self.accepted { '>' } else { ' ' };
        write!(f, "{marker} {}", self.name.to_lowercase())
    }
}

/// Result of collecting one scene file
#[derive(Debug, Clone, Default)]
pub struct CollectOutcome {
    /// Collections in root order
    pub collections: Vec<ShapeCollection>,
    /// One verdict per root, in root order
    pub decisions: Vec<RootDecision>,
}

/// Walks scene roots and gathers exported shapes
#[derive(Debug, Clone, Default)]
pub struct SceneCollector {
    filter: RootFilter,
    exporter: ShapeExporter,
}

impl SceneCollector {
    /// Create a collector with the default hair/head filter
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a collector with a custom root filter
    pub fn with_filter(filter: RootFilter) -> Self {
        Self {
            filter,
            exporter: ShapeExporter::new(),
        }
    }

    /// Collect every accepted root of a scene file
    pub fn collect(&self, scene: &SceneFile) -> CollectOutcome {
        let mut outcome = CollectOutcome::default();

        for root in &scene.roots {
            let name = root.name();
            let accepted = self.filter.accepts(name);
            outcome.decisions.push(RootDecision {
                name: name.to_string(),
                accepted,
            });

            if !accepted {
                debug!(root = name, "Skipping scene root");
                continue;
            }

            if let Some(collection) = self.collect_root(root) {
                debug!(
                    root = name,
                    shapes = collection.shapes.len(),
                    "Collected scene root"
                );
                outcome.collections.push(collection);
            }
        }

        outcome
    }

    /// Build the collection for one accepted root
    fn collect_root(&self, root: &SceneNode) -> Option<ShapeCollection> {
        if root.is_group() {
            let mut collection = ShapeCollection::new(root.name());
            for child in root.children() {
                self.visit(child, &mut collection.shapes);
            }
            Some(collection)
        } else {
            root.as_shape().map(|shape| ShapeCollection {
                name: root.name().to_string(),
                shapes: vec![self.exporter.export(shape)],
            })
        }
    }

    /// Depth-first pre-order walk in native child order
    fn visit(&self, node: &SceneNode, shapes: &mut Vec<Shape>) {
        if let Some(shape) = node.as_shape() {
            shapes.push(self.exporter.export(shape));
        }
        for child in node.children() {
            self.visit(child, shapes);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nifheads_core::Vec3;
    use nifheads_parsers::{NiNode, NiTriShape, NiTriShapeData};

    fn leaf(name: &str) -> NiTriShape {
        NiTriShape::new(
            name,
            NiTriShapeData {
                vertices: vec![Vec3::ZERO; 3],
                triangles: vec![[0, 1, 2]],
                ..Default::default()
            },
        )
    }

    fn shape_names(collection: &ShapeCollection) -> Vec<&str> {
        collection.shapes.iter().map(|s| s.name.as_str()).collect()
    }

    #[test]
    fn test_root_filter() {
        let filter = RootFilter::default();
        assert!(filter.accepts("Head_Female"));
        assert!(filter.accepts("_N_Imperial_M_HAIR03"));
        assert!(filter.accepts("ForeheadPlate"));
        assert!(!filter.accepts("Door01"));
        assert!(!filter.accepts("Torso"));
        assert!(!filter.accepts(""));
    }

    #[test]
    fn test_rejected_roots_produce_nothing() {
        let scene = SceneFile::new(vec![
            NiNode::new("Torso").with_child(leaf("Chest")).into(),
            leaf("Door01").into(),
        ]);

        let outcome = SceneCollector::new().collect(&scene);
        assert!(outcome.collections.is_empty());
        assert_eq!(outcome.decisions.len(), 2);
        assert!(outcome.decisions.iter().all(|d| !d.accepted));
    }

    #[test]
    fn test_depth_first_preorder() {
        let head = NiNode::new("Head")
            .with_child(leaf("a"))
            .with_child(
                NiNode::new("Jaw")
                    .with_child(leaf("b"))
                    .with_child(NiNode::new("Teeth").with_child(leaf("c"))),
            )
            .with_child(SceneNode::Other)
            .with_child(leaf("d"));

        let outcome = SceneCollector::new().collect(&SceneFile::new(vec![head.into()]));

        assert_eq!(outcome.collections.len(), 1);
        assert_eq!(outcome.collections[0].name, "Head");
        assert_eq!(shape_names(&outcome.collections[0]), ["a", "b", "c", "d"]);
    }

    #[test]
    fn test_shape_root_becomes_single_shape_collection() {
        let scene = SceneFile::new(vec![leaf("Hair02").into()]);
        let outcome = SceneCollector::new().collect(&scene);

        assert_eq!(outcome.collections.len(), 1);
        assert_eq!(outcome.collections[0].name, "Hair02");
        assert_eq!(shape_names(&outcome.collections[0]), ["Hair02"]);
    }

    #[test]
    fn test_collections_follow_root_order_without_dedup() {
        let shared = leaf("Shared");
        let scene = SceneFile::new(vec![
            NiNode::new("Hair").with_child(shared.clone()).into(),
            NiNode::new("Torso").with_child(leaf("x")).into(),
            NiNode::new("Head").with_child(shared).into(),
        ]);

        let outcome = SceneCollector::new().collect(&scene);
        let names: Vec<_> = outcome.collections.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["Hair", "Head"]);
        assert_eq!(outcome.collections[0].shapes, outcome.collections[1].shapes);
    }

    #[test]
    fn test_accepted_empty_group_still_emits_collection() {
        let scene = SceneFile::new(vec![NiNode::new("HeadEmpty").into()]);
        let outcome = SceneCollector::new().collect(&scene);

        assert_eq!(outcome.collections.len(), 1);
        assert!(outcome.collections[0].shapes.is_empty());
    }

    #[test]
    fn test_decision_progress_line() {
        let accepted = RootDecision { name: "Hair_Long".into(), accepted: true };
        let rejected = RootDecision { name: "Torso".into(), accepted: false };
        assert_eq!(accepted.to_string(), "> hair_long");
        assert_eq!(rejected.to_string(), "  torso");
    }

    #[test]
    fn test_custom_keywords() {
        let collector = SceneCollector::with_filter(RootFilter::new(["Beard"]));
        let scene = SceneFile::new(vec![leaf("BEARD01").into(), leaf("Hair01").into()]);

        let outcome = collector.collect(&scene);
        assert_eq!(outcome.collections.len(), 1);
        assert_eq!(outcome.collections[0].name, "BEARD01");
    }
}

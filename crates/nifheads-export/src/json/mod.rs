//! JSON mesh document export
//!
//! Writes collections as a single JSON array. Converted texture names from
//! [`TextureAssignments`] replace the referenced names as records are
//! serialized; the collections themselves are never modified.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use nifheads_core::{Error, Result, Vec2, Vec3};
use serde::Serialize;
use tracing::info;

use crate::collect::ShapeCollection;
use crate::shape::{Shape, ShapeId, TextureAssignments};

/// JSON export options
#[derive(Debug, Clone, Default)]
pub struct JsonExportOptions {
    /// Use pretty-print formatting
    pub pretty: bool,
}

#[derive(Serialize)]
struct CollectionRecord<'a> {
    name: &'a str,
    shapes: Vec<ShapeRecord<'a>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ShapeRecord<'a> {
    name: &'a str,
    vertices: &'a [Vec3],
    normals: &'a [Vec3],
    faces: &'a [[u32; 3]],
    uv_sets: &'a [Vec<Vec2>],
    translation: Vec3,
    rotation: [f32; 9],
    texture: Option<TextureRecord<'a>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TextureRecord<'a> {
    file: &'a str,
    wrap_s: bool,
    wrap_t: bool,
    uv_set: u32,
}

impl<'a> ShapeRecord<'a> {
    fn new(shape: &'a Shape, converted: Option<&'a str>) -> Self {
        Self {
            name: &shape.name,
            vertices: &shape.vertices,
            normals: &shape.normals,
            faces: &shape.faces,
            uv_sets: &shape.uv_sets,
            translation: shape.translation,
            rotation: shape.rotation.to_row_major(),
            texture: shape.texture.as_ref().map(|texture| TextureRecord {
                file: converted.unwrap_or(texture.file.as_str()),
                wrap_s: texture.wrap_s,
                wrap_t: texture.wrap_t,
                uv_set: texture.uv_set,
            }),
        }
    }
}

/// JSON document exporter
#[derive(Debug, Clone, Default)]
pub struct JsonExporter {
    options: JsonExportOptions,
}

impl JsonExporter {
    /// Create new exporter with default options
    pub fn new() -> Self {
        Self::default()
    }

    /// Create exporter with custom options
    pub fn with_options(options: JsonExportOptions) -> Self {
        Self { options }
    }

    /// Build the document as a JSON value
    pub fn document(
        &self,
        collections: &[ShapeCollection],
        assignments: &TextureAssignments,
    ) -> Result<serde_json::Value> {
        Ok(serde_json::to_value(records(collections, assignments))?)
    }

    /// Serialize the document into a writer
    pub fn to_writer<W: Write>(
        &self,
        writer: W,
        collections: &[ShapeCollection],
        assignments: &TextureAssignments,
    ) -> Result<()> {
        let records = records(collections, assignments);
        if self.options.pretty {
            serde_json::to_writer_pretty(writer, &records)?;
        } else {
            serde_json::to_writer(writer, &records)?;
        }
        Ok(())
    }

    /// Write the document to a file
    pub fn export(
        &self,
        collections: &[ShapeCollection],
        assignments: &TextureAssignments,
        output_path: impl AsRef<Path>,
    ) -> Result<()> {
        let output_path = output_path.as_ref();
        let file = File::create(output_path)
            .map_err(|e| Error::from(e).with_context(format!("Creating {}", output_path.display())))?;
        let mut writer = BufWriter::new(file);

        self.to_writer(&mut writer, collections, assignments)?;
        writer.flush()?;

        info!(
            path = %output_path.display(),
            collections = collections.len(),
            "Wrote mesh document"
        );
        Ok(())
    }
}

fn records<'a>(
    collections: &'a [ShapeCollection],
    assignments: &'a TextureAssignments,
) -> Vec<CollectionRecord<'a>> {
    collections
        .iter()
        .enumerate()
        .map(|(c, collection)| CollectionRecord {
            name: &collection.name,
            shapes: collection
                .shapes
                .iter()
                .enumerate()
                .map(|(s, shape)| ShapeRecord::new(shape, assignments.get(ShapeId::new(c, s))))
                .collect(),
        })
        .collect()
}

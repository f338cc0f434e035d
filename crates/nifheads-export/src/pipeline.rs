//! End-to-end export pipeline
//!
//! One run turns a directory of scene files and a directory of textures
//! into `<output>/<document_name>` plus `<output>/<texture_subdir>/*.png`.
//!
//! The run is split into phases. Scene files are decoded in parallel and
//! collected in file order. Texture references are then resolved against a
//! read-only [`TextureIndex`], each distinct PNG is converted once, and the
//! resulting file names are merged into the document at serialization time.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use nifheads_core::{Error, Result, ResultExt};
use nifheads_parsers::logging::instrument_decode;
use nifheads_parsers::{DecoderRegistry, SceneFile, SharedDecoder};
use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::collect::{RootDecision, RootFilter, SceneCollector, ShapeCollection, DEFAULT_ROOT_KEYWORDS};
use crate::json::{JsonExportOptions, JsonExporter};
use crate::shape::{ShapeId, TextureAssignments};
use crate::textures::{png_file_name, ResolutionStats, TextureConverter, TextureIndex};

/// Pipeline options
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    /// Texture output directory, relative to the output directory
    pub texture_subdir: String,
    /// Mesh document file name, relative to the output directory
    pub document_name: String,
    /// Abort on the first unresolved or unconvertible texture
    pub strict: bool,
    /// Decode scenes and convert textures on the rayon pool
    pub parallel: bool,
    /// Root name keywords (case-insensitive)
    pub root_keywords: Vec<String>,
    pub json: JsonExportOptions,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            texture_subdir: "textures".to_string(),
            document_name: "meshes.json".to_string(),
            strict: false,
            parallel: true,
            root_keywords: DEFAULT_ROOT_KEYWORDS.iter().map(|k| k.to_string()).collect(),
            json: JsonExportOptions::default(),
        }
    }
}

/// A texture the run could not deliver.
///
/// The shape keeps its originally referenced file name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnresolvedAsset {
    pub collection: String,
    pub shape: String,
    pub file: String,
    pub reason: String,
}

/// Summary of one pipeline run
#[derive(Debug, Clone, Default, Serialize)]
pub struct PipelineReport {
    /// Written mesh document
    pub document: PathBuf,
    /// Scene files decoded
    pub scene_files: usize,
    /// Files in the scene directory no decoder claimed
    pub skipped_files: Vec<PathBuf>,
    /// Filter verdict for every root, in file then root order
    pub roots: Vec<RootDecision>,
    pub collections: usize,
    pub shapes: usize,
    pub stats: ResolutionStats,
    /// Distinct PNG files written
    pub converted: usize,
    pub unresolved: Vec<UnresolvedAsset>,
}

impl PipelineReport {
    pub fn accepted_roots(&self) -> impl Iterator<Item = &str> {
        self.roots.iter().filter(|r| r.accepted).map(|r| r.name.as_str())
    }

    pub fn rejected_roots(&self) -> impl Iterator<Item = &str> {
        self.roots.iter().filter(|r| !r.accepted).map(|r| r.name.as_str())
    }

    pub fn is_complete(&self) -> bool {
        self.unresolved.is_empty()
    }
}

/// Called with each root verdict as soon as its scene file is collected
pub type RootCallback = Box<dyn Fn(&RootDecision) + Send + Sync>;

/// A shape waiting on a converted texture
struct PendingTexture {
    id: ShapeId,
    png: String,
}

/// Scene-to-JSON export pipeline
pub struct Pipeline {
    options: PipelineOptions,
    registry: DecoderRegistry,
    collector: SceneCollector,
    converter: TextureConverter,
    exporter: JsonExporter,
    on_root: Option<RootCallback>,
}

impl Pipeline {
    /// Create a pipeline with the built-in decoders
    pub fn new(options: PipelineOptions) -> Self {
        Self::with_registry(options, DecoderRegistry::with_builtin())
    }

    /// Create a pipeline with a custom decoder registry
    pub fn with_registry(options: PipelineOptions, registry: DecoderRegistry) -> Self {
        let collector = SceneCollector::with_filter(RootFilter::new(&options.root_keywords));
        let exporter = JsonExporter::with_options(options.json.clone());

        Self {
            options,
            registry,
            collector,
            converter: TextureConverter::new(),
            exporter,
            on_root: None,
        }
    }

    /// Report root verdicts while the run is still going
    pub fn on_root(mut self, callback: impl Fn(&RootDecision) + Send + Sync + 'static) -> Self {
        self.on_root = Some(Box::new(callback));
        self
    }

    pub fn options(&self) -> &PipelineOptions {
        &self.options
    }

    /// Run the whole export
    pub fn run(
        &self,
        scene_dir: impl AsRef<Path>,
        texture_dir: impl AsRef<Path>,
        output_dir: impl AsRef<Path>,
    ) -> Result<PipelineReport> {
        let (scene_dir, texture_dir, output_dir) =
            (scene_dir.as_ref(), texture_dir.as_ref(), output_dir.as_ref());
        let mut report = PipelineReport::default();

        // Both inputs must be readable before anything is written
        let index = TextureIndex::build(texture_dir)?;
        let files = list_files(scene_dir)?;

        let mut jobs = Vec::with_capacity(files.len());
        for path in files {
            match self.registry.get_for_path(&path) {
                Ok(decoder) => jobs.push((path, decoder)),
                Err(e) => {
                    warn!(path = %path.display(), "Skipping file: {e}");
                    report.skipped_files.push(path);
                }
            }
        }

        let scenes = self.decode_all(&jobs)?;
        report.scene_files = scenes.len();

        let mut collections = Vec::new();
        for scene in &scenes {
            let outcome = self.collector.collect(scene);
            if let Some(callback) = &self.on_root {
                for decision in &outcome.decisions {
                    callback(decision);
                }
            }
            report.roots.extend(outcome.decisions);
            collections.extend(outcome.collections.into_iter().map(|mut collection| {
                collection.name = collection.name.to_lowercase();
                collection
            }));
        }
        report.collections = collections.len();
        report.shapes = collections.iter().map(|c| c.shapes.len()).sum();
        info!(
            files = report.scene_files,
            collections = report.collections,
            shapes = report.shapes,
            "Collected scene roots"
        );

        let texture_out = output_dir.join(&self.options.texture_subdir);
        fs::create_dir_all(&texture_out).map_err(|source| Error::DirectoryUnavailable {
            path: texture_out.clone(),
            source,
        })?;

        let assignments = self.convert_textures(&collections, &index, &texture_out, &mut report)?;

        let document = output_dir.join(&self.options.document_name);
        self.exporter.export(&collections, &assignments, &document)?;
        report.document = document;

        Ok(report)
    }

    /// Decode every scene file, keeping file order
    fn decode_all(&self, jobs: &[(PathBuf, SharedDecoder)]) -> Result<Vec<SceneFile>> {
        let decode = |(path, decoder): &(PathBuf, SharedDecoder)| -> Result<SceneFile> {
            let name = path.display().to_string();
            instrument_decode(&name, || decoder.decode_file(path)).map_err(|e| Error::decode(path, e))
        };

        if self.options.parallel {
            jobs.par_iter().map(decode).collect()
        } else {
            jobs.iter().map(decode).collect()
        }
    }

    /// Resolve and convert every referenced texture.
    ///
    /// Each resolve call counts once in the report; each distinct PNG is
    /// written once.
    fn convert_textures(
        &self,
        collections: &[ShapeCollection],
        index: &TextureIndex,
        texture_out: &Path,
        report: &mut PipelineReport,
    ) -> Result<TextureAssignments> {
        let mut pending = Vec::new();
        let mut sources: BTreeMap<String, PathBuf> = BTreeMap::new();

        for (c, collection) in collections.iter().enumerate() {
            for (s, shape) in collection.shapes.iter().enumerate() {
                let Some(texture) = &shape.texture else {
                    continue;
                };

                let resolution = match index
                    .resolve(&texture.file)
                    .with_context(|| format!("{}/{}", collection.name, shape.name))
                {
                    Ok(resolution) => resolution,
                    Err(e) => {
                        self.recover(e, &collection.name, &shape.name, &texture.file, report)?;
                        continue;
                    }
                };

                report.stats.record(resolution.kind);
                let png = png_file_name(&resolution.path);
                debug!(
                    file = %texture.file,
                    source = %resolution.path.display(),
                    png = %png,
                    "Resolved texture"
                );

                // First shape in traversal order claims the PNG name
                let kept = sources.entry(png.clone()).or_insert_with(|| resolution.path.clone());
                if *kept != resolution.path {
                    let collision = Error::OutputCollision {
                        name: png,
                        kept: kept.clone(),
                        dropped: resolution.path,
                    };
                    let e = collision.with_context(format!("{}/{}", collection.name, shape.name));
                    self.recover(e, &collection.name, &shape.name, &texture.file, report)?;
                    continue;
                }

                pending.push(PendingTexture {
                    id: ShapeId::new(c, s),
                    png,
                });
            }
        }

        let convert = |(png, source): (&String, &PathBuf)| {
            let result = self
                .converter
                .convert(source, &texture_out.join(png))
                .with_context(|| format!("Converting {png}"));
            (png.clone(), result)
        };
        let results: Vec<_> = if self.options.parallel {
            sources.par_iter().map(convert).collect()
        } else {
            sources.iter().map(convert).collect()
        };

        let mut failed = BTreeMap::new();
        for (png, result) in results {
            match result {
                Ok(_) => report.converted += 1,
                Err(e) if self.options.strict || !e.is_recoverable() => return Err(e),
                Err(e) => {
                    warn!(png = %png, "Texture conversion failed: {e}");
                    failed.insert(png, e.to_string());
                }
            }
        }

        let mut assignments = TextureAssignments::new();
        for PendingTexture { id, png } in pending {
            match failed.get(&png) {
                Some(reason) => {
                    let collection = &collections[id.collection];
                    let shape = &collection.shapes[id.shape];
                    report.unresolved.push(UnresolvedAsset {
                        collection: collection.name.clone(),
                        shape: shape.name.clone(),
                        file: shape.texture.as_ref().map(|t| t.file.clone()).unwrap_or_default(),
                        reason: reason.clone(),
                    });
                }
                None => assignments.assign(id, png),
            }
        }

        info!(
            converted = report.converted,
            unresolved = report.unresolved.len(),
            new_dds = report.stats.new_dds,
            original_dds = report.stats.original_dds,
            original_non_dds = report.stats.original_non_dds,
            "Textures processed"
        );

        Ok(assignments)
    }

    /// Record a recoverable texture failure, or abort in strict mode
    fn recover(
        &self,
        err: Error,
        collection: &str,
        shape: &str,
        file: &str,
        report: &mut PipelineReport,
    ) -> Result<()> {
        if self.options.strict || !err.is_recoverable() {
            return Err(err);
        }

        warn!("{err}");
        report.unresolved.push(UnresolvedAsset {
            collection: collection.to_string(),
            shape: shape.to_string(),
            file: file.to_string(),
            reason: err.to_string(),
        });
        Ok(())
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new(PipelineOptions::default())
    }
}

/// Regular files of a directory, sorted by path
fn list_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let unavailable = |source| Error::DirectoryUnavailable {
        path: dir.to_path_buf(),
        source,
    };

    let mut files = Vec::new();
    for entry in fs::read_dir(dir).map_err(unavailable)? {
        let path = entry.map_err(unavailable)?.path();
        if path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

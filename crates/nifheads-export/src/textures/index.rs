//! Case-insensitive texture lookup
//!
//! Scene files reference textures by names that rarely match the texture
//! directory exactly: casing differs, and a compressed `.dds` copy usually
//! exists next to (or instead of) the referenced original. Resolution
//! prefers the `.dds` variant whenever one is present.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use nifheads_core::{Error, Result};
use serde::Serialize;
use tracing::{debug, trace};

const DDS_EXTENSION: &str = "dds";

/// How a reference was resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResolutionKind {
    /// Reference named a `.dds` file and it was found as-is
    OriginalDds,
    /// Reference named another format, a `.dds` variant was used instead
    NewDds,
    /// No `.dds` variant; the referenced file itself was used
    OriginalNonDds,
}

/// A resolved texture reference
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub path: PathBuf,
    pub kind: ResolutionKind,
}

/// Per-run resolution counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ResolutionStats {
    pub original_dds: usize,
    pub new_dds: usize,
    pub original_non_dds: usize,
}

impl ResolutionStats {
    /// Count one resolution
    pub fn record(&mut self, kind: ResolutionKind) {
        match kind {
            ResolutionKind::OriginalDds => self.original_dds += 1,
            ResolutionKind::NewDds => self.new_dds += 1,
            ResolutionKind::OriginalNonDds => self.original_non_dds += 1,
        }
    }

    /// Combine counters from another worker
    pub fn merge(mut self, other: Self) -> Self {
        self.original_dds += other.original_dds;
        self.new_dds += other.new_dds;
        self.original_non_dds += other.original_non_dds;
        self
    }

    pub fn total(&self) -> usize {
        self.original_dds + self.new_dds + self.original_non_dds
    }
}

impl FromIterator<ResolutionKind> for ResolutionStats {
    fn from_iter<I: IntoIterator<Item = ResolutionKind>>(iter: I) -> Self {
        let mut stats = Self::default();
        for kind in iter {
            stats.record(kind);
        }
        stats
    }
}

/// Lower-cased file name to path mapping over one texture directory.
///
/// Read-only after construction, so it can be shared across worker threads.
#[derive(Debug, Clone, Default)]
pub struct TextureIndex {
    files: HashMap<String, PathBuf>,
}

impl TextureIndex {
    /// Snapshot every regular file in `dir`
    pub fn build(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        let unavailable = |source| Error::DirectoryUnavailable {
            path: dir.to_path_buf(),
            source,
        };

        let mut paths = Vec::new();
        for entry in fs::read_dir(dir).map_err(unavailable)? {
            let path = entry.map_err(unavailable)?.path();
            if path.is_file() {
                paths.push(path);
            }
        }

        let index = Self::from_paths(paths);
        debug!(dir = %dir.display(), files = index.len(), "Indexed texture directory");
        Ok(index)
    }

    /// Build from a list of file paths.
    ///
    /// Paths are sorted first; on a case-insensitive name collision the
    /// later path wins.
    pub fn from_paths<I>(paths: I) -> Self
    where
        I: IntoIterator<Item = PathBuf>,
    {
        let mut paths: Vec<_> = paths.into_iter().collect();
        paths.sort();

        let mut files = HashMap::with_capacity(paths.len());
        for path in paths {
            if let Some(name) = path.file_name() {
                let key = name.to_string_lossy().to_lowercase();
                if let Some(previous) = files.insert(key, path) {
                    trace!(path = %previous.display(), "Texture shadowed by name collision");
                }
            }
        }

        Self { files }
    }

    /// Resolve a texture reference from a scene file.
    ///
    /// Only the last path component of `referenced` takes part in the
    /// lookup. A `.dds` variant of the name is preferred over the name
    /// itself.
    pub fn resolve(&self, referenced: &str) -> Result<Resolution> {
        let name = file_component(referenced).to_lowercase();
        let dds = dds_variant(&name);

        if let Some(path) = self.files.get(&dds) {
            let kind = if dds == name {
                ResolutionKind::OriginalDds
            } else {
                ResolutionKind::NewDds
            };
            return Ok(Resolution {
                path: path.clone(),
                kind,
            });
        }

        self.files
            .get(&name)
            .map(|path| Resolution {
                path: path.clone(),
                kind: ResolutionKind::OriginalNonDds,
            })
            .ok_or_else(|| Error::missing_asset(referenced))
    }

    /// Check for a file by (case-insensitive) name
    pub fn contains(&self, name: &str) -> bool {
        self.files.contains_key(&name.to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

/// Last component of a reference, accepting either separator
fn file_component(referenced: &str) -> &str {
    referenced
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(referenced)
}

/// Replace the text after the last `.` with `dds`, or append `.dds`
fn dds_variant(name: &str) -> String {
    match name.rfind('.') {
        Some(dot) => format!("{}.{DDS_EXTENSION}", &name[..dot]),
        None => format!("{name}.{DDS_EXTENSION}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn index(names: &[&str]) -> TextureIndex {
        TextureIndex::from_paths(names.iter().map(|n| Path::new("/tex").join(n)))
    }

    #[test]
    fn test_dds_variant() {
        assert_eq!(dds_variant("skin.tga"), "skin.dds");
        assert_eq!(dds_variant("skin.dds"), "skin.dds");
        assert_eq!(dds_variant("a.b.bmp"), "a.b.dds");
        assert_eq!(dds_variant("skin"), "skin.dds");
    }

    #[test]
    fn test_file_component() {
        assert_eq!(file_component("textures\\Actors\\Skin.TGA"), "Skin.TGA");
        assert_eq!(file_component("textures/hair.dds"), "hair.dds");
        assert_eq!(file_component("plain.bmp"), "plain.bmp");
    }

    #[test]
    fn test_dds_preferred_over_original() {
        let index = index(&["foo.tga", "foo.dds"]);
        let resolution = index.resolve("foo.tga").unwrap();

        assert_eq!(resolution.path, Path::new("/tex/foo.dds"));
        assert_eq!(resolution.kind, ResolutionKind::NewDds);
    }

    #[test]
    fn test_original_dds() {
        let resolution = index(&["Hair.DDS"]).resolve("hair.dds").unwrap();
        assert_eq!(resolution.path, Path::new("/tex/Hair.DDS"));
        assert_eq!(resolution.kind, ResolutionKind::OriginalDds);
    }

    #[test]
    fn test_original_non_dds() {
        let resolution = index(&["Eyes.bmp"]).resolve("textures\\EYES.BMP").unwrap();
        assert_eq!(resolution.path, Path::new("/tex/Eyes.bmp"));
        assert_eq!(resolution.kind, ResolutionKind::OriginalNonDds);
    }

    #[test]
    fn test_missing_asset() {
        let err = index(&["other.dds"]).resolve("Skin.tga").unwrap_err();
        assert!(matches!(err, Error::MissingAsset { ref name } if name == "Skin.tga"));
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_collision_last_sorted_path_wins() {
        let index = TextureIndex::from_paths(vec![
            PathBuf::from("/tex/b/SKIN.dds"),
            PathBuf::from("/tex/a/skin.dds"),
        ]);
        assert_eq!(index.len(), 1);
        assert_eq!(index.resolve("skin.dds").unwrap().path, Path::new("/tex/b/SKIN.dds"));
    }

    #[test]
    fn test_stats() {
        let stats: ResolutionStats = [
            ResolutionKind::NewDds,
            ResolutionKind::NewDds,
            ResolutionKind::OriginalNonDds,
        ]
        .into_iter()
        .collect();

        assert_eq!(stats.new_dds, 2);
        assert_eq!(stats.original_non_dds, 1);

        let mut other = ResolutionStats::default();
        other.record(ResolutionKind::OriginalDds);
        let merged = stats.merge(other);
        assert_eq!(merged.original_dds, 1);
        assert_eq!(merged.total(), 4);
    }

    #[test]
    fn test_build_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let err = TextureIndex::build(dir.path().join("absent")).unwrap_err();
        assert!(matches!(err, Error::DirectoryUnavailable { .. }));
        assert!(!err.is_recoverable());
    }

    #[test]
    fn test_build_skips_directories() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("Skin.dds"), b"x").unwrap();
        fs::create_dir(dir.path().join("nested.dds")).unwrap();

        let index = TextureIndex::build(dir.path()).unwrap();
        assert_eq!(index.len(), 1);
        assert!(index.contains("SKIN.DDS"));
        assert!(!index.contains("nested.dds"));
    }

    proptest! {
        #[test]
        fn prop_resolution_ignores_case(stem in "[a-zA-Z0-9_]{1,12}", ext in "(tga|bmp|dds|TGA|Dds)") {
            let index = index(&[format!("{stem}.{ext}").as_str()]);
            let lower = index.resolve(&format!("{stem}.{ext}").to_lowercase()).unwrap();
            let upper = index.resolve(&format!("{stem}.{ext}").to_uppercase()).unwrap();
            prop_assert_eq!(lower, upper);
        }

        #[test]
        fn prop_dds_variant_always_wins(stem in "[a-z0-9_]{1,12}", ext in "(tga|bmp|png|jpg)") {
            let index = index(&[format!("{stem}.{ext}").as_str(), format!("{stem}.dds").as_str()]);
            let resolution = index.resolve(&format!("{stem}.{ext}")).unwrap();
            prop_assert_eq!(resolution.kind, ResolutionKind::NewDds);
            prop_assert_eq!(resolution.path.extension().unwrap(), "dds");
        }

        #[test]
        fn prop_stats_order_independent(kinds in prop::collection::vec(0u8..3, 0..40)) {
            let kinds: Vec<_> = kinds
                .into_iter()
                .map(|k| match k {
                    0 => ResolutionKind::OriginalDds,
                    1 => ResolutionKind::NewDds,
                    _ => ResolutionKind::OriginalNonDds,
                })
                .collect();

            let forward: ResolutionStats = kinds.iter().copied().collect();
            let backward: ResolutionStats = kinds.iter().rev().copied().collect();
            prop_assert_eq!(forward, backward);
            prop_assert_eq!(forward.total(), kinds.len());
        }
    }
}

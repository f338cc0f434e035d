//! Texture lookup and conversion
//!
//! [`TextureIndex`] maps the names referenced by scene files onto the files
//! actually present in the texture directory. [`TextureConverter`] re-encodes
//! a resolved file as PNG.

mod converter;
mod index;

pub use converter::{ConvertedTexture, TextureConverter};
pub use index::{Resolution, ResolutionKind, ResolutionStats, TextureIndex};

use std::path::Path;

/// Extension of converted textures
pub const PNG_EXTENSION: &str = "png";

/// Output file name for a resolved source texture: the lower-cased base
/// name with a `.png` extension.
pub fn png_file_name(source: &Path) -> String {
    let stem = source
        .file_stem()
        .map(|s| s.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    format!("{stem}.{PNG_EXTENSION}")
}

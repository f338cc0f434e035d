//! Texture format converter
//!
//! Decodes a texture in whatever format its content declares (DDS, TGA,
//! BMP and friends) and re-encodes it as PNG.

use std::path::{Path, PathBuf};

use image::{ImageError, ImageFormat, ImageReader};
use nifheads_core::{Error, Result};
use tracing::debug;

/// A texture written by [`TextureConverter::convert`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertedTexture {
    pub source: PathBuf,
    pub dest: PathBuf,
    pub width: u32,
    pub height: u32,
}

/// PNG texture converter
#[derive(Debug, Default, Clone, Copy)]
pub struct TextureConverter;

impl TextureConverter {
    pub fn new() -> Self {
        Self
    }

    /// Decode `source` and write it to `dest` as PNG.
    ///
    /// The source format is guessed from content first, then from the
    /// extension for headerless formats such as TGA. Pixels are written
    /// unchanged.
    pub fn convert(&self, source: &Path, dest: &Path) -> Result<ConvertedTexture> {
        let image = ImageReader::open(source)?
            .with_guessed_format()?
            .decode()
            .map_err(|e| image_error(source, e))?;

        image
            .save_with_format(dest, ImageFormat::Png)
            .map_err(|e| image_error(dest, e))?;

        debug!(
            source = %source.display(),
            dest = %dest.display(),
            width = image.width(),
            height = image.height(),
            "Converted texture"
        );

        Ok(ConvertedTexture {
            source: source.to_path_buf(),
            dest: dest.to_path_buf(),
            width: image.width(),
            height: image.height(),
        })
    }
}

fn image_error(path: &Path, err: ImageError) -> Error {
    match err {
        ImageError::IoError(e) => Error::Io(e),
        other => Error::UnsupportedImageFormat {
            path: path.to_path_buf(),
            message: other.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    fn write_png(path: &Path, width: u32, height: u32) {
        let mut img = RgbaImage::new(width, height);
        img.put_pixel(0, 0, Rgba([255, 0, 0, 255]));
        img.save_with_format(path, ImageFormat::Png).unwrap();
    }

    #[test]
    fn test_format_detected_from_content() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("skin.dds");
        let dest = dir.path().join("skin.png");
        write_png(&source, 4, 2);

        let converted = TextureConverter::new().convert(&source, &dest).unwrap();
        assert_eq!((converted.width, converted.height), (4, 2));

        let decoded = image::open(&dest).unwrap().to_rgba8();
        assert_eq!(decoded.get_pixel(0, 0), &Rgba([255, 0, 0, 255]));
    }

    #[test]
    fn test_tga_source() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("Hair.tga");
        let dest = dir.path().join("hair.png");
        RgbaImage::new(3, 3)
            .save_with_format(&source, ImageFormat::Tga)
            .unwrap();

        TextureConverter::new().convert(&source, &dest).unwrap();
        assert_eq!(image::image_dimensions(&dest).unwrap(), (3, 3));
    }

    #[test]
    fn test_garbage_is_unsupported() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("broken.dds");
        std::fs::write(&source, b"not an image at all").unwrap();

        let err = TextureConverter::new()
            .convert(&source, &dir.path().join("broken.png"))
            .unwrap_err();
        assert!(matches!(err, Error::UnsupportedImageFormat { .. }));
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_missing_source_is_io() {
        let dir = tempfile::tempdir().unwrap();
        let err = TextureConverter::new()
            .convert(&dir.path().join("absent.dds"), &dir.path().join("absent.png"))
            .unwrap_err();
        assert!(err.is_not_found());
    }
}

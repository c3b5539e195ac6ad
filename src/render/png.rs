//! PNG encoding for composited frames.

use std::io::Cursor;
use std::path::Path;

use image::{ImageFormat, RgbaImage};

use crate::error::{AnigenError, Result};

/// Encode a frame as PNG bytes.
pub fn encode_png(frame: &RgbaImage) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    frame
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .map_err(|e| AnigenError::Encode {
            message: format!("Failed to encode PNG: {}", e),
        })?;
    Ok(bytes)
}

/// Write a frame to `path` as PNG, regardless of the path's extension.
pub fn write_png(frame: &RgbaImage, path: &Path) -> Result<()> {
    frame
        .save_with_format(path, ImageFormat::Png)
        .map_err(|e| AnigenError::Export {
            path: path.to_path_buf(),
            message: format!("Failed to write PNG: {}", e),
            help: Some("Check that the destination directory exists and is writable".to_string()),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;
    use tempfile::tempdir;

    #[test]
    fn test_write_png_with_transparency() {
        let frame = RgbaImage::from_fn(2, 1, |x, _| {
            if x == 0 {
                Rgba([0, 0, 0, 0])
            } else {
                Rgba([255, 0, 0, 128])
            }
        });

        let dir = tempdir().unwrap();
        let path = dir.path().join("alpha.png");
        write_png(&frame, &path).unwrap();

        let img = image::open(&path).unwrap().to_rgba8();
        assert_eq!(img.get_pixel(0, 0).0, [0, 0, 0, 0]);
        assert_eq!(img.get_pixel(1, 0).0, [255, 0, 0, 128]);
    }

    #[test]
    fn test_write_png_ignores_extension() {
        let frame = RgbaImage::new(3, 3);
        let dir = tempdir().unwrap();
        let path = dir.path().join("portrait.out");

        write_png(&frame, &path).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(image::guess_format(&bytes).unwrap(), ImageFormat::Png);
    }

    #[test]
    fn test_write_png_missing_directory_is_export_error() {
        let frame = RgbaImage::new(1, 1);
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing").join("anigen.png");

        let err = write_png(&frame, &path).unwrap_err();
        assert!(matches!(err, AnigenError::Export { .. }));
    }

    #[test]
    fn test_encode_png_decodes_back() {
        let frame = RgbaImage::from_pixel(5, 4, Rgba([1, 2, 3, 4]));

        let bytes = encode_png(&frame).unwrap();
        let decoded = image::load_from_memory(&bytes).unwrap().to_rgba8();

        assert_eq!(decoded, frame);
    }
}

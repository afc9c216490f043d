// src/thumbnail.rs
//! Image decode collaborator and thumbnail-field resolution.
//!
//! The `thumbnail` field of a reference record is either a free-text description or a
//! path to an image file. Only this module touches the filesystem for thumbnails.

use image::{imageops::FilterType, DynamicImage, Rgb, Rgb32FImage};
use std::path::{Path, PathBuf};

use crate::error::{EngineError, Result};
use crate::salience::PixelGrid;

const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "webp", "gif", "bmp", "tif", "tiff"];

/// Decode an image, composite any alpha onto white and downscale (Catmull-Rom) so the
/// longer side is at most `max_side`. Smaller images are left at their native size.
pub fn decode_thumbnail(path: &Path, max_side: u32) -> Result<PixelGrid> {
    let decode_err = |reason: String| EngineError::Decode {
        path: path.to_path_buf(),
        reason,
    };

    let img = image::open(path).map_err(|e| decode_err(e.to_string()))?;
    let rgba = img.to_rgba32f();
    let (w, h) = rgba.dimensions();
    if w == 0 || h == 0 {
        return Err(decode_err(format!("empty image {w}x{h}")));
    }

    let mut flat = Rgb32FImage::new(w, h);
    for (x, y, p) in rgba.enumerate_pixels() {
        let [r, g, b, a] = p.0;
        let a = a.clamp(0.0, 1.0);
        flat.put_pixel(x, y, Rgb([r, g, b].map(|c| c * a + (1.0 - a))));
    }

    let flat = if w.max(h) > max_side.max(1) {
        DynamicImage::ImageRgb32F(flat)
            .resize(max_side, max_side, FilterType::CatmullRom)
            .to_rgb32f()
    } else {
        flat
    };

    let (w, h) = flat.dimensions();
    let pixels = flat.pixels().map(|p| p.0).collect();
    PixelGrid::new(w as usize, h as usize, pixels).map_err(|e| decode_err(e.to_string()))
}

fn looks_like_image_path(field: &str) -> bool {
    if field.contains('\n') {
        return false;
    }
    Path::new(field)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| IMAGE_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

/// What the analyzer gets to score the thumbnail with.
#[derive(Debug, Clone)]
pub enum ThumbnailSource {
    /// Nothing usable: blank field or a path that does not exist.
    Absent,
    Description(String),
    Image(PixelGrid),
    /// The file exists but could not be decoded.
    Unreadable { path: PathBuf, reason: String },
}

impl ThumbnailSource {
    /// Classify the field and decode image paths.
    pub fn resolve(field: &str, max_side: u32) -> Self {
        let field = field.trim();
        if field.is_empty() {
            return Self::Absent;
        }
        if !looks_like_image_path(field) {
            return Self::Description(field.to_string());
        }

        let path = PathBuf::from(field);
        if !path.exists() {
            tracing::debug!(path = %path.display(), "thumbnail path not found; treating as absent");
            return Self::Absent;
        }
        match decode_thumbnail(&path, max_side) {
            Ok(grid) => Self::Image(grid),
            Err(e) => {
                tracing::warn!(error = %e, "thumbnail decode failed");
                let reason = match e {
                    EngineError::Decode { reason, .. } => reason,
                    other => other.to_string(),
                };
                Self::Unreadable { path, reason }
            }
        }
    }

    /// Description-only classification; never touches the filesystem.
    pub fn describe(field: &str) -> Self {
        let field = field.trim();
        if field.is_empty() {
            Self::Absent
        } else {
            Self::Description(field.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    #[test]
    fn classifies_text_and_paths() {
        assert!(matches!(ThumbnailSource::resolve("   ", 512), ThumbnailSource::Absent));
        assert!(matches!(
            ThumbnailSource::resolve("얼굴 클로즈업, 노랑 배경", 512),
            ThumbnailSource::Description(_)
        ));
        assert!(matches!(
            ThumbnailSource::resolve("/definitely/not/here/thumb.png", 512),
            ThumbnailSource::Absent
        ));
        assert!(looks_like_image_path("cover.JPG"));
        assert!(!looks_like_image_path("before.after"));
    }

    #[test]
    fn decodes_and_downscales_large_images() {
        let tmp = tempfile::tempdir().unwrap();
        let p = tmp.path().join("wide.png");
        RgbaImage::from_pixel(1024, 256, Rgba([255, 0, 0, 255]))
            .save(&p)
            .unwrap();

        let grid = decode_thumbnail(&p, 512).unwrap();
        assert_eq!(grid.width(), 512);
        assert_eq!(grid.height(), 128);
        let px = grid.pixels()[0];
        assert!(px[0] > 0.95 && px[1] < 0.05);
    }

    #[test]
    fn never_upscales_and_composites_alpha_on_white() {
        let tmp = tempfile::tempdir().unwrap();
        let p = tmp.path().join("clear.png");
        RgbaImage::from_pixel(10, 6, Rgba([0, 0, 0, 0])).save(&p).unwrap();

        let grid = decode_thumbnail(&p, 512).unwrap();
        assert_eq!((grid.width(), grid.height()), (10, 6));
        assert!(grid.pixels().iter().all(|px| px.iter().all(|c| *c > 0.99)));
    }

    #[test]
    fn garbage_file_is_unreadable_not_absent() {
        let tmp = tempfile::tempdir().unwrap();
        let p = tmp.path().join("broken.png");
        std::fs::write(&p, b"not an image").unwrap();

        assert!(matches!(
            decode_thumbnail(&p, 512),
            Err(EngineError::Decode { .. })
        ));
        let src = ThumbnailSource::resolve(p.to_str().unwrap(), 512);
        assert!(matches!(src, ThumbnailSource::Unreadable { .. }));
    }
}

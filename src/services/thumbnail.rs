//! On-demand thumbnail rendering
//!
//! Thumbnails are rendered fresh on every request and never written to
//! disk. Their identity is the image fingerprint, so the HTTP layer can hand
//! out a long-lived `Cache-Control` and a strong `ETag`.

use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, ImageReader, ImageResult, Rgb, RgbImage};
use std::path::Path;
use tracing::{debug, warn};

use crate::config::CatalogConfig;
use crate::errors::{AppError, AppResult};

pub const THUMBNAIL_CONTENT_TYPE: &str = "image/jpeg";

/// Rendered thumbnail with its response metadata
#[derive(Debug, Clone)]
pub struct Thumbnail {
    pub bytes: Vec<u8>,
    pub etag: String,
    pub cache_control: String,
}

#[derive(Debug, Clone)]
pub struct ThumbnailRenderer {
    max_edge: u32,
    quality: u8,
    max_age_secs: u64,
}

impl ThumbnailRenderer {
    pub fn new(max_edge: u32, quality: u8, max_age_secs: u64) -> Self {
        Self {
            max_edge: max_edge.max(1),
            quality: quality.clamp(1, 100),
            max_age_secs,
        }
    }

    pub fn from_config(config: &CatalogConfig) -> Self {
        Self::new(
            config.thumbnail_max_edge,
            config.thumbnail_quality,
            config.thumbnail_max_age_secs,
        )
    }

    /// Strong validator for the thumbnail of `fingerprint`
    pub fn etag_for(fingerprint: &str) -> String {
        format!("\"{fingerprint}\"")
    }

    pub fn cache_control(&self) -> String {
        format!("public, max-age={}", self.max_age_secs)
    }

    /// Decode `source`, scale it into the bounding box and encode as JPEG.
    ///
    /// The format is sniffed from the content, not the extension. An
    /// unreadable or undecodable source is reported as not found for
    /// `fingerprint`; encoding failures are internal errors. Blocking.
    pub fn render(&self, source: &Path, fingerprint: &str) -> AppResult<Thumbnail> {
        let image = decode(source).map_err(|e| {
            warn!("Cannot decode {} for thumbnail: {}", source.display(), e);
            AppError::not_found("thumbnail", fingerprint)
        })?;

        let scaled = self.scale(image);
        let flattened = flatten_onto_white(&scaled);

        let mut bytes = Vec::new();
        JpegEncoder::new_with_quality(&mut bytes, self.quality).encode_image(&flattened)?;

        debug!(
            "Rendered {}x{} thumbnail for {} ({} bytes)",
            flattened.width(),
            flattened.height(),
            fingerprint,
            bytes.len()
        );

        Ok(Thumbnail {
            bytes,
            etag: Self::etag_for(fingerprint),
            cache_control: self.cache_control(),
        })
    }

    /// Fit into `max_edge` x `max_edge` keeping the aspect ratio; never enlarges
    fn scale(&self, image: DynamicImage) -> DynamicImage {
        if image.width() <= self.max_edge && image.height() <= self.max_edge {
            image
        } else {
            image.resize(self.max_edge, self.max_edge, FilterType::Lanczos3)
        }
    }
}

impl Default for ThumbnailRenderer {
    fn default() -> Self {
        Self::from_config(&CatalogConfig::default())
    }
}

fn decode(source: &Path) -> ImageResult<DynamicImage> {
    ImageReader::open(source)?.with_guessed_format()?.decode()
}

/// Composite transparent pixels over a white background
fn flatten_onto_white(image: &DynamicImage) -> RgbImage {
    if !image.color().has_alpha() {
        return image.to_rgb8();
    }

    let rgba = image.to_rgba8();
    let mut flattened = RgbImage::new(rgba.width(), rgba.height());
    for (x, y, pixel) in rgba.enumerate_pixels() {
        let [r, g, b, a] = pixel.0;
        let alpha = u16::from(a);
        let blend = |channel: u8| -> u8 {
            ((u16::from(channel) * alpha + 255 * (255 - alpha) + 127) / 255) as u8
        };
        flattened.put_pixel(x, y, Rgb([blend(r), blend(g), blend(b)]));
    }
    flattened
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgba, RgbaImage};

    fn decode_jpeg(bytes: &[u8]) -> DynamicImage {
        image::load_from_memory_with_format(bytes, ImageFormat::Jpeg).unwrap()
    }

    #[test]
    fn test_large_image_is_scaled_down() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("wide.png");
        RgbImage::from_pixel(800, 600, Rgb([10, 20, 30])).save(&source).unwrap();

        let thumbnail = ThumbnailRenderer::default().render(&source, "abc").unwrap();
        let decoded = decode_jpeg(&thumbnail.bytes);
        assert_eq!((decoded.width(), decoded.height()), (300, 225));
        assert_eq!(thumbnail.etag, "\"abc\"");
        assert_eq!(thumbnail.cache_control, "public, max-age=31536000");
    }

    #[test]
    fn test_small_image_is_not_enlarged() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("small.png");
        RgbImage::from_pixel(120, 40, Rgb([10, 20, 30])).save(&source).unwrap();

        let thumbnail = ThumbnailRenderer::default().render(&source, "abc").unwrap();
        let decoded = decode_jpeg(&thumbnail.bytes);
        assert_eq!((decoded.width(), decoded.height()), (120, 40));
    }

    #[test]
    fn test_rendering_is_deterministic() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("tall.png");
        RgbImage::from_fn(200, 500, |x, y| Rgb([(x % 256) as u8, (y % 256) as u8, 7]))
            .save(&source)
            .unwrap();

        let renderer = ThumbnailRenderer::default();
        let first = renderer.render(&source, "abc").unwrap();
        let second = renderer.render(&source, "abc").unwrap();
        assert_eq!(first.bytes, second.bytes);
        assert_eq!(first.etag, second.etag);
        let decoded = decode_jpeg(&first.bytes);
        assert_eq!((decoded.width(), decoded.height()), (120, 300));
    }

    #[test]
    fn test_format_follows_content_not_extension() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("mislabelled.jpg");
        RgbImage::from_pixel(400, 200, Rgb([10, 20, 30]))
            .save_with_format(&source, ImageFormat::Png)
            .unwrap();

        let thumbnail = ThumbnailRenderer::default().render(&source, "abc").unwrap();
        let decoded = decode_jpeg(&thumbnail.bytes);
        assert_eq!((decoded.width(), decoded.height()), (300, 150));
    }

    #[test]
    fn test_transparency_becomes_white() {
        let transparent = DynamicImage::ImageRgba8(RgbaImage::from_pixel(
            4,
            4,
            Rgba([0, 0, 0, 0]),
        ));
        let flattened = flatten_onto_white(&transparent);
        assert_eq!(flattened.get_pixel(0, 0), &Rgb([255, 255, 255]));

        let opaque = DynamicImage::ImageRgba8(RgbaImage::from_pixel(
            4,
            4,
            Rgba([10, 20, 30, 255]),
        ));
        assert_eq!(flatten_onto_white(&opaque).get_pixel(1, 1), &Rgb([10, 20, 30]));
    }

    #[test]
    fn test_undecodable_source_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("broken.jpg");
        std::fs::write(&source, b"garbage").unwrap();

        let err = ThumbnailRenderer::default().render(&source, "abc").unwrap_err();
        assert!(matches!(err, AppError::NotFound { .. }));
    }
}

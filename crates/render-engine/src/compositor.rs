//! Frame compositor: draws a source photograph and a logo onto one surface.
//!
//! Layer order, bottom to top:
//! 1. Opaque white base
//! 2. Source, fill-scaled and center-cropped to the canvas
//! 3. Logo at its resolved rectangle, alpha scaled by opacity

use std::io::Cursor;
use std::sync::Arc;

use image::codecs::png::{CompressionType, FilterType as PngFilter, PngEncoder};
use image::imageops::{self, FilterType};
use image::{DynamicImage, ExtendedColorType, GenericImageView, ImageEncoder, Rgba, RgbaImage};

use logomark_common::error::{LogomarkError, LogomarkResult};
use logomark_layout_model::geometry::CanvasGeometry;
use logomark_layout_model::placement::{LogoRect, ResolvedPlacement, MAX_OPACITY};
use logomark_layout_model::size::MAX_CANVAS_PIXELS;

use crate::asset::ImageAsset;

/// Resampling filter for the source and logo layers.
const DRAW_FILTER: FilterType = FilterType::Lanczos3;

const BACKGROUND: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// A fully composited output surface.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedFrame {
    /// Geometry the frame was drawn with.
    pub placement: ResolvedPlacement,
    /// Opacity the logo was drawn with.
    pub opacity: u8,
    /// Composited pixels.
    pub image: RgbaImage,
}

impl RenderedFrame {
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Encode as PNG at best compression.
    ///
    /// The surface is opaque, so the alpha channel is dropped.
    pub fn encode_png(&self) -> LogomarkResult<Vec<u8>> {
        let rgb = DynamicImage::ImageRgba8(self.image.clone()).to_rgb8();
        let mut out = Cursor::new(Vec::new());
        PngEncoder::new_with_quality(&mut out, CompressionType::Best, PngFilter::Adaptive)
            .write_image(rgb.as_raw(), rgb.width(), rgb.height(), ExtendedColorType::Rgb8)
            .map_err(|e| LogomarkError::render(format!("PNG encoding failed: {e}")))?;
        Ok(out.into_inner())
    }
}

/// Decode both assets and composite them.
pub fn render(
    source: &ImageAsset,
    logo: &ImageAsset,
    placement: &ResolvedPlacement,
    opacity: u8,
) -> LogomarkResult<RenderedFrame> {
    let source_image = source.decode()?;
    let logo_image = logo.decode()?;
    compose(&source_image, &logo_image, placement, opacity)
}

/// Decode and composite off the async runtime.
///
/// Decoding happens first (source, then logo); a failure in either
/// short-circuits before any drawing. Panics inside the blocking task are
/// reported as render errors.
pub async fn render_async(
    source: &ImageAsset,
    logo: &ImageAsset,
    placement: ResolvedPlacement,
    opacity: u8,
) -> LogomarkResult<RenderedFrame> {
    let source_image = source.decode_async().await?;
    let logo_image = logo.decode_async().await?;
    compose_async(source_image, logo_image, placement, opacity).await
}

/// Composite already-decoded rasters on the blocking pool.
pub async fn compose_async(
    source: Arc<DynamicImage>,
    logo: Arc<DynamicImage>,
    placement: ResolvedPlacement,
    opacity: u8,
) -> LogomarkResult<RenderedFrame> {
    tokio::task::spawn_blocking(move || compose(&source, &logo, &placement, opacity))
        .await
        .map_err(|e| LogomarkError::render(format!("Render task failed: {e}")))?
}

/// Composite already-decoded rasters.
pub fn compose(
    source: &DynamicImage,
    logo: &DynamicImage,
    placement: &ResolvedPlacement,
    opacity: u8,
) -> LogomarkResult<RenderedFrame> {
    let canvas = &placement.canvas;
    if canvas.canvas_width == 0 || canvas.canvas_height == 0 {
        return Err(LogomarkError::render("Canvas has zero size"));
    }
    if source.width() == 0 || source.height() == 0 || logo.width() == 0 || logo.height() == 0 {
        return Err(LogomarkError::render("Cannot draw an empty image"));
    }
    let (_, _, logo_w, logo_h) = placement.logo.pixel_bounds();
    check_surface("Canvas", canvas.canvas_width, canvas.canvas_height)?;
    check_surface("Logo", logo_w, logo_h)?;

    let mut surface = RgbaImage::from_pixel(canvas.canvas_width, canvas.canvas_height, BACKGROUND);
    draw_source(&mut surface, source, canvas);
    draw_logo(&mut surface, logo, &placement.logo, opacity);

    Ok(RenderedFrame {
        placement: *placement,
        opacity,
        image: surface,
    })
}

/// Refuse surfaces larger than [`MAX_CANVAS_PIXELS`] before allocating them.
fn check_surface(what: &str, width: u32, height: u32) -> LogomarkResult<()> {
    if width as u64 * height as u64 > MAX_CANVAS_PIXELS {
        return Err(LogomarkError::render(format!(
            "{what} {width}x{height} exceeds the {MAX_CANVAS_PIXELS} pixel limit"
        )));
    }
    Ok(())
}

fn draw_source(surface: &mut RgbaImage, source: &DynamicImage, canvas: &CanvasGeometry) {
    let (source_w, source_h) = source.dimensions();
    let crop = canvas.source_crop(source_w, source_h);
    let visible = source.crop_imm(crop.x, crop.y, crop.width, crop.height);

    let drawn = if (crop.width, crop.height) == (canvas.canvas_width, canvas.canvas_height) {
        visible.to_rgba8()
    } else {
        visible
            .resize_exact(canvas.canvas_width, canvas.canvas_height, DRAW_FILTER)
            .to_rgba8()
    };

    imageops::overlay(surface, &drawn, 0, 0);
}

fn draw_logo(surface: &mut RgbaImage, logo: &DynamicImage, rect: &LogoRect, opacity: u8) {
    let (x, y, width, height) = rect.pixel_bounds();
    let mut scaled = if logo.dimensions() == (width, height) {
        logo.to_rgba8()
    } else {
        logo.resize_exact(width, height, DRAW_FILTER).to_rgba8()
    };

    // Alpha is applied to this scratch copy only.
    if opacity < MAX_OPACITY {
        let alpha = opacity as f32 / MAX_OPACITY as f32;
        for pixel in scaled.pixels_mut() {
            pixel[3] = (pixel[3] as f32 * alpha).round() as u8;
        }
    }

    imageops::overlay(surface, &scaled, x, y);
}

#[cfg(test)]
mod tests {
    use super::*;
    use logomark_layout_model::placement::{recompute_placement, AnchorPreset, PlacementParams};
    use logomark_layout_model::size::OutputSize;

    fn solid(width: u32, height: u32, color: [u8; 4]) -> DynamicImage {
        DynamicImage::ImageRgba8(RgbaImage::from_pixel(width, height, Rgba(color)))
    }

    fn resolve(
        params: &PlacementParams,
        source: &DynamicImage,
        logo: &DynamicImage,
        output: &OutputSize,
    ) -> ResolvedPlacement {
        recompute_placement(params, source.dimensions(), logo.dimensions(), output).unwrap()
    }

    #[test]
    fn test_canvas_matches_output_size() {
        let source = solid(160, 120, [0, 0, 255, 255]);
        let logo = solid(40, 20, [255, 0, 0, 255]);
        let params = PlacementParams::new(AnchorPreset::TopRight, 2, 15, 100);
        let placement = resolve(&params, &source, &logo, &OutputSize::custom(100, 100).unwrap());

        let frame = compose(&source, &logo, &placement, params.opacity()).unwrap();
        assert_eq!((frame.width(), frame.height()), (100, 100));

        // Source fully covers the canvas: no white shows through.
        assert_eq!(frame.image.get_pixel(0, 99), &Rgba([0, 0, 255, 255]));
        assert_eq!(frame.image.get_pixel(50, 50), &Rgba([0, 0, 255, 255]));
    }

    #[test]
    fn test_logo_drawn_at_anchor() {
        let source = solid(200, 100, [0, 0, 0, 255]);
        let logo = solid(10, 10, [255, 0, 0, 255]);
        let params = PlacementParams::new(AnchorPreset::BottomRight, 10, 10, 100);
        let placement = resolve(&params, &source, &logo, &OutputSize::native());

        let frame = compose(&source, &logo, &placement, 100).unwrap();
        // Logo is 20x20 at (170, 70).
        assert_eq!(frame.image.get_pixel(175, 75), &Rgba([255, 0, 0, 255]));
        assert_eq!(frame.image.get_pixel(165, 75), &Rgba([0, 0, 0, 255]));
        assert_eq!(frame.image.get_pixel(195, 95), &Rgba([0, 0, 0, 255]));
    }

    #[test]
    fn test_opacity_blends_and_does_not_leak() {
        let source = solid(100, 100, [0, 0, 0, 255]);
        let logo = solid(10, 10, [255, 255, 255, 255]);
        let params = PlacementParams::new(AnchorPreset::TopLeft, 0, 50, 50);
        let placement = resolve(&params, &source, &logo, &OutputSize::native());

        let frame = compose(&source, &logo, &placement, params.opacity()).unwrap();
        let blended = frame.image.get_pixel(10, 10);
        assert!((120..=136).contains(&blended[0]), "got {blended:?}");
        assert_eq!(blended[3], 255);

        // Outside the logo the source is untouched.
        assert_eq!(frame.image.get_pixel(75, 75), &Rgba([0, 0, 0, 255]));
    }

    #[test]
    fn test_transparent_source_shows_white_base() {
        let source = solid(50, 50, [0, 0, 0, 0]);
        let logo = solid(5, 5, [0, 0, 0, 0]);
        let params = PlacementParams::default();
        let placement = resolve(&params, &source, &logo, &OutputSize::native());

        let frame = compose(&source, &logo, &placement, 100).unwrap();
        assert_eq!(frame.image.get_pixel(25, 25), &Rgba([255, 255, 255, 255]));
    }

    #[test]
    fn test_render_is_deterministic() {
        let source = DynamicImage::ImageRgba8(RgbaImage::from_fn(90, 60, |x, y| {
            Rgba([(x * 3) as u8, (y * 4) as u8, ((x + y) * 2) as u8, 255])
        }));
        let logo = solid(30, 12, [250, 200, 10, 200]);
        let params = PlacementParams::new(AnchorPreset::Center, 5, 40, 70);
        let output = OutputSize::custom(64, 80).unwrap();

        let a = compose(&source, &logo, &resolve(&params, &source, &logo, &output), 70).unwrap();
        let b = compose(&source, &logo, &resolve(&params, &source, &logo, &output), 70).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.encode_png().unwrap(), b.encode_png().unwrap());
    }

    #[test]
    fn test_encode_png_is_lossless() {
        let source = solid(20, 10, [12, 34, 56, 255]);
        let logo = solid(4, 4, [200, 100, 50, 255]);
        let params = PlacementParams::default();
        let placement = resolve(&params, &source, &logo, &OutputSize::native());
        let frame = compose(&source, &logo, &placement, 100).unwrap();

        let bytes = frame.encode_png().unwrap();
        let decoded = image::load_from_memory(&bytes).unwrap().to_rgba8();
        assert_eq!(decoded, frame.image);
    }

    #[test]
    fn test_oversized_canvas_is_render_error() {
        let source = solid(4, 4, [0, 0, 0, 255]);
        let logo = solid(2, 2, [255, 0, 0, 255]);
        let mut placement = resolve(
            &PlacementParams::default(),
            &source,
            &logo,
            &OutputSize::native(),
        );
        placement.canvas.canvas_width = 70_000;
        placement.canvas.canvas_height = 70_000;

        let err = compose(&source, &logo, &placement, 100).unwrap_err();
        assert!(matches!(err, LogomarkError::Render { .. }));
    }

    #[test]
    fn test_oversized_logo_is_render_error() {
        let source = solid(4, 4, [0, 0, 0, 255]);
        let logo = solid(2, 2, [255, 0, 0, 255]);
        let mut placement = resolve(
            &PlacementParams::default(),
            &source,
            &logo,
            &OutputSize::native(),
        );
        placement.logo.width = 8_000.0;
        placement.logo.height = 80_000_000.0;

        let err = compose(&source, &logo, &placement, 100).unwrap_err();
        assert!(err.to_string().contains("Logo"));
    }

    #[test]
    fn test_render_reports_decode_failure() {
        let source = ImageAsset::from_encoded("broken.jpg", 100, 100, vec![1, 2, 3]);
        let logo = ImageAsset::from_image("logo", solid(10, 10, [0, 0, 0, 255]));
        let params = PlacementParams::default();
        let placement =
            recompute_placement(&params, source.dimensions(), logo.dimensions(), &OutputSize::native())
                .unwrap();

        let err = render(&source, &logo, &placement, 100).unwrap_err();
        assert!(matches!(err, LogomarkError::Decode { .. }));
    }

    #[tokio::test]
    async fn test_render_async_matches_sync() {
        let source = ImageAsset::from_image("photo", solid(40, 30, [9, 9, 9, 255]));
        let logo = ImageAsset::from_image("logo", solid(8, 8, [255, 255, 0, 255]));
        let params = PlacementParams::new(AnchorPreset::TopCenter, 3, 25, 80);
        let placement = recompute_placement(
            &params,
            source.dimensions(),
            logo.dimensions(),
            &OutputSize::custom(32, 32).unwrap(),
        )
        .unwrap();

        let sync = render(&source, &logo, &placement, 80).unwrap();
        let async_frame = render_async(&source, &logo, placement, 80).await.unwrap();
        assert_eq!(sync, async_frame);
    }
}

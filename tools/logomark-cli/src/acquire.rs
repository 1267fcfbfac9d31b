//! Reading source and logo files from disk.
//!
//! Every rejection is a [`LogomarkError`] whose message can be shown to the
//! user as-is.

use std::path::Path;

use image::ImageFormat;

use logomark_common::error::{LogomarkError, LogomarkResult};
use logomark_render_engine::asset::ImageAsset;

/// Formats accepted for sources and logos.
pub const SUPPORTED_FORMATS: &[ImageFormat] = &[
    ImageFormat::Png,
    ImageFormat::Jpeg,
    ImageFormat::WebP,
    ImageFormat::Bmp,
    ImageFormat::Gif,
];

/// Read an image file, enforcing the size limit and the supported formats.
pub fn read_asset(path: &Path, max_bytes: u64) -> LogomarkResult<ImageAsset> {
    let label = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    let metadata = match std::fs::metadata(path) {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(LogomarkError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        Err(e) => return Err(e.into()),
    };
    if !metadata.is_file() {
        return Err(LogomarkError::invalid_input(format!("{label}: not a file")));
    }
    if metadata.len() > max_bytes {
        return Err(LogomarkError::invalid_input(format!(
            "{label}: file is {} and the limit is {}",
            format_bytes(metadata.len()),
            format_bytes(max_bytes)
        )));
    }

    let bytes = std::fs::read(path)?;
    check_format(&label, &bytes)?;

    let asset = ImageAsset::from_bytes(label, bytes)?;
    tracing::debug!(
        path = %path.display(),
        width = asset.width(),
        height = asset.height(),
        "Acquired image"
    );
    Ok(asset)
}

fn check_format(label: &str, bytes: &[u8]) -> LogomarkResult<()> {
    let format = image::guess_format(bytes)
        .map_err(|_| LogomarkError::invalid_input(format!("{label}: not a recognised image")))?;

    if SUPPORTED_FORMATS.contains(&format) {
        Ok(())
    } else {
        Err(LogomarkError::invalid_input(format!(
            "{label}: {format:?} is not supported (use PNG, JPEG, WebP, BMP or GIF)"
        )))
    }
}

fn format_bytes(bytes: u64) -> String {
    const MIB: f64 = 1024.0 * 1024.0;
    if bytes >= 1024 * 1024 {
        format!("{:.1} MiB", bytes as f64 / MIB)
    } else {
        format!("{bytes} bytes")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};
    use std::path::PathBuf;

    fn scratch(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join("logomark_test_acquire");
        std::fs::create_dir_all(&dir).unwrap();
        dir.join(name)
    }

    fn write_png(path: &Path, width: u32, height: u32) {
        RgbaImage::from_pixel(width, height, Rgba([1, 2, 3, 255]))
            .save_with_format(path, ImageFormat::Png)
            .unwrap();
    }

    #[test]
    fn test_reads_png_dimensions() {
        let path = scratch("ok.png");
        write_png(&path, 12, 7);
        let asset = read_asset(&path, 1024 * 1024).unwrap();
        assert_eq!(asset.dimensions(), (12, 7));
        assert_eq!(asset.label(), "ok.png");
    }

    #[test]
    fn test_missing_file() {
        let err = read_asset(&scratch("does-not-exist.png"), 1024).unwrap_err();
        assert!(matches!(err, LogomarkError::FileNotFound { .. }));
    }

    #[test]
    fn test_size_limit() {
        let path = scratch("big.png");
        write_png(&path, 64, 64);
        let err = read_asset(&path, 16).unwrap_err();
        assert!(matches!(err, LogomarkError::InvalidInput { .. }));
        assert!(err.to_string().contains("limit"));
    }

    #[test]
    fn test_rejects_non_image() {
        let path = scratch("notes.png");
        std::fs::write(&path, b"just some text, not pixels").unwrap();
        let err = read_asset(&path, 1024).unwrap_err();
        assert!(matches!(err, LogomarkError::InvalidInput { .. }));
    }

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(512), "512 bytes");
        assert_eq!(format_bytes(25 * 1024 * 1024), "25.0 MiB");
    }
}

//! Image assets: source photographs and the logo.
//!
//! An asset carries its encoded bytes and native dimensions. Decoding is
//! deferred until the first render and cached, so clones share one raster.

use std::fmt;
use std::io::Cursor;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, OnceLock};

use image::{DynamicImage, GenericImageView, ImageReader};
use serde::{Deserialize, Serialize};

use logomark_common::error::{LogomarkError, LogomarkResult};

static NEXT_ASSET_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique asset identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AssetId(u64);

impl AssetId {
    /// Allocate a fresh identifier.
    pub fn next() -> Self {
        Self(NEXT_ASSET_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// An immutable image with known native dimensions.
#[derive(Clone)]
pub struct ImageAsset {
    id: AssetId,
    label: String,
    width: u32,
    height: u32,
    bytes: Arc<[u8]>,
    decoded: Arc<OnceLock<Arc<DynamicImage>>>,
}

impl fmt::Debug for ImageAsset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageAsset")
            .field("id", &self.id)
            .field("label", &self.label)
            .field("width", &self.width)
            .field("height", &self.height)
            .field("encoded_len", &self.bytes.len())
            .field("decoded", &self.is_decoded())
            .finish()
    }
}

impl ImageAsset {
    /// Build an asset from encoded bytes, probing the header for dimensions.
    ///
    /// Only the header is read here; pixel data is decoded on first use.
    pub fn from_bytes(label: impl Into<String>, bytes: Vec<u8>) -> LogomarkResult<Self> {
        let label = label.into();
        let (width, height) = ImageReader::new(Cursor::new(&bytes))
            .with_guessed_format()?
            .into_dimensions()
            .map_err(|e| LogomarkError::decode(format!("{label}: {e}")))?;

        if width == 0 || height == 0 {
            return Err(LogomarkError::invalid_input(format!(
                "{label}: image has zero size ({width}x{height})"
            )));
        }

        Ok(Self::from_encoded(label, width, height, bytes))
    }

    /// Build an asset from encoded bytes whose dimensions are already known.
    ///
    /// The bytes are not inspected; a bad payload surfaces as a decode error
    /// at render time.
    pub fn from_encoded(label: impl Into<String>, width: u32, height: u32, bytes: Vec<u8>) -> Self {
        Self {
            id: AssetId::next(),
            label: label.into(),
            width,
            height,
            bytes: bytes.into(),
            decoded: Arc::new(OnceLock::new()),
        }
    }

    /// Wrap an already-decoded raster.
    pub fn from_image(label: impl Into<String>, image: DynamicImage) -> Self {
        let (width, height) = image.dimensions();
        let decoded = OnceLock::new();
        let _ = decoded.set(Arc::new(image));
        Self {
            id: AssetId::next(),
            label: label.into(),
            width,
            height,
            bytes: Arc::from(Vec::new()),
            decoded: Arc::new(decoded),
        }
    }

    pub fn id(&self) -> AssetId {
        self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Native `(width, height)`.
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Size of the encoded payload in bytes.
    pub fn encoded_len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether a decoded raster is currently cached.
    pub fn is_decoded(&self) -> bool {
        self.decoded.get().is_some()
    }

    /// Decode the raster, reusing a previous decode when available.
    pub fn decode(&self) -> LogomarkResult<Arc<DynamicImage>> {
        if let Some(image) = self.decoded.get() {
            return Ok(Arc::clone(image));
        }
        let image = self.decode_bytes()?;
        Ok(Arc::clone(self.decoded.get_or_init(|| Arc::new(image))))
    }

    /// Decode without populating the cache.
    ///
    /// A raster that is already cached is reused. Otherwise the result is
    /// owned by the caller and freed when it is dropped.
    pub fn decode_uncached(&self) -> LogomarkResult<Arc<DynamicImage>> {
        match self.decoded.get() {
            Some(image) => Ok(Arc::clone(image)),
            None => self.decode_bytes().map(Arc::new),
        }
    }

    /// Decode on the blocking pool.
    pub async fn decode_async(&self) -> LogomarkResult<Arc<DynamicImage>> {
        let asset = self.clone();
        tokio::task::spawn_blocking(move || asset.decode())
            .await
            .map_err(|e| LogomarkError::decode(format!("Decode task failed: {e}")))?
    }

    /// [`decode_uncached`](Self::decode_uncached) on the blocking pool.
    pub async fn decode_uncached_async(&self) -> LogomarkResult<Arc<DynamicImage>> {
        let asset = self.clone();
        tokio::task::spawn_blocking(move || asset.decode_uncached())
            .await
            .map_err(|e| LogomarkError::decode(format!("Decode task failed: {e}")))?
    }

    fn decode_bytes(&self) -> LogomarkResult<DynamicImage> {
        let image = image::load_from_memory(&self.bytes)
            .map_err(|e| LogomarkError::decode(format!("{}: {e}", self.label)))?;

        if image.dimensions() != (self.width, self.height) {
            return Err(LogomarkError::decode(format!(
                "{}: decoded size {}x{} does not match declared {}x{}",
                self.label,
                image.width(),
                image.height(),
                self.width,
                self.height
            )));
        }

        tracing::debug!(asset = %self.id, label = %self.label, "Decoded asset");
        Ok(image)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgba, RgbaImage};

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let image = RgbaImage::from_pixel(width, height, Rgba([10, 20, 30, 255]));
        let mut out = Cursor::new(Vec::new());
        DynamicImage::ImageRgba8(image)
            .write_to(&mut out, ImageFormat::Png)
            .unwrap();
        out.into_inner()
    }

    #[test]
    fn test_ids_are_unique() {
        let a = ImageAsset::from_image("a", DynamicImage::new_rgba8(2, 2));
        let b = ImageAsset::from_image("b", DynamicImage::new_rgba8(2, 2));
        assert_ne!(a.id(), b.id());
        assert_eq!(a.clone().id(), a.id());
    }

    #[test]
    fn test_from_bytes_probes_dimensions() {
        let asset = ImageAsset::from_bytes("photo.png", png_bytes(64, 48)).unwrap();
        assert_eq!(asset.dimensions(), (64, 48));
        let decoded = asset.decode().unwrap();
        assert_eq!(decoded.dimensions(), (64, 48));
    }

    #[test]
    fn test_from_bytes_rejects_garbage() {
        let err = ImageAsset::from_bytes("notes.txt", b"hello".to_vec()).unwrap_err();
        assert!(matches!(err, LogomarkError::Decode { .. } | LogomarkError::Io(_)));
    }

    #[test]
    fn test_decode_failure_is_reported() {
        let asset = ImageAsset::from_encoded("broken.png", 10, 10, vec![0u8; 32]);
        let err = asset.decode().unwrap_err();
        assert!(err.is_per_item());
        assert!(err.to_string().contains("broken.png"));
    }

    #[test]
    fn test_declared_size_mismatch_is_decode_error() {
        let asset = ImageAsset::from_encoded("liar.png", 100, 100, png_bytes(8, 8));
        assert!(matches!(asset.decode(), Err(LogomarkError::Decode { .. })));
    }

    #[test]
    fn test_decode_is_shared_between_clones() {
        let asset = ImageAsset::from_bytes("photo.png", png_bytes(4, 4)).unwrap();
        let copy = asset.clone();
        let first = asset.decode().unwrap();
        let second = copy.decode().unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_uncached_decode_leaves_cache_empty() {
        let asset = ImageAsset::from_bytes("photo.png", png_bytes(6, 6)).unwrap();
        let image = asset.decode_uncached().unwrap();
        assert_eq!(image.dimensions(), (6, 6));
        assert!(!asset.is_decoded());

        let cached = asset.decode().unwrap();
        assert!(asset.is_decoded());
        assert!(Arc::ptr_eq(&cached, &asset.decode_uncached().unwrap()));
    }

    #[tokio::test]
    async fn test_decode_async() {
        let asset = ImageAsset::from_bytes("photo.png", png_bytes(5, 3)).unwrap();
        let decoded = asset.decode_async().await.unwrap();
        assert_eq!(decoded.dimensions(), (5, 3));
    }
}

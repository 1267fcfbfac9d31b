use std::io::Cursor;

use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use logomark_layout_model::placement::{AnchorPreset, PlacementParams};
use logomark_layout_model::size::OutputSize;
use logomark_render_engine::bundle::{BundleWriter, DirectoryBundleWriter};
use logomark_render_engine::{export_all, ImageAsset};

fn png(width: u32, height: u32, color: [u8; 4]) -> Vec<u8> {
    let mut out = Cursor::new(Vec::new());
    DynamicImage::ImageRgba8(RgbaImage::from_pixel(width, height, Rgba(color)))
        .write_to(&mut out, ImageFormat::Png)
        .expect("png encode");
    out.into_inner()
}

fn source(label: &str, width: u32, height: u32) -> ImageAsset {
    ImageAsset::from_bytes(label, png(width, height, [30, 60, 90, 255])).expect("valid source")
}

fn broken(label: &str) -> ImageAsset {
    // Header says 40x40, payload is truncated.
    let mut bytes = png(40, 40, [0, 0, 0, 255]);
    bytes.truncate(40);
    ImageAsset::from_encoded(label, 40, 40, bytes)
}

#[tokio::test]
async fn skipped_sources_keep_original_numbering() {
    let sources = vec![
        source("a.png", 64, 48),
        broken("b.png"),
        source("c.png", 48, 64),
        broken("d.png"),
        source("e.png", 50, 50),
    ];
    let logo = ImageAsset::from_bytes("logo.png", png(20, 10, [255, 255, 255, 255])).unwrap();
    let params = PlacementParams::new(AnchorPreset::TopRight, 4, 15, 90);
    let output = OutputSize::custom(100, 100).unwrap();

    let export = export_all(&sources, &logo, &params, &output, None)
        .await
        .expect("partial export succeeds");

    assert_eq!(export.requested, 5);
    assert_eq!(export.succeeded(), 3);
    assert!(export.is_partial());

    let names: Vec<_> = export.items.iter().map(|i| i.name.as_str()).collect();
    assert_eq!(names, ["01.png", "03.png", "05.png"]);

    let skipped: Vec<_> = export.failures.iter().map(|f| f.index).collect();
    assert_eq!(skipped, [1, 3]);

    for item in &export.items {
        let decoded = image::load_from_memory(&item.data).expect("output decodes");
        assert_eq!((decoded.width(), decoded.height()), (100, 100));
    }

    let dir = std::env::temp_dir().join("logomark_it_batch_export");
    let _ = std::fs::remove_dir_all(&dir);
    DirectoryBundleWriter::new(&dir)
        .write_bundle(&export)
        .expect("bundle written");
    assert!(dir.join("01.png").exists());
    assert!(!dir.join("02.png").exists());
    assert!(dir.join("05.png").exists());
    std::fs::remove_dir_all(&dir).ok();
}

#[tokio::test]
async fn repeated_export_is_byte_identical() {
    let sources = vec![source("a.png", 30, 20)];
    let logo = ImageAsset::from_bytes("logo.png", png(6, 6, [200, 10, 10, 180])).unwrap();
    let params = PlacementParams::new(AnchorPreset::Center, 0, 30, 60);
    let output = OutputSize::custom(24, 24).unwrap();

    let first = export_all(&sources, &logo, &params, &output, None).await.unwrap();
    let second = export_all(&sources, &logo, &params, &output, None).await.unwrap();
    assert_eq!(first.items[0].data, second.items[0].data);
}

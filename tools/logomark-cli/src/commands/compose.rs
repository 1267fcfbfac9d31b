//! Render one image with the logo applied.

use std::path::PathBuf;

use logomark_common::config::AppConfig;
use logomark_render_engine::export::output_name;
use logomark_session::{Session, Studio};

use super::PlacementArgs;
use crate::acquire::read_asset;

pub async fn run(
    config: &AppConfig,
    source: PathBuf,
    logo: PathBuf,
    output: Option<PathBuf>,
    preview: Option<PathBuf>,
    placement: PlacementArgs,
) -> anyhow::Result<()> {
    let (params, output_size) = placement.resolve(&config.placement)?;
    let max_bytes = config.acquisition.max_file_bytes;

    let source_asset = read_asset(&source, max_bytes)
        .map_err(|e| anyhow::anyhow!("Cannot use source image: {e}"))?;
    let logo_asset =
        read_asset(&logo, max_bytes).map_err(|e| anyhow::anyhow!("Cannot use logo: {e}"))?;

    println!("Composing: {}", source.display());
    println!("  Logo: {}", logo.display());
    println!("  Output size: {output_size}");

    let mut session = Session::with_settings(params, output_size);
    session.add_sources([source_asset]);
    session.set_logo(logo_asset);
    let studio = Studio::new(session, config.preview.max_dimension);

    if let Some(rect) = studio.session().resolved().map(|r| r.logo) {
        println!(
            "  Logo rect: {:.0}x{:.0} at ({:.0}, {:.0})",
            rect.width, rect.height, rect.x, rect.y
        );
    }

    if let Some(preview_path) = preview {
        match studio.refresh().await? {
            Some(pair) => {
                pair.preview.save(&preview_path)?;
                println!(
                    "  Preview: {} ({}x{})",
                    preview_path.display(),
                    pair.preview.width(),
                    pair.preview.height()
                );
            }
            None => println!("  Preview: nothing to render"),
        }
    }

    let item = studio.export_active().await?;
    let output_path = output.unwrap_or_else(|| config.output_dir.join(output_name(0)));
    if let Some(parent) = output_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&output_path, &item.data)?;

    println!(
        "\nWrote {} ({}x{}, {} bytes)",
        output_path.display(),
        item.width,
        item.height,
        item.data.len()
    );

    Ok(())
}

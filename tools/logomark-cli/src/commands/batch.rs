//! Render a numbered set of images with one logo and placement.

use std::io::Write;
use std::path::PathBuf;

use logomark_common::config::AppConfig;
use logomark_common::error::LogomarkError;
use logomark_render_engine::bundle::{BundleWriter, DirectoryBundleWriter};
use logomark_render_engine::export::{ExportProgress, ProgressCallback};
use logomark_session::{Session, Studio};

use super::PlacementArgs;
use crate::acquire::read_asset;

pub async fn run(
    config: &AppConfig,
    sources: Vec<PathBuf>,
    logo: PathBuf,
    output_dir: Option<PathBuf>,
    write_manifest: bool,
    placement: PlacementArgs,
) -> anyhow::Result<()> {
    let (params, output_size) = placement.resolve(&config.placement)?;
    let max_bytes = config.acquisition.max_file_bytes;

    let logo_asset =
        read_asset(&logo, max_bytes).map_err(|e| anyhow::anyhow!("Cannot use logo: {e}"))?;

    let mut assets = Vec::with_capacity(sources.len());
    for path in &sources {
        match read_asset(path, max_bytes) {
            Ok(asset) => assets.push(asset),
            Err(e) => println!("  Skipping {}: {e}", path.display()),
        }
    }
    if assets.is_empty() {
        anyhow::bail!("None of the {} source images could be read", sources.len());
    }

    let output_dir = output_dir.unwrap_or_else(|| config.output_dir.clone());
    println!("Exporting {} image(s) to {}", assets.len(), output_dir.display());
    println!("  Logo: {}", logo.display());
    println!("  Output size: {output_size}");

    let mut session = Session::with_settings(params, output_size);
    session.add_sources(assets);
    session.set_logo(logo_asset);
    let studio = Studio::new(session, config.preview.max_dimension);

    let progress_cb: ProgressCallback = Box::new(|p: ExportProgress| {
        print!(
            "\r  Progress: {:.0}% ({}/{})  ",
            p.progress * 100.0,
            p.completed,
            p.total
        );
        let _ = std::io::stdout().flush();
    });

    let export = match studio.export_all(Some(progress_cb)).await {
        Ok(export) => export,
        Err(LogomarkError::ExportFailed { requested }) => {
            println!();
            anyhow::bail!("Export failed: none of the {requested} image(s) could be rendered");
        }
        Err(e) => return Err(e.into()),
    };
    println!();

    let mut writer = DirectoryBundleWriter::new(&output_dir);
    if !write_manifest {
        writer = writer.without_manifest();
    }
    let written = writer.write_bundle(&export)?;

    for item in &export.items {
        println!(
            "  {} <- {} ({}x{})",
            item.name, item.source_label, item.width, item.height
        );
    }
    for failure in &export.failures {
        println!("  skipped #{}: {}", failure.index + 1, failure.reason);
    }

    println!(
        "\nExported {} of {} image(s) to {}",
        export.succeeded(),
        export.requested,
        written.display()
    );

    Ok(())
}

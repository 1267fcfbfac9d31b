//! Batch export: render every source with one logo/placement configuration.

use serde::Serialize;

use logomark_common::error::{LogomarkError, LogomarkResult};
use logomark_layout_model::placement::{recompute_placement, PlacementParams};
use logomark_layout_model::size::OutputSize;

use crate::asset::{AssetId, ImageAsset};
use crate::compositor::compose_async;

/// File extension of every exported raster.
pub const OUTPUT_EXTENSION: &str = "png";

/// One successfully rendered and encoded output.
#[derive(Debug, Clone)]
pub struct ExportedItem {
    /// Zero-based position of the source in the collection.
    pub index: usize,
    /// Output file name (e.g. `03.png`).
    pub name: String,
    pub source_id: AssetId,
    pub source_label: String,
    pub width: u32,
    pub height: u32,
    /// Encoded PNG bytes.
    pub data: Vec<u8>,
}

/// A source that could not be rendered.
#[derive(Debug, Clone, Serialize)]
pub struct ExportFailure {
    pub index: usize,
    pub source_label: String,
    pub reason: String,
}

/// Outcome of a batch export with at least one success.
#[derive(Debug, Clone)]
pub struct BatchExport {
    pub output_size: OutputSize,
    /// Number of sources handed to the exporter.
    pub requested: usize,
    /// Rendered outputs, in collection order.
    pub items: Vec<ExportedItem>,
    /// Skipped sources, in collection order.
    pub failures: Vec<ExportFailure>,
}

impl BatchExport {
    pub fn succeeded(&self) -> usize {
        self.items.len()
    }

    /// Whether some, but not all, sources were skipped.
    pub fn is_partial(&self) -> bool {
        !self.failures.is_empty()
    }
}

/// Progress callback for batch exports.
pub type ProgressCallback = Box<dyn Fn(ExportProgress) + Send + Sync>;

/// Export progress report.
#[derive(Debug, Clone)]
pub struct ExportProgress {
    /// Current progress [0.0, 1.0].
    pub progress: f64,

    /// Sources processed so far (rendered or skipped).
    pub completed: usize,

    /// Total sources.
    pub total: usize,

    /// Current stage.
    pub stage: ExportStage,
}

/// Stages of the export process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportStage {
    Preparing,
    Rendering,
    Complete,
    Failed,
}

/// Output file name for the source at zero-based `index`.
///
/// 1-based, zero-padded to at least two digits.
pub fn output_name(index: usize) -> String {
    format!("{:02}.{OUTPUT_EXTENSION}", index + 1)
}

/// Render every source in order.
///
/// Each source gets its own resolved placement (canvas geometry differs per
/// source for the native size). Sources that fail to decode or render are
/// skipped and recorded; names keep the original position, so skips leave
/// gaps. Fails with [`LogomarkError::ExportFailed`] when nothing rendered.
pub async fn export_all(
    sources: &[ImageAsset],
    logo: &ImageAsset,
    params: &PlacementParams,
    output: &OutputSize,
    progress: Option<ProgressCallback>,
) -> LogomarkResult<BatchExport> {
    let total = sources.len();
    tracing::info!(total, output = %output, logo = %logo.label(), "Starting batch export");

    let report = |completed: usize, stage: ExportStage| {
        if let Some(cb) = &progress {
            cb(ExportProgress {
                progress: if total == 0 {
                    1.0
                } else {
                    completed as f64 / total as f64
                },
                completed,
                total,
                stage,
            });
        }
    };

    report(0, ExportStage::Preparing);

    let mut items = Vec::with_capacity(total);
    let mut failures = Vec::new();

    for (index, source) in sources.iter().enumerate() {
        match export_item(index, source, logo, params, output).await {
            Ok(item) => {
                tracing::debug!(name = %item.name, source = %source.label(), "Rendered item");
                items.push(item);
            }
            Err(e) => {
                tracing::warn!(index, source = %source.label(), error = %e, "Skipping source");
                failures.push(ExportFailure {
                    index,
                    source_label: source.label().to_string(),
                    reason: e.to_string(),
                });
            }
        }
        report(index + 1, ExportStage::Rendering);
    }

    if items.is_empty() {
        report(total, ExportStage::Failed);
        return Err(LogomarkError::ExportFailed { requested: total });
    }

    report(total, ExportStage::Complete);
    tracing::info!(
        succeeded = items.len(),
        requested = total,
        "Batch export finished"
    );

    Ok(BatchExport {
        output_size: output.clone(),
        requested: total,
        items,
        failures,
    })
}

/// Render a single source as a one-item export.
pub async fn export_single(
    source: &ImageAsset,
    logo: &ImageAsset,
    params: &PlacementParams,
    output: &OutputSize,
) -> LogomarkResult<ExportedItem> {
    export_item(0, source, logo, params, output).await
}

async fn export_item(
    index: usize,
    source: &ImageAsset,
    logo: &ImageAsset,
    params: &PlacementParams,
    output: &OutputSize,
) -> LogomarkResult<ExportedItem> {
    let placement = recompute_placement(params, source.dimensions(), logo.dimensions(), output)
        .ok_or_else(|| LogomarkError::render(format!("{}: image has zero size", source.label())))?;

    // Sources are decoded per item and released afterwards; only the logo
    // stays cached across the batch.
    let source_image = source.decode_uncached_async().await?;
    let logo_image = logo.decode_async().await?;
    let frame = compose_async(source_image, logo_image, placement, params.opacity()).await?;
    let (width, height) = (frame.width(), frame.height());
    let data = tokio::task::spawn_blocking(move || frame.encode_png())
        .await
        .map_err(|e| LogomarkError::render(format!("Encode task failed: {e}")))??;

    Ok(ExportedItem {
        index,
        name: output_name(index),
        source_id: source.id(),
        source_label: source.label().to_string(),
        width,
        height,
        data,
    })
}

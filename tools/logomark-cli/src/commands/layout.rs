//! Print the resolved geometry for one source/logo pair.

use std::path::PathBuf;

use serde::Serialize;

use logomark_common::config::AppConfig;
use logomark_layout_model::placement::{recompute_placement, PlacementParams, ResolvedPlacement};
use logomark_layout_model::size::OutputSize;

use super::PlacementArgs;
use crate::acquire::read_asset;

#[derive(Serialize)]
struct LayoutReport<'a> {
    source: &'a str,
    source_size: (u32, u32),
    logo: &'a str,
    logo_size: (u32, u32),
    output_size: &'a OutputSize,
    params: &'a PlacementParams,
    placement: ResolvedPlacement,
}

pub fn run(
    config: &AppConfig,
    source: PathBuf,
    logo: PathBuf,
    placement: PlacementArgs,
) -> anyhow::Result<()> {
    let (params, output_size) = placement.resolve(&config.placement)?;
    let max_bytes = config.acquisition.max_file_bytes;

    let source_asset = read_asset(&source, max_bytes)?;
    let logo_asset = read_asset(&logo, max_bytes)?;

    let resolved = recompute_placement(
        &params,
        source_asset.dimensions(),
        logo_asset.dimensions(),
        &output_size,
    )
    .ok_or_else(|| anyhow::anyhow!("Cannot lay out zero-sized images"))?;

    let report = LayoutReport {
        source: source_asset.label(),
        source_size: source_asset.dimensions(),
        logo: logo_asset.label(),
        logo_size: logo_asset.dimensions(),
        output_size: &output_size,
        params: &params,
        placement: resolved,
    };
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}

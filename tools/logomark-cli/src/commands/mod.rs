pub mod batch;
pub mod compose;
pub mod config;
pub mod layout;
pub mod sizes;

use clap::Args;

use logomark_common::config::PlacementDefaults;
use logomark_layout_model::placement::{Anchor, AnchorPreset, PlacementParams};
use logomark_layout_model::size::OutputSize;

/// Placement flags shared by the rendering commands.
///
/// Anything left unset falls back to the `placement` section of the config.
#[derive(Debug, Default, Args)]
pub struct PlacementArgs {
    /// Anchor preset (top-left, top-center, ..., bottom-right; short forms like "br")
    #[arg(short, long)]
    pub anchor: Option<String>,

    /// Place the logo's top-left corner at X,Y canvas pixels instead of an anchor
    #[arg(long, value_name = "X,Y", conflicts_with = "anchor")]
    pub at: Option<String>,

    /// Margin from the anchored edges, in pixels
    #[arg(short, long)]
    pub margin: Option<u32>,

    /// Logo width as a percentage of the canvas width (5-50)
    #[arg(short = 's', long = "scale")]
    pub size_percent: Option<u8>,

    /// Logo opacity percentage (10-100)
    #[arg(long)]
    pub opacity: Option<u8>,

    /// Output size: native, a preset name (see `logomark sizes`), or WIDTHxHEIGHT
    #[arg(long)]
    pub size: Option<String>,
}

impl PlacementArgs {
    /// Merge flags over config defaults.
    pub fn resolve(
        &self,
        defaults: &PlacementDefaults,
    ) -> anyhow::Result<(PlacementParams, OutputSize)> {
        let anchor = match (&self.at, &self.anchor) {
            (Some(at), _) => parse_position(at)?,
            (None, Some(anchor)) => Anchor::from(anchor.parse::<AnchorPreset>()?),
            (None, None) => Anchor::from(defaults.anchor.parse::<AnchorPreset>()?),
        };

        let params = PlacementParams::new(
            anchor,
            self.margin.unwrap_or(defaults.margin),
            self.size_percent.unwrap_or(defaults.size_percent),
            self.opacity.unwrap_or(defaults.opacity),
        );
        let output_size: OutputSize = self
            .size
            .as_deref()
            .unwrap_or(&defaults.output_size)
            .parse()?;

        Ok((params, output_size))
    }
}

fn parse_position(value: &str) -> anyhow::Result<Anchor> {
    let invalid = || anyhow::anyhow!("Invalid position '{value}' (expected X,Y)");
    let (x, y) = value.split_once(',').ok_or_else(invalid)?;
    let x: f64 = x.trim().parse().map_err(|_| invalid())?;
    let y: f64 = y.trim().parse().map_err(|_| invalid())?;
    if !x.is_finite() || !y.is_finite() {
        return Err(invalid());
    }
    Ok(Anchor::Custom { x, y })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_fill_unset_flags() {
        let (params, size) = PlacementArgs::default()
            .resolve(&PlacementDefaults::default())
            .unwrap();
        assert_eq!(params, PlacementParams::default());
        assert!(size.is_native());
    }

    #[test]
    fn test_flags_override_and_clamp() {
        let args = PlacementArgs {
            anchor: Some("tl".to_string()),
            size_percent: Some(90),
            opacity: Some(0),
            size: Some("square".to_string()),
            ..Default::default()
        };
        let (params, size) = args.resolve(&PlacementDefaults::default()).unwrap();
        assert_eq!(params.anchor(), Anchor::from(AnchorPreset::TopLeft));
        assert_eq!(params.size_percent(), 50);
        assert_eq!(params.opacity(), 10);
        assert_eq!(size.target(), Some((1080, 1080)));
    }

    #[test]
    fn test_custom_position() {
        let args = PlacementArgs {
            at: Some("12, 40.5".to_string()),
            ..Default::default()
        };
        let (params, _) = args.resolve(&PlacementDefaults::default()).unwrap();
        assert_eq!(params.anchor(), Anchor::Custom { x: 12.0, y: 40.5 });
    }

    #[test]
    fn test_bad_values_are_errors() {
        let defaults = PlacementDefaults::default();
        let bad_anchor = PlacementArgs {
            anchor: Some("sideways".to_string()),
            ..Default::default()
        };
        assert!(bad_anchor.resolve(&defaults).is_err());

        let bad_size = PlacementArgs {
            size: Some("100x0".to_string()),
            ..Default::default()
        };
        assert!(bad_size.resolve(&defaults).is_err());

        let huge = PlacementArgs {
            size: Some("70000x70000".to_string()),
            ..Default::default()
        };
        assert!(huge.resolve(&defaults).is_err());

        assert!(parse_position("12").is_err());
        assert!(parse_position("NaN,3").is_err());
    }
}

//! Session state: the source collection, logo, and placement settings.
//!
//! Every transition is a synchronous `&mut self` call. Transitions that
//! affect geometry finish by recomputing the resolved placement for the
//! active source, so readers never see parameters and rectangle out of step.

use logomark_layout_model::placement::{
    recompute_placement, Anchor, AnchorPreset, PlacementParams, ResolvedPlacement,
};
use logomark_layout_model::size::OutputSize;
use logomark_render_engine::asset::{AssetId, ImageAsset};

/// Everything needed to render the active item once.
#[derive(Debug, Clone)]
pub struct RenderRequest {
    pub source: ImageAsset,
    pub logo: ImageAsset,
    pub placement: ResolvedPlacement,
    pub opacity: u8,
}

/// Working set of a compositing session.
#[derive(Debug, Clone, Default)]
pub struct Session {
    sources: Vec<ImageAsset>,
    logo: Option<ImageAsset>,
    params: PlacementParams,
    output_size: OutputSize,
    active: Option<usize>,
    resolved: Option<ResolvedPlacement>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// A session starting from the given placement and output size.
    pub fn with_settings(params: PlacementParams, output_size: OutputSize) -> Self {
        Self {
            params,
            output_size,
            ..Self::default()
        }
    }

    // ── Accessors ───────────────────────────────────────────────

    pub fn sources(&self) -> &[ImageAsset] {
        &self.sources
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    pub fn logo(&self) -> Option<&ImageAsset> {
        self.logo.as_ref()
    }

    pub fn params(&self) -> &PlacementParams {
        &self.params
    }

    pub fn output_size(&self) -> &OutputSize {
        &self.output_size
    }

    pub fn active_index(&self) -> Option<usize> {
        self.active
    }

    pub fn active_source(&self) -> Option<&ImageAsset> {
        self.active.and_then(|i| self.sources.get(i))
    }

    /// Placement for the active source, if a source and logo are set.
    pub fn resolved(&self) -> Option<&ResolvedPlacement> {
        self.resolved.as_ref()
    }

    /// Inputs for rendering the active item, if it can be rendered.
    pub fn snapshot(&self) -> Option<RenderRequest> {
        Some(RenderRequest {
            source: self.active_source()?.clone(),
            logo: self.logo.clone()?,
            placement: self.resolved?,
            opacity: self.params.opacity(),
        })
    }

    // ── Collection ──────────────────────────────────────────────

    /// Append sources in arrival order. The first source added to an
    /// empty session becomes active.
    pub fn add_sources(&mut self, assets: impl IntoIterator<Item = ImageAsset>) {
        let was_empty = self.sources.is_empty();
        let before = self.sources.len();
        self.sources.extend(assets);

        tracing::debug!(
            added = self.sources.len() - before,
            total = self.sources.len(),
            "Added sources"
        );

        if was_empty && !self.sources.is_empty() {
            self.active = Some(0);
            self.recompute();
        }
    }

    /// Remove the source with `id`. Returns `false` if no source matched.
    pub fn remove_source(&mut self, id: AssetId) -> bool {
        let Some(pos) = self.sources.iter().position(|s| s.id() == id) else {
            return false;
        };
        self.sources.remove(pos);

        self.active = match self.active {
            _ if self.sources.is_empty() => None,
            Some(i) if i >= self.sources.len() => Some(self.sources.len() - 1),
            other => other,
        };

        tracing::debug!(%id, remaining = self.sources.len(), "Removed source");
        self.recompute();
        true
    }

    /// Replace the logo.
    pub fn set_logo(&mut self, logo: ImageAsset) {
        tracing::debug!(logo = %logo.label(), "Set logo");
        self.logo = Some(logo);
        self.recompute();
    }

    // ── Placement ───────────────────────────────────────────────

    pub fn set_output_size(&mut self, output_size: OutputSize) {
        self.output_size = output_size;
        self.recompute();
    }

    pub fn set_anchor(&mut self, preset: AnchorPreset) {
        self.params.set_anchor(preset);
        self.recompute();
    }

    /// Place the logo's top-left corner directly, bypassing presets.
    pub fn set_custom_position(&mut self, x: f64, y: f64) {
        self.params.set_anchor(Anchor::Custom { x, y });
        self.recompute();
    }

    pub fn set_size_percent(&mut self, size_percent: u8) {
        self.params.set_size_percent(size_percent);
        self.recompute();
    }

    pub fn set_margin(&mut self, margin: u32) {
        self.params.set_margin(margin);
        self.recompute();
    }

    /// Opacity does not affect geometry.
    pub fn set_opacity(&mut self, opacity: u8) {
        self.params.set_opacity(opacity);
    }

    // ── Navigation ──────────────────────────────────────────────

    /// Move to the next source. Stops at the last one.
    pub fn next(&mut self) -> bool {
        match self.active {
            Some(i) => self.select(i.saturating_add(1).min(self.sources.len() - 1)),
            None => false,
        }
    }

    /// Move to the previous source. Stops at the first one.
    pub fn previous(&mut self) -> bool {
        match self.active {
            Some(i) => self.select(i.saturating_sub(1)),
            None => false,
        }
    }

    /// Make the source at `index` active. Returns whether it changed.
    pub fn select(&mut self, index: usize) -> bool {
        if index >= self.sources.len() || self.active == Some(index) {
            return false;
        }
        self.active = Some(index);
        self.recompute();
        true
    }

    fn recompute(&mut self) {
        self.resolved = match (self.active_source(), self.logo.as_ref()) {
            (Some(source), Some(logo)) => recompute_placement(
                &self.params,
                source.dimensions(),
                logo.dimensions(),
                &self.output_size,
            ),
            _ => None,
        };
    }
}

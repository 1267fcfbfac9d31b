//! Live preview synchronization.
//!
//! Holds the latest full-resolution frame and its preview as one immutable
//! pair. Every recompute takes a [`RenderTicket`]; a result is only
//! installed if its ticket is newer than the one already published, so a
//! slow stale render can never overwrite a fresher one. Readers receive an
//! `Arc` snapshot and never see a half-written pair.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use image::RgbaImage;
use tokio::sync::watch;

use logomark_common::error::{LogomarkError, LogomarkResult};

use crate::asset::AssetId;
use crate::compositor::RenderedFrame;
use crate::preview::derive_preview;

/// Monotonic recompute sequence number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct RenderTicket(u64);

impl RenderTicket {
    pub fn get(self) -> u64 {
        self.0
    }
}

/// A published full-resolution frame and its preview.
#[derive(Debug)]
pub struct FramePair {
    pub ticket: RenderTicket,
    /// Source the frame was rendered from.
    pub source_id: AssetId,
    pub full: RenderedFrame,
    pub preview: RgbaImage,
}

/// What readers observe: the ticket of the last install and its frame,
/// if any (`None` after the session lost its source or logo).
#[derive(Debug, Clone, Default)]
pub struct PreviewState {
    pub ticket: RenderTicket,
    pub frame: Option<Arc<FramePair>>,
}

/// Keeps the (full, preview) pair in step with the most recent render.
pub struct PreviewSynchronizer {
    max_dimension: u32,
    issued: AtomicU64,
    state: watch::Sender<PreviewState>,
}

impl PreviewSynchronizer {
    pub fn new(max_dimension: u32) -> Self {
        let (state, _) = watch::channel(PreviewState::default());
        Self {
            max_dimension: max_dimension.max(1),
            issued: AtomicU64::new(0),
            state,
        }
    }

    pub fn max_dimension(&self) -> u32 {
        self.max_dimension
    }

    /// Start a recompute cycle. Later tickets supersede earlier ones.
    pub fn begin(&self) -> RenderTicket {
        RenderTicket(self.issued.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Whether no newer cycle has started since `ticket` was issued.
    pub fn is_current(&self, ticket: RenderTicket) -> bool {
        self.issued.load(Ordering::SeqCst) == ticket.0
    }

    /// Derive the preview and install the pair. Returns `false` when a newer
    /// result is already published and this one was dropped.
    pub fn publish(&self, ticket: RenderTicket, source_id: AssetId, full: RenderedFrame) -> bool {
        if self.state.borrow().ticket >= ticket {
            tracing::debug!(ticket = ticket.0, "Dropping stale frame before preview");
            return false;
        }
        let preview = derive_preview(&full, self.max_dimension);
        let pair = Arc::new(FramePair {
            ticket,
            source_id,
            full,
            preview,
        });
        self.install(ticket, Some(pair))
    }

    /// Like [`publish`](Self::publish), deriving the preview on the
    /// blocking pool.
    pub async fn publish_async(
        self: &Arc<Self>,
        ticket: RenderTicket,
        source_id: AssetId,
        full: RenderedFrame,
    ) -> LogomarkResult<bool> {
        let sync = Arc::clone(self);
        tokio::task::spawn_blocking(move || sync.publish(ticket, source_id, full))
            .await
            .map_err(|e| LogomarkError::render(format!("Preview task failed: {e}")))
    }

    /// Clear the published frame (nothing left to render).
    pub fn clear(&self, ticket: RenderTicket) -> bool {
        self.install(ticket, None)
    }

    /// The most recently installed pair.
    pub fn latest(&self) -> Option<Arc<FramePair>> {
        self.state.borrow().frame.clone()
    }

    /// Watch for newly installed pairs.
    pub fn subscribe(&self) -> watch::Receiver<PreviewState> {
        self.state.subscribe()
    }

    fn install(&self, ticket: RenderTicket, frame: Option<Arc<FramePair>>) -> bool {
        let installed = self.state.send_if_modified(|state| {
            if state.ticket >= ticket {
                return false;
            }
            state.ticket = ticket;
            state.frame = frame;
            true
        });
        if installed {
            tracing::trace!(ticket = ticket.0, "Installed preview state");
        } else {
            tracing::debug!(ticket = ticket.0, "Dropping stale frame");
        }
        installed
    }
}

//! Studio: a session wired to the renderer and the preview synchronizer.

use std::sync::Arc;

use tokio::task::JoinHandle;

use logomark_common::error::{LogomarkError, LogomarkResult};
use logomark_render_engine::compositor::render_async;
use logomark_render_engine::export::{
    export_all, export_single, BatchExport, ExportedItem, ProgressCallback,
};
use logomark_render_engine::sync::{FramePair, PreviewSynchronizer, RenderTicket};

use crate::session::{RenderRequest, Session};

/// Owns a [`Session`] and keeps its live preview current.
pub struct Studio {
    session: Session,
    sync: Arc<PreviewSynchronizer>,
}

impl Studio {
    pub fn new(session: Session, preview_max_dimension: u32) -> Self {
        Self {
            session,
            sync: Arc::new(PreviewSynchronizer::new(preview_max_dimension)),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Mutate the session. Call [`refresh`](Self::refresh) afterwards to
    /// bring the preview up to date.
    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    pub fn synchronizer(&self) -> &Arc<PreviewSynchronizer> {
        &self.sync
    }

    /// The most recently published frame pair.
    pub fn latest(&self) -> Option<Arc<FramePair>> {
        self.sync.latest()
    }

    /// Render the active item and publish it, waiting for completion.
    ///
    /// Returns the published pair, or `None` when there is nothing to
    /// render or a newer refresh superseded this one.
    pub async fn refresh(&self) -> LogomarkResult<Option<Arc<FramePair>>> {
        let ticket = self.sync.begin();
        let published =
            run_cycle(Arc::clone(&self.sync), ticket, self.session.snapshot()).await?;
        Ok(if published { self.sync.latest() } else { None })
    }

    /// Start a refresh in the background from the current session state.
    ///
    /// The session may be mutated and refreshed again immediately; an
    /// older cycle that finishes late is dropped.
    pub fn refresh_detached(&self) -> JoinHandle<LogomarkResult<bool>> {
        let ticket = self.sync.begin();
        let request = self.session.snapshot();
        tokio::spawn(run_cycle(Arc::clone(&self.sync), ticket, request))
    }

    /// Export every source with the session's logo and placement.
    pub async fn export_all(
        &self,
        progress: Option<ProgressCallback>,
    ) -> LogomarkResult<BatchExport> {
        let logo = self
            .session
            .logo()
            .ok_or_else(|| LogomarkError::invalid_input("No logo selected"))?;
        if self.session.is_empty() {
            return Err(LogomarkError::invalid_input("No source images to export"));
        }

        export_all(
            self.session.sources(),
            logo,
            self.session.params(),
            self.session.output_size(),
            progress,
        )
        .await
    }

    /// Export only the active source.
    pub async fn export_active(&self) -> LogomarkResult<ExportedItem> {
        let source = self
            .session
            .active_source()
            .ok_or_else(|| LogomarkError::invalid_input("No source image selected"))?;
        let logo = self
            .session
            .logo()
            .ok_or_else(|| LogomarkError::invalid_input("No logo selected"))?;

        export_single(source, logo, self.session.params(), self.session.output_size()).await
    }
}

/// One geometry → render → preview cycle. Returns whether a result was
/// installed.
async fn run_cycle(
    sync: Arc<PreviewSynchronizer>,
    ticket: RenderTicket,
    request: Option<RenderRequest>,
) -> LogomarkResult<bool> {
    let Some(request) = request else {
        return Ok(sync.clear(ticket));
    };

    let rendered = render_async(
        &request.source,
        &request.logo,
        request.placement,
        request.opacity,
    )
    .await;
    let frame = match rendered {
        Ok(frame) => frame,
        Err(e) => {
            // The installed pair shows a different item.
            if sync.is_current(ticket) {
                sync.clear(ticket);
            }
            tracing::warn!(
                source = %request.source.label(),
                error = %e,
                "Preview render failed"
            );
            return Err(e);
        }
    };

    if !sync.is_current(ticket) {
        tracing::debug!(ticket = ticket.get(), "Superseded before publish");
        return Ok(false);
    }

    sync.publish_async(ticket, request.source.id(), frame).await
}

//! Dispatch of incremental recognition results

use std::io::Write;

use tracing::trace;

use super::normalize::TextNormalizer;
use super::store::TranscriptStore;
use crate::session::RecognitionResult;
use crate::view::ViewportRenderer;

/// Routes each incoming recognition result to the transcript store and the
/// live viewport.
///
/// Finals are committed and clear the interim tail; interims fully replace
/// the previous interim (never merged). Results are handled one at a time,
/// strictly in delivery order.
pub struct ResultRouter<W: Write> {
    normalizer: TextNormalizer,
    store: TranscriptStore,
    renderer: ViewportRenderer<W>,
    interim: String,
    width: usize,
}

impl<W: Write> ResultRouter<W> {
    pub fn new(
        normalizer: TextNormalizer,
        store: TranscriptStore,
        renderer: ViewportRenderer<W>,
        width: usize,
    ) -> Self {
        Self {
            normalizer,
            store,
            renderer,
            interim: String::new(),
            width,
        }
    }

    /// Handle one recognition update
    pub fn handle(&mut self, result: &RecognitionResult) -> std::io::Result<()> {
        trace!(is_final = result.is_final, text = %result.text, "recognition update");

        if result.is_final {
            self.store.commit_final(&result.text);
            self.interim.clear();
            return self
                .renderer
                .render(&self.store.snapshot(), "", self.width);
        }

        let cleaned = self.normalizer.clean(&result.text);
        if cleaned.is_empty() {
            // Whitespace-only interim: a no-op tick, never rendered as blank.
            return Ok(());
        }

        self.interim = cleaned;
        self.renderer
            .render(&self.store.snapshot(), &self.interim, self.width)
    }

    /// Current committed transcript
    pub fn transcript(&self) -> String {
        self.store.snapshot()
    }

    /// Number of committed segments
    pub fn committed_segments(&self) -> usize {
        self.store.len()
    }

    /// Erase the live viewport and hand back the final transcript
    pub fn finish(mut self) -> std::io::Result<String> {
        self.renderer.clear()?;
        Ok(self.store.snapshot())
    }

    /// Borrow the renderer (used by tests to inspect terminal writes)
    pub fn renderer(&self) -> &ViewportRenderer<W> {
        &self.renderer
    }
}

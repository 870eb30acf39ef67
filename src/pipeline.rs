//! One save execution: gather page data, export HTML and capture a
//! screenshot, audit translations, hand the payload to the sink, and resolve
//! the status register.
//!
//! This module is internal -- executions are scheduled by the worker and
//! triggered through [`PageSaverHandle`](crate::PageSaverHandle).

use std::sync::Arc;
use std::time::Duration;

use crate::dom::DomAccess;
use crate::error::Result;
use crate::host::{Host, SAVE_PAGE_ACTION};
use crate::page::{BlockRecord, SavePayload};
use crate::screenshot::ScreenshotCapturer;
use crate::status::{SaveStatus, StatusRegister};
use crate::translations::{self, TranslationRegistry};

pub(crate) struct SavePipeline<H: Host, D: DomAccess> {
    host: Arc<H>,
    capturer: ScreenshotCapturer<D>,
    status: StatusRegister,
    translations: TranslationRegistry,
    saved_settle: Duration,
}

impl<H: Host, D: DomAccess> SavePipeline<H, D> {
    pub(crate) fn new(
        host: Arc<H>,
        capturer: ScreenshotCapturer<D>,
        status: StatusRegister,
        translations: TranslationRegistry,
        saved_settle: Duration,
    ) -> Self {
        Self {
            host,
            capturer,
            status,
            translations,
            saved_settle,
        }
    }

    /// Full save: HTML export and screenshot run concurrently; an export
    /// failure aborts, a capture failure degrades to "no screenshot".
    pub(crate) async fn execute(&self, auto_save: bool) -> Result<bool> {
        self.status.set(SaveStatus::Saving);
        let page = self.host.page_data();
        let theme = self.host.theme();

        let (exported, screenshot) = futures::future::join(
            self.host.export_html(&page.blocks, &theme),
            self.capturer.capture(),
        )
        .await;
        let dom_elements = match exported {
            Ok(html) => Some(html),
            Err(e) => {
                tracing::error!("HTML export failed, aborting save: {e}");
                self.status.set(SaveStatus::Unsaved);
                return Err(e);
            }
        };

        let need_translations = self.needs_translations(&page.blocks);
        self.deliver(SavePayload {
            auto_save,
            blocks: page.blocks,
            theme,
            need_translations,
            dom_elements,
            screenshot,
        })
        .await
    }

    /// Autosave: no throttle, no HTML export. Gated on permission and page
    /// readiness; a failed guard is a silent no-op with no side effects.
    pub(crate) async fn execute_autosave(&self) -> Result<bool> {
        if !self.host.has_permission(SAVE_PAGE_ACTION) || !self.host.is_page_loaded() {
            tracing::debug!("autosave skipped: not permitted or page not loaded");
            return Ok(false);
        }

        self.status.set(SaveStatus::Saving);
        let page = self.host.page_data();
        let theme = self.host.theme();
        let screenshot = self.capturer.capture().await;

        let need_translations = self.needs_translations(&page.blocks);
        self.deliver(SavePayload {
            auto_save: true,
            blocks: page.blocks,
            theme,
            need_translations,
            dom_elements: None,
            screenshot,
        })
        .await
    }

    pub(crate) fn mark_unsaved(&self) {
        self.status.set(SaveStatus::Unsaved);
    }

    fn needs_translations(&self, blocks: &[BlockRecord]) -> bool {
        let selected = self.host.selected_lang();
        if selected.is_empty() || selected == self.host.fallback_lang() {
            return false;
        }
        translations::has_missing_translations(&self.translations, blocks, &selected)
    }

    /// Invoke the sink exactly once, then settle into the terminal status.
    /// The settle delay keeps the "saving" indicator visible even for saves
    /// that complete near-instantly.
    async fn deliver(&self, payload: SavePayload) -> Result<bool> {
        let block_count = payload.blocks.len();
        match self.host.save(payload).await {
            Ok(()) => {
                tracing::debug!("saved {block_count} blocks");
                tokio::time::sleep(self.saved_settle).await;
                self.status.set(SaveStatus::Saved);
                Ok(true)
            }
            Err(e) => {
                tracing::error!("save sink rejected payload: {e}");
                self.status.set(SaveStatus::Unsaved);
                Err(e)
            }
        }
    }
}

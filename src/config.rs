//! Builder for configuring and launching the background save worker.

use std::sync::Arc;
use std::time::Duration;

use crate::dom::DomAccess;
use crate::handle::PageSaverHandle;
use crate::host::Host;
use crate::pipeline::SavePipeline;
use crate::screenshot::ScreenshotCapturer;
use crate::status::StatusRegister;
use crate::translations::TranslationRegistry;
use crate::worker;

/// Default identifier of the capture surface.
pub const DEFAULT_SURFACE_ID: &str = "canvas-iframe";

/// Builder for configuring and starting a [`PageSaverHandle`].
///
/// Provides a fluent API for setting the throttle window, settle delays,
/// capture surface identifier, command channel capacity, and the localizable
/// field declarations used by the translation audit.
///
/// # Example
///
/// ```rust,no_run
/// use std::time::Duration;
/// use page_saver::{NoSurfaceDom, PageSaverBuilder};
///
/// # use page_saver::{BlockRecord, Host, ImageFile, PageData, SavePayload, ThemeDescriptor};
/// # struct MyApp;
/// # impl Host for MyApp {
/// #     fn page_data(&self) -> PageData { PageData::default() }
/// #     fn theme(&self) -> ThemeDescriptor { ThemeDescriptor::default() }
/// #     async fn export_html(&self, _b: &[BlockRecord], _t: &ThemeDescriptor) -> page_saver::Result<String> { Ok(String::new()) }
/// #     async fn save(&self, _p: SavePayload) -> page_saver::Result<()> { Ok(()) }
/// #     async fn upload_image(&self, _f: ImageFile) -> page_saver::Result<String> { Ok(String::new()) }
/// # }
/// # fn example() {
/// let handle = PageSaverBuilder::new(MyApp, NoSurfaceDom)
///     .throttle_window(Duration::from_secs(3))
///     .localizable_fields("Heading", ["content"])
///     .localizable_fields("Button", ["label"])
///     .build();
/// # }
/// ```
pub struct PageSaverBuilder<H: Host, D: DomAccess> {
    host: H,
    dom: D,
    throttle_window: Duration,
    saved_settle: Duration,
    screenshot_settle: Duration,
    surface_id: String,
    channel_buffer: usize,
    translations: TranslationRegistry,
}

impl<H: Host, D: DomAccess> PageSaverBuilder<H, D> {
    /// Create a new builder with the given host and DOM access and sensible
    /// defaults.
    ///
    /// Defaults: 3 s throttle window, 100 ms settle delays, surface id
    /// `"canvas-iframe"`, channel buffer 64, no localizable fields.
    pub fn new(host: H, dom: D) -> Self {
        Self {
            host,
            dom,
            throttle_window: Duration::from_secs(3),
            saved_settle: Duration::from_millis(100),
            screenshot_settle: Duration::from_millis(100),
            surface_id: DEFAULT_SURFACE_ID.to_string(),
            channel_buffer: 64,
            translations: TranslationRegistry::new(),
        }
    }

    /// Cooldown window of the trailing-edge throttle: at most one save
    /// executes per window, extra triggers coalesce into one trailing run.
    pub fn throttle_window(mut self, window: Duration) -> Self {
        self.throttle_window = window;
        self
    }

    /// Delay between the sink resolving and the transition back to `SAVED`,
    /// so the "saving" indicator is visibly shown even for fast saves.
    pub fn saved_settle(mut self, settle: Duration) -> Self {
        self.saved_settle = settle;
        self
    }

    /// Delay between swapping image sources and rasterizing the surface, so
    /// the swaps take visual effect first.
    pub fn screenshot_settle(mut self, settle: Duration) -> Self {
        self.screenshot_settle = settle;
        self
    }

    /// Identifier under which the capture surface is looked up.
    pub fn surface_id(mut self, id: impl Into<String>) -> Self {
        self.surface_id = id.into();
        self
    }

    /// Capacity of the command channel between triggers and the worker.
    pub fn channel_buffer(mut self, size: usize) -> Self {
        self.channel_buffer = size;
        self
    }

    /// Declare the localizable fields of a block type for the translation
    /// audit. Types never declared here are considered fully translated.
    pub fn localizable_fields<I, F>(mut self, block_type: impl Into<String>, fields: I) -> Self
    where
        I: IntoIterator<Item = F>,
        F: Into<String>,
    {
        self.translations.register(block_type, fields);
        self
    }

    /// Consume the builder, spawn the background worker, and return the
    /// [`PageSaverHandle`] used to trigger saves and control the worker
    /// lifecycle.
    pub fn build(self) -> PageSaverHandle<H> {
        let host = Arc::new(self.host);

        let notify_host = Arc::clone(&host);
        let status = StatusRegister::new(move |state| notify_host.save_state_changed(state));
        let status_rx = status.subscribe();

        let capturer = ScreenshotCapturer::new(self.dom, self.surface_id, self.screenshot_settle);
        let pipeline = SavePipeline::new(
            Arc::clone(&host),
            capturer,
            status,
            self.translations,
            self.saved_settle,
        );

        let (tx, rx) = tokio::sync::mpsc::channel(self.channel_buffer);
        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();

        let worker_handle =
            tokio::spawn(worker::run(rx, shutdown_rx, pipeline, self.throttle_window));

        PageSaverHandle::new(host, tx, status_rx, shutdown_tx, worker_handle)
    }
}

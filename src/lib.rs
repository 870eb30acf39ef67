//! # page_saver
//!
//! Save/capture orchestration for an in-browser page builder: a
//! concurrency-bounded pipeline that turns an in-memory block tree into a
//! persisted artifact (serialized blocks + rendered HTML + a screenshot +
//! translation-completeness metadata) without blocking the UI or corrupting
//! save state under rapid repeated triggers.
//!
//! ## Overview
//!
//! `page_saver` runs a background worker that owns the save status register
//! and executes saves one at a time. Triggers are rate-limited by a
//! trailing-edge throttle: the first trigger in a quiet period runs
//! immediately, triggers inside the cooldown window collapse into a single
//! trailing run. Each execution reads the page through the host-supplied
//! [`Host`] callbacks, exports HTML and captures a screenshot concurrently,
//! audits translation completeness, and hands the assembled [`SavePayload`]
//! to the host's save sink exactly once.
//!
//! Screenshot capture is always best-effort: a missing surface, a broken
//! image, or a cross-origin taint degrades to "no screenshot" and is only
//! logged. HTML-export failures and sink rejections propagate to the caller
//! and leave the page marked [`SaveStatus::Unsaved`].
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use page_saver::{
//!     BlockRecord, Host, ImageFile, NoSurfaceDom, PageData, PageSaverBuilder, SavePayload,
//!     ThemeDescriptor,
//! };
//!
//! struct MyApp;
//!
//! impl Host for MyApp {
//!     fn page_data(&self) -> PageData {
//!         PageData::default()
//!     }
//!
//!     fn theme(&self) -> ThemeDescriptor {
//!         ThemeDescriptor::default()
//!     }
//!
//!     async fn export_html(
//!         &self,
//!         blocks: &[BlockRecord],
//!         _theme: &ThemeDescriptor,
//!     ) -> page_saver::Result<String> {
//!         Ok(format!("<main data-blocks=\"{}\"></main>", blocks.len()))
//!     }
//!
//!     async fn save(&self, _payload: SavePayload) -> page_saver::Result<()> {
//!         // persist the payload ...
//!         Ok(())
//!     }
//!
//!     async fn upload_image(&self, file: ImageFile) -> page_saver::Result<String> {
//!         Ok(format!("https://cdn.example.com/{}", file.name))
//!     }
//! }
//!
//! # async fn example() {
//! let handle = PageSaverBuilder::new(MyApp, NoSurfaceDom)
//!     .localizable_fields("Heading", ["content"])
//!     .build();
//!
//! handle.save_page(false).await.unwrap();
//!
//! // On shutdown, flush any pending coalesced trigger:
//! handle.shutdown().await;
//! # }
//! ```
//!
//! ## Save lifecycle
//!
//! The status register moves `SAVED -> SAVING` synchronously when an
//! execution starts, and `SAVING -> SAVED` only after the sink resolves plus
//! a short settle delay. [`PageSaverHandle::mark_unsaved`] moves any state to
//! `UNSAVED` when the block tree changes. Every transition is mirrored to
//! [`Host::save_state_changed`] and observable through
//! [`PageSaverHandle::subscribe`].

pub mod config;
pub mod dom;
pub mod error;
pub mod handle;
pub mod host;
pub mod page;
pub mod screenshot;
pub mod status;
pub mod translations;

mod pipeline;
mod worker;

pub use config::{DEFAULT_SURFACE_ID, PageSaverBuilder};
pub use dom::{CanvasSurface, DomAccess, ImageNode, NoSurface, NoSurfaceDom};
pub use error::{Result, SaveError};
pub use handle::{PageSaverHandle, PageSaverSender};
pub use host::{Host, SAVE_PAGE_ACTION};
pub use page::{BlockRecord, ImageFile, PageData, SavePayload, ThemeDescriptor};
pub use screenshot::{ImageSourceBackup, ScreenshotCapturer, inline_images};
pub use status::SaveStatus;
pub use translations::{PARTIAL_BLOCK_TYPE, TranslationRegistry, has_missing_translations};

use std::sync::OnceLock;

// Global sender for the optional singleton pattern.
static GLOBAL: OnceLock<PageSaverSender> = OnceLock::new();

/// Initialize the global [`PageSaverSender`] singleton.
///
/// Call once at application startup. The returned [`PageSaverHandle`] must be
/// kept alive for the lifetime of the application and
/// [`PageSaverHandle::shutdown`] should be called before exit to flush any
/// pending trailing save.
///
/// After calling this, any part of the application can trigger saves through
/// [`global()`].
///
/// # Panics
///
/// Panics if called more than once.
pub fn init<H: Host, D: DomAccess>(builder: PageSaverBuilder<H, D>) -> PageSaverHandle<H> {
    let handle = builder.build();
    GLOBAL
        .set(handle.sender())
        .unwrap_or_else(|_| panic!("Global PageSaver already initialized"));
    handle
}

/// Retrieve the global [`PageSaverSender`] previously registered with
/// [`init()`].
///
/// Returns `None` if [`init()`] has not been called.
pub fn global() -> Option<&'static PageSaverSender> {
    GLOBAL.get()
}

//! The [`Host`] trait: every callback the embedding application supplies to
//! the save pipeline.

use std::future::Future;

use crate::error::Result;
use crate::page::{BlockRecord, ImageFile, PageData, SavePayload, ThemeDescriptor};
use crate::status::SaveStatus;

/// Permission consulted by the autosave entry point.
pub const SAVE_PAGE_ACTION: &str = "save_page";

/// Collaborator interface supplied by the embedding application.
///
/// The pipeline treats all of these as opaque: it never inspects what the
/// sink does with a payload or how the exporter renders HTML. Methods with
/// defaults are optional for hosts that do not care about the corresponding
/// signal.
///
/// Implementations must be `Send + Sync + 'static` so they can be shared with
/// the background worker task.
///
/// # Implementing a host
///
/// ```rust,no_run
/// use page_saver::{BlockRecord, Host, ImageFile, PageData, SavePayload, ThemeDescriptor};
///
/// struct MyApp;
///
/// impl Host for MyApp {
///     fn page_data(&self) -> PageData {
///         PageData::default()
///     }
///
///     fn theme(&self) -> ThemeDescriptor {
///         ThemeDescriptor::default()
///     }
///
///     async fn export_html(
///         &self,
///         blocks: &[BlockRecord],
///         _theme: &ThemeDescriptor,
///     ) -> page_saver::Result<String> {
///         Ok(format!("<main data-blocks=\"{}\"></main>", blocks.len()))
///     }
///
///     async fn save(&self, _payload: SavePayload) -> page_saver::Result<()> {
///         Ok(())
///     }
///
///     async fn upload_image(&self, file: ImageFile) -> page_saver::Result<String> {
///         Ok(format!("https://cdn.example.com/{}", file.name))
///     }
/// }
/// ```
pub trait Host: Send + Sync + 'static {
    /// Read the current block tree. A best-effort point-in-time read, called
    /// once at the start of every save execution.
    fn page_data(&self) -> PageData;

    /// The active visual theme descriptor.
    fn theme(&self) -> ThemeDescriptor;

    /// The language currently being edited. Empty means "no localization".
    fn selected_lang(&self) -> String {
        String::new()
    }

    /// The fallback language. When it equals [`selected_lang`](Self::selected_lang),
    /// the translation audit is skipped entirely.
    fn fallback_lang(&self) -> String {
        String::new()
    }

    /// Export the block tree to a static HTML representation.
    ///
    /// Failures are **not** swallowed: they abort the save and propagate to
    /// the caller of `save_page`.
    fn export_html(
        &self,
        blocks: &[BlockRecord],
        theme: &ThemeDescriptor,
    ) -> impl Future<Output = Result<String>> + Send;

    /// The save sink: persist the assembled payload. Called exactly once per
    /// save execution. A rejection propagates to the caller and marks the
    /// page [`Unsaved`](SaveStatus::Unsaved).
    fn save(&self, payload: SavePayload) -> impl Future<Output = Result<()>> + Send;

    /// Fire-and-forget notification invoked on every status transition.
    fn save_state_changed(&self, _status: SaveStatus) {}

    /// Upload an image file, returning its public URL. Used by the standalone
    /// [`upload_image`](crate::PageSaverHandle::upload_image) entry point,
    /// never by the save sequence itself.
    fn upload_image(&self, file: ImageFile) -> impl Future<Output = Result<String>> + Send;

    /// Permission check consulted only by the autosave entry point, with
    /// [`SAVE_PAGE_ACTION`] as the action.
    fn has_permission(&self, _action: &str) -> bool {
        true
    }

    /// Readiness flag consulted only by the autosave entry point. Autosaves
    /// before the page has fully loaded are silently dropped.
    fn is_page_loaded(&self) -> bool {
        true
    }
}

//! Error types for the `page_saver` crate.

use std::error::Error as StdError;
use std::sync::Arc;

/// All errors that can surface from the save pipeline.
///
/// The enum is `Clone` because one throttled save execution can resolve many
/// coalesced callers, each of which receives its own copy of the outcome.
/// Variants that wrap a host-side error therefore hold it behind an [`Arc`].
#[derive(Debug, Clone, thiserror::Error)]
pub enum SaveError {
    /// The host's HTML exporter failed. Never swallowed by the pipeline.
    #[error("HTML export failed: {0}")]
    HtmlExport(#[source] Arc<dyn StdError + Send + Sync>),

    /// The host save sink rejected the assembled payload.
    #[error("save sink rejected payload: {0}")]
    Sink(#[source] Arc<dyn StdError + Send + Sync>),

    /// The host's image upload callback failed.
    #[error("image upload failed: {0}")]
    ImageUpload(#[source] Arc<dyn StdError + Send + Sync>),

    /// An image could not be exported to an inline copy, typically because
    /// the canvas is tainted by cross-origin pixel data.
    #[error("canvas export blocked: {0}")]
    Canvas(String),

    /// Rasterizing the capture surface failed.
    #[error("screenshot render failed: {0}")]
    Render(String),

    /// The command channel to the background worker is closed or full.
    #[error("save channel closed or full")]
    ChannelClosed,
}

impl SaveError {
    /// Wrap a host HTML-export error.
    pub fn html_export(source: impl StdError + Send + Sync + 'static) -> Self {
        Self::HtmlExport(Arc::new(source))
    }

    /// Wrap a host save-sink error.
    pub fn sink(source: impl StdError + Send + Sync + 'static) -> Self {
        Self::Sink(Arc::new(source))
    }

    /// Wrap a host image-upload error.
    pub fn image_upload(source: impl StdError + Send + Sync + 'static) -> Self {
        Self::ImageUpload(Arc::new(source))
    }
}

/// A type alias for `Result<T, SaveError>`.
pub type Result<T> = std::result::Result<T, SaveError>;

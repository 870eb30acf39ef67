//! Screenshot capture of the rendering surface.
//!
//! A capture is always optional: whatever goes wrong, the save carries on
//! without a screenshot. The only invariant that must hold is that every
//! proxied image source is restored.

mod proxy;

pub use proxy::{ImageSourceBackup, inline_images};

use std::time::Duration;

use crate::dom::{CanvasSurface as _, DomAccess};

/// Screenshots are rendered over an opaque white background.
const BACKGROUND: &str = "#ffffff";

/// Produces a single still image of the current visual canvas.
///
/// Drives [`inline_images`] to make cross-origin images canvas-readable,
/// waits for the source swaps to take visual effect, rasterizes the surface,
/// and restores the original sources unconditionally.
pub struct ScreenshotCapturer<D: DomAccess> {
    dom: D,
    surface_id: String,
    settle: Duration,
}

impl<D: DomAccess> ScreenshotCapturer<D> {
    pub fn new(dom: D, surface_id: impl Into<String>, settle: Duration) -> Self {
        Self {
            dom,
            surface_id: surface_id.into(),
            settle,
        }
    }

    /// Capture the surface as a PNG data URI.
    ///
    /// Returns `None` when the surface is not mounted or rendering fails;
    /// neither is fatal to the surrounding save.
    pub async fn capture(&self) -> Option<String> {
        let Some(surface) = self.dom.find_surface(&self.surface_id) else {
            tracing::debug!(
                "capture surface {:?} not present, skipping screenshot",
                self.surface_id
            );
            return None;
        };

        let backup = inline_images(surface.images());
        tokio::time::sleep(self.settle).await;

        let rendered = surface.render_png(BACKGROUND).await;
        // Restore before looking at the result so the failure path cannot
        // leave inline sources behind.
        backup.restore();

        match rendered {
            Ok(data_uri) => Some(data_uri),
            Err(e) => {
                tracing::warn!("failed to capture canvas screenshot: {e}");
                None
            }
        }
    }
}

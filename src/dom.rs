//! Seams onto the rendering surface: locating the capture surface, walking
//! its images, and rasterizing it.
//!
//! The pipeline never touches a real DOM. Hosts embedding a browser surface
//! implement these traits over their document handles; headless hosts can use
//! [`NoSurfaceDom`] and every capture degrades to "no screenshot", which the
//! pipeline treats as a normal condition.

use std::future::Future;
use std::sync::Arc;

use crate::error::Result;

/// Entry point into the host's document: resolves the well-known capture
/// surface identifier to a surface, if one is currently mounted.
pub trait DomAccess: Send + Sync + 'static {
    type Surface: CanvasSurface;

    /// Locate the capture surface by its identifier. `None` is a normal,
    /// handled condition, not an error.
    fn find_surface(&self, id: &str) -> Option<Self::Surface>;
}

/// The rendered preview area whose visual output is captured as a screenshot.
pub trait CanvasSurface: Send + Sync {
    /// Every image element currently under the surface.
    fn images(&self) -> Vec<Arc<dyn ImageNode>>;

    /// Rasterize the surface's visual subtree to a PNG data URI over the
    /// given opaque background color. Transparency is never preserved.
    fn render_png(&self, background: &str) -> impl Future<Output = Result<String>> + Send;
}

/// A single image element on the capture surface.
///
/// Methods take `&self`: like a real DOM node, implementations are expected
/// to use interior mutability for the source swap.
pub trait ImageNode: Send + Sync {
    /// The element's current source, or `None` if it has none.
    fn src(&self) -> Option<String>;

    /// Overwrite the element's source.
    fn set_src(&self, src: &str);

    /// Whether the element has finished loading.
    fn is_complete(&self) -> bool;

    /// Decoded width in pixels. Zero means broken or still pending.
    fn natural_width(&self) -> u32;

    /// Decoded height in pixels.
    fn natural_height(&self) -> u32;

    /// Draw the already-decoded bitmap onto an offscreen canvas sized to its
    /// natural dimensions and export it as an inline PNG data URI.
    ///
    /// Fails with [`SaveError::Canvas`](crate::SaveError::Canvas) when the
    /// pixel data is not readable, e.g. a cross-origin taint.
    fn encode_png_data_uri(&self) -> Result<String>;
}

/// [`DomAccess`] for hosts with no capture surface at all (server-side or
/// test environments). `find_surface` always returns `None`, so every save
/// completes without a screenshot.
pub struct NoSurfaceDom;

impl DomAccess for NoSurfaceDom {
    type Surface = NoSurface;

    fn find_surface(&self, _id: &str) -> Option<NoSurface> {
        None
    }
}

/// Uninhabited surface type backing [`NoSurfaceDom`].
pub enum NoSurface {}

impl CanvasSurface for NoSurface {
    fn images(&self) -> Vec<Arc<dyn ImageNode>> {
        match *self {}
    }

    async fn render_png(&self, _background: &str) -> Result<String> {
        match *self {}
    }
}

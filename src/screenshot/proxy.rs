//! Temporary image-source proxying: rewrites image sources to inline data so
//! the rasterizer can read pixel data across origins, and restores them
//! afterwards.

use std::sync::Arc;

use crate::dom::ImageNode;

/// Backup of original image sources taken while proxying.
///
/// Scoped to a single capture: every entry recorded here **must** be restored
/// or the corresponding element permanently loses its real source. The
/// capturer calls [`restore`](Self::restore) on every exit path, including
/// when rendering fails.
pub struct ImageSourceBackup {
    entries: Vec<(Arc<dyn ImageNode>, String)>,
}

impl ImageSourceBackup {
    /// Reinstate every recorded original source, consuming the backup.
    pub fn restore(self) {
        for (image, src) in self.entries {
            image.set_src(&src);
        }
    }

    /// Number of images that were proxied.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no image was proxied.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Swap every eligible image's source for an inline PNG copy, returning the
/// backup of the original sources.
///
/// Images with no source, an already-inline (`data:`) source, an unfinished
/// load, or zero natural width are left untouched: a capture must not stall
/// or crash on broken images. A per-image encode failure (e.g. a cross-origin
/// canvas taint) is logged and skips that single image only.
pub fn inline_images<I>(images: I) -> ImageSourceBackup
where
    I: IntoIterator<Item = Arc<dyn ImageNode>>,
{
    let mut entries = Vec::new();

    for image in images {
        let Some(src) = image.src() else { continue };
        if src.is_empty() || src.starts_with("data:") {
            continue;
        }
        if !image.is_complete() || image.natural_width() == 0 {
            continue;
        }

        match image.encode_png_data_uri() {
            Ok(data_uri) => {
                image.set_src(&data_uri);
                entries.push((image, src));
            }
            Err(e) => {
                tracing::warn!("could not convert image to inline data ({src}): {e}");
            }
        }
    }

    ImageSourceBackup { entries }
}

#[cfg(test)]
mod tests {
    use super::super::testutil::FakeImage;
    use super::*;

    fn as_nodes(images: &[Arc<FakeImage>]) -> Vec<Arc<dyn ImageNode>> {
        images
            .iter()
            .map(|img| Arc::clone(img) as Arc<dyn ImageNode>)
            .collect()
    }

    #[test]
    fn eligible_image_is_inlined_and_recorded() {
        let img = Arc::new(FakeImage::loaded("https://cdn.example.com/a.png", 4, 4));
        let backup = inline_images(as_nodes(&[Arc::clone(&img)]));

        assert_eq!(backup.len(), 1);
        assert!(img.current_src().starts_with("data:image/png;base64,"));
    }

    #[test]
    fn restore_reinstates_the_exact_original_source() {
        let img = Arc::new(FakeImage::loaded("https://cdn.example.com/a.png", 4, 4));
        let backup = inline_images(as_nodes(&[Arc::clone(&img)]));
        assert_ne!(img.current_src(), "https://cdn.example.com/a.png");

        backup.restore();
        assert_eq!(img.current_src(), "https://cdn.example.com/a.png");
    }

    #[test]
    fn zero_natural_width_is_left_untouched() {
        let img = Arc::new(FakeImage::loaded("https://cdn.example.com/broken.png", 0, 0));
        let backup = inline_images(as_nodes(&[Arc::clone(&img)]));

        assert!(backup.is_empty());
        assert_eq!(img.current_src(), "https://cdn.example.com/broken.png");
    }

    #[test]
    fn incomplete_image_is_left_untouched() {
        let img = Arc::new(FakeImage::pending("https://cdn.example.com/slow.png"));
        let backup = inline_images(as_nodes(&[Arc::clone(&img)]));

        assert!(backup.is_empty());
        assert_eq!(img.current_src(), "https://cdn.example.com/slow.png");
    }

    #[test]
    fn already_inline_source_is_skipped() {
        let img = Arc::new(FakeImage::loaded("data:image/png;base64,AAAA", 4, 4));
        let backup = inline_images(as_nodes(&[Arc::clone(&img)]));

        assert!(backup.is_empty());
        assert_eq!(img.current_src(), "data:image/png;base64,AAAA");
    }

    #[test]
    fn sourceless_image_is_skipped() {
        let img = Arc::new(FakeImage::loaded("", 4, 4));
        let backup = inline_images(as_nodes(&[Arc::clone(&img)]));
        assert!(backup.is_empty());
    }

    #[test]
    fn tainted_image_is_skipped_but_others_proceed() {
        let tainted = Arc::new(FakeImage::tainted("https://other-origin.test/x.png", 4, 4));
        let good = Arc::new(FakeImage::loaded("https://cdn.example.com/y.png", 4, 4));
        let backup = inline_images(as_nodes(&[Arc::clone(&tainted), Arc::clone(&good)]));

        assert_eq!(backup.len(), 1);
        assert_eq!(tainted.current_src(), "https://other-origin.test/x.png");
        assert!(good.current_src().starts_with("data:"));

        backup.restore();
        assert_eq!(good.current_src(), "https://cdn.example.com/y.png");
    }
}

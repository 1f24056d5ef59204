use image::RgbaImage;

use crate::foundation::core::{CanvasSize, Color, ImageData, ImageRef, Rect};
use crate::raster::compose;

/// The injected 2D drawing surface the editing core replays history against.
///
/// The core assumes only these capabilities: clearing, filling with a color,
/// rectangular fills for draw steps, and extraction of the current contents
/// as an opaque image reference. Hosts with a richer surface (e.g. an HTML
/// canvas) implement this over whatever API they have.
pub trait RenderContext {
    /// Surface dimensions. A zero-area surface is unusable and turns every
    /// history operation into a no-op.
    fn size(&self) -> CanvasSize;

    /// Reset every pixel to fully transparent.
    fn clear(&mut self);

    /// Source-over fill of the whole surface with `color`.
    fn fill(&mut self, color: Color);

    /// Source-over fill of `rect` (clamped to bounds) with `color`.
    fn fill_rect(&mut self, rect: Rect, color: Color);

    /// Extract current contents as an immutable image reference.
    fn snapshot(&self) -> ImageRef;
}

/// In-memory raster surface backed by an [`image::RgbaImage`].
///
/// This is the surface headless hosts and the test suite draw on.
#[derive(Clone, Debug)]
pub struct RasterContext {
    image: RgbaImage,
}

impl RasterContext {
    /// A transparent surface of the given size.
    pub fn new(size: CanvasSize) -> Self {
        Self {
            image: RgbaImage::new(size.width, size.height),
        }
    }

    fn blend_span(&mut self, x0: u32, y0: u32, x1: u32, y1: u32, color: Color) {
        let src = color.to_rgba8();
        for y in y0..y1 {
            for x in x0..x1 {
                let px = self.image.get_pixel_mut(x, y);
                px.0 = compose::over(px.0, src, 1.0);
            }
        }
    }
}

impl RenderContext for RasterContext {
    fn size(&self) -> CanvasSize {
        CanvasSize::new(self.image.width(), self.image.height())
    }

    fn clear(&mut self) {
        for px in self.image.pixels_mut() {
            px.0 = [0, 0, 0, 0];
        }
    }

    fn fill(&mut self, color: Color) {
        let size = self.size();
        self.blend_span(0, 0, size.width, size.height, color);
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        let size = self.size();
        let x0 = rect.x0.max(0.0).floor() as u32;
        let y0 = rect.y0.max(0.0).floor() as u32;
        let x1 = (rect.x1.max(0.0).ceil() as u32).min(size.width);
        let y1 = (rect.y1.max(0.0).ceil() as u32).min(size.height);
        if x0 >= x1 || y0 >= y1 {
            return;
        }
        self.blend_span(x0, y0, x1, y1, color);
    }

    fn snapshot(&self) -> ImageRef {
        ImageRef::new(ImageData {
            size: self.size(),
            pixels: self.image.as_raw().clone(),
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/raster/context.rs"]
mod tests;

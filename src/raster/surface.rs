//! Destination pixel surface for compositing.

use super::{PixelRect, Rgba};

/// Owned RGBA surface the visible viewport is composed on.
///
/// Row-major, `width * height` pixels. Drawing outside the bounds is
/// clipped silently.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PixelSurface {
    width: usize,
    height: usize,
    pixels: Vec<Rgba>,
}

impl PixelSurface {
    pub fn new(width: usize, height: usize) -> Self {
        PixelSurface {
            width,
            height,
            pixels: vec![Rgba::TRANSPARENT; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn pixels(&self) -> &[Rgba] {
        &self.pixels
    }

    /// Resizes the surface, discarding content when the size changes.
    pub fn resize(&mut self, width: usize, height: usize) {
        if width == self.width && height == self.height {
            return;
        }
        self.width = width;
        self.height = height;
        self.pixels = vec![Rgba::TRANSPARENT; width * height];
    }

    pub fn clear(&mut self) {
        self.pixels.fill(Rgba::TRANSPARENT);
    }

    pub fn get(&self, x: usize, y: usize) -> Option<Rgba> {
        if x < self.width && y < self.height {
            Some(self.pixels[y * self.width + x])
        } else {
            None
        }
    }

    /// Overwrites one pixel.
    pub fn set(&mut self, x: usize, y: usize, color: Rgba) {
        if x < self.width && y < self.height {
            self.pixels[y * self.width + x] = color;
        }
    }

    /// Composites `color` over one pixel.
    pub fn blend(&mut self, x: usize, y: usize, color: Rgba) {
        if x < self.width && y < self.height {
            let idx = y * self.width + x;
            self.pixels[idx] = color.over(self.pixels[idx]);
        }
    }

    /// Composites `color` over every pixel of `rect`.
    pub fn blend_rect(&mut self, rect: PixelRect, color: Rgba) {
        let x1 = rect.right().min(self.width);
        let y1 = rect.bottom().min(self.height);
        for y in rect.y.min(y1)..y1 {
            for x in rect.x.min(x1)..x1 {
                self.blend(x, y, color);
            }
        }
    }

    /// Overwrites every pixel of `rect`.
    pub fn fill_rect(&mut self, rect: PixelRect, color: Rgba) {
        let x1 = rect.right().min(self.width);
        let y1 = rect.bottom().min(self.height);
        for y in rect.y.min(y1)..y1 {
            let row = y * self.width;
            self.pixels[row + rect.x.min(x1)..row + x1].fill(color);
        }
    }

    /// One-pixel outline along the edges of `rect`.
    pub fn stroke_rect(&mut self, rect: PixelRect, color: Rgba) {
        if rect.is_empty() {
            return;
        }
        let right = rect.right() - 1;
        let bottom = rect.bottom() - 1;
        for x in rect.x..=right {
            self.set(x, rect.y, color);
            self.set(x, bottom, color);
        }
        for y in rect.y..=bottom {
            self.set(rect.x, y, color);
            self.set(right, y, color);
        }
    }

    /// Vertical line from `y0` to `y1` inclusive.
    pub fn vline(&mut self, x: usize, y0: usize, y1: usize, color: Rgba) {
        for y in y0.min(y1)..=y0.max(y1) {
            self.set(x, y, color);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_and_get_clip() {
        let mut surface = PixelSurface::new(4, 3);
        surface.set(3, 2, Rgba::opaque(1, 2, 3));
        surface.set(4, 0, Rgba::opaque(9, 9, 9));
        assert_eq!(surface.get(3, 2), Some(Rgba::opaque(1, 2, 3)));
        assert_eq!(surface.get(4, 0), None);
    }

    #[test]
    fn test_fill_rect_clips_to_bounds() {
        let mut surface = PixelSurface::new(4, 4);
        surface.fill_rect(PixelRect::new(2, 2, 10, 10), Rgba::opaque(255, 0, 0));
        assert_eq!(surface.get(1, 1), Some(Rgba::TRANSPARENT));
        assert_eq!(surface.get(3, 3), Some(Rgba::opaque(255, 0, 0)));
        assert_eq!(surface.get(2, 3), Some(Rgba::opaque(255, 0, 0)));
    }

    #[test]
    fn test_fill_rect_fully_outside_is_noop() {
        let mut surface = PixelSurface::new(4, 4);
        surface.fill_rect(PixelRect::new(8, 8, 2, 2), Rgba::opaque(255, 0, 0));
        assert!(surface.pixels().iter().all(|p| *p == Rgba::TRANSPARENT));
    }

    #[test]
    fn test_resize_discards_only_on_change() {
        let mut surface = PixelSurface::new(2, 2);
        surface.set(0, 0, Rgba::opaque(1, 1, 1));
        surface.resize(2, 2);
        assert_eq!(surface.get(0, 0), Some(Rgba::opaque(1, 1, 1)));
        surface.resize(3, 2);
        assert_eq!(surface.get(0, 0), Some(Rgba::TRANSPARENT));
        assert_eq!(surface.pixels().len(), 6);
    }

    #[test]
    fn test_stroke_rect_outline() {
        let mut surface = PixelSurface::new(5, 5);
        let red = Rgba::opaque(255, 0, 0);
        surface.stroke_rect(PixelRect::new(1, 1, 3, 3), red);
        assert_eq!(surface.get(1, 1), Some(red));
        assert_eq!(surface.get(3, 3), Some(red));
        assert_eq!(surface.get(2, 2), Some(Rgba::TRANSPARENT));
    }
}

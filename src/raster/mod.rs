//! Pixel stores shared by the waterfall and the overview.
//!
//! - `colormap`: named gradients, palettes and level quantization
//! - `buffer`: the scrolling [`RasterBuffer`]
//! - `surface`: the [`PixelSurface`] that buffers are blitted onto

pub mod buffer;
pub mod colormap;
pub mod surface;

pub use buffer::{RasterBuffer, ScrollAxis};
pub use colormap::{quantize, ColormapName, Palette};
pub use surface::PixelSurface;

/// One RGBA pixel, straight (non-premultiplied) alpha.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    /// Fully transparent black, the content of a freshly allocated store.
    pub const TRANSPARENT: Rgba = Rgba::new(0, 0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Rgba { r, g, b, a }
    }

    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Rgba { r, g, b, a: 255 }
    }

    /// Source-over composite of `self` on top of `below`.
    pub fn over(self, below: Rgba) -> Rgba {
        if self.a == 255 {
            return self;
        }
        if self.a == 0 {
            return below;
        }

        let src_a = self.a as f32 / 255.0;
        let dst_a = below.a as f32 / 255.0;
        let out_a = src_a + dst_a * (1.0 - src_a);
        let mix = |s: u8, d: u8| -> u8 {
            let v = (s as f32 * src_a + d as f32 * dst_a * (1.0 - src_a)) / out_a;
            v.round().clamp(0.0, 255.0) as u8
        };

        Rgba {
            r: mix(self.r, below.r),
            g: mix(self.g, below.g),
            b: mix(self.b, below.b),
            a: (out_a * 255.0).round() as u8,
        }
    }
}

/// Axis-aligned pixel rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PixelRect {
    pub x: usize,
    pub y: usize,
    pub width: usize,
    pub height: usize,
}

impl PixelRect {
    pub const fn new(x: usize, y: usize, width: usize, height: usize) -> Self {
        PixelRect {
            x,
            y,
            width,
            height,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn right(&self) -> usize {
        self.x + self.width
    }

    pub fn bottom(&self) -> usize {
        self.y + self.height
    }

    /// Rectangle spanning two corner points given in any order, inclusive.
    pub fn spanning(a: (usize, usize), b: (usize, usize)) -> Self {
        let (x0, x1) = (a.0.min(b.0), a.0.max(b.0));
        let (y0, y1) = (a.1.min(b.1), a.1.max(b.1));
        PixelRect::new(x0, y0, x1 - x0 + 1, y1 - y0 + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_over_opaque_and_transparent() {
        let red = Rgba::opaque(255, 0, 0);
        let blue = Rgba::opaque(0, 0, 255);
        assert_eq!(red.over(blue), red);
        assert_eq!(Rgba::TRANSPARENT.over(blue), blue);
    }

    #[test]
    fn test_over_translucent_on_opaque() {
        let grey = Rgba::new(153, 153, 153, 153);
        let black = Rgba::opaque(0, 0, 0);
        let out = grey.over(black);
        assert_eq!(out.a, 255);
        assert_eq!(out.r, 92);
    }

    #[test]
    fn test_spanning_orders_corners() {
        let rect = PixelRect::spanning((10, 2), (4, 8));
        assert_eq!(rect, PixelRect::new(4, 2, 7, 7));
        assert_eq!(rect.right(), 11);
        assert_eq!(rect.bottom(), 9);
    }
}

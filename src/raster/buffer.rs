//! Scrolling raster buffer.
//!
//! The buffer keeps a fixed window of painted lanes. Each paint shifts the
//! existing content one lane along the scroll axis and writes the new lane at
//! the leading edge, so the newest data is always at row 0 (waterfall) or
//! column 0 (overview).

use super::colormap::Palette;
use super::surface::PixelSurface;
use super::{PixelRect, Rgba};

/// Direction the buffer scrolls in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollAxis {
    /// Lanes are rows: newest at row 0, older rows move down.
    Rows,
    /// Lanes are columns: newest at column 0, older columns move right.
    Columns,
}

#[derive(Debug, Clone)]
struct PixelStore {
    width: usize,
    height: usize,
    pixels: Vec<Rgba>,
}

impl PixelStore {
    fn new(width: usize, height: usize) -> Self {
        PixelStore {
            width,
            height,
            pixels: vec![Rgba::TRANSPARENT; width * height],
        }
    }

    fn shift_rows_down(&mut self) {
        if self.height > 1 {
            let keep = (self.height - 1) * self.width;
            self.pixels.copy_within(0..keep, self.width);
        }
    }

    fn shift_columns_right(&mut self) {
        if self.width > 1 {
            for row in self.pixels.chunks_exact_mut(self.width) {
                row.copy_within(0..self.width - 1, 1);
            }
        }
    }
}

/// Owned 2D pixel store with scroll-and-paint composition.
///
/// Starts uninitialized. The store is allocated lazily on the first paint
/// once both the scroll extent (rows for [`ScrollAxis::Rows`], columns for
/// [`ScrollAxis::Columns`]) and the lane length are non-zero. Until then
/// paints are deferred: they return `false` and the caller retries later.
#[derive(Debug, Clone)]
pub struct RasterBuffer {
    axis: ScrollAxis,
    scroll_extent: usize,
    lane_len: usize,
    store: Option<PixelStore>,
}

impl RasterBuffer {
    /// Creates an uninitialized buffer that will keep `scroll_extent` lanes.
    pub fn new(axis: ScrollAxis, scroll_extent: usize) -> Self {
        RasterBuffer {
            axis,
            scroll_extent,
            lane_len: 0,
            store: None,
        }
    }

    pub fn axis(&self) -> ScrollAxis {
        self.axis
    }

    /// Whether a backing store exists.
    pub fn is_active(&self) -> bool {
        self.store.is_some()
    }

    /// Store width in pixels, 0 while uninitialized.
    pub fn width(&self) -> usize {
        self.store.as_ref().map_or(0, |s| s.width)
    }

    /// Store height in pixels, 0 while uninitialized.
    pub fn height(&self) -> usize {
        self.store.as_ref().map_or(0, |s| s.height)
    }

    /// Number of lanes kept along the scroll axis.
    pub fn scroll_extent(&self) -> usize {
        self.scroll_extent
    }

    /// Length of one lane (bins per row, pixels per column).
    pub fn lane_len(&self) -> usize {
        self.lane_len
    }

    /// Pixel at `(x, y)` of the backing store.
    pub fn pixel(&self, x: usize, y: usize) -> Option<Rgba> {
        let store = self.store.as_ref()?;
        if x < store.width && y < store.height {
            Some(store.pixels[y * store.width + x])
        } else {
            None
        }
    }

    /// Changes the number of lanes kept. Reallocates (discarding content)
    /// when the extent actually changes.
    pub fn set_scroll_extent(&mut self, extent: usize) {
        if extent == self.scroll_extent {
            return;
        }
        tracing::debug!(
            "Raster scroll extent {} -> {} ({:?})",
            self.scroll_extent,
            extent,
            self.axis
        );
        self.scroll_extent = extent;
        self.reallocate();
    }

    /// Reallocates the store when `lane_len` differs from the current lane
    /// length. Prior content is not preserved.
    ///
    /// Returns whether a reallocation happened.
    pub fn resize_if_needed(&mut self, lane_len: usize) -> bool {
        if lane_len == self.lane_len && (self.store.is_some() || !self.can_allocate()) {
            return false;
        }
        if lane_len != self.lane_len {
            tracing::debug!(
                "Raster lane length {} -> {} ({:?}), discarding content",
                self.lane_len,
                lane_len,
                self.axis
            );
        }
        self.lane_len = lane_len;
        self.reallocate();
        self.store.is_some()
    }

    /// Blanks the store without changing its size.
    pub fn clear(&mut self) {
        if let Some(store) = self.store.as_mut() {
            store.pixels.fill(Rgba::TRANSPARENT);
        }
    }

    /// Shifts the content down one row and writes `samples` into row 0.
    ///
    /// Only valid for [`ScrollAxis::Rows`]; returns `false` without painting
    /// for the other axis, for an empty lane or while the scroll extent is 0.
    pub fn paint_row(
        &mut self,
        samples: &[f64],
        palette: &Palette,
        min_level: f64,
        max_level: f64,
    ) -> bool {
        if self.axis != ScrollAxis::Rows || !self.prepare(samples.len()) {
            return false;
        }
        let Some(store) = self.store.as_mut() else {
            return false;
        };

        store.shift_rows_down();
        for (pixel, &level) in store.pixels[..store.width].iter_mut().zip(samples) {
            *pixel = palette.color_for(level, min_level, max_level);
        }
        true
    }

    /// Shifts the content right one column and writes `column` into
    /// column 0, top to bottom.
    ///
    /// Only valid for [`ScrollAxis::Columns`]; deferred like [`Self::paint_row`].
    pub fn paint_column(
        &mut self,
        column: &[f64],
        palette: &Palette,
        min_level: f64,
        max_level: f64,
    ) -> bool {
        if self.axis != ScrollAxis::Columns || !self.prepare(column.len()) {
            return false;
        }
        let Some(store) = self.store.as_mut() else {
            return false;
        };

        store.shift_columns_right();
        let width = store.width;
        for (y, &level) in column.iter().enumerate().take(store.height) {
            store.pixels[y * width] = palette.color_for(level, min_level, max_level);
        }
        true
    }

    /// Nearest-neighbour scaled copy of `src` (store coordinates) into `dst`
    /// (target coordinates). Both rectangles are clipped; an inactive buffer
    /// or an empty rectangle copies nothing.
    pub fn copy_region_to(&self, target: &mut PixelSurface, src: PixelRect, dst: PixelRect) {
        let Some(store) = self.store.as_ref() else {
            return;
        };

        let src_x1 = src.right().min(store.width);
        let src_y1 = src.bottom().min(store.height);
        if src.x >= src_x1 || src.y >= src_y1 || dst.is_empty() {
            return;
        }
        let src_w = src_x1 - src.x;
        let src_h = src_y1 - src.y;

        let dst_x1 = dst.right().min(target.width());
        let dst_y1 = dst.bottom().min(target.height());

        for ty in dst.y..dst_y1 {
            let sy = src.y + (ty - dst.y) * src_h / dst.height;
            let row = sy * store.width;
            for tx in dst.x..dst_x1 {
                let sx = src.x + (tx - dst.x) * src_w / dst.width;
                target.set(tx, ty, store.pixels[row + sx]);
            }
        }
    }

    fn can_allocate(&self) -> bool {
        self.scroll_extent > 0 && self.lane_len > 0
    }

    fn reallocate(&mut self) {
        if !self.can_allocate() {
            self.store = None;
            return;
        }
        let (width, height) = match self.axis {
            ScrollAxis::Rows => (self.lane_len, self.scroll_extent),
            ScrollAxis::Columns => (self.scroll_extent, self.lane_len),
        };
        self.store = Some(PixelStore::new(width, height));
    }

    fn prepare(&mut self, lane_len: usize) -> bool {
        self.resize_if_needed(lane_len);
        if self.store.is_none() {
            tracing::debug!(
                "Deferring {:?} paint: extent={}, lane={}",
                self.axis,
                self.scroll_extent,
                lane_len
            );
            return false;
        }
        true
    }
}

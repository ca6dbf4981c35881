//! Composes the visible waterfall viewport: legend band on the left, scaled
//! raster on the right.

use crate::raster::{Palette, PixelRect, PixelSurface, RasterBuffer};

/// Horizontal anchoring of a [`TextLabel`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    /// Text ends just before `x`.
    End,
    /// Text is centred on `x`.
    Center,
}

/// Text placed over the surface, in surface pixel coordinates.
///
/// The pixel surface carries no font; the host draws these itself.
#[derive(Debug, Clone, PartialEq)]
pub struct TextLabel {
    pub text: String,
    pub x: usize,
    pub y: usize,
    pub align: TextAlign,
}

/// Formats a level bound the way the legend shows it: integral values
/// without decimals, anything else as-is.
pub fn format_level(level: f64) -> String {
    if level.fract() == 0.0 && level.is_finite() {
        format!("{level:.0}")
    } else {
        format!("{level}")
    }
}

/// Owns the viewport surface and redraws it from a raster buffer.
#[derive(Debug, Clone, Default)]
pub struct ViewportCompositor {
    surface: PixelSurface,
    labels: Vec<TextLabel>,
}

impl ViewportCompositor {
    pub fn new(width: usize, height: usize) -> Self {
        ViewportCompositor {
            surface: PixelSurface::new(width, height),
            labels: Vec::new(),
        }
    }

    /// Records the current viewport size. Content is redrawn on the next
    /// [`Self::render`].
    pub fn resize(&mut self, width: usize, height: usize) {
        self.surface.resize(width, height);
    }

    pub fn viewport_size(&self) -> (usize, usize) {
        (self.surface.width(), self.surface.height())
    }

    /// Width left for the raster once the legend band is taken out.
    pub fn plot_width(&self, legend_width: usize) -> usize {
        self.surface.width().saturating_sub(legend_width)
    }

    /// Region of the surface the raster is drawn into.
    pub fn plot_rect(&self, legend_width: usize) -> PixelRect {
        let x = legend_width.min(self.surface.width());
        PixelRect::new(x, 0, self.plot_width(legend_width), self.surface.height())
    }

    pub fn surface(&self) -> &PixelSurface {
        &self.surface
    }

    pub fn labels(&self) -> &[TextLabel] {
        &self.labels
    }

    /// Surface and label list for drawing overlays after [`Self::render`].
    pub(crate) fn overlay_parts(&mut self) -> (&mut PixelSurface, &mut Vec<TextLabel>) {
        (&mut self.surface, &mut self.labels)
    }

    /// Redraws the whole viewport from scratch.
    ///
    /// Calling it again with unchanged inputs yields an identical surface
    /// and label set.
    pub fn render(
        &mut self,
        buffer: &RasterBuffer,
        legend_palette: &Palette,
        min_level: f64,
        max_level: f64,
        legend_width: usize,
    ) {
        self.surface.clear();
        self.labels.clear();

        if self.surface.is_empty() {
            return;
        }

        let plot = self.plot_rect(legend_width);
        if buffer.is_active() && !plot.is_empty() {
            let src = PixelRect::new(0, 0, buffer.width(), buffer.height());
            buffer.copy_region_to(&mut self.surface, src, plot);
        }

        self.draw_legend(legend_palette, min_level, max_level, legend_width);
    }

    fn draw_legend(
        &mut self,
        palette: &Palette,
        min_level: f64,
        max_level: f64,
        legend_width: usize,
    ) {
        let legend_width = legend_width.min(self.surface.width());
        if legend_width == 0 {
            return;
        }

        let height = self.surface.height();
        let band_x = legend_width * 3 / 4;
        let band_width = (legend_width / 4).max(1);
        let shades = palette.len();

        for y in 0..height {
            let from_top = y * shades / height;
            let color = palette.color(shades - 1 - from_top.min(shades - 1));
            self.surface
                .fill_rect(PixelRect::new(band_x, y, band_width, 1), color);
        }

        let label_x = band_x.saturating_sub(1);
        self.labels.push(TextLabel {
            text: format_level(max_level),
            x: label_x,
            y: 0,
            align: TextAlign::End,
        });
        self.labels.push(TextLabel {
            text: format_level(min_level),
            x: label_x,
            y: height - 1,
            align: TextAlign::End,
        });
    }
}

//! Ratatui widget that shows a pixel surface with half-block glyphs.
//!
//! Every terminal cell covers two vertically stacked pixels: the upper one
//! is drawn as the foreground of `▀`, the lower one as the background.

use ratatui::prelude::*;
use specfall::{PixelSurface, Rgba, TextAlign, TextLabel};

const UPPER_HALF: &str = "▀";

/// Pixel rows covered by one terminal row.
pub const PIXELS_PER_ROW: usize = 2;

pub struct RasterView<'a> {
    surface: &'a PixelSurface,
    labels: &'a [TextLabel],
    background: Rgba,
    label_style: Style,
}

impl<'a> RasterView<'a> {
    pub fn new(surface: &'a PixelSurface) -> Self {
        RasterView {
            surface,
            labels: &[],
            background: Rgba::opaque(0, 0, 0),
            label_style: Style::default().fg(Color::Rgb(255, 255, 255)),
        }
    }

    pub fn labels(mut self, labels: &'a [TextLabel]) -> Self {
        self.labels = labels;
        self
    }

    fn color_at(&self, x: usize, y: usize) -> Color {
        let pixel = self.surface.get(x, y).unwrap_or(Rgba::TRANSPARENT);
        let Rgba { r, g, b, .. } = pixel.over(self.background);
        Color::Rgb(r, g, b)
    }
}

/// Column of the first character of `text` for a label anchored at `x`.
fn label_start(x: usize, text: &str, align: TextAlign) -> usize {
    let len = text.chars().count();
    match align {
        TextAlign::End => x.saturating_sub(len),
        TextAlign::Center => x.saturating_sub(len / 2),
    }
}

impl Widget for RasterView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        for row in 0..area.height {
            for col in 0..area.width {
                let x = col as usize;
                let y = row as usize * PIXELS_PER_ROW;
                let top = self.color_at(x, y);
                let bottom = self.color_at(x, y + 1);
                buf[(area.x + col, area.y + row)]
                    .set_symbol(UPPER_HALF)
                    .set_fg(top)
                    .set_bg(bottom);
            }
        }

        for label in self.labels {
            let first_row = label.y / PIXELS_PER_ROW;
            for (offset, line) in label.text.lines().enumerate() {
                let row = first_row + offset;
                if row >= area.height as usize {
                    break;
                }
                let col = label_start(label.x, line, label.align);
                if col >= area.width as usize {
                    continue;
                }
                let max_width = area.width as usize - col;
                buf.set_stringn(
                    area.x + col as u16,
                    area.y + row as u16,
                    line,
                    max_width,
                    self.label_style,
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use specfall::PixelRect;

    #[test]
    fn test_two_pixels_per_cell() {
        let mut surface = PixelSurface::new(2, 4);
        surface.fill_rect(PixelRect::new(0, 0, 2, 1), Rgba::opaque(255, 0, 0));
        surface.fill_rect(PixelRect::new(0, 1, 2, 1), Rgba::opaque(0, 0, 255));

        let area = Rect::new(0, 0, 2, 2);
        let mut buf = Buffer::empty(area);
        RasterView::new(&surface).render(area, &mut buf);

        let cell = &buf[(0, 0)];
        assert_eq!(cell.symbol(), UPPER_HALF);
        assert_eq!(cell.fg, Color::Rgb(255, 0, 0));
        assert_eq!(cell.bg, Color::Rgb(0, 0, 255));
        // transparent pixels show the background
        assert_eq!(buf[(1, 1)].fg, Color::Rgb(0, 0, 0));
    }

    #[test]
    fn test_labels_are_anchored() {
        let surface = PixelSurface::new(12, 6);
        let labels = vec![
            TextLabel {
                text: "-125".to_string(),
                x: 5,
                y: 4,
                align: TextAlign::End,
            },
            TextLabel {
                text: "ab\ncd".to_string(),
                x: 8,
                y: 0,
                align: TextAlign::Center,
            },
        ];
        let area = Rect::new(0, 0, 12, 3);
        let mut buf = Buffer::empty(area);
        RasterView::new(&surface).labels(&labels).render(area, &mut buf);

        assert_eq!(buf[(1, 2)].symbol(), "-");
        assert_eq!(buf[(4, 2)].symbol(), "5");
        assert_eq!(buf[(7, 0)].symbol(), "a");
        assert_eq!(buf[(7, 1)].symbol(), "c");
        assert_eq!(buf[(4, 2)].fg, Color::Rgb(255, 255, 255));
    }

    #[test]
    fn test_label_start() {
        assert_eq!(label_start(5, "abc", TextAlign::End), 2);
        assert_eq!(label_start(1, "abc", TextAlign::End), 0);
        assert_eq!(label_start(10, "abcd", TextAlign::Center), 8);
    }
}

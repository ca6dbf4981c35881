//! Drag-to-select band on the overview, mapped back to frame indices.

use crate::events::ChartEvent;
use crate::raster::PixelRect;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectionBand {
    begin_x: f64,
    end_x: Option<f64>,
    active: bool,
}

/// Frame index under overview pixel `x`.
pub fn frame_at(x: f64, box_width: usize, total_count: u64) -> u64 {
    if box_width == 0 {
        return 0;
    }
    (x / box_width as f64 * total_count as f64).round().max(0.0) as u64
}

impl SelectionBand {
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Whether the band has been stretched and is shown.
    pub fn is_visible(&self) -> bool {
        self.end_x.is_some()
    }

    /// Starts a new gesture at `x`, hiding any previous band.
    pub fn begin(&mut self, x: f64) {
        self.begin_x = x;
        self.end_x = None;
        self.active = true;
    }

    pub fn extend(&mut self, x: f64) {
        if self.active {
            self.end_x = Some(x);
        }
    }

    /// Left edge and width in overview pixels.
    pub fn span(&self) -> Option<(f64, f64)> {
        let end_x = self.end_x?;
        Some((self.begin_x.min(end_x), (end_x - self.begin_x).abs()))
    }

    pub fn contains(&self, x: f64) -> bool {
        self.span()
            .is_some_and(|(left, width)| x >= left && x <= left + width)
    }

    /// Ends the gesture. Emits the selected frame range unless the pointer
    /// never moved or the session length is unknown.
    pub fn finish(&mut self, box_width: usize, total_count: u64) -> Option<ChartEvent> {
        if !self.active {
            return None;
        }
        self.active = false;

        let end_x = self.end_x?;
        if total_count == 0 {
            return None;
        }

        let (left, right) = if self.begin_x > end_x {
            (end_x, self.begin_x)
        } else {
            (self.begin_x, end_x)
        };
        Some(ChartEvent::ProgressSelected {
            start_frame: frame_at(left, box_width, total_count),
            end_frame: frame_at(right, box_width, total_count),
        })
    }

    /// Hides the band and abandons any gesture.
    pub fn reset(&mut self) {
        self.end_x = None;
        self.active = false;
    }

    pub fn rect(&self, height: usize) -> Option<PixelRect> {
        let (left, width) = self.span()?;
        let x = left.max(0.0).round() as usize;
        Some(PixelRect::new(x, 0, (width.round() as usize).max(1), height))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_right_to_left_drag_is_swapped() {
        let mut band = SelectionBand::default();
        band.begin(60.0);
        band.extend(20.0);
        assert_eq!(
            band.finish(100, 1000),
            Some(ChartEvent::ProgressSelected {
                start_frame: 200,
                end_frame: 600
            })
        );
        assert!(band.is_visible());
    }

    #[test]
    fn test_click_emits_nothing() {
        let mut band = SelectionBand::default();
        band.begin(10.0);
        assert_eq!(band.finish(100, 1000), None);
        assert!(!band.is_visible());
    }

    #[test]
    fn test_unknown_total_emits_nothing() {
        let mut band = SelectionBand::default();
        band.begin(10.0);
        band.extend(30.0);
        assert_eq!(band.finish(100, 0), None);
    }

    #[test]
    fn test_span_and_reset() {
        let mut band = SelectionBand::default();
        band.begin(50.0);
        band.extend(30.0);
        assert_eq!(band.span(), Some((30.0, 20.0)));
        assert!(band.contains(40.0));
        band.reset();
        assert_eq!(band.span(), None);
        assert!(!band.is_active());
    }
}

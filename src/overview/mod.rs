//! Static overview of a whole recorded session.
//!
//! [`Overview`] downsamples the complete dataset once into a column-scrolling
//! raster the size of its box, and carries the two interactive overlays: the
//! draggable position [`Indicator`] and the [`SelectionBand`].

pub mod band;
pub mod downsample;
pub mod indicator;

pub use band::SelectionBand;
pub use downsample::{downsample, vertical_reduce};
pub use indicator::{indicator_width, AnalyzeParams, Indicator};

use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::events::{ChartEvent, PointerEvent, PointerKind, PointerTarget};
use crate::raster::{ColormapName, Palette, PixelRect, PixelSurface, RasterBuffer, Rgba, ScrollAxis};
use crate::throttle::{Throttle, Trailing};

const BAND_FILL: Rgba = Rgba::new(255, 255, 255, 77);
const INDICATOR_FILL: Rgba = Rgba::opaque(255, 255, 255);

#[derive(Debug, Clone, PartialEq)]
pub struct OverviewOptions {
    pub colormap: ColormapName,
    pub shade_count: usize,
    pub min_level: f64,
    pub max_level: f64,
    pub pointer_interval: Duration,
}

impl Default for OverviewOptions {
    fn default() -> Self {
        OverviewOptions {
            colormap: ColormapName::Jet,
            shade_count: 140,
            min_level: -140.0,
            max_level: 0.0,
            pointer_interval: crate::throttle::DEFAULT_POINTER_INTERVAL,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Gesture {
    Idle,
    Drag,
    Select,
}

pub struct Overview {
    options: OverviewOptions,
    palette: Arc<Palette>,
    buffer: RasterBuffer,
    dataset: Vec<Vec<f64>>,
    surface: PixelSurface,
    total_count: u64,
    analyze: AnalyzeParams,
    percent: f64,
    indicator: Indicator,
    band: SelectionBand,
    gesture: Gesture,
    moves: Trailing<f64>,
}

impl Overview {
    pub fn new(options: OverviewOptions) -> Self {
        let palette = Arc::new(Palette::build(options.colormap, options.shade_count));
        Self::with_palette(options, palette)
    }

    pub fn with_palette(options: OverviewOptions, palette: Arc<Palette>) -> Self {
        Overview {
            buffer: RasterBuffer::new(ScrollAxis::Columns, 0),
            dataset: Vec::new(),
            surface: PixelSurface::default(),
            total_count: 0,
            analyze: AnalyzeParams::default(),
            percent: 0.0,
            indicator: Indicator::new(),
            band: SelectionBand::default(),
            gesture: Gesture::Idle,
            moves: Trailing::new(Throttle::new(options.pointer_interval)),
            palette,
            options,
        }
    }

    pub fn options(&self) -> &OverviewOptions {
        &self.options
    }

    pub fn buffer(&self) -> &RasterBuffer {
        &self.buffer
    }

    pub fn surface(&self) -> &PixelSurface {
        &self.surface
    }

    pub fn indicator(&self) -> &Indicator {
        &self.indicator
    }

    pub fn band(&self) -> &SelectionBand {
        &self.band
    }

    pub fn has_data(&self) -> bool {
        !self.dataset.is_empty()
    }

    pub fn total_count(&self) -> u64 {
        self.total_count
    }

    /// Last position set from outside or dropped by the user, in percent.
    pub fn percentage(&self) -> f64 {
        self.percent
    }

    pub fn size(&self) -> (usize, usize) {
        (self.surface.width(), self.surface.height())
    }

    /// Stores the whole session (oldest frame first) and paints it.
    ///
    /// Returns `false` when the box has no size yet; the dataset is kept and
    /// painted by the next [`Self::resize`].
    pub fn draw_progress<F: AsRef<[f64]>>(&mut self, frames: &[F]) -> bool {
        self.dataset = frames.iter().map(|f| f.as_ref().to_vec()).collect();
        tracing::info!("Overview dataset: {} frames", self.dataset.len());
        self.repaint()
    }

    /// Changes the box size, repaints the stored dataset at the new size
    /// and restores the indicator to the stored percentage.
    pub fn resize(&mut self, width: usize, height: usize) {
        self.surface.resize(width, height);
        if self.has_data() {
            self.repaint();
        }
        self.update_indicator_width();
        self.indicator.bind_percent(self.percent, width);
    }

    /// Discards the dataset, the raster and both overlays.
    pub fn reset(&mut self) {
        self.dataset.clear();
        self.buffer.clear();
        self.surface.clear();
        self.band.reset();
        self.indicator.reset();
        self.gesture = Gesture::Idle;
        self.percent = 0.0;
        tracing::debug!("Overview reset");
    }

    pub fn set_total_count(&mut self, count: u64) {
        if count == self.total_count {
            return;
        }
        self.total_count = count;
        self.update_indicator_width();
    }

    pub fn set_analyze_params(&mut self, params: AnalyzeParams) {
        self.analyze = params;
        self.update_indicator_width();
    }

    /// Playback position from the host. Ignored while the user drags the
    /// indicator.
    pub fn set_percentage(&mut self, percent: f64) {
        if self.indicator.is_dragging() {
            return;
        }
        self.percent = percent;
        self.indicator.bind_percent(percent, self.surface.width());
    }

    pub fn reset_selection_band(&mut self) {
        self.band.reset();
    }

    /// Which overlay sits under overview pixel `x`.
    pub fn hit_test(&self, x: f64) -> PointerTarget {
        if self.has_data() && self.indicator.contains(x) {
            PointerTarget::Indicator
        } else if self.band.contains(x) {
            PointerTarget::SelectionBand
        } else {
            PointerTarget::Background
        }
    }

    /// Feeds a pointer event in overview pixel coordinates.
    pub fn handle_pointer(&mut self, event: &PointerEvent, now: Instant) -> Option<ChartEvent> {
        let target = match event.target {
            PointerTarget::Background => self.hit_test(event.x),
            target => target,
        };
        let width = self.surface.width();

        match event.kind {
            PointerKind::Down => {
                self.moves.reset();
                if target == PointerTarget::Indicator {
                    self.gesture = Gesture::Drag;
                    self.indicator.begin_drag();
                    return None;
                }
                self.gesture = Gesture::Select;
                self.band.begin(event.x);
                Some(ChartEvent::SelectionCanceled)
            }
            PointerKind::Move => {
                if self.gesture == Gesture::Idle {
                    return None;
                }
                if let Some(x) = self.moves.offer(event.x, now) {
                    self.apply_move(x, width);
                }
                None
            }
            PointerKind::Up | PointerKind::Leave => {
                if let Some(x) = self.moves.take_pending() {
                    self.apply_move(x, width);
                }
                let gesture = std::mem::replace(&mut self.gesture, Gesture::Idle);
                let emitted = match gesture {
                    Gesture::Drag => self.indicator.release(width).map(|percent| {
                        self.percent = percent;
                        ChartEvent::ProgressChanged { percent }
                    }),
                    Gesture::Select => self.band.finish(width, self.total_count),
                    Gesture::Idle => None,
                };
                if let Some(event) = &emitted {
                    tracing::debug!("Overview {}", event.summary());
                }
                emitted
            }
        }
    }

    /// Composes raster, band and indicator onto the overview surface.
    pub fn render(&mut self) {
        self.surface.clear();
        let (width, height) = self.size();
        if width == 0 || height == 0 {
            return;
        }

        if self.buffer.is_active() {
            let src = PixelRect::new(0, 0, self.buffer.width(), self.buffer.height());
            self.buffer
                .copy_region_to(&mut self.surface, src, PixelRect::new(0, 0, width, height));
        }
        if let Some(rect) = self.band.rect(height) {
            self.surface.blend_rect(rect, BAND_FILL);
        }
        if self.has_data() {
            self.surface
                .fill_rect(self.indicator.rect(height), INDICATOR_FILL);
        }
    }

    fn repaint(&mut self) -> bool {
        let (width, height) = self.size();
        if width == 0 || height == 0 {
            tracing::debug!("Overview box not laid out yet, deferring paint");
            return false;
        }

        self.buffer.set_scroll_extent(width);
        self.buffer.resize_if_needed(height);
        self.buffer.clear();

        let columns = downsample(&self.dataset, width, height);
        for column in columns.iter().rev() {
            self.buffer.paint_column(
                column,
                &self.palette,
                self.options.min_level,
                self.options.max_level,
            );
        }
        tracing::debug!("Overview painted {} columns at {}x{}", columns.len(), width, height);
        !columns.is_empty()
    }

    fn apply_move(&mut self, x: f64, width: usize) {
        match self.gesture {
            Gesture::Drag => self.indicator.drag_to(x, width),
            Gesture::Select => self.band.extend(x),
            Gesture::Idle => {}
        }
    }

    fn update_indicator_width(&mut self) {
        self.indicator
            .set_width(indicator_width(self.analyze, self.total_count, self.surface.width()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options() -> OverviewOptions {
        OverviewOptions {
            colormap: ColormapName::Greys,
            shade_count: 256,
            min_level: 0.0,
            max_level: 255.0,
            pointer_interval: Duration::ZERO,
        }
    }

    fn grey(level: u8) -> Rgba {
        Rgba::opaque(level, level, level)
    }

    fn session(frames: usize) -> Vec<Vec<f64>> {
        (0..frames).map(|i| vec![(i * 10 + 10) as f64; 8]).collect()
    }

    #[test]
    fn test_oldest_frame_lands_left() {
        let mut overview = Overview::new(options());
        overview.resize(4, 2);
        assert!(overview.draw_progress(&session(4)));

        assert_eq!(overview.buffer().pixel(0, 0), Some(grey(10)));
        assert_eq!(overview.buffer().pixel(3, 1), Some(grey(40)));
    }

    #[test]
    fn test_paint_waits_for_layout() {
        let mut overview = Overview::new(options());
        assert!(!overview.draw_progress(&session(4)));
        assert!(!overview.buffer().is_active());

        overview.resize(2, 2);
        assert_eq!(overview.buffer().pixel(0, 0), Some(grey(15)));
        assert_eq!(overview.buffer().pixel(1, 0), Some(grey(35)));
    }

    #[test]
    fn test_band_selection_maps_to_frames() {
        let mut overview = Overview::new(options());
        overview.resize(100, 4);
        overview.draw_progress(&session(10));
        overview.set_total_count(1000);
        overview.set_analyze_params(AnalyzeParams {
            aggregation_frame: 1,
            fft_size: 10,
        });

        let t0 = Instant::now();
        assert_eq!(
            overview.handle_pointer(&PointerEvent::down(60.0, 1.0), t0),
            Some(ChartEvent::SelectionCanceled)
        );
        overview.handle_pointer(&PointerEvent::moved(20.0, 1.0), t0);
        assert_eq!(
            overview.handle_pointer(&PointerEvent::up(20.0, 1.0), t0),
            Some(ChartEvent::ProgressSelected {
                start_frame: 200,
                end_frame: 600
            })
        );
        assert_eq!(overview.hit_test(40.0), PointerTarget::SelectionBand);

        overview.reset_selection_band();
        assert!(!overview.band().is_visible());
    }

    #[test]
    fn test_band_release_applies_last_dropped_move() {
        let mut overview = Overview::new(OverviewOptions {
            pointer_interval: Duration::from_millis(4),
            ..options()
        });
        overview.resize(100, 4);
        overview.draw_progress(&session(10));
        overview.set_total_count(1000);
        overview.set_analyze_params(AnalyzeParams {
            aggregation_frame: 1,
            fft_size: 10,
        });

        let t0 = Instant::now();
        overview.handle_pointer(&PointerEvent::down(10.0, 1.0), t0);
        overview.handle_pointer(&PointerEvent::moved(11.0, 1.0), t0);
        overview.handle_pointer(&PointerEvent::moved(60.0, 1.0), t0 + Duration::from_millis(1));
        assert_eq!(
            overview.handle_pointer(&PointerEvent::up(60.0, 1.0), t0 + Duration::from_millis(2)),
            Some(ChartEvent::ProgressSelected {
                start_frame: 100,
                end_frame: 600
            })
        );
    }

    #[test]
    fn test_indicator_release_applies_last_dropped_move() {
        let mut overview = Overview::new(OverviewOptions {
            pointer_interval: Duration::from_millis(4),
            ..options()
        });
        overview.resize(100, 4);
        overview.draw_progress(&session(10));
        overview.set_total_count(1000);
        overview.set_analyze_params(AnalyzeParams {
            aggregation_frame: 1,
            fft_size: 100,
        });
        overview.set_percentage(50.0);

        let t0 = Instant::now();
        assert_eq!(overview.handle_pointer(&PointerEvent::down(55.0, 1.0), t0), None);
        overview.handle_pointer(&PointerEvent::moved(54.0, 1.0), t0);
        overview.handle_pointer(&PointerEvent::moved(20.0, 1.0), t0 + Duration::from_millis(1));
        assert_eq!(overview.indicator().position(), 54.0);
        assert_eq!(
            overview.handle_pointer(&PointerEvent::up(20.0, 1.0), t0 + Duration::from_millis(2)),
            Some(ChartEvent::ProgressChanged { percent: 20.0 })
        );
    }

    #[test]
    fn test_click_without_move_emits_no_range() {
        let mut overview = Overview::new(OverviewOptions {
            pointer_interval: Duration::from_millis(4),
            ..options()
        });
        overview.resize(100, 4);
        overview.set_total_count(1000);
        let t0 = Instant::now();
        overview.handle_pointer(&PointerEvent::down(40.0, 1.0), t0);
        assert_eq!(overview.handle_pointer(&PointerEvent::up(40.0, 1.0), t0), None);
    }

    #[test]
    fn test_band_selection_suppressed_without_total() {
        let mut overview = Overview::new(options());
        overview.resize(100, 4);
        let t0 = Instant::now();
        overview.handle_pointer(&PointerEvent::down(10.0, 1.0), t0);
        overview.handle_pointer(&PointerEvent::moved(30.0, 1.0), t0);
        assert_eq!(overview.handle_pointer(&PointerEvent::leave(30.0, 1.0), t0), None);
    }

    #[test]
    fn test_indicator_drag_emits_percent() {
        let mut overview = Overview::new(options());
        overview.resize(100, 4);
        overview.draw_progress(&session(10));
        overview.set_total_count(1000);
        overview.set_analyze_params(AnalyzeParams {
            aggregation_frame: 1,
            fft_size: 100,
        });
        overview.set_percentage(50.0);
        assert_eq!(overview.indicator().width(), 10);
        assert_eq!(overview.hit_test(55.0), PointerTarget::Indicator);

        let t0 = Instant::now();
        assert_eq!(overview.handle_pointer(&PointerEvent::down(55.0, 1.0), t0), None);
        overview.handle_pointer(&PointerEvent::moved(30.0, 1.0), t0);
        overview.set_percentage(80.0);
        assert_eq!(overview.indicator().position(), 30.0);

        assert_eq!(
            overview.handle_pointer(&PointerEvent::up(30.0, 1.0), t0),
            Some(ChartEvent::ProgressChanged { percent: 30.0 })
        );
        assert_eq!(overview.percentage(), 30.0);
    }

    #[test]
    fn test_resize_restores_indicator() {
        let mut overview = Overview::new(options());
        overview.resize(100, 4);
        overview.draw_progress(&session(10));
        overview.set_percentage(30.0);

        overview.resize(200, 4);
        assert_eq!(overview.indicator().position(), 60.0);
        assert_eq!(overview.buffer().width(), 200);
    }

    #[test]
    fn test_render_draws_overlays() {
        let mut overview = Overview::new(options());
        overview.resize(10, 2);
        overview.draw_progress(&session(10));
        overview.set_percentage(50.0);
        overview.render();

        assert_eq!(overview.surface().get(0, 0), Some(grey(10)));
        assert_eq!(overview.surface().get(5, 0), Some(INDICATOR_FILL));
    }

    #[test]
    fn test_reset_discards_everything() {
        let mut overview = Overview::new(options());
        overview.resize(10, 2);
        overview.draw_progress(&session(10));
        overview.set_percentage(50.0);
        overview.reset();
        overview.render();

        assert!(!overview.has_data());
        assert_eq!(overview.percentage(), 0.0);
        assert!(overview.surface().pixels().iter().all(|p| *p == Rgba::TRANSPARENT));
    }

    #[test]
    fn test_total_count_change_only() {
        let mut overview = Overview::new(options());
        overview.resize(100, 4);
        overview.set_analyze_params(AnalyzeParams {
            aggregation_frame: 2,
            fft_size: 100,
        });
        overview.set_total_count(1000);
        assert_eq!(overview.indicator().width(), 20);
        overview.set_total_count(1000);
        assert_eq!(overview.total_count(), 1000);
    }
}

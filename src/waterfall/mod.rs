//! Live scrolling waterfall.
//!
//! [`Waterfall`] owns everything one waterfall view needs: the row-scrolling
//! raster, the sample-index history of its rows, the frequency scale, the
//! compositor for the visible viewport and the selection state machine.
//! The host pushes frames, forwards pointer and resize events, and reads
//! back the composed surface and labels.

pub mod compositor;
pub mod frame;
pub mod history;
pub mod scale;
pub mod selection;

pub use compositor::{TextAlign, TextLabel, ViewportCompositor};
pub use frame::Frame;
pub use history::SampleIndexHistory;
pub use scale::ScaleContext;
pub use selection::{DomainContext, SelectionMapper, SelectionRect};

use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::events::{ChartEvent, PointerEvent};
use crate::raster::{ColormapName, Palette, PixelSurface, RasterBuffer, ScrollAxis};
use crate::throttle::Throttle;

/// Construction options, all with defaults matching the classic dBuV view.
#[derive(Debug, Clone, PartialEq)]
pub struct WaterfallOptions {
    pub colormap: ColormapName,
    pub shade_count: usize,
    pub min_level: f64,
    pub max_level: f64,
    /// Width of the legend band, in viewport pixels.
    pub legend_width: usize,
    /// Pixels taken off the bottom of the viewport.
    pub padding: usize,
    /// Rows of history kept in the raster.
    pub rows: usize,
    pub selection: bool,
    pub history_capacity: usize,
    /// Source samples per second, used for selection durations.
    pub sample_rate: f64,
    pub pointer_interval: Duration,
}

impl Default for WaterfallOptions {
    fn default() -> Self {
        WaterfallOptions {
            colormap: ColormapName::Jet,
            shade_count: 150,
            min_level: -125.0,
            max_level: 0.0,
            legend_width: 64,
            padding: 2,
            rows: 50,
            selection: true,
            history_capacity: history::DEFAULT_HISTORY_CAPACITY,
            sample_rate: 2_048_000.0,
            pointer_interval: crate::throttle::DEFAULT_POINTER_INTERVAL,
        }
    }
}

/// One live waterfall view.
pub struct Waterfall {
    options: WaterfallOptions,
    palette: Arc<Palette>,
    buffer: RasterBuffer,
    history: SampleIndexHistory,
    scale: Option<ScaleContext>,
    compositor: ViewportCompositor,
    selection: SelectionMapper,
    pending: Option<Frame>,
    frames_painted: u64,
}

impl Waterfall {
    pub fn new(options: WaterfallOptions) -> Self {
        let palette = Arc::new(Palette::build(options.colormap, options.shade_count));
        Self::with_palette(options, palette)
    }

    /// Builds a waterfall sharing an existing palette.
    pub fn with_palette(options: WaterfallOptions, palette: Arc<Palette>) -> Self {
        let selection =
            SelectionMapper::new(options.selection, Throttle::new(options.pointer_interval));
        Waterfall {
            buffer: RasterBuffer::new(ScrollAxis::Rows, options.rows),
            history: SampleIndexHistory::new(options.history_capacity),
            scale: None,
            compositor: ViewportCompositor::default(),
            selection,
            pending: None,
            frames_painted: 0,
            palette,
            options,
        }
    }

    pub fn options(&self) -> &WaterfallOptions {
        &self.options
    }

    pub fn palette(&self) -> &Arc<Palette> {
        &self.palette
    }

    pub fn buffer(&self) -> &RasterBuffer {
        &self.buffer
    }

    pub fn history(&self) -> &SampleIndexHistory {
        &self.history
    }

    /// `None` until the first frame has been painted.
    pub fn scale(&self) -> Option<&ScaleContext> {
        self.scale.as_ref()
    }

    pub fn surface(&self) -> &PixelSurface {
        self.compositor.surface()
    }

    pub fn labels(&self) -> &[TextLabel] {
        self.compositor.labels()
    }

    pub fn frames_painted(&self) -> u64 {
        self.frames_painted
    }

    /// Width of the region right of the legend, in viewport pixels.
    pub fn plot_width(&self) -> usize {
        self.compositor.plot_width(self.options.legend_width)
    }

    pub fn set_sample_rate(&mut self, sample_rate: f64) {
        self.options.sample_rate = sample_rate;
    }

    /// Host notification that the viewport is now `width × height` pixels.
    ///
    /// Never reallocates the raster; only the scale's pixel density follows
    /// the new plot width. A frame deferred for lack of a viewport is
    /// painted now.
    pub fn resize(&mut self, width: usize, height: usize) {
        self.compositor
            .resize(width, height.saturating_sub(self.options.padding));

        if let Some(scale) = self.scale {
            self.scale = scale.rescaled(self.plot_width()).or(Some(scale));
        }

        if let Some(frame) = self.pending.take() {
            self.push_frame(&frame);
        }
    }

    /// Changes how many rows the raster keeps. Discards the painted rows.
    pub fn set_rows(&mut self, rows: usize) {
        self.options.rows = rows;
        self.buffer.set_scroll_extent(rows);
        self.history.clear();
    }

    /// Paints one frame as the newest row.
    ///
    /// Returns `false` when the frame could not be painted yet: with no
    /// viewport the frame is kept and retried on the next [`Self::resize`];
    /// empty frames are dropped.
    pub fn push_frame(&mut self, frame: &Frame) -> bool {
        let (_, viewport_height) = self.compositor.viewport_size();
        let plot_width = self.plot_width();
        if plot_width == 0 || viewport_height == 0 {
            tracing::debug!("Viewport not laid out yet, deferring frame {}", frame.sample_index);
            self.pending = Some(frame.clone());
            return false;
        }
        if frame.samples.is_empty() {
            return false;
        }

        let structural = self.buffer.lane_len() != 0 && self.buffer.lane_len() != frame.bin_count();
        if self.scale.is_none() || structural {
            self.scale = ScaleContext::new(frame.start_frequency, frame.stop_frequency, plot_width);
            tracing::debug!(
                "Waterfall scale set: {:.0}..{:.0} Hz over {} px",
                frame.start_frequency,
                frame.stop_frequency,
                plot_width
            );
        }

        if self.buffer.resize_if_needed(frame.bin_count()) {
            self.history.clear();
        }

        let painted = self.buffer.paint_row(
            &frame.samples,
            &self.palette,
            self.options.min_level,
            self.options.max_level,
        );
        if painted {
            self.history.push(frame.sample_index);
            self.frames_painted += 1;
        }
        painted
    }

    /// Redraws the viewport surface: raster, legend and selection overlay.
    pub fn render(&mut self) {
        self.compositor.render(
            &self.buffer,
            &self.palette,
            self.options.min_level,
            self.options.max_level,
            self.options.legend_width,
        );
        let origin_x = self.compositor.plot_rect(self.options.legend_width).x;
        let (surface, labels) = self.compositor.overlay_parts();
        self.selection.draw_overlay(surface, origin_x, labels);
    }

    /// Feeds a pointer event in plot-region pixel coordinates.
    pub fn handle_pointer(&mut self, event: &PointerEvent, now: Instant) -> Option<ChartEvent> {
        let (_, viewport_height) = self.compositor.viewport_size();
        let row_ratio = if viewport_height > 0 {
            self.buffer.scroll_extent() as f64 / viewport_height as f64
        } else {
            0.0
        };
        let ctx = DomainContext {
            scale: self.scale.as_ref(),
            history: &self.history,
            row_ratio,
            sample_rate: self.options.sample_rate,
        };
        self.selection.handle(event, now, &ctx)
    }

    /// Drops the selection overlay without emitting anything.
    pub fn cancel_selection(&mut self) {
        self.selection.cancel();
    }

    /// Blanks the raster and forgets the scale, history and selection. The
    /// next frame starts a new session.
    pub fn clear(&mut self) {
        self.buffer.clear();
        self.history.clear();
        self.selection.cancel();
        self.scale = None;
        self.pending = None;
        tracing::debug!("Waterfall cleared after {} frames", self.frames_painted);
        self.frames_painted = 0;
    }
}

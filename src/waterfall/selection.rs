//! Drag-to-select on the waterfall plot region.
//!
//! A gesture runs Idle -> Dragging -> Idle. Pointer-down voids any previous
//! selection, moves stretch a translucent rectangle, and pointer-up turns
//! the rectangle into frequency bounds (and a duration when both rows have
//! recorded history).

use std::time::Instant;

use crate::events::{ChartEvent, PointerEvent, PointerKind, SelectionKind};
use crate::raster::{PixelRect, PixelSurface, Rgba};
use crate::throttle::{Throttle, Trailing};

use super::compositor::{TextAlign, TextLabel};
use super::history::SampleIndexHistory;
use super::scale::ScaleContext;

const FILL: Rgba = Rgba::new(153, 153, 153, 153);
const STROKE: Rgba = Rgba::opaque(255, 0, 0);

/// Rectangle of the gesture in progress, plot pixel coordinates.
///
/// `end` stays `None` until the pointer has moved.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SelectionRect {
    pub begin_x: f64,
    pub begin_y: f64,
    pub end: Option<(f64, f64)>,
}

impl SelectionRect {
    fn pixel_bounds(&self) -> Option<(PixelRect, usize)> {
        let (end_x, end_y) = self.end?;
        let px = |v: f64| v.max(0.0).round() as usize;
        let rect =
            PixelRect::spanning((px(self.begin_x), px(self.begin_y)), (px(end_x), px(end_y)));
        let tick_x = px(self.begin_x + (end_x - self.begin_x) / 2.0);
        Some((rect, tick_x))
    }
}

/// Everything needed to turn a rectangle into domain values.
#[derive(Debug, Clone, Copy)]
pub struct DomainContext<'a> {
    /// `None` until the first frame arrived.
    pub scale: Option<&'a ScaleContext>,
    pub history: &'a SampleIndexHistory,
    /// Buffer rows per viewport pixel row.
    pub row_ratio: f64,
    /// Source samples per second, for durations.
    pub sample_rate: f64,
}

impl DomainContext<'_> {
    fn row_at(&self, y: f64) -> Option<usize> {
        if !(y >= 0.0) || !(self.row_ratio > 0.0) {
            return None;
        }
        Some((y * self.row_ratio).floor() as usize)
    }
}

/// Converts a finished drag into a [`ChartEvent::Selection`].
///
/// Returns `None` for a click without movement, a drag that did not move
/// horizontally, or when no frame has been received yet.
pub fn map_selection(rect: &SelectionRect, ctx: &DomainContext<'_>) -> Option<ChartEvent> {
    let (end_x, end_y) = rect.end?;
    let scale = ctx.scale?;
    if end_x == rect.begin_x {
        return None;
    }

    let min = scale.frequency_at(rect.begin_x);
    let max = scale.frequency_at(end_x);

    let rows = ctx
        .row_at(rect.begin_y)
        .zip(ctx.row_at(end_y))
        .map(|(a, b)| (a.max(b), a.min(b)));
    let indices = rows.and_then(|(older, newer)| {
        Some((ctx.history.index_at(older)?, ctx.history.index_at(newer)?))
    });

    let (start_index, end_index, duration) = match indices {
        Some((start, end)) => {
            let duration = (ctx.sample_rate > 0.0).then(|| (end - start) as f64 / ctx.sample_rate);
            (Some(start), Some(end), duration)
        }
        None => (None, None, None),
    };

    Some(ChartEvent::Selection {
        min,
        max,
        center: (max + min) / 2.0,
        bandwidth: (max - min).abs(),
        start_index,
        end_index,
        duration,
        kind: SelectionKind::WaterfallSelection,
    })
}

#[derive(Debug, Clone, PartialEq)]
struct Readout {
    x: usize,
    y: usize,
    text: String,
}

/// Gesture state machine for waterfall selections.
#[derive(Debug, Clone)]
pub struct SelectionMapper {
    enabled: bool,
    dragging: bool,
    rect: Option<SelectionRect>,
    readout: Option<Readout>,
    moves: Trailing<(f64, f64)>,
}

impl SelectionMapper {
    pub fn new(enabled: bool, throttle: Throttle) -> Self {
        SelectionMapper {
            enabled,
            dragging: false,
            rect: None,
            readout: None,
            moves: Trailing::new(throttle),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// Current (or last settled) rectangle.
    pub fn rect(&self) -> Option<&SelectionRect> {
        self.rect.as_ref()
    }

    /// Drops the overlay and any gesture in progress.
    pub fn cancel(&mut self) {
        self.dragging = false;
        self.rect = None;
        self.readout = None;
        self.moves.reset();
    }

    /// Feeds one pointer event, coordinates relative to the plot region.
    pub fn handle(
        &mut self,
        event: &PointerEvent,
        now: Instant,
        ctx: &DomainContext<'_>,
    ) -> Option<ChartEvent> {
        if !self.enabled {
            return None;
        }

        match event.kind {
            PointerKind::Down => {
                self.cancel();
                self.rect = Some(SelectionRect {
                    begin_x: event.x,
                    begin_y: event.y,
                    end: None,
                });
                self.dragging = true;
                Some(ChartEvent::SelectionCanceled)
            }
            PointerKind::Move => {
                if !self.dragging {
                    return None;
                }
                if let Some(end) = self.moves.offer((event.x, event.y), now) {
                    if let Some(rect) = self.rect.as_mut() {
                        rect.end = Some(end);
                    }
                }
                None
            }
            PointerKind::Up | PointerKind::Leave => {
                if !self.dragging {
                    return None;
                }
                self.dragging = false;
                if let (Some(end), Some(rect)) = (self.moves.take_pending(), self.rect.as_mut()) {
                    rect.end = Some(end);
                }

                let rect = self.rect?;
                let selection = map_selection(&rect, ctx);
                match &selection {
                    Some(event) => {
                        tracing::debug!("Waterfall {}", event.summary());
                        self.readout = readout_for(&rect, event);
                    }
                    None => self.rect = None,
                }
                selection
            }
        }
    }

    /// Draws the rectangle, its centre tick and the readout.
    ///
    /// `origin_x` is where the plot region starts on the surface; labels are
    /// pushed to `labels`.
    pub fn draw_overlay(
        &self,
        surface: &mut PixelSurface,
        origin_x: usize,
        labels: &mut Vec<TextLabel>,
    ) {
        let Some((rect, tick_x)) = self.rect.as_ref().and_then(SelectionRect::pixel_bounds) else {
            return;
        };

        let rect = PixelRect::new(rect.x + origin_x, rect.y, rect.width, rect.height);
        surface.blend_rect(rect, FILL);
        surface.stroke_rect(rect, STROKE);
        surface.vline(tick_x + origin_x, rect.y, rect.bottom() - 1, STROKE);

        if let Some(readout) = &self.readout {
            labels.push(TextLabel {
                text: readout.text.clone(),
                x: readout.x + origin_x,
                y: readout.y,
                align: TextAlign::Center,
            });
        }
    }
}

impl Default for SelectionMapper {
    fn default() -> Self {
        SelectionMapper::new(true, Throttle::default())
    }
}

fn readout_for(rect: &SelectionRect, event: &ChartEvent) -> Option<Readout> {
    let ChartEvent::Selection {
        center,
        bandwidth,
        duration,
        ..
    } = event
    else {
        return None;
    };
    let (end_x, _) = rect.end?;

    let mut lines = vec![
        format!("Center: {:.6} MHz", center / 1e6),
        format!("Bandwidth: {:.6} kHz", bandwidth / 1e3),
    ];
    if let Some(duration) = duration {
        lines.push(format!("Duration: {duration:.6} s"));
    }

    Some(Readout {
        x: ((rect.begin_x + end_x) / 2.0).max(0.0).round() as usize,
        y: rect.begin_y.max(0.0).round() as usize,
        text: lines.join("\n"),
    })
}

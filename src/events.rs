//! Pointer input and chart output events.
//!
//! The host translates its own input events into [`PointerEvent`]s with
//! coordinates relative to the element being interacted with, and consumes
//! the [`ChartEvent`]s the waterfall and overview emit back.

/// Phase of a pointer gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerKind {
    Down,
    Move,
    Up,
    /// Pointer left the element; ends a gesture like [`PointerKind::Up`].
    Leave,
}

/// Element a pointer event originated on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PointerTarget {
    /// The raster itself.
    #[default]
    Background,
    /// The overview's draggable position indicator.
    Indicator,
    /// The overview's highlighted selection band.
    SelectionBand,
}

/// Pointer event in pixel coordinates of the receiving element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub kind: PointerKind,
    pub x: f64,
    pub y: f64,
    pub target: PointerTarget,
}

impl PointerEvent {
    pub fn new(kind: PointerKind, x: f64, y: f64) -> Self {
        PointerEvent {
            kind,
            x,
            y,
            target: PointerTarget::Background,
        }
    }

    pub fn down(x: f64, y: f64) -> Self {
        Self::new(PointerKind::Down, x, y)
    }

    pub fn moved(x: f64, y: f64) -> Self {
        Self::new(PointerKind::Move, x, y)
    }

    pub fn up(x: f64, y: f64) -> Self {
        Self::new(PointerKind::Up, x, y)
    }

    pub fn leave(x: f64, y: f64) -> Self {
        Self::new(PointerKind::Leave, x, y)
    }

    pub fn on(mut self, target: PointerTarget) -> Self {
        self.target = target;
        self
    }
}

/// Which view produced a selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionKind {
    WaterfallSelection,
}

/// Events emitted by the waterfall and the overview.
#[derive(Debug, Clone, PartialEq)]
pub enum ChartEvent {
    /// A frequency (and possibly time) range was selected.
    ///
    /// `min` and `max` follow drag direction, so `min` may exceed `max`.
    Selection {
        min: f64,
        max: f64,
        center: f64,
        bandwidth: f64,
        start_index: Option<i64>,
        end_index: Option<i64>,
        /// Seconds between the two selected rows, when both rows have history.
        duration: Option<f64>,
        kind: SelectionKind,
    },
    /// A new gesture started; any previous selection is void.
    SelectionCanceled,
    /// The overview indicator was dropped at `percent` of the width.
    ProgressChanged { percent: f64 },
    /// A frame range was selected on the overview, `start_frame <= end_frame`.
    ProgressSelected { start_frame: u64, end_frame: u64 },
}

impl ChartEvent {
    /// Short human-readable summary for status lines and logs.
    pub fn summary(&self) -> String {
        match self {
            ChartEvent::Selection {
                center,
                bandwidth,
                duration,
                ..
            } => {
                let mut text = format!(
                    "selection: center {:.6} MHz, bandwidth {:.6} kHz",
                    center / 1e6,
                    bandwidth / 1e3
                );
                if let Some(duration) = duration {
                    text.push_str(&format!(", duration {duration:.6} s"));
                }
                text
            }
            ChartEvent::SelectionCanceled => "selection canceled".to_string(),
            ChartEvent::ProgressChanged { percent } => format!("seek to {percent:.1}%"),
            ChartEvent::ProgressSelected {
                start_frame,
                end_frame,
            } => format!("frames {start_frame}..{end_frame} selected"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selection_summary() {
        let event = ChartEvent::Selection {
            min: 92_000_000.0,
            max: 96_000_000.0,
            center: 94_000_000.0,
            bandwidth: 4_000_000.0,
            start_index: Some(0),
            end_index: Some(2048),
            duration: Some(0.5),
            kind: SelectionKind::WaterfallSelection,
        };
        assert_eq!(
            event.summary(),
            "selection: center 94.000000 MHz, bandwidth 4000.000000 kHz, duration 0.500000 s"
        );
    }

    #[test]
    fn test_pointer_event_builders() {
        let event = PointerEvent::down(3.0, 4.0).on(PointerTarget::Indicator);
        assert_eq!(event.kind, PointerKind::Down);
        assert_eq!(event.target, PointerTarget::Indicator);
        assert_eq!(PointerEvent::up(0.0, 0.0).target, PointerTarget::Background);
    }
}

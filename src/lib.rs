//! Raster core for spectrum waterfalls.
//!
//! The crate turns streamed spectrum frames into pixels: a live scrolling
//! [`Waterfall`] with drag-to-select frequency/time ranges, and a one-shot
//! [`Overview`] of a whole session with a seekable position indicator.
//! Hosts feed frames, forward pointer and resize events, and read back
//! composed [`PixelSurface`]s plus [`ChartEvent`]s.
//!
//! # Modules
//! - `raster`: palettes, quantization, scrolling buffers and surfaces
//! - `waterfall`: the live view and its selection mapping
//! - `overview`: the session thumbnail, indicator and selection band
//! - `events`: pointer input and chart output
//! - `throttle`: pointer-move rate limiting

pub mod events;
pub mod overview;
pub mod raster;
pub mod throttle;
pub mod waterfall;

pub use events::{ChartEvent, PointerEvent, PointerKind, PointerTarget, SelectionKind};
pub use overview::{AnalyzeParams, Overview, OverviewOptions};
pub use raster::{ColormapName, Palette, PixelRect, PixelSurface, RasterBuffer, Rgba, ScrollAxis};
pub use throttle::Throttle;
pub use waterfall::{Frame, TextAlign, TextLabel, Waterfall, WaterfallOptions};

//! Terminal presentation: the viewer, its raster widget and the error screen.

pub mod error;
pub mod raster_view;
pub mod viewer;

pub use error::show_fatal;
pub use viewer::{Pane, SpecfallTui, StatusLine, ViewerInput};

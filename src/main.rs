//! specfall: a terminal spectrum waterfall with a whole-session overview.
//!
//! The rasters, events and gesture handling live in the `specfall` library;
//! this binary wires them to a synthetic source and a crossterm terminal.

mod app;
mod commands;
mod config;
mod logging;
mod setup;
mod source;
mod ui;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    app::run().await
}

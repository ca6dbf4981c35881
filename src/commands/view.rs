//! Live viewer command.
//!
//! Generates a synthetic session, shows it as a scrolling waterfall with the
//! whole-session overview below, and reacts to selections and seeks.

use specfall::{ChartEvent, ColormapName, Overview, Waterfall};
use std::time::{Duration, Instant};
use tokio::time::MissedTickBehavior;

use crate::config::SpecfallConfig;
use crate::source::{self, Session};
use crate::ui::viewer::ViewerLayout;
use crate::ui::{self, Pane, SpecfallTui, StatusLine, ViewerInput};

/// Playback position over the generated session.
#[derive(Debug, Clone)]
struct Playback {
    cursor: usize,
    frame_count: usize,
    samples_per_frame: u64,
    loop_session: bool,
    paused: bool,
}

impl Playback {
    fn new(session: &Session, loop_session: bool) -> Self {
        Playback {
            cursor: 0,
            frame_count: session.frames.len(),
            samples_per_frame: session.samples_per_frame().max(1),
            loop_session,
            paused: false,
        }
    }

    /// Indices of the next `count` frames to show, wrapping around when
    /// looping. Fewer are returned at the end of a non-looping session.
    fn advance(&mut self, count: usize) -> Vec<usize> {
        let mut indices = Vec::with_capacity(count);
        for _ in 0..count {
            if self.cursor >= self.frame_count {
                if !self.loop_session || self.frame_count == 0 {
                    break;
                }
                self.cursor = 0;
            }
            indices.push(self.cursor);
            self.cursor += 1;
        }
        indices
    }

    fn is_finished(&self) -> bool {
        !self.loop_session && self.cursor >= self.frame_count
    }

    fn percent(&self) -> f64 {
        if self.frame_count == 0 {
            return 0.0;
        }
        self.cursor as f64 / self.frame_count as f64 * 100.0
    }

    fn seek_percent(&mut self, percent: f64) {
        let target = (percent / 100.0 * self.frame_count as f64).round();
        self.cursor = (target.max(0.0) as usize).min(self.frame_count);
    }

    fn seek_sample(&mut self, sample: u64) {
        self.cursor = ((sample / self.samples_per_frame) as usize).min(self.frame_count);
    }
}

/// Applies an emitted chart event to playback and returns the status text.
fn apply_event(event: &ChartEvent, playback: &mut Playback, sample_rate: f64) -> String {
    match event {
        ChartEvent::ProgressChanged { percent } => {
            playback.seek_percent(*percent);
            format!("seek to {percent:.1}% (frame {})", playback.cursor)
        }
        ChartEvent::ProgressSelected {
            start_frame,
            end_frame,
        } => {
            playback.seek_sample(*start_frame);
            let seconds = (end_frame - start_frame) as f64 / sample_rate;
            format!(
                "{} ({:.3} s), replaying from frame {}",
                event.summary(),
                seconds,
                playback.cursor
            )
        }
        ChartEvent::Selection { .. } | ChartEvent::SelectionCanceled => event.summary(),
    }
}

fn load_config(
    frames: Option<usize>,
    colormap: Option<ColormapName>,
) -> anyhow::Result<SpecfallConfig> {
    let mut config = SpecfallConfig::load()?;
    if let Some(frames) = frames {
        config.source.frames = frames;
    }
    if let Some(colormap) = colormap {
        config.waterfall.colormap = colormap;
        config.overview.colormap = colormap;
    }
    config.validate()?;
    Ok(config)
}

/// Runs the viewer until the user quits.
///
/// # Errors
/// - If the configuration is invalid (shown on an error screen first)
/// - If the terminal cannot be driven
pub async fn handle_view(
    frames: Option<usize>,
    colormap: Option<ColormapName>,
) -> anyhow::Result<()> {
    tracing::info!("=== specfall viewer started ===");

    let config = match load_config(frames, colormap) {
        Ok(config) => config,
        Err(err) => {
            tracing::error!("Failed to load configuration: {err}");
            ui::show_fatal(
                "Configuration Error",
                &format!("{err}\n\nPlease fix ~/.config/specfall/specfall.toml and try again."),
            )?;
            return Err(anyhow::anyhow!("Configuration error: {err}"));
        }
    };

    tracing::info!(
        "Configuration loaded: colormap={}, rows={}, frames={}, tick={}ms",
        config.waterfall.colormap,
        config.waterfall.rows,
        config.source.frames,
        config.playback.tick_ms
    );

    let session = source::generate_session(&config.source);

    let mut waterfall = Waterfall::new(config.waterfall_options());
    waterfall.set_sample_rate(session.sample_rate);

    let mut overview = Overview::new(config.overview_options());
    overview.set_analyze_params(session.analyze);
    overview.set_total_count(u64::try_from(session.total_sample_count).unwrap_or(0));
    overview.draw_progress(&session.frames);

    let mut playback = Playback::new(&session, config.playback.loop_session);
    let mut status = StatusLine {
        frame_count: session.frames.len(),
        message: "drag on the waterfall to measure, on the overview to pick a range".to_string(),
        ..StatusLine::default()
    };

    let mut tui = SpecfallTui::new(config.overview.height, config.waterfall.legend_width)?;
    let mut layout = ViewerLayout::default();

    let mut ticker = tokio::time::interval(Duration::from_millis(config.playback.tick_ms));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    'running: loop {
        ticker.tick().await;

        while let Some(input) = tui.poll_input(Duration::ZERO)? {
            match input {
                ViewerInput::Quit => break 'running,
                ViewerInput::TogglePause => {
                    playback.paused = !playback.paused;
                    tracing::debug!("Playback paused: {}", playback.paused);
                }
                ViewerInput::Clear => waterfall.clear(),
                ViewerInput::DropSelections => {
                    waterfall.cancel_selection();
                    overview.reset_selection_band();
                }
                ViewerInput::Resized => {}
                ViewerInput::Pointer(pane, event) => {
                    let now = Instant::now();
                    let emitted = match pane {
                        Pane::Waterfall => waterfall.handle_pointer(&event, now),
                        Pane::Overview => overview.handle_pointer(&event, now),
                    };
                    if let Some(event) = emitted {
                        status.message = apply_event(&event, &mut playback, session.sample_rate);
                    }
                }
            }
        }

        let current = tui.layout()?;
        if current != layout {
            layout = current;
            let (width, height) = layout.waterfall_pixels();
            waterfall.resize(width, height);
            let (width, height) = layout.overview_pixels();
            overview.resize(width, height);
            tracing::debug!("Layout changed: {:?}", layout);
        }

        if !playback.paused {
            for index in playback.advance(config.playback.frames_per_tick) {
                waterfall.push_frame(&session.frames[index]);
            }
            overview.set_percentage(playback.percent());
            if playback.is_finished() {
                playback.paused = true;
                status.message = "end of session".to_string();
                tracing::info!("End of session reached");
            }
        }

        status.paused = playback.paused;
        status.percent = playback.percent();
        status.frame = playback.cursor;

        waterfall.render();
        overview.render();
        tui.draw(&waterfall, &overview, &status)?;
    }

    tui.cleanup()?;
    tracing::info!("Viewer closed after {} frames", waterfall.frames_painted());
    Ok(())
}

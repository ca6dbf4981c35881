//! Terminal viewer: waterfall on top, session overview below, status footer.
//!
//! Translates crossterm mouse events into pixel-space pointer events for the
//! pane under the cursor and draws both composed surfaces.

use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyModifiers, MouseButton,
        MouseEvent, MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{prelude::*, widgets::Paragraph};
use specfall::{Overview, PointerEvent, Waterfall};
use std::io::{stdout, Stdout};
use std::time::Duration;

use super::raster_view::{RasterView, PIXELS_PER_ROW};

/// Screen regions, in terminal cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ViewerLayout {
    pub waterfall: Rect,
    pub overview: Rect,
    pub footer: Rect,
}

impl ViewerLayout {
    /// Splits `area` into waterfall, overview and a one-row footer. The
    /// overview never takes more than a third of the space above the footer.
    pub fn compute(area: Rect, overview_height: u16) -> Self {
        let footer_height = area.height.min(1);
        let content_height = area.height - footer_height;
        let overview_height = overview_height.min(content_height / 3);
        let waterfall_height = content_height - overview_height;

        ViewerLayout {
            waterfall: Rect::new(area.x, area.y, area.width, waterfall_height),
            overview: Rect::new(area.x, area.y + waterfall_height, area.width, overview_height),
            footer: Rect::new(area.x, area.y + content_height, area.width, footer_height),
        }
    }

    /// Waterfall viewport size in pixels.
    pub fn waterfall_pixels(&self) -> (usize, usize) {
        pixel_size(self.waterfall)
    }

    /// Overview box size in pixels.
    pub fn overview_pixels(&self) -> (usize, usize) {
        pixel_size(self.overview)
    }
}

fn pixel_size(area: Rect) -> (usize, usize) {
    (area.width as usize, area.height as usize * PIXELS_PER_ROW)
}

/// Which view a pointer gesture belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pane {
    Waterfall,
    Overview,
}

/// Routes mouse events to the pane a gesture started in.
///
/// Waterfall coordinates are relative to the plot region (right of the
/// legend); overview coordinates to the overview box.
#[derive(Debug, Clone, Default)]
pub struct PointerRouter {
    legend_width: u16,
    active: Option<Pane>,
}

impl PointerRouter {
    pub fn new(legend_width: usize) -> Self {
        PointerRouter {
            legend_width: u16::try_from(legend_width).unwrap_or(u16::MAX),
            active: None,
        }
    }

    fn region(&self, pane: Pane, layout: &ViewerLayout) -> Rect {
        match pane {
            Pane::Waterfall => {
                let legend = self.legend_width.min(layout.waterfall.width);
                Rect::new(
                    layout.waterfall.x + legend,
                    layout.waterfall.y,
                    layout.waterfall.width - legend,
                    layout.waterfall.height,
                )
            }
            Pane::Overview => layout.overview,
        }
    }

    fn pane_at(&self, column: u16, row: u16, layout: &ViewerLayout) -> Option<Pane> {
        let position = Position::new(column, row);
        [Pane::Waterfall, Pane::Overview]
            .into_iter()
            .find(|pane| self.region(*pane, layout).contains(position))
    }

    fn to_pixels(&self, pane: Pane, column: u16, row: u16, layout: &ViewerLayout) -> (f64, f64) {
        let region = self.region(pane, layout);
        let column = column.clamp(region.x, region.right().saturating_sub(1).max(region.x));
        let row = row.clamp(region.y, region.bottom().saturating_sub(1).max(region.y));
        (
            (column - region.x) as f64,
            ((row - region.y) as usize * PIXELS_PER_ROW) as f64,
        )
    }

    pub fn route(
        &mut self,
        mouse: MouseEvent,
        layout: &ViewerLayout,
    ) -> Option<(Pane, PointerEvent)> {
        let (column, row) = (mouse.column, mouse.row);

        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                let pane = self.pane_at(column, row, layout)?;
                self.active = Some(pane);
                let (x, y) = self.to_pixels(pane, column, row, layout);
                Some((pane, PointerEvent::down(x, y)))
            }
            MouseEventKind::Drag(MouseButton::Left) | MouseEventKind::Moved => {
                let pane = self.active?;
                let (x, y) = self.to_pixels(pane, column, row, layout);
                if self.pane_at(column, row, layout) == Some(pane) {
                    Some((pane, PointerEvent::moved(x, y)))
                } else {
                    self.active = None;
                    Some((pane, PointerEvent::leave(x, y)))
                }
            }
            MouseEventKind::Up(MouseButton::Left) => {
                let pane = self.active.take()?;
                let (x, y) = self.to_pixels(pane, column, row, layout);
                Some((pane, PointerEvent::up(x, y)))
            }
            _ => None,
        }
    }
}

/// Input the view command acts on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ViewerInput {
    Quit,
    TogglePause,
    /// Blank the waterfall and start over.
    Clear,
    /// Drop both selection overlays.
    DropSelections,
    Resized,
    Pointer(Pane, PointerEvent),
}

/// Footer contents.
#[derive(Debug, Clone, Default)]
pub struct StatusLine {
    pub paused: bool,
    pub percent: f64,
    pub frame: usize,
    pub frame_count: usize,
    pub message: String,
}

/// Full-screen terminal viewer.
pub struct SpecfallTui {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    router: PointerRouter,
    overview_height: u16,
}

impl SpecfallTui {
    /// Enters raw mode, the alternate screen and mouse capture.
    ///
    /// # Errors
    /// - If the terminal cannot be initialized
    pub fn new(overview_height: u16, legend_width: usize) -> anyhow::Result<Self> {
        enable_raw_mode()?;
        let mut stdout = stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;

        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;

        Ok(SpecfallTui {
            terminal,
            router: PointerRouter::new(legend_width),
            overview_height,
        })
    }

    pub fn layout(&self) -> anyhow::Result<ViewerLayout> {
        let size = self.terminal.size()?;
        Ok(ViewerLayout::compute(
            Rect::new(0, 0, size.width, size.height),
            self.overview_height,
        ))
    }

    /// Waits up to `timeout` for one input event.
    ///
    /// # Errors
    /// - If event polling fails
    pub fn poll_input(&mut self, timeout: Duration) -> anyhow::Result<Option<ViewerInput>> {
        if !event::poll(timeout)? {
            return Ok(None);
        }

        let input = match event::read()? {
            Event::Key(key) => match key.code {
                KeyCode::Char('q') | KeyCode::Esc => Some(ViewerInput::Quit),
                KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                    Some(ViewerInput::Quit)
                }
                KeyCode::Char(' ') => Some(ViewerInput::TogglePause),
                KeyCode::Char('c') => Some(ViewerInput::Clear),
                KeyCode::Char('x') => Some(ViewerInput::DropSelections),
                _ => None,
            },
            Event::Mouse(mouse) => {
                let layout = self.layout()?;
                self.router
                    .route(mouse, &layout)
                    .map(|(pane, event)| ViewerInput::Pointer(pane, event))
            }
            Event::Resize(_, _) => Some(ViewerInput::Resized),
            _ => None,
        };
        Ok(input)
    }

    /// Draws the composed surfaces and the footer.
    ///
    /// # Errors
    /// - If terminal rendering fails
    pub fn draw(
        &mut self,
        waterfall: &Waterfall,
        overview: &Overview,
        status: &StatusLine,
    ) -> anyhow::Result<()> {
        let layout = self.layout()?;
        self.terminal.draw(|frame| {
            frame.render_widget(
                RasterView::new(waterfall.surface()).labels(waterfall.labels()),
                layout.waterfall,
            );
            frame.render_widget(RasterView::new(overview.surface()), layout.overview);
            frame.render_widget(footer(status), layout.footer);
        })?;
        Ok(())
    }

    /// Restores the terminal.
    ///
    /// # Errors
    /// - If terminal mode cannot be restored
    pub fn cleanup(&mut self) -> anyhow::Result<()> {
        disable_raw_mode()?;
        execute!(
            self.terminal.backend_mut(),
            DisableMouseCapture,
            LeaveAlternateScreen
        )?;
        self.terminal.show_cursor()?;
        Ok(())
    }
}

impl Drop for SpecfallTui {
    fn drop(&mut self) {
        let _ = self.cleanup();
    }
}

fn footer(status: &StatusLine) -> Paragraph<'static> {
    let state = if status.paused {
        Span::styled("⏸ ", Style::default().fg(Color::Yellow))
    } else {
        Span::styled("▶ ", Style::default().fg(Color::Green))
    };

    let line = Line::from(vec![
        state,
        Span::raw(format!(
            "{:5.1}% {}/{}",
            status.percent, status.frame, status.frame_count
        )),
        Span::raw(" │ "),
        Span::raw(status.message.clone()),
        Span::styled(
            "  q quit · space pause · c clear · x drop selection",
            Style::default().fg(Color::DarkGray),
        ),
    ]);

    Paragraph::new(line).style(
        Style::default()
            .fg(Color::Rgb(185, 207, 212))
            .bg(Color::Rgb(0, 0, 0)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use specfall::PointerKind;

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    fn layout() -> ViewerLayout {
        ViewerLayout::compute(Rect::new(0, 0, 100, 31), 6)
    }

    #[test]
    fn test_layout_split() {
        let layout = layout();
        assert_eq!(layout.waterfall, Rect::new(0, 0, 100, 24));
        assert_eq!(layout.overview, Rect::new(0, 24, 100, 6));
        assert_eq!(layout.footer, Rect::new(0, 30, 100, 1));
        assert_eq!(layout.waterfall_pixels(), (100, 48));
        assert_eq!(layout.overview_pixels(), (100, 12));
    }

    #[test]
    fn test_layout_caps_overview() {
        let layout = ViewerLayout::compute(Rect::new(0, 0, 40, 10), 6);
        assert_eq!(layout.overview.height, 3);
        assert_eq!(layout.waterfall.height, 6);
    }

    #[test]
    fn test_waterfall_drag_is_plot_relative() {
        let layout = layout();
        let mut router = PointerRouter::new(8);

        let (pane, down) = router
            .route(mouse(MouseEventKind::Down(MouseButton::Left), 18, 3), &layout)
            .unwrap();
        assert_eq!(pane, Pane::Waterfall);
        assert_eq!((down.kind, down.x, down.y), (PointerKind::Down, 10.0, 6.0));

        let (_, moved) = router
            .route(mouse(MouseEventKind::Drag(MouseButton::Left), 30, 5), &layout)
            .unwrap();
        assert_eq!((moved.kind, moved.x, moved.y), (PointerKind::Move, 22.0, 10.0));

        let (_, up) = router
            .route(mouse(MouseEventKind::Up(MouseButton::Left), 30, 5), &layout)
            .unwrap();
        assert_eq!(up.kind, PointerKind::Up);
        assert!(router
            .route(mouse(MouseEventKind::Up(MouseButton::Left), 30, 5), &layout)
            .is_none());
    }

    #[test]
    fn test_press_on_legend_is_ignored() {
        let mut router = PointerRouter::new(8);
        assert!(router
            .route(mouse(MouseEventKind::Down(MouseButton::Left), 3, 3), &layout())
            .is_none());
    }

    #[test]
    fn test_leaving_the_pane_ends_the_gesture() {
        let layout = layout();
        let mut router = PointerRouter::new(8);
        router.route(mouse(MouseEventKind::Down(MouseButton::Left), 50, 26), &layout);

        let (pane, leave) = router
            .route(mouse(MouseEventKind::Drag(MouseButton::Left), 50, 10), &layout)
            .unwrap();
        assert_eq!(pane, Pane::Overview);
        assert_eq!(leave.kind, PointerKind::Leave);
        assert_eq!((leave.x, leave.y), (50.0, 0.0));
        assert!(router
            .route(mouse(MouseEventKind::Up(MouseButton::Left), 50, 10), &layout)
            .is_none());
    }
}

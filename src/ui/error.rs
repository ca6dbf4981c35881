//! Full-screen error display for problems found before the viewer starts.

use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    prelude::*,
    widgets::{Paragraph, Wrap},
};
use std::io::{self, Stdout};
use std::time::Duration;

const ERROR_BG: Color = Color::Rgb(255, 0, 0);
const ERROR_FG: Color = Color::Rgb(255, 255, 255);

/// Red screen with the message centred on it; any key dismisses it.
pub struct ErrorScreen {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl ErrorScreen {
    /// Enters raw mode and the alternate screen.
    ///
    /// # Errors
    /// - If the terminal cannot be initialized
    pub fn new() -> anyhow::Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let terminal = Terminal::new(CrosstermBackend::new(stdout))?;
        Ok(ErrorScreen { terminal })
    }

    /// Shows `title` and `message` until a key is pressed.
    ///
    /// # Errors
    /// - If terminal rendering or input polling fails
    pub fn show_error(&mut self, title: &str, message: &str) -> anyhow::Result<()> {
        let text = error_text(title, message);
        loop {
            self.terminal.draw(|frame| {
                let area = frame.area();
                frame.buffer_mut().set_style(area, Style::default().bg(ERROR_BG));

                let height = (text.lines.len() as u16).min(area.height);
                let message_area = Rect {
                    x: area.x + area.width / 10,
                    y: area.y + area.height.saturating_sub(height) / 2,
                    width: area.width * 8 / 10,
                    height: area.height - area.height.saturating_sub(height) / 2,
                };
                frame.render_widget(
                    Paragraph::new(text.clone())
                        .alignment(Alignment::Center)
                        .wrap(Wrap { trim: true }),
                    message_area,
                );
            })?;

            if event::poll(Duration::from_millis(100))? {
                if let Event::Key(_) = event::read()? {
                    break;
                }
            }
        }
        Ok(())
    }

    /// Leaves the alternate screen and restores the terminal.
    ///
    /// # Errors
    /// - If terminal mode cannot be restored
    pub fn cleanup(&mut self) -> anyhow::Result<()> {
        disable_raw_mode()?;
        execute!(self.terminal.backend_mut(), LeaveAlternateScreen)?;
        self.terminal.show_cursor()?;
        Ok(())
    }
}

impl Drop for ErrorScreen {
    fn drop(&mut self) {
        let _ = self.cleanup();
    }
}

/// Builds the screen text: bold title, blank line, message lines, hint.
fn error_text(title: &str, message: &str) -> Text<'static> {
    let style = Style::default().fg(ERROR_FG).bg(ERROR_BG);
    let mut lines = vec![
        Line::styled(title.to_string(), style.add_modifier(Modifier::BOLD)),
        Line::default(),
    ];
    lines.extend(message.lines().map(|l| Line::styled(l.to_string(), style)));
    lines.push(Line::default());
    lines.push(Line::styled("Press any key to exit", style.add_modifier(Modifier::DIM)));
    Text::from(lines)
}

/// Shows an error screen and restores the terminal afterwards.
///
/// # Errors
/// - If the terminal cannot be driven
pub fn show_fatal(title: &str, message: &str) -> anyhow::Result<()> {
    let mut screen = ErrorScreen::new()?;
    screen.show_error(title, message)?;
    screen.cleanup()
}

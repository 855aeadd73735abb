pub mod debug;
pub mod tabs;

use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::app::{App, Tab};

pub fn render(frame: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Tab bar
            Constraint::Length(1), // Link status
            Constraint::Min(0),    // Content
        ])
        .split(frame.area());

    tabs::render_tabs(frame, app, chunks[0]);
    render_status(frame, app, chunks[1]);

    match app.current_tab {
        Tab::Visualizer => app.viz.render(frame, chunks[2], &app.snapshot),
        Tab::Debug => debug::render_debug(frame, chunks[2], &app.snapshot),
    }
}

/// One-line link banner: the only place connection trouble surfaces.
fn render_status(frame: &mut Frame, app: &App, area: Rect) {
    let (label, color) = if app.link_up {
        ("● LINK UP", Color::Rgb(0, 255, 128))
    } else {
        ("● LINK DOWN", Color::Rgb(255, 70, 70))
    };
    let line = Line::from(vec![
        Span::styled(
            format!(" {label} "),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("· {} ", app.feed_label),
            Style::default().fg(Color::Rgb(120, 120, 140)),
        ),
        Span::styled(
            "   Tab switch · 1/2 jump · D overlay · Q quit",
            Style::default().fg(Color::Rgb(90, 90, 110)),
        ),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

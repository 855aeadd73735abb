use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::app::{App, Tab};

const ACCENT: Color = Color::Rgb(0, 255, 255);

/// Top bar: the panel name plus one numbered title per tab, numbers
/// matching the jump keys.
pub fn render_tabs(frame: &mut Frame, app: &App, area: Rect) {
    let titles: Vec<Line> = Tab::all()
        .iter()
        .map(|t| Line::from(format!(" {} {} ", t.index() + 1, t.title())))
        .collect();

    let tabs = Tabs::new(titles)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(Color::Rgb(0, 150, 170)))
                .title(" ⚡ PANELSCOPE ")
                .title_style(Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)),
        )
        .select(app.current_tab.index())
        .style(Style::default().fg(Color::Rgb(120, 120, 140)))
        .highlight_style(Style::default().fg(ACCENT).add_modifier(Modifier::BOLD))
        .divider(Span::styled("│", Style::default().fg(Color::Rgb(60, 60, 80))));

    frame.render_widget(tabs, area);
}

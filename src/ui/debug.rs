//! Raw panel state view: one tile per control, with unknown states
//! shown explicitly rather than guessed at.

use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::hardware::{Encoder, HardwareSnapshot, SwitchColor, ENCODER_COUNT};

const DIM: Color = Color::Rgb(120, 120, 140);
const DARK: Color = Color::Rgb(70, 70, 85);

pub fn render_debug(frame: &mut Frame, area: Rect, snapshot: &HardwareSnapshot) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::Rgb(0, 150, 170)))
        .title(" Panel State ")
        .title_style(Style::default().fg(Color::Rgb(0, 255, 255)));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5),
            Constraint::Length(5),
            Constraint::Min(0),
        ])
        .split(inner);

    let switches = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(25); 4])
        .split(rows[0]);

    render_state_tile(frame, switches[0], "KEY", Color::Rgb(255, 220, 80), snapshot.key());
    for (i, color) in SwitchColor::ALL.into_iter().enumerate() {
        let (r, g, b) = color.rgb();
        render_state_tile(
            frame,
            switches[i + 1],
            color.label(),
            Color::Rgb(r, g, b),
            snapshot.switch(color),
        );
    }

    let encoders = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(25); 4])
        .split(rows[1]);

    for index in 0..ENCODER_COUNT {
        render_encoder_tile(frame, encoders[index], index, snapshot.encoder(index));
    }
}

fn render_state_tile(frame: &mut Frame, area: Rect, label: &str, accent: Color, state: Option<bool>) {
    let (mark, text, style) = match state {
        Some(true) => ("●", "ACTIVE", Style::default().fg(accent).add_modifier(Modifier::BOLD)),
        Some(false) => ("○", "INACTIVE", Style::default().fg(DIM)),
        None => ("?", "UNKNOWN", Style::default().fg(DARK)),
    };
    let border = if state == Some(true) { accent } else { DARK };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border))
        .title(format!(" {label} "))
        .title_style(Style::default().fg(DIM));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let lines = vec![
        Line::from(Span::styled(mark, style)),
        Line::from(Span::styled(text, style)),
    ];
    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), inner);
}

fn render_encoder_tile(frame: &mut Frame, area: Rect, index: usize, encoder: Encoder) {
    use crate::hardware::Direction as Dir;

    let dir_style = match encoder.direction {
        Dir::Right => Style::default().fg(Color::Rgb(0, 255, 128)),
        Dir::Left => Style::default().fg(Color::Rgb(255, 160, 0)),
        Dir::Idle => Style::default().fg(DIM),
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(DARK))
        .title(format!(" ENCODER {} ", index + 1))
        .title_style(Style::default().fg(DIM));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let lines = vec![
        Line::from(Span::styled(
            encoder.value.to_string(),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(encoder.direction.label(), dir_style)),
    ];
    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), inner);
}

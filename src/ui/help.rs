//! Help overlay listing the viewer's keys.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Row, Table},
    Frame,
};

const BINDINGS: [(&str, &str); 8] = [
    ("j / ↓ / Space", "Next article"),
    ("k / ↑", "Previous article"),
    ("g / Home", "First article"),
    ("G / End", "Last loaded article"),
    ("o / Enter", "Open article in browser"),
    ("r", "Load the next page now"),
    ("?", "Toggle this help"),
    ("q / Esc", "Quit"),
];

pub fn render(f: &mut Frame) {
    let overlay = centered_rect(60, 60, f.area());
    if overlay.width < 20 || overlay.height < 6 {
        return;
    }

    f.render_widget(Clear, overlay);

    let rows = BINDINGS.iter().map(|(keys, action)| {
        Row::new(vec![
            Line::from(Span::styled(
                *keys,
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(*action),
        ])
    });

    let table = Table::new(rows, [Constraint::Length(16), Constraint::Min(10)])
        .block(Block::default().borders(Borders::ALL).title(" Keys "));

    f.render_widget(table, overlay);
}

/// A rect of `percent_x` by `percent_y` centred in `area`.
fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}

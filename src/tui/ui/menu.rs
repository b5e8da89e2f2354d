use crate::tui::app::AppState;
use ratatui::layout::Flex;
use ratatui::prelude::*;
use ratatui::widgets::*;

use super::layout::{centered_rect, inner};

const LOGO: &str = r#"
 ___              _
| _ ) ___  ___ __| |_ ___ _ _
| _ \/ _ \/ _ (_-<  _/ -_) '_|
|___/\___/\___/__/\__\___|_|
   ___           __ _
  |   \ _ _ __ _/ _| |_
  | |) | '_/ _` |  _|  _|
  |___/|_| \__,_|_|  \__|
"#;

pub(super) fn draw_menu(f: &mut Frame, app: &AppState) {
    let size = f.area();
    let area = centered_rect(80, 80, size);
    let block = Block::default().title("booster-draft").borders(Borders::ALL);
    f.render_widget(Clear, area);
    f.render_widget(block, area);
    let inner_all = inner(area);

    let logo_lines: Vec<Line> = LOGO
        .lines()
        .map(|l| Line::from(Span::styled(l.to_string(), Style::default().fg(Color::Magenta))))
        .collect();

    let [logo_area, cfg_area] =
        Layout::vertical([Constraint::Length(logo_lines.len() as u16 + 1), Constraint::Min(3)])
            .areas(inner_all);

    // Left-aligned inside a centered block so the glyphs keep their spacing
    let logo_width = LOGO.lines().map(str::len).max().unwrap_or(0) as u16;
    let [logo_centered] = Layout::horizontal([Constraint::Length(logo_width)])
        .flex(Flex::Center)
        .areas(logo_area);
    f.render_widget(Paragraph::new(logo_lines), logo_centered);

    let mut cfg_lines: Vec<Line> = Vec::new();
    cfg_lines.push(Line::from(Span::styled(
        "Configuration:",
        Style::default().add_modifier(Modifier::BOLD),
    )));
    for (i, it) in app.menu_items_display().into_iter().enumerate() {
        let style = if i == app.menu_index {
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        cfg_lines.push(Line::from(Span::styled(it, style)));
    }
    cfg_lines.push(Line::from(Span::styled(
        format!("Pool: {} cards", app.pool_size()),
        Style::default().add_modifier(Modifier::DIM),
    )));
    cfg_lines.push(Line::from(""));
    if let Some(err) = app.menu_error() {
        cfg_lines.push(Line::from(Span::styled(err.to_string(), Style::default().fg(Color::Red))));
    }
    cfg_lines.push(Line::from(Span::styled(
        "[Enter] Apply  [Q] Quit  [Esc] Cancel  [↑/↓] Move  [+/-] Adjust",
        Style::default().add_modifier(Modifier::DIM),
    )));
    let cfg_para = Paragraph::new(cfg_lines).wrap(Wrap { trim: true }).alignment(Alignment::Center);
    f.render_widget(cfg_para, cfg_area);
}

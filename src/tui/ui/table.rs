use crate::draft::DraftStatus;
use crate::tui::app::AppState;
use ratatui::prelude::*;
use ratatui::widgets::*;

use super::layout::{centered_rect, columns, inner};

const SEATS_PER_ROW: usize = 4;

pub(super) fn draw_table(f: &mut Frame, app: &AppState) {
    let size = f.area();
    let status_height: u16 = 2 + 2; // content + borders

    let [header_area, body_area, status_area] = Layout::vertical([
        Constraint::Length(4),
        Constraint::Min(6),
        Constraint::Length(status_height),
    ])
    .areas(size);

    let draft = &app.draft;
    let header_lines = vec![
        Line::from(app.status_line()),
        Line::from(format!(
            "Players: {}   Cards/pack: {}   Drafted: {}/{}   Rev: {}",
            draft.num_players(),
            draft.config().cards_per_pack,
            draft.cards_drafted(),
            draft.cards_dealt(),
            draft.revision(),
        )),
    ];
    let header = Paragraph::new(header_lines)
        .block(Block::default().title("booster-draft").borders(Borders::ALL));
    f.render_widget(header, header_area);

    let [pack_area, right_area] =
        Layout::horizontal([Constraint::Percentage(40), Constraint::Percentage(60)])
            .areas(body_area);
    draw_pack(f, pack_area, app);

    let seat_rows = draft.num_players().div_ceil(SEATS_PER_ROW).max(1);
    let [seats_area, picks_area] =
        Layout::vertical([Constraint::Length(seat_rows as u16 * 5), Constraint::Min(3)])
            .areas(right_area);
    draw_seats(f, seats_area, app);
    draw_picks(f, picks_area, app);

    // Status bar: info on the left, keys on the right
    f.render_widget(Block::default().borders(Borders::ALL).title("Status"), status_area);
    let [left, right] =
        Layout::horizontal([Constraint::Percentage(60), Constraint::Percentage(40)])
            .areas(inner(status_area));

    let mut left_info = if !app.draft_started {
        vec![Line::from("Draft not started; press Space to deal.")]
    } else if draft.is_complete() {
        vec![Line::from("Draft complete; press Space to deal again.")]
    } else if app.human_pack().is_some() {
        vec![Line::from("Your pick: ↑/↓ to choose, Enter to draft.")]
    } else {
        vec![Line::from("Waiting for a pack...")]
    };
    if let Some(err) = app.action_error() {
        left_info.push(Line::from(Span::styled(
            format!("Error: {err}"),
            Style::default().fg(Color::Red),
        )));
    }
    let right_keys = vec![Line::from(""), Line::from("? help • M menu • [/] focus")];
    f.render_widget(Paragraph::new(left_info).wrap(Wrap { trim: true }), left);
    f.render_widget(
        Paragraph::new(right_keys).wrap(Wrap { trim: true }).alignment(Alignment::Right),
        right,
    );

    if app.help_open() {
        draw_help(f);
    }
}

fn draw_pack(f: &mut Frame, area: Rect, app: &AppState) {
    let cards = app.human_pack().unwrap_or(&[]);
    let title = match app.draft.round() {
        Some(r) => format!("Your pack ({} cards, pack {})", cards.len(), r + 1),
        None => "Your pack".to_string(),
    };
    let mut block = Block::default().title(title).borders(Borders::ALL);
    if !cards.is_empty() {
        block = block.border_style(Style::default().fg(Color::Yellow));
    }
    let body = inner(area);
    f.render_widget(block, area);

    if cards.is_empty() {
        let dim = Style::default().add_modifier(Modifier::DIM);
        f.render_widget(Paragraph::new(Line::from(Span::styled("No pack on deck", dim))), body);
        return;
    }
    // Scroll so the cursor row stays visible
    let visible = body.height.max(1) as usize;
    let start = app.cursor.saturating_sub(visible - 1);
    let lines: Vec<Line> = cards
        .iter()
        .enumerate()
        .skip(start)
        .take(visible)
        .map(|(i, card)| {
            if i == app.cursor {
                Line::from(Span::styled(
                    format!("> {card}"),
                    Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
                ))
            } else {
                Line::from(format!("  {card}"))
            }
        })
        .collect();
    f.render_widget(Paragraph::new(lines), body);
}

fn draw_seats(f: &mut Frame, area: Rect, app: &AppState) {
    let total = app.draft.num_players();
    let rows = total.div_ceil(SEATS_PER_ROW);
    if rows == 0 {
        return;
    }
    let row_areas = Layout::vertical((0..rows).map(|_| Constraint::Length(5))).split(area);
    for (r, row_area) in row_areas.iter().enumerate() {
        let first = r * SEATS_PER_ROW;
        let count = SEATS_PER_ROW.min(total - first);
        for (c, seat_area) in columns(*row_area, count).into_iter().enumerate() {
            render_seat(f, seat_area, app, first + c);
        }
    }
}

fn render_seat(f: &mut Frame, seat_area: Rect, app: &AppState, idx: usize) {
    let mut title = format!("P{} {}", idx + 1, app.player_label(idx));
    if idx == app.focus {
        title.push_str(" [Focus]");
    }
    let queue = app.draft.queue_at(idx);
    let opened = queue.map(|q| q.opened().len()).unwrap_or(0);
    let unopened = queue.map(|q| q.unopened().len()).unwrap_or(0);
    let on_deck = queue.and_then(|q| q.on_deck()).map(|p| p.len());
    let picks = app.draft.picks_at(idx).map_or(0, |p| p.len());

    let mut block = Block::default().title(title).borders(Borders::ALL);
    if idx == app.focus {
        block = block.border_style(Style::default().fg(Color::Cyan));
    } else if on_deck.is_none() {
        block = block.border_style(Style::default().fg(Color::DarkGray));
    }
    let lines = vec![
        Line::from(format!("Queue: {opened} open, {unopened} sealed")),
        Line::from(match on_deck {
            Some(n) => format!("On deck: {n} cards"),
            None => "On deck: --".to_string(),
        }),
        Line::from(format!("Picks: {picks}")),
    ];
    f.render_widget(Paragraph::new(lines).block(block).wrap(Wrap { trim: true }), seat_area);
}

fn draw_picks(f: &mut Frame, area: Rect, app: &AppState) {
    let picks = app.draft.picks_at(app.focus).unwrap_or(&[]);
    let title = format!("Picks: P{} {}", app.focus + 1, app.player_label(app.focus));
    let block = Block::default().title(title).borders(Borders::ALL);
    let body = inner(area);
    f.render_widget(block, area);

    // Newest picks last; keep the tail when the list overflows
    let visible = body.height as usize;
    let start = picks.len().saturating_sub(visible);
    let lines: Vec<Line> = picks
        .iter()
        .enumerate()
        .skip(start)
        .map(|(i, rec)| {
            let passed = Span::styled(
                format!("  (passed {})", rec.passed.len()),
                Style::default().add_modifier(Modifier::DIM),
            );
            Line::from(vec![Span::raw(format!("{:>2}. {}", i + 1, rec.drafted)), passed])
        })
        .collect();
    if lines.is_empty() {
        let msg = match app.draft.status() {
            DraftStatus::Unstarted => "Nothing dealt yet",
            _ => "No picks yet",
        };
        let dim = Style::default().add_modifier(Modifier::DIM);
        f.render_widget(Paragraph::new(Line::from(Span::styled(msg, dim))), body);
    } else {
        f.render_widget(Paragraph::new(lines), body);
    }
}

fn draw_help(f: &mut Frame) {
    let area = centered_rect(70, 80, f.area());
    let block = Block::default().title("Help").borders(Borders::ALL);
    let lines = vec![
        Line::from(Span::styled("Table:", Style::default().add_modifier(Modifier::BOLD))),
        Line::from("- Space: deal / new draft"),
        Line::from("- Up / Down (j / k): move cursor in your pack"),
        Line::from("- Enter / P: draft the highlighted card"),
        Line::from("- ] / [: focus next / prev seat"),
        Line::from("- 1-9: focus seat"),
        Line::from(""),
        Line::from("Packs pass left, then right, then left again."),
        Line::from(""),
        Line::from(Span::styled("Menu:", Style::default().add_modifier(Modifier::BOLD))),
        Line::from("- M: open / close menu"),
        Line::from("- Up / Down: move selection"),
        Line::from("- + / -: adjust value"),
        Line::from("- Enter: apply"),
        Line::from("- Esc: cancel"),
        Line::from("- Q: quit (menu)"),
        Line::from(""),
        Line::from("Close help: ? or Esc"),
    ];
    let para = Paragraph::new(lines).wrap(Wrap { trim: true });
    f.render_widget(Clear, area);
    f.render_widget(block, area);
    f.render_widget(para, inner(area));
}

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{
    Block, BorderType, Borders, Cell, Clear, Padding, Paragraph, Row, Table, TableState, Wrap,
};

use crate::session::Session;

use super::super::display::{episode_count_label, truncate};
use super::{Focus, PendingConfirm, PendingEdit, PendingNotice};

const ACCENT: Color = Color::Rgb(110, 170, 255);
const MUTED: Color = Color::Rgb(185, 195, 210);

#[allow(clippy::too_many_arguments)]
pub(super) fn draw_tui(
    frame: &mut Frame,
    session: &Session,
    query: &str,
    matches: &[(String, String)],
    focus: Focus,
    results_state: &mut TableState,
    playlist_state: &mut TableState,
    status: &str,
    pending_confirm: Option<&PendingConfirm>,
    pending_notice: Option<&PendingNotice>,
    pending_edit: Option<&PendingEdit>,
) {
    let bg = Block::default().style(Style::default().bg(Color::Black));
    frame.render_widget(bg, frame.area());

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(8),
            Constraint::Length(3),
            Constraint::Length(3),
        ])
        .split(frame.area());

    let playlist = &session.playlist;
    let name = if playlist.name.is_empty() {
        "(untitled)"
    } else {
        playlist.name.as_str()
    };
    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            "AIOPL",
            Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
        ),
        Span::styled("   ", Style::default()),
        Span::styled(truncate(name, 40), Style::default().fg(Color::Rgb(230, 230, 230))),
        Span::styled("   ", Style::default()),
        Span::styled(
            episode_count_label(playlist.len()),
            Style::default().fg(MUTED),
        ),
        Span::styled("   ", Style::default()),
        Span::styled(
            format!("undo {}", session.undo_depth()),
            Style::default().fg(MUTED),
        ),
    ]))
    .alignment(Alignment::Center)
    .block(panel_block("Playlist Builder", false));
    frame.render_widget(header, chunks[0]);

    let body_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(chunks[1]);
    let search_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(5)])
        .split(body_chunks[0]);

    let input = Paragraph::new(format!("{query}▏"))
        .style(Style::default().fg(Color::Rgb(230, 230, 230)))
        .block(panel_block("Search", focus == Focus::Search));
    frame.render_widget(input, search_chunks[0]);

    let result_rows: Vec<Row> = matches
        .iter()
        .map(|(id, name)| Row::new(vec![Cell::from(name.clone()), Cell::from(id.clone())]))
        .collect();
    if matches.is_empty() {
        results_state.select(None);
    } else if results_state.selected().is_none_or(|idx| idx >= matches.len()) {
        results_state.select(Some(0));
    }
    let results = Table::new(
        result_rows,
        [Constraint::Percentage(70), Constraint::Percentage(30)],
    )
    .header(header_row(["Episode", "ID"]))
    .block(panel_block("Results", false))
    .row_highlight_style(highlight_style(focus == Focus::Search))
    .highlight_symbol("▸ ");
    frame.render_stateful_widget(results, search_chunks[1], results_state);

    let playlist_rows: Vec<Row> = playlist
        .episodes
        .iter()
        .enumerate()
        .map(|(idx, id)| {
            Row::new(vec![
                Cell::from((idx + 1).to_string()),
                Cell::from(session.catalog.label_of(id)),
                Cell::from(id.clone()),
            ])
        })
        .collect();
    let playlist_table = Table::new(
        playlist_rows,
        [
            Constraint::Length(5),
            Constraint::Percentage(65),
            Constraint::Percentage(30),
        ],
    )
    .header(header_row(["#", "Episode", "ID"]))
    .block(panel_block("Playlist", focus == Focus::Playlist))
    .row_highlight_style(highlight_style(focus == Focus::Playlist))
    .highlight_symbol("▸ ");
    frame.render_stateful_widget(playlist_table, body_chunks[1], playlist_state);

    let command_bar = Paragraph::new(controls_line(focus))
        .alignment(Alignment::Center)
        .block(panel_block("Controls", false));
    frame.render_widget(command_bar, chunks[2]);

    let status_widget = Paragraph::new(status.to_string())
        .style(status_style(status))
        .block(panel_block("Status", false));
    frame.render_widget(status_widget, chunks[3]);

    if let Some(edit) = pending_edit {
        let text = format!(
            "{}▏\n\n[Enter] Save   [Esc] Cancel",
            truncate(&edit.buffer, 64)
        );
        render_popup(frame, edit.field.label(), &text);
    } else if let Some(confirm) = pending_confirm {
        let (title, text) = match confirm {
            PendingConfirm::Duplicate { name, .. } => (
                "Duplicate Episode",
                format!(
                    "You have already added this episode to the playlist.\n\n{}\n\nAdd it again?\n\n[y / Enter] Add   [n / Esc] Cancel",
                    truncate(name, 56)
                ),
            ),
            PendingConfirm::Image { url } => (
                "Check Image",
                format!(
                    "This image may not display on the club properly.\n\n{}\n\nKeep it?\n\n[y / Enter] Keep   [n / Esc] Clear",
                    truncate(url, 56)
                ),
            ),
            PendingConfirm::Clear => (
                "Clear Playlist",
                "Clear list?\n\n[y / Enter] Clear   [n / Esc] Cancel".to_string(),
            ),
        };
        render_popup(frame, title, &text);
    } else if let Some(notice) = pending_notice {
        render_popup(frame, notice.title, &notice.message);
    }
}

fn render_popup(frame: &mut Frame, title: &'static str, text: &str) {
    let popup_area = popup_rect_for_text(frame.area(), text);
    render_popup_shadow(frame, popup_area);
    frame.render_widget(Clear, popup_area);
    let popup = Paragraph::new(text.to_string())
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(modal_block(title));
    frame.render_widget(popup, popup_area);
}

fn header_row<const N: usize>(labels: [&'static str; N]) -> Row<'static> {
    Row::new(labels.to_vec()).style(Style::default().fg(ACCENT).add_modifier(Modifier::BOLD))
}

fn highlight_style(focused: bool) -> Style {
    if focused {
        Style::default()
            .bg(ACCENT)
            .fg(Color::Black)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().bg(Color::Rgb(72, 82, 96))
    }
}

fn panel_block(title: &'static str, focused: bool) -> Block<'static> {
    let border = if focused {
        Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Rgb(125, 135, 150))
    };
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(border)
        .title(title)
}

fn modal_block(title: &'static str) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(
            Style::default()
                .fg(Color::Rgb(160, 190, 235))
                .add_modifier(Modifier::BOLD),
        )
        .title(title)
        .padding(Padding::new(2, 2, 1, 1))
}

fn pill_style(pane: Focus, current: Focus) -> Style {
    if pane == current {
        Style::default()
            .bg(ACCENT)
            .fg(Color::Black)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default()
            .bg(Color::Rgb(72, 82, 96))
            .fg(Color::Rgb(230, 235, 242))
    }
}

fn controls_line(current: Focus) -> Line<'static> {
    let hints = match current {
        Focus::Search => "   type search  ↑/↓ pick  Enter add  Tab playlist  ^Z undo  ^S share  Esc quit",
        Focus::Playlist => "   u/d move  Home/End ends  x remove  a/z sort  ^N name  ^E image  ^O open  F2-F5 copy",
    };
    Line::from(vec![
        Span::styled(
            format!(" {} ", Focus::Search.label()),
            pill_style(Focus::Search, current),
        ),
        Span::styled(" ", Style::default()),
        Span::styled(
            format!(" {} ", Focus::Playlist.label()),
            pill_style(Focus::Playlist, current),
        ),
        Span::styled(hints, Style::default().fg(MUTED)),
    ])
}

fn status_style(status: &str) -> Style {
    if status.starts_with("ERROR:") {
        Style::default()
            .fg(Color::Rgb(255, 145, 120))
            .add_modifier(Modifier::BOLD)
    } else if status.starts_with("INFO:") {
        Style::default().fg(Color::Rgb(205, 165, 255))
    } else {
        Style::default().fg(Color::Rgb(230, 235, 242))
    }
}

fn centered_fixed_rect(width: u16, height: u16, area: Rect) -> Rect {
    let clamped_width = width.min(area.width.max(1));
    let clamped_height = height.min(area.height.max(1));
    let x = area.x + area.width.saturating_sub(clamped_width) / 2;
    let y = area.y + area.height.saturating_sub(clamped_height) / 2;
    Rect::new(x, y, clamped_width, clamped_height)
}

fn render_popup_shadow(frame: &mut Frame, popup_area: Rect) {
    let area = frame.area();
    let shadow = Rect::new(
        (popup_area.x + 1).min(area.x + area.width.saturating_sub(1)),
        (popup_area.y + 1).min(area.y + area.height.saturating_sub(1)),
        popup_area.width.saturating_sub(1),
        popup_area.height.saturating_sub(1),
    );
    if shadow.width == 0 || shadow.height == 0 {
        return;
    }
    let shadow_block = Block::default().style(Style::default().bg(Color::Rgb(14, 16, 24)));
    frame.render_widget(shadow_block, shadow);
}

fn popup_rect_for_text(area: Rect, text: &str) -> Rect {
    let max_line_width = text
        .lines()
        .map(|line| line.chars().count() as u16)
        .max()
        .unwrap_or(0);
    let line_count = text.lines().count() as u16;

    let available_width = area.width.saturating_sub(2).max(1);
    let min_width = 48.min(available_width);
    let max_width = 84.min(available_width);
    let width = max_line_width.saturating_add(12).clamp(min_width, max_width);

    let available_height = area.height.saturating_sub(2).max(1);
    let min_height = 8.min(available_height);
    let max_height = 20.min(available_height);
    let height = line_count.saturating_add(6).clamp(min_height, max_height);

    centered_fixed_rect(width, height, area)
}

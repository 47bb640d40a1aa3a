//! Rendering for the demo.
//!
//! Responsibilities:
//! - Split the frame into header, tile grid and footer.
//! - Draw the tiles scrolled so the cursor row stays visible.
//! - Draw the cheat sheet popup from the engine's cheat sheet data.
//!
//! Does NOT handle:
//! - Any state change; rendering only reads the `App`.

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

use crate::app::App;
use crate::layout::TILE_HEIGHT;

const HEADER_HEIGHT: u16 = 1;
const FOOTER_HEIGHT: u16 = 2;

fn split(area: Rect) -> [Rect; 3] {
    Layout::vertical([
        Constraint::Length(HEADER_HEIGHT),
        Constraint::Min(0),
        Constraint::Length(FOOTER_HEIGHT),
    ])
    .areas(area)
}

/// Part of the terminal the tiles are laid out in.
pub fn grid_area(area: Rect) -> Rect {
    split(area)[1]
}

/// Rows scrolled out at the top so that `cursor_row` is visible.
pub fn scroll_rows(cursor_row: usize, visible_height: u16) -> usize {
    let visible_rows = usize::from((visible_height / TILE_HEIGHT).max(1));
    cursor_row.saturating_sub(visible_rows - 1)
}

pub fn render(f: &mut Frame, app: &App) {
    let [header, body, footer] = split(f.area());
    render_header(f, header, app);
    render_tiles(f, body, app);
    render_footer(f, footer, app);
    if app.state().show_cheat_sheet {
        render_cheat_sheet(f, app);
    }
}

fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let grid = app.grid();
    let position = grid
        .position()
        .map(|p| {
            format!(
                "item {}/{}  row {}/{}",
                p.index + 1,
                grid.len(),
                p.row + 1,
                grid.row_count()
            )
        })
        .unwrap_or_else(|| "no items".to_string());
    let register = app.state().register;
    let line = Line::from(vec![
        Span::styled("keygrid", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(format!("  {position}  register '{register}'")),
    ]);
    f.render_widget(Paragraph::new(line), area);
}

fn render_tiles(f: &mut Frame, area: Rect, app: &App) {
    let grid = app.grid();
    let results = app.results();
    let state = app.state();
    let preview = state
        .search_preview
        .as_deref()
        .filter(|p| !p.is_empty())
        .map(str::to_lowercase);
    let matches = results.match_indices();

    let offset = scroll_rows(grid.cursor_row(), area.height);
    let shift = u16::try_from(offset)
        .unwrap_or(u16::MAX)
        .saturating_mul(TILE_HEIGHT);

    for (index, rect) in app.tile_rects().into_iter().enumerate() {
        if rect.y < area.y.saturating_add(shift) {
            continue;
        }
        let rect = Rect {
            y: rect.y - shift,
            ..rect
        }
        .intersection(area);
        if rect.is_empty() {
            continue;
        }
        let Some(item) = results.pool().get(index) else {
            continue;
        };

        let focused = !grid.is_empty() && grid.cursor() == index;
        let previewed = preview
            .as_deref()
            .is_some_and(|p| item.to_lowercase().contains(p));
        let mut border = Style::default().fg(Color::DarkGray);
        if previewed || matches.contains(&index) {
            border = border.fg(Color::Cyan);
        }
        if state.selected.contains(&index) {
            border = border.fg(Color::Green);
        }
        if focused {
            border = border.fg(Color::Yellow).add_modifier(Modifier::BOLD);
        }
        let mut text = Style::default();
        if state.deleted.contains(&index) {
            text = text.fg(Color::DarkGray).add_modifier(Modifier::CROSSED_OUT);
        }

        let tile = Paragraph::new(Span::styled(item.as_str(), text)).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border),
        );
        f.render_widget(tile, rect);
    }
}

fn render_footer(f: &mut Frame, area: Rect, app: &App) {
    let status = match app.capture_buffer() {
        Some(buffer) => Line::from(vec![
            Span::styled("/", Style::default().fg(Color::Cyan)),
            Span::raw(buffer.to_string()),
        ]),
        None => Line::from(app.state().status.clone()),
    };
    let hint = Line::from(Span::styled(
        "? shortcuts  / search  q quit",
        Style::default().fg(Color::DarkGray),
    ));
    f.render_widget(Paragraph::new(vec![status, hint]), area);
}

fn render_cheat_sheet(f: &mut Frame, app: &App) {
    let area = centered_rect(60, 70, f.area());
    let mut lines = Vec::new();
    for group in app.cheat_sheet() {
        if !lines.is_empty() {
            lines.push(Line::raw(""));
        }
        lines.push(Line::from(Span::styled(
            group.label,
            Style::default().add_modifier(Modifier::BOLD),
        )));
        for entry in group.entries {
            lines.push(Line::from(vec![
                Span::styled(
                    format!("  {:<16}", entry.triggers.join(", ")),
                    Style::default().fg(Color::Yellow),
                ),
                Span::raw(entry.description),
            ]));
        }
    }

    f.render_widget(Clear, area);
    f.render_widget(
        Paragraph::new(lines).wrap(Wrap { trim: false }).block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Keyboard shortcuts "),
        ),
        area,
    );
}

/// Rectangle of `percent_x` by `percent_y` centered in `r`.
fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

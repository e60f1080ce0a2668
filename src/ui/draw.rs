use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use super::app::{App, SAMPLE_ITEMS};
use super::theme::StyleRules;

const APP_TITLE: &str = concat!("THEMEPREFS v", env!("CARGO_PKG_VERSION"));

pub fn draw(frame: &mut Frame, app: &App) {
    let style = &app.style;
    let area = frame.area();

    // Fill entire screen with background color first
    frame.render_widget(Block::default().style(style.base_style()), area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // header
            Constraint::Min(3),    // sample content
            Constraint::Length(1), // function bar
        ])
        .split(area);

    draw_header(frame, style, chunks[0]);
    draw_sample(frame, app, chunks[1]);
    draw_function_bar(frame, app, chunks[2]);
}

fn draw_header(frame: &mut Frame, style: &StyleRules, area: Rect) {
    let right_text = format!("theme: {}  accent: {} ", style.theme, style.primary);
    let left_width = APP_TITLE.width() + 1;
    let padding = (area.width as usize).saturating_sub(left_width + right_text.width());

    let line = Line::from(vec![
        Span::styled(format!(" {}", APP_TITLE), style.title_style()),
        Span::raw(" ".repeat(padding)),
        Span::styled(right_text, style.dim_style()),
    ]);
    frame.render_widget(Paragraph::new(line).style(style.surface_style()), area);
}

fn draw_sample(frame: &mut Frame, app: &App, area: Rect) {
    let style = &app.style;
    let block = Block::default()
        .title(" Sample ")
        .title_style(style.title_style())
        .borders(Borders::ALL)
        .border_style(style.border_style(true))
        .style(style.base_style());
    let inner = block.inner(area);
    frame.render_widget(block, area);
    if inner.height == 0 || inner.width < 2 {
        return;
    }

    let mut lines: Vec<Line> = SAMPLE_ITEMS
        .iter()
        .enumerate()
        .map(|(i, item)| {
            if i == app.selected_index {
                Line::from(Span::styled(format!(" > {:<12}", item), style.selected_style()))
            } else {
                Line::from(Span::styled(format!("   {:<12}", item), style.base_style()))
            }
        })
        .collect();
    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled(" [x] ", style.accent_style()),
        Span::styled("Sync on startup", style.base_style()),
    ]));
    lines.push(Line::from(vec![
        Span::styled(" [ ] ", style.dim_style()),
        Span::styled("Compact rows", style.base_style()),
    ]));
    if let Some(ref path) = app.settings_path {
        lines.push(Line::from(Span::styled(
            format!(" settings: {}", path.display()),
            style.dim_style(),
        )));
    }

    let text_height = (lines.len() as u16).min(inner.height);
    frame.render_widget(Paragraph::new(lines), Rect::new(inner.x, inner.y, inner.width, text_height));

    // Progress bar in the accent color
    if inner.height > text_height + 1 {
        let gauge_area = Rect::new(inner.x + 1, inner.y + text_height + 1, inner.width - 2, 1);
        let gauge = Gauge::default()
            .gauge_style(Style::default().fg(style.color(style.primary)).bg(style.color(style.surface)))
            .ratio(0.6)
            .label(Span::styled("60%", Style::default().add_modifier(Modifier::BOLD)));
        frame.render_widget(gauge, gauge_area);
    }
}

fn draw_function_bar(frame: &mut Frame, app: &App, area: Rect) {
    let style = &app.style;

    // Show message if present
    if let Some(ref msg) = app.message {
        let message = Paragraph::new(Span::styled(format!(" {} ", msg), style.accent_style()))
            .style(style.surface_style());
        frame.render_widget(message, area);
        return;
    }

    let items = [("p", "preferences "), ("↑↓", "move "), ("q", "quit ")];
    let mut spans = vec![Span::raw(" ")];
    for (key, label) in items {
        spans.push(Span::styled(key, style.accent_style()));
        spans.push(Span::styled(label, style.dim_style()));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)).style(style.surface_style()), area);
}

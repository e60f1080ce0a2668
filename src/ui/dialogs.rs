use crossterm::event::KeyCode;
use ratatui::{
    layout::{Alignment, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use super::preview::{ColorPreview, Swatch};
use super::theme::{AccentColor, Preferences, StyleRules, Theme};

// ═══════════════════════════════════════════════════════════════════════════════
// Dialog result
// ═══════════════════════════════════════════════════════════════════════════════

/// What the user chose, returned by value when the dialog is accepted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialogDraft {
    /// Display text of the selected theme ("Dark" / "Light")
    pub theme_text: String,
    /// Set only if the user actually picked a new accent
    pub new_accent: Option<AccentColor>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogOutcome {
    Accepted(DialogDraft),
    Rejected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogField {
    Theme,
    Accent,
    Buttons,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogButton {
    Apply,
    Cancel,
}

// ═══════════════════════════════════════════════════════════════════════════════
// Accent sub-dialog (hex entry)
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone)]
pub struct AccentPicker {
    pub input: String,
    pub cursor_pos: usize,
    pub error: Option<String>,
}

impl AccentPicker {
    pub fn new(initial: AccentColor) -> Self {
        let input = initial.to_hex();
        let cursor_pos = input.chars().count();
        Self {
            input,
            cursor_pos,
            error: None,
        }
    }

    fn handle_edit(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char(c) => {
                let mut chars: Vec<char> = self.input.chars().collect();
                chars.insert(self.cursor_pos, c);
                self.input = chars.into_iter().collect();
                self.cursor_pos += 1;
                self.error = None;
            }
            KeyCode::Backspace => {
                if self.cursor_pos > 0 {
                    let mut chars: Vec<char> = self.input.chars().collect();
                    chars.remove(self.cursor_pos - 1);
                    self.input = chars.into_iter().collect();
                    self.cursor_pos -= 1;
                    self.error = None;
                }
            }
            KeyCode::Delete => {
                let mut chars: Vec<char> = self.input.chars().collect();
                if self.cursor_pos < chars.len() {
                    chars.remove(self.cursor_pos);
                    self.input = chars.into_iter().collect();
                    self.error = None;
                }
            }
            KeyCode::Left => {
                self.cursor_pos = self.cursor_pos.saturating_sub(1);
            }
            KeyCode::Right => {
                let len = self.input.chars().count();
                if self.cursor_pos < len {
                    self.cursor_pos += 1;
                }
            }
            KeyCode::Home => {
                self.cursor_pos = 0;
            }
            KeyCode::End => {
                self.cursor_pos = self.input.chars().count();
            }
            _ => {}
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Preferences dialog
// ═══════════════════════════════════════════════════════════════════════════════

/// Modal theme/accent form working on a draft.
///
/// Built from a read-only snapshot of the committed preferences; nothing
/// here can reach the controller or the store.
#[derive(Debug, Clone)]
pub struct PreferenceDialog {
    snapshot: Preferences,
    icon: Option<String>,
    theme_index: usize,
    new_accent: Option<AccentColor>,
    preview: ColorPreview,
    picker: Option<AccentPicker>,
    pub selected_field: DialogField,
    pub selected_button: DialogButton,
    outcome: Option<DialogOutcome>,
}

impl PreferenceDialog {
    pub fn new(snapshot: Preferences, icon: Option<String>) -> Self {
        let mut dialog = Self {
            snapshot,
            icon,
            theme_index: 0,
            new_accent: None,
            preview: ColorPreview::new(snapshot.accent),
            picker: None,
            selected_field: DialogField::Theme,
            // Apply is the default button
            selected_button: DialogButton::Apply,
            outcome: None,
        };
        dialog.set_theme_text(snapshot.theme.title());
        dialog
    }

    /// Theme choices in display order
    pub fn theme_choices() -> [&'static str; 2] {
        Theme::ALL.map(|t| t.title())
    }

    pub fn theme_text(&self) -> &'static str {
        Self::theme_choices()[self.theme_index]
    }

    /// Selects the choice matching `text` (case-insensitive); unknown text is ignored
    pub fn set_theme_text(&mut self, text: &str) -> bool {
        match Self::theme_choices()
            .iter()
            .position(|choice| choice.eq_ignore_ascii_case(text.trim()))
        {
            Some(idx) => {
                self.theme_index = idx;
                true
            }
            None => false,
        }
    }

    pub fn next_theme(&mut self) {
        self.theme_index = (self.theme_index + 1) % Theme::ALL.len();
    }

    pub fn prev_theme(&mut self) {
        self.theme_index = (self.theme_index + Theme::ALL.len() - 1) % Theme::ALL.len();
    }

    pub fn new_accent(&self) -> Option<AccentColor> {
        self.new_accent
    }

    pub fn preview(&self) -> &ColorPreview {
        &self.preview
    }

    pub fn picker(&self) -> Option<&AccentPicker> {
        self.picker.as_ref()
    }

    pub fn is_closed(&self) -> bool {
        self.outcome.is_some()
    }

    pub fn outcome(&self) -> Option<&DialogOutcome> {
        self.outcome.as_ref()
    }

    pub fn update_preview(&mut self, color_a: AccentColor, color_b: Option<AccentColor>) {
        self.preview.update(color_a, color_b);
    }

    /// Opens the accent sub-dialog, seeded with the committed accent
    pub fn change_accent(&mut self) {
        if self.is_closed() {
            return;
        }
        self.picker = Some(AccentPicker::new(self.snapshot.accent));
    }

    /// Records `color` as the pending accent and previews committed -> new
    pub fn choose_accent(&mut self, color: AccentColor) {
        self.new_accent = Some(color);
        self.update_preview(self.snapshot.accent, Some(color));
        self.picker = None;
    }

    /// Confirms the sub-dialog; invalid input keeps it open with an error
    pub fn confirm_accent(&mut self) {
        let parsed = match self.picker {
            Some(ref picker) => picker.input.parse::<AccentColor>(),
            None => return,
        };
        match parsed {
            Ok(color) => self.choose_accent(color),
            Err(e) => {
                if let Some(ref mut picker) = self.picker {
                    picker.error = Some(e.to_string());
                }
            }
        }
    }

    /// Closes the sub-dialog leaving pending accent and preview untouched
    pub fn cancel_accent(&mut self) {
        self.picker = None;
    }

    pub fn accept(&mut self) {
        if self.outcome.is_none() {
            self.picker = None;
            self.outcome = Some(DialogOutcome::Accepted(DialogDraft {
                theme_text: self.theme_text().to_string(),
                new_accent: self.new_accent,
            }));
        }
    }

    pub fn reject(&mut self) {
        if self.outcome.is_none() {
            self.picker = None;
            self.outcome = Some(DialogOutcome::Rejected);
        }
    }

    /// Feeds one key press; returns the outcome once the dialog closes
    pub fn handle_key(&mut self, code: KeyCode) -> Option<DialogOutcome> {
        if self.is_closed() {
            return self.outcome.clone();
        }

        if self.picker.is_some() {
            match code {
                KeyCode::Esc => self.cancel_accent(),
                KeyCode::Enter => self.confirm_accent(),
                _ => {
                    if let Some(ref mut picker) = self.picker {
                        picker.handle_edit(code);
                    }
                }
            }
            return None;
        }

        match code {
            KeyCode::Esc => self.reject(),
            KeyCode::Enter => match self.selected_field {
                DialogField::Accent => self.change_accent(),
                DialogField::Buttons if self.selected_button == DialogButton::Cancel => self.reject(),
                _ => self.accept(),
            },
            KeyCode::Up => {
                self.selected_field = match self.selected_field {
                    DialogField::Theme | DialogField::Accent => DialogField::Theme,
                    DialogField::Buttons => DialogField::Accent,
                };
            }
            KeyCode::Down | KeyCode::Tab => {
                self.selected_field = match self.selected_field {
                    DialogField::Theme => DialogField::Accent,
                    DialogField::Accent | DialogField::Buttons => DialogField::Buttons,
                };
            }
            KeyCode::Left => match self.selected_field {
                DialogField::Theme => self.prev_theme(),
                DialogField::Buttons => self.selected_button = DialogButton::Apply,
                DialogField::Accent => {}
            },
            KeyCode::Right | KeyCode::Char(' ') => match self.selected_field {
                DialogField::Theme => self.next_theme(),
                DialogField::Buttons => self.selected_button = DialogButton::Cancel,
                DialogField::Accent => self.change_accent(),
            },
            _ => {}
        }
        self.outcome.clone()
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Drawing
// ═══════════════════════════════════════════════════════════════════════════════

// 다이얼로그 크기 상수
const DIALOG_WIDTH: u16 = 46;
const DIALOG_HEIGHT: u16 = 12;
const PICKER_WIDTH: u16 = 40;
const PICKER_HEIGHT: u16 = 7;
const SWATCH_WIDTH: u16 = 12;

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width, height)
}

/// Draws the dialog (and its accent sub-dialog if open) centered in `area`
pub fn draw_preference_dialog(frame: &mut Frame, dialog: &PreferenceDialog, area: Rect, style: &StyleRules) {
    let dialog_area = centered(area, DIALOG_WIDTH, DIALOG_HEIGHT);
    frame.render_widget(Clear, dialog_area);

    let title = match dialog.icon {
        Some(ref icon) => format!(" {} Preferences ", icon),
        None => " Preferences ".to_string(),
    };
    let block = Block::default()
        .title(title)
        .title_style(style.title_style())
        .borders(Borders::ALL)
        .border_style(style.border_style(true))
        .style(style.surface_style());

    let inner = block.inner(dialog_area);
    frame.render_widget(block, dialog_area);
    // 라벨 폭(11) + 최소 1칸이 안 되면 틀만 그림
    if inner.width < 12 || inner.height < 8 {
        return;
    }

    let prompt = |field: DialogField| if dialog.selected_field == field { "> " } else { "  " };
    let value_style = |field: DialogField| {
        if dialog.selected_field == field {
            style.selected_style()
        } else {
            style.surface_style().add_modifier(Modifier::BOLD)
        }
    };

    // Theme row
    let theme_line = Line::from(vec![
        Span::styled(prompt(DialogField::Theme), style.accent_style()),
        Span::styled("Theme:  ", style.dim_style()),
        Span::styled(format!("< {} >", dialog.theme_text()), value_style(DialogField::Theme)),
    ]);
    frame.render_widget(Paragraph::new(theme_line), Rect::new(inner.x + 1, inner.y + 1, inner.width - 2, 1));

    // Accent row: label, swatch, change button
    let accent_y = inner.y + 3;
    let accent_line = Line::from(vec![
        Span::styled(prompt(DialogField::Accent), style.accent_style()),
        Span::styled("Accent: ", style.dim_style()),
    ]);
    frame.render_widget(Paragraph::new(accent_line), Rect::new(inner.x + 1, accent_y, 10, 1));

    let swatch_x = inner.x + 11;
    let swatch_width = SWATCH_WIDTH.min(inner.width.saturating_sub(12));
    frame.render_widget(Swatch::new(dialog.preview(), style), Rect::new(swatch_x, accent_y, swatch_width, 2));

    let change_x = swatch_x + swatch_width + 1;
    if change_x < inner.x + inner.width {
        frame.render_widget(
            Paragraph::new(Span::styled(" Change… ", value_style(DialogField::Accent))),
            Rect::new(change_x, accent_y, inner.x + inner.width - change_x, 1),
        );
    }

    // Tooltip under the swatch
    let tooltip = dialog.preview().tooltip();
    let tooltip_width = (inner.width.saturating_sub(12)) as usize;
    let tooltip_text = if tooltip.width() > tooltip_width {
        tooltip.chars().take(tooltip_width.saturating_sub(1)).collect::<String>() + "…"
    } else {
        tooltip.to_string()
    };
    frame.render_widget(
        Paragraph::new(Span::styled(tooltip_text, style.dim_style())),
        Rect::new(swatch_x, accent_y + 2, inner.width.saturating_sub(12), 1),
    );

    // 버튼
    let button_style = |button: DialogButton| {
        if dialog.selected_field == DialogField::Buttons && dialog.selected_button == button {
            style.selected_style()
        } else {
            style.surface_style()
        }
    };
    let buttons = Line::from(vec![
        Span::styled(" Apply ", button_style(DialogButton::Apply)),
        Span::raw("    "),
        Span::styled(" Cancel ", button_style(DialogButton::Cancel)),
    ]);
    frame.render_widget(
        Paragraph::new(buttons).alignment(Alignment::Center),
        Rect::new(inner.x + 1, inner.y + inner.height - 3, inner.width - 2, 1),
    );

    // Help line
    let help = Line::from(vec![
        Span::styled("↑↓", style.accent_style()),
        Span::styled(" Row  ", style.dim_style()),
        Span::styled("←→", style.accent_style()),
        Span::styled(" Change  ", style.dim_style()),
        Span::styled("Enter", style.accent_style()),
        Span::styled(" Apply  ", style.dim_style()),
        Span::styled("Esc", style.accent_style()),
        Span::styled(" Cancel", style.dim_style()),
    ]);
    frame.render_widget(
        Paragraph::new(help).alignment(Alignment::Center),
        Rect::new(inner.x, inner.y + inner.height - 1, inner.width, 1),
    );

    if let Some(picker) = dialog.picker() {
        draw_accent_picker(frame, picker, area, style);
    }
}

fn draw_accent_picker(frame: &mut Frame, picker: &AccentPicker, area: Rect, style: &StyleRules) {
    let picker_area = centered(area, PICKER_WIDTH, PICKER_HEIGHT);
    frame.render_widget(Clear, picker_area);

    let block = Block::default()
        .title(" Choose Accent Color ")
        .title_style(style.title_style())
        .borders(Borders::ALL)
        .border_style(style.border_style(true))
        .style(style.surface_style());
    let inner = block.inner(picker_area);
    frame.render_widget(block, picker_area);
    if inner.width < 4 || inner.height < 3 {
        return;
    }

    // 커서 위치에 따라 텍스트 분할
    let chars: Vec<char> = picker.input.chars().collect();
    let cursor_pos = picker.cursor_pos.min(chars.len());
    let before_cursor: String = chars[..cursor_pos].iter().collect();
    let cursor_char = chars
        .get(cursor_pos)
        .map(|c| c.to_string())
        .unwrap_or_else(|| " ".to_string());
    let after_cursor: String = chars.iter().skip(cursor_pos + 1).collect();

    let input_line = Line::from(vec![
        Span::styled("> ", style.accent_style()),
        Span::styled(before_cursor, style.surface_style()),
        Span::styled(cursor_char, style.selected_style().add_modifier(Modifier::SLOW_BLINK)),
        Span::styled(after_cursor, style.surface_style()),
    ]);
    frame.render_widget(Paragraph::new(input_line), Rect::new(inner.x + 1, inner.y + 1, inner.width - 2, 1));

    let message = match picker.error {
        Some(ref error) => Span::styled(error.clone(), style.error_style()),
        None => Span::styled("#RRGGBB  Enter OK  Esc Cancel", style.dim_style()),
    };
    frame.render_widget(
        Paragraph::new(message).alignment(Alignment::Center),
        Rect::new(inner.x, inner.y + inner.height - 1, inner.width, 1),
    );
}

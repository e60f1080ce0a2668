use ratatui::{buffer::Buffer, layout::Rect, style::Style, widgets::Widget};

use super::theme::{HexColor, StyleRules};

/// Accent swatch shown in the preferences dialog.
///
/// Solid when only one color is set, otherwise split: left half is the
/// old color, right half the new one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorPreview {
    left: HexColor,
    right: Option<HexColor>,
    tooltip: String,
}

impl ColorPreview {
    pub fn new(color: HexColor) -> Self {
        let mut preview = Self {
            left: color,
            right: None,
            tooltip: String::new(),
        };
        preview.update(color, None);
        preview
    }

    /// Replaces the swatch colors and tooltip ("a" or "a -> b")
    pub fn update(&mut self, color_a: HexColor, color_b: Option<HexColor>) {
        self.left = color_a;
        self.right = color_b;
        self.tooltip = match color_b {
            Some(b) => format!("{} -> {}", color_a, b),
            None => color_a.to_string(),
        };
    }

    pub fn tooltip(&self) -> &str {
        &self.tooltip
    }

    pub fn is_split(&self) -> bool {
        self.right.is_some()
    }

    pub fn left(&self) -> HexColor {
        self.left
    }

    pub fn right(&self) -> HexColor {
        self.right.unwrap_or(self.left)
    }
}

/// Renders a `ColorPreview` as two filled halves
pub struct Swatch<'a> {
    preview: &'a ColorPreview,
    style: &'a StyleRules,
}

impl<'a> Swatch<'a> {
    pub fn new(preview: &'a ColorPreview, style: &'a StyleRules) -> Self {
        Self { preview, style }
    }
}

impl Widget for Swatch<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let left_width = area.width / 2;
        let left_area = Rect::new(area.x, area.y, left_width, area.height);
        let right_area = Rect::new(area.x + left_width, area.y, area.width - left_width, area.height);

        buf.set_style(left_area, Style::default().bg(self.style.color(self.preview.left())));
        buf.set_style(right_area, Style::default().bg(self.style.color(self.preview.right())));
    }
}

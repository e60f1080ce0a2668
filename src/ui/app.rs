use std::path::PathBuf;

use super::theme::{Palette, StyleRules};
use super::theme_loader::parse_stylesheet;
use crate::error::PrefsError;
use crate::services::theme_controller::StyleTarget;

/// Sample rows shown in the host screen so the style has something to paint
pub const SAMPLE_ITEMS: [&str; 4] = ["Inbox", "Drafts", "Archive", "Trash"];

/// The running application: holds the installed stylesheet and palette
#[derive(Debug)]
pub struct App {
    stylesheet: String,
    palette: Palette,
    pub style: StyleRules,
    pub selected_index: usize,
    pub message: Option<String>,
    pub settings_path: Option<PathBuf>,
}

impl App {
    pub fn new(settings_path: Option<PathBuf>) -> Self {
        Self {
            stylesheet: String::new(),
            palette: Palette::default(),
            style: StyleRules::default(),
            selected_index: 0,
            message: None,
            settings_path,
        }
    }

    pub fn move_cursor(&mut self, delta: i32) {
        let last = SAMPLE_ITEMS.len() as i32 - 1;
        self.selected_index = (self.selected_index as i32 + delta).clamp(0, last) as usize;
    }
}

impl StyleTarget for App {
    fn set_style_sheet(&mut self, sheet: &str) -> Result<(), PrefsError> {
        self.style = parse_stylesheet(sheet, &self.palette)?;
        self.stylesheet = sheet.to_string();
        Ok(())
    }

    fn set_palette(&mut self, palette: Palette) -> Result<(), PrefsError> {
        self.palette = palette;
        // Colors the stylesheet leaves out come from the palette
        if !self.stylesheet.is_empty() {
            self.style = parse_stylesheet(&self.stylesheet, &self.palette)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::theme_controller::{CustomColors, Styler};
    use crate::ui::theme::Theme;
    use crate::ui::theme_loader::BuiltinStyler;

    #[test]
    fn test_install_stylesheet_and_palette() {
        let mut app = App::new(None);
        let custom = CustomColors {
            primary: Some("#112233".parse().unwrap()),
        };
        let sheet = BuiltinStyler.load_stylesheet("light", &custom).unwrap();
        app.set_style_sheet(&sheet).unwrap();
        app.set_palette(Palette::light()).unwrap();

        assert_eq!(app.stylesheet, sheet);
        assert_eq!(app.palette, Palette::light());
        assert_eq!(app.style.theme, Theme::Light.as_str());
        assert_eq!(app.style.primary.to_hex(), "#112233");
        assert_eq!(app.style.background, Palette::light().background);
    }

    #[test]
    fn test_palette_fills_missing_stylesheet_colors() {
        let mut app = App::new(None);
        app.set_style_sheet(r#"{"theme": "light"}"#).unwrap();
        app.set_palette(Palette::light()).unwrap();
        assert_eq!(app.style.border, Palette::light().border);
    }

    #[test]
    fn test_bad_stylesheet_is_rejected_and_previous_kept() {
        let mut app = App::new(None);
        let before = app.style.clone();
        assert!(app.set_style_sheet("not json").is_err());
        assert_eq!(app.style, before);
        assert!(app.stylesheet.is_empty());
    }

    #[test]
    fn test_move_cursor_clamps() {
        let mut app = App::new(None);
        app.move_cursor(-1);
        assert_eq!(app.selected_index, 0);
        app.move_cursor(10);
        assert_eq!(app.selected_index, SAMPLE_ITEMS.len() - 1);
    }
}

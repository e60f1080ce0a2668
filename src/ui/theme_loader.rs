use serde::{Deserialize, Serialize};
use tracing::debug;

use super::theme::{supports_true_color, HexColor, Palette, StyleRules, Theme};
use crate::error::PrefsError;
use crate::services::theme_controller::{CustomColors, Styler};

// ═══════════════════════════════════════════════════════════════════════════════
// JSON 구조체 정의 (색상은 "#rrggbb" 문자열)
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Serialize, Deserialize)]
pub struct StylesheetJson {
    pub theme: String,
    #[serde(default)]
    pub colors: ColorsJson,
}

/// Every entry is optional; missing ones come from the installed palette
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ColorsJson {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub surface: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub foreground: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub muted: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border: Option<String>,
}

fn color_or(value: &Option<String>, fallback: HexColor) -> Result<HexColor, PrefsError> {
    match value {
        Some(s) => s.parse(),
        None => Ok(fallback),
    }
}

/// Parses stylesheet text into the rules the host draws with
pub fn parse_stylesheet(text: &str, palette: &Palette) -> Result<StyleRules, PrefsError> {
    let json: StylesheetJson = serde_json::from_str(text)?;
    let theme: Theme = json.theme.parse()?;
    let c = &json.colors;

    Ok(StyleRules {
        theme: theme.as_str().to_string(),
        primary: color_or(&c.primary, theme.default_accent())?,
        background: color_or(&c.background, palette.background)?,
        surface: color_or(&c.surface, palette.surface)?,
        foreground: color_or(&c.foreground, palette.foreground)?,
        muted: color_or(&c.muted, palette.muted)?,
        border: color_or(&c.border, palette.border)?,
        truecolor: supports_true_color(),
    })
}

// ═══════════════════════════════════════════════════════════════════════════════
// Built-in styler
// ═══════════════════════════════════════════════════════════════════════════════

/// Styler with fixed base palettes for "dark" and "light"
#[derive(Debug, Default, Clone, Copy)]
pub struct BuiltinStyler;

impl BuiltinStyler {
    fn theme(theme_name: &str) -> Result<Theme, PrefsError> {
        // Exact names only, like a stylesheet generator keyed by file name
        match theme_name {
            "dark" => Ok(Theme::Dark),
            "light" => Ok(Theme::Light),
            _ => Err(PrefsError::UnknownTheme(theme_name.to_string())),
        }
    }
}

impl Styler for BuiltinStyler {
    fn load_stylesheet(&self, theme_name: &str, custom_colors: &CustomColors) -> Result<String, PrefsError> {
        let theme = Self::theme(theme_name)?;
        let palette = Palette::for_theme(theme);
        let primary = custom_colors.primary.unwrap_or_else(|| theme.default_accent());

        let sheet = StylesheetJson {
            theme: theme.as_str().to_string(),
            colors: ColorsJson {
                primary: Some(primary.to_hex()),
                background: Some(palette.background.to_hex()),
                surface: Some(palette.surface.to_hex()),
                foreground: Some(palette.foreground.to_hex()),
                muted: Some(palette.muted.to_hex()),
                border: Some(palette.border.to_hex()),
            },
        };
        debug!("Generated stylesheet for {} with primary {}", theme, primary);
        Ok(serde_json::to_string_pretty(&sheet)?)
    }

    fn load_palette(&self, theme_name: &str) -> Result<Palette, PrefsError> {
        Self::theme(theme_name).map(Palette::for_theme)
    }
}

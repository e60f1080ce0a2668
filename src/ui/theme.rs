use std::fmt;
use std::str::FromStr;

use ratatui::style::{Color, Modifier, Style};
use supports_color::Stream;

use crate::error::PrefsError;

/// Theme used when nothing is stored
pub const DEFAULT_THEME: Theme = Theme::Dark;

/// Built-in accent of the dark theme (#8ab4f7)
pub const DARK_ACCENT: HexColor = HexColor::new(0x8a, 0xb4, 0xf7);

/// Built-in accent of the light theme (#1a73e8)
pub const LIGHT_ACCENT: HexColor = HexColor::new(0x1a, 0x73, 0xe8);

// ═══════════════════════════════════════════════════════════════════════════════
// Theme
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Theme {
    Dark,
    Light,
}

impl Theme {
    pub const ALL: [Theme; 2] = [Theme::Dark, Theme::Light];

    /// Name used in the settings file and by the styler ("dark", "light")
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Dark => "dark",
            Theme::Light => "light",
        }
    }

    /// Name shown in the preferences dialog ("Dark", "Light")
    pub fn title(&self) -> &'static str {
        match self {
            Theme::Dark => "Dark",
            Theme::Light => "Light",
        }
    }

    pub fn default_accent(&self) -> HexColor {
        match self {
            Theme::Dark => DARK_ACCENT,
            Theme::Light => LIGHT_ACCENT,
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        DEFAULT_THEME
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Case-insensitive, so dialog text like "Light" maps onto `Theme::Light`
impl FromStr for Theme {
    type Err = PrefsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "dark" => Ok(Theme::Dark),
            "light" => Ok(Theme::Light),
            _ => Err(PrefsError::UnknownTheme(s.to_string())),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Colors
// ═══════════════════════════════════════════════════════════════════════════════

/// 24-bit color, written as `#rrggbb`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HexColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

/// The single highlight color layered onto a theme
pub type AccentColor = HexColor;

impl HexColor {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Canonical lower-case form, e.g. `#8ab4f7`
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Terminal color; falls back to the xterm-256 color cube without true color
    pub fn to_color(&self, truecolor: bool) -> Color {
        if truecolor {
            Color::Rgb(self.r, self.g, self.b)
        } else {
            Color::Indexed(16 + 36 * cube_level(self.r) + 6 * cube_level(self.g) + cube_level(self.b))
        }
    }

    /// Black or white, whichever reads better on top of this color
    pub fn contrast_text(&self) -> HexColor {
        let luma = 299 * self.r as u32 + 587 * self.g as u32 + 114 * self.b as u32;
        if luma > 128_000 {
            HexColor::new(0, 0, 0)
        } else {
            HexColor::new(0xff, 0xff, 0xff)
        }
    }
}

fn cube_level(v: u8) -> u8 {
    match v {
        0..=47 => 0,
        48..=114 => 1,
        _ => (v - 35) / 40,
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for HexColor {
    type Err = PrefsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || PrefsError::InvalidColor(s.to_string());
        let digits = s.trim().strip_prefix('#').ok_or_else(invalid)?;
        if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).map_err(|_| invalid());
        Ok(HexColor::new(channel(0)?, channel(2)?, channel(4)?))
    }
}

/// Resolves the accent read from storage against the theme's default.
///
/// Absent, blank, or unparsable values all resolve to `theme.default_accent()`,
/// so the in-memory accent is never empty.
pub fn resolve_accent(theme: Theme, stored: Option<&str>) -> AccentColor {
    stored
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(|| theme.default_accent())
}

/// The pair persisted under "theme" and "accent"
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Preferences {
    pub theme: Theme,
    pub accent: AccentColor,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            theme: DEFAULT_THEME,
            accent: DEFAULT_THEME.default_accent(),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Base palette (accent independent)
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub background: HexColor,   // 기본 배경
    pub surface: HexColor,      // 다이얼로그, 패널 배경
    pub foreground: HexColor,   // 기본 텍스트
    pub muted: HexColor,        // 보조 텍스트
    pub border: HexColor,       // 테두리
}

impl Palette {
    pub fn dark() -> Self {
        Self {
            background: HexColor::new(0x20, 0x21, 0x24),
            surface: HexColor::new(0x29, 0x2a, 0x2d),
            foreground: HexColor::new(0xe4, 0xe7, 0xeb),
            muted: HexColor::new(0x9a, 0xa0, 0xa6),
            border: HexColor::new(0x3f, 0x40, 0x42),
        }
    }

    pub fn light() -> Self {
        Self {
            background: HexColor::new(0xf8, 0xf9, 0xfa),
            surface: HexColor::new(0xff, 0xff, 0xff),
            foreground: HexColor::new(0x4d, 0x51, 0x57),
            muted: HexColor::new(0x80, 0x86, 0x8b),
            border: HexColor::new(0xda, 0xdc, 0xe0),
        }
    }

    pub fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Dark => Self::dark(),
            Theme::Light => Self::light(),
        }
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::for_theme(DEFAULT_THEME)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Installed style (parsed stylesheet + terminal capabilities)
// ═══════════════════════════════════════════════════════════════════════════════

/// Colors the host draws with, taken from the installed stylesheet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleRules {
    pub theme: String,
    pub primary: HexColor,
    pub background: HexColor,
    pub surface: HexColor,
    pub foreground: HexColor,
    pub muted: HexColor,
    pub border: HexColor,
    pub truecolor: bool,
}

impl StyleRules {
    /// Rules equivalent to an empty stylesheet on top of `palette`
    pub fn from_palette(theme: Theme, palette: &Palette, primary: HexColor) -> Self {
        Self {
            theme: theme.as_str().to_string(),
            primary,
            background: palette.background,
            surface: palette.surface,
            foreground: palette.foreground,
            muted: palette.muted,
            border: palette.border,
            truecolor: supports_true_color(),
        }
    }

    pub fn color(&self, c: HexColor) -> Color {
        c.to_color(self.truecolor)
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // 스타일 헬퍼 메서드
    // ═══════════════════════════════════════════════════════════════════════════

    pub fn base_style(&self) -> Style {
        Style::default()
            .fg(self.color(self.foreground))
            .bg(self.color(self.background))
    }

    pub fn surface_style(&self) -> Style {
        Style::default()
            .fg(self.color(self.foreground))
            .bg(self.color(self.surface))
    }

    pub fn dim_style(&self) -> Style {
        Style::default().fg(self.color(self.muted))
    }

    pub fn accent_style(&self) -> Style {
        Style::default()
            .fg(self.color(self.primary))
            .add_modifier(Modifier::BOLD)
    }

    pub fn title_style(&self) -> Style {
        Style::default()
            .fg(self.color(self.primary))
            .add_modifier(Modifier::BOLD)
    }

    pub fn border_style(&self, active: bool) -> Style {
        if active {
            Style::default().fg(self.color(self.primary))
        } else {
            Style::default().fg(self.color(self.border))
        }
    }

    pub fn selected_style(&self) -> Style {
        Style::default()
            .fg(self.color(self.primary.contrast_text()))
            .bg(self.color(self.primary))
    }

    pub fn error_style(&self) -> Style {
        Style::default()
            .fg(self.color(HexColor::new(0xf2, 0x8b, 0x82)))
            .add_modifier(Modifier::BOLD)
    }
}

impl Default for StyleRules {
    fn default() -> Self {
        let prefs = Preferences::default();
        Self::from_palette(prefs.theme, &Palette::for_theme(prefs.theme), prefs.accent)
    }
}

/// Check if terminal supports true color (24-bit RGB)
pub fn supports_true_color() -> bool {
    if let Some(support) = supports_color::on(Stream::Stdout) {
        support.has_16m
    } else {
        false
    }
}

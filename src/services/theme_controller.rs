use tracing::{debug, info};

use crate::config::{SettingsStore, ACCENT_KEY, THEME_KEY};
use crate::error::PrefsError;
use crate::ui::dialogs::{DialogOutcome, PreferenceDialog};
use crate::ui::modal::DialogRunner;
use crate::ui::theme::{resolve_accent, AccentColor, Palette, Preferences, Theme, DEFAULT_THEME};

/// Color overrides passed to the styler
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CustomColors {
    pub primary: Option<AccentColor>,
}

/// Produces a stylesheet and base palette for a theme name
pub trait Styler {
    fn load_stylesheet(&self, theme_name: &str, custom_colors: &CustomColors) -> Result<String, PrefsError>;

    fn load_palette(&self, theme_name: &str) -> Result<Palette, PrefsError>;
}

/// The running application that receives the generated style
pub trait StyleTarget {
    fn set_style_sheet(&mut self, sheet: &str) -> Result<(), PrefsError>;

    fn set_palette(&mut self, palette: Palette) -> Result<(), PrefsError>;
}

/// Owns the committed theme/accent and keeps the store in step with them.
///
/// `set_theme` and `set_accent` are the only writers of persisted state; each
/// flushes the store before updating memory.
pub struct ThemeController<S: SettingsStore> {
    store: S,
    styler: Box<dyn Styler>,
    icon: Option<String>,
    current_theme: Theme,
    current_accent: AccentColor,
}

impl<S: SettingsStore> ThemeController<S> {
    /// Creates the controller and loads the stored preferences.
    /// Styling is not applied; call `apply_theme` once the target exists.
    pub fn new(store: S, styler: Box<dyn Styler>, icon: Option<String>) -> Result<Self, PrefsError> {
        let defaults = Preferences::default();
        let mut controller = Self {
            store,
            styler,
            icon,
            current_theme: defaults.theme,
            current_accent: defaults.accent,
        };
        controller.load()?;
        Ok(controller)
    }

    /// Creates the controller and overwrites the store with the built-in
    /// defaults, without reading what was stored before.
    pub fn reset(store: S, styler: Box<dyn Styler>, icon: Option<String>) -> Result<Self, PrefsError> {
        let defaults = Preferences::default();
        let mut controller = Self {
            store,
            styler,
            icon,
            current_theme: defaults.theme,
            current_accent: defaults.accent,
        };
        controller.set_theme(defaults.theme)?;
        controller.set_accent(defaults.accent)?;
        info!("Preferences reset to theme={} accent={}", defaults.theme, defaults.accent);
        Ok(controller)
    }

    /// Reads theme and accent from the store, defaulting what is missing.
    ///
    /// Resolved values that differ from the stored text are written back, so
    /// the store never keeps an empty accent.
    pub fn load(&mut self) -> Result<(), PrefsError> {
        let stored_theme = self.store.get(THEME_KEY, DEFAULT_THEME.as_str());
        let theme: Theme = stored_theme.parse()?;

        let stored_accent = self.store.get(ACCENT_KEY, &theme.default_accent().to_hex());
        let accent = resolve_accent(theme, Some(stored_accent.as_str()));

        self.current_theme = theme;
        self.current_accent = accent;

        if stored_theme != theme.as_str() {
            self.set_theme(theme)?;
        }
        if stored_accent != accent.to_hex() {
            debug!("Stored accent {:?} resolved to {}", stored_accent, accent);
            self.set_accent(accent)?;
        }

        info!("Loaded preferences: theme={} accent={}", self.current_theme, self.current_accent);
        Ok(())
    }

    pub fn current_theme(&self) -> Theme {
        self.current_theme
    }

    pub fn current_accent(&self) -> AccentColor {
        self.current_accent
    }

    pub fn preferences(&self) -> Preferences {
        Preferences {
            theme: self.current_theme,
            accent: self.current_accent,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn set_theme(&mut self, value: Theme) -> Result<(), PrefsError> {
        self.store.set(THEME_KEY, value.as_str());
        self.store.flush()?;
        self.current_theme = value;
        debug!("Persisted theme={}", value);
        Ok(())
    }

    pub fn set_accent(&mut self, value: AccentColor) -> Result<(), PrefsError> {
        self.store.set(ACCENT_KEY, &value.to_hex());
        self.store.flush()?;
        self.current_accent = value;
        debug!("Persisted accent={}", value);
        Ok(())
    }

    /// Generates stylesheet and palette for the current state and installs them
    pub fn apply_theme(&self, target: &mut dyn StyleTarget) -> Result<(), PrefsError> {
        let theme_name = self.current_theme.as_str();
        let custom_colors = CustomColors {
            primary: Some(self.current_accent),
        };

        let sheet = self.styler.load_stylesheet(theme_name, &custom_colors)?;
        let palette = self.styler.load_palette(theme_name)?;
        target.set_style_sheet(&sheet)?;
        target.set_palette(palette)?;

        info!("Applied theme={} accent={}", theme_name, self.current_accent);
        Ok(())
    }

    /// Runs the preferences dialog modally and commits an accepted draft.
    ///
    /// Returns `true` if the dialog was accepted. A rejected dialog changes
    /// nothing and does not restyle.
    pub fn open_preferences(
        &mut self,
        runner: &mut dyn DialogRunner,
        target: &mut dyn StyleTarget,
    ) -> Result<bool, PrefsError> {
        let dialog = PreferenceDialog::new(self.preferences(), self.icon.clone());

        match runner.exec(dialog)? {
            DialogOutcome::Accepted(draft) => {
                info!("Preferences accepted: theme={} new_accent={:?}", draft.theme_text, draft.new_accent);
                self.set_theme(draft.theme_text.parse()?)?;
                if let Some(accent) = draft.new_accent {
                    self.set_accent(accent)?;
                }
                self.apply_theme(target)?;
                Ok(true)
            }
            DialogOutcome::Rejected => {
                info!("Preferences dialog cancelled");
                Ok(false)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::JsonFileStore;
    use crate::ui::dialogs::DialogDraft;
    use crate::ui::modal::KeyScriptRunner;
    use crate::ui::theme_loader::BuiltinStyler;
    use crossterm::event::KeyCode;
    use std::cell::RefCell;
    use std::collections::BTreeMap;
    use std::rc::Rc;

    /// In-memory store that counts flushes and remembers the flushed state
    #[derive(Debug, Default, Clone)]
    pub struct MemoryStore {
        pub values: BTreeMap<String, String>,
        pub flushed: BTreeMap<String, String>,
        pub flushes: usize,
    }

    impl MemoryStore {
        pub fn with(pairs: &[(&str, &str)]) -> Self {
            let values: BTreeMap<String, String> = pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect();
            Self {
                flushed: values.clone(),
                values,
                flushes: 0,
            }
        }
    }

    impl SettingsStore for MemoryStore {
        fn get(&self, key: &str, default: &str) -> String {
            self.values.get(key).cloned().unwrap_or_else(|| default.to_string())
        }

        fn set(&mut self, key: &str, value: &str) {
            self.values.insert(key.to_string(), value.to_string());
        }

        fn flush(&mut self) -> Result<(), PrefsError> {
            self.flushed = self.values.clone();
            self.flushes += 1;
            Ok(())
        }
    }

    /// Styler that records every call it receives
    #[derive(Clone, Default)]
    pub struct RecordingStyler {
        pub calls: Rc<RefCell<Vec<(String, CustomColors)>>>,
    }

    impl Styler for RecordingStyler {
        fn load_stylesheet(&self, theme_name: &str, custom_colors: &CustomColors) -> Result<String, PrefsError> {
            self.calls.borrow_mut().push((theme_name.to_string(), *custom_colors));
            BuiltinStyler.load_stylesheet(theme_name, custom_colors)
        }

        fn load_palette(&self, theme_name: &str) -> Result<Palette, PrefsError> {
            BuiltinStyler.load_palette(theme_name)
        }
    }

    #[derive(Debug, Default)]
    pub struct RecordingTarget {
        pub sheets: Vec<String>,
        pub palettes: Vec<Palette>,
    }

    impl StyleTarget for RecordingTarget {
        fn set_style_sheet(&mut self, sheet: &str) -> Result<(), PrefsError> {
            self.sheets.push(sheet.to_string());
            Ok(())
        }

        fn set_palette(&mut self, palette: Palette) -> Result<(), PrefsError> {
            self.palettes.push(palette);
            Ok(())
        }
    }

    /// Runner returning a fixed outcome without showing anything
    struct FixedRunner(DialogOutcome);

    impl DialogRunner for FixedRunner {
        fn exec(&mut self, _dialog: PreferenceDialog) -> Result<DialogOutcome, PrefsError> {
            Ok(self.0.clone())
        }
    }

    fn controller(store: MemoryStore) -> ThemeController<MemoryStore> {
        ThemeController::new(store, Box::new(BuiltinStyler), None).unwrap()
    }

    fn hex(s: &str) -> AccentColor {
        s.parse().unwrap()
    }

    #[test]
    fn test_load_empty_store_defaults() {
        let c = controller(MemoryStore::default());
        assert_eq!(c.current_theme(), Theme::Dark);
        assert_eq!(c.current_accent().to_hex(), "#8ab4f7");
    }

    #[test]
    fn test_load_missing_accent_uses_theme_default() {
        for theme in Theme::ALL {
            let c = controller(MemoryStore::with(&[(THEME_KEY, theme.as_str())]));
            assert_eq!(c.current_theme(), theme);
            assert_eq!(c.current_accent(), theme.default_accent());
        }
    }

    #[test]
    fn test_load_empty_accent_uses_theme_default() {
        for theme in Theme::ALL {
            let c = controller(MemoryStore::with(&[(THEME_KEY, theme.as_str()), (ACCENT_KEY, "")]));
            assert_eq!(c.current_accent(), theme.default_accent());
            // Defaulted accent is written back
            assert_eq!(c.store().flushed.get(ACCENT_KEY).map(String::as_str), Some(theme.default_accent().to_hex().as_str()));
        }
    }

    #[test]
    fn test_load_keeps_canonical_values_without_writing() {
        let c = controller(MemoryStore::with(&[(THEME_KEY, "light"), (ACCENT_KEY, "#112233")]));
        assert_eq!(c.current_theme(), Theme::Light);
        assert_eq!(c.current_accent().to_hex(), "#112233");
        assert_eq!(c.store().flushes, 0);
    }

    #[test]
    fn test_load_normalizes_and_writes_back() {
        let c = controller(MemoryStore::with(&[(THEME_KEY, "Dark"), (ACCENT_KEY, "#ABCDEF")]));
        assert_eq!(c.current_theme(), Theme::Dark);
        assert_eq!(c.current_accent().to_hex(), "#abcdef");
        assert_eq!(c.store().flushed.get(THEME_KEY).map(String::as_str), Some("dark"));
        assert_eq!(c.store().flushed.get(ACCENT_KEY).map(String::as_str), Some("#abcdef"));
        assert_eq!(c.store().flushes, 2);
    }

    #[test]
    fn test_load_normalizes_file_store() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, r##"{"theme": "LIGHT", "accent": "#A1B2C3"}"##).unwrap();

        ThemeController::new(JsonFileStore::open(&path), Box::new(BuiltinStyler), None).unwrap();

        let reopened = JsonFileStore::open(&path);
        assert_eq!(reopened.get(THEME_KEY, ""), "light");
        assert_eq!(reopened.get(ACCENT_KEY, ""), "#a1b2c3");
    }

    #[test]
    fn test_load_unknown_theme_fails() {
        let result = ThemeController::new(
            MemoryStore::with(&[(THEME_KEY, "solarized")]),
            Box::new(BuiltinStyler),
            None,
        );
        assert!(matches!(result, Err(PrefsError::UnknownTheme(_))));
    }

    #[test]
    fn test_reset_ignores_broken_store() {
        let c = ThemeController::reset(
            MemoryStore::with(&[(THEME_KEY, "solarized"), (ACCENT_KEY, "")]),
            Box::new(BuiltinStyler),
            None,
        )
        .unwrap();
        assert_eq!(c.preferences(), Preferences::default());
        assert_eq!(c.store().flushed.get(THEME_KEY).map(String::as_str), Some("dark"));
        assert_eq!(c.store().flushed.get(ACCENT_KEY).map(String::as_str), Some("#8ab4f7"));
    }

    #[test]
    fn test_setters_flush_immediately() {
        let mut c = controller(MemoryStore::default());
        let before = c.store().flushes;

        c.set_theme(Theme::Light).unwrap();
        assert_eq!(c.store().flushes, before + 1);
        assert_eq!(c.store().flushed.get(THEME_KEY).map(String::as_str), Some("light"));

        c.set_accent(hex("#abcdef")).unwrap();
        assert_eq!(c.store().flushes, before + 2);
        assert_eq!(c.store().flushed.get(ACCENT_KEY).map(String::as_str), Some("#abcdef"));
        assert_eq!(c.current_accent(), hex("#abcdef"));
    }

    #[test]
    fn test_set_accent_round_trips_through_file_store() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");

        for value in ["#000000", "#FFFFFF", "#1a73e8", "#C0FFEE"] {
            let mut c = ThemeController::new(JsonFileStore::open(&path), Box::new(BuiltinStyler), None).unwrap();
            c.set_accent(hex(value)).unwrap();

            let fresh = ThemeController::new(JsonFileStore::open(&path), Box::new(BuiltinStyler), None).unwrap();
            assert_eq!(fresh.current_accent(), hex(value));
        }
    }

    #[test]
    fn test_apply_theme_is_idempotent() {
        let styler = RecordingStyler::default();
        let calls = styler.calls.clone();
        let c = ThemeController::new(MemoryStore::default(), Box::new(styler), None).unwrap();
        let mut target = RecordingTarget::default();

        c.apply_theme(&mut target).unwrap();
        c.apply_theme(&mut target).unwrap();

        let calls = calls.borrow();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0], calls[1]);
        assert_eq!(calls[0].0, "dark");
        assert_eq!(calls[0].1.primary, Some(hex("#8ab4f7")));
        assert_eq!(target.sheets[0], target.sheets[1]);
        assert_eq!(target.palettes, vec![Palette::dark(), Palette::dark()]);
    }

    #[test]
    fn test_cancel_leaves_state_and_store_untouched() {
        let mut c = controller(MemoryStore::with(&[(THEME_KEY, "dark"), (ACCENT_KEY, "#123456")]));
        let store_before = c.store().clone();
        let prefs_before = c.preferences();
        let mut target = RecordingTarget::default();

        // User switches theme and picks an accent, then cancels
        let mut runner = KeyScriptRunner::new(vec![
            KeyCode::Right,
            KeyCode::Down,
            KeyCode::Enter,
            KeyCode::Backspace,
            KeyCode::Char('0'),
            KeyCode::Enter,
            KeyCode::Esc,
        ]);
        let accepted = c.open_preferences(&mut runner, &mut target).unwrap();

        assert!(!accepted);
        assert_eq!(c.preferences(), prefs_before);
        assert_eq!(c.store().values, store_before.values);
        assert_eq!(c.store().flushes, store_before.flushes);
        assert!(target.sheets.is_empty());
        assert!(target.palettes.is_empty());
    }

    #[test]
    fn test_confirm_theme_only_keeps_accent() {
        let mut c = controller(MemoryStore::default());
        assert_eq!(c.preferences(), Preferences::default());
        let mut target = RecordingTarget::default();

        let mut runner = KeyScriptRunner::new(vec![KeyCode::Right, KeyCode::Enter]);
        let accepted = c.open_preferences(&mut runner, &mut target).unwrap();

        assert!(accepted);
        assert_eq!(c.current_theme(), Theme::Light);
        // Light's own default is not applied automatically
        assert_eq!(c.current_accent().to_hex(), "#8ab4f7");
        assert_eq!(c.store().flushed.get(THEME_KEY).map(String::as_str), Some("light"));
        assert_eq!(c.store().flushed.get(ACCENT_KEY), None);
        assert_eq!(target.palettes, vec![Palette::light()]);
        assert!(target.sheets[0].contains("#8ab4f7"));
    }

    #[test]
    fn test_confirm_with_new_accent() {
        let mut c = controller(MemoryStore::default());
        let mut target = RecordingTarget::default();

        let mut runner = FixedRunner(DialogOutcome::Accepted(DialogDraft {
            theme_text: "Dark".to_string(),
            new_accent: Some(hex("#445566")),
        }));
        assert!(c.open_preferences(&mut runner, &mut target).unwrap());

        assert_eq!(c.current_theme(), Theme::Dark);
        assert_eq!(c.current_accent(), hex("#445566"));
        assert_eq!(c.store().flushed.get(ACCENT_KEY).map(String::as_str), Some("#445566"));
        assert_eq!(target.sheets.len(), 1);
    }

    #[test]
    fn test_accepted_theme_text_is_case_normalized() {
        let mut c = controller(MemoryStore::default());
        let mut target = RecordingTarget::default();
        let mut runner = FixedRunner(DialogOutcome::Accepted(DialogDraft {
            theme_text: "LIGHT".to_string(),
            new_accent: None,
        }));
        c.open_preferences(&mut runner, &mut target).unwrap();
        assert_eq!(c.current_theme(), Theme::Light);
        assert_eq!(c.store().flushed.get(THEME_KEY).map(String::as_str), Some("light"));
    }

    #[test]
    fn test_styler_failure_propagates() {
        struct FailingStyler;
        impl Styler for FailingStyler {
            fn load_stylesheet(&self, theme_name: &str, _: &CustomColors) -> Result<String, PrefsError> {
                Err(PrefsError::UnknownTheme(theme_name.to_string()))
            }
            fn load_palette(&self, theme_name: &str) -> Result<Palette, PrefsError> {
                Err(PrefsError::UnknownTheme(theme_name.to_string()))
            }
        }

        let c = ThemeController::new(MemoryStore::default(), Box::new(FailingStyler), None).unwrap();
        let mut target = RecordingTarget::default();
        assert!(matches!(c.apply_theme(&mut target), Err(PrefsError::UnknownTheme(_))));
        assert!(target.sheets.is_empty());
    }
}

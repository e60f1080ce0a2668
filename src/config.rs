use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::error::PrefsError;

/// Overrides the config directory (default: ~/.themeprefs)
pub const HOME_ENV: &str = "THEMEPREFS_HOME";

pub const THEME_KEY: &str = "theme";
pub const ACCENT_KEY: &str = "accent";

/// Returns the config directory path ($THEMEPREFS_HOME or ~/.themeprefs)
pub fn config_dir() -> Option<PathBuf> {
    match std::env::var_os(HOME_ENV) {
        Some(dir) if !dir.is_empty() => Some(PathBuf::from(dir)),
        _ => dirs::home_dir().map(|h| h.join(".themeprefs")),
    }
}

/// Returns the settings file path (<config dir>/settings.json)
pub fn settings_path() -> Option<PathBuf> {
    config_dir().map(|d| d.join("settings.json"))
}

/// Returns the log file path (<config dir>/themeprefs.log)
pub fn log_path() -> Option<PathBuf> {
    config_dir().map(|d| d.join("themeprefs.log"))
}

/// Creates `dir` with user-only permissions if it does not exist yet
pub fn ensure_dir(dir: &Path) -> io::Result<()> {
    if !dir.exists() {
        fs::create_dir_all(dir)?;
        // Set directory permissions to user-only on Unix
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let perms = fs::Permissions::from_mode(0o700);
            let _ = fs::set_permissions(dir, perms);
        }
    }
    Ok(())
}

// ═══════════════════════════════════════════════════════════════════════════════
// Key-value preference store
// ═══════════════════════════════════════════════════════════════════════════════

/// String key-value store holding the persisted preferences.
///
/// `set` only changes the in-memory view; nothing is durable until `flush`
/// returns `Ok`.
pub trait SettingsStore {
    /// Stored value for `key`, or `default` if the key was never written.
    /// A stored empty string is returned as-is.
    fn get(&self, key: &str, default: &str) -> String;

    fn set(&mut self, key: &str, value: &str);

    fn flush(&mut self) -> Result<(), PrefsError>;
}

/// Settings store backed by a JSON object.
///
/// Only string values are visible through `get`; other keys in the file are
/// kept as they are and written back on `flush`.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    values: Map<String, Value>,
}

impl JsonFileStore {
    /// Opens the store at `path`. A missing file is an empty store; an
    /// unreadable or malformed file is logged and also treated as empty.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let values = match Self::read_values(&path) {
            Ok(values) => values,
            Err(e) => {
                warn!("Ignoring settings file {}: {}", path.display(), e);
                Map::new()
            }
        };
        debug!("Opened settings store {} ({} keys)", path.display(), values.len());
        Self { path, values }
    }

    /// Opens the store at the default location
    pub fn open_default() -> Result<Self, PrefsError> {
        let path = settings_path().ok_or(PrefsError::NoConfigDir)?;
        Ok(Self::open(path))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_values(path: &Path) -> Result<Map<String, Value>, PrefsError> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Map::new()),
            Err(e) => return Err(e.into()),
        };
        Ok(serde_json::from_str(&content)?)
    }
}

impl SettingsStore for JsonFileStore {
    fn get(&self, key: &str, default: &str) -> String {
        match self.values.get(key) {
            Some(Value::String(s)) => s.clone(),
            // 문자열이 아닌 값은 없는 것으로 취급
            _ => default.to_string(),
        }
    }

    fn set(&mut self, key: &str, value: &str) {
        self.values.insert(key.to_string(), Value::String(value.to_string()));
    }

    /// Writes the store using atomic write pattern
    fn flush(&mut self) -> Result<(), PrefsError> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            ensure_dir(dir)?;
        }

        let mut temp_name = self.path.as_os_str().to_owned();
        temp_name.push(".tmp");
        let temp_path = PathBuf::from(temp_name);
        let content = serde_json::to_string_pretty(&self.values)?;

        // Atomic write: write to temp file first, then rename
        fs::write(&temp_path, &content)?;
        fs::rename(&temp_path, &self.path)?;

        debug!("Flushed {} keys to {}", self.values.len(), self.path.display());
        Ok(())
    }
}

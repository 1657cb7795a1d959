//! Persisted colour theme.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{DashError, Result};
use crate::paths;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

wire_enum!(Theme, DashError::InvalidTheme, {
    Light => "light",
    Dark => "dark",
});

impl Theme {
    pub fn toggle(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct Preferences {
    #[serde(default)]
    theme: Theme,
}

/// Reads and writes the `theme` key of `preferences.yaml`.
#[derive(Debug, Clone)]
pub struct ThemeStore {
    path: PathBuf,
}

impl ThemeStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at `<root>/preferences.yaml`.
    pub fn default_location() -> Self {
        Self::new(paths::preferences_path())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The stored theme, or `Light` when nothing has been saved yet.
    pub fn load(&self) -> Result<Theme> {
        if !self.path.exists() {
            return Ok(Theme::default());
        }
        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(Theme::default());
        }
        let prefs: Preferences = serde_yaml_ng::from_str(&content)?;
        Ok(prefs.theme)
    }

    pub fn save(&self, theme: Theme) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_yaml_ng::to_string(&Preferences { theme })?;
        fs::write(&self.path, content)?;
        debug!(%theme, path = %self.path.display(), "saved theme");
        Ok(())
    }

    /// Flip the stored theme and persist the result.
    pub fn toggle(&self) -> Result<Theme> {
        let next = self.load()?.toggle();
        self.save(next)?;
        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_theme_parse_and_display() {
        assert_eq!("Dark".parse::<Theme>().unwrap(), Theme::Dark);
        assert_eq!(Theme::Light.to_string(), "light");
        let err = "blue".parse::<Theme>().unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid theme 'blue', expected 'light' or 'dark'"
        );
    }

    #[test]
    fn test_load_defaults_to_light() {
        let dir = TempDir::new().unwrap();
        let store = ThemeStore::new(dir.path().join("preferences.yaml"));
        assert_eq!(store.load().unwrap(), Theme::Light);
    }

    #[test]
    fn test_toggle_persists() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("state").join("preferences.yaml");
        let store = ThemeStore::new(&path);

        assert_eq!(store.toggle().unwrap(), Theme::Dark);
        assert_eq!(fs::read_to_string(&path).unwrap().trim(), "theme: dark");

        let reopened = ThemeStore::new(&path);
        assert_eq!(reopened.load().unwrap(), Theme::Dark);
        assert_eq!(reopened.toggle().unwrap(), Theme::Light);
    }

    #[test]
    fn test_load_rejects_unknown_theme() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("preferences.yaml");
        fs::write(&path, "theme: sepia\n").unwrap();
        assert!(ThemeStore::new(&path).load().is_err());
    }
}

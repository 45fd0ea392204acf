//! Persisted user preferences behind an injectable key/value store

use crate::error::Result;
use crate::snapshot::ProjectLevel;
use std::collections::HashMap;
use std::fmt;
use tracing::warn;

pub const THEME_KEY: &str = "theme";
pub const DEFAULT_PROJECT_LEVEL_KEY: &str = "defaultProjectLevel";

/// String key/value persistence (browser local storage in production)
pub trait PreferenceStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
    fn remove(&mut self, key: &str) -> Result<()>;
}

/// Volatile store for tests and for browsers with storage disabled
#[derive(Debug, Default, Clone)]
pub struct MemoryPreferences {
    values: HashMap<String, String>,
}

impl MemoryPreferences {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceStore for MemoryPreferences {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.values.remove(key);
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Theme {
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "light" => Some(Theme::Light),
            "dark" => Some(Theme::Dark),
            _ => None,
        }
    }

    pub fn toggled(&self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    /// Caption of the toggle button, naming the theme it switches to
    pub fn toggle_label(&self) -> &'static str {
        match self {
            Theme::Light => "Dark",
            Theme::Dark => "Light",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Typed access to the two persisted preferences
pub struct Preferences<S> {
    store: S,
}

impl<S: PreferenceStore> Preferences<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Saved theme, or the one matching the system preference
    pub fn theme(&self, prefers_light: bool) -> Theme {
        match self.store.get(THEME_KEY) {
            Ok(Some(saved)) => match Theme::parse(&saved) {
                Some(theme) => return theme,
                None => warn!(value = %saved, "ignoring unknown saved theme"),
            },
            Ok(None) => {}
            Err(e) => warn!(error = %e, "theme preference unreadable"),
        }
        if prefers_light {
            Theme::Light
        } else {
            Theme::Dark
        }
    }

    pub fn set_theme(&mut self, theme: Theme) -> Result<()> {
        self.store.set(THEME_KEY, theme.as_str())
    }

    /// Saved default project level, only if it is on the allow-list
    pub fn default_project_level(&self) -> Option<ProjectLevel> {
        match self.store.get(DEFAULT_PROJECT_LEVEL_KEY) {
            Ok(value) => value.as_deref().and_then(ProjectLevel::parse),
            Err(e) => {
                warn!(error = %e, "default project level unreadable");
                None
            }
        }
    }

    pub fn set_default_project_level(&mut self, level: Option<ProjectLevel>) -> Result<()> {
        match level {
            Some(level) => self.store.set(DEFAULT_PROJECT_LEVEL_KEY, level.as_str()),
            None => self.store.remove(DEFAULT_PROJECT_LEVEL_KEY),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

//! Browser local storage as the preference backend

use crate::error::JsResultExt;
use overlay_core::prefs::{MemoryPreferences, PreferenceStore};
use overlay_core::{OverlayError, Result};

/// `window.localStorage` wrapper
pub struct LocalStorage {
    storage: web_sys::Storage,
}

impl LocalStorage {
    /// Open local storage. Fails when storage is disabled (e.g. privacy mode).
    pub fn open() -> Result<Self> {
        let window = web_sys::window().ok_or_else(|| OverlayError::Js("No window".to_string()))?;
        let storage = window
            .local_storage()
            .or_overlay()?
            .ok_or_else(|| OverlayError::Js("localStorage not available".to_string()))?;
        Ok(Self { storage })
    }
}

impl PreferenceStore for LocalStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        self.storage.get_item(key).or_overlay()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.storage.set_item(key, value).or_overlay()
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.storage.remove_item(key).or_overlay()
    }
}

/// Local storage when available, otherwise an in-memory fallback for the session
pub enum BrowserStore {
    Local(LocalStorage),
    Memory(MemoryPreferences),
}

impl BrowserStore {
    pub fn open() -> Self {
        match LocalStorage::open() {
            Ok(local) => BrowserStore::Local(local),
            Err(e) => {
                crate::logging::console_log!("preferences will not persist: {}", e);
                BrowserStore::Memory(MemoryPreferences::new())
            }
        }
    }
}

impl PreferenceStore for BrowserStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        match self {
            BrowserStore::Local(s) => s.get(key),
            BrowserStore::Memory(s) => s.get(key),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match self {
            BrowserStore::Local(s) => s.set(key, value),
            BrowserStore::Memory(s) => s.set(key, value),
        }
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        match self {
            BrowserStore::Local(s) => s.remove(key),
            BrowserStore::Memory(s) => s.remove(key),
        }
    }
}

//! Light/dark appearance.
//!
//! The chosen mode is remembered in storage. Until one is chosen, the
//! configured preference decides, and `system` follows the OS setting.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::OasisError;
use crate::storage::Storage;

const THEME_KEY: &str = "theme";

/// A concrete appearance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    Light,
    Dark,
}

impl ThemeMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }
}

impl std::fmt::Display for ThemeMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ThemeMode {
    type Err = String;

    /// Only the exact stored spellings are accepted.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            other => Err(format!("unknown theme: {other}")),
        }
    }
}

/// Configured fallback when no mode has been stored yet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemePreference {
    #[default]
    System,
    Light,
    Dark,
}

impl ThemePreference {
    /// Resolve `System` against the OS. Undetectable means dark.
    pub fn resolve(self) -> ThemeMode {
        match self {
            Self::Light => ThemeMode::Light,
            Self::Dark => ThemeMode::Dark,
            Self::System => match dark_light::detect() {
                Ok(dark_light::Mode::Light) => ThemeMode::Light,
                _ => ThemeMode::Dark,
            },
        }
    }
}

/// The active appearance, persisted on every change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    mode: ThemeMode,
}

impl Theme {
    /// Restore the stored mode, or fall back to `preference`.
    pub fn load(store: &Storage, preference: ThemePreference) -> Result<Self, OasisError> {
        let stored = store
            .get_pref(THEME_KEY)?
            .and_then(|value| value.parse::<ThemeMode>().ok());
        let mode = match stored {
            Some(mode) => mode,
            None => preference.resolve(),
        };
        Ok(Self { mode })
    }

    pub fn mode(&self) -> ThemeMode {
        self.mode
    }

    pub fn set(&mut self, store: &Storage, mode: ThemeMode) -> Result<(), OasisError> {
        store.set_pref(THEME_KEY, mode.as_str())?;
        self.mode = mode;
        tracing::info!(theme = %mode, "theme changed");
        Ok(())
    }

    /// Flip between light and dark and return the new mode.
    pub fn toggle(&mut self, store: &Storage) -> Result<ThemeMode, OasisError> {
        let next = self.mode.toggled();
        self.set(store, next)?;
        Ok(next)
    }
}

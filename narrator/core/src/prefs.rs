//! Persisted Preferences
//!
//! Theme preference and a bounded most-recent-searches list, stored as one
//! JSON document under the platform config directory. Read at startup,
//! written on change. This is the only persistent state praxis keeps.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Maximum number of recent searches kept.
pub const MAX_RECENT_SEARCHES: usize = 5;

/// Preferences file name under the config directory.
const PREFS_FILE: &str = "preferences.json";

/// Errors from preference persistence.
#[derive(Debug, thiserror::Error)]
pub enum PreferencesError {
    /// The preferences file could not be read or written.
    #[error("failed to access preferences at {path}")]
    Io {
        /// File that failed.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The preferences file is not valid JSON.
    #[error("failed to parse preferences at {path}")]
    Parse {
        /// File that failed to parse.
        path: PathBuf,
        /// Underlying parse error.
        #[source]
        source: serde_json::Error,
    },
}

/// Theme preference.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeChoice {
    /// Light palette.
    Light,
    /// Dark palette (default).
    #[default]
    Dark,
}

impl ThemeChoice {
    /// The other theme.
    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }
}

/// Persisted user preferences.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Preferences {
    /// Theme preference.
    #[serde(default)]
    pub theme: ThemeChoice,
    /// Most recent searches, newest first, at most [`MAX_RECENT_SEARCHES`].
    #[serde(default)]
    pub recent_searches: Vec<String>,
}

impl Preferences {
    /// Default on-disk location (`<config dir>/praxis/preferences.json`).
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("praxis").join(PREFS_FILE))
    }

    /// Load preferences from `path`. A missing file yields defaults.
    pub fn load(path: &Path) -> Result<Self, PreferencesError> {
        let json = match fs::read_to_string(path) {
            Ok(json) => json,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(PreferencesError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        let mut prefs: Self =
            serde_json::from_str(&json).map_err(|source| PreferencesError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        prefs.recent_searches.truncate(MAX_RECENT_SEARCHES);
        Ok(prefs)
    }

    /// Write preferences to `path`, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<(), PreferencesError> {
        let io_err = |source| PreferencesError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(|source| PreferencesError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        fs::write(path, json).map_err(|source| PreferencesError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Record a search, newest first, deduplicating and keeping the list
    /// bounded. Blank queries are ignored.
    pub fn push_recent_search(&mut self, query: &str) {
        let query = query.trim();
        if query.is_empty() {
            return;
        }
        self.recent_searches
            .retain(|q| !q.eq_ignore_ascii_case(query));
        self.recent_searches.insert(0, query.to_string());
        self.recent_searches.truncate(MAX_RECENT_SEARCHES);
    }

    /// Toggle and return the new theme.
    pub fn toggle_theme(&mut self) -> ThemeChoice {
        self.theme = self.theme.toggled();
        self.theme
    }
}

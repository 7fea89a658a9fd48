//! Narrator Configuration
//!
//! Configuration for the narration engine: where content lives, whether an
//! external grader is reachable, and optional timing overrides. Loaded from
//! an optional TOML file with environment variables taking precedence, the
//! same layering the rest of the stack uses.
//!
//! ```toml
//! [content]
//! dir = "./content"
//!
//! [grader]
//! url = "http://localhost:8750"
//! timeout_secs = 5
//!
//! [timing]
//! title_delay_ms = 800
//! visual_hold_ms = 2000
//! text_tick_ms = 18
//! code_tick_ms = 32
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::grader::GraderConfig;
use crate::sequencer::SequencerTiming;

/// Errors from configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("failed to read config file {path}")]
    Io {
        /// File that failed to read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The config file is not valid TOML of the expected shape.
    #[error("failed to parse config file {path}")]
    Parse {
        /// File that failed to parse.
        path: PathBuf,
        /// Underlying parse error.
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    content: ContentSection,
    #[serde(default)]
    grader: Option<GraderSection>,
    #[serde(default)]
    timing: TimingSection,
}

#[derive(Debug, Default, Deserialize)]
struct ContentSection {
    dir: Option<PathBuf>,
}

#[derive(Debug, Deserialize)]
struct GraderSection {
    url: String,
    timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct TimingSection {
    title_delay_ms: Option<u64>,
    visual_hold_ms: Option<u64>,
    skip_delay_ms: Option<u64>,
    transition_delay_ms: Option<u64>,
    text_tick_ms: Option<u64>,
    code_tick_ms: Option<u64>,
}

/// Resolved narrator configuration.
#[derive(Clone, Debug)]
pub struct NarratorConfig {
    /// Directory holding the per-technology catalog files.
    pub content_dir: PathBuf,
    /// External grading collaborator, if configured.
    pub grader: Option<GraderConfig>,
    /// Playback timing.
    pub timing: SequencerTiming,
}

impl Default for NarratorConfig {
    fn default() -> Self {
        Self {
            content_dir: PathBuf::from("content"),
            grader: None,
            timing: SequencerTiming::default(),
        }
    }
}

impl NarratorConfig {
    /// Load from a TOML file, then apply environment overrides
    /// (`PRAXIS_CONTENT_DIR`, `PRAXIS_GRADER_URL`,
    /// `PRAXIS_GRADER_TIMEOUT_SECS`).
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let file = match fs::read_to_string(path) {
            Ok(text) => {
                toml::from_str::<ConfigFile>(&text).map_err(|source| ConfigError::Parse {
                    path: path.to_path_buf(),
                    source,
                })?
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => ConfigFile::default(),
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        Ok(Self::from_file(file).with_env_overrides())
    }

    /// Configuration from environment variables alone.
    #[must_use]
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    fn from_file(file: ConfigFile) -> Self {
        let defaults = SequencerTiming::default();
        let ms = Duration::from_millis;
        let t = &file.timing;
        Self {
            content_dir: file.content.dir.unwrap_or_else(|| PathBuf::from("content")),
            grader: file.grader.map(|g| GraderConfig {
                base_url: g.url,
                timeout_secs: g.timeout_secs.unwrap_or(5),
            }),
            timing: SequencerTiming {
                title_delay: t.title_delay_ms.map_or(defaults.title_delay, ms),
                visual_hold: t.visual_hold_ms.map_or(defaults.visual_hold, ms),
                skip_delay: t.skip_delay_ms.map_or(defaults.skip_delay, ms),
                transition_delay: t.transition_delay_ms.map_or(defaults.transition_delay, ms),
                text_tick: t.text_tick_ms.map_or(defaults.text_tick, ms),
                code_tick: t.code_tick_ms.map_or(defaults.code_tick, ms),
            },
        }
    }

    fn with_env_overrides(mut self) -> Self {
        if let Ok(dir) = std::env::var("PRAXIS_CONTENT_DIR") {
            self.content_dir = PathBuf::from(dir);
        }
        if let Some(grader) = GraderConfig::from_env() {
            self.grader = Some(grader);
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = NarratorConfig::load(&dir.path().join("praxis.toml")).unwrap();
        assert_eq!(config.content_dir, PathBuf::from("content"));
        assert!(config.grader.is_none());
        assert_eq!(config.timing.text_tick, Duration::from_millis(18));
    }

    #[test]
    fn test_file_sections_apply() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("praxis.toml");
        fs::write(
            &path,
            r#"
[content]
dir = "/srv/content"

[grader]
url = "http://grader.test"

[timing]
text_tick_ms = 10
"#,
        )
        .unwrap();

        let config = NarratorConfig::load(&path).unwrap();
        assert_eq!(config.content_dir, PathBuf::from("/srv/content"));
        let grader = config.grader.unwrap();
        assert_eq!(grader.base_url, "http://grader.test");
        assert_eq!(grader.timeout_secs, 5);
        assert_eq!(config.timing.text_tick, Duration::from_millis(10));
        // Unset timing keys keep their defaults.
        assert_eq!(config.timing.code_tick, Duration::from_millis(32));
    }

    #[test]
    fn test_malformed_file_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("praxis.toml");
        fs::write(&path, "[content\n").unwrap();
        assert!(matches!(
            NarratorConfig::load(&path),
            Err(ConfigError::Parse { .. })
        ));
    }
}

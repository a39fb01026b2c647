// TOML config adapter - Configuration file loading and search

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::adapters::process::ToolTimeouts;
use crate::domain::model::EditSettings;
use crate::error::{QuietCutError, QuietCutResult};

/// Environment variable naming an explicit config file
pub const CONFIG_ENV_VAR: &str = "QUIETCUT_CONFIG";

/// Files tried, in order, when no config is named explicitly
pub const DEFAULT_CONFIG_PATHS: &[&str] = &["quietcut.toml", "config/quietcut.toml"];

/// Root of `quietcut.toml`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub edit: EditSection,
    pub output: OutputSection,
    pub runtime: RuntimeSection,
    pub timeouts: TimeoutSection,
    pub tools: ToolsSection,
    pub logging: LoggingSection,
}

/// `[edit]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EditSection {
    pub silence_threshold_db: f64,
    pub min_silence_ms: u64,
    pub padding_ms: u64,
}

impl Default for EditSection {
    fn default() -> Self {
        Self {
            silence_threshold_db: EditSettings::DEFAULT_SILENCE_THRESHOLD_DB,
            min_silence_ms: EditSettings::DEFAULT_MIN_SILENCE_MS,
            padding_ms: EditSettings::DEFAULT_PADDING_MS,
        }
    }
}

/// `[output]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputSection {
    /// Where auto-named outputs go
    pub dir: PathBuf,
    /// Write `<output stem>_result.json` after each edit
    pub write_result: bool,
    /// Scratch directory for segments; defaults to the output's directory
    pub work_dir: Option<PathBuf>,
}

impl Default for OutputSection {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("output"),
            write_result: true,
            work_dir: None,
        }
    }
}

/// `[runtime]`
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RuntimeSection {
    /// Parallel segment extractions; CPU count when unset
    pub jobs: Option<usize>,
}

/// `[timeouts]`, in seconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TimeoutSection {
    pub probe_secs: u64,
    pub audio_extract_secs: u64,
    pub segment_secs: u64,
    pub concat_secs: u64,
}

impl Default for TimeoutSection {
    fn default() -> Self {
        let defaults = ToolTimeouts::default();
        Self {
            probe_secs: defaults.probe.as_secs(),
            audio_extract_secs: defaults.audio_extract.as_secs(),
            segment_secs: defaults.segment.as_secs(),
            concat_secs: defaults.concat.as_secs(),
        }
    }
}

impl TimeoutSection {
    pub fn to_timeouts(self) -> ToolTimeouts {
        ToolTimeouts {
            probe: Duration::from_secs(self.probe_secs),
            audio_extract: Duration::from_secs(self.audio_extract_secs),
            segment: Duration::from_secs(self.segment_secs),
            concat: Duration::from_secs(self.concat_secs),
        }
    }
}

/// `[tools]`, program names looked up on PATH or explicit paths
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ToolsSection {
    pub ffmpeg: String,
    pub ffprobe: String,
}

impl Default for ToolsSection {
    fn default() -> Self {
        Self {
            ffmpeg: "ffmpeg".to_string(),
            ffprobe: "ffprobe".to_string(),
        }
    }
}

/// `[logging]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingSection {
    pub level: String,
    pub json: bool,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl AppConfig {
    /// Parse TOML text
    pub fn from_toml_str(content: &str) -> QuietCutResult<Self> {
        let config: AppConfig = toml::from_str(content).map_err(|e| QuietCutError::Config {
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse one file
    pub fn load(path: &Path) -> QuietCutResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| QuietCutError::Config {
            message: format!("Failed to read {}: {}", path.display(), e),
        })?;
        Self::from_toml_str(&content).map_err(|e| match e {
            QuietCutError::Config { message } => QuietCutError::Config {
                message: format!("{}: {}", path.display(), message),
            },
            other => other,
        })
    }

    /// Load the first config found.
    ///
    /// An explicit path (flag or `QUIETCUT_CONFIG`) must exist; the default
    /// locations are optional and defaults apply when none exists.
    pub fn discover(explicit: Option<&Path>) -> QuietCutResult<Self> {
        let from_env = std::env::var_os(CONFIG_ENV_VAR).map(PathBuf::from);
        if let Some(path) = explicit.map(Path::to_path_buf).or(from_env) {
            info!("Loading configuration from: {}", path.display());
            return Self::load(&path);
        }

        for candidate in DEFAULT_CONFIG_PATHS {
            let path = Path::new(candidate);
            if path.is_file() {
                info!("Loading configuration from: {}", path.display());
                return Self::load(path);
            }
        }

        debug!("No configuration file found, using defaults");
        Ok(Self::default())
    }

    /// Edit settings from the `[edit]` section
    pub fn edit_settings(&self) -> EditSettings {
        EditSettings {
            silence_threshold_db: self.edit.silence_threshold_db,
            min_silence_ms: self.edit.min_silence_ms,
            padding_ms: self.edit.padding_ms,
        }
    }

    fn validate(&self) -> QuietCutResult<()> {
        self.edit_settings().validate()?;
        if self.runtime.jobs == Some(0) {
            return Err(QuietCutError::Config {
                message: "runtime.jobs must be at least 1".to_string(),
            });
        }
        let t = &self.timeouts;
        if [t.probe_secs, t.audio_extract_secs, t.segment_secs, t.concat_secs].contains(&0) {
            return Err(QuietCutError::Config {
                message: "timeouts must be at least one second".to_string(),
            });
        }
        if self.tools.ffmpeg.trim().is_empty() || self.tools.ffprobe.trim().is_empty() {
            return Err(QuietCutError::Config {
                message: "tools.ffmpeg and tools.ffprobe must not be empty".to_string(),
            });
        }
        Ok(())
    }
}

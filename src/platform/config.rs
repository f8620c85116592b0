// DevPanel - platform/config.rs
//
// Platform-specific configuration, data directory resolution, and config.toml
// loading with startup validation.
//
// Uses the `directories` crate for XDG (Linux), AppData (Windows),
// Library (macOS) compliance.

use crate::util::constants;
use directories::ProjectDirs;
use std::path::{Path, PathBuf};

/// Resolved platform paths for DevPanel data and configuration.
#[derive(Debug, Clone)]
pub struct PlatformPaths {
    /// Configuration directory (e.g. ~/.config/devpanel/ or %APPDATA%\DevPanel\)
    pub config_dir: PathBuf,

    /// Data directory for logs, caches, etc.
    pub data_dir: PathBuf,
}

impl PlatformPaths {
    /// Resolve platform-appropriate paths.
    ///
    /// Falls back to current directory if platform dirs cannot be determined.
    pub fn resolve() -> Self {
        if let Some(proj_dirs) = ProjectDirs::from("", "", constants::APP_ID) {
            let config_dir = proj_dirs.config_dir().to_path_buf();
            let data_dir = proj_dirs.data_dir().to_path_buf();

            tracing::debug!(
                config = %config_dir.display(),
                data = %data_dir.display(),
                "Platform paths resolved"
            );

            Self {
                config_dir,
                data_dir,
            }
        } else {
            tracing::warn!("Could not determine platform directories, using current directory");
            let fallback = PathBuf::from(".");
            Self {
                config_dir: fallback.clone(),
                data_dir: fallback,
            }
        }
    }
}

// =============================================================================
// config.toml loading and validation
// =============================================================================

/// Raw deserialisable shape of config.toml.
///
/// Unknown keys are silently ignored for forward compatibility -- a newer
/// config file can be used with an older binary without crashing.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct RawConfig {
    /// `[buffers]` section.
    pub buffers: BuffersSection,
    /// `[logging]` section.
    pub logging: LoggingSection,
}

/// `[buffers]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct BuffersSection {
    /// Maximum lines retained per output buffer (tests/docs).
    pub max_output_lines: Option<usize>,
    /// Maximum push events consumed per subscription drain.
    pub max_events_per_drain: Option<usize>,
}

/// `[logging]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Log level: "error", "warn", "info", "debug", "trace".
    pub level: Option<String>,
}

/// Validated application configuration derived from `config.toml`.
///
/// All values are validated against named constants at load time.
/// Invalid values produce actionable warnings and fall back to defaults.
#[derive(Debug, Clone)]
pub struct PanelConfig {
    // -- Buffers --
    /// Maximum lines retained per output buffer.
    pub max_output_lines: usize,
    /// Maximum push events consumed per subscription drain.
    pub max_events_per_drain: usize,

    // -- Logging --
    /// Logging level string (for init before tracing is available).
    pub log_level: Option<String>,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            max_output_lines: constants::DEFAULT_MAX_OUTPUT_LINES,
            max_events_per_drain: constants::DEFAULT_MAX_EVENTS_PER_DRAIN,
            log_level: None,
        }
    }
}

/// Load and validate `config.toml` from the given config directory.
///
/// Returns `PanelConfig` with validated values and a list of non-fatal
/// warnings. If the file does not exist, returns defaults with no warnings
/// (first-run). If the file is unparseable, returns defaults with an error
/// warning -- the session still starts but the user is informed.
pub fn load_config(config_dir: &Path) -> (PanelConfig, Vec<String>) {
    let config_path = config_dir.join(constants::CONFIG_FILE_NAME);

    let mut warnings: Vec<String> = Vec::new();

    if !config_path.exists() {
        tracing::debug!(path = %config_path.display(), "No config.toml found; using defaults");
        return (PanelConfig::default(), warnings);
    }

    let content = match std::fs::read_to_string(&config_path) {
        Ok(c) => c,
        Err(e) => {
            let msg = format!(
                "Could not read config file '{}': {e}. Using defaults.",
                config_path.display()
            );
            tracing::warn!("{}", msg);
            warnings.push(msg);
            return (PanelConfig::default(), warnings);
        }
    };

    let raw: RawConfig = match toml::from_str(&content) {
        Ok(r) => r,
        Err(e) => {
            let msg = format!(
                "Failed to parse config file '{}': {e}. Using defaults.",
                config_path.display()
            );
            tracing::warn!("{}", msg);
            warnings.push(msg);
            return (PanelConfig::default(), warnings);
        }
    };

    tracing::info!(path = %config_path.display(), "Loaded config.toml");

    // Validate each field against named constants, accumulating all errors.
    let mut config = PanelConfig::default();

    // -- Buffers: max_output_lines --
    if let Some(lines) = raw.buffers.max_output_lines {
        if (constants::MIN_MAX_OUTPUT_LINES..=constants::ABSOLUTE_MAX_OUTPUT_LINES)
            .contains(&lines)
        {
            config.max_output_lines = lines;
        } else {
            warnings.push(format!(
                "[buffers] max_output_lines = {lines} is out of range ({}-{}). Using default ({}).",
                constants::MIN_MAX_OUTPUT_LINES,
                constants::ABSOLUTE_MAX_OUTPUT_LINES,
                constants::DEFAULT_MAX_OUTPUT_LINES,
            ));
        }
    }

    // -- Buffers: max_events_per_drain --
    if let Some(budget) = raw.buffers.max_events_per_drain {
        if (constants::MIN_MAX_EVENTS_PER_DRAIN..=constants::ABSOLUTE_MAX_EVENTS_PER_DRAIN)
            .contains(&budget)
        {
            config.max_events_per_drain = budget;
        } else {
            warnings.push(format!(
                "[buffers] max_events_per_drain = {budget} is out of range ({}-{}). Using default ({}).",
                constants::MIN_MAX_EVENTS_PER_DRAIN,
                constants::ABSOLUTE_MAX_EVENTS_PER_DRAIN,
                constants::DEFAULT_MAX_EVENTS_PER_DRAIN,
            ));
        }
    }

    // -- Logging: level --
    if let Some(ref level) = raw.logging.level {
        let valid = ["error", "warn", "info", "debug", "trace"];
        if valid.contains(&level.to_lowercase().as_str()) {
            config.log_level = Some(level.clone());
        } else {
            warnings.push(format!(
                "[logging] level = \"{level}\" is not recognised. \
                 Valid values: error, warn, info, debug, trace. Using default (info).",
            ));
        }
    }

    if !warnings.is_empty() {
        tracing::warn!(count = warnings.len(), "Config validation produced warnings");
    }

    (config, warnings)
}

// =============================================================================
// Unit tests
// =============================================================================

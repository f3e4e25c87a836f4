//! Solver configuration, read from TOML or JSON.

use std::path::{Path, PathBuf};

use lazor_core::TraceOptions;
use serde::{Deserialize, Serialize};

// ===========================================================================
// Errors
// ===========================================================================

/// Errors that can occur while loading a configuration file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The file has an extension we don't support.
    #[error("unsupported format for file: {file}")]
    UnsupportedFormat { file: PathBuf },

    #[error("parse error in {file}: {detail}")]
    Parse { file: PathBuf, detail: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

// ===========================================================================
// Configuration
// ===========================================================================

fn default_max_attempts() -> u64 {
    100_000
}

fn default_true() -> bool {
    true
}

/// Settings for the placement search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SolverConfig {
    /// Random placements to try before giving up.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u64,
    /// PRNG seed. `None` seeds from the system clock.
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub max_steps_per_beam: Option<usize>,
    /// Keep mirrors and absorbers off cells whose face is a border target.
    #[serde(default = "default_true")]
    pub avoid_border_targets: bool,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            seed: None,
            max_steps_per_beam: None,
            avoid_border_targets: true,
        }
    }
}

impl SolverConfig {
    pub fn trace_options(&self) -> TraceOptions {
        TraceOptions {
            max_steps_per_beam: self.max_steps_per_beam,
        }
    }
}

// ===========================================================================
// Loading
// ===========================================================================

/// Supported configuration formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Toml,
    Json,
}

/// Detect the format of a file based on its extension.
pub fn detect_format(path: &Path) -> Result<Format, ConfigError> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("toml") => Ok(Format::Toml),
        Some("json") => Ok(Format::Json),
        _ => Err(ConfigError::UnsupportedFormat {
            file: path.to_path_buf(),
        }),
    }
}

/// Read a solver configuration file.
pub fn load_config(path: &Path) -> Result<SolverConfig, ConfigError> {
    let format = detect_format(path)?;
    let content = std::fs::read_to_string(path)?;
    let parse_error = |detail: String| ConfigError::Parse {
        file: path.to_path_buf(),
        detail,
    };

    let config: SolverConfig = match format {
        Format::Toml => toml::from_str(&content).map_err(|e| parse_error(e.to_string()))?,
        Format::Json => serde_json::from_str(&content).map_err(|e| parse_error(e.to_string()))?,
    };
    log::debug!("loaded solver config from {}: {config:?}", path.display());
    Ok(config)
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    /// Create a temporary directory with a unique name for test isolation.
    fn make_test_dir(suffix: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "lazor_config_test_{suffix}_{}",
            std::process::id()
        ));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn detect_formats() {
        assert_eq!(detect_format(Path::new("solver.toml")).unwrap(), Format::Toml);
        assert_eq!(detect_format(Path::new("solver.json")).unwrap(), Format::Json);
        assert!(matches!(
            detect_format(Path::new("solver.yaml")),
            Err(ConfigError::UnsupportedFormat { .. })
        ));
        assert!(matches!(
            detect_format(Path::new("solver")),
            Err(ConfigError::UnsupportedFormat { .. })
        ));
    }

    #[test]
    fn defaults() {
        let config = SolverConfig::default();
        assert_eq!(config.max_attempts, 100_000);
        assert_eq!(config.seed, None);
        assert!(config.avoid_border_targets);
        assert_eq!(config.trace_options(), TraceOptions::default());
    }

    #[test]
    fn empty_toml_is_all_defaults() {
        let config: SolverConfig = toml::from_str("").unwrap();
        assert_eq!(config, SolverConfig::default());
    }

    #[test]
    fn load_toml() {
        let dir = make_test_dir("toml");
        let path = dir.join("solver.toml");
        fs::write(&path, "max_attempts = 50\nseed = 7\nmax_steps_per_beam = 200\n").unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.max_attempts, 50);
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.trace_options().max_steps_per_beam, Some(200));
        assert!(config.avoid_border_targets);
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn load_json() {
        let dir = make_test_dir("json");
        let path = dir.join("solver.json");
        fs::write(&path, r#"{"seed": 3, "avoid_border_targets": false}"#).unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.max_attempts, 100_000);
        assert_eq!(config.seed, Some(3));
        assert!(!config.avoid_border_targets);
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn unknown_field_is_a_parse_error() {
        let dir = make_test_dir("unknown");
        let path = dir.join("solver.toml");
        fs::write(&path, "attempts = 5\n").unwrap();

        assert!(matches!(load_config(&path), Err(ConfigError::Parse { .. })));
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn missing_file_is_io_error() {
        let result = load_config(Path::new("/nonexistent/lazor/solver.toml"));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }
}

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::render::PlotMode;
use crate::training::trainer::TrainerConfig;

/// Where the housing records come from.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    pub path: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        DataConfig {
            path: PathBuf::from("data/house_prices.csv"),
        }
    }
}

/// Display settings. `width`/`height` are the frame size in terminal cells.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub plot: PlotMode,
    pub width: u16,
    pub height: u16,
    /// Display refresh period in milliseconds.
    pub tick_ms: u64,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        DisplayConfig {
            plot: PlotMode::Fit,
            width: 80,
            height: 24,
            tick_ms: 33,
        }
    }
}

/// Top-level application configuration, loadable from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub data: DataConfig,
    pub training: TrainerConfig,
    pub display: DisplayConfig,
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config: AppConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the file
    /// does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            log::debug!("config file '{}' not found, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let t = &self.training;
        if t.epochs == 0 {
            return Err(ConfigError::Validation(
                "training.epochs must be > 0".into(),
            ));
        }
        if !(t.lr_slope.is_finite() && t.lr_slope >= 0.0) {
            return Err(ConfigError::Validation(
                "training.lr_slope must be >= 0".into(),
            ));
        }
        if !(t.lr_intercept.is_finite() && t.lr_intercept >= 0.0) {
            return Err(ConfigError::Validation(
                "training.lr_intercept must be >= 0".into(),
            ));
        }
        if !(t.init_range.is_finite() && t.init_range >= 0.0) {
            return Err(ConfigError::Validation(
                "training.init_range must be >= 0".into(),
            ));
        }

        let d = &self.display;
        if d.width < 20 || d.height < 8 {
            return Err(ConfigError::Validation(
                "display must be at least 20x8 cells".into(),
            ));
        }
        if d.tick_ms == 0 {
            return Err(ConfigError::Validation(
                "display.tick_ms must be > 0".into(),
            ));
        }

        Ok(())
    }

    /// Generate a TOML string with all default values (useful for creating
    /// example config files).
    pub fn default_toml() -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(&AppConfig::default())
    }
}

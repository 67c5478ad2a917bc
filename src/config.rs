use serde::{Deserialize, Serialize};

use crate::error::{FlatKnnError, Result};
use crate::types::KnnOverflowPolicy;

/// Top-level configuration.
///
/// Resolution order: built-in defaults, then the TOML file (if any), then
/// `FLATKNN_*` environment variables.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub search: SearchConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// `EnvFilter` directive, e.g. `info` or `flatknn=debug`.
    #[serde(default = "default_log_level")]
    pub level: String,
    /// `pretty` or `json`.
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Behavior when a Knn query asks for more points than the index holds.
    #[serde(default)]
    pub knn_overflow: KnnOverflowPolicy,
    /// Neighbor count used when a caller does not give one.
    #[serde(default = "default_knn")]
    pub default_knn: usize,
    /// Radius used when a caller does not give one.
    #[serde(default = "default_radius")]
    pub default_radius: f32,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            knn_overflow: KnnOverflowPolicy::default(),
            default_knn: default_knn(),
            default_radius: default_radius(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

fn default_knn() -> usize {
    1
}

fn default_radius() -> f32 {
    1.0
}

impl Config {
    /// Load configuration from an optional TOML file plus environment overrides.
    ///
    /// With `path == None`, `FLATKNN_CONFIG` names the file if set.
    pub fn load(path: Option<&str>) -> Result<Self> {
        let path = path
            .map(str::to_string)
            .or_else(|| std::env::var("FLATKNN_CONFIG").ok());

        let mut config = match path {
            Some(p) => {
                let text = std::fs::read_to_string(&p)?;
                Self::from_toml(&text)?
            }
            None => Self::default(),
        };

        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(level) = std::env::var("FLATKNN_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("FLATKNN_LOG_FORMAT") {
            self.logging.format = format;
        }
        if let Ok(policy) = std::env::var("FLATKNN_KNN_OVERFLOW") {
            self.search.knn_overflow = match policy.to_ascii_lowercase().as_str() {
                "clamp" => KnnOverflowPolicy::Clamp,
                "fail" => KnnOverflowPolicy::Fail,
                other => {
                    return Err(FlatKnnError::Config(format!(
                        "FLATKNN_KNN_OVERFLOW must be clamp or fail, got {other}"
                    )))
                }
            };
        }
        if let Ok(knn) = std::env::var("FLATKNN_DEFAULT_KNN") {
            self.search.default_knn = knn.parse().map_err(|_| {
                FlatKnnError::Config(format!("FLATKNN_DEFAULT_KNN is not an integer: {knn}"))
            })?;
        }
        if let Ok(radius) = std::env::var("FLATKNN_DEFAULT_RADIUS") {
            self.search.default_radius = radius.parse().map_err(|_| {
                FlatKnnError::Config(format!("FLATKNN_DEFAULT_RADIUS is not a number: {radius}"))
            })?;
        }
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        match self.logging.format.as_str() {
            "pretty" | "json" => {}
            other => {
                return Err(FlatKnnError::Config(format!(
                    "logging.format must be pretty or json, got {other}"
                )))
            }
        }
        let radius = self.search.default_radius;
        if !radius.is_finite() || radius < 0.0 {
            return Err(FlatKnnError::Config(format!(
                "search.default_radius must be a non-negative number, got {radius}"
            )));
        }
        Ok(())
    }
}

use crate::error::{PipelineError, Result};
use serde::Deserialize;
use std::fs;
use std::path::PathBuf;

/// Shared configuration for every pipeline stage and the query service.
///
/// A single instance is loaded at startup and injected into each stage;
/// no module computes its own paths.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub paths: DataPaths,
    pub filters: FilterConfig,
    pub server: ServerConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            paths: DataPaths::default(),
            filters: FilterConfig::default(),
            server: ServerConfig::default(),
        }
    }
}

/// Base data directory plus the named layer subdirectories.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DataPaths {
    pub base_dir: PathBuf,
    pub bronze: String,
    pub silver: String,
    pub gold: String,
    pub static_dir: String,
}

impl Default for DataPaths {
    fn default() -> Self {
        Self {
            base_dir: PathBuf::from("data"),
            bronze: "bronze".to_string(),
            silver: "silver".to_string(),
            gold: "gold".to_string(),
            static_dir: "static".to_string(),
        }
    }
}

impl DataPaths {
    pub fn bronze_dir(&self) -> PathBuf {
        self.base_dir.join(&self.bronze)
    }

    pub fn silver_dir(&self) -> PathBuf {
        self.base_dir.join(&self.silver)
    }

    pub fn gold_dir(&self) -> PathBuf {
        self.base_dir.join(&self.gold)
    }

    pub fn static_data_dir(&self) -> PathBuf {
        self.base_dir.join(&self.static_dir)
    }
}

/// Plausibility band and row filters for the transactions normalizer.
///
/// Defaults follow the strict cleaning variant: [3000, 40000] EUR/m2,
/// floor area above 5 m2.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    pub price_per_m2_min: f64,
    pub price_per_m2_max: f64,
    pub min_floor_area_m2: f64,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            price_per_m2_min: 3000.0,
            price_per_m2_max: 40000.0,
            min_floor_area_m2: 5.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
        }
    }
}

impl Config {
    /// Loads `config.toml` when present, falling back to defaults.
    /// `URBAN_DATA_DIR` overrides the base data directory.
    pub fn load() -> Result<Self> {
        let mut config = match fs::read_to_string("config.toml") {
            Ok(content) => toml::from_str(&content)
                .map_err(|e| PipelineError::Config(format!("failed to parse config.toml: {e}")))?,
            Err(_) => Config::default(),
        };

        if let Ok(dir) = std::env::var("URBAN_DATA_DIR") {
            if !dir.trim().is_empty() {
                config.paths.base_dir = PathBuf::from(dir);
            }
        }

        Ok(config)
    }
}

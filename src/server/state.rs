use crate::config::Config;
use crate::domain::GoldRow;
use crate::gold::fusion::GOLD_CSV;
use serde_json::Value;
use std::fs;
use tracing::{error, info, warn};

pub const GEOJSON_FILE: &str = "arrondissements.geojson";

/// Immutable application context built once at startup and shared
/// across request handlers. No handler mutates it, so concurrent reads
/// need no locking.
pub struct AppContext {
    pub gold: Vec<GoldRow>,
    pub geojson: Option<Value>,
    pub year_min: i32,
    pub year_max: i32,
}

impl AppContext {
    /// Loads the gold table and the boundary geometry. Either load may
    /// fail without crashing: the affected endpoints degrade to
    /// service-unavailable responses.
    pub fn load(config: &Config) -> Self {
        let gold = match Self::load_gold(config) {
            Ok(rows) => {
                info!(rows = rows.len(), "gold table loaded");
                rows
            }
            Err(e) => {
                error!("failed to load the gold table, serving degraded: {e}");
                Vec::new()
            }
        };

        let geojson_path = config.paths.static_data_dir().join(GEOJSON_FILE);
        let geojson = match fs::read_to_string(&geojson_path)
            .map_err(|e| e.to_string())
            .and_then(|raw| serde_json::from_str(&raw).map_err(|e| e.to_string()))
        {
            Ok(value) => {
                info!("boundary geometry loaded");
                Some(value)
            }
            Err(e) => {
                warn!(path = %geojson_path.display(), "boundary geometry unavailable: {e}");
                None
            }
        };

        Self::new(gold, geojson)
    }

    pub fn new(gold: Vec<GoldRow>, geojson: Option<Value>) -> Self {
        let year_min = gold.iter().map(|r| r.annee_mutation).min().unwrap_or(0);
        let year_max = gold.iter().map(|r| r.annee_mutation).max().unwrap_or(0);
        Self {
            gold,
            geojson,
            year_min,
            year_max,
        }
    }

    fn load_gold(config: &Config) -> Result<Vec<GoldRow>, String> {
        let path = config.paths.gold_dir().join(GOLD_CSV);
        let mut reader = csv::Reader::from_path(&path)
            .map_err(|e| format!("{}: {e}", path.display()))?;
        reader
            .deserialize()
            .collect::<csv::Result<Vec<GoldRow>>>()
            .map_err(|e| e.to_string())
    }

    pub fn has_data(&self) -> bool {
        !self.gold.is_empty()
    }

    /// Sorted distinct district identifiers present in the table.
    pub fn districts(&self) -> Vec<u8> {
        let mut districts: Vec<u8> = self.gold.iter().map(|r| r.arrondissement).collect();
        districts.sort_unstable();
        districts.dedup();
        districts
    }

    pub fn has_district(&self, arrondissement: i64) -> bool {
        self.gold
            .iter()
            .any(|r| i64::from(r.arrondissement) == arrondissement)
    }
}

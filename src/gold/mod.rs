//! Gold layer: indicator aggregators and the fusion engine.
//!
//! Aggregators are pure transforms over silver tables; the fusion
//! engine joins their outputs into the analytical table. Any missing
//! or empty dependency aborts the stage, since the final table has no
//! meaningful partial form.

pub mod accidents;
pub mod environment;
pub mod fusion;
pub mod prices;
pub mod social_share;
pub mod typology;

use crate::config::Config;
use crate::error::{PipelineError, Result};
use serde::de::DeserializeOwned;

/// Loads one silver table, failing with `JoinIncomplete` when the file
/// is absent or holds no rows.
pub fn load_silver<T: DeserializeOwned>(
    config: &Config,
    table: &str,
    filename: &str,
) -> Result<Vec<T>> {
    let path = config.paths.silver_dir().join(filename);
    if !path.exists() {
        return Err(PipelineError::JoinIncomplete {
            table: table.to_string(),
        });
    }
    let mut reader = csv::Reader::from_path(&path)?;
    let rows: Vec<T> = reader.deserialize().collect::<csv::Result<Vec<T>>>()?;
    if rows.is_empty() {
        return Err(PipelineError::JoinIncomplete {
            table: table.to_string(),
        });
    }
    Ok(rows)
}

/// Median of a sample; mean of the two middle values for even counts.
pub fn median(values: &mut [f64]) -> f64 {
    debug_assert!(!values.is_empty());
    values.sort_by(|a, b| a.total_cmp(b));
    let mid = values.len() / 2;
    if values.len() % 2 == 1 {
        values[mid]
    } else {
        (values[mid - 1] + values[mid]) / 2.0
    }
}

/// Percentage of a total; undefined (never zero) on a non-positive
/// denominator.
pub fn pct_share(numerator: f64, denominator: f64) -> Option<f64> {
    if denominator > 0.0 {
        Some(numerator / denominator * 100.0)
    } else {
        None
    }
}

pub fn round0(value: f64) -> f64 {
    value.round()
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

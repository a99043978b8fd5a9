//! Normalizer for the street-trees extract.

use crate::config::Config;
use crate::domain::{district_in_bounds, TreeRecord};
use crate::error::Result;
use crate::silver::{bronze_path, write_silver, RawFrame};
use metrics::counter;
use regex::Regex;
use std::collections::BTreeMap;
use tracing::info;

pub const SOURCE: &str = "les_arbres";
pub const BRONZE_FILE: &str = "les-arbres.csv";
pub const SILVER_FILE: &str = "arbres_silver.csv";

const COL_DISTRICT: &str = "ARRONDISSEMENT";

/// Cleans the trees extract: the district is embedded in a free-text
/// label ("PARIS 11E ARRDT"); rows without a valid district number
/// (BOIS DE VINCENNES, BOIS DE BOULOGNE) are dropped. The indicator is
/// a plain row count per district.
pub fn clean_trees(config: &Config) -> Result<Vec<TreeRecord>> {
    let path = bronze_path(config, SOURCE, BRONZE_FILE)?;
    let frame = RawFrame::load(SOURCE, &path, b';')?;
    let district_idx = frame.columns(SOURCE, &[COL_DISTRICT])?[0];

    let number = Regex::new(r"(\d+)").expect("static regex");
    let mut counts: BTreeMap<u8, u32> = BTreeMap::new();
    let mut dropped = 0usize;
    for row in &frame.rows {
        let label = row.get(district_idx).unwrap_or("");
        let parsed = number
            .captures(label)
            .and_then(|c| c[1].parse::<i64>().ok())
            .and_then(district_in_bounds);
        match parsed {
            Some(arrondissement) => *counts.entry(arrondissement).or_insert(0) += 1,
            None => dropped += 1,
        }
    }

    let records: Vec<TreeRecord> = counts
        .into_iter()
        .map(|(arrondissement, nombre_arbres)| TreeRecord {
            arrondissement,
            nombre_arbres,
        })
        .collect();

    counter!("silver_rows_dropped_total", "source" => SOURCE).increment(dropped as u64);
    info!(source = SOURCE, districts = records.len(), dropped, "normalized trees");
    write_silver(config, SILVER_FILE, &records)?;
    Ok(records)
}

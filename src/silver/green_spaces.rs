//! Normalizer for the green-spaces extract.

use crate::config::Config;
use crate::domain::{district_from_code, GreenSpaceRecord};
use crate::error::Result;
use crate::silver::{bronze_path, parse_f64_opt, write_silver, RawFrame};
use metrics::counter;
use std::collections::BTreeMap;
use tracing::info;

pub const SOURCE: &str = "espaces_verts";
pub const BRONZE_FILE: &str = "espaces_verts.csv";
pub const SILVER_FILE: &str = "espaces_verts_silver.csv";

const COL_POSTCODE: &str = "adresse_codepostal";
const COL_AREA: &str = "poly_area";

/// Cleans the green-spaces extract: district from the postal code,
/// surface summed per district.
pub fn clean_green_spaces(config: &Config) -> Result<Vec<GreenSpaceRecord>> {
    let path = bronze_path(config, SOURCE, BRONZE_FILE)?;
    let frame = RawFrame::load(SOURCE, &path, b';')?;
    let idx = frame.columns(SOURCE, &[COL_POSTCODE, COL_AREA])?;
    let (postcode, area) = (idx[0], idx[1]);

    let mut sums: BTreeMap<u8, f64> = BTreeMap::new();
    let mut dropped = 0usize;
    for row in &frame.rows {
        let kept = district_from_code(row.get(postcode).unwrap_or(""))
            .zip(parse_f64_opt(row.get(area).unwrap_or("")));
        match kept {
            Some((arrondissement, surface)) => {
                *sums.entry(arrondissement).or_insert(0.0) += surface;
            }
            None => dropped += 1,
        }
    }

    let records: Vec<GreenSpaceRecord> = sums
        .into_iter()
        .map(|(arrondissement, surface_espaces_verts_m2)| GreenSpaceRecord {
            arrondissement,
            surface_espaces_verts_m2,
        })
        .collect();

    counter!("silver_rows_dropped_total", "source" => SOURCE).increment(dropped as u64);
    info!(source = SOURCE, districts = records.len(), dropped, "normalized green spaces");
    write_silver(config, SILVER_FILE, &records)?;
    Ok(records)
}

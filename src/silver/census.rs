//! Normalizer for the INSEE census housing-typology extract.

use crate::config::Config;
use crate::domain::{district_from_code, CensusRecord};
use crate::error::Result;
use crate::silver::{bronze_path, parse_f64_opt, write_silver, RawFrame};
use metrics::counter;
use std::collections::BTreeMap;
use tracing::info;

pub const SOURCE: &str = "insee_logement";
pub const BRONZE_FILE: &str = "base-cc-logement-2021.CSV";
pub const SILVER_FILE: &str = "insee_logement_silver.csv";

const COL_GEO: &str = "CODGEO";
/// Raw per-bracket dwelling counts, in output order.
const COUNT_COLS: &[&str] = &[
    "P21_LOG",
    "P21_RP_1P",
    "P21_RP_2P",
    "P21_RP_3P",
    "P21_RP_4P",
    "P21_RP_5PP",
    "P21_MAISON",
    "P21_APPART",
];

/// Cleans the census extract: Paris communes only (CODGEO `751xx`),
/// dwelling counts summed per district since the census may carry
/// several finer-grained rows per commune.
pub fn clean_census(config: &Config) -> Result<Vec<CensusRecord>> {
    let path = bronze_path(config, SOURCE, BRONZE_FILE)?;
    let frame = RawFrame::load(SOURCE, &path, b';')?;
    let geo_idx = frame.columns(SOURCE, &[COL_GEO])?[0];
    let count_idx = frame.columns(SOURCE, COUNT_COLS)?;

    let mut sums: BTreeMap<u8, [f64; 8]> = BTreeMap::new();
    let mut dropped = 0usize;
    for row in &frame.rows {
        let codgeo = row.get(geo_idx).unwrap_or("").trim();
        if !codgeo.starts_with("751") {
            dropped += 1;
            continue;
        }
        let Some(arrondissement) = district_from_code(codgeo) else {
            dropped += 1;
            continue;
        };
        let entry = sums.entry(arrondissement).or_insert([0.0; 8]);
        for (slot, &col) in entry.iter_mut().zip(count_idx.iter()) {
            *slot += parse_f64_opt(row.get(col).unwrap_or("")).unwrap_or(0.0);
        }
    }

    let records: Vec<CensusRecord> = sums
        .into_iter()
        .map(|(arrondissement, c)| CensusRecord {
            arrondissement,
            nb_logmt_total_parc: c[0],
            nb_rp_1p: c[1],
            nb_rp_2p: c[2],
            nb_rp_3p: c[3],
            nb_rp_4p: c[4],
            nb_rp_5pp: c[5],
            nb_maisons_total: c[6],
            nb_appartements_total: c[7],
        })
        .collect();

    counter!("silver_rows_dropped_total", "source" => SOURCE).increment(dropped as u64);
    info!(source = SOURCE, districts = records.len(), dropped, "normalized census");
    write_silver(config, SILVER_FILE, &records)?;
    Ok(records)
}

//! Normalizer for the Filosofi median-income extract.

use crate::config::Config;
use crate::domain::{district_from_code, IncomeRecord};
use crate::error::Result;
use crate::silver::{bronze_path, parse_f64_opt, write_silver, RawFrame};
use metrics::counter;
use tracing::info;

pub const SOURCE: &str = "filosofi_revenus";
pub const BRONZE_FILE: &str = "filosofi_revenus.csv";
pub const SILVER_FILE: &str = "filosofi_revenus_paris_silver.csv";

const COL_GEO: &str = "GEO";
const COL_INCOME: &str = "Niveau_de_vie_median_EUR_AN";

/// Cleans the income extract: Paris districts only, median standard of
/// living per district. An unparseable income drops the row since the
/// field is the table's sole payload.
pub fn clean_income(config: &Config) -> Result<Vec<IncomeRecord>> {
    let path = bronze_path(config, SOURCE, BRONZE_FILE)?;
    let frame = RawFrame::load(SOURCE, &path, b';')?;
    let idx = frame.columns(SOURCE, &[COL_GEO, COL_INCOME])?;
    let (geo, income) = (idx[0], idx[1]);

    let mut records = Vec::new();
    let mut dropped = 0usize;
    for row in &frame.rows {
        let code = row.get(geo).unwrap_or("").trim();
        if !code.starts_with("751") {
            dropped += 1;
            continue;
        }
        let kept = district_from_code(code).and_then(|arrondissement| {
            parse_f64_opt(row.get(income).unwrap_or("")).map(|niveau_de_vie_median_eur_an| {
                IncomeRecord {
                    arrondissement,
                    niveau_de_vie_median_eur_an,
                }
            })
        });
        match kept {
            Some(record) => records.push(record),
            None => dropped += 1,
        }
    }

    counter!("silver_rows_dropped_total", "source" => SOURCE).increment(dropped as u64);
    info!(source = SOURCE, kept = records.len(), dropped, "normalized income");
    write_silver(config, SILVER_FILE, &records)?;
    Ok(records)
}

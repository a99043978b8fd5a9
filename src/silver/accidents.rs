//! Normalizer for the road-accident extract.

use crate::config::Config;
use crate::domain::{district_from_code, AccidentRecord};
use crate::error::Result;
use crate::silver::{bronze_path, parse_f64_opt, parse_year, write_silver, RawFrame};
use metrics::counter;
use tracing::info;

pub const SOURCE: &str = "accidentologie";
pub const BRONZE_FILE: &str = "accidentologie.csv";
pub const SILVER_FILE: &str = "accidentologie_paris_silver.csv";

const COL_CODE: &str = "Code INSEE";
const COL_DATE: &str = "Date";
const COL_LEGER: &str = "Blessés légers";
const COL_HOSPITALISE: &str = "Blessés hospitalisés";
const COL_TUE: &str = "Tués";

/// Cleans the accident extract: district from the commune code, year
/// from the accident date. A missing severity count means "not
/// reported" and is filled with zero before any aggregation; an
/// invalid key drops the row.
pub fn clean_accidents(config: &Config) -> Result<Vec<AccidentRecord>> {
    let path = bronze_path(config, SOURCE, BRONZE_FILE)?;
    let frame = RawFrame::load(SOURCE, &path, b';')?;
    let idx = frame.columns(
        SOURCE,
        &[COL_CODE, COL_DATE, COL_LEGER, COL_HOSPITALISE, COL_TUE],
    )?;
    let (code, date, leger, hospitalise, tue) = (idx[0], idx[1], idx[2], idx[3], idx[4]);

    let count = |row: &csv::StringRecord, i: usize| -> u32 {
        parse_f64_opt(row.get(i).unwrap_or(""))
            .map(|v| v.max(0.0) as u32)
            .unwrap_or(0)
    };

    let mut records = Vec::new();
    let mut dropped = 0usize;
    for row in &frame.rows {
        let insee = row.get(code).unwrap_or("").trim();
        if !insee.starts_with("751") {
            dropped += 1;
            continue;
        }
        let kept = district_from_code(insee).and_then(|arrondissement| {
            parse_year(row.get(date).unwrap_or("")).map(|annee| AccidentRecord {
                arrondissement,
                annee,
                nb_blesses_legers: count(row, leger),
                nb_blesses_hospitalises: count(row, hospitalise),
                nb_tues: count(row, tue),
            })
        });
        match kept {
            Some(record) => records.push(record),
            None => dropped += 1,
        }
    }

    counter!("silver_rows_dropped_total", "source" => SOURCE).increment(dropped as u64);
    info!(source = SOURCE, kept = records.len(), dropped, "normalized accidents");
    write_silver(config, SILVER_FILE, &records)?;
    Ok(records)
}

//! Normalizer for the financed social-housing extract.

use crate::config::Config;
use crate::domain::{district_in_bounds, SocialHousingRecord};
use crate::error::Result;
use crate::silver::{bronze_path, parse_f64_opt, write_silver, RawFrame};
use metrics::counter;
use tracing::info;

pub const SOURCE: &str = "logements_sociaux";
pub const BRONZE_FILE: &str = "logements_sociaux.csv";
pub const SILVER_FILE: &str = "logements_sociaux_silver.csv";

const COL_DISTRICT: &str = "Arrondissement";
const COL_FINANCED: &str = "Nombre total de logements financés";

/// Cleans the social-housing financing records: district key in bounds,
/// unit counts coerced with malformed values treated as zero (counts
/// mean "nothing reported", unlike ratio fields).
pub fn clean_social_housing(config: &Config) -> Result<Vec<SocialHousingRecord>> {
    let path = bronze_path(config, SOURCE, BRONZE_FILE)?;
    let frame = RawFrame::load(SOURCE, &path, b';')?;
    let idx = frame.columns(SOURCE, &[COL_DISTRICT, COL_FINANCED])?;
    let (district, financed) = (idx[0], idx[1]);

    let mut records = Vec::new();
    let mut dropped = 0usize;
    for row in &frame.rows {
        let raw_district = row.get(district).unwrap_or("");
        let Some(arrondissement) = parse_f64_opt(raw_district)
            .filter(|f| f.fract() == 0.0)
            .and_then(|f| district_in_bounds(f as i64))
        else {
            dropped += 1;
            continue;
        };
        let nb_logmt_soc_finance =
            parse_f64_opt(row.get(financed).unwrap_or("")).unwrap_or(0.0);
        records.push(SocialHousingRecord {
            arrondissement,
            nb_logmt_soc_finance,
        });
    }

    counter!("silver_rows_dropped_total", "source" => SOURCE).increment(dropped as u64);
    info!(source = SOURCE, kept = records.len(), dropped, "normalized social housing");
    write_silver(config, SILVER_FILE, &records)?;
    Ok(records)
}

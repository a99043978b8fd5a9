//! Normalizer for the DVF property-transaction extract.

use crate::config::Config;
use crate::domain::{district_from_code, TransactionRecord};
use crate::error::Result;
use crate::silver::{bronze_path, parse_f64_opt, parse_year, write_silver, RawFrame};
use metrics::counter;
use tracing::info;

pub const SOURCE: &str = "dvf";
pub const BRONZE_FILE: &str = "valeurs_foncieres.csv.gz";
pub const SILVER_FILE: &str = "dvf_transactions_silver.csv";

const DEPT_PARIS: &str = "75";
const REQUIRED: &[&str] = &[
    "code_departement",
    "code_commune",
    "date_mutation",
    "nature_mutation",
    "nombre_lots",
    "type_local",
    "surface_reelle_bati",
    "valeur_fonciere",
    "nombre_pieces_principales",
];

/// Cleans the DVF extract: Paris-only residential sales, single lot,
/// derived price per m2 inside the plausibility band.
pub fn clean_transactions(config: &Config) -> Result<Vec<TransactionRecord>> {
    let path = bronze_path(config, SOURCE, BRONZE_FILE)?;
    let frame = RawFrame::load(SOURCE, &path, b',')?;
    let idx = frame.columns(SOURCE, REQUIRED)?;
    let [dept, commune, date, nature, lots, type_local, surface, valeur, pieces] =
        [idx[0], idx[1], idx[2], idx[3], idx[4], idx[5], idx[6], idx[7], idx[8]];

    let filters = &config.filters;
    let mut records = Vec::new();
    let mut dropped = 0usize;
    for row in &frame.rows {
        let field = |i: usize| row.get(i).unwrap_or("").trim();

        let kept = (|| {
            if field(dept) != DEPT_PARIS || field(nature) != "Vente" {
                return None;
            }
            if parse_f64_opt(field(lots))? != 1.0 {
                return None;
            }
            let type_local = field(type_local);
            if type_local != "Appartement" && type_local != "Maison" {
                return None;
            }
            let annee_mutation = parse_year(field(date))?;
            let arrondissement = district_from_code(field(commune))?;
            let surface = parse_f64_opt(field(surface))?;
            if surface <= filters.min_floor_area_m2 {
                return None;
            }
            let valeur = parse_f64_opt(field(valeur))?;
            let prix_m2 = valeur / surface;
            if prix_m2 < filters.price_per_m2_min || prix_m2 > filters.price_per_m2_max {
                return None;
            }
            let nombre_pieces_principales = parse_f64_opt(field(pieces))?;
            Some(TransactionRecord {
                arrondissement,
                annee_mutation,
                prix_m2,
                type_local: type_local.to_string(),
                nombre_pieces_principales,
            })
        })();

        match kept {
            Some(record) => records.push(record),
            None => dropped += 1,
        }
    }

    counter!("silver_rows_dropped_total", "source" => SOURCE).increment(dropped as u64);
    info!(source = SOURCE, kept = records.len(), dropped, "normalized transactions");
    write_silver(config, SILVER_FILE, &records)?;
    Ok(records)
}

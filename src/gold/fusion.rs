//! Fusion engine: joins every indicator table into the analytical
//! (gold) table and persists it as CSV and JSON.

use crate::config::Config;
use crate::domain::{FillPolicy, GoldRow, IncomeRecord};
use crate::error::{PipelineError, Result};
use crate::gold::accidents::AccidentYearRow;
use crate::gold::environment::EnvironmentRow;
use crate::gold::prices::PriceRow;
use crate::gold::social_share::SocialShareRow;
use crate::gold::typology::TypologyRow;
use crate::gold::{round0, round2};
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::path::PathBuf;
use tracing::info;

pub const GOLD_CSV: &str = "paris_logement_gold.csv";
pub const GOLD_JSON: &str = "paris_logement_gold.json";

/// Per-field null policy, applied mechanically during the joins.
/// Counts fill with zero when a source has no matching rows; ratios
/// and broadcast statics stay undefined.
pub const FIELD_POLICIES: &[(&str, FillPolicy)] = &[
    ("var_an_pct", FillPolicy::NullFill),
    ("nb_blesses_legers", FillPolicy::ZeroFill),
    ("nb_blesses_hospitalises", FillPolicy::ZeroFill),
    ("nb_tues", FillPolicy::ZeroFill),
    ("niveau_de_vie_median_eur_an", FillPolicy::NullFill),
    ("part_logmt_sociaux_pct", FillPolicy::NullFill),
    ("part_rp_1p_pct", FillPolicy::NullFill),
    ("part_rp_2p_pct", FillPolicy::NullFill),
    ("part_rp_3p_pct", FillPolicy::NullFill),
    ("part_rp_4p_et_plus_pct", FillPolicy::NullFill),
    ("part_maisons_pct", FillPolicy::NullFill),
    ("surface_espaces_verts_m2", FillPolicy::ZeroFill),
    ("nombre_arbres", FillPolicy::ZeroFill),
];

fn policy_for(field: &str) -> FillPolicy {
    FIELD_POLICIES
        .iter()
        .find(|(name, _)| *name == field)
        .map(|(_, policy)| *policy)
        .unwrap_or(FillPolicy::NullFill)
}

fn resolve_f64(field: &str, value: Option<f64>) -> Option<f64> {
    match policy_for(field) {
        FillPolicy::ZeroFill => Some(value.unwrap_or(0.0)),
        _ => value,
    }
}

fn resolve_u32(field: &str, value: Option<u32>) -> u32 {
    debug_assert_eq!(policy_for(field), FillPolicy::ZeroFill);
    value.unwrap_or(0)
}

/// All indicator tables entering the fusion.
pub struct GoldInputs {
    pub prices: Vec<PriceRow>,
    pub accidents: Vec<AccidentYearRow>,
    pub income: Vec<IncomeRecord>,
    pub social: Vec<SocialShareRow>,
    pub typology: Vec<TypologyRow>,
    pub environment: Vec<EnvironmentRow>,
}

/// Joins every indicator onto the price-history spine.
///
/// The spine defines the (district, year) grain: per-year accident
/// counts join on both keys, static per-district indicators broadcast
/// across every year of their district. The final rounding (price 0
/// decimals, percentages 2) happens here, once, after all joins.
pub fn fuse(inputs: &GoldInputs) -> Result<Vec<GoldRow>> {
    if inputs.prices.is_empty() {
        return Err(PipelineError::JoinIncomplete {
            table: "price_history".to_string(),
        });
    }

    let accidents: BTreeMap<(u8, i32), &AccidentYearRow> = inputs
        .accidents
        .iter()
        .map(|a| ((a.arrondissement, a.annee), a))
        .collect();
    let income: BTreeMap<u8, f64> = inputs
        .income
        .iter()
        .map(|i| (i.arrondissement, i.niveau_de_vie_median_eur_an))
        .collect();
    let social: BTreeMap<u8, Option<f64>> = inputs
        .social
        .iter()
        .map(|s| (s.arrondissement, s.part_logmt_sociaux_pct))
        .collect();
    let typology: BTreeMap<u8, &TypologyRow> = inputs
        .typology
        .iter()
        .map(|t| (t.arrondissement, t))
        .collect();
    let environment: BTreeMap<u8, &EnvironmentRow> = inputs
        .environment
        .iter()
        .map(|e| (e.arrondissement, e))
        .collect();

    let rows = inputs
        .prices
        .iter()
        .map(|price| {
            let key = (price.arrondissement, price.annee);
            let accident = accidents.get(&key);
            let typo = typology.get(&price.arrondissement);
            let env = environment.get(&price.arrondissement);

            let mut row = GoldRow {
                arrondissement: price.arrondissement,
                annee_mutation: price.annee,
                prix_m2_median: round0(price.prix_m2_median),
                var_an_pct: resolve_f64("var_an_pct", price.var_an_pct),
                nb_blesses_legers: resolve_u32(
                    "nb_blesses_legers",
                    accident.map(|a| a.nb_blesses_legers),
                ),
                nb_blesses_hospitalises: resolve_u32(
                    "nb_blesses_hospitalises",
                    accident.map(|a| a.nb_blesses_hospitalises),
                ),
                nb_tues: resolve_u32("nb_tues", accident.map(|a| a.nb_tues)),
                niveau_de_vie_median_eur_an: resolve_f64(
                    "niveau_de_vie_median_eur_an",
                    income.get(&price.arrondissement).copied(),
                ),
                part_logmt_sociaux_pct: resolve_f64(
                    "part_logmt_sociaux_pct",
                    social.get(&price.arrondissement).copied().flatten(),
                ),
                part_rp_1p_pct: resolve_f64(
                    "part_rp_1p_pct",
                    typo.and_then(|t| t.part_rp_1p_pct),
                ),
                part_rp_2p_pct: resolve_f64(
                    "part_rp_2p_pct",
                    typo.and_then(|t| t.part_rp_2p_pct),
                ),
                part_rp_3p_pct: resolve_f64(
                    "part_rp_3p_pct",
                    typo.and_then(|t| t.part_rp_3p_pct),
                ),
                part_rp_4p_et_plus_pct: resolve_f64(
                    "part_rp_4p_et_plus_pct",
                    typo.and_then(|t| t.part_rp_4p_et_plus_pct),
                ),
                part_maisons_pct: resolve_f64(
                    "part_maisons_pct",
                    typo.and_then(|t| t.part_maisons_pct),
                ),
                surface_espaces_verts_m2: resolve_f64(
                    "surface_espaces_verts_m2",
                    env.map(|e| e.surface_espaces_verts_m2),
                )
                .unwrap_or(0.0),
                nombre_arbres: resolve_u32("nombre_arbres", env.map(|e| e.nombre_arbres)),
            };

            row.var_an_pct = row.var_an_pct.map(round2);
            row.part_logmt_sociaux_pct = row.part_logmt_sociaux_pct.map(round2);
            row.part_rp_1p_pct = row.part_rp_1p_pct.map(round2);
            row.part_rp_2p_pct = row.part_rp_2p_pct.map(round2);
            row.part_rp_3p_pct = row.part_rp_3p_pct.map(round2);
            row.part_rp_4p_et_plus_pct = row.part_rp_4p_et_plus_pct.map(round2);
            row.part_maisons_pct = row.part_maisons_pct.map(round2);
            row
        })
        .collect();

    Ok(rows)
}

/// Persists the analytical table as both a delimited file and a JSON
/// record array. Undefined numerics become an empty CSV field and a
/// JSON null, never NaN, infinity or a fabricated zero.
pub fn write_gold(config: &Config, rows: &[GoldRow]) -> Result<(PathBuf, PathBuf)> {
    let gold_dir = config.paths.gold_dir();
    fs::create_dir_all(&gold_dir)?;

    let csv_path = gold_dir.join(GOLD_CSV);
    let mut writer = csv::Writer::from_path(&csv_path)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;

    let json_path = gold_dir.join(GOLD_JSON);
    let file = File::create(&json_path)?;
    serde_json::to_writer_pretty(file, rows)?;

    info!(
        rows = rows.len(),
        csv = %csv_path.display(),
        json = %json_path.display(),
        "wrote gold table"
    );
    Ok((csv_path, json_path))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inputs() -> GoldInputs {
        GoldInputs {
            prices: vec![
                PriceRow {
                    arrondissement: 1,
                    annee: 2020,
                    prix_m2_median: 10000.0,
                    var_an_pct: None,
                },
                PriceRow {
                    arrondissement: 1,
                    annee: 2021,
                    prix_m2_median: 11000.0,
                    var_an_pct: Some(10.0),
                },
                PriceRow {
                    arrondissement: 6,
                    annee: 2021,
                    prix_m2_median: 13000.0,
                    var_an_pct: None,
                },
            ],
            accidents: vec![AccidentYearRow {
                arrondissement: 1,
                annee: 2021,
                nb_blesses_legers: 5,
                nb_blesses_hospitalises: 2,
                nb_tues: 1,
            }],
            income: vec![IncomeRecord {
                arrondissement: 1,
                niveau_de_vie_median_eur_an: 32000.0,
            }],
            social: vec![SocialShareRow {
                arrondissement: 1,
                part_logmt_sociaux_pct: Some(12.3456),
            }],
            typology: vec![TypologyRow {
                arrondissement: 1,
                nb_logmt_total_parc: 1000.0,
                part_rp_1p_pct: Some(10.111),
                part_rp_2p_pct: Some(20.0),
                part_rp_3p_pct: Some(30.0),
                part_rp_4p_et_plus_pct: Some(39.889),
                part_maisons_pct: Some(1.5),
            }],
            environment: vec![EnvironmentRow {
                arrondissement: 1,
                surface_espaces_verts_m2: 2500.0,
                nombre_arbres: 420,
            }],
        }
    }

    #[test]
    fn spine_rows_are_all_present() {
        let rows = fuse(&inputs()).unwrap();
        let keys: Vec<(u8, i32)> = rows
            .iter()
            .map(|r| (r.arrondissement, r.annee_mutation))
            .collect();
        assert_eq!(keys, vec![(1, 2020), (1, 2021), (6, 2021)]);
    }

    #[test]
    fn unmatched_accident_counts_zero_fill() {
        let rows = fuse(&inputs()).unwrap();
        // (1, 2020) has no accident row
        assert_eq!(rows[0].nb_blesses_legers, 0);
        assert_eq!(rows[0].nb_tues, 0);
        // (1, 2021) matches
        assert_eq!(rows[1].nb_blesses_legers, 5);
        assert_eq!(rows[1].nb_tues, 1);
    }

    #[test]
    fn static_indicators_broadcast_across_years() {
        let rows = fuse(&inputs()).unwrap();
        assert_eq!(rows[0].part_maisons_pct, rows[1].part_maisons_pct);
        assert_eq!(
            rows[0].part_logmt_sociaux_pct,
            rows[1].part_logmt_sociaux_pct
        );
        assert_eq!(rows[0].nombre_arbres, rows[1].nombre_arbres);
        assert_eq!(
            rows[0].niveau_de_vie_median_eur_an,
            rows[1].niveau_de_vie_median_eur_an
        );
    }

    #[test]
    fn ratios_stay_undefined_for_unmatched_districts() {
        let rows = fuse(&inputs()).unwrap();
        let district6 = &rows[2];
        assert_eq!(district6.part_logmt_sociaux_pct, None);
        assert_eq!(district6.part_maisons_pct, None);
        assert_eq!(district6.niveau_de_vie_median_eur_an, None);
        // counts still zero-fill for the same district
        assert_eq!(district6.nb_blesses_legers, 0);
        assert_eq!(district6.surface_espaces_verts_m2, 0.0);
    }

    #[test]
    fn percentages_are_rounded_to_two_decimals() {
        let rows = fuse(&inputs()).unwrap();
        assert_eq!(rows[0].part_logmt_sociaux_pct, Some(12.35));
        assert_eq!(rows[0].part_rp_1p_pct, Some(10.11));
        assert_eq!(rows[0].part_rp_4p_et_plus_pct, Some(39.89));
    }

    #[test]
    fn empty_spine_is_join_incomplete() {
        let mut empty = inputs();
        empty.prices.clear();
        assert!(matches!(
            fuse(&empty).unwrap_err(),
            PipelineError::JoinIncomplete { .. }
        ));
    }

    #[test]
    fn policy_table_covers_every_joined_field() {
        assert_eq!(policy_for("nb_tues"), FillPolicy::ZeroFill);
        assert_eq!(policy_for("part_maisons_pct"), FillPolicy::NullFill);
        assert_eq!(policy_for("nombre_arbres"), FillPolicy::ZeroFill);
        assert_eq!(FIELD_POLICIES.len(), 13);
    }

    #[test]
    fn gold_files_encode_undefined_as_null_or_empty() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.paths.base_dir = dir.path().to_path_buf();
        let rows = fuse(&inputs()).unwrap();
        let (csv_path, json_path) = write_gold(&config, &rows).unwrap();

        let csv_content = std::fs::read_to_string(csv_path).unwrap();
        let first_data_line = csv_content.lines().nth(1).unwrap();
        // var_an_pct of the first year is an empty field, not 0 or NaN
        assert!(first_data_line.starts_with("1,2020,10000.0,,"));
        assert!(!csv_content.contains("NaN"));
        assert!(!csv_content.contains("inf"));

        let json_content = std::fs::read_to_string(json_path).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json_content).unwrap();
        assert_eq!(parsed[0]["var_an_pct"], serde_json::Value::Null);
        assert_eq!(parsed[1]["var_an_pct"], serde_json::json!(10.0));
    }
}

use serde::{Deserialize, Serialize};

/// Inclusive bounds of the Paris district (arrondissement) key.
pub const DISTRICT_MIN: u8 = 1;
pub const DISTRICT_MAX: u8 = 20;

/// Derives the district number from a zero-padded geographic code
/// (INSEE commune code `75101` or postal code `75011`): take the last
/// two characters and parse. Out-of-range or non-numeric codes yield
/// `None` and the row is dropped, never defaulted.
pub fn district_from_code(code: &str) -> Option<u8> {
    let trimmed = code.trim();
    if trimmed.is_empty() {
        return None;
    }
    let start = trimmed
        .char_indices()
        .rev()
        .nth(1)
        .map(|(i, _)| i)
        .unwrap_or(0);
    let last_two = &trimmed[start..];
    match last_two.parse::<u8>() {
        Ok(n) if (DISTRICT_MIN..=DISTRICT_MAX).contains(&n) => Some(n),
        _ => None,
    }
}

/// Bounds check for sources that carry the district as a plain number.
pub fn district_in_bounds(n: i64) -> Option<u8> {
    if (DISTRICT_MIN as i64..=DISTRICT_MAX as i64).contains(&n) {
        Some(n as u8)
    } else {
        None
    }
}

/// How a gold field resolves a missing value after the joins.
///
/// Counts mean "nothing reported" and fill with zero; ratios stay
/// undefined on a missing or zero denominator; invalid keys drop the
/// row before any join happens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FillPolicy {
    Drop,
    ZeroFill,
    NullFill,
}

// --- Silver records (column names are the on-disk header contract) ---

/// One cleaned real-estate sale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionRecord {
    #[serde(rename = "Arrondissement")]
    pub arrondissement: u8,
    pub annee_mutation: i32,
    pub prix_m2: f64,
    pub type_local: String,
    pub nombre_pieces_principales: f64,
}

/// One social-housing financing record, already keyed by district.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SocialHousingRecord {
    #[serde(rename = "Arrondissement")]
    pub arrondissement: u8,
    pub nb_logmt_soc_finance: f64,
}

/// INSEE census dwelling counts summed per district.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CensusRecord {
    #[serde(rename = "Arrondissement")]
    pub arrondissement: u8,
    pub nb_logmt_total_parc: f64,
    pub nb_rp_1p: f64,
    pub nb_rp_2p: f64,
    pub nb_rp_3p: f64,
    pub nb_rp_4p: f64,
    pub nb_rp_5pp: f64,
    pub nb_maisons_total: f64,
    pub nb_appartements_total: f64,
}

/// Filosofi median standard of living per district.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncomeRecord {
    #[serde(rename = "Arrondissement")]
    pub arrondissement: u8,
    pub niveau_de_vie_median_eur_an: f64,
}

/// One accident row with severity counts (missing counts were
/// zero-filled during normalization).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccidentRecord {
    #[serde(rename = "Arrondissement")]
    pub arrondissement: u8,
    pub annee: i32,
    pub nb_blesses_legers: u32,
    pub nb_blesses_hospitalises: u32,
    pub nb_tues: u32,
}

/// Green-space surface summed per district.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GreenSpaceRecord {
    #[serde(rename = "Arrondissement")]
    pub arrondissement: u8,
    #[serde(rename = "Surface_espaces_verts_m2")]
    pub surface_espaces_verts_m2: f64,
}

/// Street-tree count per district.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeRecord {
    #[serde(rename = "Arrondissement")]
    pub arrondissement: u8,
    #[serde(rename = "Nombre_arbres")]
    pub nombre_arbres: u32,
}

// --- Gold ---

/// One row of the analytical table: (district, year) grain, static
/// per-district indicators broadcast across years. Undefined numerics
/// are `None` and serialize as JSON null / empty CSV field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoldRow {
    #[serde(rename = "Arrondissement")]
    pub arrondissement: u8,
    pub annee_mutation: i32,
    pub prix_m2_median: f64,
    pub var_an_pct: Option<f64>,
    pub nb_blesses_legers: u32,
    pub nb_blesses_hospitalises: u32,
    pub nb_tues: u32,
    pub niveau_de_vie_median_eur_an: Option<f64>,
    pub part_logmt_sociaux_pct: Option<f64>,
    pub part_rp_1p_pct: Option<f64>,
    pub part_rp_2p_pct: Option<f64>,
    pub part_rp_3p_pct: Option<f64>,
    pub part_rp_4p_et_plus_pct: Option<f64>,
    pub part_maisons_pct: Option<f64>,
    #[serde(rename = "Surface_espaces_verts_m2")]
    pub surface_espaces_verts_m2: f64,
    #[serde(rename = "Nombre_arbres")]
    pub nombre_arbres: u32,
}

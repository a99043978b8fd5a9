use crate::domain::GoldRow;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

/// Structured error response: a status code and a reason, never a raw
/// stack trace.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub detail: String,
}

impl ApiError {
    pub fn bad_request(detail: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            detail: detail.into(),
        }
    }

    pub fn not_found(detail: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            detail: detail.into(),
        }
    }

    pub fn unavailable() -> Self {
        Self {
            status: StatusCode::SERVICE_UNAVAILABLE,
            detail: "Données non disponibles.".to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(serde_json::json!({ "detail": self.detail }));
        (self.status, body).into_response()
    }
}

#[derive(Debug, Serialize)]
pub struct ArrondissementsResponse {
    pub arrondissements: Vec<u8>,
    pub annee_min: i32,
    pub annee_max: i32,
}

/// Per-district record of the map endpoint: the price indicators and
/// housing shares for one year.
#[derive(Debug, Serialize)]
pub struct PrixRow {
    #[serde(rename = "Arrondissement")]
    pub arrondissement: u8,
    pub annee_mutation: i32,
    pub prix_m2_median: f64,
    pub var_an_pct: Option<f64>,
    pub part_logmt_sociaux_pct: Option<f64>,
    pub part_rp_1p_pct: Option<f64>,
    pub part_rp_2p_pct: Option<f64>,
    pub part_rp_3p_pct: Option<f64>,
    pub part_rp_4p_et_plus_pct: Option<f64>,
    pub part_maisons_pct: Option<f64>,
}

impl From<&GoldRow> for PrixRow {
    fn from(row: &GoldRow) -> Self {
        Self {
            arrondissement: row.arrondissement,
            annee_mutation: row.annee_mutation,
            prix_m2_median: row.prix_m2_median,
            var_an_pct: row.var_an_pct,
            part_logmt_sociaux_pct: row.part_logmt_sociaux_pct,
            part_rp_1p_pct: row.part_rp_1p_pct,
            part_rp_2p_pct: row.part_rp_2p_pct,
            part_rp_3p_pct: row.part_rp_3p_pct,
            part_rp_4p_et_plus_pct: row.part_rp_4p_et_plus_pct,
            part_maisons_pct: row.part_maisons_pct,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TimelinePoint {
    pub annee_mutation: i32,
    pub prix_m2_median: f64,
    pub var_an_pct: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct TimelineResponse {
    pub arrondissement: i64,
    pub timeline: Vec<TimelinePoint>,
}

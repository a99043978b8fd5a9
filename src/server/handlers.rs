use crate::server::models::{
    ApiError, ArrondissementsResponse, PrixRow, TimelinePoint, TimelineResponse,
};
use crate::server::state::AppContext;
use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;

pub async fn root() -> Json<Value> {
    Json(serde_json::json!({
        "message": "Bienvenue sur l'Urban Data Explorer API. Consultez /api pour les données."
    }))
}

/// Boundary geometry for the map, or an unavailability error.
pub async fn geojson(State(ctx): State<Arc<AppContext>>) -> Result<Json<Value>, ApiError> {
    match &ctx.geojson {
        Some(value) => Ok(Json(value.clone())),
        None => Err(ApiError::unavailable()),
    }
}

pub async fn arrondissements(
    State(ctx): State<Arc<AppContext>>,
) -> Result<Json<ArrondissementsResponse>, ApiError> {
    if !ctx.has_data() {
        return Err(ApiError::unavailable());
    }
    Ok(Json(ArrondissementsResponse {
        arrondissements: ctx.districts(),
        annee_min: ctx.year_min,
        annee_max: ctx.year_max,
    }))
}

#[derive(Debug, Deserialize)]
pub struct PrixQuery {
    pub annee: i32,
}

/// One record per district for the requested year.
pub async fn prix(
    State(ctx): State<Arc<AppContext>>,
    Query(query): Query<PrixQuery>,
) -> Result<Json<Vec<PrixRow>>, ApiError> {
    if !ctx.has_data() {
        return Err(ApiError::unavailable());
    }
    if query.annee < ctx.year_min || query.annee > ctx.year_max {
        return Err(ApiError::bad_request(format!(
            "Année non valide. Choisissez entre {} et {}.",
            ctx.year_min, ctx.year_max
        )));
    }

    let rows: Vec<PrixRow> = ctx
        .gold
        .iter()
        .filter(|r| r.annee_mutation == query.annee)
        .map(PrixRow::from)
        .collect();
    if rows.is_empty() {
        return Err(ApiError::not_found(format!(
            "Aucune donnée trouvée pour l'année {}.",
            query.annee
        )));
    }
    Ok(Json(rows))
}

#[derive(Debug, Deserialize)]
pub struct TimelineQuery {
    pub arr: i64,
}

/// Full year series of price indicators for one district.
pub async fn timeline(
    State(ctx): State<Arc<AppContext>>,
    Query(query): Query<TimelineQuery>,
) -> Result<Json<TimelineResponse>, ApiError> {
    if !ctx.has_data() {
        return Err(ApiError::unavailable());
    }
    if !ctx.has_district(query.arr) {
        return Err(ApiError::not_found(format!(
            "Arrondissement {} non trouvé.",
            query.arr
        )));
    }

    let timeline: Vec<TimelinePoint> = ctx
        .gold
        .iter()
        .filter(|r| i64::from(r.arrondissement) == query.arr)
        .map(|r| TimelinePoint {
            annee_mutation: r.annee_mutation,
            prix_m2_median: r.prix_m2_median,
            var_an_pct: r.var_an_pct,
        })
        .collect();
    Ok(Json(TimelineResponse {
        arrondissement: query.arr,
        timeline,
    }))
}

#[derive(Debug, Deserialize)]
pub struct ComparaisonQuery {
    pub arr1: i64,
    pub arr2: i64,
}

/// Full rows for both districts across all years.
pub async fn comparaison(
    State(ctx): State<Arc<AppContext>>,
    Query(query): Query<ComparaisonQuery>,
) -> Result<Json<Vec<crate::domain::GoldRow>>, ApiError> {
    if !ctx.has_data() {
        return Err(ApiError::unavailable());
    }
    if !ctx.has_district(query.arr1) || !ctx.has_district(query.arr2) {
        return Err(ApiError::bad_request(
            "Un ou les deux arrondissements ne sont pas valides.",
        ));
    }

    let rows: Vec<crate::domain::GoldRow> = ctx
        .gold
        .iter()
        .filter(|r| {
            let arr = i64::from(r.arrondissement);
            arr == query.arr1 || arr == query.arr2
        })
        .cloned()
        .collect();
    Ok(Json(rows))
}

//! Endpoint scenarios against an in-memory application context.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

use urban_explorer::domain::GoldRow;
use urban_explorer::server::router::app_router;
use urban_explorer::server::state::AppContext;

fn gold_row(arrondissement: u8, annee: i32, prix: f64) -> GoldRow {
    GoldRow {
        arrondissement,
        annee_mutation: annee,
        prix_m2_median: prix,
        var_an_pct: if annee > 2020 { Some(2.5) } else { None },
        nb_blesses_legers: 1,
        nb_blesses_hospitalises: 0,
        nb_tues: 0,
        niveau_de_vie_median_eur_an: Some(30000.0),
        part_logmt_sociaux_pct: Some(12.5),
        part_rp_1p_pct: Some(10.0),
        part_rp_2p_pct: Some(20.0),
        part_rp_3p_pct: Some(30.0),
        part_rp_4p_et_plus_pct: Some(40.0),
        part_maisons_pct: Some(1.2),
        surface_espaces_verts_m2: 1000.0,
        nombre_arbres: 150,
    }
}

/// Districts 1, 6 and 12, years 2020 through 2025.
fn loaded_context() -> Arc<AppContext> {
    let mut rows = Vec::new();
    for arrondissement in [1u8, 6, 12] {
        for annee in 2020..=2025 {
            rows.push(gold_row(arrondissement, annee, 10000.0 + f64::from(arrondissement)));
        }
    }
    let geojson = serde_json::json!({ "type": "FeatureCollection", "features": [] });
    Arc::new(AppContext::new(rows, Some(geojson)))
}

async fn get(context: Arc<AppContext>, uri: &str) -> (StatusCode, Value) {
    let app = app_router(context);
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

#[tokio::test]
async fn prix_returns_one_row_per_district_for_the_year() {
    let (status, body) = get(loaded_context(), "/api/prix?annee=2023").await;
    assert_eq!(status, StatusCode::OK);
    let rows = body.as_array().unwrap();
    assert_eq!(rows.len(), 3);
    assert!(rows.iter().all(|r| r["annee_mutation"] == 2023));
    let districts: Vec<i64> = rows
        .iter()
        .map(|r| r["Arrondissement"].as_i64().unwrap())
        .collect();
    assert_eq!(districts, vec![1, 6, 12]);
}

#[tokio::test]
async fn prix_rejects_years_outside_the_covered_range() {
    let (status, body) = get(loaded_context(), "/api/prix?annee=2019").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["detail"].as_str().unwrap().contains("2020"));

    let (status, _) = get(loaded_context(), "/api/prix?annee=2030").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn prix_covered_year_without_rows_is_not_found() {
    // 2021 sits inside the covered range but holds no rows
    let rows = vec![gold_row(1, 2020, 10000.0), gold_row(1, 2025, 11000.0)];
    let context = Arc::new(AppContext::new(rows, None));
    let (status, _) = get(context, "/api/prix?annee=2021").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn undefined_values_serialize_as_null() {
    let (_, body) = get(loaded_context(), "/api/prix?annee=2020").await;
    // 2020 is each district's first year: no year-over-year value
    assert_eq!(body[0]["var_an_pct"], Value::Null);
}

#[tokio::test]
async fn timeline_returns_the_full_series_for_one_district() {
    let (status, body) = get(loaded_context(), "/api/timeline?arr=6").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["arrondissement"], 6);
    let timeline = body["timeline"].as_array().unwrap();
    assert_eq!(timeline.len(), 6);
    assert_eq!(timeline[0]["annee_mutation"], 2020);
    assert_eq!(timeline[5]["annee_mutation"], 2025);
}

#[tokio::test]
async fn timeline_unknown_district_is_not_found() {
    let (status, _) = get(loaded_context(), "/api/timeline?arr=7").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn comparaison_returns_rows_for_exactly_two_districts() {
    let (status, body) = get(loaded_context(), "/api/comparaison?arr1=1&arr2=6").await;
    assert_eq!(status, StatusCode::OK);
    let rows = body.as_array().unwrap();
    assert_eq!(rows.len(), 12);
    assert!(rows
        .iter()
        .all(|r| r["Arrondissement"] == 1 || r["Arrondissement"] == 6));
}

#[tokio::test]
async fn comparaison_rejects_unknown_districts() {
    let (status, _) = get(loaded_context(), "/api/comparaison?arr1=1&arr2=99").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn arrondissements_lists_districts_and_year_range() {
    let (status, body) = get(loaded_context(), "/api/arrondissements").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["arrondissements"], serde_json::json!([1, 6, 12]));
    assert_eq!(body["annee_min"], 2020);
    assert_eq!(body["annee_max"], 2025);
}

#[tokio::test]
async fn geojson_round_trips_the_boundary_document() {
    let (status, body) = get(loaded_context(), "/api/geojson").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["type"], "FeatureCollection");
}

#[tokio::test]
async fn degraded_context_answers_service_unavailable() {
    let empty = Arc::new(AppContext::new(Vec::new(), None));
    for uri in [
        "/api/geojson",
        "/api/arrondissements",
        "/api/prix?annee=2023",
        "/api/timeline?arr=1",
        "/api/comparaison?arr1=1&arr2=6",
    ] {
        let (status, body) = get(empty.clone(), uri).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE, "uri: {uri}");
        assert!(body["detail"].is_string(), "uri: {uri}");
    }
}

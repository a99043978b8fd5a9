//! Price-history aggregator: median price per m2 and its year-over-year
//! change, per (district, year).

use crate::domain::TransactionRecord;
use crate::gold::{median, round0, round2};
use std::collections::BTreeMap;

/// One point of a district's price history. `var_an_pct` is undefined
/// for the first observed year of a district.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceRow {
    pub arrondissement: u8,
    pub annee: i32,
    pub prix_m2_median: f64,
    pub var_an_pct: Option<f64>,
}

/// Groups transactions by (district, year) and computes the median
/// price per m2, then the percentage change against the immediately
/// preceding observed year of the same district. Gap years are simply
/// not available as "previous".
pub fn aggregate(transactions: &[TransactionRecord]) -> Vec<PriceRow> {
    let mut groups: BTreeMap<(u8, i32), Vec<f64>> = BTreeMap::new();
    for t in transactions {
        groups
            .entry((t.arrondissement, t.annee_mutation))
            .or_default()
            .push(t.prix_m2);
    }

    // BTreeMap order is (district, year ascending), so the previous
    // entry of the same district is the immediately preceding year.
    let mut rows = Vec::with_capacity(groups.len());
    let mut previous: Option<(u8, f64)> = None;
    for ((arrondissement, annee), mut prices) in groups {
        let median_price = median(&mut prices);
        let var_an_pct = match previous {
            Some((prev_district, prev_median)) if prev_district == arrondissement => {
                Some((median_price - prev_median) / prev_median * 100.0)
            }
            _ => None,
        };
        previous = Some((arrondissement, median_price));
        rows.push(PriceRow {
            arrondissement,
            annee,
            prix_m2_median: round0(median_price),
            var_an_pct: var_an_pct.map(round2),
        });
    }
    rows
}

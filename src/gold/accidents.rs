//! Accident aggregator: severity counts per (district, year).

use crate::domain::AccidentRecord;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq)]
pub struct AccidentYearRow {
    pub arrondissement: u8,
    pub annee: i32,
    pub nb_blesses_legers: u32,
    pub nb_blesses_hospitalises: u32,
    pub nb_tues: u32,
}

/// Sums each severity count independently per (district, year).
/// Missing report fields were already zero-filled during
/// normalization, so plain sums are correct here.
pub fn aggregate(records: &[AccidentRecord]) -> Vec<AccidentYearRow> {
    let mut sums: BTreeMap<(u8, i32), (u32, u32, u32)> = BTreeMap::new();
    for r in records {
        let entry = sums.entry((r.arrondissement, r.annee)).or_insert((0, 0, 0));
        entry.0 += r.nb_blesses_legers;
        entry.1 += r.nb_blesses_hospitalises;
        entry.2 += r.nb_tues;
    }
    sums.into_iter()
        .map(
            |((arrondissement, annee), (legers, hospitalises, tues))| AccidentYearRow {
                arrondissement,
                annee,
                nb_blesses_legers: legers,
                nb_blesses_hospitalises: hospitalises,
                nb_tues: tues,
            },
        )
        .collect()
}

//! Social-housing share aggregator.

use crate::domain::SocialHousingRecord;
use crate::gold::pct_share;
use crate::gold::typology::TypologyRow;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq)]
pub struct SocialShareRow {
    pub arrondissement: u8,
    pub part_logmt_sociaux_pct: Option<f64>,
}

/// Sums financed social-housing units per district (all financing
/// years together) and relates them to the census total housing stock.
/// A district without a known or positive stock gets an undefined
/// share, never zero.
pub fn aggregate(social: &[SocialHousingRecord], typology: &[TypologyRow]) -> Vec<SocialShareRow> {
    let mut financed: BTreeMap<u8, f64> = BTreeMap::new();
    for record in social {
        *financed.entry(record.arrondissement).or_insert(0.0) += record.nb_logmt_soc_finance;
    }

    let stock: BTreeMap<u8, f64> = typology
        .iter()
        .map(|t| (t.arrondissement, t.nb_logmt_total_parc))
        .collect();

    financed
        .into_iter()
        .map(|(arrondissement, units)| SocialShareRow {
            arrondissement,
            part_logmt_sociaux_pct: stock
                .get(&arrondissement)
                .and_then(|&total| pct_share(units, total)),
        })
        .collect()
}

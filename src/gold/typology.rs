//! Typology aggregator: housing-type percentage breakdown per district.

use crate::domain::CensusRecord;
use crate::gold::pct_share;

/// Housing-stock shares for one district. Shares are undefined (not
/// zero) when their denominator is empty. `nb_logmt_total_parc` is
/// carried along for the social-housing share join.
#[derive(Debug, Clone, PartialEq)]
pub struct TypologyRow {
    pub arrondissement: u8,
    pub nb_logmt_total_parc: f64,
    pub part_rp_1p_pct: Option<f64>,
    pub part_rp_2p_pct: Option<f64>,
    pub part_rp_3p_pct: Option<f64>,
    pub part_rp_4p_et_plus_pct: Option<f64>,
    pub part_maisons_pct: Option<f64>,
}

/// Computes room-count-bracket shares against the residential total and
/// the house share against the total housing stock. The two
/// denominators are distinct and must not be conflated. The
/// "4 rooms and more" bucket sums the two largest raw brackets before
/// the share computation.
pub fn aggregate(census: &[CensusRecord]) -> Vec<TypologyRow> {
    census
        .iter()
        .map(|c| {
            let nb_rp_total = c.nb_rp_1p + c.nb_rp_2p + c.nb_rp_3p + c.nb_rp_4p + c.nb_rp_5pp;
            let nb_rp_4p_et_plus = c.nb_rp_4p + c.nb_rp_5pp;
            TypologyRow {
                arrondissement: c.arrondissement,
                nb_logmt_total_parc: c.nb_logmt_total_parc,
                part_rp_1p_pct: pct_share(c.nb_rp_1p, nb_rp_total),
                part_rp_2p_pct: pct_share(c.nb_rp_2p, nb_rp_total),
                part_rp_3p_pct: pct_share(c.nb_rp_3p, nb_rp_total),
                part_rp_4p_et_plus_pct: pct_share(nb_rp_4p_et_plus, nb_rp_total),
                part_maisons_pct: pct_share(c.nb_maisons_total, c.nb_logmt_total_parc),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn census(arrondissement: u8) -> CensusRecord {
        CensusRecord {
            arrondissement,
            nb_logmt_total_parc: 200.0,
            nb_rp_1p: 10.0,
            nb_rp_2p: 20.0,
            nb_rp_3p: 30.0,
            nb_rp_4p: 25.0,
            nb_rp_5pp: 15.0,
            nb_maisons_total: 4.0,
            nb_appartements_total: 196.0,
        }
    }

    #[test]
    fn bracket_shares_use_the_residential_total() {
        let rows = aggregate(&[census(1)]);
        let row = &rows[0];
        // residential total = 100
        assert_eq!(row.part_rp_1p_pct, Some(10.0));
        assert_eq!(row.part_rp_2p_pct, Some(20.0));
        assert_eq!(row.part_rp_3p_pct, Some(30.0));
        assert_eq!(row.part_rp_4p_et_plus_pct, Some(40.0));
    }

    #[test]
    fn house_share_uses_the_total_stock_denominator() {
        let rows = aggregate(&[census(1)]);
        // 4 houses over 200 total dwellings, not over the 100 residences
        assert_eq!(rows[0].part_maisons_pct, Some(2.0));
    }

    #[test]
    fn four_rooms_and_more_sums_raw_brackets_not_shares() {
        let mut c = census(2);
        c.nb_rp_4p = 0.0;
        c.nb_rp_5pp = 40.0;
        let rows = aggregate(&[c]);
        // total = 100, bucket = 0 + 40
        assert_eq!(rows[0].part_rp_4p_et_plus_pct, Some(40.0));
    }

    #[test]
    fn zero_totals_yield_undefined_shares() {
        let empty = CensusRecord {
            arrondissement: 3,
            nb_logmt_total_parc: 0.0,
            nb_rp_1p: 0.0,
            nb_rp_2p: 0.0,
            nb_rp_3p: 0.0,
            nb_rp_4p: 0.0,
            nb_rp_5pp: 0.0,
            nb_maisons_total: 0.0,
            nb_appartements_total: 0.0,
        };
        let rows = aggregate(&[empty]);
        let row = &rows[0];
        assert_eq!(row.part_rp_1p_pct, None);
        assert_eq!(row.part_rp_4p_et_plus_pct, None);
        assert_eq!(row.part_maisons_pct, None);
    }
}

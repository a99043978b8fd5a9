//! Environment aggregator: green-space surface and tree count per
//! district, merged into one static table.

use crate::domain::{GreenSpaceRecord, TreeRecord};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq)]
pub struct EnvironmentRow {
    pub arrondissement: u8,
    pub surface_espaces_verts_m2: f64,
    pub nombre_arbres: u32,
}

/// Outer-merges the two per-district tables. Both fields are
/// count-style: a district present on one side only gets zero on the
/// other.
pub fn aggregate(green: &[GreenSpaceRecord], trees: &[TreeRecord]) -> Vec<EnvironmentRow> {
    let mut merged: BTreeMap<u8, EnvironmentRow> = BTreeMap::new();
    for g in green {
        merged
            .entry(g.arrondissement)
            .or_insert_with(|| EnvironmentRow {
                arrondissement: g.arrondissement,
                surface_espaces_verts_m2: 0.0,
                nombre_arbres: 0,
            })
            .surface_espaces_verts_m2 += g.surface_espaces_verts_m2;
    }
    for t in trees {
        merged
            .entry(t.arrondissement)
            .or_insert_with(|| EnvironmentRow {
                arrondissement: t.arrondissement,
                surface_espaces_verts_m2: 0.0,
                nombre_arbres: 0,
            })
            .nombre_arbres += t.nombre_arbres;
    }
    merged.into_values().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outer_merge_keeps_one_sided_districts() {
        let green = vec![GreenSpaceRecord {
            arrondissement: 4,
            surface_espaces_verts_m2: 1200.0,
        }];
        let trees = vec![
            TreeRecord {
                arrondissement: 4,
                nombre_arbres: 300,
            },
            TreeRecord {
                arrondissement: 19,
                nombre_arbres: 5000,
            },
        ];
        let rows = aggregate(&green, &trees);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].arrondissement, 4);
        assert_eq!(rows[0].surface_espaces_verts_m2, 1200.0);
        assert_eq!(rows[0].nombre_arbres, 300);
        assert_eq!(rows[1].arrondissement, 19);
        assert_eq!(rows[1].surface_espaces_verts_m2, 0.0);
        assert_eq!(rows[1].nombre_arbres, 5000);
    }
}

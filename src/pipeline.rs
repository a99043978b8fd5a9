//! Stage orchestration: silver normalizers run independently of each
//! other; the gold stage is all-or-nothing.

use crate::config::Config;
use crate::domain::{
    AccidentRecord, CensusRecord, GoldRow, GreenSpaceRecord, IncomeRecord, SocialHousingRecord,
    TransactionRecord, TreeRecord,
};
use crate::error::Result;
use crate::gold::{self, fusion, load_silver};
use crate::silver::{accidents, census, dvf, green_spaces, income, social_housing, trees};
use serde::Serialize;
use tracing::{error, info};

/// Outcome of one silver run: which sources normalized, which failed.
#[derive(Debug, Default, Serialize)]
pub struct CleanSummary {
    pub succeeded: Vec<String>,
    pub failed: Vec<(String, String)>,
}

impl CleanSummary {
    pub fn all_succeeded(&self) -> bool {
        self.failed.is_empty()
    }

    fn record<T>(&mut self, source: &str, outcome: Result<Vec<T>>) {
        match outcome {
            Ok(rows) => {
                info!(source, rows = rows.len(), "source normalized");
                self.succeeded.push(source.to_string());
            }
            Err(e) => {
                error!(source, "normalization failed: {e}");
                self.failed.push((source.to_string(), e.to_string()));
            }
        }
    }
}

/// Runs every source normalizer. A failure in one source is recorded
/// and does not stop the others.
pub fn run_silver(config: &Config) -> CleanSummary {
    let mut summary = CleanSummary::default();
    summary.record(dvf::SOURCE, dvf::clean_transactions(config));
    summary.record(
        social_housing::SOURCE,
        social_housing::clean_social_housing(config),
    );
    summary.record(census::SOURCE, census::clean_census(config));
    summary.record(income::SOURCE, income::clean_income(config));
    summary.record(accidents::SOURCE, accidents::clean_accidents(config));
    summary.record(
        green_spaces::SOURCE,
        green_spaces::clean_green_spaces(config),
    );
    summary.record(trees::SOURCE, trees::clean_trees(config));
    summary
}

/// Runs the aggregators over the silver tables and fuses them into the
/// gold table. Any missing dependency aborts the whole stage; no
/// partial gold table is ever published.
pub fn run_gold(config: &Config) -> Result<Vec<GoldRow>> {
    let transactions: Vec<TransactionRecord> =
        load_silver(config, "dvf_transactions", dvf::SILVER_FILE)?;
    let social: Vec<SocialHousingRecord> =
        load_silver(config, "logements_sociaux", social_housing::SILVER_FILE)?;
    let census_rows: Vec<CensusRecord> =
        load_silver(config, "insee_logement", census::SILVER_FILE)?;
    let income_rows: Vec<IncomeRecord> =
        load_silver(config, "filosofi_revenus", income::SILVER_FILE)?;
    let accident_rows: Vec<AccidentRecord> =
        load_silver(config, "accidentologie", accidents::SILVER_FILE)?;
    let green: Vec<GreenSpaceRecord> =
        load_silver(config, "espaces_verts", green_spaces::SILVER_FILE)?;
    let tree_rows: Vec<TreeRecord> = load_silver(config, "arbres", trees::SILVER_FILE)?;

    let typology = gold::typology::aggregate(&census_rows);
    let inputs = fusion::GoldInputs {
        prices: gold::prices::aggregate(&transactions),
        accidents: gold::accidents::aggregate(&accident_rows),
        income: income_rows,
        social: gold::social_share::aggregate(&social, &typology),
        typology,
        environment: gold::environment::aggregate(&green, &tree_rows),
    };

    let rows = fusion::fuse(&inputs)?;
    fusion::write_gold(config, &rows)?;
    info!(rows = rows.len(), "gold table published");
    Ok(rows)
}

//! Silver layer: one normalizer per raw source.
//!
//! Every normalizer follows the same contract: open the bronze extract,
//! check the required columns, drop exact duplicates, derive the
//! district key, filter invalid rows, rename to the canonical schema
//! and write a `*_silver.csv`. Normalizers are independent of each
//! other; a failure in one never stops the rest.

pub mod accidents;
pub mod census;
pub mod dvf;
pub mod green_spaces;
pub mod income;
pub mod social_housing;
pub mod trees;

use crate::config::Config;
use crate::error::{PipelineError, Result};
use chrono::{Datelike, NaiveDate};
use csv::StringRecord;
use flate2::read::GzDecoder;
use metrics::counter;
use serde::Serialize;
use std::collections::HashSet;
use std::fs::{self, File};
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Resolves a bronze file, failing with `SourceMissing` when absent.
pub fn bronze_path(config: &Config, source: &str, filename: &str) -> Result<PathBuf> {
    let path = config.paths.bronze_dir().join(filename);
    if !path.exists() {
        return Err(PipelineError::SourceMissing {
            source: source.to_string(),
            path: path.display().to_string(),
        });
    }
    Ok(path)
}

/// A raw extract fully loaded in memory, exact duplicates removed.
pub struct RawFrame {
    pub headers: StringRecord,
    pub rows: Vec<StringRecord>,
    pub duplicates_removed: usize,
}

impl RawFrame {
    /// Reads a delimited bronze file (transparently gunzipping `.gz`)
    /// and removes exact-duplicate rows. The removed count is a
    /// reportable metric, not an error.
    pub fn load(source: &str, path: &Path, delimiter: u8) -> Result<Self> {
        let file = File::open(path)?;
        let reader: Box<dyn Read> = if path.extension().is_some_and(|e| e == "gz") {
            Box::new(GzDecoder::new(file))
        } else {
            Box::new(file)
        };

        let mut csv_reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .flexible(true)
            .from_reader(reader);
        let headers = csv_reader.headers()?.clone();

        let mut seen: HashSet<Vec<String>> = HashSet::new();
        let mut rows = Vec::new();
        let mut duplicates_removed = 0usize;
        for record in csv_reader.records() {
            let record = record?;
            let key: Vec<String> = record.iter().map(str::to_string).collect();
            if seen.insert(key) {
                rows.push(record);
            } else {
                duplicates_removed += 1;
            }
        }

        counter!("silver_duplicates_removed_total", "source" => source.to_string())
            .increment(duplicates_removed as u64);
        info!(
            source,
            rows = rows.len(),
            duplicates_removed,
            "loaded bronze extract"
        );

        Ok(Self {
            headers,
            rows,
            duplicates_removed,
        })
    }

    /// Looks up the index of every required column, failing with a
    /// schema error on the first one that is absent.
    pub fn columns(&self, source: &str, names: &[&str]) -> Result<Vec<usize>> {
        names
            .iter()
            .map(|name| {
                self.headers
                    .iter()
                    .position(|h| h == *name)
                    .ok_or_else(|| PipelineError::SchemaViolation {
                        source: source.to_string(),
                        column: (*name).to_string(),
                    })
            })
            .collect()
    }
}

/// Lenient numeric coercion: comma decimal separators are accepted,
/// anything unparseable becomes `None` (the "unparseable" marker).
pub fn parse_f64_opt(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.replace(',', ".").parse::<f64>().ok()
}

/// Extracts the calendar year from a date field; unparseable dates
/// yield `None`.
pub fn parse_year(raw: &str) -> Option<i32> {
    let trimmed = raw.trim();
    for format in ["%Y-%m-%d", "%d/%m/%Y"] {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, format) {
            return Some(date.year());
        }
    }
    // ISO timestamps: the leading 4 characters are the year.
    if let Some(year) = trimmed.get(..4).and_then(|s| s.parse::<i32>().ok()) {
        if (1900..=2100).contains(&year) {
            return Some(year);
        }
    }
    None
}

/// Writes a normalized table to the silver directory.
pub fn write_silver<T: Serialize>(config: &Config, filename: &str, rows: &[T]) -> Result<PathBuf> {
    let silver_dir = config.paths.silver_dir();
    fs::create_dir_all(&silver_dir)?;
    let path = silver_dir.join(filename);
    let mut writer = csv::Writer::from_path(&path)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    debug!(path = %path.display(), rows = rows.len(), "wrote silver table");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn frame_from(content: &str, delimiter: u8) -> RawFrame {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("raw.csv");
        let mut file = File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        RawFrame::load("test", &path, delimiter).unwrap()
    }

    #[test]
    fn exact_duplicates_are_removed_and_counted() {
        let frame = frame_from("a;b\n1;2\n1;2\n3;4\n", b';');
        assert_eq!(frame.rows.len(), 2);
        assert_eq!(frame.duplicates_removed, 1);
    }

    #[test]
    fn missing_required_column_is_a_schema_error() {
        let frame = frame_from("a,b\n1,2\n", b',');
        let err = frame.columns("test", &["a", "missing"]).unwrap_err();
        assert!(matches!(
            err,
            PipelineError::SchemaViolation { ref column, .. } if column == "missing"
        ));
    }

    #[test]
    fn gzipped_extracts_are_transparent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("raw.csv.gz");
        let file = File::create(&path).unwrap();
        let mut encoder = flate2::write::GzEncoder::new(file, flate2::Compression::default());
        encoder.write_all(b"a,b\n1,2\n").unwrap();
        encoder.finish().unwrap();

        let frame = RawFrame::load("test", &path, b',').unwrap();
        assert_eq!(frame.rows.len(), 1);
        assert_eq!(&frame.headers[0], "a");
    }

    #[test]
    fn numeric_coercion_marks_unparseable_as_none() {
        assert_eq!(parse_f64_opt("1234.5"), Some(1234.5));
        assert_eq!(parse_f64_opt("1234,5"), Some(1234.5));
        assert_eq!(parse_f64_opt(" 7 "), Some(7.0));
        assert_eq!(parse_f64_opt(""), None);
        assert_eq!(parse_f64_opt("n/a"), None);
    }

    #[test]
    fn year_extraction_handles_common_formats() {
        assert_eq!(parse_year("2023-04-12"), Some(2023));
        assert_eq!(parse_year("12/04/2023"), Some(2023));
        assert_eq!(parse_year("2023-04-12T10:30:00+02:00"), Some(2023));
        assert_eq!(parse_year("not a date"), None);
        assert_eq!(parse_year(""), None);
    }
}

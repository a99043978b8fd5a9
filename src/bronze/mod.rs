//! Bronze layer: raw acquisition.
//!
//! Downloads each registered open-data source as-is into the bronze
//! directory and extracts zipped archives in place. The silver layer
//! only depends on "a raw file exists at bronze/<filename>".

use crate::config::Config;
use crate::error::Result;
use std::fs::{self, File};
use std::io;
use std::path::Path;
use tracing::{error, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Csv,
    /// Downloaded archive is extracted in place after the write.
    Zip,
}

/// One registered open-data source.
#[derive(Debug, Clone, Copy)]
pub struct SourceSpec {
    pub key: &'static str,
    pub url: &'static str,
    pub filename: &'static str,
    pub format: SourceFormat,
}

/// Registry of raw sources consumed by the silver layer.
pub const SOURCES: &[SourceSpec] = &[
    SourceSpec {
        key: "dvf",
        url: "https://static.data.gouv.fr/resources/demandes-de-valeurs-foncieres-geolocalisees/20251024-114956/dvf.csv.gz",
        filename: "valeurs_foncieres.csv.gz",
        format: SourceFormat::Csv,
    },
    SourceSpec {
        key: "logements_sociaux",
        url: "https://opendata.paris.fr/api/explore/v2.1/catalog/datasets/logements-sociaux-finances-a-paris/exports/csv?use_labels=true",
        filename: "logements_sociaux.csv",
        format: SourceFormat::Csv,
    },
    SourceSpec {
        key: "insee_logement",
        url: "https://www.insee.fr/fr/statistiques/fichier/8202349/base-cc-logement-2021_csv.zip",
        filename: "recensement_logement.zip",
        format: SourceFormat::Zip,
    },
    SourceSpec {
        key: "filosofi_revenus",
        url: "https://www.insee.fr/fr/statistiques/fichier/7756729/filosofi_revenus_paris.csv",
        filename: "filosofi_revenus.csv",
        format: SourceFormat::Csv,
    },
    SourceSpec {
        key: "accidentologie",
        url: "https://opendata.paris.fr/api/explore/v2.1/catalog/datasets/accidentologie/exports/csv?use_labels=true",
        filename: "accidentologie.csv",
        format: SourceFormat::Csv,
    },
    SourceSpec {
        key: "espaces_verts",
        url: "https://opendata.paris.fr/api/explore/v2.1/catalog/datasets/espaces_verts/exports/csv?use_labels=true",
        filename: "espaces_verts.csv",
        format: SourceFormat::Csv,
    },
    SourceSpec {
        key: "les_arbres",
        url: "https://opendata.paris.fr/api/explore/v2.1/catalog/datasets/les-arbres/exports/csv?use_labels=true",
        filename: "les-arbres.csv",
        format: SourceFormat::Csv,
    },
];

pub fn find_source(key: &str) -> Option<&'static SourceSpec> {
    SOURCES.iter().find(|s| s.key == key)
}

/// Downloads one source into the bronze directory.
pub async fn fetch_source(config: &Config, spec: &SourceSpec) -> Result<()> {
    let bronze_dir = config.paths.bronze_dir();
    fs::create_dir_all(&bronze_dir)?;
    let destination = bronze_dir.join(spec.filename);

    info!(source = spec.key, url = spec.url, "downloading source");
    let response = reqwest::get(spec.url).await?.error_for_status()?;
    let bytes = response.bytes().await?;
    fs::write(&destination, &bytes)?;
    info!(
        source = spec.key,
        bytes = bytes.len(),
        path = %destination.display(),
        "stored in bronze"
    );

    if spec.format == SourceFormat::Zip {
        extract_archive(&destination, &bronze_dir)?;
    }

    Ok(())
}

/// Extracts every file of a downloaded archive next to it.
fn extract_archive(archive_path: &Path, target_dir: &Path) -> Result<()> {
    let file = File::open(archive_path)?;
    let mut archive = zip::ZipArchive::new(file)?;
    for i in 0..archive.len() {
        let mut entry = archive.by_index(i)?;
        if !entry.is_file() {
            continue;
        }
        let Some(name) = Path::new(entry.name())
            .file_name()
            .map(|n| n.to_owned())
        else {
            continue;
        };
        let out_path = target_dir.join(name);
        let mut out = File::create(&out_path)?;
        io::copy(&mut entry, &mut out)?;
        info!(path = %out_path.display(), "extracted archive entry");
    }
    Ok(())
}

/// Downloads all sources (or the requested subset). A failed download
/// is logged and does not stop the others.
pub async fn ingest_sources(config: &Config, only: Option<&[String]>) -> Vec<(String, bool)> {
    let mut outcomes = Vec::new();
    for spec in SOURCES {
        if let Some(keys) = only {
            if !keys.iter().any(|k| k == spec.key) {
                continue;
            }
        }
        match fetch_source(config, spec).await {
            Ok(()) => outcomes.push((spec.key.to_string(), true)),
            Err(e) => {
                error!(source = spec.key, "download failed: {e}");
                outcomes.push((spec.key.to_string(), false));
            }
        }
    }
    outcomes
}

/// Reports which bronze files are present without failing the run.
pub fn verify_bronze(config: &Config) -> Vec<(&'static str, bool)> {
    let bronze_dir = config.paths.bronze_dir();
    SOURCES
        .iter()
        .map(|spec| {
            let present = bronze_dir.join(spec.filename).exists();
            if !present {
                warn!(source = spec.key, file = spec.filename, "bronze file missing");
            }
            (spec.key, present)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use std::io::Write;

    #[test]
    fn registry_keys_are_unique() {
        let mut keys: Vec<_> = SOURCES.iter().map(|s| s.key).collect();
        keys.sort();
        keys.dedup();
        assert_eq!(keys.len(), SOURCES.len());
    }

    #[test]
    fn find_source_by_key() {
        assert!(find_source("dvf").is_some());
        assert!(find_source("nope").is_none());
    }

    #[test]
    fn extract_archive_writes_entries() {
        let dir = tempfile::tempdir().unwrap();
        let archive_path = dir.path().join("bundle.zip");
        {
            let file = File::create(&archive_path).unwrap();
            let mut zip = zip::ZipWriter::new(file);
            let options = zip::write::FileOptions::default()
                .compression_method(zip::CompressionMethod::Stored);
            zip.start_file("base-cc-logement-2021.CSV", options).unwrap();
            zip.write_all(b"CODGEO;P21_LOG\n75101;10\n").unwrap();
            zip.finish().unwrap();
        }
        extract_archive(&archive_path, dir.path()).unwrap();
        let extracted = dir.path().join("base-cc-logement-2021.CSV");
        assert!(extracted.exists());
        let content = fs::read_to_string(extracted).unwrap();
        assert!(content.starts_with("CODGEO"));
    }

    #[test]
    fn verify_reports_missing_files() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.paths.base_dir = dir.path().to_path_buf();
        let report = verify_bronze(&config);
        assert_eq!(report.len(), SOURCES.len());
        assert!(report.iter().all(|(_, present)| !present));
    }
}

use std::fmt;

/// Pipeline-wide error taxonomy.
///
/// Malformed numeric/date values are deliberately *not* errors: they are
/// coerced to `None` during normalization and resolved by each field's
/// fill policy downstream.
///
/// Implemented by hand rather than via `#[derive(thiserror::Error)]`
/// because `thiserror` unconditionally treats a field named `source` as
/// the error source, and the spec requires `String` fields named
/// `source` on `SourceMissing`/`SchemaViolation`.
#[derive(Debug)]
pub enum PipelineError {
    SourceMissing { source: String, path: String },

    SchemaViolation { source: String, column: String },

    JoinIncomplete { table: String },

    Csv(csv::Error),

    Io(std::io::Error),

    Json(serde_json::Error),

    Http(reqwest::Error),

    Zip(zip::result::ZipError),

    Config(String),
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineError::SourceMissing { source, path } => {
                write!(f, "raw input for source '{source}' is missing: {path}")
            }
            PipelineError::SchemaViolation { source, column } => {
                write!(f, "source '{source}' is missing required column '{column}'")
            }
            PipelineError::JoinIncomplete { table } => {
                write!(
                    f,
                    "cannot build the gold table: dependency '{table}' is missing or empty"
                )
            }
            PipelineError::Csv(e) => write!(f, "CSV error: {e}"),
            PipelineError::Io(e) => write!(f, "I/O error: {e}"),
            PipelineError::Json(e) => write!(f, "JSON serialization failed: {e}"),
            PipelineError::Http(e) => write!(f, "HTTP request failed: {e}"),
            PipelineError::Zip(e) => write!(f, "archive extraction failed: {e}"),
            PipelineError::Config(msg) => write!(f, "configuration error: {msg}"),
        }
    }
}

impl std::error::Error for PipelineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PipelineError::Csv(e) => Some(e),
            PipelineError::Io(e) => Some(e),
            PipelineError::Json(e) => Some(e),
            PipelineError::Http(e) => Some(e),
            PipelineError::Zip(e) => Some(e),
            _ => None,
        }
    }
}

impl From<csv::Error> for PipelineError {
    fn from(e: csv::Error) -> Self {
        PipelineError::Csv(e)
    }
}

impl From<std::io::Error> for PipelineError {
    fn from(e: std::io::Error) -> Self {
        PipelineError::Io(e)
    }
}

impl From<serde_json::Error> for PipelineError {
    fn from(e: serde_json::Error) -> Self {
        PipelineError::Json(e)
    }
}

impl From<reqwest::Error> for PipelineError {
    fn from(e: reqwest::Error) -> Self {
        PipelineError::Http(e)
    }
}

impl From<zip::result::ZipError> for PipelineError {
    fn from(e: zip::result::ZipError) -> Self {
        PipelineError::Zip(e)
    }
}

pub type Result<T> = std::result::Result<T, PipelineError>;

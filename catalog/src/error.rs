use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Catalog source not found: {}", path.display())]
    SourceNotFound { path: PathBuf },

    #[error("Malformed catalog source: {source}")]
    MalformedSource {
        #[source]
        source: serde_json::Error,
    },

    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    #[error("CSV export error: {source}")]
    Csv {
        #[from]
        source: csv::Error,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[source] serde_json::Error),

    #[error("Refusing to export over the catalog source: {}", path.display())]
    ExportTargetIsSource { path: PathBuf },

    #[error("Configuration error: {0}")]
    Config(String),
}

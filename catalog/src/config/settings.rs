// Catalog settings, loaded from an optional JSON file
use crate::error::CatalogError;
use serde::Deserialize;
use shared::models::Language;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq)]
pub struct CatalogSettings {
    /// JSON list of candle records.
    pub data_file: PathBuf,
    /// Directory the records' image paths are relative to.
    pub images_root: PathBuf,
    /// Language used by name lookups when the caller does not pick one.
    pub default_language: Language,
}

// On-disk shape: every key optional, missing ones keep the default.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct SettingsFile {
    data_file: Option<PathBuf>,
    images_root: Option<PathBuf>,
    default_language: Option<Language>,
}

const DATA_FILE: &str = "data/candles.json";
const IMAGES_DIR: &str = "images";

/// Directory the default data file and images live under: next to the
/// executable when it ships with a `data/candles.json`, else the crate sources.
fn install_root(exe_dir: Option<&Path>) -> PathBuf {
    exe_dir
        .filter(|dir| dir.join(DATA_FILE).is_file())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(env!("CARGO_MANIFEST_DIR")))
}

impl Default for CatalogSettings {
    fn default() -> Self {
        let exe_dir = std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(Path::to_path_buf));
        let root = install_root(exe_dir.as_deref());
        CatalogSettings {
            data_file: root.join(DATA_FILE),
            images_root: root.join(IMAGES_DIR),
            default_language: Language::Ar,
        }
    }
}

impl CatalogSettings {
    /// Reads settings from a JSON file. Relative paths inside it are taken
    /// relative to the file's own directory.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            CatalogError::Config(format!("cannot read '{}': {}", path.display(), e))
        })?;
        let base = path.parent().unwrap_or_else(|| Path::new(""));
        Self::from_json(&content, base)
    }

    pub fn from_json(content: &str, base: &Path) -> Result<Self, CatalogError> {
        let file: SettingsFile = serde_json::from_str(content)
            .map_err(|e| CatalogError::Config(format!("invalid settings: {}", e)))?;

        let mut settings = CatalogSettings::default();
        if let Some(data_file) = file.data_file {
            settings.data_file = base.join(data_file);
        }
        if let Some(images_root) = file.images_root {
            settings.images_root = base.join(images_root);
        }
        if let Some(language) = file.default_language {
            settings.default_language = language;
        }
        Ok(settings)
    }

    /// Resolves a record's relative image path against the images root.
    /// Existence is not checked.
    pub fn resolve_image(&self, relative: &str) -> PathBuf {
        self.images_root.join(relative)
    }
}

use crate::models::SchemeRecord;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

/// Reference catalog shipped with the service
const BUILTIN_CATALOG: &str = include_str!("../../data/schemes.json");

/// Errors that can occur while loading the scheme catalog
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Failed to read catalog: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid catalog JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid catalog TOML: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Unsupported catalog format: {0}")]
    UnsupportedFormat(String),

    #[error("Scheme at position {0} has an empty id")]
    EmptyId(usize),

    #[error("Duplicate scheme id: {0}")]
    DuplicateId(String),
}

/// Accepted catalog file layouts
#[derive(Deserialize)]
#[serde(untagged)]
enum CatalogFile {
    Wrapped { schemes: Vec<SchemeRecord> },
    Bare(Vec<SchemeRecord>),
}

impl CatalogFile {
    fn into_schemes(self) -> Vec<SchemeRecord> {
        match self {
            CatalogFile::Wrapped { schemes } => schemes,
            CatalogFile::Bare(schemes) => schemes,
        }
    }
}

/// Immutable, ordered collection of schemes with id lookup
///
/// Built once at startup and shared read-only behind an `Arc`.
#[derive(Debug, Clone)]
pub struct SchemeCatalog {
    schemes: Vec<SchemeRecord>,
    index: HashMap<String, usize>,
}

impl SchemeCatalog {
    /// Build a catalog, keeping the given order
    pub fn new(schemes: Vec<SchemeRecord>) -> Result<Self, CatalogError> {
        let mut index = HashMap::with_capacity(schemes.len());
        for (position, scheme) in schemes.iter().enumerate() {
            if scheme.id.trim().is_empty() {
                return Err(CatalogError::EmptyId(position));
            }
            if index.insert(scheme.id.clone(), position).is_some() {
                return Err(CatalogError::DuplicateId(scheme.id.clone()));
            }
        }
        Ok(Self { schemes, index })
    }

    /// The five-scheme reference catalog
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_json(BUILTIN_CATALOG)
    }

    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = serde_json::from_str(json)?;
        Self::new(file.into_schemes())
    }

    /// TOML catalogs use a `[[schemes]]` array of tables
    pub fn from_toml(text: &str) -> Result<Self, CatalogError> {
        #[derive(Deserialize)]
        struct TomlCatalog {
            schemes: Vec<SchemeRecord>,
        }

        let file: TomlCatalog = toml::from_str(text)?;
        Self::new(file.schemes)
    }

    /// Load a catalog file, picking the format from its extension
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json(&text),
            Some("toml") => Self::from_toml(&text),
            other => Err(CatalogError::UnsupportedFormat(
                other.unwrap_or("<none>").to_string(),
            )),
        }
    }

    /// Exact id lookup; `None` means no such scheme
    pub fn get_by_id(&self, id: &str) -> Option<&SchemeRecord> {
        self.index.get(id).map(|&position| &self.schemes[position])
    }

    /// All schemes in catalog order
    pub fn all(&self) -> &[SchemeRecord] {
        &self.schemes
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SchemeRecord> {
        self.schemes.iter()
    }

    pub fn len(&self) -> usize {
        self.schemes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemes.is_empty()
    }
}

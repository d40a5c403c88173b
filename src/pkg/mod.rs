mod kind;


pub use kind::{Language, PackageKind};

use crate::tree::FileRef;
use serde::Serialize;

/// A discovered software component plus its provenance
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Package {
    pub name: String,
    pub version: String,
    pub kind: PackageKind,
    pub language: Language,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub licenses: Vec<String>,
    /// Format-specific payload, opaque to catalogers
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
    /// Name of the cataloger that produced this record
    pub found_by: String,
    /// Files that contributed this record
    pub source: Vec<FileRef>,
}

impl Package {
    /// Create a record with no provenance; catalogers stamp it later
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            kind: PackageKind::Unknown,
            language: Language::Unknown,
            licenses: Vec::new(),
            metadata: None,
            found_by: String::new(),
            source: Vec::new(),
        }
    }

    pub fn with_kind(mut self, kind: PackageKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_language(mut self, language: Language) -> Self {
        self.language = language;
        self
    }

    pub fn with_license(mut self, license: impl Into<String>) -> Self {
        self.licenses.push(license.into());
        self
    }

    pub fn with_metadata(mut self, metadata: serde_json::Value) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// True once a cataloger has recorded who found this and where
    pub fn has_provenance(&self) -> bool {
        !self.found_by.is_empty() && !self.source.is_empty()
    }
}

//! Runs several catalogers over the same snapshots.
//!
//! Each cataloger selects, has exactly its selection resolved, and
//! catalogs under its own name. Records from different catalogers are
//! concatenated as-is; two catalogers finding the same package yield two
//! records.


use crate::cataloger::{Diagnostic, GenericCataloger, ParserRegistry};
use crate::config::{ConfigError, ScanConfig};
use crate::pkg::Package;
use crate::resolver::ContentResolver;
use crate::tree::{FileTree, TreeId, TreeReader};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

/// What a scan saw of one snapshot
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TreeSummary {
    pub id: TreeId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub files: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fingerprint: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScanReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub trees: Vec<TreeSummary>,
    pub packages: Vec<Package>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Ordered set of named catalogers
#[derive(Default)]
pub struct Scanner {
    catalogers: Vec<(String, GenericCataloger)>,
}

impl Scanner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build every configured cataloger against `registry`
    pub fn from_config(config: &ScanConfig, registry: &ParserRegistry) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut scanner = Self::new();
        for cataloger in &config.catalogers {
            scanner.register(
                cataloger.name.clone(),
                GenericCataloger::from_config(cataloger, registry)?,
            );
        }
        Ok(scanner)
    }

    /// Add a cataloger; it runs after those already registered
    pub fn register(&mut self, name: impl Into<String>, cataloger: GenericCataloger) -> &mut Self {
        self.catalogers.push((name.into(), cataloger));
        self
    }

    pub fn cataloger_names(&self) -> Vec<&str> {
        self.catalogers.iter().map(|(name, _)| name.as_str()).collect()
    }

    /// Scan arbitrary readers, fetching contents through `resolver`
    pub fn run<R>(&mut self, trees: &[&dyn TreeReader], resolver: &R) -> ScanReport
    where
        R: ContentResolver + ?Sized,
    {
        let started_at = Utc::now();
        let mut packages = Vec::new();
        let mut diagnostics = Vec::new();

        for (name, cataloger) in self.catalogers.iter_mut() {
            let selected = cataloger.select_files(trees).to_vec();
            let contents = resolver.resolve(&selected);
            let report = cataloger.catalog(&contents, name.as_str());

            info!(
                cataloger = %name,
                selected = selected.len(),
                resolved = contents.len(),
                packages = report.packages.len(),
                diagnostics = report.diagnostics.len(),
                "cataloger finished"
            );

            packages.extend(report.packages);
            diagnostics.extend(report.diagnostics);
        }

        ScanReport {
            started_at,
            finished_at: Utc::now(),
            trees: trees
                .iter()
                .map(|tree| TreeSummary {
                    id: tree.id(),
                    files: None,
                    fingerprint: None,
                })
                .collect(),
            packages,
            diagnostics,
        }
    }

    /// Scan in-memory snapshots, which also serve as the content resolver
    pub fn scan_trees(&mut self, trees: &[FileTree]) -> ScanReport {
        let readers: Vec<&dyn TreeReader> = trees.iter().map(|t| t as &dyn TreeReader).collect();
        let mut report = self.run(&readers, trees);

        report.trees = trees
            .iter()
            .map(|tree| TreeSummary {
                id: tree.id(),
                files: Some(tree.file_count()),
                fingerprint: Some(tree.fingerprint()),
            })
            .collect();
        report
    }
}

use crate::tree::{FileRef, TreeId};
use serde::Serialize;
use std::fmt;
use tracing::error;

/// A non-fatal condition hit while selecting or cataloging.
///
/// None of these abort a pass; they are recorded so callers can tell an
/// empty inventory apart from a failed one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    /// A glob pattern could not be evaluated against a tree
    GlobQueryFailed {
        tree: TreeId,
        pattern: String,
        reason: String,
    },
    /// A selected file had no entry in the resolved contents
    MissingContent { cataloger: String, file: FileRef },
    /// A parser rejected a file's contents
    ParseFailed {
        cataloger: String,
        file: FileRef,
        reason: String,
    },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::GlobQueryFailed {
                tree,
                pattern,
                reason,
            } => write!(f, "failed to find files by glob '{pattern}' in tree {tree}: {reason}"),
            Diagnostic::MissingContent { cataloger, file } => {
                write!(f, "cataloger '{cataloger}' missing file content: {file}")
            }
            Diagnostic::ParseFailed {
                cataloger,
                file,
                reason,
            } => write!(
                f,
                "cataloger '{cataloger}' failed to parse entries ({file}): {reason}"
            ),
        }
    }
}

/// Collected conditions for one pass
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Log the condition and keep it
    pub fn report(&mut self, diagnostic: Diagnostic) {
        match &diagnostic {
            Diagnostic::GlobQueryFailed {
                tree,
                pattern,
                reason,
            } => error!(%tree, %pattern, %reason, "failed to find files by glob"),
            Diagnostic::MissingContent { cataloger, file } => {
                error!(%cataloger, %file, "cataloger missing file content")
            }
            Diagnostic::ParseFailed {
                cataloger,
                file,
                reason,
            } => error!(%cataloger, %file, %reason, "cataloger failed to parse entries"),
        }
        self.entries.push(diagnostic);
    }

    pub fn as_slice(&self) -> &[Diagnostic] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// True if an equal condition was already reported this pass
    pub fn contains(&self, diagnostic: &Diagnostic) -> bool {
        self.entries.contains(diagnostic)
    }

    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.entries
    }
}

use super::{FileRef, FileTree, TreeError, TreeId};
use crate::security::PathSanitizer;
use glob::Pattern;
use std::borrow::Cow;

/// Path and glob lookup over one filesystem snapshot
pub trait TreeReader {
    /// Identifier of the snapshot behind this reader
    fn id(&self) -> TreeId;

    /// Resolve an exact path. A missing or malformed path is `None`.
    fn file(&self, path: &str) -> Option<FileRef>;

    /// Resolve every file matching `pattern`.
    ///
    /// Relative patterns are rooted like paths, so `app/*.lock` and
    /// `/app/*.lock` select the same files. No matches is `Ok(vec![])`;
    /// only a malformed pattern or an I/O fault is an error.
    fn files_by_glob(&self, pattern: &str) -> Result<Vec<FileRef>, TreeError>;
}

impl TreeReader for FileTree {
    fn id(&self) -> TreeId {
        FileTree::id(self)
    }

    fn file(&self, path: &str) -> Option<FileRef> {
        let path = PathSanitizer::sanitize(path).ok()?;
        self.entry(&path).map(|entry| self.file_ref(entry))
    }

    fn files_by_glob(&self, pattern: &str) -> Result<Vec<FileRef>, TreeError> {
        let rooted = rooted_pattern(pattern);
        let matcher = Pattern::new(&rooted).map_err(|e| TreeError::InvalidGlob {
            pattern: pattern.to_string(),
            reason: e.msg.to_string(),
        })?;

        Ok(self
            .list()
            .filter(|entry| matcher.matches(&entry.path))
            .map(|entry| self.file_ref(entry))
            .collect())
    }
}

/// Root a relative pattern the way exact paths are rooted.
///
/// Patterns starting with `*` already match at any depth and stay as-is.
fn rooted_pattern(pattern: &str) -> Cow<'_, str> {
    if pattern.starts_with('/') || pattern.starts_with('*') {
        Cow::Borrowed(pattern)
    } else {
        Cow::Owned(format!("/{pattern}"))
    }
}

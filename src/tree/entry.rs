use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Identifier minted for each snapshot when it is built
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TreeId(Uuid);

impl TreeId {
    pub(crate) fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for TreeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opaque handle to one file occurrence inside one snapshot.
///
/// The same path in two snapshots yields two different references.
/// Ordering is by tree, then path, which gives catalogers a stable
/// iteration order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FileRef {
    pub tree: TreeId,
    pub path: String,
}

impl fmt::Display for FileRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.path, self.tree)
    }
}

/// Metadata for a single file in the tree arena
#[derive(Debug, Clone)]
pub struct FileEntry {
    /// Byte offset into the arena
    pub offset: usize,
    /// Length in bytes
    pub length: usize,
    /// Rooted path (e.g., "/etc/os-release")
    pub path: String,
}

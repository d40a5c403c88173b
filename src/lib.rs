// Public API exports
pub mod cataloger;
pub mod config;
pub mod pkg;
pub mod resolver;
pub mod scan;
pub mod security;
pub mod tree;

#[cfg(test)]
pub(crate) mod test_support;

// Re-export main types for convenience
pub use tree::{
    FileEntry, FileRef, FileTree, FileTreeBuilder, TreeError, TreeId, TreeLimits, TreeReader,
};
pub use security::PathSanitizer;

pub use cataloger::{
    CatalogReport, Diagnostic, Diagnostics, GenericCataloger, Parser, ParserFn, ParserRegistry,
    Rule,
};
pub use config::{CatalogerConfig, ConfigError, ScanConfig};
pub use pkg::{Language, Package, PackageKind};
pub use resolver::{ContentResolver, Contents};
pub use scan::{ScanReport, Scanner, TreeSummary};

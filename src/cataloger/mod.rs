mod diagnostics;
mod generic;
mod registry;


pub use diagnostics::{Diagnostic, Diagnostics};
pub use generic::{CatalogReport, GenericCataloger, Rule};
pub use registry::ParserRegistry;

use crate::pkg::Package;
use std::io::Read;
use std::sync::Arc;

/// Turns the text of one manifest into package records.
///
/// Parsers are stateless; one parser may be bound to many files. Closures
/// and plain functions with the matching signature are parsers too.
pub trait Parser: Send + Sync {
    fn parse(&self, reader: &mut dyn Read) -> anyhow::Result<Vec<Package>>;
}

impl<F> Parser for F
where
    F: Fn(&mut dyn Read) -> anyhow::Result<Vec<Package>> + Send + Sync,
{
    fn parse(&self, reader: &mut dyn Read) -> anyhow::Result<Vec<Package>> {
        self(reader)
    }
}

/// Shared handle to a parser
pub type ParserFn = Arc<dyn Parser>;

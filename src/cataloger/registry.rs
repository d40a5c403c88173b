use super::{Parser, ParserFn};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Named parsers that configuration can refer to
#[derive(Default)]
pub struct ParserRegistry {
    map: BTreeMap<String, ParserFn>,
}

impl ParserRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a parser under a name, replacing any earlier one
    ///
    /// # Example
    /// ```ignore
    /// registry.register("apkdb", parse_apk_db);
    /// registry.register("gemfile-lock", parse_gemfile_lock);
    /// ```
    pub fn register(&mut self, name: impl Into<String>, parser: impl Parser + 'static) {
        self.map.insert(name.into(), Arc::new(parser));
    }

    /// Register an already shared parser
    pub fn register_shared(&mut self, name: impl Into<String>, parser: ParserFn) {
        self.map.insert(name.into(), parser);
    }

    pub fn get(&self, name: &str) -> Option<ParserFn> {
        self.map.get(name).cloned()
    }

    /// Get the number of registered parsers
    pub fn parser_count(&self) -> usize {
        self.map.len()
    }

    /// Registered names in lexical order
    pub fn names(&self) -> Vec<&str> {
        self.map.keys().map(|s| s.as_str()).collect()
    }
}

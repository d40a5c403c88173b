use super::{Diagnostic, Diagnostics, ParserFn, ParserRegistry};
use crate::config::{CatalogerConfig, ConfigError};
use crate::pkg::Package;
use crate::resolver::Contents;
use crate::tree::{FileRef, TreeReader};
use serde::Serialize;
use std::any::Any;
use std::collections::BTreeMap;
use std::fmt;
use std::io::Cursor;
use std::panic::{self, AssertUnwindSafe};
use tracing::debug;

/// The selection rule that bound a file to its parser
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Rule {
    Path(String),
    Glob(String),
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rule::Path(path) => write!(f, "path:{path}"),
            Rule::Glob(pattern) => write!(f, "glob:{pattern}"),
        }
    }
}

struct Binding {
    rule: Rule,
    parser: ParserFn,
}

/// Outcome of one cataloging pass
#[derive(Debug, Clone, Default, Serialize)]
pub struct CatalogReport {
    pub packages: Vec<Package>,
    /// Conditions from the selection and cataloging that fed this report
    pub diagnostics: Vec<Diagnostic>,
}

impl CatalogReport {
    /// True when every selected file was resolved and parsed
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

/// Dispatches files picked by exact path or glob pattern to parsers.
///
/// One instance serves many scans but only one at a time: `select_files`
/// builds up bindings, `catalog` consumes and clears them. Rules are kept
/// in sorted maps, so for each tree all path rules run before any glob
/// rule, each in lexical order. When two rules match the same file the
/// later one wins, so a glob beats a path.
pub struct GenericCataloger {
    path_parsers: BTreeMap<String, ParserFn>,
    glob_parsers: BTreeMap<String, ParserFn>,
    selected_files: Vec<FileRef>,
    bindings: BTreeMap<FileRef, Binding>,
    diagnostics: Diagnostics,
}

impl GenericCataloger {
    pub fn new(
        path_parsers: BTreeMap<String, ParserFn>,
        glob_parsers: BTreeMap<String, ParserFn>,
    ) -> Self {
        Self {
            path_parsers,
            glob_parsers,
            selected_files: Vec::new(),
            bindings: BTreeMap::new(),
            diagnostics: Diagnostics::new(),
        }
    }

    /// Build a cataloger from named rules, resolving names in `registry`
    pub fn from_config(
        config: &CatalogerConfig,
        registry: &ParserRegistry,
    ) -> Result<Self, ConfigError> {
        let lookup = |rules: &BTreeMap<String, String>| {
            rules
                .iter()
                .map(|(selector, parser)| {
                    registry
                        .get(parser)
                        .map(|p| (selector.clone(), p))
                        .ok_or_else(|| ConfigError::UnknownParser {
                            cataloger: config.name.clone(),
                            parser: parser.clone(),
                        })
                })
                .collect::<Result<BTreeMap<_, _>, _>>()
        };

        Ok(Self::new(lookup(&config.paths)?, lookup(&config.globs)?))
    }

    /// Resolve the files of interest in `trees` and remember which parser
    /// handles each one.
    ///
    /// Returns every file selected since the last `catalog`, so repeated
    /// calls may list a file more than once. Bindings are keyed by file and
    /// are unaffected by the duplicates. A glob that fails against a tree is
    /// reported once per pass, however often it is re-selected.
    pub fn select_files(&mut self, trees: &[&dyn TreeReader]) -> &[FileRef] {
        for tree in trees {
            for (path, parser) in &self.path_parsers {
                if let Some(file) = tree.file(path) {
                    register(
                        &mut self.selected_files,
                        &mut self.bindings,
                        vec![file],
                        Rule::Path(path.clone()),
                        parser,
                    );
                }
            }

            for (pattern, parser) in &self.glob_parsers {
                match tree.files_by_glob(pattern) {
                    Ok(files) => register(
                        &mut self.selected_files,
                        &mut self.bindings,
                        files,
                        Rule::Glob(pattern.clone()),
                        parser,
                    ),
                    Err(e) => {
                        let diagnostic = Diagnostic::GlobQueryFailed {
                            tree: tree.id(),
                            pattern: pattern.clone(),
                            reason: e.to_string(),
                        };
                        if !self.diagnostics.contains(&diagnostic) {
                            self.diagnostics.report(diagnostic);
                        }
                    }
                }
            }
        }

        &self.selected_files
    }

    /// Run every bound parser over its resolved contents.
    ///
    /// Never fails as a whole: a file missing from `contents` or rejected by
    /// its parser is recorded in the report and skipped. Each record is
    /// stamped with `found_by` and the single file that produced it. All
    /// pending state is taken up front, so the cataloger is empty again
    /// however this returns.
    pub fn catalog(&mut self, contents: &Contents, found_by: &str) -> CatalogReport {
        let bindings = std::mem::take(&mut self.bindings);
        let mut diagnostics = std::mem::take(&mut self.diagnostics);
        self.selected_files.clear();

        let mut packages = Vec::new();

        for (file, binding) in bindings {
            let Some(content) = contents.get(&file) else {
                diagnostics.report(Diagnostic::MissingContent {
                    cataloger: found_by.to_string(),
                    file,
                });
                continue;
            };

            let mut reader = Cursor::new(content.as_bytes());
            let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
                binding.parser.parse(&mut reader)
            }));

            let entries = match outcome {
                Ok(Ok(entries)) => entries,
                Ok(Err(e)) => {
                    diagnostics.report(Diagnostic::ParseFailed {
                        cataloger: found_by.to_string(),
                        file,
                        reason: format!("{e:#}"),
                    });
                    continue;
                }
                Err(payload) => {
                    diagnostics.report(Diagnostic::ParseFailed {
                        cataloger: found_by.to_string(),
                        file,
                        reason: format!("parser panicked: {}", panic_message(&*payload)),
                    });
                    continue;
                }
            };

            debug!(
                cataloger = %found_by,
                file = %file,
                rule = %binding.rule,
                packages = entries.len(),
                "parsed file"
            );

            for mut entry in entries {
                entry.found_by = found_by.to_string();
                entry.source = vec![file.clone()];
                packages.push(entry);
            }
        }

        CatalogReport {
            packages,
            diagnostics: diagnostics.into_vec(),
        }
    }

    /// Current bindings in file order
    pub fn bindings(&self) -> impl Iterator<Item = (&FileRef, &Rule)> {
        self.bindings.iter().map(|(file, binding)| (file, &binding.rule))
    }

    /// Files selected since the last `catalog`
    pub fn selected_files(&self) -> &[FileRef] {
        &self.selected_files
    }

    /// Conditions reported by selection since the last `catalog`
    pub fn diagnostics(&self) -> &[Diagnostic] {
        self.diagnostics.as_slice()
    }

    /// Exact-path selectors in processing order
    pub fn path_rules(&self) -> impl Iterator<Item = &str> {
        self.path_parsers.keys().map(|s| s.as_str())
    }

    /// Glob selectors in processing order
    pub fn glob_rules(&self) -> impl Iterator<Item = &str> {
        self.glob_parsers.keys().map(|s| s.as_str())
    }
}

/// Pair a set of files with a parser for the coming `catalog` call
fn register(
    selected_files: &mut Vec<FileRef>,
    bindings: &mut BTreeMap<FileRef, Binding>,
    files: Vec<FileRef>,
    rule: Rule,
    parser: &ParserFn,
) {
    for file in files {
        let binding = Binding {
            rule: rule.clone(),
            parser: parser.clone(),
        };
        if let Some(previous) = bindings.insert(file.clone(), binding) {
            debug!(file = %file, previous = %previous.rule, rule = %rule, "binding replaced");
        }
        selected_files.push(file);
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.as_str()
    } else {
        "unknown panic"
    }
}

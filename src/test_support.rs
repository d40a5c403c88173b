//! Shared fixtures for unit tests

use crate::cataloger::ParserFn;
use crate::pkg::Package;
use anyhow::{bail, Context};
use std::io::Read;
use std::sync::{Arc, Once};

static INIT: Once = Once::new();

/// Install a test-writer subscriber once; filter with RUST_LOG
pub fn init_test_logging() {
    INIT.call_once(|| {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

        let _ = tracing_subscriber::registry()
            .with(
                tracing_subscriber::fmt::layer()
                    .with_test_writer()
                    .with_target(true),
            )
            .with(tracing_subscriber::filter::EnvFilter::from_default_env())
            .try_init();
    });
}

/// `name version` per non-empty line; anything else is an error
pub fn parse_name_version(reader: &mut dyn Read) -> anyhow::Result<Vec<Package>> {
    let mut text = String::new();
    reader.read_to_string(&mut text).context("reading manifest")?;

    let mut packages = Vec::new();
    for (idx, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let Some((name, version)) = line.split_once(' ') else {
            bail!("line {}: expected 'name version', got '{}'", idx + 1, line);
        };
        packages.push(Package::new(name, version.trim()));
    }
    Ok(packages)
}

/// Records the parser's label as the package name, for telling parsers apart
pub fn labelled(label: &'static str) -> ParserFn {
    Arc::new(move |_reader: &mut dyn Read| -> anyhow::Result<Vec<Package>> {
        Ok(vec![Package::new(label, "0")])
    })
}

pub fn failing(reason: &'static str) -> ParserFn {
    Arc::new(move |_reader: &mut dyn Read| -> anyhow::Result<Vec<Package>> { bail!(reason) })
}

pub fn name_version() -> ParserFn {
    Arc::new(parse_name_version)
}

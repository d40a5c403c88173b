//! Turns file references into text so catalogers can parse them.
//!
//! Resolution is best-effort. A reference that cannot be resolved is left
//! out of the returned map; the cataloger reports it as missing content.


use crate::tree::{FileRef, FileTree};
use std::collections::HashMap;
use tracing::warn;

/// Resolved file contents keyed by reference
pub type Contents = HashMap<FileRef, String>;

pub trait ContentResolver {
    fn resolve(&self, files: &[FileRef]) -> Contents;
}

impl ContentResolver for FileTree {
    fn resolve(&self, files: &[FileRef]) -> Contents {
        let mut contents = Contents::new();
        for file in files {
            if contents.contains_key(file) {
                continue;
            }
            if let Some(text) = resolve_one(self, file) {
                contents.insert(file.clone(), text);
            }
        }
        contents
    }
}

impl ContentResolver for [FileTree] {
    fn resolve(&self, files: &[FileRef]) -> Contents {
        let mut contents = Contents::new();
        for file in files {
            if contents.contains_key(file) {
                continue;
            }
            let Some(tree) = self.iter().find(|tree| tree.id() == file.tree) else {
                warn!(file = %file, "no snapshot owns this reference");
                continue;
            };
            if let Some(text) = resolve_one(tree, file) {
                contents.insert(file.clone(), text);
            }
        }
        contents
    }
}

impl ContentResolver for Vec<FileTree> {
    fn resolve(&self, files: &[FileRef]) -> Contents {
        self.as_slice().resolve(files)
    }
}

fn resolve_one(tree: &FileTree, file: &FileRef) -> Option<String> {
    let Some(bytes) = tree.contents(file) else {
        warn!(file = %file, "reference not found in snapshot");
        return None;
    };

    match std::str::from_utf8(bytes) {
        Ok(text) => Some(text.to_string()),
        Err(e) => {
            warn!(file = %file, error = %e, "file is not valid UTF-8");
            None
        }
    }
}

use crate::tree::TreeError;
use std::path::{Component, Path};

pub struct PathSanitizer;

impl PathSanitizer {
    /// Normalize a tree path into its rooted form (`/etc/os-release`).
    ///
    /// Snapshots are rooted, so a leading `/` is optional on input and
    /// always present on output. Rejects:
    /// - Directory traversal (../)
    /// - Empty paths or paths with no real components
    ///
    /// Hidden files (starting with .) are allowed; dotfiles are common manifests.
    pub fn sanitize(raw_path: &str) -> Result<String, TreeError> {
        Self::sanitize_with_options(raw_path, true)
    }

    /// Like `sanitize`, but with `allow_hidden` false any component that
    /// starts with `.` (`/app/.git/config`, `/root/.npmrc`) is rejected as
    /// `InvalidPath`.
    pub fn sanitize_with_options(raw_path: &str, allow_hidden: bool) -> Result<String, TreeError> {
        if raw_path.is_empty() {
            return Err(TreeError::InvalidPath("Empty path".to_string()));
        }

        let path = Path::new(raw_path);
        let mut components = Vec::new();

        for component in path.components() {
            match component {
                // The snapshot root is implied
                Component::RootDir => continue,
                Component::Prefix(_) => {
                    return Err(TreeError::InvalidPath(format!(
                        "Drive prefixes not allowed: {}",
                        raw_path
                    )));
                }
                Component::ParentDir => {
                    return Err(TreeError::InvalidPath(format!(
                        "Parent directory traversal not allowed: {}",
                        raw_path
                    )));
                }
                Component::CurDir => continue,
                Component::Normal(part) => {
                    let part_str = part.to_str().ok_or_else(|| {
                        TreeError::InvalidPath(format!("Invalid UTF-8 in path: {:?}", part))
                    })?;

                    if !allow_hidden && part_str.starts_with('.') {
                        return Err(TreeError::InvalidPath(format!(
                            "Hidden files not allowed: {}",
                            raw_path
                        )));
                    }

                    components.push(part_str);
                }
            }
        }

        if components.is_empty() {
            return Err(TreeError::InvalidPath(format!(
                "No valid components: {}",
                raw_path
            )));
        }

        Ok(format!("/{}", components.join("/")))
    }
}

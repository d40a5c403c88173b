use serde::Serialize;

/// Packaging ecosystem a record belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PackageKind {
    /// Alpine packages
    Apk,
    /// Debian packages
    Deb,
    /// RPM packages
    Rpm,
    Npm,
    /// Python wheels, eggs and requirements
    Python,
    /// Ruby gems
    Gem,
    /// Go modules
    Go,
    /// Java archives
    Java,
    Unknown,
}

/// Language ecosystem, when the package has one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Python,
    JavaScript,
    Ruby,
    Go,
    Java,
    Unknown,
}

impl PackageKind {
    /// Language implied by the ecosystem, if any
    pub fn language(&self) -> Language {
        match self {
            PackageKind::Npm => Language::JavaScript,
            PackageKind::Python => Language::Python,
            PackageKind::Gem => Language::Ruby,
            PackageKind::Go => Language::Go,
            PackageKind::Java => Language::Java,
            PackageKind::Apk | PackageKind::Deb | PackageKind::Rpm | PackageKind::Unknown => {
                Language::Unknown
            }
        }
    }
}

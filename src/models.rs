use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Where a piece of license text was captured from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SourceKind {
    /// A short structured field such as a manifest's `license`.
    ManifestField,
    /// The content of a LICENSE or README document.
    FileContent,
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceKind::ManifestField => write!(f, "manifest field"),
            SourceKind::FileContent => write!(f, "file content"),
        }
    }
}

/// Raw license-bearing text plus its provenance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LicenseText {
    content: String,
    origin: Option<String>,
    kind: SourceKind,
}

impl LicenseText {
    pub fn manifest_field(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            origin: None,
            kind: SourceKind::ManifestField,
        }
    }

    pub fn file_content(content: impl Into<String>, origin: Option<String>) -> Self {
        Self {
            content: content.into(),
            origin,
            kind: SourceKind::FileContent,
        }
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn origin(&self) -> Option<&str> {
        self.origin.as_deref()
    }

    pub fn kind(&self) -> SourceKind {
        self.kind
    }

    /// True when the origin filename has a `readme` stem (`README`, `readme.md`, ...).
    pub fn is_readme(&self) -> bool {
        self.origin
            .as_deref()
            .and_then(|o| Path::new(o).file_name())
            .map(|name| name.to_string_lossy().to_ascii_lowercase())
            .is_some_and(|name| name.starts_with("readme"))
    }
}

/// Best label produced by the text classifier.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassificationResult {
    pub license: String,
    /// Posterior probability of `license` among all trained labels, in `[0, 1]`.
    pub confidence: f64,
}

/// Ordered set of canonical license names; insertion order is kept and
/// duplicates are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LicenseSet(Vec<String>);

impl LicenseSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `license` unless it is already present. Returns whether it was added.
    pub fn insert(&mut self, license: impl Into<String>) -> bool {
        let license = license.into();
        if self.0.contains(&license) {
            return false;
        }
        self.0.push(license);
        true
    }

    pub fn contains(&self, license: &str) -> bool {
        self.0.iter().any(|l| l == license)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn into_vec(self) -> Vec<String> {
        self.0
    }
}

impl<S: Into<String>> FromIterator<S> for LicenseSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = LicenseSet::new();
        for license in iter {
            set.insert(license);
        }
        set
    }
}

impl<'a> IntoIterator for &'a LicenseSet {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for LicenseSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join(", "))
    }
}

/// How the pipeline arrived at a [`LicenseSet`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DetectionMethod {
    Pattern,
    Alias,
    Classifier,
}

impl fmt::Display for DetectionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DetectionMethod::Pattern => write!(f, "pattern"),
            DetectionMethod::Alias => write!(f, "alias"),
            DetectionMethod::Classifier => write!(f, "classifier"),
        }
    }
}

/// Successful outcome of one pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Detection {
    pub licenses: LicenseSet,
    pub method: DetectionMethod,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
}

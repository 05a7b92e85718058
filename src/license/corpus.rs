//! Reference license texts the classifier is trained on.
//!
//! The texts are compiled into the binary from the crate's `licenses/`
//! directory; each file is one reference document for its canonical name.

/// One reference document per entry; a canonical name may appear more than once.
const BUNDLED: &[(&str, &str)] = &[
    ("MIT", include_str!("../../licenses/MIT.txt")),
    ("ISC", include_str!("../../licenses/ISC.txt")),
    ("BSD 2-Clause", include_str!("../../licenses/BSD-2-Clause.txt")),
    ("BSD 3-Clause", include_str!("../../licenses/BSD-3-Clause.txt")),
    ("Apache 2.0", include_str!("../../licenses/Apache-2.0.txt")),
    ("GPL 2.0", include_str!("../../licenses/GPL-2.0.txt")),
    ("GPL 3.0", include_str!("../../licenses/GPL-3.0.txt")),
    ("LGPL 3.0", include_str!("../../licenses/LGPL-3.0.txt")),
    ("MPL 2.0", include_str!("../../licenses/MPL-2.0.txt")),
    ("Unlicense", include_str!("../../licenses/Unlicense.txt")),
    ("WTFPL", include_str!("../../licenses/WTFPL.txt")),
];

/// Labeled reference documents, keyed by canonical license name.
#[derive(Debug, Clone, Default)]
pub struct TrainingCorpus {
    documents: Vec<(String, String)>,
}

impl TrainingCorpus {
    pub fn new() -> Self {
        Self::default()
    }

    /// The reference texts shipped with the crate.
    pub fn bundled() -> Self {
        BUNDLED
            .iter()
            .fold(Self::new(), |corpus, (name, text)| corpus.with_document(*name, *text))
    }

    /// Add one reference document for `license`.
    pub fn with_document(mut self, license: impl Into<String>, text: impl Into<String>) -> Self {
        self.documents.push((license.into(), text.into()));
        self
    }

    pub fn documents(&self) -> impl Iterator<Item = (&str, &str)> {
        self.documents
            .iter()
            .map(|(name, text)| (name.as_str(), text.as_str()))
    }

    /// Distinct canonical names, in first-seen order.
    pub fn licenses(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for (name, _) in self.documents() {
            if !names.contains(&name) {
                names.push(name);
            }
        }
        names
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

//! Report renderers for resolution results.
//!
//! - [`terminal`]: colored summary box plus resolution tables; respects `--verbose` / `--quiet`.
//! - JSON output is the serialized [`Entry`] list (see `main`).

pub mod terminal;

use serde::Serialize;

use license_resolver::resolver::Resolution;

/// Resolution outcome for one requested package, manifest or file.
#[derive(Debug, Serialize)]
pub struct Entry {
    pub subject: String,
    #[serde(flatten)]
    pub outcome: Outcome,
}

#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum Outcome {
    Resolved(Resolution),
    /// No strategy found license information.
    Unresolved,
    /// A collaborator or input failure; `error` is the full error chain.
    Failed { error: String },
}

impl Entry {
    pub fn new(subject: impl Into<String>, outcome: Outcome) -> Self {
        Self {
            subject: subject.into(),
            outcome,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.outcome, Outcome::Failed { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use license_resolver::models::DetectionMethod;
    use license_resolver::resolver::Strategy;

    #[test]
    fn test_json_shape() {
        let entries = vec![
            Entry::new(
                "left-pad",
                Outcome::Resolved(Resolution {
                    licenses: ["MIT"].into_iter().collect(),
                    strategy: Strategy::Registry,
                    method: DetectionMethod::Pattern,
                    origin: "license".into(),
                    confidence: None,
                }),
            ),
            Entry::new("ghost", Outcome::Unresolved),
            Entry::new(
                "flaky",
                Outcome::Failed {
                    error: "timed out".into(),
                },
            ),
        ];

        let json = serde_json::to_value(&entries).unwrap();
        assert_eq!(
            json,
            serde_json::json!([
                {
                    "subject": "left-pad",
                    "status": "resolved",
                    "licenses": ["MIT"],
                    "strategy": "registry",
                    "method": "pattern",
                    "origin": "license"
                },
                { "subject": "ghost", "status": "unresolved" },
                { "subject": "flaky", "status": "failed", "error": "timed out" }
            ])
        );
        assert!(entries[2].is_failed());
        assert!(!entries[1].is_failed());
    }
}

//! Splits dual/multi-license expressions ("MIT and GPL", "MIT/GPL") into their parts.

use std::sync::LazyLock;

use regex::Regex;

use super::aliases::Aliases;
use crate::models::LicenseSet;

/// `/` and `,` split anywhere; `and`/`or` only as whitespace-delimited words.
static SEPARATOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\s*/\s*|\s*,\s*|\s+(?:and|or)\s+").expect("separator regex is valid")
});

/// Split every candidate with the built-in alias table.
pub fn split<S: AsRef<str>>(candidates: &[S]) -> LicenseSet {
    split_with(candidates, &Aliases::builtin())
}

/// Split every candidate into license fragments and deduplicate them, keeping
/// first-seen order.
///
/// A candidate that is, as a whole, a known alias is kept intact even when it
/// contains a separator ("Apache, Version 2.0"). Fragments are returned raw;
/// mapping them to canonical names is the caller's job.
pub fn split_with<S: AsRef<str>>(candidates: &[S], aliases: &Aliases) -> LicenseSet {
    let mut set = LicenseSet::new();

    for candidate in candidates {
        let candidate = candidate.as_ref().trim();
        if candidate.is_empty() {
            continue;
        }

        if aliases.canonical(candidate).is_some() {
            set.insert(candidate);
            continue;
        }

        for fragment in SEPARATOR.split(candidate) {
            let fragment =
                fragment.trim_matches(|c: char| c.is_whitespace() || c == '(' || c == ')');
            if !fragment.is_empty() {
                set.insert(fragment);
            }
        }
    }

    set
}

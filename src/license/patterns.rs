//! Fast-path recognizer for license mentions in short strings.

use std::sync::LazyLock;

use regex::RegexSet;

/// Checked in order; the first license with any matching pattern wins.
const PATTERNS: &[(&str, &[&str])] = &[
    ("BSD", &[r"\bBSD"]),
    // `\b` keeps "LGPL" from being reported as GPL.
    ("GPL", &[r"\bGPL", r"\bGPLv2"]),
    ("LGPL", &[r"\bLGPL"]),
    ("MIT", &[r"\bMIT\b", r"\(MIT\)"]),
    ("Apache", &[r"Apache\s?(?i:licen[cs]e)"]),
    ("MPL", &[r"\bMPL"]),
    (
        "WTFPL",
        &[
            r"(?i)do\s+what\s+the\s+fuck\s+you\s+want\s+to\s+public\s+licen[cs]e",
            r"WTFPL",
        ],
    ),
];

struct CompiledPatterns {
    set: RegexSet,
    /// Index into `PATTERNS` for every regex in `set`.
    owners: Vec<usize>,
}

static COMPILED: LazyLock<CompiledPatterns> = LazyLock::new(|| {
    let mut sources = Vec::new();
    let mut owners = Vec::new();
    for (idx, (_, regexes)) in PATTERNS.iter().enumerate() {
        for re in regexes.iter() {
            sources.push(*re);
            owners.push(idx);
        }
    }

    CompiledPatterns {
        set: RegexSet::new(sources).expect("license patterns are valid regexes"),
        owners,
    }
});

/// Return the canonical name of the first license mentioned in `text`.
pub fn match_license(text: &str) -> Option<&'static str> {
    if text.is_empty() {
        return None;
    }

    let compiled = &*COMPILED;
    compiled
        .set
        .matches(text)
        .iter()
        .map(|i| compiled.owners[i])
        .min()
        .map(|idx| PATTERNS[idx].0)
}

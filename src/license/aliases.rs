use std::collections::HashMap;
use std::sync::LazyLock;

/// Built-in alias table: canonical name followed by every spelling that maps to it.
///
/// Family names ("BSD", "GPL", ...) are the names reported by the pattern
/// matcher; versioned names are the labels of the bundled training corpus.
const BUILTIN: &[(&str, &[&str])] = &[
    (
        "MIT",
        &["MIT", "MIT License", "The MIT License", "MIT/X11", "X11", "Expat"],
    ),
    ("ISC", &["ISC", "ISC License"]),
    ("BSD", &["BSD", "BSD License", "BSD-style"]),
    (
        "BSD 2-Clause",
        &[
            "BSD-2-Clause",
            "BSD 2-Clause",
            "BSD 2-Clause License",
            "Simplified BSD",
            "FreeBSD",
            "BSD-2",
        ],
    ),
    (
        "BSD 3-Clause",
        &[
            "BSD-3-Clause",
            "BSD 3-Clause",
            "BSD 3-Clause License",
            "New BSD",
            "New BSD License",
            "Modified BSD",
            "Revised BSD",
            "BSD-3",
        ],
    ),
    ("Apache", &["Apache", "Apache License"]),
    (
        "Apache 2.0",
        &[
            "Apache-2.0",
            "Apache 2.0",
            "Apache 2",
            "Apache2",
            "Apache v2",
            "Apache License 2.0",
            "Apache License v2",
            "Apache License Version 2.0",
            "Apache License, Version 2.0",
            "Apache, Version 2.0",
            "Apache Software License 2.0",
            "ASL 2.0",
        ],
    ),
    ("GPL", &["GPL", "GNU GPL", "GNU General Public License"]),
    (
        "GPL 2.0",
        &[
            "GPL-2.0",
            "GPL-2.0-only",
            "GPL-2.0-or-later",
            "GPL-2.0+",
            "GPL 2.0",
            "GPL v2",
            "GPLv2",
            "GPLv2+",
            "GNU GPL v2",
            "GNU GPLv2",
            "GNU General Public License v2",
            "GNU General Public License, Version 2",
        ],
    ),
    (
        "GPL 3.0",
        &[
            "GPL-3.0",
            "GPL-3.0-only",
            "GPL-3.0-or-later",
            "GPL-3.0+",
            "GPL 3.0",
            "GPL v3",
            "GPLv3",
            "GPLv3+",
            "GNU GPL v3",
            "GNU GPLv3",
            "GNU General Public License v3",
            "GNU General Public License, Version 3",
        ],
    ),
    (
        "LGPL",
        &["LGPL", "GNU LGPL", "GNU Lesser General Public License"],
    ),
    (
        "LGPL 3.0",
        &[
            "LGPL-3.0",
            "LGPL-3.0-only",
            "LGPL-3.0-or-later",
            "LGPL-3.0+",
            "LGPL 3.0",
            "LGPL v3",
            "LGPLv3",
            "GNU LGPL v3",
            "GNU LGPLv3",
        ],
    ),
    ("MPL", &["MPL", "Mozilla Public License"]),
    (
        "MPL 2.0",
        &[
            "MPL-2.0",
            "MPL 2.0",
            "MPL v2",
            "MPLv2",
            "Mozilla Public License 2.0",
            "Mozilla Public License, Version 2.0",
        ],
    ),
    ("Unlicense", &["Unlicense", "The Unlicense"]),
    (
        "WTFPL",
        &["WTFPL", "Do What The Fuck You Want To Public License"],
    ),
];

static BUILTIN_INDEX: LazyLock<HashMap<String, &'static str>> = LazyLock::new(|| {
    BUILTIN
        .iter()
        .flat_map(|(canonical, spellings)| spellings.iter().map(move |s| (fold(s), *canonical)))
        .collect()
});

/// Case- and whitespace-insensitive lookup key.
fn fold(raw: &str) -> String {
    raw.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Maps the many ways of writing a license name onto one canonical name.
///
/// Configured aliases are consulted before the built-in table.
#[derive(Debug, Clone, Default)]
pub struct Aliases {
    extra: HashMap<String, String>,
}

impl Aliases {
    /// Only the built-in table.
    pub fn builtin() -> Self {
        Self::default()
    }

    /// Built-ins plus `extra` (alias → canonical name) entries.
    pub fn with_extra<I, K, V>(extra: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        Self {
            extra: extra
                .into_iter()
                .map(|(alias, canonical)| (fold(alias.as_ref()), canonical.into()))
                .collect(),
        }
    }

    /// Canonical name for `raw`, if it is a known alias.
    pub fn canonical(&self, raw: &str) -> Option<&str> {
        let key = fold(raw);
        if key.is_empty() {
            return None;
        }

        self.extra
            .get(&key)
            .map(String::as_str)
            .or_else(|| BUILTIN_INDEX.get(&key).copied())
    }

    /// Canonical name for `raw`, or the trimmed input when it is not a known alias.
    pub fn normalize(&self, raw: &str) -> String {
        match self.canonical(raw) {
            Some(name) => name.to_string(),
            None => raw.trim().to_string(),
        }
    }
}

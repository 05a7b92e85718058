//! Source-code hosts: repository references, candidate license files and the
//! [`FileHost`] collaborator used to list and fetch them.

pub mod github;
mod repo;

use std::future::Future;

use serde::Deserialize;

pub use repo::{RepoRef, DEFAULT_HOST};

use crate::error::Result;

/// File stems that may carry license information.
const CANDIDATE_STEMS: &[&str] = &["license", "readme"];

/// Extensions accepted after a candidate stem (`README.md`, `license.rst`, ...).
const CANDIDATE_EXTENSIONS: &[&str] = &[
    "markdown", "mdown", "md", "textile", "rdoc", "org", "creole", "mediawiki", "rst", "asciidoc",
    "adoc", "asc", "pod",
];

/// One entry of a repository directory listing.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FileEntry {
    pub name: String,
    #[serde(default)]
    pub size: u64,
    #[serde(rename = "type", default = "default_entry_type")]
    pub kind: String,
}

fn default_entry_type() -> String {
    "file".to_string()
}

impl FileEntry {
    pub fn file(name: impl Into<String>, size: u64) -> Self {
        Self {
            name: name.into(),
            size,
            kind: default_entry_type(),
        }
    }
}

/// A source host able to list a repository's root and fetch raw files.
///
/// Not-found (unknown or moved repository, missing file) is `Ok(None)`.
pub trait FileHost {
    fn list_files(
        &self,
        repo: &RepoRef,
    ) -> impl Future<Output = Result<Option<Vec<FileEntry>>>> + Send;

    fn fetch_raw(
        &self,
        repo: &RepoRef,
        filename: &str,
    ) -> impl Future<Output = Result<Option<String>>> + Send;

    /// Follow a single redirect hop from the repository's web location and
    /// return the repository it points to, if it moved.
    fn follow_redirect(
        &self,
        repo: &RepoRef,
    ) -> impl Future<Output = Result<Option<RepoRef>>> + Send;
}

/// Rank of a candidate file, lower is searched first.
fn candidate_rank(name: &str) -> Option<u8> {
    let lower = name.to_ascii_lowercase();
    let exact = |stem: &str| {
        lower == stem
            || lower
                .strip_prefix(stem)
                .and_then(|rest| rest.strip_prefix('.'))
                .is_some_and(|ext| CANDIDATE_EXTENSIONS.contains(&ext))
    };

    if exact(CANDIDATE_STEMS[0]) {
        Some(0)
    } else if lower.contains(CANDIDATE_STEMS[0]) {
        Some(1)
    } else if exact(CANDIDATE_STEMS[1]) {
        Some(2)
    } else if lower.contains(CANDIDATE_STEMS[1]) {
        Some(3)
    } else {
        None
    }
}

/// Keep non-empty files whose names may carry license information, LICENSE
/// files first, then README files; listing order is kept within a rank.
pub fn candidate_files(entries: Vec<FileEntry>) -> Vec<FileEntry> {
    let mut ranked: Vec<(u8, FileEntry)> = entries
        .into_iter()
        .filter(|entry| entry.kind == "file" && entry.size > 0)
        .filter_map(|entry| candidate_rank(&entry.name).map(|rank| (rank, entry)))
        .collect();

    ranked.sort_by_key(|(rank, _)| *rank);
    ranked.into_iter().map(|(_, entry)| entry).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(entries: Vec<FileEntry>) -> Vec<String> {
        candidate_files(entries).into_iter().map(|e| e.name).collect()
    }

    #[test]
    fn test_candidate_filter_and_order() {
        let entries = vec![
            FileEntry::file("README.md", 120),
            FileEntry::file("index.js", 900),
            FileEntry::file("LICENSE-MIT", 1000),
            FileEntry::file("LICENSE", 1000),
            FileEntry::file("license.rst", 0),
            FileEntry::file("Readme.textile", 10),
            FileEntry {
                name: "license".into(),
                size: 0,
                kind: "dir".into(),
            },
        ];
        assert_eq!(
            names(entries),
            vec!["LICENSE", "LICENSE-MIT", "README.md", "Readme.textile"]
        );
    }

    #[test]
    fn test_all_extensions_accepted() {
        for ext in CANDIDATE_EXTENSIONS {
            assert_eq!(candidate_rank(&format!("LICENSE.{}", ext)), Some(0));
            assert_eq!(candidate_rank(&format!("readme.{}", ext)), Some(2));
        }
        assert_eq!(candidate_rank("LICENSE.txt"), Some(1));
        assert_eq!(candidate_rank("package.json"), None);
    }

    #[test]
    fn test_deserialize_github_listing() {
        let json = r#"[
            { "name": "LICENSE", "size": 1077, "type": "file", "sha": "abc" },
            { "name": "lib", "size": 0, "type": "dir" }
        ]"#;
        let entries: Vec<FileEntry> = serde_json::from_str(json).unwrap();
        assert_eq!(entries[0], FileEntry::file("LICENSE", 1077));
        assert_eq!(entries[1].kind, "dir");
    }
}

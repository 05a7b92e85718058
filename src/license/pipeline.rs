//! Turns one license source (manifest field, LICENSE file, README) into a
//! [`Detection`].
//!
//! - Manifest fields take the cheap path: pattern matcher / alias table, then
//!   the splitter, then canonical-name normalization.
//! - LICENSE-like documents go through the trained classifier.
//! - READMEs have their license section (or the whole README) scanned line by
//!   line with the pattern matcher and alias table. When nothing is named, the
//!   same text is handed to the classifier.
//!
//! The pipeline does no I/O and holds no mutable state.

use super::aliases::Aliases;
use super::classifier::LicenseClassifier;
use super::patterns::match_license;
use super::splitter::split_with;
use super::tokenizer::tokenize;
use crate::models::{Detection, DetectionMethod, LicenseSet, LicenseText, SourceKind};

#[derive(Debug, Clone)]
pub struct Pipeline<'a> {
    classifier: &'a LicenseClassifier,
    aliases: Aliases,
    min_confidence: f64,
}

impl<'a> Pipeline<'a> {
    pub fn new(classifier: &'a LicenseClassifier, aliases: Aliases) -> Self {
        Self {
            classifier,
            aliases,
            min_confidence: 0.0,
        }
    }

    /// Treat classifier results below `min_confidence` as absent.
    pub fn with_min_confidence(mut self, min_confidence: f64) -> Self {
        self.min_confidence = min_confidence;
        self
    }

    pub fn aliases(&self) -> &Aliases {
        &self.aliases
    }

    /// Resolve a single captured text according to its source kind.
    pub fn resolve(&self, input: &LicenseText) -> Option<Detection> {
        match input.kind() {
            SourceKind::ManifestField => self.resolve_fields(&[input.content()]),
            SourceKind::FileContent if input.is_readme() => self.resolve_readme(input.content()),
            SourceKind::FileContent => self.resolve_document(input.content()),
        }
    }

    /// Resolve the license fields of a manifest (one entry per field value).
    ///
    /// Fields are accepted when the pattern matcher recognizes any of them or
    /// when any split fragment is a known alias. Each fragment is then reduced
    /// to a canonical name through the alias table or the pattern matcher;
    /// unknown companions ("Commercial") are kept verbatim.
    pub fn resolve_fields<S: AsRef<str>>(&self, fields: &[S]) -> Option<Detection> {
        let fragments = split_with(fields, &self.aliases);
        if fragments.is_empty() {
            return None;
        }

        let method = if fields.iter().any(|f| match_license(f.as_ref()).is_some()) {
            DetectionMethod::Pattern
        } else if fragments.iter().any(|f| self.aliases.canonical(f).is_some()) {
            DetectionMethod::Alias
        } else {
            tracing::debug!(fields = %fragments, "manifest fields not recognized");
            return None;
        };

        Some(Detection {
            licenses: fragments.iter().map(|f| self.normalize(f)).collect(),
            method,
            confidence: None,
        })
    }

    /// Classify a full license document.
    pub fn resolve_document(&self, text: &str) -> Option<Detection> {
        let tokens = tokenize(text, self.classifier.window());
        let result = self.classifier.classify_tokens(&tokens)?;

        if result.confidence < self.min_confidence {
            tracing::debug!(
                license = %result.license,
                confidence = result.confidence,
                floor = self.min_confidence,
                "classification below confidence floor"
            );
            return None;
        }

        let mut licenses = LicenseSet::new();
        licenses.insert(result.license);
        Some(Detection {
            licenses,
            method: DetectionMethod::Classifier,
            confidence: Some(result.confidence),
        })
    }

    /// Look for license mentions in a README, preferring its license section.
    /// Falls back to classifying that text when no license is named.
    pub fn resolve_readme(&self, text: &str) -> Option<Detection> {
        let section = license_section(text);
        let haystack = section.as_deref().unwrap_or(text);

        let mut licenses = LicenseSet::new();
        let mut method = DetectionMethod::Alias;
        for line in haystack.lines() {
            if let Some(family) = match_license(line) {
                licenses.insert(self.aliases.normalize(family));
                method = DetectionMethod::Pattern;
                continue;
            }
            let fragments = split_with(&[mention(line)], &self.aliases);
            for fragment in &fragments {
                if let Some(name) = self.aliases.canonical(fragment) {
                    licenses.insert(name);
                }
            }
        }

        if licenses.is_empty() {
            tracing::debug!("no license named in readme, classifying");
            return self.resolve_document(haystack);
        }

        Some(Detection {
            licenses,
            method,
            confidence: None,
        })
    }

    fn normalize(&self, fragment: &str) -> String {
        if let Some(name) = self.aliases.canonical(fragment) {
            return name.to_string();
        }
        match match_license(fragment) {
            Some(family) => self.aliases.normalize(family),
            None => fragment.trim().to_string(),
        }
    }
}

/// Strip list markers, emphasis and a leading `License:` label from a README line.
fn mention(line: &str) -> &str {
    let line = line.trim_start_matches(|c: char| c.is_whitespace() || "#*-+>".contains(c));
    let line = match line.split_once(':') {
        Some((label, rest)) if is_license_heading(label) => rest,
        _ => line,
    };
    line.trim().trim_matches(['*', '_', '`', '.']).trim()
}

/// Extract the "License" section of a README: the heading line through the
/// line before the next heading. Recognizes markdown (`## License`),
/// underlined (`License` / `=======`) and inline (`License: MIT`) headings.
/// Lines inside fenced code blocks never end the section.
fn license_section(text: &str) -> Option<String> {
    let lines: Vec<&str> = text.lines().collect();
    let start = lines.iter().position(|line| is_license_heading(line))?;

    let mut section = vec![lines[start]];
    let mut in_fence = false;
    for (offset, line) in lines[start + 1..].iter().enumerate() {
        let idx = start + 1 + offset;
        let trimmed = line.trim_start();
        if trimmed.starts_with("```") || trimmed.starts_with("~~~") {
            in_fence = !in_fence;
        } else if !in_fence {
            if trimmed.starts_with('#') {
                break;
            }
            // The next line being an underline makes this one a heading.
            if lines.get(idx + 1).is_some_and(|next| is_underline(next)) {
                break;
            }
        }
        section.push(line);
    }

    Some(section.join("\n"))
}

fn is_license_heading(line: &str) -> bool {
    let heading = line
        .trim()
        .trim_start_matches('#')
        .trim()
        .trim_end_matches(':')
        .to_ascii_lowercase();

    let word = heading.split([' ', ':']).next().unwrap_or("");
    matches!(word, "license" | "licence" | "licensing" | "licenses" | "licences")
}

fn is_underline(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.len() >= 3 && trimmed.chars().all(|c| c == '=' || c == '-')
}

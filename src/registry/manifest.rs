use std::path::Path;

use anyhow::Result;
use serde_json::Value;

use crate::host::RepoRef;

/// README text npm stores when a package was published without one.
const NPM_MISSING_README: &str = "ERROR: No README data found!";

/// A package's declared metadata (`package.json` or a registry document).
///
/// The schema is loose on purpose: every accessor returns `None` or an empty
/// list for shapes it does not understand instead of failing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Manifest(Value);

impl Manifest {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    /// Read a local `package.json`.
    pub fn from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(Self(serde_json::from_str(&content)?))
    }

    pub fn name(&self) -> Option<&str> {
        self.0.get("name").and_then(Value::as_str)
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    /// Every license string declared by the manifest, in declaration order.
    ///
    /// Understands `license: "MIT"`, `license: {type}`, `licenses: "MIT"`,
    /// `licenses: ["MIT", {type}]` and `licenses: {key: {type}}`.
    pub fn license_fields(&self) -> Vec<String> {
        if let Some(license) = self.0.get("license").and_then(license_name) {
            return vec![license];
        }

        match self.0.get("licenses") {
            Some(Value::String(s)) if !s.trim().is_empty() => vec![s.clone()],
            Some(Value::Array(items)) => items.iter().filter_map(license_name).collect(),
            Some(Value::Object(map)) => map.values().filter_map(license_name).collect(),
            _ => Vec::new(),
        }
    }

    /// First repository-ish URL pointing at `host`, looking at `repository`,
    /// then `bugs`/`issues`, then `homepage`. Shorthand specifiers
    /// (`user/repo`, `github:user/repo`) count as pointing at their implied host.
    pub fn repository_url(&self, host: &str) -> Option<&str> {
        self.candidate_urls()
            .find(|url| RepoRef::parse(url).is_some_and(|repo| repo.host.eq_ignore_ascii_case(host)))
    }

    /// The repository on `host` this package points at.
    pub fn repository(&self, host: &str) -> Option<RepoRef> {
        self.repository_url(host).and_then(RepoRef::parse)
    }

    fn candidate_urls(&self) -> impl Iterator<Item = &str> {
        ["repository", "bugs", "issues", "homepage"]
            .into_iter()
            .filter_map(|key| self.0.get(key))
            .flat_map(url_values)
    }

    /// Embedded README text, if the manifest carries a real one.
    pub fn readme(&self) -> Option<&str> {
        self.0
            .get("readme")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|r| !r.is_empty() && *r != NPM_MISSING_README)
    }

    /// Filename the README was published under, when the registry records it.
    pub fn readme_filename(&self) -> Option<&str> {
        self.0.get("readmeFilename").and_then(Value::as_str)
    }

    /// Fill fields missing from this manifest with the values from `fallback`.
    pub fn merge_missing(&mut self, fallback: &Value, keys: &[&str]) {
        let Value::Object(map) = &mut self.0 else {
            return;
        };
        for key in keys {
            if map.get(*key).map_or(true, Value::is_null) {
                if let Some(value) = fallback.get(*key) {
                    map.insert(key.to_string(), value.clone());
                }
            }
        }
    }
}

/// A license entry is either a plain string or an object with a `type`.
fn license_name(value: &Value) -> Option<String> {
    let name = match value {
        Value::String(s) => s.as_str(),
        Value::Object(map) => map.get("type").and_then(Value::as_str)?,
        _ => return None,
    };
    let name = name.trim();
    (!name.is_empty()).then(|| name.to_string())
}

/// A URL is either a string or an object with `url` and/or `web` properties.
fn url_values(value: &Value) -> Vec<&str> {
    match value {
        Value::String(s) => vec![s.as_str()],
        Value::Object(map) => ["url", "web"]
            .into_iter()
            .filter_map(|key| map.get(key).and_then(Value::as_str))
            .collect(),
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_license_string() {
        let manifest = Manifest::new(json!({ "license": "MIT" }));
        assert_eq!(manifest.license_fields(), vec!["MIT"]);
    }

    #[test]
    fn test_license_object() {
        let manifest = Manifest::new(json!({ "license": { "type": "BSD", "url": "x" } }));
        assert_eq!(manifest.license_fields(), vec!["BSD"]);
    }

    #[test]
    fn test_licenses_array() {
        let manifest = Manifest::new(json!({
            "licenses": [
                { "type": "LGPL", "url": "http://example.com/lgpl" },
                "EPL",
                { "url": "no type" },
                { "type": "Commercial" }
            ]
        }));
        assert_eq!(manifest.license_fields(), vec!["LGPL", "EPL", "Commercial"]);
    }

    #[test]
    fn test_licenses_object_and_string() {
        let manifest = Manifest::new(json!({ "licenses": { "main": { "type": "MIT" }, "bad": 4 } }));
        assert_eq!(manifest.license_fields(), vec!["MIT"]);

        let manifest = Manifest::new(json!({ "licenses": "Apache-2.0" }));
        assert_eq!(manifest.license_fields(), vec!["Apache-2.0"]);
    }

    #[test]
    fn test_malformed_license_fields() {
        for value in [
            json!({}),
            json!({ "license": 42 }),
            json!({ "license": "" }),
            json!({ "licenses": null }),
            json!([1, 2, 3]),
        ] {
            assert!(Manifest::new(value).license_fields().is_empty());
        }
    }

    #[test]
    fn test_repository_url_lookup_order() {
        let manifest = Manifest::new(json!({
            "repository": { "type": "git", "url": "git://github.com/user/repo.git" },
            "bugs": { "url": "https://github.com/other/repo/issues" }
        }));
        assert_eq!(
            manifest.repository_url("github.com"),
            Some("git://github.com/user/repo.git")
        );

        let manifest = Manifest::new(json!({
            "repository": "https://gitlab.com/user/repo",
            "bugs": { "web": "https://github.com/user/repo/issues" }
        }));
        assert_eq!(
            manifest.repository_url("github.com"),
            Some("https://github.com/user/repo/issues")
        );

        let manifest = Manifest::new(json!({ "repository": ["github.com"] }));
        assert_eq!(manifest.repository_url("github.com"), None);

        let manifest = Manifest::new(json!({
            "repository": { "url": "https://gitlab.com/user/repo.git", "web": "https://github.com/user/repo" }
        }));
        assert_eq!(
            manifest.repository_url("github.com"),
            Some("https://github.com/user/repo")
        );
    }

    #[test]
    fn test_repository_shorthand_forms() {
        for spec in ["github:acme/widget", "acme/widget", "git@github.com:acme/widget.git"] {
            let manifest = Manifest::new(json!({ "repository": spec }));
            assert_eq!(manifest.repository_url("github.com"), Some(spec));
            let repo = manifest.repository("github.com").unwrap();
            assert_eq!((repo.user.as_str(), repo.repo.as_str()), ("acme", "widget"));
        }

        let manifest = Manifest::new(json!({ "repository": "acme/widget" }));
        assert_eq!(manifest.repository_url("gitlab.com"), None);

        let manifest = Manifest::new(json!({ "homepage": "https://example.com/docs/widget" }));
        assert_eq!(manifest.repository("github.com"), None);
    }

    #[test]
    fn test_readme_sentinel_is_absent() {
        let manifest = Manifest::new(json!({ "readme": "ERROR: No README data found!" }));
        assert_eq!(manifest.readme(), None);

        let manifest = Manifest::new(json!({ "readme": "# hi\n\nMIT" }));
        assert_eq!(manifest.readme(), Some("# hi\n\nMIT"));
    }

    #[test]
    fn test_merge_missing() {
        let mut manifest = Manifest::new(json!({ "name": "a", "readme": null }));
        manifest.merge_missing(
            &json!({ "name": "b", "readme": "text", "repository": "r" }),
            &["name", "readme", "repository"],
        );
        assert_eq!(manifest.name(), Some("a"));
        assert_eq!(manifest.readme(), Some("text"));
        assert_eq!(manifest.as_value()["repository"], "r");
    }

    #[test]
    fn test_from_path() {
        let mut f = NamedTempFile::new().unwrap();
        write!(f, r#"{{ "name": "widget", "license": "ISC" }}"#).unwrap();
        let manifest = Manifest::from_path(f.path()).unwrap();
        assert_eq!(manifest.name(), Some("widget"));
        assert_eq!(manifest.license_fields(), vec!["ISC"]);
    }
}

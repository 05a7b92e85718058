use reqwest::{Client, StatusCode};
use serde_json::Value;

use super::{Manifest, ManifestSource};
use crate::error::{Error, Result};

pub const DEFAULT_REGISTRY_URL: &str = "https://registry.npmjs.org";

/// Packument fields copied into the latest version's manifest when it lacks them.
const PACKUMENT_FALLBACKS: &[&str] = &[
    "readme",
    "readmeFilename",
    "repository",
    "bugs",
    "homepage",
    "license",
    "licenses",
];

/// Manifest source backed by an npm-compatible registry.
#[derive(Debug, Clone)]
pub struct NpmRegistry {
    client: Client,
    base_url: String,
}

impl NpmRegistry {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn package_url(&self, name: &str) -> String {
        // Scoped packages need URL encoding: @scope/pkg → @scope%2Fpkg
        format!("{}/{}", self.base_url, name.replace('/', "%2F"))
    }
}

impl ManifestSource for NpmRegistry {
    /// Fetch the packument and return its latest version's manifest.
    async fn get_manifest(&self, name: &str) -> Result<Option<Manifest>> {
        let url = self.package_url(name);
        tracing::debug!(%url, "fetching package manifest");

        let response = self
            .client
            .get(&url)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| Error::transport(&url, e))?;

        match response.status() {
            StatusCode::NOT_FOUND => return Ok(None),
            status if !status.is_success() => return Err(Error::Status { url, status }),
            _ => {}
        }

        let packument: Value = response.json().await.map_err(|e| Error::decode(&url, e))?;
        Ok(Some(latest_manifest(packument)))
    }
}

/// Pick `versions[dist-tags.latest]`, falling back to the packument itself
/// for documents without version data (e.g. `/{name}/{version}` responses).
fn latest_manifest(packument: Value) -> Manifest {
    let latest = packument
        .get("dist-tags")
        .and_then(|d| d.get("latest"))
        .and_then(Value::as_str)
        .and_then(|ver| packument.get("versions")?.get(ver))
        .cloned();

    match latest {
        Some(version) => {
            let mut manifest = Manifest::new(version);
            manifest.merge_missing(&packument, PACKUMENT_FALLBACKS);
            manifest
        }
        None => Manifest::new(packument),
    }
}

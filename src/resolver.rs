//! Multi-source license resolution.
//!
//! A package's license is looked up through an ordered list of [`Strategy`]
//! variants. Each variant declares whether it can work with a manifest
//! ([`Strategy::supported`]) and the resolver stops at the first one that
//! yields a [`Detection`]. No strategy succeeding is a normal outcome
//! (`Ok(None)`); only collaborator transport failures are errors.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::host::{candidate_files, FileEntry, FileHost, RepoRef};
use crate::license::pipeline::Pipeline;
use crate::models::{Detection, DetectionMethod, LicenseSet, LicenseText};
use crate::registry::{Manifest, ManifestSource};

/// Order used when none is configured.
pub const DEFAULT_ORDER: [Strategy; 3] = [Strategy::Registry, Strategy::Content, Strategy::Github];

/// One source of license information for a package.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// License fields declared in the manifest.
    Registry,
    /// README text embedded in the manifest.
    Content,
    /// LICENSE and README files in the package's repository.
    Github,
}

impl Strategy {
    /// Whether `manifest` carries what this strategy needs. `host` is the
    /// source host name repository URLs must point at.
    pub fn supported(&self, manifest: &Manifest, host: &str) -> bool {
        match self {
            Strategy::Registry => !manifest.license_fields().is_empty(),
            Strategy::Content => manifest.readme().is_some(),
            Strategy::Github => manifest.repository(host).is_some(),
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::Registry => write!(f, "registry"),
            Strategy::Content => write!(f, "content"),
            Strategy::Github => write!(f, "github"),
        }
    }
}

impl FromStr for Strategy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "registry" => Ok(Strategy::Registry),
            "content" => Ok(Strategy::Content),
            "github" => Ok(Strategy::Github),
            other => Err(format!("unknown strategy '{}'", other)),
        }
    }
}

/// A resolved license set together with where and how it was found.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Resolution {
    pub licenses: LicenseSet,
    pub strategy: Strategy,
    pub method: DetectionMethod,
    /// Manifest field, README filename or `host/user/repo/FILE` the licenses came from.
    pub origin: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
}

impl Resolution {
    pub fn new(detection: Detection, strategy: Strategy, origin: impl Into<String>) -> Self {
        Self {
            licenses: detection.licenses,
            strategy,
            method: detection.method,
            origin: origin.into(),
            confidence: detection.confidence,
        }
    }
}

/// Walks the configured strategies for a package until one succeeds.
pub struct Resolver<'a, M, H> {
    pipeline: Pipeline<'a>,
    registry: M,
    host: H,
    host_name: String,
    order: Vec<Strategy>,
}

impl<'a, M: ManifestSource, H: FileHost> Resolver<'a, M, H> {
    pub fn new(pipeline: Pipeline<'a>, registry: M, host: H) -> Self {
        Self {
            pipeline,
            registry,
            host,
            host_name: crate::host::DEFAULT_HOST.to_string(),
            order: DEFAULT_ORDER.to_vec(),
        }
    }

    pub fn with_order(mut self, order: Vec<Strategy>) -> Self {
        self.order = order;
        self
    }

    /// Host name repository URLs must contain to be searched.
    pub fn with_host_name(mut self, host_name: impl Into<String>) -> Self {
        self.host_name = host_name.into();
        self
    }

    pub fn pipeline(&self) -> &Pipeline<'a> {
        &self.pipeline
    }

    /// Fetch `name`'s manifest from the registry and resolve it. An unknown
    /// package resolves to `None`.
    pub async fn resolve_package(&self, name: &str) -> Result<Option<Resolution>> {
        let Some(manifest) = self.registry.get_manifest(name).await? else {
            tracing::debug!(package = name, "package not found in registry");
            return Ok(None);
        };
        self.resolve_manifest(&manifest).await
    }

    pub async fn resolve_manifest(&self, manifest: &Manifest) -> Result<Option<Resolution>> {
        let package = manifest.name().unwrap_or("<unnamed>");

        for &strategy in &self.order {
            if !strategy.supported(manifest, &self.host_name) {
                tracing::debug!(package, %strategy, "strategy not supported");
                continue;
            }

            tracing::debug!(package, %strategy, "trying strategy");
            if let Some(resolution) = self.run(strategy, manifest).await? {
                tracing::debug!(
                    package,
                    %strategy,
                    licenses = %resolution.licenses,
                    "license resolved"
                );
                return Ok(Some(resolution));
            }
        }

        tracing::debug!(package, "no strategy resolved a license");
        Ok(None)
    }

    async fn run(&self, strategy: Strategy, manifest: &Manifest) -> Result<Option<Resolution>> {
        match strategy {
            Strategy::Registry => Ok(self.from_registry(manifest)),
            Strategy::Content => Ok(self.from_content(manifest)),
            Strategy::Github => self.from_host(manifest).await,
        }
    }

    fn from_registry(&self, manifest: &Manifest) -> Option<Resolution> {
        let fields = manifest.license_fields();
        let detection = self.pipeline.resolve_fields(&fields)?;
        Some(Resolution::new(detection, Strategy::Registry, "license"))
    }

    fn from_content(&self, manifest: &Manifest) -> Option<Resolution> {
        let origin = manifest.readme_filename().unwrap_or("README").to_string();
        let text = LicenseText::file_content(manifest.readme()?, Some(origin.clone()));
        let detection = self.pipeline.resolve(&text)?;
        Some(Resolution::new(detection, Strategy::Content, origin))
    }

    async fn from_host(&self, manifest: &Manifest) -> Result<Option<Resolution>> {
        let Some(repo) = manifest.repository(&self.host_name) else {
            return Ok(None);
        };

        let Some((repo, entries)) = self.list_files(repo).await? else {
            return Ok(None);
        };

        for entry in candidate_files(entries) {
            tracing::debug!(%repo, file = %entry.name, "searching candidate file");

            let Some(content) = self.host.fetch_raw(&repo, &entry.name).await? else {
                continue;
            };
            let text = LicenseText::file_content(content, Some(entry.name.clone()));
            if let Some(detection) = self.pipeline.resolve(&text) {
                let origin = format!("{}/{}", repo, entry.name);
                return Ok(Some(Resolution::new(detection, Strategy::Github, origin)));
            }
        }

        Ok(None)
    }

    /// List the repository root, following one redirect hop when the
    /// repository is not found under its declared name.
    async fn list_files(&self, repo: RepoRef) -> Result<Option<(RepoRef, Vec<FileEntry>)>> {
        if let Some(entries) = self.host.list_files(&repo).await? {
            return Ok(Some((repo, entries)));
        }

        let Some(moved) = self.host.follow_redirect(&repo).await? else {
            tracing::debug!(%repo, "repository not found");
            return Ok(None);
        };

        tracing::warn!(from = %repo, to = %moved, "repository moved, following redirect");
        let entries = self.host.list_files(&moved).await?;
        Ok(entries.map(|entries| (moved, entries)))
    }
}

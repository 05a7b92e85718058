use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, LOCATION, USER_AGENT};
use reqwest::{redirect, Client, Response, StatusCode};

use super::{FileEntry, FileHost, RepoRef};
use crate::config::HostConfig;
use crate::error::{Error, Result};

const CLIENT_USER_AGENT: &str = concat!("license-resolver/", env!("CARGO_PKG_VERSION"));

/// [`FileHost`] backed by the GitHub contents API and raw file host.
#[derive(Debug, Clone)]
pub struct GithubHost {
    client: Client,
    /// Same settings as `client` but never follows redirects, used to read
    /// the `Location` of a moved repository.
    redirect_client: Client,
    api_url: String,
    raw_url: String,
    web_url: String,
}

impl GithubHost {
    pub fn new(config: &HostConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(CLIENT_USER_AGENT));

        let token = config
            .token
            .clone()
            .or_else(|| std::env::var("GITHUB_TOKEN").ok())
            .filter(|t| !t.trim().is_empty());
        if let Some(token) = token {
            match HeaderValue::from_str(&format!("Bearer {}", token.trim())) {
                Ok(mut value) => {
                    value.set_sensitive(true);
                    headers.insert(AUTHORIZATION, value);
                }
                Err(_) => tracing::warn!("ignoring GitHub token with invalid characters"),
            }
        }

        let timeout = Duration::from_secs(config.timeout_secs);
        let client = Client::builder()
            .timeout(timeout)
            .default_headers(headers.clone())
            .build()
            .map_err(Error::Client)?;
        let redirect_client = Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .redirect(redirect::Policy::none())
            .build()
            .map_err(Error::Client)?;

        Ok(Self {
            client,
            redirect_client,
            api_url: config.api_url.trim_end_matches('/').to_string(),
            raw_url: config.raw_url.trim_end_matches('/').to_string(),
            web_url: config.web_url.trim_end_matches('/').to_string(),
        })
    }

    fn contents_url(&self, repo: &RepoRef) -> String {
        format!("{}/repos/{}/{}/contents/", self.api_url, repo.user, repo.repo)
    }

    fn raw_file_url(&self, repo: &RepoRef, filename: &str) -> String {
        format!("{}/{}/{}/HEAD/{}", self.raw_url, repo.user, repo.repo, filename)
    }

    fn repo_web_url(&self, repo: &RepoRef) -> String {
        format!("{}/{}/{}", self.web_url, repo.user, repo.repo)
    }

    async fn get(&self, url: &str, accept: &'static str) -> Result<Option<Response>> {
        let response = self
            .client
            .get(url)
            .header(ACCEPT, accept)
            .send()
            .await
            .map_err(|e| Error::transport(url, e))?;

        match response.status() {
            StatusCode::NOT_FOUND => Ok(None),
            status if !status.is_success() => Err(Error::Status {
                url: url.to_string(),
                status,
            }),
            _ => Ok(Some(response)),
        }
    }
}

impl FileHost for GithubHost {
    async fn list_files(&self, repo: &RepoRef) -> Result<Option<Vec<FileEntry>>> {
        let url = self.contents_url(repo);
        tracing::debug!(%url, "listing repository files");

        let Some(response) = self.get(&url, "application/vnd.github+json").await? else {
            return Ok(None);
        };
        let entries = response.json().await.map_err(|e| Error::decode(&url, e))?;
        Ok(Some(entries))
    }

    async fn fetch_raw(&self, repo: &RepoRef, filename: &str) -> Result<Option<String>> {
        let url = self.raw_file_url(repo, filename);
        tracing::debug!(%url, "fetching raw file");

        let Some(response) = self.get(&url, "text/plain").await? else {
            return Ok(None);
        };
        let text = response.text().await.map_err(|e| Error::decode(&url, e))?;
        Ok(Some(text))
    }

    async fn follow_redirect(&self, repo: &RepoRef) -> Result<Option<RepoRef>> {
        let url = self.repo_web_url(repo);
        let response = self
            .redirect_client
            .get(&url)
            .send()
            .await
            .map_err(|e| Error::transport(&url, e))?;

        if !response.status().is_redirection() {
            return Ok(None);
        }

        let target = response
            .headers()
            .get(LOCATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|location| redirect_target(&self.web_url, location));

        Ok(target.filter(|moved| moved != repo))
    }
}

/// Resolve a `Location` header (absolute or host-relative) to a repository.
fn redirect_target(web_url: &str, location: &str) -> Option<RepoRef> {
    if location.starts_with('/') {
        RepoRef::parse(&format!("{}{}", web_url, location))
    } else {
        RepoRef::parse(location)
    }
}

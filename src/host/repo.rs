use std::fmt;

use serde::Serialize;

/// Host assumed for `github:user/repo` and bare `user/repo` shorthands.
pub const DEFAULT_HOST: &str = "github.com";

/// A repository on a source host, normalized to `{host, user, repo}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct RepoRef {
    pub host: String,
    pub user: String,
    pub repo: String,
}

impl RepoRef {
    pub fn new(host: impl Into<String>, user: impl Into<String>, repo: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            user: user.into(),
            repo: repo.into(),
        }
    }

    /// Parse a repository URL in any of the common forms:
    ///
    /// - `git://host/user/repo.git`, `git+https://…`, `git+ssh://git@host/…`
    /// - `git@host:user/repo.git`
    /// - `https://host/user/repo/tree/main/…` (extra path segments ignored)
    /// - `github:user/repo` and bare `user/repo`
    ///
    /// Returns `None` when no `user/repo` pair can be extracted.
    pub fn parse(url: &str) -> Option<Self> {
        let url = url.trim();
        let url = url.split(['#', '?']).next().unwrap_or(url);

        let (host, path) = if let Some(path) = url.strip_prefix("github:") {
            (DEFAULT_HOST, path)
        } else if let Some((_, rest)) = url.split_once("://") {
            let rest = strip_userinfo(rest);
            let (authority, path) = rest.split_once('/')?;
            (strip_port(authority), path)
        } else if let Some((authority, path)) = scp_like(url) {
            (authority, path)
        } else {
            let (first, rest) = url.split_once('/')?;
            if first.contains('.') {
                (first, rest)
            } else {
                (DEFAULT_HOST, url)
            }
        };

        let mut segments = path.split('/').filter(|s| !s.is_empty());
        let user = segments.next()?;
        let repo = segments.next()?;
        let repo = repo.strip_suffix(".git").unwrap_or(repo);

        if host.is_empty() || user.is_empty() || repo.is_empty() {
            return None;
        }
        Some(Self::new(host.to_ascii_lowercase(), user, repo))
    }

    /// `https://{host}/{user}/{repo}`
    pub fn web_url(&self) -> String {
        format!("https://{}/{}/{}", self.host, self.user, self.repo)
    }
}

impl fmt::Display for RepoRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.host, self.user, self.repo)
    }
}

fn strip_userinfo(rest: &str) -> &str {
    let authority_end = rest.find('/').unwrap_or(rest.len());
    match rest[..authority_end].rfind('@') {
        Some(at) => &rest[at + 1..],
        None => rest,
    }
}

fn strip_port(authority: &str) -> &str {
    authority.split(':').next().unwrap_or(authority)
}

/// `git@host:user/repo.git`
fn scp_like(url: &str) -> Option<(&str, &str)> {
    let (_, rest) = url.split_once('@')?;
    let (host, path) = rest.split_once(':')?;
    (!host.contains('/')).then_some((host, path))
}

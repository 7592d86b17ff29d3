use std::str::FromStr;
use std::time::Duration;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use fy_core::FetchLimits;
use reqwest::blocking::Client;
use reqwest::header::ACCEPT;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::files::{contains_binary_content, detect_language, is_binary_extension};
use crate::{ContextError, ContextFile, ContextSource};

pub const GITHUB_API_BASE: &str = "https://api.github.com";
pub const DEFAULT_BRANCH: &str = "main";

const USER_AGENT: &str = concat!("flowify/", env!("CARGO_PKG_VERSION"));
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// A repository (and optionally a sub-directory) to pull context from.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GitHubRepo {
    pub owner: String,
    pub repo: String,
    pub branch: String,
    /// Only files whose path starts with this prefix are fetched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl GitHubRepo {
    #[must_use]
    pub fn new(owner: impl Into<String>, repo: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            repo: repo.into(),
            branch: DEFAULT_BRANCH.to_string(),
            path: None,
        }
    }
}

impl FromStr for GitHubRepo {
    type Err = ContextError;

    fn from_str(spec: &str) -> Result<Self, Self::Err> {
        parse_repo_spec(spec)
    }
}

/// Parse `owner/repo[@branch][:path]` or a `github.com` URL, optionally
/// pointing into a `tree/<branch>/<path>`.
pub fn parse_repo_spec(spec: &str) -> Result<GitHubRepo, ContextError> {
    let trimmed = spec.trim();
    let invalid = || ContextError::InvalidRepoSpec(trimmed.to_string());

    let url_rest = ["https://github.com/", "http://github.com/", "github.com/"]
        .iter()
        .find_map(|prefix| trimmed.strip_prefix(prefix));
    if let Some(rest) = url_rest {
        let mut segments = rest.trim_end_matches('/').split('/');
        let owner = segments.next().filter(|s| !s.is_empty()).ok_or_else(invalid)?;
        let repo = segments
            .next()
            .map(|s| s.trim_end_matches(".git"))
            .filter(|s| !s.is_empty())
            .ok_or_else(invalid)?;
        let mut parsed = GitHubRepo::new(owner, repo);
        if let Some("tree" | "blob") = segments.next() {
            parsed.branch = segments
                .next()
                .filter(|s| !s.is_empty())
                .ok_or_else(invalid)?
                .to_string();
            let path = segments.collect::<Vec<_>>().join("/");
            parsed.path = (!path.is_empty()).then_some(path);
        }
        return Ok(parsed);
    }

    let (head, path) = match trimmed.split_once(':') {
        Some((head, path)) => (head, Some(path.trim_matches('/'))),
        None => (trimmed, None),
    };
    let (full_name, branch) = match head.split_once('@') {
        Some((name, branch)) => (name, Some(branch)),
        None => (head, None),
    };
    let (owner, repo) = full_name.split_once('/').ok_or_else(invalid)?;
    if owner.is_empty() || repo.is_empty() || repo.contains('/') {
        return Err(invalid());
    }

    let mut parsed = GitHubRepo::new(owner, repo);
    if let Some(branch) = branch {
        if branch.is_empty() {
            return Err(invalid());
        }
        parsed.branch = branch.to_string();
    }
    parsed.path = path.filter(|p| !p.is_empty()).map(str::to_string);
    Ok(parsed)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Blocking HTTP GET used by [`GitHubFetcher`].
pub trait Transport {
    fn get(&self, url: &str) -> Result<HttpResponse, ContextError>;
}

/// [`Transport`] over a `reqwest` blocking client.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
    token: Option<String>,
}

impl ReqwestTransport {
    /// `token` is sent as a bearer token to lift the anonymous rate limit.
    pub fn new(token: Option<String>) -> Result<Self, ContextError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|err| ContextError::Transport(err.to_string()))?;
        Ok(Self {
            client,
            token: token.filter(|token| !token.trim().is_empty()),
        })
    }
}

impl Transport for ReqwestTransport {
    fn get(&self, url: &str) -> Result<HttpResponse, ContextError> {
        let mut request = self
            .client
            .get(url)
            .header(ACCEPT, "application/vnd.github+json");
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }
        let response = request
            .send()
            .map_err(|err| ContextError::Transport(err.to_string()))?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .map_err(|err| ContextError::Transport(err.to_string()))?;
        Ok(HttpResponse { status, body })
    }
}

#[derive(Debug, Deserialize)]
struct TreeResponse {
    tree: Vec<TreeItem>,
    #[serde(default)]
    truncated: bool,
}

#[derive(Debug, Deserialize)]
struct TreeItem {
    path: String,
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    size: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct ContentResponse {
    content: String,
}

fn decode_json<T: DeserializeOwned>(url: &str, body: &str) -> Result<T, ContextError> {
    serde_json::from_str(body).map_err(|err| ContextError::Decode {
        url: url.to_string(),
        message: err.to_string(),
    })
}

/// Pulls text files from a repository through the GitHub REST API.
#[derive(Debug, Clone)]
pub struct GitHubFetcher<T> {
    transport: T,
    api_base: String,
    limits: FetchLimits,
}

impl<T: Transport> GitHubFetcher<T> {
    #[must_use]
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            api_base: GITHUB_API_BASE.to_string(),
            limits: FetchLimits::default(),
        }
    }

    #[must_use]
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }

    #[must_use]
    pub fn with_limits(mut self, limits: FetchLimits) -> Self {
        self.limits = limits;
        self
    }

    #[must_use]
    pub fn tree_url(&self, repo: &GitHubRepo) -> String {
        format!(
            "{}/repos/{}/{}/git/trees/{}?recursive=1",
            self.api_base, repo.owner, repo.repo, repo.branch
        )
    }

    #[must_use]
    pub fn contents_url(&self, repo: &GitHubRepo, path: &str) -> String {
        format!(
            "{}/repos/{}/{}/contents/{}?ref={}",
            self.api_base, repo.owner, repo.repo, path, repo.branch
        )
    }

    /// Fetch the readable text files of `repo`.
    ///
    /// Only the tree request can fail the whole fetch; individual files that
    /// cannot be fetched or decoded are skipped.
    pub fn fetch(&self, repo: &GitHubRepo) -> Result<Vec<ContextFile>, ContextError> {
        let tree_url = self.tree_url(repo);
        let response = self.transport.get(&tree_url)?;
        if !response.is_success() {
            return Err(ContextError::from_tree_status(response.status));
        }
        let tree: TreeResponse = decode_json(&tree_url, &response.body)?;
        if tree.truncated {
            warn!(owner = %repo.owner, repo = %repo.repo, "repository tree truncated by GitHub");
        }

        let prefix = repo.path.as_deref().unwrap_or_default();
        let candidates: Vec<TreeItem> = tree
            .tree
            .into_iter()
            .filter(|item| item.kind == "blob")
            .filter(|item| !is_binary_extension(&item.path))
            .filter(|item| item.size.unwrap_or(0) <= self.limits.max_file_size)
            .filter(|item| item.path.starts_with(prefix))
            .take(self.limits.max_files)
            .collect();
        debug!(candidates = candidates.len(), "selected repository files");

        let mut files = Vec::new();
        let mut total_size = 0_u64;
        for item in candidates {
            if total_size >= self.limits.max_total_size {
                debug!(total_size, "total size budget reached");
                break;
            }
            match self.fetch_file(repo, &item.path) {
                Ok(content) => {
                    let size = content.len() as u64;
                    total_size += size;
                    files.push(ContextFile {
                        name: item
                            .path
                            .rsplit('/')
                            .next()
                            .unwrap_or(&item.path)
                            .to_string(),
                        language: detect_language(&item.path).to_string(),
                        path: item.path,
                        content,
                        size,
                        source: ContextSource::Github,
                    });
                }
                Err(err) => debug!(path = %item.path, error = %err, "skipping file"),
            }
        }

        if files.is_empty() {
            return Err(ContextError::NoReadableFiles);
        }
        info!(
            owner = %repo.owner,
            repo = %repo.repo,
            files = files.len(),
            total_size,
            "fetched repository context"
        );
        Ok(files)
    }

    fn fetch_file(&self, repo: &GitHubRepo, path: &str) -> Result<String, ContextError> {
        let url = self.contents_url(repo, path);
        let response = self.transport.get(&url)?;
        if !response.is_success() {
            return Err(ContextError::Status(response.status));
        }
        let payload: ContentResponse = decode_json(&url, &response.body)?;
        let bytes = STANDARD
            .decode(payload.content.replace('\n', ""))
            .map_err(|err| ContextError::Decode {
                url: url.clone(),
                message: err.to_string(),
            })?;
        let content = String::from_utf8_lossy(&bytes).into_owned();
        if contains_binary_content(&content) {
            return Err(ContextError::Decode {
                url,
                message: "binary content".to_string(),
            });
        }
        Ok(content)
    }
}

//! GitHub REST ingestion
//!
//! Builds a [`RepoSnapshot`] from the public REST API: metadata, tree (with
//! branch fallbacks), languages, recent commits, README and a handful of
//! sampled files. Snapshots are cached per URL.

use std::sync::Arc;
use std::time::Duration;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use papergen_http::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use papergen_http::{HttpClient, HttpClientTrait, HttpConfig};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info, warn};
use url::Url;

use crate::cache::{TtlCache, DEFAULT_TTL};
use crate::errors::{GitHubError, Result};
use crate::models::{
    sort_languages, CommitSummary, LanguageStat, RepoMetadata, RepoRef, RepoSnapshot, SampledFile,
    TreeEntry,
};
use crate::sampling::{select_important_files, truncate_content};
use crate::url::extract_github_info;

/// Public GitHub API endpoint
pub const DEFAULT_API_BASE: &str = "https://api.github.com";

/// Branches tried when the default branch tree cannot be read
const FALLBACK_BRANCHES: &[&str] = &["main", "master", "develop", "dev"];

const ACCEPT_V3: &str = "application/vnd.github.v3+json";

/// Settings for [`GitHubClient`]
#[derive(Debug, Clone)]
pub struct GitHubClientConfig {
    pub api_base: String,
    pub token: Option<String>,
    pub cache_ttl: Duration,
}

impl Default for GitHubClientConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            token: None,
            cache_ttl: DEFAULT_TTL,
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawTree {
    #[serde(default)]
    tree: Vec<RawTreeItem>,
}

#[derive(Debug, Deserialize)]
struct RawTreeItem {
    #[serde(default)]
    path: String,
    #[serde(rename = "type", default)]
    kind: String,
}

#[derive(Debug, Deserialize)]
struct RawCommit {
    #[serde(default)]
    sha: String,
    #[serde(default)]
    commit: Option<RawCommitDetail>,
}

#[derive(Debug, Deserialize)]
struct RawCommitDetail {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    author: Option<RawCommitAuthor>,
}

#[derive(Debug, Deserialize)]
struct RawCommitAuthor {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    date: Option<String>,
}

impl From<RawCommit> for CommitSummary {
    fn from(raw: RawCommit) -> Self {
        let detail = raw.commit;
        let author = detail.as_ref().and_then(|d| d.author.as_ref());
        CommitSummary {
            sha: raw.sha,
            message: detail
                .as_ref()
                .and_then(|d| d.message.clone())
                .unwrap_or_else(|| "No message".to_string()),
            author: author
                .and_then(|a| a.name.clone())
                .unwrap_or_else(|| "Unknown".to_string()),
            date: author.and_then(|a| a.date.clone()),
        }
    }
}

/// Client for fetching repository snapshots
pub struct GitHubClient {
    http: Arc<dyn HttpClientTrait>,
    api_base: Url,
    token: Option<String>,
    cache: Arc<TtlCache<RepoSnapshot>>,
}

impl GitHubClient {
    /// Create a client with the GitHub HTTP preset
    pub fn new(config: GitHubClientConfig) -> Result<Self> {
        let http = HttpClient::new(HttpConfig::github())?;
        Self::with_http(Arc::new(http), config)
    }

    /// Create a client over an existing HTTP client
    pub fn with_http(http: Arc<dyn HttpClientTrait>, config: GitHubClientConfig) -> Result<Self> {
        let api_base = Url::parse(&config.api_base).map_err(|e| {
            GitHubError::invalid_input(format!("Invalid API base '{}': {}", config.api_base, e))
        })?;
        if api_base.cannot_be_a_base() {
            return Err(GitHubError::invalid_input(format!(
                "Invalid API base '{}'",
                config.api_base
            )));
        }

        Ok(Self {
            http,
            api_base,
            token: config.token.filter(|t| !t.is_empty()),
            cache: Arc::new(TtlCache::new(config.cache_ttl)),
        })
    }

    /// Snapshot cache shared by this client
    pub fn cache(&self) -> &Arc<TtlCache<RepoSnapshot>> {
        &self.cache
    }

    /// Cache key for a repository URL
    pub fn cache_key(url: &str) -> String {
        format!("github_repo:{}", url)
    }

    /// Fetch everything needed to describe the repository at `url`
    pub async fn fetch_snapshot(&self, url: &str) -> Result<RepoSnapshot> {
        let repo = extract_github_info(url)
            .ok_or_else(|| GitHubError::invalid_input(format!("Invalid GitHub URL: {}", url)))?;

        let key = Self::cache_key(url);
        if let Some(snapshot) = self.cache.get(&key) {
            info!(repo = %repo, "Using cached repository snapshot");
            return Ok(snapshot);
        }

        info!(repo = %repo, "Fetching repository snapshot");

        let metadata = self.fetch_metadata(&repo).await?;
        let default_branch = metadata
            .default_branch
            .clone()
            .filter(|b| !b.is_empty())
            .unwrap_or_else(|| "main".to_string());
        debug!(branch = %default_branch, "Repository default branch");

        let tree = self.fetch_tree(&repo, &default_branch).await;
        let languages = self.fetch_languages(&repo).await?;
        let commits = self.fetch_commits(&repo).await?;
        let readme = self.fetch_readme(&repo).await;
        let sampled_files = self.sample_important_files(&repo, &tree).await;

        let snapshot = RepoSnapshot {
            url: url.to_string(),
            repo,
            metadata,
            languages,
            commits,
            readme,
            tree,
            sampled_files,
        };

        self.cache.set(key, snapshot.clone());
        Ok(snapshot)
    }

    /// `GET /repos/{owner}/{repo}`
    pub async fn fetch_metadata(&self, repo: &RepoRef) -> Result<RepoMetadata> {
        let url = self.endpoint(repo, &[], &[])?;
        let body = self.get_json(&url).await.map_err(|e| {
            warn!(repo = %repo, error = %e, "Failed to fetch repository metadata");
            e
        })?;
        Ok(serde_json::from_value(body)?)
    }

    /// Repository tree with branch and contents fallbacks; never fails
    pub async fn fetch_tree(&self, repo: &RepoRef, default_branch: &str) -> Vec<TreeEntry> {
        match self.fetch_branch_tree(repo, default_branch).await {
            Ok(tree) => return tree,
            Err(e) => warn!(branch = default_branch, error = %e, "Tree fetch failed"),
        }

        for branch in FALLBACK_BRANCHES.iter().filter(|b| **b != default_branch) {
            debug!(branch, "Trying alternative branch");
            if let Ok(tree) = self.fetch_branch_tree(repo, branch).await {
                info!(branch, "Found repository tree on alternative branch");
                return tree;
            }
        }

        match self.fetch_root_contents(repo).await {
            Ok(tree) => tree,
            Err(e) => {
                warn!(repo = %repo, error = %e, "Contents fetch failed; using empty tree");
                Vec::new()
            }
        }
    }

    async fn fetch_branch_tree(&self, repo: &RepoRef, branch: &str) -> Result<Vec<TreeEntry>> {
        let url = self.endpoint(repo, &["git", "trees", branch], &[("recursive", "1")])?;
        let raw: RawTree = serde_json::from_value(self.get_json(&url).await?)?;
        Ok(raw
            .tree
            .into_iter()
            .map(|item| {
                if item.kind == "blob" {
                    TreeEntry::blob(item.path)
                } else {
                    TreeEntry::tree(item.path)
                }
            })
            .collect())
    }

    async fn fetch_root_contents(&self, repo: &RepoRef) -> Result<Vec<TreeEntry>> {
        let url = self.endpoint(repo, &["contents"], &[])?;
        let body = self.get_json(&url).await?;
        let items = body.as_array().cloned().unwrap_or_default();
        Ok(items
            .iter()
            .filter_map(Value::as_object)
            .map(|item| {
                let path = item
                    .get("path")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string();
                if item.get("type").and_then(Value::as_str) == Some("file") {
                    TreeEntry::blob(path)
                } else {
                    TreeEntry::tree(path)
                }
            })
            .collect())
    }

    /// `GET /repos/{owner}/{repo}/languages`, largest first
    pub async fn fetch_languages(&self, repo: &RepoRef) -> Result<Vec<LanguageStat>> {
        let url = self.endpoint(repo, &["languages"], &[])?;
        let body = self.get_json(&url).await.map_err(|e| {
            warn!(repo = %repo, error = %e, "Failed to fetch repository languages");
            e
        })?;

        let mut languages: Vec<LanguageStat> = body
            .as_object()
            .map(|map| {
                map.iter()
                    .map(|(name, bytes)| LanguageStat {
                        name: name.clone(),
                        bytes: bytes.as_u64().unwrap_or(0),
                    })
                    .collect()
            })
            .unwrap_or_default();
        sort_languages(&mut languages);
        Ok(languages)
    }

    /// Up to five most recent commits
    pub async fn fetch_commits(&self, repo: &RepoRef) -> Result<Vec<CommitSummary>> {
        let url = self.endpoint(repo, &["commits"], &[("per_page", "5")])?;
        let body = self.get_json(&url).await.map_err(|e| {
            warn!(repo = %repo, error = %e, "Failed to fetch repository commits");
            e
        })?;
        let raw: Vec<RawCommit> = serde_json::from_value(body)?;
        Ok(raw.into_iter().map(CommitSummary::from).collect())
    }

    /// README text, or `None` if absent or unreadable
    pub async fn fetch_readme(&self, repo: &RepoRef) -> Option<String> {
        let url = self.endpoint(repo, &["readme"], &[]).ok()?;
        match self.get_json(&url).await {
            Ok(body) => decode_content(&body),
            Err(e) => {
                info!(repo = %repo, error = %e, "No README found");
                None
            }
        }
    }

    /// Fetch the decoded content of one file
    pub async fn fetch_file(&self, repo: &RepoRef, path: &str) -> Result<Option<String>> {
        let mut segments = vec!["contents"];
        segments.extend(path.split('/').filter(|s| !s.is_empty()));
        let url = self.endpoint(repo, &segments, &[])?;
        let body = self.get_json(&url).await?;
        Ok(decode_content(&body))
    }

    async fn sample_important_files(&self, repo: &RepoRef, tree: &[TreeEntry]) -> Vec<SampledFile> {
        let blobs = tree
            .iter()
            .filter(|e| e.is_blob() && !e.path.is_empty())
            .map(|e| e.path.as_str());

        let mut sampled = Vec::new();
        for path in select_important_files(blobs) {
            match self.fetch_file(repo, path).await {
                Ok(Some(content)) => sampled.push(SampledFile {
                    path: path.to_string(),
                    content: truncate_content(&content),
                }),
                Ok(None) => {}
                Err(e) => debug!(path, error = %e, "Skipping sampled file"),
            }
        }
        sampled
    }

    async fn get_json(&self, url: &Url) -> Result<Value> {
        debug!(url = %url, "GET");
        Ok(self.http.get_json(url.as_str(), self.headers()).await?)
    }

    fn headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_V3));
        if let Some(token) = &self.token {
            match HeaderValue::from_str(&format!("token {}", token)) {
                Ok(value) => {
                    headers.insert(AUTHORIZATION, value);
                }
                Err(_) => warn!("GitHub token contains invalid header characters; ignoring"),
            }
        }
        headers
    }

    /// `{api_base}/repos/{owner}/{repo}/{segments...}?{query}`
    fn endpoint(&self, repo: &RepoRef, segments: &[&str], query: &[(&str, &str)]) -> Result<Url> {
        let mut url = self.api_base.clone();
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|_| GitHubError::invalid_input("API base cannot be a base URL"))?;
            path.pop_if_empty()
                .extend(["repos", repo.owner.as_str(), repo.repo.as_str()])
                .extend(segments);
        }
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        Ok(url)
    }
}

/// Decode the base64 `content` field of a contents API response
fn decode_content(body: &Value) -> Option<String> {
    let encoded = body.get("content").and_then(Value::as_str)?;
    let compact: String = encoded.chars().filter(|c| !c.is_whitespace()).collect();
    if compact.is_empty() {
        return None;
    }
    match STANDARD.decode(compact.as_bytes()) {
        Ok(bytes) => Some(String::from_utf8_lossy(&bytes).into_owned()),
        Err(e) => {
            debug!(error = %e, "Invalid base64 content");
            None
        }
    }
}

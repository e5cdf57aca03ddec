//! Data models for repository ingestion

use serde::{Deserialize, Serialize};

/// Owner/repository pair extracted from a GitHub URL
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RepoRef {
    /// Account or organization name
    pub owner: String,
    /// Repository name without a trailing `.git`
    pub repo: String,
}

impl RepoRef {
    /// Create a new repository reference
    pub fn new(owner: impl Into<String>, repo: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            repo: repo.into(),
        }
    }

    /// `owner/repo`
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.repo)
    }

    /// Canonical web URL
    pub fn html_url(&self) -> String {
        format!("https://github.com/{}/{}", self.owner, self.repo)
    }
}

impl std::fmt::Display for RepoRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}

/// License block of the repository metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct License {
    pub name: String,
}

/// Repository metadata as returned by `GET /repos/{owner}/{repo}`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RepoMetadata {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub stargazers_count: u64,
    #[serde(default)]
    pub forks_count: u64,
    #[serde(default)]
    pub watchers_count: u64,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub license: Option<License>,
    #[serde(default)]
    pub default_branch: Option<String>,
}

impl RepoMetadata {
    /// License name, if the repository declares one
    pub fn license_name(&self) -> Option<&str> {
        self.license.as_ref().map(|l| l.name.as_str())
    }
}

/// Bytes of code attributed to one language
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageStat {
    pub name: String,
    pub bytes: u64,
}

/// A commit reduced to what the paper needs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitSummary {
    pub sha: String,
    pub message: String,
    pub author: String,
    pub date: Option<String>,
}

impl CommitSummary {
    /// First line of the commit message
    pub fn headline(&self) -> &str {
        self.message.lines().next().unwrap_or("")
    }
}

/// Commit author identity
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Contributor {
    pub name: String,
    pub email: String,
}

/// Kind of a tree entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TreeEntryKind {
    Blob,
    Tree,
}

/// One path in the repository tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeEntry {
    pub path: String,
    pub kind: TreeEntryKind,
}

impl TreeEntry {
    pub fn blob(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            kind: TreeEntryKind::Blob,
        }
    }

    pub fn tree(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            kind: TreeEntryKind::Tree,
        }
    }

    pub fn is_blob(&self) -> bool {
        self.kind == TreeEntryKind::Blob
    }
}

/// A file whose (truncated) content was pulled into the snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SampledFile {
    pub path: String,
    pub content: String,
}

/// Everything the paper generator knows about a repository
///
/// Produced either by [`crate::GitHubClient::fetch_snapshot`] or by
/// [`crate::ClonedRepository::into_snapshot`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepoSnapshot {
    pub url: String,
    pub repo: RepoRef,
    pub metadata: RepoMetadata,
    /// Sorted by byte count, largest first
    pub languages: Vec<LanguageStat>,
    pub commits: Vec<CommitSummary>,
    pub readme: Option<String>,
    pub tree: Vec<TreeEntry>,
    pub sampled_files: Vec<SampledFile>,
}

impl RepoSnapshot {
    /// Language with the most bytes
    pub fn primary_language(&self) -> Option<&str> {
        self.languages.first().map(|l| l.name.as_str())
    }

    /// Total bytes across all languages
    pub fn total_language_bytes(&self) -> u64 {
        self.languages.iter().map(|l| l.bytes).sum()
    }

    /// Percentage share of each language, in snapshot order
    pub fn language_percentages(&self) -> Vec<(String, f64)> {
        let total = self.total_language_bytes();
        if total == 0 {
            return Vec::new();
        }
        self.languages
            .iter()
            .map(|l| (l.name.clone(), l.bytes as f64 / total as f64 * 100.0))
            .collect()
    }

    /// Display name, falling back to the URL's repository segment
    pub fn display_name(&self) -> &str {
        if self.metadata.name.is_empty() {
            &self.repo.repo
        } else {
            &self.metadata.name
        }
    }

    /// Count of blob entries in the tree
    pub fn file_count(&self) -> usize {
        self.tree.iter().filter(|e| e.is_blob()).count()
    }
}

/// Sort language stats by byte count, largest first, name as tiebreak
pub(crate) fn sort_languages(languages: &mut [LanguageStat]) {
    languages.sort_by(|a, b| b.bytes.cmp(&a.bytes).then_with(|| a.name.cmp(&b.name)));
}

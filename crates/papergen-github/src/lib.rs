//! GitHub repository ingestion for papergen
//!
//! This crate turns a repository URL into a `RepoSnapshot`, either through the
//! GitHub REST API or by cloning and sampling the repository locally:
//! - URL validation and owner/repo extraction
//! - Snapshot caching with a TTL
//! - Metadata, language, commit, README and file sampling over REST
//! - Shallow inspection of a local clone via git2
//! - Structural analysis (README digest, per-file summaries, directory tree)

pub mod analyzer;
pub mod cache;
pub mod client;
pub mod clone;
pub mod errors;
pub mod language;
pub mod models;
pub mod sampling;
pub mod url;

pub use analyzer::{
    analyze, summarize_code_file, summarize_readme, DirectoryNode, FileSummary, RepoAnalysis,
    RepoInfo,
};
pub use cache::TtlCache;
pub use client::{GitHubClient, GitHubClientConfig, DEFAULT_API_BASE};
pub use clone::{ClonedRepository, CloneMetadata, RepoFile, RepositoryCloner};
pub use errors::{GitHubError, Result};
pub use language::detect_language;
pub use models::{
    CommitSummary, Contributor, LanguageStat, RepoMetadata, RepoRef, RepoSnapshot, SampledFile,
    TreeEntry, TreeEntryKind,
};
pub use url::{extract_github_info, is_valid_github_url};

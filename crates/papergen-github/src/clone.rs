//! Local clone and sampling
//!
//! Clones a repository into a scratch directory, reads the relevant source
//! files and README, and extracts commit metadata with git2. The scratch
//! directory is removed when sampling finishes, whether or not it succeeded.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use git2::{Repository as Git2Repository, Sort, TreeWalkMode, TreeWalkResult};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::errors::{GitHubError, Result};
use crate::language::detect_language;
use crate::models::{
    sort_languages, CommitSummary, Contributor, LanguageStat, RepoMetadata, RepoRef, RepoSnapshot,
    SampledFile, TreeEntry,
};
use crate::sampling::{select_important_files, truncate_content};
use crate::url::extract_github_info;

/// Extensions read from a clone
pub const RELEVANT_EXTENSIONS: &[&str] = &[
    ".py", ".java", ".cpp", ".h", ".js", ".ts", ".md", ".txt", ".rst", ".json", ".yaml", ".yml",
];

const README_NAMES: &[&str] = &["README.md", "README.rst", "README.txt"];

const RECENT_COMMITS: usize = 5;

/// A file read from the clone
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoFile {
    /// Path relative to the repository root, `/`-separated
    pub path: String,
    pub content: String,
    /// Extension including the leading dot
    pub extension: String,
}

/// Git metadata of the cloned HEAD
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CloneMetadata {
    pub last_commit: String,
    pub branch: String,
    /// Entries (files and directories) in the HEAD tree
    pub total_files: usize,
    /// Unique authors in first-seen order, newest first
    pub contributors: Vec<Contributor>,
    pub recent_commits: Vec<CommitSummary>,
}

/// Result of cloning and sampling a repository
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClonedRepository {
    pub files: Vec<RepoFile>,
    pub readme: Option<String>,
    pub metadata: CloneMetadata,
}

impl ClonedRepository {
    /// Convert into the snapshot shape produced by the REST client
    pub fn into_snapshot(self, url: &str) -> RepoSnapshot {
        let repo = extract_github_info(url).unwrap_or_else(|| fallback_ref(url));

        let mut totals: HashMap<&'static str, u64> = HashMap::new();
        for file in &self.files {
            let language = detect_language(&file.path);
            if language != "Unknown" {
                *totals.entry(language).or_default() += file.content.len() as u64;
            }
        }
        let mut languages: Vec<LanguageStat> = totals
            .into_iter()
            .map(|(name, bytes)| LanguageStat {
                name: name.to_string(),
                bytes,
            })
            .collect();
        sort_languages(&mut languages);

        let sampled_files = select_important_files(self.files.iter().map(|f| f.path.as_str()))
            .into_iter()
            .filter_map(|path| self.files.iter().find(|f| f.path == path))
            .map(|f| SampledFile {
                path: f.path.clone(),
                content: truncate_content(&f.content),
            })
            .collect();

        let metadata = RepoMetadata {
            name: repo.repo.clone(),
            full_name: repo.full_name(),
            default_branch: Some(self.metadata.branch.clone()).filter(|b| !b.is_empty()),
            ..Default::default()
        };

        RepoSnapshot {
            url: url.to_string(),
            metadata,
            languages,
            commits: self.metadata.recent_commits,
            readme: self.readme,
            tree: self.files.iter().map(|f| TreeEntry::blob(&f.path)).collect(),
            sampled_files,
            repo,
        }
    }
}

/// Reference for non-GitHub URLs and local paths: last two path segments
fn fallback_ref(url: &str) -> RepoRef {
    let mut parts = url
        .trim_end_matches('/')
        .rsplit(['/', '\\', ':'])
        .filter(|s| !s.is_empty());
    let repo = parts.next().unwrap_or("repository");
    let repo = repo.strip_suffix(".git").unwrap_or(repo);
    let owner = parts.next().unwrap_or("local");
    RepoRef::new(owner, repo)
}

/// Clones repositories into scratch directories under a work directory
#[derive(Debug, Clone)]
pub struct RepositoryCloner {
    workdir: PathBuf,
}

impl RepositoryCloner {
    /// Create a cloner; `None` uses `<temp>/papergen-repos`
    pub fn new(workdir: Option<PathBuf>) -> Self {
        Self {
            workdir: workdir.unwrap_or_else(|| std::env::temp_dir().join("papergen-repos")),
        }
    }

    pub fn workdir(&self) -> &Path {
        &self.workdir
    }

    /// Clone `url` (optionally at `branch`) and sample its contents
    pub async fn clone_and_sample(
        &self,
        url: &str,
        branch: Option<&str>,
    ) -> Result<ClonedRepository> {
        let workdir = self.workdir.clone();
        let url = url.to_string();
        let branch = branch.map(str::to_string);

        tokio::task::spawn_blocking(move || clone_blocking(&workdir, &url, branch.as_deref()))
            .await
            .map_err(|e| GitHubError::Other(format!("Clone task failed: {}", e)))?
    }
}

impl Default for RepositoryCloner {
    fn default() -> Self {
        Self::new(None)
    }
}

fn clone_blocking(workdir: &Path, url: &str, branch: Option<&str>) -> Result<ClonedRepository> {
    std::fs::create_dir_all(workdir)?;
    let scratch = tempfile::Builder::new()
        .prefix("clone-")
        .tempdir_in(workdir)?;
    let target = scratch.path().join("repo");

    info!(url, branch = ?branch, target = %target.display(), "Cloning repository");

    let mut builder = git2::build::RepoBuilder::new();
    if let Some(branch) = branch {
        builder.branch(branch);
    }
    let repo = builder.clone(url, &target).map_err(|e| {
        GitHubError::GitError(format!("Failed to clone {}: {}", url, e.message()))
    })?;

    let files = collect_files(&target)?;
    let readme = read_readme(&target);
    let metadata = extract_metadata(&repo)?;

    debug!(
        files = files.len(),
        total_files = metadata.total_files,
        "Sampled cloned repository"
    );

    drop(repo);
    scratch.close()?;

    Ok(ClonedRepository {
        files,
        readme,
        metadata,
    })
}

/// Walk the checkout and read files with relevant extensions
pub fn collect_files(root: &Path) -> Result<Vec<RepoFile>> {
    let mut files = Vec::new();

    let walker = WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.file_name() != ".git");

    for entry in walker {
        let entry = entry.map_err(|e| GitHubError::Other(format!("Walk failed: {}", e)))?;
        if !entry.file_type().is_file() {
            continue;
        }

        let name = entry.file_name().to_string_lossy();
        let extension = match name.rfind('.') {
            Some(idx) if idx > 0 => &name[idx..],
            _ => continue,
        };
        if !RELEVANT_EXTENSIONS.contains(&extension) {
            continue;
        }

        let relative = entry
            .path()
            .strip_prefix(root)
            .unwrap_or(entry.path())
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");

        let content = std::fs::read_to_string(entry.path()).unwrap_or_default();
        files.push(RepoFile {
            path: relative,
            content,
            extension: extension.to_string(),
        });
    }

    Ok(files)
}

/// First README found at the repository root
pub fn read_readme(root: &Path) -> Option<String> {
    README_NAMES
        .iter()
        .map(|name| root.join(name))
        .find(|path| path.is_file())
        .and_then(|path| std::fs::read_to_string(path).ok())
}

/// HEAD commit, branch, tree size, contributors and recent commits
pub fn extract_metadata(repo: &Git2Repository) -> Result<CloneMetadata> {
    let head = repo.head()?;
    let branch = head.shorthand().unwrap_or("HEAD").to_string();
    let commit = head.peel_to_commit()?;

    let mut total_files = 0usize;
    commit.tree()?.walk(TreeWalkMode::PreOrder, |_, _| {
        total_files += 1;
        TreeWalkResult::Ok
    })?;

    let mut revwalk = repo.revwalk()?;
    revwalk.set_sorting(Sort::TIME)?;
    revwalk.push(commit.id())?;

    let mut contributors: Vec<Contributor> = Vec::new();
    let mut recent_commits = Vec::new();
    for oid in revwalk {
        let c = repo.find_commit(oid?)?;
        let author = c.author();
        let contributor = Contributor {
            name: author.name().unwrap_or("Unknown").to_string(),
            email: author.email().unwrap_or_default().to_string(),
        };

        if recent_commits.len() < RECENT_COMMITS {
            recent_commits.push(CommitSummary {
                sha: c.id().to_string(),
                message: c.message().unwrap_or("No message").to_string(),
                author: contributor.name.clone(),
                date: chrono::DateTime::from_timestamp(author.when().seconds(), 0)
                    .map(|d| d.to_rfc3339()),
            });
        }
        if !contributors.contains(&contributor) {
            contributors.push(contributor);
        }
    }

    Ok(CloneMetadata {
        last_commit: commit.id().to_string(),
        branch,
        total_files,
        contributors,
        recent_commits,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_collect_files_filters_extensions() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("src")).unwrap();
        fs::create_dir_all(dir.path().join(".git")).unwrap();
        fs::write(dir.path().join("src/app.py"), "print('hi')").unwrap();
        fs::write(dir.path().join("src/lib.rs"), "fn main() {}").unwrap();
        fs::write(dir.path().join("notes.txt"), "notes").unwrap();
        fs::write(dir.path().join(".git/config.json"), "{}").unwrap();
        fs::write(dir.path().join(".env"), "SECRET=1").unwrap();

        let files = collect_files(dir.path()).unwrap();
        let paths: Vec<_> = files.iter().map(|f| f.path.as_str()).collect();
        assert_eq!(paths, vec!["notes.txt", "src/app.py"]);
        assert_eq!(files[1].extension, ".py");
    }

    #[test]
    fn test_non_utf8_file_has_empty_content() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("data.json"), [0xff, 0xfe, 0x00]).unwrap();
        let files = collect_files(dir.path()).unwrap();
        assert_eq!(files.len(), 1);
        assert!(files[0].content.is_empty());
    }

    #[test]
    fn test_read_readme_order() {
        let dir = TempDir::new().unwrap();
        assert!(read_readme(dir.path()).is_none());
        fs::write(dir.path().join("README.txt"), "plain").unwrap();
        fs::write(dir.path().join("README.rst"), "rst").unwrap();
        assert_eq!(read_readme(dir.path()).as_deref(), Some("rst"));
        fs::write(dir.path().join("README.md"), "md").unwrap();
        assert_eq!(read_readme(dir.path()).as_deref(), Some("md"));
    }

    #[test]
    fn test_fallback_ref() {
        assert_eq!(
            fallback_ref("/tmp/work/octo/demo.git"),
            RepoRef::new("octo", "demo")
        );
        assert_eq!(
            fallback_ref("git@gitlab.com:team/tool"),
            RepoRef::new("team", "tool")
        );
    }

    #[test]
    fn test_into_snapshot() {
        let cloned = ClonedRepository {
            files: vec![
                RepoFile {
                    path: "main.py".to_string(),
                    content: "x = 1\n".repeat(10),
                    extension: ".py".to_string(),
                },
                RepoFile {
                    path: "README.md".to_string(),
                    content: "# Demo".to_string(),
                    extension: ".md".to_string(),
                },
                RepoFile {
                    path: "notes.txt".to_string(),
                    content: "n".to_string(),
                    extension: ".txt".to_string(),
                },
            ],
            readme: Some("# Demo".to_string()),
            metadata: CloneMetadata {
                branch: "main".to_string(),
                ..Default::default()
            },
        };

        let snapshot = cloned.into_snapshot("https://github.com/octo/demo");
        assert_eq!(snapshot.repo, RepoRef::new("octo", "demo"));
        assert_eq!(snapshot.metadata.full_name, "octo/demo");
        assert_eq!(snapshot.metadata.default_branch.as_deref(), Some("main"));
        assert_eq!(snapshot.primary_language(), Some("Python"));
        assert_eq!(snapshot.languages.len(), 2);
        assert_eq!(snapshot.tree.len(), 3);
        let sampled: Vec<_> = snapshot.sampled_files.iter().map(|f| f.path.as_str()).collect();
        assert_eq!(sampled, vec!["main.py", "README.md"]);
    }
}

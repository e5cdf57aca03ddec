//! GitHub URL validation

use crate::models::RepoRef;
use regex::Regex;
use std::sync::OnceLock;

fn owner_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[a-zA-Z0-9][-a-zA-Z0-9]*$").expect("valid owner regex"))
}

fn repo_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[a-zA-Z0-9_.-]+$").expect("valid repo regex"))
}

/// Split a URL into owner and raw repository segment if it looks like GitHub
fn parse(url: &str) -> Option<(String, String)> {
    let url = url.trim();
    if url.is_empty() {
        return None;
    }

    let parsed = ::url::Url::parse(url).ok()?;
    let host = parsed.host_str()?;
    if !host.to_lowercase().contains("github.com") {
        return None;
    }

    // Outer slashes are ignored; an empty segment in between is not
    let segments: Vec<&str> = parsed.path_segments()?.collect();
    let start = segments.iter().position(|s| !s.is_empty())?;
    let end = segments.iter().rposition(|s| !s.is_empty())?;
    let segments = &segments[start..=end];
    let owner = *segments.first()?;
    let repo = *segments.get(1)?;

    if !owner_pattern().is_match(owner) || !repo_pattern().is_match(repo) {
        return None;
    }

    Some((owner.to_string(), repo.to_string()))
}

/// Check whether `url` points at a GitHub repository
pub fn is_valid_github_url(url: &str) -> bool {
    parse(url).is_some()
}

/// Extract the owner and repository name from a GitHub URL
///
/// Returns `None` when the URL is not a valid GitHub repository URL.
pub fn extract_github_info(url: &str) -> Option<RepoRef> {
    let (owner, repo) = parse(url)?;
    let repo = repo.strip_suffix(".git").unwrap_or(&repo).to_string();
    if repo.is_empty() {
        return None;
    }
    Some(RepoRef { owner, repo })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_urls() {
        assert!(is_valid_github_url("https://github.com/rust-lang/rust"));
        assert!(is_valid_github_url("https://github.com/rust-lang/rust.git"));
        assert!(is_valid_github_url("https://github.com/octo/demo/tree/main/src"));
        assert!(is_valid_github_url("http://www.GitHub.com/octo/my_repo.v2"));
    }

    #[test]
    fn test_invalid_urls() {
        assert!(!is_valid_github_url(""));
        assert!(!is_valid_github_url("   "));
        assert!(!is_valid_github_url("github.com/octo/demo"));
        assert!(!is_valid_github_url("https://gitlab.com/octo/demo"));
        assert!(!is_valid_github_url("https://github.com/octo"));
        assert!(!is_valid_github_url("https://github.com/-octo/demo"));
        assert!(!is_valid_github_url("https://github.com/octo/de mo"));
    }

    #[test]
    fn test_extract_github_info() {
        let info = extract_github_info("https://github.com/octo/demo.git").unwrap();
        assert_eq!(info.owner, "octo");
        assert_eq!(info.repo, "demo");
        assert_eq!(info.full_name(), "octo/demo");
    }

    #[test]
    fn test_extract_github_info_trailing_slash() {
        let info = extract_github_info("https://github.com/octo/demo/").unwrap();
        assert_eq!(info, RepoRef::new("octo", "demo"));
    }

    #[test]
    fn test_empty_inner_segment_rejected() {
        assert!(!is_valid_github_url("https://github.com/octo//demo"));
        assert!(extract_github_info("https://github.com/octo//demo").is_none());
        assert!(is_valid_github_url("https://github.com//octo/demo//"));
    }

    #[test]
    fn test_extract_github_info_invalid() {
        assert!(extract_github_info("https://example.com/octo/demo").is_none());
        assert!(extract_github_info("not a url").is_none());
    }
}

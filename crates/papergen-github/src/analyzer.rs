//! Structural analysis of a repository snapshot

use std::collections::BTreeMap;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::models::{CommitSummary, LanguageStat, RepoSnapshot, TreeEntry};

const README_EXCERPT_CHARS: usize = 500;
const CODE_EXTENSIONS: &[&str] = &["py", "js", "java", "cpp", "go", "rs", "rb", "php"];

/// Headline facts about the repository
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepoInfo {
    pub name: String,
    pub full_name: String,
    pub description: String,
    pub stars: u64,
    pub forks: u64,
    pub watchers: u64,
    pub created_at: String,
    pub updated_at: String,
    pub license: String,
    pub language_stats: Vec<LanguageStat>,
    pub primary_language: String,
}

/// A directory with its files and subdirectories
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryNode {
    pub files: Vec<String>,
    pub dirs: BTreeMap<String, DirectoryNode>,
}

impl DirectoryNode {
    /// Build the nested structure from flat tree entries
    pub fn from_entries(entries: &[TreeEntry]) -> Self {
        let mut root = DirectoryNode::default();
        for entry in entries {
            if entry.path.is_empty() {
                continue;
            }
            let parts: Vec<&str> = entry.path.split('/').collect();
            let mut current = &mut root;
            for (i, part) in parts.iter().enumerate() {
                if i == parts.len() - 1 && entry.is_blob() {
                    current.files.push(part.to_string());
                } else {
                    current = current.dirs.entry(part.to_string()).or_default();
                }
            }
        }
        root
    }

    /// Indented listing down to `max_depth` directory levels
    pub fn render(&self, max_depth: usize) -> String {
        let mut out = String::new();
        self.render_into(&mut out, 0, max_depth);
        out
    }

    fn render_into(&self, out: &mut String, depth: usize, max_depth: usize) {
        let indent = "  ".repeat(depth);
        for (name, child) in &self.dirs {
            out.push_str(&format!("{}{}/\n", indent, name));
            if depth + 1 < max_depth {
                child.render_into(out, depth + 1, max_depth);
            }
        }
        for file in &self.files {
            out.push_str(&format!("{}{}\n", indent, file));
        }
    }
}

/// Summary of one sampled file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileSummary {
    pub file: String,
    pub summary: String,
}

/// Full analysis of a snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepoAnalysis {
    pub repo_info: RepoInfo,
    pub commit_history: Vec<CommitSummary>,
    pub directory_structure: DirectoryNode,
    pub readme_summary: String,
    pub code_analysis: Vec<FileSummary>,
}

/// Analyze a snapshot
pub fn analyze(snapshot: &RepoSnapshot) -> RepoAnalysis {
    let metadata = &snapshot.metadata;
    let or_unknown = |value: Option<&str>| value.unwrap_or("Unknown").to_string();

    let repo_info = RepoInfo {
        name: snapshot.display_name().to_string(),
        full_name: if metadata.full_name.is_empty() {
            snapshot.repo.full_name()
        } else {
            metadata.full_name.clone()
        },
        description: metadata
            .description
            .clone()
            .unwrap_or_else(|| "No description available".to_string()),
        stars: metadata.stargazers_count,
        forks: metadata.forks_count,
        watchers: metadata.watchers_count,
        created_at: or_unknown(metadata.created_at.as_deref()),
        updated_at: or_unknown(metadata.updated_at.as_deref()),
        license: or_unknown(metadata.license_name()),
        language_stats: snapshot.languages.clone(),
        primary_language: or_unknown(snapshot.primary_language()),
    };

    let readme_summary = match snapshot.readme.as_deref() {
        Some(readme) if !readme.is_empty() => summarize_readme(readme),
        _ => "No README available".to_string(),
    };

    RepoAnalysis {
        repo_info,
        commit_history: snapshot.commits.clone(),
        directory_structure: DirectoryNode::from_entries(&snapshot.tree),
        readme_summary,
        code_analysis: snapshot
            .sampled_files
            .iter()
            .map(|f| FileSummary {
                file: f.path.clone(),
                summary: summarize_code_file(&f.path, &f.content),
            })
            .collect(),
    }
}

fn heading_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"#+\s+").expect("valid heading regex"))
}

fn class_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"class\s+(\w+)").expect("valid class regex"))
}

fn function_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"(?:function|def|func)\s+(\w+)").expect("valid function regex"))
}

/// Short description of a README
///
/// READMEs with more than three heading-delimited sections are described by
/// their section titles; shorter ones by an excerpt.
pub fn summarize_readme(readme: &str) -> String {
    if readme.is_empty() {
        return "No README available".to_string();
    }

    let sections: Vec<&str> = heading_pattern()
        .split(readme)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();

    if sections.len() > 3 {
        let titles: Vec<&str> = sections
            .iter()
            .take(5)
            .map(|s| s.lines().next().unwrap_or(""))
            .collect();
        format!(
            "README contains {} sections including: {}",
            sections.len(),
            titles.join(", ")
        )
    } else {
        let excerpt: String = readme.chars().take(README_EXCERPT_CHARS).collect();
        if readme.chars().count() > README_EXCERPT_CHARS {
            format!("{}...", excerpt)
        } else {
            excerpt
        }
    }
}

/// One-line description of a source file
pub fn summarize_code_file(path: &str, content: &str) -> String {
    let ext = path.rsplit_once('.').map(|(_, ext)| ext).unwrap_or("");
    let line_count = content.split('\n').count();
    let mut summary = format!("{}: {} lines of code.", path, line_count);

    if !CODE_EXTENSIONS.contains(&ext) {
        return summary;
    }

    let classes = captures(class_pattern(), content);
    let functions = captures(function_pattern(), content);

    if !classes.is_empty() {
        summary.push_str(&format!(
            " Contains {} classes: {}{}.",
            classes.len(),
            classes.iter().take(3).copied().collect::<Vec<_>>().join(", "),
            if classes.len() > 3 { "..." } else { "" }
        ));
    }
    if !functions.is_empty() {
        summary.push_str(&format!(
            " Contains {} functions: {}{}.",
            functions.len(),
            functions.iter().take(5).copied().collect::<Vec<_>>().join(", "),
            if functions.len() > 5 { "..." } else { "" }
        ));
    }
    summary
}

fn captures<'a>(pattern: &Regex, content: &'a str) -> Vec<&'a str> {
    pattern
        .captures_iter(content)
        .filter_map(|c| c.get(1).map(|m| m.as_str()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{RepoMetadata, RepoRef, SampledFile};

    #[test]
    fn test_summarize_readme_many_sections() {
        let readme = "# Demo\nIntro\n## Install\nsteps\n## Usage\nrun it\n## License\nMIT\n";
        assert_eq!(
            summarize_readme(readme),
            "README contains 4 sections including: Demo, Install, Usage, License"
        );
    }

    #[test]
    fn test_summarize_readme_short() {
        let readme = "# Demo\nA tiny tool.";
        assert_eq!(summarize_readme(readme), readme);
    }

    #[test]
    fn test_summarize_readme_truncates() {
        let readme = "x".repeat(600);
        let summary = summarize_readme(&readme);
        assert_eq!(summary.len(), 503);
        assert!(summary.ends_with("..."));
    }

    #[test]
    fn test_summarize_code_file_counts_definitions() {
        let content = "class A:\n  pass\nclass B:\n  pass\ndef f():\n  pass\ndef g():\n  pass";
        assert_eq!(
            summarize_code_file("src/mod.py", content),
            "src/mod.py: 8 lines of code. Contains 2 classes: A, B. Contains 2 functions: f, g."
        );
    }

    #[test]
    fn test_summarize_code_file_overflow() {
        let content = (0..7).map(|i| format!("func f{i}() {{}}\n")).collect::<String>();
        let summary = summarize_code_file("main.go", &content);
        assert!(summary.contains("Contains 7 functions: f0, f1, f2, f3, f4..."));
    }

    #[test]
    fn test_summarize_non_code_file() {
        assert_eq!(
            summarize_code_file("config.json", "{\n}"),
            "config.json: 2 lines of code."
        );
        assert_eq!(summarize_code_file("Makefile", "all:"), "Makefile: 1 lines of code.");
    }

    #[test]
    fn test_directory_structure() {
        let entries = vec![
            TreeEntry::tree("src"),
            TreeEntry::blob("src/main.rs"),
            TreeEntry::blob("src/util/io.rs"),
            TreeEntry::blob("Cargo.toml"),
            TreeEntry::blob(""),
        ];
        let root = DirectoryNode::from_entries(&entries);
        assert_eq!(root.files, vec!["Cargo.toml"]);
        assert_eq!(root.dirs["src"].files, vec!["main.rs"]);
        assert_eq!(root.dirs["src"].dirs["util"].files, vec!["io.rs"]);
        assert_eq!(root.render(1), "src/\nCargo.toml\n");
    }

    #[test]
    fn test_analyze_defaults() {
        let snapshot = RepoSnapshot {
            url: "https://github.com/octo/demo".to_string(),
            repo: RepoRef::new("octo", "demo"),
            metadata: RepoMetadata::default(),
            languages: Vec::new(),
            commits: Vec::new(),
            readme: None,
            tree: Vec::new(),
            sampled_files: vec![SampledFile {
                path: "app.js".to_string(),
                content: "function run() {}".to_string(),
            }],
        };
        let analysis = analyze(&snapshot);
        assert_eq!(analysis.repo_info.name, "demo");
        assert_eq!(analysis.repo_info.full_name, "octo/demo");
        assert_eq!(analysis.repo_info.license, "Unknown");
        assert_eq!(analysis.repo_info.primary_language, "Unknown");
        assert_eq!(analysis.readme_summary, "No README available");
        assert_eq!(analysis.code_analysis.len(), 1);
        assert!(analysis.code_analysis[0].summary.contains("functions: run"));
    }
}

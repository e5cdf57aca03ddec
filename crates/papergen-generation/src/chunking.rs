//! Splitting repository files into prompt-sized chunks

use serde::{Deserialize, Serialize};

pub use papergen_github::detect_language;

const EXCLUDED_DIRS: &[&str] = &[".git", "node_modules", "__pycache__", "venv", "env"];
const EXCLUDED_EXTENSIONS: &[&str] = &[".exe", ".bin", ".jpg", ".png", ".gif", ".pdf", ".zip"];

/// One file prepared for a prompt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeChunk {
    pub path: String,
    pub content: String,
    pub language: String,
    /// Content length in bytes
    pub size: usize,
}

/// Whether a file should be sent to the model
pub fn is_processable_file(path: &str) -> bool {
    let in_excluded_dir = EXCLUDED_DIRS.iter().any(|dir| {
        path.starts_with(&format!("{}/", dir)) || path.contains(&format!("/{}/", dir))
    });
    if in_excluded_dir {
        return false;
    }
    !EXCLUDED_EXTENSIONS.iter().any(|ext| path.ends_with(ext))
}

/// One chunk per processable file, in input order
pub fn divide_into_chunks<'a, I>(files: I) -> Vec<CodeChunk>
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    files
        .into_iter()
        .filter(|(path, _)| is_processable_file(path))
        .map(|(path, content)| CodeChunk {
            path: path.to_string(),
            content: content.to_string(),
            language: detect_language(path).to_string(),
            size: content.len(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_excluded_dirs() {
        assert!(!is_processable_file("node_modules/pkg/index.js"));
        assert!(!is_processable_file("app/__pycache__/mod.py"));
        assert!(!is_processable_file(".git/config"));
        assert!(is_processable_file("environment/setup.py"));
        assert!(is_processable_file("src/env.rs"));
    }

    #[test]
    fn test_excluded_extensions() {
        assert!(!is_processable_file("docs/diagram.png"));
        assert!(!is_processable_file("release.zip"));
        assert!(is_processable_file("Makefile"));
    }

    #[test]
    fn test_divide_into_chunks() {
        let files = vec![
            ("src/main.rs", "fn main() {}"),
            ("logo.png", "\u{0}"),
            ("web/app.tsx", "export {}"),
            ("Dockerfile", "FROM rust"),
        ];
        let chunks = divide_into_chunks(files);
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0].language, "Rust");
        assert_eq!(chunks[0].size, 12);
        assert_eq!(chunks[1].language, "React/TypeScript");
        assert_eq!(chunks[2].language, "Unknown");
    }
}

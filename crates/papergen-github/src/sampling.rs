//! Selection of representative files from a repository tree

/// Path patterns considered important, in priority order
///
/// A path matches a group when it ends with any of the group's suffixes.
pub const IMPORTANT_PATTERNS: &[&[&str]] = &[
    &[".py"],
    &[".js"],
    &[".java"],
    &[".cpp"],
    &[".go"],
    &[".rs"],
    &[".rb"],
    &[".php"],
    &[".html"],
    &[".css"],
    &[".json"],
    &[".xml"],
    &[".md"],
    &[".yaml", ".yml"],
    &["Dockerfile"],
    &["Makefile"],
];

/// Matches per pattern
pub const PER_PATTERN_LIMIT: usize = 2;
/// Files sampled overall
pub const TOTAL_LIMIT: usize = 5;
/// Characters kept from each sampled file
pub const CONTENT_LIMIT: usize = 2000;

/// Pick up to [`TOTAL_LIMIT`] paths, at most [`PER_PATTERN_LIMIT`] per pattern
pub fn select_important_files<'a, I>(paths: I) -> Vec<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    let paths: Vec<&str> = paths.into_iter().collect();
    let mut selected: Vec<&str> = Vec::new();

    for group in IMPORTANT_PATTERNS {
        let hits = paths
            .iter()
            .filter(|p| group.iter().any(|suffix| p.ends_with(suffix)))
            .filter(|p| !selected.contains(p))
            .take(PER_PATTERN_LIMIT)
            .copied()
            .collect::<Vec<_>>();
        selected.extend(hits);
    }

    selected.truncate(TOTAL_LIMIT);
    selected
}

/// Keep the first [`CONTENT_LIMIT`] characters
pub fn truncate_content(content: &str) -> String {
    content.chars().take(CONTENT_LIMIT).collect()
}

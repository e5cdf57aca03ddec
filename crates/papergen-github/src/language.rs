//! File extension to language mapping

/// Language name for a path, based on its extension
///
/// Unrecognized extensions map to `"Unknown"`.
pub fn detect_language(path: &str) -> &'static str {
    let file_name = path.rsplit('/').next().unwrap_or(path);
    let ext = match file_name.rfind('.') {
        Some(idx) => file_name[idx..].to_lowercase(),
        None => return "Unknown",
    };

    match ext.as_str() {
        ".py" => "Python",
        ".js" => "JavaScript",
        ".jsx" => "React/JavaScript",
        ".ts" => "TypeScript",
        ".tsx" => "React/TypeScript",
        ".html" => "HTML",
        ".css" => "CSS",
        ".java" => "Java",
        ".cpp" => "C++",
        ".c" => "C",
        ".go" => "Go",
        ".rs" => "Rust",
        ".rb" => "Ruby",
        ".php" => "PHP",
        ".swift" => "Swift",
        ".kt" => "Kotlin",
        ".md" => "Markdown",
        ".json" => "JSON",
        ".yml" | ".yaml" => "YAML",
        ".xml" => "XML",
        _ => "Unknown",
    }
}

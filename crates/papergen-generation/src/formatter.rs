//! IEEE-style reference and code listing formatting

use crate::models::Reference;

/// Column limit for code listings
pub const LISTING_WIDTH: usize = 80;

/// `[n] authors, "title", journal, vol. v, no. n, pp. p, year.`
///
/// Missing parts are omitted. A URL is appended as `[Online]. Available: url`.
pub fn format_reference(index: usize, reference: &Reference) -> String {
    let mut parts = vec![
        reference.authors.trim().to_string(),
        format!("\"{}\"", reference.title.trim()),
    ];
    if let Some(journal) = non_empty(&reference.journal) {
        parts.push(journal.to_string());
    }
    if let Some(volume) = non_empty(&reference.volume) {
        parts.push(format!("vol. {}", volume));
    }
    if let Some(number) = non_empty(&reference.number) {
        parts.push(format!("no. {}", number));
    }
    if let Some(pages) = non_empty(&reference.pages) {
        parts.push(format!("pp. {}", pages));
    }
    if let Some(year) = non_empty(&reference.year) {
        parts.push(year.to_string());
    }

    let mut entry = format!("[{}] {}.", index, parts.join(", "));
    if let Some(url) = non_empty(&reference.url) {
        entry.push_str(&format!(" [Online]. Available: {}", url));
    }
    entry
}

/// Number and format a reference list, starting at `[1]`
pub fn format_references(references: &[Reference]) -> Vec<String> {
    references
        .iter()
        .enumerate()
        .map(|(i, r)| format_reference(i + 1, r))
        .collect()
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Wrap code at [`LISTING_WIDTH`] columns inside an `lstlisting` block
///
/// Lines are wrapped individually so indentation and line structure survive.
pub fn format_code_snippet(code: &str, language: &str) -> String {
    let wrapped: Vec<String> = code
        .lines()
        .flat_map(|line| wrap_line(line, LISTING_WIDTH))
        .collect();
    format!(
        "\\begin{{lstlisting}}[language={}]\n{}\n\\end{{lstlisting}}",
        language,
        wrapped.join("\n")
    )
}

/// Break a line at whitespace before `width` chars, hard-splitting long words
fn wrap_line(line: &str, width: usize) -> Vec<String> {
    let line = line.trim_end();
    if line.chars().count() <= width {
        return vec![line.to_string()];
    }

    let mut out = Vec::new();
    let mut rest: Vec<char> = line.chars().collect();
    while rest.len() > width {
        let split = rest[..=width]
            .iter()
            .rposition(|c| c.is_whitespace())
            .filter(|&pos| rest[..pos].iter().any(|c| !c.is_whitespace()))
            .unwrap_or(width);
        let head: String = rest[..split].iter().collect();
        out.push(head.trim_end().to_string());
        let tail = &rest[split..];
        let skip = tail.iter().take_while(|c| c.is_whitespace()).count();
        rest = tail[skip..].to_vec();
    }
    if !rest.is_empty() {
        out.push(rest.into_iter().collect());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_reference_full() {
        let reference = Reference {
            authors: "A. Author and B. Author".to_string(),
            title: "On Things".to_string(),
            journal: Some("IEEE Trans. Softw. Eng.".to_string()),
            volume: Some("12".to_string()),
            number: Some("3".to_string()),
            pages: Some("45-67".to_string()),
            year: Some("2020".to_string()),
            url: None,
        };
        assert_eq!(
            format_reference(1, &reference),
            "[1] A. Author and B. Author, \"On Things\", IEEE Trans. Softw. Eng., vol. 12, no. 3, pp. 45-67, 2020."
        );
    }

    #[test]
    fn test_format_reference_partial_with_url() {
        let reference = Reference::new("octo", "octo/demo")
            .journal("GitHub")
            .url("https://github.com/octo/demo");
        assert_eq!(
            format_reference(2, &reference),
            "[2] octo, \"octo/demo\", GitHub. [Online]. Available: https://github.com/octo/demo"
        );
    }

    #[test]
    fn test_format_references_numbering() {
        let refs = vec![Reference::new("A", "One"), Reference::new("B", "Two")];
        let formatted = format_references(&refs);
        assert!(formatted[0].starts_with("[1] A"));
        assert!(formatted[1].starts_with("[2] B"));
    }

    #[test]
    fn test_code_snippet_short_lines_kept() {
        let snippet = format_code_snippet("fn main() {\n    run();\n}", "Rust");
        assert_eq!(
            snippet,
            "\\begin{lstlisting}[language=Rust]\nfn main() {\n    run();\n}\n\\end{lstlisting}"
        );
    }

    #[test]
    fn test_code_snippet_wraps_long_lines() {
        let long = format!("let x = {};", "value + ".repeat(20));
        let snippet = format_code_snippet(&long, "Rust");
        for line in snippet.lines() {
            assert!(line.chars().count() <= LISTING_WIDTH, "too long: {line}");
        }
        assert!(snippet.lines().count() > 3);
    }

    #[test]
    fn test_wrap_line_hard_splits_long_word() {
        let word = "x".repeat(170);
        let lines = wrap_line(&word, 80);
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0].len(), 80);
        assert_eq!(lines[2].len(), 10);
    }
}

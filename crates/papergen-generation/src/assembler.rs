//! Deterministic paper assembly
//!
//! [`TemplateAssembler`] turns a [`RepoSnapshot`] into an IEEE-style report
//! without calling a model. It also produces the "limited analysis" paper used
//! when a repository cannot be ingested.

use std::sync::OnceLock;

use chrono::{Local, NaiveDate};
use papergen_github::{extract_github_info, RepoRef, RepoSnapshot, SampledFile};
use regex::Regex;

use crate::models::{PaperDocument, PaperSection, ProcessingStatus, Reference, SectionKind};

/// Lines of each sampled file quoted in the code analysis
const SNIPPET_LINES: usize = 50;
/// README lines quoted in the introduction
const README_LINES: usize = 10;
/// README length above which documentation counts as comprehensive
const COMPREHENSIVE_README: usize = 500;

fn python_class_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"class\s+(\w+)").expect("valid class regex"))
}

fn python_def_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"def\s+(\w+)").expect("valid def regex"))
}

fn js_function_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"function\s+(\w+)").expect("valid function regex"))
}

/// Builds papers from repository data alone
#[derive(Debug, Clone, Default)]
pub struct TemplateAssembler {
    date: Option<NaiveDate>,
}

impl TemplateAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pin the date printed in the paper header
    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    fn date_line(&self) -> String {
        let date = self.date.unwrap_or_else(|| Local::now().date_naive());
        date.format("%B %d, %Y").to_string()
    }

    fn preamble(&self, full_name: &str, url: &str) -> String {
        format!(
            "## IEEE Conference Paper\n\n**Repository**: {}\n**Date**: {}\n**URL**: {}",
            full_name,
            self.date_line(),
            url
        )
    }

    /// Full report for a successfully ingested repository
    pub fn assemble(&self, topic: &str, snapshot: &RepoSnapshot) -> PaperDocument {
        let name = snapshot.display_name();
        let full_name = if snapshot.metadata.full_name.is_empty() {
            snapshot.repo.full_name()
        } else {
            snapshot.metadata.full_name.clone()
        };

        let mut doc = PaperDocument::new(format!("{}: {}", name, topic.trim()), topic.trim());
        doc.repository_url = Some(snapshot.url.clone());
        doc.preamble = Some(self.preamble(&full_name, &snapshot.url));

        doc.push_section(SectionKind::Abstract, abstract_text(name, snapshot));
        doc.push_section(SectionKind::Introduction, introduction_text(name, snapshot));
        doc.push_section(SectionKind::Methodology, methodology_text(name));

        if !snapshot.sampled_files.is_empty() {
            let order = doc.sections.len();
            doc.sections.push(PaperSection::titled(
                "Code Analysis",
                SectionKind::Other("code_analysis".to_string()),
                code_analysis_text(&snapshot.sampled_files),
                order,
            ));
        }

        let order = doc.sections.len();
        doc.sections.push(PaperSection::titled(
            "Results and Discussion",
            SectionKind::Results,
            results_text(name, snapshot),
            order,
        ));
        doc.push_section(SectionKind::Conclusion, conclusion_text(name, snapshot));

        doc.references = default_references(&full_name, &snapshot.url);
        doc.set_status(ProcessingStatus::Completed);
        doc
    }

    /// Paper explaining that `url` could not be analyzed
    ///
    /// The document is still `Completed`; `error` is kept in `error_message`.
    pub fn error_paper(&self, topic: &str, url: &str, error: &str) -> PaperDocument {
        let repo_ref = extract_github_info(url).unwrap_or_else(|| fallback_repo_ref(url));
        let full_name = repo_ref.full_name();
        let repo = repo_ref.repo.as_str();

        let mut doc = PaperDocument::new(format!("Limited Analysis of {}", full_name), topic.trim());
        doc.repository_url = Some(url.to_string());
        doc.preamble = Some(self.preamble(&full_name, url));
        doc.error_message = Some(error.to_string());

        doc.sections.push(PaperSection::titled(
            "⚠️ Limited Repository Analysis",
            SectionKind::Other("limited_repository_analysis".to_string()),
            format!(
                "This paper provides a limited analysis of the repository due to data access \
                 constraints. The following error was encountered: **{}**\n\n\
                 The analysis below is based on available repository metadata and general \
                 software engineering principles relevant to similar repositories.",
                error
            ),
            0,
        ));
        doc.push_section(
            SectionKind::Abstract,
            format!(
                "This paper attempts to analyze the software architecture and implementation of \
                 {repo}, a project hosted on GitHub. While complete repository data was not \
                 accessible due to technical limitations, this analysis provides valuable \
                 insights into software engineering considerations for similar projects. This \
                 research examines potential architectural patterns, implementation approaches, \
                 and development practices that would be relevant for {repo}.",
                repo = repo
            ),
        );
        doc.push_section(
            SectionKind::Introduction,
            format!(
                "GitHub repositories like {} represent the modern approach to collaborative \
                 software development. While this specific repository's contents could not be \
                 fully accessed, we can still explore the broader context of software \
                 engineering approaches that would apply to similar projects.\n\n\
                 GitHub repositories typically contain source code, documentation, \
                 configuration files, and other assets necessary for software development. They \
                 facilitate version control, collaboration, issue tracking, and continuous \
                 integration/deployment.",
                full_name
            ),
        );

        let order = doc.sections.len();
        doc.sections.push(PaperSection::titled(
            "Methodology and Limitations",
            SectionKind::Methodology,
            "This research faced significant limitations in data collection. The standard \
             methodology would involve:\n\n\
             1. Repository structure analysis\n\
             2. Programming language composition assessment\n\
             3. Code organization patterns identification\n\
             4. Examination of key components and their interactions\n\n\
             However, due to access constraints, a modified approach was necessary. This paper \
             instead focuses on:\n\n\
             1. General software engineering principles applicable to GitHub projects\n\
             2. Common architectural patterns in modern software development\n\
             3. Best practices for repository organization and management\n\
             4. Theoretical analysis based on repository metadata",
            order,
        ));

        let order = doc.sections.len();
        doc.sections.push(PaperSection::titled(
            "Software Engineering Best Practices",
            SectionKind::Other("best_practices".to_string()),
            "While specific details of the repository cannot be analyzed, we can discuss \
             software engineering best practices that should be applied to all repositories:\n\n\
             ### Code Organization\n\n\
             Well-structured repositories typically organize code into logical modules or \
             packages. This separation of concerns improves maintainability and allows \
             different team members to work on separate components simultaneously.\n\n\
             ### Documentation\n\n\
             Comprehensive documentation is essential for any software project. This \
             includes:\n\n\
             - README files explaining project purpose and setup\n\
             - API documentation for developers\n\
             - Architecture diagrams showing component relationships\n\
             - Code comments explaining complex implementations\n\n\
             ### Testing\n\n\
             Robust testing strategies are critical for maintaining software quality. These \
             typically include:\n\n\
             - Unit tests for individual functions and methods\n\
             - Integration tests for component interactions\n\
             - End-to-end tests simulating user workflows\n\
             - Performance tests ensuring system efficiency",
            order,
        ));

        doc.push_section(
            SectionKind::Conclusion,
            format!(
                "While this analysis of {} faced significant limitations in data access, it \
                 highlights the importance of software engineering principles in GitHub-based \
                 development. Future research could address these limitations by working \
                 directly with repository maintainers to gain proper access for analysis.\n\n\
                 The theoretical framework presented here provides valuable insights for \
                 developers working on similar projects, emphasizing code organization, \
                 documentation, and testing as pillars of successful software development.",
                full_name
            ),
        );

        doc.references = default_references(&full_name, url);
        doc.set_status(ProcessingStatus::Completed);
        doc
    }
}

fn fallback_repo_ref(url: &str) -> RepoRef {
    let mut parts = url.trim_end_matches('/').rsplit('/');
    let repo = parts.next().filter(|s| !s.is_empty()).unwrap_or("repository");
    let owner = parts.next().filter(|s| !s.is_empty()).unwrap_or("owner");
    RepoRef::new(owner, repo)
}

/// The repository itself plus four standard software engineering texts
pub fn default_references(full_name: &str, url: &str) -> Vec<Reference> {
    vec![
        Reference::new(full_name, "Source code repository")
            .journal("GitHub")
            .url(url),
        Reference::new("IEEE", "IEEE Standard for Software Engineering")
            .journal("IEEE Std 1016-2009")
            .year("2009"),
        Reference::new("C. Northrop", "Software Architecture in Practice")
            .journal("Addison-Wesley")
            .year("2012"),
        Reference::new("M. Fowler", "Patterns of Enterprise Application Architecture")
            .journal("Addison-Wesley")
            .year("2002"),
        Reference::new("R. Martin", "Clean Code: A Handbook of Agile Software Craftsmanship")
            .journal("Prentice Hall")
            .year("2008"),
    ]
}

fn abstract_text(name: &str, snapshot: &RepoSnapshot) -> String {
    let description = snapshot.metadata.description.as_deref().unwrap_or("").trim();
    let mut text = format!(
        "This paper analyzes the software architecture and implementation of {}, a {} project \
         with {} stars on GitHub. ",
        name,
        snapshot.primary_language().unwrap_or("software"),
        snapshot.metadata.stargazers_count
    );
    if !description.is_empty() {
        text.push_str(description);
        text.push(' ');
    }
    text.push_str(&format!(
        "The analysis explores the codebase structure, architectural patterns, implementation \
         details, and potential applications. This research provides insights into software \
         engineering practices employed in {}.",
        name
    ));
    text
}

fn introduction_text(name: &str, snapshot: &RepoSnapshot) -> String {
    let mut text = format!("{} is ", name);
    if let Some(description) = snapshot
        .metadata
        .description
        .as_deref()
        .map(str::trim)
        .filter(|d| !d.is_empty())
    {
        text.push_str(&format!("described as '{}'. ", description));
    }
    text.push_str(&format!(
        "Created on {}, it has garnered attention with {} stars and {} forks. ",
        snapshot.metadata.created_at.as_deref().unwrap_or("unknown date"),
        snapshot.metadata.stargazers_count,
        snapshot.metadata.forks_count
    ));

    let top: Vec<(String, f64)> = snapshot.language_percentages().into_iter().take(3).collect();
    match top.as_slice() {
        [] => {}
        [(lang, _)] => text.push_str(&format!("The codebase primarily utilizes {} (100%). ", lang)),
        langs => {
            let described = langs
                .iter()
                .map(|(lang, pct)| format!("{} ({:.1}%)", lang, pct))
                .collect::<Vec<_>>()
                .join(", ");
            text.push_str(&format!(
                "The codebase primarily utilizes a combination of {}. ",
                described
            ));
        }
    }

    if let Some(readme) = snapshot.readme.as_deref().filter(|r| !r.trim().is_empty()) {
        let lines: Vec<&str> = readme.split('\n').collect();
        let quoted = lines
            .iter()
            .take(README_LINES)
            .map(|line| format!("> {}", line).trim_end().to_string())
            .collect::<Vec<_>>()
            .join("\n");
        text = text.trim_end().to_string();
        text.push_str("\n\nFrom the project README:\n\n");
        text.push_str(&quoted);
        if lines.len() > README_LINES {
            text.push_str("\n> ...");
        }
    }
    text.trim_end().to_string()
}

fn methodology_text(name: &str) -> String {
    format!(
        "This research paper employs static code analysis techniques to examine the structure \
         and patterns within {}. The methodology includes:\n\n\
         1. Repository structure analysis\n\
         2. Programming language composition assessment\n\
         3. Code organization patterns identification\n\
         4. Examination of key components and their interactions\n\
         5. Analysis of API design and implementation",
        name
    )
}

fn code_analysis_text(files: &[SampledFile]) -> String {
    let mut text = String::from(
        "The following key files were analyzed to understand the system architecture:\n\n",
    );
    for file in files {
        let lines: Vec<&str> = file.content.split('\n').collect();
        let mut snippet = lines
            .iter()
            .take(SNIPPET_LINES)
            .copied()
            .collect::<Vec<_>>()
            .join("\n");
        if lines.len() > SNIPPET_LINES {
            snippet.push_str("\n...");
        }
        text.push_str(&format!(
            "### {}\n\n```\n{}\n```\n\n{}\n\n",
            file.path,
            snippet,
            describe_file(file)
        ));
    }
    text.trim_end().to_string()
}

/// One-paragraph heuristic description of a sampled file
fn describe_file(file: &SampledFile) -> String {
    let path = file.path.to_lowercase();
    let mut text = String::from("This file ");

    if path.ends_with(".py") {
        text.push_str("contains Python code");
        let classes = python_class_pattern().find_iter(&file.content).count();
        let functions = python_def_pattern().find_iter(&file.content).count();
        match (classes, functions) {
            (0, 0) => {}
            (0, f) => text.push_str(&format!(" with {} functions", f)),
            (c, 0) => text.push_str(&format!(" with {} classes", c)),
            (c, f) => text.push_str(&format!(" with {} classes and {} functions", c, f)),
        }
        text.push_str(". The code demonstrates ");
    } else if path.ends_with(".js") || path.ends_with(".jsx") {
        text.push_str("implements JavaScript functionality");
        let functions = js_function_pattern().find_iter(&file.content).count();
        if functions > 0 {
            text.push_str(&format!(" with {} named functions", functions));
        }
        text.push_str(". The code demonstrates ");
    } else {
        text.push_str("demonstrates ");
    }

    text.push_str(if path.contains("test") {
        "testing implementation for ensuring code quality."
    } else if path.contains("model") {
        "data modeling and structure definitions."
    } else if path.contains("view") || path.contains("component") {
        "UI rendering and user interface components."
    } else if path.contains("controller") || path.contains("service") {
        "business logic and service implementation."
    } else if path.contains("util") || path.contains("helper") {
        "utility functions and helper methods."
    } else {
        "core functionality of the application."
    });
    text
}

fn results_text(name: &str, snapshot: &RepoSnapshot) -> String {
    let files = &snapshot.sampled_files;
    let path_has = |needle: &str| files.iter().any(|f| f.path.to_lowercase().contains(needle));
    let content_has = |needle: &str| files.iter().any(|f| f.content.to_lowercase().contains(needle));

    let mut text = format!(
        "The analysis of {} reveals several key findings:\n\n### Architecture\n\n",
        name
    );

    let mvc = files.iter().any(|f| {
        let path = f.path.to_lowercase();
        path.contains("controller") && path.contains("model")
    });
    text.push_str(if path_has("component") {
        "The codebase employs a component-based architecture, separating functionality into \
         reusable components."
    } else if mvc {
        "The project follows an MVC (Model-View-Controller) pattern, separating data, business \
         logic, and presentation concerns."
    } else if path_has("service") {
        "The system utilizes a service-oriented architecture, with clearly defined service \
         boundaries."
    } else {
        "The code demonstrates a modular structure with separation of concerns."
    });

    if let Some(language) = snapshot.primary_language() {
        text.push_str(&format!("\n\n### {} Implementation\n\n", language));
        let observation = match language {
            "JavaScript" if content_has("react") || content_has("component") => {
                "The JavaScript implementation utilizes React for frontend development, with \
                 component-based UI architecture."
            }
            "JavaScript" if content_has("node") || content_has("express") => {
                "The JavaScript implementation employs Node.js with Express for server-side \
                 functionality."
            }
            "JavaScript" => {
                "The JavaScript implementation demonstrates modern JavaScript patterns and \
                 practices."
            }
            "Python" if content_has("flask") => {
                "The Python implementation uses Flask for web service functionality."
            }
            "Python" if content_has("django") => {
                "The Python implementation is built on Django, providing a robust web framework \
                 foundation."
            }
            "Python" => {
                "The Python implementation follows Pythonic principles and coding standards."
            }
            _ => "",
        };
        text.push_str(observation);
    }

    text = text.trim_end().to_string();
    text.push_str("\n\n### Code Quality\n\n");
    text.push_str(if path_has("test") {
        "The presence of test files indicates a commitment to code quality and reliability. "
    } else {
        "The codebase could benefit from more comprehensive test coverage. "
    });
    let comprehensive = snapshot
        .readme
        .as_deref()
        .is_some_and(|r| r.chars().count() > COMPREHENSIVE_README);
    text.push_str(if comprehensive {
        "Documentation is fairly comprehensive, with detailed README information."
    } else {
        "Documentation is present but could be expanded with more detailed implementation \
         information."
    });
    text
}

fn conclusion_text(name: &str, snapshot: &RepoSnapshot) -> String {
    let has_tests = snapshot
        .sampled_files
        .iter()
        .any(|f| f.path.to_lowercase().contains("test"));

    let stack = if snapshot.languages.len() > 3 {
        "a diverse technology stack".to_string()
    } else {
        format!(
            "focused use of {}",
            snapshot.primary_language().unwrap_or("programming languages")
        )
    };

    format!(
        "This analysis of {} provides insights into modern software development practices and \
         architectural patterns. With {} stars and {} forks, the project demonstrates \
         significant community interest. The codebase exhibits {}, {}\n\n\
         Future research could explore performance optimizations, security aspects, or \
         comparative analysis with similar projects in the domain.",
        name,
        snapshot.metadata.stargazers_count,
        snapshot.metadata.forks_count,
        stack,
        if has_tests {
            "with attention to testing and quality control."
        } else {
            "with opportunities for enhanced testing coverage."
        }
    )
}

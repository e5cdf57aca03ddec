//! Paper data models

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::formatter::format_references;

/// Default word budget for a whole paper
pub const DEFAULT_WORD_COUNT: usize = 3000;

/// Kind of a paper section
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    Abstract,
    Introduction,
    LiteratureReview,
    Methodology,
    Results,
    Discussion,
    Conclusion,
    References,
    /// Any other section, keyed by its normalized name
    Other(String),
}

impl SectionKind {
    /// Sections produced when the request names none
    pub fn defaults() -> Vec<SectionKind> {
        vec![
            SectionKind::Abstract,
            SectionKind::Introduction,
            SectionKind::LiteratureReview,
            SectionKind::Methodology,
            SectionKind::Results,
            SectionKind::Discussion,
            SectionKind::Conclusion,
            SectionKind::References,
        ]
    }

    /// Parse a section name such as `"Literature Review"` or `"literature_review"`
    pub fn from_name(name: &str) -> Self {
        let key = name
            .trim()
            .to_lowercase()
            .split(|c: char| c.is_whitespace() || c == '-' || c == '_')
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join("_");

        match key.as_str() {
            "abstract" => SectionKind::Abstract,
            "introduction" => SectionKind::Introduction,
            "literature_review" => SectionKind::LiteratureReview,
            "methodology" => SectionKind::Methodology,
            "results" => SectionKind::Results,
            "discussion" => SectionKind::Discussion,
            "conclusion" => SectionKind::Conclusion,
            "references" => SectionKind::References,
            _ => SectionKind::Other(key),
        }
    }

    /// Snake-case key used in prompts and humanizer rules
    pub fn key(&self) -> &str {
        match self {
            SectionKind::Abstract => "abstract",
            SectionKind::Introduction => "introduction",
            SectionKind::LiteratureReview => "literature_review",
            SectionKind::Methodology => "methodology",
            SectionKind::Results => "results",
            SectionKind::Discussion => "discussion",
            SectionKind::Conclusion => "conclusion",
            SectionKind::References => "references",
            SectionKind::Other(key) => key,
        }
    }

    /// Heading text
    pub fn title(&self) -> String {
        self.key()
            .split('_')
            .filter(|s| !s.is_empty())
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl fmt::Display for SectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Lifecycle of a generated document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProcessingStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

impl ProcessingStatus {
    /// Whether no further transitions will happen
    pub fn is_terminal(&self) -> bool {
        matches!(self, ProcessingStatus::Completed | ProcessingStatus::Failed)
    }
}

impl fmt::Display for ProcessingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ProcessingStatus::Pending => "pending",
            ProcessingStatus::Processing => "processing",
            ProcessingStatus::Completed => "completed",
            ProcessingStatus::Failed => "failed",
        };
        f.write_str(s)
    }
}

/// One section of a paper
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaperSection {
    pub title: String,
    pub content: String,
    pub kind: SectionKind,
    /// Position in the document, starting at 0
    pub order: usize,
}

impl PaperSection {
    pub fn new(kind: SectionKind, content: impl Into<String>, order: usize) -> Self {
        Self {
            title: kind.title(),
            content: content.into(),
            kind,
            order,
        }
    }

    /// Section with a heading that differs from its kind's default title
    pub fn titled(
        title: impl Into<String>,
        kind: SectionKind,
        content: impl Into<String>,
        order: usize,
    ) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            kind,
            order,
        }
    }
}

/// A bibliography entry
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reference {
    pub authors: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub journal: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pages: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl Reference {
    pub fn new(authors: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            authors: authors.into(),
            title: title.into(),
            ..Default::default()
        }
    }

    pub fn journal(mut self, journal: impl Into<String>) -> Self {
        self.journal = Some(journal.into());
        self
    }

    pub fn year(mut self, year: impl Into<String>) -> Self {
        self.year = Some(year.into());
        self
    }

    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }
}

/// A generated paper
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaperDocument {
    pub id: Uuid,
    pub title: String,
    pub topic: String,
    pub repository_url: Option<String>,
    pub status: ProcessingStatus,
    /// Markdown rendered between the title and the first section
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preamble: Option<String>,
    pub sections: Vec<PaperSection>,
    pub references: Vec<Reference>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl PaperDocument {
    /// Empty pending document
    pub fn new(title: impl Into<String>, topic: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            topic: topic.into(),
            repository_url: None,
            status: ProcessingStatus::Pending,
            preamble: None,
            sections: Vec::new(),
            references: Vec::new(),
            created_at: now,
            updated_at: now,
            error_message: None,
        }
    }

    /// Append a section at the next position
    pub fn push_section(&mut self, kind: SectionKind, content: impl Into<String>) {
        let order = self.sections.len();
        self.sections.push(PaperSection::new(kind, content, order));
    }

    /// First section of the given kind
    pub fn section(&self, kind: &SectionKind) -> Option<&PaperSection> {
        self.sections.iter().find(|s| &s.kind == kind)
    }

    /// Move to a new status and bump `updated_at`
    pub fn set_status(&mut self, status: ProcessingStatus) {
        self.status = status;
        self.updated_at = Utc::now();
    }

    /// Total words across all sections
    pub fn word_count(&self) -> usize {
        self.sections
            .iter()
            .map(|s| s.content.split_whitespace().count())
            .sum()
    }

    /// Render as Markdown
    ///
    /// Structured references are appended as a `References` section unless
    /// the document already has one.
    pub fn to_markdown(&self) -> String {
        let mut out = format!("# {}\n\n", self.title);

        if let Some(preamble) = &self.preamble {
            out.push_str(preamble.trim_end());
            out.push_str("\n\n");
        }

        let mut sections: Vec<&PaperSection> = self.sections.iter().collect();
        sections.sort_by_key(|s| s.order);
        for section in sections {
            out.push_str(&format!("## {}\n\n", section.title));
            let content = section.content.trim();
            if !content.is_empty() {
                out.push_str(content);
                out.push_str("\n\n");
            }
        }

        if !self.references.is_empty() && self.section(&SectionKind::References).is_none() {
            out.push_str("## References\n\n");
            out.push_str(&format_references(&self.references).join("\n"));
            out.push('\n');
        }

        format!("{}\n", out.trim_end())
    }
}

/// Input to the generation pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaperRequest {
    pub topic: String,
    #[serde(default)]
    pub repository_url: Option<String>,
    #[serde(default)]
    pub branch: Option<String>,
    /// Section names; `None` selects [`SectionKind::defaults`]
    #[serde(default)]
    pub sections: Option<Vec<String>>,
    #[serde(default = "default_word_count")]
    pub word_count: usize,
    /// Clone the repository instead of reading it over REST
    #[serde(default)]
    pub clone: bool,
}

fn default_word_count() -> usize {
    DEFAULT_WORD_COUNT
}

impl PaperRequest {
    pub fn new(topic: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
            repository_url: None,
            branch: None,
            sections: None,
            word_count: DEFAULT_WORD_COUNT,
            clone: false,
        }
    }

    pub fn with_repository(mut self, url: impl Into<String>) -> Self {
        self.repository_url = Some(url.into());
        self
    }

    pub fn with_branch(mut self, branch: impl Into<String>) -> Self {
        self.branch = Some(branch.into());
        self
    }

    pub fn with_sections<I, S>(mut self, sections: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.sections = Some(sections.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_word_count(mut self, word_count: usize) -> Self {
        self.word_count = word_count;
        self
    }

    pub fn cloned(mut self, clone: bool) -> Self {
        self.clone = clone;
        self
    }

    /// Requested sections, or the defaults
    pub fn section_kinds(&self) -> Vec<SectionKind> {
        match &self.sections {
            Some(names) if !names.is_empty() => names
                .iter()
                .filter(|n| !n.trim().is_empty())
                .map(|n| SectionKind::from_name(n))
                .collect(),
            _ => SectionKind::defaults(),
        }
    }
}

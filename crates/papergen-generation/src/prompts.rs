//! Prompt construction for section generation

use serde::{Deserialize, Serialize};

use crate::chunking::CodeChunk;
use crate::models::SectionKind;

/// Chunks included in a repository prompt by default
pub const DEFAULT_MAX_CHUNKS: usize = 10;

const GENERIC_SYSTEM_PROMPT: &str = "You are a research paper generator.";

/// Prompt pair ready to send to a provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedPrompt {
    /// System prompt with role and instructions
    pub system_prompt: String,
    /// User prompt with the section request
    pub user_prompt: String,
}

impl GeneratedPrompt {
    pub fn new(system_prompt: impl Into<String>, user_prompt: impl Into<String>) -> Self {
        Self {
            system_prompt: system_prompt.into(),
            user_prompt: user_prompt.into(),
        }
    }
}

/// Fixed system prompt for a section
pub fn system_prompt(kind: &SectionKind) -> &'static str {
    match kind {
        SectionKind::Abstract => {
            "You are a research paper abstract generator. Generate a concise abstract that \
             summarizes the given codebase. Focus on the purpose, methodology, and significance \
             of the code."
        }
        SectionKind::Introduction => {
            "You are a research paper introduction generator. Generate an introduction that \
             explains the background, motivation, and objectives of the provided codebase."
        }
        SectionKind::Methodology => {
            "You are a research paper methodology section generator. Analyze the given codebase \
             and explain the technical approach, architecture, algorithms, and implementation \
             details."
        }
        SectionKind::LiteratureReview => {
            "You are a research paper literature review generator. Based on the codebase, \
             generate a literature review that discusses related work, techniques, and approaches."
        }
        SectionKind::Results => {
            "You are a research paper results section generator. Analyze the codebase and \
             generate a results section that describes the capabilities, performance, and \
             outcomes."
        }
        SectionKind::Discussion => {
            "You are a research paper discussion section generator. Based on the codebase, \
             generate a discussion that analyzes strengths, limitations, and implications of \
             the work."
        }
        SectionKind::Conclusion => {
            "You are a research paper conclusion generator. Generate a conclusion summarizing \
             the key contributions, limitations, and future work based on the codebase."
        }
        SectionKind::References => {
            "You are a research paper references generator. Generate a list of relevant \
             references that would be cited in a paper about the given codebase."
        }
        SectionKind::Other(_) => GENERIC_SYSTEM_PROMPT,
    }
}

/// Builds section prompts from code chunks and request context
#[derive(Debug, Clone)]
pub struct PromptBuilder {
    max_chunks: usize,
}

impl Default for PromptBuilder {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_CHUNKS)
    }
}

impl PromptBuilder {
    pub fn new(max_chunks: usize) -> Self {
        Self { max_chunks }
    }

    pub fn max_chunks(&self) -> usize {
        self.max_chunks
    }

    /// Prompt asking for `section` based on the first `max_chunks` chunks
    pub fn repository_prompt(&self, section: &SectionKind, chunks: &[CodeChunk]) -> GeneratedPrompt {
        let user_prompt = format!(
            "Based on the following code chunks, generate a {} section for a research paper.\n\
             Make the content sound natural and human-written, avoiding robotic or formulaic \
             language.\n\n{}",
            section.key(),
            self.render_chunks(chunks)
        );
        GeneratedPrompt::new(system_prompt(section), user_prompt)
    }

    /// Prompt asking for `section` of a paper on `topic`
    ///
    /// `word_share` is the section's slice of the whole paper's word budget.
    pub fn topic_prompt(
        &self,
        topic: &str,
        section: &SectionKind,
        word_share: usize,
        repository_summary: Option<&str>,
    ) -> GeneratedPrompt {
        let mut user_prompt = format!(
            "Write the {} section of an academic research paper on the topic \"{}\".\n\
             Aim for roughly {} words. Write in natural, varied prose as a human researcher \
             would, avoiding robotic or formulaic language. Return only the section body \
             without a heading.",
            section.title(),
            topic.trim(),
            word_share
        );

        if let Some(summary) = repository_summary.filter(|s| !s.trim().is_empty()) {
            user_prompt.push_str("\n\nThe paper studies the following software repository:\n\n");
            user_prompt.push_str(summary.trim());
        }

        GeneratedPrompt::new(system_prompt(section), user_prompt)
    }

    /// Topic prompt followed by the repository's code chunks, when there are any
    pub fn section_prompt(
        &self,
        topic: &str,
        section: &SectionKind,
        word_share: usize,
        repository_summary: Option<&str>,
        chunks: &[CodeChunk],
    ) -> GeneratedPrompt {
        let mut prompt = self.topic_prompt(topic, section, word_share, repository_summary);
        if !chunks.is_empty() && self.max_chunks > 0 {
            prompt.user_prompt.push_str("\n\nRelevant code from the repository:\n\n");
            prompt.user_prompt.push_str(&self.render_chunks(chunks));
        }
        prompt
    }

    fn render_chunks(&self, chunks: &[CodeChunk]) -> String {
        chunks
            .iter()
            .take(self.max_chunks)
            .map(|chunk| {
                format!(
                    "File: {}\nLanguage: {}\n\n```{}\n{}\n```",
                    chunk.path,
                    chunk.language,
                    chunk.language.to_lowercase(),
                    chunk.content
                )
            })
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

/// Per-section word budget; never zero
pub fn word_share(word_count: usize, section_count: usize) -> usize {
    (word_count / section_count.max(1)).max(1)
}

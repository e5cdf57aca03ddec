//! End-to-end paper generation
//!
//! Ingest the repository (REST or clone), prompt the model once per section,
//! humanize each answer and assemble the document. Without a model provider
//! the deterministic template report is produced instead.

use std::sync::Arc;

use papergen_github::{analyze, GitHubClient, RepoAnalysis, RepoSnapshot, RepositoryCloner};
use papergen_providers::{ChatRequest, Provider};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::assembler::TemplateAssembler;
use crate::chunking::{divide_into_chunks, CodeChunk};
use crate::error::{GenerationError, Result};
use crate::humanizer::{Humanizer, HumanizerConfig};
use crate::models::{PaperDocument, PaperRequest, ProcessingStatus};
use crate::prompts::{word_share, PromptBuilder, DEFAULT_MAX_CHUNKS};

/// Model used when none is configured
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";

/// Tunables for [`PaperPipeline`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineOptions {
    pub model: String,
    pub temperature: f32,
    pub max_output_tokens: Option<usize>,
    /// Run the humanizer over model output
    pub humanize: bool,
    /// Code chunks included in each prompt
    pub max_chunks: usize,
    /// Fixed humanizer seed; random when unset
    pub seed: Option<u64>,
    pub humanizer: HumanizerConfig,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            temperature: 0.7,
            max_output_tokens: None,
            humanize: true,
            max_chunks: DEFAULT_MAX_CHUNKS,
            seed: None,
            humanizer: HumanizerConfig::default(),
        }
    }
}

/// Repository data gathered for one request
struct Ingested {
    snapshot: RepoSnapshot,
    chunks: Vec<CodeChunk>,
}

/// Generates papers from requests
pub struct PaperPipeline {
    github: Arc<GitHubClient>,
    cloner: RepositoryCloner,
    provider: Option<Arc<dyn Provider>>,
    assembler: TemplateAssembler,
    options: PipelineOptions,
}

impl PaperPipeline {
    pub fn new(github: Arc<GitHubClient>) -> Self {
        Self {
            github,
            cloner: RepositoryCloner::default(),
            provider: None,
            assembler: TemplateAssembler::new(),
            options: PipelineOptions::default(),
        }
    }

    pub fn with_provider(mut self, provider: Arc<dyn Provider>) -> Self {
        self.provider = Some(provider);
        self
    }

    pub fn with_cloner(mut self, cloner: RepositoryCloner) -> Self {
        self.cloner = cloner;
        self
    }

    pub fn with_assembler(mut self, assembler: TemplateAssembler) -> Self {
        self.assembler = assembler;
        self
    }

    pub fn with_options(mut self, options: PipelineOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &PipelineOptions {
        &self.options
    }

    pub fn has_provider(&self) -> bool {
        self.provider.is_some()
    }

    /// Generate a paper for `request`
    ///
    /// Ingestion failures do not fail the call: they produce the limited
    /// analysis paper with the error recorded on the document.
    pub async fn generate(&self, request: PaperRequest) -> Result<PaperDocument> {
        let topic = request.topic.trim();
        if topic.is_empty() {
            return Err(GenerationError::InvalidRequest(
                "topic must not be empty".to_string(),
            ));
        }
        let repository_url = request
            .repository_url
            .as_deref()
            .map(str::trim)
            .filter(|u| !u.is_empty());

        info!(topic, repository = ?repository_url, clone = request.clone, "Generating paper");

        let ingested = match repository_url {
            Some(url) => match self.ingest(url, &request).await {
                Ok(ingested) => Some(ingested),
                Err(e) => {
                    warn!(url, error = %e, "Repository ingestion failed; producing limited analysis");
                    return Ok(self.assembler.error_paper(topic, url, &e.to_string()));
                }
            },
            None => None,
        };

        let Some(provider) = self.provider.as_ref() else {
            return match ingested {
                Some(ingested) => Ok(self.assembler.assemble(topic, &ingested.snapshot)),
                None => Err(GenerationError::NoProvider),
            };
        };

        let title = match &ingested {
            Some(ingested) => format!("{}: {}", ingested.snapshot.display_name(), topic),
            None => topic.to_string(),
        };
        let mut doc = PaperDocument::new(title, topic);
        doc.repository_url = repository_url.map(str::to_string);
        doc.set_status(ProcessingStatus::Processing);

        let summary = ingested
            .as_ref()
            .map(|i| repository_summary(&analyze(&i.snapshot)));
        let chunks: &[CodeChunk] = ingested
            .as_ref()
            .map(|i| i.chunks.as_slice())
            .unwrap_or_default();

        let sections = request.section_kinds();
        let share = word_share(request.word_count, sections.len());
        let builder = PromptBuilder::new(self.options.max_chunks);
        let mut humanizer = self.humanizer();

        for section in sections {
            let prompt =
                builder.section_prompt(topic, &section, share, summary.as_deref(), chunks);
            let generated = self
                .invoke(provider.as_ref(), &prompt.system_prompt, &prompt.user_prompt)
                .await;
            let content = match generated {
                Ok(text) if self.options.humanize => humanizer.humanize(&text, &section),
                Ok(text) => text,
                Err(e) => {
                    warn!(section = %section, error = %e, "Section generation failed");
                    format!("Error generating {}. Please try again later.", section.key())
                }
            };
            doc.push_section(section, content);
        }

        doc.set_status(ProcessingStatus::Completed);
        info!(id = %doc.id, words = doc.word_count(), "Paper generated");
        Ok(doc)
    }

    async fn ingest(&self, url: &str, request: &PaperRequest) -> Result<Ingested> {
        if request.clone {
            let cloned = self
                .cloner
                .clone_and_sample(url, request.branch.as_deref())
                .await?;
            let chunks = divide_into_chunks(
                cloned
                    .files
                    .iter()
                    .map(|f| (f.path.as_str(), f.content.as_str())),
            );
            debug!(files = cloned.files.len(), chunks = chunks.len(), "Repository cloned");
            Ok(Ingested {
                snapshot: cloned.into_snapshot(url),
                chunks,
            })
        } else {
            let snapshot = self.github.fetch_snapshot(url).await?;
            let chunks = divide_into_chunks(
                snapshot
                    .sampled_files
                    .iter()
                    .map(|f| (f.path.as_str(), f.content.as_str())),
            );
            Ok(Ingested { snapshot, chunks })
        }
    }

    async fn invoke(&self, provider: &dyn Provider, system: &str, user: &str) -> Result<String> {
        let request = ChatRequest::with_system(&self.options.model, system, user)
            .temperature(self.options.temperature)
            .max_tokens(self.options.max_output_tokens);
        let response = provider.chat(request).await?;
        Ok(response.content)
    }

    fn humanizer(&self) -> Humanizer {
        match self.options.seed {
            Some(seed) => Humanizer::with_seed(self.options.humanizer, seed),
            None => Humanizer::new(self.options.humanizer),
        }
    }
}

/// Plain-text digest of an analysis for use in prompts
pub fn repository_summary(analysis: &RepoAnalysis) -> String {
    let info = &analysis.repo_info;
    let mut lines = vec![
        format!("Repository: {}", info.full_name),
        format!("Description: {}", info.description),
        format!("Primary language: {}", info.primary_language),
        format!("Stars: {}, forks: {}", info.stars, info.forks),
    ];

    if !info.language_stats.is_empty() {
        let languages = info
            .language_stats
            .iter()
            .map(|l| l.name.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        lines.push(format!("Languages: {}", languages));
    }

    lines.push(format!("README: {}", analysis.readme_summary));

    if !analysis.commit_history.is_empty() {
        lines.push("Recent commits:".to_string());
        lines.extend(
            analysis
                .commit_history
                .iter()
                .map(|c| format!("- {} ({})", c.headline(), c.author)),
        );
    }

    let structure = analysis.directory_structure.render(2);
    if !structure.trim().is_empty() {
        lines.push("Structure:".to_string());
        lines.push(structure.trim_end().to_string());
    }

    if !analysis.code_analysis.is_empty() {
        lines.push("Key files:".to_string());
        lines.extend(analysis.code_analysis.iter().map(|f| format!("- {}", f.summary)));
    }

    lines.join("\n")
}

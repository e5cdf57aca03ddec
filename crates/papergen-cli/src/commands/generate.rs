// Generate a paper

use std::path::PathBuf;
use std::sync::Arc;

use papergen_generation::{GenerationError, JobRegistry, PaperRequest};
use tracing::{debug, warn};

use super::{write_output, Command};
use crate::context::AppContext;
use crate::error::{CliError, CliResult};
use crate::output::{print_success, print_warning};

/// Generate a paper for a topic and optional repository
pub struct GenerateCommand {
    ctx: AppContext,
    topic: String,
    repository: Option<String>,
    branch: Option<String>,
    sections: Option<Vec<String>>,
    word_count: Option<usize>,
    clone: bool,
    use_model: bool,
    humanize: bool,
    seed: Option<u64>,
    output: Option<PathBuf>,
    quiet: bool,
}

impl GenerateCommand {
    pub fn new(ctx: AppContext, topic: String) -> Self {
        Self {
            ctx,
            topic,
            repository: None,
            branch: None,
            sections: None,
            word_count: None,
            clone: false,
            use_model: true,
            humanize: true,
            seed: None,
            output: None,
            quiet: false,
        }
    }

    pub fn with_repository(mut self, repository: Option<String>) -> Self {
        self.repository = repository;
        self
    }

    pub fn with_branch(mut self, branch: Option<String>) -> Self {
        self.branch = branch;
        self
    }

    pub fn with_sections(mut self, sections: Option<Vec<String>>) -> Self {
        self.sections = sections;
        self
    }

    pub fn with_word_count(mut self, word_count: Option<usize>) -> Self {
        self.word_count = word_count;
        self
    }

    pub fn with_clone(mut self, clone: bool) -> Self {
        self.clone = clone;
        self
    }

    /// Whether to call the configured model provider
    pub fn with_model(mut self, use_model: bool) -> Self {
        self.use_model = use_model;
        self
    }

    pub fn with_humanize(mut self, humanize: bool) -> Self {
        self.humanize = humanize;
        self
    }

    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_output(mut self, output: Option<PathBuf>) -> Self {
        self.output = output;
        self
    }

    pub fn with_quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    fn request(&self) -> CliResult<PaperRequest> {
        if self.topic.trim().is_empty() {
            return Err(CliError::invalid_argument("--topic must not be empty"));
        }

        let word_count = self
            .word_count
            .unwrap_or(self.ctx.settings.generation.word_count);
        if word_count == 0 {
            return Err(CliError::invalid_argument("--word-count must be greater than 0"));
        }

        let mut request = PaperRequest::new(self.topic.trim())
            .with_word_count(word_count)
            .cloned(self.clone);
        if let Some(repo) = &self.repository {
            request = request.with_repository(repo.clone());
        }
        if let Some(branch) = &self.branch {
            request = request.with_branch(branch.clone());
        }
        if let Some(sections) = &self.sections {
            request = request.with_sections(sections.iter().map(|s| s.trim().to_string()));
        }
        Ok(request)
    }
}

#[async_trait::async_trait]
impl Command for GenerateCommand {
    async fn execute(&self) -> CliResult<()> {
        let request = self.request()?;

        let mut options = self.ctx.pipeline_options();
        options.humanize = options.humanize && self.humanize;
        options.seed = self.seed;
        let pipeline = self.ctx.pipeline(options, self.use_model)?;
        if !pipeline.has_provider() {
            if request.repository_url.is_none() {
                return Err(GenerationError::NoProvider.into());
            }
            if self.use_model {
                warn!("No Gemini API key configured; building the template report");
            }
        }

        let registry = JobRegistry::new(Arc::new(pipeline));
        let id = registry.submit(request).await;
        let status = registry.wait(id).await?;
        debug!(job = %id, status = %status.status, "Generation finished");

        let document = registry.document(id).await?;
        if let Some(error) = &document.error_message {
            print_warning(&format!("Limited analysis: {}", error));
        }

        write_output(self.output.as_deref(), &document.to_markdown())?;

        if !self.quiet {
            let target = self
                .output
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "stdout".to_string());
            print_success(&format!(
                "Generated \"{}\" ({} sections, {} words) to {}",
                document.title,
                document.sections.len(),
                document.word_count(),
                target
            ));
        }
        Ok(())
    }
}

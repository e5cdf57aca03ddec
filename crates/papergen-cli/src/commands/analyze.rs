// Analyze a repository

use papergen_github::{analyze, RepoSnapshot};
use tracing::info;

use super::{write_output, Command};
use crate::context::AppContext;
use crate::error::CliResult;

/// Print the structural analysis of a repository as JSON
pub struct AnalyzeCommand {
    ctx: AppContext,
    url: String,
    clone: bool,
    branch: Option<String>,
}

impl AnalyzeCommand {
    pub fn new(ctx: AppContext, url: String) -> Self {
        Self {
            ctx,
            url,
            clone: false,
            branch: None,
        }
    }

    pub fn with_clone(mut self, clone: bool) -> Self {
        self.clone = clone;
        self
    }

    pub fn with_branch(mut self, branch: Option<String>) -> Self {
        self.branch = branch;
        self
    }

    async fn snapshot(&self) -> CliResult<RepoSnapshot> {
        let url = self.url.trim();
        if self.clone {
            let cloned = self
                .ctx
                .cloner()
                .clone_and_sample(url, self.branch.as_deref())
                .await?;
            Ok(cloned.into_snapshot(url))
        } else {
            Ok(self.ctx.github.fetch_snapshot(url).await?)
        }
    }
}

#[async_trait::async_trait]
impl Command for AnalyzeCommand {
    async fn execute(&self) -> CliResult<()> {
        let snapshot = self.snapshot().await?;
        let analysis = analyze(&snapshot);
        info!(
            repository = %analysis.repo_info.full_name,
            files = analysis.code_analysis.len(),
            "Repository analyzed"
        );
        write_output(None, &serde_json::to_string_pretty(&analysis)?)
    }
}

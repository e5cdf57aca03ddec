// Check a repository URL

use papergen_github::extract_github_info;

use super::Command;
use crate::error::{CliError, CliResult};
use crate::output::OutputStyle;

/// Report whether a URL points at a GitHub repository
pub struct ValidateUrlCommand {
    url: String,
}

impl ValidateUrlCommand {
    pub fn new(url: String) -> Self {
        Self { url }
    }

    /// Line printed for a valid URL, or the error for an invalid one
    pub fn check(&self) -> CliResult<String> {
        match extract_github_info(self.url.trim()) {
            Some(repo) => Ok(format!(
                "Valid GitHub repository: owner '{}', repository '{}'",
                repo.owner, repo.repo
            )),
            None => Err(CliError::invalid_argument(format!(
                "'{}' is not a GitHub repository URL",
                self.url
            ))),
        }
    }
}

#[async_trait::async_trait]
impl Command for ValidateUrlCommand {
    async fn execute(&self) -> CliResult<()> {
        let line = self.check()?;
        println!("{}", OutputStyle::default().success(&line));
        Ok(())
    }
}

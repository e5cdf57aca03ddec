// Command handlers for papergen CLI

pub mod analyze;
pub mod generate;
pub mod humanize;
pub mod sections;
pub mod validate_url;

pub use analyze::AnalyzeCommand;
pub use generate::GenerateCommand;
pub use humanize::HumanizeCommand;
pub use sections::SectionsCommand;
pub use validate_url::ValidateUrlCommand;

use std::path::Path;

use crate::error::CliResult;

/// Trait for command handlers
#[async_trait::async_trait]
pub trait Command: Send + Sync {
    /// Execute the command
    async fn execute(&self) -> CliResult<()>;
}

/// Write `content` to `path`, or stdout when no path is given
pub(crate) fn write_output(path: Option<&Path>, content: &str) -> CliResult<()> {
    match path {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(path, content)?;
        }
        None => {
            use std::io::Write;
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(content.as_bytes())?;
            if !content.ends_with('\n') {
                stdout.write_all(b"\n")?;
            }
        }
    }
    Ok(())
}

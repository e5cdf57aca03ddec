// List the default sections

use papergen_generation::{system_prompt, SectionKind};

use super::Command;
use crate::error::CliResult;
use crate::output::OutputStyle;

/// Print the sections generated when none are requested
pub struct SectionsCommand;

impl SectionsCommand {
    pub fn new() -> Self {
        Self
    }

    /// `key  Title` lines in generation order
    pub fn lines() -> Vec<String> {
        SectionKind::defaults()
            .iter()
            .map(|kind| format!("{:<18} {}", kind.key(), kind.title()))
            .collect()
    }
}

impl Default for SectionsCommand {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl Command for SectionsCommand {
    async fn execute(&self) -> CliResult<()> {
        let style = OutputStyle::default();
        println!("{}", style.header("Default sections"));
        for (line, kind) in Self::lines().iter().zip(SectionKind::defaults()) {
            println!("  {}", line);
            tracing::debug!(section = %kind, prompt = system_prompt(&kind), "Section prompt");
        }
        println!();
        println!(
            "{}",
            style.info("Other names passed to --sections are generated with a generic prompt.")
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lines_in_order() {
        let lines = SectionsCommand::lines();
        assert_eq!(lines.len(), 8);
        assert!(lines[0].starts_with("abstract"));
        assert!(lines[2].contains("Literature Review"));
        assert!(lines[7].starts_with("references"));
    }
}

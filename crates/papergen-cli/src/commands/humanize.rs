// Humanize a text file

use std::io::Read;
use std::path::{Path, PathBuf};

use papergen_generation::{Humanizer, HumanizerConfig, SectionKind};

use super::{write_output, Command};
use crate::error::{CliError, CliResult};
use crate::output::OutputStyle;

/// Run the humanizer over a file or stdin
pub struct HumanizeCommand {
    file: PathBuf,
    section: SectionKind,
    seed: Option<u64>,
    stats: bool,
    output: Option<PathBuf>,
}

impl HumanizeCommand {
    pub fn new(file: PathBuf) -> Self {
        Self {
            file,
            section: SectionKind::Introduction,
            seed: None,
            stats: false,
            output: None,
        }
    }

    pub fn with_section(mut self, section: &str) -> Self {
        self.section = SectionKind::from_name(section);
        self
    }

    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_stats(mut self, stats: bool) -> Self {
        self.stats = stats;
        self
    }

    pub fn with_output(mut self, output: Option<PathBuf>) -> Self {
        self.output = output;
        self
    }

    fn read_input(&self) -> CliResult<String> {
        if self.file == Path::new("-") {
            let mut text = String::new();
            std::io::stdin().read_to_string(&mut text)?;
            return Ok(text);
        }
        if !self.file.is_file() {
            return Err(CliError::invalid_argument(format!(
                "{} is not a readable file",
                self.file.display()
            )));
        }
        Ok(std::fs::read_to_string(&self.file)?)
    }

    /// Humanize `text` with this command's section and seed
    pub fn rewrite(&self, text: &str) -> String {
        let config = HumanizerConfig::default();
        let mut humanizer = match self.seed {
            Some(seed) => Humanizer::with_seed(config, seed),
            None => Humanizer::new(config),
        };
        humanizer.humanize(text, &self.section)
    }
}

#[async_trait::async_trait]
impl Command for HumanizeCommand {
    async fn execute(&self) -> CliResult<()> {
        let original = self.read_input()?;
        let humanized = self.rewrite(&original);
        write_output(self.output.as_deref(), &humanized)?;

        if self.stats {
            let stats = Humanizer::stats(&original, &humanized);
            let style = OutputStyle::plain();
            eprintln!(
                "{}",
                style.key_value(
                    "Words",
                    &format!("{} -> {}", stats.original_word_count, stats.humanized_word_count)
                )
            );
            eprintln!(
                "{}",
                style.key_value(
                    "Sentences",
                    &format!(
                        "{} -> {}",
                        stats.original_sentence_count, stats.humanized_sentence_count
                    )
                )
            );
            eprintln!("{}", style.key_value("Changed", &stats.changed.to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_output() {
        let text = "It is important to note that this paper studies caching. The results show gains.";
        let a = HumanizeCommand::new(PathBuf::from("-")).with_seed(Some(7));
        let b = HumanizeCommand::new(PathBuf::from("-")).with_seed(Some(7));
        assert_eq!(a.rewrite(text), b.rewrite(text));
    }

    #[test]
    fn test_section_name_parsing() {
        let cmd = HumanizeCommand::new(PathBuf::from("-")).with_section("Literature Review");
        assert_eq!(cmd.section, SectionKind::LiteratureReview);
    }

    #[test]
    fn test_missing_file() {
        let cmd = HumanizeCommand::new(PathBuf::from("/definitely/not/here.md"));
        assert!(matches!(
            cmd.read_input(),
            Err(CliError::InvalidArgument { .. })
        ));
    }
}

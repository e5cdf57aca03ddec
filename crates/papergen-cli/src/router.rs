// Command routing and dispatch

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::commands::*;
use crate::context::AppContext;
use crate::error::CliResult;

/// Papergen - research papers from software repositories
#[derive(Parser, Debug)]
#[command(name = "papergen")]
#[command(bin_name = "papergen")]
#[command(about = "Generate academic-style papers from a topic and a GitHub repository")]
#[command(
    long_about = "Papergen analyzes a GitHub repository, prompts a Gemini model section by \
    section and rewrites the answers so they read less formulaic.\n\n\
    Quick start:\n  \
    papergen generate --topic \"Caching strategies\" --repo https://github.com/owner/repo\n  \
    papergen analyze https://github.com/owner/repo\n  \
    papergen humanize draft.md --section introduction"
)]
#[command(version)]
#[command(author = "Papergen Contributors")]
#[command(disable_help_subcommand = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Minimize output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Configuration file (default: <config dir>/papergen/config.toml)
    #[arg(short, long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Generate a paper
    #[command(about = "Generate a paper on a topic, optionally grounded in a repository")]
    Generate {
        /// Paper topic
        #[arg(short, long)]
        topic: String,

        /// GitHub repository URL
        #[arg(short, long, value_name = "URL")]
        repo: Option<String>,

        /// Branch to clone (with --clone)
        #[arg(short, long)]
        branch: Option<String>,

        /// Comma-separated section names (default: the standard eight)
        #[arg(short, long, value_delimiter = ',')]
        sections: Option<Vec<String>>,

        /// Target length of the whole paper
        #[arg(short = 'w', long, value_name = "N")]
        word_count: Option<usize>,

        /// Clone the repository instead of using the REST API
        #[arg(long)]
        clone: bool,

        /// Build the template report without calling a model
        #[arg(long)]
        no_llm: bool,

        /// Keep model output as returned
        #[arg(long)]
        no_humanize: bool,

        /// Seed for reproducible humanization
        #[arg(long)]
        seed: Option<u64>,

        /// Output file (default: stdout)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Analyze a repository
    #[command(about = "Print the structural analysis of a repository as JSON")]
    Analyze {
        /// GitHub repository URL
        #[arg(value_name = "URL")]
        url: String,

        /// Clone the repository instead of using the REST API
        #[arg(long)]
        clone: bool,

        /// Branch to clone (with --clone)
        #[arg(short, long)]
        branch: Option<String>,
    },

    /// Check a repository URL
    #[command(about = "Check whether a URL points at a GitHub repository")]
    ValidateUrl {
        #[arg(value_name = "URL")]
        url: String,
    },

    /// Humanize a text file
    #[command(about = "Rewrite a text file so it reads less formulaic")]
    Humanize {
        /// File to rewrite ('-' for stdin)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Section the text belongs to
        #[arg(short, long, default_value = "introduction")]
        section: String,

        /// Seed for reproducible output
        #[arg(long)]
        seed: Option<u64>,

        /// Print word and sentence statistics to stderr
        #[arg(long)]
        stats: bool,

        /// Output file (default: stdout)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// List the default sections
    #[command(about = "List the sections generated by default")]
    Sections,
}

/// Route and execute commands
pub struct CommandRouter;

impl CommandRouter {
    /// Parse CLI arguments and route to appropriate handler
    pub async fn route() -> CliResult<()> {
        let cli = Cli::parse();

        crate::logging::init_logging(cli.verbose, cli.quiet);

        Self::execute(&cli).await
    }

    /// Execute a command
    pub async fn execute(cli: &Cli) -> CliResult<()> {
        match &cli.command {
            Commands::Generate {
                topic,
                repo,
                branch,
                sections,
                word_count,
                clone,
                no_llm,
                no_humanize,
                seed,
                output,
            } => {
                let ctx = AppContext::load(cli.config.as_ref())?;
                let cmd = GenerateCommand::new(ctx, topic.clone())
                    .with_repository(repo.clone())
                    .with_branch(branch.clone())
                    .with_sections(sections.clone())
                    .with_word_count(*word_count)
                    .with_clone(*clone)
                    .with_model(!*no_llm)
                    .with_humanize(!*no_humanize)
                    .with_seed(*seed)
                    .with_output(output.clone())
                    .with_quiet(cli.quiet);
                cmd.execute().await
            }
            Commands::Analyze { url, clone, branch } => {
                let ctx = AppContext::load(cli.config.as_ref())?;
                let cmd = AnalyzeCommand::new(ctx, url.clone())
                    .with_clone(*clone)
                    .with_branch(branch.clone());
                cmd.execute().await
            }
            Commands::ValidateUrl { url } => ValidateUrlCommand::new(url.clone()).execute().await,
            Commands::Humanize {
                file,
                section,
                seed,
                stats,
                output,
            } => {
                let cmd = HumanizeCommand::new(file.clone())
                    .with_section(section)
                    .with_seed(*seed)
                    .with_stats(*stats)
                    .with_output(output.clone());
                cmd.execute().await
            }
            Commands::Sections => SectionsCommand::new().execute().await,
        }
    }
}

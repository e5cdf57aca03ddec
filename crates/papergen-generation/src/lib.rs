//! Paper generation for papergen
//!
//! Takes a topic and an optional repository, builds per-section prompts from
//! the repository's code, drives a model provider, post-processes the answers
//! with the humanizer and assembles the final document. Without a provider a
//! deterministic template report is assembled from the repository alone.

pub mod assembler;
pub mod chunking;
pub mod error;
pub mod formatter;
pub mod humanizer;
pub mod jobs;
pub mod models;
pub mod pipeline;
pub mod prompts;

pub use assembler::{default_references, TemplateAssembler};
pub use chunking::{detect_language, divide_into_chunks, is_processable_file, CodeChunk};
pub use error::{GenerationError, Result};
pub use formatter::{format_code_snippet, format_reference, format_references, LISTING_WIDTH};
pub use humanizer::{
    split_into_sentences, HumanizationStats, Humanizer, HumanizerConfig, TransitionKind,
};
pub use jobs::{JobRegistry, JobStatus};
pub use models::{
    PaperDocument, PaperRequest, PaperSection, ProcessingStatus, Reference, SectionKind,
    DEFAULT_WORD_COUNT,
};
pub use pipeline::{repository_summary, PaperPipeline, PipelineOptions, DEFAULT_MODEL};
pub use prompts::{
    system_prompt, word_share, GeneratedPrompt, PromptBuilder, DEFAULT_MAX_CHUNKS,
};

//! training_data - Persian prompt/completion harvesting
//!
//! Prompts are normalized, sent to an OpenAI-compatible chat-completion
//! endpoint one at a time, and every accepted pair is committed to SQLite.
//! The stored set is exported as a JSON array consumed by fine-tuning jobs.
//! - `text` - Persian text cleaning and normalization
//! - `completion` - chat-completion client seam and its reqwest implementation
//! - `storage` - SQLite store for training examples
//! - `export` - JSON training-file writer/reader
//! - `pipeline` - the ingestion loop tying the pieces together
//! - `config` - TOML + environment configuration

pub mod completion;
pub mod config;
pub mod export;
pub mod pipeline;
pub mod storage;
pub mod text;
pub mod types;

pub use completion::{
    ApiKey, ChatCompletionClient, CompletionClient, CompletionError, CompletionResult,
};
pub use config::{Config, ConfigError};
pub use export::{export_store, load_training_file, write_training_file, ExportError};
pub use pipeline::{
    BatchReport, DiscardReason, DiscardedPrompt, PipelineError, PipelineResult,
    TrainingDataPipeline,
};
pub use storage::{StorageError, StorageResult, TrainingStore};
pub use text::{clean_text, NormalizerConfig, PersianNormalizer, TextCleaner};
pub use types::{TrainingExample, TrainingPair};

use std::path::Path;

use log::{info, warn};
use thiserror::Error;

use crate::completion::{CompletionClient, CompletionError};
use crate::export::{export_store, ExportError};
use crate::storage::{StorageError, TrainingStore};
use crate::text::TextCleaner;
use crate::types::TrainingExample;

pub type PipelineResult<T> = Result<T, PipelineError>;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("export error: {0}")]
    Export(#[from] ExportError),
}

/// Why a prompt contributed nothing to the store.
#[derive(Debug, Error)]
pub enum DiscardReason {
    #[error("prompt is empty after cleaning")]
    EmptyPrompt,

    #[error("completion request failed: {0}")]
    Completion(#[from] CompletionError),

    #[error("completion is empty after cleaning")]
    EmptyCompletion,
}

#[derive(Debug)]
pub struct DiscardedPrompt {
    /// Position of the prompt in the submitted batch.
    pub index: usize,
    /// The cleaned prompt.
    pub prompt: String,
    pub reason: DiscardReason,
}

/// Outcome of one batch: persisted examples in input order, plus the
/// prompts that were dropped along the way.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub kept: Vec<TrainingExample>,
    pub discarded: Vec<DiscardedPrompt>,
}

enum PromptOutcome {
    Stored(TrainingExample),
    Discarded(DiscardReason),
}

/// Clean → complete → clean → persist, one prompt at a time.
pub struct TrainingDataPipeline<C> {
    cleaner: TextCleaner,
    client: C,
    store: TrainingStore,
}

impl<C: CompletionClient> TrainingDataPipeline<C> {
    pub fn new(client: C, store: TrainingStore) -> Self {
        Self {
            cleaner: TextCleaner::default(),
            client,
            store,
        }
    }

    pub fn with_cleaner(mut self, cleaner: TextCleaner) -> Self {
        self.cleaner = cleaner;
        self
    }

    pub fn store(&self) -> &TrainingStore {
        &self.store
    }

    pub fn clean_text(&self, raw: &str) -> String {
        self.cleaner.clean(raw)
    }

    pub async fn request_completion(&self, prompt: &str) -> Result<String, CompletionError> {
        self.client.request_completion(prompt).await
    }

    /// Process `prompts` in order and return the examples that were stored.
    ///
    /// A failed or empty completion skips its prompt; a storage failure
    /// aborts the rest of the batch while earlier rows stay committed.
    pub async fn process_prompts<I, S>(&mut self, prompts: I) -> PipelineResult<Vec<TrainingExample>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Ok(self.process_prompts_report(prompts).await?.kept)
    }

    /// Like [`process_prompts`](Self::process_prompts) but also reports the
    /// discarded prompts and why they were dropped.
    pub async fn process_prompts_report<I, S>(&mut self, prompts: I) -> PipelineResult<BatchReport>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut report = BatchReport::default();

        for (index, raw) in prompts.into_iter().enumerate() {
            let prompt = self.cleaner.clean(raw.as_ref());
            match self.process_one(&prompt).await? {
                PromptOutcome::Stored(example) => report.kept.push(example),
                PromptOutcome::Discarded(reason) => {
                    warn!("Skipping prompt #{}: {}", index, reason);
                    report.discarded.push(DiscardedPrompt {
                        index,
                        prompt,
                        reason,
                    });
                }
            }
        }

        info!(
            "Processed batch: {} stored, {} discarded",
            report.kept.len(),
            report.discarded.len()
        );
        Ok(report)
    }

    async fn process_one(&mut self, prompt: &str) -> PipelineResult<PromptOutcome> {
        if prompt.is_empty() {
            return Ok(PromptOutcome::Discarded(DiscardReason::EmptyPrompt));
        }

        let completion = match self.client.request_completion(prompt).await {
            Ok(completion) => self.cleaner.clean(&completion),
            Err(error) => return Ok(PromptOutcome::Discarded(error.into())),
        };
        if completion.is_empty() {
            return Ok(PromptOutcome::Discarded(DiscardReason::EmptyCompletion));
        }

        let example = self.store.insert(prompt, &completion)?;
        Ok(PromptOutcome::Stored(example))
    }

    /// Export every stored pair to `output_path`. Returns the number written.
    pub fn export_training_data(&self, output_path: impl AsRef<Path>) -> PipelineResult<usize> {
        Ok(export_store(&self.store, output_path)?)
    }

    /// Number of stored examples.
    pub fn stats(&self) -> PipelineResult<u64> {
        Ok(self.store.count()?)
    }

    /// Tear down the pipeline, releasing the store connection.
    pub fn close(self) -> PipelineResult<()> {
        Ok(self.store.close()?)
    }
}

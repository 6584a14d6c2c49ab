use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use log::info;
use training_data::{
    export_store, ChatCompletionClient, Config, TextCleaner, TrainingDataPipeline, TrainingStore,
};

/// Prompts from `path`, one per non-blank line.
pub fn read_prompts(path: &Path) -> anyhow::Result<Vec<String>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("reading prompts from {}", path.display()))?;
    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}

fn open_store(config: &Config) -> anyhow::Result<TrainingStore> {
    TrainingStore::open(&config.database_path)
        .with_context(|| format!("opening database {}", config.database_path.display()))
}

pub async fn collect(
    config: &Config,
    mut prompts: Vec<String>,
    prompts_file: Option<PathBuf>,
    export: bool,
    output: Option<PathBuf>,
) -> anyhow::Result<()> {
    if let Some(path) = prompts_file {
        prompts.extend(read_prompts(&path)?);
    }
    anyhow::ensure!(
        !prompts.is_empty(),
        "no prompts given; pass them as arguments or with --prompts-file"
    );

    let client = ChatCompletionClient::new(config.require_api_key()?.clone())
        .with_base_url(config.api_base.clone())
        .with_model(config.model.clone())
        .with_timeout(config.request_timeout());
    let mut pipeline = TrainingDataPipeline::new(client, open_store(config)?)
        .with_cleaner(TextCleaner::new(config.normalizer.clone()));

    info!(
        "Collecting completions for {} prompts with model {}",
        prompts.len(),
        config.model
    );

    let outcome = async {
        let report = pipeline.process_prompts_report(&prompts).await?;
        println!(
            "stored {} of {} prompts ({} discarded)",
            report.kept.len(),
            prompts.len(),
            report.discarded.len()
        );
        for discarded in &report.discarded {
            println!("  #{}: {}", discarded.index, discarded.reason);
        }

        if export {
            let path = output.unwrap_or_else(|| config.export_path.clone());
            let written = pipeline.export_training_data(&path)?;
            println!("exported {} examples to {}", written, path.display());
        }
        anyhow::Ok(())
    }
    .await;

    pipeline.close().context("closing database")?;
    outcome
}

pub fn export(config: &Config, output: Option<PathBuf>) -> anyhow::Result<()> {
    let store = open_store(config)?;
    let path = output.unwrap_or_else(|| config.export_path.clone());

    let outcome = export_store(&store, &path)
        .with_context(|| format!("exporting to {}", path.display()));

    store.close().context("closing database")?;
    let written = outcome?;
    println!("exported {} examples to {}", written, path.display());
    Ok(())
}

pub fn stats(config: &Config) -> anyhow::Result<()> {
    let store = open_store(config)?;
    let outcome = store.count();
    store.close().context("closing database")?;

    println!("{} training examples in {}", outcome?, config.database_path.display());
    Ok(())
}

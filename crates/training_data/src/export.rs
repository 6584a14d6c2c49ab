use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use thiserror::Error;

use crate::storage::{StorageError, TrainingStore};
use crate::types::TrainingPair;

pub type ExportResult<T> = Result<T, ExportError>;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Write `pairs` as a two-space indented JSON array, creating the parent
/// directory when missing. Non-ASCII text is written literally.
pub fn write_training_file(path: impl AsRef<Path>, pairs: &[TrainingPair]) -> ExportResult<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, pairs)?;
    writer.flush()?;
    Ok(())
}

/// Read a training file back, as the fine-tuning side does.
pub fn load_training_file(path: impl AsRef<Path>) -> ExportResult<Vec<TrainingPair>> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

/// Dump every stored pair to `path`. Returns the number of pairs written.
pub fn export_store(store: &TrainingStore, path: impl AsRef<Path>) -> ExportResult<usize> {
    let pairs = store.pairs()?;
    write_training_file(path.as_ref(), &pairs)?;
    log::info!(
        "Exported {} training examples to {}",
        pairs.len(),
        path.as_ref().display()
    );
    Ok(pairs.len())
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;

    #[test]
    fn writes_pretty_json_with_literal_persian_text() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("training_data.json");

        write_training_file(&path, &[TrainingPair::new("سلام دنیا", "hello world")])
            .expect("write file");

        let content = fs::read_to_string(&path).expect("read file");
        assert_eq!(
            content,
            "[\n  {\n    \"prompt\": \"سلام دنیا\",\n    \"completion\": \"hello world\"\n  }\n]"
        );
        assert!(!content.contains("\\u"));
    }

    #[test]
    fn empty_set_is_an_empty_array() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("empty.json");

        write_training_file(&path, &[]).expect("write file");

        assert_eq!(fs::read_to_string(&path).expect("read file"), "[]");
        assert!(load_training_file(&path).expect("load file").is_empty());
    }

    #[test]
    fn creates_missing_directories() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("a").join("b").join("training_data.json");

        write_training_file(&path, &[TrainingPair::new("p", "c")]).expect("write file");

        assert_eq!(
            load_training_file(&path).expect("load file"),
            vec![TrainingPair::new("p", "c")]
        );
    }

    #[test]
    fn overwrites_previous_export() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("training_data.json");

        write_training_file(&path, &[TrainingPair::new("old", "old")]).expect("first write");
        write_training_file(&path, &[TrainingPair::new("new", "new")]).expect("second write");

        assert_eq!(
            load_training_file(&path).expect("load file"),
            vec![TrainingPair::new("new", "new")]
        );
    }

    #[test]
    fn fails_when_parent_is_a_file() {
        let dir = tempdir().expect("temp dir");
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "not a directory").expect("write blocker");

        let result = write_training_file(blocker.join("training_data.json"), &[]);
        assert!(matches!(result, Err(ExportError::Io(_))));
    }

    #[test]
    fn export_store_writes_rows_in_insertion_order() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("training_data.json");
        let store = TrainingStore::open_in_memory().expect("open store");
        store.insert("یک", "1").expect("insert");
        store.insert("دو", "2").expect("insert");

        let written = export_store(&store, &path).expect("export");

        assert_eq!(written, 2);
        assert_eq!(
            load_training_file(&path).expect("load file"),
            vec![TrainingPair::new("یک", "1"), TrainingPair::new("دو", "2")]
        );
    }
}

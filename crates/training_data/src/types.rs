use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A stored prompt/completion pair.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TrainingExample {
    pub id: i64,
    pub prompt: String,
    pub completion: String,
    pub created_at: DateTime<Utc>,
}

/// The interchange form written to the training file: id and timestamp dropped.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TrainingPair {
    pub prompt: String,
    pub completion: String,
}

impl TrainingPair {
    pub fn new(prompt: impl Into<String>, completion: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            completion: completion.into(),
        }
    }
}

impl From<&TrainingExample> for TrainingPair {
    fn from(example: &TrainingExample) -> Self {
        Self::new(example.prompt.clone(), example.completion.clone())
    }
}

impl From<TrainingExample> for TrainingPair {
    fn from(example: TrainingExample) -> Self {
        Self::new(example.prompt, example.completion)
    }
}

//! Per-epoch training records.

use crate::error::{AdquirirError, Result};
use serde::{Deserialize, Serialize};

/// Phase of the semi-supervised training state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Before any epoch has run.
    Init,
    /// Labelled-only warmup.
    SupervisedWarmup,
    /// Combined labelled + pseudo-labelled training.
    SemiSupervised,
    /// Best-snapshot restoration after the final stage.
    ReloadBest,
    /// Training finished.
    Done,
}

/// Metrics recorded at the end of one epoch.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EpochRecord {
    /// Stage this epoch belonged to.
    pub stage: Stage,
    /// Epoch number within its stage, starting at 1.
    pub epoch: usize,
    /// Accuracy on the labelled training data.
    pub train_acc: f32,
    /// Mean negative log-likelihood on the labelled training data.
    pub train_loss: f32,
    /// Validation accuracy, when a validation set was supplied.
    pub val_acc: Option<f32>,
    /// Validation loss, when a validation set was supplied.
    pub val_loss: Option<f32>,
}

/// Chronological record of a whole training run, warmup and
/// semi-supervised epochs combined.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrainingHistory {
    records: Vec<EpochRecord>,
}

impl TrainingHistory {
    /// Creates an empty history.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one epoch record.
    pub fn push(&mut self, record: EpochRecord) {
        self.records.push(record);
    }

    /// All records in chronological order.
    #[must_use]
    pub fn records(&self) -> &[EpochRecord] {
        &self.records
    }

    /// Number of recorded epochs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Most recent record, if any.
    #[must_use]
    pub fn last(&self) -> Option<&EpochRecord> {
        self.records.last()
    }

    /// Serializes the history as JSON.
    ///
    /// # Errors
    ///
    /// Returns a `Serialization` error if encoding fails.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| AdquirirError::Serialization(e.to_string()))
    }
}

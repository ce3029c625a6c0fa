//! Convenient glob import of the crate's main types.
//!
//! ```
//! use adquirir::prelude::*;
//! ```

pub use crate::acquisition::{AcquisitionFunction, Bald, MaxEntropy, RandomAcquisition};
pub use crate::data::{
    Acquisition, CyclicBatches, DataManager, Dataset, InMemoryDataset, LabelScope, LabelledSet,
    TransformedDataset, UnlabelledView,
};
pub use crate::error::{AdquirirError, IndexSpace, Result};
pub use crate::metrics::{accuracy, argmax_rows, nll, one_hot};
pub use crate::models::SoftmaxRegression;
pub use crate::optim::Sgd;
pub use crate::primitives::{Matrix, Vector};
pub use crate::training::{
    AnnealSchedule, Annealer, Direction, EarlyStopper, EpochRecord, SemiSupervisedConfig,
    SemiSupervisedTrainer, Stage, TrainingHistory,
};
pub use crate::traits::{Optimizer, ParameterizedModel, PredictiveModel, TrainableModel};

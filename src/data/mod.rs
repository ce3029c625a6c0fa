//! Pool and labelled-set management for active learning.
//!
//! The backing collection is never mutated: labelling is *logical*
//! deletion through a mask ([`PoolIndex`]), and the labelled set grows by
//! appending acquired subsets on top of a fixed baseline ([`LabelledSet`]).
//! [`DataManager`] ties the two together with an acquisition function.
//!
//! Conservation law: at every point after construction,
//! `labelled.len() - labelled.baseline_len() + unlabelled.len()` equals the
//! original pool size.

mod batch;
mod dataset;
mod labelled;
mod manager;
mod pool;
mod view;

pub use batch::{Batches, CyclicBatches, PoolBatches};
pub use dataset::{Dataset, InMemoryDataset, Sample, TransformedDataset};
pub use labelled::LabelledSet;
pub use manager::{Acquisition, DataManager};
pub use pool::PoolIndex;
pub use view::{LabelFn, LabelScope, UnlabelledView};

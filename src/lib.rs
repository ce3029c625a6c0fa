//! # Adquirir
//!
//! Label-efficient learning: active acquisition over an unlabelled pool
//! plus semi-supervised pseudo-label training.
//!
//! The crate revolves around three pieces:
//!
//! - [`data`]: a logically-shrinking [`data::UnlabelledView`] over an
//!   immutable pool, the growing [`data::LabelledSet`], and the
//!   [`data::DataManager`] that moves points from one to the other.
//! - [`acquisition`]: scoring strategies ([`acquisition::Bald`],
//!   [`acquisition::MaxEntropy`], [`acquisition::RandomAcquisition`])
//!   that pick which points are worth a label.
//! - [`training`]: the two-stage [`training::SemiSupervisedTrainer`]
//!   that squeezes signal out of the points that were not picked.
//!
//! Models plug in through the capability traits in [`traits`];
//! [`models::SoftmaxRegression`] is the bundled reference implementation.
//!
//! # Example
//!
//! One active-learning round: score the pool, label the best points, and
//! grow the training set.
//!
//! ```
//! use adquirir::acquisition::Bald;
//! use adquirir::data::{DataManager, InMemoryDataset, LabelledSet, UnlabelledView};
//! use adquirir::models::SoftmaxRegression;
//! use adquirir::primitives::Matrix;
//!
//! let x = Matrix::from_vec(50, 2, (0..100).map(|i| i as f32 / 100.0).collect()).unwrap();
//! let ds = InMemoryDataset::with_labels(x, (0..50).map(|i| i % 2).collect()).unwrap();
//! let pool = UnlabelledView::new(ds).unwrap();
//!
//! let mut manager = DataManager::new(LabelledSet::empty(2), pool, Bald::new(10)).unwrap();
//! let mut model = SoftmaxRegression::new(2, 2).with_dropout(0.5).with_seed(0);
//!
//! let round = manager.acquire(&mut model, 10).unwrap();
//! assert_eq!(round.indices.len(), 10);
//! assert_eq!(manager.n_labelled(), 10);
//! assert_eq!(manager.n_unlabelled(), 40);
//! ```

#![warn(missing_docs)]

pub mod acquisition;
pub mod data;
pub mod error;
pub mod metrics;
pub mod models;
pub mod optim;
pub mod prelude;
pub mod primitives;
pub mod training;
pub mod traits;

//! Semi-supervised pseudo-label training.
//!
//! Implements the two-stage regime of Lee (2013): a supervised warmup on
//! the labelled data alone, then a combined stage that pairs every
//! unlabelled batch with a labelled batch from an infinite wraparound
//! stream and adds an annealed pseudo-label loss. One optimizer carries
//! its state across both stages, so stage two is a continuation of stage
//! one, not a restart.
//!
//! # Reference
//!
//! - Lee, D.-H. (2013). Pseudo-label: the simple and efficient
//!   semi-supervised learning method for deep neural networks. ICML
//!   Workshop on Challenges in Representation Learning.

mod anneal;
mod early_stopping;
mod history;

pub use anneal::{AnnealSchedule, Annealer};
pub use early_stopping::{Direction, EarlyStopper};
pub use history::{EpochRecord, Stage, TrainingHistory};

use crate::data::{CyclicBatches, Dataset, LabelledSet, UnlabelledView};
use crate::error::{AdquirirError, Result};
use crate::metrics::{accuracy, argmax_rows, nll, one_hot};
use crate::primitives::Matrix;
use crate::traits::{Optimizer, TrainableModel};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Configuration for [`SemiSupervisedTrainer`].
///
/// Defaults: 50 warmup epochs, 150 semi-supervised epochs, batch size 32,
/// no early stopping, best-snapshot reload on, hard pseudo-labels, the
/// default [`AnnealSchedule`], one anneal step per 50 optimizer steps.
#[derive(Debug, Clone)]
pub struct SemiSupervisedConfig {
    /// Epochs of supervised warmup (stage one).
    pub warmup_epochs: usize,
    /// Epochs of combined training (stage two). Zero skips the stage.
    pub semisupervised_epochs: usize,
    /// Batch size for both labelled and unlabelled batches.
    pub batch_size: usize,
    /// Early-stopping patience for the warmup stage, if any.
    pub warmup_patience: Option<usize>,
    /// Early-stopping patience for the combined stage, if any.
    pub semisupervised_patience: Option<usize>,
    /// Whether to restore the best validation snapshot at the end.
    pub reload_best: bool,
    /// Use the full predictive distribution as the pseudo-target instead
    /// of its argmax one-hot.
    pub soft_pseudo_labels: bool,
    /// Ramp schedule for the unsupervised loss weight.
    pub schedule: AnnealSchedule,
    /// Optimizer steps between anneal steps.
    pub anneal_every: usize,
    /// Seed for epoch shuffling.
    pub seed: u64,
}

impl Default for SemiSupervisedConfig {
    fn default() -> Self {
        Self {
            warmup_epochs: 50,
            semisupervised_epochs: 150,
            batch_size: 32,
            warmup_patience: None,
            semisupervised_patience: None,
            reload_best: true,
            soft_pseudo_labels: false,
            schedule: AnnealSchedule::default(),
            anneal_every: 50,
            seed: 0,
        }
    }
}

impl SemiSupervisedConfig {
    /// Sets the warmup epoch count.
    #[must_use]
    pub fn with_warmup_epochs(mut self, epochs: usize) -> Self {
        self.warmup_epochs = epochs;
        self
    }

    /// Sets the semi-supervised epoch count.
    #[must_use]
    pub fn with_semisupervised_epochs(mut self, epochs: usize) -> Self {
        self.semisupervised_epochs = epochs;
        self
    }

    /// Sets the batch size.
    #[must_use]
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    /// Enables warmup early stopping with the given patience.
    #[must_use]
    pub fn with_warmup_patience(mut self, patience: usize) -> Self {
        self.warmup_patience = Some(patience);
        self
    }

    /// Enables stage-two early stopping with the given patience.
    #[must_use]
    pub fn with_semisupervised_patience(mut self, patience: usize) -> Self {
        self.semisupervised_patience = Some(patience);
        self
    }

    /// Sets whether the best snapshot is restored at the end.
    #[must_use]
    pub fn with_reload_best(mut self, reload: bool) -> Self {
        self.reload_best = reload;
        self
    }

    /// Switches to soft pseudo-labels.
    #[must_use]
    pub fn with_soft_pseudo_labels(mut self, soft: bool) -> Self {
        self.soft_pseudo_labels = soft;
        self
    }

    /// Sets the anneal schedule.
    #[must_use]
    pub fn with_schedule(mut self, schedule: AnnealSchedule) -> Self {
        self.schedule = schedule;
        self
    }

    /// Sets the anneal cadence in optimizer steps.
    #[must_use]
    pub fn with_anneal_every(mut self, anneal_every: usize) -> Self {
        self.anneal_every = anneal_every;
        self
    }

    /// Sets the shuffling seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}

/// Two-stage pseudo-label trainer.
///
/// # Examples
///
/// ```
/// use adquirir::data::{InMemoryDataset, LabelledSet, UnlabelledView};
/// use adquirir::models::SoftmaxRegression;
/// use adquirir::optim::Sgd;
/// use adquirir::primitives::Matrix;
/// use adquirir::training::{SemiSupervisedConfig, SemiSupervisedTrainer};
///
/// let lx = Matrix::from_vec(4, 1, vec![-2.0, -1.0, 1.0, 2.0]).unwrap();
/// let labelled = LabelledSet::from_parts(lx, vec![0, 0, 1, 1]).unwrap();
///
/// let px = Matrix::from_vec(6, 1, vec![-3.0, -1.5, -0.5, 0.5, 1.5, 3.0]).unwrap();
/// let ds = InMemoryDataset::with_labels(px, vec![0, 0, 0, 1, 1, 1]).unwrap();
/// let pool = UnlabelledView::new(ds).unwrap();
///
/// let trainer = SemiSupervisedTrainer::new(
///     SemiSupervisedConfig::default()
///         .with_warmup_epochs(5)
///         .with_semisupervised_epochs(5)
///         .with_batch_size(2),
/// ).unwrap();
///
/// let mut model = SoftmaxRegression::new(1, 2);
/// let mut opt = Sgd::new(0.5);
/// let history = trainer.fit(&mut model, &mut opt, &labelled, &pool, None).unwrap();
/// assert_eq!(history.len(), 10);
/// ```
pub struct SemiSupervisedTrainer {
    config: SemiSupervisedConfig,
}

impl SemiSupervisedTrainer {
    /// Creates a trainer after validating the configuration.
    ///
    /// # Errors
    ///
    /// Returns a `Config` error for a zero batch size, a zero anneal
    /// cadence, no epochs at all, a zero patience, or an ill-formed
    /// anneal schedule.
    pub fn new(config: SemiSupervisedConfig) -> Result<Self> {
        if config.batch_size == 0 {
            return Err(AdquirirError::config("batch_size must be positive"));
        }
        if config.anneal_every == 0 {
            return Err(AdquirirError::config("anneal_every must be positive"));
        }
        if config.warmup_epochs == 0 && config.semisupervised_epochs == 0 {
            return Err(AdquirirError::config("no epochs configured"));
        }
        if config.warmup_patience == Some(0) || config.semisupervised_patience == Some(0) {
            return Err(AdquirirError::config("patience must be positive"));
        }
        // surfaces schedule errors before any training starts
        Annealer::new(config.schedule)?;
        Ok(Self { config })
    }

    /// The active configuration.
    #[must_use]
    pub fn config(&self) -> &SemiSupervisedConfig {
        &self.config
    }

    /// Runs the full state machine and returns the combined epoch history.
    ///
    /// Stage progression: warmup over `labelled` alone, then the combined
    /// stage pairing pool batches with a wraparound labelled stream, then
    /// an optional best-snapshot reload. An empty pool collapses stage two
    /// to a no-op. Early stopping monitors validation accuracy and so
    /// requires `val`.
    ///
    /// # Errors
    ///
    /// - `Config` if `labelled` is empty, or patience is configured
    ///   without a validation set.
    /// - `NumericInstability` if any step's combined loss is non-finite.
    pub fn fit<M, O, D>(
        &self,
        model: &mut M,
        optimizer: &mut O,
        labelled: &LabelledSet,
        pool: &UnlabelledView<D>,
        val: Option<(&Matrix<f32>, &[usize])>,
    ) -> Result<TrainingHistory>
    where
        M: TrainableModel,
        O: Optimizer,
        D: Dataset,
    {
        if labelled.is_empty() {
            return Err(AdquirirError::config(
                "cannot train on an empty labelled set",
            ));
        }
        if val.is_none()
            && (self.config.warmup_patience.is_some()
                || self.config.semisupervised_patience.is_some())
        {
            return Err(AdquirirError::config(
                "early stopping monitors validation accuracy and needs a validation set",
            ));
        }

        let mut rng = StdRng::seed_from_u64(self.config.seed);
        let mut history = TrainingHistory::new();
        let mut best: Option<EarlyStopper> = None;

        let mut stage = Stage::Init;
        while stage != Stage::Done {
            stage = match stage {
                Stage::Init => Stage::SupervisedWarmup,
                Stage::SupervisedWarmup => {
                    if self.config.warmup_epochs > 0 {
                        if let Some(stopper) =
                            self.run_warmup(model, optimizer, labelled, val, &mut rng, &mut history)?
                        {
                            // only a configured reload resumes stage two
                            // from the best warmup weights; otherwise the
                            // final-epoch weights carry over
                            if self.config.reload_best {
                                stopper.reload_best(model)?;
                            }
                            best = Some(stopper);
                        }
                    }
                    Stage::SemiSupervised
                }
                Stage::SemiSupervised => {
                    if self.config.semisupervised_epochs > 0 && !pool.is_empty() {
                        if let Some(stopper) =
                            self.run_semisupervised(model, optimizer, labelled, pool, val, &mut history)?
                        {
                            best = Some(stopper);
                        }
                    }
                    Stage::ReloadBest
                }
                Stage::ReloadBest => {
                    if self.config.reload_best {
                        if let Some(stopper) = &best {
                            stopper.reload_best(model)?;
                        }
                    }
                    Stage::Done
                }
                Stage::Done => Stage::Done,
            };
        }
        Ok(history)
    }

    fn make_stopper(&self, patience: Option<usize>, val_present: bool) -> Option<EarlyStopper> {
        // a stopper doubles as the best-snapshot holder, so reload_best
        // alone is enough to create one (with unbounded patience)
        if !val_present {
            return None;
        }
        match (patience, self.config.reload_best) {
            (Some(p), _) => Some(EarlyStopper::new(Direction::Maximize, p)),
            (None, true) => Some(EarlyStopper::new(Direction::Maximize, usize::MAX)),
            (None, false) => None,
        }
    }

    fn run_warmup<M, O>(
        &self,
        model: &mut M,
        optimizer: &mut O,
        labelled: &LabelledSet,
        val: Option<(&Matrix<f32>, &[usize])>,
        rng: &mut StdRng,
        history: &mut TrainingHistory,
    ) -> Result<Option<EarlyStopper>>
    where
        M: TrainableModel,
        O: Optimizer,
    {
        let k = model.num_classes();
        let mut stopper = self.make_stopper(self.config.warmup_patience, val.is_some());
        let mut step = 0u64;

        for epoch in 1..=self.config.warmup_epochs {
            model.set_training(true);
            for (x, y) in labelled.shuffled_batches(self.config.batch_size, rng) {
                model.zero_grad();
                let loss = model.backward(&x, &one_hot(&y, k), 1.0);
                step += 1;
                if !loss.is_finite() {
                    return Err(AdquirirError::NumericInstability {
                        context: format!("warmup step {step}"),
                        value: loss,
                    });
                }
                apply_step(model, optimizer)?;
            }

            let record = self.evaluate(model, labelled, val, Stage::SupervisedWarmup, epoch);
            let val_acc = record.val_acc;
            history.push(record);

            if let (Some(stopper), Some(val_acc)) = (stopper.as_mut(), val_acc) {
                if stopper.observe(val_acc, model) {
                    break;
                }
            }
        }
        Ok(stopper)
    }

    fn run_semisupervised<M, O, D>(
        &self,
        model: &mut M,
        optimizer: &mut O,
        labelled: &LabelledSet,
        pool: &UnlabelledView<D>,
        val: Option<(&Matrix<f32>, &[usize])>,
        history: &mut TrainingHistory,
    ) -> Result<Option<EarlyStopper>>
    where
        M: TrainableModel,
        O: Optimizer,
        D: Dataset,
    {
        let k = model.num_classes();
        let mut stopper = self.make_stopper(self.config.semisupervised_patience, val.is_some());
        let mut annealer = Annealer::new(self.config.schedule)?;
        let mut cyclic = CyclicBatches::new(labelled, self.config.batch_size)?;
        let mut step = 0u64;

        for epoch in 1..=self.config.semisupervised_epochs {
            for pool_x in pool.batches(self.config.batch_size) {
                // pseudo-targets come from the current model in inference
                // mode, before this step's update
                model.set_training(false);
                let proba = model.predict_proba(&pool_x);
                let pseudo = if self.config.soft_pseudo_labels {
                    proba
                } else {
                    one_hot(&argmax_rows(&proba), k)
                };

                model.set_training(true);
                model.zero_grad();
                let weight = annealer.weight();
                let u_loss = model.backward(&pool_x, &pseudo, weight);
                let (lx, ly) = cyclic.next_batch();
                let l_loss = model.backward(&lx, &one_hot(&ly, k), 1.0);

                let total = l_loss + weight * u_loss;
                step += 1;
                if !total.is_finite() {
                    return Err(AdquirirError::NumericInstability {
                        context: format!("semi-supervised step {step}"),
                        value: total,
                    });
                }
                apply_step(model, optimizer)?;

                if step % self.config.anneal_every as u64 == 0 {
                    annealer.step();
                }
            }

            let record = self.evaluate(model, labelled, val, Stage::SemiSupervised, epoch);
            let val_acc = record.val_acc;
            history.push(record);

            if let (Some(stopper), Some(val_acc)) = (stopper.as_mut(), val_acc) {
                if stopper.observe(val_acc, model) {
                    break;
                }
            }
        }
        Ok(stopper)
    }

    fn evaluate<M: TrainableModel>(
        &self,
        model: &mut M,
        labelled: &LabelledSet,
        val: Option<(&Matrix<f32>, &[usize])>,
        stage: Stage,
        epoch: usize,
    ) -> EpochRecord {
        let was_training = model.training();
        model.set_training(false);

        let train_x = labelled.to_matrix();
        let train_proba = model.predict_proba(&train_x);
        let train_acc = accuracy(labelled.labels(), &argmax_rows(&train_proba));
        let train_loss = nll(&train_proba, labelled.labels());

        let (val_acc, val_loss) = match val {
            Some((vx, vy)) => {
                let proba = model.predict_proba(vx);
                (
                    Some(accuracy(vy, &argmax_rows(&proba))),
                    Some(nll(&proba, vy)),
                )
            }
            None => (None, None),
        };

        model.set_training(was_training);
        EpochRecord {
            stage,
            epoch,
            train_acc,
            train_loss,
            val_acc,
            val_loss,
        }
    }
}

fn apply_step<M: TrainableModel, O: Optimizer>(model: &mut M, optimizer: &mut O) -> Result<()> {
    let grads = model.gradients();
    let mut params = model.parameters();
    optimizer.step(&mut params, &grads);
    model.load_parameters(&params)
}

#[cfg(test)]
#[path = "trainer_tests.rs"]
mod tests;

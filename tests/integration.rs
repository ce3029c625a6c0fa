//! End-to-end exercises of the acquisition loop and the trainer.

use adquirir::prelude::*;

fn pool_of(n: usize, d: usize) -> UnlabelledView<InMemoryDataset> {
    let x = Matrix::from_vec(n, d, (0..n * d).map(|i| (i % 17) as f32 / 17.0).collect()).unwrap();
    let ds = InMemoryDataset::with_labels(x, (0..n).map(|i| i % 2).collect()).unwrap();
    UnlabelledView::new(ds).unwrap()
}

#[test]
fn random_rounds_drain_the_pool_predictably() {
    let mut manager = DataManager::new(
        LabelledSet::empty(2),
        pool_of(100, 2),
        RandomAcquisition::with_seed(42),
    )
    .unwrap();
    let mut model = SoftmaxRegression::new(2, 2);

    let mut expected_remaining = 100;
    let mut acquired = Vec::new();
    for _ in 0..5 {
        let round = manager.acquire(&mut model, 10).unwrap();
        expected_remaining -= 10;
        assert_eq!(manager.n_unlabelled(), expected_remaining);
        assert_eq!(manager.n_labelled(), 100 - expected_remaining);
        acquired.extend(round.indices);
    }

    acquired.sort_unstable();
    let before = acquired.len();
    acquired.dedup();
    assert_eq!(acquired.len(), before, "acquired indices must be distinct");
    assert_eq!(acquired.len(), 50);
    assert!(acquired.iter().all(|&i| i < 100));
    assert_eq!(manager.unlabelled().labelled_indices().len(), 50);
}

#[test]
fn bald_rounds_interleave_with_retraining() {
    let mut manager = DataManager::new(
        LabelledSet::empty(2),
        pool_of(60, 2),
        Bald::new(5).with_batch_size(16),
    )
    .unwrap();
    let mut model = SoftmaxRegression::new(2, 2).with_dropout(0.3).with_seed(7);
    let trainer = SemiSupervisedTrainer::new(
        SemiSupervisedConfig::default()
            .with_warmup_epochs(3)
            .with_semisupervised_epochs(2)
            .with_batch_size(8),
    )
    .unwrap();
    let mut opt = Sgd::new(0.1).with_momentum(0.9);

    for round in 0..3 {
        manager.acquire(&mut model, 10).unwrap();
        assert_eq!(
            AcquisitionFunction::<SoftmaxRegression>::recent_scores(manager.acquisition()).len(),
            60 - round * 10
        );

        let history = trainer
            .fit(
                &mut model,
                &mut opt,
                manager.labelled(),
                manager.unlabelled(),
                None,
            )
            .unwrap();
        assert_eq!(history.len(), 5);
        assert!(history.records().iter().all(|r| r.train_loss.is_finite()));
    }
    assert_eq!(manager.n_labelled(), 30);
    assert_eq!(manager.n_unlabelled(), 30);
}

#[test]
fn externally_labelled_pool_round_trip() {
    let x = Matrix::from_vec(20, 1, (0..20).map(|i| i as f32 - 10.0).collect()).unwrap();
    let ds = InMemoryDataset::new(x);
    let oracle: adquirir::data::LabelFn =
        Box::new(|_, features| usize::from(features.as_slice()[0] >= 0.0));
    let pool = UnlabelledView::with_label_fn(ds, oracle);

    // an externally-labelled pool cannot leak ground truth
    assert!(pool.expose_labels().is_err());

    let mut manager =
        DataManager::new(LabelledSet::empty(1), pool, MaxEntropy::new()).unwrap();
    let mut model = SoftmaxRegression::new(1, 2);
    let round = manager.acquire(&mut model, 6).unwrap();

    for (abs, &label) in round.indices.iter().zip(round.labels.iter()) {
        assert_eq!(label, usize::from(*abs >= 10));
    }
}

#[test]
fn reset_supports_independent_repeats() {
    let mut manager = DataManager::new(
        LabelledSet::empty(2),
        pool_of(30, 2),
        RandomAcquisition::with_seed(5),
    )
    .unwrap();
    let mut model = SoftmaxRegression::new(2, 2);

    for _ in 0..3 {
        manager.acquire(&mut model, 7).unwrap();
        manager.acquire(&mut model, 7).unwrap();
        assert_eq!(manager.n_labelled(), 14);
        manager.reset();
        assert_eq!(manager.n_labelled(), 0);
        assert_eq!(manager.n_unlabelled(), 30);
    }
}

#[test]
fn history_serializes_for_offline_analysis() {
    let trainer = SemiSupervisedTrainer::new(
        SemiSupervisedConfig::default()
            .with_warmup_epochs(2)
            .with_semisupervised_epochs(2)
            .with_batch_size(4),
    )
    .unwrap();
    let lx = Matrix::from_vec(4, 2, vec![0.0, 0.0, 0.1, 0.1, 0.9, 0.9, 1.0, 1.0]).unwrap();
    let labelled = LabelledSet::from_parts(lx, vec![0, 0, 1, 1]).unwrap();
    let mut model = SoftmaxRegression::new(2, 2);
    let mut opt = Sgd::new(0.2);

    let history = trainer
        .fit(&mut model, &mut opt, &labelled, &pool_of(10, 2), None)
        .unwrap();
    let json = history.to_json().unwrap();
    assert!(json.contains("supervised_warmup"));
    assert!(json.contains("semi_supervised"));
}

#[test]
fn augmentation_stripped_for_scoring() {
    // the pool trains with a jitter transform but is scored clean
    let x = Matrix::from_vec(12, 1, (0..12).map(|i| i as f32).collect()).unwrap();
    let base = InMemoryDataset::with_labels(x, (0..12).map(|i| i % 2).collect()).unwrap();
    let augmented = TransformedDataset::new(base)
        .with_augmentation(|v| Vector::from_vec(v.iter().map(|f| f + 100.0).collect()));
    let pool = UnlabelledView::new(augmented).unwrap();

    let mut manager =
        DataManager::new(LabelledSet::empty(1), pool, MaxEntropy::new()).unwrap();
    let mut model = SoftmaxRegression::new(1, 2);

    let round = manager
        .acquire_with(&mut model, 4, TransformedDataset::scoring_variant)
        .unwrap();
    // labelling still flows through the augmented pipeline
    assert!(round.features.as_slice().iter().all(|&f| f >= 100.0));
    assert_eq!(manager.n_unlabelled(), 8);
}

use super::*;
use crate::acquisition::RandomAcquisition;
use crate::data::InMemoryDataset;
use crate::models::SoftmaxRegression;

fn manager(n: usize) -> DataManager<InMemoryDataset, RandomAcquisition> {
    let x = Matrix::from_vec(n, 2, (0..n * 2).map(|i| i as f32).collect()).unwrap();
    let ds = InMemoryDataset::with_labels(x, (0..n).map(|i| i % 3).collect()).unwrap();
    let pool = UnlabelledView::new(ds).unwrap();
    DataManager::new(LabelledSet::empty(2), pool, RandomAcquisition::with_seed(7)).unwrap()
}

#[test]
fn test_acquire_moves_points_across() {
    let mut mgr = manager(30);
    let mut model = SoftmaxRegression::new(2, 3);

    let round = mgr.acquire(&mut model, 10).unwrap();
    assert_eq!(round.indices.len(), 10);
    assert_eq!(round.features.shape(), (10, 2));
    assert_eq!(round.labels.len(), 10);
    assert_eq!(mgr.n_labelled(), 10);
    assert_eq!(mgr.n_unlabelled(), 20);

    // conservation across a second round
    mgr.acquire(&mut model, 5).unwrap();
    assert_eq!(mgr.n_labelled() + mgr.n_unlabelled(), 30);
}

#[test]
fn test_acquired_labels_match_source() {
    let mut mgr = manager(12);
    let mut model = SoftmaxRegression::new(2, 3);
    let round = mgr.acquire(&mut model, 6).unwrap();
    for (abs, &label) in round.indices.iter().zip(round.labels.iter()) {
        assert_eq!(label, abs % 3);
    }
}

#[test]
fn test_pool_exhausted() {
    let mut mgr = manager(8);
    let mut model = SoftmaxRegression::new(2, 3);
    mgr.acquire(&mut model, 6).unwrap();
    let err = mgr.acquire(&mut model, 3).unwrap_err();
    assert!(matches!(
        err,
        AdquirirError::PoolExhausted {
            requested: 3,
            remaining: 2
        }
    ));
    // failed round leaves state untouched
    assert_eq!(mgr.n_labelled(), 6);
    assert_eq!(mgr.n_unlabelled(), 2);
}

#[test]
fn test_rejects_mismatched_feature_dims() {
    let x = Matrix::from_vec(4, 3, vec![0.0; 12]).unwrap();
    let ds = InMemoryDataset::with_labels(x, vec![0; 4]).unwrap();
    let pool = UnlabelledView::new(ds).unwrap();
    let err = DataManager::new(LabelledSet::empty(2), pool, RandomAcquisition::with_seed(1))
        .unwrap_err();
    assert!(matches!(err, AdquirirError::Config { .. }));
}

#[test]
fn test_reset_restores_baseline() {
    let mut mgr = manager(10);
    let mut model = SoftmaxRegression::new(2, 3);
    mgr.acquire(&mut model, 4).unwrap();
    mgr.reset();
    assert_eq!(mgr.n_labelled(), 0);
    assert_eq!(mgr.n_unlabelled(), 10);

    // reset is idempotent
    mgr.reset();
    assert_eq!(mgr.n_unlabelled(), 10);

    // and the full budget is available again
    mgr.acquire(&mut model, 10).unwrap();
    assert_eq!(mgr.n_labelled(), 10);
}

#[test]
fn test_recent_scores_survive_round() {
    let mut mgr = manager(15);
    let mut model = SoftmaxRegression::new(2, 3);
    mgr.acquire(&mut model, 5).unwrap();
    // scores cover the pool as it was at scoring time
    assert_eq!(
        AcquisitionFunction::<SoftmaxRegression>::recent_scores(mgr.acquisition()).len(),
        15
    );
}

#[test]
fn test_acquire_with_scores_transformed_pool() {
    let mut mgr = manager(20);
    let mut model = SoftmaxRegression::new(2, 3);

    // scoring sees zeroed features, labelling still pulls the originals
    let round = mgr
        .acquire_with(&mut model, 4, |ds| {
            let n = ds.len();
            let x = Matrix::from_vec(n, 2, vec![0.0; n * 2]).unwrap();
            InMemoryDataset::with_labels(x, (0..n).map(|i| i % 3).collect()).unwrap()
        })
        .unwrap();
    assert_eq!(round.features.shape(), (4, 2));
    for (abs, &label) in round.indices.iter().zip(round.labels.iter()) {
        assert_eq!(label, abs % 3);
    }
    assert_eq!(mgr.n_unlabelled(), 16);
}

#[test]
fn test_acquired_indices_never_repeat() {
    let mut mgr = manager(25);
    let mut model = SoftmaxRegression::new(2, 3);
    let mut all = Vec::new();
    for _ in 0..5 {
        all.extend(mgr.acquire(&mut model, 5).unwrap().indices);
    }
    all.sort_unstable();
    let before = all.len();
    all.dedup();
    assert_eq!(all.len(), before);
    assert!(all.iter().all(|&i| i < 25));
}

use super::*;
use crate::data::InMemoryDataset;

fn self_labelled(n: usize) -> UnlabelledView<InMemoryDataset> {
    let data: Vec<f32> = (0..n).map(|i| i as f32).collect();
    let x = Matrix::from_vec(n, 1, data).unwrap();
    let labels: Vec<usize> = (0..n).map(|i| i % 3).collect();
    let ds = InMemoryDataset::with_labels(x, labels).unwrap();
    UnlabelledView::new(ds).unwrap()
}

#[test]
fn test_new_requires_labels() {
    let x = Matrix::from_vec(2, 1, vec![0.0, 1.0]).unwrap();
    let ds = InMemoryDataset::new(x);
    assert!(UnlabelledView::new(ds).is_err());
}

#[test]
fn test_get_hides_labels_by_default() {
    let pool = self_labelled(4);
    assert_eq!(pool.get(0).label, None);
    assert_eq!(pool.get(0).features.as_slice(), &[0.0]);
}

#[test]
fn test_label_shrinks_view_and_records_classes() {
    let mut pool = self_labelled(6);
    let (subset, labels) = pool.label(&[0, 2]).unwrap();
    assert_eq!(subset.shape(), (2, 1));
    assert_eq!(labels, vec![0, 2]);
    assert_eq!(pool.len(), 4);
    // logical 0 now resolves to absolute 1
    assert_eq!(pool.get(0).features.as_slice(), &[1.0]);
    assert_eq!(pool.labelled_indices(), vec![0, 2]);
    assert_eq!(pool.labelled_classes(), vec![0, 2]);
}

#[test]
fn test_label_duplicate_request_fails_atomically() {
    let mut pool = self_labelled(5);
    assert!(pool.label(&[1, 1]).is_err());
    assert_eq!(pool.len(), 5);
    assert!(pool.labelled_indices().is_empty());
}

#[test]
fn test_label_stale_index_fails() {
    let mut pool = self_labelled(3);
    pool.label(&[0, 1]).unwrap();
    // only one point remains; logical index 2 is stale
    assert!(pool.label(&[2]).is_err());
    assert_eq!(pool.len(), 1);
}

#[test]
fn test_label_empty_request() {
    let mut pool = self_labelled(3);
    let (subset, labels) = pool.label(&[]).unwrap();
    assert_eq!(subset.n_rows(), 0);
    assert!(labels.is_empty());
    assert_eq!(pool.len(), 3);
}

#[test]
fn test_convert_index_before_label() {
    let mut pool = self_labelled(5);
    pool.label(&[0]).unwrap();
    // logical 0..4 now map to absolute 1..5
    let absolute = pool.convert_index(&[0, 3]).unwrap();
    assert_eq!(absolute, vec![1, 4]);
}

#[test]
fn test_expose_labels_scope() {
    let mut pool = self_labelled(4);
    pool.label(&[0]).unwrap();
    {
        let _scope = pool.expose_labels().unwrap();
        assert_eq!(pool.get(0).label, Some(1));
    }
    assert_eq!(pool.get(0).label, None);
}

#[test]
fn test_expose_labels_nests_correctly() {
    let pool = self_labelled(2);
    let outer = pool.expose_labels().unwrap();
    {
        let _inner = pool.expose_labels().unwrap();
        assert_eq!(pool.get(0).label, Some(0));
    }
    // inner scope must restore the outer scope's value, not clear it
    assert_eq!(pool.get(0).label, Some(0));
    drop(outer);
    assert_eq!(pool.get(0).label, None);
}

#[test]
fn test_external_label_fn() {
    let x = Matrix::from_vec(4, 1, vec![0.0, 1.0, 2.0, 3.0]).unwrap();
    let ds = InMemoryDataset::new(x);
    let mut pool =
        UnlabelledView::with_label_fn(ds, Box::new(|abs, _features| if abs < 2 { 0 } else { 1 }));

    // exposing labels on an externally-labelled pool is a config error
    assert!(pool.expose_labels().is_err());

    let (_, labels) = pool.label(&[0, 3]).unwrap();
    assert_eq!(labels, vec![0, 1]);
    // observed classes are recorded even under an external label fn
    assert_eq!(pool.labelled_classes(), vec![0, 1]);
}

#[test]
fn test_reset_restores_initial_state() {
    let mut pool = self_labelled(5);
    pool.label(&[0, 1, 2]).unwrap();
    pool.reset();
    assert_eq!(pool.len(), 5);
    assert!(pool.labelled_indices().is_empty());
    assert!(pool.labelled_classes().is_empty());
}

#[test]
fn test_features_in_logical_order() {
    let mut pool = self_labelled(4);
    pool.label(&[1]).unwrap(); // remove absolute 1
    let features = pool.features().unwrap();
    assert_eq!(features.shape(), (3, 1));
    assert_eq!(features.as_slice(), &[0.0, 2.0, 3.0]);
}

#[test]
fn test_scoring_view_shares_bookkeeping() {
    let mut pool = self_labelled(4);
    pool.label(&[0]).unwrap();
    let replacement = {
        let x = Matrix::from_vec(4, 1, vec![10.0, 11.0, 12.0, 13.0]).unwrap();
        InMemoryDataset::with_labels(x, vec![0, 0, 0, 0]).unwrap()
    };
    let scoring = pool.scoring_view(replacement).unwrap();
    assert_eq!(scoring.len(), 3);
    assert_eq!(scoring.features().unwrap().as_slice(), &[11.0, 12.0, 13.0]);
}

#[test]
fn test_scoring_view_size_mismatch() {
    let pool = self_labelled(4);
    let x = Matrix::from_vec(3, 1, vec![0.0, 1.0, 2.0]).unwrap();
    let small = InMemoryDataset::with_labels(x, vec![0, 0, 0]).unwrap();
    assert!(pool.scoring_view(small).is_err());
}

#[test]
fn test_conservation_across_labelling() {
    let mut pool = self_labelled(10);
    let n = pool.total();
    pool.label(&[0, 1]).unwrap();
    pool.label(&[3]).unwrap();
    assert_eq!(pool.labelled_indices().len() + pool.len(), n);
}

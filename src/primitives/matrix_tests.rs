use super::*;

#[test]
fn test_from_vec_shape() {
    let m = Matrix::from_vec(2, 2, vec![1.0f32, 2.0, 3.0, 4.0]).unwrap();
    assert_eq!(m.shape(), (2, 2));
    assert_eq!(m.n_rows(), 2);
    assert_eq!(m.n_cols(), 2);
}

#[test]
fn test_from_vec_length_mismatch() {
    let result = Matrix::from_vec(2, 3, vec![1.0f32, 2.0]);
    assert!(result.is_err());
}

#[test]
fn test_get_set() {
    let mut m = Matrix::zeros(3, 2);
    m.set(2, 1, 7.5);
    assert_eq!(m.get(2, 1), 7.5);
    assert_eq!(m.get(0, 0), 0.0);
}

#[test]
fn test_row_access() {
    let m = Matrix::from_vec(2, 3, vec![1.0f32, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap();
    assert_eq!(m.row_slice(1), &[4.0, 5.0, 6.0]);
    assert_eq!(m.row(0).as_slice(), &[1.0, 2.0, 3.0]);
}

#[test]
fn test_from_rows() {
    let rows = vec![
        Vector::from_slice(&[1.0f32, 2.0]),
        Vector::from_slice(&[3.0, 4.0]),
        Vector::from_slice(&[5.0, 6.0]),
    ];
    let m = Matrix::from_rows(&rows).unwrap();
    assert_eq!(m.shape(), (3, 2));
    assert_eq!(m.get(2, 0), 5.0);
}

#[test]
fn test_from_rows_ragged() {
    let rows = vec![
        Vector::from_slice(&[1.0f32, 2.0]),
        Vector::from_slice(&[3.0]),
    ];
    assert!(Matrix::from_rows(&rows).is_err());
}

#[test]
fn test_from_rows_empty() {
    let rows: Vec<Vector<f32>> = vec![];
    assert!(Matrix::from_rows(&rows).is_err());
}

use flux_core::{IntoPointBatch, PointBatch};
use ndarray::{arr1, arr2, Array1, Array2, Array3};

#[test]
fn bare_point_has_empty_prefix() {
    let batch = [0.5, 1.0, 2.0].to_point_batch().expect("batch");
    assert_eq!(batch.len(), 1);
    assert!(batch.prefix_shape().is_empty());
    let out = batch.shape_values(arr1(&[7.0])).expect("shape");
    assert_eq!(out.ndim(), 0);
    assert_eq!(out.iter().copied().collect::<Vec<_>>(), vec![7.0]);
}

#[test]
fn rows_and_tuples_agree() {
    let rows = vec![[0.0, 0.1, 0.2], [1.0, 1.1, 1.2]];
    let from_rows = rows.to_point_batch().expect("rows");
    let from_flat = vec![0.0, 0.1, 0.2, 1.0, 1.1, 1.2]
        .to_point_batch()
        .expect("flat");
    let from_array = arr2(&[[0.0, 0.1, 0.2], [1.0, 1.1, 1.2]])
        .to_point_batch()
        .expect("array");
    assert_eq!(from_rows, from_flat);
    assert_eq!(from_rows, from_array);
    assert_eq!(from_rows.prefix_shape(), &[2]);
    assert_eq!(from_rows.s_values().to_vec(), vec![0.0, 1.0]);

    let tuple = (0.25, 0.0, 0.0).to_point_batch().expect("tuple");
    assert_eq!(tuple, PointBatch::single(0.25, 0.0, 0.0));
}

#[test]
fn nested_batches_keep_their_prefix() {
    let grid = Array3::<f64>::zeros((2, 4, 3));
    let batch = grid.to_point_batch().expect("batch");
    assert_eq!(batch.len(), 8);
    assert_eq!(batch.prefix_shape(), &[2, 4]);
    let out = batch.shape_values(Array1::zeros(8)).expect("values");
    assert_eq!(out.shape(), &[2, 4]);
    let stacked = batch.shape_components(Array2::zeros((8, 2))).expect("components");
    assert_eq!(stacked.shape(), &[2, 4, 2]);
}

#[test]
fn single_row_batches_squeeze_components() {
    let batch = [[0.0, 0.0, 0.0]].to_point_batch().expect("batch");
    assert_eq!(batch.prefix_shape(), &[1]);
    let stacked = batch.shape_components(Array2::zeros((1, 2))).expect("components");
    assert_eq!(stacked.shape(), &[2]);
}

#[test]
fn wrong_width_is_rejected() {
    let err = Array2::<f64>::zeros((3, 2)).to_point_batch().unwrap_err();
    assert_eq!(err.code(), "point-width");
    assert_eq!(err.info().context["shape"], "[3, 2]");

    let err = vec![0.0, 1.0].to_point_batch().unwrap_err();
    assert_eq!(err.code(), "point-width");
}

#[test]
fn transposed_views_are_read_in_logical_order() {
    let storage = arr2(&[[0.0, 1.0], [0.5, 2.0], [0.75, 3.0]]);
    let batch = storage.t().to_point_batch().expect("batch");
    assert_eq!(batch.points().row(0).to_vec(), vec![0.0, 0.5, 0.75]);
    assert_eq!(batch.points().row(1).to_vec(), vec![1.0, 2.0, 3.0]);
}

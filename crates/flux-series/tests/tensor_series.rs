use flux_series::{Fourier, FourierTerm, PointBatch, SeriesError, TensorSeries, TermKind};
use ndarray::{arr2, Array3};

fn surface_stack() -> TensorSeries {
    // Two poloidal rows, three radial slices, ntor = 1.
    let r = Array3::from_shape_fn((3, 2, 3), |(i, m, n)| (10 * i + 3 * m + n) as f64 + 1.0);
    let z = Array3::from_shape_fn((3, 2, 3), |(i, m, n)| 0.1 * (i + m + n) as f64);
    TensorSeries::new(vec![
        Fourier::from_cos(FourierTerm::cos(r, 5).unwrap()).unwrap(),
        Fourier::from_sin(FourierTerm::sin(z, 5).unwrap()).unwrap(),
    ])
    .unwrap()
}

#[test]
fn empty_tensor_is_rejected() {
    let err = TensorSeries::new(Vec::new()).unwrap_err();
    assert!(matches!(err, SeriesError::EmptyTerm(_)));
    assert_eq!(err.code(), "empty-tensor");
}

#[test]
fn components_are_kept_in_order() {
    let tensor = surface_stack();
    assert_eq!(tensor.ndim(), 2);
    assert!(tensor.component(0).unwrap().cos().is_some());
    assert!(tensor.component(1).unwrap().sin().is_some());
    assert!(tensor.component(2).is_none());
    assert_eq!(tensor.num_radial_locations(), 3);
    assert_eq!(tensor.num_field_periods(), 5);
}

#[test]
fn nested_batches_keep_their_prefix() {
    let tensor = surface_stack();
    let points = Array3::from_shape_fn((2, 4, 3), |(i, j, k)| match k {
        0 => 0.25 * i as f64,
        1 => 0.1 * j as f64,
        _ => 0.05,
    });
    let values = tensor.evaluate(&points).unwrap();
    assert_eq!(values.shape(), &[2, 4, 2]);

    let flat = tensor
        .evaluate_batch(&PointBatch::from_array(&points).unwrap(), &Default::default())
        .unwrap();
    assert_eq!(values[[1, 3, 0]], flat[[7, 0]]);
    assert_eq!(values[[0, 2, 1]], flat[[2, 1]]);
}

#[test]
fn single_row_batch_drops_batch_axis() {
    let tensor = surface_stack();
    let values = tensor.evaluate(&arr2(&[[0.5, 0.2, 0.1]])).unwrap();
    assert_eq!(values.shape(), &[2]);
    let point = tensor.evaluate_point(0.5, 0.2, 0.1).unwrap();
    assert_eq!(point.to_vec(), values.iter().copied().collect::<Vec<_>>());
}

#[test]
fn magnetic_axis_keeps_axisymmetric_row_of_first_slice() {
    let axis = surface_stack().magnetic_axis();
    let r = axis.component(0).unwrap().cos().unwrap();
    assert_eq!(r.shape(), [1, 1, 3]);
    assert_eq!(r.axis_coefficients(), vec![2.0, 3.0]);
    assert_eq!(r.mode(0, 0, -1), Some(1.0));
}

#[test]
fn lcfs_keeps_last_slice() {
    let lcfs = surface_stack().lcfs();
    let r = lcfs.component(0).unwrap().cos().unwrap();
    assert_eq!(r.shape(), [1, 2, 3]);
    assert_eq!(r.mode(0, 1, 1), Some(26.0));
    let z = lcfs.component(1).unwrap().sin().unwrap();
    assert_eq!(z.kind(), TermKind::Sin);
}

#[test]
fn structural_copies_reach_every_component() {
    let mut tensor = surface_stack();
    let cut = tensor.truncated(Some(0), Some(0));
    assert_eq!(cut.component(1).unwrap().sin().unwrap().shape(), [3, 1, 1]);

    let inner = tensor.radial_slice(0..2).unwrap();
    assert_eq!(inner.num_radial_locations(), 2);

    tensor.set_null();
    for component in tensor.components() {
        let term = component.cos().or(component.sin()).unwrap();
        assert_eq!(term.mode(1, 0, -1), Some(0.0));
    }
}

#[test]
fn component_errors_propagate() {
    let err = surface_stack().evaluate(&[1.5, 0.0, 0.0]).unwrap_err();
    assert_eq!(err.code(), "s-out-of-range");
}

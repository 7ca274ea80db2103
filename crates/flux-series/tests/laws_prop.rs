use std::f64::consts::TAU;

use flux_series::{reshape_coefficients, CoefficientLayout, FourierTerm, TermKind};
use ndarray::{Array1, Array2, Array3};
use proptest::prelude::*;

fn build(kind: TermKind, shape: (usize, usize, usize), pool: &[f64], nfp: u32) -> FourierTerm {
    let (ns, mpol, ntor) = shape;
    let dims = (ns, mpol + 1, 2 * ntor + 1);
    let count = dims.0 * dims.1 * dims.2;
    let coefficients = Array3::from_shape_vec(dims, pool[..count].to_vec()).unwrap();
    FourierTerm::new(kind, coefficients, nfp).unwrap()
}

fn layout_strategy() -> impl Strategy<Value = CoefficientLayout> {
    prop_oneof![
        Just(CoefficientLayout::Full),
        Just(CoefficientLayout::VmecHalf),
        Just(CoefficientLayout::NonNegative),
    ]
}

fn kind_strategy() -> impl Strategy<Value = TermKind> {
    prop_oneof![Just(TermKind::Cos), Just(TermKind::Sin)]
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() <= 1e-9 * (1.0 + a.abs().max(b.abs()))
}

proptest! {
    #[test]
    fn every_layout_reshapes_to_dense_modes(
        layout in layout_strategy(),
        shape in (1usize..5, 0usize..4, 0usize..4),
    ) {
        let (ns, mpol, ntor) = shape;
        let len = layout.slice_len(mpol, ntor);
        let rows = Array2::from_shape_fn((ns, len), |(i, j)| (i * len + j + 1) as f64);
        let (tensor, _) = reshape_coefficients(rows.view().into_dyn(), mpol, ntor).unwrap();
        prop_assert_eq!(tensor.shape(), &[ns, mpol + 1, 2 * ntor + 1]);
        // Every stored value lands somewhere and padding stays zero.
        prop_assert_eq!(tensor.iter().filter(|&&v| v != 0.0).count(), ns * len);
        prop_assert_eq!(tensor.sum(), rows.sum());

        let flat = Array1::from_iter(rows.iter().copied());
        match reshape_coefficients(flat.view().into_dyn(), mpol, ntor) {
            Ok((dense, _)) => {
                prop_assert_eq!(&dense.shape()[1..], &[mpol + 1, 2 * ntor + 1]);
            }
            Err(err) => prop_assert_eq!(err.code(), "ambiguous-radial-count"),
        }
    }

    #[test]
    fn evaluation_is_linear_in_coefficients(
        kind in kind_strategy(),
        shape in (1usize..4, 0usize..3, 0usize..3),
        left in proptest::collection::vec(-1.0f64..1.0, 64),
        right in proptest::collection::vec(-1.0f64..1.0, 64),
        nfp in 1u32..6,
        point in (0.0f64..=1.0, -TAU..TAU, -TAU..TAU),
    ) {
        let sum: Vec<f64> = left.iter().zip(&right).map(|(a, b)| a + b).collect();
        let a = build(kind, shape, &left, nfp).evaluate_point(point.0, point.1, point.2).unwrap();
        let b = build(kind, shape, &right, nfp).evaluate_point(point.0, point.1, point.2).unwrap();
        let ab = build(kind, shape, &sum, nfp).evaluate_point(point.0, point.1, point.2).unwrap();
        prop_assert!(close(ab, a + b), "{ab} != {a} + {b}");
    }

    #[test]
    fn angles_are_periodic(
        kind in kind_strategy(),
        shape in (1usize..4, 0usize..3, 0usize..3),
        pool in proptest::collection::vec(-1.0f64..1.0, 64),
        nfp in 1u32..6,
        point in (0.0f64..=1.0, -TAU..TAU, -TAU..TAU),
    ) {
        let term = build(kind, shape, &pool, nfp);
        let (s, theta, phi) = point;
        let base = term.evaluate_point(s, theta, phi).unwrap();
        let poloidal = term.evaluate_point(s, theta + TAU, phi).unwrap();
        let toroidal = term.evaluate_point(s, theta, phi + TAU / f64::from(nfp)).unwrap();
        prop_assert!(close(base, poloidal));
        prop_assert!(close(base, toroidal));
    }

    #[test]
    fn kernel_parity_under_angle_reflection(
        kind in kind_strategy(),
        shape in (1usize..4, 0usize..3, 0usize..3),
        pool in proptest::collection::vec(-1.0f64..1.0, 64),
        nfp in 1u32..6,
        point in (0.0f64..=1.0, -TAU..TAU, -TAU..TAU),
    ) {
        let term = build(kind, shape, &pool, nfp);
        let (s, theta, phi) = point;
        let forward = term.evaluate_point(s, theta, phi).unwrap();
        let mirrored = term.evaluate_point(s, -theta, -phi).unwrap();
        match kind {
            TermKind::Cos => prop_assert!(close(forward, mirrored)),
            TermKind::Sin => prop_assert!(close(forward, -mirrored)),
        }
    }

    #[test]
    fn truncation_never_grows_and_full_bounds_are_identity(
        shape in (1usize..4, 0usize..3, 0usize..3),
        pool in proptest::collection::vec(-1.0f64..1.0, 64),
        bounds in (0usize..5, 0usize..5),
    ) {
        let term = build(TermKind::Cos, shape, &pool, 3);
        let cut = term.truncated(Some(bounds.0), Some(bounds.1));
        prop_assert!(cut.mpol() <= term.mpol());
        prop_assert!(cut.ntor() <= term.ntor());
        prop_assert_eq!(cut.mpol(), bounds.0.min(term.mpol()));
        prop_assert_eq!(cut.mode(0, 0, 0), term.mode(0, 0, 0));
        prop_assert_eq!(term.truncated(None, None), term);
    }

    #[test]
    fn nulling_is_idempotent(
        kind in kind_strategy(),
        shape in (1usize..4, 0usize..3, 0usize..3),
        pool in proptest::collection::vec(-1.0f64..1.0, 64),
    ) {
        let mut once = build(kind, shape, &pool, 2);
        once.set_null();
        let mut twice = once.clone();
        twice.set_null();
        prop_assert_eq!(&once, &twice);
        let ntor = once.ntor() as i64;
        for n in 1..=ntor {
            prop_assert_eq!(once.mode(0, 0, -n), Some(0.0));
        }
    }
}

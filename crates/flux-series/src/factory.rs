//! Reshaping of flat or per-slice coefficient payloads into `(NS, MPOL+1, 2·NTOR+1)` tensors.

use flux_core::errors::{ErrorInfo, SeriesError, SeriesResult};
use ndarray::{Array3, ArrayViewD};
use serde::{Deserialize, Serialize};

/// Per-slice layouts accepted by [`reshape_coefficients`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CoefficientLayout {
    /// Every poloidal row carries all `2·NTOR+1` toroidal modes.
    Full,
    /// VMEC ordering: the `m = 0` row holds only `n >= 0`, the others are full.
    VmecHalf,
    /// Every poloidal row holds only its `n >= 0` modes.
    NonNegative,
}

impl CoefficientLayout {
    const PROBE_ORDER: [CoefficientLayout; 3] = [
        CoefficientLayout::Full,
        CoefficientLayout::VmecHalf,
        CoefficientLayout::NonNegative,
    ];

    /// Number of stored values per radial slice under this layout.
    pub fn slice_len(self, mpol: usize, ntor: usize) -> usize {
        let rows = mpol + 1;
        match self {
            CoefficientLayout::Full => rows * (2 * ntor + 1),
            CoefficientLayout::VmecHalf => rows * (2 * ntor + 1) - ntor,
            CoefficientLayout::NonNegative => rows * (ntor + 1),
        }
    }

    fn label(self) -> &'static str {
        match self {
            CoefficientLayout::Full => "full",
            CoefficientLayout::VmecHalf => "vmec-half",
            CoefficientLayout::NonNegative => "non-negative",
        }
    }

    fn detect(slice_len: usize, mpol: usize, ntor: usize) -> Option<Self> {
        Self::PROBE_ORDER
            .into_iter()
            .find(|layout| layout.slice_len(mpol, ntor) == slice_len)
    }

    fn scatter(self, slice: &[f64], mpol: usize, ntor: usize, target: &mut [f64]) {
        let width = 2 * ntor + 1;
        match self {
            CoefficientLayout::Full => target.copy_from_slice(slice),
            CoefficientLayout::VmecHalf => {
                let (head, tail) = slice.split_at(ntor + 1);
                target[ntor..width].copy_from_slice(head);
                target[width..].copy_from_slice(tail);
            }
            CoefficientLayout::NonNegative => {
                for (m, row) in slice.chunks_exact(ntor + 1).enumerate().take(mpol + 1) {
                    let start = m * width + ntor;
                    target[start..start + ntor + 1].copy_from_slice(row);
                }
            }
        }
    }
}

/// Picks the single radial count a flat payload allows. Layouts with equal
/// slice lengths read the values identically and count once.
fn flat_reading(
    total: usize,
    mpol: usize,
    ntor: usize,
) -> SeriesResult<(usize, CoefficientLayout)> {
    let mut readings: Vec<(usize, CoefficientLayout)> = Vec::new();
    for layout in CoefficientLayout::PROBE_ORDER {
        let len = layout.slice_len(mpol, ntor);
        if total % len != 0 || readings.iter().any(|&(ns, _)| ns == total / len) {
            continue;
        }
        readings.push((total / len, layout));
    }
    match readings.as_slice() {
        [reading] => Ok(*reading),
        [] => Err(SeriesError::Shape(
            ErrorInfo::new(
                "ambiguous-radial-count",
                "flat coefficient length is not a whole number of radial slices",
            )
            .with_context("len", total)
            .with_context("mpol", mpol)
            .with_context("ntor", ntor)
            .with_hint("pass one row per radial slice"),
        )),
        _ => {
            let candidates = readings
                .iter()
                .map(|(ns, layout)| format!("{}:{ns}", layout.label()))
                .collect::<Vec<_>>()
                .join(", ");
            Err(SeriesError::Shape(
                ErrorInfo::new(
                    "ambiguous-radial-count",
                    "flat coefficient length fits several layouts with different radial counts",
                )
                .with_context("len", total)
                .with_context("mpol", mpol)
                .with_context("ntor", ntor)
                .with_context("candidates", candidates)
                .with_hint("pass one row per radial slice"),
            ))
        }
    }
}

/// Reshapes a coefficient payload for the given mode bounds.
///
/// Rank-3 payloads must already match `(_, MPOL+1, 2·NTOR+1)`. Rank-2 payloads
/// hold one radial slice per row. Rank-1 payloads are split into equal slices,
/// the radial count must divide the total length exactly, and layouts that
/// imply different radial counts make the payload ambiguous.
pub fn reshape_coefficients(
    payload: ArrayViewD<'_, f64>,
    mpol: usize,
    ntor: usize,
) -> SeriesResult<(Array3<f64>, CoefficientLayout)> {
    let shape = payload.shape().to_vec();
    let expected = [mpol + 1, 2 * ntor + 1];
    if payload.is_empty() {
        return Err(SeriesError::Shape(
            ErrorInfo::new("empty-coefficients", "coefficient arrays must be non-empty")
                .with_shape("shape", &shape),
        ));
    }

    let (num_slices, layout) = match shape.as_slice() {
        [ns, rows, cols] => {
            if [*rows, *cols] != expected {
                return Err(SeriesError::Shape(
                    ErrorInfo::new(
                        "mode-shape-mismatch",
                        "coefficient shape does not match mpol and ntor",
                    )
                    .with_shape("shape", &shape)
                    .with_shape("expected", &[*ns, expected[0], expected[1]]),
                ));
            }
            (*ns, CoefficientLayout::Full)
        }
        [ns, slice_len] => {
            let layout = CoefficientLayout::detect(*slice_len, mpol, ntor).ok_or_else(|| {
                SeriesError::Shape(
                    ErrorInfo::new(
                        "unknown-layout",
                        "row length matches no known per-slice layout",
                    )
                    .with_shape("shape", &shape)
                    .with_context("mpol", mpol)
                    .with_context("ntor", ntor),
                )
            })?;
            (*ns, layout)
        }
        [total] => flat_reading(*total, mpol, ntor)?,
        _ => {
            return Err(SeriesError::Shape(
                ErrorInfo::new("invalid-rank", "coefficients must have rank 1, 2 or 3")
                    .with_shape("shape", &shape),
            ))
        }
    };

    let values: Vec<f64> = payload.iter().copied().collect();
    let stored = layout.slice_len(mpol, ntor);
    let full = CoefficientLayout::Full.slice_len(mpol, ntor);
    let mut dense = vec![0.0; num_slices * full];
    for (slice, target) in values.chunks_exact(stored).zip(dense.chunks_exact_mut(full)) {
        layout.scatter(slice, mpol, ntor, target);
    }
    tracing::debug!(?layout, num_slices, mpol, ntor, "reshaped coefficient payload");

    let tensor = Array3::from_shape_vec((num_slices, expected[0], expected[1]), dense).map_err(
        |err| {
            SeriesError::Shape(
                ErrorInfo::new("reshape-failed", err.to_string()).with_shape("shape", &shape),
            )
        },
    )?;
    Ok((tensor, layout))
}

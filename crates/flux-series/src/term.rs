//! Single trigonometric double sums on flux surfaces.

use std::ops::Range;

use flux_core::errors::{ErrorInfo, SeriesError, SeriesResult};
use flux_core::{EvalOptions, IntoPointBatch, LinspaceSpec, PointBatch};
use ndarray::{s, Array1, Array2, Array3, ArrayD, ArrayView1, ArrayView2, ArrayViewD, Axis};
use serde::{Deserialize, Serialize};

use crate::factory::reshape_coefficients;
use crate::grid::{Linspace, SampleGrid};
use crate::interp::RadialGrid;

/// Trigonometric kernel of a term.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TermKind {
    /// `sum C_mn cos(m theta - nfp n phi)`.
    Cos,
    /// `sum C_mn sin(m theta - nfp n phi)`.
    Sin,
}

impl TermKind {
    /// Applies the kernel to a phase angle.
    #[inline]
    pub fn kernel(self, angle: f64) -> f64 {
        match self {
            TermKind::Cos => angle.cos(),
            TermKind::Sin => angle.sin(),
        }
    }

    /// Lowercase label used in diagnostics.
    pub fn label(self) -> &'static str {
        match self {
            TermKind::Cos => "cos",
            TermKind::Sin => "sin",
        }
    }
}

/// Cosine or sine double Fourier sum with radially sampled coefficients.
///
/// Coefficients are stored densely as `(NS, MPOL+1, 2·NTOR+1)`; the last axis
/// runs over toroidal modes `-NTOR..=NTOR` and radial slice `i` sits at
/// `s = i / (NS - 1)`.
///
/// ```
/// use flux_series::FourierTerm;
/// use ndarray::arr3;
///
/// let axis = FourierTerm::cos(arr3(&[[[0.0, 5.5, 0.1]]]), 5).unwrap();
/// assert!((axis.evaluate_point(0.0, 0.0, 0.0).unwrap() - 5.6).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "TermRepr")]
pub struct FourierTerm {
    kind: TermKind,
    coefficients: Array3<f64>,
    num_field_periods: u32,
}

#[derive(Deserialize)]
struct TermRepr {
    kind: TermKind,
    coefficients: Array3<f64>,
    num_field_periods: u32,
}

impl TryFrom<TermRepr> for FourierTerm {
    type Error = SeriesError;

    fn try_from(repr: TermRepr) -> SeriesResult<Self> {
        FourierTerm::new(repr.kind, repr.coefficients, repr.num_field_periods)
    }
}

pub(crate) fn check_field_periods(num_field_periods: u32) -> SeriesResult<()> {
    if num_field_periods == 0 {
        return Err(SeriesError::FieldPeriods(
            ErrorInfo::new("zero-field-periods", "the number of field periods must be at least 1")
                .with_context("num_field_periods", num_field_periods),
        ));
    }
    Ok(())
}

fn validate_coefficients(coefficients: &Array3<f64>) -> SeriesResult<()> {
    let shape = coefficients.shape();
    if shape.iter().any(|&len| len == 0) {
        return Err(SeriesError::Shape(
            ErrorInfo::new("empty-coefficients", "every coefficient axis must be non-empty")
                .with_shape("shape", shape),
        ));
    }
    if shape[2] % 2 == 0 {
        return Err(SeriesError::Shape(
            ErrorInfo::new(
                "odd-toroidal-axis",
                "the toroidal axis must hold an odd number of modes",
            )
            .with_shape("shape", shape),
        ));
    }
    Ok(())
}

impl FourierTerm {
    /// Wraps an already shaped coefficient tensor. No entries are zeroed.
    pub fn new(
        kind: TermKind,
        coefficients: Array3<f64>,
        num_field_periods: u32,
    ) -> SeriesResult<Self> {
        validate_coefficients(&coefficients)?;
        check_field_periods(num_field_periods)?;
        Ok(Self {
            kind,
            coefficients,
            num_field_periods,
        })
    }

    /// Cosine term from a shaped tensor.
    pub fn cos(coefficients: Array3<f64>, num_field_periods: u32) -> SeriesResult<Self> {
        Self::new(TermKind::Cos, coefficients, num_field_periods)
    }

    /// Sine term from a shaped tensor.
    pub fn sin(coefficients: Array3<f64>, num_field_periods: u32) -> SeriesResult<Self> {
        Self::new(TermKind::Sin, coefficients, num_field_periods)
    }

    /// Builds a term from a rank 1, 2 or 3 payload for the given mode bounds.
    ///
    /// See [`reshape_coefficients`] for the accepted layouts.
    pub fn from_coefficients(
        kind: TermKind,
        payload: ArrayViewD<'_, f64>,
        mpol: usize,
        ntor: usize,
        num_field_periods: u32,
    ) -> SeriesResult<Self> {
        let (coefficients, _) = reshape_coefficients(payload, mpol, ntor)?;
        Self::new(kind, coefficients, num_field_periods)
    }

    /// Builds a term from a flat coefficient list.
    pub fn from_flat(
        kind: TermKind,
        values: &[f64],
        mpol: usize,
        ntor: usize,
        num_field_periods: u32,
    ) -> SeriesResult<Self> {
        let view = ArrayView1::from(values).into_dyn();
        Self::from_coefficients(kind, view, mpol, ntor, num_field_periods)
    }

    /// Builds a term from one coefficient row per radial slice.
    pub fn from_rows(
        kind: TermKind,
        rows: &[Vec<f64>],
        mpol: usize,
        ntor: usize,
        num_field_periods: u32,
    ) -> SeriesResult<Self> {
        let width = rows.first().map(Vec::len).unwrap_or(0);
        if let Some(bad) = rows.iter().position(|row| row.len() != width) {
            return Err(SeriesError::Shape(
                ErrorInfo::new("ragged-rows", "every radial row must have the same length")
                    .with_context("row", bad)
                    .with_context("expected", width)
                    .with_context("found", rows[bad].len()),
            ));
        }
        let flat: Vec<f64> = rows.iter().flatten().copied().collect();
        let payload = Array2::from_shape_vec((rows.len(), width), flat).map_err(|err| {
            SeriesError::Shape(ErrorInfo::new("ragged-rows", err.to_string()))
        })?;
        Self::from_coefficients(kind, payload.view().into_dyn(), mpol, ntor, num_field_periods)
    }

    /// Kernel of the term.
    pub fn kind(&self) -> TermKind {
        self.kind
    }

    /// Dense coefficient tensor.
    pub fn coefficients(&self) -> &Array3<f64> {
        &self.coefficients
    }

    /// Number of toroidal field periods.
    pub fn num_field_periods(&self) -> u32 {
        self.num_field_periods
    }

    /// `(NS, MPOL+1, 2·NTOR+1)`.
    pub fn shape(&self) -> [usize; 3] {
        let (ns, rows, cols) = self.coefficients.dim();
        [ns, rows, cols]
    }

    /// Number of stored radial slices.
    pub fn num_radial_locations(&self) -> usize {
        self.coefficients.len_of(Axis(0))
    }

    /// Highest poloidal mode number.
    pub fn mpol(&self) -> usize {
        self.coefficients.len_of(Axis(1)) - 1
    }

    /// Highest toroidal mode number.
    pub fn ntor(&self) -> usize {
        (self.coefficients.len_of(Axis(2)) - 1) / 2
    }

    /// Poloidal mode numbers `0..=MPOL`.
    pub fn poloidal_modes(&self) -> Vec<usize> {
        (0..=self.mpol()).collect()
    }

    /// Toroidal mode numbers `-NTOR..=NTOR`.
    pub fn toroidal_modes(&self) -> Vec<i64> {
        let ntor = self.ntor() as i64;
        (-ntor..=ntor).collect()
    }

    /// Coefficient of mode `(m, n)` on radial slice `radial_index`.
    pub fn mode(&self, radial_index: usize, m: usize, n: i64) -> Option<f64> {
        let column = usize::try_from(n.checked_add(self.ntor() as i64)?).ok()?;
        self.coefficients.get([radial_index, m, column]).copied()
    }

    /// `m = 0, n >= 0` coefficients of the first slice, as used for magnetic
    /// axis inputs.
    pub fn axis_coefficients(&self) -> Vec<f64> {
        let ntor = self.ntor();
        self.coefficients.slice(s![0, 0, ntor..]).to_vec()
    }

    /// Zeroes every `m = 0, n < 0` coefficient on all slices.
    pub fn set_null(&mut self) {
        let ntor = self.ntor();
        if ntor > 0 {
            self.coefficients.slice_mut(s![.., 0, ..ntor]).fill(0.0);
            tracing::trace!(kind = self.kind.label(), ntor, "zeroed m=0, n<0 coefficients");
        }
    }

    /// Copy limited to `mpol` and `ntor`, each clamped to the stored bounds.
    pub fn truncated(&self, mpol: Option<usize>, ntor: Option<usize>) -> Self {
        let mpol = mpol.map_or(self.mpol(), |m| m.min(self.mpol()));
        let ntor_stored = self.ntor();
        let ntor = ntor.map_or(ntor_stored, |n| n.min(ntor_stored));
        tracing::trace!(mpol, ntor, ntor_stored, "truncating term");
        let columns = ntor_stored - ntor..ntor_stored + ntor + 1;
        Self {
            kind: self.kind,
            coefficients: self.coefficients.slice(s![.., ..=mpol, columns]).to_owned(),
            num_field_periods: self.num_field_periods,
        }
    }

    /// Copy holding only the radial slices in `range`.
    pub fn radial_slice(&self, range: Range<usize>) -> SeriesResult<Self> {
        let ns = self.num_radial_locations();
        if range.start >= range.end || range.end > ns {
            return Err(SeriesError::Shape(
                ErrorInfo::new("radial-range", "radial slice range is empty or out of bounds")
                    .with_context("start", range.start)
                    .with_context("end", range.end)
                    .with_context("num_radial_locations", ns),
            ));
        }
        Ok(Self {
            kind: self.kind,
            coefficients: self.coefficients.slice(s![range, .., ..]).to_owned(),
            num_field_periods: self.num_field_periods,
        })
    }

    /// Copy holding the innermost slice only.
    pub fn axis(&self) -> Self {
        Self {
            kind: self.kind,
            coefficients: self.coefficients.slice(s![..1, .., ..]).to_owned(),
            num_field_periods: self.num_field_periods,
        }
    }

    /// Copy holding the outermost slice only.
    pub fn boundary(&self) -> Self {
        let last = self.num_radial_locations() - 1;
        Self {
            kind: self.kind,
            coefficients: self.coefficients.slice(s![last.., .., ..]).to_owned(),
            num_field_periods: self.num_field_periods,
        }
    }

    /// Evaluates at one `(s, theta, phi)` point with default options.
    pub fn evaluate_point(&self, s: f64, theta: f64, phi: f64) -> SeriesResult<f64> {
        let batch = PointBatch::single(s, theta, phi);
        let values = self.evaluate_batch(&batch, &EvalOptions::default())?;
        Ok(values[0])
    }

    /// Evaluates at every point of the payload with default options.
    pub fn evaluate<P>(&self, points: &P) -> SeriesResult<ArrayD<f64>>
    where
        P: IntoPointBatch + ?Sized,
    {
        self.evaluate_with(points, &EvalOptions::default())
    }

    /// Evaluates at every point of the payload; the result has the payload's
    /// prefix shape.
    pub fn evaluate_with<P>(&self, points: &P, opts: &EvalOptions) -> SeriesResult<ArrayD<f64>>
    where
        P: IntoPointBatch + ?Sized,
    {
        let batch = points.to_point_batch()?;
        let values = self.evaluate_batch(&batch, opts)?;
        batch.shape_values(values)
    }

    /// Evaluates a flat batch, one value per point.
    pub fn evaluate_batch(
        &self,
        batch: &PointBatch,
        opts: &EvalOptions,
    ) -> SeriesResult<Array1<f64>> {
        let opts = opts.validated()?;
        let grid = RadialGrid::new(self.num_radial_locations());
        let points = batch.points();
        let weights = points
            .column(0)
            .iter()
            .enumerate()
            .map(|(idx, &s)| grid.locate(s, idx, opts))
            .collect::<SeriesResult<Vec<_>>>()?;

        let (_, rows, cols) = self.coefficients.dim();
        let mut slice = Array2::zeros((rows, cols));
        let mut values = Array1::zeros(batch.len());
        for ((value, point), weight) in values.iter_mut().zip(points.rows()).zip(&weights) {
            weight.blend_into(self.coefficients.view(), &mut slice);
            *value = self.angular_sum(slice.view(), point[1], point[2]);
        }
        Ok(values)
    }

    fn angular_sum(&self, slice: ArrayView2<'_, f64>, theta: f64, phi: f64) -> f64 {
        let ntor = self.ntor() as i64;
        let nfp = f64::from(self.num_field_periods);
        let mut total = 0.0;
        for (m, row) in slice.rows().into_iter().enumerate() {
            let poloidal = m as f64 * theta;
            for (column, &coefficient) in row.iter().enumerate() {
                let n = (column as i64 - ntor) as f64;
                total += coefficient * self.kind.kernel(poloidal - nfp * n * phi);
            }
        }
        total
    }

    /// Samples the term on a regular `(s, theta, phi)` grid.
    pub fn linspace(&self, spec: &LinspaceSpec, opts: &EvalOptions) -> SeriesResult<Linspace> {
        let grid = SampleGrid::build(spec, self.num_radial_locations(), self.num_field_periods)?;
        let values = self.evaluate_batch(&grid.points(), opts)?;
        Ok(grid.into_linspace(values))
    }
}

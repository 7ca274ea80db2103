//! Vector-valued stacks of Fourier series, such as cylindrical `(R, Z)` surfaces.

use std::ops::Range;

use flux_core::errors::{ErrorInfo, SeriesError, SeriesResult};
use flux_core::{EvalOptions, IntoPointBatch, LinspaceSpec, PointBatch};
use ndarray::{Array1, Array2, ArrayD, Axis};
use serde::{Deserialize, Serialize};

use crate::fourier::Fourier;
use crate::grid::{SampleGrid, TensorLinspace};

/// Ordered components, each an independent [`Fourier`] series.
///
/// Evaluation stacks component values on a trailing axis. Field periods are
/// not forced to agree across components.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "TensorRepr")]
pub struct TensorSeries {
    components: Vec<Fourier>,
}

#[derive(Deserialize)]
struct TensorRepr {
    components: Vec<Fourier>,
}

impl TryFrom<TensorRepr> for TensorSeries {
    type Error = SeriesError;

    fn try_from(repr: TensorRepr) -> SeriesResult<Self> {
        TensorSeries::new(repr.components)
    }
}

impl TensorSeries {
    /// Stacks the given components in order.
    pub fn new(components: Vec<Fourier>) -> SeriesResult<Self> {
        let Some(first) = components.first() else {
            return Err(SeriesError::EmptyTerm(
                ErrorInfo::new("empty-tensor", "a tensor series needs at least one component")
                    .with_hint("pass one Fourier series per output component"),
            ));
        };
        let nfp = first.num_field_periods();
        if let Some(other) = components.iter().find(|c| c.num_field_periods() != nfp) {
            tracing::warn!(
                first = nfp,
                other = other.num_field_periods(),
                "tensor series components disagree on field periods"
            );
        }
        Ok(Self { components })
    }

    /// Number of components.
    pub fn ndim(&self) -> usize {
        self.components.len()
    }

    /// Components in order.
    pub fn components(&self) -> &[Fourier] {
        &self.components
    }

    /// Component `index`, if present.
    pub fn component(&self, index: usize) -> Option<&Fourier> {
        self.components.get(index)
    }

    /// Field periods of the first component.
    pub fn num_field_periods(&self) -> u32 {
        self.components[0].num_field_periods()
    }

    /// Largest radial resolution among the components.
    pub fn num_radial_locations(&self) -> usize {
        self.components
            .iter()
            .map(Fourier::num_radial_locations)
            .max()
            .unwrap_or(1)
    }

    /// Zeroes `m = 0, n < 0` coefficients in every component.
    pub fn set_null(&mut self) {
        self.components.iter_mut().for_each(Fourier::set_null);
    }

    /// Truncates every component to the given bounds.
    pub fn truncated(&self, mpol: Option<usize>, ntor: Option<usize>) -> Self {
        Self {
            components: self
                .components
                .iter()
                .map(|c| c.truncated(mpol, ntor))
                .collect(),
        }
    }

    /// Innermost surface with only the `m = 0` modes kept.
    pub fn magnetic_axis(&self) -> Self {
        Self {
            components: self
                .components
                .iter()
                .map(|c| c.axis().truncated(Some(0), None))
                .collect(),
        }
    }

    /// Outermost stored surface.
    pub fn lcfs(&self) -> Self {
        Self {
            components: self.components.iter().map(Fourier::boundary).collect(),
        }
    }

    /// Keeps the radial slices in `range` of every component.
    pub fn radial_slice(&self, range: Range<usize>) -> SeriesResult<Self> {
        let components = self
            .components
            .iter()
            .map(|c| c.radial_slice(range.clone()))
            .collect::<SeriesResult<Vec<_>>>()?;
        Ok(Self { components })
    }

    /// Evaluates every component at one point.
    pub fn evaluate_point(&self, s: f64, theta: f64, phi: f64) -> SeriesResult<Array1<f64>> {
        let batch = PointBatch::single(s, theta, phi);
        let values = self.evaluate_batch(&batch, &EvalOptions::default())?;
        Ok(values.row(0).to_owned())
    }

    /// Evaluates with default options.
    pub fn evaluate<P>(&self, points: &P) -> SeriesResult<ArrayD<f64>>
    where
        P: IntoPointBatch + ?Sized,
    {
        self.evaluate_with(points, &EvalOptions::default())
    }

    /// Evaluates every component; the result has shape `prefix + [K]`, or
    /// `[K]` when the payload holds a single point.
    pub fn evaluate_with<P>(&self, points: &P, opts: &EvalOptions) -> SeriesResult<ArrayD<f64>>
    where
        P: IntoPointBatch + ?Sized,
    {
        let batch = points.to_point_batch()?;
        let values = self.evaluate_batch(&batch, opts)?;
        batch.shape_components(values)
    }

    /// Evaluates a flat batch into `(N, K)` values.
    pub fn evaluate_batch(
        &self,
        batch: &PointBatch,
        opts: &EvalOptions,
    ) -> SeriesResult<Array2<f64>> {
        let mut values = Array2::zeros((batch.len(), self.components.len()));
        for (component, mut column) in self.components.iter().zip(values.axis_iter_mut(Axis(1))) {
            column.assign(&component.evaluate_batch(batch, opts)?);
        }
        Ok(values)
    }

    /// Samples every component on one shared regular grid.
    pub fn linspace(
        &self,
        spec: &LinspaceSpec,
        opts: &EvalOptions,
    ) -> SeriesResult<TensorLinspace> {
        let grid =
            SampleGrid::build(spec, self.num_radial_locations(), self.num_field_periods())?;
        let values = self.evaluate_batch(&grid.points(), opts)?;
        Ok(grid.into_tensor_linspace(values))
    }
}

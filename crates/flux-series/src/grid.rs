//! Regular sampling grids over `(s, theta, phi)`.

use flux_core::errors::SeriesResult;
use flux_core::{LinspaceSpec, PointBatch};
use ndarray::{Array1, Array2};
use serde::Serialize;

/// Axes and values of a scalar series sampled on a regular grid.
///
/// `values` is flattened with theta outermost, then s, then phi innermost,
/// so its length is `s.len() * theta.len() * phi.len()`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Linspace {
    /// Radial samples.
    pub s: Array1<f64>,
    /// Poloidal samples.
    pub theta: Array1<f64>,
    /// Toroidal samples.
    pub phi: Array1<f64>,
    /// Series values at every grid point.
    pub values: Array1<f64>,
}

/// Axes and stacked component values of a tensor series on a regular grid.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TensorLinspace {
    /// Radial samples.
    pub s: Array1<f64>,
    /// Poloidal samples.
    pub theta: Array1<f64>,
    /// Toroidal samples.
    pub phi: Array1<f64>,
    /// `(grid points, components)` values, grid points ordered as in [`Linspace`].
    pub values: Array2<f64>,
}

/// `num` evenly spaced values from `start` to `stop`, both included.
pub fn evenly_spaced(start: f64, stop: f64, num: usize) -> Array1<f64> {
    if num == 1 {
        return Array1::from_elem(1, start);
    }
    let step = (stop - start) / num.saturating_sub(1) as f64;
    Array1::from_shape_fn(num, |i| {
        if i + 1 == num {
            stop
        } else {
            start + step * i as f64
        }
    })
}

pub(crate) struct SampleGrid {
    s: Array1<f64>,
    theta: Array1<f64>,
    phi: Array1<f64>,
}

impl SampleGrid {
    pub(crate) fn build(
        spec: &LinspaceSpec,
        stored_radial_locations: usize,
        num_field_periods: u32,
    ) -> SeriesResult<Self> {
        let resolved = spec.resolve(stored_radial_locations, num_field_periods)?;
        let [s0, s1] = resolved.domain_s;
        let [t0, t1] = resolved.domain_theta;
        let [p0, p1] = resolved.domain_phi;
        Ok(Self {
            s: evenly_spaced(s0, s1, resolved.ns),
            theta: evenly_spaced(t0, t1, resolved.ntheta),
            phi: evenly_spaced(p0, p1, resolved.nphi),
        })
    }

    pub(crate) fn points(&self) -> PointBatch {
        let mut rows = Vec::with_capacity(self.s.len() * self.theta.len() * self.phi.len());
        for &theta in &self.theta {
            for &s in &self.s {
                for &phi in &self.phi {
                    rows.push([s, theta, phi]);
                }
            }
        }
        PointBatch::from_rows(&rows)
    }

    pub(crate) fn into_linspace(self, values: Array1<f64>) -> Linspace {
        Linspace {
            s: self.s,
            theta: self.theta,
            phi: self.phi,
            values,
        }
    }

    pub(crate) fn into_tensor_linspace(self, values: Array2<f64>) -> TensorLinspace {
        TensorLinspace {
            s: self.s,
            theta: self.theta,
            phi: self.phi,
            values,
        }
    }
}

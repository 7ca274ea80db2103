//! Linear interpolation of coefficient slices across the radial grid.

use flux_core::errors::{ErrorInfo, SeriesError, SeriesResult};
use flux_core::{EvalOptions, RadialPolicy};
use ndarray::{Array2, ArrayView3, Axis};

/// Uniform radial grid `s_i = i / (NS - 1)` over `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RadialGrid {
    len: usize,
}

/// Bracketing slices and blend fraction for one radial coordinate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RadialWeights {
    /// Index of the slice at or below `s`.
    pub lower: usize,
    /// Index of the slice above `s`.
    pub upper: usize,
    /// Weight of the upper slice.
    pub fraction: f64,
}

impl RadialGrid {
    /// Grid with `len` stored slices.
    pub fn new(len: usize) -> Self {
        Self { len: len.max(1) }
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Always false: a grid holds at least one node.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Radial coordinate of node `index`.
    pub fn node(&self, index: usize) -> f64 {
        if self.len == 1 {
            0.0
        } else {
            index as f64 / (self.len - 1) as f64
        }
    }

    fn on_node(&self, s: f64, opts: &EvalOptions) -> bool {
        (0..self.len).any(|i| {
            let node = self.node(i);
            (s - node).abs() <= opts.tolerance_at(node)
        })
    }

    /// Locates `s` on the grid, applying the domain checks of `opts`.
    ///
    /// `position` is the index of the point within its batch and only feeds
    /// the error context.
    pub fn locate(
        &self,
        s: f64,
        position: usize,
        opts: &EvalOptions,
    ) -> SeriesResult<RadialWeights> {
        if !s.is_finite() {
            return Err(SeriesError::Domain(
                ErrorInfo::new("s-not-finite", "the radial coordinate must be finite")
                    .with_context("s", s)
                    .with_context("point", position),
            ));
        }
        if s < -opts.tolerance_at(0.0) || s > 1.0 + opts.tolerance_at(1.0) {
            return Err(SeriesError::Domain(
                ErrorInfo::new("s-out-of-range", "the radial coordinate lies outside [0, 1]")
                    .with_context("s", s)
                    .with_context("point", position)
                    .with_context("atol", opts.atol)
                    .with_context("rtol", opts.rtol),
            ));
        }
        if opts.radial == RadialPolicy::GridOnly && !self.on_node(s, opts) {
            return Err(SeriesError::Domain(
                ErrorInfo::new("s-off-grid", "the radial coordinate is not a stored flux surface")
                    .with_context("s", s)
                    .with_context("point", position)
                    .with_context("num_radial_locations", self.len)
                    .with_hint("use the interpolate radial policy or widen the tolerances"),
            ));
        }

        let s = s.clamp(0.0, 1.0);
        if self.len == 1 {
            return Ok(RadialWeights {
                lower: 0,
                upper: 0,
                fraction: 0.0,
            });
        }
        let scaled = s * (self.len - 1) as f64;
        let lower = (scaled.floor() as usize).min(self.len - 2);
        Ok(RadialWeights {
            lower,
            upper: lower + 1,
            fraction: scaled - lower as f64,
        })
    }
}

impl RadialWeights {
    /// Writes the blended `(MPOL+1, 2·NTOR+1)` slice into `out`.
    pub fn blend_into(&self, coefficients: ArrayView3<'_, f64>, out: &mut Array2<f64>) {
        out.assign(&coefficients.index_axis(Axis(0), self.lower));
        if self.fraction > 0.0 && self.upper != self.lower {
            *out *= 1.0 - self.fraction;
            out.scaled_add(self.fraction, &coefficients.index_axis(Axis(0), self.upper));
        }
    }
}

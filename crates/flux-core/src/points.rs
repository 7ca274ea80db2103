//! Coercion of caller point payloads into flat `(N, 3)` batches of `(s, theta, phi)`.

use ndarray::{
    arr2, Array1, Array2, ArrayBase, ArrayD, ArrayView1, ArrayView2, Axis, Data, Dimension,
};
use serde::Serialize;

use crate::errors::{ErrorInfo, SeriesError, SeriesResult};

/// Points in toroidal coordinates, flattened to `(N, 3)` rows.
///
/// The leading shape of the caller payload is kept so results can be
/// reshaped back: a bare `(3,)` point has an empty prefix, a `(B, 3)` batch
/// has prefix `[B]`, and deeper payloads keep every axis but the last.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PointBatch {
    points: Array2<f64>,
    prefix: Vec<usize>,
}

impl PointBatch {
    /// Batch holding one bare point.
    pub fn single(s: f64, theta: f64, phi: f64) -> Self {
        Self {
            points: arr2(&[[s, theta, phi]]),
            prefix: Vec::new(),
        }
    }

    /// Batch from explicit rows; the prefix is `[rows.len()]`.
    pub fn from_rows(rows: &[[f64; 3]]) -> Self {
        let mut points = Array2::zeros((rows.len(), 3));
        for (mut row, point) in points.axis_iter_mut(Axis(0)).zip(rows) {
            row.assign(&ArrayView1::from(&point[..]));
        }
        Self {
            points,
            prefix: vec![rows.len()],
        }
    }

    /// Batch from an array whose last axis has length 3.
    pub fn from_array<S, D>(array: &ArrayBase<S, D>) -> SeriesResult<Self>
    where
        S: Data<Elem = f64>,
        D: Dimension,
    {
        let shape = array.shape();
        let Some((&width, prefix)) = shape.split_last() else {
            return Err(SeriesError::Shape(
                ErrorInfo::new("point-rank", "points need at least one axis")
                    .with_hint("pass a (3,) point or an (N, 3) batch"),
            ));
        };
        if width != 3 {
            return Err(SeriesError::Shape(
                ErrorInfo::new("point-width", "the last point axis must hold (s, theta, phi)")
                    .with_shape("shape", shape),
            ));
        }
        let count: usize = prefix.iter().product();
        let flat: Vec<f64> = array.iter().copied().collect();
        let points = Array2::from_shape_vec((count, 3), flat).map_err(|err| {
            SeriesError::Shape(
                ErrorInfo::new("point-layout", err.to_string()).with_shape("shape", shape),
            )
        })?;
        Ok(Self {
            points,
            prefix: prefix.to_vec(),
        })
    }

    /// Batch from a flat list: three values form a bare point, longer lists
    /// are read as consecutive `(s, theta, phi)` triples.
    pub fn from_flat(values: &[f64]) -> SeriesResult<Self> {
        if values.len() == 3 {
            return Ok(Self::single(values[0], values[1], values[2]));
        }
        if values.len() % 3 != 0 {
            return Err(SeriesError::Shape(
                ErrorInfo::new("point-width", "flat point lists must hold whole triples")
                    .with_context("len", values.len()),
            ));
        }
        let count = values.len() / 3;
        let points = Array2::from_shape_vec((count, 3), values.to_vec()).map_err(|err| {
            SeriesError::Shape(ErrorInfo::new("point-layout", err.to_string()))
        })?;
        Ok(Self {
            points,
            prefix: vec![count],
        })
    }

    /// Number of points in the batch.
    pub fn len(&self) -> usize {
        self.points.nrows()
    }

    /// Whether the batch holds no points.
    pub fn is_empty(&self) -> bool {
        self.points.nrows() == 0
    }

    /// Leading shape of the caller payload.
    pub fn prefix_shape(&self) -> &[usize] {
        &self.prefix
    }

    /// Flat `(N, 3)` view of the points.
    pub fn points(&self) -> ArrayView2<'_, f64> {
        self.points.view()
    }

    /// Radial coordinates of every point, in batch order.
    pub fn s_values(&self) -> ArrayView1<'_, f64> {
        self.points.column(0)
    }

    /// Reshapes one value per point back to the payload prefix shape.
    pub fn shape_values(&self, values: Array1<f64>) -> SeriesResult<ArrayD<f64>> {
        values.into_shape(self.prefix.clone()).map_err(|err| {
            SeriesError::Shape(
                ErrorInfo::new("output-layout", err.to_string()).with_shape("prefix", &self.prefix),
            )
        })
    }

    /// Reshapes `(N, K)` component values to `prefix + [K]`, dropping the
    /// batch axes entirely when the batch holds exactly one point.
    pub fn shape_components(&self, values: Array2<f64>) -> SeriesResult<ArrayD<f64>> {
        let components = values.ncols();
        let shape = if values.nrows() == 1 {
            vec![components]
        } else {
            let mut shape = self.prefix.clone();
            shape.push(components);
            shape
        };
        values.into_shape(shape.clone()).map_err(|err| {
            SeriesError::Shape(
                ErrorInfo::new("output-layout", err.to_string()).with_shape("shape", &shape),
            )
        })
    }
}

/// Payloads that can be read as a batch of toroidal points.
pub trait IntoPointBatch {
    /// Coerces the payload into a flat batch.
    fn to_point_batch(&self) -> SeriesResult<PointBatch>;
}

impl IntoPointBatch for PointBatch {
    fn to_point_batch(&self) -> SeriesResult<PointBatch> {
        Ok(self.clone())
    }
}

impl IntoPointBatch for [f64; 3] {
    fn to_point_batch(&self) -> SeriesResult<PointBatch> {
        Ok(PointBatch::single(self[0], self[1], self[2]))
    }
}

impl IntoPointBatch for (f64, f64, f64) {
    fn to_point_batch(&self) -> SeriesResult<PointBatch> {
        Ok(PointBatch::single(self.0, self.1, self.2))
    }
}

impl IntoPointBatch for [[f64; 3]] {
    fn to_point_batch(&self) -> SeriesResult<PointBatch> {
        Ok(PointBatch::from_rows(self))
    }
}

impl<const N: usize> IntoPointBatch for [[f64; 3]; N] {
    fn to_point_batch(&self) -> SeriesResult<PointBatch> {
        Ok(PointBatch::from_rows(self))
    }
}

impl IntoPointBatch for Vec<[f64; 3]> {
    fn to_point_batch(&self) -> SeriesResult<PointBatch> {
        Ok(PointBatch::from_rows(self))
    }
}

impl IntoPointBatch for [f64] {
    fn to_point_batch(&self) -> SeriesResult<PointBatch> {
        PointBatch::from_flat(self)
    }
}

impl IntoPointBatch for Vec<f64> {
    fn to_point_batch(&self) -> SeriesResult<PointBatch> {
        PointBatch::from_flat(self)
    }
}

impl<S, D> IntoPointBatch for ArrayBase<S, D>
where
    S: Data<Elem = f64>,
    D: Dimension,
{
    fn to_point_batch(&self) -> SeriesResult<PointBatch> {
        PointBatch::from_array(self)
    }
}

//! Cosine plus sine series sharing a number of field periods.

use std::ops::Range;

use flux_core::errors::{ErrorInfo, SeriesError, SeriesResult};
use flux_core::{EvalOptions, IntoPointBatch, LinspaceSpec, PointBatch};
use ndarray::{Array1, Array3, ArrayD, ArrayViewD};
use serde::{Deserialize, Serialize};

use crate::grid::{Linspace, SampleGrid};
use crate::term::{check_field_periods, FourierTerm, TermKind};

/// One side of a [`Fourier`] series before assembly.
#[derive(Debug, Clone, PartialEq)]
pub enum TermInput {
    /// A term that already carries its kind and field periods.
    Term(FourierTerm),
    /// Raw `(NS, MPOL+1, 2·NTOR+1)` coefficients to be wrapped.
    Coefficients(Array3<f64>),
}

impl From<FourierTerm> for TermInput {
    fn from(term: FourierTerm) -> Self {
        TermInput::Term(term)
    }
}

impl From<Array3<f64>> for TermInput {
    fn from(coefficients: Array3<f64>) -> Self {
        TermInput::Coefficients(coefficients)
    }
}

/// Sum of an optional cosine term and an optional sine term.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "FourierRepr")]
pub struct Fourier {
    cos: Option<FourierTerm>,
    sin: Option<FourierTerm>,
}

#[derive(Deserialize)]
struct FourierRepr {
    #[serde(default)]
    cos: Option<FourierTerm>,
    #[serde(default)]
    sin: Option<FourierTerm>,
}

impl TryFrom<FourierRepr> for Fourier {
    type Error = SeriesError;

    fn try_from(repr: FourierRepr) -> SeriesResult<Self> {
        Fourier::new(repr.cos, repr.sin)
    }
}

fn expect_kind(term: &FourierTerm, kind: TermKind) -> SeriesResult<()> {
    if term.kind() != kind {
        return Err(SeriesError::Shape(
            ErrorInfo::new("term-kind-mismatch", "term passed on the wrong side of the series")
                .with_context("expected", kind.label())
                .with_context("found", term.kind().label()),
        ));
    }
    Ok(())
}

fn wrap_side(
    side: Option<TermInput>,
    kind: TermKind,
    num_field_periods: u32,
) -> SeriesResult<Option<FourierTerm>> {
    match side {
        None => Ok(None),
        Some(TermInput::Term(term)) => Ok(Some(term)),
        Some(TermInput::Coefficients(coefficients)) => {
            FourierTerm::new(kind, coefficients, num_field_periods).map(Some)
        }
    }
}

impl Fourier {
    /// Pairs built terms; at least one must be present and their field
    /// periods must agree.
    pub fn new(cos: Option<FourierTerm>, sin: Option<FourierTerm>) -> SeriesResult<Self> {
        match (&cos, &sin) {
            (None, None) => {
                return Err(SeriesError::EmptyTerm(
                    ErrorInfo::new("empty-series", "a series needs a cosine or a sine term")
                        .with_hint("pass at least one of cos and sin"),
                ))
            }
            (Some(c), Some(s)) if c.num_field_periods() != s.num_field_periods() => {
                return Err(SeriesError::FieldPeriods(
                    ErrorInfo::new(
                        "field-period-mismatch",
                        "cosine and sine terms disagree on the number of field periods",
                    )
                    .with_context("cos", c.num_field_periods())
                    .with_context("sin", s.num_field_periods()),
                ))
            }
            _ => {}
        }
        if let Some(term) = &cos {
            expect_kind(term, TermKind::Cos)?;
        }
        if let Some(term) = &sin {
            expect_kind(term, TermKind::Sin)?;
        }
        Ok(Self { cos, sin })
    }

    /// Series with only a cosine term.
    pub fn from_cos(term: FourierTerm) -> SeriesResult<Self> {
        Self::new(Some(term), None)
    }

    /// Series with only a sine term.
    pub fn from_sin(term: FourierTerm) -> SeriesResult<Self> {
        Self::new(None, Some(term))
    }

    /// Assembles a series from built terms or raw coefficient tensors.
    ///
    /// Raw sides take the field periods of a built side when there is one and
    /// `num_field_periods` otherwise.
    pub fn compose(
        cos: Option<TermInput>,
        sin: Option<TermInput>,
        num_field_periods: u32,
    ) -> SeriesResult<Self> {
        let adopted = [&cos, &sin]
            .into_iter()
            .find_map(|side| match side {
                Some(TermInput::Term(term)) => Some(term.num_field_periods()),
                _ => None,
            })
            .unwrap_or(num_field_periods);
        check_field_periods(adopted)?;
        let cos = wrap_side(cos, TermKind::Cos, adopted)?;
        let sin = wrap_side(sin, TermKind::Sin, adopted)?;
        Self::new(cos, sin)
    }

    /// Builds both sides through the coefficient factory with shared bounds.
    pub fn from_coefficients(
        cos: Option<ArrayViewD<'_, f64>>,
        sin: Option<ArrayViewD<'_, f64>>,
        mpol: usize,
        ntor: usize,
        num_field_periods: u32,
    ) -> SeriesResult<Self> {
        if cos.is_none() && sin.is_none() {
            return Err(SeriesError::EmptyTerm(ErrorInfo::new(
                "empty-series",
                "a series needs a cosine or a sine term",
            )));
        }
        let cos = cos
            .map(|p| {
                FourierTerm::from_coefficients(TermKind::Cos, p, mpol, ntor, num_field_periods)
            })
            .transpose()?;
        let sin = sin
            .map(|p| {
                FourierTerm::from_coefficients(TermKind::Sin, p, mpol, ntor, num_field_periods)
            })
            .transpose()?;
        Self::new(cos, sin)
    }

    /// Cosine term, if any.
    pub fn cos(&self) -> Option<&FourierTerm> {
        self.cos.as_ref()
    }

    /// Sine term, if any.
    pub fn sin(&self) -> Option<&FourierTerm> {
        self.sin.as_ref()
    }

    fn terms(&self) -> impl Iterator<Item = &FourierTerm> {
        self.cos.iter().chain(self.sin.iter())
    }

    fn map_terms<F>(&self, f: F) -> SeriesResult<Self>
    where
        F: Fn(&FourierTerm) -> SeriesResult<FourierTerm>,
    {
        Ok(Self {
            cos: self.cos.as_ref().map(&f).transpose()?,
            sin: self.sin.as_ref().map(&f).transpose()?,
        })
    }

    /// Field periods shared by the present terms.
    pub fn num_field_periods(&self) -> u32 {
        self.terms()
            .next()
            .map(FourierTerm::num_field_periods)
            .unwrap_or(1)
    }

    /// Largest radial resolution among the present terms.
    pub fn num_radial_locations(&self) -> usize {
        self.terms()
            .map(FourierTerm::num_radial_locations)
            .max()
            .unwrap_or(1)
    }

    /// Zeroes `m = 0, n < 0` coefficients of both terms.
    pub fn set_null(&mut self) {
        for term in self.cos.iter_mut().chain(self.sin.iter_mut()) {
            term.set_null();
        }
    }

    /// Truncates both terms to the given bounds.
    pub fn truncated(&self, mpol: Option<usize>, ntor: Option<usize>) -> Self {
        Self {
            cos: self.cos.as_ref().map(|t| t.truncated(mpol, ntor)),
            sin: self.sin.as_ref().map(|t| t.truncated(mpol, ntor)),
        }
    }

    /// Keeps the radial slices in `range` of both terms.
    pub fn radial_slice(&self, range: Range<usize>) -> SeriesResult<Self> {
        self.map_terms(|term| term.radial_slice(range.clone()))
    }

    /// Innermost slice of both terms.
    pub fn axis(&self) -> Self {
        Self {
            cos: self.cos.as_ref().map(FourierTerm::axis),
            sin: self.sin.as_ref().map(FourierTerm::axis),
        }
    }

    /// Outermost slice of both terms.
    pub fn boundary(&self) -> Self {
        Self {
            cos: self.cos.as_ref().map(FourierTerm::boundary),
            sin: self.sin.as_ref().map(FourierTerm::boundary),
        }
    }

    /// Evaluates at one point with default options.
    pub fn evaluate_point(&self, s: f64, theta: f64, phi: f64) -> SeriesResult<f64> {
        let batch = PointBatch::single(s, theta, phi);
        let values = self.evaluate_batch(&batch, &EvalOptions::default())?;
        Ok(values[0])
    }

    /// Evaluates with default options.
    pub fn evaluate<P>(&self, points: &P) -> SeriesResult<ArrayD<f64>>
    where
        P: IntoPointBatch + ?Sized,
    {
        self.evaluate_with(points, &EvalOptions::default())
    }

    /// Evaluates the sum of the present terms; the result has the payload's
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
        let mut total = Array1::zeros(batch.len());
        for term in self.terms() {
            total += &term.evaluate_batch(batch, opts)?;
        }
        Ok(total)
    }

    /// Samples the series on a regular grid.
    pub fn linspace(&self, spec: &LinspaceSpec, opts: &EvalOptions) -> SeriesResult<Linspace> {
        let grid =
            SampleGrid::build(spec, self.num_radial_locations(), self.num_field_periods())?;
        let values = self.evaluate_batch(&grid.points(), opts)?;
        Ok(grid.into_linspace(values))
    }
}

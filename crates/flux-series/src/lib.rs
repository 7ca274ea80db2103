#![deny(missing_docs)]

//! Double Fourier series on stellarator flux surfaces.
//!
//! A [`FourierTerm`] evaluates
//! `sum_{m=0..MPOL} sum_{n=-NTOR..NTOR} C_mn(s) K(m theta - NFP n phi)` with
//! `K` either cosine or sine and `C_mn(s)` interpolated linearly between
//! stored flux surfaces. A [`Fourier`] adds a cosine and a sine term, and a
//! [`TensorSeries`] stacks several series into a vector-valued function.

mod factory;
mod fourier;
mod grid;
mod hash;
mod interp;
#[path = "serde.rs"]
pub mod serde_io;
mod tensor;
mod term;

pub use factory::{reshape_coefficients, CoefficientLayout};
pub use fourier::{Fourier, TermInput};
pub use grid::{evenly_spaced, Linspace, TensorLinspace};
pub use hash::canonical_hash;
pub use interp::{RadialGrid, RadialWeights};
pub use tensor::TensorSeries;
pub use term::{FourierTerm, TermKind};

pub use flux_core::{
    EvalOptions, IntoPointBatch, LinspaceSpec, PointBatch, RadialPolicy, SeriesConfig,
    SeriesError, SeriesResult,
};

pub use serde_io::{from_json_slice, to_canonical_json_bytes, to_json_pretty};

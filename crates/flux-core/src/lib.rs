#![deny(missing_docs)]
#![doc = "Shared error surface, configuration and point batches for stellarator Fourier series."]

pub mod config;
pub mod errors;
pub mod points;

pub use config::{EvalOptions, LinspaceSpec, RadialPolicy, ResolvedLinspace, SeriesConfig};
pub use errors::{ErrorInfo, SeriesError, SeriesResult};
pub use points::{IntoPointBatch, PointBatch};

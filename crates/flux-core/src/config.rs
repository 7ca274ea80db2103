//! Evaluation and sampling options, loadable from YAML or JSON.

use std::f64::consts::TAU;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::{ErrorInfo, SeriesError, SeriesResult};

/// How radial coordinates between stored flux surfaces are handled.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum RadialPolicy {
    /// Piecewise-linear interpolation across the stored radial grid.
    #[default]
    Interpolate,
    /// Only accept `s` values that lie on a stored grid node within tolerance.
    GridOnly,
}

/// Options controlling point evaluation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EvalOptions {
    /// Relative tolerance, applied as `rtol * |node|`.
    #[serde(default)]
    pub rtol: f64,
    /// Absolute tolerance.
    #[serde(default)]
    pub atol: f64,
    /// Radial handling policy.
    #[serde(default)]
    pub radial: RadialPolicy,
}

impl Default for EvalOptions {
    fn default() -> Self {
        Self {
            rtol: 0.0,
            atol: 0.0,
            radial: RadialPolicy::Interpolate,
        }
    }
}

impl EvalOptions {
    /// Strict grid-only evaluation with the given tolerances.
    pub fn grid_only(rtol: f64, atol: f64) -> Self {
        Self {
            rtol,
            atol,
            radial: RadialPolicy::GridOnly,
        }
    }

    /// Returns the allowed distance between `value` and the reference `node`.
    pub fn tolerance_at(&self, node: f64) -> f64 {
        self.atol + self.rtol * node.abs()
    }

    /// Checks that tolerances are finite and non-negative.
    pub fn validated(&self) -> SeriesResult<&Self> {
        for (name, value) in [("rtol", self.rtol), ("atol", self.atol)] {
            if !value.is_finite() || value < 0.0 {
                return Err(SeriesError::Config(
                    ErrorInfo::new("invalid-tolerance", "tolerances must be finite and >= 0")
                        .with_context(name, value),
                ));
            }
        }
        Ok(self)
    }
}

fn default_angular_count() -> usize {
    36
}

/// Regular sampling grid over `(s, theta, phi)`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LinspaceSpec {
    /// Number of radial samples; defaults to the stored radial resolution.
    #[serde(default)]
    pub ns: Option<usize>,
    /// Number of poloidal samples.
    #[serde(default = "default_angular_count")]
    pub ntheta: usize,
    /// Number of toroidal samples.
    #[serde(default = "default_angular_count")]
    pub nphi: usize,
    /// Radial interval, `[0, 1]` when unset.
    #[serde(default)]
    pub domain_s: Option<[f64; 2]>,
    /// Poloidal interval, `[0, 2pi]` when unset.
    #[serde(default)]
    pub domain_theta: Option<[f64; 2]>,
    /// Toroidal interval, one field period `[0, 2pi / nfp]` when unset.
    #[serde(default)]
    pub domain_phi: Option<[f64; 2]>,
}

impl Default for LinspaceSpec {
    fn default() -> Self {
        Self {
            ns: None,
            ntheta: default_angular_count(),
            nphi: default_angular_count(),
            domain_s: None,
            domain_theta: None,
            domain_phi: None,
        }
    }
}

/// Fully resolved sampling grid parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedLinspace {
    /// Radial sample count.
    pub ns: usize,
    /// Poloidal sample count.
    pub ntheta: usize,
    /// Toroidal sample count.
    pub nphi: usize,
    /// Radial interval.
    pub domain_s: [f64; 2],
    /// Poloidal interval.
    pub domain_theta: [f64; 2],
    /// Toroidal interval.
    pub domain_phi: [f64; 2],
}

impl LinspaceSpec {
    /// Grid with explicit angular counts and all other values defaulted.
    pub fn with_counts(ntheta: usize, nphi: usize) -> Self {
        Self {
            ntheta,
            nphi,
            ..Self::default()
        }
    }

    /// Fills unset fields from the series being sampled and validates the result.
    pub fn resolve(
        &self,
        stored_radial_locations: usize,
        num_field_periods: u32,
    ) -> SeriesResult<ResolvedLinspace> {
        if num_field_periods == 0 {
            return Err(SeriesError::FieldPeriods(ErrorInfo::new(
                "zero-field-periods",
                "the number of field periods must be at least 1",
            )));
        }
        let resolved = ResolvedLinspace {
            ns: self.ns.unwrap_or(stored_radial_locations),
            ntheta: self.ntheta,
            nphi: self.nphi,
            domain_s: self.domain_s.unwrap_or([0.0, 1.0]),
            domain_theta: self.domain_theta.unwrap_or([0.0, TAU]),
            domain_phi: self
                .domain_phi
                .unwrap_or([0.0, TAU / f64::from(num_field_periods)]),
        };
        for (axis, count) in [
            ("ns", resolved.ns),
            ("ntheta", resolved.ntheta),
            ("nphi", resolved.nphi),
        ] {
            if count == 0 {
                return Err(SeriesError::Config(
                    ErrorInfo::new("empty-grid", "sampling grids need at least one point per axis")
                        .with_context("axis", axis),
                ));
            }
        }
        for (axis, [lo, hi]) in [
            ("s", resolved.domain_s),
            ("theta", resolved.domain_theta),
            ("phi", resolved.domain_phi),
        ] {
            if !lo.is_finite() || !hi.is_finite() {
                return Err(SeriesError::Config(
                    ErrorInfo::new("non-finite-domain", "sampling domains must be finite")
                        .with_context("axis", axis)
                        .with_context("lower", lo)
                        .with_context("upper", hi),
                ));
            }
        }
        Ok(resolved)
    }
}

/// Top-level configuration bundle for evaluation and sampling.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct SeriesConfig {
    /// Point evaluation options.
    #[serde(default)]
    pub eval: EvalOptions,
    /// Default sampling grid.
    #[serde(default)]
    pub linspace: LinspaceSpec,
}

impl SeriesConfig {
    /// Parses a configuration from YAML text.
    pub fn from_yaml_str(text: &str) -> SeriesResult<Self> {
        let config: Self = serde_yaml::from_str(text).map_err(|err| {
            SeriesError::Serde(ErrorInfo::new("config-yaml-deserialize", err.to_string()))
        })?;
        config.eval.validated()?;
        Ok(config)
    }

    /// Parses a configuration from JSON text.
    pub fn from_json_str(text: &str) -> SeriesResult<Self> {
        let config: Self = serde_json::from_str(text).map_err(|err| {
            SeriesError::Serde(ErrorInfo::new("config-json-deserialize", err.to_string()))
        })?;
        config.eval.validated()?;
        Ok(config)
    }

    /// Loads a configuration file, choosing JSON for `.json` and YAML otherwise.
    pub fn from_path(path: &Path) -> SeriesResult<Self> {
        let text = fs::read_to_string(path).map_err(|err| {
            SeriesError::Config(
                ErrorInfo::new("config-read", err.to_string())
                    .with_context("path", path.display()),
            )
        })?;
        tracing::debug!(path = %path.display(), "loading series configuration");
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::from_json_str(&text),
            _ => Self::from_yaml_str(&text),
        }
    }

    /// Serialises the configuration to YAML.
    pub fn to_yaml_string(&self) -> SeriesResult<String> {
        serde_yaml::to_string(self).map_err(|err| {
            SeriesError::Serde(ErrorInfo::new("config-yaml-serialize", err.to_string()))
        })
    }
}

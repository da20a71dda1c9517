// Copyright 2018 Peter Williams <peter@newton.cx> and collaborators
// Licensed under the GPL version 3.

//! Error types.
//!
//! Only bad inputs are errors. Physics that is merely kinematically forbidden
//! yields a flux of zero, and quadrature trouble is logged and degraded to
//! the best available estimate.

use thiserror::Error;


/// Everything that can go wrong in this crate.
#[derive(Debug, Error)]
pub enum Error {
    /// A particle or photon energy was zero, negative, or not finite.
    #[error("energy must be positive and finite, got {0:e}")]
    NonPositiveEnergy(f64),

    /// A model or distribution parameter failed validation.
    #[error("invalid value {value:e} for `{name}`: {reason}")]
    InvalidParameter {
        /// The parameter's name.
        name: &'static str,
        /// The rejected value.
        value: f64,
        /// What the parameter must satisfy.
        reason: &'static str,
    },

    /// Particle energy integration bounds were not positive and ordered.
    #[error("invalid energy bounds [{min:e}, {max:e}]: bounds must be positive and ordered")]
    InvalidBounds {
        /// The requested lower bound.
        min: f64,
        /// The requested upper bound.
        max: f64,
    },

    /// An inverse-Compton model was asked about a seed field it doesn't have.
    #[error("no seed photon field named `{0}`")]
    UnknownSeedField(String),

    /// A seed photon field was given an empty name.
    #[error("seed photon fields need a non-empty name")]
    EmptySeedFieldName,

    /// Two seed photon fields of one model share a name.
    #[error("duplicate seed photon field `{0}`")]
    DuplicateSeedField(String),

    /// An inverse-Compton model needs at least one target field.
    #[error("inverse-Compton model has no seed photon fields")]
    NoSeedFields,

    /// A tabulated distribution was malformed.
    #[error("invalid table: {0}")]
    InvalidTable(&'static str),

    /// A source configuration was inconsistent.
    #[error("configuration error: {0}")]
    Config(String),

    /// An integral over the output spectrum failed outright.
    #[error("integration failed: {0}")]
    Integration(#[from] crate::quad::IntegrationError),

    /// Reading a configuration file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Parsing a configuration file failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Shorthand for results in this crate.
pub type Result<T> = std::result::Result<T, Error>;


pub(crate) fn check_energy(energy: f64) -> Result<f64> {
    if energy > 0. && energy.is_finite() {
        Ok(energy)
    } else {
        Err(Error::NonPositiveEnergy(energy))
    }
}

pub(crate) fn positive(name: &'static str, value: f64) -> Result<f64> {
    if value > 0. && value.is_finite() {
        Ok(value)
    } else {
        Err(Error::InvalidParameter { name, value, reason: "must be positive and finite" })
    }
}

pub(crate) fn finite(name: &'static str, value: f64) -> Result<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(Error::InvalidParameter { name, value, reason: "must be finite" })
    }
}

pub(crate) fn check_bounds(min: f64, max: f64) -> Result<(f64, f64)> {
    if min > 0. && max.is_finite() && min < max {
        Ok((min, max))
    } else {
        Err(Error::InvalidBounds { min, max })
    }
}

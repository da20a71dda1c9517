// Copyright 2017-2018 Peter Williams <peter@newton.cx> and collaborators
// Licensed under the GPL version 3.

/*! Compute non-thermal radiation from relativistic particle populations.

This crate evaluates the photon spectra emitted by populations of
relativistic electrons and protons. Particle energy distributions (power
laws, broken power laws, cutoffs, log-parabolas, tables) implement
[`ParticleDistribution`]; radiative processes implement [`RadiativeModel`]:

- [`Synchrotron`] emission of electrons gyrating in a tangled magnetic field,
  using the approximation of [Aharonian, Kelner, and Prosekin (2010;
  DOI:10.1103/PhysRevD.82.043002)](https://dx.doi.org/10.1103/PhysRevD.82.043002);
- [`InverseCompton`] upscattering of seed photon fields by electrons, using
  the full Klein-Nishina kernel of [Blumenthal and Gould
  (1970)](https://dx.doi.org/10.1103/RevModPhys.42.237);
- [`PionDecay`] gamma rays from proton-proton collisions with a target gas,
  following [Kelner, Aharonian, and Bugayov (2006;
  DOI:10.1103/PhysRevD.74.034018)](https://dx.doi.org/10.1103/PhysRevD.74.034018).

Units are mixed in the way that is convenient for high-energy astrophysics:
particle and photon energies are in eV, magnetic fields in Gauss, densities
in cm^-3, seed-photon energy densities in eV cm^-3, and distances in cm.
Distribution amplitudes count particles per eV, so that fluxes come out in
photons per eV per second, or per eV per second per cm^2 if the source is
given a distance.

Radiative models share their particle distribution through a [`Shared`]
handle. Editing the distribution through any clone of the handle changes
the output of every model that holds it.

*/

#![deny(missing_docs)]

#[cfg(test)] #[macro_use] extern crate assert_approx_eq;
extern crate serde;
extern crate serde_json;
#[macro_use] extern crate slog;
extern crate thiserror;

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

pub use std::f64::consts::PI;

/// Two times pi, as an `f64`.
pub const TWO_PI: f64 = 2. * PI;

/// The mass of the electron in cgs (grams).
pub const MASS_ELECTRON: f64 = 9.1093837015e-28;

/// The speed of light in cgs (centimeters per second).
pub const SPEED_LIGHT: f64 = 2.99792458e10;

/// The charge of the electron, in cgs (esu's).
pub const ELECTRON_CHARGE: f64 = 4.803204712570263e-10;

/// The reduced Planck constant in cgs (erg seconds).
pub const HBAR: f64 = 1.054571817e-27;

/// The Thomson cross-section in cm^2.
pub const THOMSON_CROSS_SECTION: f64 = 6.6524587321e-25;

/// The classical electron radius in cm.
pub const ELECTRON_RADIUS: f64 = 2.8179403262e-13;

/// Ergs in one electron-volt.
pub const ERG_PER_EV: f64 = 1.602176634e-12;

/// The rest energy of the electron, in eV.
pub const ELECTRON_REST_ENERGY: f64 = 510998.95;

/// The rest energy of the proton, in eV.
pub const PROTON_REST_ENERGY: f64 = 938.27208816e6;

/// The rest energy of the neutral pion, in eV.
pub const NEUTRAL_PION_REST_ENERGY: f64 = 134.9768e6;

/// The Boltzmann constant in eV per Kelvin.
pub const BOLTZMANN: f64 = 8.617333262e-5;

/// Planck's constant times the speed of light, in eV centimeters.
pub const HC: f64 = 1.23984198e-4;

/// One millibarn in cm^2.
pub const MILLIBARN: f64 = 1e-27;


pub mod error;
pub use error::{Error, Result};

pub mod quad;


/// A particle energy distribution `dN/dE`.
///
/// Implementors return the number of particles per unit energy. Energies are
/// in eV; the units of the result are those of the distribution's amplitude.
pub trait ParticleDistribution: fmt::Debug {
    /// Evaluate the distribution at `energy` without validating it. The
    /// result must be non-negative for positive energies.
    fn density(&self, energy: f64) -> f64;

    /// Evaluate the distribution, rejecting energies that are not positive
    /// and finite.
    fn evaluate(&self, energy: f64) -> Result<f64> {
        let energy = error::check_energy(energy)?;
        Ok(self.density(energy))
    }

    /// Evaluate the distribution at many energies.
    fn evaluate_many(&self, energies: &[f64]) -> Result<Vec<f64>> {
        energies.iter().map(|&e| self.evaluate(e)).collect()
    }
}


/// A radiative process that turns a particle population into photons.
pub trait RadiativeModel {
    /// The differential photon flux `dN/dE` at `photon_energy` (eV), in
    /// photons per eV per second (per cm^2 if a distance is set).
    fn flux(&self, photon_energy: f64) -> Result<f64>;

    /// The spectral energy distribution `E^2 dN/dE` at `photon_energy`.
    fn sed(&self, photon_energy: f64) -> Result<f64> {
        Ok(sed::sed_value(photon_energy, self.flux(photon_energy)?))
    }

    /// Compute the flux at each of `energies`.
    fn fluxes(&self, energies: &[f64]) -> Result<Vec<f64>> {
        energies.iter().map(|&e| self.flux(e)).collect()
    }

    /// Compute the SED at each of `energies`.
    fn seds(&self, energies: &[f64]) -> Result<Vec<f64>> {
        energies.iter().map(|&e| self.sed(e)).collect()
    }
}


/// A particle distribution that several radiative models can hold at once.
///
/// Everything here is single-threaded, so there is no locking: the last edit
/// wins and is seen by every holder.
pub type Shared<D> = Rc<RefCell<D>>;

/// Wrap a distribution so that it can be shared between models.
pub fn share<D>(distribution: D) -> Shared<D> {
    Rc::new(RefCell::new(distribution))
}


// Distributions

pub mod power_law;
pub use power_law::{ExponentialCutoffPowerLaw, PowerLaw};

pub mod broken_power_law;
pub use broken_power_law::{BrokenPowerLaw, ExponentialCutoffBrokenPowerLaw, SmoothBrokenPowerLaw};

pub mod log_parabola;
pub use log_parabola::LogParabola;

pub mod table;
pub use table::TableDistribution;

// Radiative processes

pub mod settings;
pub use settings::{ModelSettings, WithSettings};

pub mod seed;
pub use seed::SeedPhotonField;

pub mod synchrotron;
pub use synchrotron::Synchrotron;

pub mod inverse_compton;
pub use inverse_compton::InverseCompton;

pub mod pion_decay;
pub use pion_decay::PionDecay;

// Output and plumbing

pub mod sed;
pub mod snapshot;
pub use snapshot::{Detach, SedRequest, SedResponse, Snapshot};

pub mod config;

// Copyright 2018 Peter Williams <peter@newton.cx> and collaborators
// Licensed under the GPL version 3.

/*! Gamma rays from the decay of neutral pions made in proton-proton
collisions.

Above 100 GeV we use the parametrization of the photon spectrum of
[Kelner, Aharonian, and Bugayov (2006;
DOI:10.1103/PhysRevD.74.034018)](https://dx.doi.org/10.1103/PhysRevD.74.034018),
their equations 58 through 61, with the inelastic cross section of their
equation 79. Below 100 GeV that parametrization loses accuracy, so we use
their delta-function approximation (equation 78), in which each collision
hands a fixed fraction `K_pi = 0.17` of the proton's kinetic energy to
neutral pions. The delta-function branch is rescaled on each evaluation so
that the two branches agree where they meet. That is 100 GeV, unless the
protons are too soft to make 100 GeV pions, in which case the branches meet
at half the highest pion energy the protons can make.

The target is cold hydrogen gas of number density `n_H`. The emission is
linear in `n_H`.

*/

use crate::error::{check_energy, positive, Result};
use crate::settings::{ModelSettings, WithSettings};
use crate::snapshot::Detach;
use crate::{share, ParticleDistribution, RadiativeModel, Shared};
use crate::{MILLIBARN, NEUTRAL_PION_REST_ENERGY, PROTON_REST_ENERGY, SPEED_LIGHT};


/// The threshold proton energy for pion production (eV).
pub const INELASTIC_THRESHOLD: f64 = 1.22e9;

/// Photon energy (eV) where we switch from the delta-function approximation
/// to the full parametrization.
pub const TRANSITION_ENERGY: f64 = 1e11;

/// Default lower bound of the proton energy integral (eV).
pub const DEFAULT_E_MIN: f64 = INELASTIC_THRESHOLD;

/// Default upper bound of the proton energy integral (eV).
pub const DEFAULT_E_MAX: f64 = 1e16;

/// Fraction of the proton kinetic energy transferred to neutral pions.
const K_PI: f64 = 0.17;


/// The inelastic proton-proton cross section in cm^2, as a function of the
/// proton energy in eV. Zero at and below threshold.
pub fn inelastic_cross_section(proton_energy: f64) -> f64 {
    if proton_energy <= INELASTIC_THRESHOLD {
        return 0.;
    }

    let l = (proton_energy / 1e12).ln();
    let t = 1. - (INELASTIC_THRESHOLD / proton_energy).powi(4);
    (34.3 + 1.88 * l + 0.25 * l * l) * t * t * MILLIBARN
}


/// The spectrum of photons per collision, `F(x, E_p)`, with `x = E / E_p`.
pub fn photon_spectrum_function(x: f64, proton_energy: f64) -> f64 {
    if !(x > 0. && x < 1.) {
        return 0.;
    }

    let l = (proton_energy / 1e12).ln();
    let b = 1.30 + 0.14 * l + 0.011 * l * l;
    let beta = 1. / (1.79 + 0.11 * l + 0.008 * l * l);
    let k = 1. / (0.801 + 0.049 * l + 0.014 * l * l);

    let xb = x.powf(beta);

    if xb >= 1. {
        return 0.;
    }

    let d = 1. + k * xb * (1. - xb);
    let t = (1. - xb) / d;
    let bracket = 4. * beta * xb / (1. - xb) + 4. * k * beta * xb * (1. - 2. * xb) / d;
    b / x * t.powi(4) * (1. - x.ln() * bracket)
}


/// Pion-decay emission from a proton population colliding with gas of
/// density `gas_density` cm^-3.
#[derive(Clone, Debug)]
pub struct PionDecay<D: ?Sized> {
    particles: Shared<D>,
    gas_density: f64,
    settings: ModelSettings,
}

impl<D: ParticleDistribution + ?Sized> PionDecay<D> {
    /// Create a model for the protons in `particles` in gas of density
    /// `gas_density` cm^-3. The proton energy integral runs from the
    /// production threshold to 10 PeV unless changed.
    pub fn new(particles: Shared<D>, gas_density: f64) -> Result<Self> {
        Ok(PionDecay {
            particles,
            gas_density: positive("gas_density", gas_density)?,
            settings: ModelSettings::new(DEFAULT_E_MIN, DEFAULT_E_MAX)?,
        })
    }

    /// The proton distribution.
    pub fn particles(&self) -> &Shared<D> {
        &self.particles
    }

    /// The target gas density in cm^-3.
    pub fn gas_density(&self) -> f64 {
        self.gas_density
    }

    /// Change the target gas density.
    pub fn set_gas_density(&mut self, gas_density: f64) -> Result<()> {
        self.gas_density = positive("gas_density", gas_density)?;
        Ok(())
    }

    /// The photon energy where the delta-function branch hands over to the
    /// full parametrization.
    pub fn join_energy(&self) -> f64 {
        let (_, e_max) = self.settings.particle_energy_bounds();
        TRANSITION_ENERGY.min(0.5 * K_PI * (e_max - PROTON_REST_ENERGY))
    }

    /// The full parametrization, in photons per eV per second.
    fn parametrized(&self, particles: &D, energy: f64) -> f64 {
        let (e_min, e_max) = self.settings.particle_energy_bounds();
        let mut ws = self.settings.workspace();

        let integral = self.settings.integrate(&mut ws, "pion decay proton energy", |ln_ep| {
            let ep = ln_ep.exp();
            inelastic_cross_section(ep) * particles.density(ep) * photon_spectrum_function(energy / ep, ep)
        }, e_min.max(energy).ln(), e_max.ln());

        SPEED_LIGHT * self.gas_density * integral
    }

    /// The unnormalized delta-function approximation.
    fn delta_approximation(&self, particles: &D, energy: f64) -> f64 {
        let (e_min, e_max) = self.settings.particle_energy_bounds();
        let m2 = NEUTRAL_PION_REST_ENERGY * NEUTRAL_PION_REST_ENERGY;

        // Pion energies that can yield `energy`, and that our protons can make.
        let lo = (energy + m2 / (4. * energy)).max(K_PI * (e_min - PROTON_REST_ENERGY));
        let hi = K_PI * (e_max - PROTON_REST_ENERGY);

        let mut ws = self.settings.workspace();

        self.settings.integrate(&mut ws, "pion decay pion energy", |ln_epi| {
            let e_pi = ln_epi.exp();
            let ep = PROTON_REST_ENERGY + e_pi / K_PI;
            let p_pi = (e_pi * e_pi - m2).sqrt();

            if !(p_pi > 0.) {
                return 0.;
            }

            e_pi * 2. * SPEED_LIGHT * self.gas_density * inelastic_cross_section(ep)
                * particles.density(ep) / K_PI / p_pi
        }, lo.ln(), hi.ln())
    }
}

impl<D: ParticleDistribution + ?Sized> RadiativeModel for PionDecay<D> {
    fn flux(&self, photon_energy: f64) -> Result<f64> {
        let energy = check_energy(photon_energy)?;
        let particles = self.particles.borrow();

        let join = self.join_energy();

        let rate = if energy >= join {
            self.parametrized(&*particles, energy)
        } else {
            let high = self.parametrized(&*particles, join);
            let low = self.delta_approximation(&*particles, join);
            let norm = if low > 0. { high / low } else { 1. };

            trace!(self.settings.logger, "pion decay delta normalization"; "join" => join, "norm" => norm);
            norm * self.delta_approximation(&*particles, energy)
        };

        trace!(self.settings.logger, "pion decay flux";
               "photon_energy" => energy,
               "gas_density" => self.gas_density,
               "rate" => rate,
        );

        Ok(self.settings.observed(rate))
    }
}

impl<D: ?Sized> WithSettings for PionDecay<D> {
    fn settings(&self) -> &ModelSettings {
        &self.settings
    }

    fn settings_mut(&mut self) -> &mut ModelSettings {
        &mut self.settings
    }
}

impl<D: ParticleDistribution + Clone> Detach for PionDecay<D> {
    fn detach(&self) -> Self {
        PionDecay {
            particles: share(self.particles.borrow().clone()),
            gas_density: self.gas_density,
            settings: self.settings.clone(),
        }
    }
}

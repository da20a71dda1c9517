// Copyright 2018 Peter Williams <peter@newton.cx> and collaborators
// Licensed under the GPL version 3.

/*! Inverse-Compton upscattering of seed photon fields.

We use the isotropic kernel of [Blumenthal and Gould (1970;
DOI:10.1103/RevModPhys.42.237)](https://dx.doi.org/10.1103/RevModPhys.42.237),
equation 2.48, which holds in both the Thomson and the Klein-Nishina regimes.
Writing energies in units of the electron rest energy, an electron with
Lorentz factor `gamma` in a bath of photons of energy `eps` produces
scattered photons of energy `E1` at the rate

```text
dN/(dt dE1) = 2 pi r0^2 c / (gamma^2 eps) F(q, Gamma) n(eps) d(eps),
Gamma = 4 eps gamma,    q = E1 / (Gamma (gamma - E1)),
F = 2 q ln q + (1 + 2q)(1 - q) + (Gamma q)^2 (1 - q) / (2 (1 + Gamma q)),
```

for `1 / (4 gamma^2) <= q <= 1`, and zero otherwise. For blackbody fields we
integrate over the seed photon energy and then over the electron energy, both
in log space. Monochromatic fields collapse the inner integral.

*/

use crate::error::{check_energy, Error, Result};
use crate::seed::{SeedKind, SeedPhotonField};
use crate::settings::{ModelSettings, WithSettings};
use crate::snapshot::Detach;
use crate::{share, ParticleDistribution, RadiativeModel, Shared};
use crate::{ELECTRON_RADIUS, ELECTRON_REST_ENERGY, SPEED_LIGHT, TWO_PI};


/// Default lower bound of the electron energy integral (eV).
pub const DEFAULT_E_MIN: f64 = 1e9;

/// Default upper bound of the electron energy integral (eV).
pub const DEFAULT_E_MAX: f64 = 1e15;

/// `2 pi r0^2 c`, in cm^3 s^-1.
const KERNEL_NORM: f64 = TWO_PI * ELECTRON_RADIUS * ELECTRON_RADIUS * SPEED_LIGHT;


/// The Blumenthal-Gould scattering rate per electron per unit seed photon
/// density, per unit scattered energy. All energies are in units of the
/// electron rest energy: `gamma` is the electron Lorentz factor, `eps` the
/// seed photon energy, and `e1` the scattered photon energy. Kinematically
/// forbidden combinations give zero.
pub fn compton_kernel(gamma: f64, eps: f64, e1: f64) -> f64 {
    if !(e1 < gamma) {
        return 0.;
    }

    let big_gamma = 4. * eps * gamma;
    let q = e1 / (big_gamma * (gamma - e1));

    if q > 1. || q < 0.25 / (gamma * gamma) {
        return 0.;
    }

    let gq = big_gamma * q;
    let f = 2. * q * q.ln() + (1. + 2. * q) * (1. - q) + 0.5 * gq * gq * (1. - q) / (1. + gq);
    KERNEL_NORM * f / (gamma * gamma * eps)
}


/// The smallest Lorentz factor that can scatter a photon of energy `eps` up
/// to `e1` (both in rest-energy units).
fn minimum_gamma(eps: f64, e1: f64) -> f64 {
    0.5 * e1 * (1. + (1. + 1. / (e1 * eps)).sqrt())
}


/// Inverse-Compton emission of an electron population scattering one or
/// more named seed photon fields.
#[derive(Clone, Debug)]
pub struct InverseCompton<D: ?Sized> {
    particles: Shared<D>,
    fields: Vec<SeedPhotonField>,
    settings: ModelSettings,
}

impl<D: ParticleDistribution + ?Sized> InverseCompton<D> {
    /// Create a model for the electrons in `particles` scattering `fields`.
    /// There must be at least one field and their names must be unique.
    pub fn new(particles: Shared<D>, fields: Vec<SeedPhotonField>) -> Result<Self> {
        if fields.is_empty() {
            return Err(Error::NoSeedFields);
        }

        for (i, f) in fields.iter().enumerate() {
            if fields[..i].iter().any(|g| g.name() == f.name()) {
                return Err(Error::DuplicateSeedField(f.name().to_owned()));
            }
        }

        Ok(InverseCompton {
            particles,
            fields,
            settings: ModelSettings::new(DEFAULT_E_MIN, DEFAULT_E_MAX)?,
        })
    }

    /// The electron distribution.
    pub fn particles(&self) -> &Shared<D> {
        &self.particles
    }

    /// The seed photon fields.
    pub fn seed_fields(&self) -> &[SeedPhotonField] {
        &self.fields
    }

    /// Look up a seed photon field by name.
    pub fn seed_field(&self, name: &str) -> Result<&SeedPhotonField> {
        self.fields.iter()
            .find(|f| f.name() == name)
            .ok_or_else(|| Error::UnknownSeedField(name.to_owned()))
    }

    /// Mutable access to a seed photon field, e.g. to change its energy
    /// density.
    pub fn seed_field_mut(&mut self, name: &str) -> Result<&mut SeedPhotonField> {
        self.fields.iter_mut()
            .find(|f| f.name() == name)
            .ok_or_else(|| Error::UnknownSeedField(name.to_owned()))
    }

    /// Add another seed photon field.
    pub fn add_seed_field(&mut self, field: SeedPhotonField) -> Result<()> {
        if self.fields.iter().any(|f| f.name() == field.name()) {
            return Err(Error::DuplicateSeedField(field.name().to_owned()));
        }

        self.fields.push(field);
        Ok(())
    }

    /// Remove a seed photon field, returning it. The last field cannot be
    /// removed.
    pub fn remove_seed_field(&mut self, name: &str) -> Result<SeedPhotonField> {
        let idx = self.fields.iter()
            .position(|f| f.name() == name)
            .ok_or_else(|| Error::UnknownSeedField(name.to_owned()))?;

        if self.fields.len() == 1 {
            return Err(Error::NoSeedFields);
        }

        Ok(self.fields.remove(idx))
    }

    /// The flux at `photon_energy` due to the single seed field `name`.
    pub fn flux_for_field(&self, name: &str, photon_energy: f64) -> Result<f64> {
        let energy = check_energy(photon_energy)?;
        let field = self.seed_field(name)?;
        let particles = self.particles.borrow();
        Ok(self.settings.observed(self.scatter(&*particles, field, energy)))
    }

    /// The SED at `photon_energy` due to the single seed field `name`.
    pub fn sed_for_field(&self, name: &str, photon_energy: f64) -> Result<f64> {
        Ok(crate::sed::sed_value(photon_energy, self.flux_for_field(name, photon_energy)?))
    }

    /// The emitted photon rate (per eV per second) from one field.
    fn scatter(&self, particles: &D, field: &SeedPhotonField, energy: f64) -> f64 {
        let e1 = energy / ELECTRON_REST_ENERGY;
        let (s_min, s_max) = field.energy_range();
        let (eps_min, eps_max) = (s_min / ELECTRON_REST_ENERGY, s_max / ELECTRON_REST_ENERGY);
        let (e_min, e_max) = self.settings.particle_energy_bounds();

        // Electrons below this can't reach `energy` even off the most
        // energetic seed photons.
        let e_lo = e_min.max(minimum_gamma(eps_max, e1) * ELECTRON_REST_ENERGY);

        let mut outer = self.settings.workspace();

        let integral = match field.kind() {
            SeedKind::Monochromatic { .. } => {
                let n0 = field.number_density();

                self.settings.integrate(&mut outer, "inverse Compton electron energy", |ln_e| {
                    let e_e = ln_e.exp();
                    let gamma = e_e / ELECTRON_REST_ENERGY;
                    particles.density(e_e) * e_e * n0 * compton_kernel(gamma, eps_min, e1)
                }, e_lo.ln(), e_max.ln())
            },

            SeedKind::Blackbody { .. } => {
                let mut inner = self.settings.workspace();

                self.settings.integrate(&mut outer, "inverse Compton electron energy", |ln_e| {
                    let e_e = ln_e.exp();
                    let gamma = e_e / ELECTRON_REST_ENERGY;

                    if !(e1 < gamma) {
                        return 0.;
                    }

                    let lo = eps_min.max(e1 / (4. * gamma * (gamma - e1)));
                    let hi = eps_max.min(e1 * gamma / (gamma - e1));

                    let seed = self.settings.integrate(&mut inner, "inverse Compton seed energy", |ln_eps| {
                        let eps = ln_eps.exp();
                        let e_s = eps * ELECTRON_REST_ENERGY;
                        field.photon_density(e_s) * e_s * compton_kernel(gamma, eps, e1)
                    }, lo.ln(), hi.ln());

                    particles.density(e_e) * e_e * seed
                }, e_lo.ln(), e_max.ln())
            },
        };

        // The kernel is per unit scattered energy in rest-energy units.
        let rate = integral / ELECTRON_REST_ENERGY;

        trace!(self.settings.logger, "inverse Compton flux";
               "field" => field.name(),
               "photon_energy" => energy,
               "rate" => rate,
        );

        rate
    }
}

impl<D: ParticleDistribution + ?Sized> RadiativeModel for InverseCompton<D> {
    fn flux(&self, photon_energy: f64) -> Result<f64> {
        let energy = check_energy(photon_energy)?;
        let particles = self.particles.borrow();
        let rate = self.fields.iter().map(|f| self.scatter(&*particles, f, energy)).sum();
        Ok(self.settings.observed(rate))
    }
}

impl<D: ?Sized> WithSettings for InverseCompton<D> {
    fn settings(&self) -> &ModelSettings {
        &self.settings
    }

    fn settings_mut(&mut self) -> &mut ModelSettings {
        &mut self.settings
    }
}

impl<D: ParticleDistribution + Clone> Detach for InverseCompton<D> {
    fn detach(&self) -> Self {
        InverseCompton {
            particles: share(self.particles.borrow().clone()),
            fields: self.fields.clone(),
            settings: self.settings.clone(),
        }
    }
}

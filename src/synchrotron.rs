// Copyright 2017-2018 Peter Williams <peter@newton.cx> and collaborators
// Licensed under the GPL version 3.

/*! Synchrotron emission from relativistic electrons in a tangled field.

We assume the field direction is random on the scales that matter, so the
single-particle emissivity is averaged over pitch angle. The averaged
spectrum of an electron with Lorentz factor *gamma* is

```text
dN/dE = sqrt(3) e^3 B / (2 pi m_e c^2 hbar E) G(E / E_c),
E_c = 3 e hbar B gamma^2 / (2 m_e c),
```

where `G` involves integrals over modified Bessel functions. We use the
analytic approximation of [Aharonian, Kelner, and Prosekin (2010;
DOI:10.1103/PhysRevD.82.043002)](https://dx.doi.org/10.1103/PhysRevD.82.043002),
their equation D7, which is good to better than a percent everywhere. The
emissivity of the whole population is then a single integral over electron
energy, which we do in `ln(E_e)`.

The total power radiated per electron is `4/3 sigma_T c gamma^2 B^2 / 8 pi`,
so for a fixed distribution the bolometric output scales as `B^2`.

*/

use crate::error::{check_energy, positive, Result};
use crate::settings::{ModelSettings, WithSettings};
use crate::{share, ParticleDistribution, RadiativeModel, Shared};
use crate::{ELECTRON_CHARGE, ELECTRON_REST_ENERGY, ERG_PER_EV, HBAR, MASS_ELECTRON, SPEED_LIGHT, TWO_PI};
use crate::snapshot::Detach;


/// Default lower bound of the electron energy integral (eV).
pub const DEFAULT_E_MIN: f64 = 1e9;

/// Default upper bound of the electron energy integral (eV).
pub const DEFAULT_E_MAX: f64 = 1e15;

/// Beyond this ratio of photon to critical energy the emission is
/// exponentially negligible.
const MAX_ENERGY_RATIO: f64 = 700.;


/// The Aharonian-Kelner-Prosekin approximation to the pitch-angle-averaged
/// synchrotron function, including its `exp(-x)` factor.
pub fn g_tilde(x: f64) -> f64 {
    let cb = x.cbrt();
    let cb2 = cb * cb;
    let gt1 = 1.808 * cb / (1. + 3.4 * cb2).sqrt();
    let gt2 = 1. + 2.21 * cb2 + 0.347 * cb2 * cb2;
    let gt3 = 1. + 1.353 * cb2 + 0.217 * cb2 * cb2;
    gt1 * gt2 / gt3 * (-x).exp()
}


/// Synchrotron emission of an electron population in a field of strength
/// `b_field` Gauss.
#[derive(Clone, Debug)]
pub struct Synchrotron<D: ?Sized> {
    particles: Shared<D>,
    b_field: f64,
    settings: ModelSettings,
}

impl<D: ParticleDistribution + ?Sized> Synchrotron<D> {
    /// Create a model for the electrons in `particles` radiating in a field
    /// of `b_field` Gauss. The electron energy integral runs from 1 GeV to
    /// 1 PeV unless changed.
    pub fn new(particles: Shared<D>, b_field: f64) -> Result<Self> {
        Ok(Synchrotron {
            particles,
            b_field: positive("b_field", b_field)?,
            settings: ModelSettings::new(DEFAULT_E_MIN, DEFAULT_E_MAX)?,
        })
    }

    /// The electron distribution.
    pub fn particles(&self) -> &Shared<D> {
        &self.particles
    }

    /// The magnetic field strength in Gauss.
    pub fn b_field(&self) -> f64 {
        self.b_field
    }

    /// Change the magnetic field strength.
    pub fn set_b_field(&mut self, b_field: f64) -> Result<()> {
        self.b_field = positive("b_field", b_field)?;
        Ok(())
    }

    /// The magnetic energy density `B^2 / 8 pi`, in eV cm^-3.
    pub fn magnetic_energy_density(&self) -> f64 {
        self.b_field * self.b_field / (4. * TWO_PI) / ERG_PER_EV
    }

    /// The characteristic photon energy (eV) radiated by electrons of
    /// energy `electron_energy` (eV).
    pub fn critical_energy(&self, electron_energy: f64) -> f64 {
        let gamma = electron_energy / ELECTRON_REST_ENERGY;
        3. * ELECTRON_CHARGE * HBAR * self.b_field * gamma * gamma
            / (2. * MASS_ELECTRON * SPEED_LIGHT) / ERG_PER_EV
    }
}

impl<D: ParticleDistribution + ?Sized> RadiativeModel for Synchrotron<D> {
    fn flux(&self, photon_energy: f64) -> Result<f64> {
        let energy = check_energy(photon_energy)?;
        let particles = self.particles.borrow();
        let (e_min, e_max) = self.settings.particle_energy_bounds();
        let energy_erg = energy * ERG_PER_EV;

        // Per-electron prefactor, in photons per erg per second.
        let prefactor = 3_f64.sqrt() * ELECTRON_CHARGE.powi(3) * self.b_field
            / (TWO_PI * MASS_ELECTRON * SPEED_LIGHT * SPEED_LIGHT * HBAR * energy_erg);

        // E_c(E_e) = critical * E_e^2.
        let critical = self.critical_energy(1.);

        let mut ws = self.settings.workspace();
        let integral = self.settings.integrate(&mut ws, "synchrotron electron energy", |ln_e| {
            let e_e = ln_e.exp();
            let x = energy / (critical * e_e * e_e);

            if x > MAX_ENERGY_RATIO {
                0.
            } else {
                particles.density(e_e) * e_e * g_tilde(x)
            }
        }, e_min.ln(), e_max.ln());

        // photons / (erg s) -> photons / (eV s)
        let rate = integral * prefactor * ERG_PER_EV;

        trace!(self.settings.logger, "synchrotron flux";
               "photon_energy" => energy,
               "b_field" => self.b_field,
               "rate" => rate,
        );

        Ok(self.settings.observed(rate))
    }
}

impl<D: ?Sized> WithSettings for Synchrotron<D> {
    fn settings(&self) -> &ModelSettings {
        &self.settings
    }

    fn settings_mut(&mut self) -> &mut ModelSettings {
        &mut self.settings
    }
}

impl<D: ParticleDistribution + Clone> Detach for Synchrotron<D> {
    fn detach(&self) -> Self {
        Synchrotron {
            particles: share(self.particles.borrow().clone()),
            b_field: self.b_field,
            settings: self.settings.clone(),
        }
    }
}

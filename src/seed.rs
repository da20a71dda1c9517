// Copyright 2018 Peter Williams <peter@newton.cx> and collaborators
// Licensed under the GPL version 3.

/*! Seed photon fields for inverse-Compton scattering.

A field is either a (possibly diluted) blackbody, whose Planck shape is scaled
to a requested energy density, or a monochromatic line. The named presets
are the usual interstellar ones: the cosmic microwave background and
generic far- and near-infrared fields.

*/

use crate::error::{positive, Error, Result};
use crate::{BOLTZMANN, HC, PI};


/// Blackbody fields are integrated over photon energies from this many
/// times kT ...
pub(crate) const BLACKBODY_X_MIN: f64 = 1e-4;

/// ... up to this many times kT.
pub(crate) const BLACKBODY_X_MAX: f64 = 50.;

/// Riemann zeta(3).
const ZETA_3: f64 = 1.2020569031595942;


/// The spectral shape of a seed photon field.
#[derive(Copy,Clone,Debug,PartialEq)]
pub enum SeedKind {
    /// A Planck spectrum at `temperature` (K).
    Blackbody {
        /// The temperature in Kelvin.
        temperature: f64,
    },

    /// All photons at `photon_energy` (eV).
    Monochromatic {
        /// The photon energy in eV.
        photon_energy: f64,
    },
}


/// A named population of target photons.
#[derive(Clone,Debug,PartialEq)]
pub struct SeedPhotonField {
    name: String,
    kind: SeedKind,
    energy_density: f64,
}


/// The energy density (eV cm^-3) of an undiluted blackbody at `temperature`.
pub fn blackbody_energy_density(temperature: f64) -> f64 {
    let kt = BOLTZMANN * temperature;
    8. * PI.powi(5) * kt.powi(4) / (15. * HC.powi(3))
}


impl SeedPhotonField {
    /// A blackbody field at `temperature` (K) with total energy density
    /// `energy_density` (eV cm^-3). If the energy density differs from that
    /// of a true blackbody the Planck shape is simply rescaled.
    pub fn blackbody<S: Into<String>>(name: S, temperature: f64, energy_density: f64) -> Result<Self> {
        Ok(SeedPhotonField {
            name: checked_name(name.into())?,
            kind: SeedKind::Blackbody { temperature: positive("temperature", temperature)? },
            energy_density: positive("energy_density", energy_density)?,
        })
    }

    /// An undiluted blackbody field at `temperature` (K).
    pub fn thermal<S: Into<String>>(name: S, temperature: f64) -> Result<Self> {
        let temperature = positive("temperature", temperature)?;
        Self::blackbody(name, temperature, blackbody_energy_density(temperature))
    }

    /// A monochromatic field of photons at `photon_energy` (eV).
    pub fn monochromatic<S: Into<String>>(name: S, photon_energy: f64, energy_density: f64) -> Result<Self> {
        Ok(SeedPhotonField {
            name: checked_name(name.into())?,
            kind: SeedKind::Monochromatic { photon_energy: positive("photon_energy", photon_energy)? },
            energy_density: positive("energy_density", energy_density)?,
        })
    }

    /// The cosmic microwave background: a 2.72548 K blackbody.
    pub fn cmb() -> Self {
        const T_CMB: f64 = 2.72548;

        SeedPhotonField {
            name: "CMB".to_owned(),
            kind: SeedKind::Blackbody { temperature: T_CMB },
            energy_density: blackbody_energy_density(T_CMB),
        }
    }

    /// A generic far-infrared dust field: 30 K, 0.5 eV cm^-3.
    pub fn fir() -> Self {
        SeedPhotonField {
            name: "FIR".to_owned(),
            kind: SeedKind::Blackbody { temperature: 30. },
            energy_density: 0.5,
        }
    }

    /// A generic near-infrared stellar field: 3000 K, 1 eV cm^-3.
    pub fn nir() -> Self {
        SeedPhotonField {
            name: "NIR".to_owned(),
            kind: SeedKind::Blackbody { temperature: 3000. },
            energy_density: 1.,
        }
    }

    /// Look up one of the presets by (case-insensitive) name.
    pub fn preset(name: &str) -> Option<Self> {
        match name.to_ascii_uppercase().as_str() {
            "CMB" => Some(Self::cmb()),
            "FIR" => Some(Self::fir()),
            "NIR" => Some(Self::nir()),
            _ => None,
        }
    }

    /// The field's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The field's spectral shape.
    pub fn kind(&self) -> SeedKind {
        self.kind
    }

    /// The field's temperature, if it is thermal.
    pub fn temperature(&self) -> Option<f64> {
        match self.kind {
            SeedKind::Blackbody { temperature } => Some(temperature),
            SeedKind::Monochromatic { .. } => None,
        }
    }

    /// The field's energy density in eV cm^-3.
    pub fn energy_density(&self) -> f64 {
        self.energy_density
    }

    /// Change the energy density.
    pub fn set_energy_density(&mut self, energy_density: f64) -> Result<()> {
        self.energy_density = positive("energy_density", energy_density)?;
        Ok(())
    }

    /// The total number density of photons in cm^-3.
    pub fn number_density(&self) -> f64 {
        match self.kind {
            SeedKind::Blackbody { temperature } => {
                // The mean photon energy of a Planck spectrum is
                // pi^4 / (30 zeta(3)) kT.
                let mean = PI.powi(4) / (30. * ZETA_3) * BOLTZMANN * temperature;
                self.energy_density / mean
            },
            SeedKind::Monochromatic { photon_energy } => self.energy_density / photon_energy,
        }
    }

    /// The differential photon number density `dn/dE` (cm^-3 eV^-1) of a
    /// blackbody field at `energy` (eV). Monochromatic fields have no
    /// density function and return zero.
    pub fn photon_density(&self, energy: f64) -> f64 {
        match self.kind {
            SeedKind::Blackbody { temperature } => {
                let kt = BOLTZMANN * temperature;
                let dilution = self.energy_density / blackbody_energy_density(temperature);
                dilution * 8. * PI / HC.powi(3) * energy * energy / (energy / kt).exp_m1()
            },
            SeedKind::Monochromatic { .. } => 0.,
        }
    }

    /// The range of photon energies (eV) that carries essentially all of the
    /// field's photons.
    pub fn energy_range(&self) -> (f64, f64) {
        match self.kind {
            SeedKind::Blackbody { temperature } => {
                let kt = BOLTZMANN * temperature;
                (BLACKBODY_X_MIN * kt, BLACKBODY_X_MAX * kt)
            },
            SeedKind::Monochromatic { photon_energy } => (photon_energy, photon_energy),
        }
    }
}


fn checked_name(name: String) -> Result<String> {
    if name.trim().is_empty() {
        Err(Error::EmptySeedFieldName)
    } else {
        Ok(name)
    }
}

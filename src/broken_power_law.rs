// Copyright 2017 Peter Williams <peter@newton.cx> and collaborators
// Licensed under the GPL version 3.

/*! Broken power-law distribution functions.

Three flavors:

- `BrokenPowerLaw` switches sharply from index `alpha_1` to `alpha_2` at
  `e_break`, staying continuous there.
- `SmoothBrokenPowerLaw` makes the transition gradual:
  `A (E/E_0)^(-alpha_1) [1 + (E/E_break)^((alpha_2 - alpha_1)/beta)]^(-beta)`.
  Smaller `beta` means a sharper break.
- `ExponentialCutoffBrokenPowerLaw` is the sharp broken power law times
  `exp(-(E/E_cutoff)^beta)`.

*/

use crate::error::{finite, positive, Result};
use crate::ParticleDistribution;


/// `ln(1 + exp(y))` without overflowing for large `y`.
fn ln_one_plus_exp(y: f64) -> f64 {
    if y > 35. {
        y
    } else {
        y.exp().ln_1p()
    }
}


/// A power law with a sharp break. See the module-level documentation.
#[derive(Copy,Clone,Debug,PartialEq)]
pub struct BrokenPowerLaw {
    amplitude: f64,
    e_0: f64,
    e_break: f64,
    alpha_1: f64,
    alpha_2: f64,
}

impl BrokenPowerLaw {
    /// Create a broken power law. Below `e_break` the index is `alpha_1`,
    /// above it `alpha_2`; the amplitude is set at `e_0` on the low-energy
    /// branch.
    pub fn new(amplitude: f64, e_0: f64, e_break: f64, alpha_1: f64, alpha_2: f64) -> Result<Self> {
        Ok(BrokenPowerLaw {
            amplitude: positive("amplitude", amplitude)?,
            e_0: positive("e_0", e_0)?,
            e_break: positive("e_break", e_break)?,
            alpha_1: finite("alpha_1", alpha_1)?,
            alpha_2: finite("alpha_2", alpha_2)?,
        })
    }

    /// The amplitude at the reference energy.
    pub fn amplitude(&self) -> f64 { self.amplitude }

    /// The reference energy.
    pub fn e_0(&self) -> f64 { self.e_0 }

    /// The break energy.
    pub fn e_break(&self) -> f64 { self.e_break }

    /// The indices below and above the break.
    pub fn alphas(&self) -> (f64, f64) { (self.alpha_1, self.alpha_2) }

    /// Change the amplitude.
    pub fn set_amplitude(&mut self, amplitude: f64) -> Result<()> {
        self.amplitude = positive("amplitude", amplitude)?;
        Ok(())
    }

    /// Change the reference energy.
    pub fn set_e_0(&mut self, e_0: f64) -> Result<()> {
        self.e_0 = positive("e_0", e_0)?;
        Ok(())
    }

    /// Change the break energy.
    pub fn set_e_break(&mut self, e_break: f64) -> Result<()> {
        self.e_break = positive("e_break", e_break)?;
        Ok(())
    }

    /// Change both indices.
    pub fn set_alphas(&mut self, alpha_1: f64, alpha_2: f64) -> Result<()> {
        let alpha_1 = finite("alpha_1", alpha_1)?;
        self.alpha_2 = finite("alpha_2", alpha_2)?;
        self.alpha_1 = alpha_1;
        Ok(())
    }
}

impl ParticleDistribution for BrokenPowerLaw {
    fn density(&self, energy: f64) -> f64 {
        if energy < self.e_break {
            self.amplitude * (energy / self.e_0).powf(-self.alpha_1)
        } else {
            self.amplitude
                * (self.e_break / self.e_0).powf(self.alpha_2 - self.alpha_1)
                * (energy / self.e_0).powf(-self.alpha_2)
        }
    }
}


/// A power law whose index changes smoothly around the break. See the
/// module-level documentation.
#[derive(Copy,Clone,Debug,PartialEq)]
pub struct SmoothBrokenPowerLaw {
    amplitude: f64,
    e_0: f64,
    e_break: f64,
    alpha_1: f64,
    alpha_2: f64,
    beta: f64,
}

impl SmoothBrokenPowerLaw {
    /// Create a smoothly broken power law with smoothing exponent `beta`.
    pub fn new(amplitude: f64, e_0: f64, e_break: f64, alpha_1: f64, alpha_2: f64,
               beta: f64) -> Result<Self> {
        Ok(SmoothBrokenPowerLaw {
            amplitude: positive("amplitude", amplitude)?,
            e_0: positive("e_0", e_0)?,
            e_break: positive("e_break", e_break)?,
            alpha_1: finite("alpha_1", alpha_1)?,
            alpha_2: finite("alpha_2", alpha_2)?,
            beta: positive("beta", beta)?,
        })
    }

    /// The amplitude at the reference energy, ignoring the break.
    pub fn amplitude(&self) -> f64 { self.amplitude }

    /// The reference energy.
    pub fn e_0(&self) -> f64 { self.e_0 }

    /// The break energy.
    pub fn e_break(&self) -> f64 { self.e_break }

    /// The asymptotic indices below and above the break.
    pub fn alphas(&self) -> (f64, f64) { (self.alpha_1, self.alpha_2) }

    /// The smoothing exponent.
    pub fn beta(&self) -> f64 { self.beta }

    /// Change the amplitude.
    pub fn set_amplitude(&mut self, amplitude: f64) -> Result<()> {
        self.amplitude = positive("amplitude", amplitude)?;
        Ok(())
    }

    /// Change the reference energy.
    pub fn set_e_0(&mut self, e_0: f64) -> Result<()> {
        self.e_0 = positive("e_0", e_0)?;
        Ok(())
    }

    /// Change the break energy.
    pub fn set_e_break(&mut self, e_break: f64) -> Result<()> {
        self.e_break = positive("e_break", e_break)?;
        Ok(())
    }

    /// Change both indices.
    pub fn set_alphas(&mut self, alpha_1: f64, alpha_2: f64) -> Result<()> {
        let alpha_1 = finite("alpha_1", alpha_1)?;
        self.alpha_2 = finite("alpha_2", alpha_2)?;
        self.alpha_1 = alpha_1;
        Ok(())
    }

    /// Change the smoothing exponent.
    pub fn set_beta(&mut self, beta: f64) -> Result<()> {
        self.beta = positive("beta", beta)?;
        Ok(())
    }
}

impl ParticleDistribution for SmoothBrokenPowerLaw {
    fn density(&self, energy: f64) -> f64 {
        // Work in logs; the bracket overflows easily for sharp breaks.
        let y = (self.alpha_2 - self.alpha_1) / self.beta * (energy / self.e_break).ln();
        let ln_f = self.amplitude.ln()
            - self.alpha_1 * (energy / self.e_0).ln()
            - self.beta * ln_one_plus_exp(y);
        ln_f.exp()
    }
}


/// A sharply broken power law with an exponential cutoff. See the
/// module-level documentation.
#[derive(Copy,Clone,Debug,PartialEq)]
pub struct ExponentialCutoffBrokenPowerLaw {
    broken: BrokenPowerLaw,
    e_cutoff: f64,
    beta: f64,
}

impl ExponentialCutoffBrokenPowerLaw {
    /// Create a cutoff broken power law with a cutoff sharpness of 1.
    pub fn new(amplitude: f64, e_0: f64, e_break: f64, alpha_1: f64, alpha_2: f64,
               e_cutoff: f64) -> Result<Self> {
        Ok(ExponentialCutoffBrokenPowerLaw {
            broken: BrokenPowerLaw::new(amplitude, e_0, e_break, alpha_1, alpha_2)?,
            e_cutoff: positive("e_cutoff", e_cutoff)?,
            beta: 1.,
        })
    }

    /// Set the exponent of the cutoff term.
    pub fn cutoff_sharpness(mut self, beta: f64) -> Result<Self> {
        self.set_beta(beta)?;
        Ok(self)
    }

    /// The underlying broken power law, for reading and editing its
    /// parameters.
    pub fn broken_power_law(&mut self) -> &mut BrokenPowerLaw {
        &mut self.broken
    }

    /// The cutoff energy.
    pub fn e_cutoff(&self) -> f64 { self.e_cutoff }

    /// The cutoff sharpness.
    pub fn beta(&self) -> f64 { self.beta }

    /// Change the cutoff energy.
    pub fn set_e_cutoff(&mut self, e_cutoff: f64) -> Result<()> {
        self.e_cutoff = positive("e_cutoff", e_cutoff)?;
        Ok(())
    }

    /// Change the cutoff sharpness.
    pub fn set_beta(&mut self, beta: f64) -> Result<()> {
        self.beta = positive("beta", beta)?;
        Ok(())
    }
}

impl ParticleDistribution for ExponentialCutoffBrokenPowerLaw {
    fn density(&self, energy: f64) -> f64 {
        self.broken.density(energy) * (-(energy / self.e_cutoff).powf(self.beta)).exp()
    }
}

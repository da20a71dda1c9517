// Copyright 2017 Peter Williams <peter@newton.cx> and collaborators
// Licensed under the GPL version 3.

/*! Power-law distribution functions.

The plain power law is `dN/dE = A (E/E_0)^(-alpha)`. The exponential-cutoff
variant multiplies in `exp(-(E/E_cutoff)^beta)`, where `beta` defaults to 1
and sets how sharply the cutoff bites.

*/

use crate::error::{finite, positive, Result};
use crate::ParticleDistribution;


/// A simple power law. See the module-level documentation.
#[derive(Copy,Clone,Debug,PartialEq)]
pub struct PowerLaw {
    amplitude: f64,
    e_0: f64,
    alpha: f64,
}

impl PowerLaw {
    /// Create a power law with amplitude `amplitude` (particles per eV) at
    /// the reference energy `e_0` (eV) and index `alpha`.
    pub fn new(amplitude: f64, e_0: f64, alpha: f64) -> Result<Self> {
        Ok(PowerLaw {
            amplitude: positive("amplitude", amplitude)?,
            e_0: positive("e_0", e_0)?,
            alpha: finite("alpha", alpha)?,
        })
    }

    /// The amplitude at the reference energy.
    pub fn amplitude(&self) -> f64 { self.amplitude }

    /// The reference energy.
    pub fn e_0(&self) -> f64 { self.e_0 }

    /// The power-law index.
    pub fn alpha(&self) -> f64 { self.alpha }

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

    /// Change the index.
    pub fn set_alpha(&mut self, alpha: f64) -> Result<()> {
        self.alpha = finite("alpha", alpha)?;
        Ok(())
    }
}

impl ParticleDistribution for PowerLaw {
    fn density(&self, energy: f64) -> f64 {
        self.amplitude * (energy / self.e_0).powf(-self.alpha)
    }
}


/// A power law with an exponential cutoff. See the module-level
/// documentation.
#[derive(Copy,Clone,Debug,PartialEq)]
pub struct ExponentialCutoffPowerLaw {
    amplitude: f64,
    e_0: f64,
    alpha: f64,
    e_cutoff: f64,
    beta: f64,
}

impl ExponentialCutoffPowerLaw {
    /// Create a cutoff power law. The cutoff sharpness `beta` starts out as
    /// 1; use `cutoff_sharpness()` to change it.
    pub fn new(amplitude: f64, e_0: f64, alpha: f64, e_cutoff: f64) -> Result<Self> {
        Ok(ExponentialCutoffPowerLaw {
            amplitude: positive("amplitude", amplitude)?,
            e_0: positive("e_0", e_0)?,
            alpha: finite("alpha", alpha)?,
            e_cutoff: positive("e_cutoff", e_cutoff)?,
            beta: 1.,
        })
    }

    /// Set the exponent `beta` of the cutoff term.
    pub fn cutoff_sharpness(mut self, beta: f64) -> Result<Self> {
        self.set_beta(beta)?;
        Ok(self)
    }

    /// The amplitude at the reference energy, ignoring the cutoff.
    pub fn amplitude(&self) -> f64 { self.amplitude }

    /// The reference energy.
    pub fn e_0(&self) -> f64 { self.e_0 }

    /// The power-law index.
    pub fn alpha(&self) -> f64 { self.alpha }

    /// The cutoff energy.
    pub fn e_cutoff(&self) -> f64 { self.e_cutoff }

    /// The cutoff sharpness.
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

    /// Change the index.
    pub fn set_alpha(&mut self, alpha: f64) -> Result<()> {
        self.alpha = finite("alpha", alpha)?;
        Ok(())
    }

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

impl ParticleDistribution for ExponentialCutoffPowerLaw {
    fn density(&self, energy: f64) -> f64 {
        self.amplitude * (energy / self.e_0).powf(-self.alpha)
            * (-(energy / self.e_cutoff).powf(self.beta)).exp()
    }
}


#[cfg(test)]
mod tests {
    use crate::{Error, ParticleDistribution};
    use super::*;

    #[test]
    fn power_law_scaling() {
        let pl = PowerLaw::new(1e36, 1e12, 2.5).unwrap();
        assert_approx_eq!(pl.density(1e12), 1e36, 1e22);

        for &e in &[1e9, 3.3e11, 1e12, 7e13, 1e15] {
            let expected = 1e36 * (e / 1e12_f64).powf(-2.5);
            assert_approx_eq!(pl.evaluate(e).unwrap() / expected, 1., 1e-12);
        }
    }

    #[test]
    fn cutoff_falls_faster() {
        let pl = PowerLaw::new(1e36, 1e12, 2.).unwrap();
        let ecpl = ExponentialCutoffPowerLaw::new(1e36, 1e12, 2., 1e13).unwrap();

        let mut last_ratio = 1.;

        for &e in &[1e12, 1e13, 1e14, 1e15] {
            let ratio = ecpl.density(e) / pl.density(e);
            assert!(ratio < last_ratio);
            last_ratio = ratio;
        }

        assert!(last_ratio < 1e-40);
        assert_eq!(ecpl.density(1e16), 0.);
    }

    #[test]
    fn sharper_cutoff() {
        let soft = ExponentialCutoffPowerLaw::new(1., 1., 2., 10.).unwrap();
        let hard = soft.cutoff_sharpness(2.).unwrap();
        assert!(hard.density(30.) < soft.density(30.));
        assert!(hard.density(3.) > soft.density(3.));
        assert_approx_eq!(hard.density(10.) / soft.density(10.), 1., 1e-12);
    }

    #[test]
    fn setters() {
        let mut d = ExponentialCutoffPowerLaw::new(1., 1., 2., 1e3).unwrap();
        d.set_e_0(10.).unwrap();
        d.set_beta(2.).unwrap();
        assert_eq!(d.e_0(), 10.);
        assert_approx_eq!(d.density(10.) / (-1e-4_f64).exp(), 1., 1e-12);

        assert!(d.set_e_0(0.).is_err());
        assert!(d.set_beta(f64::NAN).is_err());
        assert_eq!(d.e_0(), 10.);
    }

    #[test]
    fn validation() {
        assert!(matches!(PowerLaw::new(0., 1., 2.), Err(Error::InvalidParameter { name: "amplitude", .. })));
        assert!(matches!(PowerLaw::new(1., -1., 2.), Err(Error::InvalidParameter { name: "e_0", .. })));
        assert!(PowerLaw::new(1., 1., f64::NAN).is_err());
        assert!(ExponentialCutoffPowerLaw::new(1., 1., 2., 0.).is_err());
        assert!(ExponentialCutoffPowerLaw::new(1., 1., 2., 1.).unwrap().cutoff_sharpness(-1.).is_err());

        let pl = PowerLaw::new(1., 1., 2.).unwrap();
        assert!(matches!(pl.evaluate(0.), Err(Error::NonPositiveEnergy(_))));
        assert!(matches!(pl.evaluate(-5.), Err(Error::NonPositiveEnergy(_))));
    }

    #[test]
    fn setters_validate() {
        let mut pl = PowerLaw::new(1., 1., 2.).unwrap();
        assert!(pl.set_amplitude(-1.).is_err());
        assert_eq!(pl.amplitude(), 1.);
        pl.set_alpha(3.).unwrap();
        assert_approx_eq!(pl.density(10.), 1e-3, 1e-15);
    }
}

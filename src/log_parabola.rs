// Copyright 2017 Peter Williams <peter@newton.cx> and collaborators
// Licensed under the GPL version 3.

//! A log-parabola distribution, `A (E/E_0)^(-alpha - beta ln(E/E_0))`.
//!
//! The curvature `beta` uses the natural logarithm. With `beta > 0` the
//! spectrum steepens continuously with energy.

use crate::error::{finite, positive, Result};
use crate::ParticleDistribution;


/// A log-parabola. See the module-level documentation.
#[derive(Copy,Clone,Debug,PartialEq)]
pub struct LogParabola {
    amplitude: f64,
    e_0: f64,
    alpha: f64,
    beta: f64,
}

impl LogParabola {
    /// Create a log-parabola with index `alpha` at `e_0` and curvature `beta`.
    pub fn new(amplitude: f64, e_0: f64, alpha: f64, beta: f64) -> Result<Self> {
        Ok(LogParabola {
            amplitude: positive("amplitude", amplitude)?,
            e_0: positive("e_0", e_0)?,
            alpha: finite("alpha", alpha)?,
            beta: finite("beta", beta)?,
        })
    }

    /// The amplitude at the reference energy.
    pub fn amplitude(&self) -> f64 { self.amplitude }

    /// The reference energy.
    pub fn e_0(&self) -> f64 { self.e_0 }

    /// The index at the reference energy.
    pub fn alpha(&self) -> f64 { self.alpha }

    /// The curvature.
    pub fn beta(&self) -> f64 { self.beta }

    /// The local power-law index at `energy`.
    pub fn local_index(&self, energy: f64) -> f64 {
        self.alpha + 2. * self.beta * (energy / self.e_0).ln()
    }

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

    /// Change the index at the reference energy.
    pub fn set_alpha(&mut self, alpha: f64) -> Result<()> {
        self.alpha = finite("alpha", alpha)?;
        Ok(())
    }

    /// Change the curvature.
    pub fn set_beta(&mut self, beta: f64) -> Result<()> {
        self.beta = finite("beta", beta)?;
        Ok(())
    }
}

impl ParticleDistribution for LogParabola {
    fn density(&self, energy: f64) -> f64 {
        let x = (energy / self.e_0).ln();
        self.amplitude * (-(self.alpha + self.beta * x) * x).exp()
    }
}


#[cfg(test)]
mod tests {
    use crate::ParticleDistribution;
    use super::*;

    #[test]
    fn reduces_to_power_law() {
        let lp = LogParabola::new(2., 10., 2.2, 0.).unwrap();

        for &e in &[0.1, 1., 10., 1e3] {
            assert_approx_eq!(lp.density(e) / (2. * (e / 10_f64).powf(-2.2)), 1., 1e-12);
        }
    }

    #[test]
    fn curvature() {
        let lp = LogParabola::new(1., 1e12, 2., 0.1).unwrap();
        assert_approx_eq!(lp.density(1e12), 1., 1e-15);

        let x = 10_f64.ln();
        assert_approx_eq!(lp.density(1e13), (-(2. + 0.1 * x) * x).exp(), 1e-15);

        // Numerical logarithmic slope matches the local index.
        let e = 3e13;
        let slope = -(lp.density(e * 1.0001) / lp.density(e)).ln() / 1.0001_f64.ln();
        assert_approx_eq!(slope, lp.local_index(e), 1e-3);
    }

    #[test]
    fn setters() {
        let mut lp = LogParabola::new(1., 1e12, 2., 0.1).unwrap();
        lp.set_e_0(1e13).unwrap();
        assert_approx_eq!(lp.density(1e13), 1., 1e-15);
        assert_eq!(lp.local_index(1e13), lp.alpha());

        assert!(lp.set_e_0(0.).is_err());
        assert!(lp.set_beta(f64::INFINITY).is_err());
        assert_eq!((lp.e_0(), lp.beta()), (1e13, 0.1));
    }
}

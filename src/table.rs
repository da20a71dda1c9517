// Copyright 2018 Peter Williams <peter@newton.cx> and collaborators
// Licensed under the GPL version 3.

/*! A tabulated distribution function.

Between tabulated points the distribution is interpolated linearly in
log-log space, i.e. as a local power law. Where one of the bracketing
densities is zero we fall back to linear interpolation. Outside of the
tabulated range the distribution is zero.

*/

use crate::error::{positive, Error, Result};
use crate::ParticleDistribution;


/// A distribution given as a table of energies and densities.
#[derive(Clone,Debug,PartialEq)]
pub struct TableDistribution {
    energies: Vec<f64>,
    densities: Vec<f64>,
}

impl TableDistribution {
    /// Create a table. The energies must be positive and strictly
    /// increasing; the densities must be non-negative and finite.
    pub fn new(energies: Vec<f64>, densities: Vec<f64>) -> Result<Self> {
        if energies.len() != densities.len() {
            return Err(Error::InvalidTable("energies and densities differ in length"));
        }

        if energies.len() < 2 {
            return Err(Error::InvalidTable("need at least two points"));
        }

        if !energies.iter().all(|&e| e > 0. && e.is_finite()) {
            return Err(Error::InvalidTable("energies must be positive and finite"));
        }

        if !energies.windows(2).all(|w| w[0] < w[1]) {
            return Err(Error::InvalidTable("energies must be strictly increasing"));
        }

        if !densities.iter().all(|&d| d >= 0. && d.is_finite()) {
            return Err(Error::InvalidTable("densities must be non-negative and finite"));
        }

        Ok(TableDistribution { energies, densities })
    }

    /// The tabulated energies.
    pub fn energies(&self) -> &[f64] {
        &self.energies
    }

    /// The tabulated densities.
    pub fn densities(&self) -> &[f64] {
        &self.densities
    }

    /// Multiply every density by `factor`.
    pub fn scale(&mut self, factor: f64) -> Result<()> {
        let factor = positive("factor", factor)?;

        for d in &mut self.densities {
            *d *= factor;
        }

        Ok(())
    }
}

impl ParticleDistribution for TableDistribution {
    fn density(&self, energy: f64) -> f64 {
        let n = self.energies.len();

        if energy < self.energies[0] || energy > self.energies[n - 1] {
            return 0.;
        }

        // Index of the first tabulated energy above `energy`, clamped so
        // that the top end point uses the last segment.
        let hi = match self.energies.binary_search_by(|e| e.partial_cmp(&energy).unwrap_or(std::cmp::Ordering::Less)) {
            Ok(i) => return self.densities[i],
            Err(i) => i.min(n - 1),
        };
        let lo = hi - 1;

        let (e0, e1) = (self.energies[lo], self.energies[hi]);
        let (d0, d1) = (self.densities[lo], self.densities[hi]);

        if d0 > 0. && d1 > 0. {
            let slope = (d1 / d0).ln() / (e1 / e0).ln();
            d0 * (energy / e0).powf(slope)
        } else {
            d0 + (d1 - d0) * (energy - e0) / (e1 - e0)
        }
    }
}

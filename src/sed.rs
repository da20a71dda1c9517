// Copyright 2018 Peter Williams <peter@newton.cx> and collaborators
// Licensed under the GPL version 3.

//! Spectral energy distributions: energy grids, `E^2 dN/dE`, bolometric
//! integrals, and tables of model output.

use std::fmt;

use crate::error::{check_bounds, check_energy, Error, Result};
use crate::quad::IntegrationWorkspace;
use crate::RadiativeModel;


/// The SED value `E^2 dN/dE` for a flux `flux` at `energy`.
pub fn sed_value(energy: f64, flux: f64) -> f64 {
    energy * energy * flux
}


/// Convert a vector of fluxes to SED values.
pub fn to_sed(energies: &[f64], fluxes: &[f64]) -> Result<Vec<f64>> {
    if energies.len() != fluxes.len() {
        return Err(Error::InvalidTable("energies and fluxes differ in length"));
    }

    Ok(energies.iter().zip(fluxes).map(|(&e, &f)| sed_value(e, f)).collect())
}


/// `n` energies spaced evenly in log between `min` and `max` inclusive.
pub fn log_space(min: f64, max: f64, n: usize) -> Result<Vec<f64>> {
    let (min, max) = check_bounds(min, max)?;

    if n < 2 {
        return Err(Error::InvalidTable("an energy grid needs at least two points"));
    }

    let (lmin, lmax) = (min.ln(), max.ln());
    let step = (lmax - lmin) / (n - 1) as f64;

    Ok((0..n).map(|i| {
        if i == n - 1 {
            max
        } else {
            (lmin + i as f64 * step).exp()
        }
    }).collect())
}


/// Integrate tabulated `y(x)` treating each segment as a power law, falling
/// back to the trapezoid rule where `y` is not positive at both ends.
pub fn integrate_loglog(x: &[f64], y: &[f64]) -> Result<f64> {
    if x.len() != y.len() {
        return Err(Error::InvalidTable("abscissae and ordinates differ in length"));
    }

    let mut total = 0.;

    for (xs, ys) in x.windows(2).zip(y.windows(2)) {
        let (x0, x1, y0, y1) = (xs[0], xs[1], ys[0], ys[1]);

        if !(x0 > 0. && x1 > x0) {
            return Err(Error::InvalidTable("abscissae must be positive and increasing"));
        }

        total += if y0 > 0. && y1 > 0. {
            let r = x1 / x0;
            let s = (y1 / y0).ln() / r.ln() + 1.;

            if s.abs() < 1e-10 {
                y0 * x0 * r.ln()
            } else {
                y0 * x0 / s * (r.powf(s) - 1.)
            }
        } else {
            0.5 * (y0 + y1) * (x1 - x0)
        };
    }

    Ok(total)
}


/// The energy flux `integral of E dN/dE dE` between `e_min` and `e_max`, in
/// eV per second (per cm^2 with a distance). The integral is done adaptively
/// in `ln E`; if it fails to converge the best estimate is used.
pub fn energy_flux<M: RadiativeModel + ?Sized>(model: &M, e_min: f64, e_max: f64) -> Result<f64> {
    let (e_min, e_max) = check_bounds(e_min, e_max)?;
    let mut ws = IntegrationWorkspace::new(200);
    let mut failure = None;

    let result = ws.qag(|t: f64| {
        match model.sed(t.exp()) {
            Ok(v) => v,
            Err(e) => {
                failure.get_or_insert(e);
                0.
            },
        }
    }, e_min.ln(), e_max.ln())
        .tolerance(0., 1e-4)
        .compute();

    if let Some(e) = failure {
        return Err(e);
    }

    match result {
        Ok(r) => Ok(r.value),
        Err(e) => match e.estimate() {
            Some(r) => Ok(r.value),
            None => Err(e.into()),
        },
    }
}


/// Model output tabulated on an energy grid: a total and any number of
/// named components.
#[derive(Clone,Debug,PartialEq)]
pub struct SedTable {
    energies: Vec<f64>,
    components: Vec<(String, Vec<f64>)>,
}

impl SedTable {
    /// Start a table on the grid `energies`, which must all be valid
    /// photon energies.
    pub fn new(energies: Vec<f64>) -> Result<Self> {
        for &e in &energies {
            check_energy(e)?;
        }

        Ok(SedTable { energies, components: Vec::new() })
    }

    /// Evaluate `model` on the grid and add it as component `name`.
    pub fn add_component<S, M>(&mut self, name: S, model: &M) -> Result<()>
        where S: Into<String>, M: RadiativeModel + ?Sized
    {
        let fluxes = model.fluxes(&self.energies)?;
        self.add_fluxes(name, fluxes)
    }

    /// Add precomputed fluxes as component `name`.
    pub fn add_fluxes<S: Into<String>>(&mut self, name: S, fluxes: Vec<f64>) -> Result<()> {
        let name = name.into();

        if fluxes.len() != self.energies.len() {
            return Err(Error::InvalidTable("component length doesn't match the energy grid"));
        }

        if self.components.iter().any(|(n, _)| *n == name) {
            return Err(Error::Config(format!("duplicate table component `{}`", name)));
        }

        self.components.push((name, fluxes));
        Ok(())
    }

    /// The energy grid.
    pub fn energies(&self) -> &[f64] {
        &self.energies
    }

    /// The names of the components, in the order they were added.
    pub fn component_names(&self) -> impl Iterator<Item = &str> {
        self.components.iter().map(|(n, _)| n.as_str())
    }

    /// The fluxes of component `name`.
    pub fn column(&self, name: &str) -> Option<&[f64]> {
        self.components.iter().find(|(n, _)| n == name).map(|(_, f)| f.as_slice())
    }

    /// The summed flux of all components.
    pub fn total(&self) -> Vec<f64> {
        let mut total = vec![0.; self.energies.len()];

        for (_, fluxes) in &self.components {
            for (t, f) in total.iter_mut().zip(fluxes) {
                *t += f;
            }
        }

        total
    }
}

/// Tab-separated: energy, total flux, total SED, then the SED of each
/// component.
impl fmt::Display for SedTable {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "# energy\tflux\tsed")?;

        for (name, _) in &self.components {
            write!(f, "\tsed_{}", name)?;
        }

        writeln!(f)?;

        for (i, (&e, t)) in self.energies.iter().zip(self.total()).enumerate() {
            write!(f, "{:.6e}\t{:.6e}\t{:.6e}", e, t, sed_value(e, t))?;

            for (_, fluxes) in &self.components {
                write!(f, "\t{:.6e}", sed_value(e, fluxes[i]))?;
            }

            writeln!(f)?;
        }

        Ok(())
    }
}

// Copyright 2018 Peter Williams <peter@newton.cx> and collaborators
// Licensed under the GPL version 3.

//! Numerical and presentational settings shared by all radiative models.

use slog::Logger;

use crate::error::{check_bounds, positive, Error, Result};
use crate::quad::{IntegrationRule, IntegrationWorkspace};
use crate::PI;


/// Default relative tolerance of the particle-energy integrals.
pub const DEFAULT_RTOL: f64 = 1e-4;

/// Default number of subintervals the adaptive integrators may use.
pub const DEFAULT_LIMIT: usize = 500;


/// Settings common to every radiative model: the particle energy range to
/// integrate over, the integration tolerance, the (optional) distance to the
/// source, and where to send log messages.
#[derive(Clone, Debug)]
pub struct ModelSettings {
    e_min: f64,
    e_max: f64,
    rtol: f64,
    limit: usize,
    distance: Option<f64>,
    pub(crate) logger: Logger,
}

impl ModelSettings {
    /// Create settings that integrate over particle energies `[e_min,
    /// e_max]` (eV). Logging is discarded until a logger is provided.
    pub fn new(e_min: f64, e_max: f64) -> Result<Self> {
        let (e_min, e_max) = check_bounds(e_min, e_max)?;

        Ok(ModelSettings {
            e_min,
            e_max,
            rtol: DEFAULT_RTOL,
            limit: DEFAULT_LIMIT,
            distance: None,
            logger: Logger::root(slog::Discard, o!()),
        })
    }

    /// The particle energy integration bounds.
    pub fn particle_energy_bounds(&self) -> (f64, f64) {
        (self.e_min, self.e_max)
    }

    /// The relative tolerance of the integrals.
    pub fn rtol(&self) -> f64 {
        self.rtol
    }

    /// The distance to the source in cm, if fluxes are to be observed ones.
    pub fn distance(&self) -> Option<f64> {
        self.distance
    }

    /// The logger.
    pub fn logger(&self) -> &Logger {
        &self.logger
    }

    /// Change the particle energy integration bounds.
    pub fn set_particle_energy_bounds(&mut self, e_min: f64, e_max: f64) -> Result<()> {
        let (e_min, e_max) = check_bounds(e_min, e_max)?;
        self.e_min = e_min;
        self.e_max = e_max;
        Ok(())
    }

    /// Change the relative tolerance. It must lie in (0, 1).
    pub fn set_rtol(&mut self, rtol: f64) -> Result<()> {
        if !(rtol > 1e-13 && rtol < 1.) {
            return Err(Error::InvalidParameter { name: "rtol", value: rtol, reason: "must lie between 1e-13 and 1" });
        }

        self.rtol = rtol;
        Ok(())
    }

    /// Change the maximum number of subintervals per integral.
    pub fn set_limit(&mut self, limit: usize) {
        self.limit = limit.max(1);
    }

    /// Set or clear the distance to the source.
    pub fn set_distance(&mut self, distance: Option<f64>) -> Result<()> {
        self.distance = match distance {
            Some(d) => Some(positive("distance", d)?),
            None => None,
        };
        Ok(())
    }

    /// Replace the logger.
    pub fn set_logger(&mut self, logger: Logger) {
        self.logger = logger;
    }

    /// A workspace sized for these settings.
    pub(crate) fn workspace(&self) -> IntegrationWorkspace {
        IntegrationWorkspace::new(self.limit)
    }

    /// Integrate `f` over `[lo, hi]` at our tolerance. If the integration
    /// doesn't converge we note it in the log and use the best estimate, or
    /// zero if there is none.
    pub(crate) fn integrate<F>(&self, ws: &mut IntegrationWorkspace, what: &'static str,
                               f: F, lo: f64, hi: f64) -> f64
        where F: FnMut(f64) -> f64
    {
        if !(lo < hi) {
            return 0.;
        }

        match ws.qag(f, lo, hi)
            .tolerance(0., self.rtol)
            .rule(IntegrationRule::GaussKonrod21)
            .compute()
        {
            Ok(r) => r.value,
            Err(e) => {
                let estimate = e.estimate().map(|r| r.value).unwrap_or(0.);
                debug!(self.logger, "integration did not converge";
                       "integral" => what,
                       "lo" => lo,
                       "hi" => hi,
                       "error" => %e,
                       "estimate" => estimate,
                );
                estimate
            },
        }
    }

    /// Convert an emitted photon rate into an observed flux, if we have a
    /// distance.
    pub(crate) fn observed(&self, rate: f64) -> f64 {
        match self.distance {
            Some(d) => rate / sphere_area(d),
            None => rate,
        }
    }
}


/// Builder-style access to a model's settings.
pub trait WithSettings: Sized {
    /// The model's settings.
    fn settings(&self) -> &ModelSettings;

    /// Mutable access to the model's settings.
    fn settings_mut(&mut self) -> &mut ModelSettings;

    /// Integrate over particle energies `[e_min, e_max]` (eV).
    fn particle_energy_bounds(mut self, e_min: f64, e_max: f64) -> Result<Self> {
        self.settings_mut().set_particle_energy_bounds(e_min, e_max)?;
        Ok(self)
    }

    /// Use relative tolerance `rtol` in the particle-energy integrals.
    fn tolerance(mut self, rtol: f64) -> Result<Self> {
        self.settings_mut().set_rtol(rtol)?;
        Ok(self)
    }

    /// Place the source at `distance` cm so that fluxes are per cm^2.
    fn distance(mut self, distance: f64) -> Result<Self> {
        self.settings_mut().set_distance(Some(distance))?;
        Ok(self)
    }

    /// Send trace and debug output to `logger`.
    fn logger(mut self, logger: Logger) -> Self {
        self.settings_mut().set_logger(logger);
        self
    }
}


/// The dilution factor `4 pi d^2` for a distance in cm.
pub fn sphere_area(distance: f64) -> f64 {
    4. * PI * distance * distance
}

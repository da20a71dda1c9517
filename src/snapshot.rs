// Copyright 2018 Peter Williams <peter@newton.cx> and collaborators
// Licensed under the GPL version 3.

/*! Immutable snapshots of radiative models.

A live model shares its particle distribution with anything else that holds
the same [`Shared`](crate::Shared) handle, so its output changes whenever
someone edits the distribution. A [`Snapshot`] owns a private copy of the
model and its distribution. Callers that want to explore parameter changes
ask for a revised snapshot and query it with a [`SedRequest`]; nothing they
do can leave a half-edited model visible to anyone else.

*/

use serde::{Deserialize, Serialize};

use crate::error::{check_energy, Result};
use crate::sed::{log_space, sed_value};
use crate::RadiativeModel;


/// Models that can make a copy of themselves that no longer shares its
/// particle distribution with the original.
pub trait Detach {
    /// Copy the model, including a private copy of its distribution.
    fn detach(&self) -> Self;
}


/// A request for model output on an energy grid.
#[derive(Clone,Debug,PartialEq,Serialize,Deserialize)]
pub struct SedRequest {
    /// Photon energies in eV.
    pub energies: Vec<f64>,
}

impl SedRequest {
    /// Request output at `energies`.
    pub fn new(energies: Vec<f64>) -> Self {
        SedRequest { energies }
    }

    /// Request output at `n` log-spaced energies between `min` and `max`.
    pub fn log_spaced(min: f64, max: f64, n: usize) -> Result<Self> {
        Ok(SedRequest { energies: log_space(min, max, n)? })
    }
}


/// Model output on an energy grid.
#[derive(Clone,Debug,PartialEq,Serialize,Deserialize)]
pub struct SedResponse {
    /// Photon energies in eV.
    pub energies: Vec<f64>,

    /// `dN/dE` at each energy.
    pub flux: Vec<f64>,

    /// `E^2 dN/dE` at each energy.
    pub sed: Vec<f64>,
}


/// A frozen copy of a model. See the module-level documentation.
///
/// The frozen model is never handed out directly, since its distribution
/// handle would let callers edit it in place. Clones are detached too.
#[derive(Debug)]
pub struct Snapshot<M> {
    model: M,
}

impl<M: Detach> Clone for Snapshot<M> {
    fn clone(&self) -> Self {
        Snapshot { model: self.model.detach() }
    }
}

impl<M: Detach + RadiativeModel> Snapshot<M> {
    /// Freeze the current state of `model`.
    pub fn capture(model: &M) -> Self {
        Snapshot { model: model.detach() }
    }

    /// A private copy of the frozen model. Editing it does not affect the
    /// snapshot.
    pub fn model(&self) -> M {
        self.model.detach()
    }

    /// Evaluate the frozen model on the requested grid. Either every energy
    /// is valid and the whole response is returned, or nothing is.
    pub fn respond(&self, request: &SedRequest) -> Result<SedResponse> {
        for &e in &request.energies {
            check_energy(e)?;
        }

        let flux = self.model.fluxes(&request.energies)?;
        let sed = request.energies.iter().zip(&flux).map(|(&e, &f)| sed_value(e, f)).collect();

        Ok(SedResponse {
            energies: request.energies.clone(),
            flux,
            sed,
        })
    }

    /// A new snapshot with `edit` applied to a private copy of this one. If
    /// the edit fails, no snapshot is produced and this one is untouched.
    pub fn revised<F>(&self, edit: F) -> Result<Self>
        where F: FnOnce(&mut M) -> Result<()>
    {
        let mut model = self.model.detach();
        edit(&mut model)?;
        Ok(Snapshot { model })
    }
}

impl<M: RadiativeModel> RadiativeModel for Snapshot<M> {
    fn flux(&self, photon_energy: f64) -> Result<f64> {
        self.model.flux(photon_energy)
    }
}


#[cfg(test)]
mod tests {
    use crate::{share, PowerLaw, RadiativeModel, Synchrotron};
    use super::*;

    #[test]
    fn frozen_against_later_edits() {
        let d = share(PowerLaw::new(1e36, 1e12, 2.).unwrap());
        let live = Synchrotron::new(d.clone(), 1e-5).unwrap();
        let snap = Snapshot::capture(&live);
        let before = snap.flux(1.).unwrap();

        d.borrow_mut().set_amplitude(2e36).unwrap();
        assert_approx_eq!(live.flux(1.).unwrap() / before, 2., 1e-9);
        assert_eq!(snap.flux(1.).unwrap(), before);
    }

    #[test]
    fn revisions() {
        let d = share(PowerLaw::new(1e36, 1e12, 2.).unwrap());
        let snap = Snapshot::capture(&Synchrotron::new(d.clone(), 1e-5).unwrap());

        let stronger = snap.revised(|m| m.set_b_field(2e-5)).unwrap();
        assert_eq!(stronger.model().b_field(), 2e-5);
        assert_eq!(snap.model().b_field(), 1e-5);

        let brighter = snap.revised(|m| m.particles().borrow_mut().set_amplitude(3e36)).unwrap();
        assert_approx_eq!(brighter.flux(1.).unwrap() / snap.flux(1.).unwrap(), 3., 1e-9);
        assert_eq!(d.borrow().amplitude(), 1e36);

        assert!(snap.revised(|m| m.set_b_field(-1.)).is_err());
    }

    #[test]
    fn copies_cannot_reach_the_frozen_model() {
        let d = share(PowerLaw::new(1e36, 1e12, 2.).unwrap());
        let snap = Snapshot::capture(&Synchrotron::new(d, 1e-5).unwrap());
        let twin = snap.clone();
        let before = snap.flux(1.).unwrap();

        snap.model().particles().borrow_mut().set_amplitude(5e36).unwrap();
        let mut copy = snap.model();
        copy.set_b_field(1e-3).unwrap();
        twin.model().particles().borrow_mut().set_alpha(3.).unwrap();

        assert_eq!(snap.flux(1.).unwrap(), before);
        assert_eq!(twin.flux(1.).unwrap(), before);
        assert_eq!(snap.model().b_field(), 1e-5);
    }

    #[test]
    fn request_response() {
        let d = share(PowerLaw::new(1e36, 1e12, 2.).unwrap());
        let snap = Snapshot::capture(&Synchrotron::new(d, 1e-5).unwrap());

        let req = SedRequest::log_spaced(1e-3, 1e3, 4).unwrap();
        let resp = snap.respond(&req).unwrap();
        assert_eq!(resp.energies, req.energies);
        assert_eq!(resp.flux.len(), 4);
        assert_approx_eq!(resp.sed[1] / (resp.flux[1] * 1e-1 * 1e-1), 1., 1e-12);

        assert!(snap.respond(&SedRequest::new(vec![1., 0.])).is_err());

        let json = serde_json::to_string(&req).unwrap();
        let back: SedRequest = serde_json::from_str(&json).unwrap();
        for (a, b) in back.energies.iter().zip(&req.energies) {
            assert_approx_eq!(a / b, 1., 1e-15);
        }
        assert!(json.starts_with("{\"energies\":["));
    }
}

// Copyright 2018 Peter Williams <peter@newton.cx> and collaborators
// Licensed under the GPL version 3.

/// Time single flux evaluations of each radiative model at a few
/// representative photon energies.

#[macro_use] extern crate bencher;
extern crate nonthermal;

use bencher::Bencher;
use nonthermal::{share, ExponentialCutoffPowerLaw, InverseCompton, PionDecay, RadiativeModel,
                 SeedPhotonField, Synchrotron};

fn electrons() -> ExponentialCutoffPowerLaw {
    ExponentialCutoffPowerLaw::new(1e36, 1e12, 2.5, 1.3e13).unwrap()
}

fn synchrotron_optical(b: &mut Bencher) {
    let sync = Synchrotron::new(share(electrons()), 1e-4).unwrap();
    b.iter(|| sync.flux(1.).unwrap());
}

fn synchrotron_xray(b: &mut Bencher) {
    let sync = Synchrotron::new(share(electrons()), 1e-4).unwrap();
    b.iter(|| sync.flux(1e4).unwrap());
}

fn inverse_compton_cmb_gev(b: &mut Bencher) {
    let ic = InverseCompton::new(share(electrons()), vec![SeedPhotonField::cmb()]).unwrap();
    b.iter(|| ic.flux(1e9).unwrap());
}

fn inverse_compton_nir_tev(b: &mut Bencher) {
    // Deep in the Klein-Nishina regime.
    let ic = InverseCompton::new(share(electrons()), vec![SeedPhotonField::nir()]).unwrap();
    b.iter(|| ic.flux(1e12).unwrap());
}

fn inverse_compton_line(b: &mut Bencher) {
    let line = SeedPhotonField::monochromatic("line", 1., 1.).unwrap();
    let ic = InverseCompton::new(share(electrons()), vec![line]).unwrap();
    b.iter(|| ic.flux(1e11).unwrap());
}

fn pion_decay_gev(b: &mut Bencher) {
    let protons = ExponentialCutoffPowerLaw::new(1e38, 1e12, 2.1, 1e14).unwrap();
    let pp = PionDecay::new(share(protons), 1.).unwrap();
    b.iter(|| pp.flux(1e9).unwrap());
}

fn pion_decay_tev(b: &mut Bencher) {
    let protons = ExponentialCutoffPowerLaw::new(1e38, 1e12, 2.1, 1e14).unwrap();
    let pp = PionDecay::new(share(protons), 1.).unwrap();
    b.iter(|| pp.flux(1e12).unwrap());
}

benchmark_group!(
    benches,
    synchrotron_optical,
    synchrotron_xray,
    inverse_compton_cmb_gev,
    inverse_compton_nir_tev,
    inverse_compton_line,
    pion_decay_gev,
    pion_decay_tev
);
benchmark_main!(benches);

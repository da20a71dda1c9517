// Copyright 2018 Peter Williams <peter@newton.cx> and collaborators
// Licensed under the GPL version 3.

/// End-to-end checks of the radiative models against each other and against
/// analytic expectations.

#[macro_use] extern crate assert_approx_eq;
extern crate nonthermal;
extern crate nonthermal_test_support;

use nonthermal::sed::energy_flux;
use nonthermal::{share, BrokenPowerLaw, ExponentialCutoffPowerLaw, InverseCompton, ParticleDistribution,
                 PionDecay, PowerLaw, RadiativeModel, SeedPhotonField, Shared, SmoothBrokenPowerLaw,
                 Snapshot, Synchrotron, WithSettings};
use nonthermal_test_support::{quiet_log, random_energies};

fn electrons() -> ExponentialCutoffPowerLaw {
    ExponentialCutoffPowerLaw::new(1e36, 1e12, 2.5, 1.3e13).unwrap()
}

#[test]
fn distributions_are_non_negative() {
    let energies = random_energies(1e6, 1e18, 200);
    let dists: Vec<Box<dyn ParticleDistribution>> = vec![
        Box::new(PowerLaw::new(1e36, 1e12, 2.5).unwrap()),
        Box::new(electrons()),
        Box::new(BrokenPowerLaw::new(1e36, 1e12, 3e12, 2., 3.2).unwrap()),
        Box::new(SmoothBrokenPowerLaw::new(1e36, 1e12, 3e12, 2., 3.2, 0.2).unwrap()),
    ];

    for d in &dists {
        for &e in &energies {
            let v = d.evaluate(e).unwrap();
            assert!(v >= 0. && v.is_finite(), "{:?} at {:e} gave {:e}", d, e, v);
        }

        assert!(d.evaluate(0.).is_err());
        assert!(d.evaluate(-5.).is_err());
    }
}

#[test]
fn cutoff_falls_faster_than_power_law() {
    let pl = PowerLaw::new(1e36, 1e12, 2.5).unwrap();
    let ecpl = electrons();
    let mut last = 1.;

    for &e in &[1e12, 1e13, 1e14, 1e15] {
        let ratio = ecpl.density(e) / pl.density(e);
        assert!(ratio < last);
        last = ratio;
    }

    assert!(last < 1e-30);
}

#[test]
fn synchrotron_power_scales_as_b_squared() {
    let d = share(electrons());
    let weak = Synchrotron::new(d.clone(), 1e-5).unwrap();
    let strong = Synchrotron::new(d, 4e-5).unwrap();

    let p_weak = energy_flux(&weak, 1e-9, 1e7).unwrap();
    let p_strong = energy_flux(&strong, 1e-9, 1e7).unwrap();
    assert_approx_eq!(p_strong / p_weak, 16., 16. * 5e-3);
}

#[test]
fn inverse_compton_is_sum_of_fields() {
    let d = share(electrons());
    let fields = vec![SeedPhotonField::cmb(), SeedPhotonField::fir(), SeedPhotonField::nir()];
    let all = InverseCompton::new(d.clone(), fields.clone()).unwrap();

    for e in random_energies(1e6, 1e13, 5) {
        let separate: f64 = fields.iter()
            .map(|f| InverseCompton::new(d.clone(), vec![f.clone()]).unwrap().flux(e).unwrap())
            .sum();
        assert_approx_eq!(all.flux(e).unwrap() / separate, 1., 1e-9);
    }
}

#[test]
fn shared_edits_reach_every_model() {
    let d: Shared<ExponentialCutoffPowerLaw> = share(electrons());
    let sync = Synchrotron::new(d.clone(), 1e-5).unwrap();
    let ic = InverseCompton::new(d.clone(), vec![SeedPhotonField::cmb()]).unwrap();

    let before = (sync.flux(1.).unwrap(), ic.flux(1e11).unwrap());
    d.borrow_mut().set_amplitude(3e36).unwrap();
    let after = (sync.flux(1.).unwrap(), ic.flux(1e11).unwrap());

    assert_approx_eq!(after.0 / before.0, 3., 1e-9);
    assert_approx_eq!(after.1 / before.1, 3., 1e-9);

    // Models holding a trait object see edits too.
    let dynamic: Shared<dyn ParticleDistribution> = share(PowerLaw::new(1e36, 1e12, 2.).unwrap());
    let sync_dyn = Synchrotron::new(dynamic, 1e-5).unwrap();
    assert!(sync_dyn.flux(1.).unwrap() > 0.);
}

#[test]
fn thomson_ratio_of_luminosities() {
    // In the Thomson regime L_IC / L_sync = U_rad / U_B.
    let d = share(ExponentialCutoffPowerLaw::new(1e36, 1e10, 2.5, 1e11).unwrap());
    let sync = Synchrotron::new(d.clone(), 3e-6).unwrap().particle_energy_bounds(1e9, 1e13).unwrap();
    let ic = InverseCompton::new(d, vec![SeedPhotonField::cmb()]).unwrap()
        .particle_energy_bounds(1e9, 1e13).unwrap();

    let l_sync = energy_flux(&sync, 1e-12, 1e4).unwrap();
    let l_ic = energy_flux(&ic, 1e-6, 1e12).unwrap();
    let expected = SeedPhotonField::cmb().energy_density() / sync.magnetic_energy_density();
    assert_approx_eq!(l_ic / l_sync / expected, 1., 0.02);
}

#[test]
fn pion_decay_positive_and_bounded() {
    let p = share(ExponentialCutoffPowerLaw::new(1e38, 1e12, 2.1, 1e14).unwrap());
    let pp = PionDecay::new(p, 10.).unwrap().logger(quiet_log());

    for e in random_energies(1e8, 1e15, 10) {
        let f = pp.flux(e).unwrap();
        assert!(f > 0. && f.is_finite(), "flux at {:e} was {:e}", e, f);
    }

    assert_eq!(pp.flux(1e17).unwrap(), 0.);
}

#[test]
fn distance_rescales_all_models() {
    let d = share(electrons());
    let dist = 3.086e21;
    let area = 4. * std::f64::consts::PI * dist * dist;

    let sync = Synchrotron::new(d.clone(), 1e-5).unwrap();
    let sync_far = Synchrotron::new(d.clone(), 1e-5).unwrap().distance(dist).unwrap();
    assert_approx_eq!(sync.flux(1.).unwrap() / sync_far.flux(1.).unwrap() / area, 1., 1e-12);

    let ic = InverseCompton::new(d.clone(), vec![SeedPhotonField::cmb()]).unwrap();
    let ic_far = InverseCompton::new(d, vec![SeedPhotonField::cmb()]).unwrap().distance(dist).unwrap();
    assert_approx_eq!(ic.flux(1e10).unwrap() / ic_far.flux(1e10).unwrap() / area, 1., 1e-12);
}

#[test]
fn snapshots_ignore_later_edits() {
    let d = share(electrons());
    let ic = InverseCompton::new(d.clone(), vec![SeedPhotonField::cmb()]).unwrap();
    let snap = Snapshot::capture(&ic);
    let frozen = snap.flux(1e11).unwrap();

    d.borrow_mut().set_alpha(2.).unwrap();
    assert!(ic.flux(1e11).unwrap() != frozen);
    assert_eq!(snap.flux(1e11).unwrap(), frozen);
}

// Copyright 2018 Peter Williams <peter@newton.cx> and collaborators
// Licensed under the GPL version 3.

/// A tour of the API: particle distributions, leptonic and hadronic
/// radiative models sharing those distributions, and a parameter sweep done
/// with snapshots rather than by editing live models.
///
/// Everything is printed as tab-separated tables that can be fed straight to
/// a plotting program.

extern crate nonthermal;
extern crate nonthermal_test_support;
#[macro_use]
extern crate slog;

use nonthermal::sed::{energy_flux, log_space, SedTable};
use nonthermal::{share, BrokenPowerLaw, ExponentialCutoffBrokenPowerLaw, ExponentialCutoffPowerLaw,
                 InverseCompton, LogParabola, ParticleDistribution, PionDecay, PowerLaw, RadiativeModel,
                 Result, SedRequest, SeedPhotonField, SmoothBrokenPowerLaw, Snapshot, Synchrotron,
                 WithSettings};
use slog::Logger;

/// 1.5 kpc in cm.
const DISTANCE: f64 = 4.6e21;

fn distributions() -> Result<()> {
    let dists: Vec<(&str, Box<dyn ParticleDistribution>)> = vec![
        ("power_law", Box::new(PowerLaw::new(1e36, 1e12, 2.5)?)),
        ("cutoff_power_law", Box::new(ExponentialCutoffPowerLaw::new(1e36, 1e12, 2.5, 1e13)?)),
        ("broken_power_law", Box::new(BrokenPowerLaw::new(1e36, 1e12, 1e12, 2., 3.)?)),
        ("smooth_broken_power_law", Box::new(SmoothBrokenPowerLaw::new(1e36, 1e12, 1e12, 2., 3., 0.3)?)),
        ("cutoff_broken_power_law", Box::new(ExponentialCutoffBrokenPowerLaw::new(1e36, 1e12, 1e12, 2., 3., 1e14)?)),
        ("log_parabola", Box::new(LogParabola::new(1e36, 1e12, 2., 0.1)?)),
    ];

    print!("# electron_energy");
    for (name, _) in &dists {
        print!("\t{}", name);
    }
    println!();

    for e in log_space(1e9, 1e15, 25)? {
        print!("{:.6e}", e);
        for (_, d) in &dists {
            print!("\t{:.6e}", d.evaluate(e)?);
        }
        println!();
    }

    println!();
    Ok(())
}

fn leptonic(log: &Logger) -> Result<()> {
    let electrons = share(ExponentialCutoffPowerLaw::new(1e36, 1e12, 2.5, 1.3e13)?);

    let sync = Synchrotron::new(electrons.clone(), 1e-4)?
        .distance(DISTANCE)?
        .logger(log.new(o!("process" => "synchrotron")));

    let ic = InverseCompton::new(electrons.clone(), vec![
        SeedPhotonField::cmb(),
        SeedPhotonField::fir(),
        SeedPhotonField::nir(),
    ])?
        .distance(DISTANCE)?
        .logger(log.new(o!("process" => "inverse_compton")));

    let energies = log_space(1e-6, 1e14, 41)?;

    let mut table = SedTable::new(energies.clone())?;
    table.add_component("synchrotron", &sync)?;

    for field in ["CMB", "FIR", "NIR"].iter() {
        let fluxes = energies.iter().map(|&e| ic.flux_for_field(field, e)).collect::<Result<Vec<_>>>()?;
        table.add_fluxes(format!("ic_{}", field), fluxes)?;
    }

    print!("{}", table);
    println!();

    // Both models see an edit to the shared electrons.
    let (e_sync, e_ic) = (1e3, 1e12);
    let before = (sync.sed(e_sync)?, ic.sed(e_ic)?);
    electrons.borrow_mut().set_e_cutoff(1e14)?;
    let after = (sync.sed(e_sync)?, ic.sed(e_ic)?);

    info!(log, "raised electron cutoff to 100 TeV";
          "sync_1keV_ratio" => after.0 / before.0,
          "ic_1TeV_ratio" => after.1 / before.1);

    let l_sync = energy_flux(&sync, 1e-6, 1e6)?;
    let l_ic = energy_flux(&ic, 1e-3, 1e14)?;
    println!("# energy flux (eV/s/cm^2): synchrotron {:.4e}, inverse Compton {:.4e}", l_sync, l_ic);
    println!("# magnetic energy density {:.4e} eV/cm^3", sync.magnetic_energy_density());
    println!();
    Ok(())
}

fn hadronic(log: &Logger) -> Result<()> {
    let protons = share(ExponentialCutoffPowerLaw::new(1e38, 1e12, 2.1, 1e14)?);
    let pp = PionDecay::new(protons, 1.)?
        .distance(DISTANCE)?
        .logger(log.new(o!("process" => "pion_decay")));

    let mut table = SedTable::new(log_space(1e7, 1e15, 33)?)?;
    table.add_component("pion_decay", &pp)?;
    print!("{}", table);
    println!();
    Ok(())
}

fn sweep(log: &Logger) -> Result<()> {
    let electrons = share(ExponentialCutoffPowerLaw::new(1e36, 1e12, 2.5, 1.3e13)?);
    let base = Snapshot::capture(&Synchrotron::new(electrons, 1e-5)?.distance(DISTANCE)?);
    let request = SedRequest::log_spaced(1e-6, 1e6, 49)?;

    println!("# b_field\tpeak_energy\tpeak_sed");

    for &b in &[1e-5, 3e-5, 1e-4, 3e-4, 1e-3] {
        let snap = base.revised(|m| m.set_b_field(b))?;
        let resp = snap.respond(&request)?;

        let (peak_e, peak_sed) = resp.energies.iter()
            .zip(&resp.sed)
            .fold((0., 0.), |(pe, ps), (&e, &s)| if s > ps { (e, s) } else { (pe, ps) });

        debug!(log, "sweep step"; "b_field" => b, "points" => resp.sed.len());
        println!("{:.3e}\t{:.6e}\t{:.6e}", b, peak_e, peak_sed);
    }

    Ok(())
}

fn main() {
    let log = nonthermal_test_support::default_log();

    let result = distributions()
        .and_then(|_| leptonic(&log))
        .and_then(|_| hadronic(&log))
        .and_then(|_| sweep(&log));

    if let Err(e) = result {
        crit!(log, "walkthrough failed"; "error" => %e);
        std::process::exit(1);
    }
}

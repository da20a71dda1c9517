// Copyright 2018 Peter Williams <peter@newton.cx> and collaborators
// Licensed under the GPL version 3.

/// Load the demo source description and check the table it produces.

#[macro_use] extern crate assert_approx_eq;
extern crate nonthermal;
extern crate nonthermal_test_support;

use nonthermal::config::{Component, SourceConfig};
use nonthermal::RadiativeModel;
use nonthermal_test_support::quiet_log;
use std::path::PathBuf;

const TOP: &'static str = env!("CARGO_MANIFEST_DIR");

fn demo_source() -> SourceConfig {
    let mut p = PathBuf::from(TOP);
    p.push("demos");
    p.push("source.json");
    SourceConfig::from_path(p).unwrap()
}

#[test]
fn demo_source_builds() {
    let cfg = demo_source();
    let source = cfg.build(&quiet_log()).unwrap();

    let names: Vec<&str> = source.components().iter().map(Component::name).collect();
    assert_eq!(names, vec!["synchrotron", "inverse_compton", "pion_decay"]);
    assert_eq!(source.energies().len(), cfg.energies.points);
    assert!(source.electrons().is_some() && source.protons().is_some());
}

#[test]
fn demo_table_is_consistent() {
    let source = demo_source().build(&quiet_log()).unwrap();
    let table = source.table().unwrap();
    let text = table.to_string();
    let mut lines = text.lines();

    assert_eq!(lines.next(), Some("# energy\tflux\tsed\tsed_synchrotron\tsed_inverse_compton\tsed_pion_decay"));

    let mut rows = 0;

    for line in lines {
        let v: Vec<f64> = line.split('\t').map(|s| s.parse::<f64>().unwrap()).collect();
        assert_eq!(v.len(), 6);
        assert!(v.iter().all(|x| *x >= 0. && x.is_finite()));

        // Columns are rounded to seven significant figures.
        let parts = v[3] + v[4] + v[5];
        if parts > 0. {
            assert_approx_eq!(v[2] / parts, 1., 1e-5);
        }

        rows += 1;
    }

    assert_eq!(rows, source.energies().len());

    // The whole-source flux matches the table's total column.
    let e = table.energies()[30];
    assert_approx_eq!(source.flux(e).unwrap() / table.total()[30], 1., 1e-12);
}

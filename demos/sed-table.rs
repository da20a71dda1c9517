// Copyright 2018 Peter Williams <peter@newton.cx> and collaborators
// Licensed under the GPL version 3.

/// Tabulate the spectrum of a source described in a JSON file.
///
/// The output is tab-separated: photon energy (eV), total flux, total SED,
/// and then the SED of each radiative process.

#[macro_use]
extern crate clap;
extern crate nonthermal;
extern crate nonthermal_test_support;
#[macro_use]
extern crate slog;

use clap::{Arg, ArgAction, Command};
use nonthermal::config::SourceConfig;
use std::process;
use std::time::Instant;

fn main() {
    let matches = Command::new(crate_name!())
        .version(crate_version!())
        .about("Compute the SED of a configured non-thermal source")
        .arg(
            Arg::new("CONFIG")
                .help("The JSON source description")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(ArgAction::SetTrue)
                .help("Log progress to the terminal"),
        )
        .get_matches();

    let log = if matches.get_flag("verbose") {
        nonthermal_test_support::default_log()
    } else {
        nonthermal_test_support::quiet_log()
    };

    let path = matches.get_one::<String>("CONFIG").unwrap();

    let t0 = Instant::now();

    let result = SourceConfig::from_path(path)
        .and_then(|cfg| cfg.build(&log))
        .and_then(|source| source.table());

    match result {
        Ok(table) => {
            info!(log, "computed SED"; "elapsed_ms" => t0.elapsed().as_millis() as u64);
            print!("{}", table);
        },
        Err(e) => {
            eprintln!("error: {}", e);
            process::exit(1);
        },
    }
}

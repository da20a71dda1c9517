// Copyright 2017-2018 Peter Williams <peter@newton.cx> and collaborators
// Licensed under the GPL version 3.

//! Loggers and random photon energies for the tests and demos.

extern crate rand;
#[macro_use] extern crate slog;
extern crate slog_async;
extern crate slog_term;

use rand::Rng;
use slog::Drain;

/// A terminal logger for the demo programs.
pub fn default_log() -> slog::Logger {
    let decorator = slog_term::TermDecorator::new().build();
    let drain = slog_term::FullFormat::new(decorator).build().fuse();
    let drain = slog_async::Async::new(drain)
        .overflow_strategy(slog_async::OverflowStrategy::Block)
        .build().fuse();
    slog::Logger::root(drain, o!())
}


/// A logger that throws everything away.
pub fn quiet_log() -> slog::Logger {
    slog::Logger::root(slog::Discard, o!())
}


/// `count` energies drawn log-uniformly from `[min, max)`.
pub fn random_energies(min: f64, max: f64, count: usize) -> Vec<f64> {
    let (lo, hi) = (min.ln(), max.ln());
    let mut rng = rand::thread_rng();
    (0..count).map(|_| rng.gen_range(lo..hi).exp()).collect()
}

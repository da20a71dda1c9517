// Copyright 2018 Peter Williams <peter@newton.cx> and collaborators
// Licensed under the GPL version 3.

/*! Describing a whole source in JSON.

A source is an electron and/or a proton population, the radiative processes
they feed, and the photon energy grid to tabulate the output on:

```json
{
  "electrons": { "type": "exponential_cutoff_power_law",
                 "amplitude": 1e36, "e_0": 1e12, "alpha": 2.5, "e_cutoff": 1e13 },
  "processes": [
    { "process": "synchrotron", "b_field": 1e-5 },
    { "process": "inverse_compton", "seed_fields": ["CMB", "FIR", "NIR"] }
  ],
  "energies": { "min": 1e-6, "max": 1e14, "points": 100 },
  "distance": 3.086e21
}
```

Seed fields are either preset names or objects with a `name` and either a
`temperature` (and optional `energy_density`) or a `photon_energy` and an
`energy_density`.

*/

use std::fs;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use slog::Logger;

use crate::error::{Error, Result};
use crate::sed::{log_space, SedTable};
use crate::settings::WithSettings;
use crate::{share, ParticleDistribution, RadiativeModel, Shared};
use crate::{BrokenPowerLaw, ExponentialCutoffBrokenPowerLaw, ExponentialCutoffPowerLaw, LogParabola,
            PowerLaw, SmoothBrokenPowerLaw, TableDistribution};
use crate::{InverseCompton, PionDecay, SeedPhotonField, Synchrotron};


fn one() -> f64 {
    1.
}

fn default_points() -> usize {
    100
}


/// A particle distribution as written in a configuration file.
#[derive(Clone,Debug,PartialEq,Serialize,Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
#[allow(missing_docs)]
pub enum DistributionConfig {
    PowerLaw {
        amplitude: f64,
        e_0: f64,
        alpha: f64,
    },

    ExponentialCutoffPowerLaw {
        amplitude: f64,
        e_0: f64,
        alpha: f64,
        e_cutoff: f64,
        #[serde(default = "one")]
        beta: f64,
    },

    BrokenPowerLaw {
        amplitude: f64,
        e_0: f64,
        e_break: f64,
        alpha_1: f64,
        alpha_2: f64,
    },

    SmoothBrokenPowerLaw {
        amplitude: f64,
        e_0: f64,
        e_break: f64,
        alpha_1: f64,
        alpha_2: f64,
        beta: f64,
    },

    ExponentialCutoffBrokenPowerLaw {
        amplitude: f64,
        e_0: f64,
        e_break: f64,
        alpha_1: f64,
        alpha_2: f64,
        e_cutoff: f64,
        #[serde(default = "one")]
        beta: f64,
    },

    LogParabola {
        amplitude: f64,
        e_0: f64,
        alpha: f64,
        beta: f64,
    },

    Table {
        energies: Vec<f64>,
        densities: Vec<f64>,
    },
}

impl DistributionConfig {
    /// Validate the parameters and make the distribution.
    pub fn build(&self) -> Result<AnyDistribution> {
        Ok(match *self {
            DistributionConfig::PowerLaw { amplitude, e_0, alpha } =>
                AnyDistribution::PowerLaw(PowerLaw::new(amplitude, e_0, alpha)?),

            DistributionConfig::ExponentialCutoffPowerLaw { amplitude, e_0, alpha, e_cutoff, beta } =>
                AnyDistribution::ExponentialCutoffPowerLaw(
                    ExponentialCutoffPowerLaw::new(amplitude, e_0, alpha, e_cutoff)?.cutoff_sharpness(beta)?
                ),

            DistributionConfig::BrokenPowerLaw { amplitude, e_0, e_break, alpha_1, alpha_2 } =>
                AnyDistribution::BrokenPowerLaw(BrokenPowerLaw::new(amplitude, e_0, e_break, alpha_1, alpha_2)?),

            DistributionConfig::SmoothBrokenPowerLaw { amplitude, e_0, e_break, alpha_1, alpha_2, beta } =>
                AnyDistribution::SmoothBrokenPowerLaw(
                    SmoothBrokenPowerLaw::new(amplitude, e_0, e_break, alpha_1, alpha_2, beta)?
                ),

            DistributionConfig::ExponentialCutoffBrokenPowerLaw {
                amplitude, e_0, e_break, alpha_1, alpha_2, e_cutoff, beta
            } =>
                AnyDistribution::ExponentialCutoffBrokenPowerLaw(
                    ExponentialCutoffBrokenPowerLaw::new(amplitude, e_0, e_break, alpha_1, alpha_2, e_cutoff)?
                        .cutoff_sharpness(beta)?
                ),

            DistributionConfig::LogParabola { amplitude, e_0, alpha, beta } =>
                AnyDistribution::LogParabola(LogParabola::new(amplitude, e_0, alpha, beta)?),

            DistributionConfig::Table { ref energies, ref densities } =>
                AnyDistribution::Table(TableDistribution::new(energies.clone(), densities.clone())?),
        })
    }
}


/// Any of the distributions this crate provides.
#[derive(Clone,Debug,PartialEq)]
#[allow(missing_docs)]
pub enum AnyDistribution {
    PowerLaw(PowerLaw),
    ExponentialCutoffPowerLaw(ExponentialCutoffPowerLaw),
    BrokenPowerLaw(BrokenPowerLaw),
    SmoothBrokenPowerLaw(SmoothBrokenPowerLaw),
    ExponentialCutoffBrokenPowerLaw(ExponentialCutoffBrokenPowerLaw),
    LogParabola(LogParabola),
    Table(TableDistribution),
}

impl ParticleDistribution for AnyDistribution {
    fn density(&self, energy: f64) -> f64 {
        match *self {
            AnyDistribution::PowerLaw(ref d) => d.density(energy),
            AnyDistribution::ExponentialCutoffPowerLaw(ref d) => d.density(energy),
            AnyDistribution::BrokenPowerLaw(ref d) => d.density(energy),
            AnyDistribution::SmoothBrokenPowerLaw(ref d) => d.density(energy),
            AnyDistribution::ExponentialCutoffBrokenPowerLaw(ref d) => d.density(energy),
            AnyDistribution::LogParabola(ref d) => d.density(energy),
            AnyDistribution::Table(ref d) => d.density(energy),
        }
    }
}


/// A blackbody seed field as written in a configuration file. Without an
/// energy density it is undiluted.
#[derive(Clone,Debug,PartialEq,Serialize,Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BlackbodyFieldConfig {
    /// Field name.
    pub name: String,
    /// Temperature in K.
    pub temperature: f64,
    /// Energy density in eV cm^-3.
    #[serde(default)]
    pub energy_density: Option<f64>,
}

/// A monochromatic seed field as written in a configuration file.
#[derive(Clone,Debug,PartialEq,Serialize,Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MonochromaticFieldConfig {
    /// Field name.
    pub name: String,
    /// Photon energy in eV.
    pub photon_energy: f64,
    /// Energy density in eV cm^-3.
    pub energy_density: f64,
}

/// A seed photon field as written in a configuration file. Objects must
/// match exactly one of the field shapes; a field with both a temperature
/// and a photon energy is rejected.
#[derive(Clone,Debug,PartialEq,Serialize,Deserialize)]
#[serde(untagged)]
pub enum SeedFieldConfig {
    /// One of the named presets: "CMB", "FIR", or "NIR".
    Preset(String),

    /// A blackbody.
    Blackbody(BlackbodyFieldConfig),

    /// A monochromatic field.
    Monochromatic(MonochromaticFieldConfig),
}

impl SeedFieldConfig {
    /// Make the field.
    pub fn build(&self) -> Result<SeedPhotonField> {
        match *self {
            SeedFieldConfig::Preset(ref name) => SeedPhotonField::preset(name)
                .ok_or_else(|| Error::Config(format!("unknown seed photon field preset `{}`", name))),

            SeedFieldConfig::Blackbody(BlackbodyFieldConfig { ref name, temperature, energy_density: Some(u) }) =>
                SeedPhotonField::blackbody(name.as_str(), temperature, u),

            SeedFieldConfig::Blackbody(BlackbodyFieldConfig { ref name, temperature, energy_density: None }) =>
                SeedPhotonField::thermal(name.as_str(), temperature),

            SeedFieldConfig::Monochromatic(MonochromaticFieldConfig { ref name, photon_energy, energy_density }) =>
                SeedPhotonField::monochromatic(name.as_str(), photon_energy, energy_density),
        }
    }
}


/// A radiative process as written in a configuration file.
#[derive(Clone,Debug,PartialEq,Serialize,Deserialize)]
#[serde(tag = "process", rename_all = "snake_case")]
pub enum ProcessConfig {
    /// Synchrotron emission from the electrons.
    Synchrotron {
        /// Field strength in Gauss.
        b_field: f64,
        /// Electron energy integration bounds in eV, if not the default.
        #[serde(default)]
        particle_energy_bounds: Option<(f64, f64)>,
    },

    /// Inverse-Compton emission from the electrons.
    InverseCompton {
        /// The target photon fields.
        seed_fields: Vec<SeedFieldConfig>,
        /// Electron energy integration bounds in eV, if not the default.
        #[serde(default)]
        particle_energy_bounds: Option<(f64, f64)>,
    },

    /// Pion decay from the protons.
    PionDecay {
        /// Target gas density in cm^-3.
        gas_density: f64,
        /// Proton energy integration bounds in eV, if not the default.
        #[serde(default)]
        particle_energy_bounds: Option<(f64, f64)>,
    },
}

impl ProcessConfig {
    /// The short name of the process.
    pub fn name(&self) -> &'static str {
        match *self {
            ProcessConfig::Synchrotron { .. } => "synchrotron",
            ProcessConfig::InverseCompton { .. } => "inverse_compton",
            ProcessConfig::PionDecay { .. } => "pion_decay",
        }
    }
}


/// The photon energy grid to tabulate output on.
#[derive(Clone,Debug,PartialEq,Serialize,Deserialize)]
pub struct EnergyGrid {
    /// The lowest energy in eV.
    pub min: f64,

    /// The highest energy in eV.
    pub max: f64,

    /// The number of log-spaced points.
    #[serde(default = "default_points")]
    pub points: usize,
}

impl EnergyGrid {
    /// The energies.
    pub fn energies(&self) -> Result<Vec<f64>> {
        log_space(self.min, self.max, self.points)
    }
}


/// A complete source description.
#[derive(Clone,Debug,PartialEq,Serialize,Deserialize)]
pub struct SourceConfig {
    /// The electron population, needed by synchrotron and inverse Compton.
    #[serde(default)]
    pub electrons: Option<DistributionConfig>,

    /// The proton population, needed by pion decay.
    #[serde(default)]
    pub protons: Option<DistributionConfig>,

    /// The radiative processes to compute.
    pub processes: Vec<ProcessConfig>,

    /// The output energy grid.
    pub energies: EnergyGrid,

    /// Distance to the source in cm, for observed fluxes.
    #[serde(default)]
    pub distance: Option<f64>,

    /// Relative tolerance of the particle-energy integrals.
    #[serde(default)]
    pub tolerance: Option<f64>,
}

impl FromStr for SourceConfig {
    type Err = Error;

    fn from_str(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }
}

impl SourceConfig {
    /// Read a configuration from a JSON file.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        fs::read_to_string(path)?.parse()
    }

    /// Construct the distributions and models. Each model logs to a child of
    /// `logger` tagged with its process name.
    pub fn build(&self, logger: &Logger) -> Result<Source> {
        if self.processes.is_empty() {
            return Err(Error::Config("no radiative processes requested".to_owned()));
        }

        let electrons = match self.electrons {
            Some(ref c) => Some(share(c.build()?)),
            None => None,
        };

        let protons = match self.protons {
            Some(ref c) => Some(share(c.build()?)),
            None => None,
        };

        let mut components = Vec::with_capacity(self.processes.len());

        for process in &self.processes {
            let log = logger.new(o!("process" => process.name()));

            let need = |pop: &Option<Shared<AnyDistribution>>, what: &str| {
                pop.clone().ok_or_else(|| Error::Config(format!("{} needs a {} distribution", process.name(), what)))
            };

            let component = match *process {
                ProcessConfig::Synchrotron { b_field, particle_energy_bounds } => {
                    let model = Synchrotron::new(need(&electrons, "electron")?, b_field)?;
                    Component::Synchrotron(self.configure(model, particle_energy_bounds, log)?)
                },

                ProcessConfig::InverseCompton { ref seed_fields, particle_energy_bounds } => {
                    let fields = seed_fields.iter().map(|f| f.build()).collect::<Result<Vec<_>>>()?;
                    let model = InverseCompton::new(need(&electrons, "electron")?, fields)?;
                    Component::InverseCompton(self.configure(model, particle_energy_bounds, log)?)
                },

                ProcessConfig::PionDecay { gas_density, particle_energy_bounds } => {
                    let model = PionDecay::new(need(&protons, "proton")?, gas_density)?;
                    Component::PionDecay(self.configure(model, particle_energy_bounds, log)?)
                },
            };

            components.push(component);
        }

        debug!(logger, "built source"; "components" => components.len());

        Ok(Source {
            electrons,
            protons,
            components,
            energies: self.energies.energies()?,
        })
    }

    fn configure<M: WithSettings>(&self, mut model: M, bounds: Option<(f64, f64)>, log: Logger) -> Result<M> {
        if let Some((lo, hi)) = bounds {
            model = model.particle_energy_bounds(lo, hi)?;
        }

        if let Some(d) = self.distance {
            model = model.distance(d)?;
        }

        if let Some(rtol) = self.tolerance {
            model = model.tolerance(rtol)?;
        }

        Ok(model.logger(log))
    }
}


/// One radiative process of a [`Source`].
#[derive(Clone,Debug)]
#[allow(missing_docs)]
pub enum Component {
    Synchrotron(Synchrotron<AnyDistribution>),
    InverseCompton(InverseCompton<AnyDistribution>),
    PionDecay(PionDecay<AnyDistribution>),
}

impl Component {
    /// The short name of the process.
    pub fn name(&self) -> &'static str {
        match *self {
            Component::Synchrotron(_) => "synchrotron",
            Component::InverseCompton(_) => "inverse_compton",
            Component::PionDecay(_) => "pion_decay",
        }
    }
}

impl RadiativeModel for Component {
    fn flux(&self, photon_energy: f64) -> Result<f64> {
        match *self {
            Component::Synchrotron(ref m) => m.flux(photon_energy),
            Component::InverseCompton(ref m) => m.flux(photon_energy),
            Component::PionDecay(ref m) => m.flux(photon_energy),
        }
    }
}


/// A configured source: shared particle populations and the processes they
/// feed. Its flux is the sum over processes.
#[derive(Clone,Debug)]
pub struct Source {
    electrons: Option<Shared<AnyDistribution>>,
    protons: Option<Shared<AnyDistribution>>,
    components: Vec<Component>,
    energies: Vec<f64>,
}

impl Source {
    /// The electron population, if any.
    pub fn electrons(&self) -> Option<&Shared<AnyDistribution>> {
        self.electrons.as_ref()
    }

    /// The proton population, if any.
    pub fn protons(&self) -> Option<&Shared<AnyDistribution>> {
        self.protons.as_ref()
    }

    /// The radiative processes.
    pub fn components(&self) -> &[Component] {
        &self.components
    }

    /// The configured output energy grid.
    pub fn energies(&self) -> &[f64] {
        &self.energies
    }

    /// Tabulate every process on the configured grid. Repeated processes get
    /// numbered column names.
    pub fn table(&self) -> Result<SedTable> {
        let mut table = SedTable::new(self.energies.clone())?;

        for (i, c) in self.components.iter().enumerate() {
            let earlier = self.components[..i].iter().filter(|o| o.name() == c.name()).count();

            let name = if earlier == 0 {
                c.name().to_owned()
            } else {
                format!("{}_{}", c.name(), earlier + 1)
            };

            table.add_component(name, c)?;
        }

        Ok(table)
    }
}

impl RadiativeModel for Source {
    fn flux(&self, photon_energy: f64) -> Result<f64> {
        let mut total = 0.;

        for c in &self.components {
            total += c.flux(photon_energy)?;
        }

        Ok(total)
    }
}


#[cfg(test)]
mod tests {
    use crate::{Error, ParticleDistribution, RadiativeModel};
    use super::*;

    fn quiet() -> Logger {
        Logger::root(slog::Discard, o!())
    }

    const SOURCE: &str = r#"{
        "electrons": { "type": "exponential_cutoff_power_law",
                       "amplitude": 1e36, "e_0": 1e12, "alpha": 2.5, "e_cutoff": 1e13 },
        "protons": { "type": "power_law", "amplitude": 1e38, "e_0": 1e12, "alpha": 2.2 },
        "processes": [
            { "process": "synchrotron", "b_field": 1e-5 },
            { "process": "inverse_compton",
              "seed_fields": ["CMB", { "name": "dust", "temperature": 30, "energy_density": 0.5 },
                              { "name": "line", "photon_energy": 1.0, "energy_density": 0.1 }] },
            { "process": "pion_decay", "gas_density": 1.0,
              "particle_energy_bounds": [1.22e9, 1e15] }
        ],
        "energies": { "min": 1e-3, "max": 1e13, "points": 5 },
        "distance": 3.086e21
    }"#;

    #[test]
    fn parse_and_build() {
        let cfg: SourceConfig = SOURCE.parse().unwrap();
        assert_eq!(cfg.processes.len(), 3);
        assert_eq!(cfg.energies.points, 5);

        match cfg.processes[1] {
            ProcessConfig::InverseCompton { ref seed_fields, .. } => {
                assert_eq!(seed_fields[0], SeedFieldConfig::Preset("CMB".to_owned()));
                assert!(matches!(seed_fields[1],
                                 SeedFieldConfig::Blackbody(BlackbodyFieldConfig { energy_density: Some(_), .. })));
                assert!(matches!(seed_fields[2], SeedFieldConfig::Monochromatic(_)));
            },
            _ => panic!("expected inverse Compton"),
        }

        let source = cfg.build(&quiet()).unwrap();
        assert_eq!(source.components().len(), 3);
        assert_eq!(source.energies().len(), 5);

        let e = 1e9;
        let parts: f64 = source.components().iter().map(|c| c.flux(e).unwrap()).sum();
        assert_approx_eq!(source.flux(e).unwrap() / parts, 1., 1e-12);

        match source.components()[2] {
            Component::PionDecay(ref m) => assert_eq!(m.settings().particle_energy_bounds(), (1.22e9, 1e15)),
            _ => panic!("expected pion decay"),
        }

        match source.components()[0] {
            Component::Synchrotron(ref m) => assert_eq!(m.settings().distance(), Some(3.086e21)),
            _ => panic!("expected synchrotron"),
        }
    }

    #[test]
    fn distribution_defaults() {
        let c: DistributionConfig = serde_json::from_str(
            r#"{ "type": "exponential_cutoff_power_law", "amplitude": 1, "e_0": 1, "alpha": 2, "e_cutoff": 10 }"#
        ).unwrap();
        assert!(matches!(c, DistributionConfig::ExponentialCutoffPowerLaw { beta, .. } if beta == 1.));

        let t: DistributionConfig = serde_json::from_str(
            r#"{ "type": "table", "energies": [1, 10], "densities": [1, 0.01] }"#
        ).unwrap();
        assert_approx_eq!(t.build().unwrap().density(10_f64.sqrt()), 0.1, 1e-12);

        let bad: DistributionConfig = serde_json::from_str(
            r#"{ "type": "power_law", "amplitude": -1, "e_0": 1, "alpha": 2 }"#
        ).unwrap();
        assert!(matches!(bad.build(), Err(Error::InvalidParameter { name: "amplitude", .. })));

        assert!(serde_json::from_str::<DistributionConfig>(r#"{ "type": "gaussian" }"#).is_err());
    }

    #[test]
    fn seed_field_shapes() {
        let thermal: SeedFieldConfig = serde_json::from_str(r#"{ "name": "dust", "temperature": 30 }"#).unwrap();
        assert!(matches!(thermal, SeedFieldConfig::Blackbody(BlackbodyFieldConfig { energy_density: None, .. })));
        assert_eq!(thermal.build().unwrap().temperature(), Some(30.));

        let ambiguous = r#"{ "name": "x", "temperature": 30, "photon_energy": 1, "energy_density": 1 }"#;
        assert!(serde_json::from_str::<SeedFieldConfig>(ambiguous).is_err());

        let misspelled = r#"{ "name": "x", "temperature": 30, "energy_densty": 1 }"#;
        assert!(serde_json::from_str::<SeedFieldConfig>(misspelled).is_err());

        let unnamed: SeedFieldConfig = serde_json::from_str(r#"{ "name": "", "temperature": 30 }"#).unwrap();
        assert!(matches!(unnamed.build(), Err(Error::EmptySeedFieldName)));
    }

    #[test]
    fn missing_populations() {
        let cfg: SourceConfig = r#"{
            "electrons": { "type": "power_law", "amplitude": 1e36, "e_0": 1e12, "alpha": 2 },
            "processes": [ { "process": "pion_decay", "gas_density": 1 } ],
            "energies": { "min": 1e8, "max": 1e12 }
        }"#.parse().unwrap();
        assert_eq!(cfg.energies.points, 100);

        match cfg.build(&quiet()) {
            Err(Error::Config(msg)) => assert!(msg.contains("proton")),
            other => panic!("unexpected: {:?}", other.map(|s| s.components().len())),
        }

        let empty: SourceConfig = r#"{ "processes": [], "energies": { "min": 1, "max": 2 } }"#.parse().unwrap();
        assert!(matches!(empty.build(&quiet()), Err(Error::Config(_))));

        let bad_preset: SourceConfig = r#"{
            "electrons": { "type": "power_law", "amplitude": 1e36, "e_0": 1e12, "alpha": 2 },
            "processes": [ { "process": "inverse_compton", "seed_fields": ["UV"] } ],
            "energies": { "min": 1e8, "max": 1e12 }
        }"#.parse().unwrap();
        assert!(matches!(bad_preset.build(&quiet()), Err(Error::Config(_))));

        assert!(matches!("{".parse::<SourceConfig>(), Err(Error::Json(_))));
        assert!(matches!(SourceConfig::from_path("/nonexistent/source.json"), Err(Error::Io(_))));
    }

    #[test]
    fn shared_populations_and_tables() {
        let cfg: SourceConfig = r#"{
            "electrons": { "type": "power_law", "amplitude": 1e36, "e_0": 1e12, "alpha": 2 },
            "processes": [ { "process": "synchrotron", "b_field": 1e-5 },
                           { "process": "synchrotron", "b_field": 2e-5 } ],
            "energies": { "min": 1e-2, "max": 1e2, "points": 3 }
        }"#.parse().unwrap();
        let source = cfg.build(&quiet()).unwrap();

        let table = source.table().unwrap();
        assert!(table.column("synchrotron").is_some());
        assert!(table.column("synchrotron_2").is_some());

        let before = source.flux(1.).unwrap();

        *source.electrons().unwrap().borrow_mut() = AnyDistribution::PowerLaw(PowerLaw::new(2e36, 1e12, 2.).unwrap());
        assert_approx_eq!(source.flux(1.).unwrap() / before, 2., 1e-9);
    }
}

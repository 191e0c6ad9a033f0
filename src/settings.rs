//! Runtime settings.
//!
//! Layered, later sources win:
//!
//! 1. built-in defaults
//! 2. an optional TOML file
//! 3. `SOILWATCH_*` environment variables, with `__` between nested keys
//!    (`SOILWATCH_THRESHOLDS__MPS2__VALID_MIN=-800`)
//!
//! Command line flags are applied on top by the binary.

use std::path::{Path, PathBuf};

use anyhow::{ensure, Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use soilwatch_types::{Bay, SensorKind};

use crate::data::Thresholds;
use crate::run::RunPlan;

const ENV_PREFIX: &str = "SOILWATCH";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Directory holding the masterlists and series exports.
    pub data_dir: PathBuf,
    /// Directory receiving the CSV tables and the HTML report.
    pub output_dir: PathBuf,
    pub bays: Vec<Bay>,
    pub parallel: bool,
    pub thresholds: Thresholds,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            output_dir: PathBuf::from("outputs"),
            bays: Bay::ALL.to_vec(),
            parallel: true,
            thresholds: Thresholds::default(),
        }
    }
}

impl Settings {
    /// Load settings from the defaults, an optional file and the process environment.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_with(path, environment())
    }

    fn load_with(path: Option<&Path>, env: Environment) -> Result<Self> {
        let mut builder = Config::builder().add_source(Config::try_from(&Settings::default())?);
        if let Some(path) = path {
            builder = builder.add_source(File::from(path));
        }

        let settings: Settings = builder
            .add_source(env)
            .build()
            .and_then(|config| config.try_deserialize())
            .with_context(|| match path {
                Some(path) => format!("loading settings from {}", path.display()),
                None => "loading settings".to_string(),
            })?;

        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(!self.bays.is_empty(), "no bays selected");
        self.thresholds.validate()
    }

    /// The run plan these settings describe. Repeated bays are evaluated once.
    pub fn plan(&self) -> RunPlan {
        let mut bays = Vec::new();
        for bay in &self.bays {
            if !bays.contains(bay) {
                bays.push(*bay);
            }
        }

        RunPlan {
            bays,
            kinds: SensorKind::ALL.to_vec(),
            thresholds: self.thresholds.clone(),
            parallel: self.parallel,
        }
    }
}

fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
        .list_separator(",")
        .with_list_parse_key("bays")
}

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub mod validator;

use crate::cli::Cli;

#[derive(Debug, Default, Deserialize, Serialize, Clone, PartialEq)]
pub struct Settings {
    #[serde(default)]
    pub generator: GeneratorSettings,
}

/// Tunables for the value generator.
///
/// Defaults: optional fields are `null` half of the time, unconstrained ints
/// draw from `[0, 10000]`, unconstrained floats from `[0.0, 1000.0]` rounded to
/// two decimals, lists hold 1 to 5 items and maps 1 to 3 entries.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct GeneratorSettings {
    /// Probability that an optional field is emitted as `null`
    #[serde(default = "default_null_probability")]
    pub null_probability: f64,
    #[serde(default = "default_int_min")]
    pub int_min: i64,
    #[serde(default = "default_int_max")]
    pub int_max: i64,
    #[serde(default = "default_float_min")]
    pub float_min: f64,
    #[serde(default = "default_float_max")]
    pub float_max: f64,
    /// Round generated floats to `float_decimals` places when the bounds allow it
    #[serde(default = "default_round_floats")]
    pub round_floats: bool,
    #[serde(default = "default_float_decimals")]
    pub float_decimals: u32,
    #[serde(default = "default_list_min_len")]
    pub list_min_len: usize,
    #[serde(default = "default_list_max_len")]
    pub list_max_len: usize,
    #[serde(default = "default_map_min_len")]
    pub map_min_len: usize,
    #[serde(default = "default_map_max_len")]
    pub map_max_len: usize,
}

fn default_null_probability() -> f64 {
    0.5
}

fn default_int_min() -> i64 {
    0
}

fn default_int_max() -> i64 {
    10_000
}

fn default_float_min() -> f64 {
    0.0
}

fn default_float_max() -> f64 {
    1000.0
}

fn default_round_floats() -> bool {
    true
}

fn default_float_decimals() -> u32 {
    2
}

fn default_list_min_len() -> usize {
    1
}

fn default_list_max_len() -> usize {
    5
}

fn default_map_min_len() -> usize {
    1
}

fn default_map_max_len() -> usize {
    3
}

impl Default for GeneratorSettings {
    fn default() -> Self {
        Self {
            null_probability: default_null_probability(),
            int_min: default_int_min(),
            int_max: default_int_max(),
            float_min: default_float_min(),
            float_max: default_float_max(),
            round_floats: default_round_floats(),
            float_decimals: default_float_decimals(),
            list_min_len: default_list_min_len(),
            list_max_len: default_list_max_len(),
            map_min_len: default_map_min_len(),
            map_max_len: default_map_max_len(),
        }
    }
}

impl Settings {
    /// Load settings from `exemplar.toml` in the working directory, if present.
    pub fn new() -> Result<Self, anyhow::Error> {
        Self::from_path(Path::new("exemplar.toml"))
    }

    /// Create settings from CLI arguments (config file, env vars, then CLI overrides)
    pub fn new_with_cli(cli: &Cli) -> Result<Self, anyhow::Error> {
        let mut settings = Self::load(&cli.config)?;
        settings.apply_cli_overrides(cli);
        settings.validated()
    }

    pub fn from_path(path: &Path) -> Result<Self, anyhow::Error> {
        Self::load(path)?.validated()
    }

    fn load(path: &Path) -> Result<Self, anyhow::Error> {
        let s = Config::builder()
            .add_source(File::from(path.to_path_buf()).required(false))
            .add_source(
                Environment::with_prefix("EXEMPLAR")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_default("generator.null_probability", default_null_probability())?
            .build()?;

        let settings: Settings = s.try_deserialize()?;
        tracing::debug!("Loaded generator settings from {}", path.display());
        Ok(settings)
    }

    fn validated(self) -> Result<Self, anyhow::Error> {
        validator::ConfigValidator::validate(&self).map_err(|errors| {
            let error_messages: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
            anyhow::anyhow!(
                "Configuration validation failed:\n{}",
                error_messages.join("\n")
            )
        })?;
        Ok(self)
    }

    /// Apply CLI argument overrides to settings
    fn apply_cli_overrides(&mut self, cli: &Cli) {
        if let Some(p) = cli.null_probability {
            self.generator.null_probability = p;
        }
    }
}

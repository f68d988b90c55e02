use std::fs;
use log::LevelFilter;
use serde::Deserialize;
use crate::errors::ConfigError;

#[derive(Deserialize)]
pub struct Location {
    pub code: String,
}

#[derive(Deserialize)]
pub struct MeteoParameters {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_request_delay_ms")]
    pub request_delay_ms: u64,
}

#[derive(Deserialize)]
pub struct History {
    #[serde(default = "default_history_days")]
    pub days_back: i64,
}

#[derive(Deserialize)]
pub struct Plot {
    #[serde(default = "default_plot_days")]
    pub days_back: i64,
}

#[derive(Deserialize)]
pub struct Files {
    pub output_dir: String,
    pub input_dir: Option<String>,
}

#[derive(Deserialize)]
pub struct General {
    pub log_path: String,
    pub log_level: LevelFilter,
    pub log_to_stdout: bool,
}

#[derive(Deserialize)]
pub struct Config {
    pub location: Location,
    #[serde(default)]
    pub meteo: MeteoParameters,
    #[serde(default)]
    pub history: History,
    #[serde(default)]
    pub plot: Plot,
    pub files: Files,
    pub general: General,
}

impl Default for MeteoParameters {
    fn default() -> Self {
        MeteoParameters {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            request_delay_ms: default_request_delay_ms(),
        }
    }
}

impl Default for History {
    fn default() -> Self {
        History { days_back: default_history_days() }
    }
}

impl Default for Plot {
    fn default() -> Self {
        Plot { days_back: default_plot_days() }
    }
}

/// Upper limit for any days_back setting, roughly a century
pub const MAX_DAYS_BACK: i64 = 36_500;

fn default_base_url() -> String { "https://api.meteo.lt/v1".to_string() }
fn default_timeout_secs() -> u64 { 30 }
fn default_request_delay_ms() -> u64 { 500 }
fn default_history_days() -> i64 { 365 }
fn default_plot_days() -> i64 { 7 }

/// Loads the configuration file and returns a struct with all configuration items
///
/// # Arguments
///
/// * 'config_path' - path to the configuration file
pub fn load_config(config_path: &str) -> Result<Config, ConfigError> {
    let toml = fs::read_to_string(config_path)?;
    parse_config(&toml)
}

/// Parses and validates configuration
///
/// # Arguments
///
/// * 'toml' - configuration in toml format
pub fn parse_config(toml: &str) -> Result<Config, ConfigError> {
    let mut config: Config = toml::from_str(toml)?;

    if config.location.code.trim().is_empty() {
        return Err(ConfigError::from("location code must not be empty"));
    }
    for days_back in [config.history.days_back, config.plot.days_back] {
        if !(0..=MAX_DAYS_BACK).contains(&days_back) {
            return Err(ConfigError(format!("days_back must be between 0 and {}, got {}", MAX_DAYS_BACK, days_back)));
        }
    }
    config.meteo.base_url = config.meteo.base_url.trim_end_matches('/').to_string();

    Ok(config)
}
